//! Browser model configuration.

use serde::{Deserialize, Serialize};

/// How the breadcrumb is rebuilt after a navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BreadcrumbStrategy {
    /// Walk parent pointers through folders already seen this session.
    /// A chain with unseen ancestors yields a truncated breadcrumb.
    Walk,
    /// Walk locally, then ask the backend for the ancestor chain when the
    /// local walk does not reach a top-level folder.
    Resolve,
}

impl Default for BreadcrumbStrategy {
    fn default() -> Self {
        Self::Resolve
    }
}

/// Browser model settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BrowserConfig {
    /// Breadcrumb reconstruction strategy.
    #[serde(default)]
    pub breadcrumb: BreadcrumbStrategy,
}
