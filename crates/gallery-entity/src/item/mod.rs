//! Client-side selection and clipboard value objects.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use gallery_core::types::{FolderId, ImageId};

use crate::folder::Folder;
use crate::image::Image;

/// The two kinds of browsable entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    /// An image.
    Image,
    /// A folder.
    Folder,
}

impl ItemKind {
    /// Backend collection path segment (`images` / `folders`).
    pub fn collection(&self) -> &'static str {
        match self {
            Self::Image => "images",
            Self::Folder => "folders",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Image => write!(f, "image"),
            Self::Folder => write!(f, "folder"),
        }
    }
}

impl FromStr for ItemKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "image" | "images" => Ok(Self::Image),
            "folder" | "folders" => Ok(Self::Folder),
            other => Err(format!("unknown item kind '{other}'")),
        }
    }
}

/// A typed reference to a folder or an image.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "lowercase")]
pub enum ItemRef {
    /// An image by id.
    Image(ImageId),
    /// A folder by id.
    Folder(FolderId),
}

impl ItemRef {
    /// Build a reference from a kind and a raw id.
    pub fn new(kind: ItemKind, id: impl Into<String>) -> Self {
        match kind {
            ItemKind::Image => Self::Image(ImageId::new(id)),
            ItemKind::Folder => Self::Folder(FolderId::new(id)),
        }
    }

    /// The referenced kind.
    pub fn kind(&self) -> ItemKind {
        match self {
            Self::Image(_) => ItemKind::Image,
            Self::Folder(_) => ItemKind::Folder,
        }
    }

    /// The raw id.
    pub fn id(&self) -> &str {
        match self {
            Self::Image(id) => id.as_str(),
            Self::Folder(id) => id.as_str(),
        }
    }

    /// The folder id, when this references a folder.
    pub fn as_folder(&self) -> Option<&FolderId> {
        match self {
            Self::Folder(id) => Some(id),
            Self::Image(_) => None,
        }
    }
}

impl fmt::Display for ItemRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind(), self.id())
    }
}

/// The single selected entry of the current view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    /// What is selected.
    pub item: ItemRef,
    /// Display name (folder name or image file name).
    pub name: String,
}

impl Selection {
    /// Create a selection.
    pub fn new(item: ItemRef, name: impl Into<String>) -> Self {
        Self {
            item,
            name: name.into(),
        }
    }

    /// The selected kind.
    pub fn kind(&self) -> ItemKind {
        self.item.kind()
    }
}

impl From<&Folder> for Selection {
    fn from(folder: &Folder) -> Self {
        Self::new(ItemRef::Folder(folder.id.clone()), folder.name.clone())
    }
}

impl From<&Image> for Selection {
    fn from(image: &Image) -> Self {
        Self::new(ItemRef::Image(image.id.clone()), image.filename.clone())
    }
}

/// Whether a paste duplicates or relocates the clipboard item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClipboardMode {
    /// Paste inserts a duplicate; the original stays.
    Copy,
    /// Paste moves the original.
    Cut,
}

impl fmt::Display for ClipboardMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Copy => write!(f, "copy"),
            Self::Cut => write!(f, "cut"),
        }
    }
}

/// The pending copy/cut target awaiting a paste.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClipboardItem {
    /// What was captured.
    pub item: ItemRef,
    /// Display name at capture time.
    pub name: String,
    /// Copy or cut.
    pub mode: ClipboardMode,
}

impl ClipboardItem {
    /// Capture a selection.
    pub fn capture(selection: &Selection, mode: ClipboardMode) -> Self {
        Self {
            item: selection.item.clone(),
            name: selection.name.clone(),
            mode,
        }
    }
}
