//! Image entity model.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

use gallery_core::types::{FolderId, ImageId, Scope};

/// An uploaded image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    /// Unique image identifier.
    pub id: ImageId,
    /// Original (sanitized) file name.
    pub filename: String,
    /// Public URL of the stored object.
    pub url: String,
    /// When the image was uploaded. `None` when the backend sent null or a
    /// format we cannot read.
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub upload_date: Option<DateTime<Utc>>,
    /// Containing folder (null for images at the root).
    #[serde(default)]
    pub folder_id: Option<FolderId>,
}

impl Image {
    /// The scope this image is listed in.
    pub fn scope(&self) -> Scope {
        Scope::from(self.folder_id.clone())
    }

    /// Upload time as `YYYY-MM-DD HH:MM`, or `-` when unknown.
    pub fn uploaded_label(&self) -> String {
        self.upload_date
            .map_or_else(|| "-".to_string(), |t| t.format("%Y-%m-%d %H:%M").to_string())
    }

    /// Get the file extension (lowercase), if any.
    pub fn extension(&self) -> Option<String> {
        self.filename
            .rsplit('.')
            .next()
            .filter(|ext| *ext != self.filename)
            .map(|ext| ext.to_lowercase())
    }
}

/// Parse a timestamp in any format the backend is known to emit.
///
/// Accepts RFC 3339, the RFC 2822 / HTTP-date form produced by the
/// backend's JSON encoder (`Tue, 15 Nov 1994 08:12:31 GMT`), and a naive
/// ISO timestamp which is taken as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    DateTime::parse_from_rfc3339(raw)
        .or_else(|_| DateTime::parse_from_rfc2822(raw))
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
                .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
                .map(|naive| naive.and_utc())
                .ok()
        })
}

fn deserialize_timestamp<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<DateTime<Utc>>, D::Error> {
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(serde_json::Value::String(text)) => {
            let parsed = parse_timestamp(&text);
            if parsed.is_none() {
                warn!(value = %text, "Unrecognized upload_date");
            }
            parsed
        }
        Some(serde_json::Value::Null) | None => None,
        Some(other) => {
            warn!(value = %other, "Unrecognized upload_date");
            None
        }
    })
}
