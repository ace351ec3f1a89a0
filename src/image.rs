use crate::{config::Images, error::ImageError};
use base64::{Engine as _, engine::general_purpose::STANDARD as b64};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// A photo chosen for a report, either on disk or already in memory.
#[derive(Debug, Clone)]
pub struct ImageFile {
    name: String,
    source: ImageSource,
}

#[derive(Debug, Clone)]
enum ImageSource {
    Path(PathBuf),
    Bytes(Vec<u8>),
}

impl ImageFile {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self {
            name,
            source: ImageSource::Path(path),
        }
    }

    pub fn from_bytes(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            source: ImageSource::Bytes(bytes),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// What the draft remembers about the attached photo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageAttachment {
    pub name: String,
    pub content_type: String,
    pub bytes: u64,
}

/// `data:` URL rendering of the photo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePreview {
    pub data_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedImage {
    pub attachment: ImageAttachment,
    pub preview: ImagePreview,
}

pub async fn read_preview(file: &ImageFile, limits: &Images) -> Result<LoadedImage, ImageError> {
    let content_type = content_type_for(&file.name, limits).ok_or_else(|| ImageError::Unsupported {
        name: file.name.clone(),
    })?;

    let bytes = match &file.source {
        ImageSource::Path(path) => read_limited(&file.name, path, limits.max_bytes).await?,
        ImageSource::Bytes(bytes) => bytes.clone(),
    };

    let len = bytes.len() as u64;
    if len == 0 {
        return Err(ImageError::Empty {
            name: file.name.clone(),
        });
    }
    if len > limits.max_bytes {
        return Err(ImageError::TooLarge {
            name: file.name.clone(),
            bytes: len,
            limit: limits.max_bytes,
        });
    }

    debug!("image {} read: {} bytes as {}", file.name, len, content_type);
    let data_url = format!("data:{};base64,{}", content_type, b64.encode(&bytes));

    Ok(LoadedImage {
        attachment: ImageAttachment {
            name: file.name.clone(),
            content_type: content_type.to_string(),
            bytes: len,
        },
        preview: ImagePreview { data_url },
    })
}

async fn read_limited(name: &str, path: &Path, max_bytes: u64) -> Result<Vec<u8>, ImageError> {
    let read_err = |source| ImageError::Read {
        name: name.to_string(),
        source,
    };
    let meta = tokio::fs::metadata(path).await.map_err(read_err)?;
    if meta.len() > max_bytes {
        return Err(ImageError::TooLarge {
            name: name.to_string(),
            bytes: meta.len(),
            limit: max_bytes,
        });
    }
    tokio::fs::read(path).await.map_err(read_err)
}

/// Content type for an accepted image extension, `None` for anything else.
pub fn content_type_for(name: &str, limits: &Images) -> Option<&'static str> {
    let ext = Path::new(name).extension()?.to_str()?.to_ascii_lowercase();
    if !limits
        .accepted_extensions
        .iter()
        .any(|a| a.eq_ignore_ascii_case(&ext))
    {
        return None;
    }
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "bmp" => Some("image/bmp"),
        "heic" => Some("image/heic"),
        "svg" => Some("image/svg+xml"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_type_is_case_insensitive() {
        let limits = Images::default();
        assert_eq!(content_type_for("SEAWALL.JPG", &limits), Some("image/jpeg"));
        assert_eq!(content_type_for("notes.txt", &limits), None);
        assert_eq!(content_type_for("no_extension", &limits), None);
    }

    #[test]
    fn extension_must_be_accepted_by_config() {
        let limits = Images {
            accepted_extensions: vec!["png".into()],
            ..Images::default()
        };
        assert_eq!(content_type_for("beach.png", &limits), Some("image/png"));
        assert_eq!(content_type_for("beach.gif", &limits), None);
    }
}
