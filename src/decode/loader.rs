/// File loader producing data-URI image sources
///
/// Reads the whole file asynchronously and sniffs its format from the magic
/// bytes. Nothing is validated beyond "readable and non-empty": a file that
/// is not an image still loads, as an opaque `application/octet-stream`
/// source that the UI shows as a broken tile.

use std::future::Future;
use std::path::PathBuf;

use tracing::debug;

use super::error::DecodeError;
use crate::state::data::ImageSource;

/// MIME type used when the format cannot be recognised
pub const FALLBACK_MIME: &str = "application/octet-stream";

/// A file picked by the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHandle {
    pub path: PathBuf,
}

impl FileHandle {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl From<PathBuf> for FileHandle {
    fn from(path: PathBuf) -> Self {
        Self { path }
    }
}

/// Turns one file into an image source.
///
/// Each call completes exactly once with either the source or an error.
/// Implementations must not block the calling task.
pub trait ImageDecoder: Send + Sync + 'static {
    fn decode(
        &self,
        file: FileHandle,
    ) -> impl Future<Output = Result<ImageSource, DecodeError>> + Send;
}

/// Default decoder: reads the file from disk into memory
#[derive(Debug, Clone, Copy, Default)]
pub struct DataUriDecoder;

impl ImageDecoder for DataUriDecoder {
    fn decode(
        &self,
        file: FileHandle,
    ) -> impl Future<Output = Result<ImageSource, DecodeError>> + Send {
        async move {
            let bytes = tokio::fs::read(&file.path)
                .await
                .map_err(|source| DecodeError::Read {
                    path: file.path.clone(),
                    source,
                })?;

            if bytes.is_empty() {
                return Err(DecodeError::Empty { path: file.path });
            }

            let mime = sniff_mime(&bytes);
            debug!(path = %file.path.display(), mime, len = bytes.len(), "📷 Loaded file");
            Ok(ImageSource::new(mime, bytes))
        }
    }
}

/// MIME type from magic bytes, or [`FALLBACK_MIME`]
pub fn sniff_mime(bytes: &[u8]) -> &'static str {
    image::guess_format(bytes)
        .map(|format| format.to_mime_type())
        .unwrap_or(FALLBACK_MIME)
}
