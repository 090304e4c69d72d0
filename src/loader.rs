//! Image loading and stale-load rejection.
//!
//! Loading is a one-shot asynchronous operation that resolves to a
//! [`Bitmap`] or an [`ImageError`]. Several loads may be in flight at once
//! (a resize arriving while the first image is still decoding, say), and
//! they can finish in any order. Each load is tagged with a [`LoadTicket`];
//! only the most recently issued ticket may replace the field.

use std::path::PathBuf;
use std::sync::Arc;

use crate::bitmap::Bitmap;
use crate::error::ImageError;

/// Where a source image comes from.
#[derive(Debug, Clone)]
pub enum ImageSource {
    /// An image file on disk.
    Path(PathBuf),
    /// Encoded image bytes already in memory (an upload, an embedded asset).
    Bytes(Arc<[u8]>),
}

impl ImageSource {
    /// Short description for logs and status messages.
    pub fn describe(&self) -> String {
        match self {
            ImageSource::Path(path) => path.display().to_string(),
            ImageSource::Bytes(bytes) => format!("<{} bytes>", bytes.len()),
        }
    }
}

impl From<PathBuf> for ImageSource {
    fn from(path: PathBuf) -> Self {
        ImageSource::Path(path)
    }
}

impl From<Vec<u8>> for ImageSource {
    fn from(bytes: Vec<u8>) -> Self {
        ImageSource::Bytes(bytes.into())
    }
}

/// Decode an image source.
///
/// This performs blocking I/O and decoding inside the future; hosts that
/// must not stall their event loop should drive it on a worker thread.
pub async fn load_bitmap(source: ImageSource) -> Result<Bitmap, ImageError> {
    match source {
        ImageSource::Path(path) => Bitmap::open(path),
        ImageSource::Bytes(bytes) => Bitmap::decode(&bytes),
    }
}

/// Identifies one load request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LoadTicket {
    generation: u64,
}

impl LoadTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Issues load tickets and remembers which one is current.
#[derive(Debug, Default)]
pub struct Loader {
    latest: u64,
    settled: u64,
}

impl Loader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new load. Every ticket issued before this one becomes stale.
    pub fn begin(&mut self) -> LoadTicket {
        self.latest += 1;
        LoadTicket {
            generation: self.latest,
        }
    }

    /// Whether `ticket` is the most recently issued one.
    pub fn is_current(&self, ticket: LoadTicket) -> bool {
        ticket.generation == self.latest
    }

    /// Record that `ticket` finished. Returns `false` (and records nothing)
    /// if a newer load has been started since.
    pub fn settle(&mut self, ticket: LoadTicket) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.settled = ticket.generation;
        true
    }

    /// Whether the latest load has not finished yet.
    pub fn is_pending(&self) -> bool {
        self.settled < self.latest
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newer_ticket_supersedes() {
        let mut loader = Loader::new();
        let first = loader.begin();
        let second = loader.begin();
        assert!(second > first);
        assert!(!loader.is_current(first));
        assert!(loader.is_current(second));

        // The older load finishing late is rejected
        assert!(!loader.settle(first));
        assert!(loader.is_pending());

        assert!(loader.settle(second));
        assert!(!loader.is_pending());
    }

    #[test]
    fn test_fresh_loader_not_pending() {
        assert!(!Loader::new().is_pending());
    }

    #[test]
    fn test_load_bitmap_from_bytes_failure() {
        let result = pollster::block_on(load_bitmap(ImageSource::from(vec![1, 2, 3])));
        assert!(matches!(result, Err(ImageError::Decode(_))));
    }

    #[test]
    fn test_describe() {
        let src = ImageSource::from(vec![0u8; 5]);
        assert_eq!(src.describe(), "<5 bytes>");
    }
}
