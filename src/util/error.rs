//! Error types for framematch.

use std::path::PathBuf;
use thiserror::Error;

/// Result alias for framematch operations.
pub type FrameMatchResult<T> = std::result::Result<T, FrameMatchError>;

/// Errors that can occur while extracting, searching, or persisting matches.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum FrameMatchError {
    /// The input data or parameters are invalid.
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
    /// Width or height is zero or overflows.
    #[error("invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    /// A bit buffer cannot be split into rows of the given width.
    #[error("mask of {len} bits is not a multiple of width {width}")]
    MaskLength { len: usize, width: usize },
    /// A hex string does not decode to the requested bit length.
    #[error("invalid hex edges: {reason}")]
    InvalidHex { reason: String },
    /// A line of the store file is malformed.
    #[error("store line {line}: {reason}")]
    StoreFormat { line: usize, reason: String },
    /// A line of a frame collection file is malformed.
    #[error("frame line {line}: {reason}")]
    FrameFormat { line: usize, reason: String },
    /// The source directory does not exist.
    #[error("directory does not exist: {}", .0.display())]
    MissingDirectory(PathBuf),
    /// Decoding or encoding an image failed.
    #[error("image i/o on {}: {reason}", path.display())]
    ImageIo { path: PathBuf, reason: String },
    /// Reading or writing a file failed.
    #[error("i/o on {}: {reason}", path.display())]
    Io { path: PathBuf, reason: String },
    /// An index was outside the valid range.
    #[error("{context} index {index} out of bounds (len {len})")]
    IndexOutOfBounds {
        index: usize,
        len: usize,
        context: &'static str,
    },
    /// The platform could not report its available parallelism.
    #[error("hardware parallelism is unavailable")]
    ParallelismUnavailable,
    /// Attempted to persist a collection with no frames.
    #[error("cannot save an empty frame collection")]
    EmptyCollection,
    /// A search worker thread panicked.
    #[error("search worker panicked")]
    WorkerPanicked,
    /// The search worker pool could not be started.
    #[error("failed to build search worker pool: {0}")]
    WorkerPool(String),
}

impl FrameMatchError {
    pub(crate) fn io(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            reason: err.to_string(),
        }
    }

    pub(crate) fn image_io(path: impl Into<PathBuf>, err: image::ImageError) -> Self {
        Self::ImageIo {
            path: path.into(),
            reason: err.to_string(),
        }
    }
}
