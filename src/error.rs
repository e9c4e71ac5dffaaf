use std::io;
use thiserror::Error;

/// Result type for decode operations.
pub type DecodeResult<T> = Result<T, DecodeError>;

/// Errors surfaced by the decoder.
///
/// Kernels themselves never fail at the block level; a malformed BC7 mode
/// resolves to an opaque black block instead of an error.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The container format identifier is not in the registry, or a
    /// block-level operation was requested for a raw pixel format.
    #[error("unsupported or unrecognized texture format")]
    UnsupportedFormat,

    /// The encoded buffer does not have the exact byte length the format
    /// and dimensions require.
    #[error("encoded data is {actual} bytes but {required} bytes are required")]
    LengthMismatch { required: usize, actual: usize },

    /// A stream ended before the required byte count could be read.
    #[error("stream ended after {read} of {required} required bytes")]
    Truncated { required: usize, read: usize },

    /// The output slot passed for a single-block decode is not a 4x4 grid.
    #[error("single-block output needs exactly 16 pixels, got {0}")]
    InvalidShape(usize),

    /// The cancellation handle was tripped before the operation completed.
    #[error("the operation was cancelled")]
    Cancelled,

    /// The container magic bytes were not recognized as KTX or DDS, or the
    /// container structure could not be parsed.
    #[error("unrecognized or malformed container")]
    MalformedContainer,

    /// An underlying I/O failure other than end-of-stream.
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
}
