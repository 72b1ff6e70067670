use std::io;

/// Alias for `std::result::Result` with this crate's [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Failures surfaced while pulling bits out of a source.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The source ran out of bytes before the requested span was complete.
    ///
    /// Reported exactly as the source reports it, on every operation that
    /// touches the source. Any bits gathered before exhaustion are lost;
    /// callers that need them must size their requests accordingly.
    #[error("end of input")]
    EndOfInput,

    /// The destination buffer handed to `read_bits_into` cannot hold the
    /// requested number of bits. Raised before the source is touched.
    #[error("destination holds {len} bytes but {needed} are needed")]
    BufferTooSmall { needed: usize, len: usize },

    /// Any other failure reported by the underlying source.
    #[error(transparent)]
    Io(#[from] io::Error),
}
