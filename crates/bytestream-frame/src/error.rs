/// Errors that can occur while framing a byte stream.
///
/// Malformed COBS/SLIP content is never an error: the decoders recover on
/// their own at the next delimiter.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The payload exceeds the configured maximum size.
    #[error("payload too large ({size} bytes, max {max})")]
    PayloadTooLarge { size: usize, max: usize },

    /// An I/O error occurred while reading or writing frames.
    #[error("frame I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The stream ended before a complete frame was received.
    #[error("connection closed (incomplete frame)")]
    ConnectionClosed,

    /// The framing mode name is not recognized.
    #[error("unknown frame mode {0:?} (expected \"cobs\" or \"slip\")")]
    UnknownMode(String),
}

pub type Result<T> = std::result::Result<T, FrameError>;
