/// A byte-at-a-time frame decoder.
///
/// Each call to [`process_byte`](ByteDecoder::process_byte) consumes exactly
/// one input byte and returns immediately, which makes implementations safe
/// to drive from a poll loop or an I/O callback.
///
/// `packet_complete` is one-shot: it stays set until the next byte is fed,
/// at which point the decoder resets itself and starts the next frame.
/// Callers that feed a continuous stream never need to call `reset`.
pub trait ByteDecoder {
    /// Feed one input byte; returns the decoded payload byte, if any.
    fn process_byte(&mut self, byte: u8) -> Option<u8>;

    /// Whether the last byte fed terminated a frame.
    fn packet_complete(&self) -> bool;

    /// Discard any partial frame and start over.
    fn reset(&mut self);
}
