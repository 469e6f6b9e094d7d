use std::io::{ErrorKind, Write};

use bytes::BytesMut;

use crate::codec::{encode_frame, FrameConfig};
use crate::error::{FrameError, Result};

const INITIAL_BUFFER_CAPACITY: usize = 8 * 1024;

/// Writes complete frames to any `Write` stream.
pub struct FrameWriter<T> {
    inner: T,
    buf: BytesMut,
    config: FrameConfig,
}

impl<T: Write> FrameWriter<T> {
    /// Create a new frame writer with default configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, FrameConfig::default())
    }

    /// Create a new frame writer with explicit configuration.
    pub fn with_config(inner: T, config: FrameConfig) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
            config,
        }
    }

    /// Encode and send one payload as a frame (blocking).
    pub fn send(&mut self, payload: &[u8]) -> Result<()> {
        if payload.len() > self.config.max_payload_size {
            return Err(FrameError::PayloadTooLarge {
                size: payload.len(),
                max: self.config.max_payload_size,
            });
        }

        self.buf.clear();
        encode_frame(self.config.mode, payload, &mut self.buf);

        let mut offset = 0usize;
        while offset < self.buf.len() {
            match self.inner.write(&self.buf[offset..]) {
                Ok(0) => return Err(FrameError::ConnectionClosed),
                Ok(n) => offset += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) => return Err(FrameError::Io(err)),
            }
        }

        self.flush()
    }

    /// Flush the underlying stream.
    pub fn flush(&mut self) -> Result<()> {
        loop {
            match self.inner.flush() {
                Ok(()) => return Ok(()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) => return Err(FrameError::Io(err)),
            }
        }
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the writer and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }

    /// Update maximum payload size for subsequent frame encoding.
    pub fn set_max_payload_size(&mut self, max_payload_size: usize) {
        self.config.max_payload_size = max_payload_size;
    }

    /// Current frame writer configuration.
    pub fn config(&self) -> &FrameConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::codec::{decode_frame, FrameMode};
    use crate::reader::FrameReader;
    use crate::{cobs, slip};

    fn wire(writer: FrameWriter<Cursor<Vec<u8>>>) -> BytesMut {
        BytesMut::from(writer.into_inner().into_inner().as_slice())
    }

    /// Fails the first write and first flush with `kind`, then behaves.
    #[derive(Default)]
    struct Flaky {
        kind: Option<ErrorKind>,
        write_failed: bool,
        flush_failed: bool,
        flushes: usize,
        data: Vec<u8>,
    }

    impl Flaky {
        fn failing_with(kind: ErrorKind) -> Self {
            Self {
                kind: Some(kind),
                ..Self::default()
            }
        }
    }

    impl Write for Flaky {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            if let (Some(kind), false) = (self.kind, self.write_failed) {
                self.write_failed = true;
                return Err(kind.into());
            }
            // Short writes exercise the resume loop.
            let n = buf.len().min(3);
            self.data.extend_from_slice(&buf[..n]);
            Ok(n)
        }

        fn flush(&mut self) -> std::io::Result<()> {
            if let (Some(kind), false) = (self.kind, self.flush_failed) {
                self.flush_failed = true;
                return Err(kind.into());
            }
            self.flushes += 1;
            Ok(())
        }
    }

    #[test]
    fn cobs_frame_on_the_wire() {
        let mut writer = FrameWriter::new(Cursor::new(Vec::<u8>::new()));
        writer.send(&[0x11, 0x22, 0x00, 0x33]).unwrap();

        assert_eq!(wire(writer).as_ref(), &[0x03, 0x11, 0x22, 0x02, 0x33, 0x00]);
    }

    #[test]
    fn consecutive_slip_frames_split_cleanly() {
        let cfg = FrameConfig::with_mode(FrameMode::Slip);
        let mut writer = FrameWriter::with_config(Cursor::new(Vec::<u8>::new()), cfg);
        for payload in [&b"one"[..], &[slip::END][..], &b"three"[..]] {
            writer.send(payload).unwrap();
        }

        let mut wire = wire(writer);
        let mut next = || {
            decode_frame(FrameMode::Slip, &mut wire, usize::MAX)
                .unwrap()
                .unwrap()
        };
        assert_eq!(next().as_ref(), b"one");
        assert_eq!(next().as_ref(), &[slip::END]);
        assert_eq!(next().as_ref(), b"three");
    }

    #[test]
    fn oversized_payload_writes_nothing() {
        let cfg = FrameConfig {
            max_payload_size: 4,
            ..FrameConfig::default()
        };
        let mut writer = FrameWriter::with_config(Cursor::new(Vec::<u8>::new()), cfg);

        let err = writer.send(b"oversized").unwrap_err();
        assert!(matches!(err, FrameError::PayloadTooLarge { size: 9, max: 4 }));
        assert!(wire(writer).is_empty());
    }

    #[test]
    fn zero_heavy_payload_stays_within_bound() {
        let payload = vec![0u8; 600];
        let mut writer = FrameWriter::new(Cursor::new(Vec::<u8>::new()));
        writer.send(&payload).unwrap();

        let wire = wire(writer);
        assert!(wire.len() <= cobs::max_encoded_len(payload.len()));
        assert_eq!(cobs::decode_to_vec(&wire), payload);
    }

    #[test]
    fn short_writes_resume_and_flush() {
        let mut writer = FrameWriter::new(Flaky::default());
        writer.send(b"resumed payload").unwrap();

        let sink = writer.into_inner();
        assert_eq!(sink.flushes, 1);
        assert_eq!(cobs::decode_to_vec(&sink.data), b"resumed payload");
    }

    #[test]
    fn retries_transient_errors() {
        for kind in [ErrorKind::Interrupted, ErrorKind::WouldBlock] {
            let mut writer = FrameWriter::new(Flaky::failing_with(kind));
            writer.send(b"retry").unwrap();

            let sink = writer.into_inner();
            assert_eq!(cobs::decode_to_vec(&sink.data), b"retry", "{kind:?}");
        }
    }

    #[test]
    fn other_errors_propagate() {
        let mut writer = FrameWriter::new(Flaky::failing_with(ErrorKind::BrokenPipe));
        let err = writer.send(b"x").unwrap_err();
        assert!(matches!(err, FrameError::Io(e) if e.kind() == ErrorKind::BrokenPipe));
    }

    #[test]
    fn zero_length_write_means_closed() {
        struct Closed;
        impl Write for Closed {
            fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
                Ok(0)
            }
            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let err = FrameWriter::new(Closed).send(b"x").unwrap_err();
        assert!(matches!(err, FrameError::ConnectionClosed));
    }

    #[test]
    fn reader_sees_what_writer_sent() {
        let cfg = FrameConfig::with_mode(FrameMode::Slip);
        let mut writer = FrameWriter::with_config(Cursor::new(Vec::<u8>::new()), cfg.clone());
        writer.send(b"\xDBz\xC0").unwrap();
        writer.set_max_payload_size(8);
        assert_eq!(writer.config().max_payload_size, 8);

        let mut reader = FrameReader::with_config(Cursor::new(wire(writer).to_vec()), cfg);
        assert_eq!(reader.read_frame().unwrap().as_ref(), b"\xDBz\xC0");
    }
}
