use std::fmt;
use std::io;

use bytestream_frame::FrameError;
use bytestream_record::RecordError;

// Exit codes follow sysexits-style semantics.
pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const PERMISSION_DENIED: i32 = 50;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        io::ErrorKind::NotFound => FAILURE,
        _ => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn frame_error(context: &str, err: FrameError) -> CliError {
    match err {
        FrameError::Io(source) => io_error(context, source),
        FrameError::UnknownMode(_) => CliError::new(USAGE, format!("{context}: {err}")),
        FrameError::PayloadTooLarge { .. } | FrameError::ConnectionClosed => {
            CliError::new(DATA_INVALID, format!("{context}: {err}"))
        }
    }
}

pub fn record_error(context: &str, err: RecordError) -> CliError {
    let code = match err {
        RecordError::Parse { .. }
        | RecordError::FieldIndex { .. }
        | RecordError::EmptyRecord
        | RecordError::UnknownByteOrder(_)
        | RecordError::Layout(_) => USAGE,
        RecordError::Conversion(_)
        | RecordError::Truncated { .. }
        | RecordError::LengthOverflow { .. } => DATA_INVALID,
    };
    CliError::new(code, format!("{context}: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_errors_map_to_codes() {
        let usage = record_error("x", RecordError::EmptyRecord);
        assert_eq!(usage.code, USAGE);

        let data = record_error(
            "unpack failed",
            RecordError::Truncated {
                field: 1,
                needed: 4,
                available: 2,
            },
        );
        assert_eq!(data.code, DATA_INVALID);
        assert!(data.message.starts_with("unpack failed: "));
    }

    #[test]
    fn frame_io_errors_use_io_mapping() {
        let err = frame_error(
            "read failed",
            FrameError::Io(io::Error::from(io::ErrorKind::PermissionDenied)),
        );
        assert_eq!(err.code, PERMISSION_DENIED);
    }
}
