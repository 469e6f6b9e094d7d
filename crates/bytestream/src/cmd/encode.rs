use bytes::BytesMut;
use bytestream_frame::encode_frame;

use crate::cmd::EncodeArgs;
use crate::exit::{CliResult, SUCCESS};
use crate::input::read_bytes;
use crate::output::{print_bytes, BytesReport, OutputFormat};

pub fn run(args: EncodeArgs, format: OutputFormat) -> CliResult<i32> {
    let payload = read_bytes(&args.input.bytes, args.input.input.as_deref())?;

    let mut wire = BytesMut::with_capacity(args.mode.max_encoded_len(payload.len()));
    encode_frame(args.mode, &payload, &mut wire);
    tracing::debug!(mode = %args.mode, input = payload.len(), output = wire.len(), "encoded frame");

    print_bytes(
        &BytesReport {
            operation: "encode",
            mode: Some(args.mode.as_str()),
            input_len: payload.len(),
            output_len: wire.len(),
            bytes: &wire,
        },
        format,
    );
    Ok(SUCCESS)
}
