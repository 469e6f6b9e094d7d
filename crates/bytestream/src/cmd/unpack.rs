use bytestream_frame::DEFAULT_MAX_PAYLOAD;

use crate::cmd::decode::collect_packets;
use crate::cmd::UnpackArgs;
use crate::exit::{record_error, CliError, CliResult, DATA_INVALID, SUCCESS};
use crate::input::read_bytes;
use crate::output::{print_record, OutputFormat};

pub fn run(args: UnpackArgs, format: OutputFormat) -> CliResult<i32> {
    let layout = args.record.resolve_layout()?;
    let mut record = layout
        .build()
        .map_err(|err| record_error("invalid record", err))?;
    let data = read_bytes(&args.bytes, args.input.as_deref())?;
    let order = layout.byte_order;

    let Some(mode) = args.record.frame else {
        let consumed = record
            .decode(&data, order)
            .map_err(|err| record_error("unpack failed", err))?;
        print_record(None, &record, order.as_str(), consumed, format);
        return Ok(SUCCESS);
    };

    let packets = collect_packets(mode, DEFAULT_MAX_PAYLOAD, &data)?;
    if packets.is_empty() {
        return Err(CliError::new(
            DATA_INVALID,
            format!("no complete {mode} frame in input"),
        ));
    }

    for (index, packet) in packets.iter().enumerate() {
        let consumed = record
            .decode(packet, order)
            .map_err(|err| record_error(&format!("unpack failed (packet {index})"), err))?;
        print_record(Some(index), &record, order.as_str(), consumed, format);
    }
    Ok(SUCCESS)
}
