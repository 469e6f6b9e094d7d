use bytes::{Bytes, BytesMut};
use bytestream_frame::encode_frame;
use bytestream_record::{Atom, Record};

use crate::cmd::PackArgs;
use crate::exit::{record_error, CliError, CliResult, SUCCESS, USAGE};
use crate::input::{parse_value_groups, FIELD_SEPARATOR};
use crate::output::{print_bytes, BytesReport, OutputFormat};

pub fn run(args: PackArgs, format: OutputFormat) -> CliResult<i32> {
    let layout = args.record.resolve_layout()?;
    let mut record = layout
        .build()
        .map_err(|err| record_error("invalid record", err))?;
    let groups = parse_value_groups(&args.values)?;
    fill_record(&mut record, &groups)?;

    let payload = record
        .to_bytes(layout.byte_order)
        .map_err(|err| record_error("pack failed", err))?;
    tracing::debug!(
        layout = %record,
        byte_order = %layout.byte_order,
        len = payload.len(),
        "packed record"
    );

    let (bytes, mode) = match args.record.frame {
        Some(mode) => {
            let mut wire = BytesMut::with_capacity(mode.max_encoded_len(payload.len()));
            encode_frame(mode, &payload, &mut wire);
            (wire.freeze(), Some(mode.as_str()))
        }
        None => (Bytes::clone(&payload), None),
    };

    print_bytes(
        &BytesReport {
            operation: "pack",
            mode,
            input_len: payload.len(),
            output_len: bytes.len(),
            bytes: &bytes,
        },
        format,
    );
    Ok(SUCCESS)
}

/// Load one value group into each field, in order.
fn fill_record(record: &mut Record, groups: &[Vec<Atom>]) -> CliResult<()> {
    if groups.len() != record.len() {
        return Err(CliError::new(
            USAGE,
            format!(
                "record `{record}` has {} fields but {} value groups were given (separate groups with `{FIELD_SEPARATOR}`)",
                record.len(),
                groups.len()
            ),
        ));
    }
    for (index, group) in groups.iter().enumerate() {
        record
            .load(index, group)
            .map_err(|err| record_error(&format!("field {index}"), err))?;
    }
    Ok(())
}
