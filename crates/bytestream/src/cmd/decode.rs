use bytes::Bytes;
use bytestream_frame::{FrameMode, PacketAssembler};

use crate::cmd::DecodeArgs;
use crate::exit::{frame_error, CliResult, SUCCESS};
use crate::input::read_bytes;
use crate::output::{print_packet, OutputFormat};

pub fn run(args: DecodeArgs, format: OutputFormat) -> CliResult<i32> {
    let wire = read_bytes(&args.input.bytes, args.input.input.as_deref())?;
    let packets = collect_packets(args.mode, args.max_payload, &wire)?;

    for (index, packet) in packets.iter().enumerate() {
        print_packet(index, args.mode.as_str(), packet, format);
    }
    Ok(SUCCESS)
}

/// Feed `wire` one byte at a time and return every completed packet.
///
/// Bytes after the last delimiter are dropped with a debug event.
pub fn collect_packets(mode: FrameMode, max_payload: usize, wire: &[u8]) -> CliResult<Vec<Bytes>> {
    let mut assembler = PacketAssembler::with_max_payload(mode, max_payload);
    let mut packets = Vec::new();
    assembler
        .push_slice(wire, &mut packets)
        .map_err(|err| frame_error("decode failed", err))?;

    if !assembler.pending().is_empty() {
        tracing::debug!(
            mode = %mode,
            pending = assembler.pending().len(),
            "input ended mid-packet"
        );
    }
    tracing::debug!(mode = %mode, packets = packets.len(), "decoded input");
    Ok(packets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exit::DATA_INVALID;

    #[test]
    fn collects_consecutive_packets() {
        let wire = [0x03, 0x11, 0x22, 0x02, 0x33, 0x00, 0x01, 0x01, 0x00, 0x02];
        let packets = collect_packets(FrameMode::Cobs, 64, &wire).unwrap();
        assert_eq!(packets.len(), 2);
        assert_eq!(packets[0].as_ref(), &[0x11, 0x22, 0x00, 0x33]);
        assert_eq!(packets[1].as_ref(), &[0x00]);
    }

    #[test]
    fn slip_packets() {
        let wire = [0xDB, 0xDC, 0xC0, 0x41, 0xC0];
        let packets = collect_packets(FrameMode::Slip, 64, &wire).unwrap();
        assert_eq!(packets, vec![Bytes::from_static(&[0xC0]), Bytes::from_static(b"A")]);
    }

    #[test]
    fn oversized_packet_is_data_error() {
        let wire = [0x05, 1, 2, 3, 4, 0x00];
        let err = collect_packets(FrameMode::Cobs, 2, &wire).unwrap_err();
        assert_eq!(err.code, DATA_INVALID);
    }
}
