use std::path::PathBuf;
use std::str::FromStr;

use bytestream_frame::{FrameMode, DEFAULT_MAX_PAYLOAD};
use bytestream_record::{ByteOrder, RecordLayout};
use clap::{Args, Subcommand};

use crate::exit::{record_error, CliResult};
use crate::output::OutputFormat;

pub mod decode;
pub mod encode;
pub mod pack;
pub mod unpack;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Frame one payload with COBS or SLIP.
    Encode(EncodeArgs),
    /// Feed framed bytes through the incremental decoder and print each packet.
    Decode(DecodeArgs),
    /// Build a record from values and encode it to bytes.
    Pack(PackArgs),
    /// Decode record bytes and print each field.
    Unpack(UnpackArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Encode(args) => encode::run(args, format),
        Command::Decode(args) => decode::run(args, format),
        Command::Pack(args) => pack::run(args, format),
        Command::Unpack(args) => unpack::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct ByteInput {
    /// Bytes as decimal or 0x-prefixed hex.
    #[arg(value_name = "BYTES", allow_negative_numbers = true)]
    pub bytes: Vec<String>,
    /// Read raw bytes from a file instead (`-` for stdin).
    #[arg(long, short = 'i', value_name = "FILE")]
    pub input: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// Framing mode.
    #[arg(long, short = 'm', default_value_t = FrameMode::Cobs, value_parser = FrameMode::from_str)]
    pub mode: FrameMode,
    #[command(flatten)]
    pub input: ByteInput,
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Framing mode.
    #[arg(long, short = 'm', default_value_t = FrameMode::Cobs, value_parser = FrameMode::from_str)]
    pub mode: FrameMode,
    /// Largest packet accepted, in decoded bytes.
    #[arg(long, value_name = "BYTES", default_value_t = DEFAULT_MAX_PAYLOAD)]
    pub max_payload: usize,
    #[command(flatten)]
    pub input: ByteInput,
}

/// Record shape shared by `pack` and `unpack`.
#[derive(Args, Debug)]
pub struct RecordArgs {
    /// Field type tokens, e.g. `u16 u8[] f32[4]`.
    #[arg(
        long,
        value_name = "TYPE",
        num_args = 1..,
        required_unless_present = "layout",
        conflicts_with = "layout"
    )]
    pub types: Vec<String>,
    /// JSON layout file with `fields` and optional `byte_order`.
    #[arg(long, value_name = "FILE")]
    pub layout: Option<PathBuf>,
    /// Byte order: big, little, network or native. Overrides the layout file.
    #[arg(long, value_name = "ORDER", value_parser = ByteOrder::from_str)]
    pub byte_order: Option<ByteOrder>,
    /// Wrap the record bytes in a COBS or SLIP frame.
    #[arg(long, value_name = "MODE", value_parser = FrameMode::from_str)]
    pub frame: Option<FrameMode>,
}

impl RecordArgs {
    /// Layout from `--layout` or `--types`, with `--byte-order` applied.
    pub fn resolve_layout(&self) -> CliResult<RecordLayout> {
        let mut layout = match &self.layout {
            Some(path) => RecordLayout::from_path(path)
                .map_err(|err| record_error("failed loading layout", err))?,
            None => RecordLayout::parse(&self.types, ByteOrder::default())
                .map_err(|err| record_error("invalid --types", err))?,
        };
        if let Some(order) = self.byte_order {
            layout.byte_order = order;
        }
        Ok(layout)
    }
}

#[derive(Args, Debug)]
pub struct PackArgs {
    #[command(flatten)]
    pub record: RecordArgs,
    /// Values per field, groups separated by `/` (e.g. `-- 300 / 1 2 3`).
    #[arg(value_name = "VALUES", last = true, allow_hyphen_values = true)]
    pub values: Vec<String>,
}

#[derive(Args, Debug)]
pub struct UnpackArgs {
    #[command(flatten)]
    pub record: RecordArgs,
    /// Read raw bytes from a file (`-` for stdin).
    #[arg(long, short = 'i', value_name = "FILE")]
    pub input: Option<PathBuf>,
    /// Bytes as decimal or 0x-prefixed hex (e.g. `-- 0x2C 1 3 0 0 0 1 2 3`).
    #[arg(value_name = "BYTES", last = true, allow_hyphen_values = true)]
    pub bytes: Vec<String>,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}
