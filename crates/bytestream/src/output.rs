use std::io::{IsTerminal, Write};

use bytestream_record::{Atom, Record};
use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

/// Result of a byte-producing command (`encode`, `pack`).
#[derive(Serialize)]
pub struct BytesReport<'a> {
    pub operation: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<&'a str>,
    pub input_len: usize,
    pub output_len: usize,
    pub bytes: &'a [u8],
}

pub fn print_bytes(report: &BytesReport<'_>, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(report),
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["OPERATION", "MODE", "INPUT", "OUTPUT", "BYTES"])
                .add_row(vec![
                    report.operation.to_string(),
                    report.mode.unwrap_or("-").to_string(),
                    report.input_len.to_string(),
                    report.output_len.to_string(),
                    hex(report.bytes),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!(
                "{}{} {} -> {} bytes: {}",
                report.operation,
                report.mode.map(|m| format!(" ({m})")).unwrap_or_default(),
                report.input_len,
                report.output_len,
                hex(report.bytes)
            );
        }
        OutputFormat::Raw => print_raw(report.bytes),
    }
}

#[derive(Serialize)]
struct PacketOutput<'a> {
    packet: usize,
    mode: &'a str,
    len: usize,
    bytes: &'a [u8],
}

/// One decoded packet. Raw output writes the payload bytes only.
pub fn print_packet(index: usize, mode: &str, payload: &[u8], format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(&PacketOutput {
            packet: index,
            mode,
            len: payload.len(),
            bytes: payload,
        }),
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["PACKET", "MODE", "SIZE", "BYTES"])
                .add_row(vec![
                    index.to_string(),
                    mode.to_string(),
                    payload.len().to_string(),
                    hex(payload),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!(
                "packet={index} mode={mode} size={} bytes={}",
                payload.len(),
                hex(payload)
            );
        }
        OutputFormat::Raw => print_raw(payload),
    }
}

#[derive(Serialize)]
struct FieldOutput {
    index: usize,
    #[serde(rename = "type")]
    type_token: String,
    values: Vec<Atom>,
}

#[derive(Serialize)]
struct RecordOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    packet: Option<usize>,
    byte_order: String,
    consumed: usize,
    fields: Vec<FieldOutput>,
}

/// A decoded record, optionally tagged with the packet it came from.
pub fn print_record(
    packet: Option<usize>,
    record: &Record,
    byte_order: &str,
    consumed: usize,
    format: OutputFormat,
) {
    let fields: Vec<FieldOutput> = record
        .fields()
        .iter()
        .enumerate()
        .map(|(index, field)| FieldOutput {
            index,
            type_token: field.descriptor().to_string(),
            values: field.to_atoms(),
        })
        .collect();

    match format {
        OutputFormat::Json => print_json(&RecordOutput {
            packet,
            byte_order: byte_order.to_string(),
            consumed,
            fields,
        }),
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["FIELD", "TYPE", "VALUES"]);
            for field in &fields {
                table.add_row(vec![
                    field.index.to_string(),
                    field.type_token.clone(),
                    join(&field.values),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            if let Some(packet) = packet {
                println!("packet={packet} consumed={consumed} byte_order={byte_order}");
            }
            for field in &fields {
                println!("{} {}: {}", field.index, field.type_token, join(&field.values));
            }
        }
        OutputFormat::Raw => {
            for field in &fields {
                println!("{}", join(&field.values));
            }
        }
    }
}

pub fn print_raw(data: &[u8]) {
    let mut out = std::io::stdout();
    let _ = out.write_all(data);
    let _ = out.flush();
}

fn print_json<T: Serialize>(value: &T) {
    println!(
        "{}",
        serde_json::to_string(value).unwrap_or_else(|_| "{}".to_string())
    );
}

/// Space-separated uppercase hex pairs.
pub fn hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02X}"))
        .collect::<Vec<_>>()
        .join(" ")
}

fn join(values: &[Atom]) -> String {
    values
        .iter()
        .map(Atom::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}
