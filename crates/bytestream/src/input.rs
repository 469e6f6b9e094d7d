//! Command-line byte and value parsing.

use std::io::Read;
use std::path::Path;

use bytestream_record::Atom;

use crate::exit::{io_error, record_error, CliError, CliResult, USAGE};

/// Separates per-field value groups in `pack` arguments.
pub const FIELD_SEPARATOR: &str = "/";

/// Parse one byte token, decimal or `0x` hex.
///
/// Values outside `0..=255` are wrapped to a byte with a warning.
pub fn parse_byte(token: &str) -> CliResult<u8> {
    let value = parse_integer(token)
        .ok_or_else(|| CliError::new(USAGE, format!("invalid byte value: {token:?}")))?;
    if !(0..=255).contains(&value) {
        tracing::warn!(value, wrapped = value as u8, "byte value out of range");
    }
    Ok(value as u8)
}

pub fn parse_bytes(tokens: &[String]) -> CliResult<Vec<u8>> {
    tokens.iter().map(|token| parse_byte(token)).collect()
}

fn parse_integer(token: &str) -> Option<i64> {
    let token = token.trim();
    let (negative, digits) = match token.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, token),
    };
    if negative && digits.starts_with(['+', '-']) {
        return None;
    }
    let magnitude = match digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
    {
        Some(hex) if hex.starts_with(['+', '-']) => return None,
        Some(hex) => i64::from_str_radix(hex, 16).ok()?,
        None => digits.parse::<i64>().ok()?,
    };
    Some(if negative { -magnitude } else { magnitude })
}

/// Bytes from the command line, or from `--input` (`-` reads stdin).
pub fn read_bytes(tokens: &[String], input: Option<&Path>) -> CliResult<Vec<u8>> {
    let Some(path) = input else {
        return parse_bytes(tokens);
    };
    if !tokens.is_empty() {
        return Err(CliError::new(
            USAGE,
            "byte arguments cannot be combined with --input",
        ));
    }

    if path == Path::new("-") {
        let mut data = Vec::new();
        std::io::stdin()
            .read_to_end(&mut data)
            .map_err(|err| io_error("failed reading stdin", err))?;
        return Ok(data);
    }

    std::fs::read(path).map_err(|err| io_error(&format!("failed reading {}", path.display()), err))
}

/// Split `pack` values into one group of atoms per field.
///
/// `300 / 1 2 3` gives `[[300], [1, 2, 3]]`. An empty group is allowed.
pub fn parse_value_groups(tokens: &[String]) -> CliResult<Vec<Vec<Atom>>> {
    let mut groups = vec![Vec::new()];
    for token in tokens {
        if token == FIELD_SEPARATOR {
            groups.push(Vec::new());
            continue;
        }
        let atom = token
            .parse::<Atom>()
            .map_err(|err| record_error("invalid value", err))?;
        if let Some(group) = groups.last_mut() {
            group.push(atom);
        }
    }
    Ok(groups)
}
