//! Raw `dog` Output Parsing
//!
//! Both queries print positional, whitespace-separated fields with no header
//! and no field names. Every line is checked for field count and numeric
//! format before a record is built; a malformed line is reported with its
//! 1-based line number instead of being zero-filled.
//!
//! Whitespace-only lines are skipped but still count towards line numbers.
//! All errors of a query are collected into one [`ParseError`].

use super::types::{NodeRole, NodeStat, VolumeInfo};
use crate::error::{LineError, ParseError};
use std::collections::HashSet;

/// `<ignored> <ignored> <size> <used> <avail> <use%> <path>`
const MD_INFO_FIELDS: usize = 7;

/// `active total write read remove flush all_write all_read`
const NODE_STAT_FIELDS: [&str; 8] = [
    "active",
    "total",
    "write",
    "read",
    "remove",
    "flush",
    "all_write",
    "all_read",
];

/// Decodes raw output lines, reporting every line that is not UTF-8.
///
/// Bytes are never replaced, so a path is either exact or rejected.
pub fn decode_lines(raw: &[Vec<u8>]) -> Result<Vec<String>, ParseError> {
    let mut lines = Vec::with_capacity(raw.len());
    let mut errors = Vec::new();

    for (idx, bytes) in raw.iter().enumerate() {
        match std::str::from_utf8(bytes) {
            Ok(text) => lines.push(text.to_string()),
            Err(_) => errors.push(LineError::InvalidEncoding { line: idx + 1 }),
        }
    }

    if errors.is_empty() {
        Ok(lines)
    } else {
        Err(ParseError::Lines(errors))
    }
}

/// Non-blank lines paired with their 1-based line numbers
fn numbered_lines(lines: &[String]) -> impl Iterator<Item = (usize, &str)> {
    lines
        .iter()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line.as_str()))
        .filter(|(_, line)| !line.trim().is_empty())
}

fn parse_u64(line: usize, field: &'static str, token: &str) -> Result<u64, LineError> {
    // u64::from_str accepts a leading '+'; raw dog output never has one
    if !token.bytes().all(|b| b.is_ascii_digit()) {
        return Err(LineError::InvalidNumber {
            line,
            field,
            value: token.to_string(),
        });
    }
    token.parse().map_err(|_| LineError::InvalidNumber {
        line,
        field,
        value: token.to_string(),
    })
}

fn parse_percent(line: usize, token: &str) -> Result<u64, LineError> {
    let invalid = || LineError::InvalidPercent {
        line,
        value: token.to_string(),
    };
    let digits = token.strip_suffix('%').ok_or_else(invalid)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    match digits.parse::<u64>() {
        Ok(value) if value <= 100 => Ok(value),
        _ => Err(invalid()),
    }
}

fn parse_md_info_line(line: usize, text: &str) -> Result<VolumeInfo, LineError> {
    let fields: Vec<&str> = text.split_whitespace().collect();
    if fields.len() < MD_INFO_FIELDS {
        return Err(LineError::FieldCount {
            line,
            expected: MD_INFO_FIELDS,
            found: fields.len(),
        });
    }

    Ok(VolumeInfo {
        size_bytes: parse_u64(line, "size", fields[2])?,
        used_bytes: parse_u64(line, "used", fields[3])?,
        avail_bytes: parse_u64(line, "avail", fields[4])?,
        use_percent: parse_percent(line, fields[5])?,
        // A path containing spaces spills over into the trailing fields
        path: fields[MD_INFO_FIELDS - 1..].join(" "),
    })
}

/// Parses `dog node md info -r` output into one record per path.
///
/// Empty output yields no records. Any malformed line fails the whole query.
pub fn parse_md_info(lines: &[String]) -> Result<Vec<VolumeInfo>, ParseError> {
    let mut volumes = Vec::new();
    let mut errors = Vec::new();
    let mut seen = HashSet::new();

    for (line, text) in numbered_lines(lines) {
        match parse_md_info_line(line, text) {
            Ok(volume) => {
                if seen.insert(volume.path.clone()) {
                    volumes.push(volume);
                } else {
                    errors.push(LineError::DuplicatePath {
                        line,
                        path: volume.path,
                    });
                }
            }
            Err(e) => errors.push(e),
        }
    }

    if errors.is_empty() {
        Ok(volumes)
    } else {
        Err(ParseError::Lines(errors))
    }
}

fn parse_node_stat_line(line: usize, role: NodeRole, text: &str) -> Result<NodeStat, LineError> {
    let fields: Vec<&str> = text.split_whitespace().collect();
    if fields.len() != NODE_STAT_FIELDS.len() {
        return Err(LineError::FieldCount {
            line,
            expected: NODE_STAT_FIELDS.len(),
            found: fields.len(),
        });
    }

    let mut values = [0u64; 8];
    for (slot, (name, token)) in values
        .iter_mut()
        .zip(NODE_STAT_FIELDS.iter().zip(fields.iter()))
    {
        *slot = parse_u64(line, *name, token)?;
    }
    let [active, total, write_count, read_count, remove_count, flush_count, all_write_count, all_read_count] =
        values;

    Ok(NodeStat {
        role,
        active,
        total,
        write_count,
        read_count,
        remove_count,
        flush_count,
        all_write_count,
        all_read_count,
    })
}

/// Parses `dog node stat -r` output into the client and peer records.
///
/// Exactly two non-blank lines of exactly eight unsigned integers are required.
/// Blank lines are not counted, so `client`, blank, `peer` is accepted.
pub fn parse_node_stat(lines: &[String]) -> Result<[NodeStat; 2], ParseError> {
    let rows: Vec<(usize, &str)> = numbered_lines(lines).collect();
    if rows.len() != NodeRole::ORDERED.len() {
        return Err(ParseError::LineCount {
            expected: NodeRole::ORDERED.len(),
            found: rows.len(),
        });
    }

    let client = parse_node_stat_line(rows[0].0, NodeRole::Client, rows[0].1);
    let peer = parse_node_stat_line(rows[1].0, NodeRole::Peer, rows[1].1);
    match (client, peer) {
        (Ok(client), Ok(peer)) => Ok([client, peer]),
        (client, peer) => Err(ParseError::Lines(
            client.err().into_iter().chain(peer.err()).collect(),
        )),
    }
}
