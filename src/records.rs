//! JSON record reading and writing for the command-line front end.
//!
//! Input is either a JSON array of objects or JSON Lines (one object per
//! line), detected from the first non-whitespace character. Each object is
//! kept whole as the record's attached data; its address field is copied out
//! into [`RawRecord::address`] and overwritten in place on output, so key
//! order survives the round trip.

use std::io::{Read, Write};
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde_json::Value;

use crate::models::{NormalizedRecord, RawRecord};

pub type Fields = serde_json::Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Pretty-printed JSON array.
    Json,
    /// One compact JSON object per line.
    JsonLines,
}

/// Read records from `path`, or from stdin when `path` is `-`.
pub fn read_records(path: &Path, address_field: &str) -> Result<Vec<RawRecord<Fields>>> {
    let content = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read records from stdin")?;
        buf
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read records from {}", path.display()))?
    };

    parse_records(&content, address_field)
}

pub fn parse_records(content: &str, address_field: &str) -> Result<Vec<RawRecord<Fields>>> {
    if content.trim_start().starts_with('[') {
        let values: Vec<Value> =
            serde_json::from_str(content).context("Input is not a valid JSON array")?;
        return values
            .into_iter()
            .enumerate()
            .map(|(idx, value)| into_record(value, address_field, &format!("element {idx}")))
            .collect();
    }

    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| {
            let position = format!("line {}", idx + 1);
            let value: Value = serde_json::from_str(line)
                .with_context(|| format!("{position}: invalid JSON"))?;
            into_record(value, address_field, &position)
        })
        .collect()
}

fn into_record(value: Value, address_field: &str, position: &str) -> Result<RawRecord<Fields>> {
    let fields = match value {
        Value::Object(fields) => fields,
        other => bail!("{position}: expected a JSON object, found {}", json_kind(&other)),
    };

    let address = match fields.get(address_field) {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(other) => Some(other.to_string()),
    };

    Ok(RawRecord {
        address,
        data: fields,
    })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Serialize normalized records, setting `address_field` on each object.
pub fn write_records<W: Write>(
    mut writer: W,
    records: &[NormalizedRecord<Fields>],
    address_field: &str,
    format: OutputFormat,
) -> Result<()> {
    let objects = records.iter().map(|record| {
        let mut fields = record.data.clone();
        fields.insert(address_field.to_string(), Value::String(record.address.clone()));
        Value::Object(fields)
    });

    match format {
        OutputFormat::Json => {
            let array: Vec<Value> = objects.collect();
            serde_json::to_writer_pretty(&mut writer, &array)?;
            writeln!(writer)?;
        }
        OutputFormat::JsonLines => {
            for object in objects {
                serde_json::to_writer(&mut writer, &object)?;
                writeln!(writer)?;
            }
        }
    }

    writer.flush()?;
    Ok(())
}
