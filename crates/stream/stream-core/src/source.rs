//! CSV record source.
//!
//! Input files carry three header rows before the data begins: field
//! names, field types (`datetime`, `float`, `int`, `string`), and field
//! flags (`T` marks the timestamp column). The source parses those rows
//! into a [`Schema`] and then yields typed records one at a time.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use chrono::NaiveDateTime;
use stream_spi::{
    FieldKind, FieldSpec, FieldValue, Record, RecordSource, Result, Schema, StreamError,
    DATE_FORMAT,
};

/// Number of header rows preceding the data.
const HEADER_ROWS: u64 = 3;

/// Forward-only CSV record source.
///
/// Any row whose field count or field types do not match the schema is
/// a fatal error; skipping a row would desynchronize the model.
#[derive(Debug)]
pub struct CsvRecordSource<R: Read> {
    reader: csv::Reader<R>,
    schema: Schema,
    /// 1-based line number of the most recently read row.
    line: u64,
}

impl CsvRecordSource<BufReader<File>> {
    /// Open a CSV file and build its schema from the header rows.
    pub fn open(path: &Path, target: &str) -> Result<Self> {
        let file = File::open(path)
            .map_err(|e| StreamError::Io(format!("{}: {}", path.display(), e)))?;
        Self::from_reader(BufReader::new(file), target)
    }
}

impl<R: Read> CsvRecordSource<R> {
    /// Build a source from any reader; `target` names the predicted field.
    pub fn from_reader(reader: R, target: &str) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        let names = read_header_row(&mut reader, "field names")?;
        let types = read_header_row(&mut reader, "field types")?;
        let flags = read_header_row(&mut reader, "field flags")?;

        if names.len() != types.len() {
            return Err(StreamError::InvalidSchema(format!(
                "{} field names but {} field types",
                names.len(),
                types.len()
            )));
        }

        let mut fields = Vec::with_capacity(names.len());
        for (name, type_name) in names.iter().zip(types.iter()) {
            let kind = FieldKind::parse(type_name).ok_or_else(|| {
                StreamError::InvalidSchema(format!(
                    "unknown type '{}' for field '{}'",
                    type_name, name
                ))
            })?;
            fields.push(FieldSpec::new(name.trim(), kind));
        }

        let timestamp_index = flags
            .iter()
            .position(|f| f.trim().eq_ignore_ascii_case("t"))
            .or_else(|| fields.iter().position(|f| f.kind == FieldKind::DateTime))
            .ok_or_else(|| {
                StreamError::InvalidSchema("no timestamp column declared".to_string())
            })?;

        let schema = Schema::new(fields, timestamp_index, target)?;

        Ok(Self {
            reader,
            schema,
            line: HEADER_ROWS,
        })
    }

    fn parse_field(&self, spec: &FieldSpec, raw: &str) -> Result<FieldValue> {
        let malformed = |reason: String| StreamError::MalformedRecord {
            line: self.line,
            reason,
        };
        match spec.kind {
            FieldKind::DateTime => NaiveDateTime::parse_from_str(raw.trim(), DATE_FORMAT)
                .map(FieldValue::DateTime)
                .map_err(|e| malformed(format!("field '{}': {}", spec.name, e))),
            FieldKind::Float => raw
                .trim()
                .parse::<f64>()
                .map(FieldValue::Float)
                .map_err(|e| malformed(format!("field '{}': {}", spec.name, e))),
            FieldKind::Int => raw
                .trim()
                .parse::<i64>()
                .map(FieldValue::Int)
                .map_err(|e| malformed(format!("field '{}': {}", spec.name, e))),
            FieldKind::Text => Ok(FieldValue::Text(raw.to_string())),
        }
    }
}

fn read_header_row<R: Read>(reader: &mut csv::Reader<R>, what: &str) -> Result<Vec<String>> {
    let mut row = csv::StringRecord::new();
    let got = reader
        .read_record(&mut row)
        .map_err(|e| StreamError::InvalidSchema(format!("reading {}: {}", what, e)))?;
    if !got {
        return Err(StreamError::InvalidSchema(format!(
            "missing header row ({})",
            what
        )));
    }
    Ok(row.iter().map(String::from).collect())
}

impl<R: Read + Send> RecordSource for CsvRecordSource<R> {
    fn schema(&self) -> &Schema {
        &self.schema
    }

    fn next_record(&mut self) -> Result<Option<Record>> {
        let mut row = csv::StringRecord::new();
        let got = self.reader.read_record(&mut row).map_err(|e| {
            StreamError::MalformedRecord {
                line: self.line + 1,
                reason: e.to_string(),
            }
        })?;
        if !got {
            return Ok(None);
        }
        self.line += 1;

        if row.len() != self.schema.len() {
            return Err(StreamError::MalformedRecord {
                line: self.line,
                reason: format!("expected {} fields, got {}", self.schema.len(), row.len()),
            });
        }

        let mut values = Vec::with_capacity(row.len());
        for (spec, raw) in self.schema.fields().iter().zip(row.iter()) {
            values.push(self.parse_field(spec, raw)?);
        }

        let timestamp = match &values[self.schema.timestamp_index()] {
            FieldValue::DateTime(ts) => *ts,
            _ => {
                return Err(StreamError::InvalidSchema(
                    "timestamp column is not a datetime".to_string(),
                ))
            }
        };
        let target = values[self.schema.target_index()].as_f64().ok_or_else(|| {
            StreamError::InvalidSchema("target column is not numeric".to_string())
        })?;

        Ok(Some(Record::new(timestamp, values, target)))
    }
}
