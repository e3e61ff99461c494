//! Output seam: field projection and the export writer trait.
//!
//! The output stage's only obligations toward the core are marking each
//! exported lead and setting its post-export cooldown; serialization is
//! the writer's business.

use std::io::Write;

use serde_json::{Map, Value};

use prospect_core::types::Lead;

use crate::fields::{lead_field, FieldValue};

/// Default projection when the caller supplies no field list.
pub const DEFAULT_FIELDS: &[&str] = &[
    "name", "city", "region", "phone", "email", "website", "score", "source_tags",
];

/// Project a lead onto a field list. Angles and score reasons are always
/// included; the dot-path fields come from the same accessor registry the
/// filter rules use.
pub fn project(lead: &Lead, field_paths: &[&str]) -> Value {
    let mut map = Map::new();
    for path in field_paths {
        let value = match lead_field(lead, path) {
            FieldValue::Str(s) => Value::String(s),
            FieldValue::Num(n) => serde_json::Number::from_f64(n)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            FieldValue::Bool(b) => Value::Bool(b),
            FieldValue::Null => Value::Null,
        };
        map.insert((*path).to_string(), value);
    }
    map.insert(
        "angles".to_string(),
        Value::Array(
            lead.active_angles
                .iter()
                .map(|a| Value::String(a.as_str().to_string()))
                .collect(),
        ),
    );
    map.insert(
        "score_reasons".to_string(),
        Value::Array(
            lead.score_reasons
                .iter()
                .map(|r| Value::String(r.clone()))
                .collect(),
        ),
    );
    Value::Object(map)
}

/// Pluggable export writer: receives one projected record per eligible
/// lead, in selection order.
pub trait OutputWriter: Send {
    fn write_record(&mut self, record: &Value) -> std::io::Result<()>;

    /// Called once after the last record of a run.
    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// JSON-lines writer over any `Write` sink.
pub struct JsonLinesWriter<W: Write + Send> {
    sink: W,
}

impl<W: Write + Send> JsonLinesWriter<W> {
    pub fn new(sink: W) -> Self {
        Self { sink }
    }

    pub fn into_inner(self) -> W {
        self.sink
    }
}

impl<W: Write + Send> OutputWriter for JsonLinesWriter<W> {
    fn write_record(&mut self, record: &Value) -> std::io::Result<()> {
        serde_json::to_writer(&mut self.sink, record)?;
        self.sink.write_all(b"\n")
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.sink.flush()
    }
}
