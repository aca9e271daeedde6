//! Rendering of trace records as indented text or JSON.

use std::fmt::Write;

use ruleweave_foundation::Value;
use serde_json::json;

use super::record::{TraceEvent, TraceRecord};

// =============================================================================
// Trace Formatter Trait
// =============================================================================

/// Turns records into text.
pub trait TraceFormatter {
    /// Renders one record.
    fn format(&self, record: &TraceRecord) -> String;

    /// Renders records one per line.
    fn format_many(&self, records: &[&TraceRecord]) -> String {
        let mut out = String::new();
        for (i, record) in records.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            out.push_str(&self.format(record));
        }
        out
    }
}

// =============================================================================
// Human-Readable Formatter
// =============================================================================

/// Line-oriented text. Node events are indented by tree depth.
#[derive(Clone, Debug, Default)]
pub struct HumanFormatter {
    /// Prefix each line with the elapsed time.
    pub show_timestamps: bool,
    /// Prefix each line with the record id.
    pub show_ids: bool,
}

impl HumanFormatter {
    /// Cycle prefix only.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds elapsed time to each line.
    #[must_use]
    pub fn with_timestamps(self) -> Self {
        Self {
            show_timestamps: true,
            ..self
        }
    }

    /// Adds record ids to each line.
    #[must_use]
    pub fn with_ids(self) -> Self {
        Self {
            show_ids: true,
            ..self
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn elapsed(ns: u64) -> String {
        match ns {
            0..1_000_000 => format!("{}us", ns / 1_000),
            1_000_000..1_000_000_000 => format!("{:.3}ms", ns as f64 / 1e6),
            _ => format!("{:.3}s", ns as f64 / 1e9),
        }
    }

    fn format_bindings(bindings: &[(String, Value)]) -> String {
        let parts: Vec<_> = bindings.iter().map(|(k, v)| format!("?{k}={v:?}")).collect();
        format!("{{{}}}", parts.join(", "))
    }
}

impl TraceFormatter for HumanFormatter {
    fn format(&self, record: &TraceRecord) -> String {
        let mut prefix = String::new();
        if self.show_ids {
            let _ = write!(prefix, "#{} ", record.id);
        }
        let _ = write!(prefix, "C{:04} ", record.cycle);
        if self.show_timestamps {
            let _ = write!(prefix, "+{} ", Self::elapsed(record.timestamp_ns));
        }

        let indent = "  ".repeat(record.event.depth().unwrap_or(0));
        let event_str = match &record.event {
            TraceEvent::RuleEvaluated {
                rule,
                matched,
                bindings,
            } => {
                let status = if *matched { "SATISFIED" } else { "UNSATISFIED" };
                if bindings.is_empty() {
                    format!("RULE {rule} {status}")
                } else {
                    format!("RULE {rule} {status} {}", Self::format_bindings(bindings))
                }
            }
            TraceEvent::NodeEntered { kind, .. } => format!("{indent}> {kind}"),
            TraceEvent::NodeExited { kind, matched, .. } => {
                let status = if *matched { "ok" } else { "fail" };
                format!("{indent}< {kind} {status}")
            }
            TraceEvent::PatternTried {
                pattern,
                fact,
                failure,
            } => match failure {
                None => format!("  TRY ({pattern}) {fact} matched"),
                Some(reason) => format!("  TRY ({pattern}) {fact} rejected: {reason}"),
            },
            TraceEvent::FactSkipped {
                pattern,
                fact,
                shape,
            } => format!("  SKIP ({pattern}) {fact} is {shape}"),
            TraceEvent::BindingConflict {
                variable,
                bound,
                found,
            } => format!("  CONFLICT ?{variable} bound {bound:?}, found {found:?}"),
            TraceEvent::Custom { name, data } => format!("  CUSTOM {name} {data:?}"),
        };

        format!("{prefix}{event_str}")
    }
}

// =============================================================================
// JSON Formatter
// =============================================================================

/// One JSON object per record.
#[derive(Clone, Debug, Default)]
pub struct JsonFormatter {
    /// Multi-line output.
    pub pretty: bool,
}

impl JsonFormatter {
    /// Compact output.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Multi-line output.
    #[must_use]
    pub fn pretty(self) -> Self {
        Self { pretty: true }
    }

    /// Converts a value to JSON, tagged with its kind.
    #[must_use]
    pub fn value_to_json(value: &Value) -> serde_json::Value {
        let data = match value {
            Value::Integer(n) => json!(n),
            Value::Float(x) => json!(x),
            Value::Boolean(b) => json!(b),
            Value::Text(s) => json!(s.as_ref()),
            Value::ExternalRef(handle) => json!(handle.raw()),
        };
        json!({ "kind": value.kind().name(), "value": data })
    }

    fn bindings_to_json(bindings: &[(String, Value)]) -> serde_json::Value {
        let map: serde_json::Map<String, serde_json::Value> = bindings
            .iter()
            .map(|(k, v)| (k.clone(), Self::value_to_json(v)))
            .collect();
        serde_json::Value::Object(map)
    }

    /// Converts a record to a JSON value.
    #[must_use]
    pub fn record_to_json(record: &TraceRecord) -> serde_json::Value {
        let event = match &record.event {
            TraceEvent::RuleEvaluated {
                rule,
                matched,
                bindings,
            } => json!({
                "rule": rule,
                "matched": matched,
                "bindings": Self::bindings_to_json(bindings),
            }),
            TraceEvent::NodeEntered { kind, depth } => json!({ "kind": kind, "depth": depth }),
            TraceEvent::NodeExited {
                kind,
                depth,
                matched,
            } => json!({ "kind": kind, "depth": depth, "matched": matched }),
            TraceEvent::PatternTried {
                pattern,
                fact,
                failure,
            } => json!({
                "pattern": pattern,
                "fact": fact.index,
                "generation": fact.generation,
                "failure": failure,
            }),
            TraceEvent::FactSkipped {
                pattern,
                fact,
                shape,
            } => json!({
                "pattern": pattern,
                "fact": fact.index,
                "generation": fact.generation,
                "shape": shape.to_string(),
            }),
            TraceEvent::BindingConflict {
                variable,
                bound,
                found,
            } => json!({
                "variable": variable,
                "bound": Self::value_to_json(bound),
                "found": Self::value_to_json(found),
            }),
            TraceEvent::Custom { name, data } => json!({
                "name": name,
                "data": Self::value_to_json(data),
            }),
        };

        json!({
            "id": record.id,
            "cycle": record.cycle,
            "timestamp_ns": record.timestamp_ns,
            "type": record.event_type(),
            "event": event,
        })
    }
}

impl TraceFormatter for JsonFormatter {
    fn format(&self, record: &TraceRecord) -> String {
        let value = Self::record_to_json(record);
        let rendered = if self.pretty {
            serde_json::to_string_pretty(&value)
        } else {
            serde_json::to_string(&value)
        };
        // Serializing a `serde_json::Value` cannot fail.
        rendered.unwrap_or_default()
    }
}
