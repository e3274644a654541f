use std::str::FromStr;

use chrono::{Duration, Utc};
use log::warn;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::Value;
use uuid::Uuid;

use crate::error::ExampleError;
use crate::locale::Messages;

/// Primitive schema kinds the synthesizer can materialize an example for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveKind {
    String,
    Boolean,
    Integer,
    Number,
    Uuid,
    Date,
    DateTime,
    Email,
    ByteArray,
    File,
}

impl PrimitiveKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PrimitiveKind::String => "string",
            PrimitiveKind::Boolean => "boolean",
            PrimitiveKind::Integer => "integer",
            PrimitiveKind::Number => "number",
            PrimitiveKind::Uuid => "uuid",
            PrimitiveKind::Date => "date",
            PrimitiveKind::DateTime => "date-time",
            PrimitiveKind::Email => "email",
            PrimitiveKind::ByteArray => "byte-array",
            PrimitiveKind::File => "file",
        }
    }
}

/// Generates example values for primitive schema leaves.
///
/// Policy: a declared example that converts to the target kind is returned
/// verbatim; otherwise a synthetic value is drawn from the owned random
/// source. Seed the source for reproducible output.
pub struct ExampleSynthesizer {
    rng: StdRng,
}

impl ExampleSynthesizer {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn synthesize(
        &mut self,
        kind: PrimitiveKind,
        format: Option<&str>,
        declared: Option<&Value>,
        messages: &Messages,
    ) -> Result<Value, ExampleError> {
        match kind {
            PrimitiveKind::String => Ok(self.string_example(declared, messages)),
            PrimitiveKind::Boolean => Ok(self.boolean_example(declared)),
            PrimitiveKind::Integer => self.integer_example(format, declared),
            PrimitiveKind::Number => self.number_example(format, declared),
            PrimitiveKind::Uuid => Ok(self.uuid_example(declared)),
            PrimitiveKind::Date => Ok(self.date_example(declared)),
            PrimitiveKind::DateTime => Ok(self.date_time_example(declared)),
            PrimitiveKind::Email | PrimitiveKind::ByteArray | PrimitiveKind::File => {
                Err(ExampleError::NotSupported(kind.as_str()))
            }
        }
    }

    fn string_example(&mut self, declared: Option<&Value>, messages: &Messages) -> Value {
        match declared {
            Some(value) => Value::String(declared_text(value)),
            None => Value::String(messages.default_string_example.to_string()),
        }
    }

    fn boolean_example(&mut self, declared: Option<&Value>) -> Value {
        // A declared example always converts: anything but "true" is false.
        match declared {
            Some(value) => Value::Bool(declared_text(value) == "true"),
            None => Value::Bool(self.rng.gen_bool(0.5)),
        }
    }

    fn integer_example(
        &mut self,
        format: Option<&str>,
        declared: Option<&Value>,
    ) -> Result<Value, ExampleError> {
        match format {
            // int32 is the default when the format is absent
            None | Some("int32") => Ok(parse_declared::<i32>(declared, "int32")
                .map(Value::from)
                .unwrap_or_else(|| Value::from(self.rng.gen_range(i32::MIN..=i32::MAX)))),
            Some("int64") => Ok(parse_declared::<i64>(declared, "int64")
                .map(Value::from)
                .unwrap_or_else(|| Value::from(self.rng.gen_range(i64::MIN..=i64::MAX)))),
            Some(other) => Err(ExampleError::UnsupportedIntegerFormat(other.to_string())),
        }
    }

    fn number_example(
        &mut self,
        format: Option<&str>,
        declared: Option<&Value>,
    ) -> Result<Value, ExampleError> {
        match format {
            Some("float") => Ok(parse_declared::<f32>(declared, "float")
                .map(Value::from)
                .unwrap_or_else(|| Value::from(self.rng.gen_range(0.0f32..1.0)))),
            Some("double") => Ok(parse_declared::<f64>(declared, "double")
                .map(Value::from)
                .unwrap_or_else(|| Value::from(self.rng.gen_range(0.0f64..1.0)))),
            Some(other) => Err(ExampleError::UnsupportedNumberFormat(other.to_string())),
            None => Err(ExampleError::UnsupportedNumberFormat("<none>".to_string())),
        }
    }

    fn uuid_example(&mut self, declared: Option<&Value>) -> Value {
        if let Some(value) = declared {
            let text = declared_text(value);
            match Uuid::from_str(&text) {
                Ok(parsed) => return Value::String(parsed.to_string()),
                Err(_) => warn!("declared example {text:?} is not a valid uuid, generating one"),
            }
        }
        let mut bytes = [0u8; 16];
        self.rng.fill(&mut bytes);
        Value::String(uuid::Builder::from_random_bytes(bytes).into_uuid().to_string())
    }

    fn date_example(&mut self, declared: Option<&Value>) -> Value {
        match declared {
            Some(value) => Value::String(declared_text(value)),
            None => {
                let day = Utc::now() - Duration::days(self.rng.gen_range(0..365));
                Value::String(day.format("%Y-%m-%d").to_string())
            }
        }
    }

    fn date_time_example(&mut self, declared: Option<&Value>) -> Value {
        match declared {
            Some(value) => Value::String(declared_text(value)),
            None => {
                let instant = Utc::now() - Duration::days(self.rng.gen_range(0..365));
                Value::String(instant.to_rfc3339())
            }
        }
    }
}

impl Default for ExampleSynthesizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Textual form of a declared example: strings pass through unquoted,
/// everything else via its JSON rendering.
fn declared_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Typed parse of a declared example; a parse failure is recovered locally
/// by falling back to synthesis.
fn parse_declared<T: FromStr>(declared: Option<&Value>, kind: &str) -> Option<T> {
    let text = declared_text(declared?);
    match text.parse::<T>() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            warn!("declared example {text:?} is not a valid {kind}, generating a value");
            None
        }
    }
}
