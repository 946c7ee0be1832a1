use ciborium::value::{Integer, Value};

use super::Ops;
use crate::error::CodecError;

/// [`Ops`] over `ciborium::value::Value`.
///
/// Map keys must be text; maps with other key types are not maps to this
/// backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CborOps;

fn mismatch(expected: &str, input: &Value) -> CodecError {
    CodecError::mismatch(format!("Not {expected}: {input:?}"))
}

/// The entries of `input` if it is a map keyed by text only.
fn text_map(input: &Value) -> Option<&[(Value, Value)]> {
    input
        .as_map()
        .filter(|map| map.iter().all(|(k, _)| k.is_text()))
        .map(Vec::as_slice)
}

impl Ops<Value> for CborOps {
    fn null(&self) -> Value {
        Value::Null
    }

    fn is_null(&self, input: &Value) -> bool {
        input.is_null()
    }

    fn create_bool(&self, value: bool) -> Value {
        Value::Bool(value)
    }

    fn get_bool(&self, input: &Value) -> Result<bool, CodecError> {
        input.as_bool().ok_or_else(|| mismatch("a boolean", input))
    }

    fn create_i64(&self, value: i64) -> Value {
        Value::Integer(Integer::from(value))
    }

    fn get_i64(&self, input: &Value) -> Result<i64, CodecError> {
        match input {
            Value::Integer(i) => i64::try_from(*i).map_err(|_| mismatch("an i64", input)),
            Value::Float(_) => Err(mismatch("an integer", input)),
            _ => Err(mismatch("a number", input)),
        }
    }

    fn create_f64(&self, value: f64) -> Value {
        Value::Float(value)
    }

    fn get_f64(&self, input: &Value) -> Result<f64, CodecError> {
        match input {
            Value::Float(f) => Ok(*f),
            Value::Integer(i) => Ok(i128::from(*i) as f64),
            _ => Err(mismatch("a number", input)),
        }
    }

    fn create_string(&self, value: &str) -> Value {
        Value::Text(value.to_string())
    }

    fn get_string(&self, input: &Value) -> Result<String, CodecError> {
        input
            .as_text()
            .map(str::to_string)
            .ok_or_else(|| mismatch("a string", input))
    }

    fn create_list(&self, items: Vec<Value>) -> Value {
        Value::Array(items)
    }

    fn is_list(&self, input: &Value) -> bool {
        input.is_array()
    }

    fn get_list(&self, input: &Value) -> Result<Vec<Value>, CodecError> {
        input
            .as_array()
            .cloned()
            .ok_or_else(|| mismatch("a list", input))
    }

    fn create_map(&self, entries: Vec<(String, Value)>) -> Value {
        Value::Map(
            entries
                .into_iter()
                .map(|(k, v)| (Value::Text(k), v))
                .collect(),
        )
    }

    fn is_map(&self, input: &Value) -> bool {
        text_map(input).is_some()
    }

    fn get_entries(&self, input: &Value) -> Result<Vec<(String, Value)>, CodecError> {
        let map = text_map(input).ok_or_else(|| mismatch("a map", input))?;
        Ok(map
            .iter()
            .filter_map(|(k, v)| Some((k.as_text()?.to_string(), v.clone())))
            .collect())
    }

    fn get_field(&self, input: &Value, key: &str) -> Result<Option<Value>, CodecError> {
        let map = text_map(input).ok_or_else(|| mismatch("a map", input))?;
        Ok(map
            .iter()
            .find(|(k, _)| k.as_text() == Some(key))
            .map(|(_, v)| v.clone()))
    }
}
