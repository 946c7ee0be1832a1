use serde_json::{Map, Number, Value};

use super::Ops;
use crate::error::CodecError;

/// [`Ops`] over `serde_json::Value`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JsonOps;

fn mismatch(expected: &str, input: &Value) -> CodecError {
    CodecError::mismatch(format!("Not {expected}: {input}"))
}

impl Ops<Value> for JsonOps {
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
        Value::from(value)
    }

    fn get_i64(&self, input: &Value) -> Result<i64, CodecError> {
        match input {
            Value::Number(n) => n.as_i64().ok_or_else(|| mismatch("an integer", input)),
            _ => Err(mismatch("a number", input)),
        }
    }

    // Non-finite values have no JSON form and degrade to null.
    fn create_f64(&self, value: f64) -> Value {
        Number::from_f64(value).map_or(Value::Null, Value::Number)
    }

    fn get_f64(&self, input: &Value) -> Result<f64, CodecError> {
        input.as_f64().ok_or_else(|| mismatch("a number", input))
    }

    fn create_string(&self, value: &str) -> Value {
        Value::String(value.to_string())
    }

    fn get_string(&self, input: &Value) -> Result<String, CodecError> {
        input
            .as_str()
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
        Value::Object(entries.into_iter().collect::<Map<String, Value>>())
    }

    fn is_map(&self, input: &Value) -> bool {
        input.is_object()
    }

    fn get_entries(&self, input: &Value) -> Result<Vec<(String, Value)>, CodecError> {
        let map = input.as_object().ok_or_else(|| mismatch("a map", input))?;
        Ok(map.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
    }

    fn get_field(&self, input: &Value, key: &str) -> Result<Option<Value>, CodecError> {
        let map = input.as_object().ok_or_else(|| mismatch("a map", input))?;
        Ok(map.get(key).cloned())
    }
}
