//! The base codec interface and primitive codecs.

use std::sync::Arc;

use crate::error::CodecError;
use crate::ops::Ops;

/// Bidirectional mapping between `T` and a document value `V`.
///
/// Codecs are immutable once built and shared freely across threads; all
/// per-call state travels in the `ops` argument.
pub trait Codec<T, V>: Send + Sync {
    fn encode(&self, value: &T, ops: &dyn Ops<V>) -> Result<V, CodecError>;
    fn decode(&self, ops: &dyn Ops<V>, input: &V) -> Result<T, CodecError>;
}

impl<T, V, C> Codec<T, V> for Arc<C>
where
    C: Codec<T, V> + ?Sized,
{
    fn encode(&self, value: &T, ops: &dyn Ops<V>) -> Result<V, CodecError> {
        (**self).encode(value, ops)
    }

    fn decode(&self, ops: &dyn Ops<V>, input: &V) -> Result<T, CodecError> {
        (**self).decode(ops, input)
    }
}

/// `bool`
#[derive(Debug, Clone, Copy, Default)]
pub struct BoolCodec;

/// `i32`, range checked on decode.
#[derive(Debug, Clone, Copy, Default)]
pub struct I32Codec;

/// `i64`
#[derive(Debug, Clone, Copy, Default)]
pub struct I64Codec;

/// `f64`, finite values only on encode.
#[derive(Debug, Clone, Copy, Default)]
pub struct F64Codec;

/// `String`
#[derive(Debug, Clone, Copy, Default)]
pub struct StringCodec;

impl<V> Codec<bool, V> for BoolCodec {
    fn encode(&self, value: &bool, ops: &dyn Ops<V>) -> Result<V, CodecError> {
        Ok(ops.create_bool(*value))
    }

    fn decode(&self, ops: &dyn Ops<V>, input: &V) -> Result<bool, CodecError> {
        ops.get_bool(input)
    }
}

impl<V> Codec<i32, V> for I32Codec {
    fn encode(&self, value: &i32, ops: &dyn Ops<V>) -> Result<V, CodecError> {
        Ok(ops.create_i64(i64::from(*value)))
    }

    fn decode(&self, ops: &dyn Ops<V>, input: &V) -> Result<i32, CodecError> {
        let wide = ops.get_i64(input)?;
        i32::try_from(wide).map_err(|_| CodecError::mismatch(format!("Out of range for i32: {wide}")))
    }
}

impl<V> Codec<i64, V> for I64Codec {
    fn encode(&self, value: &i64, ops: &dyn Ops<V>) -> Result<V, CodecError> {
        Ok(ops.create_i64(*value))
    }

    fn decode(&self, ops: &dyn Ops<V>, input: &V) -> Result<i64, CodecError> {
        ops.get_i64(input)
    }
}

impl<V> Codec<f64, V> for F64Codec {
    fn encode(&self, value: &f64, ops: &dyn Ops<V>) -> Result<V, CodecError> {
        if !value.is_finite() {
            return Err(CodecError::mismatch(format!("Not a finite number: {value}")));
        }
        Ok(ops.create_f64(*value))
    }

    fn decode(&self, ops: &dyn Ops<V>, input: &V) -> Result<f64, CodecError> {
        ops.get_f64(input)
    }
}

impl<V> Codec<String, V> for StringCodec {
    fn encode(&self, value: &String, ops: &dyn Ops<V>) -> Result<V, CodecError> {
        Ok(ops.create_string(value))
    }

    fn decode(&self, ops: &dyn Ops<V>, input: &V) -> Result<String, CodecError> {
        ops.get_string(input)
    }
}
