//! Document backends.
//!
//! [`Ops`] is the capability every codec decodes from and encodes into. A
//! backend adapts one concrete document value type `V`; codecs never look at
//! `V` directly, so the same codec runs unchanged against any backend.

#[cfg(feature = "cbor")]
mod cbor;
#[cfg(feature = "json")]
mod json;

#[cfg(feature = "cbor")]
pub use cbor::CborOps;
#[cfg(feature = "json")]
pub use json::JsonOps;

use crate::diagnostics::DiagnosticContext;
use crate::error::CodecError;

/// Construction and inspection of a generic document value `V`.
///
/// Inspection methods return [`CodecError::StructuralMismatch`] when the value
/// has a different shape than requested.
pub trait Ops<V> {
    fn null(&self) -> V;
    fn is_null(&self, input: &V) -> bool;

    fn create_bool(&self, value: bool) -> V;
    fn get_bool(&self, input: &V) -> Result<bool, CodecError>;

    fn create_i64(&self, value: i64) -> V;
    fn get_i64(&self, input: &V) -> Result<i64, CodecError>;

    fn create_f64(&self, value: f64) -> V;
    fn get_f64(&self, input: &V) -> Result<f64, CodecError>;

    fn create_string(&self, value: &str) -> V;
    fn get_string(&self, input: &V) -> Result<String, CodecError>;

    fn create_list(&self, items: Vec<V>) -> V;
    fn is_list(&self, input: &V) -> bool;
    fn get_list(&self, input: &V) -> Result<Vec<V>, CodecError>;

    fn create_map(&self, entries: Vec<(String, V)>) -> V;
    fn is_map(&self, input: &V) -> bool;
    fn get_entries(&self, input: &V) -> Result<Vec<(String, V)>, CodecError>;

    /// Look up `key` in a map. `Ok(None)` means the key is absent.
    fn get_field(&self, input: &V, key: &str) -> Result<Option<V>, CodecError> {
        Ok(self
            .get_entries(input)?
            .into_iter()
            .find_map(|(k, v)| (k == key).then_some(v)))
    }

    /// The diagnostic context of the current decode, if one was requested.
    fn context(&self) -> Option<&DiagnosticContext> {
        None
    }
}
