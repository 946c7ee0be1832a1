use std::sync::Arc;

use dyncodec::codec::{BoolCodec, I32Codec, StringCodec};
use dyncodec::{
    decode_diagnosed, Codec, CodecError, FieldKind, FieldSet, JsonOps, ObjectCodec, Ops, PathAddress,
};
use serde_json::{json, Value};

#[derive(Debug, Default, PartialEq)]
struct Strict {
    a: String,
    b: i32,
}

#[derive(Debug, Default, PartialEq)]
struct Loose {
    a: Option<String>,
    b: i32,
}

fn strict_codec() -> Arc<ObjectCodec<Strict, Value>> {
    FieldSet::new(Strict::default)
        .field(StringCodec, "a", |s: &Strict| &s.a, |s, v| s.a = v)
        .field(I32Codec, "b", |s: &Strict| &s.b, |s, v| s.b = v)
        .build()
}

fn loose_codec() -> Arc<ObjectCodec<Loose, Value>> {
    FieldSet::new(Loose::default)
        .nullable(StringCodec, "a", |l: &Loose| l.a.as_ref(), |l, v| l.a = v)
        .field(I32Codec, "b", |l: &Loose| &l.b, |l, v| l.b = v)
        .build()
}

#[test]
fn explicit_null_fails_required_field_for_whole_object() {
    let outcome = decode_diagnosed(&strict_codec(), JsonOps, &json!({"a": null, "b": 1337}));
    assert!(!outcome.is_ok());
    assert_eq!(
        outcome.root_message().unwrap(),
        "Unexpected null for \"a\"; Failed to decode field \"a\""
    );
}

#[test]
fn explicit_null_decodes_to_none_for_nullable_field() {
    let decoded = loose_codec()
        .decode(&JsonOps, &json!({"a": null, "b": 1337}))
        .unwrap();
    assert_eq!(decoded, Loose { a: None, b: 1337 });
}

#[test]
fn absent_required_field_keeps_factory_default() {
    let codec = FieldSet::<Strict, Value>::new(|| Strict {
        a: "preset".into(),
        b: 9,
    })
    .field(StringCodec, "a", |s| &s.a, |s, v| s.a = v)
    .field(I32Codec, "b", |s| &s.b, |s, v| s.b = v)
    .build();
    let decoded = codec.decode(&JsonOps, &json!({"b": 1})).unwrap();
    assert_eq!(
        decoded,
        Strict {
            a: "preset".into(),
            b: 1
        }
    );
}

#[test]
fn nullable_none_encodes_as_explicit_null() {
    let codec = FieldSet::<Loose, Value>::new(Loose::default)
        .nullable(StringCodec, "a", |l| l.a.as_ref(), |l, v| l.a = v)
        .build();
    assert_eq!(codec.encode(&Loose::default(), &JsonOps), Ok(json!({"a": null})));
}

#[test]
fn nullable_absent_keeps_default() {
    let codec = FieldSet::<Loose, Value>::new(|| Loose {
        a: Some("kept".into()),
        b: 0,
    })
    .nullable(StringCodec, "a", |l| l.a.as_ref(), |l, v| l.a = v)
    .build();
    let decoded = codec.decode(&JsonOps, &json!({})).unwrap();
    assert_eq!(decoded.a.as_deref(), Some("kept"));
}

#[derive(Debug, Default, PartialEq)]
struct Chain {
    a: String,
    b: Option<Box<Chain>>,
}

fn chain_codec() -> Arc<ObjectCodec<Chain, Value>> {
    FieldSet::new(Chain::default)
        .field(StringCodec, "a", |c: &Chain| &c.a, |c, v| c.a = v)
        .recursive("b", |c: &Chain| c.b.as_deref(), |c, v| c.b = v.map(Box::new))
        .build()
}

#[test]
fn recursive_field_decodes_nested_chain() {
    let input = json!({"a": "t1", "b": {"a": "t2", "b": {"a": "t3"}}});
    let decoded = chain_codec().decode(&JsonOps, &input).unwrap();

    assert_eq!(decoded.a, "t1");
    let second = decoded.b.as_deref().unwrap();
    assert_eq!(second.a, "t2");
    let third = second.b.as_deref().unwrap();
    assert_eq!(third.a, "t3");
    assert!(third.b.is_none());
}

#[test]
fn recursive_field_absent_everywhere() {
    let decoded = chain_codec().decode(&JsonOps, &json!({})).unwrap();
    assert_eq!(decoded, Chain::default());
}

#[test]
fn recursive_explicit_null_terminates_chain() {
    let decoded = chain_codec()
        .decode(&JsonOps, &json!({"a": "t1", "b": null}))
        .unwrap();
    assert_eq!(
        decoded,
        Chain {
            a: "t1".into(),
            b: None
        }
    );
}

#[test]
fn recursive_encode_omits_terminal_key() {
    let input = json!({"a": "t1", "b": {"a": "t2", "b": {"a": "t3"}}});
    let codec = chain_codec();
    let decoded = codec.decode(&JsonOps, &input).unwrap();
    assert_eq!(codec.encode(&decoded, &JsonOps), Ok(input));
}

#[test]
fn recursive_failure_is_reported_at_nested_path() {
    let outcome = decode_diagnosed(&chain_codec(), JsonOps, &json!({"a": "t1", "b": {"a": 2}}));
    let leaves = outcome.context.error_root(None).erred_leaves();
    assert_eq!(leaves.len(), 1);
    assert_eq!(leaves.keys().next().unwrap().to_string(), "b.a");
}

#[derive(Debug, Default, PartialEq)]
struct Base {
    id: i32,
    label: String,
}

#[derive(Debug, Default, PartialEq)]
struct Derived {
    base: Base,
    enabled: bool,
}

fn derived_codec() -> Arc<ObjectCodec<Derived, Value>> {
    let base = FieldSet::new(|| Base {
        id: -1,
        label: "unnamed".into(),
    })
    .field(I32Codec, "id", |b: &Base| &b.id, |b, v| b.id = v)
    .field(StringCodec, "label", |b: &Base| &b.label, |b, v| b.label = v)
    .build();

    FieldSet::new(Derived::default)
        .extend(base, "base", |d: &Derived| &d.base, |d, v| d.base = v)
        .field(BoolCodec, "enabled", |d: &Derived| &d.enabled, |d, v| d.enabled = v)
        .build()
}

#[test]
fn extend_decodes_nested_object() {
    let decoded = derived_codec()
        .decode(&JsonOps, &json!({"base": {"id": 4, "label": "torch"}, "enabled": true}))
        .unwrap();
    assert_eq!(
        decoded,
        Derived {
            base: Base {
                id: 4,
                label: "torch".into()
            },
            enabled: true
        }
    );
}

#[test]
fn extend_absent_uses_inner_factory_defaults() {
    let decoded = derived_codec().decode(&JsonOps, &json!({"enabled": true})).unwrap();
    assert_eq!(
        decoded.base,
        Base {
            id: -1,
            label: "unnamed".into()
        }
    );
}

#[test]
fn extend_encodes_nested_object() {
    let value = Derived {
        base: Base {
            id: 2,
            label: "lamp".into(),
        },
        enabled: false,
    };
    assert_eq!(
        derived_codec().encode(&value, &JsonOps),
        Ok(json!({"base": {"id": 2, "label": "lamp"}, "enabled": false}))
    );
}

#[test]
fn extend_present_but_not_a_map_fails_at_its_key() {
    for (input, cause) in [(json!(3), "Not a map: 3"), (json!(null), "Not a map: null")] {
        let outcome = decode_diagnosed(&derived_codec(), JsonOps, &json!({"base": input}));
        assert_eq!(
            outcome.root_message().unwrap(),
            format!("{cause}; Failed to decode field \"base\"")
        );
        let leaves = outcome.context.error_root(None).erred_leaves();
        assert_eq!(leaves.len(), 1);
        assert_eq!(
            leaves.get(&PathAddress::parse("base").unwrap()),
            Some(&vec![cause.to_string()])
        );
    }
}

#[test]
fn mandatory_absent_is_missing_required_field() {
    let codec = FieldSet::<Strict, Value>::new(Strict::default)
        .mandatory(StringCodec, "a", |s| &s.a, |s, v| s.a = v)
        .build();
    assert_eq!(codec.fields()[0].kind(), FieldKind::Mandatory);

    let err = codec.decode(&JsonOps, &json!({})).unwrap_err();
    assert_eq!(
        err.causes(),
        vec![&CodecError::MissingRequiredField { key: "a".into() }]
    );
    assert_eq!(err.to_string(), "No key \"a\" in map; Failed to decode field \"a\"");

    let outcome = decode_diagnosed(&codec, JsonOps, &json!({}));
    let leaves = outcome.context.error_root(None).erred_leaves();
    assert_eq!(leaves.keys().next().unwrap().to_string(), "a");
}

#[test]
fn every_field_failure_is_collected() {
    let outcome = decode_diagnosed(&strict_codec(), JsonOps, &json!({"a": 1, "b": "x"}));
    assert_eq!(
        outcome.root_message().unwrap(),
        "Not a string: 1; Failed to decode field \"a\"; Not a number: \"x\"; Failed to decode field \"b\""
    );
    let leaves = outcome.context.error_root(None).erred_leaves();
    assert_eq!(
        leaves.keys().map(ToString::to_string).collect::<Vec<_>>(),
        vec!["a", "b"]
    );
}

#[test]
fn encode_writes_fields_in_declaration_order() {
    let encoded = strict_codec()
        .encode(
            &Strict {
                a: "x".into(),
                b: 2,
            },
            &JsonOps,
        )
        .unwrap();
    let keys: Vec<_> = encoded.as_object().unwrap().keys().cloned().collect();
    assert_eq!(keys, vec!["a", "b"]);
}

/// Notes the value under the `audit` category, then rejects anything but
/// `"ok"`.
struct AuditedString;

impl<V> Codec<String, V> for AuditedString {
    fn encode(&self, value: &String, ops: &dyn Ops<V>) -> Result<V, CodecError> {
        Ok(ops.create_string(value))
    }

    fn decode(&self, ops: &dyn Ops<V>, input: &V) -> Result<String, CodecError> {
        let value = ops.get_string(input)?;
        if let Some(context) = ops.context() {
            context.report_error_in("audit", format!("saw {value}"));
        }
        if value != "ok" {
            return Err(CodecError::mismatch(format!("Rejected: {value}")));
        }
        Ok(value)
    }
}

#[test]
fn custom_note_then_failure_keeps_default_leaf() {
    let codec = FieldSet::<Strict, Value>::new(Strict::default)
        .field(AuditedString, "a", |s| &s.a, |s, v| s.a = v)
        .field(I32Codec, "b", |s| &s.b, |s, v| s.b = v)
        .build();

    let outcome = decode_diagnosed(&codec, JsonOps, &json!({"a": "nope", "b": 1}));
    assert!(!outcome.is_ok());
    let leaves = outcome.context.error_root(None).erred_leaves();
    assert_eq!(
        leaves.get(&PathAddress::parse("a").unwrap()),
        Some(&vec!["Rejected: nope".to_string()])
    );
    assert_eq!(outcome.context.error_root(Some("audit")).erred_leaves().len(), 1);

    let outcome = decode_diagnosed(&codec, JsonOps, &json!({"a": "ok", "b": 1}));
    assert!(outcome.is_ok());
    assert!(outcome.context.error_root(None).is_empty());
}
