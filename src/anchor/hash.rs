//! Canonical JSON serialization and content hashing.
//!
//! The canonical form matches Python's `json.dumps(value, sort_keys=True)`:
//! keys sorted by code point at every depth, `", "` and `": "` separators,
//! and ASCII-only string escaping. Digests produced by existing deployments
//! that used that encoding are therefore reproducible here.

use std::fmt::{self, Write as _};

use serde::Serialize;
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

/// Caller-supplied structured data to anchor.
pub type Payload = Map<String, Value>;

/// SHA-256 digest of a payload's canonical serialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentHash([u8; 32]);

impl ContentHash {
    /// Hash raw bytes.
    pub fn digest(bytes: &[u8]) -> Self {
        Self(Sha256::digest(bytes).into())
    }

    /// Hash a payload. Pure: no I/O, same payload always yields the same hash.
    pub fn of_payload(payload: &Payload) -> Self {
        Self::digest(canonical_json_map(payload).as_bytes())
    }

    /// Hash any serializable value through the same canonical encoding.
    pub fn of_serializable<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<Self> {
        let value = serde_json::to_value(value)?;
        Ok(Self::digest(canonical_json(&value).as_bytes()))
    }

    /// Parse the 64-char hex form, with or without a `0x` prefix.
    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(s, &mut bytes)?;
        Ok(Self(bytes))
    }

    /// Raw digest bytes, as carried in a transaction's data field.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Lowercase hex without prefix.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl From<[u8; 32]> for ContentHash {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

/// Serialize a JSON value canonically.
pub fn canonical_json(value: &Value) -> String {
    let mut out = String::new();
    write_value(&mut out, value);
    out
}

/// Serialize a payload (a JSON object) canonically.
pub fn canonical_json_map(map: &Payload) -> String {
    let mut out = String::new();
    write_object(&mut out, map);
    out
}

fn write_value(out: &mut String, value: &Value) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(true) => out.push_str("true"),
        Value::Bool(false) => out.push_str("false"),
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() => write_float(out, f),
            _ => {
                let _ = write!(out, "{}", n);
            }
        },
        Value::String(s) => write_string(out, s),
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_value(out, item);
            }
            out.push(']');
        }
        Value::Object(map) => write_object(out, map),
    }
}

fn write_object(out: &mut String, map: &Map<String, Value>) {
    write_entries(out, map.iter().map(|(k, v)| (k.as_str(), v)).collect());
}

fn write_entries(out: &mut String, mut entries: Vec<(&str, &Value)>) {
    // Byte order of UTF-8 strings equals code point order.
    entries.sort_unstable_by(|a, b| a.0.cmp(b.0));

    out.push('{');
    for (i, (key, value)) in entries.into_iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        write_string(out, key);
        out.push_str(": ");
        write_value(out, value);
    }
    out.push('}');
}

/// Write a float the way Python's `repr` does: shortest round-trip digits,
/// positional between 1e-4 and 1e16, otherwise `d.ddde±XX`.
fn write_float(out: &mut String, f: f64) {
    // `{:e}` yields the shortest round-trip digits, e.g. "-1.5e-7".
    let sci = format!("{:e}", f);
    let (mantissa, exp) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    let exp: i32 = exp.parse().unwrap_or(0);
    let (sign, mantissa) = match mantissa.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", mantissa),
    };
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
    let n = digits.len() as i32;
    // Value = 0.DIGITS * 10^point
    let point = exp + 1;

    out.push_str(sign);
    if point <= -4 || point > 16 {
        out.push_str(&digits[..1]);
        if n > 1 {
            out.push('.');
            out.push_str(&digits[1..]);
        }
        let exp = point - 1;
        let _ = write!(out, "e{}{:02}", if exp < 0 { '-' } else { '+' }, exp.abs());
    } else if point <= 0 {
        out.push_str("0.");
        out.extend(std::iter::repeat('0').take((-point) as usize));
        out.push_str(&digits);
    } else if point < n {
        out.push_str(&digits[..point as usize]);
        out.push('.');
        out.push_str(&digits[point as usize..]);
    } else {
        out.push_str(&digits);
        out.extend(std::iter::repeat('0').take((point - n) as usize));
        out.push_str(".0");
    }
}

fn write_string(out: &mut String, s: &str) {
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{08}' => out.push_str("\\b"),
            '\u{0c}' => out.push_str("\\f"),
            ' '..='\u{7e}' => out.push(c),
            _ => {
                let mut units = [0u16; 2];
                for unit in c.encode_utf16(&mut units) {
                    let _ = write!(out, "\\u{:04x}", unit);
                }
            }
        }
    }
    out.push('"');
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn payload(value: Value) -> Payload {
        match value {
            Value::Object(map) => map,
            other => panic!("not an object: {}", other),
        }
    }

    #[test]
    fn test_sample_payload_regression() {
        let p = payload(json!({"name": "Alice", "balance": 1000, "type": "deposit"}));
        assert_eq!(
            canonical_json_map(&p),
            r#"{"balance": 1000, "name": "Alice", "type": "deposit"}"#
        );
        assert_eq!(
            ContentHash::of_payload(&p).to_hex(),
            "7353c652bdfce3276ae5ae3b51f24acd50ffaccc81cacd46cd82b39196ba93e9"
        );
    }

    #[test]
    fn test_empty_payload() {
        let p = Payload::new();
        assert_eq!(canonical_json_map(&p), "{}");
        assert_eq!(
            ContentHash::of_payload(&p).to_hex(),
            "44136fa355b3678a1146ad16f7e8649e94fb4fc21fe77e8310c060f61caaff8a"
        );
    }

    #[test]
    fn test_nested_values_and_escaping() {
        let p = payload(json!({
            "b": {"z": 1, "a": [1, "x", null, true]},
            "a": "h\u{e9}llo\n\"\u{1F600}"
        }));
        assert_eq!(
            canonical_json_map(&p),
            r#"{"a": "h\u00e9llo\n\"\ud83d\ude00", "b": {"a": [1, "x", null, true], "z": 1}}"#
        );
        assert_eq!(
            ContentHash::of_payload(&p).to_hex(),
            "599af1ada6188905bae65e37441ce26f4d89401394497fbfa60e189e075b0318"
        );
    }

    #[test]
    fn test_control_characters_escaped() {
        assert_eq!(canonical_json(&json!("a\u{01}\u{08}\u{0c}\t")), r#""a\u0001\b\f\t""#);
    }

    #[test]
    fn test_delete_character_escaped() {
        assert_eq!(canonical_json(&json!({"a": "\u{7f}"})), r#"{"a": "\u007f"}"#);
    }

    #[test]
    fn test_floats_match_python_repr() {
        let cases: &[(f64, &str)] = &[
            (0.00001, "1e-05"),
            (1e-7, "1e-07"),
            (1.5e-7, "1.5e-07"),
            (0.0001, "0.0001"),
            (0.1, "0.1"),
            (0.5, "0.5"),
            (1.0, "1.0"),
            (-0.0, "-0.0"),
            (123.456, "123.456"),
            (1e15, "1000000000000000.0"),
            (1e16, "1e+16"),
            (12345678901234567.0, "1.2345678901234568e+16"),
            (1.2345e20, "1.2345e+20"),
            (-2.5e-10, "-2.5e-10"),
            (1e100, "1e+100"),
            (5e-324, "5e-324"),
            (f64::MAX, "1.7976931348623157e+308"),
        ];
        for (value, expected) in cases {
            assert_eq!(canonical_json(&json!(value)), *expected, "value {:e}", value);
        }
    }

    #[test]
    fn test_integers_stay_integral() {
        assert_eq!(canonical_json(&json!([1000, -7, u64::MAX])), "[1000, -7, 18446744073709551615]");
    }

    #[test]
    fn test_mixed_payload_digest() {
        let p = payload(json!({"f": [0.00001, 1e16, 1.5, -2.5e-10], "a": "\u{7f}"}));
        assert_eq!(
            canonical_json_map(&p),
            r#"{"a": "\u007f", "f": [1e-05, 1e+16, 1.5, -2.5e-10]}"#
        );
        assert_eq!(
            ContentHash::of_payload(&p).to_hex(),
            "293d6e9821117749d0d7eae45af890cceaff8105f5a13b6ff3d2eb41fda8fcfa"
        );
    }

    #[test]
    fn test_entries_sorted_regardless_of_input_order() {
        // `Map` iterates sorted already; feed the writer unsorted entries directly.
        let (one, two, three) = (json!(1), json!(2), json!(3));
        let mut out = String::new();
        write_entries(&mut out, vec![("type", &three), ("name", &two), ("balance", &one)]);
        assert_eq!(out, r#"{"balance": 1, "name": 2, "type": 3}"#);

        let mut out = String::new();
        write_entries(&mut out, vec![("\u{e9}", &one), ("z", &two), ("Z", &three)]);
        assert_eq!(out, r#"{"Z": 3, "z": 2, "\u00e9": 1}"#);
    }

    #[test]
    fn test_serializable_matches_payload() {
        #[derive(Serialize)]
        struct Deposit<'a> {
            type_: &'a str,
            name: &'a str,
            balance: u64,
        }
        let value = Deposit { type_: "deposit", name: "Alice", balance: 1000 };
        let expected = ContentHash::of_payload(&payload(json!({
            "type_": "deposit", "name": "Alice", "balance": 1000
        })));
        assert_eq!(ContentHash::of_serializable(&value).unwrap(), expected);
    }

    #[test]
    fn test_hex_parse() {
        let hash = ContentHash::digest(b"anchor");
        assert_eq!(ContentHash::from_hex(&hash.to_hex()).unwrap(), hash);
        assert_eq!(ContentHash::from_hex(&format!("0x{}", hash)).unwrap(), hash);
        assert!(ContentHash::from_hex("abcd").is_err());
    }

    #[test]
    fn test_different_payloads_differ() {
        let a = payload(json!({"balance": 1000}));
        let b = payload(json!({"balance": 1001}));
        assert_ne!(ContentHash::of_payload(&a), ContentHash::of_payload(&b));
    }

    fn arb_entries() -> impl Strategy<Value = Vec<(String, i64)>> {
        prop::collection::btree_map("[a-zA-Z0-9_é]{0,8}", any::<i64>(), 0..12)
            .prop_map(|m| m.into_iter().collect())
    }

    proptest! {
        #[test]
        fn prop_key_order_does_not_matter(entries in arb_entries()) {
            let forward: Payload = entries.iter().map(|(k, v)| (k.clone(), json!(v))).collect();
            let reverse: Payload = entries.iter().rev().map(|(k, v)| (k.clone(), json!(v))).collect();
            prop_assert_eq!(canonical_json_map(&forward), canonical_json_map(&reverse));
            prop_assert_eq!(ContentHash::of_payload(&forward), ContentHash::of_payload(&reverse));
        }

        #[test]
        fn prop_hash_is_deterministic(entries in arb_entries()) {
            let p: Payload = entries.into_iter().map(|(k, v)| (k, json!(v))).collect();
            prop_assert_eq!(ContentHash::of_payload(&p), ContentHash::of_payload(&p.clone()));
        }

        #[test]
        fn prop_canonical_form_is_valid_json(entries in arb_entries()) {
            let p: Payload = entries.into_iter().map(|(k, v)| (k, json!(v))).collect();
            let parsed: Value = serde_json::from_str(&canonical_json_map(&p)).unwrap();
            prop_assert_eq!(parsed, Value::Object(p));
        }
    }
}
