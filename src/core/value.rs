//! Purpose: The dynamic value tree produced by a decode.
//! Exports: `Value`.
//! Role: Closed sum type over the six JSON kinds plus read-only navigation helpers.
//! Invariants: Object keys are decoded text; a repeated key keeps the last value.
//! Invariants: Numbers are always `f64`; no integer/float distinction is retained.
//! Notes: Whole numbers within the exact `f64` integer range serialize as integers.
//! Notes: Implements `serde::Serialize` so external encoders can render a tree.
use std::collections::BTreeMap;

use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

// 2^53: beyond this not every integer has an exact `f64`.
const MAX_EXACT_INT: f64 = 9_007_199_254_740_992.0;

#[derive(Clone, Debug, Default, PartialEq)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Vec<Value>),
    Object(BTreeMap<String, Value>),
}

impl Value {
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// The number as an integer when it is whole and exactly representable.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Number(n) if n.fract() == 0.0 && n.abs() <= MAX_EXACT_INT => Some(*n as i64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Member of an object by key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_object().and_then(|map| map.get(key))
    }

    /// Element of an array by position.
    pub fn get_index(&self, index: usize) -> Option<&Value> {
        self.as_array().and_then(|items| items.get(index))
    }

    /// Walk a JSON Pointer (RFC 6901), e.g. `/included/0/attributes`.
    ///
    /// The empty pointer selects `self`. Array tokens must be canonical
    /// decimal indices (`0`, `12`, never `01` or `-`).
    pub fn pointer(&self, pointer: &str) -> Option<&Value> {
        if pointer.is_empty() {
            return Some(self);
        }
        let rest = pointer.strip_prefix('/')?;
        rest.split('/').try_fold(self, |target, raw| {
            let token = raw.replace("~1", "/").replace("~0", "~");
            match target {
                Value::Object(map) => map.get(&token),
                Value::Array(items) => parse_index(&token).and_then(|idx| items.get(idx)),
                _ => None,
            }
        })
    }
}

fn parse_index(token: &str) -> Option<usize> {
    if token.is_empty() || (token.len() > 1 && token.starts_with('0')) {
        return None;
    }
    if !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    token.parse().ok()
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::Array(value)
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(value: BTreeMap<String, Value>) -> Self {
        Value::Object(value)
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(n) => match self.as_i64() {
                Some(int) => serializer.serialize_i64(int),
                None => serializer.serialize_f64(*n),
            },
            Value::String(s) => serializer.serialize_str(s),
            Value::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Object(map) => {
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (key, value) in map {
                    out.serialize_entry(key, value)?;
                }
                out.end()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Value;
    use std::collections::BTreeMap;

    fn sample() -> Value {
        let mut attrs = BTreeMap::new();
        attrs.insert("lastName".to_string(), Value::from("Tärnäby"));
        attrs.insert("age".to_string(), Value::from(80.0));
        let mut person = BTreeMap::new();
        person.insert("attributes".to_string(), Value::from(attrs));
        let mut odd = BTreeMap::new();
        odd.insert("a/b".to_string(), Value::from(true));
        odd.insert("m~n".to_string(), Value::Null);
        let mut root = BTreeMap::new();
        root.insert("included".to_string(), Value::from(vec![Value::from(person)]));
        root.insert("odd".to_string(), Value::from(odd));
        Value::from(root)
    }

    #[test]
    fn accessors_match_variants() {
        assert_eq!(Value::from(true).as_bool(), Some(true));
        assert_eq!(Value::from(1.5).as_f64(), Some(1.5));
        assert_eq!(Value::from("x").as_str(), Some("x"));
        assert!(Value::default().is_null());
        assert_eq!(Value::from("x").as_f64(), None);
        assert_eq!(Value::Array(Vec::new()).kind(), "array");
    }

    #[test]
    fn pointer_walks_nested_members() {
        let root = sample();
        assert_eq!(
            root.pointer("/included/0/attributes/lastName")
                .and_then(Value::as_str),
            Some("Tärnäby")
        );
        assert_eq!(
            root.pointer("/included/0/attributes/age")
                .and_then(Value::as_f64),
            Some(80.0)
        );
        assert_eq!(root.pointer(""), Some(&root));
    }

    #[test]
    fn pointer_unescapes_tokens() {
        let root = sample();
        assert_eq!(root.pointer("/odd/a~1b"), Some(&Value::Bool(true)));
        assert_eq!(root.pointer("/odd/m~0n"), Some(&Value::Null));
    }

    #[test]
    fn pointer_rejects_bad_paths() {
        let root = sample();
        assert_eq!(root.pointer("included"), None);
        assert_eq!(root.pointer("/included/00"), None);
        assert_eq!(root.pointer("/included/-"), None);
        assert_eq!(root.pointer("/included/1"), None);
        assert_eq!(root.pointer("/odd/a~1b/deeper"), None);
    }

    #[test]
    fn serializes_through_serde_json() {
        let mut map = BTreeMap::new();
        map.insert("b".to_string(), Value::from(vec![Value::Null, Value::from(2.5)]));
        map.insert("a".to_string(), Value::from("q\"uote"));
        let text = serde_json::to_string(&Value::from(map)).expect("encode");
        assert_eq!(text, r#"{"a":"q\"uote","b":[null,2.5]}"#);
    }

    #[test]
    fn whole_numbers_serialize_as_integers() {
        let items = vec![
            Value::from(80.0),
            Value::from(-0.0),
            Value::from(-12.0),
            Value::from(0.5),
            Value::from(1e300),
        ];
        let text = serde_json::to_string(&Value::from(items)).expect("encode");
        assert_eq!(text, "[80,0,-12,0.5,1e300]");
        assert_eq!(Value::from(9_007_199_254_740_992.0).as_i64(), Some(9_007_199_254_740_992));
        assert_eq!(Value::from(1e300).as_i64(), None);
        assert_eq!(Value::from("80").as_i64(), None);
    }
}
