//! Raw and normalised input records.
//!
//! A raw record is an arbitrary JSON object. Normalisation trims every key and value and
//! coerces values to strings, which is what the resource builders consume. The
//! pre-normalisation shape of each value is kept alongside ([`FieldValue`]) so the
//! classifier can still tell a number from a list.

use serde_json::{Map, Value};

/// An incoming record: field name to arbitrary JSON value, in input order.
pub type RawRecord = Map<String, Value>;

/// The shape of a field's value before it was stringified.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldValue {
    /// Text, already trimmed.
    Text(String),
    Number(f64),
    Boolean(bool),
    List(Vec<Value>),
    Mapping(Map<String, Value>),
    Null,
}

impl From<&Value> for FieldValue {
    fn from(value: &Value) -> Self {
        match value {
            Value::String(s) => FieldValue::Text(s.trim().to_string()),
            Value::Number(n) => n
                .as_f64()
                .map_or_else(|| FieldValue::Text(n.to_string()), FieldValue::Number),
            Value::Bool(b) => FieldValue::Boolean(*b),
            Value::Array(items) => FieldValue::List(items.clone()),
            Value::Object(map) => FieldValue::Mapping(map.clone()),
            Value::Null => FieldValue::Null,
        }
    }
}

/// Stringify a JSON value the way it is fed to resource builders.
///
/// Strings are used as-is, numbers and booleans use their JSON rendering, lists and maps
/// become compact JSON, and `null` becomes empty. The result is trimmed.
pub fn stringify_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_string(),
        Value::Null => String::new(),
        other => other.to_string().trim().to_string(),
    }
}

/// One trimmed field of a normalised record.
#[derive(Clone, Debug, PartialEq)]
pub struct NormalizedField {
    pub name: String,
    pub value: String,
    pub original: FieldValue,
}

/// A record whose keys and values have been trimmed and stringified.
///
/// Keys that collide after trimming keep the position of the first occurrence and the
/// value of the last.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NormalizedRecord {
    fields: Vec<NormalizedField>,
}

impl NormalizedRecord {
    /// Normalise a raw record.
    pub fn from_raw(raw: &RawRecord) -> Self {
        let mut fields: Vec<NormalizedField> = Vec::with_capacity(raw.len());

        for (key, value) in raw {
            let field = NormalizedField {
                name: key.trim().to_string(),
                value: stringify_value(value),
                original: FieldValue::from(value),
            };
            match fields.iter_mut().find(|f| f.name == field.name) {
                Some(existing) => *existing = field,
                None => fields.push(field),
            }
        }

        Self { fields }
    }

    /// The normalised value of `name`, if present.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.value.as_str())
    }

    /// The normalised value of `name`, if present and non-empty.
    pub fn get_non_empty(&self, name: &str) -> Option<&str> {
        self.get(name).filter(|v| !v.is_empty())
    }

    pub fn iter(&self) -> impl Iterator<Item = &NormalizedField> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(value: Value) -> RawRecord {
        value.as_object().cloned().expect("object")
    }

    #[test]
    fn trims_keys_and_values() {
        let record = NormalizedRecord::from_raw(&raw(json!({
            "  first_name ": "  Jane  ",
            "heart_rate": " 72 "
        })));
        assert_eq!(record.get("first_name"), Some("Jane"));
        assert_eq!(record.get("heart_rate"), Some("72"));
        assert_eq!(record.len(), 2);
    }

    #[test]
    fn stringifies_non_text_values() {
        let record = NormalizedRecord::from_raw(&raw(json!({
            "count": 3,
            "ratio": 0.5,
            "flag": true,
            "scores": [1, 2],
            "visit": { "date": "2024-01-01" },
            "missing": null
        })));
        assert_eq!(record.get("count"), Some("3"));
        assert_eq!(record.get("ratio"), Some("0.5"));
        assert_eq!(record.get("flag"), Some("true"));
        assert_eq!(record.get("scores"), Some("[1,2]"));
        assert_eq!(record.get("visit"), Some(r#"{"date":"2024-01-01"}"#));
        assert_eq!(record.get("missing"), Some(""));
        assert_eq!(record.get_non_empty("missing"), None);
    }

    #[test]
    fn keeps_original_shape_for_classification() {
        let record = NormalizedRecord::from_raw(&raw(json!({
            "pulse": 72,
            "name": " Jane ",
            "flag": false,
            "scores": [1]
        })));
        let originals: Vec<&FieldValue> = record.iter().map(|f| &f.original).collect();
        assert_eq!(originals[0], &FieldValue::Number(72.0));
        assert_eq!(originals[1], &FieldValue::Text("Jane".into()));
        assert_eq!(originals[2], &FieldValue::Boolean(false));
        assert_eq!(originals[3], &FieldValue::List(vec![json!(1)]));
    }

    #[test]
    fn preserves_input_order() {
        let record = NormalizedRecord::from_raw(&raw(json!({
            "zeta": "1",
            "alpha": "2",
            "mid": "3"
        })));
        let names: Vec<&str> = record.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["zeta", "alpha", "mid"]);
    }

    #[test]
    fn colliding_keys_keep_first_position_last_value() {
        let record = NormalizedRecord::from_raw(&raw(json!({
            "a ": "first",
            "b": "middle",
            " a": "last"
        })));
        let pairs: Vec<(&str, &str)> = record
            .iter()
            .map(|f| (f.name.as_str(), f.value.as_str()))
            .collect();
        assert_eq!(pairs, [("a", "last"), ("b", "middle")]);
    }
}
