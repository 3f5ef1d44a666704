//! Field meaning inference.
//!
//! Given a field name and its value, [`classify`] returns a short human-readable label that
//! becomes the Observation's `code.text`. The label is advisory; it is not a coded
//! terminology value.
//!
//! Rules are plain ordered tables evaluated top to bottom, first match wins. Numeric ranges
//! overlap on purpose: 72 is both a plausible heart rate and a plausible weight, and the
//! earlier rule decides.

use crate::record::{FieldValue, NormalizedField};
use serde_json::{Map, Value};

/// Labels produced by the fixed rules.
pub mod labels {
    pub const EMAIL: &str = "Email";
    pub const PRACTITIONER_REFERENCE: &str = "Practitioner Reference";
    pub const GENDER: &str = "Gender";
    pub const TIME: &str = "Time";
    pub const DATE_TIME: &str = "DateTime";
    pub const HEART_RATE_OR_BLOOD_PRESSURE: &str = "Heart Rate or Blood Pressure";
    pub const WEIGHT_OR_NUMERIC: &str = "Weight or Numeric";
    pub const BMI_OR_AGE: &str = "BMI or Age";
    pub const BOOLEAN: &str = "Boolean";
    pub const SCORE_ARRAY: &str = "Score Array";
    pub const DATE_TIME_OR_EVENT: &str = "DateTime or Event";
}

/// What a matching rule reports.
#[derive(Clone, Copy, Debug)]
enum Label {
    Fixed(&'static str),
    FieldTitle,
}

impl Label {
    fn render(self, field: &str) -> String {
        match self {
            Label::Fixed(label) => label.to_string(),
            Label::FieldTitle => field_title(field),
        }
    }
}

struct TextRule {
    name: &'static str,
    matches: fn(field: &str, value: &str) -> bool,
    label: Label,
}

struct NumericRule {
    name: &'static str,
    matches: fn(f64) -> bool,
    label: &'static str,
}

const TEXT_RULES: &[TextRule] = &[
    TextRule {
        name: "email",
        matches: |_, v| v.contains('@'),
        label: Label::Fixed(labels::EMAIL),
    },
    TextRule {
        name: "practitioner",
        matches: |f, v| v.contains("Dr") || f.to_lowercase().contains("doctor"),
        label: Label::Fixed(labels::PRACTITIONER_REFERENCE),
    },
    TextRule {
        name: "gender",
        matches: |_, v| v.eq_ignore_ascii_case("male") || v.eq_ignore_ascii_case("female"),
        label: Label::Fixed(labels::GENDER),
    },
    TextRule {
        name: "time",
        matches: |_, v| v.ends_with("AM") || v.ends_with("PM"),
        label: Label::Fixed(labels::TIME),
    },
    TextRule {
        name: "date_time",
        matches: |_, v| v.contains('-') && v.contains(':'),
        label: Label::Fixed(labels::DATE_TIME),
    },
    TextRule {
        name: "alphabetic",
        matches: |_, v| {
            let mut letters = v.chars().filter(|c| *c != ' ').peekable();
            letters.peek().is_some() && letters.all(char::is_alphabetic)
        },
        label: Label::FieldTitle,
    },
];

const NUMERIC_RULES: &[NumericRule] = &[
    NumericRule {
        name: "heart_rate_or_blood_pressure",
        matches: |n| (30.0..=180.0).contains(&n),
        label: labels::HEART_RATE_OR_BLOOD_PRESSURE,
    },
    NumericRule {
        name: "weight_or_numeric",
        matches: |n| (10.0..=250.0).contains(&n),
        label: labels::WEIGHT_OR_NUMERIC,
    },
    NumericRule {
        name: "bmi_or_age",
        matches: |n| n > 10.0 && n < 60.0,
        label: labels::BMI_OR_AGE,
    },
    NumericRule {
        name: "boolean",
        matches: |n| n == 0.0 || n == 1.0,
        label: labels::BOOLEAN,
    },
];

/// A field paired with the meaning the classifier inferred for it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassifiedField {
    pub field: String,
    pub value: String,
    pub meaning: String,
}

/// Infer the meaning of a field. Never fails; falls back to the title-cased field name.
pub fn classify(field: &str, value: &FieldValue) -> String {
    let matched = match value {
        FieldValue::Text(text) => classify_text(field, text),
        FieldValue::Number(n) => classify_number(*n),
        FieldValue::Boolean(b) => classify_number(if *b { 1.0 } else { 0.0 }),
        FieldValue::List(_) => Some(labels::SCORE_ARRAY.to_string()),
        FieldValue::Mapping(map) => {
            looks_like_event(map).then(|| labels::DATE_TIME_OR_EVENT.to_string())
        }
        FieldValue::Null => None,
    };
    matched.unwrap_or_else(|| field_title(field))
}

/// Classify a normalised field using its pre-normalisation shape.
pub fn classify_field(field: &NormalizedField) -> ClassifiedField {
    ClassifiedField {
        field: field.name.clone(),
        value: field.value.clone(),
        meaning: classify(&field.name, &field.original),
    }
}

/// Field name with underscores as spaces, title-cased.
///
/// Each run of cased letters starts upper-case and continues lower-case; any other
/// character ends the run, so `bp2val` becomes `Bp2Val` and `o'brien` becomes `O'Brien`.
pub fn field_title(field: &str) -> String {
    let mut title = String::with_capacity(field.len());
    let mut in_word = false;
    for c in field.chars() {
        let c = if c == '_' { ' ' } else { c };
        let cased = c.is_uppercase() || c.is_lowercase();
        if cased && in_word {
            title.extend(c.to_lowercase());
        } else if cased {
            title.extend(c.to_uppercase());
        } else {
            title.push(c);
        }
        in_word = cased;
    }
    title
}

fn classify_text(field: &str, value: &str) -> Option<String> {
    if let Some(rule) = TEXT_RULES.iter().find(|r| (r.matches)(field, value)) {
        tracing::trace!(field, rule = rule.name, "text rule matched");
        return Some(rule.label.render(field));
    }
    // Numbers often arrive as strings; give them the numeric rules too.
    value
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .and_then(classify_number)
}

fn classify_number(value: f64) -> Option<String> {
    NUMERIC_RULES
        .iter()
        .find(|r| (r.matches)(value))
        .map(|rule| {
            tracing::trace!(value, rule = rule.name, "numeric rule matched");
            rule.label.to_string()
        })
}

fn looks_like_event(map: &Map<String, Value>) -> bool {
    map.contains_key("date") || Value::Object(map.clone()).to_string().contains("$date")
}
