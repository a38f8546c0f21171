use serde::{Serialize, Deserialize};

/// Inferred kind of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Numerical,
    Categorical,
    Boolean,
}

impl FieldType {
    pub fn is_numerical(&self) -> bool {
        *self == FieldType::Numerical
    }

    pub fn is_categorical(&self) -> bool {
        *self == FieldType::Categorical
    }
}

/// Classifies a raw token by its lexical form.
///
/// Anything that parses as a (non-NaN) float is numerical, `true`/`false` in
/// any case is boolean, and everything else is categorical.
pub fn classify(token: &str) -> FieldType {
    if parse_number(token).is_some() {
        FieldType::Numerical
    } else if parse_bool(token).is_some() {
        FieldType::Boolean
    } else {
        FieldType::Categorical
    }
}

/// Parses a numeric token, rejecting NaN.
pub(crate) fn parse_number(token: &str) -> Option<f64> {
    token.trim().parse::<f64>().ok().filter(|v| !v.is_nan())
}

pub(crate) fn parse_bool(token: &str) -> Option<bool> {
    let t = token.trim();
    if t.eq_ignore_ascii_case("true") {
        Some(true)
    } else if t.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}
