use serde::{Deserialize, Serialize};
use smartstring::alias::String as SmartString;
use std::collections::BTreeMap;

/// Attribute and style map. Ordered by key so snapshots are deterministic.
pub type PropMap = BTreeMap<SmartString, PropValue>;

/// Value stored in an attribute or style map
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropValue {
    Int(i64),
    Float(f64),
    String(SmartString),
}

impl PropValue {
    pub fn empty() -> Self {
        PropValue::String(SmartString::new())
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            PropValue::Int(i) => Some(*i as f64),
            PropValue::Float(f) => Some(*f),
            PropValue::String(_) => None,
        }
    }
}

// Numbers compare by exact value across Int/Float; strings never equal numbers.
// NaN is unequal to everything, itself included.
impl PartialEq for PropValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (PropValue::String(a), PropValue::String(b)) => a == b,
            (PropValue::Int(a), PropValue::Int(b)) => a == b,
            (PropValue::Float(a), PropValue::Float(b)) => a == b,
            (PropValue::Int(i), PropValue::Float(f)) | (PropValue::Float(f), PropValue::Int(i)) => {
                int_equals_float(*i, *f)
            }
            _ => false,
        }
    }
}

/// `f` is integral, inside the `i64` range, and exactly `i`
fn int_equals_float(i: i64, f: f64) -> bool {
    // 2^63 is exactly representable; i64::MAX as f64 rounds up to it
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;
    f.fract() == 0.0 && (-LIMIT..LIMIT).contains(&f) && f as i64 == i
}

impl From<&str> for PropValue {
    fn from(value: &str) -> Self {
        PropValue::String(SmartString::from(value))
    }
}

impl From<String> for PropValue {
    fn from(value: String) -> Self {
        PropValue::String(SmartString::from(value))
    }
}

impl From<SmartString> for PropValue {
    fn from(value: SmartString) -> Self {
        PropValue::String(value)
    }
}

impl From<i64> for PropValue {
    fn from(value: i64) -> Self {
        PropValue::Int(value)
    }
}

impl From<i32> for PropValue {
    fn from(value: i32) -> Self {
        PropValue::Int(value as i64)
    }
}

impl From<u32> for PropValue {
    fn from(value: u32) -> Self {
        PropValue::Int(value as i64)
    }
}

impl From<f64> for PropValue {
    fn from(value: f64) -> Self {
        PropValue::Float(value)
    }
}
