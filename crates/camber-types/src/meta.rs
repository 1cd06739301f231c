use serde::{Deserialize, Serialize};

/// Scalar metadata value attached to a shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetaValue {
    Int(i64),
    Num(f64),
    Str(String),
}

impl MetaValue {
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            MetaValue::Int(v) => Some(*v),
            MetaValue::Num(v) => Some(*v as i64),
            MetaValue::Str(_) => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            MetaValue::Int(v) => Some(*v as f64),
            MetaValue::Num(v) => Some(*v),
            MetaValue::Str(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            MetaValue::Str(s) => Some(s),
            _ => None,
        }
    }
}

/// Recognized metadata keys. Anything else is carried opaquely.
pub const META_INFILL_DENSITY: &str = "infillDensity";
pub const META_INFILL_PATTERN: &str = "infillPattern";
pub const META_PART_NAME: &str = "partName";
pub const META_MIN_CUT_Z: &str = "minCutZ";

/// Infill patterns the slicer settings accept.
pub const INFILL_PATTERNS: [&str; 7] = [
    "grid",
    "gyroid",
    "honeycomb",
    "triangles",
    "cubic",
    "line",
    "concentric",
];

pub fn is_infill_pattern(name: &str) -> bool {
    INFILL_PATTERNS.contains(&name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn meta_value_coercions() {
        assert_eq!(MetaValue::Int(5).as_f64(), Some(5.0));
        assert_eq!(MetaValue::Num(2.5).as_i64(), Some(2));
        assert_eq!(MetaValue::Str("x".into()).as_i64(), None);
        assert_eq!(MetaValue::Str("abc".into()).as_str(), Some("abc"));
    }

    #[test]
    fn infill_pattern_vocabulary() {
        assert!(is_infill_pattern("gyroid"));
        assert!(!is_infill_pattern("zigzag"));
    }

    #[test]
    fn meta_value_serializes_untagged() {
        let v: MetaValue = serde_json::from_str("42").unwrap();
        assert_eq!(v, MetaValue::Int(42));
        let v: MetaValue = serde_json::from_str("\"lid\"").unwrap();
        assert_eq!(v, MetaValue::Str("lid".into()));
    }
}
