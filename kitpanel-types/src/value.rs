use serde::{Deserialize, Serialize};

use crate::ControlKind;

/// Value carried by a control change.
///
/// Serialises untagged, so a host sees a plain JSON number, boolean or string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ControlValue {
    Number(f64),
    Toggle(bool),
    /// Instrument-type selections travel as text.
    Text(String),
}

impl ControlValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            ControlValue::Number(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_toggle(&self) -> Option<bool> {
        match self {
            ControlValue::Toggle(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ControlValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Whether this value can be stored under a control of `kind`.
    pub fn fits(&self, kind: ControlKind) -> bool {
        matches!(
            (self, kind),
            (ControlValue::Number(_), ControlKind::Knob) | (ControlValue::Toggle(_), ControlKind::Toggle)
        )
    }

    /// Interpret externally supplied text as a number.
    ///
    /// Reads the longest numeric prefix (`"7.5dB"` is 7.5). Anything without
    /// a finite numeric prefix becomes 0.
    pub fn parse_number(raw: &str) -> f64 {
        let s = raw.trim_start();
        let mut end = s.len();
        while end > 0 {
            if s.is_char_boundary(end) {
                if let Ok(v) = s[..end].parse::<f64>() {
                    return if v.is_finite() { v } else { 0.0 };
                }
            }
            end -= 1;
        }
        0.0
    }
}

/// Round to one decimal place, the precision every consumer downstream of a knob sees.
pub fn round_to_tenth(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

impl std::fmt::Display for ControlValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // Shortest form: 7.0 prints as "7", 7.5 as "7.5"
            ControlValue::Number(v) if *v == 0.0 => f.write_str("0"),
            ControlValue::Number(v) => write!(f, "{}", v),
            ControlValue::Toggle(b) => write!(f, "{}", b),
            ControlValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for ControlValue {
    fn from(v: f64) -> Self {
        ControlValue::Number(v)
    }
}

impl From<bool> for ControlValue {
    fn from(b: bool) -> Self {
        ControlValue::Toggle(b)
    }
}

impl From<&str> for ControlValue {
    fn from(s: &str) -> Self {
        ControlValue::Text(s.to_string())
    }
}

impl From<String> for ControlValue {
    fn from(s: String) -> Self {
        ControlValue::Text(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_print_in_shortest_form() {
        assert_eq!(ControlValue::Number(7.0).to_string(), "7");
        assert_eq!(ControlValue::Number(7.5).to_string(), "7.5");
        assert_eq!(ControlValue::Number(-0.0).to_string(), "0");
        assert_eq!(ControlValue::Toggle(true).to_string(), "true");
        assert_eq!(ControlValue::Text("dw12".into()).to_string(), "dw12");
    }

    #[test]
    fn parse_number_defaults_to_zero() {
        assert_eq!(ControlValue::parse_number("4.25"), 4.25);
        assert_eq!(ControlValue::parse_number("  3"), 3.0);
        assert_eq!(ControlValue::parse_number("7.5dB"), 7.5);
        assert_eq!(ControlValue::parse_number("loud"), 0.0);
        assert_eq!(ControlValue::parse_number(""), 0.0);
        assert_eq!(ControlValue::parse_number("inf"), 0.0);
        assert_eq!(ControlValue::parse_number("NaN"), 0.0);
    }

    #[test]
    fn round_to_tenth_matches_readout_precision() {
        assert_eq!(round_to_tenth(7.04), 7.0);
        assert_eq!(round_to_tenth(7.06), 7.1);
        assert_eq!(round_to_tenth(0.0), 0.0);
    }

    #[test]
    fn fits_matches_kind() {
        assert!(ControlValue::Number(1.0).fits(ControlKind::Knob));
        assert!(!ControlValue::Number(1.0).fits(ControlKind::Toggle));
        assert!(ControlValue::Toggle(false).fits(ControlKind::Toggle));
        assert!(!ControlValue::Text("x".into()).fits(ControlKind::Knob));
    }

    #[test]
    fn serialises_untagged() {
        assert_eq!(serde_json::to_string(&ControlValue::Number(7.0)).unwrap(), "7.0");
        assert_eq!(serde_json::to_string(&ControlValue::Toggle(true)).unwrap(), "true");
        assert_eq!(serde_json::to_string(&ControlValue::from("dw12")).unwrap(), "\"dw12\"");
    }
}
