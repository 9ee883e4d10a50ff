//! Property-list access for s-expression messages and config files.

use lexpr::Value;

/// Value following `:key` in a message or config plist, rendered as text.
///
/// Keys may arrive as keywords or as colon-prefixed symbols; keyword and
/// symbol values come back without their leading colon.
pub(crate) fn get_keyword(value: &Value, key: &str) -> Option<String> {
    let prefixed = format!(":{}", key);
    let mut current = value;
    while let Value::Cons(pair) = current {
        let car = pair.car();
        let is_key = match car {
            Value::Keyword(k) => k.as_ref() == key,
            Value::Symbol(s) => s.as_ref() == prefixed,
            _ => false,
        };
        if is_key {
            let Value::Cons(next) = pair.cdr() else {
                return None;
            };
            let val = next.car();
            return match val {
                Value::Keyword(v) => Some(v.to_string()),
                Value::Symbol(v) => {
                    let s = v.to_string();
                    Some(s.strip_prefix(':').unwrap_or(&s).to_string())
                }
                Value::String(v) => Some(v.to_string()),
                Value::Number(n) => Some(n.to_string()),
                Value::Bool(b) => Some(if *b { "t" } else { "nil" }.to_string()),
                Value::Null | Value::Nil => Some("nil".to_string()),
                _ => Some(val.to_string()),
            };
        }
        current = pair.cdr();
    }
    None
}

/// Integer value of `:key`; `None` when missing or not an integer.
pub(crate) fn get_int(value: &Value, key: &str) -> Option<i64> {
    get_keyword(value, key).and_then(|s| s.parse().ok())
}

/// Flag value of `:key`. `nil` reads as false, anything else as true.
pub(crate) fn get_bool(value: &Value, key: &str) -> Option<bool> {
    get_keyword(value, key).map(|s| s != "nil")
}

/// Numeric value of `:key`.
/// A present value that is not a finite number is an error naming the key
/// and text, so `nan` and `inf` never reach the pointer state.
pub(crate) fn try_float(value: &Value, key: &str) -> Result<Option<f64>, String> {
    let Some(s) = get_keyword(value, key) else {
        return Ok(None);
    };
    match s.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(Some(v)),
        Ok(_) => Err(format!(":{key} expects a finite number, got {s}")),
        Err(_) => Err(format!(":{key} expects a number, got {s}")),
    }
}

/// Escape a string for s-expression output.
pub(crate) fn escape_string(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

pub(crate) fn sexp_bool(b: bool) -> &'static str {
    if b {
        "t"
    } else {
        "nil"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_keyword_from_plist() {
        let v = lexpr::from_str("(:type :pointer-enter :id 1)").unwrap();
        assert_eq!(get_keyword(&v, "type"), Some("pointer-enter".to_string()));
        assert_eq!(get_keyword(&v, "id"), Some("1".to_string()));
    }

    #[test]
    fn test_get_keyword_missing_key() {
        let v = lexpr::from_str("(:type :pointer-exit)").unwrap();
        assert_eq!(get_keyword(&v, "now"), None);
    }

    #[test]
    fn test_get_keyword_trailing_key_without_value() {
        let v = lexpr::from_str("(:type :pointer-exit :now)").unwrap();
        assert_eq!(get_keyword(&v, "now"), None);
    }

    #[test]
    fn test_get_keyword_empty_list() {
        let v = lexpr::from_str("()").unwrap();
        assert_eq!(get_keyword(&v, "type"), None);
    }

    #[test]
    fn test_get_int_negative() {
        let v = lexpr::from_str("(:order -12)").unwrap();
        assert_eq!(get_int(&v, "order"), Some(-12));
    }

    #[test]
    fn test_try_float_decimal_and_integer() {
        let v = lexpr::from_str("(:now 0.5 :dwell 2)").unwrap();
        assert_eq!(try_float(&v, "now"), Ok(Some(0.5)));
        assert_eq!(try_float(&v, "dwell"), Ok(Some(2.0)));
    }

    #[test]
    fn test_get_bool() {
        let v = lexpr::from_str("(:interactive t :other nil)").unwrap();
        assert_eq!(get_bool(&v, "interactive"), Some(true));
        assert_eq!(get_bool(&v, "other"), Some(false));
        assert_eq!(get_bool(&v, "missing"), None);
    }

    #[test]
    fn test_try_float_reports_bad_value() {
        let v = lexpr::from_str("(:now :soon)").unwrap();
        let err = try_float(&v, "now").unwrap_err();
        assert!(err.contains(":now"));
        assert_eq!(try_float(&v, "missing"), Ok(None));
    }

    #[test]
    fn test_try_float_rejects_non_finite() {
        let v = lexpr::from_str("(:now nan :z inf :x \"NaN\")").unwrap();
        for key in ["now", "z", "x"] {
            let err = try_float(&v, key).unwrap_err();
            assert!(err.contains("finite"), "{key}: {err}");
        }
    }

    #[test]
    fn test_escape_string() {
        assert_eq!(escape_string("say \"hi\""), "say \\\"hi\\\"");
        assert_eq!(escape_string("a\\b"), "a\\\\b");
    }
}
