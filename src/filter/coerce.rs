use serde_yaml::Value;
use std::cmp::Ordering;

const OBJECT_TEXT: &str = "[object Object]";

fn untag(v: &Value) -> &Value {
    match v {
        Value::Tagged(tagged) => untag(&tagged.value),
        other => other,
    }
}

pub fn to_text(v: &Value) -> String {
    match untag(v) {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() => number_text(f),
            _ => n.to_string(),
        },
        Value::String(s) => s.clone(),
        Value::Sequence(items) => items
            .iter()
            .map(|item| match untag(item) {
                Value::Null => String::new(),
                other => to_text(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Mapping(_) => OBJECT_TEXT.to_string(),
        Value::Tagged(_) => unreachable!("untag strips tags"),
    }
}

fn number_text(f: f64) -> String {
    if f.is_nan() {
        "NaN".to_string()
    } else if f.is_infinite() {
        let text = if f > 0.0 { "Infinity" } else { "-Infinity" };
        text.to_string()
    } else if f == 0.0 {
        "0".to_string()
    } else if f.abs() >= 1e21 || f.abs() < 1e-6 {
        exponent_text(f)
    } else if f.fract() == 0.0 {
        format!("{:.0}", f)
    } else {
        f.to_string()
    }
}

// `1e21` -> `1e+21`, `1.5e-7` stays as is.
fn exponent_text(f: f64) -> String {
    let text = format!("{:e}", f);
    match text.split_once('e') {
        Some((mantissa, exp)) if !exp.starts_with('-') => format!("{}e+{}", mantissa, exp),
        _ => text,
    }
}

pub fn to_number(v: &Value) -> f64 {
    match untag(v) {
        Value::Null => 0.0,
        Value::Bool(b) => f64::from(u8::from(*b)),
        Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        Value::String(s) => text_to_number(s),
        Value::Sequence(_) => text_to_number(&to_text(v)),
        Value::Mapping(_) => f64::NAN,
        Value::Tagged(_) => unreachable!("untag strips tags"),
    }
}

fn text_to_number(s: &str) -> f64 {
    let s = s.trim();
    match s {
        "" => 0.0,
        "Infinity" | "+Infinity" => f64::INFINITY,
        "-Infinity" => f64::NEG_INFINITY,
        _ => {
            let lower = s.to_ascii_lowercase();
            if lower.contains("inf") || lower.contains("nan") {
                return f64::NAN;
            }
            s.parse().unwrap_or(f64::NAN)
        }
    }
}

pub fn truthy(v: &Value) -> bool {
    match untag(v) {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Sequence(_) | Value::Mapping(_) => true,
        Value::Tagged(_) => unreachable!("untag strips tags"),
    }
}

/// Equality without coercion. Compound values never compare equal since
/// two parsed documents share no identity.
pub fn strict_eq(a: &Value, b: &Value) -> bool {
    match (untag(a), untag(b)) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Number(x), Value::Number(y)) => match (x.as_f64(), y.as_f64()) {
            (Some(x), Some(y)) => x == y,
            _ => false,
        },
        (Value::String(x), Value::String(y)) => x == y,
        _ => false,
    }
}

enum Primitive {
    Text(String),
    Number(f64),
}

fn to_primitive(v: &Value) -> Primitive {
    match untag(v) {
        Value::String(s) => Primitive::Text(s.clone()),
        Value::Sequence(_) | Value::Mapping(_) => Primitive::Text(to_text(v)),
        other => Primitive::Number(to_number(other)),
    }
}

pub fn loose_cmp(a: &Value, b: &Value) -> Option<Ordering> {
    match (to_primitive(a), to_primitive(b)) {
        (Primitive::Text(x), Primitive::Text(y)) => Some(x.cmp(&y)),
        (x, y) => {
            let x = primitive_number(x);
            let y = primitive_number(y);
            x.partial_cmp(&y)
        }
    }
}

fn primitive_number(p: Primitive) -> f64 {
    match p {
        Primitive::Text(s) => text_to_number(&s),
        Primitive::Number(n) => n,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_yaml::from_str;

    fn v(src: &str) -> Value {
        from_str(src).unwrap()
    }

    #[test]
    fn test_text_forms() {
        assert_eq!(to_text(&v("1.0")), "1");
        assert_eq!(to_text(&v("2.5")), "2.5");
        assert_eq!(to_text(&v("42")), "42");
        assert_eq!(to_text(&v("~")), "null");
        assert_eq!(to_text(&v("[a, ~, 3]")), "a,,3");
        assert_eq!(to_text(&v("{a: 1}")), "[object Object]");
    }

    #[test]
    fn test_number_text_edge_forms() {
        assert_eq!(to_text(&v("-0.0")), "0");
        assert_eq!(to_text(&v("1.0e21")), "1e+21");
        assert_eq!(to_text(&v("1.5e21")), "1.5e+21");
        assert_eq!(to_text(&v("1.0e-7")), "1e-7");
        assert_eq!(to_text(&v("0.000001")), "0.000001");
        assert_eq!(to_text(&v("123456.5")), "123456.5");
    }

    #[test]
    fn test_numbers_from_text() {
        assert_eq!(to_number(&v("\" 12 \"")), 12.0);
        assert_eq!(to_number(&v("\"\"")), 0.0);
        assert!(to_number(&v("\"abc\"")).is_nan());
        assert!(to_number(&v("\"nan\"")).is_nan());
        assert_eq!(to_number(&v("true")), 1.0);
        assert_eq!(to_number(&v("[7]")), 7.0);
    }

    #[test]
    fn test_truthiness() {
        assert!(!truthy(&v("0")));
        assert!(!truthy(&v("\"\"")));
        assert!(!truthy(&v("~")));
        assert!(truthy(&v("[]")));
        assert!(truthy(&v("\"0\"")));
    }

    #[test]
    fn test_strict_eq_does_not_coerce() {
        assert!(!strict_eq(&v("\"1\""), &v("1")));
        assert!(strict_eq(&v("1"), &v("1.0")));
        assert!(!strict_eq(&v("[1]"), &v("[1]")));
        assert!(!strict_eq(&v(".nan"), &v(".nan")));
    }

    #[test]
    fn test_loose_cmp() {
        assert_eq!(loose_cmp(&v("\"10\""), &v("\"9\"")), Some(Ordering::Less));
        assert_eq!(loose_cmp(&v("\"10\""), &v("9")), Some(Ordering::Greater));
        assert_eq!(loose_cmp(&v("\"x\""), &v("9")), None);
    }
}
