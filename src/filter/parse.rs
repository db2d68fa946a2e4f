use super::ast::{Check, Choices, DateRange, Filter, FilterKind};
use super::coerce::{to_text, truthy};
use super::dates::{end_of_day, to_instant};
use serde::{Deserialize, Deserializer};
use serde_yaml::{Mapping, Value};

const ANY: &str = "_any";

impl Filter {
    pub fn from_value(doc: &Value) -> Filter {
        let Some(map) = doc.as_mapping() else {
            return Filter {
                field: None,
                check: Check::Inert,
            };
        };

        let kind = match map.get("type") {
            Some(Value::String(name)) => FilterKind::from_name(name),
            Some(other) => FilterKind::Unknown(to_text(other)),
            None => FilterKind::Unknown(String::new()),
        };
        let field = map.get("field").map(to_text);
        let value = map.get("value");
        let data = map.get("data");

        let check = match value {
            None if !kind.allows_missing_value() => Check::Inert,
            _ => build_check(kind, value, data),
        };

        Filter { field, check }
    }

    pub fn new(kind: &str, field: &str, value: Value) -> Filter {
        let mut doc = Mapping::new();
        doc.insert("type".into(), kind.into());
        doc.insert("field".into(), field.into());
        doc.insert("value".into(), value);
        Filter::from_value(&Value::Mapping(doc))
    }
}

fn build_check(kind: FilterKind, value: Option<&Value>, data: Option<&Value>) -> Check {
    let operand = value.cloned().unwrap_or(Value::Null);

    match kind {
        FilterKind::String => Check::Contains(to_text(&operand).to_lowercase()),
        FilterKind::Array => Check::OneOf(array_choices(&operand)),
        FilterKind::MinDate => Check::MinDate(to_instant(&operand)),
        FilterKind::MaxDate => Check::MaxDate(to_instant(&operand)),
        FilterKind::DateRange => Check::DateRange(date_range(&operand, data)),
        FilterKind::MinNumber => Check::MinNumber(operand),
        FilterKind::MaxNumber => Check::MaxNumber(operand),
        FilterKind::Strict => Check::Strict(operand),
        FilterKind::LaxTrue => Check::LaxTrue,
        FilterKind::LaxFalse => Check::LaxFalse,
        FilterKind::Existence => Check::Existence(existence_flag(&operand)),
        FilterKind::ChildAttr => Check::ChildAttr(child(data)),
        FilterKind::ChildArrayAttr => Check::ChildArrayAttr(child(data)),
        FilterKind::Unknown(name) => Check::Unknown(name),
    }
}

fn array_choices(operand: &Value) -> Choices {
    match operand {
        Value::String(s) if s == ANY => Choices::Any,
        Value::String(s) => Choices::Substring(s.clone()),
        Value::Sequence(items) => match items.first() {
            Some(Value::String(first)) if first == ANY => Choices::Any,
            _ => Choices::Members(items.clone()),
        },
        other => {
            tracing::warn!(value = %to_text(other), "Filter of type array needs a list of values. Ignoring filter.");
            Choices::Unusable
        }
    }
}

fn existence_flag(operand: &Value) -> Option<bool> {
    match operand {
        Value::Bool(b) => Some(*b),
        Value::Sequence(items) if items.len() == 1 => items[0].as_bool(),
        _ => None,
    }
}

fn date_range(operand: &Value, data: Option<&Value>) -> DateRange {
    match operand {
        Value::String(name) if name == "custom" => {
            let bound = |key: &str| data.and_then(|d| d.get(key)).and_then(to_instant);
            DateRange::Custom {
                from: bound("from"),
                until: bound("until").and_then(end_of_day),
            }
        }
        Value::String(name) => DateRange::from_name(name),
        other => DateRange::Unknown(to_text(other)),
    }
}

fn child(data: Option<&Value>) -> Option<Box<Filter>> {
    let child = data?.get("child")?;
    if !truthy(child) {
        return None;
    }
    Some(Box::new(Filter::from_value(child)))
}

impl<'de> Deserialize<'de> for Filter {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let doc = Value::deserialize(deserializer)?;
        Ok(Filter::from_value(&doc))
    }
}
