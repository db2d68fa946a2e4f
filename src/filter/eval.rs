use super::ast::{Check, Choices, Filter};
use super::coerce::{loose_cmp, strict_eq, to_text, truthy};
use super::dates::{to_instant, window};
use chrono::{Local, NaiveDate};
use serde_yaml::Value;
use std::cmp::Ordering;

#[derive(Debug, Clone)]
pub struct Evaluator {
    today: NaiveDate,
    skip_undefined: bool,
    max_depth: Option<usize>,
}

impl Default for Evaluator {
    fn default() -> Self {
        Self {
            today: Local::now().date_naive(),
            skip_undefined: true,
            max_depth: None,
        }
    }
}

impl Evaluator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn skip_undefined(mut self, skip: bool) -> Self {
        self.skip_undefined = skip;
        self
    }

    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    pub fn apply<'a>(&self, filters: &[Filter], values: &'a Value) -> Vec<&'a Value> {
        self.retain(filters, records_of(values))
    }

    pub fn retain<'a, I>(&self, filters: &[Filter], records: I) -> Vec<&'a Value>
    where
        I: IntoIterator<Item = &'a Value>,
    {
        records
            .into_iter()
            .filter(|record| self.matches(filters, record))
            .collect()
    }

    pub fn matches(&self, filters: &[Filter], record: &Value) -> bool {
        filters.iter().all(|f| self.check(f, record, 0))
    }

    fn check(&self, filter: &Filter, record: &Value, depth: usize) -> bool {
        let Some(field) = filter.field.as_deref() else {
            return true;
        };
        if filter.check == Check::Inert {
            return true;
        }

        let Some(value) = lookup(record, field) else {
            return match filter.check {
                Check::Existence(demanded) => demanded != Some(true),
                _ => self.skip_undefined,
            };
        };

        match &filter.check {
            Check::Inert => true,
            Check::Contains(needle) => to_text(value).to_lowercase().contains(needle.as_str()),
            Check::OneOf(choices) => match choices {
                Choices::Any | Choices::Unusable => true,
                Choices::Members(members) => members.iter().any(|m| strict_eq(m, value)),
                Choices::Substring(haystack) => haystack.contains(to_text(value).as_str()),
            },
            Check::MinDate(bound) => match (bound, to_instant(value)) {
                (Some(bound), Some(d)) => *bound <= d,
                _ => true,
            },
            Check::MaxDate(bound) => match (bound, to_instant(value)) {
                (Some(bound), Some(d)) => *bound >= d,
                _ => true,
            },
            Check::DateRange(range) => window(range, self.today).contains(to_instant(value)),
            Check::MinNumber(bound) => loose_cmp(value, bound) != Some(Ordering::Less),
            Check::MaxNumber(bound) => loose_cmp(value, bound) != Some(Ordering::Greater),
            Check::Strict(expected) => strict_eq(value, expected),
            Check::LaxTrue => truthy(value),
            Check::LaxFalse => !truthy(value),
            Check::Existence(demanded) => match demanded {
                Some(false) => is_blank(value),
                Some(true) => !is_empty_text(value),
                None => true,
            },
            Check::ChildAttr(child) => {
                let Some(child) = child else {
                    tracing::warn!(field, "Filter has childAttr type but no data set. Ignoring filter.");
                    return true;
                };
                if !self.descend(field, depth) {
                    return true;
                }
                self.check(child, value, depth + 1)
            }
            Check::ChildArrayAttr(child) => {
                let Some(child) = child else {
                    tracing::warn!(field, "Filter has childArrayAttr type but no data set. Ignoring filter.");
                    return true;
                };
                if self.skip_undefined && child_len(value).unwrap_or(0) == 0 {
                    return true;
                }
                if !self.descend(field, depth) {
                    return true;
                }
                self.any_child_matches(child, value, depth + 1)
            }
            Check::Unknown(kind) => {
                tracing::warn!(kind = %kind, field, "Filter type not implemented. Ignoring filter.");
                true
            }
        }
    }

    fn descend(&self, field: &str, depth: usize) -> bool {
        match self.max_depth {
            Some(max) if depth >= max => {
                tracing::warn!(field, max_depth = max, "Child filter nested too deeply. Ignoring filter.");
                false
            }
            _ => true,
        }
    }

    fn any_child_matches(&self, child: &Filter, value: &Value, depth: usize) -> bool {
        if let Value::String(s) = value {
            return s
                .chars()
                .any(|c| self.check(child, &Value::String(c.to_string()), depth));
        }
        records_of(value).any(|record| self.check(child, record, depth))
    }
}

pub fn apply_filters<'a>(
    filters: &[Filter],
    values: &'a Value,
    skip_undefined: bool,
) -> Vec<&'a Value> {
    Evaluator::new()
        .skip_undefined(skip_undefined)
        .apply(filters, values)
}

fn records_of(values: &Value) -> Box<dyn Iterator<Item = &Value> + '_> {
    match values {
        Value::Sequence(items) => Box::new(items.iter()),
        Value::Mapping(map) => Box::new(map.values()),
        Value::Tagged(tagged) => records_of(&tagged.value),
        _ => Box::new(std::iter::empty()),
    }
}

fn lookup<'a>(record: &'a Value, field: &str) -> Option<&'a Value> {
    match record {
        Value::Mapping(map) => map.get(field).or_else(|| {
            map.iter()
                .find(|(key, _)| !key.is_string() && to_text(key) == field)
                .map(|(_, value)| value)
        }),
        Value::Sequence(items) => field.parse::<usize>().ok().and_then(|i| items.get(i)),
        Value::Tagged(tagged) => lookup(&tagged.value, field),
        _ => None,
    }
}

fn child_len(value: &Value) -> Option<usize> {
    match value {
        Value::Sequence(items) => Some(items.len()),
        Value::String(s) => Some(s.chars().count()),
        _ => None,
    }
}

fn is_blank(value: &Value) -> bool {
    value.is_null() || is_empty_text(value)
}

fn is_empty_text(value: &Value) -> bool {
    value.as_str() == Some("")
}
