use chrono::{DateTime, Local};
use serde_yaml::Value;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterKind {
    String,
    Array,
    Existence,
    MinDate,
    MaxDate,
    DateRange,
    MinNumber,
    MaxNumber,
    Strict,
    LaxTrue,
    LaxFalse,
    ChildAttr,
    ChildArrayAttr,
    Unknown(String),
}

impl FilterKind {
    pub const AVAILABLE: &'static [&'static str] = &[
        "childAttr",
        "childArrayAttr",
        "existence",
        "string",
        "array",
        "minDate",
        "maxDate",
        "dateRange",
        "minNum",
        "minNumber",
        "maxNumber",
        "maxNum",
        "strict",
        "laxTrue",
        "laxFalse",
    ];

    pub fn from_name(name: &str) -> Self {
        match name {
            "string" => Self::String,
            "array" => Self::Array,
            "existence" => Self::Existence,
            "minDate" => Self::MinDate,
            "maxDate" => Self::MaxDate,
            "dateRange" => Self::DateRange,
            "minNum" | "minNumber" => Self::MinNumber,
            "maxNum" | "maxNumber" => Self::MaxNumber,
            "strict" => Self::Strict,
            "laxTrue" => Self::LaxTrue,
            "laxFalse" => Self::LaxFalse,
            "childAttr" => Self::ChildAttr,
            "childArrayAttr" => Self::ChildArrayAttr,
            other => Self::Unknown(other.to_string()),
        }
    }

    pub fn allows_missing_value(&self) -> bool {
        matches!(
            self,
            Self::LaxTrue | Self::LaxFalse | Self::ChildAttr | Self::ChildArrayAttr
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub field: Option<String>,
    pub check: Check,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Check {
    Inert,
    Contains(String),
    OneOf(Choices),
    MinDate(Option<DateTime<Local>>),
    MaxDate(Option<DateTime<Local>>),
    DateRange(DateRange),
    MinNumber(Value),
    MaxNumber(Value),
    Strict(Value),
    LaxTrue,
    LaxFalse,
    /// `None` when the operand is neither a boolean nor a one-element
    /// list holding a boolean.
    Existence(Option<bool>),
    ChildAttr(Option<Box<Filter>>),
    ChildArrayAttr(Option<Box<Filter>>),
    Unknown(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Choices {
    Any,
    Members(Vec<Value>),
    Substring(String),
    /// Operand that is neither a list nor text; passes any defined value.
    Unusable,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DateRange {
    Today,
    Yesterday,
    SevenDays,
    Month,
    LastMonth,
    Custom {
        from: Option<DateTime<Local>>,
        until: Option<DateTime<Local>>,
    },
    Any,
    Unknown(String),
}

impl DateRange {
    pub fn from_name(name: &str) -> Self {
        match name {
            "today" => Self::Today,
            "yesterday" => Self::Yesterday,
            "7days" => Self::SevenDays,
            "month" => Self::Month,
            "last_month" => Self::LastMonth,
            "_any" => Self::Any,
            other => Self::Unknown(other.to_string()),
        }
    }
}
