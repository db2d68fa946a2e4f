pub mod ast;
pub mod coerce;
pub mod dates;
pub mod eval;
pub mod parse;

pub use ast::{Check, Choices, DateRange, Filter, FilterKind};
pub use eval::{apply_filters, Evaluator};
