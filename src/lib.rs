pub mod error;
pub mod filter;
pub mod frontmatter;
pub mod load;
pub mod vault;

pub use error::{Error, Result};
pub use filter::{apply_filters, Evaluator, Filter, FilterKind};
