//! metaquery-parser: filter and order strings to a [`Query`]
//!
//! ```text
//! ["level:eq:2", "name:like:Clinic"]  ──parse──▶  Query (AND)
//!                                                  ├── level : eq(2)
//! ["name:iasc"]  ──parse_orders──▶  [Order]        └── name  : like("Clinic")
//! ```
//!
//! Values are converted according to each property's declared type, so a
//! filter on an integer property fails here rather than in the store.
//!
//! [`Query`]: metaquery_criteria::Query

mod convert;
mod diagnostic;
mod error;
mod filter;
mod order;
mod token;

pub use convert::{convert, convert_list};
pub use diagnostic::render_diagnostic;
pub use error::{FilterPart, QueryParserError, Result};
pub use filter::{QueryParser, IDENTIFIABLE, QUERY_PATH};
pub use order::{parse_order, parse_orders};
pub use token::OperatorToken;
