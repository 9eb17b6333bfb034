//! metaquery-criteria: the logical query model
//!
//! A [`Query`] is a tree of [`Criterion`] values combined under a root
//! [`JunctionType`], plus ordering and a pagination window:
//!
//! ```text
//! Query (root: AND)
//! ├── Restriction  level : eq(2)
//! ├── Disjunction
//! │   ├── Restriction  id   : eq("abc")
//! │   └── Restriction  name : ilike("clinic", anywhere)
//! └── orders: name iasc
//! ```
//!
//! Every [`Operator`] can be tested against an in-memory [`Value`] and can be
//! lowered to a native [`StorePredicate`] for a backing store.
//!
//! [`Value`]: metaquery_schema::Value

mod error;
mod junction;
mod operator;
mod order;
mod predicate;
mod query;
mod restriction;

pub use error::OperatorError;
pub use junction::{Criterion, Junction, JunctionType};
pub use operator::{
    is_empty_value, token_match, Between, Empty, Equal, GreaterEqual, GreaterThan, In, LessEqual,
    LessThan, Like, MatchMode, NotEmpty, NotEqual, NotNull, Null, Operator, Token,
};
pub use order::{Direction, Order};
pub use predicate::{StorePath, StorePredicate};
pub use query::{Alias, Defaults, Pagination, Query};
pub use restriction::Restriction;
