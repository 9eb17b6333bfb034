//! metaquery-planner: decide what the store can answer
//!
//! A restriction is persisted when every property on its path is backed by
//! the store. The planner pushes persisted criteria down with resolved
//! [`StorePath`]s and join aliases, and leaves the rest, plus ordering and
//! pagination where necessary, for the in-memory engine.
//!
//! [`StorePath`]: metaquery_criteria::StorePath

mod error;
mod planner;

pub use error::{PlanError, Result};
pub use planner::{QueryPlan, QueryPlanner};
