//! fitboard-stats - Numeric helpers for the fitboard dashboard
//!
//! This crate holds the small amount of arithmetic the dashboard does itself:
//!
//! - **Transform**: natural-log derived series with non-finite values dropped
//! - **Summary**: count, missing, mean, spread and range of a series
//! - **Normal plot**: sorted values against standard normal quantiles, the
//!   data behind each variable's distribution panel
//!
//! Model fitting is not done here; it belongs to the remote modeling service.

pub mod normal;
pub mod summary;
pub mod transform;

pub use normal::*;
pub use summary::*;
pub use transform::*;
