//! In-memory reductions used by the aggregator and the column profiler.
//!
//! - [`reduce_group()`]: apply a [`ReduceOp`] to one column of a group of rows
//! - [`reduce_values()`]: apply a [`ReduceOp`] to a stream of numbers
//! - [`quantile_sorted()`]: linear-interpolated percentile of sorted values
//!
//! ```rust
//! use data_explorer::processing::{reduce_group, ReduceOp};
//! use data_explorer::types::Cell;
//!
//! let rows = vec![
//!     vec![Cell::from("a"), Cell::Num(10.0)],
//!     vec![Cell::from("b"), Cell::Null],
//!     vec![Cell::from("c"), Cell::Num(20.0)],
//! ];
//! assert_eq!(reduce_group(&rows, 1, ReduceOp::Mean), Some(15.0));
//! assert_eq!(reduce_group(&rows, 1, ReduceOp::Count), Some(3.0));
//! ```

pub mod reduce;

pub use reduce::{ReduceOp, quantile_sorted, reduce_group, reduce_values};
