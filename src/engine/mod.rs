//! The classification, adjustment, grouping and aggregation engine.
//!
//! ```text
//! header + rows ─▶ classify ─▶ normalize_date_keys ─▶ group_by ─▶ reduce (per group) ─▶ rows
//!                                                                   └─ adjust once per total
//! ```
//!
//! Everything here is synchronous and works on borrowed input; nothing is mutated in place.

mod adjust;
mod classify;
mod group;
mod reduce;

pub use adjust::apply_adjustment;
pub use classify::classify;
pub use group::{group_by, normalize_date_keys, Group};
pub use reduce::{aggregate, numeric_columns, reduce, NumericColumn};
