//! Collapse long-format taxon tables into sample × group matrices.

mod group;

pub use group::{aggregate_by_group, is_invalid_group, AggregateConfig, DEFAULT_INVALID_GROUPS};
