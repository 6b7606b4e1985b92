//! Data profiling primitives for understanding abundance matrix characteristics.

mod abundance;

pub use abundance::{profile_matrix, MatrixProfile};
