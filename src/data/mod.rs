//! Data structures for beta diversity analysis.

mod abundance_matrix;
mod abundance_table;
mod symmetric_matrix;

pub use abundance_matrix::{AbundanceMatrix, PresenceAbsenceMatrix};
pub use abundance_table::AbundanceTable;
pub use symmetric_matrix::{SymmetricMatrix, DISPLAY_PRECISION};
