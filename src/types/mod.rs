//! Type definitions for the fraud check

pub mod transaction;
pub mod verdict;

pub use transaction::{Coordinates, Gender, TransactionInput};
pub use verdict::{CheckOutcome, Verdict};
