//! Algol 68 mode checking and coercion insertion.
//!
//! Two passes over one compilation unit:
//!
//! - **Mode check** ([`ModeCheckPass`]): derives the mode every unit yields,
//!   checks it against the context it stands in and records what each unit
//!   is required to yield
//! - **Coercion insertion** ([`CoercionInserter`]): copies the tree, making
//!   every coercion the check pass allowed an explicit node
//!
//! ## Modules
//!
//! - [`coercion`]: coercibility predicates and mismatch explanations
//! - [`balance`]: common modes of clause branches, united modes
//! - [`operators`]: operator identification with its promotion fallbacks
//! - [`check`]: the mode-check walk
//! - [`insert`]: the coercion-insertion walk
//! - [`tables`]: side tables passed from one walk to the next

pub mod balance;
pub mod check;
pub mod coercion;
pub mod insert;
pub mod operators;
mod options;
mod soid;
pub mod tables;

pub use balance::{balance, get_balanced_mode, make_united_mode};
pub use check::{CheckOutput, ModeCheckPass};
pub use coercion::{explain, is_coercible, is_equal};
pub use insert::{CoercionInserter, InsertOutput};
pub use operators::{OperatorMatch, find_operator};
pub use options::CheckerOptions;
pub use soid::Soid;
pub use tables::{CallShape, SideTables};
