//! Discrete local-search model core with a weighted MAX-SAT model.
//!
//! [`model::MaxSat`] keeps one satisfaction counter per clause so that the
//! cost change of flipping a variable is computed from that variable's
//! clauses only. Drivers program against [`model::StateModel`].

pub mod cnf;
pub mod error;
pub mod model;
pub mod rng;

pub use error::{ModelError, Result};
