//! Abstract interfaces between the lookup engine and its collaborators
//!
//! Traits are pure interfaces here; implementations live in the std crate.

pub mod lookup;
pub mod outcome;

pub use lookup::{ExposureLookup, PostcodeSource};
pub use outcome::{LookupOutcome, LookupStatus};
