#![no_std]

//! RF Oasis Core - definitions shared by the keys lookup and the loss stream
//!
//! This crate provides the pure, I/O-free pieces of the Oasis complex-model
//! bridge: the grouped loss stream wire format, the quadtree grid used for
//! point location, the canonical exposure enumerations and the validators
//! applied to raw OED cells.

#[cfg(feature = "alloc")]
extern crate alloc;

pub mod error;
pub mod format;
pub mod model;
#[cfg(feature = "alloc")]
pub mod quadtree;
pub mod traits;
pub mod validation;

pub use error::*;
pub use format::*;
pub use model::*;
#[cfg(feature = "alloc")]
pub use quadtree::{GridCell, NodeId, QuadTree};
pub use traits::*;
