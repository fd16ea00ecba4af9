//! Validators for raw OED cell values
//!
//! Pure functions with no I/O. Each takes an already-extracted cell value
//! and either normalises it or reports that it cannot be used.

pub mod bounds;
pub mod codes;
pub mod parsing;

pub use bounds::{validate_lat_long, BoundingBox};
pub use codes::{is_valid_gnaf, parse_peril_codes, Jurisdiction};
pub use parsing::{parse_bool, parse_float, parse_integer, sanitize_year_built};
