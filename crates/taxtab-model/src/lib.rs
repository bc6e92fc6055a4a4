//! Canonical data model for taxonomic profiles.
//!
//! Every supported classifier report is reduced to a [`standard_profile`]
//! (taxonomy identifier plus count); merged results are described by the
//! [`observation`] schemas. Validators return [`SchemaError`] describing
//! the first violation found.

pub mod error;
pub mod observation;
pub mod sample;
pub mod standard_profile;

pub use error::{Result, SchemaError};
pub use sample::Sample;
