//! Command line interface for standardising and merging taxonomic
//! profiles.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod pipeline;
pub mod summary;
pub mod types;
