//! Helpers shared across modules

pub mod glob;
