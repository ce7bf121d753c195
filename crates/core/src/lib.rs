#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! Shared models and selection logic for the daily task rotation service.

pub mod api;
pub mod model;
pub mod policy;
