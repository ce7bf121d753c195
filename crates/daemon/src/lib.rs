#![forbid(unsafe_code)]

//! Daily task rotation daemon: flat-file stores behind a JSON HTTP API.

pub mod config;
pub mod http;
pub mod service;
pub mod store;
