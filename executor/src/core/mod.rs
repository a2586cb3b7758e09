//! Pure request/response logic for action dispatch.
//!
//! Core modules must be free of I/O side effects. They operate on in-memory
//! data and return deterministic outputs suitable for tests.

pub mod action;
pub mod request;
pub mod types;
