//! Integration tests against mocked HTTP endpoints.

pub mod client;
