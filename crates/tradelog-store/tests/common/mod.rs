//! Shared helpers for store integration tests.

pub mod mock_http;
