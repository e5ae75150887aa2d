//! Integration tests for the gallery client.

mod browse_test;
mod helpers;
mod http_test;
mod session_test;
