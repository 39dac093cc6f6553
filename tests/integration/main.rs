//! Integration tests for the client
//!
//! These tests use wiremock to stand in for the API and web hosts and drive
//! the client through the real `reqwest` transport.

mod client_tests;
mod comment_tests;
mod support;
