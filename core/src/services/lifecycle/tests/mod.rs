//! Tests for the token lifecycle service

mod service_tests;
