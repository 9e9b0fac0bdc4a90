//! Tests for the identity repository contract
