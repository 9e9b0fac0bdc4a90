//! Tests for the token record repository contract
