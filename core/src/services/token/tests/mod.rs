//! Tests for the token signer and refresh token generator
