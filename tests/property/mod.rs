//! Property-based tests for the runner-sync primitives.
//!
//! Run with: cargo test --test property_tests
//!
//! These tests use proptest to generate random inputs and verify that
//! invariants hold across all primitives.

pub mod pool;
