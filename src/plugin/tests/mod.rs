//! Plugin System Tests
//!
//! Activation tests with mock plugin implementations.


#[cfg(test)]
pub mod activation_tests;
