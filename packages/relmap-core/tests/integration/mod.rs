//! Integration test suite.
//!
//! 1. End-to-end entity mapping from class descriptors
//! 2. Property and column casting
//! 3. Declarative mapping discovery
//! 4. Configuration and engine bootstrap
//! 5. Metadata manager registries

pub mod casting_tests;
pub mod config_tests;
pub mod discovery_tests;
pub mod end_to_end_tests;
pub mod helpers;
pub mod manager_tests;
