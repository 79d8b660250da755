//! Driftline library crate — re-exports all modules for integration testing.
//!
//! The binary crate (`main.rs`) is the playable demo. This library crate
//! exposes the same modules so that `tests/` integration tests can drive the
//! fishing engine without needing a window or GPU.

pub mod shared;
pub mod input;
pub mod boat;
pub mod fishing;
pub mod ui;
