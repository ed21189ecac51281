//! # Arm library.
//!
//! This library allows other crates in the workspace, and the benchmarks, to access items defined
//! inside the arm executable crate.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Arm control module - converts operator intent and choreographies into joint drive demands
pub mod arm_ctrl;

/// Global data store for the executable
pub mod data_store;

/// Executable parameters
pub mod params;

/// Telecommand processor - routes telecommands to the modules that handle them
pub mod tc_processor;

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Target period of one cycle.
pub const CYCLE_PERIOD_S: f64 = 0.02;

/// Number of cycles per second
pub const CYCLE_FREQUENCY_HZ: f64 = 1.0 / CYCLE_PERIOD_S;
