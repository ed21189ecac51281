//! # Communications interface crate.
//!
//! Provides all common communications interfaces for the arm software: the telecommands carrying
//! operator intent into the executable and the drive demands it produces each cycle.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

pub mod tc;

/// Command and response definitions for equipment (like the joint drives)
pub mod eqpt;
