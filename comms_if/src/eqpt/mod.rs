//! # Equipment Interface
//!
//! This module defines the interface structures which are handed to the equipment driving the
//! physical (or simulated) joints.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

pub mod mech;
