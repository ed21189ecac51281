//! # Arm Executable Parameters
//!
//! This module provide parameters for the arm executable.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArmExecParams {
    /// Minimum level of log records, one of `info`, `debug` or `trace`
    pub log_level: String,

    /// Per module log levels, keyed by module path (e.g. `arm_lib::arm_ctrl`)
    #[serde(default)]
    pub module_log_levels: HashMap<String, String>,

    /// If true the executable keeps running after the end of the script until no choreography is
    /// running
    #[serde(default = "default_true")]
    pub wait_for_sequencer: bool,

    /// Number of consecutive cycle overruns after which safe mode is engaged
    pub max_consec_cycle_overruns: u64,
}

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

fn default_true() -> bool {
    true
}
