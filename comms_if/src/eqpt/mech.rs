//! # Mechanisms Equipment Demands

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Demands sent to the joint drives, one entry per joint in chain order.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct DriveDems {
    pub drives: Vec<DriveDem>,
}

/// The demand for a single joint drive.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq)]
pub struct DriveDem {
    /// The setpoint the drive shall converge towards.
    ///
    /// Units: degrees for revolute joints, millimeters for prismatic joints.
    pub target: f64,

    /// Drive spring stiffness applied by the active control mode.
    pub stiffness: f64,

    /// Drive damping applied by the active control mode.
    pub damping: f64,

    /// Maximum force (or torque) the drive may exert.
    pub force_limit: f64,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// How a joint drive interprets its demands.
///
/// Every motion primitive only ever writes the drive target, so new variants (velocity or torque
/// control) may be added without touching the interpolation code.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlType {
    /// The drive tracks `target` as a position using its stiffness and damping.
    PositionControl,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Default for ControlType {
    fn default() -> Self {
        ControlType::PositionControl
    }
}

impl DriveDems {
    /// Return just the targets of every drive, in chain order.
    pub fn targets(&self) -> Vec<f64> {
        self.drives.iter().map(|d| d.target).collect()
    }
}
