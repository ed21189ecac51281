//! # Arm control telecommands

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use crate::eqpt::mech::ControlType;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Operator intent handled by arm control.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ArmCmd {
    /// Focus the joint at the given index. Any integer is accepted, it is wrapped onto the chain.
    SelectJoint(i64),

    /// Focus the next joint in the chain, wrapping to the first.
    SelectNext,

    /// Focus the previous joint in the chain, wrapping to the last.
    SelectPrev,

    /// Set the operator's axis value. Positive values drive the focused joint in the positive
    /// direction, negative values in the negative direction, and zero holds it.
    ///
    /// The value is held until the next `Axis` or `Stop` command.
    Axis(f64),

    /// The toggle trigger was pressed. Alternates between the pick and place choreographies.
    Toggle,

    /// Start the given choreography without affecting the toggle.
    Run(Choreography),

    /// Change the control mode shared by all joints.
    SetControlMode(ControlType),

    /// Zero the held axis value so the focused joint stops.
    Stop,
}

/// Named choreographies the motion sequencer can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Choreography {
    /// Rotate the torso round, lift the arm and cycle the gripper.
    Pick,

    /// Lower the arm to rest and rotate the torso back.
    Place,

    /// Lift the arm and cycle the gripper without rotating the torso.
    PickAndLift,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Display for Choreography {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Choreography::Pick => write!(f, "Pick"),
            Choreography::Place => write!(f, "Place"),
            Choreography::PickAndLift => write!(f, "PickAndLift"),
        }
    }
}
