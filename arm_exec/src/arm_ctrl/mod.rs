//! Arm control module
//!
//! Arm control turns operator intent into drive targets for every joint of
//! the manipulator. Each cycle it:
//!
//! 1. Applies joint selection and the held axis value to the [`RobotChain`],
//! 2. Advances every actuated joint's target with the [`JointActuator`],
//! 3. Advances the [`MotionSequencer`], whose choreographies overwrite the
//!    targets of the joints they manage while running.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod actuator;
mod chain;
mod joint;
mod limits;
mod params;
mod primitive;
mod sequencer;
mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
pub use actuator::*;
pub use chain::*;
pub use joint::*;
pub use limits::*;
pub use params::*;
pub use primitive::*;
pub use sequencer::*;
pub use state::*;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Elapsed time within this many seconds of a primitive's duration counts as
/// the primitive being complete.
pub const PROGRESS_TOLERANCE_S: f64 = 1e-9;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors that can occur during ArmCtrl operation.
#[derive(Debug, thiserror::Error)]
pub enum ArmCtrlError {
    #[error("Failed to load ArmCtrl parameters: {0}")]
    ParamLoadError(#[from] util::params::LoadError),

    #[error(
        "Joint {index} has an invalid travel range, lower limit {lower} is above upper limit {upper}"
    )]
    InvalidLimits { index: usize, lower: f64, upper: f64 },

    #[error("Joint {index} has a non-finite travel limit")]
    NonFiniteLimits { index: usize },

    #[error("Motion primitive duration must be positive, found {0} s")]
    InvalidDuration(f64),
}
