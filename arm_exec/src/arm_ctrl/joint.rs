//! Runtime state of a single joint

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use comms_if::eqpt::mech::{ControlType, DriveDem};
use serde::{Deserialize, Serialize};

use super::DriveLimits;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Control parameters shared by every joint in a chain.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlParams {
    /// The control mode all joints shall run in.
    pub mode: ControlType,

    /// Drive stiffness applied by position control.
    pub stiffness: f64,

    /// Drive damping applied by position control.
    pub damping: f64,

    /// Default rate at which a joint's target moves under operator input.
    ///
    /// Units: degrees/second (revolute), millimeters/second (prismatic)
    pub speed: f64,

    /// Units: Nm or N
    pub torque: f64,

    /// Units: degrees/second^2 (revolute), millimeters/second^2 (prismatic)
    pub acceleration: f64,

    /// Friction applied to every joint when the chain is built.
    pub joint_friction: f64,

    /// Angular damping applied to every joint when the chain is built.
    pub angular_damping: f64,
}

/// The parameters currently held by a joint's drive.
///
/// Control mode parameters are only written when the applied mode changes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DriveState {
    /// Mode whose parameters were last applied, `None` until the first tick.
    pub applied_mode: Option<ControlType>,
    pub stiffness: f64,
    pub damping: f64,
    pub force_limit: f64,
    pub joint_friction: f64,
    pub angular_damping: f64,
}

/// Mutable runtime state of one joint.
#[derive(Debug, Clone, Serialize)]
pub struct JointState {
    /// Position of the joint in its chain
    pub index: usize,

    /// Human readable name of the joint
    pub name: String,

    /// Static limits of the joint's drive
    pub limits: DriveLimits,

    /// The drive target.
    ///
    /// While the joint's motion is limited the target always lies within
    /// `[lower_limit, upper_limit]`.
    pub(crate) target: f64,

    /// Direction the joint is being driven by the operator
    pub direction: Direction,

    /// Mode the joint shall be controlled in
    pub control_mode: ControlType,

    /// Stiffness to apply for the control mode
    pub stiffness: f64,

    /// Damping to apply for the control mode
    pub damping: f64,

    /// Rate at which the target moves under operator input
    pub speed: f64,

    /// Units: Nm (revolute) or N (prismatic)
    pub torque: f64,

    /// Units: degrees/second^2 (revolute), millimeters/second^2 (prismatic)
    pub acceleration: f64,

    /// The drive itself
    pub drive: DriveState,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Direction in which the operator is driving a joint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    None,
    Positive,
    Negative,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for ControlParams {
    fn default() -> Self {
        Self {
            mode: ControlType::PositionControl,
            stiffness: 10_000.0,
            damping: 100.0,
            speed: 5.0,
            torque: 100.0,
            acceleration: 5.0,
            joint_friction: 10.0,
            angular_damping: 10.0,
        }
    }
}

impl Default for Direction {
    fn default() -> Self {
        Direction::None
    }
}

impl Direction {
    /// Direction demanded by an axis value, only the sign matters.
    pub fn from_axis(axis_value: f64) -> Self {
        if axis_value > 0.0 {
            Direction::Positive
        } else if axis_value < 0.0 {
            Direction::Negative
        } else {
            Direction::None
        }
    }

    /// The sign of the direction, as a multiplier on the joint's speed.
    pub fn signum(self) -> f64 {
        match self {
            Direction::None => 0.0,
            Direction::Positive => 1.0,
            Direction::Negative => -1.0,
        }
    }
}

impl JointState {
    /// Create a new joint at rest with a zero target.
    ///
    /// The force limit, friction and angular damping are written onto the
    /// drive immediately, control mode parameters wait for the first tick.
    pub fn new(
        index: usize,
        name: String,
        limits: DriveLimits,
        speed: f64,
        control: &ControlParams,
    ) -> Self {
        let (target, _) = limits.constrain(0.0);

        Self {
            index,
            name,
            limits,
            target,
            direction: Direction::None,
            control_mode: control.mode,
            stiffness: control.stiffness,
            damping: control.damping,
            speed,
            torque: control.torque,
            acceleration: control.acceleration,
            drive: DriveState {
                applied_mode: None,
                stiffness: 0.0,
                damping: 0.0,
                force_limit: limits.force_limit(),
                joint_friction: control.joint_friction,
                angular_damping: control.angular_damping,
            },
        }
    }

    /// The current drive target.
    pub fn target(&self) -> f64 {
        self.target
    }

    /// Set the drive target, constraining it to the joint's travel.
    ///
    /// Returns true if the target had to be limited.
    pub fn set_target(&mut self, target: f64) -> bool {
        let (target, limited) = self.limits.constrain(target);
        self.target = target;
        limited
    }

    /// Request a control mode along with the parameters the mode applies.
    ///
    /// The drive is only updated on the next actuator tick.
    pub fn request_control(&mut self, control: &ControlParams) {
        self.control_mode = control.mode;
        self.stiffness = control.stiffness;
        self.damping = control.damping;
    }

    /// True if the drive does not yet run in the requested control mode.
    pub fn control_mode_pending(&self) -> bool {
        self.drive.applied_mode != Some(self.control_mode)
    }

    /// Write the requested control mode's static parameters onto the drive.
    pub fn apply_control_mode(&mut self) {
        match self.control_mode {
            ControlType::PositionControl => {
                self.drive.stiffness = self.stiffness;
                self.drive.damping = self.damping;
            }
        }

        self.drive.applied_mode = Some(self.control_mode);
    }

    /// The demand to send to this joint's drive.
    pub fn drive_dem(&self) -> DriveDem {
        DriveDem {
            target: self.target,
            stiffness: self.drive.stiffness,
            damping: self.drive.damping,
            force_limit: self.drive.force_limit,
        }
    }

    /// Label used when displaying the joint, `name (index)`.
    pub fn label(&self) -> String {
        format!("{} ({})", self.name, self.index)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::arm_ctrl::{JointKind, MotionLock};

    fn joint(lower: f64, upper: f64) -> JointState {
        let limits =
            DriveLimits::new(0, JointKind::Revolute, MotionLock::Limited, lower, upper, 50.0)
                .unwrap();
        JointState::new(0, String::from("torso"), limits, 5.0, &ControlParams::default())
    }

    #[test]
    fn test_direction_from_axis() {
        assert_eq!(Direction::from_axis(0.3), Direction::Positive);
        assert_eq!(Direction::from_axis(-1.0), Direction::Negative);
        assert_eq!(Direction::from_axis(0.0), Direction::None);
        assert_eq!(Direction::from_axis(-0.0), Direction::None);
        assert_eq!(Direction::Negative.signum(), -1.0);
    }

    #[test]
    fn test_new_joint() {
        let j = joint(-90.0, 90.0);
        assert_eq!(j.target(), 0.0);
        assert_eq!(j.drive.force_limit, 50.0);
        assert_eq!(j.drive.joint_friction, 10.0);
        assert_eq!(j.speed, 5.0);
        assert_eq!(j.torque, 100.0);
        assert_eq!(j.acceleration, 5.0);
        assert!(j.control_mode_pending());
        assert_eq!(j.label(), "torso (0)");

        // A zero target outside the travel starts at the nearest limit
        let j = joint(10.0, 20.0);
        assert_eq!(j.target(), 10.0);
    }

    #[test]
    fn test_set_target_limits() {
        let mut j = joint(-90.0, 90.0);
        assert!(j.set_target(120.0));
        assert_eq!(j.target(), 90.0);
        assert!(!j.set_target(-45.0));
        assert_eq!(j.target(), -45.0);
    }

    #[test]
    fn test_apply_control_mode() {
        let mut j = joint(-90.0, 90.0);
        j.apply_control_mode();

        assert!(!j.control_mode_pending());
        assert_eq!(j.drive.stiffness, ControlParams::default().stiffness);
        assert_eq!(j.drive.damping, ControlParams::default().damping);
        assert_eq!(j.drive_dem().stiffness, j.drive.stiffness);
    }
}
