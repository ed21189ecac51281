//! Parameters structure for ArmCtrl

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

use super::{ControlParams, JointKind, MotionLock};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for Arm control.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Params {
    // ---- CONTROL ----
    /// Control parameters shared by every joint.
    #[serde(default)]
    pub control: ControlParams,

    /// Joint selected when the module starts, wrapped onto the chain.
    #[serde(default = "default_initial_selected_index")]
    pub initial_selected_index: i64,

    // ---- GEOMETRY ----
    /// The joints of the arm in chain order, base first. The last two joints
    /// are the gripper's left and right fingers.
    pub joints: Vec<JointDesc>,

    // ---- CHOREOGRAPHY ----
    /// Targets and timings of the choreographies.
    #[serde(default)]
    pub choreography: ChoreographyParams,
}

/// Description of a single joint, as enumerated at startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JointDesc {
    pub name: String,

    pub kind: JointKind,

    pub lock: MotionLock,

    /// Units: degrees (revolute) or millimeters (prismatic)
    pub lower_limit: f64,

    /// Units: degrees (revolute) or millimeters (prismatic)
    pub upper_limit: f64,

    /// Units: Nm (revolute) or N (prismatic)
    pub force_limit: f64,

    /// Rate at which the target moves under operator input, if different to
    /// the shared control speed.
    #[serde(default)]
    pub speed: Option<f64>,
}

/// Targets and timings used to build choreographies.
///
/// Units: degrees and seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChoreographyParams {
    /// Index of the torso joint rotated by the pick and place choreographies.
    pub torso_index: usize,

    /// Torso target when picking.
    pub pick_torso_target: f64,

    /// Torso target when placing.
    pub place_torso_target: f64,

    /// Time taken for either torso rotation.
    pub torso_rotate_duration_s: f64,

    /// Pose the arm is lifted into when picking.
    pub lift_pose: Vec<f64>,

    /// Time taken to lift into `lift_pose` or `pick_and_lift_pose`.
    pub lift_duration_s: f64,

    /// Pose used by the pick and lift choreography.
    pub pick_and_lift_pose: Vec<f64>,

    /// Time taken to lower every joint to zero when placing.
    pub rest_duration_s: f64,

    /// Gripper (left, right) targets when closed.
    pub gripper_closed: (f64, f64),

    /// Gripper (left, right) targets when open.
    pub gripper_open: (f64, f64),

    /// Wait after each gripper actuation before the next phase.
    pub gripper_settle_s: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for Params {
    fn default() -> Self {
        Self {
            control: ControlParams::default(),
            initial_selected_index: default_initial_selected_index(),
            joints: Vec::new(),
            choreography: ChoreographyParams::default(),
        }
    }
}

impl Default for ChoreographyParams {
    fn default() -> Self {
        Self {
            torso_index: 1,
            pick_torso_target: -180.0,
            place_torso_target: 0.0,
            torso_rotate_duration_s: 1.0,
            lift_pose: vec![0.0, -180.0, 30.0, -45.0, 0.0, 0.0, 0.0],
            lift_duration_s: 1.5,
            pick_and_lift_pose: vec![0.0, 30.0, -45.0, 0.0, 0.0, 0.0],
            rest_duration_s: 1.5,
            gripper_closed: (-10.0, 10.0),
            gripper_open: (0.0, 0.0),
            gripper_settle_s: 0.5,
        }
    }
}

fn default_initial_selected_index() -> i64 {
    1
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_load_params() {
        let params: Params = util::params::from_str(
            r#"
            initial_selected_index = 2

            [control]
            speed = 10.0

            [[joints]]
            name = "base"
            kind = "Fixed"
            lock = "Limited"
            lower_limit = 0.0
            upper_limit = 0.0
            force_limit = 0.0

            [[joints]]
            name = "torso"
            kind = "Revolute"
            lock = "Limited"
            lower_limit = -180.0
            upper_limit = 180.0
            force_limit = 1000.0
            speed = 20.0

            [choreography]
            torso_index = 0
            gripper_settle_s = 0.25
            "#,
        )
        .unwrap();

        assert_eq!(params.initial_selected_index, 2);
        assert_eq!(params.control.speed, 10.0);
        assert_eq!(params.control.torque, ControlParams::default().torque);
        assert_eq!(params.joints.len(), 2);
        assert_eq!(params.joints[0].kind, JointKind::Fixed);
        assert_eq!(params.joints[0].speed, None);
        assert_eq!(params.joints[1].speed, Some(20.0));
        assert_eq!(params.choreography.torso_index, 0);
        assert_eq!(params.choreography.gripper_settle_s, 0.25);
        assert_eq!(params.choreography.lift_duration_s, 1.5);
    }

    #[test]
    fn test_shipped_params() {
        let params: Params =
            util::params::from_str(include_str!("../../../params/arm_ctrl.toml")).unwrap();

        assert_eq!(params.joints.len(), 7);
        assert_eq!(params.joints[5].kind, JointKind::Prismatic);
        assert_eq!(params.joints[4].lock, MotionLock::Free);
        assert_eq!(params.choreography, ChoreographyParams::default());
        assert_eq!(params.control, ControlParams::default());
    }
}
