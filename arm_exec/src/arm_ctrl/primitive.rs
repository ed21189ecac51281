//! Motion primitives
//!
//! A primitive is a small timed task which writes joint targets once per
//! tick. Primitives are cooperative: each call to `advance` performs one
//! tick's worth of work and returns, carrying its elapsed time over to the
//! next call.
//!
//! All interpolating primitives share one law. With `e` the time accumulated
//! over every call and `D` the primitive's duration, progress is
//! `t = clamp(e / D, 0, 1)` and each covered joint's target is
//! `start + (end - start) * t`, with `start` captured on the first call. At
//! `t == 1` the target is exactly `end`.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Serialize;
use util::maths::{lerp, progress};

use super::{RobotChain, PROGRESS_TOLERANCE_S};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Interpolate a single joint from its current target to `target`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RotateJoint {
    pub joint_index: usize,
    pub target: f64,
    pub duration_s: f64,
    start: Option<f64>,
    elapsed_s: f64,
}

/// Interpolate every joint covered by `targets` simultaneously, so that they
/// all arrive together.
///
/// Joint `i` is covered if `i` is below both the length of `targets` and the
/// length of the chain, all other joints are left untouched.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoveToPose {
    pub targets: Vec<f64>,
    pub duration_s: f64,
    start: Option<Vec<f64>>,
    elapsed_s: f64,
}

/// Set the gripper fingers, the last two joints in the chain, straight to
/// their targets and then wait for them to settle.
///
/// The targets are held for the whole settle delay, every tick rewrites them.
///
/// On a chain with fewer than two joints nothing is written, but the settle
/// delay is still observed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GripperActuate {
    pub left: f64,
    pub right: f64,
    pub settle_s: f64,
    elapsed_s: f64,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// A single step of a choreography.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum MotionPrimitive {
    RotateJoint(RotateJoint),
    MoveToPose(MoveToPose),
    GripperActuate(GripperActuate),
}

/// Whether a primitive needs further ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveStatus {
    Running,
    Complete,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl MotionPrimitive {
    pub fn rotate_joint(joint_index: usize, target: f64, duration_s: f64) -> Self {
        MotionPrimitive::RotateJoint(RotateJoint {
            joint_index,
            target,
            duration_s,
            start: None,
            elapsed_s: 0.0,
        })
    }

    pub fn move_to_pose(targets: Vec<f64>, duration_s: f64) -> Self {
        MotionPrimitive::MoveToPose(MoveToPose {
            targets,
            duration_s,
            start: None,
            elapsed_s: 0.0,
        })
    }

    pub fn gripper_actuate(left: f64, right: f64, settle_s: f64) -> Self {
        MotionPrimitive::GripperActuate(GripperActuate {
            left,
            right,
            settle_s,
            elapsed_s: 0.0,
        })
    }

    /// Perform one tick of the primitive.
    pub fn advance(&mut self, chain: &mut RobotChain, dt_s: f64) -> PrimitiveStatus {
        match self {
            MotionPrimitive::RotateJoint(p) => p.advance(chain, dt_s),
            MotionPrimitive::MoveToPose(p) => p.advance(chain, dt_s),
            MotionPrimitive::GripperActuate(p) => p.advance(chain, dt_s),
        }
    }

    /// Time accumulated by the primitive so far.
    pub fn elapsed_s(&self) -> f64 {
        match self {
            MotionPrimitive::RotateJoint(p) => p.elapsed_s,
            MotionPrimitive::MoveToPose(p) => p.elapsed_s,
            MotionPrimitive::GripperActuate(p) => p.elapsed_s,
        }
    }
}

impl RotateJoint {
    fn advance(&mut self, chain: &mut RobotChain, dt_s: f64) -> PrimitiveStatus {
        if self.start.is_none() {
            self.start = chain.target(self.joint_index);
        }

        self.elapsed_s += dt_s;
        let t = progress(self.elapsed_s, self.duration_s, PROGRESS_TOLERANCE_S);

        if let Some(start) = self.start {
            chain.set_target(self.joint_index, lerp(start, self.target, t));
        }

        status_from_progress(t)
    }
}

impl MoveToPose {
    fn advance(&mut self, chain: &mut RobotChain, dt_s: f64) -> PrimitiveStatus {
        if self.start.is_none() {
            let covered = self.targets.len().min(chain.len());
            self.start = Some((0..covered).filter_map(|i| chain.target(i)).collect());
        }

        self.elapsed_s += dt_s;
        let t = progress(self.elapsed_s, self.duration_s, PROGRESS_TOLERANCE_S);

        if let Some(ref start) = self.start {
            for (i, (s, e)) in start.iter().zip(self.targets.iter()).enumerate() {
                chain.set_target(i, lerp(*s, *e, t));
            }
        }

        status_from_progress(t)
    }
}

impl GripperActuate {
    fn advance(&mut self, chain: &mut RobotChain, dt_s: f64) -> PrimitiveStatus {
        let len = chain.len();
        if len >= 2 {
            chain.set_target(len - 2, self.left);
            chain.set_target(len - 1, self.right);
        }

        self.elapsed_s += dt_s;

        status_from_progress(progress(
            self.elapsed_s,
            self.settle_s,
            PROGRESS_TOLERANCE_S,
        ))
    }
}

fn status_from_progress(t: f64) -> PrimitiveStatus {
    if t >= 1.0 {
        PrimitiveStatus::Complete
    } else {
        PrimitiveStatus::Running
    }
}
