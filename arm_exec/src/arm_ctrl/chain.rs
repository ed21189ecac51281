//! Ordered chain of joints making up the manipulator

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use comms_if::eqpt::mech::{ControlType, DriveDems};
use log::debug;

use super::{
    ActuatorTick, ArmCtrlError, ControlParams, Direction, DriveLimits, JointActuator, JointDesc,
    JointState,
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The joints of the manipulator in chain order, base first.
///
/// Only one joint accepts operator direction at a time, the focused joint.
/// Focus is addressed with wrap-around indexing so any integer selects a
/// valid joint while the chain is non-empty. An empty chain turns every
/// selection and tick into a no-op.
#[derive(Debug, Default, Clone)]
pub struct RobotChain {
    joints: Vec<JointState>,

    /// Control parameters shared by all joints
    control: ControlParams,

    /// The joint currently selected by the operator
    selected_index: usize,

    /// The joint which last accepted a direction
    previous_index: usize,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl RobotChain {
    /// Build a chain from the joint enumeration.
    ///
    /// Joints without their own speed use the shared control speed.
    pub fn new(
        descs: &[JointDesc],
        control: ControlParams,
        initial_selected_index: i64,
    ) -> Result<Self, ArmCtrlError> {
        let mut joints = Vec::with_capacity(descs.len());

        for (index, desc) in descs.iter().enumerate() {
            let limits = DriveLimits::new(
                index,
                desc.kind,
                desc.lock,
                desc.lower_limit,
                desc.upper_limit,
                desc.force_limit,
            )?;

            joints.push(JointState::new(
                index,
                desc.name.clone(),
                limits,
                desc.speed.unwrap_or(control.speed),
                &control,
            ));
        }

        let mut chain = Self {
            joints,
            control,
            selected_index: 0,
            previous_index: 0,
        };

        if let Some(i) = chain.normalize_index(initial_selected_index) {
            chain.selected_index = i;
            chain.previous_index = i;
        }

        Ok(chain)
    }

    /// Number of joints in the chain
    pub fn len(&self) -> usize {
        self.joints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.joints.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&JointState> {
        self.joints.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut JointState> {
        self.joints.get_mut(index)
    }

    pub fn joints(&self) -> &[JointState] {
        &self.joints
    }

    pub fn control(&self) -> &ControlParams {
        &self.control
    }

    /// Index of the joint currently selected by the operator.
    pub fn selected_index(&self) -> usize {
        self.selected_index
    }

    /// The currently selected joint, `None` only for an empty chain.
    pub fn selected(&self) -> Option<&JointState> {
        self.joints.get(self.selected_index)
    }

    /// Drive targets of every joint, in chain order.
    pub fn targets(&self) -> Vec<f64> {
        self.joints.iter().map(|j| j.target()).collect()
    }

    /// Target of joint `index`, or `None` if there is no such joint.
    pub fn target(&self, index: usize) -> Option<f64> {
        self.joints.get(index).map(|j| j.target())
    }

    /// Set the target of joint `index`, constrained to its travel.
    ///
    /// Returns `None` if there is no such joint, otherwise whether the target
    /// was limited.
    pub fn set_target(&mut self, index: usize, target: f64) -> Option<bool> {
        self.joints.get_mut(index).map(|j| j.set_target(target))
    }

    /// Wrap any requested index onto the chain.
    ///
    /// Returns `None` for an empty chain, otherwise an index in `[0, len)`
    /// for which `normalize_index(r) == normalize_index(r + len)`.
    pub fn normalize_index(&self, requested: i64) -> Option<usize> {
        if self.joints.is_empty() {
            return None;
        }

        let len = self.joints.len() as i64;
        Some(requested.rem_euclid(len) as usize)
    }

    /// Select the joint at `requested`, wrapping around the chain.
    pub fn select_joint(&mut self, requested: i64) {
        if let Some(i) = self.normalize_index(requested) {
            if i != self.selected_index {
                debug!("Selected joint {}", i);
            }
            self.selected_index = i;
        }
    }

    /// Select the next joint along the chain, wrapping to the base.
    pub fn select_next(&mut self) {
        self.select_joint(self.selected_index as i64 + 1)
    }

    /// Select the previous joint along the chain, wrapping to the end.
    pub fn select_prev(&mut self) {
        self.select_joint(self.selected_index as i64 - 1)
    }

    /// Set the direction of joint `index` from an axis value.
    ///
    /// If the joint that last accepted a direction is a different one its
    /// direction is reset to `None` first, so that only one joint moves under
    /// operator input. The joint also picks up the shared control mode if it
    /// isn't already using it.
    pub fn select_direction(&mut self, index: i64, axis_value: f64) {
        let index = match self.normalize_index(index) {
            Some(i) => i,
            None => return,
        };

        if self.previous_index != index {
            if let Some(previous) = self.joints.get_mut(self.previous_index) {
                previous.direction = Direction::None;
            }
            self.previous_index = index;
        }

        let control = self.control;
        if let Some(current) = self.joints.get_mut(index) {
            if current.control_mode != control.mode {
                current.request_control(&control);
            }
            current.direction = Direction::from_axis(axis_value);
        }
    }

    /// Set the control mode shared by all joints.
    ///
    /// Each joint picks the mode up when it next receives a direction.
    pub fn set_control_mode(&mut self, mode: ControlType) {
        self.control.mode = mode;
    }

    /// Stop all operator driven motion.
    pub fn clear_directions(&mut self) {
        for joint in self.joints.iter_mut() {
            joint.direction = Direction::None;
        }
    }

    /// Run the actuator on every non-fixed joint, in index order.
    ///
    /// Returns the result of each joint's tick, in chain order. Fixed joints
    /// report a default (untouched) tick.
    pub fn tick_all(&mut self, dt_s: f64) -> Vec<ActuatorTick> {
        self.joints
            .iter_mut()
            .map(|j| JointActuator::tick(j, dt_s))
            .collect()
    }

    /// Demands for every joint's drive, in chain order.
    pub fn drive_dems(&self) -> DriveDems {
        DriveDems {
            drives: self.joints.iter().map(|j| j.drive_dem()).collect(),
        }
    }
}
