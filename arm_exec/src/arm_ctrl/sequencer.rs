//! Motion sequencer
//!
//! The sequencer runs choreographies, fixed lists of [`MotionPrimitive`]s
//! executed one after the other. At most one choreography runs at a time: a
//! request to start another while one is running is dropped, not queued, and
//! a running choreography can't be cancelled.
//!
//! ```text
//!              toggle / run
//!   +------+  ---------------->  +-------------------------+
//!   | Idle |                     | Running { phase_index } |--+ phase complete,
//!   +------+  <----------------  +-------------------------+<-+ next phase
//!               last phase
//!                complete
//! ```

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use comms_if::tc::arm_ctrl::Choreography;
use log::{debug, info};
use serde::Serialize;

use super::{
    ArmCtrlError, ChoreographyParams, MotionPrimitive, PrimitiveStatus, RobotChain,
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Runs choreographies made up of motion primitives.
#[derive(Debug, Clone)]
pub struct MotionSequencer {
    params: ChoreographyParams,

    /// Flip-flop deciding whether the next toggle picks or places.
    pick_requested: bool,

    /// The running choreography, `None` while idle.
    task: Option<AnimationTask>,
}

/// A running choreography.
#[derive(Debug, Clone, Serialize)]
pub struct AnimationTask {
    pub choreography: Choreography,
    phases: Vec<MotionPrimitive>,
    phase_index: usize,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Externally visible state of the sequencer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SequencerState {
    Idle,
    Running {
        choreography: Choreography,
        phase_index: usize,
    },
}

/// Result of asking the sequencer to start a choreography.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    Started(Choreography),

    /// A choreography was already running so the request was dropped.
    Ignored,
}

/// Notable things that happened while advancing the sequencer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequencerEvent {
    /// A phase finished and the next one will start on the next tick.
    PhaseComplete {
        choreography: Choreography,
        phase_index: usize,
    },

    /// The last phase finished, the sequencer is idle again.
    Finished(Choreography),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for MotionSequencer {
    fn default() -> Self {
        Self {
            params: ChoreographyParams::default(),
            pick_requested: false,
            task: None,
        }
    }
}

impl MotionSequencer {
    /// Create a new idle sequencer.
    ///
    /// Fails if any interpolation duration is not positive or the settle
    /// delay is negative.
    pub fn new(params: ChoreographyParams) -> Result<Self, ArmCtrlError> {
        for d in [
            params.torso_rotate_duration_s,
            params.lift_duration_s,
            params.rest_duration_s,
        ]
        .iter()
        {
            if !(*d > 0.0) {
                return Err(ArmCtrlError::InvalidDuration(*d));
            }
        }
        if !(params.gripper_settle_s >= 0.0) {
            return Err(ArmCtrlError::InvalidDuration(params.gripper_settle_s));
        }

        Ok(Self {
            params,
            pick_requested: false,
            task: None,
        })
    }

    pub fn state(&self) -> SequencerState {
        match self.task {
            Some(ref t) => SequencerState::Running {
                choreography: t.choreography,
                phase_index: t.phase_index,
            },
            None => SequencerState::Idle,
        }
    }

    /// The running choreography, if any.
    pub fn task(&self) -> Option<&AnimationTask> {
        self.task.as_ref()
    }

    /// True while a choreography is running.
    pub fn is_animating(&self) -> bool {
        self.task.is_some()
    }

    /// Handle the toggle trigger.
    ///
    /// Only accepted while idle, in which case the pick/place flip-flop is
    /// flipped and the matching choreography started. While running the
    /// trigger is dropped and the flip-flop left alone.
    pub fn toggle(&mut self, chain: &RobotChain) -> StartOutcome {
        if self.is_animating() {
            debug!("Toggle ignored, a choreography is already running");
            return StartOutcome::Ignored;
        }

        self.pick_requested = !self.pick_requested;

        let choreography = match self.pick_requested {
            true => Choreography::Pick,
            false => Choreography::Place,
        };

        self.start(choreography, chain)
    }

    /// Start the given choreography if idle, without touching the toggle.
    pub fn start(&mut self, choreography: Choreography, chain: &RobotChain) -> StartOutcome {
        if self.is_animating() {
            debug!("{} ignored, a choreography is already running", choreography);
            return StartOutcome::Ignored;
        }

        info!("Starting {} choreography", choreography);

        self.task = Some(AnimationTask {
            choreography,
            phases: self.build_phases(choreography, chain.len()),
            phase_index: 0,
        });

        StartOutcome::Started(choreography)
    }

    /// Advance the running choreography by one tick.
    ///
    /// Does nothing while idle.
    pub fn advance(&mut self, chain: &mut RobotChain, dt_s: f64) -> Option<SequencerEvent> {
        let task = self.task.as_mut()?;

        let status = match task.phases.get_mut(task.phase_index) {
            Some(phase) => phase.advance(chain, dt_s),
            None => PrimitiveStatus::Complete,
        };

        if status == PrimitiveStatus::Running {
            return None;
        }

        let choreography = task.choreography;
        let completed_index = task.phase_index;
        task.phase_index += 1;

        if task.phase_index >= task.phases.len() {
            info!("{} choreography complete", choreography);
            self.task = None;
            Some(SequencerEvent::Finished(choreography))
        } else {
            debug!(
                "{} phase {} complete, starting phase {}",
                choreography, completed_index, task.phase_index
            );
            Some(SequencerEvent::PhaseComplete {
                choreography,
                phase_index: completed_index,
            })
        }
    }

    fn build_phases(&self, choreography: Choreography, chain_len: usize) -> Vec<MotionPrimitive> {
        let p = &self.params;

        match choreography {
            Choreography::Pick => vec![
                MotionPrimitive::rotate_joint(
                    p.torso_index,
                    p.pick_torso_target,
                    p.torso_rotate_duration_s,
                ),
                MotionPrimitive::move_to_pose(p.lift_pose.clone(), p.lift_duration_s),
                MotionPrimitive::gripper_actuate(
                    p.gripper_closed.0,
                    p.gripper_closed.1,
                    p.gripper_settle_s,
                ),
                MotionPrimitive::gripper_actuate(
                    p.gripper_open.0,
                    p.gripper_open.1,
                    p.gripper_settle_s,
                ),
            ],
            Choreography::Place => vec![
                MotionPrimitive::move_to_pose(vec![0.0; chain_len], p.rest_duration_s),
                MotionPrimitive::rotate_joint(
                    p.torso_index,
                    p.place_torso_target,
                    p.torso_rotate_duration_s,
                ),
            ],
            Choreography::PickAndLift => vec![
                MotionPrimitive::move_to_pose(p.pick_and_lift_pose.clone(), p.lift_duration_s),
                MotionPrimitive::gripper_actuate(
                    p.gripper_closed.0,
                    p.gripper_closed.1,
                    p.gripper_settle_s,
                ),
                MotionPrimitive::gripper_actuate(
                    p.gripper_open.0,
                    p.gripper_open.1,
                    p.gripper_settle_s,
                ),
            ],
        }
    }
}

impl AnimationTask {
    /// Index of the phase currently running.
    pub fn phase_index(&self) -> usize {
        self.phase_index
    }

    pub fn num_phases(&self) -> usize {
        self.phases.len()
    }
}
