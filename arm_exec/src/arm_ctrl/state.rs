//! Implementations for the ArmCtrl state structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, info, trace, warn};
use serde::{Deserialize, Serialize};

// Internal
use super::{
    ArmCtrlError, MotionSequencer, Params, RobotChain, SequencerEvent, SequencerState,
    StartOutcome,
};
use comms_if::{
    eqpt::mech::DriveDems,
    tc::arm_ctrl::{ArmCmd, Choreography},
};
use util::{module::State, params, session::Session};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Arm control module state
#[derive(Debug, Default)]
pub struct ArmCtrl {
    pub(crate) params: Params,

    pub(crate) report: StatusReport,

    pub(crate) chain: RobotChain,

    pub(crate) sequencer: MotionSequencer,

    /// The operator's axis value, held between `Axis` commands.
    pub(crate) axis_value: f64,

    /// While safe operator commands are rejected and no joint moves under
    /// operator input.
    pub(crate) safe: bool,
}

/// Input data to Arm Control.
#[derive(Default)]
pub struct InputData {
    /// Operator commands received since the last cycle, in arrival order.
    pub cmds: Vec<ArmCmd>,
}

/// Status report for ArmCtrl processing.
#[derive(Clone, Default, Serialize, Deserialize, Debug, PartialEq)]
pub struct StatusReport {
    pub selected_index: usize,

    /// Display label of the selected joint, `name (index)`.
    pub selected_label: String,

    /// True while a choreography is running.
    pub animating: bool,

    pub choreography: Option<Choreography>,

    pub phase_index: Option<usize>,

    /// Per joint, true if the operator drove the target into a travel limit
    /// this cycle.
    pub abs_pos_limited: Vec<bool>,

    /// True if a toggle or run request was dropped this cycle because a
    /// choreography was already running.
    pub toggle_ignored: bool,

    pub safe: bool,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl State for ArmCtrl {
    type InitData = &'static str;
    type InitError = ArmCtrlError;

    type InputData = InputData;
    type OutputData = DriveDems;
    type StatusReport = StatusReport;
    type ProcError = ArmCtrlError;

    /// Initialise the ArmCtrl module.
    ///
    /// Expected init data is the path to the parameter file
    fn init(
        &mut self,
        init_data: Self::InitData,
        _session: &Session,
    ) -> Result<(), Self::InitError> {
        let params: Params = params::load(init_data)?;

        *self = Self::from_params(params)?;

        info!(
            "ArmCtrl initialised with {} joints, {} selected",
            self.chain.len(),
            self.report.selected_label
        );

        Ok(())
    }

    /// Perform cyclic processing of Arm Control.
    fn proc(
        &mut self,
        input_data: &Self::InputData,
    ) -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError> {
        // Clear the status report
        self.report = StatusReport::default();

        // Selection, axis and mode changes take effect immediately, starting
        // choreographies waits until the operator direction has been applied
        let mut start_requests = Vec::new();

        for cmd in input_data.cmds.iter() {
            if self.safe {
                warn!("ArmCtrl is safe, ArmCmd::{:?} rejected", cmd);
                continue;
            }

            debug!("New ArmCtrl ArmCmd::{:?}", cmd);

            match cmd {
                ArmCmd::SelectJoint(i) => self.chain.select_joint(*i),
                ArmCmd::SelectNext => self.chain.select_next(),
                ArmCmd::SelectPrev => self.chain.select_prev(),
                ArmCmd::Axis(v) => {
                    if v.is_finite() {
                        self.axis_value = *v
                    } else {
                        warn!("Non-finite axis value {} treated as zero", v);
                        self.axis_value = 0.0;
                    }
                }
                ArmCmd::Stop => self.axis_value = 0.0,
                ArmCmd::SetControlMode(mode) => self.chain.set_control_mode(*mode),
                ArmCmd::Toggle => start_requests.push(None),
                ArmCmd::Run(c) => start_requests.push(Some(*c)),
            }
        }

        // Drive the selected joint from the held axis
        self.chain
            .select_direction(self.chain.selected_index() as i64, self.axis_value);

        for request in start_requests {
            let outcome = match request {
                None => self.sequencer.toggle(&self.chain),
                Some(c) => self.sequencer.start(c, &self.chain),
            };

            if outcome == StartOutcome::Ignored {
                self.report.toggle_ignored = true;
            }
        }

        // Operator motion first, a running choreography overwrites the
        // targets it manages
        let ticks = self.chain.tick_all(crate::CYCLE_PERIOD_S);
        self.report.abs_pos_limited = ticks.iter().map(|t| t.limited).collect();

        if let Some(SequencerEvent::Finished(c)) =
            self.sequencer.advance(&mut self.chain, crate::CYCLE_PERIOD_S)
        {
            debug!("ArmCtrl {} finished, operator control resumed", c);
        }

        self.update_report();

        let output = self.chain.drive_dems();
        trace!("ArmCtrl targets: {:?}", output.targets());

        Ok((output, self.report.clone()))
    }
}

impl ArmCtrl {
    /// Build the module from already loaded parameters.
    pub fn from_params(params: Params) -> Result<Self, ArmCtrlError> {
        let chain = RobotChain::new(
            &params.joints,
            params.control,
            params.initial_selected_index,
        )?;
        let sequencer = MotionSequencer::new(params.choreography.clone())?;

        let mut arm_ctrl = Self {
            params,
            report: StatusReport::default(),
            chain,
            sequencer,
            axis_value: 0.0,
            safe: false,
        };
        arm_ctrl.update_report();

        Ok(arm_ctrl)
    }

    /// Function called when entering safe mode.
    ///
    /// Operator driven motion stops immediately and further commands are
    /// rejected until [`ArmCtrl::make_unsafe`]. A running choreography can't
    /// be cancelled and so runs to completion.
    pub fn make_safe(&mut self) {
        self.safe = true;
        self.axis_value = 0.0;
        self.chain.clear_directions();

        if self.sequencer.is_animating() {
            warn!("ArmCtrl made safe while a choreography is running, it will complete");
        }
    }

    /// Leave safe mode, accepting operator commands again.
    pub fn make_unsafe(&mut self) {
        self.safe = false;
    }

    pub fn chain(&self) -> &RobotChain {
        &self.chain
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn is_animating(&self) -> bool {
        self.sequencer.is_animating()
    }

    /// The most recent status report.
    pub fn report(&self) -> &StatusReport {
        &self.report
    }

    fn update_report(&mut self) {
        self.report.selected_index = self.chain.selected_index();
        self.report.selected_label = self
            .chain
            .selected()
            .map(|j| j.label())
            .unwrap_or_default();
        self.report.animating = self.sequencer.is_animating();
        self.report.safe = self.safe;

        match self.sequencer.state() {
            SequencerState::Idle => {
                self.report.choreography = None;
                self.report.phase_index = None;
            }
            SequencerState::Running {
                choreography,
                phase_index,
            } => {
                self.report.choreography = Some(choreography);
                self.report.phase_index = Some(phase_index);
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::arm_ctrl::{
        chain::test::arm_descs, ChoreographyParams, ControlParams, JointDesc, JointKind,
        MotionLock,
    };

    /// Cycles in one second
    const CYCLES_PER_S: usize = 50;

    fn arm_ctrl() -> ArmCtrl {
        ArmCtrl::from_params(Params {
            joints: arm_descs(),
            ..Params::default()
        })
        .unwrap()
    }

    fn step(a: &mut ArmCtrl, cmds: Vec<ArmCmd>) -> (DriveDems, StatusReport) {
        a.proc(&InputData { cmds }).unwrap()
    }

    fn step_n(a: &mut ArmCtrl, n: usize) -> (DriveDems, StatusReport) {
        let mut out = step(a, vec![]);
        for _ in 1..n {
            out = step(a, vec![]);
        }
        out
    }

    fn assert_targets_near(actual: &[f64], expected: &[f64]) {
        assert_eq!(actual.len(), expected.len());
        for (a, e) in actual.iter().zip(expected.iter()) {
            assert!((a - e).abs() < 1e-9, "{:?} != {:?}", actual, expected);
        }
    }

    #[test]
    fn test_initial_report() {
        let a = arm_ctrl();
        assert_eq!(a.report().selected_index, 1);
        assert_eq!(a.report().selected_label, "torso (1)");
        assert!(!a.report().animating);
    }

    #[test]
    fn test_operator_drive() {
        let mut a = arm_ctrl();

        // 5 deg/s for one second
        let (dems, _) = step(&mut a, vec![ArmCmd::SelectJoint(2), ArmCmd::Axis(1.0)]);
        assert!((dems.drives[2].target - 0.1).abs() < 1e-12);
        let (dems, _) = step_n(&mut a, CYCLES_PER_S - 1);
        assert!((dems.drives[2].target - 5.0).abs() < 1e-9);

        // The drive picked up the control mode on the first tick
        assert_eq!(dems.drives[2].stiffness, ControlParams::default().stiffness);

        // Changing selection stops the previous joint
        let (dems, report) = step(&mut a, vec![ArmCmd::SelectNext]);
        assert_eq!(report.selected_index, 3);
        assert!((dems.drives[2].target - 5.0).abs() < 1e-9);
        assert!(dems.drives[3].target > 0.0);

        let (before, _) = step(&mut a, vec![ArmCmd::Stop]);
        let (after, _) = step_n(&mut a, 10);
        assert_eq!(before, after);
    }

    #[test]
    fn test_limit_reported() {
        let mut a = arm_ctrl();
        step(&mut a, vec![ArmCmd::SelectJoint(5), ArmCmd::Axis(-1.0)]);

        // 20 mm of travel at 5 per second
        let (dems, report) = step_n(&mut a, 4 * CYCLES_PER_S + 1);
        assert_eq!(dems.drives[5].target, -20.0);
        assert!(report.abs_pos_limited[5]);
        assert!(!report.abs_pos_limited[4]);
    }

    #[test]
    fn test_toggle_ignored_while_animating() {
        let mut a = arm_ctrl();

        let (_, report) = step(&mut a, vec![ArmCmd::Toggle]);
        assert!(report.animating);
        assert_eq!(report.choreography, Some(Choreography::Pick));
        assert!(!report.toggle_ignored);

        let (_, report) = step(&mut a, vec![ArmCmd::Toggle]);
        assert!(report.toggle_ignored);
        assert_eq!(report.choreography, Some(Choreography::Pick));
    }

    #[test]
    fn test_safe_mode() {
        let mut a = arm_ctrl();
        step(&mut a, vec![ArmCmd::Axis(1.0)]);

        a.make_safe();
        let (before, report) = step(&mut a, vec![]);
        assert!(report.safe);

        // Commands are rejected while safe
        let (after, report) = step(&mut a, vec![ArmCmd::Axis(1.0), ArmCmd::Toggle]);
        assert_eq!(before, after);
        assert!(!report.animating);

        a.make_unsafe();
        let (_, report) = step(&mut a, vec![ArmCmd::Toggle]);
        assert!(report.animating);

        // Safe mode does not cancel the choreography
        a.make_safe();
        let (_, report) = step(&mut a, vec![]);
        assert!(report.animating);
    }

    #[test]
    fn test_gripper_overrides_held_axis() {
        let mut a = arm_ctrl();

        // Hold the left finger open for the whole pick
        step(
            &mut a,
            vec![ArmCmd::SelectJoint(5), ArmCmd::Axis(1.0), ArmCmd::Toggle],
        );
        let (dems, _) = step_n(&mut a, CYCLES_PER_S - 1);
        assert!((dems.drives[5].target - 5.0).abs() < 1e-9);

        // The lift pose covers the finger and lands on it exactly
        let (dems, report) = step_n(&mut a, 75);
        assert_eq!(report.phase_index, Some(2));
        assert_eq!(dems.drives[5].target, 0.0);

        // Closed for the whole settle delay
        let (dems, _) = step(&mut a, vec![]);
        assert_eq!(dems.drives[5].target, -10.0);
        for _ in 0..24 {
            let (dems, _) = step(&mut a, vec![]);
            assert_eq!(dems.drives[5].target, -10.0);
            assert_eq!(dems.drives[6].target, 10.0);
        }

        // Open for the whole settle delay
        for _ in 0..25 {
            let (dems, _) = step(&mut a, vec![]);
            assert_eq!(dems.drives[5].target, 0.0);
        }

        // The operator gets the finger back once the pick is over
        let (dems, report) = step(&mut a, vec![]);
        assert!(!report.animating);
        assert!((dems.drives[5].target - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_pose_overrides_held_axis() {
        let mut a = arm_ctrl();

        step(
            &mut a,
            vec![
                ArmCmd::SelectJoint(2),
                ArmCmd::Axis(-1.0),
                ArmCmd::Run(Choreography::PickAndLift),
            ],
        );

        // Halfway through the lift the shoulder follows the interpolation,
        // not the operator
        let (dems, _) = step_n(&mut a, 37);
        assert!(dems.drives[2].target > 0.0);

        let (dems, report) = step_n(&mut a, 37);
        assert_eq!(report.phase_index, Some(1));
        assert_eq!(dems.drives[2].target, 30.0);
    }

    /// Seven joints with the torso first and the gripper last.
    fn torso_first_params() -> Params {
        let revolute = |name: &str, lower: f64, upper: f64| JointDesc {
            name: name.to_string(),
            kind: JointKind::Revolute,
            lock: MotionLock::Limited,
            lower_limit: lower,
            upper_limit: upper,
            force_limit: 1000.0,
            speed: None,
        };

        Params {
            joints: vec![
                revolute("torso", -180.0, 180.0),
                revolute("shoulder", -180.0, 180.0),
                revolute("upper_arm", -90.0, 90.0),
                revolute("elbow", -135.0, 135.0),
                revolute("wrist", -180.0, 180.0),
                JointDesc {
                    kind: JointKind::Prismatic,
                    ..revolute("finger_left", -20.0, 20.0)
                },
                JointDesc {
                    kind: JointKind::Prismatic,
                    ..revolute("finger_right", -20.0, 20.0)
                },
            ],
            initial_selected_index: 0,
            choreography: ChoreographyParams {
                torso_index: 0,
                ..ChoreographyParams::default()
            },
            ..Params::default()
        }
    }

    #[test]
    fn test_pick_then_place() {
        let mut a = ArmCtrl::from_params(torso_first_params()).unwrap();

        // Rotate the torso round
        step(&mut a, vec![ArmCmd::Toggle]);
        let (dems, report) = step_n(&mut a, CYCLES_PER_S - 1);
        assert_eq!(dems.drives[0].target, -180.0);
        assert_eq!(report.phase_index, Some(1));

        // Lift
        let (dems, _) = step_n(&mut a, 75);
        assert_targets_near(
            &dems.targets(),
            &[0.0, -180.0, 30.0, -45.0, 0.0, 0.0, 0.0],
        );

        // Close the gripper then wait for it to settle
        let (dems, report) = step(&mut a, vec![]);
        assert_eq!(dems.drives[5].target, -10.0);
        assert_eq!(dems.drives[6].target, 10.0);
        assert_eq!(report.phase_index, Some(2));
        let (dems, report) = step_n(&mut a, 24);
        assert_eq!(dems.drives[5].target, -10.0);
        assert_eq!(report.phase_index, Some(3));

        // Open it and settle
        let (dems, _) = step(&mut a, vec![]);
        assert_eq!(dems.drives[5].target, 0.0);
        assert_eq!(dems.drives[6].target, 0.0);
        let (_, report) = step_n(&mut a, 24);
        assert!(!report.animating);

        // Place returns everything to rest
        let (_, report) = step(&mut a, vec![ArmCmd::Toggle]);
        assert_eq!(report.choreography, Some(Choreography::Place));
        let (dems, report) = step_n(&mut a, 74 + CYCLES_PER_S);
        assert!(!report.animating);
        assert_targets_near(&dems.targets(), &[0.0; 7]);
    }

    #[test]
    fn test_empty_arm() {
        let mut a = ArmCtrl::default();
        assert_eq!(a.chain().len(), 0);

        // Processing an empty arm is a no-op
        let (dems, report) = step(&mut a, vec![ArmCmd::Axis(1.0), ArmCmd::SelectNext]);
        assert!(dems.drives.is_empty());
        assert_eq!(report.selected_label, "");
    }
}
