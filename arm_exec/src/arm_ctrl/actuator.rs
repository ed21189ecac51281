//! Per-tick joint actuation

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use log::trace;

use super::JointState;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Advances a joint's drive target under operator direction.
///
/// The actuator holds no state of its own, all state lives in the
/// [`JointState`] it is ticked on.
#[derive(Debug, Default, Clone, Copy)]
pub struct JointActuator;

/// What happened during a single actuator tick.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct ActuatorTick {
    /// The control mode's parameters were written onto the drive this tick.
    pub mode_applied: bool,

    /// The candidate target fell outside the joint's travel and was saturated.
    pub limited: bool,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl JointActuator {
    /// Run one fixed tick of length `dt_s` on the given joint.
    ///
    /// Fixed joints are left untouched. For every other joint a pending
    /// control mode change is applied first, then the target is moved by
    /// `direction * dt_s * speed` and saturated to the joint's travel if its
    /// motion is limited.
    pub fn tick(joint: &mut JointState, dt_s: f64) -> ActuatorTick {
        let mut result = ActuatorTick::default();

        if !joint.limits.is_actuated() {
            return result;
        }

        if joint.control_mode_pending() {
            joint.apply_control_mode();
            result.mode_applied = true;
            trace!(
                "Joint {} drive switched to {:?}",
                joint.index,
                joint.control_mode
            );
        }

        let delta = joint.direction.signum() * dt_s * joint.speed;

        result.limited = joint.set_target(joint.target + delta);

        result
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::arm_ctrl::{ControlParams, Direction, DriveLimits, JointKind, MotionLock};
    use comms_if::eqpt::mech::ControlType;
    use proptest::prelude::*;

    fn joint(kind: JointKind, lock: MotionLock, speed: f64) -> JointState {
        let limits = DriveLimits::new(0, kind, lock, -180.0, 180.0, 100.0).unwrap();
        JointState::new(0, String::from("j"), limits, speed, &ControlParams::default())
    }

    #[test]
    fn test_free_joint_never_clamps() {
        let mut j = joint(JointKind::Revolute, MotionLock::Free, 5.0);
        j.direction = Direction::Positive;

        for i in 1..=1000 {
            let tick = JointActuator::tick(&mut j, 0.1);
            assert!(!tick.limited);
            assert!((j.target() - 0.5 * i as f64).abs() < 1e-9);
        }

        // Well past the nominal upper limit
        assert!(j.target() > 180.0);
    }

    #[test]
    fn test_free_joint_step_is_exact() {
        let mut j = joint(JointKind::Revolute, MotionLock::Free, 5.0);
        j.direction = Direction::Positive;

        let before = j.target();
        JointActuator::tick(&mut j, 0.1);
        assert_eq!(j.target() - before, 0.5);
    }

    #[test]
    fn test_limited_joint_saturates() {
        let mut j = joint(JointKind::Prismatic, MotionLock::Limited, 100.0);
        j.direction = Direction::Negative;

        let mut limited = false;
        for _ in 0..100 {
            limited |= JointActuator::tick(&mut j, 0.1).limited;
        }

        assert!(limited);
        assert_eq!(j.target(), -180.0);

        // Reversing moves off the limit straight away
        j.direction = Direction::Positive;
        let tick = JointActuator::tick(&mut j, 0.1);
        assert!(!tick.limited);
        assert_eq!(j.target(), -170.0);
    }

    #[test]
    fn test_no_direction_holds_target() {
        let mut j = joint(JointKind::Revolute, MotionLock::Limited, 5.0);
        j.set_target(12.5);

        JointActuator::tick(&mut j, 0.1);
        assert_eq!(j.target(), 12.5);
    }

    #[test]
    fn test_fixed_joint_untouched() {
        let mut j = joint(JointKind::Fixed, MotionLock::Free, 5.0);
        j.direction = Direction::Positive;

        let tick = JointActuator::tick(&mut j, 0.1);
        assert_eq!(tick, ActuatorTick::default());
        assert_eq!(j.target(), 0.0);
        assert!(j.control_mode_pending());
    }

    #[test]
    fn test_control_mode_applied_once() {
        let mut j = joint(JointKind::Revolute, MotionLock::Limited, 5.0);

        assert!(JointActuator::tick(&mut j, 0.1).mode_applied);
        assert!(!JointActuator::tick(&mut j, 0.1).mode_applied);

        // Re-requesting the same mode with new gains is not a mode change
        let stiffer = ControlParams {
            stiffness: 1.0,
            ..ControlParams::default()
        };
        j.request_control(&stiffer);
        assert!(!JointActuator::tick(&mut j, 0.1).mode_applied);
        assert_eq!(j.drive.applied_mode, Some(ControlType::PositionControl));
    }

    proptest! {
        #[test]
        fn prop_limited_target_stays_in_range(
            lower in -500.0f64..0.0,
            width in 0.0f64..1000.0,
            start in -2000.0f64..2000.0,
            speed in 0.0f64..500.0,
            dt_s in 0.0f64..1.0,
            dirs in proptest::collection::vec(0u8..3, 1..50),
        ) {
            let upper = lower + width;
            let limits = DriveLimits::new(
                0, JointKind::Revolute, MotionLock::Limited, lower, upper, 1.0
            ).unwrap();
            let mut j = JointState::new(
                0, String::from("j"), limits, speed, &ControlParams::default()
            );
            j.set_target(start);

            for d in dirs {
                j.direction = match d {
                    0 => Direction::None,
                    1 => Direction::Positive,
                    _ => Direction::Negative,
                };
                JointActuator::tick(&mut j, dt_s);
                prop_assert!(lower <= j.target() && j.target() <= upper);
            }
        }
    }
}
