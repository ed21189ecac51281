//! Static drive limits of a joint

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

use super::ArmCtrlError;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Physical constraints of a single joint's drive.
///
/// Fixed once the chain is built. Construction through [`DriveLimits::new`]
/// guarantees `lower_limit <= upper_limit`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DriveLimits {
    kind: JointKind,
    lock: MotionLock,
    lower_limit: f64,
    upper_limit: f64,
    force_limit: f64,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// The kind of motion a joint allows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JointKind {
    /// No motion, the joint is never actuated.
    Fixed,

    /// Rotation about the joint axis. Units: degrees.
    Revolute,

    /// Translation along the joint axis. Units: millimeters.
    Prismatic,
}

/// Whether the joint's travel is bounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MotionLock {
    /// Unbounded travel, targets are never clamped.
    Free,

    /// Travel bounded by the lower and upper limits, targets saturate.
    Limited,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl DriveLimits {
    /// Build the limits of joint `index`, validating the travel range.
    pub fn new(
        index: usize,
        kind: JointKind,
        lock: MotionLock,
        lower_limit: f64,
        upper_limit: f64,
        force_limit: f64,
    ) -> Result<Self, ArmCtrlError> {
        if !lower_limit.is_finite() || !upper_limit.is_finite() {
            return Err(ArmCtrlError::NonFiniteLimits { index });
        }
        if lower_limit > upper_limit {
            return Err(ArmCtrlError::InvalidLimits {
                index,
                lower: lower_limit,
                upper: upper_limit,
            });
        }

        Ok(Self {
            kind,
            lock,
            lower_limit,
            upper_limit,
            force_limit,
        })
    }

    pub fn kind(&self) -> JointKind {
        self.kind
    }

    pub fn lock(&self) -> MotionLock {
        self.lock
    }

    pub fn lower_limit(&self) -> f64 {
        self.lower_limit
    }

    pub fn upper_limit(&self) -> f64 {
        self.upper_limit
    }

    pub fn force_limit(&self) -> f64 {
        self.force_limit
    }

    /// True if the joint is driven at all, i.e. it is not fixed.
    pub fn is_actuated(&self) -> bool {
        self.kind != JointKind::Fixed
    }

    /// Constrain a candidate target to the joint's travel.
    ///
    /// Limited joints saturate at the nearest limit, free joints accept any
    /// value. Returns the constrained target and whether it was limited.
    pub fn constrain(&self, candidate: f64) -> (f64, bool) {
        match self.lock {
            MotionLock::Free => (candidate, false),
            MotionLock::Limited => {
                let constrained =
                    util::maths::clamp(candidate, self.lower_limit, self.upper_limit);
                (constrained, constrained != candidate)
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_invalid_range() {
        assert!(matches!(
            DriveLimits::new(3, JointKind::Revolute, MotionLock::Limited, 10.0, -10.0, 100.0),
            Err(ArmCtrlError::InvalidLimits { index: 3, .. })
        ));
        assert!(matches!(
            DriveLimits::new(0, JointKind::Revolute, MotionLock::Free, std::f64::NAN, 0.0, 1.0),
            Err(ArmCtrlError::NonFiniteLimits { index: 0 })
        ));
        assert!(matches!(
            DriveLimits::new(
                2,
                JointKind::Revolute,
                MotionLock::Free,
                std::f64::NEG_INFINITY,
                std::f64::INFINITY,
                1.0
            ),
            Err(ArmCtrlError::NonFiniteLimits { index: 2 })
        ));

        // A zero width range is valid
        assert!(
            DriveLimits::new(0, JointKind::Prismatic, MotionLock::Limited, 0.1, 0.1, 1.0).is_ok()
        );
    }

    #[test]
    fn test_constrain() {
        let limited =
            DriveLimits::new(0, JointKind::Revolute, MotionLock::Limited, -180.0, 180.0, 100.0)
                .unwrap();
        assert_eq!(limited.constrain(200.0), (180.0, true));
        assert_eq!(limited.constrain(-181.0), (-180.0, true));
        assert_eq!(limited.constrain(45.0), (45.0, false));

        let free =
            DriveLimits::new(0, JointKind::Revolute, MotionLock::Free, -180.0, 180.0, 100.0)
                .unwrap();
        assert_eq!(free.constrain(720.0), (720.0, false));
    }

    #[test]
    fn test_fixed_joints_are_not_actuated() {
        let fixed =
            DriveLimits::new(0, JointKind::Fixed, MotionLock::Limited, 0.0, 0.0, 0.0).unwrap();
        assert!(!fixed.is_actuated());
    }
}
