//! # Telecommand module
//!
//! This module provides telecommand functionality to the communications
//! interface.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

pub mod arm_ctrl;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::{Deserialize, Serialize};
use thiserror::Error;

// Internal
use arm_ctrl::ArmCmd;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// A telecommand, i.e. an instruction sent to the arm by the operator.
///
/// In JSON a TC is an object with a `type` and, for those types which carry
/// data, a `payload`:
///
/// ```json
/// {"type": "ArmCtrl", "payload": {"Axis": 1.0}}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum Tc {
    Heartbeat,
    MakeSafe,
    MakeUnsafe,
    ArmCtrl(ArmCmd),
}

/// Possible parsing errors.
#[derive(Debug, Error)]
pub enum TcParseError {
    #[error("TC contains invalid JSON: {0}")]
    InvalidJson(serde_json::Error),

    #[error("TC has an invalid type ({0})")]
    InvalidType(String),

    #[error("TC of type {0} is expected to have a payload but it doesn't")]
    MissingPayload(String),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Tc {
    /// Parse a new TC from a JSON packet
    pub fn from_json(json_str: &str) -> Result<Self, TcParseError> {
        // Parse into a value first so that a bad type can be reported
        // separately from bad data
        let val: serde_json::Value =
            serde_json::from_str(json_str).map_err(TcParseError::InvalidJson)?;

        let tc_type = match val["type"].as_str() {
            Some(s) => s.to_string(),
            None => {
                return Err(TcParseError::InvalidType(String::from(
                    "Expected \"type\" to be a string",
                )))
            }
        };

        match tc_type.as_str() {
            "Heartbeat" | "MakeSafe" | "MakeUnsafe" => (),
            "ArmCtrl" => {
                if val["payload"].is_null() {
                    return Err(TcParseError::MissingPayload(tc_type));
                }
            }
            _ => {
                return Err(TcParseError::InvalidType(format!(
                    "{} is not a recognised TC type",
                    tc_type
                )))
            }
        }

        serde_json::from_value(val).map_err(TcParseError::InvalidJson)
    }

    /// Serialise the TC into a JSON string.
    pub fn to_json(&self) -> Result<String, TcParseError> {
        serde_json::to_string(self).map_err(TcParseError::InvalidJson)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{eqpt::mech::ControlType, tc::arm_ctrl::Choreography};

    #[test]
    fn test_parse_tcs() {
        assert_eq!(
            Tc::from_json(r#"{"type": "MakeSafe"}"#).unwrap(),
            Tc::MakeSafe
        );
        assert_eq!(
            Tc::from_json(r#"{"type": "ArmCtrl", "payload": {"Axis": -1.0}}"#).unwrap(),
            Tc::ArmCtrl(ArmCmd::Axis(-1.0))
        );
        assert_eq!(
            Tc::from_json(r#"{"type": "ArmCtrl", "payload": "Toggle"}"#).unwrap(),
            Tc::ArmCtrl(ArmCmd::Toggle)
        );
        assert_eq!(
            Tc::from_json(r#"{"type": "ArmCtrl", "payload": {"SelectJoint": -3}}"#).unwrap(),
            Tc::ArmCtrl(ArmCmd::SelectJoint(-3))
        );
        assert_eq!(
            Tc::from_json(r#"{"type": "ArmCtrl", "payload": {"Run": "PickAndLift"}}"#).unwrap(),
            Tc::ArmCtrl(ArmCmd::Run(Choreography::PickAndLift))
        );
        assert_eq!(
            Tc::from_json(
                r#"{"type": "ArmCtrl", "payload": {"SetControlMode": "PositionControl"}}"#
            )
            .unwrap(),
            Tc::ArmCtrl(ArmCmd::SetControlMode(ControlType::PositionControl))
        );
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            Tc::from_json("not json"),
            Err(TcParseError::InvalidJson(_))
        ));
        assert!(matches!(
            Tc::from_json(r#"{"type": "Launch"}"#),
            Err(TcParseError::InvalidType(_))
        ));
        assert!(matches!(
            Tc::from_json(r#"{"type": 4}"#),
            Err(TcParseError::InvalidType(_))
        ));
        assert!(matches!(
            Tc::from_json(r#"{"type": "ArmCtrl"}"#),
            Err(TcParseError::MissingPayload(_))
        ));
    }

    #[test]
    fn test_json_back_and_forth() {
        let tc = Tc::ArmCtrl(ArmCmd::SelectNext);
        let json = tc.to_json().unwrap();
        assert_eq!(Tc::from_json(&json).unwrap(), tc);
    }
}
