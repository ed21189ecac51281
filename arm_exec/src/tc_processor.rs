//! # Telecommand processor module
//!
//! The telecommand processor handles various TCs coming from any source.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, trace, warn};

// Internal
use crate::data_store::{DataStore, SafeModeCause};
use comms_if::tc::Tc;

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Execute a telecommand.
///
/// Mutates the datastore to send commands to different modules. While in safe mode only
/// `MakeUnsafe` and `Heartbeat` are accepted.
pub fn exec(ds: &mut DataStore, tc: &Tc) {
    match tc {
        Tc::Heartbeat => trace!("Recieved Heartbeat"),
        Tc::MakeSafe => {
            debug!("Recieved MakeSafe command");
            ds.make_safe(SafeModeCause::MakeSafeTc);
        }
        Tc::MakeUnsafe => {
            debug!("Recieved MakeUnsafe command");
            if let Err(root_cause) = ds.make_unsafe(SafeModeCause::MakeSafeTc) {
                warn!(
                    "MakeUnsafe rejected, safe mode was caused by {:?}",
                    root_cause
                );
            }
        }
        Tc::ArmCtrl(cmd) => {
            if ds.safe {
                warn!("In safe mode, ArmCtrl({:?}) cannot be executed", cmd);
            } else {
                ds.arm_ctrl_input.cmds.push(*cmd)
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use comms_if::tc::arm_ctrl::ArmCmd;

    #[test]
    fn test_exec() {
        let mut ds = DataStore::default();

        exec(&mut ds, &Tc::ArmCtrl(ArmCmd::SelectNext));
        exec(&mut ds, &Tc::ArmCtrl(ArmCmd::Axis(-1.0)));
        assert_eq!(
            ds.arm_ctrl_input.cmds,
            vec![ArmCmd::SelectNext, ArmCmd::Axis(-1.0)]
        );

        exec(&mut ds, &Tc::MakeSafe);
        exec(&mut ds, &Tc::ArmCtrl(ArmCmd::Toggle));
        exec(&mut ds, &Tc::Heartbeat);
        assert!(ds.safe);
        assert_eq!(ds.arm_ctrl_input.cmds.len(), 2);

        exec(&mut ds, &Tc::MakeUnsafe);
        exec(&mut ds, &Tc::ArmCtrl(ArmCmd::Toggle));
        assert!(!ds.safe);
        assert_eq!(ds.arm_ctrl_input.cmds.last(), Some(&ArmCmd::Toggle));
    }
}
