//! Main arm executable entry point.
//!
//! # Architecture
//!
//! The general execution methodology consists of:
//!
//!     - Initialise all modules
//!     - Main loop:
//!         - Telecommand processing and handling
//!         - Arm control processing:
//!             - Joint selection and operator direction
//!             - Joint actuation
//!             - Choreography sequencing
//!         - Drive demand output
//!
//! # Modules
//!
//! All modules (e.g. `arm_ctrl`) shall meet the following requirements:
//!     1. Provide a public struct implementing the `util::module::State` trait.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use color_eyre::{eyre::WrapErr, Report};
use log::{debug, info, trace, warn};
use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};
use structopt::StructOpt;

// Internal
use arm_lib::{
    data_store::{DataStore, SafeModeCause},
    params::ArmExecParams,
    tc_processor, CYCLE_FREQUENCY_HZ, CYCLE_PERIOD_S,
};
use util::{
    logger::{logger_init, parse_level, LevelFilter},
    module::State,
    script_interpreter::{PendingTcs, ScriptInterpreter},
    session::{self, Session},
};

// ---------------------------------------------------------------------------
// CLI
// ---------------------------------------------------------------------------

/// Manipulator arm control executable.
#[derive(Debug, StructOpt)]
#[structopt(name = "arm_exec")]
struct Opt {
    /// Path to the telecommand script to execute
    #[structopt(parse(from_os_str))]
    script: PathBuf,

    /// Exit after this many cycles even if the script has not finished
    #[structopt(long)]
    max_cycles: Option<u128>,
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {
    color_eyre::install()?;

    let opt = Opt::from_args();

    // ---- EARLY INITIALISATION ----

    // Initialise session
    let session = Session::new("arm_exec", "sessions").wrap_err("Failed to create the session")?;

    // Exec params are needed to set the log level, so load them before the logger
    let exec_params: ArmExecParams =
        util::params::load("arm_exec.toml").wrap_err("Could not load exec params")?;

    let min_level = parse_level(&exec_params.log_level).wrap_err("Invalid log level")?;
    let mut module_levels: Vec<(String, LevelFilter)> = Vec::new();
    for (module, level) in exec_params.module_log_levels.iter() {
        module_levels.push((
            module.clone(),
            parse_level(level).wrap_err_with(|| format!("Invalid log level for {}", module))?,
        ));
    }

    // Initialise logger
    logger_init(min_level, &module_levels, &session).wrap_err("Failed to initialise logging")?;

    // Log information on this execution.
    info!("Arm Executable\n");
    info!("Session directory: {:?}\n", session.session_root);
    debug!("CLI arguments: {:?}", opt);

    // ---- INITIALISE TC SCRIPT ----

    info!("Loading script from {:?}", opt.script);

    let mut script_interpreter =
        ScriptInterpreter::new(&opt.script).wrap_err("Failed to load script")?;

    info!(
        "Loaded script lasts {:.02} s and contains {} TCs\n",
        script_interpreter.get_duration(),
        script_interpreter.get_num_tcs()
    );

    // ---- INITIALISE MODULES ----

    info!("Initialising modules...");

    let mut ds = DataStore::default();

    ds.arm_ctrl
        .init("arm_ctrl.toml", &session)
        .wrap_err("Failed to initialise ArmCtrl")?;
    info!("ArmCtrl init complete");

    info!("Module initialisation complete\n");

    // ---- MAIN LOOP ----

    info!("Begining main loop\n");

    let mut end_of_script = false;

    loop {
        // Get cycle start time
        let cycle_start_instant = Instant::now();

        // Clear items that need wiping at the start of the cycle
        ds.cycle_start(CYCLE_FREQUENCY_HZ, session::get_elapsed_seconds());

        // ---- TELECOMMAND PROCESSING ----

        if !end_of_script {
            match script_interpreter.get_pending_tcs() {
                PendingTcs::None => (),
                PendingTcs::Some(tc_vec) => {
                    for tc in tc_vec.iter() {
                        tc_processor::exec(&mut ds, tc);
                    }
                }
                PendingTcs::EndOfScript => {
                    info!("End of TC script reached");
                    end_of_script = true;
                }
            }
        }

        // ---- CONTROL ALGORITHM PROCESSING ----

        let (output, report) = ds
            .arm_ctrl
            .proc(&ds.arm_ctrl_input)
            .wrap_err("Error during ArmCtrl processing")?;
        ds.arm_ctrl_output = output;
        ds.arm_ctrl_status_rpt = report;

        // ---- DRIVE DEMANDS ----

        if ds.is_1_hz_cycle {
            debug!(
                "[{:.02} s] Selected {}, drive targets: {:?}",
                ds.session_time_s,
                ds.arm_ctrl_status_rpt.selected_label,
                ds.arm_ctrl_output.targets()
            );
        }
        trace!("ArmCtrl status: {:?}", ds.arm_ctrl_status_rpt);

        // ---- CYCLE MANAGEMENT ----

        let cycle_dur = Instant::now() - cycle_start_instant;

        // Get sleep duration
        match Duration::from_secs_f64(CYCLE_PERIOD_S).checked_sub(cycle_dur) {
            Some(d) => {
                ds.num_consec_cycle_overruns = 0;
                ds.make_unsafe(SafeModeCause::CycleOverrun).ok();
                thread::sleep(d);
            }
            None => {
                warn!(
                    "Cycle overran by {:.06} s",
                    cycle_dur.as_secs_f64() - CYCLE_PERIOD_S
                );
                ds.num_consec_cycle_overruns += 1;

                if ds.num_consec_cycle_overruns > exec_params.max_consec_cycle_overruns {
                    ds.make_safe(SafeModeCause::CycleOverrun);
                }
            }
        }

        // Increment cycle counter
        ds.num_cycles += 1;

        if let Some(max_cycles) = opt.max_cycles {
            if ds.num_cycles >= max_cycles {
                info!("Reached the maximum of {} cycles, exiting", max_cycles);
                break;
            }
        }

        // If at the end of the script and no choreography is running exit
        if end_of_script && !(exec_params.wait_for_sequencer && ds.arm_ctrl.is_animating()) {
            info!("End of script and ArmCtrl is idle, exiting");
            break;
        }
    }

    // ---- SHUTDOWN ----

    session.save("arm_ctrl_status.json", ds.arm_ctrl_status_rpt.clone());
    session.save("drive_dems.json", ds.arm_ctrl_output.clone());

    session.exit();

    Ok(())
}
