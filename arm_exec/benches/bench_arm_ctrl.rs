//! # Arm Control Benchmark

use criterion::{criterion_group, criterion_main, Criterion};

use arm_lib::arm_ctrl::{ArmCtrl, InputData, Params};
use comms_if::tc::arm_ctrl::ArmCmd;
use util::module::State;

fn arm_ctrl_benchmark(c: &mut Criterion) {
    // ---- Build ArmCtrl from the shipped parameters ----

    let params: Params =
        util::params::from_str(include_str!("../../params/arm_ctrl.toml")).unwrap();

    let mut arm_ctrl = ArmCtrl::from_params(params.clone()).unwrap();

    let drive = InputData {
        cmds: vec![ArmCmd::SelectNext, ArmCmd::Axis(1.0)],
    };
    let idle = InputData::default();

    // Operator driven tick
    c.bench_function("ArmCtrl::proc::operator", |b| {
        b.iter(|| arm_ctrl.proc(&drive).unwrap())
    });

    // Tick with a choreography running, restarted whenever it completes
    let mut arm_ctrl = ArmCtrl::from_params(params).unwrap();
    let toggle = InputData {
        cmds: vec![ArmCmd::Toggle],
    };

    c.bench_function("ArmCtrl::proc::choreography", |b| {
        b.iter(|| {
            if arm_ctrl.is_animating() {
                arm_ctrl.proc(&idle).unwrap()
            } else {
                arm_ctrl.proc(&toggle).unwrap()
            }
        })
    });
}

criterion_group!(benches, arm_ctrl_benchmark);
criterion_main!(benches);
