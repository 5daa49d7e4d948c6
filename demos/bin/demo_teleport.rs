//! Teleportation Demo
//!
//! Prepares `RY(theta)|0⟩`, teleports it across two qubits with
//! measurement-driven corrections and compares the received state with the
//! prepared one.

use clap::Parser;

use sparq_demos::programs::teleport;
use sparq_demos::{
    init_logging, print_error, print_header, print_result, print_section, print_success,
};
use sparq_vm::{Vm, VmResult};

#[derive(Parser, Debug)]
#[command(name = "demo-teleport")]
#[command(about = "Teleport a single-qubit state")]
struct Args {
    /// Preparation angle for RY
    #[arg(short, long, default_value = "1.0471975511965976")]
    theta: f64,

    /// Number of runs (each with a different seed)
    #[arg(short, long, default_value = "8")]
    runs: u64,

    /// Base seed
    #[arg(long, default_value = "7")]
    seed: u64,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    if let Err(e) = run(&args) {
        print_error(&e.to_string());
        std::process::exit(1);
    }
}

fn run(args: &Args) -> VmResult<()> {
    print_header("Quantum Teleportation Demo");

    let expected_zero = (args.theta / 2.0).cos().powi(2);
    print_section("Prepared State");
    print_result("theta", args.theta);
    print_result("P(|0⟩)", format!("{expected_zero:.6}"));
    print_result("P(|1⟩)", format!("{:.6}", 1.0 - expected_zero));

    print_section("Runs");
    let program = teleport(args.theta);
    let mut vm = Vm::new(&program)?;
    let mut worst = 0.0_f64;
    for shot in 0..args.runs {
        vm = vm.with_seed(args.seed.wrapping_add(shot));
        vm.run()?;
        let received = vm.get_dump_record(0)?.probability(0);
        let error = (received - expected_zero).abs();
        worst = worst.max(error);
        println!(
            "  seed {:>4}  m0={} m1={}  P(|0⟩)={:.6}",
            vm.seed(),
            vm.get_result(1),
            vm.get_result(2),
            received
        );
    }

    print_result("Max deviation", format!("{worst:.2e}"));
    if worst < 1e-9 {
        print_success("State received intact on every run");
    } else {
        print_error("Received state differs from the prepared one");
    }
    Ok(())
}
