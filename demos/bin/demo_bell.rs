//! Bell Pair Demo
//!
//! Entangles two qubits, prints the dumped state and samples the
//! correlated measurement outcomes.

use clap::Parser;

use sparq_demos::programs::{RESULT_REGISTER, bell};
use sparq_demos::{
    init_logging, print_counts, print_error, print_header, print_result, print_section,
    print_success, sample,
};
use sparq_vm::{Vm, VmResult};

#[derive(Parser, Debug)]
#[command(name = "demo-bell")]
#[command(about = "Prepare and sample a Bell pair")]
struct Args {
    /// Number of shots
    #[arg(short, long, default_value = "1000")]
    shots: u64,

    /// Base seed (shot i runs with seed + i)
    #[arg(long, default_value = "42")]
    seed: u64,

    /// Print the program as JSON
    #[arg(long)]
    show_program: bool,

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
    print_header("Bell Pair Demo");
    let program = bell();

    if args.show_program {
        print_section("Program");
        println!("{}", program.to_json()?);
    }

    print_section("State Before Measurement");
    let mut vm = Vm::new(&program)?.with_seed(args.seed);
    vm.run()?;
    print!("{}", vm.get_dump_record(0)?);

    print_section("Sampling");
    print_result("Shots", args.shots);
    print_result("Seed", args.seed);
    let counts = sample(&program, RESULT_REGISTER, args.shots, args.seed)?;
    print_counts(&counts, 2);

    let correlated = counts
        .iter()
        .filter(|(value, _)| matches!(value, 0b00 | 0b11))
        .map(|(_, count)| count)
        .sum::<u64>();
    if correlated == args.shots {
        print_success("All outcomes correlated");
    } else {
        print_error(&format!(
            "{} of {} outcomes uncorrelated",
            args.shots - correlated,
            args.shots
        ));
    }
    Ok(())
}
