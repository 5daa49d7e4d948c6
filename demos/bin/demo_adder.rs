//! Adder Plugin Demo
//!
//! Runs the built-in `add` plugin on a small register, optionally on a
//! superposition of two inputs.

use clap::Parser;

use sparq_demos::programs::{RESULT_REGISTER, adder};
use sparq_demos::{
    init_logging, print_counts, print_error, print_header, print_result, print_section, sample,
};
use sparq_vm::VmResult;

#[derive(Parser, Debug)]
#[command(name = "demo-adder")]
#[command(about = "Add a constant to a qubit register")]
struct Args {
    /// Register width in qubits
    #[arg(short = 'n', long, default_value = "4")]
    width: u64,

    /// Initial register value
    #[arg(long, default_value = "6")]
    value: u64,

    /// Constant to add (wraps modulo 2^width)
    #[arg(long, default_value = "11", allow_hyphen_values = true)]
    offset: i64,

    /// Put the least significant qubit in superposition first
    #[arg(long)]
    superpose: bool,

    /// Number of shots
    #[arg(short, long, default_value = "200")]
    shots: u64,

    /// Base seed
    #[arg(long, default_value = "1")]
    seed: u64,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    if args.width == 0 || args.width > 63 {
        print_error(&format!("width must be in 1..=63, got {}", args.width));
        std::process::exit(1);
    }
    if args.value >> args.width != 0 {
        print_error(&format!(
            "value {} does not fit in {} qubits",
            args.value, args.width
        ));
        std::process::exit(1);
    }

    if let Err(e) = run(&args) {
        print_error(&e.to_string());
        std::process::exit(1);
    }
}

fn run(args: &Args) -> VmResult<()> {
    print_header("Adder Plugin Demo");

    let modulus = 1_i128 << args.width;
    let expected = (i128::from(args.value) + i128::from(args.offset)).rem_euclid(modulus);

    print_section("Problem Setup");
    print_result("Width", args.width);
    print_result("Value", args.value);
    print_result("Offset", args.offset);
    print_result("Expected (no superposition)", expected);

    print_section("Outcomes");
    let program = adder(args.width, args.value, args.offset, args.superpose);
    let counts = sample(&program, RESULT_REGISTER, args.shots, args.seed)?;
    print_counts(&counts, args.width as usize);
    Ok(())
}
