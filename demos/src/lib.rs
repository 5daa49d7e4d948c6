//! Sparq Demo Suite
//!
//! Small programs that exercise the instruction VM end to end:
//!
//! - **Bell pair**: entangle two qubits and sample correlated outcomes
//! - **Teleportation**: move a prepared state with mid-circuit measurement
//!   and classically controlled corrections
//! - **Adder**: the built-in `add` plugin on a computational basis register

pub mod programs;

use console::style;
use sparq_vm::{Program, Vm, VmResult};
use std::collections::BTreeMap;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Install a `tracing` subscriber for `-v` style verbosity.
///
/// `RUST_LOG` takes precedence when set.
pub fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// Run `program` once per shot and tally the value left in `register`.
///
/// Shot `i` runs with seed `seed + i`, so a tally is reproducible.
pub fn sample(
    program: &Program,
    register: u64,
    shots: u64,
    seed: u64,
) -> VmResult<BTreeMap<i64, u64>> {
    let mut counts = BTreeMap::new();
    let mut vm = Vm::new(program)?;
    for shot in 0..shots {
        vm = vm.with_seed(seed.wrapping_add(shot));
        vm.run()?;
        *counts.entry(vm.get_result(register)).or_insert(0) += 1;
    }
    info!("Sampled {} shots into {} outcomes", shots, counts.len());
    Ok(counts)
}

/// Print a demo header.
pub fn print_header(title: &str) {
    println!();
    println!("{}", style("═".repeat(60)).cyan());
    println!("{}", style(format!("  {title}")).cyan().bold());
    println!("{}", style("═".repeat(60)).cyan());
    println!();
}

/// Print a demo section.
pub fn print_section(title: &str) {
    println!();
    println!("{}", style(format!("▶ {title}")).green().bold());
    println!("{}", style("─".repeat(40)).dim());
}

/// Print a result line.
pub fn print_result(label: &str, value: impl std::fmt::Display) {
    println!("  {} {}", style(format!("{label}:")).dim(), value);
}

/// Print a tally as `|bits⟩ count` lines, `width` bits per outcome.
pub fn print_counts(counts: &BTreeMap<i64, u64>, width: usize) {
    let total: u64 = counts.values().sum();
    for (value, count) in counts {
        let share = if total == 0 {
            0.0
        } else {
            *count as f64 / total as f64
        };
        println!(
            "  |{:0width$b}⟩ {:>6} {}",
            value,
            count,
            style(format!("({:.1}%)", share * 100.0)).dim(),
            width = width
        );
    }
}

/// Print a success message.
pub fn print_success(message: &str) {
    println!("{} {}", style("✓").green().bold(), message);
}

/// Print an error message.
pub fn print_error(message: &str) {
    eprintln!("{} {}", style("✗").red().bold(), message);
}
