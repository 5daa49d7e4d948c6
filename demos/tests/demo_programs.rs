//! Integration tests for the demo programs.

use sparq_demos::programs::{RESULT_REGISTER, adder, bell, teleport};
use sparq_demos::sample;
use sparq_vm::Vm;

#[test]
fn test_bell_outcomes_are_correlated() {
    let counts = sample(&bell(), RESULT_REGISTER, 200, 3).unwrap();
    assert!(counts.keys().all(|value| matches!(value, 0b00 | 0b11)));
    assert_eq!(counts.values().sum::<u64>(), 200);
    assert_eq!(counts.len(), 2, "both outcomes expected in 200 shots");
}

#[test]
fn test_bell_dump() {
    let mut vm = Vm::new(&bell()).unwrap().with_seed(0);
    vm.run().unwrap();
    let dump = vm.get_dump_record(0).unwrap();
    assert_eq!(dump.len(), 2);
    assert!((dump.probability(0b00) - 0.5).abs() < 1e-12);
    assert!((dump.probability(0b11) - 0.5).abs() < 1e-12);
}

#[test]
fn test_teleport_preserves_state() {
    let theta = 0.8;
    let expected = (theta / 2.0_f64).cos().powi(2);
    let mut vm = Vm::new(&teleport(theta)).unwrap();
    for seed in 0..16 {
        vm = vm.with_seed(seed);
        vm.run().unwrap();
        let dump = vm.get_dump_record(0).unwrap();
        assert!(
            (dump.probability(0) - expected).abs() < 1e-9,
            "seed {seed}: got {}",
            dump.probability(0)
        );
    }
}

#[test]
fn test_adder_wraps() {
    let counts = sample(&adder(4, 6, 11, false), RESULT_REGISTER, 5, 0).unwrap();
    assert_eq!(counts.len(), 1);
    assert_eq!(counts.get(&1), Some(&5));
}

#[test]
fn test_adder_superposition() {
    let counts = sample(&adder(3, 0b010, 1, true), RESULT_REGISTER, 100, 9).unwrap();
    for value in counts.keys() {
        assert!(matches!(value, 0b011 | 0b100), "unexpected sum {value}");
    }
}

#[test]
fn test_programs_round_trip_json() {
    let program = teleport(0.25);
    let json = program.to_json().unwrap();
    let mut vm = Vm::from_json(&json).unwrap().with_seed(1);
    vm.run().unwrap();
    assert_eq!(vm.dump_count(), 1);
}
