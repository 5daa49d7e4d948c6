//! Integration tests for qubit lifecycle, partition merging and dumps.

use num_complex::Complex64;
use sparq_sim::{QubitId, RegisterId, SimError, Simulator};
use sparq_state::{BitIndex, Gate};
use std::f64::consts::FRAC_1_SQRT_2;

fn q(id: u64) -> QubitId {
    QubitId(id)
}

#[test]
fn test_fresh_qubit_is_zero_singleton() {
    let mut sim = Simulator::with_seed(1);
    sim.alloc(q(0), false).unwrap();

    let partition = sim.partition(q(0)).unwrap();
    assert_eq!(partition.members, vec![0]);
    assert_eq!(partition.state.len(), 1);
    let amp = partition.state.get(&BitIndex::zero()).unwrap();
    assert!((amp - Complex64::new(1.0, 0.0)).norm() < 1e-12);
}

#[test]
fn test_bell_dump() {
    let mut sim = Simulator::with_seed(2);
    sim.alloc(q(0), false).unwrap();
    sim.alloc(q(1), false).unwrap();
    sim.apply_gate(&Gate::H, q(0), &[]).unwrap();
    sim.apply_gate(&Gate::X, q(1), &[q(0)]).unwrap();

    let index = sim.dump(&[q(0), q(1)]).unwrap();
    assert_eq!(index, 0);
    assert_eq!(sim.dump_count(), 1);

    let record = sim.get_dump(0).unwrap();
    assert_eq!(record.len(), 2);
    for basis in [0b00, 0b11] {
        let amps = record.get(basis).unwrap();
        assert_eq!(amps.len(), 1);
        assert!((amps[0] - Complex64::new(FRAC_1_SQRT_2, 0.0)).norm() < 1e-10);
    }
    assert!(record.get(0b01).is_none());
    assert!(record.get(0b10).is_none());
}

#[test]
fn test_dump_follows_requested_order() {
    let mut sim = Simulator::with_seed(3);
    sim.alloc(q(0), false).unwrap();
    sim.alloc(q(1), false).unwrap();
    sim.apply_gate(&Gate::X, q(1), &[]).unwrap();

    sim.dump(&[q(1), q(0)]).unwrap();
    let record = sim.get_dump(0).unwrap();
    assert!((record.probability(0b01) - 1.0).abs() < 1e-12);

    // The layout is restored after the dump.
    sim.dump(&[q(0), q(1)]).unwrap();
    let record = sim.get_dump(1).unwrap();
    assert!((record.probability(0b10) - 1.0).abs() < 1e-12);
}

#[test]
fn test_dump_groups_entangled_spectators() {
    let mut sim = Simulator::with_seed(4);
    sim.alloc(q(0), false).unwrap();
    sim.alloc(q(1), false).unwrap();
    sim.apply_gate(&Gate::H, q(0), &[]).unwrap();
    sim.apply_gate(&Gate::X, q(1), &[q(0)]).unwrap();

    sim.dump(&[q(1)]).unwrap();
    let record = sim.get_dump(0).unwrap();
    assert_eq!(record.num_qubits, 1);
    assert_eq!(record.get(0).unwrap().len(), 1);
    assert_eq!(record.get(1).unwrap().len(), 1);
}

#[test]
fn test_missing_dump() {
    let sim = Simulator::with_seed(5);
    assert!(matches!(
        sim.get_dump(3),
        Err(SimError::DumpNotFound { index: 3, count: 0 })
    ));
}

#[test]
fn test_measurement_statistics() {
    let mut sim = Simulator::with_seed(2024);
    let trials = 2000;
    let mut ones = 0;
    for _ in 0..trials {
        sim.alloc(q(0), false).unwrap();
        sim.apply_gate(&Gate::H, q(0), &[]).unwrap();
        if sim.measure(q(0)).unwrap() {
            ones += 1;
        }
        sim.free(q(0), false).unwrap();
    }
    let freq = f64::from(ones) / f64::from(trials);
    assert!((freq - 0.5).abs() < 0.05, "frequency {freq}");
}

#[test]
fn test_measurement_collapses_partner() {
    let mut sim = Simulator::with_seed(6);
    sim.alloc(q(0), false).unwrap();
    sim.alloc(q(1), false).unwrap();
    sim.apply_gate(&Gate::H, q(0), &[]).unwrap();
    sim.apply_gate(&Gate::X, q(1), &[q(0)]).unwrap();

    let first = sim.measure(q(0)).unwrap();
    assert_eq!(sim.state_of(q(0)).unwrap().len(), 1);
    assert_eq!(sim.measure(q(1)).unwrap(), first);
    assert_eq!(sim.get_bit(q(0)).unwrap(), first);
}

#[test]
fn test_get_bit_requires_measurement() {
    let mut sim = Simulator::with_seed(7);
    sim.alloc(q(0), false).unwrap();
    assert!(matches!(sim.get_bit(q(0)), Err(SimError::BitNotMeasured(_))));
}

#[test]
fn test_dirty_reuse_keeps_state() {
    let mut sim = Simulator::with_seed(8);
    sim.alloc(q(0), false).unwrap();
    sim.alloc(q(1), false).unwrap();
    sim.apply_gate(&Gate::H, q(0), &[]).unwrap();
    sim.apply_gate(&Gate::X, q(1), &[q(0)]).unwrap();
    let slot = sim.physical_of(q(1)).unwrap();
    let before = sim.state_of(q(0)).unwrap().clone();

    sim.free(q(1), true).unwrap();
    sim.alloc(q(2), true).unwrap();

    assert_eq!(sim.physical_of(q(2)).unwrap(), slot);
    assert_eq!(sim.state_of(q(2)).unwrap(), &before);
    assert_eq!(sim.measure(q(0)).unwrap(), sim.measure(q(2)).unwrap());
}

#[test]
fn test_clean_free_yields_fresh_qubit() {
    let mut sim = Simulator::with_seed(9);
    sim.alloc(q(0), false).unwrap();
    sim.alloc(q(1), false).unwrap();
    sim.apply_gate(&Gate::H, q(0), &[]).unwrap();
    sim.apply_gate(&Gate::X, q(1), &[q(0)]).unwrap();

    sim.free(q(1), false).unwrap();
    // The partner collapsed together with the freed qubit.
    assert_eq!(sim.state_of(q(0)).unwrap().len(), 1);

    sim.alloc(q(3), false).unwrap();
    let state = sim.state_of(q(3)).unwrap();
    assert_eq!(state.len(), 1);
    assert_eq!(sim.partition(q(3)).unwrap().members.len(), 1);
    let amp = state.get(&BitIndex::zero()).unwrap();
    assert!((amp - Complex64::new(1.0, 0.0)).norm() < 1e-12);
}

#[test]
fn test_dirty_alloc_without_dirty_slot_is_fresh() {
    let mut sim = Simulator::with_seed(10);
    sim.alloc(q(0), true).unwrap();
    assert_eq!(sim.state_of(q(0)).unwrap().len(), 1);
    assert_eq!(sim.partition_count(), 1);
}

#[test]
fn test_clean_alloc_does_not_take_dirty_slot() {
    let mut sim = Simulator::with_seed(12).with_max_qubits(2);
    sim.alloc(q(0), false).unwrap();
    sim.alloc(q(1), false).unwrap();
    sim.apply_gate(&Gate::X, q(1), &[]).unwrap();
    sim.free(q(1), true).unwrap();

    assert!(matches!(
        sim.alloc(q(2), false),
        Err(SimError::QubitLimitExceeded(2))
    ));

    // The parked slot is still there, with its state, for a dirty request.
    sim.alloc(q(2), true).unwrap();
    assert_eq!(sim.physical_of(q(2)).unwrap(), 1);
    assert!(sim.measure(q(2)).unwrap());
}

#[test]
fn test_control_known_zero_is_noop() {
    let mut sim = Simulator::with_seed(11);
    sim.alloc(q(0), false).unwrap();
    sim.alloc(q(1), false).unwrap();
    sim.apply_gate(&Gate::H, q(1), &[]).unwrap();
    let before = sim.state_of(q(1)).unwrap().clone();

    sim.apply_gate(&Gate::X, q(1), &[q(0)]).unwrap();
    sim.apply_gate(&Gate::Rz(0.4), q(1), &[q(0)]).unwrap();

    assert_eq!(sim.partition_count(), 2);
    assert_eq!(sim.state_of(q(1)).unwrap(), &before);
}

#[test]
fn test_control_known_one_acts_uncontrolled() {
    let mut sim = Simulator::with_seed(12);
    sim.alloc(q(0), false).unwrap();
    sim.alloc(q(1), false).unwrap();
    sim.apply_gate(&Gate::X, q(0), &[]).unwrap();

    sim.apply_gate(&Gate::H, q(1), &[q(0)]).unwrap();

    assert_eq!(sim.partition_count(), 2);
    assert_eq!(sim.state_of(q(1)).unwrap().len(), 2);
}

#[test]
fn test_operand_errors() {
    let mut sim = Simulator::with_seed(13);
    sim.alloc(q(0), false).unwrap();
    assert!(matches!(
        sim.apply_gate(&Gate::X, q(0), &[q(0)]),
        Err(SimError::DuplicateQubit(_))
    ));
    assert!(matches!(
        sim.apply_gate(&Gate::X, q(0), &[q(4)]),
        Err(SimError::QubitNotAllocated(_))
    ));
    assert!(matches!(
        sim.dump(&[q(0), q(0)]),
        Err(SimError::DuplicateQubit(_))
    ));
}

#[test]
fn test_registers() {
    let mut sim = Simulator::with_seed(14);
    sim.set_register(RegisterId(3), 7);
    sim.set_register(RegisterId(1), -1);
    let registers: Vec<_> = sim.registers().collect();
    assert_eq!(registers, vec![(RegisterId(1), -1), (RegisterId(3), 7)]);
    assert_eq!(sim.results(), "1 -1\n3 7\n");
}
