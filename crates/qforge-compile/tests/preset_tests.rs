//! End-to-end tests of the preset pipelines.
//!
//! Compiled circuits are simulated and compared with their source circuit:
//! after undoing the final layout the two states must agree up to global
//! phase.

use num_complex::Complex64;
use proptest::prelude::*;
use qforge_compile::unitary::Unitary2x2;
use qforge_compile::{BasisGates, Calibration, CouplingMap, Target, generate_preset_pass_manager};
use qforge_ir::{Circuit, Instruction, InstructionKind, QubitId, StandardGate};

// ============================================================================
// Reference simulator
// ============================================================================

fn c(re: f64, im: f64) -> Complex64 {
    Complex64::new(re, im)
}

/// 4x4 matrix of a two-qubit gate, first operand as the high bit.
fn two_qubit_matrix(gate: &StandardGate) -> [[Complex64; 4]; 4] {
    let o = c(0.0, 0.0);
    let l = c(1.0, 0.0);
    let s = std::f64::consts::FRAC_1_SQRT_2;
    match gate {
        StandardGate::CX => [[l, o, o, o], [o, l, o, o], [o, o, o, l], [o, o, l, o]],
        StandardGate::CZ => [[l, o, o, o], [o, l, o, o], [o, o, l, o], [o, o, o, -l]],
        StandardGate::Swap => [[l, o, o, o], [o, o, l, o], [o, l, o, o], [o, o, o, l]],
        StandardGate::ECR => [
            [o, o, c(s, 0.0), c(0.0, s)],
            [o, o, c(0.0, s), c(s, 0.0)],
            [c(s, 0.0), c(0.0, -s), o, o],
            [c(0.0, -s), c(s, 0.0), o, o],
        ],
        other => panic!("simulator does not model {other:?}"),
    }
}

fn simulate(circuit: &Circuit) -> Vec<Complex64> {
    let n = circuit.num_qubits();
    let mut state = vec![c(0.0, 0.0); 1 << n];
    state[0] = c(1.0, 0.0);

    for inst in circuit.instructions() {
        let InstructionKind::Gate(gate) = &inst.kind else {
            continue;
        };
        let q: Vec<usize> = inst.qubits.iter().map(|q| q.0 as usize).collect();
        if let Some(m) = Unitary2x2::from_gate(gate) {
            let bit = 1 << q[0];
            for i in 0..state.len() {
                if i & bit == 0 {
                    let (a, b) = (state[i], state[i | bit]);
                    state[i] = m.data[0][0] * a + m.data[0][1] * b;
                    state[i | bit] = m.data[1][0] * a + m.data[1][1] * b;
                }
            }
        } else if *gate == StandardGate::CCX {
            let (a, b, t) = (1 << q[0], 1 << q[1], 1 << q[2]);
            for i in 0..state.len() {
                if i & a != 0 && i & b != 0 && i & t == 0 {
                    state.swap(i, i | t);
                }
            }
        } else {
            let m = two_qubit_matrix(gate);
            let (hi, lo) = (1 << q[0], 1 << q[1]);
            for i in 0..state.len() {
                if i & hi == 0 && i & lo == 0 {
                    let idx = [i, i | lo, i | hi, i | hi | lo];
                    let amps = idx.map(|k| state[k]);
                    for (r, &k) in idx.iter().enumerate() {
                        state[k] = (0..4).map(|j| m[r][j] * amps[j]).sum();
                    }
                }
            }
        }
    }
    state
}

/// Check that `compiled` prepares the same state as `original`, with
/// virtual qubit v read from physical qubit `final_layout[v]`.
fn assert_equivalent(original: &Circuit, compiled: &Circuit) {
    let layout = compiled.final_layout().expect("final layout recorded");
    let expected = simulate(original);
    let actual = simulate(compiled);

    let mut mapped = vec![c(0.0, 0.0); actual.len()];
    for (x, amp) in expected.iter().enumerate() {
        let y = layout
            .iter()
            .enumerate()
            .filter(|(v, _)| x & (1 << v) != 0)
            .fold(0usize, |acc, (_, &p)| acc | (1 << p));
        mapped[y] = *amp;
    }

    let pivot = mapped
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.norm().total_cmp(&b.1.norm()))
        .map(|(i, _)| i)
        .unwrap();
    let phase = actual[pivot] / mapped[pivot];
    assert!((phase.norm() - 1.0).abs() < 1e-6, "norm mismatch: {phase}");
    for (a, m) in actual.iter().zip(&mapped) {
        assert!(
            (a - phase * m).norm() < 1e-6,
            "state mismatch for '{}'",
            original.name()
        );
    }
}

fn assert_isa(compiled: &Circuit, target: &Target) {
    assert_eq!(compiled.num_qubits(), target.num_qubits());
    for inst in compiled.instructions() {
        assert!(
            target.basis_gates().accepts(inst.name()),
            "non-native '{}'",
            inst.name()
        );
        if inst.is_gate() && inst.qubits.len() == 2 {
            assert!(
                target
                    .coupling_map()
                    .is_connected(inst.qubits[0].0, inst.qubits[1].0)
            );
        }
    }
}

// ============================================================================
// Targets
// ============================================================================

fn heron_line() -> Target {
    Target::new("fake_heron", BasisGates::heron(), CouplingMap::linear(5)).unwrap()
}

fn eagle_ring() -> Target {
    Target::new("fake_eagle", BasisGates::eagle(), CouplingMap::ring(5)).unwrap()
}

fn u_cx_star() -> Target {
    Target::new("fake_u", BasisGates::new(["u", "cx"]), CouplingMap::star(5)).unwrap()
}

fn calibrated_heron() -> Target {
    let mut cal = Calibration::new();
    for q in 0..5 {
        cal.set_readout_error(q, 0.01 * f64::from(q + 1));
    }
    for q in 1..5 {
        cal.set_two_qubit_error(q - 1, q, 0.005);
    }
    heron_line().with_calibration(cal)
}

// ============================================================================
// Fixed circuits
// ============================================================================

#[test]
fn test_ghz_all_levels_all_targets() {
    let ghz = {
        let mut c = Circuit::with_size("ghz4", 4, 0);
        c.h(QubitId(0)).unwrap();
        for i in 1..4 {
            c.cx(QubitId(0), QubitId(i)).unwrap();
        }
        c
    };
    for target in [heron_line(), eagle_ring(), u_cx_star(), calibrated_heron()] {
        for level in 0..=3 {
            let pm = generate_preset_pass_manager(level, &target).unwrap();
            let compiled = pm.run(ghz.clone()).unwrap();
            assert_isa(&compiled, &target);
            assert_equivalent(&ghz, &compiled);
        }
    }
}

#[test]
fn test_toffoli_compiles() {
    let mut circuit = Circuit::with_size("toffoli", 3, 0);
    circuit.h(QubitId(0)).unwrap();
    circuit.h(QubitId(1)).unwrap();
    circuit.ccx(QubitId(0), QubitId(1), QubitId(2)).unwrap();
    let target = heron_line();
    let compiled = generate_preset_pass_manager(3, &target)
        .unwrap()
        .run(circuit.clone())
        .unwrap();
    assert_isa(&compiled, &target);
    assert_equivalent(&circuit, &compiled);
}

#[test]
fn test_level_3_removes_redundant_pairs() {
    let mut circuit = Circuit::with_size("redundant", 2, 0);
    circuit.cx(QubitId(0), QubitId(1)).unwrap();
    circuit.h(QubitId(1)).unwrap();
    circuit.h(QubitId(1)).unwrap();
    circuit.cx(QubitId(0), QubitId(1)).unwrap();
    let compiled = generate_preset_pass_manager(3, &heron_line())
        .unwrap()
        .run(circuit)
        .unwrap();
    assert_eq!(compiled.num_ops(), 0);
}

#[test]
fn test_level_3_not_larger_than_level_0() {
    let mut circuit = Circuit::with_size("mix", 3, 0);
    circuit.h(QubitId(0)).unwrap();
    circuit.cx(QubitId(0), QubitId(2)).unwrap();
    circuit.t(QubitId(2)).unwrap();
    circuit.cx(QubitId(2), QubitId(1)).unwrap();
    circuit.h(QubitId(0)).unwrap();
    let target = heron_line();
    let l0 = generate_preset_pass_manager(0, &target)
        .unwrap()
        .run(circuit.clone())
        .unwrap();
    let l3 = generate_preset_pass_manager(3, &target)
        .unwrap()
        .run(circuit)
        .unwrap();
    assert!(l3.num_ops() <= l0.num_ops());
}

#[test]
fn test_measurements_survive_compilation() {
    let circuit = Circuit::bell().unwrap();
    let compiled = generate_preset_pass_manager(3, &heron_line())
        .unwrap()
        .run(circuit)
        .unwrap();
    let measures: Vec<&Instruction> = compiled
        .instructions()
        .iter()
        .filter(|i| i.is_measure())
        .collect();
    assert_eq!(measures.len(), 2);
    let layout = compiled.final_layout().unwrap();
    for (v, m) in measures.iter().enumerate() {
        assert_eq!(m.qubits[0].0, layout[m.clbits[0].0 as usize]);
        assert_eq!(m.clbits[0].0 as usize, v);
    }
}

#[test]
fn test_circuit_too_large() {
    let circuit = Circuit::with_size("wide", 6, 0);
    let err = generate_preset_pass_manager(3, &heron_line())
        .unwrap()
        .run(circuit)
        .unwrap_err();
    assert!(err.to_string().contains("requires 6 qubits"));
}

#[test]
fn test_huge_declared_width_is_rejected_at_every_level() {
    for level in 0..=3 {
        let circuit = Circuit::with_size("wide", u32::MAX, 0);
        let err = generate_preset_pass_manager(level, &heron_line())
            .unwrap()
            .run(circuit)
            .unwrap_err();
        assert!(
            err.to_string().contains("requires 4294967295 qubits"),
            "level {level}: {err}"
        );
    }
}

// ============================================================================
// Random circuits
// ============================================================================

fn arb_instruction(num_qubits: u32) -> impl Strategy<Value = Instruction> {
    let angle = -3.2_f64..3.2;
    let one = prop_oneof![
        Just(StandardGate::H),
        Just(StandardGate::X),
        Just(StandardGate::Y),
        Just(StandardGate::S),
        Just(StandardGate::Tdg),
        Just(StandardGate::SX),
        angle.clone().prop_map(StandardGate::Rz),
        angle.clone().prop_map(StandardGate::Ry),
        (angle.clone(), angle.clone(), angle).prop_map(|(a, b, c)| StandardGate::U(a, b, c)),
    ];
    let two = prop_oneof![
        Just(StandardGate::CX),
        Just(StandardGate::CZ),
        Just(StandardGate::Swap),
        Just(StandardGate::ECR),
    ];
    prop_oneof![
        (one, 0..num_qubits).prop_map(|(g, q)| Instruction::single_qubit_gate(g, QubitId(q))),
        (two, 0..num_qubits, 0..num_qubits)
            .prop_filter("operands must differ", |(_, a, b)| a != b)
            .prop_map(|(g, a, b)| Instruction::two_qubit_gate(g, QubitId(a), QubitId(b))),
    ]
}

fn arb_circuit() -> impl Strategy<Value = Circuit> {
    (2_u32..=4).prop_flat_map(|n| {
        prop::collection::vec(arb_instruction(n), 1..=16).prop_map(move |insts| {
            let mut circuit = Circuit::with_size("random", n, 0);
            for inst in insts {
                circuit.apply(inst).unwrap();
            }
            circuit
        })
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Every level on every target yields an equivalent, native circuit.
    #[test]
    fn test_compilation_preserves_semantics(circuit in arb_circuit(), level in 0_u8..=3) {
        for target in [heron_line(), eagle_ring(), u_cx_star(), calibrated_heron()] {
            let pm = generate_preset_pass_manager(level, &target).unwrap();
            let compiled = pm.run(circuit.clone()).unwrap();
            assert_isa(&compiled, &target);
            assert_equivalent(&circuit, &compiled);
        }
    }
}
