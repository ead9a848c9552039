use nalgebra as na;
use num_complex::Complex64 as C64;
use rand::{ rngs::StdRng, SeedableRng };
use otoc_sim::{
    gate::{ Gate, Pauli },
    state::{ Outcome, StateVec },
    OtocError,
};

fn close(a: &StateVec, b: &StateVec) -> bool {
    (a.amps() - b.amps()).norm() < 1e-12
}

#[test]
fn two_qubit_gates() {
    let mut psi = StateVec::basis(3, 0b001);
    psi.apply_gate(Gate::Swap(0, 2));
    assert_eq!(psi, StateVec::basis(3, 0b100));

    let mut psi = StateVec::basis(2, 0b11);
    psi.apply_gate(Gate::CZ(0, 1));
    assert!((psi.amps()[3] + 1.0).norm() < 1e-15);

    let mut psi = StateVec::basis(2, 0b01);
    psi.apply_gate(Gate::CX(0, 1));
    assert_eq!(psi, StateVec::basis(2, 0b11));
}

#[test]
fn rzz_decomposes_into_cnots() {
    let mut rng = StdRng::seed_from_u64(10546);
    let psi = StateVec::random(3, &mut rng);
    let mut a = psi.clone();
    a.apply_gate(Gate::Rzz(0, 2, 0.37));
    let mut b = psi.clone();
    b.apply_gate(Gate::CX(0, 2))
        .apply_gate(Gate::Rz(2, 0.37))
        .apply_gate(Gate::CX(0, 2));
    assert!(close(&a, &b));
}

#[test]
fn gates_invert_on_states() {
    let mut rng = StdRng::seed_from_u64(10546);
    let psi = StateVec::random(3, &mut rng);
    let gates = [
        Gate::H(0), Gate::S(1), Gate::SqrtX(2), Gate::SqrtY(0), Gate::SqrtW(1),
        Gate::Rx(2, 1.1), Gate::Ry(0, -0.4), Gate::CY(2, 0),
        Gate::Rzz(1, 2, 2.2),
    ];
    let mut state = psi.clone();
    state.apply_circuit(&gates);
    gates.iter().rev().for_each(|g| { state.apply_gate(g.inverse()); });
    assert!(close(&state, &psi));
}

#[test]
fn measurement_collapses() {
    let mut rng = StdRng::seed_from_u64(10546);
    for _ in 0..20 {
        let mut bell = StateVec::new(2);
        bell.apply_gate(Gate::H(0)).apply_gate(Gate::CX(0, 1));
        let first = bell.measure(0, &mut rng);
        assert!(!first.is_deterministic());
        let second = bell.measure(1, &mut rng);
        assert!(second.is_deterministic());
        assert_eq!(first.is_one(), second.is_one());
        assert!((bell.norm() - 1.0).abs() < 1e-12);
    }
    let mut one = StateVec::basis(1, 1);
    assert_eq!(one.measure(0, &mut rng), Outcome::Det1);
    assert_eq!(Outcome::Det1.sign(), -1.0);
}

#[test]
fn sampling_matches_expectation() {
    let mut rng = StdRng::seed_from_u64(10546);
    let mut psi = StateVec::new(1);
    psi.apply_gate(Gate::Ry(0, 1.0));
    let est = psi.sample_z(0, 20000, &mut rng).unwrap();
    assert!((est - psi.expect_z(0)).abs() < 0.03);
    assert!((psi.expect_z(0) - 1.0_f64.cos()).abs() < 1e-12);
    assert_eq!(psi.sample_z(0, 0, &mut rng), Err(OtocError::Empty("shots")));
}

#[test]
fn ancilla_and_dense_operators() {
    let mut rng = StdRng::seed_from_u64(10546);
    let psi = StateVec::random(2, &mut rng);
    let ext = psi.with_ancilla();
    assert_eq!(ext.num_qubits(), 3);
    assert!(ext.prob_one(2).abs() < 1e-15);
    assert!((ext.prob_one(0) - psi.prob_one(0)).abs() < 1e-12);

    let s = std::f64::consts::FRAC_1_SQRT_2;
    let h: na::DMatrix<C64>
        = na::DMatrix::from_row_slice(2, 2, &[s.into(), s.into(), s.into(), (-s).into()]);
    let mut a = ext.clone();
    a.apply_register(&h).unwrap();
    let mut b = ext.clone();
    b.apply_gate(Gate::H(0));
    assert!(close(&a, &b));

    let big: na::DMatrix<C64> = na::DMatrix::identity(16, 16);
    assert!(a.apply_register(&big).is_err());
}

#[test]
fn construction_errors() {
    let zeros: na::DVector<C64> = na::DVector::zeros(4);
    assert_eq!(StateVec::from_amps(zeros), Err(OtocError::ZeroNorm));
    let odd: na::DVector<C64> = na::DVector::from_element(3, C64::from(1.0));
    assert_eq!(StateVec::from_amps(odd), Err(OtocError::NotPowerOfTwo(3)));
    let ok: na::DVector<C64> = na::DVector::from_element(4, C64::from(3.0));
    let psi = StateVec::from_amps(ok).unwrap();
    assert_eq!(psi.num_qubits(), 2);
    assert!((psi.norm() - 1.0).abs() < 1e-12);

    let mut psi = StateVec::new(2);
    psi.apply_pauli(Pauli::X, 1).apply_pauli(Pauli::I, 0);
    assert_eq!(psi, StateVec::basis(2, 0b10));
}
