//! Unitary evolutions that can be run forward and backward on a state, and
//! random circuits of the kind used in random circuit sampling.

use nalgebra as na;
use num_complex::Complex64 as C64;
use rand::Rng;
use crate::{
    error::{ check_nonzero, OtocError, OtocResult },
    gate::Gate,
    noise::Depolarizing,
    state::StateVec,
};

/// A unitary *U* acting on the lowest `num_qubits` qubits of a register.
///
/// OTOC measurements need both *U* and *U*<sup>†</sup>, so implementors provide
/// both directions. Registers larger than `num_qubits` are allowed; the extra
/// qubits (e.g. an ancilla) are left untouched.
pub trait Evolution {
    fn num_qubits(&self) -> usize;

    /// Apply *U*.
    fn forward(&self, state: &mut StateVec);

    /// Apply *U*<sup>†</sup>.
    fn backward(&self, state: &mut StateVec);

    /// Apply *U*, inserting depolarizing errors.
    ///
    /// By default the whole evolution is treated as a single gate touching
    /// every qubit.
    fn forward_noisy<R>(&self, state: &mut StateVec, noise: &Depolarizing, rng: &mut R)
    where R: Rng + ?Sized
    {
        self.forward(state);
        noise.apply_layer(state, 0..self.num_qubits(), rng);
    }

    /// Apply *U*<sup>†</sup>, inserting depolarizing errors.
    fn backward_noisy<R>(&self, state: &mut StateVec, noise: &Depolarizing, rng: &mut R)
    where R: Rng + ?Sized
    {
        self.backward(state);
        noise.apply_layer(state, 0..self.num_qubits(), rng);
    }
}

/// Evolution by a dense unitary matrix.
#[derive(Clone, Debug)]
pub struct ExactEvolution {
    n: usize,
    u: na::DMatrix<C64>,
    u_adj: na::DMatrix<C64>,
}

impl ExactEvolution {
    /// Wrap a 2<sup>*n*</sup> × 2<sup>*n*</sup> unitary. Unitarity is not
    /// checked.
    pub fn new(u: na::DMatrix<C64>) -> OtocResult<Self> {
        let dim = u.nrows();
        if u.ncols() != dim {
            return Err(
                OtocError::DimensionMismatch { expected: dim, got: u.ncols() });
        }
        if dim < 2 || !dim.is_power_of_two() {
            return Err(OtocError::NotPowerOfTwo(dim));
        }
        let u_adj = u.adjoint();
        Ok(Self { n: dim.trailing_zeros() as usize, u, u_adj })
    }

    pub fn matrix(&self) -> &na::DMatrix<C64> { &self.u }
}

impl Evolution for ExactEvolution {
    fn num_qubits(&self) -> usize { self.n }

    fn forward(&self, state: &mut StateVec) {
        state.apply_register_unchecked(&self.u);
    }

    fn backward(&self, state: &mut StateVec) {
        state.apply_register_unchecked(&self.u_adj);
    }
}

/// A series of [`Gate`]s on an `n`-qubit register.
///
/// All gates are guaranteed to apply to qubit indices less than `n` and all
/// two-qubit gate indices are guaranteed to be non-equal.
#[derive(Clone, Debug, PartialEq)]
pub struct Circuit {
    n: usize,
    gates: Vec<Gate>,
}

impl IntoIterator for Circuit {
    type Item = Gate;
    type IntoIter = <Vec<Gate> as IntoIterator>::IntoIter;

    fn into_iter(self) -> Self::IntoIter { self.gates.into_iter() }
}

impl<'a> IntoIterator for &'a Circuit {
    type Item = &'a Gate;
    type IntoIter = <&'a Vec<Gate> as IntoIterator>::IntoIter;

    fn into_iter(self) -> Self::IntoIter { self.gates.iter() }
}

impl Circuit {
    /// Convert a series of gates to a new `n`-qubit circuit, verifying that all
    /// qubit indices are less than `n` and that all two-qubit gate indices are
    /// non-equal.
    pub fn new<I>(n: usize, gates: I) -> OtocResult<Self>
    where I: IntoIterator<Item = Gate>
    {
        check_nonzero(n, "number of qubits")?;
        let gates: Vec<Gate> = gates.into_iter().collect();
        gates.iter().try_for_each(|g| g.check(n))?;
        Ok(Self { n, gates })
    }

    /// Create an empty circuit.
    pub fn identity(n: usize) -> Self { Self { n, gates: Vec::new() } }

    pub fn len(&self) -> usize { self.gates.len() }

    pub fn is_empty(&self) -> bool { self.gates.is_empty() }

    pub fn gates(&self) -> &[Gate] { &self.gates }

    /// Append a gate, verifying its qubit indices.
    pub fn push(&mut self, gate: Gate) -> OtocResult<&mut Self> {
        gate.check(self.n)?;
        self.gates.push(gate);
        Ok(self)
    }

    /// Return the circuit implementing the inverse unitary.
    pub fn inverse(&self) -> Self {
        Self {
            n: self.n,
            gates: self.gates.iter().rev().map(Gate::inverse).collect(),
        }
    }
}

impl Evolution for Circuit {
    fn num_qubits(&self) -> usize { self.n }

    fn forward(&self, state: &mut StateVec) {
        state.apply_circuit(&self.gates);
    }

    fn backward(&self, state: &mut StateVec) {
        self.gates.iter().rev()
            .for_each(|g| { state.apply_gate(g.inverse()); });
    }

    fn forward_noisy<R>(&self, state: &mut StateVec, noise: &Depolarizing, rng: &mut R)
    where R: Rng + ?Sized
    {
        for g in self.gates.iter() {
            state.apply_gate(*g);
            noise.apply_gate_error(state, g, rng);
        }
    }

    fn backward_noisy<R>(&self, state: &mut StateVec, noise: &Depolarizing, rng: &mut R)
    where R: Rng + ?Sized
    {
        for g in self.gates.iter().rev() {
            let ginv = g.inverse();
            state.apply_gate(ginv);
            noise.apply_gate_error(state, &ginv, rng);
        }
    }
}

struct Brickwork {
    iter: std::ops::Range<usize>
}

impl Brickwork {
    fn new(offs: bool, stop: usize) -> Self {
        Self { iter: if offs { 1 } else { 0 } .. stop }
    }
}

impl Iterator for Brickwork {
    type Item = Gate;

    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next()
            .zip(self.iter.next())
            .map(|(a, b)| Gate::CZ(a, b))
    }
}

/// Generate a random `n`-qubit circuit of `depth` layers.
///
/// Each layer consists of the following:
/// 1. Apply a random single-qubit gate (√*X*, √*Y*, √*W*) to each qubit,
/// never repeating the gate applied to the same qubit in the previous layer
/// 1. Apply a CZ to adjacent pairs of qubits, alternating between left and
/// right neighbors on each layer
///
/// A circuit of depth 0 is the identity.
pub fn random_circuit<R>(n: usize, depth: usize, rng: &mut R) -> Circuit
where R: Rng + ?Sized
{
    let mut gates: Vec<Gate> = Vec::with_capacity(depth * (n + n / 2));
    let mut prev: Vec<Option<Gate>> = vec![None; n];
    for d in 0..depth {
        for (k, pk) in prev.iter_mut().enumerate() {
            let g = Gate::sample_single_except(k, pk.as_ref(), rng);
            gates.push(g);
            *pk = Some(g);
        }
        Brickwork::new(d % 2 == 1, n).for_each(|cz| { gates.push(cz); });
    }
    Circuit { n, gates }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{ rngs::StdRng, SeedableRng };

    #[test]
    fn brickwork_alternates() {
        let even: Vec<Gate> = Brickwork::new(false, 5).collect();
        assert_eq!(even, vec![Gate::CZ(0, 1), Gate::CZ(2, 3)]);
        let odd: Vec<Gate> = Brickwork::new(true, 5).collect();
        assert_eq!(odd, vec![Gate::CZ(1, 2), Gate::CZ(3, 4)]);
    }

    #[test]
    fn random_circuit_layout() {
        let mut rng = StdRng::seed_from_u64(10546);
        let circ = random_circuit(4, 3, &mut rng);
        // 4 single-qubit gates per layer; 2, 1, 2 CZs
        assert_eq!(circ.len(), 3 * 4 + 2 + 1 + 2);
        assert!(circ.gates().iter().all(|g| g.check(4).is_ok()));
        assert!(random_circuit(4, 0, &mut rng).is_empty());
    }

    #[test]
    fn circuit_validation() {
        assert_eq!(
            Circuit::new(2, [Gate::H(0), Gate::CZ(0, 2)]),
            Err(OtocError::QubitOutOfRange { qubit: 2, n: 2 }),
        );
        let mut circ = Circuit::identity(2);
        assert!(circ.push(Gate::Swap(1, 1)).is_err());
        assert!(circ.push(Gate::Swap(0, 1)).is_ok());
        assert_eq!(circ.len(), 1);
    }

    #[test]
    fn inverse_undoes_circuit() {
        let mut rng = StdRng::seed_from_u64(10546);
        let circ = random_circuit(4, 6, &mut rng);
        let psi = StateVec::random(4, &mut rng);
        let mut phi = psi.clone();
        circ.forward(&mut phi);
        assert!((psi.inner(&phi).norm() - 1.0).abs() > 1e-6);
        circ.inverse().forward(&mut phi);
        assert!((psi.inner(&phi).norm() - 1.0).abs() < 1e-10);
        assert_eq!(circ.inverse().inverse(), circ);
    }
}
