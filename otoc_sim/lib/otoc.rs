//! Out-of-time-order correlators between local Pauli operators.
//!
//! For an evolution *U* and local Paulis *W*, *V*, let *W*(*t*) =
//! *U*<sup>†</sup>*WU*. Two kinds of quantity are computed here:
//!
//! - Directly, by state-vector algebra: the squared commutator
//!   *C* = ½ ‖[*W*(*t*), *V*]∣ψ⟩‖² and the four-point function
//!   *F* = ⟨ψ∣*W*(*t*)*VW*(*t*)*V*∣ψ⟩, related by *C* = 1 – Re *F*.
//! - Interferometrically, by simulating a Hadamard test with one ancilla: the
//!   ancilla is prepared in ∣+⟩, controls *V* and *W* around forward and
//!   backward evolution of the system, and is measured in the X basis. Its
//!   expectation value is Re⟨*W*(*t*)*V*⟩ or Re⟨*W*(*t*)*VW*(*t*)*V*⟩.

use std::fmt;
use num_complex::Complex64 as C64;
use rand::Rng;
use crate::{
    circuit::Evolution,
    error::{ check_nonzero, check_qubit, OtocError, OtocResult },
    gate::{ Gate, Pauli },
    noise::Depolarizing,
    state::StateVec,
};

/// A Pauli operator acting on a single site.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct SiteOp {
    pub pauli: Pauli,
    pub site: usize,
}

impl fmt::Display for SiteOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.pauli, self.site)
    }
}

impl SiteOp {
    pub fn new(pauli: Pauli, site: usize) -> Self { Self { pauli, site } }

    pub fn x(site: usize) -> Self { Self::new(Pauli::X, site) }

    pub fn y(site: usize) -> Self { Self::new(Pauli::Y, site) }

    pub fn z(site: usize) -> Self { Self::new(Pauli::Z, site) }

    pub fn apply(&self, state: &mut StateVec) {
        state.apply_pauli(self.pauli, self.site);
    }

    pub(crate) fn check(&self, n: usize) -> OtocResult<()> {
        check_qubit(self.site, n)
    }
}

/// Selects which correlator an [`Interferometer`] estimates.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Correlator {
    /// Re⟨*W*(*t*)*V*⟩
    TwoPoint,
    /// Re⟨*W*(*t*)*VW*(*t*)*V*⟩
    FourPoint,
}

/// Initial state of the system register.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InitialState {
    /// ∣0...0⟩
    Zeros,
    /// A fresh Haar-random state for every sample.
    Random,
}

impl InitialState {
    pub fn prepare<R>(&self, n: usize, rng: &mut R) -> StateVec
    where R: Rng + ?Sized
    {
        match self {
            Self::Zeros => StateVec::new(n),
            Self::Random => StateVec::random(n, rng),
        }
    }
}

fn check_setup<E>(evol: &E, w: SiteOp, v: SiteOp, psi: &StateVec)
    -> OtocResult<()>
where E: Evolution + ?Sized
{
    if evol.num_qubits() > psi.num_qubits() {
        return Err(OtocError::DimensionMismatch {
            expected: evol.num_qubits(),
            got: psi.num_qubits(),
        });
    }
    w.check(psi.num_qubits())?;
    v.check(psi.num_qubits())
}

// returns (W(t) V ψ, V W(t) ψ)
fn branches<E>(evol: &E, w: SiteOp, v: SiteOp, psi: &StateVec)
    -> (StateVec, StateVec)
where E: Evolution + ?Sized
{
    let mut a = psi.clone();
    v.apply(&mut a);
    evol.forward(&mut a);
    w.apply(&mut a);
    evol.backward(&mut a);

    let mut b = psi.clone();
    evol.forward(&mut b);
    w.apply(&mut b);
    evol.backward(&mut b);
    v.apply(&mut b);
    (a, b)
}

/// Compute ½ ‖[*W*(*t*), *V*]∣ψ⟩‖².
pub fn squared_commutator<E>(evol: &E, w: SiteOp, v: SiteOp, psi: &StateVec)
    -> OtocResult<f64>
where E: Evolution + ?Sized
{
    check_setup(evol, w, v, psi)?;
    let (a, b) = branches(evol, w, v, psi);
    Ok(0.5 * (a.amps() - b.amps()).norm_squared())
}

/// Compute ⟨ψ∣*W*(*t*)*VW*(*t*)*V*∣ψ⟩.
pub fn four_point<E>(evol: &E, w: SiteOp, v: SiteOp, psi: &StateVec)
    -> OtocResult<C64>
where E: Evolution + ?Sized
{
    check_setup(evol, w, v, psi)?;
    let (a, b) = branches(evol, w, v, psi);
    Ok(b.inner(&a))
}

/// Compute ⟨ψ∣*W*(*t*)*V*∣ψ⟩.
pub fn two_point<E>(evol: &E, w: SiteOp, v: SiteOp, psi: &StateVec)
    -> OtocResult<C64>
where E: Evolution + ?Sized
{
    check_setup(evol, w, v, psi)?;
    let mut a = psi.clone();
    v.apply(&mut a);
    evol.forward(&mut a);
    w.apply(&mut a);
    evol.backward(&mut a);
    Ok(psi.inner(&a))
}

#[derive(Copy, Clone, Debug)]
enum Step {
    Gate(Gate),
    Forward,
    Backward,
}

/// Ancilla-based measurement of an OTOC.
///
/// The system occupies qubits `0..n` and the ancilla sits at index `n`, where
/// `n` is the size of the evolution.
#[derive(Clone, Debug)]
pub struct Interferometer<'a, E> {
    evol: &'a E,
    steps: Vec<Step>,
}

impl<'a, E> Interferometer<'a, E>
where E: Evolution
{
    /// Set up the measurement of `correlator` for operators `w` and `v`, which
    /// must both lie within the evolution's register.
    pub fn new(evol: &'a E, w: SiteOp, v: SiteOp, correlator: Correlator)
        -> OtocResult<Self>
    {
        let n = evol.num_qubits();
        w.check(n)?;
        v.check(n)?;
        let anc = n;
        let cv = Gate::controlled(v.pauli, anc, v.site);
        let cw = Gate::controlled(w.pauli, anc, w.site);
        let reps = match correlator {
            Correlator::TwoPoint => 1,
            Correlator::FourPoint => 2,
        };
        let mut steps: Vec<Step> = vec![Step::Gate(Gate::H(anc))];
        for _ in 0..reps {
            steps.extend(cv.map(Step::Gate));
            steps.push(Step::Forward);
            steps.extend(cw.map(Step::Gate));
            steps.push(Step::Backward);
        }
        steps.push(Step::Gate(Gate::H(anc)));
        Ok(Self { evol, steps })
    }

    pub fn ancilla(&self) -> usize { self.evol.num_qubits() }

    fn prepare(&self, psi: &StateVec) -> OtocResult<StateVec> {
        let n = self.evol.num_qubits();
        if psi.num_qubits() != n {
            return Err(OtocError::DimensionMismatch {
                expected: n,
                got: psi.num_qubits(),
            });
        }
        Ok(psi.with_ancilla())
    }

    fn run(&self, state: &mut StateVec) {
        for step in self.steps.iter() {
            match step {
                Step::Gate(g) => { state.apply_gate(*g); },
                Step::Forward => { self.evol.forward(state); },
                Step::Backward => { self.evol.backward(state); },
            }
        }
    }

    fn run_noisy<R>(&self, state: &mut StateVec, noise: &Depolarizing, rng: &mut R)
    where R: Rng + ?Sized
    {
        for step in self.steps.iter() {
            match step {
                Step::Gate(g) => {
                    state.apply_gate(*g);
                    noise.apply_gate_error(state, g, rng);
                },
                Step::Forward => { self.evol.forward_noisy(state, noise, rng); },
                Step::Backward => { self.evol.backward_noisy(state, noise, rng); },
            }
        }
    }

    /// Return the exact ancilla ⟨*Z*⟩ for system state `psi`.
    pub fn expectation(&self, psi: &StateVec) -> OtocResult<f64> {
        let mut state = self.prepare(psi)?;
        self.run(&mut state);
        Ok(state.expect_z(self.ancilla()))
    }

    /// Return the exact ancilla ⟨*Z*⟩ at the end of a single noisy trajectory.
    ///
    /// Averaging over many calls converges to the noisy expectation value.
    pub fn expectation_noisy<R>(
        &self,
        psi: &StateVec,
        noise: &Depolarizing,
        rng: &mut R,
    ) -> OtocResult<f64>
    where R: Rng + ?Sized
    {
        let mut state = self.prepare(psi)?;
        self.run_noisy(&mut state, noise, rng);
        Ok(state.expect_z(self.ancilla()))
    }

    /// Estimate the ancilla ⟨*Z*⟩ from `shots` projective measurements.
    ///
    /// Without noise, the circuit is simulated once and all shots are drawn
    /// from the final state. With noise, every shot is a separate trajectory.
    pub fn sample<R>(
        &self,
        psi: &StateVec,
        shots: usize,
        noise: Option<&Depolarizing>,
        rng: &mut R,
    ) -> OtocResult<f64>
    where R: Rng + ?Sized
    {
        check_nonzero(shots, "shots")?;
        let anc = self.ancilla();
        match noise {
            Some(noise) if !noise.is_trivial() => {
                let init = self.prepare(psi)?;
                let mut total: f64 = 0.0;
                for _ in 0..shots {
                    let mut state = init.clone();
                    self.run_noisy(&mut state, noise, rng);
                    total += state.measure(anc, rng).sign();
                }
                Ok(total / shots as f64)
            },
            _ => {
                let mut state = self.prepare(psi)?;
                self.run(&mut state);
                state.sample_z(anc, shots, rng)
            },
        }
    }
}
