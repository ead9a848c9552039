//! Pure *N*-qubit states stored as complex amplitude vectors.
//!
//! Qubit *k* corresponds to bit *k* of a basis index, so that ∣0...01⟩ (qubit 0
//! in ∣1⟩, all others in ∣0⟩) is found at index 1. Appending an ancilla with
//! [`StateVec::with_ancilla`] therefore places it at the highest bit, and a
//! dense operator acting on the lowest *m* qubits can be applied blockwise over
//! contiguous chunks of length 2<sup>*m*</sup>.
//!
//! # Example
//! ```
//! use otoc_sim::{ state::StateVec, gate::Gate };
//!
//! // prepare a Bell state on qubits 0, 1 of a three-qubit register
//! let mut psi = StateVec::new(3);
//! psi.apply_gate(Gate::H(0)).apply_gate(Gate::CX(0, 1));
//! assert!((psi.prob_one(1) - 0.5).abs() < 1e-12);
//! assert!(psi.prob_one(2).abs() < 1e-12);
//! ```

use nalgebra as na;
use num_complex::Complex64 as C64;
use rand::Rng;
use rand_distr::StandardNormal;
use crate::{
    error::{ check_nonzero, OtocError, OtocResult },
    gate::{ Gate, Mat2, Pauli },
};

// measurement probabilities within this distance of 0 or 1 are treated as
// deterministic
const DET_TOL: f64 = 1e-12;

/// Largest register, ancillas included, that experiment drivers will allocate
/// a state vector for.
pub const MAX_STATE_QUBITS: usize = 24;

pub(crate) fn check_size(n: usize) -> OtocResult<()> {
    if n <= MAX_STATE_QUBITS {
        Ok(())
    } else {
        Err(OtocError::SystemTooLarge { n, max: MAX_STATE_QUBITS })
    }
}

/// The result of a projective Z-basis measurement.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// A deterministic outcome resulting in ∣0⟩
    Det0,
    /// A deterministic outcome resulting in ∣1⟩
    Det1,
    /// A random outcome resulting in ∣0⟩
    Rand0,
    /// A random outcome resulting in ∣1⟩
    Rand1,
}

impl Outcome {
    pub fn is_one(self) -> bool { matches!(self, Self::Det1 | Self::Rand1) }

    pub fn is_deterministic(self) -> bool {
        matches!(self, Self::Det0 | Self::Det1)
    }

    /// Return the Z eigenvalue, +1 for ∣0⟩ and –1 for ∣1⟩.
    pub fn sign(self) -> f64 { if self.is_one() { -1.0 } else { 1.0 } }
}

/// A pure state of an `n`-qubit register.
#[derive(Clone, Debug, PartialEq)]
pub struct StateVec {
    n: usize,
    amps: na::DVector<C64>,
}

impl StateVec {
    /// Create a new `n`-qubit state initialized to ∣0...0⟩.
    pub fn new(n: usize) -> Self { Self::basis(n, 0) }

    /// Create a new `n`-qubit computational basis state.
    ///
    /// *Panics if `idx` is not less than 2<sup>`n`</sup>.*
    pub fn basis(n: usize, idx: usize) -> Self {
        let dim = 1_usize << n;
        if idx >= dim {
            panic!("StateVec: basis index {idx} out of range for {n} qubits");
        }
        let mut amps = na::DVector::zeros(dim);
        amps[idx] = C64::from(1.0);
        Self { n, amps }
    }

    /// Wrap a vector of amplitudes, normalizing it.
    pub fn from_amps(mut amps: na::DVector<C64>) -> OtocResult<Self> {
        let dim = amps.len();
        if dim == 0 || !dim.is_power_of_two() {
            return Err(OtocError::NotPowerOfTwo(dim));
        }
        if amps.normalize_mut() == 0.0 {
            return Err(OtocError::ZeroNorm);
        }
        Ok(Self { n: dim.trailing_zeros() as usize, amps })
    }

    /// Sample a Haar-random `n`-qubit state.
    ///
    /// Averages over such states approximate infinite-temperature ensemble
    /// averages, with fluctuations shrinking as 2<sup>–`n`/2</sup>.
    pub fn random<R>(n: usize, rng: &mut R) -> Self
    where R: Rng + ?Sized
    {
        let dim = 1_usize << n;
        let mut amps: na::DVector<C64>
            = na::DVector::from_fn(dim, |_, _| {
                let re: f64 = rng.sample(StandardNormal);
                let im: f64 = rng.sample(StandardNormal);
                C64::new(re, im)
            });
        amps.normalize_mut();
        Self { n, amps }
    }

    pub fn num_qubits(&self) -> usize { self.n }

    pub fn dim(&self) -> usize { self.amps.len() }

    pub fn amps(&self) -> &na::DVector<C64> { &self.amps }

    pub fn norm(&self) -> f64 { self.amps.norm() }

    pub fn normalize(&mut self) -> &mut Self {
        self.amps.normalize_mut();
        self
    }

    /// Compute ⟨`self`∣`other`⟩.
    pub fn inner(&self, other: &Self) -> C64 { self.amps.dotc(&other.amps) }

    /// Copy `self` into a register one qubit larger, with the extra qubit in
    /// ∣0⟩ at index `self.num_qubits()`.
    pub fn with_ancilla(&self) -> Self {
        let dim = self.dim();
        let mut amps = na::DVector::zeros(2 * dim);
        amps.as_mut_slice()[..dim].copy_from_slice(self.amps.as_slice());
        Self { n: self.n + 1, amps }
    }

    fn apply_mat2(&mut self, k: usize, m: &Mat2) -> &mut Self {
        let mask = 1_usize << k;
        let amps = self.amps.as_mut_slice();
        for i0 in (0..amps.len()).filter(|i| i & mask == 0) {
            let i1 = i0 | mask;
            let (a0, a1) = (amps[i0], amps[i1]);
            amps[i0] = m[0][0] * a0 + m[0][1] * a1;
            amps[i1] = m[1][0] * a0 + m[1][1] * a1;
        }
        self
    }

    fn apply_controlled_mat2(&mut self, c: usize, t: usize, m: &Mat2)
        -> &mut Self
    {
        let cmask = 1_usize << c;
        let tmask = 1_usize << t;
        let amps = self.amps.as_mut_slice();
        for i0 in (0..amps.len()).filter(|i| i & cmask != 0 && i & tmask == 0) {
            let i1 = i0 | tmask;
            let (a0, a1) = (amps[i0], amps[i1]);
            amps[i0] = m[0][0] * a0 + m[0][1] * a1;
            amps[i1] = m[1][0] * a0 + m[1][1] * a1;
        }
        self
    }

    /// Perform the action of a gate.
    ///
    /// Qubit indices are not checked here; see [`Gate::check`].
    pub fn apply_gate(&mut self, gate: Gate) -> &mut Self {
        if let Some(m) = gate.matrix() {
            return self.apply_mat2(gate.qubits().0, &m);
        }
        match gate {
            Gate::CX(c, t)
                => self.apply_controlled_mat2(c, t, &Pauli::X.matrix()),
            Gate::CY(c, t)
                => self.apply_controlled_mat2(c, t, &Pauli::Y.matrix()),
            Gate::CZ(a, b) => {
                let mask = (1_usize << a) | (1_usize << b);
                self.amps.iter_mut()
                    .enumerate()
                    .filter(|(i, _)| i & mask == mask)
                    .for_each(|(_, ai)| { *ai = -*ai; });
                self
            },
            Gate::Swap(a, b) => {
                let amask = 1_usize << a;
                let bmask = 1_usize << b;
                let amps = self.amps.as_mut_slice();
                for i in (0..amps.len()).filter(|i| i & amask != 0 && i & bmask == 0) {
                    amps.swap(i, (i ^ amask) | bmask);
                }
                self
            },
            Gate::Rzz(a, b, ang) => {
                let even = C64::cis(-ang / 2.0);
                let odd = C64::cis(ang / 2.0);
                self.amps.iter_mut()
                    .enumerate()
                    .for_each(|(i, ai)| {
                        let parity = ((i >> a) ^ (i >> b)) & 1;
                        *ai *= if parity == 0 { even } else { odd };
                    });
                self
            },
            _ => unreachable!(),
        }
    }

    /// Perform a series of gates.
    pub fn apply_circuit<'a, I>(&mut self, gates: I) -> &mut Self
    where I: IntoIterator<Item = &'a Gate>
    {
        gates.into_iter().for_each(|g| { self.apply_gate(*g); });
        self
    }

    /// Apply a single Pauli operator to qubit `k`.
    pub fn apply_pauli(&mut self, pauli: Pauli, k: usize) -> &mut Self {
        match pauli {
            Pauli::I => self,
            p => self.apply_mat2(k, &p.matrix()),
        }
    }

    /// Apply a dense operator to the lowest *m* qubits of the register, where
    /// the operator is 2<sup>*m*</sup> × 2<sup>*m*</sup>.
    pub fn apply_register(&mut self, op: &na::DMatrix<C64>)
        -> OtocResult<&mut Self>
    {
        let d = op.nrows();
        if op.ncols() != d || !d.is_power_of_two() || d > self.dim() {
            return Err(
                OtocError::DimensionMismatch { expected: self.dim(), got: d });
        }
        Ok(self.apply_register_unchecked(op))
    }

    pub(crate) fn apply_register_unchecked(&mut self, op: &na::DMatrix<C64>)
        -> &mut Self
    {
        let d = op.nrows();
        for chunk in self.amps.as_mut_slice().chunks_exact_mut(d) {
            let v = na::DVector::from_column_slice(chunk);
            let out = op * &v;
            chunk.copy_from_slice(out.as_slice());
        }
        self
    }

    /// Return the probability of finding qubit `k` in ∣1⟩.
    pub fn prob_one(&self, k: usize) -> f64 {
        let mask = 1_usize << k;
        self.amps.iter()
            .enumerate()
            .filter(|(i, _)| i & mask != 0)
            .map(|(_, ai)| ai.norm_sqr())
            .sum()
    }

    /// Return ⟨*Z*<sub>*k*</sub>⟩.
    pub fn expect_z(&self, k: usize) -> f64 { 1.0 - 2.0 * self.prob_one(k) }

    /// Perform a projective measurement on a qubit `k` in the Z-basis,
    /// returning the outcome of the measurement and collapsing the state.
    pub fn measure<R>(&mut self, k: usize, rng: &mut R) -> Outcome
    where R: Rng + ?Sized
    {
        let p1 = self.prob_one(k);
        let outcome
            = if p1 < DET_TOL {
                Outcome::Det0
            } else if p1 > 1.0 - DET_TOL {
                Outcome::Det1
            } else if rng.gen::<f64>() < p1 {
                Outcome::Rand1
            } else {
                Outcome::Rand0
            };
        let mask = 1_usize << k;
        let keep = if outcome.is_one() { mask } else { 0 };
        self.amps.iter_mut()
            .enumerate()
            .filter(|(i, _)| i & mask != keep)
            .for_each(|(_, ai)| { *ai = C64::from(0.0); });
        self.normalize();
        outcome
    }

    /// Sample `shots` Z-basis measurements of qubit `k` without collapsing the
    /// state, returning the mean of the ±1 outcomes.
    pub fn sample_z<R>(&self, k: usize, shots: usize, rng: &mut R)
        -> OtocResult<f64>
    where R: Rng + ?Sized
    {
        check_nonzero(shots, "shots")?;
        let p1 = self.prob_one(k);
        let ones = (0..shots).filter(|_| rng.gen::<f64>() < p1).count();
        Ok((shots as f64 - 2.0 * ones as f64) / shots as f64)
    }
}
