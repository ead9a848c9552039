//! The mixed-field Ising chain and its time evolution.
//!
//! The Hamiltonian is
//!
//! *H* = *J* Σ<sub>*i*</sub> *Z*<sub>*i*</sub> *Z*<sub>*i*+1</sub>
//!     + *g* Σ<sub>*i*</sub> *X*<sub>*i*</sub>
//!     + *h* Σ<sub>*i*</sub> *Z*<sub>*i*</sub>
//!
//! which is non-integrable for generic *g*, *h* and reduces to a set of
//! decoupled spins when *J* = 0. Evolution under *H* is available either
//! exactly, through the eigendecomposition of the full 2<sup>*N*</sup> ×
//! 2<sup>*N*</sup> matrix, or approximately, as a Trotterized circuit of
//! single-qubit *X*/*Z* rotations and nearest-neighbor *ZZ* rotations.

use nalgebra as na;
use num_complex::Complex64 as C64;
use crate::{
    circuit::{ Circuit, ExactEvolution },
    error::{ OtocError, OtocResult },
    gate::Gate,
};

/// Largest register for which dense Hamiltonians are constructed.
pub const MAX_EXACT_QUBITS: usize = 12;

/// Boundary conditions on the chain.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Boundary {
    Open,
    /// Couple the last site back to the first.
    ///
    /// Has no effect for chains shorter than three sites.
    Periodic,
}

/// Couplings for an `n`-site mixed-field Ising chain.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct IsingParams {
    pub n: usize,
    /// *ZZ* coupling
    pub j: f64,
    /// Transverse field
    pub g: f64,
    /// Longitudinal field
    pub h: f64,
    pub boundary: Boundary,
}

impl IsingParams {
    /// Couplings in the strongly chaotic regime: *J* = 1, *g* = –1.05, *h* =
    /// 0.5, with open boundaries.
    pub fn chaotic(n: usize) -> Self {
        Self { n, j: 1.0, g: -1.05, h: 0.5, boundary: Boundary::Open }
    }

    /// Like [`Self::chaotic`], but with the *ZZ* coupling switched off.
    ///
    /// Operators on different sites never develop overlapping support, so
    /// their commutator stays identically zero.
    pub fn free(n: usize) -> Self { Self { j: 0.0, ..Self::chaotic(n) } }

    pub fn with_boundary(mut self, boundary: Boundary) -> Self {
        self.boundary = boundary;
        self
    }

    /// Iterate over nearest-neighbor pairs.
    pub fn bonds(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let wrap
            = (self.boundary == Boundary::Periodic && self.n > 2)
            .then(|| (self.n - 1, 0));
        (0..self.n.saturating_sub(1))
            .map(|k| (k, k + 1))
            .chain(wrap)
    }

    fn check(&self) -> OtocResult<()> {
        if self.n == 0 {
            Err(OtocError::Empty("number of sites"))
        } else if self.n > MAX_EXACT_QUBITS {
            Err(OtocError::SystemTooLarge { n: self.n, max: MAX_EXACT_QUBITS })
        } else {
            Ok(())
        }
    }

    fn diagonal_energy(&self, idx: usize) -> f64 {
        let z = |k: usize| -> f64 {
            if (idx >> k) & 1 == 0 { 1.0 } else { -1.0 }
        };
        let zz: f64 = self.bonds().map(|(a, b)| z(a) * z(b)).sum();
        let zf: f64 = (0..self.n).map(z).sum();
        self.j * zz + self.h * zf
    }

    /// Construct the full Hamiltonian matrix in the Z basis.
    pub fn matrix(&self) -> OtocResult<na::DMatrix<C64>> {
        self.check()?;
        let dim = 1_usize << self.n;
        let mut H: na::DMatrix<C64> = na::DMatrix::zeros(dim, dim);
        for i in 0..dim {
            H[(i, i)] = self.diagonal_energy(i).into();
            for k in 0..self.n {
                H[(i ^ (1 << k), i)] += C64::from(self.g);
            }
        }
        Ok(H)
    }

    /// Diagonalize the Hamiltonian for exact evolution.
    pub fn propagator(&self) -> OtocResult<Propagator> {
        Propagator::new(self.matrix()?)
    }
}

pub(crate) fn check_time(t: f64) -> OtocResult<()> {
    if t.is_finite() && t >= 0.0 { Ok(()) } else { Err(OtocError::InvalidTime(t)) }
}

/// Exact time evolution under a fixed Hermitian Hamiltonian.
///
/// The Hamiltonian is diagonalized once, after which *U*(*t*) = *V*
/// e<sup>–i*Et*</sup> *V*<sup>†</sup> can be formed for any number of times.
#[derive(Clone, Debug)]
pub struct Propagator {
    n: usize,
    energies: na::DVector<f64>,
    vecs: na::DMatrix<C64>,
}

impl Propagator {
    /// Diagonalize a Hermitian matrix acting on a register of qubits.
    ///
    /// Only the lower triangle of `H` is read.
    pub fn new(H: na::DMatrix<C64>) -> OtocResult<Self> {
        let dim = H.nrows();
        if H.ncols() != dim {
            return Err(
                OtocError::DimensionMismatch { expected: dim, got: H.ncols() });
        }
        if dim < 2 || !dim.is_power_of_two() {
            return Err(OtocError::NotPowerOfTwo(dim));
        }
        let eig = H.symmetric_eigen();
        Ok(Self {
            n: dim.trailing_zeros() as usize,
            energies: eig.eigenvalues,
            vecs: eig.eigenvectors,
        })
    }

    pub fn num_qubits(&self) -> usize { self.n }

    /// Compute the unitary *U*(*t*) = exp(–i*Ht*).
    pub fn at(&self, t: f64) -> OtocResult<na::DMatrix<C64>> {
        check_time(t)?;
        let mut scaled = self.vecs.clone();
        for (mut col, &e) in
            scaled.column_iter_mut().zip(self.energies.iter())
        {
            col *= C64::cis(-e * t);
        }
        Ok(scaled * self.vecs.adjoint())
    }

    /// Like [`Self::at`], but wrapped for use as an
    /// [`Evolution`][crate::circuit::Evolution].
    pub fn evolution(&self, t: f64) -> OtocResult<ExactEvolution> {
        ExactEvolution::new(self.at(t)?)
    }
}

/// Order of the product formula used to Trotterize evolution.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TrotterOrder {
    /// e<sup>–i*H*<sub>*Z*</sub>*dt*</sup> e<sup>–i*H*<sub>*X*</sub>*dt*</sup>
    First,
    /// e<sup>–i*H*<sub>*Z*</sub>*dt*/2</sup> e<sup>–i*H*<sub>*X*</sub>*dt*</sup>
    /// e<sup>–i*H*<sub>*Z*</sub>*dt*/2</sup>
    Second,
}

fn push_x_layer(params: &IsingParams, dt: f64, gates: &mut Vec<Gate>) {
    if params.g != 0.0 {
        (0..params.n).for_each(|k| { gates.push(Gate::Rx(k, 2.0 * params.g * dt)); });
    }
}

fn push_z_layer(params: &IsingParams, dt: f64, gates: &mut Vec<Gate>) {
    if params.h != 0.0 {
        (0..params.n).for_each(|k| { gates.push(Gate::Rz(k, 2.0 * params.h * dt)); });
    }
    if params.j != 0.0 {
        params.bonds()
            .for_each(|(a, b)| { gates.push(Gate::Rzz(a, b, 2.0 * params.j * dt)); });
    }
}

fn push_step(
    params: &IsingParams,
    dt: f64,
    order: TrotterOrder,
    gates: &mut Vec<Gate>,
) {
    match order {
        TrotterOrder::First => {
            push_x_layer(params, dt, gates);
            push_z_layer(params, dt, gates);
        },
        TrotterOrder::Second => {
            push_z_layer(params, dt / 2.0, gates);
            push_x_layer(params, dt, gates);
            push_z_layer(params, dt / 2.0, gates);
        },
    }
}

/// Approximate evolution under the Ising Hamiltonian for time `t` with a
/// product formula of step size `dt`.
///
/// `floor(t / dt)` full steps are taken, followed by a single shorter step if
/// `t` is not an integer multiple of `dt`. Gates for vanishing couplings are
/// omitted.
pub fn trotter_circuit(
    params: &IsingParams,
    t: f64,
    dt: f64,
    order: TrotterOrder,
) -> OtocResult<Circuit>
{
    const EPSILON: f64 = 1e-9;
    check_time(t)?;
    if !dt.is_finite() || dt <= 0.0 {
        return Err(OtocError::InvalidStep(dt));
    }
    if params.n == 0 { return Err(OtocError::Empty("number of sites")); }
    let full = (t / dt + EPSILON).floor() as usize;
    let rem = t - full as f64 * dt;
    let mut gates: Vec<Gate> = Vec::new();
    (0..full).for_each(|_| { push_step(params, dt, order, &mut gates); });
    if rem > EPSILON * dt {
        push_step(params, rem, order, &mut gates);
    }
    Circuit::new(params.n, gates)
}
