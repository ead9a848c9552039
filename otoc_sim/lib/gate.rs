//! Single- and two-qubit gates, plus the Pauli operators used as OTOC probes.
//!
//! Rotations follow the usual convention *R*<sub>*P*</sub>(θ) = exp(–iθ*P*/2)
//! and *R*<sub>*ZZ*</sub>(θ) = exp(–iθ *Z*⊗*Z*/2). Square-root gates are
//! defined as √*P* = e<sup>iπ/4</sup> (*I* – i*P*) / √2 so that (√*P*)² = *P*,
//! with *W* = (*X* + *Y*) / √2.

use std::{
    f64::consts::{ FRAC_1_SQRT_2, FRAC_PI_4 },
    fmt,
};
use num_complex::Complex64 as C64;
use once_cell::sync::Lazy;
use rand::Rng;
use crate::error::{ check_qubit, OtocError, OtocResult };

/// A 2 × 2 complex matrix in row-major order.
pub type Mat2 = [[C64; 2]; 2];

const ZERO: C64 = C64 { re: 0.0, im: 0.0 };
const ONE: C64 = C64 { re: 1.0, im: 0.0 };
const I: C64 = C64 { re: 0.0, im: 1.0 };

/// A single-qubit Pauli operator.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Pauli {
    /// Identity
    I,
    /// σ<sub>*x*</sub>
    X,
    /// σ<sub>*y*</sub>
    Y,
    /// σ<sub>*z*</sub>
    Z,
}

impl fmt::Display for Pauli {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::I => write!(f, "{}", if f.alternate() { "." } else { "I" }),
            _ => write!(f, "{:?}", self),
        }
    }
}

impl Pauli {
    pub fn from_int(u: usize) -> Self {
        match u % 4 {
            0 => Self::I,
            1 => Self::X,
            2 => Self::Y,
            3 => Self::Z,
            _ => unreachable!(),
        }
    }

    /// Sample one of `X`, `Y`, or `Z` uniformly.
    pub fn sample_nontrivial<R>(rng: &mut R) -> Self
    where R: Rng + ?Sized
    {
        Self::from_int(rng.gen_range(1..=3))
    }

    pub fn matrix(self) -> Mat2 {
        match self {
            Self::I => [[ONE,  ZERO], [ZERO,  ONE]],
            Self::X => [[ZERO, ONE ], [ONE,   ZERO]],
            Self::Y => [[ZERO, -I  ], [I,     ZERO]],
            Self::Z => [[ONE,  ZERO], [ZERO, -ONE ]],
        }
    }
}

fn adjoint(m: &Mat2) -> Mat2 {
    [
        [m[0][0].conj(), m[1][0].conj()],
        [m[0][1].conj(), m[1][1].conj()],
    ]
}

fn sqrt_of(p: &Mat2) -> Mat2 {
    let pre = C64::cis(FRAC_PI_4) * FRAC_1_SQRT_2;
    let mut out = [[ZERO; 2]; 2];
    for (r, row) in out.iter_mut().enumerate() {
        for (c, elem) in row.iter_mut().enumerate() {
            let id = if r == c { ONE } else { ZERO };
            *elem = pre * (id - I * p[r][c]);
        }
    }
    out
}

static W_MAT: Lazy<Mat2> = Lazy::new(|| {
    [[ZERO, C64::cis(-FRAC_PI_4)], [C64::cis(FRAC_PI_4), ZERO]]
});
static SQRT_X: Lazy<Mat2> = Lazy::new(|| sqrt_of(&Pauli::X.matrix()));
static SQRT_Y: Lazy<Mat2> = Lazy::new(|| sqrt_of(&Pauli::Y.matrix()));
static SQRT_W: Lazy<Mat2> = Lazy::new(|| sqrt_of(&W_MAT));

/// Description of a single gate for a register of qubits.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Gate {
    /// Hadamard
    H(usize),
    /// π rotation about X
    X(usize),
    /// π rotation about Y
    Y(usize),
    /// π rotation about Z
    Z(usize),
    /// π/2 rotation about Z
    S(usize),
    /// –π/2 rotation about Z
    SInv(usize),
    /// Square root of X
    SqrtX(usize),
    /// Inverse of [`Self::SqrtX`]
    SqrtXInv(usize),
    /// Square root of Y
    SqrtY(usize),
    /// Inverse of [`Self::SqrtY`]
    SqrtYInv(usize),
    /// Square root of W = (X + Y) / √2
    SqrtW(usize),
    /// Inverse of [`Self::SqrtW`]
    SqrtWInv(usize),
    /// Arbitrary rotation about X
    Rx(usize, f64),
    /// Arbitrary rotation about Y
    Ry(usize, f64),
    /// Arbitrary rotation about Z
    Rz(usize, f64),
    /// Z-controlled π rotation about X.
    ///
    /// The first qubit index is the control.
    CX(usize, usize),
    /// Z-controlled π rotation about Y.
    ///
    /// The first qubit index is the control.
    CY(usize, usize),
    /// Z-controlled π rotation about Z.
    ///
    /// The first qubit index is the control.
    CZ(usize, usize),
    /// Swap
    Swap(usize, usize),
    /// Arbitrary rotation about Z ⊗ Z
    Rzz(usize, usize, f64),
}

impl Gate {
    /// Return `true` if `self` acts on a single qubit.
    pub fn is_single(&self) -> bool { self.qubits().1.is_none() }

    /// Return the qubit(s) acted on by `self`, with the control qubit first
    /// for controlled gates.
    pub fn qubits(&self) -> (usize, Option<usize>) {
        match *self {
            Self::H(k)
            | Self::X(k)
            | Self::Y(k)
            | Self::Z(k)
            | Self::S(k)
            | Self::SInv(k)
            | Self::SqrtX(k)
            | Self::SqrtXInv(k)
            | Self::SqrtY(k)
            | Self::SqrtYInv(k)
            | Self::SqrtW(k)
            | Self::SqrtWInv(k)
            | Self::Rx(k, _)
            | Self::Ry(k, _)
            | Self::Rz(k, _)
            => (k, None),
            Self::CX(a, b)
            | Self::CY(a, b)
            | Self::CZ(a, b)
            | Self::Swap(a, b)
            | Self::Rzz(a, b, _)
            => (a, Some(b)),
        }
    }

    /// Verify that all qubit indices are less than `n` and that two-qubit
    /// indices are distinct.
    pub fn check(&self, n: usize) -> OtocResult<()> {
        match self.qubits() {
            (a, None) => check_qubit(a, n),
            (a, Some(b)) => {
                check_qubit(a, n)?;
                check_qubit(b, n)?;
                if a == b { Err(OtocError::SameQubit(a)) } else { Ok(()) }
            },
        }
    }

    /// Return the inverse of `self`.
    pub fn inverse(&self) -> Self {
        match *self {
            Self::S(k) => Self::SInv(k),
            Self::SInv(k) => Self::S(k),
            Self::SqrtX(k) => Self::SqrtXInv(k),
            Self::SqrtXInv(k) => Self::SqrtX(k),
            Self::SqrtY(k) => Self::SqrtYInv(k),
            Self::SqrtYInv(k) => Self::SqrtY(k),
            Self::SqrtW(k) => Self::SqrtWInv(k),
            Self::SqrtWInv(k) => Self::SqrtW(k),
            Self::Rx(k, ang) => Self::Rx(k, -ang),
            Self::Ry(k, ang) => Self::Ry(k, -ang),
            Self::Rz(k, ang) => Self::Rz(k, -ang),
            Self::Rzz(a, b, ang) => Self::Rzz(a, b, -ang),
            g => g,
        }
    }

    /// Return the 2 × 2 unitary for a single-qubit gate, or `None` for a
    /// two-qubit gate.
    pub fn matrix(&self) -> Option<Mat2> {
        let mat = match *self {
            Self::H(_) => {
                let h = C64::from(FRAC_1_SQRT_2);
                [[h, h], [h, -h]]
            },
            Self::X(_) => Pauli::X.matrix(),
            Self::Y(_) => Pauli::Y.matrix(),
            Self::Z(_) => Pauli::Z.matrix(),
            Self::S(_) => [[ONE, ZERO], [ZERO, I]],
            Self::SInv(_) => [[ONE, ZERO], [ZERO, -I]],
            Self::SqrtX(_) => *SQRT_X,
            Self::SqrtXInv(_) => adjoint(&SQRT_X),
            Self::SqrtY(_) => *SQRT_Y,
            Self::SqrtYInv(_) => adjoint(&SQRT_Y),
            Self::SqrtW(_) => *SQRT_W,
            Self::SqrtWInv(_) => adjoint(&SQRT_W),
            Self::Rx(_, ang) => {
                let c = C64::from((ang / 2.0).cos());
                let s = -I * (ang / 2.0).sin();
                [[c, s], [s, c]]
            },
            Self::Ry(_, ang) => {
                let c = C64::from((ang / 2.0).cos());
                let s = C64::from((ang / 2.0).sin());
                [[c, -s], [s, c]]
            },
            Self::Rz(_, ang) => {
                [[C64::cis(-ang / 2.0), ZERO], [ZERO, C64::cis(ang / 2.0)]]
            },
            _ => { return None; },
        };
        Some(mat)
    }

    /// Return the gate applying `pauli` to qubit `k`, or `None` for the
    /// identity.
    pub fn pauli(pauli: Pauli, k: usize) -> Option<Self> {
        match pauli {
            Pauli::I => None,
            Pauli::X => Some(Self::X(k)),
            Pauli::Y => Some(Self::Y(k)),
            Pauli::Z => Some(Self::Z(k)),
        }
    }

    /// Return the gate applying `pauli` to `target` conditioned on `control`,
    /// or `None` for the identity.
    pub fn controlled(pauli: Pauli, control: usize, target: usize)
        -> Option<Self>
    {
        match pauli {
            Pauli::I => None,
            Pauli::X => Some(Self::CX(control, target)),
            Pauli::Y => Some(Self::CY(control, target)),
            Pauli::Z => Some(Self::CZ(control, target)),
        }
    }

    fn sqrt_kind(&self) -> Option<usize> {
        match self {
            Self::SqrtX(_) => Some(0),
            Self::SqrtY(_) => Some(1),
            Self::SqrtW(_) => Some(2),
            _ => None,
        }
    }

    fn from_sqrt_kind(kind: usize, idx: usize) -> Self {
        match kind {
            0 => Self::SqrtX(idx),
            1 => Self::SqrtY(idx),
            2 => Self::SqrtW(idx),
            _ => unreachable!(),
        }
    }

    /// Sample a random single-qubit gate (`SqrtX`, `SqrtY`, or `SqrtW`) for a
    /// given qubit index.
    pub fn sample_single<R>(idx: usize, rng: &mut R) -> Self
    where R: Rng + ?Sized
    {
        Self::from_sqrt_kind(rng.gen_range(0..3_usize), idx)
    }

    /// Like [`Self::sample_single`], but never returns the same kind of gate
    /// as `prev` if `prev` is one of the three square-root gates.
    pub fn sample_single_except<R>(idx: usize, prev: Option<&Self>, rng: &mut R)
        -> Self
    where R: Rng + ?Sized
    {
        match prev.and_then(|g| g.sqrt_kind()) {
            Some(skip) => {
                let k = rng.gen_range(0..2_usize);
                Self::from_sqrt_kind(if k >= skip { k + 1 } else { k }, idx)
            },
            None => Self::sample_single(idx, rng),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{ rngs::StdRng, SeedableRng };

    fn matmul(a: &Mat2, b: &Mat2) -> Mat2 {
        let mut out = [[ZERO; 2]; 2];
        for (r, row) in out.iter_mut().enumerate() {
            for (c, elem) in row.iter_mut().enumerate() {
                *elem = a[r][0] * b[0][c] + a[r][1] * b[1][c];
            }
        }
        out
    }

    fn approx_eq(a: &Mat2, b: &Mat2) -> bool {
        a.iter().flatten().zip(b.iter().flatten())
            .all(|(ak, bk)| (ak - bk).norm() < 1e-12)
    }

    fn singles() -> Vec<Gate> {
        vec![
            Gate::H(0), Gate::X(0), Gate::Y(0), Gate::Z(0), Gate::S(0),
            Gate::SInv(0), Gate::SqrtX(0), Gate::SqrtXInv(0), Gate::SqrtY(0),
            Gate::SqrtYInv(0), Gate::SqrtW(0), Gate::SqrtWInv(0),
            Gate::Rx(0, 0.37), Gate::Ry(0, -1.2), Gate::Rz(0, 2.9),
        ]
    }

    #[test]
    fn single_gates_are_inverted() {
        let id = Pauli::I.matrix();
        for g in singles() {
            let m = g.matrix().unwrap();
            let minv = g.inverse().matrix().unwrap();
            assert!(approx_eq(&matmul(&m, &minv), &id), "{:?}", g);
            assert!(approx_eq(&matmul(&m, &adjoint(&m)), &id), "{:?}", g);
        }
    }

    #[test]
    fn square_roots_square_to_paulis() {
        let sx = Gate::SqrtX(0).matrix().unwrap();
        let sy = Gate::SqrtY(0).matrix().unwrap();
        let sw = Gate::SqrtW(0).matrix().unwrap();
        assert!(approx_eq(&matmul(&sx, &sx), &Pauli::X.matrix()));
        assert!(approx_eq(&matmul(&sy, &sy), &Pauli::Y.matrix()));
        assert!(approx_eq(&matmul(&sw, &sw), &W_MAT));
    }

    #[test]
    fn check_rejects_bad_indices() {
        assert_eq!(
            Gate::H(3).check(3),
            Err(OtocError::QubitOutOfRange { qubit: 3, n: 3 }),
        );
        assert_eq!(Gate::CZ(1, 1).check(3), Err(OtocError::SameQubit(1)));
        assert!(Gate::Rzz(0, 2, 0.1).check(3).is_ok());
        assert_eq!(Gate::controlled(Pauli::I, 0, 1), None);
        assert_eq!(Gate::controlled(Pauli::Y, 0, 1), Some(Gate::CY(0, 1)));
    }

    #[test]
    fn sampling_never_repeats_previous() {
        let mut rng = StdRng::seed_from_u64(10546);
        let mut prev = Gate::sample_single(0, &mut rng);
        for _ in 0..500 {
            let next = Gate::sample_single_except(0, Some(&prev), &mut rng);
            assert_ne!(next, prev);
            assert!(next.sqrt_kind().is_some());
            prev = next;
        }
    }
}
