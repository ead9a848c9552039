//! Stochastic depolarizing noise.
//!
//! Noise is simulated by trajectories: rather than evolving a density matrix,
//! each run of a circuit randomly inserts Pauli errors after gates, and
//! observables are averaged over many such runs. Every shot of a noisy
//! measurement therefore needs its own full simulation.

use rand::Rng;
use crate::{
    error::{ check_prob, OtocResult },
    gate::{ Gate, Pauli },
    state::StateVec,
};

/// Single-qubit depolarizing channel applied after every gate.
///
/// With probability `p`, each qubit touched by a gate suffers one of *X*, *Y*,
/// or *Z*, chosen uniformly.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Depolarizing {
    p: f64,
}

impl Depolarizing {
    pub fn new(p: f64) -> OtocResult<Self> {
        check_prob(p)?;
        Ok(Self { p })
    }

    pub fn p(&self) -> f64 { self.p }

    pub fn is_trivial(&self) -> bool { self.p == 0.0 }

    /// Possibly apply an error to qubit `k`, returning the error if one
    /// occurred.
    pub fn apply_qubit<R>(&self, state: &mut StateVec, k: usize, rng: &mut R)
        -> Option<Pauli>
    where R: Rng + ?Sized
    {
        if self.is_trivial() || rng.gen::<f64>() >= self.p { return None; }
        let err = Pauli::sample_nontrivial(rng);
        state.apply_pauli(err, k);
        Some(err)
    }

    /// Possibly apply errors to each qubit touched by `gate`.
    pub fn apply_gate_error<R>(&self, state: &mut StateVec, gate: &Gate, rng: &mut R)
    where R: Rng + ?Sized
    {
        let (a, b) = gate.qubits();
        self.apply_qubit(state, a, rng);
        if let Some(b) = b { self.apply_qubit(state, b, rng); }
    }

    /// Possibly apply errors to each of a set of qubits.
    pub fn apply_layer<I, R>(&self, state: &mut StateVec, qubits: I, rng: &mut R)
    where
        I: IntoIterator<Item = usize>,
        R: Rng + ?Sized,
    {
        qubits.into_iter()
            .for_each(|k| { self.apply_qubit(state, k, rng); });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{ rngs::StdRng, SeedableRng };
    use crate::error::OtocError;

    #[test]
    fn probability_is_validated() {
        assert_eq!(Depolarizing::new(1.5), Err(OtocError::InvalidProbability(1.5)));
        assert!(Depolarizing::new(-0.1).is_err());
        assert!(Depolarizing::new(f64::NAN).is_err());
        assert!(Depolarizing::new(0.0).unwrap().is_trivial());
    }

    #[test]
    fn certain_errors_always_fire() {
        let mut rng = StdRng::seed_from_u64(10546);
        let noise = Depolarizing::new(1.0).unwrap();
        let mut state = StateVec::new(2);
        for _ in 0..100 {
            let err = noise.apply_qubit(&mut state, 0, &mut rng);
            assert!(matches!(err, Some(Pauli::X | Pauli::Y | Pauli::Z)));
        }
        assert!((state.norm() - 1.0).abs() < 1e-12);
        assert!(state.prob_one(1).abs() < 1e-12);
    }

    #[test]
    fn trivial_noise_does_nothing() {
        let mut rng = StdRng::seed_from_u64(10546);
        let noise = Depolarizing::new(0.0).unwrap();
        let mut state = StateVec::new(3);
        noise.apply_layer(&mut state, 0..3, &mut rng);
        assert_eq!(state, StateVec::new(3));
    }
}
