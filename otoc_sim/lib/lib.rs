#![allow(non_snake_case)]

//! Tools for measuring out-of-time-order correlators (OTOCs) in small
//! registers of qubits.
//!
//! States are stored as full complex-valued vectors, so everything here is
//! limited to registers of a couple dozen qubits at most (and about a dozen for
//! exact Hamiltonian evolution). Time evolution comes in three flavors: exact
//! exponentiation of an Ising Hamiltonian, a Trotterized circuit approximating
//! the same, and random circuits built from √X, √Y, √W, and CZ gates. OTOCs are
//! extracted either directly through state-vector algebra or by simulating an
//! ancilla-based interferometric measurement with finite shots and optional
//! depolarizing noise.

pub mod error;
pub mod gate;
pub mod state;
pub mod hamiltonian;
pub mod noise;
pub mod circuit;
pub mod otoc;
pub mod stats;
pub mod experiment;

pub use error::{ OtocError, OtocResult };
