//! Drivers sweeping an OTOC over time or circuit depth.
//!
//! Each driver evaluates one scalar per sweep point, averaged over random
//! initial states or random circuit instances, and returns a [`Series`].
//! Averaging runs in parallel; every sample draws from its own generator seeded
//! from a single base seed, so results are reproducible and independent of
//! thread scheduling.

use log::{ debug, info };
use rand::{ rngs::StdRng, Rng, SeedableRng };
use rayon::prelude::*;
use crate::{
    circuit::{ random_circuit, Evolution },
    error::{ check_nonzero, check_prob, OtocError, OtocResult },
    gate::Pauli,
    hamiltonian::{ check_time, trotter_circuit, IsingParams, TrotterOrder },
    noise::Depolarizing,
    otoc::{ squared_commutator, Correlator, InitialState, Interferometer, SiteOp },
    state::{ check_size, StateVec },
    stats::{ Accumulator, Series },
};

fn seeder(seed: Option<u64>) -> StdRng {
    seed.map(StdRng::seed_from_u64).unwrap_or_else(StdRng::from_entropy)
}

fn check_times(times: &[f64]) -> OtocResult<()> {
    check_nonzero(times.len(), "time sweep")?;
    times.iter().try_for_each(|t| check_time(*t))
}

/// How time evolution under the Ising Hamiltonian is carried out.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Method {
    /// Exact matrix exponential.
    Exact,
    /// Product-formula circuit with step size `dt`.
    Trotter { dt: f64, order: TrotterOrder },
}

fn average_commutator<E>(evol: &E, w: SiteOp, v: SiteOp, states: &[StateVec])
    -> OtocResult<Accumulator>
where E: Evolution + Sync
{
    let vals: Vec<f64>
        = states.par_iter()
        .map(|psi| squared_commutator(evol, w, v, psi))
        .collect::<OtocResult<Vec<f64>>>()?;
    Ok(vals.into_iter().collect())
}

/// Squared commutator ½ ‖[*W*(*t*), *V*]∣ψ⟩‖² of an Ising chain against time.
#[derive(Clone, Debug, PartialEq)]
pub struct IsingOtoc {
    pub params: IsingParams,
    pub w: SiteOp,
    pub v: SiteOp,
    pub times: Vec<f64>,
    pub initial: InitialState,
    /// Number of initial states averaged over. Ignored for
    /// [`InitialState::Zeros`].
    pub samples: usize,
    pub method: Method,
    pub seed: Option<u64>,
}

impl IsingOtoc {
    /// Exact evolution from a single random state, with no times set.
    pub fn new(params: IsingParams, w: SiteOp, v: SiteOp) -> Self {
        Self {
            params,
            w,
            v,
            times: Vec::new(),
            initial: InitialState::Random,
            samples: 1,
            method: Method::Exact,
            seed: None,
        }
    }

    pub fn times<I>(mut self, times: I) -> Self
    where I: IntoIterator<Item = f64>
    {
        self.times = times.into_iter().collect();
        self
    }

    pub fn initial(mut self, initial: InitialState) -> Self {
        self.initial = initial;
        self
    }

    pub fn samples(mut self, samples: usize) -> Self {
        self.samples = samples;
        self
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    pub fn seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    fn validate(&self) -> OtocResult<()> {
        check_nonzero(self.params.n, "number of sites")?;
        check_size(self.params.n)?;
        self.w.check(self.params.n)?;
        self.v.check(self.params.n)?;
        check_nonzero(self.samples, "samples")?;
        check_times(&self.times)?;
        if let Method::Trotter { dt, .. } = self.method {
            if !dt.is_finite() || dt <= 0.0 {
                return Err(OtocError::InvalidStep(dt));
            }
        }
        Ok(())
    }

    fn states(&self) -> Vec<StateVec> {
        let mut rng = seeder(self.seed);
        let count = match self.initial {
            InitialState::Zeros => 1,
            InitialState::Random => self.samples,
        };
        (0..count)
            .map(|_| self.initial.prepare(self.params.n, &mut rng))
            .collect()
    }

    /// Evaluate the squared commutator at each time.
    pub fn run(&self) -> OtocResult<Series> {
        self.validate()?;
        let states = self.states();
        let mut series = Series::with_capacity(self.times.len());
        let mut record = |t: f64, acc: Accumulator| {
            info!("t = {:.3}: C = {:.5} ± {:.5}", t, acc.mean(), acc.std_err());
            series.push_acc(t, &acc);
        };
        match self.method {
            Method::Exact => {
                let prop = self.params.propagator()?;
                for &t in self.times.iter() {
                    let evol = prop.evolution(t)?;
                    record(t, average_commutator(&evol, self.w, self.v, &states)?);
                }
            },
            Method::Trotter { dt, order } => {
                for &t in self.times.iter() {
                    let circ = trotter_circuit(&self.params, t, dt, order)?;
                    record(t, average_commutator(&circ, self.w, self.v, &states)?);
                }
            },
        }
        Ok(series)
    }
}

/// Squared commutator between *Z* on `w_site` and *Z* on every site of the
/// chain under exact evolution.
///
/// Element *k* of the returned vector holds the series for *V* on site *k*.
pub fn light_cone(
    params: &IsingParams,
    w_site: usize,
    times: &[f64],
    samples: usize,
    seed: Option<u64>,
) -> OtocResult<Vec<Series>>
{
    let base = IsingOtoc::new(*params, SiteOp::z(w_site), SiteOp::z(w_site))
        .times(times.iter().copied())
        .samples(samples)
        .seed(seed);
    base.validate()?;
    let states = base.states();
    let prop = params.propagator()?;
    let mut all: Vec<Series>
        = (0..params.n).map(|_| Series::with_capacity(times.len())).collect();
    for &t in times.iter() {
        let evol = prop.evolution(t)?;
        for (site, series) in all.iter_mut().enumerate() {
            let acc = average_commutator(
                &evol, base.w, SiteOp::new(Pauli::Z, site), &states)?;
            series.push_acc(t, &acc);
        }
        let front: Vec<String>
            = all.iter()
            .map(|s| format!("{:.3}", s.mean().last().copied().unwrap_or(f64::NAN)))
            .collect();
        info!("t = {:.3}: C = [{}]", t, front.join(", "));
    }
    Ok(all)
}

/// Fidelity |⟨ψ<sub>exact</sub>(*t*)∣ψ<sub>Trotter</sub>(*t*)⟩|² between exact
/// and Trotterized evolution of `psi`.
pub fn trotter_fidelity(
    params: &IsingParams,
    t: f64,
    dt: f64,
    order: TrotterOrder,
    psi: &StateVec,
) -> OtocResult<f64>
{
    if psi.num_qubits() != params.n {
        return Err(OtocError::DimensionMismatch {
            expected: params.n,
            got: psi.num_qubits(),
        });
    }
    let mut exact = psi.clone();
    params.propagator()?.evolution(t)?.forward(&mut exact);
    let mut approx = psi.clone();
    trotter_circuit(params, t, dt, order)?.forward(&mut approx);
    Ok(exact.inner(&approx).norm_sqr())
}

/// Interferometric OTOC against the depth of random circuits.
#[derive(Clone, Debug, PartialEq)]
pub struct CircuitOtoc {
    pub n: usize,
    pub w: SiteOp,
    pub v: SiteOp,
    pub depths: Vec<usize>,
    /// Number of random circuits averaged over at each depth.
    pub instances: usize,
    /// Number of ancilla measurements per instance, or `None` to use the exact
    /// ancilla expectation value.
    pub shots: Option<usize>,
    pub noise: Option<Depolarizing>,
    pub correlator: Correlator,
    pub initial: InitialState,
    pub seed: Option<u64>,
}

impl CircuitOtoc {
    /// Noiseless, exact two-point measurement on one instance from ∣0...0⟩,
    /// with no depths set.
    pub fn new(n: usize, w: SiteOp, v: SiteOp) -> Self {
        Self {
            n,
            w,
            v,
            depths: Vec::new(),
            instances: 1,
            shots: None,
            noise: None,
            correlator: Correlator::TwoPoint,
            initial: InitialState::Zeros,
            seed: None,
        }
    }

    pub fn depths<I>(mut self, depths: I) -> Self
    where I: IntoIterator<Item = usize>
    {
        self.depths = depths.into_iter().collect();
        self
    }

    pub fn instances(mut self, instances: usize) -> Self {
        self.instances = instances;
        self
    }

    pub fn shots(mut self, shots: Option<usize>) -> Self {
        self.shots = shots;
        self
    }

    pub fn noise(mut self, noise: Option<Depolarizing>) -> Self {
        self.noise = noise;
        self
    }

    pub fn correlator(mut self, correlator: Correlator) -> Self {
        self.correlator = correlator;
        self
    }

    pub fn initial(mut self, initial: InitialState) -> Self {
        self.initial = initial;
        self
    }

    pub fn seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    fn validate(&self) -> OtocResult<()> {
        check_nonzero(self.n, "number of qubits")?;
        // one extra qubit for the interferometer ancilla
        check_size(self.n + 1)?;
        self.w.check(self.n)?;
        self.v.check(self.n)?;
        check_nonzero(self.depths.len(), "depth sweep")?;
        check_nonzero(self.instances, "instances")?;
        if let Some(shots) = self.shots { check_nonzero(shots, "shots")?; }
        if let Some(noise) = self.noise { check_prob(noise.p())?; }
        Ok(())
    }

    fn run_instance(&self, depth: usize, seed: u64) -> OtocResult<f64> {
        let mut rng = StdRng::seed_from_u64(seed);
        let circ = random_circuit(self.n, depth, &mut rng);
        let psi = self.initial.prepare(self.n, &mut rng);
        let interf = Interferometer::new(&circ, self.w, self.v, self.correlator)?;
        let noise = self.noise.filter(|noise| !noise.is_trivial());
        match (self.shots, noise) {
            (Some(shots), noise) => interf.sample(&psi, shots, noise.as_ref(), &mut rng),
            (None, Some(noise)) => interf.expectation_noisy(&psi, &noise, &mut rng),
            (None, None) => interf.expectation(&psi),
        }
    }

    /// Evaluate the instance-averaged correlator at each depth.
    pub fn run(&self) -> OtocResult<Series> {
        self.validate()?;
        let base: u64 = seeder(self.seed).gen();
        let mut series = Series::with_capacity(self.depths.len());
        for (di, &depth) in self.depths.iter().enumerate() {
            let offset = (di as u64) << 32;
            let vals: Vec<f64>
                = (0..self.instances).into_par_iter()
                .map(|k| -> OtocResult<f64> {
                    let seed = base.wrapping_add(offset + k as u64);
                    let val = self.run_instance(depth, seed)?;
                    debug!("depth {depth}, instance {k}: {val:.5}");
                    Ok(val)
                })
                .collect::<OtocResult<Vec<f64>>>()?;
            let acc: Accumulator = vals.into_iter().collect();
            info!(
                "depth = {}: OTOC = {:.5} ± {:.5}",
                depth, acc.mean(), acc.std_err(),
            );
            series.push_acc(depth as f64, &acc);
        }
        Ok(series)
    }

    /// Measure how the instance-averaged estimate at a single `depth` spreads
    /// as the number of averaged instances grows.
    ///
    /// For each entry of `counts`, the estimate is recomputed `repeats` times
    /// with independent instances. The returned series holds the instance
    /// count, the mean of the repeated estimates, and their standard deviation
    /// (not the standard error) in its three columns.
    pub fn spread(&self, depth: usize, counts: &[usize], repeats: usize)
        -> OtocResult<Series>
    {
        check_nonzero(counts.len(), "instance-count sweep")?;
        check_nonzero(repeats, "repeats")?;
        let mut rng = seeder(self.seed);
        let mut series = Series::with_capacity(counts.len());
        for &count in counts.iter() {
            let mut acc = Accumulator::new();
            for _ in 0..repeats {
                let run = self.clone()
                    .depths([depth])
                    .instances(count)
                    .seed(Some(rng.gen()))
                    .run()?;
                acc.extend(run.mean().iter().copied());
            }
            info!(
                "instances = {}: estimate = {:.5}, spread = {:.5}",
                count, acc.mean(), acc.std_dev(),
            );
            series.push(count as f64, acc.mean(), acc.std_dev());
        }
        Ok(series)
    }
}
