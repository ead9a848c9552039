use rand::{ rngs::StdRng, SeedableRng };
use otoc_sim::{
    circuit::random_circuit,
    experiment::CircuitOtoc,
    hamiltonian::IsingParams,
    noise::Depolarizing,
    otoc::{ four_point, two_point, Correlator, InitialState, Interferometer, SiteOp },
    state::StateVec,
    stats::scrambling_depth,
    OtocError,
};

#[test]
fn interferometer_matches_direct_algebra() {
    let mut rng = StdRng::seed_from_u64(10546);
    let circ = random_circuit(4, 5, &mut rng);
    let psi = StateVec::random(4, &mut rng);
    let (w, v) = (SiteOp::x(1), SiteOp::z(3));

    let two = Interferometer::new(&circ, w, v, Correlator::TwoPoint).unwrap();
    let direct = two_point(&circ, w, v, &psi).unwrap();
    assert_eq!(two.ancilla(), 4);
    assert!((two.expectation(&psi).unwrap() - direct.re).abs() < 1e-10);

    let four = Interferometer::new(&circ, w, v, Correlator::FourPoint).unwrap();
    let direct = four_point(&circ, w, v, &psi).unwrap();
    assert!((four.expectation(&psi).unwrap() - direct.re).abs() < 1e-10);

    let evol = IsingParams::chaotic(4).propagator().unwrap().evolution(0.8).unwrap();
    let four = Interferometer::new(&evol, w, v, Correlator::FourPoint).unwrap();
    let direct = four_point(&evol, w, v, &psi).unwrap();
    assert!((four.expectation(&psi).unwrap() - direct.re).abs() < 1e-10);
}

#[test]
fn interferometer_checks_dimensions() {
    let mut rng = StdRng::seed_from_u64(10546);
    let circ = random_circuit(3, 2, &mut rng);
    assert!(Interferometer::new(&circ, SiteOp::z(3), SiteOp::z(0), Correlator::TwoPoint)
        .is_err());
    let interf
        = Interferometer::new(&circ, SiteOp::z(2), SiteOp::z(0), Correlator::TwoPoint)
        .unwrap();
    assert_eq!(
        interf.expectation(&StateVec::new(4)),
        Err(OtocError::DimensionMismatch { expected: 3, got: 4 }),
    );
    assert!(interf.sample(&StateVec::new(3), 0, None, &mut rng).is_err());
}

#[test]
fn depth_sweep_decays_from_one() {
    let sampled = CircuitOtoc::new(5, SiteOp::z(0), SiteOp::z(4))
        .depths(0..=3)
        .instances(64)
        .shots(Some(100))
        .seed(Some(10546))
        .run()
        .unwrap();
    assert_eq!(sampled.len(), 4);
    assert_eq!(sampled.mean()[0], 1.0);
    assert!(sampled.mean()[1].abs() < 0.1);

    let exact = CircuitOtoc::new(5, SiteOp::z(0), SiteOp::z(4))
        .depths([0, 1, 12])
        .instances(128)
        .seed(Some(10546))
        .run()
        .unwrap();
    assert!((exact.mean()[0] - 1.0).abs() < 1e-10);
    assert!(exact.mean()[1].abs() < 1e-10);
    assert!(exact.mean()[2].abs() < 0.15);
}

#[test]
fn noise_suppresses_signal() {
    let base = CircuitOtoc::new(4, SiteOp::z(0), SiteOp::z(3))
        .depths([0])
        .instances(16)
        .seed(Some(10546));
    let clean = base.clone().shots(Some(200)).run().unwrap();
    assert_eq!(clean.mean()[0], 1.0);

    let noise = Depolarizing::new(0.2).unwrap();
    let noisy = base.clone()
        .shots(Some(200))
        .noise(Some(noise))
        .run()
        .unwrap();
    assert!(noisy.mean()[0] < 0.9);

    let trajectories = base.instances(64).noise(Some(noise)).run().unwrap();
    assert!(trajectories.mean()[0] < 0.9);
}

#[test]
fn four_point_scrambling_depth() {
    let series = CircuitOtoc::new(4, SiteOp::z(0), SiteOp::z(3))
        .depths(0..=12)
        .instances(32)
        .correlator(Correlator::FourPoint)
        .initial(InitialState::Zeros)
        .seed(Some(10546))
        .run()
        .unwrap();
    // a single layer cannot connect the two ends of the register
    assert!((series.mean()[0] - 1.0).abs() < 1e-10);
    assert!((series.mean()[1] - 1.0).abs() < 1e-10);
    let depth = scrambling_depth(&series, 0.3).unwrap();
    assert!(depth >= 2.0);
}

#[test]
fn more_instances_reduce_spread() {
    let spread = CircuitOtoc::new(4, SiteOp::z(0), SiteOp::z(3))
        .shots(Some(20))
        .seed(Some(10546))
        .spread(6, &[1, 16], 24)
        .unwrap();
    assert_eq!(spread.param(), &[1.0, 16.0]);
    assert!(spread.err()[1] < spread.err()[0]);
}
