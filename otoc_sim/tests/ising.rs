use num_complex::Complex64 as C64;
use rand::{ rngs::StdRng, SeedableRng };
use otoc_sim::{
    circuit::Evolution,
    experiment::{ light_cone, trotter_fidelity, IsingOtoc, Method },
    hamiltonian::{ trotter_circuit, Boundary, IsingParams, TrotterOrder },
    otoc::{ four_point, squared_commutator, InitialState, SiteOp },
    state::StateVec,
    stats::is_non_decreasing,
};

#[test]
fn free_chain_never_scrambles() {
    let times: Vec<f64> = (0..=10).map(|k| k as f64).collect();
    let exact = IsingOtoc::new(IsingParams::free(6), SiteOp::z(0), SiteOp::z(3))
        .times(times.iter().copied())
        .samples(4)
        .seed(Some(10546))
        .run()
        .unwrap();
    assert_eq!(exact.len(), times.len());
    assert!(exact.mean().iter().all(|c| c.abs() < 1e-12));

    let trotter = IsingOtoc::new(IsingParams::free(6), SiteOp::x(1), SiteOp::z(2))
        .times(times.iter().copied())
        .initial(InitialState::Zeros)
        .method(Method::Trotter { dt: 0.1, order: TrotterOrder::First })
        .run()
        .unwrap();
    assert!(trotter.mean().iter().all(|c| c.abs() < 1e-12));
}

#[test]
fn chaotic_chain_scrambles() {
    let times = [0.0, 0.2, 0.4, 0.6, 2.0, 8.0];
    let series = IsingOtoc::new(IsingParams::chaotic(6), SiteOp::z(0), SiteOp::z(5))
        .times(times)
        .samples(4)
        .seed(Some(10546))
        .run()
        .unwrap();
    let c = series.mean();
    assert!(c[0].abs() < 1e-12);
    assert!(c[1] < 1e-3);
    assert!(is_non_decreasing(&c[..4], 1e-9));
    assert!(c[5] > 0.2);
    assert!(c.iter().all(|ck| (-1e-12..=2.0).contains(ck)));
    assert_eq!(series.param(), &times);
}

#[test]
fn commutator_and_four_point_agree() {
    let mut rng = StdRng::seed_from_u64(10546);
    let params = IsingParams::chaotic(5).with_boundary(Boundary::Periodic);
    let evol = params.propagator().unwrap().evolution(1.3).unwrap();
    let psi = StateVec::random(5, &mut rng);
    for (w, v) in [
        (SiteOp::z(0), SiteOp::z(2)),
        (SiteOp::x(1), SiteOp::y(4)),
        (SiteOp::z(3), SiteOp::x(3)),
    ] {
        let c = squared_commutator(&evol, w, v, &psi).unwrap();
        let f: C64 = four_point(&evol, w, v, &psi).unwrap();
        assert!((c - (1.0 - f.re)).abs() < 1e-10, "{w}, {v}: {c} vs {f}");
    }
}

#[test]
fn coarse_trotter_misses_scrambling() {
    let params = IsingParams::chaotic(6);
    let (w, v) = (SiteOp::z(0), SiteOp::z(5));
    let exact = IsingOtoc::new(params, w, v)
        .times([8.0])
        .samples(2)
        .seed(Some(10546));
    let coarse = exact.clone()
        .method(Method::Trotter { dt: 4.0, order: TrotterOrder::First });
    let c_exact = exact.run().unwrap().mean()[0];
    let c_coarse = coarse.run().unwrap().mean()[0];
    assert!(c_exact > 0.2);
    assert!(c_coarse < 1e-10);
}

#[test]
fn fine_trotter_tracks_exact_evolution() {
    let mut rng = StdRng::seed_from_u64(10546);
    let params = IsingParams::chaotic(6);
    let psi = StateVec::random(6, &mut rng);
    let fine = trotter_fidelity(&params, 1.0, 0.002, TrotterOrder::First, &psi)
        .unwrap();
    let strang = trotter_fidelity(&params, 1.0, 0.02, TrotterOrder::Second, &psi)
        .unwrap();
    let coarse = trotter_fidelity(&params, 3.0, 1.5, TrotterOrder::First, &psi)
        .unwrap();
    assert!(fine > 0.999);
    assert!(strang > 0.999);
    assert!(coarse < 0.99);

    // the Trotter circuit undoes itself exactly
    let circ = trotter_circuit(&params, 2.5, 0.3, TrotterOrder::Second).unwrap();
    let mut state = psi.clone();
    circ.forward(&mut state);
    circ.backward(&mut state);
    assert!((state.inner(&psi).norm() - 1.0).abs() < 1e-10);
}

#[test]
fn light_cone_orders_by_distance() {
    let params = IsingParams::chaotic(5);
    let cone = light_cone(&params, 0, &[0.0, 0.5, 6.0], 2, Some(10546)).unwrap();
    assert_eq!(cone.len(), 5);
    assert!(cone.iter().all(|s| s.len() == 3));
    // all Z operators commute at t = 0
    assert!(cone.iter().all(|s| s.mean()[0].abs() < 1e-12));
    let early: Vec<f64> = cone.iter().map(|s| s.mean()[1]).collect();
    assert!(early[1] > early[2]);
    assert!(early[2] > early[4]);
    assert!(cone[4].mean()[2] > 0.2);
    assert!(light_cone(&params, 5, &[1.0], 1, None).is_err());
}
