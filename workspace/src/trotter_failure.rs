use std::{ error::Error, path::PathBuf };
use ndarray as nd;
use rand::{ rngs::StdRng, SeedableRng };
use lib::{ mkdir, write_npz, plot::{ line_plot, Curve }, series_arrays };
use otoc_sim::{
    experiment::{ trotter_fidelity, IsingOtoc, Method },
    hamiltonian::{ IsingParams, TrotterOrder },
    otoc::SiteOp,
    state::StateVec,
    stats::max_abs_diff,
};

const N: usize = 6;
const T_MAX: f64 = 10.0;
const NT: usize = 21;
const SAMPLES: usize = 4;
const DT_FINE: f64 = 0.05;
const DT_COARSE: f64 = 1.0;
const SEED: u64 = 10546;

fn main() -> Result<(), Box<dyn Error>> {
    lib::init_logging();

    let outdir = PathBuf::from("output");
    mkdir!(outdir);

    let params = IsingParams::chaotic(N);
    let times = lib::linspace(0.0, T_MAX, NT);
    let exp
        = IsingOtoc::new(params, SiteOp::z(0), SiteOp::z(N - 1))
        .times(times.iter().copied())
        .samples(SAMPLES)
        .seed(Some(SEED));

    log::info!("exact evolution");
    let exact = exp.clone().run()?;
    log::info!("Trotter, dt = {DT_FINE}");
    let fine
        = exp.clone()
        .method(Method::Trotter { dt: DT_FINE, order: TrotterOrder::First })
        .run()?;
    log::info!("Trotter, dt = {DT_COARSE}");
    let coarse
        = exp
        .method(Method::Trotter { dt: DT_COARSE, order: TrotterOrder::First })
        .run()?;

    let mut rng = StdRng::seed_from_u64(SEED);
    let psi = StateVec::random(N, &mut rng);
    let fid_fine: nd::Array1<f64>
        = times.iter()
        .map(|t| trotter_fidelity(&params, *t, DT_FINE, TrotterOrder::First, &psi))
        .collect::<Result<_, _>>()?;
    let fid_coarse: nd::Array1<f64>
        = times.iter()
        .map(|t| trotter_fidelity(&params, *t, DT_COARSE, TrotterOrder::First, &psi))
        .collect::<Result<_, _>>()?;

    println!(
        "max |C_exact - C_trotter|: dt = {}: {:.4}, dt = {}: {:.4}",
        DT_FINE,
        max_abs_diff(exact.mean(), fine.mean()).unwrap_or(f64::NAN),
        DT_COARSE,
        max_abs_diff(exact.mean(), coarse.mean()).unwrap_or(f64::NAN),
    );
    println!(
        "state fidelity at t = {}: dt = {}: {:.4}, dt = {}: {:.4}",
        T_MAX,
        DT_FINE,
        fid_fine.iter().last().copied().unwrap_or(f64::NAN),
        DT_COARSE,
        fid_coarse.iter().last().copied().unwrap_or(f64::NAN),
    );

    let (t, c_exact, _) = series_arrays(&exact);
    let (_, c_fine, _) = series_arrays(&fine);
    let (_, c_coarse, _) = series_arrays(&coarse);
    write_npz!(
        outdir.join("trotter_failure.npz"),
        arrays: {
            "t" => &t,
            "dt" => &nd::array![DT_FINE, DT_COARSE],
            "C_exact" => &c_exact,
            "C_fine" => &c_fine,
            "C_coarse" => &c_coarse,
            "fidelity_fine" => &fid_fine,
            "fidelity_coarse" => &fid_coarse,
        }
    );
    line_plot(
        outdir.join("trotter_failure.svg"),
        &format!("Exact vs Trotterized evolution (N = {N})"),
        "time t",
        "C(t)",
        &[
            Curve::from_series("exact", &exact),
            Curve::from_series(format!("Trotter dt = {DT_FINE}"), &fine),
            Curve::from_series(format!("Trotter dt = {DT_COARSE}"), &coarse),
        ],
    )?;
    Ok(())
}
