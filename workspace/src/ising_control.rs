use std::{ error::Error, path::PathBuf };
use lib::{ mkdir, write_npz, plot::{ line_plot, Curve }, series_arrays };
use otoc_sim::{
    experiment::IsingOtoc,
    hamiltonian::IsingParams,
    otoc::SiteOp,
};

const N: usize = 8;
const T_MAX: f64 = 10.0;
const NT: usize = 41;
const SAMPLES: usize = 8;
const SEED: u64 = 10546;

fn main() -> Result<(), Box<dyn Error>> {
    lib::init_logging();

    let outdir = PathBuf::from("output");
    mkdir!(outdir);

    let times = lib::linspace(0.0, T_MAX, NT);
    let w = SiteOp::z(0);
    let v = SiteOp::z(N - 1);

    log::info!("J = 0 control");
    let control
        = IsingOtoc::new(IsingParams::free(N), w, v)
        .times(times.iter().copied())
        .samples(SAMPLES)
        .seed(Some(SEED))
        .run()?;
    log::info!("chaotic reference");
    let chaotic
        = IsingOtoc::new(IsingParams::chaotic(N), w, v)
        .times(times)
        .samples(SAMPLES)
        .seed(Some(SEED))
        .run()?;

    let max_control
        = control.mean().iter()
        .map(|c| c.abs())
        .fold(0.0, f64::max);
    println!("max |C| with J = 0: {:.3e}", max_control);
    println!("final C with J = 1: {:.5}", chaotic.mean().last().copied().unwrap_or(f64::NAN));

    let (t, c_control, err_control) = series_arrays(&control);
    let (_, c_chaotic, err_chaotic) = series_arrays(&chaotic);
    write_npz!(
        outdir.join("ising_control.npz"),
        arrays: {
            "t" => &t,
            "C_control" => &c_control,
            "C_control_err" => &err_control,
            "C_chaotic" => &c_chaotic,
            "C_chaotic_err" => &err_chaotic,
        }
    );
    line_plot(
        outdir.join("ising_control.svg"),
        &format!("Zero-coupling control (N = {N}, W = {w}, V = {v})"),
        "time t",
        "C(t)",
        &[
            Curve::from_series("J = 0", &control),
            Curve::from_series("J = 1", &chaotic),
        ],
    )?;
    Ok(())
}
