use std::{ error::Error, path::PathBuf };
use ndarray as nd;
use lib::{ mkdir, write_npz, plot::{ line_plot, Curve }, series_arrays };
use otoc_sim::{
    experiment::IsingOtoc,
    hamiltonian::IsingParams,
    otoc::SiteOp,
    stats::is_non_decreasing,
};

const N: usize = 8; // number of sites
const T_MAX: f64 = 10.0;
const NT: usize = 41; // number of time points
const SAMPLES: usize = 8; // random initial states
const SEED: u64 = 10546;

fn main() -> Result<(), Box<dyn Error>> {
    lib::init_logging();

    let outdir = PathBuf::from("output");
    mkdir!(outdir);

    let times = lib::linspace(0.0, T_MAX, NT);
    let w = SiteOp::z(0);
    let v = SiteOp::z(N - 1);
    let series
        = IsingOtoc::new(IsingParams::chaotic(N), w, v)
        .times(times)
        .samples(SAMPLES)
        .seed(Some(SEED))
        .run()?;

    println!("{:>8} {:>10} {:>10}", "t", "C(t)", "err");
    for (t, c, e) in series.points() {
        println!("{:8.3} {:10.5} {:10.5}", t, c, e);
    }
    let early = series.len() / 4;
    println!(
        "early growth non-decreasing: {}",
        is_non_decreasing(&series.mean()[..early], 1e-9),
    );

    let (t, c, err) = series_arrays(&series);
    write_npz!(
        outdir.join("ising_otoc.npz"),
        arrays: {
            "size" => &nd::array![N as u32],
            "samples" => &nd::array![SAMPLES as u32],
            "t" => &t,
            "C" => &c,
            "C_err" => &err,
        }
    );
    line_plot(
        outdir.join("ising_otoc.svg"),
        &format!("Squared commutator, chaotic Ising chain (N = {N})"),
        "time t",
        &format!("C(t) = ½‖[{w}(t), {v}]ψ‖²"),
        &[Curve::from_series("chaotic (J = 1, g = -1.05, h = 0.5)", &series)],
    )?;
    Ok(())
}
