use std::{ error::Error, path::PathBuf };
use ndarray as nd;
use lib::{ mkdir, write_npz, plot::{ line_plot, Curve }, series_arrays };
use otoc_sim::{
    experiment::CircuitOtoc,
    otoc::SiteOp,
};

const N: usize = 5;
const DEPTH: usize = 10;
const SHOTS: usize = 100;
const COUNTS: [usize; 8] = [1, 2, 4, 8, 16, 32, 64, 128];
const REPEATS: usize = 50;
const SEED: u64 = 10546;

fn main() -> Result<(), Box<dyn Error>> {
    lib::init_logging();

    let outdir = PathBuf::from("output");
    mkdir!(outdir);

    let spread
        = CircuitOtoc::new(N, SiteOp::z(0), SiteOp::z(N - 1))
        .shots(Some(SHOTS))
        .seed(Some(SEED))
        .spread(DEPTH, &COUNTS, REPEATS)?;

    println!("{:>10} {:>10} {:>10}", "instances", "estimate", "spread");
    for (k, m, s) in spread.points() {
        println!("{:10} {:10.5} {:10.5}", k, m, s);
    }

    // 1/√M reference anchored at a single instance
    let s1 = spread.err().first().copied().unwrap_or(f64::NAN);
    let reference: Vec<(f64, f64)>
        = COUNTS.iter()
        .map(|&m| (m as f64, s1 / (m as f64).sqrt()))
        .collect();

    let (count, estimate, spread_arr) = series_arrays(&spread);
    write_npz!(
        outdir.join("convergence.npz"),
        arrays: {
            "size" => &nd::array![N as u32],
            "depth" => &nd::array![DEPTH as u32],
            "shots" => &nd::array![SHOTS as u32],
            "repeats" => &nd::array![REPEATS as u32],
            "instances" => &count,
            "estimate" => &estimate,
            "spread" => &spread_arr,
        }
    );
    let measured: Vec<(f64, f64)>
        = spread.points().map(|(k, _, s)| (k, s)).collect();
    line_plot(
        outdir.join("convergence.svg"),
        &format!("Spread of the instance-averaged OTOC (N = {N}, depth {DEPTH})"),
        "number of instances",
        "standard deviation over repeats",
        &[
            Curve::new("measured", measured),
            Curve::new("1/√M", reference),
        ],
    )?;
    Ok(())
}
