use std::{ error::Error, path::PathBuf };
use itertools::Itertools;
use ndarray as nd;
use lib::{ mkdir, write_npz, plot::{ line_plot, Curve }, stack_means };
use otoc_sim::{
    experiment::CircuitOtoc,
    otoc::{ Correlator, InitialState, SiteOp },
    stats::{ scrambling_depth, Series },
};

const SIZES: [usize; 6] = [3, 4, 5, 6, 7, 8];
const MAX_DEPTH: usize = 30;
const INSTANCES: usize = 50;
const THRESHOLD: f64 = 0.2;
const SEED: u64 = 10546;

fn main() -> Result<(), Box<dyn Error>> {
    lib::init_logging();

    let outdir = PathBuf::from("output");
    mkdir!(outdir);

    let mut results: Vec<Series> = Vec::with_capacity(SIZES.len());
    for &n in SIZES.iter() {
        log::info!("N = {n}");
        let series
            = CircuitOtoc::new(n, SiteOp::z(0), SiteOp::z(n - 1))
            .depths(0..=MAX_DEPTH)
            .instances(INSTANCES)
            .correlator(Correlator::FourPoint)
            .initial(InitialState::Zeros)
            .seed(Some(SEED))
            .run()?;
        results.push(series);
    }

    let depths: Vec<f64>
        = results.iter()
        .map(|s| scrambling_depth(s, THRESHOLD).unwrap_or(f64::NAN))
        .collect();
    println!("scrambling depth (|F| < {THRESHOLD}):");
    println!(
        "{}",
        SIZES.iter().zip(depths.iter())
            .map(|(n, d)| format!("N = {n}: {d}"))
            .join(", ")
    );

    let depth: nd::Array1<u32> = (0..=MAX_DEPTH as u32).collect();
    write_npz!(
        outdir.join("circuit_complexity.npz"),
        arrays: {
            "size" => &SIZES.iter().map(|&n| n as u32).collect::<nd::Array1<u32>>(),
            "depth" => &depth,
            "threshold" => &nd::array![THRESHOLD],
            "F" => &stack_means(&results),
            "scrambling_depth" => &nd::Array1::from(depths.clone()),
        }
    );
    let curves: Vec<Curve>
        = SIZES.iter().zip(results.iter())
        .map(|(n, s)| Curve::from_series(format!("N = {n}"), s))
        .collect();
    line_plot(
        outdir.join("circuit_complexity.svg"),
        "Four-point OTOC vs random-circuit depth",
        "circuit depth",
        "Re⟨W(t) V W(t) V⟩",
        &curves,
    )?;
    let scaling: Vec<(f64, f64)>
        = SIZES.iter().zip(depths.iter())
        .filter(|(_, d)| d.is_finite())
        .map(|(n, d)| (*n as f64, *d))
        .collect();
    line_plot(
        outdir.join("circuit_complexity_depth.svg"),
        "Scrambling depth vs system size",
        "number of qubits N",
        &format!("first depth with |F| < {THRESHOLD}"),
        &[Curve::new("scrambling depth", scaling)],
    )?;
    Ok(())
}
