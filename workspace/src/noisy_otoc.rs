use std::{ error::Error, path::PathBuf };
use ndarray as nd;
use rayon::iter::{ IntoParallelRefIterator, ParallelIterator };
use lib::{ mkdir, write_npz, plot::{ line_plot, Curve }, stack_errs, stack_means };
use otoc_sim::{
    experiment::CircuitOtoc,
    noise::Depolarizing,
    otoc::SiteOp,
    stats::Series,
    OtocResult,
};

const N: usize = 5;
const MAX_DEPTH: usize = 12;
const SHOTS: usize = 200;
const INSTANCES: usize = 50;
const ERROR_RATES: [f64; 5] = [0.0, 0.005, 0.01, 0.02, 0.05];
const SEED: u64 = 10546;

fn main() -> Result<(), Box<dyn Error>> {
    lib::init_logging();

    let outdir = PathBuf::from("output");
    mkdir!(outdir);

    let exp
        = CircuitOtoc::new(N, SiteOp::z(0), SiteOp::z(N - 1))
        .depths(0..=MAX_DEPTH)
        .instances(INSTANCES)
        .shots(Some(SHOTS))
        .seed(Some(SEED));

    let results: Vec<Series>
        = ERROR_RATES.par_iter()
        .map(|&p| -> OtocResult<Series> {
            let noise = Depolarizing::new(p)?;
            exp.clone().noise(Some(noise)).run()
        })
        .collect::<OtocResult<Vec<Series>>>()?;

    print!("{:>6}", "depth");
    ERROR_RATES.iter().for_each(|p| { print!(" {:>10}", format!("p = {p}")); });
    println!();
    for d in 0..=MAX_DEPTH {
        print!("{:6}", d);
        results.iter().for_each(|s| { print!(" {:10.5}", s.mean()[d]); });
        println!();
    }

    let depth: nd::Array1<u32> = (0..=MAX_DEPTH as u32).collect();
    write_npz!(
        outdir.join("noisy_otoc.npz"),
        arrays: {
            "depth" => &depth,
            "p" => &nd::Array1::from(ERROR_RATES.to_vec()),
            "otoc" => &stack_means(&results),
            "otoc_err" => &stack_errs(&results),
        }
    );
    let curves: Vec<Curve>
        = ERROR_RATES.iter().zip(results.iter())
        .map(|(p, s)| Curve::from_series(format!("p = {p}"), s))
        .collect();
    line_plot(
        outdir.join("noisy_otoc.svg"),
        &format!("Random-circuit OTOC under depolarizing noise (N = {N})"),
        "circuit depth",
        "Re⟨W(t) V⟩",
        &curves,
    )?;
    Ok(())
}
