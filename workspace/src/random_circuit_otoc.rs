use std::{ error::Error, path::PathBuf };
use ndarray as nd;
use lib::{ mkdir, write_npz, plot::{ line_plot, Curve }, series_arrays };
use otoc_sim::{
    experiment::CircuitOtoc,
    otoc::SiteOp,
};

const N: usize = 6; // system qubits; the ancilla is extra
const MAX_DEPTH: usize = 20;
const SHOTS: usize = 1000;
const INSTANCES: usize = 100;
const SEED: u64 = 10546;

fn main() -> Result<(), Box<dyn Error>> {
    lib::init_logging();

    let outdir = PathBuf::from("output");
    mkdir!(outdir);

    let w = SiteOp::z(0);
    let v = SiteOp::z(N - 1);
    let exp
        = CircuitOtoc::new(N, w, v)
        .depths(0..=MAX_DEPTH)
        .instances(INSTANCES)
        .seed(Some(SEED));

    log::info!("sampled: {SHOTS} shots x {INSTANCES} instances");
    let sampled = exp.clone().shots(Some(SHOTS)).run()?;
    log::info!("exact ancilla expectation");
    let exact = exp.shots(None).run()?;

    println!("{:>6} {:>10} {:>10} {:>10}", "depth", "sampled", "err", "exact");
    for ((d, m, e), x) in sampled.points().zip(exact.mean()) {
        println!("{:6} {:10.5} {:10.5} {:10.5}", d, m, e, x);
    }

    let (depth, otoc, err) = series_arrays(&sampled);
    let (_, otoc_exact, _) = series_arrays(&exact);
    write_npz!(
        outdir.join("random_circuit_otoc.npz"),
        arrays: {
            "size" => &nd::array![N as u32],
            "shots" => &nd::array![SHOTS as u32],
            "instances" => &nd::array![INSTANCES as u32],
            "depth" => &depth,
            "otoc" => &otoc,
            "otoc_err" => &err,
            "otoc_exact" => &otoc_exact,
        }
    );
    line_plot(
        outdir.join("random_circuit_otoc.svg"),
        &format!("Interferometric OTOC in random circuits (N = {N})"),
        "circuit depth",
        &format!("Re⟨{w}(t) {v}⟩"),
        &[
            Curve::from_series(format!("{SHOTS} shots"), &sampled),
            Curve::from_series_means("exact ancilla", &exact),
        ],
    )?;
    Ok(())
}
