use std::{ error::Error, path::PathBuf };
use itertools::Itertools;
use ndarray as nd;
use lib::{ mkdir, write_npz, plot::{ line_plot, Curve }, stack_means };
use otoc_sim::{
    experiment::light_cone,
    hamiltonian::IsingParams,
};

const N: usize = 8;
const W_SITE: usize = 0;
const T_MAX: f64 = 8.0;
const NT: usize = 41;
const SAMPLES: usize = 4;
const SEED: u64 = 10546;

fn main() -> Result<(), Box<dyn Error>> {
    lib::init_logging();

    let outdir = PathBuf::from("output");
    mkdir!(outdir);

    let times = lib::linspace(0.0, T_MAX, NT);
    let cone = light_cone(&IsingParams::chaotic(N), W_SITE, &times, SAMPLES, Some(SEED))?;

    // first time at which each separation exceeds a fixed fraction of the
    // late-time value
    println!("{:>4} {:>10}", "r", "t(C > 0.5)");
    for (site, series) in cone.iter().enumerate() {
        let arrival
            = series.points()
            .find(|(_, c, _)| *c > 0.5)
            .map(|(t, _, _)| format!("{t:10.3}"))
            .unwrap_or_else(|| format!("{:>10}", "-"));
        println!("{:4} {}", site.abs_diff(W_SITE), arrival);
    }
    let last
        = cone.iter()
        .map(|s| format!("{:.3}", s.mean().last().copied().unwrap_or(f64::NAN)))
        .join(" ");
    println!("C(t = {T_MAX}) by site: {last}");

    let sites: nd::Array1<u32> = (0..N as u32).collect();
    write_npz!(
        outdir.join("light_cone.npz"),
        arrays: {
            "t" => &nd::Array1::from(times),
            "site" => &sites,
            "w_site" => &nd::array![W_SITE as u32],
            "C" => &stack_means(&cone),
        }
    );
    let curves: Vec<Curve>
        = cone.iter().enumerate()
        .map(|(site, s)| {
            Curve::from_series_means(format!("r = {}", site.abs_diff(W_SITE)), s)
        })
        .collect();
    line_plot(
        outdir.join("light_cone.svg"),
        &format!("Operator spreading, chaotic Ising chain (N = {N})"),
        "time t",
        &format!("C(t) for W = Z{W_SITE}, V = Z(r)"),
        &curves,
    )?;
    Ok(())
}
