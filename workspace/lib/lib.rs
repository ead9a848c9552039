//! Output helpers shared by the experiment binaries.

use ndarray as nd;
use otoc_sim::stats::Series;

pub use ndarray_npy;

pub mod plot;

/// Create a directory and all its parents if they don't already exist,
/// returning early from the enclosing function on failure.
#[macro_export]
macro_rules! mkdir {
    ( $dir:expr ) => {
        std::fs::create_dir_all(&$dir)?
    }
}

/// Write a set of named arrays to a `.npz` file, returning early from the
/// enclosing function on failure.
///
/// ```ignore
/// write_npz!(
///     outdir.join("data.npz"),
///     arrays: {
///         "t" => &t,
///         "C" => &c,
///     }
/// );
/// ```
#[macro_export]
macro_rules! write_npz {
    (
        $path:expr,
        arrays: { $( $name:expr => $arr:expr ),+ $(,)? }
    ) => {
        {
            let mut npz = $crate::ndarray_npy::NpzWriter::new(
                std::fs::File::create(&$path)?);
            $( npz.add_array($name, $arr)?; )+
            npz.finish()?;
        }
    }
}

/// Initialize logging to stderr at `info` level, unless overridden by
/// `RUST_LOG`.
pub fn init_logging() {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();
}

/// Return `n` evenly spaced values from `start` to `stop`, inclusive.
pub fn linspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    nd::Array1::linspace(start, stop, n).to_vec()
}

/// Copy the three columns of a series into arrays.
pub fn series_arrays(series: &Series)
    -> (nd::Array1<f64>, nd::Array1<f64>, nd::Array1<f64>)
{
    (
        nd::Array1::from(series.param().to_vec()),
        nd::Array1::from(series.mean().to_vec()),
        nd::Array1::from(series.err().to_vec()),
    )
}

fn stack<F>(series: &[Series], column: F) -> nd::Array2<f64>
where F: Fn(&Series) -> &[f64]
{
    let cols = series.first().map(|s| s.len()).unwrap_or(0);
    let mut out: nd::Array2<f64> = nd::Array2::zeros((series.len(), cols));
    for (mut row, s) in out.outer_iter_mut().zip(series) {
        if s.len() != cols { panic!("ragged series"); }
        row.iter_mut().zip(column(s)).for_each(|(r, x)| { *r = *x; });
    }
    out
}

/// Stack the means of several series sharing the same sweep into a 2D array,
/// one row per series.
///
/// *Panics if the series have different lengths.*
pub fn stack_means(series: &[Series]) -> nd::Array2<f64> {
    stack(series, Series::mean)
}

/// Like [`stack_means`], but for the standard errors.
///
/// *Panics if the series have different lengths.*
pub fn stack_errs(series: &[Series]) -> nd::Array2<f64> {
    stack(series, Series::err)
}
