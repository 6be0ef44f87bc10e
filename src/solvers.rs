//! High-level API for spectral computations on infinite operators.
//!
//! Two entry points:
//!
//! - [`solve_truncation`] runs the shifted QR iteration on a single n×n
//!   truncation of an operator and returns the ordered eigenvalue estimates,
//!   along with convergence diagnostics and, on request, eigenvectors.
//! - [`estimate_spectrum`] repeats the computation over a sequence of
//!   increasing truncation sizes and aggregates the runs into one spectrum
//!   estimate. The per-size runs are fully independent: each materializes a
//!   fresh truncation (served cheaply by the operator's element cache) and
//!   iterates from scratch. The reported eigenvalue sequence is that of the
//!   largest size attempted, and the overall convergence flag is the
//!   conjunction of every per-size flag.
//!
//! Non-convergence is never an error. Exhausting the iteration budget is a
//! legitimate, reported outcome — the caller decides whether to retry with a
//! larger budget or a larger truncation.

use std::collections::BTreeMap;

use faer::Mat;

use crate::algorithms::qr::qr_iterate;
use crate::error::{SpectrumError, SpectrumErrorKind};
use crate::operator::InfiniteOperator;
use crate::scalar::SpectralScalar;

/// Truncation size used when a caller requests a single default run.
pub const DEFAULT_TRUNCATION_SIZE: usize = 50;

/// Truncation size ladder used by [`estimate_spectrum`] when no sizes are
/// supplied and adaptive behavior is requested.
pub const ADAPTIVE_TRUNCATION_SIZES: [usize; 4] = [20, 50, 100, 200];

/// Parameters of a single-truncation solve.
#[derive(Clone, Debug)]
pub struct SolveOptions<T> {
    /// Maximum number of QR iterations. Must be at least 1.
    pub max_iter: usize,
    /// Convergence tolerance on the maximum off-diagonal magnitude.
    /// Must be strictly positive.
    pub tol: f64,
    /// Fixed shift to use for every iteration. When `None`, a Wilkinson
    /// shift is recomputed from the trailing 2×2 block each step.
    pub shift: Option<T>,
    /// Whether to accumulate the orthogonal transforms into an eigenvector
    /// matrix. Roughly doubles the per-iteration cost.
    pub compute_eigenvectors: bool,
}

impl<T> Default for SolveOptions<T> {
    fn default() -> Self {
        Self {
            max_iter: 1000,
            tol: 1e-10,
            shift: None,
            compute_eigenvectors: false,
        }
    }
}

/// Result of the QR iteration on one finite truncation.
#[derive(Clone, Debug)]
pub struct TruncationResult<T> {
    /// Eigenvalue estimates, sorted by descending magnitude. Ties keep
    /// their original diagonal order (the sort is stable).
    pub eigenvalues: Vec<T>,
    /// Number of QR iterations performed.
    pub iterations: usize,
    /// Whether the residual dropped below the tolerance within the budget.
    pub converged: bool,
    /// Maximum off-diagonal magnitude at termination; `None` when the run
    /// did not converge.
    pub residual: Option<f64>,
    /// Approximate eigenvectors as columns, aligned with `eigenvalues`.
    /// Present only when requested via
    /// [`SolveOptions::compute_eigenvectors`].
    pub eigenvectors: Option<Mat<T>>,
}

/// Computes eigenvalue estimates for one n×n truncation of `operator`.
///
/// Materializes the truncation, runs the shifted QR iteration to
/// convergence or budget exhaustion, reads the eigenvalue estimates off the
/// final diagonal, and orders them by descending magnitude. When
/// eigenvectors are requested, the accumulated orthogonal transform is
/// permuted column-wise by the same ordering, so column `k` pairs with
/// eigenvalue `k`.
///
/// A 1×1 truncation has no off-diagonal entries; it converges on the first
/// iteration with a residual of zero, whatever the budget.
///
/// # Errors
///
/// Returns an input error when `n == 0`, `max_iter == 0`, or the tolerance
/// is not strictly positive. Non-convergence is reported through
/// [`TruncationResult::converged`], not as an error.
pub fn solve_truncation<T: SpectralScalar>(
    operator: &InfiniteOperator<T>,
    n: usize,
    options: &SolveOptions<T>,
) -> Result<TruncationResult<T>, SpectrumError> {
    validate(n, options.max_iter, options.tol)?;

    let a = operator.truncate(n);
    let output = qr_iterate(
        a,
        options.max_iter,
        options.tol,
        options.shift,
        options.compute_eigenvectors,
    );

    if output.converged {
        log::debug!(
            "truncation n={n} converged after {} iterations (residual {:.3e})",
            output.iterations,
            output.residual
        );
    } else {
        log::warn!(
            "truncation n={n} exhausted {} iterations without reaching tol={:.3e}",
            output.iterations,
            options.tol
        );
    }

    let diagonal: Vec<T> = (0..n).map(|i| output.matrix[(i, i)]).collect();
    let order = magnitude_order(&diagonal);

    let eigenvalues = order.iter().map(|&k| diagonal[k]).collect();
    let eigenvectors = output
        .q_total
        .map(|q_total| Mat::from_fn(n, n, |i, k| q_total[(i, order[k])]));

    Ok(TruncationResult {
        eigenvalues,
        iterations: output.iterations,
        converged: output.converged,
        residual: output.converged.then_some(output.residual),
        eigenvectors,
    })
}

/// Parameters of a multi-truncation spectrum estimate.
#[derive(Clone, Debug)]
pub struct EstimateOptions {
    /// Maximum QR iterations per truncation.
    pub max_iter: usize,
    /// Convergence tolerance shared by every truncation.
    pub tol: f64,
    /// When no explicit sizes are supplied: `true` runs the
    /// [`ADAPTIVE_TRUNCATION_SIZES`] ladder, `false` runs the single
    /// [`DEFAULT_TRUNCATION_SIZE`].
    pub adaptive: bool,
}

impl Default for EstimateOptions {
    fn default() -> Self {
        Self {
            max_iter: 1000,
            tol: 1e-10,
            adaptive: true,
        }
    }
}

/// A spectrum estimate aggregated over several truncation sizes.
#[derive(Clone, Debug)]
pub struct SpectrumEstimate<T> {
    /// Eigenvalue estimates of the largest truncation attempted.
    pub eigenvalues: Vec<T>,
    /// The per-size results, keyed by truncation size.
    pub by_size: BTreeMap<usize, TruncationResult<T>>,
    /// `true` only when every per-size run converged independently.
    pub converged: bool,
    /// The largest truncation size attempted.
    pub recommended_size: usize,
}

/// Estimates the spectrum of `operator` across a sequence of truncation
/// sizes.
///
/// Each size runs [`solve_truncation`] independently, without eigenvector
/// accumulation and without a fixed shift. No information flows between
/// sizes, and the reported eigenvalue sequence is simply the largest size's
/// raw result — cross-size stabilization is not attempted.
///
/// `sizes = None` selects [`ADAPTIVE_TRUNCATION_SIZES`] when
/// `options.adaptive` is set and `[DEFAULT_TRUNCATION_SIZE]` otherwise.
///
/// # Errors
///
/// Returns an error when an explicitly empty size list is supplied, or when
/// any per-size run rejects its parameters.
pub fn estimate_spectrum<T: SpectralScalar>(
    operator: &InfiniteOperator<T>,
    sizes: Option<&[usize]>,
    options: &EstimateOptions,
) -> Result<SpectrumEstimate<T>, SpectrumError> {
    let sizes: Vec<usize> = match sizes {
        Some([]) => return Err(SpectrumErrorKind::EmptySizes.into()),
        Some(sizes) => sizes.to_vec(),
        None if options.adaptive => ADAPTIVE_TRUNCATION_SIZES.to_vec(),
        None => vec![DEFAULT_TRUNCATION_SIZE],
    };

    let solve_options = SolveOptions::<T> {
        max_iter: options.max_iter,
        tol: options.tol,
        ..SolveOptions::default()
    };

    let mut by_size = BTreeMap::new();
    for &n in &sizes {
        log::debug!("estimating spectrum at truncation size {n}");
        let result = solve_truncation(operator, n, &solve_options)?;
        by_size.insert(n, result);
    }

    // The size list is non-empty by construction at this point.
    let recommended_size = sizes.iter().copied().max().unwrap_or(DEFAULT_TRUNCATION_SIZE);
    let converged = by_size.values().all(|result| result.converged);
    let eigenvalues = by_size
        .get(&recommended_size)
        .map(|result| result.eigenvalues.clone())
        .unwrap_or_default();

    Ok(SpectrumEstimate {
        eigenvalues,
        by_size,
        converged,
        recommended_size,
    })
}

/// Permutation that sorts `values` by descending magnitude, stable in the
/// original order for ties.
fn magnitude_order<T: SpectralScalar>(values: &[T]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&p, &q| values[q].magnitude().total_cmp(&values[p].magnitude()));
    order
}

fn validate(n: usize, max_iter: usize, tol: f64) -> Result<(), SpectrumError> {
    if n == 0 {
        return Err(SpectrumErrorKind::InputError(
            "truncation size `n` must be at least 1".to_string(),
        )
        .into());
    }
    if max_iter == 0 {
        return Err(
            SpectrumErrorKind::InputError("`max_iter` must be at least 1".to_string()).into(),
        );
    }
    if !(tol > 0.0) {
        return Err(
            SpectrumErrorKind::InputError("`tol` must be strictly positive".to_string()).into(),
        );
    }
    Ok(())
}
