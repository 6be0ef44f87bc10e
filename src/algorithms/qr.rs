//! Shifted QR iteration primitives.
//!
//! One iteration of the algorithm has three parts, each exposed as its own
//! function:
//!
//! - [`select_shift`]: a Wilkinson-style shift taken from the eigenvalues of
//!   the trailing 2×2 block, or a caller-supplied fixed value.
//! - [`qr_step`]: one shifted QR similarity transform,
//!   `A' = R·Q + σ·I` where `Q·R = A - σ·I`. The dense QR factorization is
//!   `faer`'s; this module treats it as a black box.
//! - [`qr_iterate`]: the convergence loop, repeating steps until the maximum
//!   off-diagonal magnitude drops below the tolerance or the iteration
//!   budget runs out, optionally accumulating the orthogonal transforms for
//!   eigenvector recovery.
//!
//! Every step is a similarity transform, so the eigenvalues of the iterate
//! are those of the input matrix throughout.

use faer::prelude::*;

use crate::scalar::SpectralScalar;

/// Selects the shift for one QR step.
///
/// A fixed shift, when supplied, is returned unchanged for every iteration.
/// Otherwise the shift is an eigenvalue of the trailing 2×2 block of `a` —
/// whichever of the two roots is closer in magnitude to the last diagonal
/// entry. This is the Wilkinson heuristic: it drives the trailing diagonal
/// entry toward a true eigenvalue at an accelerated rate.
///
/// When the discriminant of the corner block has no square root in the
/// scalar type (a negative real discriminant on `f64`), the shift falls
/// back to the half-trace of the block. Complex scalars take the principal
/// complex root instead, so genuinely complex shifts arise naturally. For a
/// 1×1 matrix the shift is the lone entry.
///
/// # Panics
///
/// Panics if `a` is 0×0; callers are expected to validate `n ≥ 1`.
pub fn select_shift<T: SpectralScalar>(a: MatRef<'_, T>, fixed: Option<T>) -> T {
    if let Some(shift) = fixed {
        return shift;
    }

    let n = a.nrows();
    if n < 2 {
        return a[(0, 0)];
    }

    // Trailing 2x2 block [[a, b], [c, d]].
    let block_a = a[(n - 2, n - 2)];
    let block_b = a[(n - 2, n - 1)];
    let block_c = a[(n - 1, n - 2)];
    let block_d = a[(n - 1, n - 1)];

    let trace = block_a + block_d;
    let det = block_a * block_d - block_b * block_c;
    let discriminant = trace * trace - T::from_real_impl(&4.0) * det;
    let half = T::from_real_impl(&0.5);

    match discriminant.corner_sqrt() {
        Some(root) => {
            let lambda_plus = (trace + root) * half;
            let lambda_minus = (trace - root) * half;
            if (lambda_minus - block_d).magnitude() < (lambda_plus - block_d).magnitude() {
                lambda_minus
            } else {
                lambda_plus
            }
        }
        None => trace * half,
    }
}

/// Performs one shifted QR similarity transform.
///
/// Computes `Q·R = A - shift·I` via `faer`'s dense QR factorization and
/// returns `(R·Q + shift·I, Q)`. The returned matrix has the same
/// eigenvalues as `a`; the returned `Q` is the orthogonal (unitary) factor
/// of this step, for callers accumulating an eigenvector transform.
pub fn qr_step<T: SpectralScalar>(a: &Mat<T>, shift: T) -> (Mat<T>, Mat<T>) {
    let n = a.nrows();

    let mut shifted = a.clone();
    for i in 0..n {
        shifted[(i, i)] = shifted[(i, i)] - shift;
    }

    let qr = shifted.as_ref().qr();
    let q = qr.compute_Q();
    let mut next = qr.R() * q.as_ref();
    for i in 0..n {
        next[(i, i)] = next[(i, i)] + shift;
    }

    (next, q)
}

/// Maximum magnitude over the off-diagonal entries of `a`.
///
/// This is the convergence residual of the iteration; it is 0 for a 1×1
/// matrix, which therefore counts as converged immediately.
pub fn max_off_diagonal<T: SpectralScalar>(a: MatRef<'_, T>) -> f64 {
    let n = a.nrows();
    let mut max = 0.0_f64;
    for i in 0..n {
        for j in 0..n {
            if i != j {
                max = max.max(a[(i, j)].magnitude());
            }
        }
    }
    max
}

/// The terminal state of a QR iteration.
#[derive(Clone, Debug)]
pub struct QrIterationOutput<T> {
    /// The final iterate. When converged, its diagonal carries the
    /// eigenvalue estimates in their original (unsorted) order.
    pub matrix: Mat<T>,
    /// Product of the per-step orthogonal factors, present when requested.
    /// Its columns approximate eigenvectors of the input matrix, aligned
    /// with the diagonal of `matrix`.
    pub q_total: Option<Mat<T>>,
    /// Number of QR steps performed.
    pub iterations: usize,
    /// Whether the residual dropped below the tolerance within the budget.
    pub converged: bool,
    /// Maximum off-diagonal magnitude at termination.
    pub residual: f64,
}

/// Runs the shifted QR iteration on a dense matrix.
///
/// Performs up to `max_iter` steps, stopping early once the maximum
/// off-diagonal magnitude drops below `tol`. Exhausting the budget is not an
/// error; it is reported through [`QrIterationOutput::converged`]. When
/// `accumulate_q` is set, the per-step orthogonal factors are multiplied
/// into a running transform initialized to the identity.
///
/// The matrix must be square with `n ≥ 1`, and `max_iter ≥ 1`; the
/// high-level solvers validate both.
pub fn qr_iterate<T: SpectralScalar>(
    mut a: Mat<T>,
    max_iter: usize,
    tol: f64,
    fixed_shift: Option<T>,
    accumulate_q: bool,
) -> QrIterationOutput<T> {
    let n = a.nrows();
    let mut q_total = if accumulate_q {
        Some(Mat::<T>::identity(n, n))
    } else {
        None
    };

    let mut iterations = 0;
    let mut converged = false;
    let mut residual = f64::INFINITY;

    for _ in 0..max_iter {
        let shift = select_shift(a.as_ref(), fixed_shift);
        let (next, q) = qr_step(&a, shift);
        a = next;

        if let Some(accumulated) = q_total.as_mut() {
            *accumulated = &*accumulated * &q;
        }

        iterations += 1;
        residual = max_off_diagonal(a.as_ref());
        if residual < tol {
            converged = true;
            break;
        }
    }

    QrIterationOutput {
        matrix: a,
        q_total,
        iterations,
        converged,
        residual,
    }
}
