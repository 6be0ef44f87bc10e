//! Integration test suite to verify the mathematical correctness of the
//! spectral solvers.
//!
//! # Test Methodology
//!
//! The core principle of this suite is to validate the QR iteration against
//! operators whose spectra are known by construction:
//!
//! 1.  **Diagonal operators** are the exact case: a truncation is already
//!     diagonal, so the computed eigenvalues must equal the diagonal values
//!     and the iteration must converge immediately. This isolates the
//!     result plumbing (ordering, convergence reporting, caching) from the
//!     numerics.
//! 2.  **Diagonally dominant tridiagonal operators** have spectra pinned by
//!     Gershgorin's theorem: every eigenvalue lies within the coupling
//!     radius of a diagonal entry. With well-separated diagonal entries the
//!     iteration must converge, and the estimates must land in the disks.
//! 3.  **Structural invariants** hold regardless of convergence: the
//!     truncations of the discrete-Laplacian operator are symmetric with
//!     spectrum inside [0, 4], so every diagonal entry of the (symmetric)
//!     iterate is a Rayleigh quotient and stays in that interval even when
//!     the budget runs out.
//!
//! Non-convergence is also exercised deliberately: a real skew-symmetric
//! operator has purely imaginary eigenvalues, which a real-valued iteration
//! cannot reach. The solver must report this in-band instead of failing.

use anyhow::{ensure, Result};
use faer::prelude::*;
use faer::{c64, Mat};
use infinite_spectra::{
    diagonal_operator, estimate_spectrum, solve_truncation, tridiagonal_operator,
    EstimateOptions, InfiniteOperator, SolveOptions, ValueSource,
};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::cell::Cell;
use std::rc::Rc;

/// Tolerance for eigenvalue estimates against known spectra.
const EIG_TOLERANCE: f64 = 1e-8;

/// Tolerance for the eigenvector residual `||A v - lambda v||`. The
/// iteration stops once off-diagonals drop below 1e-10, so per-column
/// residuals of a few multiples of that are expected.
const RESIDUAL_TOLERANCE: f64 = 1e-7;

/// The discrete-Laplacian-like operator: 2 on the diagonal, -1 on both
/// off-diagonals. Its truncations have spectra inside [0, 4] for every n.
fn laplacian_operator() -> InfiniteOperator<f64> {
    tridiagonal_operator(
        ValueSource::constant(2.0),
        Some(ValueSource::constant(-1.0)),
        Some(ValueSource::constant(-1.0)),
    )
}

/// A diagonally dominant tridiagonal operator with diagonal 1, 2, 3, ...
/// and weak constant coupling. Gershgorin disks of radius `2 * coupling`
/// around the integers are disjoint, so the spectrum is simple and the
/// iteration converges quickly.
fn graded_tridiagonal(coupling: f64) -> InfiniteOperator<f64> {
    tridiagonal_operator(
        ValueSource::function(|i| (i + 1) as f64),
        Some(ValueSource::constant(coupling)),
        Some(ValueSource::constant(coupling)),
    )
}

#[test]
fn diagonal_truncation_recovers_the_integer_spectrum() -> Result<()> {
    let operator = diagonal_operator(ValueSource::function(|i| (i + 1) as f64));
    let options = SolveOptions {
        tol: 1e-12,
        ..SolveOptions::default()
    };

    let result = solve_truncation(&operator, 20, &options)?;

    ensure!(result.converged, "diagonal truncation must converge");
    ensure!(result.eigenvalues.len() == 20);
    // Descending by magnitude: 20, 19, ..., 1.
    for (k, &eig) in result.eigenvalues.iter().enumerate() {
        let expected = (20 - k) as f64;
        ensure!(
            (eig - expected).abs() < EIG_TOLERANCE,
            "eigenvalue {k} is {eig}, expected {expected}"
        );
    }
    Ok(())
}

#[test]
fn random_diagonal_sequence_is_recovered_in_magnitude_order() -> Result<()> {
    // A reproducible random diagonal; values in [1, 2) are distinct with
    // probability one, so the descending order is unambiguous.
    let mut rng = StdRng::seed_from_u64(42);
    let values: Vec<f64> = (0..16).map(|_| rng.random_range(1.0..2.0)).collect();
    let operator = diagonal_operator(ValueSource::sequence(values.clone()));

    let result = solve_truncation(&operator, 16, &SolveOptions::default())?;
    ensure!(result.converged);

    let mut expected = values;
    expected.sort_by(|a, b| b.partial_cmp(a).unwrap());
    for (eig, want) in result.eigenvalues.iter().zip(&expected) {
        ensure!((eig - want).abs() < 1e-12);
    }
    Ok(())
}

#[test]
fn element_function_is_memoized_across_solver_calls() -> Result<()> {
    let calls = Rc::new(Cell::new(0usize));
    let counter = Rc::clone(&calls);
    let operator = InfiniteOperator::new(move |i, j| {
        counter.set(counter.get() + 1);
        if i == j {
            (i + 1) as f64
        } else if i.abs_diff(j) == 1 {
            0.3
        } else {
            0.0
        }
    });

    let n = 12;
    let first = solve_truncation(&operator, n, &SolveOptions::default())?;
    ensure!(calls.get() == n * n, "first solve evaluates each element once");

    let second = solve_truncation(&operator, n, &SolveOptions::default())?;
    ensure!(
        calls.get() == n * n,
        "second solve must be served entirely from the cache"
    );

    // Identical inputs and a deterministic shift policy: the runs must be
    // bitwise identical, iteration counts included.
    ensure!(first.iterations == second.iterations);
    ensure!(first.eigenvalues == second.eigenvalues);
    Ok(())
}

#[test]
fn eigenvectors_satisfy_the_eigenvalue_equation() -> Result<()> {
    let operator = graded_tridiagonal(0.3);
    let n = 10;
    let options = SolveOptions {
        compute_eigenvectors: true,
        ..SolveOptions::default()
    };

    let result = solve_truncation(&operator, n, &options)?;
    ensure!(result.converged, "graded tridiagonal must converge");

    let v = result
        .eigenvectors
        .as_ref()
        .expect("eigenvectors were requested");
    let a = operator.truncate(n);

    for k in 0..n {
        let lambda = result.eigenvalues[k];
        let v_k = Mat::from_fn(n, 1, |i, _| v[(i, k)]);

        // Columns of the accumulated transform are unit vectors.
        ensure!((v_k.norm_l2() - 1.0).abs() < 1e-10);

        let residual = (&a * &v_k - &v_k * Scale(lambda)).norm_l2();
        ensure!(
            residual < RESIDUAL_TOLERANCE,
            "eigenpair {k} residual too high: {residual}"
        );
    }
    Ok(())
}

#[test]
fn one_by_one_truncation_converges_immediately() -> Result<()> {
    let operator = diagonal_operator(ValueSource::sequence(vec![3.5]));
    // Even the smallest possible budget suffices: a 1x1 matrix has no
    // off-diagonal entries, so the first residual is zero.
    let options = SolveOptions {
        max_iter: 1,
        ..SolveOptions::default()
    };

    let result = solve_truncation(&operator, 1, &options)?;
    ensure!(result.converged);
    ensure!(result.iterations == 1);
    ensure!(result.residual == Some(0.0));
    ensure!(result.eigenvalues == vec![3.5]);
    Ok(())
}

#[test]
fn estimator_reports_largest_size_and_joint_convergence() -> Result<()> {
    let operator = diagonal_operator(ValueSource::function(|i| (i + 1) as f64));

    let estimate = estimate_spectrum(&operator, Some(&[20, 50]), &EstimateOptions::default())?;

    ensure!(estimate.recommended_size == 50);
    ensure!(estimate.converged, "both per-size runs converge");
    ensure!(estimate.by_size.len() == 2);
    ensure!(estimate.by_size[&20].converged && estimate.by_size[&50].converged);

    // The reported sequence is exactly the n = 50 run's output.
    let direct = solve_truncation(&operator, 50, &SolveOptions::default())?;
    ensure!(estimate.eigenvalues == direct.eigenvalues);
    Ok(())
}

#[test]
fn adaptive_default_runs_the_size_ladder() -> Result<()> {
    let operator = diagonal_operator(ValueSource::function(|i| (i + 1) as f64));

    let estimate = estimate_spectrum(&operator, None, &EstimateOptions::default())?;

    let sizes: Vec<usize> = estimate.by_size.keys().copied().collect();
    ensure!(sizes == vec![20, 50, 100, 200]);
    ensure!(estimate.recommended_size == 200);
    ensure!(estimate.eigenvalues.len() == 200);
    Ok(())
}

#[test]
fn laplacian_eigenvalues_stay_in_the_spectral_interval() -> Result<()> {
    // The truncations are symmetric, so the iterate stays symmetric under
    // orthogonal similarity and its diagonal entries are Rayleigh
    // quotients. They lie in [0, 4] whether or not the budget sufficed.
    let operator = laplacian_operator();
    for n in [4, 8, 16] {
        let result = solve_truncation(&operator, n, &SolveOptions::default())?;
        for &eig in &result.eigenvalues {
            ensure!(
                (-EIG_TOLERANCE..=4.0 + EIG_TOLERANCE).contains(&eig),
                "n = {n}: eigenvalue {eig} escapes [0, 4]"
            );
        }
    }
    Ok(())
}

#[test]
fn complex_operator_lands_in_gershgorin_disks() -> Result<()> {
    // Diagonal (k+1) + 0.5i with weak real coupling. The disks of radius
    // 0.2 around the diagonal entries are disjoint, so each holds exactly
    // one eigenvalue.
    let n = 8;
    let operator: InfiniteOperator<c64> = tridiagonal_operator(
        ValueSource::function(|k| c64::new((k + 1) as f64, 0.5)),
        Some(ValueSource::constant(c64::new(0.1, 0.0))),
        Some(ValueSource::constant(c64::new(0.1, 0.0))),
    );

    let result = solve_truncation(&operator, n, &SolveOptions::default())?;
    ensure!(result.converged, "complex tridiagonal must converge");

    let centers: Vec<c64> = (0..n).map(|k| c64::new((k + 1) as f64, 0.5)).collect();
    for &eig in &result.eigenvalues {
        ensure!(
            centers.iter().any(|&c| (eig - c).norm() <= 0.2 + EIG_TOLERANCE),
            "eigenvalue {eig} outside every Gershgorin disk"
        );
    }

    // Magnitude ordering holds for complex spectra too.
    for pair in result.eigenvalues.windows(2) {
        ensure!(pair[0].norm() >= pair[1].norm() - 1e-12);
    }
    Ok(())
}

#[test]
fn skew_operator_reports_nonconvergence_in_band() -> Result<()> {
    // Purely imaginary spectrum: a real-valued iteration cannot reach
    // diagonal form, and its shift heuristic falls back to the half-trace.
    // The budget must run out without an error.
    let operator = tridiagonal_operator(
        ValueSource::constant(0.0),
        Some(ValueSource::constant(1.0)),
        Some(ValueSource::constant(-1.0)),
    );
    let options = SolveOptions {
        max_iter: 40,
        ..SolveOptions::default()
    };

    let result = solve_truncation(&operator, 6, &options)?;
    ensure!(!result.converged);
    ensure!(result.iterations == 40);
    ensure!(result.residual.is_none());
    ensure!(result.eigenvalues.len() == 6);
    Ok(())
}

#[test]
fn fixed_shift_policy_still_converges_on_diagonal_input() -> Result<()> {
    let operator = diagonal_operator(ValueSource::function(|i| (i + 1) as f64));
    let options = SolveOptions {
        shift: Some(0.5),
        ..SolveOptions::default()
    };

    let result = solve_truncation(&operator, 8, &options)?;
    ensure!(result.converged);
    for (k, &eig) in result.eigenvalues.iter().enumerate() {
        ensure!((eig - (8 - k) as f64).abs() < EIG_TOLERANCE);
    }
    Ok(())
}
