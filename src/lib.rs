//! Approximate spectra of infinite-dimensional operators via shifted QR iteration.
//!
//! This crate computes eigenvalue estimates (and, on request, eigenvectors)
//! for linear operators on ℓ², the space of square-summable sequences. An
//! operator is represented by a rule for producing its matrix elements
//! ([`InfiniteOperator`]); the solvers restrict it to a finite n×n
//! truncation and drive that dense matrix toward diagonal form with a
//! shifted QR iteration, reading eigenvalue estimates off the diagonal.
//!
//! Built on the [`faer`] linear algebra framework: truncations are dense
//! [`faer::Mat`] matrices and each iteration uses `faer`'s Householder QR
//! factorization as its inner primitive.
//!
//! ## Solvers
//!
//! **Single truncation** ([`solve_truncation`]): fixes one truncation size
//! and iterates to convergence or budget exhaustion. Each step selects a
//! Wilkinson-style shift from the trailing 2×2 block (or uses a
//! caller-supplied fixed shift), applies the similarity transform
//! `A ← R·Q + σ·I` where `Q·R = A - σ·I`, and tests the maximum
//! off-diagonal magnitude against the tolerance.
//!
//! **Multi-truncation estimate** ([`estimate_spectrum`]): repeats the
//! single-truncation solve over a ladder of increasing sizes and reports
//! the largest size's eigenvalues together with the per-size results, so a
//! caller can judge how the estimates settle as the truncation grows.
//!
//! Both real (`f64`) and complex ([`faer::c64`]) operators are supported
//! through the [`SpectralScalar`] capability trait; complex scalars let the
//! shift heuristic take genuinely complex roots when the corner
//! discriminant is negative.
//!
//! ## Example Usage
//!
//! ```rust
//! use infinite_spectra::{diagonal_operator, solve_truncation, SolveOptions, ValueSource};
//!
//! // The operator with diagonal 1, 2, 3, ... — its truncations are already
//! // diagonal, so the iteration converges immediately.
//! let operator = diagonal_operator(ValueSource::function(|i| (i + 1) as f64));
//!
//! let result = solve_truncation(&operator, 8, &SolveOptions::default()).unwrap();
//!
//! assert!(result.converged);
//! // Eigenvalues are ordered by descending magnitude.
//! assert_eq!(result.eigenvalues[0], 8.0);
//! assert_eq!(result.eigenvalues[7], 1.0);
//! ```
//!
//! ## Execution model
//!
//! Everything is synchronous and single-threaded. The per-element memo
//! table on [`InfiniteOperator`] uses unsynchronized interior mutability,
//! so operators are not meant to be shared across threads; the per-size
//! runs of [`estimate_spectrum`] execute sequentially. The cost of a
//! single-truncation solve is dominated by the O(n³) QR factorization
//! performed once per iteration.

// Declare the modules that form the crate's API structure.
pub mod algorithms;
pub mod error;
pub mod factories;
pub mod operator;
pub mod scalar;
pub mod solvers;

// Re-export the main API for convenient access.
pub use error::SpectrumError;
pub use factories::{diagonal_operator, tridiagonal_operator, ValueSource};
pub use operator::{Extent, InfiniteOperator};
pub use scalar::SpectralScalar;
pub use solvers::{
    estimate_spectrum, solve_truncation, EstimateOptions, SolveOptions, SpectrumEstimate,
    TruncationResult, ADAPTIVE_TRUNCATION_SIZES, DEFAULT_TRUNCATION_SIZE,
};
