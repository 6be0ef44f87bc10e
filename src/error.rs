//! This module defines the custom error types for the library.
//!
//! The error surface is deliberately small. The QR iteration itself cannot
//! fail: running out of iteration budget is a reported outcome, carried
//! in-band by the result records, never an error. What remains are the
//! malformed inputs a caller can hand to the solvers — a zero truncation
//! size, a zero iteration budget, a non-positive tolerance, or an empty
//! truncation-size list.
//!
//! Using the [`thiserror`] crate allows us to create idiomatic error types
//! with minimal boilerplate. The public type wraps a private kind enum so
//! the set of variants can evolve without breaking the API.

use thiserror::Error;

/// Represents all possible errors that can occur during a spectral solve.
#[derive(Error, Debug)]
#[error(transparent)]
pub struct SpectrumError(#[from] SpectrumErrorKind);

/// Private enum containing the distinct kinds of errors.
#[derive(Error, Debug, PartialEq)]
pub(crate) enum SpectrumErrorKind {
    /// Indicates that an invalid input parameter was provided to a solver.
    #[error("Invalid input parameter: {0}")]
    InputError(String),

    /// Occurs when [`crate::solvers::estimate_spectrum`] is handed an
    /// explicitly empty list of truncation sizes.
    #[error("Spectrum estimation requires at least one truncation size.")]
    EmptySizes,
}

// Manually implement PartialEq for the public error type by comparing the
// inner `SpectrumErrorKind`.
impl PartialEq for SpectrumError {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}
