//! This module defines the scalar capability required by the QR iteration.
//!
//! The shifted QR algorithm is agnostic to whether the operator is real or
//! complex, with one exception: the Wilkinson shift needs the square root of
//! the discriminant of the trailing 2×2 block, and a negative discriminant
//! only has a square root over the complex plane. Rather than branching on a
//! declared dtype inside the solver, the requirement is expressed as a trait:
//! a scalar type states whether it can represent the root.
//!
//! [`SpectralScalar`] extends `faer`'s [`ComplexField`] with the standard
//! arithmetic operators, a magnitude, and that square-root capability. The
//! two implementations cover the scalar types the solvers are used with in
//! practice: `f64` for real operators and [`faer::c64`] for complex ones.

use core::ops::{Add, Mul, Neg, Sub};

use faer::traits::ComplexField;
use num_complex::Complex;

/// Scalar arithmetic required by the shifted QR iteration.
///
/// The trait deliberately asks for little: copyable values with the usual
/// field operators, a non-negative magnitude, and [`corner_sqrt`] for the
/// shift heuristic. Everything else the iteration needs (matrix storage,
/// the QR factorization itself) comes from `faer` via the [`ComplexField`]
/// supertrait.
///
/// [`corner_sqrt`]: SpectralScalar::corner_sqrt
pub trait SpectralScalar:
    ComplexField<Real = f64>
    + Copy
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Neg<Output = Self>
    + 'static
{
    /// Returns the magnitude (absolute value or complex modulus) of `self`.
    fn magnitude(self) -> f64;

    /// Square root of a 2×2 corner discriminant.
    ///
    /// Returns `None` when the scalar type cannot represent the root, which
    /// happens exactly for a negative real discriminant on `f64`. Complex
    /// scalars always return the principal square root.
    fn corner_sqrt(self) -> Option<Self>;
}

impl SpectralScalar for f64 {
    #[inline]
    fn magnitude(self) -> f64 {
        self.abs()
    }

    #[inline]
    fn corner_sqrt(self) -> Option<Self> {
        // A negative discriminant has no real root; the shift selection
        // falls back to the half-trace in that case.
        if self >= 0.0 { Some(self.sqrt()) } else { None }
    }
}

// `faer::c64` is `num_complex::Complex<f64>`; implementing on the
// underlying type covers both spellings.
impl SpectralScalar for Complex<f64> {
    #[inline]
    fn magnitude(self) -> f64 {
        self.norm()
    }

    #[inline]
    fn corner_sqrt(self) -> Option<Self> {
        Some(self.sqrt())
    }
}
