//! Convenience constructors for structured infinite operators.
//!
//! Diagonal and tridiagonal operators cover most spectral test problems, and
//! both are defined band-wise: each band is described by a value per index.
//! The bands accept either a function of the index or a finite sequence;
//! [`ValueSource`] is the tagged variant that unifies the two, with
//! out-of-range sequence access defaulting to zero so a finite sequence
//! embeds naturally into an infinite operator.

use crate::operator::InfiniteOperator;
use crate::scalar::SpectralScalar;

/// A per-index source of scalar values for one band of an operator.
///
/// Two variants, one capability: the value at index `i`. A function-backed
/// source is total; a sequence-backed source yields zero past its end.
pub enum ValueSource<T> {
    Function(Box<dyn Fn(usize) -> T>),
    Sequence(Vec<T>),
}

impl<T: SpectralScalar> ValueSource<T> {
    /// Wraps a function of the index.
    pub fn function(f: impl Fn(usize) -> T + 'static) -> Self {
        Self::Function(Box::new(f))
    }

    /// Wraps a finite sequence; indices past the end yield zero.
    pub fn sequence(values: impl Into<Vec<T>>) -> Self {
        Self::Sequence(values.into())
    }

    /// A source that yields the same value at every index.
    pub fn constant(value: T) -> Self {
        Self::function(move |_| value)
    }

    /// The value at index `i`.
    pub fn value_at(&self, i: usize) -> T {
        match self {
            Self::Function(f) => f(i),
            Self::Sequence(values) => values
                .get(i)
                .copied()
                .unwrap_or_else(|| T::from_real_impl(&0.0)),
        }
    }
}

impl<T: SpectralScalar> From<Vec<T>> for ValueSource<T> {
    fn from(values: Vec<T>) -> Self {
        Self::Sequence(values)
    }
}

impl<T: SpectralScalar> From<&[T]> for ValueSource<T> {
    fn from(values: &[T]) -> Self {
        Self::Sequence(values.to_vec())
    }
}

/// Builds the diagonal operator whose `(i, i)` element is the i-th value of
/// `values`, with zeros everywhere off the diagonal.
pub fn diagonal_operator<T: SpectralScalar>(values: ValueSource<T>) -> InfiniteOperator<T> {
    InfiniteOperator::new(move |i, j| {
        if i == j {
            values.value_at(i)
        } else {
            T::from_real_impl(&0.0)
        }
    })
}

/// Builds a tridiagonal operator from its three bands.
///
/// The element at `(i, j)` is `main(i)` on the diagonal, `upper(i)` on the
/// first superdiagonal (`j == i + 1`), `lower(j)` on the first subdiagonal
/// (`j == i - 1`), and zero elsewhere. Omitted bands default to all zeros.
pub fn tridiagonal_operator<T: SpectralScalar>(
    main: ValueSource<T>,
    upper: Option<ValueSource<T>>,
    lower: Option<ValueSource<T>>,
) -> InfiniteOperator<T> {
    let zero = || ValueSource::constant(T::from_real_impl(&0.0));
    let upper = upper.unwrap_or_else(zero);
    let lower = lower.unwrap_or_else(zero);

    InfiniteOperator::new(move |i, j| {
        if i == j {
            main.value_at(i)
        } else if j == i + 1 {
            upper.value_at(i)
        } else if j + 1 == i {
            lower.value_at(j)
        } else {
            T::from_real_impl(&0.0)
        }
    })
}
