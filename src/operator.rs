//! This module defines the core abstraction for infinite-dimensional operators.
//!
//! An operator on ℓ² is represented by a rule: a function that produces the
//! matrix element at row `i`, column `j` for any pair of non-negative
//! indices. Nothing is stored up front; elements are computed lazily the
//! first time they are requested and memoized thereafter, so an expensive
//! element function is evaluated at most once per position over the
//! operator's lifetime.
//!
//! The spectral solvers never touch the infinite object directly. They work
//! on finite *truncations*: the dense n×n matrix obtained by restricting the
//! operator to its first n rows and columns, materialized on demand by
//! [`InfiniteOperator::truncate`]. A truncation is an ephemeral snapshot —
//! it is not kept on the operator, and repeated truncations of the same
//! operator are cheap because they read from the shared element cache.
//!
//! The memo table uses interior mutability with no synchronization. The
//! execution model here is strictly single-threaded (see the crate docs), so
//! the operator is intentionally not `Sync`.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;

use faer::Mat;

use crate::scalar::SpectralScalar;

/// One axis of an operator's declared shape.
///
/// Operators are conceptually `(∞, ∞)`, but a declared finite extent can be
/// carried along for callers that embed finite problems in the same API.
/// The extent is descriptive only; it does not restrict which elements may
/// be requested.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Extent {
    Finite(usize),
    Infinite,
}

impl fmt::Display for Extent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Extent::Finite(n) => write!(f, "{n}"),
            Extent::Infinite => write!(f, "∞"),
        }
    }
}

/// An infinite-dimensional linear operator defined by its matrix elements.
///
/// The element function is invoked at most once per `(i, j)` pair; all later
/// accesses are served from the memo table. The operator is immutable apart
/// from cache growth.
///
/// # Type Parameters
///
/// *   `T`: The scalar type of the matrix elements. `f64` for real operators,
///     [`faer::c64`] for complex ones (the general case for spectral
///     computations, and the default of the formulation this crate
///     implements).
pub struct InfiniteOperator<T> {
    element_fn: Box<dyn Fn(usize, usize) -> T>,
    shape: (Extent, Extent),
    cache: RefCell<HashMap<(usize, usize), T>>,
}

impl<T: SpectralScalar> InfiniteOperator<T> {
    /// Creates an operator from an element function, with the default
    /// `(∞, ∞)` shape.
    pub fn new(element_fn: impl Fn(usize, usize) -> T + 'static) -> Self {
        Self::with_shape(element_fn, (Extent::Infinite, Extent::Infinite))
    }

    /// Creates an operator with an explicitly declared shape.
    pub fn with_shape(
        element_fn: impl Fn(usize, usize) -> T + 'static,
        shape: (Extent, Extent),
    ) -> Self {
        Self {
            element_fn: Box::new(element_fn),
            shape,
            cache: RefCell::new(HashMap::new()),
        }
    }

    /// Returns the matrix element at row `i`, column `j` (0-based).
    ///
    /// The element function runs on the first access to a given position;
    /// every subsequent access returns the cached value.
    pub fn element(&self, i: usize, j: usize) -> T {
        if let Some(value) = self.cache.borrow().get(&(i, j)) {
            return *value;
        }
        // The cache borrow is released before the element function runs, so
        // an element function that itself reads other elements stays legal.
        let value = (self.element_fn)(i, j);
        self.cache.borrow_mut().insert((i, j), value);
        value
    }

    /// Materializes the dense n×n truncation of the operator.
    ///
    /// Evaluates `element(i, j)` for all `i, j < n`. Elements already
    /// visited — by an earlier truncation or a direct [`element`] call —
    /// are read from the cache rather than recomputed.
    ///
    /// [`element`]: InfiniteOperator::element
    pub fn truncate(&self, n: usize) -> Mat<T> {
        Mat::from_fn(n, n, |i, j| self.element(i, j))
    }

    /// Returns the declared shape of the operator.
    pub fn shape(&self) -> (Extent, Extent) {
        self.shape
    }

    /// Number of elements currently held in the memo table.
    pub fn cached_elements(&self) -> usize {
        self.cache.borrow().len()
    }
}

impl<T> fmt::Debug for InfiniteOperator<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InfiniteOperator")
            .field("shape", &self.shape)
            .field("cached_elements", &self.cache.borrow().len())
            .finish_non_exhaustive()
    }
}
