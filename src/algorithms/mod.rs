//! Low-level building blocks of the shifted QR iteration.
//!
//! ** NOTE: We recommend using the high-level API in [`crate::solvers`]
//! instead. This module is intended for use cases where fine-grained control
//! over the iteration is required — inspecting the iterate matrix, driving
//! individual steps, or experimenting with shift strategies.

pub mod qr;

pub use qr::{max_off_diagonal, qr_iterate, qr_step, select_shift, QrIterationOutput};
