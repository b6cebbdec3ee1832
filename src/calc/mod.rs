//! calc — supplementary calculations on labeled climate fields.
//!
//! Purpose
//! -------
//! Small analysis helpers used next to the significance workflow:
//! (weighted) Pearson correlation over one or more dims, noise masking of
//! fields and differences, and Student-t confidence half-widths.
//!
//! Conventions
//! -----------
//! - All helpers are NaN-tolerant: non-finite inputs are skipped per cell and
//!   degenerate cells come back as NaN.
//! - Argument errors are reported as
//!   [`SigError`](crate::statistical_tests::SigError), shared with the
//!   significance workflow.

pub mod correlation;
pub mod interval;
pub mod masking;

pub use self::correlation::{corr, corr_cross, corr_datasets, corr_with_dataset};
pub use self::interval::{confidence_interval, confidence_interval_by};
pub use self::masking::{DEFAULT_NOISE, diff_masked, masked};
