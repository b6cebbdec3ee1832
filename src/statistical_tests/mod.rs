//! statistical_tests — significance testing over labeled climate fields.
//!
//! Purpose
//! -------
//! Collect the significance-testing workflow and its shared infrastructure:
//! distribution-free pairwise tests, the parametric field-significance
//! alternative, Benjamini–Hochberg correction, the orchestrator that runs
//! tests per variable, case, and split group, and the reporting formatters.
//!
//! Key behaviors
//! -------------
//! - [`wilcoxon`] / [`mannwhitneyu`] are scalar kernels; [`signed_rank_along`]
//!   / [`rank_sum_along`] broadcast them over labeled arrays and return a
//!   [`TestStats`] triple.
//! - [`run_significance`] / [`run_significance_with`] orchestrate paired and
//!   independent tests over a [`Dataset`](crate::labeled::Dataset) and apply
//!   FDR correction per (variable, case) family when requested.
//! - [`ttest_2samp`] / [`rank_test_2samp`] are separate operations with their
//!   own global FDR policy; they are never merged with the orchestrator's.
//! - [`format_stat_strings`] / [`summarize_stat_dim`] render results as
//!   annotated strings.
//!
//! Invariants & assumptions
//! ------------------------
//! - Configuration problems are reported via [`SigResult`]; degenerate data
//!   (too few finite samples) yields NaN cells and never an error.
//! - No routine in this subtree mutates its inputs.
//! - At the Python boundary, [`SigError`] is raised as `ValueError` with the
//!   `Display` message.
//!
//! Downstream usage
//! ----------------
//! - Typical Rust code imports the main surface as:
//!
//!   ```rust
//!   use rust_climstats::statistical_tests::prelude::*;
//!   ```
//!
//! Testing notes
//! -------------
//! - Each module carries unit tests for its own branches; the end-to-end
//!   scenarios live in `tests/integration_significance_pipeline.rs`.

pub mod errors;
pub mod grouping;
pub mod multitest;
pub(crate) mod observe;
pub mod ranks;
pub mod report;
pub mod significance;
pub mod ttest;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::errors::{SigError, SigResult};
pub use self::grouping::{SplitGroup, iter_groups};
pub use self::multitest::{benjamini_hochberg, multitest_bh, multitest_bh_by};
pub use self::rank_tests::{
    STAT_KEYS, TestOutcome, TestStats, mannwhitneyu, rank_sum_along, signed_rank_along, wilcoxon,
};
pub use self::report::{
    FormatOptions, encode_significance, encode_significance_array, format_general, format_pvalue,
    format_pvalue_array, format_stat_strings, format_summary, summarize_stat_dim,
};
pub use self::significance::{
    PairedSample, SignificanceOptions, run_significance, run_significance_with,
};
pub use self::ttest::{FieldSignificance, rank_test_2samp, ttest_2samp, ttest_ind, ttest_rel};

// ---- Optional convenience prelude for downstream crates -------------------

pub mod prelude {
    pub use super::errors::{SigError, SigResult};
    pub use super::report::{FormatOptions, format_stat_strings, summarize_stat_dim};
    pub use super::significance::{
        PairedSample, SignificanceOptions, run_significance, run_significance_with,
    };
    pub use super::rank_tests::TestStats;
    pub use super::ttest::{FieldSignificance, rank_test_2samp, ttest_2samp};
}
