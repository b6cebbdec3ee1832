//! statistical_tests::significance — the significance-testing orchestrator.
//!
//! Purpose
//! -------
//! Run paired (signed-rank) and independent (rank-sum) tests over every
//! variable of a [`Dataset`], per requested case and per split group,
//! reassemble the pieces into one labeled result, and optionally apply
//! Benjamini–Hochberg correction within each (variable, case) family.
//!
//! Key behaviors
//! -------------
//! - Paired cases are tested first, then independent pairs, each in request
//!   order; every block becomes one label on the case dimension. Independent
//!   pairs are labelled `"{c1}-{c2}"`.
//! - With a split coordinate, each group is tested separately and the group
//!   label is re-attached as a singleton dimension named after the
//!   coordinate. A single group is used as-is.
//! - For independent pairs, the second case is re-indexed to the first
//!   case's test-dimension labels within each group, never sliced by
//!   position.
//! - FDR families are the labels of the case dimension within a variable;
//!   all remaining dims (space, split groups) pool into the family.
//!
//! Invariants & assumptions
//! ------------------------
//! - Result dims are `(variable, case, [split], remaining...)`, where the
//!   remaining dims keep their order in the input.
//! - Degenerate cells are NaN and never abort the run.
//! - Inputs are only read; every intermediate is a fresh value.
//!
//! Conventions
//! -----------
//! - Variables that do not carry the case dimension are skipped; if nothing
//!   at all is produced the run fails with `SigError::NoTestsProduced`.
//! - Variables may differ in their non-case dims; results are broadcast to
//!   the union of those dims before being stacked along the variable
//!   dimension.
//!
//! Downstream usage
//! ----------------
//! - Feed [`TestStats::to_stat_array`] (or the per-field arrays) into the
//!   reporting formatters in `statistical_tests::report`.

use crate::{
    labeled::{Dataset, Label, LabeledArray},
    statistical_tests::{
        errors::{SigError, SigResult},
        grouping::iter_groups,
        multitest::multitest_bh_by,
        observe::RunObserver,
        rank_tests::{TestStats, rank_sum_along, signed_rank_along},
        validation::validate_cases,
    },
};

/// A paired-test request: one case, optionally differenced against a
/// baseline case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairedSample {
    pub case: String,
    pub baseline: Option<String>,
}

impl PairedSample {
    /// Test the case's own values against a zero centre.
    pub fn new(case: &str) -> Self {
        PairedSample { case: case.to_string(), baseline: None }
    }

    /// Test `case − baseline`, aligned by test-dimension labels.
    pub fn against(case: &str, baseline: &str) -> Self {
        PairedSample { case: case.to_string(), baseline: Some(baseline.to_string()) }
    }
}

impl From<&str> for PairedSample {
    fn from(case: &str) -> Self {
        PairedSample::new(case)
    }
}

/// SignificanceOptions — configuration of one orchestrator run.
///
/// Fields
/// ------
/// - `test_dim`: dimension reduced by every test (default `"time"`).
/// - `split_dim`: optional coordinate on `test_dim` to split by.
/// - `paired_samples`: signed-rank requests.
/// - `independent_samples`: rank-sum requests `(c1, c2)`.
/// - `multitest`: apply per-(variable, case) FDR correction (default off).
/// - `case_dim` / `variable_dim`: names of the case and output variable
///   dims (defaults `"case"` / `"variable"`).
/// - `verbose`: log progress when built with `obs_slog`.
#[derive(Debug, Clone, PartialEq)]
pub struct SignificanceOptions {
    pub test_dim: String,
    pub split_dim: Option<String>,
    pub paired_samples: Vec<PairedSample>,
    pub independent_samples: Vec<(String, String)>,
    pub multitest: bool,
    pub case_dim: String,
    pub variable_dim: String,
    pub verbose: bool,
}

impl Default for SignificanceOptions {
    fn default() -> Self {
        SignificanceOptions {
            test_dim: "time".to_string(),
            split_dim: None,
            paired_samples: Vec::new(),
            independent_samples: Vec::new(),
            multitest: false,
            case_dim: "case".to_string(),
            variable_dim: "variable".to_string(),
            verbose: false,
        }
    }
}

impl SignificanceOptions {
    pub fn with_test_dim(mut self, dim: &str) -> Self {
        self.test_dim = dim.to_string();
        self
    }

    pub fn with_split_dim(mut self, dim: Option<&str>) -> Self {
        self.split_dim = dim.map(str::to_string);
        self
    }

    pub fn with_paired<P: Into<PairedSample>>(mut self, sample: P) -> Self {
        self.paired_samples.push(sample.into());
        self
    }

    pub fn with_independent(mut self, c1: &str, c2: &str) -> Self {
        self.independent_samples.push((c1.to_string(), c2.to_string()));
        self
    }

    pub fn with_multitest(mut self, on: bool) -> Self {
        self.multitest = on;
        self
    }

    pub fn with_case_dim(mut self, dim: &str) -> Self {
        self.case_dim = dim.to_string();
        self
    }

    pub fn with_variable_dim(mut self, dim: &str) -> Self {
        self.variable_dim = dim.to_string();
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    fn requested_cases(&self) -> Vec<&str> {
        let paired = self
            .paired_samples
            .iter()
            .flat_map(|p| std::iter::once(p.case.as_str()).chain(p.baseline.as_deref()));
        let independent =
            self.independent_samples.iter().flat_map(|(a, b)| [a.as_str(), b.as_str()]);
        paired.chain(independent).collect()
    }

    /// Check the options against `dataset` before any test runs.
    pub fn validate<T: Clone>(&self, dataset: &Dataset<T>) -> SigResult<()> {
        let n = self.paired_samples.len() + self.independent_samples.len();
        validate_cases(dataset, &self.case_dim, n, &self.requested_cases())
    }
}

/// Run the significance workflow with positional arguments.
///
/// Parameters
/// ----------
/// - `dataset`: variables sharing a case and a test dimension.
/// - `test_dim`: dimension along which samples are drawn.
/// - `split_dim`: optional split coordinate defined on `test_dim`.
/// - `paired_samples`: cases for the signed-rank test.
/// - `independent_samples`: case pairs for the rank-sum test.
/// - `apply_multitest`: per-(variable, case) Benjamini–Hochberg correction.
///
/// Returns
/// -------
/// [`TestStats`] with dims `(variable, case, [split], remaining...)`.
///
/// Errors
/// ------
/// See [`run_significance_with`].
pub fn run_significance(
    dataset: &Dataset, test_dim: &str, split_dim: Option<&str>, paired_samples: &[PairedSample],
    independent_samples: &[(String, String)], apply_multitest: bool,
) -> SigResult<TestStats> {
    let opts = SignificanceOptions {
        test_dim: test_dim.to_string(),
        split_dim: split_dim.map(str::to_string),
        paired_samples: paired_samples.to_vec(),
        independent_samples: independent_samples.to_vec(),
        multitest: apply_multitest,
        ..SignificanceOptions::default()
    };
    run_significance_with(dataset, &opts)
}

/// Run the significance workflow described by `opts`.
///
/// Errors
/// ------
/// - `SigError::NoCasesRequested`, `SigError::MissingCaseDimension`, or
///   `SigError::UnknownCase` from [`SignificanceOptions::validate`].
/// - `SigError::MissingSplitCoordinate` / `SigError::SplitCoordinateDims`
///   for an unusable split coordinate.
/// - `SigError::NoTestsProduced` when a split leaves no group to test (the
///   test dim is empty). The same error guards the final concatenation,
///   which validation already keeps from being empty.
///
/// Notes
/// -----
/// - Variables whose non-case dims differ are broadcast to the union of
///   their dims before concatenation along `variable_dim`, dims ordered by
///   first appearance. Dims shared by several variables must agree in
///   extent.
/// - `SigError::Labeled` for structural problems, e.g. a test dim without an
///   index when labels must be aligned, or variables whose result layouts
///   differ.
pub fn run_significance_with(dataset: &Dataset, opts: &SignificanceOptions) -> SigResult<TestStats> {
    opts.validate(dataset)?;
    let observer = RunObserver::new(opts.verbose);

    let mut results = Vec::with_capacity(dataset.len());
    for (name, array) in dataset.iter() {
        let has_case = array.has_dim(&opts.case_dim);
        observer.variable(name, has_case);
        if !has_case {
            continue;
        }
        let Some(per_case) = test_variable(name, array, opts, &observer)? else {
            continue;
        };
        results.push(per_case.expand_dims(&opts.variable_dim, Label::from(name))?);
    }

    if results.is_empty() {
        return Err(SigError::NoTestsProduced);
    }
    TestStats::concat(&TestStats::align_dims(&results)?, &opts.variable_dim)
}

/// All case blocks of one variable, concatenated along the case dim and
/// FDR-corrected per case when requested.
fn test_variable(
    name: &str, array: &LabeledArray, opts: &SignificanceOptions, observer: &RunObserver,
) -> SigResult<Option<TestStats>> {
    let case_dim = opts.case_dim.as_str();
    let test_dim = opts.test_dim.as_str();
    let split = opts.split_dim.as_deref();
    let mut blocks = Vec::new();

    for sample in &opts.paired_samples {
        let case = array.sel(case_dim, &Label::from(&sample.case))?;
        let data = match &sample.baseline {
            None => case,
            Some(b) => {
                let baseline = array.sel(case_dim, &Label::from(b))?;
                let aligned = baseline.sel_labels(test_dim, &case.index(test_dim)?)?;
                case.zip_with(&aligned, |x, y| x - y)?
            }
        };
        let mut sub = Vec::new();
        for group in iter_groups(&data, split, test_dim)? {
            let res = signed_rank_along(&group.data, test_dim)?;
            observer.block(name, &sample.case, "signed-rank", group.label.as_ref().map(|l| &l.1), res.len());
            sub.push(attach_split(res, group.label)?);
        }
        blocks.push(collapse_groups(sub, split)?.expand_dims(case_dim, Label::from(&sample.case))?);
    }

    for (c1, c2) in &opts.independent_samples {
        let first = array.sel(case_dim, &Label::from(c1))?;
        let second = array.sel(case_dim, &Label::from(c2))?;
        let label = format!("{c1}-{c2}");
        let mut sub = Vec::new();
        for group in iter_groups(&first, split, test_dim)? {
            let matched = second.sel_labels(test_dim, &group.data.index(test_dim)?)?;
            let res = rank_sum_along(&group.data, &matched, test_dim)?;
            observer.block(name, &label, "rank-sum", group.label.as_ref().map(|l| &l.1), res.len());
            sub.push(attach_split(res, group.label)?);
        }
        blocks.push(collapse_groups(sub, split)?.expand_dims(case_dim, Label::from(label))?);
    }

    if blocks.is_empty() {
        return Ok(None);
    }
    let out = TestStats::concat(&blocks, case_dim)?;
    if !opts.multitest {
        return Ok(Some(out));
    }
    let finite = out.p.data().iter().filter(|p| p.is_finite()).count();
    observer.fdr(name, blocks.len(), finite);
    let p = multitest_bh_by(&out.p, case_dim)?;
    Ok(Some(out.with_p(p)))
}

fn attach_split(res: TestStats, label: Option<(String, Label)>) -> SigResult<TestStats> {
    match label {
        None => Ok(res),
        Some((dim, value)) => res.expand_dims(&dim, value),
    }
}

/// One group is returned as is; an empty split (zero-length test dim)
/// produces no block.
fn collapse_groups(mut sub: Vec<TestStats>, split: Option<&str>) -> SigResult<TestStats> {
    match split {
        Some(dim) if sub.len() > 1 => TestStats::concat(&sub, dim),
        _ => sub.pop().ok_or(SigError::NoTestsProduced),
    }
}
