//! statistical_tests::report — significance stars and summary strings.
//!
//! Purpose
//! -------
//! Turn (statistic, p, effect size) results into the text shown in tables
//! and figure annotations: significance stars, p-value labels, and combined
//! summary strings such as
//! `"** (statistic = 12, P = 0.012, effect size = -0.61)"`.
//!
//! Key behaviors
//! -------------
//! - Stars: `p < 0.01 → "***"`, `p < 0.05 → "**"`, `p < 0.10 → "*"`,
//!   otherwise `""`; missing p gives the caller's placeholder.
//! - p labels: `"P < 0.001"` below 0.001, else `"P = {p:.3}"`.
//! - Numbers in summaries use general formatting with a configurable count
//!   of significant digits ([`format_general`]).
//! - A summary is replaced by the placeholder when the statistic, the p
//!   label, or the effect size is missing; configured `blank_cases` are
//!   blanked after formatting.
//!
//! Conventions
//! -----------
//! - Formatter inputs carry a stat dimension whose index holds the keys of
//!   the three fields; outputs drop that dimension and keep the other dims
//!   in input order.

use crate::{
    labeled::{Dataset, Label, LabeledArray, LabeledError},
    statistical_tests::{
        errors::{SigError, SigResult},
        rank_tests::STAT_KEYS,
        validation::validate_digits,
    },
};

/// Star code for one p-value.
pub fn encode_significance(p: f64, nan_label: &str) -> String {
    if !p.is_finite() {
        return nan_label.to_string();
    }
    let stars = if p < 0.01 {
        "***"
    } else if p < 0.05 {
        "**"
    } else if p < 0.10 {
        "*"
    } else {
        ""
    };
    stars.to_string()
}

/// Star codes for every cell of `p`.
pub fn encode_significance_array(p: &LabeledArray, nan_label: &str) -> LabeledArray<String> {
    p.map(|&v| encode_significance(v, nan_label))
}

/// Display label for one p-value.
pub fn format_pvalue(p: f64, nan_label: &str) -> String {
    if p.is_nan() {
        nan_label.to_string()
    } else if p < 0.001 {
        "P < 0.001".to_string()
    } else {
        format!("P = {p:.3}")
    }
}

/// Display labels for every cell of `p`.
pub fn format_pvalue_array(p: &LabeledArray, nan_label: &str) -> LabeledArray<String> {
    p.map(|&v| format_pvalue(v, nan_label))
}

fn strip_trailing_zeros(s: &str) -> &str {
    if s.contains('.') { s.trim_end_matches('0').trim_end_matches('.') } else { s }
}

/// General number formatting with `sig` significant digits.
///
/// Notes
/// -----
/// - Scientific notation (`1.5e+02`, two-digit exponent minimum) is used
///   when the rounded decimal exponent is below −4 or at least `sig`; fixed
///   notation otherwise. Trailing zeros are removed in both forms.
/// - `sig = 0` is treated as 1.
pub fn format_general(x: f64, sig: usize) -> String {
    if x.is_nan() {
        return "nan".to_string();
    }
    if x.is_infinite() {
        return if x > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    if x == 0.0 {
        return if x.is_sign_negative() { "-0" } else { "0" }.to_string();
    }
    let sig = sig.max(1);
    let sci = format!("{:.*e}", sig - 1, x);
    let Some((mantissa, exp)) = sci.split_once('e') else {
        return sci;
    };
    let Ok(exp) = exp.parse::<i32>() else {
        return sci;
    };
    if exp < -4 || exp >= sig as i32 {
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{}e{sign}{:02}", strip_trailing_zeros(mantissa), exp.abs())
    } else {
        let decimals = (sig as i32 - 1 - exp).max(0) as usize;
        strip_trailing_zeros(&format!("{x:.decimals$}")).to_string()
    }
}

/// FormatOptions — layout and display settings of the summary formatters.
///
/// Defaults
/// --------
/// `stat_dim "stat"`, keys `"statistic"` / `"p"` / `"effect_size"`,
/// `stat_digits 4`, `eff_digits 2`, `nan_label ""`, `case_dim "case"`,
/// no blanked cases.
#[derive(Debug, Clone, PartialEq)]
pub struct FormatOptions {
    pub stat_dim: String,
    pub stat_key: String,
    pub p_key: String,
    pub eff_key: String,
    pub stat_digits: usize,
    pub eff_digits: usize,
    pub nan_label: String,
    pub case_dim: String,
    pub blank_cases: Vec<String>,
}

impl Default for FormatOptions {
    fn default() -> Self {
        FormatOptions {
            stat_dim: "stat".to_string(),
            stat_key: STAT_KEYS[0].to_string(),
            p_key: STAT_KEYS[1].to_string(),
            eff_key: STAT_KEYS[2].to_string(),
            stat_digits: 4,
            eff_digits: 2,
            nan_label: String::new(),
            case_dim: "case".to_string(),
            blank_cases: Vec::new(),
        }
    }
}

impl FormatOptions {
    pub fn with_stat_dim(mut self, dim: &str) -> Self {
        self.stat_dim = dim.to_string();
        self
    }

    pub fn with_keys(mut self, stat_key: &str, p_key: &str, eff_key: &str) -> Self {
        self.stat_key = stat_key.to_string();
        self.p_key = p_key.to_string();
        self.eff_key = eff_key.to_string();
        self
    }

    pub fn with_digits(mut self, stat_digits: usize, eff_digits: usize) -> Self {
        self.stat_digits = stat_digits;
        self.eff_digits = eff_digits;
        self
    }

    pub fn with_nan_label(mut self, label: &str) -> Self {
        self.nan_label = label.to_string();
        self
    }

    pub fn with_case_dim(mut self, dim: &str) -> Self {
        self.case_dim = dim.to_string();
        self
    }

    pub fn with_blank_cases<I, S>(mut self, cases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.blank_cases = cases.into_iter().map(Into::into).collect();
        self
    }

    /// Errors
    /// ------
    /// - `SigError::InvalidDigits` when either digit count is zero.
    pub fn validate(&self) -> SigResult<()> {
        validate_digits(self.stat_digits)?;
        validate_digits(self.eff_digits)
    }
}

/// One summary string from its parts.
pub fn format_summary(stat: f64, p: f64, eff: f64, opts: &FormatOptions) -> String {
    let ptxt = format_pvalue(p, &opts.nan_label);
    if stat.is_nan() || ptxt == opts.nan_label || eff.is_nan() {
        return opts.nan_label.clone();
    }
    let stars = encode_significance(p, "");
    let prefix = if stars.is_empty() { String::new() } else { format!("{stars} ") };
    format!(
        "{prefix}(statistic = {}, {ptxt}, effect size = {})",
        format_general(stat, opts.stat_digits),
        format_general(eff, opts.eff_digits)
    )
}

fn select_key(stats: &LabeledArray, dim: &str, key: &str) -> SigResult<LabeledArray> {
    stats.sel(dim, &Label::from(key)).map_err(|e| match e {
        LabeledError::UnknownLabel { .. } => SigError::MissingStatKey { key: key.to_string() },
        other => SigError::Labeled(other),
    })
}

/// Summary strings for an array with a stat dimension.
///
/// Errors
/// ------
/// - `SigError::InvalidDigits` for zero digit counts.
/// - `SigError::MissingStatDimension` when `opts.stat_dim` is absent.
/// - `SigError::MissingStatKey` when a key is not on the stat index.
pub fn format_stat_strings(stats: &LabeledArray, opts: &FormatOptions) -> SigResult<LabeledArray<String>> {
    opts.validate()?;
    if !stats.has_dim(&opts.stat_dim) {
        return Err(SigError::MissingStatDimension { variable: None, dim: opts.stat_dim.clone() });
    }
    let stat = select_key(stats, &opts.stat_dim, &opts.stat_key)?;
    let p = select_key(stats, &opts.stat_dim, &opts.p_key)?;
    let eff = select_key(stats, &opts.stat_dim, &opts.eff_key)?;

    let pairs = stat.zip_with(&eff, |&s, &e| (s, e))?;
    let strings = pairs.zip_with(&p, |&(s, e), &pv| format_summary(s, pv, e, opts))?;

    if opts.blank_cases.is_empty() || !strings.has_dim(&opts.case_dim) {
        return Ok(strings);
    }
    let blank = |l: &Label| opts.blank_cases.iter().any(|c| *c == l.to_string());
    Ok(strings.fill_where_label(&opts.case_dim, blank, opts.nan_label.clone())?)
}

/// [`format_stat_strings`] applied to every variable of a dataset.
///
/// Errors
/// ------
/// - `SigError::MissingStatDimension` naming the first variable without the
///   stat dimension.
pub fn summarize_stat_dim(dataset: &Dataset, opts: &FormatOptions) -> SigResult<Dataset<String>> {
    let mut out = Dataset::new();
    for (name, array) in dataset.iter() {
        if !array.has_dim(&opts.stat_dim) {
            return Err(SigError::MissingStatDimension {
                variable: Some(name.to_string()),
                dim: opts.stat_dim.clone(),
            });
        }
        out.insert(name, format_stat_strings(array, opts)?);
    }
    Ok(out)
}
