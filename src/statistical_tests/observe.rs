//! statistical_tests::observe — optional structured progress logging.
//!
//! With the `obs_slog` feature enabled and `verbose` set on the options, the
//! orchestrator reports each variable, test block, and FDR family to a
//! non-blocking terminal logger. Without the feature every method compiles
//! to a no-op and the library never writes to the terminal.

use crate::labeled::Label;

/// Progress sink for one orchestrator run.
pub(crate) struct RunObserver {
    #[cfg(feature = "obs_slog")]
    log: Option<slog::Logger>,
}

#[cfg(feature = "obs_slog")]
fn term_logger() -> slog::Logger {
    use slog::Drain;

    let decorator = slog_term::TermDecorator::new().stderr().build();
    let drain = slog_term::FullFormat::new(decorator).build().fuse();
    let drain = slog_async::Async::new(drain).build().fuse();
    slog::Logger::root(drain, slog::o!("component" => "significance"))
}

impl RunObserver {
    #[cfg(feature = "obs_slog")]
    pub(crate) fn new(verbose: bool) -> Self {
        RunObserver { log: verbose.then(term_logger) }
    }

    #[cfg(not(feature = "obs_slog"))]
    pub(crate) fn new(_verbose: bool) -> Self {
        RunObserver {}
    }

    pub(crate) fn variable(&self, name: &str, has_case_dim: bool) {
        #[cfg(feature = "obs_slog")]
        if let Some(log) = &self.log {
            if has_case_dim {
                slog::info!(log, "testing variable"; "variable" => name);
            } else {
                slog::warn!(log, "skipping variable without case dimension"; "variable" => name);
            }
        }
        #[cfg(not(feature = "obs_slog"))]
        let _ = (name, has_case_dim);
    }

    pub(crate) fn block(&self, variable: &str, case: &str, test: &str, group: Option<&Label>, cells: usize) {
        #[cfg(feature = "obs_slog")]
        if let Some(log) = &self.log {
            let group = group.map(|g| g.to_string()).unwrap_or_else(|| "-".to_string());
            slog::debug!(log, "test block";
                "variable" => variable, "case" => case, "test" => test,
                "group" => group, "cells" => cells);
        }
        #[cfg(not(feature = "obs_slog"))]
        let _ = (variable, case, test, group, cells);
    }

    pub(crate) fn fdr(&self, variable: &str, families: usize, finite: usize) {
        #[cfg(feature = "obs_slog")]
        if let Some(log) = &self.log {
            slog::info!(log, "FDR correction";
                "variable" => variable, "families" => families, "finite_p" => finite);
        }
        #[cfg(not(feature = "obs_slog"))]
        let _ = (variable, families, finite);
    }
}
