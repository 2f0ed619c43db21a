//! Verbosity-gated diagnostics written to stderr.

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// # Overview
///
/// How much the induction and pruning routines report.
///
/// Levels are ordered, so `verbosity >= Verbosity::Info` enables both
/// `Info` and `Debug` output when the level is `Debug`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Verbosity {
    Silent,
    #[default]
    Warning,
    Info,
    Debug
}

/// Diagnostic channel shared by fitting and pruning.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Logger {
    verbosity: Verbosity
}

impl Logger {
    #[inline]
    pub(crate) fn new(verbosity: Verbosity) -> Self {
        Self {
            verbosity
        }
    }

    #[inline]
    pub(crate) fn enabled(&self, level: Verbosity) -> bool {
        level != Verbosity::Silent && self.verbosity >= level
    }

    pub(crate) fn warn(&self, args: fmt::Arguments<'_>) {
        if self.enabled(Verbosity::Warning) {
            eprintln!("[warn] {args}");
        }
    }

    pub(crate) fn info(&self, args: fmt::Arguments<'_>) {
        if self.enabled(Verbosity::Info) {
            eprintln!("[info] {args}");
        }
    }

    pub(crate) fn debug(&self, args: fmt::Arguments<'_>) {
        if self.enabled(Verbosity::Debug) {
            eprintln!("[debug] {args}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_are_ordered() {
        assert!(Verbosity::Debug > Verbosity::Info);
        assert!(Verbosity::Info > Verbosity::Warning);
        assert!(Verbosity::Warning > Verbosity::Silent);
    }

    #[test]
    fn silent_disables_everything() {
        let logger = Logger::new(Verbosity::Silent);
        assert!(!logger.enabled(Verbosity::Warning));
        assert!(!logger.enabled(Verbosity::Debug));
    }

    #[test]
    fn info_enables_warnings() {
        let logger = Logger::new(Verbosity::Info);
        assert!(logger.enabled(Verbosity::Warning));
        assert!(logger.enabled(Verbosity::Info));
        assert!(!logger.enabled(Verbosity::Debug));
    }
}
