//! Checker configuration.

/// Switches for one checking session.
///
/// ```
/// use a68_checker::CheckerOptions;
///
/// let options = CheckerOptions::new().with_voiding_warnings(false);
/// assert!(options.insert_coercions);
/// assert!(!options.warn_on_voiding);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckerOptions {
    /// Run the coercion-insertion pass after checking.
    pub insert_coercions: bool,
    /// Widen exactly representable denotations in place instead of
    /// wrapping them in widening nodes.
    pub fold_denotations: bool,
    /// Warn when a value is computed and then voided.
    pub warn_on_voiding: bool,
}

impl Default for CheckerOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl CheckerOptions {
    pub fn new() -> Self {
        Self {
            insert_coercions: true,
            fold_denotations: true,
            warn_on_voiding: true,
        }
    }

    pub fn with_coercion_insertion(mut self, enabled: bool) -> Self {
        self.insert_coercions = enabled;
        self
    }

    pub fn with_denotation_folding(mut self, enabled: bool) -> Self {
        self.fold_denotations = enabled;
        self
    }

    pub fn with_voiding_warnings(mut self, enabled: bool) -> Self {
        self.warn_on_voiding = enabled;
        self
    }
}
