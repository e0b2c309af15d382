//! Expression evaluator configuration.

use super::cache::DEFAULT_CACHE_CAPACITY;

/// Configuration for an [`ExpressionEvaluator`](super::ExpressionEvaluator).
///
/// # Example
/// ```
/// use permission_expression_core::{ExpressionConfig, ExpressionEvaluator};
///
/// let evaluator = ExpressionEvaluator::with_config(
///     ExpressionConfig::new()
///         .cache_capacity(256)
///         .strict(true),
/// );
/// assert!(evaluator.config().is_strict());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpressionConfig {
    /// Whether compiled expressions are cached.
    cache_enabled: bool,
    /// Cache size before it is flushed.
    cache_capacity: usize,
    /// Whether the validator must pass before parsing.
    strict: bool,
}

impl Default for ExpressionConfig {
    fn default() -> Self {
        Self {
            cache_enabled: true,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            strict: false,
        }
    }
}

impl ExpressionConfig {
    /// Creates a new configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether compiled expressions are cached.
    pub fn cache_enabled(mut self, enabled: bool) -> Self {
        self.cache_enabled = enabled;
        self
    }

    /// Sets the cache capacity.
    pub fn cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = capacity;
        self
    }

    /// Sets strict mode: expressions the validator rejects fail to compile
    /// with every validator error attached.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Returns whether compiled expressions are cached.
    pub fn is_cache_enabled(&self) -> bool {
        self.cache_enabled
    }

    /// Returns the cache capacity.
    pub fn get_cache_capacity(&self) -> usize {
        self.cache_capacity
    }

    /// Returns whether strict mode is on.
    pub fn is_strict(&self) -> bool {
        self.strict
    }
}
