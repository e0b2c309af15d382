//! Compiled-expression cache.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use log::debug;

use super::ast::ExpressionNode;
use super::parser::{self, ParseError};

/// Default number of expressions kept before the cache is flushed.
pub const DEFAULT_CACHE_CAPACITY: usize = 1024;

/// Maps expression text to its parsed tree.
///
/// The cache is an ordinary value owned by whoever creates it; there is no
/// process-wide instance. Trees are built outside the lock and published
/// whole, so a reader never observes a partially built tree. Two threads
/// compiling the same text at once may both parse it; the first tree
/// inserted wins and both callers receive it.
///
/// When `capacity` entries are stored and a new one arrives, the cache is
/// cleared first.
///
/// # Example
/// ```
/// use permission_expression_core::ExpressionCache;
///
/// let cache = ExpressionCache::new();
/// let first = cache.get_or_parse("hasRole('ADMIN')").unwrap();
/// let second = cache.get_or_parse("hasRole('ADMIN')").unwrap();
///
/// assert!(std::sync::Arc::ptr_eq(&first, &second));
/// assert_eq!(cache.len(), 1);
/// ```
#[derive(Debug)]
pub struct ExpressionCache {
    entries: RwLock<HashMap<String, Arc<ExpressionNode>>>,
    capacity: usize,
}

impl Default for ExpressionCache {
    fn default() -> Self {
        Self::new()
    }
}

impl ExpressionCache {
    /// Creates an empty cache holding up to [`DEFAULT_CACHE_CAPACITY`] entries.
    pub fn new() -> Self {
        Self::with_capacity_limit(DEFAULT_CACHE_CAPACITY)
    }

    /// Creates an empty cache holding up to `capacity` entries (at least one).
    pub fn with_capacity_limit(capacity: usize) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            capacity: capacity.max(1),
        }
    }

    /// Returns the cached tree for `expression`, if any.
    pub fn get(&self, expression: &str) -> Option<Arc<ExpressionNode>> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries.get(expression).cloned()
    }

    /// Returns the cached tree for `expression`, parsing it on a miss.
    ///
    /// Parse failures are not cached.
    pub fn get_or_parse(&self, expression: &str) -> Result<Arc<ExpressionNode>, ParseError> {
        self.get_or_compile(expression, parser::parse)
    }

    /// Like [`get_or_parse`](Self::get_or_parse) with a custom compile step.
    pub fn get_or_compile<F>(
        &self,
        expression: &str,
        compile: F,
    ) -> Result<Arc<ExpressionNode>, ParseError>
    where
        F: FnOnce(&str) -> Result<ExpressionNode, ParseError>,
    {
        if let Some(node) = self.get(expression) {
            debug!("expression cache hit for '{}'", expression);
            return Ok(node);
        }

        debug!("expression cache miss for '{}'", expression);
        let node = Arc::new(compile(expression)?);

        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        if entries.len() >= self.capacity && !entries.contains_key(expression) {
            debug!("expression cache full ({} entries), clearing", entries.len());
            entries.clear();
        }
        Ok(Arc::clone(
            entries.entry(expression.to_string()).or_insert(node),
        ))
    }

    /// Number of cached expressions.
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns true if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the configured capacity.
    pub fn get_capacity(&self) -> usize {
        self.capacity
    }

    /// Drops the entry for `expression`; returns whether one existed.
    pub fn invalidate(&self, expression: &str) -> bool {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(expression)
            .is_some()
    }

    /// Drops every entry.
    pub fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}
