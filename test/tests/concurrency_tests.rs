//! Concurrent evaluation through a shared evaluator and cache.

use std::sync::Arc;
use std::thread;

use permission_expression_core::{ExpressionCache, ExpressionEvaluator};
use permission_expression_test::{admin, editor, guest, rules::RULES};

#[test]
fn test_shared_evaluator_across_threads() {
    let evaluator = ExpressionEvaluator::new();

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let evaluator = evaluator.clone();
            thread::spawn(move || {
                let ctx = match i % 3 {
                    0 => admin(),
                    1 => editor(),
                    _ => guest(),
                };
                RULES
                    .iter()
                    .map(|rule| evaluator.evaluate_str(rule.expression, &ctx).unwrap())
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let results: Vec<Vec<bool>> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    for (i, decisions) in results.iter().enumerate() {
        assert_eq!(decisions, &results[i % 3]);
    }
    assert_eq!(evaluator.cache().map(|c| c.len()), Some(RULES.len()));
}

#[test]
fn test_concurrent_compilation_publishes_one_tree() {
    let cache = Arc::new(ExpressionCache::new());
    let expression = RULES[1].expression;

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let cache = Arc::clone(&cache);
            thread::spawn(move || cache.get_or_parse(expression).unwrap())
        })
        .collect();

    let trees: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    let published = cache.get(expression).unwrap();

    assert_eq!(cache.len(), 1);
    for tree in &trees {
        // every caller sees a complete tree equal to the published one
        assert_eq!(**tree, *published);
    }
}
