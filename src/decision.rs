//! Contract for the external format-decision collaborator: a stateless
//! policy object that inspects a value's shape and recommends a
//! serialization format. It is advisory only and never calls back into
//! the codec; the codec only supplies the configuration-free metrics it
//! reads.

use crate::encode::tabular;
use crate::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatKind {
    Toon,
    Json,
    Graph,
    Hybrid,
}

/// Recommendation returned by a decision engine.
#[derive(Debug, Clone, PartialEq)]
pub struct FormatDecision {
    pub recommended_format: FormatKind,
    /// Confidence in `[0.0, 1.0]`.
    pub confidence: f64,
    pub reasoning: Vec<String>,
}

/// A swappable scoring policy. Implementations are injected by the
/// host, not bundled with the codec.
pub trait DecisionEngine {
    fn analyze(&self, value: &Value) -> FormatDecision;
}

/// Configuration-free shape metrics a decision engine reads. The
/// shared-reference count is always zero for the owned value tree; the
/// graph collaborator reports its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ValueMetrics {
    pub max_depth: usize,
    pub array_count: usize,
    pub tabular_array_count: usize,
    pub object_count: usize,
    pub scalar_count: usize,
    pub shared_reference_count: usize,
}

impl ValueMetrics {
    pub fn collect(value: &Value) -> Self {
        let mut metrics = ValueMetrics::default();
        walk(value, 0, &mut metrics);
        metrics
    }
}

fn walk(value: &Value, depth: usize, metrics: &mut ValueMetrics) {
    if depth > metrics.max_depth {
        metrics.max_depth = depth;
    }
    match value {
        Value::Array(items) => {
            metrics.array_count += 1;
            let (is_tabular, fields) = tabular::analyze(items);
            if is_tabular && !fields.is_empty() {
                metrics.tabular_array_count += 1;
            }
            for item in items {
                walk(item, depth + 1, metrics);
            }
        }
        Value::Object(map) => {
            metrics.object_count += 1;
            for child in map.values() {
                walk(child, depth + 1, metrics);
            }
        }
        _ => metrics.scalar_count += 1,
    }
}
