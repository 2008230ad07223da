use serde::{Deserialize, Serialize};

/// Offline evaluation result for one retrieval method
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EvaluationMetric {
    pub method: String,
    pub precision: f64,
    /// Milliseconds
    pub latency: f64,
}

impl EvaluationMetric {
    /// Key used to bind the metric to `{key}-precision` / `{key}-latency` elements
    pub fn key(&self) -> String {
        self.method.to_lowercase()
    }

    pub fn display(&self) -> EvaluationDisplay {
        EvaluationDisplay {
            key: self.key(),
            method: self.method.clone(),
            precision: format!("{:.4}", self.precision),
            latency: format!("{:.2}ms", self.latency),
        }
    }
}

/// Display strings for an evaluation metric
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct EvaluationDisplay {
    pub key: String,
    pub method: String,
    pub precision: String,
    pub latency: String,
}
