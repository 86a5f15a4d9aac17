// src/registry/evaluation.rs
use std::collections::BTreeMap;

/// Outcome of one evaluation round: failing check names mapped to their
/// error detail. Produced per request, never cached.
#[derive(Debug, Clone, Default)]
pub struct Evaluation {
    failures: BTreeMap<String, String>,
}

impl Evaluation {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_failure(&mut self, name: String, detail: String) {
        self.failures.insert(name, detail);
    }

    pub fn healthy(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn failures(&self) -> &BTreeMap<String, String> {
        &self.failures
    }

    /// Stable, machine-parseable body for the HTTP response: a JSON
    /// object of failing check name to detail, `{}` when healthy.
    pub fn to_body(&self) -> String {
        serde_json::to_string(&self.failures).unwrap_or_else(|_| "{}".to_string())
    }
}
