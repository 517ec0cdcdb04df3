use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock};

pub const VALIDATIONS_TOTAL: &str = "rpq_validations_total";
pub const VALIDATIONS_ACCEPTED: &str = "rpq_validations_accepted_total";
pub const VALIDATIONS_REJECTED: &str = "rpq_validations_rejected_total";
pub const LOOKUP_FAILURES: &str = "rpq_lookup_failures_total";

/// A lightweight, thread-safe counter registry that renders in Prometheus text exposition format.
pub struct MetricsRegistry {
    counters: RwLock<BTreeMap<String, Counter>>,
}

/// Monotonically increasing counter.
pub struct Counter {
    value: AtomicU64,
    help: String,
}

impl MetricsRegistry {
    pub fn new() -> Self {
        Self {
            counters: RwLock::new(BTreeMap::new()),
        }
    }

    /// Registry with the admission counters already registered.
    pub fn with_admission_counters() -> Self {
        let registry = Self::new();
        registry.register_counter(VALIDATIONS_TOTAL, "Validation requests evaluated");
        registry.register_counter(VALIDATIONS_ACCEPTED, "Validation requests accepted");
        registry.register_counter(VALIDATIONS_REJECTED, "Validation requests rejected");
        registry.register_counter(LOOKUP_FAILURES, "Project lookups that failed");
        registry
    }

    /// Register a counter. If it already exists, this is a no-op.
    pub fn register_counter(&self, name: &str, help: &str) {
        let mut counters = self.counters.write().unwrap_or_else(PoisonError::into_inner);
        counters.entry(name.to_string()).or_insert_with(|| Counter {
            value: AtomicU64::new(0),
            help: help.to_string(),
        });
    }

    /// Increment a counter by 1.
    pub fn counter_inc(&self, name: &str) {
        self.counter_add(name, 1);
    }

    /// Increment a counter by a given amount. Unknown counters are ignored.
    pub fn counter_add(&self, name: &str, val: u64) {
        let counters = self.counters.read().unwrap_or_else(PoisonError::into_inner);
        if let Some(c) = counters.get(name) {
            c.value.fetch_add(val, Ordering::Relaxed);
        }
    }

    pub fn counter_get(&self, name: &str) -> Option<u64> {
        let counters = self.counters.read().unwrap_or_else(PoisonError::into_inner);
        counters.get(name).map(|c| c.value.load(Ordering::Relaxed))
    }

    /// Render all counters in Prometheus text exposition format.
    pub fn render(&self) -> String {
        let mut output = String::new();

        let counters = self.counters.read().unwrap_or_else(PoisonError::into_inner);
        for (name, counter) in counters.iter() {
            output.push_str(&format!("# HELP {} {}\n", name, counter.help));
            output.push_str(&format!("# TYPE {} counter\n", name));
            output.push_str(&format!(
                "{} {}\n",
                name,
                counter.value.load(Ordering::Relaxed)
            ));
        }

        output
    }
}

impl Default for MetricsRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admission_counters_start_at_zero() {
        let registry = MetricsRegistry::with_admission_counters();
        for name in [
            VALIDATIONS_TOTAL,
            VALIDATIONS_ACCEPTED,
            VALIDATIONS_REJECTED,
            LOOKUP_FAILURES,
        ] {
            assert_eq!(registry.counter_get(name), Some(0), "{}", name);
        }
    }

    #[test]
    fn test_register_twice_keeps_value() {
        let registry = MetricsRegistry::new();
        registry.register_counter("c", "help");
        registry.counter_add("c", 3);
        registry.register_counter("c", "other help");
        assert_eq!(registry.counter_get("c"), Some(3));
    }

    #[test]
    fn test_unknown_counter_is_ignored() {
        let registry = MetricsRegistry::new();
        registry.counter_inc("missing");
        assert_eq!(registry.counter_get("missing"), None);
    }

    #[test]
    fn test_render() {
        let registry = MetricsRegistry::with_admission_counters();
        registry.counter_inc(VALIDATIONS_TOTAL);
        registry.counter_inc(VALIDATIONS_TOTAL);
        registry.counter_inc(VALIDATIONS_REJECTED);

        let text = registry.render();
        assert!(text.contains("# TYPE rpq_validations_total counter\n"));
        assert!(text.contains("rpq_validations_total 2\n"));
        assert!(text.contains("rpq_validations_rejected_total 1\n"));
        assert!(text.contains("rpq_lookup_failures_total 0\n"));
        assert!(text.contains("# HELP rpq_validations_accepted_total Validation requests accepted\n"));
    }
}
