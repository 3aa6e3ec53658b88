use once_cell::sync::Lazy;
use prometheus::{register_int_counter_vec, IntCounterVec};

pub static EVENTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "notifier_events_total",
        "Webhook events received, by object kind and processing outcome",
        &["kind", "outcome"]
    )
    .expect("notifier events total")
});

pub static DELIVERIES_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "notifier_deliveries_total",
        "Per-recipient delivery attempts, by outcome (sent, skipped, failed)",
        &["outcome"]
    )
    .expect("notifier deliveries total")
});
