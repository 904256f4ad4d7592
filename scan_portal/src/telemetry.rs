use opentelemetry::{
    global,
    metrics::{Counter, Histogram, MeterProvider},
    KeyValue,
};
use opentelemetry_sdk::metrics::SdkMeterProvider;
use prometheus::Registry;
use scan_prediction::ScanKind;
use std::collections::HashSet;

pub struct Metrics {
    request_counter: Counter<u64>,
    prediction_counter: Counter<u64>,
    failure_counter: Counter<u64>,
    prediction_duration: Histogram<u64>,
    provider: SdkMeterProvider,
    pub registry: Registry,
}

impl Metrics {
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();
        let exporter = opentelemetry_prometheus::exporter()
            .with_registry(registry.clone())
            .build()?;

        let provider = SdkMeterProvider::builder().with_reader(exporter).build();
        let meter = provider.meter("scan_portal");

        let request_counter = meter
            .u64_counter("requests_total")
            .with_description("Total number of requests")
            .build();

        let prediction_counter = meter
            .u64_counter("predictions_total")
            .with_description("Completed predictions by scan and predicted class")
            .build();

        let failure_counter = meter
            .u64_counter("prediction_failures_total")
            .with_description("Failed predictions by scan and error code")
            .build();

        let boundaries = generate_boundaries((5, 50, 100, 500, 2000));

        let prediction_duration = meter
            .u64_histogram("prediction_duration_ms")
            .with_boundaries(boundaries)
            .with_description("Duration of prediction operations in milliseconds")
            .build();

        Ok(Metrics {
            request_counter,
            prediction_counter,
            failure_counter,
            prediction_duration,
            provider,
            registry,
        })
    }

    /// Routes the global meter (used by the HTTP metrics layer) into this
    /// registry. Call once per process.
    pub fn install_global(&self) {
        global::set_meter_provider(self.provider.clone());
    }

    pub fn record_request(&self, route: &str) {
        let attributes = vec![KeyValue::new("route", route.to_string())];
        self.request_counter.add(1, &attributes);
    }

    pub fn record_prediction(&self, scan: ScanKind, class_name: &str, duration_ms: u64) {
        let attributes = vec![
            KeyValue::new("scan", scan.as_str()),
            KeyValue::new("class", class_name.to_string()),
        ];
        self.prediction_counter.add(1, &attributes);
        self.prediction_duration
            .record(duration_ms, &[KeyValue::new("scan", scan.as_str())]);
    }

    pub fn record_failure(&self, scan: ScanKind, code: &'static str) {
        let attributes = vec![
            KeyValue::new("scan", scan.as_str()),
            KeyValue::new("code", code),
        ];
        self.failure_counter.add(1, &attributes);
    }
}

fn generate_boundaries(parts: (i32, i32, i32, i32, i32)) -> Vec<f64> {
    let first_step: usize = 5;
    let middle_step: usize = 10;
    let end_step: usize = 50;
    let tail_step: usize = 250;
    let first_part = (parts.0..=parts.1).step_by(first_step);
    let middle_part = (parts.1..=parts.2).step_by(middle_step);
    let end_part = (parts.2..=parts.3).step_by(end_step);
    let tail_part = (parts.3..=parts.4).step_by(tail_step);

    let mut seen = HashSet::new();
    first_part
        .chain(middle_part)
        .chain(end_part)
        .chain(tail_part)
        .filter(|&x| seen.insert(x))
        .map(|x| x as f64)
        .collect()
}
