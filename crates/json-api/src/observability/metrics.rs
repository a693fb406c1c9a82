//! Prometheus metrics for the HTTP surface and the shop itself.

use std::sync::OnceLock;

use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder, core::Collector,
};
use rigenerato_app::domain::webhooks::WebhookOutcome;
use salvo::{
    Response, handler,
    http::{StatusCode, header::CONTENT_TYPE},
};
use thiserror::Error;
use tracing::error;

const LATENCY_BUCKETS: [f64; 11] = [
    0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
];

#[derive(Debug, Error)]
enum MetricsError {
    #[error("metrics registry is unavailable")]
    Unavailable,

    #[error("failed to encode metrics: {0}")]
    Encode(#[from] prometheus::Error),

    #[error("encoded metrics are not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

#[derive(Debug)]
struct HttpMetrics {
    requests: IntCounterVec,
    latency: HistogramVec,
    in_flight: IntGauge,
}

#[derive(Debug)]
struct ShopMetrics {
    orders_created: IntCounter,
    webhook_deliveries: IntCounterVec,
}

#[derive(Debug)]
struct Metrics {
    registry: Registry,
    http: HttpMetrics,
    shop: ShopMetrics,
}

static METRICS: OnceLock<Option<Metrics>> = OnceLock::new();

fn metrics() -> Option<&'static Metrics> {
    METRICS
        .get_or_init(|| {
            Metrics::build()
                .inspect_err(|source| error!("failed to build metrics registry: {source}"))
                .ok()
        })
        .as_ref()
}

impl Metrics {
    fn build() -> Result<Self, prometheus::Error> {
        let registry = Registry::new_custom(Some("rigenerato".to_string()), None)?;

        let http = HttpMetrics {
            requests: registered(
                &registry,
                IntCounterVec::new(
                    Opts::new("http_requests_total", "HTTP requests by route and status."),
                    &["method", "route", "status_class", "status_code"],
                )?,
            )?,
            latency: registered(
                &registry,
                HistogramVec::new(
                    HistogramOpts::new(
                        "http_request_duration_seconds",
                        "HTTP request latency by route.",
                    )
                    .buckets(LATENCY_BUCKETS.to_vec()),
                    &["method", "route"],
                )?,
            )?,
            in_flight: registered(
                &registry,
                IntGauge::new("http_requests_in_flight", "HTTP requests being served.")?,
            )?,
        };

        let shop = ShopMetrics {
            orders_created: registered(
                &registry,
                IntCounter::new("orders_created_total", "Orders created from paid sessions.")?,
            )?,
            webhook_deliveries: registered(
                &registry,
                IntCounterVec::new(
                    Opts::new("webhook_deliveries_total", "Payment webhooks by outcome."),
                    &["outcome"],
                )?,
            )?,
        };

        Ok(Self {
            registry,
            http,
            shop,
        })
    }

    fn render(&self) -> Result<(String, String), MetricsError> {
        let encoder = TextEncoder::new();
        let mut body = Vec::new();

        encoder.encode(&self.registry.gather(), &mut body)?;

        Ok((encoder.format_type().to_string(), String::from_utf8(body)?))
    }
}

fn registered<C>(registry: &Registry, collector: C) -> Result<C, prometheus::Error>
where
    C: Collector + Clone + 'static,
{
    registry.register(Box::new(collector.clone()))?;

    Ok(collector)
}

/// Keeps the in-flight gauge raised for as long as it lives.
#[derive(Debug)]
pub(super) struct InFlightRequestGuard(Option<&'static IntGauge>);

impl InFlightRequestGuard {
    pub(super) fn track() -> Self {
        let gauge = metrics().map(|metrics| &metrics.http.in_flight);

        if let Some(gauge) = gauge {
            gauge.inc();
        }

        Self(gauge)
    }
}

impl Drop for InFlightRequestGuard {
    fn drop(&mut self) {
        if let Some(gauge) = self.0 {
            gauge.dec();
        }
    }
}

pub(super) fn observe_request(method: &str, route: &str, status_code: u16, duration_seconds: f64) {
    let Some(Metrics { http, .. }) = metrics() else {
        return;
    };

    let code = status_code.to_string();

    http.requests
        .with_label_values(&[method, route, status_class(status_code), code.as_str()])
        .inc();
    http.latency
        .with_label_values(&[method, route])
        .observe(duration_seconds);
}

/// Count a handled payment webhook delivery.
pub(crate) fn record_webhook_outcome(outcome: &WebhookOutcome) {
    let Some(Metrics { shop, .. }) = metrics() else {
        return;
    };

    let label = match outcome {
        WebhookOutcome::InvalidSignature => "invalid_signature",
        WebhookOutcome::InvalidPayload => "invalid_payload",
        WebhookOutcome::Created(_) => {
            shop.orders_created.inc();
            "created"
        }
        WebhookOutcome::Duplicate(_) => "duplicate",
        WebhookOutcome::Ignored => "ignored",
    };

    shop.webhook_deliveries.with_label_values(&[label]).inc();
}

/// Prometheus text exposition.
#[handler]
pub(crate) async fn metrics_handler(res: &mut Response) {
    let rendered = metrics().ok_or(MetricsError::Unavailable).and_then(Metrics::render);

    match rendered {
        Ok((content_type, body)) => {
            if let Err(source) = res.add_header(CONTENT_TYPE, content_type, true) {
                error!("failed to set metrics content type: {source}");
            }

            res.render(body);
        }
        Err(source) => {
            error!("failed to render metrics: {source}");
            res.status_code(StatusCode::INTERNAL_SERVER_ERROR);
        }
    }
}

fn status_class(status_code: u16) -> &'static str {
    match status_code {
        100..=199 => "1xx",
        200..=299 => "2xx",
        300..=399 => "3xx",
        400..=499 => "4xx",
        500..=599 => "5xx",
        _ => "other",
    }
}

#[cfg(test)]
mod tests {
    use salvo::{
        Router, Service,
        test::{ResponseExt, TestClient},
    };
    use testresult::TestResult;

    use super::*;

    #[tokio::test]
    async fn metrics_endpoint_exposes_http_and_shop_metrics() -> TestResult {
        observe_request("GET", "/products", 200, 0.042);
        observe_request("POST", "/webhooks/payments", 400, 0.003);
        record_webhook_outcome(&WebhookOutcome::InvalidSignature);
        record_webhook_outcome(&WebhookOutcome::Ignored);

        let service = Service::new(Router::with_path("metrics").get(metrics_handler));

        let body = TestClient::get("http://example.com/metrics")
            .send(&service)
            .await
            .take_string()
            .await?;

        for name in [
            "rigenerato_http_requests_total",
            "rigenerato_http_request_duration_seconds",
            "rigenerato_http_requests_in_flight",
            "rigenerato_orders_created_total",
            "rigenerato_webhook_deliveries_total",
        ] {
            assert!(body.contains(name), "expected {name} in exposition");
        }

        assert!(
            body.contains("outcome=\"invalid_signature\""),
            "expected webhook outcome label"
        );

        Ok(())
    }

    #[test]
    fn status_codes_are_grouped_by_class() {
        assert_eq!(status_class(201), "2xx");
        assert_eq!(status_class(403), "4xx");
        assert_eq!(status_class(503), "5xx");
        assert_eq!(status_class(42), "other");
    }
}
