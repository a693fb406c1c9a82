//! Upstream `traceparent` handling for storefront requests.

use opentelemetry::{
    Context, global,
    propagation::{Extractor, TextMapPropagator},
    trace::TraceContextExt as _,
};
use salvo::http::{HeaderMap, HeaderName};

/// Trace context sent by the caller, if it carries a valid span.
pub(super) fn extract_parent_context(headers: &HeaderMap) -> Option<Context> {
    global::get_text_map_propagator(|propagator| remote_context(propagator, headers))
}

fn remote_context(propagator: &dyn TextMapPropagator, headers: &HeaderMap) -> Option<Context> {
    // Start from an empty context so requests without headers get a new root span.
    let context = propagator.extract_with_context(&Context::new(), &HeaderExtractor(headers));

    context.span().span_context().is_valid().then_some(context)
}

struct HeaderExtractor<'a>(&'a HeaderMap);

impl Extractor for HeaderExtractor<'_> {
    fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(|value| value.to_str().ok())
    }

    fn keys(&self) -> Vec<&str> {
        self.0.keys().map(HeaderName::as_str).collect()
    }
}

#[cfg(test)]
mod tests {
    use opentelemetry::trace::TraceId;
    use opentelemetry_sdk::propagation::TraceContextPropagator;
    use salvo::http::HeaderValue;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn valid_traceparent_becomes_the_parent() -> TestResult {
        let mut headers = HeaderMap::new();
        headers.insert(
            "traceparent",
            HeaderValue::from_static("00-4bf92f3577b34da6a3ce929d0e0e4736-00f067aa0ba902b7-01"),
        );

        let context = remote_context(&TraceContextPropagator::new(), &headers)
            .ok_or("expected a parent context")?;

        assert_eq!(
            context.span().span_context().trace_id(),
            TraceId::from_hex("4bf92f3577b34da6a3ce929d0e0e4736")?
        );
        assert!(context.span().span_context().is_remote());

        Ok(())
    }

    #[test]
    fn missing_headers_start_a_new_trace() {
        let context = remote_context(&TraceContextPropagator::new(), &HeaderMap::new());

        assert!(context.is_none());
    }

    #[test]
    fn malformed_traceparent_is_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert("traceparent", HeaderValue::from_static("00-not-a-trace-01"));

        let context = remote_context(&TraceContextPropagator::new(), &headers);

        assert!(context.is_none());
    }
}
