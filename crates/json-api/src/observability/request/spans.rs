//! HTTP span helpers.

use uuid::Uuid;

#[derive(Debug, Clone)]
pub(super) struct RequestSpanName {
    pub(super) otel_path: String,
    pub(super) otel_span_name: String,
}

pub(super) fn request_span_name(method: &str, path: &str) -> RequestSpanName {
    let otel_path = route_template(path);
    let otel_span_name = format!("{method} {otel_path}");

    RequestSpanName {
        otel_path,
        otel_span_name,
    }
}

/// Replace identifiers in a request path with placeholders so spans and
/// metric labels stay low-cardinality.
fn route_template(path: &str) -> String {
    if path == "/" {
        return "/".to_owned();
    }

    let mut template = String::from("/");
    let mut previous: Option<&str> = None;

    for (index, segment) in path.trim_start_matches('/').split('/').enumerate() {
        if index > 0 {
            template.push('/');
        }

        let placeholder = if Uuid::parse_str(segment).is_ok() {
            Some("{uuid}")
        } else {
            match (index, previous) {
                (1, Some("products" | "categories")) => Some("{slug}"),
                (_, Some("session")) => Some("{session_id}"),
                _ => None,
            }
        };

        template.push_str(placeholder.unwrap_or(segment));
        previous = Some(segment);
    }

    template
}
