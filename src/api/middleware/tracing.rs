//! HTTP request/response tracing middleware.

use axum::body::Body;
use axum::http::Request;
use tower_http::LatencyUnit;
use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};
use tower_http::trace::{DefaultOnResponse, TraceLayer};
use tracing::{Level, Span, field};

type MakeSpan = fn(&Request<Body>) -> Span;

/// Request tracing for the program API.
///
/// Each request gets an `INFO` span carrying the method, the path and, for
/// `/api/programs/{short_name}/...` routes, the program short name. The
/// response is logged with status and latency in milliseconds:
///
/// ```text
/// INFO request{method=DELETE path=/api/programs/PACA-CA/invitations program=PACA-CA}: finished processing request latency=2 ms status=200
/// ```
pub fn layer() -> TraceLayer<SharedClassifier<ServerErrorsAsFailures>, MakeSpan> {
    TraceLayer::new_for_http()
        .make_span_with(make_span as MakeSpan)
        .on_response(
            DefaultOnResponse::new()
                .level(Level::INFO)
                .latency_unit(LatencyUnit::Millis),
        )
}

fn make_span(request: &Request<Body>) -> Span {
    let path = request.uri().path();
    let span = tracing::info_span!(
        "request",
        method = %request.method(),
        path,
        program = field::Empty,
    );
    if let Some(short_name) = program_of(path) {
        span.record("program", short_name);
    }
    span
}

fn program_of(path: &str) -> Option<&str> {
    path.strip_prefix("/api/programs/")?
        .split('/')
        .next()
        .filter(|segment| !segment.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, http::StatusCode, routing::get};
    use tower::ServiceExt;

    #[test]
    fn test_program_of() {
        assert_eq!(program_of("/api/programs/PACA-CA"), Some("PACA-CA"));
        assert_eq!(program_of("/api/programs/PACA-CA/invitations/3/accept"), Some("PACA-CA"));
        assert_eq!(program_of("/api/programs/"), None);
        assert_eq!(program_of("/api/programs"), None);
        assert_eq!(program_of("/api/taxonomy/cancers"), None);
    }

    #[tokio::test]
    async fn test_layer_passes_requests_through() {
        let app = Router::new()
            .route("/api/programs/{short_name}", get(|| async { "ok" }))
            .layer(layer());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/programs/PACA-CA")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
