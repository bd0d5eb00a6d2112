mod common;

use common::{processor, spans};
use sieve_data::traces::{ResourceSpans, ScopeSpans, Span, SpanEvent, SpanKind, Status, StatusCode, TracesBatch};
use sieve_data::{Attributes, InstrumentationScope, Resource};

fn service(name: &str) -> Resource {
    Resource::new(Attributes::from_iter([("service.name", name)]))
}

#[test]
fn services_and_span_kinds() {
    let processor = processor(
        r#"
spans:
  include:
    match_type: strict
    services: [checkout]
  exclude:
    match_type: strict
    span_kinds: [SPAN_KIND_CLIENT]
"#,
    );

    let mut batch = spans(vec![
        (
            service("checkout"),
            vec![(
                "http",
                vec![
                    Span::new("POST /pay").with_kind(SpanKind::Server),
                    Span::new("GET inventory").with_kind(SpanKind::Client),
                ],
            )],
        ),
        (service("search"), vec![("http", vec![Span::new("GET /q")])]),
    ]);
    processor.filter_traces(&mut batch);

    let expected = spans(vec![(
        service("checkout"),
        vec![("http", vec![Span::new("POST /pay").with_kind(SpanKind::Server)])],
    )]);
    similar_asserts::assert_eq!(batch, expected);
}

#[test]
fn missing_service_name_matches_placeholder() {
    let processor = processor(
        r#"
spans:
  exclude:
    match_type: strict
    services: ["<nil-service-name>"]
"#,
    );

    let mut batch = spans(vec![
        (Resource::default(), vec![("lib", vec![Span::new("orphan")])]),
        (service("api"), vec![("lib", vec![Span::new("owned")])]),
    ]);
    processor.filter_traces(&mut batch);

    assert_eq!(batch.span_count(), 1);
    assert_eq!(batch.resource_spans()[0].resource(), &service("api"));
}

#[test]
fn libraries_match_name_and_version() {
    let processor = processor(
        r#"
spans:
  exclude:
    match_type: regexp
    libraries:
      - name: "^io\\.opentelemetry\\."
        version: "^1\\."
"#,
    );

    let mut batch = TracesBatch::new(vec![ResourceSpans::new(
        service("api"),
        vec![
            ScopeSpans::new(
                InstrumentationScope::new("io.opentelemetry.jdbc").with_version("1.32.0"),
                vec![Span::new("SELECT")],
            ),
            ScopeSpans::new(
                InstrumentationScope::new("io.opentelemetry.jdbc").with_version("2.0.0"),
                vec![Span::new("INSERT")],
            ),
        ],
    )]);
    processor.filter_traces(&mut batch);

    assert_eq!(batch.span_count(), 1);
    assert_eq!(batch.resource_spans()[0].scope_spans()[0].spans()[0].name(), "INSERT");
}

#[test]
fn span_and_span_event_conditions() {
    let processor = processor(
        r#"
traces:
  span:
    - 'status.code == STATUS_CODE_OK and attributes["http.route"] == "/healthz"'
  spanevent:
    - 'name == "cache.miss" and span.kind == SPAN_KIND_SERVER'
"#,
    );

    let events = || vec![SpanEvent::new("cache.miss"), SpanEvent::new("exception")];
    let mut batch = spans(vec![(
        service("api"),
        vec![(
            "http",
            vec![
                Span::new("GET /healthz")
                    .with_status(Status::new(StatusCode::Ok, ""))
                    .with_attributes(Attributes::from_iter([("http.route", "/healthz")])),
                Span::new("GET /cart")
                    .with_kind(SpanKind::Server)
                    .with_events(events()),
                Span::new("redis GET").with_kind(SpanKind::Client).with_events(events()),
            ],
        )],
    )]);
    processor.filter_traces(&mut batch);

    let expected = spans(vec![(
        service("api"),
        vec![(
            "http",
            vec![
                Span::new("GET /cart")
                    .with_kind(SpanKind::Server)
                    .with_events(vec![SpanEvent::new("exception")]),
                Span::new("redis GET").with_kind(SpanKind::Client).with_events(events()),
            ],
        )],
    )]);
    similar_asserts::assert_eq!(batch, expected);
}

#[test]
fn dropping_every_event_keeps_the_span() {
    let processor = processor("traces: {spanevent: ['true']}");

    let mut batch = spans(vec![(
        service("api"),
        vec![("http", vec![Span::new("GET /").with_events(vec![SpanEvent::new("a")])])],
    )]);
    processor.filter_traces(&mut batch);

    assert_eq!(batch.span_count(), 1);
    assert!(batch.resource_spans()[0].scope_spans()[0].spans()[0].events().is_empty());
}
