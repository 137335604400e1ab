//! Request/response invocation tests.
//!
//! Renderers here are small and fontless so each invocation stays quick.

use serde_json::{json, Value};

use metrics_exporter_prometheus::PrometheusBuilder;

use doc_api::{invoke, ChartResponse, ChartService};
use renderer::{ChartRenderer, ChartStyle, TextRenderer};
use test_utils::{decode_png, is_png, scenarios};

fn small_renderer() -> ChartRenderer {
    let style = ChartStyle {
        width: 480,
        height: 320,
        ..ChartStyle::default()
    };
    ChartRenderer::with_text(style, TextRenderer::without_font()).unwrap()
}

fn service() -> ChartService {
    ChartService::new(small_renderer(), 150)
}

fn error_of(resp: &ChartResponse) -> Value {
    serde_json::from_str(&resp.body).unwrap()
}

#[test]
fn test_valid_request_returns_base64_png() {
    let resp = service().invoke(scenarios::STANDARD.request());

    assert!(resp.is_success());
    assert!(resp.is_base64_encoded);
    assert_eq!(resp.headers["Content-Type"], "image/png");

    let png = resp.decode_png().unwrap();
    assert!(is_png(&png));
    assert_eq!(decode_png(&png).dimensions(), (480, 320));
}

#[test]
fn test_explicit_font_size_accepted() {
    let mut event = scenarios::OFFSET.request();
    event["font_size"] = json!(12);
    assert_eq!(service().invoke(event).status_code, 200);
}

#[test]
fn test_huge_font_size_is_400() {
    let mut event = scenarios::STANDARD.request();
    event["font_size"] = json!(20000);

    let resp = service().invoke(event);
    assert_eq!(resp.status_code, 400);
    let body = error_of(&resp);
    assert_eq!(body["error"], "InvalidParameter");
    assert!(body["message"].as_str().unwrap().contains("font_size"));
}

#[test]
fn test_missing_field_is_400() {
    let mut event = scenarios::STANDARD.request();
    event.as_object_mut().unwrap().remove("doc_value");

    let resp = service().invoke(event);
    assert_eq!(resp.status_code, 400);
    assert!(!resp.is_base64_encoded);
    assert_eq!(error_of(&resp)["error"], "InvalidRequest");
}

#[test]
fn test_wrong_type_is_400() {
    let mut event = scenarios::STANDARD.request();
    event["rop_max"] = json!("lots");
    assert_eq!(service().invoke(event).status_code, 400);
}

#[test]
fn test_zero_threshold_is_400() {
    let resp = service().invoke(scenarios::ZERO_THRESHOLD.request());
    assert_eq!(resp.status_code, 400);
    assert_eq!(error_of(&resp)["error"], "InvalidThreshold");
}

#[test]
fn test_inverted_range_is_400() {
    let resp = service().invoke(scenarios::INVERTED_RPM.request());
    assert_eq!(resp.status_code, 400);
    let body = error_of(&resp);
    assert_eq!(body["error"], "InvalidRange");
    assert!(body["message"].as_str().unwrap().contains("rpm"));
}

#[test]
fn test_boundary_outside_plot_is_500() {
    let resp = service().invoke(scenarios::MISSES_PLOT.request());
    assert_eq!(resp.status_code, 500);
    assert_eq!(error_of(&resp)["error"], "RenderingFailure");
    assert!(resp.decode_png().is_err());
}

#[test]
fn test_malformed_body_counted_as_invalid_input() {
    let recorder = PrometheusBuilder::new().build_recorder();
    let handle = recorder.handle();
    let service = service();

    let err = metrics::with_local_recorder(&recorder, || service.render_body(b"{not json")).unwrap_err();
    assert_eq!(err.error_code(), "InvalidRequest");

    let exposition = handle.render();
    assert!(
        exposition.contains("doc_chart_renders_total{outcome=\"invalid_input\"} 1"),
        "{}",
        exposition
    );
}

#[test]
fn test_free_invoke_matches_service() {
    let resp = invoke(scenarios::ZERO_THRESHOLD.request(), &small_renderer());
    assert_eq!(resp.status_code, 400);
}

#[test]
fn test_concurrent_invocations_share_renderer() {
    let service = service();
    let results = tokio_test::block_on(async {
        let handles: Vec<_> = scenarios::renderable()
            .into_iter()
            .map(|s| {
                let service = service.clone();
                tokio::task::spawn_blocking(move || service.invoke(s.request()))
            })
            .collect();

        let mut results = Vec::new();
        for handle in handles {
            results.push(handle.await.unwrap());
        }
        results
    });
    assert_eq!(results.len(), 3);
    assert!(results.iter().all(|r| r.is_success()));
}
