// Tests for the submission flow against a mocked /solve endpoint

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use wikirace_client::{SolveClient, SolveError};
use wikirace_core::diagram::DiagramRegion;
use wikirace_core::html::{HtmlDiagram, HtmlResults};
use wikirace_core::text::{TextDiagram, TextResults};
use tracing_test::traced_test;
use wikirace_core::{FormFields, Phase, SharedForm, SubmitEvent, SubmitHandler, SubmitOutcome};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_string_contains, method, path},
};

fn body(solution: &[&str], articles: u64, length: u64, time: &str) -> serde_json::Value {
    serde_json::json!({
        "solution": solution,
        "articlesChecked": articles,
        "pathLength": length,
        "timeTaken": time,
    })
}

async fn mount_ok(server: &MockServer, response: serde_json::Value) {
    Mock::given(method("POST"))
        .and(path("/solve"))
        .respond_with(ResponseTemplate::new(200).set_body_json(response))
        .mount(server)
        .await;
}

fn client_for(server: &MockServer) -> SolveClient {
    SolveClient::with_endpoint(&format!("{}/solve", server.uri())).unwrap()
}

fn html_handler(
    server: &MockServer,
    form: FormFields,
) -> SubmitHandler<FormFields, HtmlResults, HtmlDiagram> {
    SubmitHandler::new(
        client_for(server),
        form,
        HtmlResults::default(),
        HtmlDiagram::default(),
    )
}

// ============================================================================
// Successful submissions
// ============================================================================

#[tokio::test]
async fn test_success_renders_summary_and_diagram() {
    let mock_server = MockServer::start().await;
    mount_ok(&mock_server, body(&["A", "B", "C"], 42, 2, "5ms")).await;

    let handler = html_handler(&mock_server, FormFields::new("A", "C", "BFS"));
    let mut event = SubmitEvent::new();
    let outcome = handler.handle_submit(&mut event).await;

    assert!(outcome.is_rendered());
    assert!(event.default_prevented());
    assert_eq!(handler.phase(), Phase::Rendered);

    let results = handler.results().await;
    assert!(results.inner_html().contains("42"));
    assert!(results.inner_html().contains("Path Length: 2"));
    assert!(results.inner_html().contains("5ms"));

    let diagram = handler.diagram().await;
    assert_eq!(diagram.node_count(), 3);
    assert_eq!(diagram.connector_count(), 2);
}

#[tokio::test]
async fn test_single_node_solution() {
    let mock_server = MockServer::start().await;
    mount_ok(&mock_server, body(&["Same"], 1, 0, "0ms")).await;

    let handler = html_handler(&mock_server, FormFields::new("Same", "Same", "BFS"));
    handler.handle_submit(&mut SubmitEvent::new()).await;

    let diagram = handler.diagram().await;
    assert_eq!(diagram.node_count(), 1);
    assert_eq!(diagram.connector_count(), 0);
}

#[tokio::test]
async fn test_empty_solution_draws_nothing() {
    let mock_server = MockServer::start().await;
    mount_ok(&mock_server, body(&[], 10, 0, "1ms")).await;

    let handler = html_handler(&mock_server, FormFields::new("A", "Z", "BFS"));
    let outcome = handler.handle_submit(&mut SubmitEvent::new()).await;

    assert!(outcome.is_rendered());
    let diagram = handler.diagram().await;
    assert_eq!(diagram.node_count(), 0);
    assert_eq!(diagram.connector_count(), 0);
    assert_eq!(diagram.inner_html(), "");
}

#[tokio::test]
async fn test_resubmit_clears_previous_markers() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/solve"))
        .and(body_string_contains("Long"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body(
            &["Long", "B", "C", "D"],
            9,
            3,
            "3ms",
        )))
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/solve"))
        .and(body_string_contains("Short"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body(&["Short", "E"], 2, 1, "1ms")))
        .mount(&mock_server)
        .await;

    let form = SharedForm::new(FormFields::new("Long", "D", "BFS"));
    let handler = SubmitHandler::new(
        client_for(&mock_server),
        form.clone(),
        TextResults::default(),
        TextDiagram::default(),
    );

    handler.handle_submit(&mut SubmitEvent::new()).await;
    assert_eq!(handler.diagram().await.node_count(), 4);

    form.update(|f| {
        f.start = "Short".to_string();
        f.end = "E".to_string();
    });
    handler.handle_submit(&mut SubmitEvent::new()).await;

    let diagram = handler.diagram().await;
    assert_eq!(diagram.node_count(), 2);
    assert_eq!(diagram.connector_count(), 1);
    assert_eq!(diagram.markers().node_label(0), Some("Short"));
}

// ============================================================================
// Failures
// ============================================================================

#[tokio::test]
async fn test_error_status_leaves_regions_untouched() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/solve"))
        .and(body_string_contains("Good"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body(&["Good", "X"], 5, 1, "2ms")))
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/solve"))
        .and(body_string_contains("Broken"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
        .mount(&mock_server)
        .await;

    let failures = Arc::new(AtomicUsize::new(0));
    let failures_clone = failures.clone();
    let form = SharedForm::new(FormFields::new("Good", "X", "BFS"));
    let handler = SubmitHandler::new(
        client_for(&mock_server),
        form.clone(),
        HtmlResults::default(),
        HtmlDiagram::default(),
    )
    .with_failure_callback(Arc::new(move |_error: &SolveError| {
        failures_clone.fetch_add(1, Ordering::SeqCst);
    }));

    handler.handle_submit(&mut SubmitEvent::new()).await;
    let results_before = handler.results().await.inner_html().to_string();
    let diagram_before = handler.diagram().await.inner_html();

    form.update(|f| f.start = "Broken".to_string());
    let mut event = SubmitEvent::new();
    let outcome = handler.handle_submit(&mut event).await;

    match outcome {
        SubmitOutcome::Failed { error, .. } => assert!(error.is_transport()),
        other => panic!("expected failure, got {:?}", other),
    }
    assert!(event.default_prevented());
    assert_eq!(handler.phase(), Phase::Failed);
    assert_eq!(failures.load(Ordering::SeqCst), 1);
    assert_eq!(handler.results().await.inner_html(), results_before);
    assert_eq!(handler.diagram().await.inner_html(), diagram_before);
}

#[tokio::test]
#[traced_test]
async fn test_failure_is_logged_at_error_level() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/solve"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&mock_server)
        .await;

    let handler = html_handler(&mock_server, FormFields::new("A", "B", "BFS"));
    let outcome = handler.handle_submit(&mut SubmitEvent::new()).await;

    assert!(matches!(outcome, SubmitOutcome::Failed { token: 1, .. }));
    assert!(logs_contain("ERROR"));
    assert!(logs_contain("Submission 1 failed"));
}

#[tokio::test]
async fn test_unparseable_body_is_a_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/solve"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&mock_server)
        .await;

    let handler = html_handler(&mock_server, FormFields::new("A", "B", "BFS"));
    let outcome = handler.handle_submit(&mut SubmitEvent::new()).await;

    match outcome {
        SubmitOutcome::Failed { error, .. } => assert!(matches!(error, SolveError::Parse(_))),
        other => panic!("expected parse failure, got {:?}", other),
    }
    assert_eq!(handler.results().await.inner_html(), "");
    assert_eq!(handler.diagram().await.node_count(), 0);
}

#[tokio::test]
async fn test_empty_inputs_never_reach_the_network() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/solve"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body(&["A"], 1, 0, "0ms")))
        .expect(0)
        .mount(&mock_server)
        .await;

    let handler = html_handler(&mock_server, FormFields::new("  ", "B", "BFS"));
    let mut event = SubmitEvent::new();
    let outcome = handler.handle_submit(&mut event).await;

    assert!(event.default_prevented());
    match outcome {
        SubmitOutcome::Failed { error, .. } => {
            assert!(matches!(error, SolveError::Validation(_)))
        }
        other => panic!("expected validation failure, got {:?}", other),
    }
}

#[tokio::test]
async fn test_each_submission_posts_once() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/solve"))
        .and(body_string_contains("name=\"start\""))
        .and(body_string_contains("name=\"end\""))
        .and(body_string_contains("name=\"algo\""))
        .and(body_string_contains("IDS"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body(&["A", "B"], 3, 1, "1ms")))
        .expect(2)
        .mount(&mock_server)
        .await;

    let handler = html_handler(&mock_server, FormFields::new("A", "B", "IDS"));
    handler.handle_submit(&mut SubmitEvent::new()).await;
    handler.handle_submit(&mut SubmitEvent::new()).await;

    let received = mock_server.received_requests().await.unwrap();
    assert_eq!(received.len(), 2);
}

// ============================================================================
// Ordering
// ============================================================================

#[tokio::test]
async fn test_stale_response_is_discarded() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/solve"))
        .and(body_string_contains("Slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(body(&["Slow", "S1", "S2"], 100, 2, "900ms"))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/solve"))
        .and(body_string_contains("Fast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body(&["Fast", "F1"], 4, 1, "3ms")))
        .mount(&mock_server)
        .await;

    let form = SharedForm::new(FormFields::new("Slow", "S2", "BFS"));
    let handler = Arc::new(SubmitHandler::new(
        client_for(&mock_server),
        form.clone(),
        HtmlResults::default(),
        HtmlDiagram::default(),
    ));

    let slow_handler = handler.clone();
    let slow = tokio::spawn(async move {
        let mut event = SubmitEvent::new();
        slow_handler.handle_submit(&mut event).await
    });

    // Let the first request go out before the form changes
    tokio::time::sleep(Duration::from_millis(100)).await;
    form.update(|f| {
        f.start = "Fast".to_string();
        f.end = "F1".to_string();
    });

    let fast = handler.handle_submit(&mut SubmitEvent::new()).await;
    let slow = slow.await.unwrap();

    assert!(fast.is_rendered());
    assert!(matches!(slow, SubmitOutcome::Stale { token: 1 }));
    assert_eq!(fast.token(), 2);
    assert_eq!(handler.phase(), Phase::Rendered);

    let results = handler.results().await;
    assert!(results.inner_html().contains("Fast,F1"));
    assert!(!results.inner_html().contains("Slow"));

    let diagram = handler.diagram().await;
    assert_eq!(diagram.node_count(), 2);
}

#[tokio::test]
async fn test_superseded_failure_is_stale() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/solve"))
        .and(body_string_contains("Slow"))
        .respond_with(
            ResponseTemplate::new(500)
                .set_body_string("boom")
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/solve"))
        .and(body_string_contains("Fast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body(&["Fast", "F1"], 4, 1, "3ms")))
        .mount(&mock_server)
        .await;

    let failures = Arc::new(AtomicUsize::new(0));
    let failures_clone = failures.clone();
    let form = SharedForm::new(FormFields::new("Slow", "S2", "BFS"));
    let handler = Arc::new(
        SubmitHandler::new(
            client_for(&mock_server),
            form.clone(),
            HtmlResults::default(),
            HtmlDiagram::default(),
        )
        .with_failure_callback(Arc::new(move |_error: &SolveError| {
            failures_clone.fetch_add(1, Ordering::SeqCst);
        })),
    );

    let slow_handler = handler.clone();
    let slow = tokio::spawn(async move {
        let mut event = SubmitEvent::new();
        slow_handler.handle_submit(&mut event).await
    });

    tokio::time::sleep(Duration::from_millis(100)).await;
    form.update(|f| {
        f.start = "Fast".to_string();
        f.end = "F1".to_string();
    });

    let fast = handler.handle_submit(&mut SubmitEvent::new()).await;
    let slow = slow.await.unwrap();

    assert!(fast.is_rendered());
    assert!(matches!(slow, SubmitOutcome::Stale { token: 1 }));
    assert_eq!(failures.load(Ordering::SeqCst), 0);
    assert_eq!(handler.phase(), Phase::Rendered);
    assert!(handler.results().await.inner_html().contains("Fast,F1"));
}
