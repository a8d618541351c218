use crate::{
    error::DispatchError,
    state::AppState,
    types::{DispatchResponse, RawForm},
};
use axum::{
    Form, Json, Router,
    extract::{ConnectInfo, State, rejection::FormRejection},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
};
use serde::Serialize;
use std::net::SocketAddr;
use tower_http::trace::TraceLayer;
use tracing::warn;

const INDEX_HTML: &str = include_str!("../assets/index.html");

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    uptime_seconds: u64,
}

/// `GET /` serves the page, `POST /` dispatches a form-encoded action.
///
/// Handlers read the peer address from `ConnectInfo`, so serve the router
/// with `into_make_service_with_connect_info::<SocketAddr>()`.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(page_handler).post(dispatch_handler))
        .route("/health", get(health_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn page_handler() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        uptime_seconds: state.uptime_seconds(),
    })
}

async fn dispatch_handler(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    form: Result<Form<RawForm>, FormRejection>,
) -> Response {
    let result = match form {
        Ok(Form(form)) => state.dispatcher.dispatch(peer.ip(), form).await,
        Err(rejection) => Err(DispatchError::MalformedForm(rejection.body_text())),
    };

    match result {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(error @ (DispatchError::UnknownAction(_) | DispatchError::MalformedForm(_))) => {
            warn!(client = %peer.ip(), %error, "rejected request");
            (StatusCode::BAD_REQUEST, Json(DispatchResponse::from(error))).into_response()
        }
        // Validation failures travel in a 200 body like every other error.
        Err(error) => (StatusCode::OK, Json(DispatchResponse::from(error))).into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{dispatcher::Dispatcher, session_log::SessionLogger, test_support::ScriptedCompletion};
    use axum::{
        body::{Body, to_bytes},
        extract::connect_info::MockConnectInfo,
        http::{Request, header::CONTENT_TYPE},
    };
    use deepculture_ai::ChatResult;
    use serde_json::{Value, json};
    use std::sync::Arc;
    use tower::ServiceExt;

    struct TestApp {
        app: Router,
        completion: Arc<ScriptedCompletion>,
        log_dir: tempfile::TempDir,
    }

    fn test_app(replies: Vec<ChatResult>) -> TestApp {
        let log_dir = match tempfile::tempdir() {
            Ok(dir) => dir,
            Err(error) => panic!("failed to create temp dir: {error}"),
        };
        let completion = Arc::new(ScriptedCompletion::new(replies));
        let dispatcher = Dispatcher::new(completion.clone(), SessionLogger::new(log_dir.path()));
        let app = router(AppState::new(dispatcher))
            .layer(MockConnectInfo(SocketAddr::from(([127, 0, 0, 1], 40123))));

        TestApp {
            app,
            completion,
            log_dir,
        }
    }

    fn form_request(body: &str) -> Request<Body> {
        match Request::builder()
            .method("POST")
            .uri("/")
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
        {
            Ok(request) => request,
            Err(error) => panic!("failed to build request: {error}"),
        }
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = match app.oneshot(request).await {
            Ok(response) => response,
            Err(error) => panic!("request should succeed: {error}"),
        };
        let status = response.status();
        let body = match to_bytes(response.into_body(), 1024 * 1024).await {
            Ok(body) => body,
            Err(error) => panic!("failed to read body: {error}"),
        };
        (status, body.to_vec())
    }

    fn json_body(body: &[u8]) -> Value {
        match serde_json::from_slice(body) {
            Ok(value) => value,
            Err(error) => panic!("invalid json body: {error}"),
        }
    }

    #[tokio::test]
    async fn get_serves_the_page() {
        let test = test_app(Vec::new());
        let request = match Request::builder().uri("/").body(Body::empty()) {
            Ok(request) => request,
            Err(error) => panic!("failed to build request: {error}"),
        };

        let (status, body) = send(test.app, request).await;

        assert_eq!(status, StatusCode::OK);
        let page = String::from_utf8_lossy(&body);
        assert!(page.contains("<title>Deep Culture</title>"));
        assert!(page.contains("analyze_subject"));
        assert_eq!(test.completion.calls(), 0);
    }

    #[tokio::test]
    async fn health_endpoint_reports_ok() {
        let test = test_app(Vec::new());
        let request = match Request::builder().uri("/health").body(Body::empty()) {
            Ok(request) => request,
            Err(error) => panic!("failed to build request: {error}"),
        };

        let (status, body) = send(test.app, request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json_body(&body).get("status"), Some(&json!("ok")));
    }

    #[tokio::test]
    async fn initial_question_end_to_end() {
        let test = test_app(vec![
            Ok("<p>Rome</p>".to_string()),
            Ok(r#"[{"type":"military","description":"d"}]"#.to_string()),
        ]);

        let (status, body) = send(
            test.app,
            form_request("action=initial_question&user_input=Rome"),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let value = json_body(&body);
        assert_eq!(value.get("initialResponse"), Some(&json!("<p>Rome</p>")));
        assert!(value.get("jsonFileMessage").is_some_and(Value::is_string));
        assert_eq!(
            value.get("analysesList"),
            Some(&json!([{"type": "military", "description": "d"}]))
        );
        assert!(
            value
                .get("analysesJsonFileMessage")
                .is_some_and(Value::is_string)
        );
        assert!(value.get("analysesListError").is_none());

        let written = match std::fs::read_dir(test.log_dir.path()) {
            Ok(entries) => entries
                .filter_map(|entry| entry.ok())
                .map(|entry| entry.file_name().to_string_lossy().to_string())
                .collect::<Vec<_>>(),
            Err(error) => panic!("failed to list log dir: {error}"),
        };
        assert_eq!(written.len(), 2);
        assert!(
            written
                .iter()
                .all(|name| name.contains("_127_0_0_1_"))
        );
    }

    #[tokio::test]
    async fn initial_question_reports_list_error() {
        let test = test_app(vec![
            Ok("<p>Rome</p>".to_string()),
            Ok("plain prose, no brackets".to_string()),
        ]);

        let (status, body) = send(test.app, form_request("user_input=Rome")).await;

        assert_eq!(status, StatusCode::OK);
        let value = json_body(&body);
        assert!(value.get("analysesList").is_none());
        assert!(
            value
                .get("analysesListError")
                .and_then(Value::as_str)
                .is_some_and(|error| error.contains("plain prose, no brackets"))
        );
    }

    #[tokio::test]
    async fn analyze_subject_returns_analysis() {
        let test = test_app(vec![Ok("<h2>Economy</h2>".to_string())]);

        let (status, body) = send(
            test.app,
            form_request("action=analyze_subject&analysis_type=economic&subject=Rome&index=2"),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            json_body(&body),
            json!({
                "analysisType": "economic",
                "analysisResponse": "<h2>Economy</h2>",
                "index": 2
            })
        );
    }

    #[tokio::test]
    async fn analyze_subject_with_empty_subject_makes_no_upstream_call() {
        let test = test_app(vec![Ok("unused".to_string())]);
        let completion = test.completion.clone();

        let (status, body) = send(
            test.app,
            form_request("action=analyze_subject&analysis_type=economic&subject=&index=0"),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            json_body(&body),
            json!({"error": "missing type or subject"})
        );
        assert_eq!(completion.calls(), 0);
    }

    fn assert_json_error(status: StatusCode, content_type: Option<String>, body: &[u8]) {
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(
            content_type
                .as_deref()
                .is_some_and(|value| value.starts_with("application/json")),
            "unexpected content type: {content_type:?}"
        );
        let value = json_body(body);
        assert!(
            value
                .get("error")
                .and_then(Value::as_str)
                .is_some_and(|error| error.starts_with("malformed form body: "))
        );
    }

    async fn send_with_content_type(
        app: Router,
        request: Request<Body>,
    ) -> (StatusCode, Option<String>, Vec<u8>) {
        let response = match app.oneshot(request).await {
            Ok(response) => response,
            Err(error) => panic!("request should succeed: {error}"),
        };
        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body = match to_bytes(response.into_body(), 1024 * 1024).await {
            Ok(body) => body,
            Err(error) => panic!("failed to read body: {error}"),
        };
        (status, content_type, body.to_vec())
    }

    #[tokio::test]
    async fn post_without_content_type_gets_json_error() {
        let test = test_app(Vec::new());
        let request = match Request::builder()
            .method("POST")
            .uri("/")
            .body(Body::from("action=initial_question&user_input=Rome"))
        {
            Ok(request) => request,
            Err(error) => panic!("failed to build request: {error}"),
        };

        let (status, content_type, body) = send_with_content_type(test.app, request).await;

        assert_json_error(status, content_type, &body);
        assert_eq!(test.completion.calls(), 0);
    }

    #[tokio::test]
    async fn multipart_post_gets_json_error() {
        let test = test_app(Vec::new());
        let body = "--XBOUNDARY\r\nContent-Disposition: form-data; name=\"action\"\r\n\r\ninitial_question\r\n--XBOUNDARY--\r\n";
        let request = match Request::builder()
            .method("POST")
            .uri("/")
            .header(CONTENT_TYPE, "multipart/form-data; boundary=XBOUNDARY")
            .body(Body::from(body))
        {
            Ok(request) => request,
            Err(error) => panic!("failed to build request: {error}"),
        };

        let (status, content_type, body) = send_with_content_type(test.app, request).await;

        assert_json_error(status, content_type, &body);
        assert_eq!(test.completion.calls(), 0);
    }

    #[tokio::test]
    async fn duplicate_field_gets_json_error() {
        let test = test_app(vec![Ok("unused".to_string())]);

        let (status, content_type, body) = send_with_content_type(
            test.app,
            form_request(
                "action=analyze_subject&action=analyze_subject&analysis_type=economic&subject=Rome",
            ),
        )
        .await;

        assert_json_error(status, content_type, &body);
        assert_eq!(test.completion.calls(), 0);
    }

    #[tokio::test]
    async fn unknown_action_is_a_bad_request() {
        let test = test_app(Vec::new());

        let (status, body) = send(test.app, form_request("action=shutdown")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(&body),
            json!({"error": "unknown action: shutdown"})
        );
    }
}
