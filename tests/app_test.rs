#![cfg(feature = "web")]

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use serde_json::{Value, json};
use std::future::Future;
use std::sync::Arc;
use timetable::app::{AppState, router};
use timetable::config::AppConfig;
use timetable::errors::{Result, TimetableError};
use timetable::translation::TextGenerator;
use tower::ServiceExt;

/// Prefixes every quoted label with the language name
struct PrefixGenerator;

impl TextGenerator for PrefixGenerator {
    fn generate(&self, prompt: String) -> impl Future<Output = Result<String>> + Send {
        async move {
            let language = prompt
                .split(" to ")
                .nth(1)
                .and_then(|rest| rest.split(':').next())
                .unwrap_or_default()
                .to_string();
            let label = prompt.split('"').nth(1).unwrap_or_default().to_string();
            Ok(format!("{}:{}", language, label))
        }
    }
}

struct DownGenerator;

impl TextGenerator for DownGenerator {
    fn generate(&self, _prompt: String) -> impl Future<Output = Result<String>> + Send {
        async { Err(TimetableError::ApiError("service unavailable".to_string())) }
    }
}

/// Translates into Hindi only, every other language fails
struct HindiOnlyGenerator;

impl TextGenerator for HindiOnlyGenerator {
    fn generate(&self, prompt: String) -> impl Future<Output = Result<String>> + Send {
        async move {
            if prompt.contains(" to hindi:") {
                PrefixGenerator.generate(prompt).await
            } else {
                Err(TimetableError::ApiError("language not supported".to_string()))
            }
        }
    }
}

fn app_with<G: TextGenerator>(generator: G) -> Router {
    let state = AppState::new(AppConfig::default(), generator).unwrap();
    router(Arc::new(state))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Vec<u8>) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            request = request.header(header::CONTENT_TYPE, "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };

    let response = app.clone().oneshot(request.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, bytes.to_vec())
}

async fn send_json(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let (status, bytes) = send(app, method, uri, body).await;
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn form_edits_show_up_in_state() {
    let app = app_with(PrefixGenerator);

    let (status, _) = send_json(
        &app,
        "POST",
        "/api/semester",
        Some(json!({"field": "roomNumber", "value": "B-204"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send_json(&app, "POST", "/api/subjects", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["subjects"].as_array().unwrap().len(), 2);

    let (status, _) = send_json(
        &app,
        "POST",
        "/api/subjects/1",
        Some(json!({"field": "teacher", "value": "Dr. B"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, state) = send_json(&app, "GET", "/api/state", None).await;
    assert_eq!(state["session"]["form"]["info"]["roomNumber"], "B-204");
    assert_eq!(state["session"]["form"]["subjects"][1]["teacher"], "Dr. B");
    assert_eq!(state["session"]["form"]["subjects"][0]["teacher"], "");
    assert_eq!(state["labels"]["Day"], "Day");
}

#[tokio::test]
async fn bad_field_and_index_are_rejected() {
    let app = app_with(PrefixGenerator);

    let (status, _) = send_json(
        &app,
        "POST",
        "/api/semester",
        Some(json!({"field": "dean", "value": "x"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send_json(
        &app,
        "POST",
        "/api/subjects/9",
        Some(json!({"field": "name", "value": "Ghost"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn export_waits_for_generation() {
    let app = app_with(PrefixGenerator);

    let (status, bytes) = send(&app, "GET", "/api/export", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(bytes.is_empty());

    send_json(
        &app,
        "POST",
        "/api/subjects/0",
        Some(json!({"field": "credits", "value": "3:1:0"})),
    )
    .await;
    let (status, body) = send_json(&app, "POST", "/api/generate", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["schedule"].as_array().unwrap().len(), 6);
    let placed = body["placed"].as_u64().unwrap();
    assert!(placed >= 1 && placed <= 3);

    let (status, bytes) = send(&app, "GET", "/api/export", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(&bytes[0..2], b"PK");

    let (status, bytes) = send(&app, "GET", "/api/export/csv", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(String::from_utf8(bytes).unwrap().starts_with("Day,Time,Subject\n"));
}

#[tokio::test]
async fn language_change_translates_labels() {
    let app = app_with(PrefixGenerator);

    let (status, body) = send_json(
        &app,
        "POST",
        "/api/language",
        Some(json!({"language": "hindi"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["translated"], 16);
    assert!(body["warning"].is_null());

    let (_, state) = send_json(&app, "GET", "/api/state", None).await;
    assert_eq!(state["labels"]["Day"], "hindi:Day");
    assert_eq!(state["session"]["language"], "hindi");

    send_json(&app, "POST", "/api/language", Some(json!({"language": "english"}))).await;
    let (_, state) = send_json(&app, "GET", "/api/state", None).await;
    assert_eq!(state["labels"]["Day"], "Day");
}

#[tokio::test]
async fn failed_translation_keeps_english() {
    let app = app_with(DownGenerator);

    let (status, body) = send_json(
        &app,
        "POST",
        "/api/language",
        Some(json!({"language": "kannada"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["warning"].as_str().unwrap().contains("kannada"));

    let (_, state) = send_json(&app, "GET", "/api/state", None).await;
    assert_eq!(state["labels"]["Generate Timetable"], "Generate Timetable");

    let (status, _) = send_json(
        &app,
        "POST",
        "/api/language",
        Some(json!({"language": "klingon"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn failed_switch_does_not_keep_previous_language() {
    let app = app_with(HindiOnlyGenerator);

    let (_, body) = send_json(&app, "POST", "/api/language", Some(json!({"language": "hindi"}))).await;
    assert!(body["warning"].is_null());
    let (_, state) = send_json(&app, "GET", "/api/state", None).await;
    assert_eq!(state["labels"]["Day"], "hindi:Day");

    let (status, body) = send_json(
        &app,
        "POST",
        "/api/language",
        Some(json!({"language": "kannada"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["warning"].as_str().unwrap().contains("kannada"));

    let (_, state) = send_json(&app, "GET", "/api/state", None).await;
    assert_eq!(state["session"]["language"], "kannada");
    assert_eq!(state["labels"]["Day"], "Day");
    assert_eq!(state["labels"]["Add Subject"], "Add Subject");
}

#[tokio::test]
async fn theme_toggles_and_pages_render() {
    let app = app_with(PrefixGenerator);

    let (_, body) = send_json(&app, "POST", "/api/theme/toggle", None).await;
    assert_eq!(body["theme"], "dark");

    let (status, page) = send(&app, "GET", "/form", None).await;
    assert_eq!(status, StatusCode::OK);
    let page = String::from_utf8(page).unwrap();
    assert!(page.contains("class=\"dark\""));
    assert!(page.contains("Light Mode"));
    assert!(page.contains("Semester Details"));

    let (status, page) = send(&app, "GET", "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(String::from_utf8(page).unwrap().contains("Timetable Generator"));
}

#[tokio::test]
async fn color_scheme_hint_sets_initial_theme() {
    let app = app_with(PrefixGenerator);

    let request = Request::builder()
        .uri("/")
        .header("Sec-CH-Prefers-Color-Scheme", "\"dark\"")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.headers()["accept-ch"], "Sec-CH-Prefers-Color-Scheme");

    let (_, state) = send_json(&app, "GET", "/api/state", None).await;
    assert_eq!(state["session"]["theme"], "dark");
}
