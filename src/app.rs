use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, HeaderName, StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use handlebars::Handlebars;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::net::TcpListener;

use crate::config::AppConfig;
use crate::errors::{Result, TimetableError};
use crate::semester::{SemesterField, SemesterInfo, Subject, SubjectField};
use crate::session::Session;
use crate::theme::Theme;
use crate::timetable::{DaySchedule, TIME_SLOTS};
use crate::translation::{self, Language, OpenAiGenerator, TextGenerator, UI_LABELS};

const COLOR_SCHEME_HINT: &str = "sec-ch-prefers-color-scheme";

pub struct AppState<G: TextGenerator> {
    session: Mutex<Session>,
    generator: Arc<G>,
    config: AppConfig,
    templates: Handlebars<'static>,
}

impl<G: TextGenerator> AppState<G> {
    pub fn new(config: AppConfig, generator: G) -> Result<Self> {
        let mut templates = Handlebars::new();
        templates
            .register_template_string("landing", include_str!("./templates/landing.hbs"))
            .map_err(|e| TimetableError::TemplateError(e.to_string()))?;
        templates
            .register_template_string("form", include_str!("./templates/form.hbs"))
            .map_err(|e| TimetableError::TemplateError(e.to_string()))?;

        Ok(AppState {
            session: Mutex::new(Session::new(Theme::from_preference(config.ui.prefers_dark))),
            generator: Arc::new(generator),
            config,
            templates,
        })
    }

    /// Lock the session; a poisoned lock still holds usable form data
    fn session(&self) -> MutexGuard<'_, Session> {
        self.session.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn render<T: Serialize>(&self, name: &str, data: &T) -> Response {
        match self.templates.render(name, data) {
            Ok(page) => Html(page).into_response(),
            Err(e) => error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                TimetableError::TemplateError(e.to_string()),
            ),
        }
    }
}

#[derive(Deserialize)]
struct FieldUpdate {
    field: String,
    value: String,
}

#[derive(Deserialize)]
struct LanguageSelection {
    language: String,
}

#[derive(Serialize)]
struct StatusResponse {
    status: String,
    message: Option<String>,
}

#[derive(Serialize)]
struct SubjectsResponse {
    status: String,
    subjects: Vec<Subject>,
}

#[derive(Serialize)]
struct GenerateResponse {
    status: String,
    placed: usize,
    schedule: Vec<DaySchedule>,
}

#[derive(Serialize)]
struct ThemeResponse {
    status: String,
    theme: Theme,
}

#[derive(Serialize)]
struct LanguageResponse {
    status: String,
    language: Language,
    translated: usize,
    warning: Option<String>,
}

#[derive(Serialize)]
struct StateResponse<'a> {
    session: &'a Session,
    labels: HashMap<&'a str, &'a str>,
}

#[derive(Serialize)]
struct LanguageOption {
    value: &'static str,
    selected: bool,
}

#[derive(Serialize)]
struct LandingView<'a> {
    theme: &'static str,
    title: &'a str,
}

#[derive(Serialize)]
struct FormView<'a> {
    theme: &'static str,
    theme_toggle: &'a str,
    labels: HashMap<&'a str, &'a str>,
    languages: Vec<LanguageOption>,
    info: &'a SemesterInfo,
    subjects: &'a [Subject],
    slots: &'static [&'static str],
    schedule: Option<Vec<DaySchedule>>,
}

fn ok() -> String {
    "ok".to_string()
}

fn error_response(status: StatusCode, e: TimetableError) -> Response {
    (
        status,
        Json(StatusResponse {
            status: "error".to_string(),
            message: Some(e.to_string()),
        }),
    )
        .into_response()
}

fn bad_request(message: String) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(StatusResponse {
            status: "error".to_string(),
            message: Some(message),
        }),
    )
        .into_response()
}

fn labels(session: &Session) -> HashMap<&str, &str> {
    UI_LABELS
        .iter()
        .map(|text| (*text, session.label(*text)))
        .collect()
}

/// Build the application router around `state`
pub fn router<G: TextGenerator>(state: Arc<AppState<G>>) -> Router {
    Router::new()
        .route("/", get(serve_landing::<G>))
        .route("/form", get(serve_form::<G>))
        .route("/api/state", get(get_state::<G>))
        .route("/api/semester", post(update_semester::<G>))
        .route("/api/subjects", post(append_subject::<G>))
        .route("/api/subjects/:index", post(update_subject::<G>))
        .route("/api/generate", post(generate_timetable::<G>))
        .route("/api/export", get(export_xlsx::<G>))
        .route("/api/export/csv", get(export_csv::<G>))
        .route("/api/theme/toggle", post(toggle_theme::<G>))
        .route("/api/language", post(select_language::<G>))
        .with_state(state)
}

/// Start the web server with the OpenAI-backed translator
pub async fn run(config: AppConfig) -> Result<()> {
    let generator = OpenAiGenerator::from_config(&config.translation)?;
    let bind_addr = config.server.bind_addr.clone();
    let app_state = Arc::new(AppState::new(config, generator)?);

    let app = router(app_state);

    let listener = TcpListener::bind(&bind_addr).await?;
    log::info!("Listening on http://{}", bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}

async fn serve_landing<G: TextGenerator>(
    State(state): State<Arc<AppState<G>>>,
    headers: HeaderMap,
) -> Response {
    let hint = headers
        .get(COLOR_SCHEME_HINT)
        .and_then(|v| v.to_str().ok())
        .and_then(Theme::from_color_scheme_hint);

    let mut session = state.session();
    session.resolve_theme_preference(hint);

    let view = LandingView {
        theme: session.theme.css_class(),
        title: session.label("Timetable Generator"),
    };
    let page = state.render("landing", &view);

    (
        [(HeaderName::from_static("accept-ch"), "Sec-CH-Prefers-Color-Scheme")],
        page,
    )
        .into_response()
}

async fn serve_form<G: TextGenerator>(State(state): State<Arc<AppState<G>>>) -> Response {
    let session = state.session();

    let languages: Vec<LanguageOption> = Language::ALL
        .iter()
        .map(|l| LanguageOption {
            value: l.name(),
            selected: *l == session.language,
        })
        .collect();

    let view = FormView {
        theme: session.theme.css_class(),
        theme_toggle: session.label(session.theme.toggle_label()),
        labels: labels(&session),
        languages,
        info: &session.form.info,
        subjects: &session.form.subjects,
        slots: &TIME_SLOTS,
        schedule: session.timetable.as_ref().map(|t| t.schedule()),
    };

    state.render("form", &view)
}

async fn get_state<G: TextGenerator>(State(state): State<Arc<AppState<G>>>) -> Response {
    let session = state.session();

    Json(StateResponse {
        session: &session,
        labels: labels(&session),
    })
    .into_response()
}

async fn update_semester<G: TextGenerator>(
    State(state): State<Arc<AppState<G>>>,
    Json(payload): Json<FieldUpdate>,
) -> Response {
    let Some(field) = SemesterField::from_name(&payload.field) else {
        return bad_request(format!("Unknown semester field: {}", payload.field));
    };

    state.session().form.update_field(field, &payload.value);

    Json(StatusResponse {
        status: ok(),
        message: None,
    })
    .into_response()
}

async fn append_subject<G: TextGenerator>(State(state): State<Arc<AppState<G>>>) -> Response {
    let mut session = state.session();
    session.form.append_subject();

    Json(SubjectsResponse {
        status: ok(),
        subjects: session.form.subjects.clone(),
    })
    .into_response()
}

async fn update_subject<G: TextGenerator>(
    Path(index): Path<usize>,
    State(state): State<Arc<AppState<G>>>,
    Json(payload): Json<FieldUpdate>,
) -> Response {
    let Some(field) = SubjectField::from_name(&payload.field) else {
        return bad_request(format!("Unknown subject field: {}", payload.field));
    };

    if !state
        .session()
        .form
        .update_subject_field(index, field, &payload.value)
    {
        return (
            StatusCode::NOT_FOUND,
            Json(StatusResponse {
                status: "error".to_string(),
                message: Some(format!("No subject at index {}", index)),
            }),
        )
            .into_response();
    }

    Json(StatusResponse {
        status: ok(),
        message: None,
    })
    .into_response()
}

async fn generate_timetable<G: TextGenerator>(State(state): State<Arc<AppState<G>>>) -> Response {
    let max_attempts = state.config.generator.max_attempts_per_subject;
    let mut session = state.session();

    let mut rng = rand::thread_rng();
    let timetable = session.generate_timetable(max_attempts, &mut rng);
    let placed = timetable.placed_count();
    let schedule = timetable.schedule();

    log::info!(
        "Generated timetable for {} subjects, {} cells filled",
        session.form.subjects.len(),
        placed
    );

    Json(GenerateResponse {
        status: ok(),
        placed,
        schedule,
    })
    .into_response()
}

async fn export_xlsx<G: TextGenerator>(State(state): State<Arc<AppState<G>>>) -> Response {
    let export = &state.config.export;
    let session = state.session();

    match session.export_xlsx(&export.sheet_name) {
        Ok(Some(buffer)) => {
            log::info!("Exported timetable to {} ({} bytes)", export.file_name, buffer.len());
            (
                [
                    (
                        header::CONTENT_TYPE,
                        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
                            .to_string(),
                    ),
                    (
                        header::CONTENT_DISPOSITION,
                        format!("attachment; filename=\"{}\"", export.file_name),
                    ),
                ],
                buffer,
            )
                .into_response()
        }
        Ok(None) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => {
            log::error!("Timetable export failed: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e)
        }
    }
}

async fn export_csv<G: TextGenerator>(State(state): State<Arc<AppState<G>>>) -> Response {
    let session = state.session();

    match session.export_csv() {
        Some(csv) => {
            let file_name = std::path::Path::new(&state.config.export.file_name)
                .with_extension("csv")
                .display()
                .to_string();
            (
                [
                    (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
                    (
                        header::CONTENT_DISPOSITION,
                        format!("attachment; filename=\"{}\"", file_name),
                    ),
                ],
                csv,
            )
                .into_response()
        }
        None => StatusCode::NO_CONTENT.into_response(),
    }
}

async fn toggle_theme<G: TextGenerator>(State(state): State<Arc<AppState<G>>>) -> Response {
    let theme = state.session().toggle_theme();

    Json(ThemeResponse {
        status: ok(),
        theme,
    })
    .into_response()
}

async fn select_language<G: TextGenerator>(
    State(state): State<Arc<AppState<G>>>,
    Json(payload): Json<LanguageSelection>,
) -> Response {
    let Some(language) = Language::from_name(&payload.language) else {
        return bad_request(format!("Unsupported language: {}", payload.language));
    };

    let needs_fetch = state.session().select_language(language);
    if !needs_fetch {
        return Json(LanguageResponse {
            status: ok(),
            language,
            translated: 0,
            warning: None,
        })
        .into_response();
    }

    // The session stays unlocked while the batch is in flight
    let batch = translation::translate(Arc::clone(&state.generator), language, &UI_LABELS).await;

    match batch {
        Ok(entries) => {
            let translated = entries.len();
            let applied = state.session().apply_translations(language, entries);
            if applied {
                log::info!("Translated {} labels to {}", translated, language.name());
            } else {
                log::info!("Discarded {} translation, selection changed", language.name());
            }

            Json(LanguageResponse {
                status: ok(),
                language,
                translated: if applied { translated } else { 0 },
                warning: None,
            })
            .into_response()
        }
        Err(e) => {
            log::warn!("Translation to {} failed: {}", language.name(), e);

            Json(LanguageResponse {
                status: ok(),
                language,
                translated: 0,
                warning: Some(format!(
                    "Could not translate the interface to {}, showing English labels: {}",
                    language.name(),
                    e
                )),
            })
            .into_response()
        }
    }
}
