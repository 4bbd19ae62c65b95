use axum::{
    Router,
    extract::{Json, Query, State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::{get, patch, post},
};
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::core::{Cell, DashboardView, EditError, EditorTable, Session, View};

const INDEX_HTML: &str = include_str!("../../web/index.html");
const STYLES_CSS: &str = include_str!("../../web/styles.css");
const APP_JS: &str = include_str!("../../web/app.js");

// The lock is only held for synchronous session calls.
#[derive(Clone)]
pub struct AppState {
    session: Arc<Mutex<Session>>,
}

impl AppState {
    pub fn new(session: Session) -> Self {
        Self {
            session: Arc::new(Mutex::new(session)),
        }
    }

    fn session(&self) -> MutexGuard<'_, Session> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
enum ApiView {
    #[serde(alias = "viewing")]
    Dashboard,
    #[serde(alias = "editing")]
    Editor,
}

impl From<View> for ApiView {
    fn from(value: View) -> Self {
        match value {
            View::Viewing => ApiView::Dashboard,
            View::Editing => ApiView::Editor,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct DashboardQuery {
    base: Option<String>,
    compare: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ViewPayload {
    view: ApiView,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CellPayload {
    year_label: String,
    column: String,
    value: Option<Cell>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SessionResponse {
    view: ApiView,
    editor: Option<EditorTable>,
    message: Option<String>,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/index.html", get(index_handler))
        .route("/styles.css", get(styles_handler))
        .route("/app.js", get(app_js_handler))
        .route("/api/dataset", get(dataset_handler))
        .route("/api/dashboard", get(dashboard_handler))
        .route("/api/view", post(view_handler))
        .route("/api/editor", get(editor_handler))
        .route("/api/editor/cells", patch(edit_cell_handler))
        .route("/api/editor/apply", post(apply_handler))
        .route("/api/editor/commit", post(commit_handler))
        .route("/api/reset", post(reset_handler))
        .fallback(not_found_handler)
        .with_state(state)
}

pub async fn run_http_server(host: IpAddr, port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from((host, port));
    let app = router(AppState::new(Session::new()));

    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "dashboard API listening");
    info!("local access: http://127.0.0.1:{port}/");

    axum::serve(listener, app).await
}

async fn index_handler() -> impl IntoResponse {
    with_cache_control(Html(INDEX_HTML))
}

async fn styles_handler() -> impl IntoResponse {
    with_cache_control((
        [(header::CONTENT_TYPE, "text/css; charset=utf-8")],
        STYLES_CSS,
    ))
}

async fn app_js_handler() -> impl IntoResponse {
    with_cache_control((
        [(
            header::CONTENT_TYPE,
            "application/javascript; charset=utf-8",
        )],
        APP_JS,
    ))
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Nao encontrado")
}

async fn dataset_handler(State(state): State<AppState>) -> Response {
    let dataset = state.session().dataset();
    json_response(StatusCode::OK, dataset)
}

async fn dashboard_handler(
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> Response {
    let dataset = state.session().dataset();
    let base = query
        .base
        .unwrap_or_else(|| dataset.first().year_label.clone());
    let compare = query
        .compare
        .unwrap_or_else(|| dataset.last().year_label.clone());

    match DashboardView::build(&dataset, &base, &compare) {
        Ok(view) => json_response(StatusCode::OK, view),
        Err(err) => {
            warn!(error = %err, "dashboard comparison failed");
            error_response(StatusCode::NOT_FOUND, &err.to_string())
        }
    }
}

async fn view_handler(
    State(state): State<AppState>,
    payload: Result<Json<ViewPayload>, JsonRejection>,
) -> Response {
    let Json(payload) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return rejection_response(&rejection),
    };
    let mut session = state.session();
    match payload.view {
        ApiView::Dashboard => session.close_editor(),
        ApiView::Editor => {
            session.open_editor();
        }
    }
    json_response(StatusCode::OK, session_response(&session, None))
}

async fn editor_handler(State(state): State<AppState>) -> Response {
    let mut session = state.session();
    session.open_editor();
    json_response(StatusCode::OK, session_response(&session, None))
}

async fn edit_cell_handler(
    State(state): State<AppState>,
    payload: Result<Json<CellPayload>, JsonRejection>,
) -> Response {
    let Json(payload) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return rejection_response(&rejection),
    };
    let mut session = state.session();
    match session.edit_cell(&payload.year_label, &payload.column, payload.value) {
        Ok(()) => json_response(StatusCode::OK, session_response(&session, None)),
        Err(err) => edit_error_response(&err),
    }
}

async fn apply_handler(State(state): State<AppState>) -> Response {
    let mut session = state.session();
    let outcome = session.apply();
    commit_outcome_response(&session, outcome)
}

async fn commit_handler(
    State(state): State<AppState>,
    table: Result<Json<EditorTable>, JsonRejection>,
) -> Response {
    let Json(table) = match table {
        Ok(table) => table,
        Err(rejection) => return rejection_response(&rejection),
    };
    let mut session = state.session();
    let outcome = session.commit_edit(&table);
    commit_outcome_response(&session, outcome)
}

async fn reset_handler(State(state): State<AppState>) -> Response {
    let mut session = state.session();
    session.reset();
    json_response(
        StatusCode::OK,
        session_response(&session, Some("Valores originais restaurados.")),
    )
}

fn session_response(session: &Session, message: Option<&str>) -> SessionResponse {
    SessionResponse {
        view: session.view().into(),
        editor: session.working_copy().cloned(),
        message: message.map(str::to_string),
    }
}

fn commit_outcome_response(session: &Session, outcome: Result<(), EditError>) -> Response {
    match outcome {
        Ok(()) => json_response(
            StatusCode::OK,
            session_response(
                session,
                Some("Dados atualizados. Volte ao dashboard para visualizar os graficos."),
            ),
        ),
        Err(err) => edit_error_response(&err),
    }
}

fn edit_error_response(err: &EditError) -> Response {
    error_response(StatusCode::UNPROCESSABLE_ENTITY, &err.to_string())
}

fn rejection_response(rejection: &JsonRejection) -> Response {
    warn!(error = %rejection.body_text(), "rejected request payload");
    error_response(StatusCode::BAD_REQUEST, &rejection.body_text())
}

fn with_cache_control<R: IntoResponse>(response: R) -> Response {
    let mut response = response.into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        "no-store".parse().expect("valid header"),
    );
    response
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    with_cache_control((status, Json(body)))
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}
