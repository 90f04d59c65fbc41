use axum::extract::{Form, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

use crate::app::{AppState, Intent};
use crate::config::Settings;
use crate::date::{parse_iso_date, today, YearMonth};
use crate::error::DateError;
use crate::html;
use crate::reminders::ReminderCollection;
use crate::store::ReminderStore;
use crate::types::{default_category, View};

/// Application state shared across requests
pub struct ServerState {
    pub app: RwLock<AppState>,
    pub store: ReminderStore,
}

impl ServerState {
    pub fn new(app: AppState, store: ReminderStore) -> Self {
        Self {
            app: RwLock::new(app),
            store,
        }
    }
}

/// Start the web server
pub async fn serve(settings: Settings) -> anyhow::Result<()> {
    let store = settings.open_store()?;
    let reminders = store.load();
    info!(
        count = reminders.len(),
        backend = %settings.backend,
        data_dir = %settings.data_dir.display(),
        "Loaded reminders"
    );

    let app = AppState::new(reminders, YearMonth::current(), settings.week_start);
    let state = Arc::new(ServerState::new(app, store));

    let addr = SocketAddr::from(([127, 0, 0, 1], settings.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(url = %format!("http://{addr}"), "Server running, press Ctrl+C to stop");

    axum::serve(listener, router(state)).await?;

    Ok(())
}

pub fn router(state: Arc<ServerState>) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/select", post(select_handler))
        .route("/close", post(close_handler))
        .route("/reminders", post(add_handler))
        .route("/reminders/remove", post(remove_handler))
        .route("/month/prev", post(prev_month_handler))
        .route("/month/next", post(next_month_handler))
        .route("/view", post(view_handler))
        .route("/api/reminders", get(reminders_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Apply an intent to the shared state, saving reminders if they changed.
///
/// The write runs on the blocking pool while the state lock is held, so
/// requests see the new state only after it was handed to the store.
pub async fn dispatch(state: &Arc<ServerState>, intent: Intent) {
    let mut app = state.app.write().await;
    debug!(?intent, "Dispatching intent");
    let next = app.apply(intent);

    if next.reminders() != app.reminders() {
        let server = Arc::clone(state);
        let reminders = next.reminders().clone();
        let task = tokio::task::spawn_blocking(move || server.store.save(&reminders));

        match task.await {
            Ok(Ok(())) => info!(count = next.reminders().len(), "Reminders saved"),
            Ok(Err(e)) => warn!(error = %e, "Failed to save reminders"),
            Err(e) => warn!(error = %e, "Save task failed"),
        }
    }

    *app = next;
}

/// A form value that could not be parsed
pub struct BadRequest(String);

impl From<DateError> for BadRequest {
    fn from(e: DateError) -> Self {
        Self(e.to_string())
    }
}

impl IntoResponse for BadRequest {
    fn into_response(self) -> Response {
        (StatusCode::BAD_REQUEST, self.0).into_response()
    }
}

#[derive(Debug, Deserialize)]
pub struct DateForm {
    date: String,
}

#[derive(Debug, Deserialize)]
pub struct AddForm {
    date: String,
    icon: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ViewForm {
    view: String,
}

/// Serve the main HTML page
async fn index_handler(State(state): State<Arc<ServerState>>) -> Html<String> {
    let app = state.app.read().await;
    let markup = html::render_page(&app, today());
    Html(markup.into_string())
}

/// Return reminders as JSON
async fn reminders_handler(State(state): State<Arc<ServerState>>) -> Json<ReminderCollection> {
    let app = state.app.read().await;
    Json(app.reminders().clone())
}

async fn select_handler(
    State(state): State<Arc<ServerState>>,
    Form(form): Form<DateForm>,
) -> Result<Redirect, BadRequest> {
    let date = parse_iso_date(&form.date)?;
    dispatch(&state, Intent::SelectDate(date)).await;
    Ok(Redirect::to("/"))
}

async fn close_handler(State(state): State<Arc<ServerState>>) -> Redirect {
    dispatch(&state, Intent::CloseModal).await;
    Redirect::to("/")
}

async fn add_handler(
    State(state): State<Arc<ServerState>>,
    Form(form): Form<AddForm>,
) -> Result<Redirect, BadRequest> {
    let date = parse_iso_date(&form.date)?;
    let icon = form
        .icon
        .filter(|icon| !icon.trim().is_empty())
        .unwrap_or_else(|| default_category().icon.to_string());
    dispatch(&state, Intent::AddReminder { date, icon }).await;
    Ok(Redirect::to("/"))
}

async fn remove_handler(
    State(state): State<Arc<ServerState>>,
    Form(form): Form<DateForm>,
) -> Result<Redirect, BadRequest> {
    let date = parse_iso_date(&form.date)?;
    dispatch(&state, Intent::RemoveReminder(date)).await;
    Ok(Redirect::to("/"))
}

async fn prev_month_handler(State(state): State<Arc<ServerState>>) -> Redirect {
    dispatch(&state, Intent::PrevMonth).await;
    Redirect::to("/")
}

async fn next_month_handler(State(state): State<Arc<ServerState>>) -> Redirect {
    dispatch(&state, Intent::NextMonth).await;
    Redirect::to("/")
}

async fn view_handler(
    State(state): State<Arc<ServerState>>,
    Form(form): Form<ViewForm>,
) -> Result<Redirect, BadRequest> {
    let view: View = form.view.parse().map_err(BadRequest)?;
    dispatch(&state, Intent::ShowView(view)).await;
    Ok(Redirect::to("/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStorage;
    use axum::body::Body;
    use axum::http::{header, Request};
    use chrono::Weekday;
    use http_body_util::BodyExt;
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn test_state(store: ReminderStore) -> Arc<ServerState> {
        let app = AppState::new(
            store.load(),
            YearMonth::new(2024, 3).unwrap(),
            Weekday::Sun,
        );
        Arc::new(ServerState::new(app, store))
    }

    fn memory_state() -> Arc<ServerState> {
        test_state(ReminderStore::new(Box::new(MemoryStorage::default())))
    }

    fn post_form(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn body_string(response: Response) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_index_shows_welcome_when_empty() {
        let app = router(memory_state());
        let response = app.oneshot(get("/")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_string(response).await.contains("Agregar Recordatorios"));
    }

    #[tokio::test]
    async fn test_add_reminder_redirects_and_persists() {
        let temp_dir = TempDir::new().unwrap();
        let state = test_state(ReminderStore::json(temp_dir.path()));
        let app = router(state.clone());

        let response = app
            .clone()
            .oneshot(post_form("/reminders", "date=2024-03-15&icon=%F0%9F%A7%A0"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/");

        let response = app.oneshot(get("/api/reminders")).await.unwrap();
        assert_eq!(
            body_string(response).await,
            r#"[{"date":"2024-03-15","icon":"🧠"}]"#
        );

        let reloaded = ReminderStore::json(temp_dir.path()).load();
        assert_eq!(reloaded.len(), 1);
    }

    #[tokio::test]
    async fn test_add_without_icon_uses_default_category() {
        let state = memory_state();
        let app = router(state.clone());
        app.oneshot(post_form("/reminders", "date=2024-03-20"))
            .await
            .unwrap();
        let app_state = state.app.read().await;
        let reminder = app_state
            .reminder_on(parse_iso_date("2024-03-20").unwrap())
            .unwrap();
        assert_eq!(reminder.icon, default_category().icon);
    }

    #[tokio::test]
    async fn test_duplicate_add_keeps_first_icon() {
        let state = memory_state();
        let app = router(state.clone());
        for body in ["date=2024-03-15&icon=a", "date=2024-03-15&icon=b"] {
            app.clone().oneshot(post_form("/reminders", body)).await.unwrap();
        }
        let app_state = state.app.read().await;
        assert_eq!(app_state.reminders().len(), 1);
        assert_eq!(app_state.reminders().as_slice()[0].icon, "a");
    }

    #[tokio::test]
    async fn test_remove_reminder() {
        let state = memory_state();
        let app = router(state.clone());
        app.clone()
            .oneshot(post_form("/reminders", "date=2024-03-15&icon=a"))
            .await
            .unwrap();
        let response = app
            .oneshot(post_form("/reminders/remove", "date=2024-03-15"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert!(state.app.read().await.reminders().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_date_is_bad_request() {
        let app = router(memory_state());
        for (uri, body) in [
            ("/select", "date=2024-02-30"),
            ("/reminders", "date=tomorrow&icon=a"),
            ("/reminders/remove", "date="),
        ] {
            let response = app.clone().oneshot(post_form(uri, body)).await.unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
        }
    }

    #[tokio::test]
    async fn test_invalid_view_is_bad_request() {
        let app = router(memory_state());
        let response = app.oneshot(post_form("/view", "view=agenda")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_month_navigation() {
        let state = memory_state();
        let app = router(state.clone());
        app.clone()
            .oneshot(post_form("/month/prev", ""))
            .await
            .unwrap();
        app.clone()
            .oneshot(post_form("/month/prev", ""))
            .await
            .unwrap();
        assert_eq!(state.app.read().await.month.to_string(), "2024-01");

        app.oneshot(post_form("/month/next", "")).await.unwrap();
        assert_eq!(state.app.read().await.month.to_string(), "2024-02");
    }

    #[tokio::test]
    async fn test_select_and_close_modal() {
        let state = memory_state();
        let app = router(state.clone());
        app.clone()
            .oneshot(post_form("/view", "view=calendar"))
            .await
            .unwrap();
        app.clone()
            .oneshot(post_form("/select", "date=2024-03-20"))
            .await
            .unwrap();

        let page = body_string(app.clone().oneshot(get("/")).await.unwrap()).await;
        assert!(page.contains("Fijar Recordatorio"));
        assert!(page.contains("Miércoles, 20 de marzo de 2024"));

        app.clone().oneshot(post_form("/close", "")).await.unwrap();
        let page = body_string(app.oneshot(get("/")).await.unwrap()).await;
        assert!(!page.contains("Fijar Recordatorio"));
    }

    #[tokio::test]
    async fn test_dispatch_saves_only_on_change() {
        let temp_dir = TempDir::new().unwrap();
        let state = test_state(ReminderStore::json(temp_dir.path()));

        dispatch(&state, Intent::NextMonth).await;
        assert!(!temp_dir.path().join("reminders.json").exists());

        dispatch(
            &state,
            Intent::AddReminder {
                date: parse_iso_date("2024-04-02").unwrap(),
                icon: "💡".to_string(),
            },
        )
        .await;
        assert!(temp_dir.path().join("reminders.json").exists());
        assert_eq!(state.app.read().await.month.to_string(), "2024-04");
        assert_eq!(ReminderStore::json(temp_dir.path()).load().len(), 1);
    }

    #[tokio::test]
    async fn test_view_switches_to_list() {
        let state = memory_state();
        let app = router(state.clone());
        app.clone()
            .oneshot(post_form("/view", "view=list"))
            .await
            .unwrap();
        let page = body_string(app.oneshot(get("/")).await.unwrap()).await;
        assert!(page.contains("No tienes recordatorios"));
    }
}
