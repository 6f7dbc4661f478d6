use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    Router,
    extract::{State, WebSocketUpgrade},
    response::IntoResponse,
    routing::{delete, get, patch, post, put},
};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

use tandem_api::harmony::Harmony;
use tandem_api::storage::Storage;
use tandem_api::{
    AppState, AppStateInner, auth, finances, itineraries, memories, messages, profiles, requests,
    summary, tasks, uploads, visions,
};
use tandem_gateway::connection;
use tandem_gateway::dispatcher::Dispatcher;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tandem=debug,tower_http=debug".into()),
        )
        .init();

    // Config
    let db_path = std::env::var("TANDEM_DB_PATH").unwrap_or_else(|_| "tandem.db".into());
    let host = std::env::var("TANDEM_HOST").unwrap_or_else(|_| "0.0.0.0".into());
    let port: u16 = std::env::var("TANDEM_PORT")
        .unwrap_or_else(|_| "4000".into())
        .parse()?;
    let data_dir = std::env::var("TANDEM_DATA_DIR").unwrap_or_else(|_| "data".into());
    let public_url =
        std::env::var("TANDEM_PUBLIC_URL").unwrap_or_else(|_| format!("http://{host}:{port}"));

    // Init database and media storage
    let db = Arc::new(tandem_db::Database::open(&PathBuf::from(&db_path))?);
    let storage = Storage::new(PathBuf::from(&data_dir), public_url).await?;
    let media_root = storage.root().clone();

    // Shared state
    let dispatcher = Dispatcher::new();
    let state: AppState = Arc::new(AppStateInner {
        db,
        dispatcher,
        storage,
        harmony: Harmony::from_env(),
    });

    // Routes
    let api_routes = Router::new()
        .route("/auth/profiles", post(auth::create))
        .route("/auth/profiles/{name}", get(auth::probe).delete(auth::reset))
        .route("/auth/login", post(auth::login))
        .route("/profiles", get(profiles::list))
        .route("/profiles/{name}", patch(profiles::update))
        .route("/messages", get(messages::list).post(messages::send))
        .route("/messages/{id}/reaction", put(messages::set_reaction))
        .route("/messages/read", post(messages::mark_read))
        .route("/tasks", get(tasks::list).post(tasks::create))
        .route("/tasks/{id}/status", put(tasks::set_status))
        .route("/tasks/{id}", delete(tasks::delete))
        .route(
            "/tasks/{id}/comments",
            get(tasks::list_comments).post(tasks::create_comment),
        )
        .route("/requests", get(requests::list).post(requests::create))
        .route("/requests/{id}/status", put(requests::set_status))
        .route("/memories", get(memories::list).post(memories::create))
        .route("/memories/{id}", delete(memories::delete))
        .route(
            "/itineraries",
            get(itineraries::list).post(itineraries::create),
        )
        .route("/itineraries/{id}", delete(itineraries::delete))
        .route("/finances", get(finances::list).post(finances::create))
        .route("/finances/{id}/amount", put(finances::set_amount))
        .route("/finances/{id}", delete(finances::delete))
        .route("/visions", get(visions::list).post(visions::create))
        .route("/visions/{id}/done", put(visions::set_done))
        .route("/visions/{id}", delete(visions::delete))
        .route("/summary", get(summary::get))
        .route("/uploads/{bucket}/{name}", post(uploads::upload))
        .route("/gateway", get(ws_upgrade))
        .with_state(state);

    let app = Router::new()
        .merge(api_routes)
        .nest_service("/media", ServeDir::new(media_root))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Tandem server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn ws_upgrade(State(state): State<AppState>, ws: WebSocketUpgrade) -> impl IntoResponse {
    ws.on_upgrade(move |socket| {
        connection::handle_connection(socket, state.dispatcher.clone(), state.db.clone())
    })
}
