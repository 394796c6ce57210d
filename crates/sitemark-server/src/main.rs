//! SiteMark Document Server
//!
//! HTTP document store for markup documents, backed by a [`FileStore`].
//!
//! ## Routes
//!
//! ```text
//! POST   /api/markups          create a document from a draft
//! GET    /api/markups          list summaries (?location=&site=&search=&page=&limit=)
//! GET    /api/markups/{id}     fetch one document
//! PUT    /api/markups/{id}     replace a document
//! DELETE /api/markups/{id}     delete a document
//! GET    /health
//! ```
//!
//! ## Environment
//!
//! - `SITEMARK_ADDR`: listen address, default `127.0.0.1:3030`
//! - `SITEMARK_DATA_DIR`: document directory, default the platform data dir

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Serialize;
use sitemark_core::{
    DocumentDraft, DocumentPage, DocumentStore, FileStore, ListFilter, MarkupDocument, StorageError,
};
use std::{net::SocketAddr, path::PathBuf, sync::Arc};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};

/// Default listen address.
const DEFAULT_ADDR: &str = "127.0.0.1:3030";

/// Request body cap. Inline blueprints are up to 10 MB before base64.
const MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

/// Server configuration, read from the environment.
#[derive(Debug, Clone, PartialEq)]
struct ServerConfig {
    addr: SocketAddr,
    data_dir: Option<PathBuf>,
}

impl ServerConfig {
    fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, String> {
        let addr = lookup("SITEMARK_ADDR").unwrap_or_else(|| DEFAULT_ADDR.to_string());
        let addr = addr
            .parse()
            .map_err(|e| format!("Invalid SITEMARK_ADDR {:?}: {}", addr, e))?;
        let data_dir = lookup("SITEMARK_DATA_DIR")
            .filter(|dir| !dir.is_empty())
            .map(PathBuf::from);
        Ok(Self { addr, data_dir })
    }

    fn open_store(&self) -> Result<FileStore, StorageError> {
        match &self.data_dir {
            Some(dir) => FileStore::new(dir.clone()),
            None => FileStore::default_location(),
        }
    }
}

/// Shared application state
#[derive(Clone)]
struct AppState {
    store: Arc<dyn DocumentStore>,
}

/// A store error rendered as a JSON response.
#[derive(Debug)]
struct ApiError(StorageError);

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl From<StorageError> for ApiError {
    fn from(e: StorageError) -> Self {
        Self(e)
    }
}

fn storage_error_status(error: &StorageError) -> StatusCode {
    match error {
        StorageError::NotFound(_) => StatusCode::NOT_FOUND,
        StorageError::Invalid(_) => StatusCode::BAD_REQUEST,
        StorageError::Serialization(_) | StorageError::Io(_) | StorageError::Other(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = storage_error_status(&self.0);
        if status.is_server_error() {
            warn!("Request failed: {}", self.0);
        }
        (status, Json(ErrorBody { error: self.0.to_string() })).into_response()
    }
}

fn app(state: AppState) -> Router {
    Router::new()
        .route("/api/markups", get(list_markups).post(create_markup))
        .route(
            "/api/markups/{id}",
            get(get_markup).put(update_markup).delete(delete_markup),
        )
        .route("/health", get(health))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sitemark_server=info,tower_http=info".into()),
        )
        .init();

    let config = ServerConfig::from_env()?;
    let store = config.open_store()?;
    info!("Storing documents in {}", store.base_path().display());

    let state = AppState {
        store: Arc::new(store),
    };

    info!("SiteMark document server listening on {}", config.addr);
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app(state)).await?;
    Ok(())
}

/// Health check
async fn health() -> &'static str {
    "ok"
}

/// `GET /api/markups`: list document summaries.
async fn list_markups(
    State(state): State<AppState>,
    Query(filter): Query<ListFilter>,
) -> Result<Json<DocumentPage>, ApiError> {
    Ok(Json(state.store.fetch_many(&filter).await?))
}

/// `POST /api/markups`: create a document.
async fn create_markup(
    State(state): State<AppState>,
    Json(draft): Json<DocumentDraft>,
) -> Result<(StatusCode, Json<MarkupDocument>), ApiError> {
    let document = state.store.create(draft).await?;
    info!("Created {:?} ({} objects)", document.id, document.markup_data.len());
    Ok((StatusCode::CREATED, Json(document)))
}

/// `GET /api/markups/{id}`: fetch a document with its markup.
async fn get_markup(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MarkupDocument>, ApiError> {
    Ok(Json(state.store.fetch_one(&id).await?))
}

/// `PUT /api/markups/{id}`: replace a document.
async fn update_markup(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(draft): Json<DocumentDraft>,
) -> Result<Json<MarkupDocument>, ApiError> {
    let document = state.store.update(&id, draft).await?;
    info!("Updated {} ({} objects)", id, document.markup_data.len());
    Ok(Json(document))
}

/// `DELETE /api/markups/{id}`: delete a document.
async fn delete_markup(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.store.delete(&id).await?;
    info!("Deleted {}", id);
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sitemark_core::{BlueprintRef, DocumentLocation, MemoryStore};

    fn state() -> AppState {
        AppState {
            store: Arc::new(MemoryStore::new()),
        }
    }

    fn draft(title: &str) -> DocumentDraft {
        let markup = serde_json::json!([
            {
                "type": "box",
                "id": "box-1700000000000-0a1b2c3d",
                "createdAt": "2024-05-01T12:00:00Z",
                "modifiedAt": "2024-05-01T12:00:00Z",
                "shape": "square",
                "color": "red",
                "x": 10.0, "y": 10.0, "width": 50.0, "height": 50.0
            },
            {
                "type": "pen",
                "id": "pen-1700000000001-0a1b2c3e",
                "createdAt": "2024-05-01T12:00:00Z",
                "modifiedAt": "2024-05-01T12:00:00Z",
                "points": [{"x": 0.0, "y": 0.0}, {"x": 4.0, "y": 4.0}],
                "color": "blue",
                "width": 3
            }
        ]);
        DocumentDraft {
            title: title.to_string(),
            blueprint: BlueprintRef {
                url: "https://files.example.com/level-1.png".to_string(),
                original_file_name: "level-1.png".to_string(),
            },
            markup_data: serde_json::from_value(markup).unwrap(),
            ..DocumentDraft::default()
        }
    }

    #[test]
    fn test_error_status_mapping() {
        assert_eq!(
            storage_error_status(&StorageError::NotFound("x".into())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            storage_error_status(&StorageError::Invalid("x".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            storage_error_status(&StorageError::Io("x".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_config_defaults() {
        let config = ServerConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.addr, DEFAULT_ADDR.parse::<SocketAddr>().unwrap());
        assert!(config.data_dir.is_none());
    }

    #[test]
    fn test_config_from_env() {
        let config = ServerConfig::from_lookup(|key| match key {
            "SITEMARK_ADDR" => Some("0.0.0.0:8080".to_string()),
            "SITEMARK_DATA_DIR" => Some("/var/lib/sitemark".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.addr.port(), 8080);
        assert_eq!(config.data_dir, Some(PathBuf::from("/var/lib/sitemark")));
        assert!(ServerConfig::from_lookup(|_| Some("not-an-addr".to_string())).is_err());
    }

    #[tokio::test]
    async fn test_create_then_get() {
        let state = state();
        let (status, Json(created)) = create_markup(State(state.clone()), Json(draft("Level 1")))
            .await
            .unwrap();
        assert_eq!(status, StatusCode::CREATED);
        let id = created.id.clone().unwrap();

        let Json(fetched) = get_markup(State(state), Path(id)).await.unwrap();
        assert_eq!(fetched.markup_data, created.markup_data);
        assert_eq!(fetched.markup_data.len(), 2);
    }

    #[tokio::test]
    async fn test_get_missing_is_404() {
        let err = get_markup(State(state()), Path("doc-missing".to_string()))
            .await
            .unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_invalid_draft_is_400() {
        let err = create_markup(State(state()), Json(draft(" ")))
            .await
            .unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let state = state();
        let (_, Json(created)) = create_markup(State(state.clone()), Json(draft("Level 1")))
            .await
            .unwrap();
        let id = created.id.clone().unwrap();

        let mut next = draft("Level 1 rev B");
        next.location = DocumentLocation::Shared;
        let Json(updated) = update_markup(State(state.clone()), Path(id.clone()), Json(next))
            .await
            .unwrap();
        assert_eq!(updated.created_at, created.created_at);
        assert_eq!(updated.location, DocumentLocation::Shared);

        let status = delete_markup(State(state.clone()), Path(id.clone())).await.unwrap();
        assert_eq!(status, StatusCode::NO_CONTENT);
        let err = delete_markup(State(state), Path(id)).await.unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_list_with_search() {
        let state = state();
        for title in ["Foundation", "Roof", "Foundation walls"] {
            create_markup(State(state.clone()), Json(draft(title))).await.unwrap();
        }
        let filter = ListFilter {
            search: Some("foundation".to_string()),
            limit: 1,
            ..ListFilter::default()
        };
        let Json(page) = list_markups(State(state), Query(filter)).await.unwrap();
        assert_eq!(page.total, 2);
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].object_count, 2);
    }

    #[tokio::test]
    async fn test_health() {
        assert_eq!(health().await, "ok");
    }
}
