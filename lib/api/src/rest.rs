use actix_cors::Cors;
use actix_web::{web, App, HttpResponse, HttpServer, Result as ActixResult};
use homematch_core::SharedResources;
use homematch_matching::{ConstraintRequest, MatchEngine, MatchStatus};
use homematch_storage::ArtifactStore;
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

use crate::conversation::ConversationLog;

const GREETINGS: [&str; 3] = ["hi", "hello", "hey"];

const GREETING_REPLY: &str = "Hello! I can help you find properties. \
     Try asking 'Find me a 3 bedroom house in Austin under $400,000'";

const DEFAULT_HISTORY_LIMIT: usize = 20;

/// Everything the handlers share
pub struct AppState {
    pub resources: SharedResources,
    pub engine: MatchEngine,
    pub history: ConversationLog,
    /// Directory `POST /reload` reads from; reload is disabled when unset
    pub artifacts_dir: Option<PathBuf>,
}

impl AppState {
    pub fn new(resources: SharedResources, engine: MatchEngine) -> Self {
        Self {
            resources,
            engine,
            history: ConversationLog::default(),
            artifacts_dir: None,
        }
    }

    pub fn with_artifacts_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.artifacts_dir = Some(dir.into());
        self
    }
}

#[derive(Deserialize)]
struct ChatRequest {
    message: Option<String>,
}

#[derive(Deserialize)]
struct HistoryQuery {
    limit: Option<usize>,
}

pub struct RestApi;

impl RestApi {
    pub async fn start(state: Arc<AppState>, port: u16) -> std::io::Result<()> {
        HttpServer::new(move || {
            let cors = Cors::default()
                .allow_any_origin()
                .allow_any_method()
                .allow_any_header()
                .max_age(3600);

            App::new()
                .wrap(cors)
                .app_data(web::Data::new(state.clone()))
                .configure(Self::routes)
        })
        .bind(("0.0.0.0", port))?
        .run()
        .await
    }

    pub fn routes(cfg: &mut web::ServiceConfig) {
        cfg.route("/", web::get().to(home))
            .route("/chat", web::post().to(chat))
            .route("/search", web::post().to(search))
            .route("/history", web::get().to(history))
            .route("/reload", web::post().to(reload));
    }
}

async fn home() -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "status": "success",
        "message": "Real Estate Chatbot API",
        "endpoints": ["POST /chat", "POST /search", "GET /history", "POST /reload"]
    })))
}

async fn chat(
    state: web::Data<Arc<AppState>>,
    req: web::Json<ChatRequest>,
) -> ActixResult<HttpResponse> {
    let message = match req.message.as_deref() {
        Some(m) => m.trim(),
        None => {
            return Ok(HttpResponse::BadRequest().json(serde_json::json!({
                "status": "error",
                "message": "Please provide a 'message' in your request"
            })))
        }
    };
    if message.is_empty() {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "status": "error",
            "message": "Message cannot be empty"
        })));
    }

    if is_greeting(message) {
        state.history.record(message, GREETING_REPLY);
        return Ok(HttpResponse::Ok().json(serde_json::json!({
            "status": "success",
            "response": GREETING_REPLY,
            "data": null
        })));
    }

    let resources = state.resources.snapshot();
    let result = state.engine.search(&resources, message);

    if result.is_error() {
        return Ok(HttpResponse::InternalServerError().json(serde_json::json!({
            "status": "error",
            "message": result.message
        })));
    }

    let limit = state.engine.config().reply_limit;
    let reply = result.reply(limit);
    state.history.record(message, &reply);

    let properties: Vec<_> = result.properties.iter().take(limit).collect();
    let distances = result
        .distances
        .as_ref()
        .map(|d| d.iter().take(limit).copied().collect::<Vec<f64>>());

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "status": "success",
        "response": reply,
        "data": {
            "properties": properties,
            "status": result.status,
            "distances": distances
        }
    })))
}

async fn search(
    state: web::Data<Arc<AppState>>,
    req: web::Json<ConstraintRequest>,
) -> ActixResult<HttpResponse> {
    let (constraints, _discarded) = req.into_inner().into_constraints();
    let resources = state.resources.snapshot();
    let result = state.engine.search_constraints(&resources, constraints);

    if result.status == MatchStatus::Error {
        Ok(HttpResponse::InternalServerError().json(result))
    } else {
        Ok(HttpResponse::Ok().json(result))
    }
}

async fn history(
    state: web::Data<Arc<AppState>>,
    query: web::Query<HistoryQuery>,
) -> ActixResult<HttpResponse> {
    let limit = query.limit.unwrap_or(DEFAULT_HISTORY_LIMIT);
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "status": "success",
        "history": state.history.recent(limit)
    })))
}

async fn reload(state: web::Data<Arc<AppState>>) -> ActixResult<HttpResponse> {
    let dir = match &state.artifacts_dir {
        Some(dir) => dir.clone(),
        None => {
            return Ok(HttpResponse::BadRequest().json(serde_json::json!({
                "status": "error",
                "message": "No artifact directory configured"
            })))
        }
    };

    let loaded = web::block(move || ArtifactStore::new(dir).load()).await?;
    match loaded {
        Ok(bundle) => {
            let rows = bundle.catalog().len();
            let version = state.resources.replace(bundle);
            info!("Reloaded {} listings, resource version {}", rows, version);
            Ok(HttpResponse::Ok().json(serde_json::json!({
                "status": "success",
                "rows": rows,
                "version": version
            })))
        }
        Err(e) => {
            error!("Reload failed: {:#}", e);
            Ok(HttpResponse::InternalServerError().json(serde_json::json!({
                "status": "error",
                "message": format!("Reload failed: {}", e)
            })))
        }
    }
}

fn is_greeting(message: &str) -> bool {
    let word = message
        .trim_end_matches(|c: char| c.is_ascii_punctuation())
        .to_lowercase();
    GREETINGS.contains(&word.as_str())
}
