//! Servidor web Axum com endpoints JSON e WebSocket para a extração de cartões de visita

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use cardner_core::{CardConfig, CardPipeline, ExtractOptions, Extraction, PipelineEvent};
use serde::{Deserialize, Serialize};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_ADDR: &str = "0.0.0.0:3000";

/// Estado compartilhado da aplicação
struct AppState {
    pipeline: CardPipeline,
}

/// Configuração do servidor lida do ambiente
#[derive(Debug, Clone)]
struct ServerConfig {
    /// `CARDNER_ADDR` (padrão `0.0.0.0:3000`)
    addr: String,
    /// `CARDNER_CONFIG`: caminho de um JSON de configuração (opcional)
    config_path: Option<PathBuf>,
}

impl ServerConfig {
    fn from_env() -> Self {
        Self {
            addr: std::env::var("CARDNER_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string()),
            config_path: std::env::var_os("CARDNER_CONFIG").map(PathBuf::from),
        }
    }

    fn load_pipeline(&self) -> cardner_core::Result<CardPipeline> {
        let config = match &self.config_path {
            Some(path) => {
                info!(path = %path.display(), "carregando configuração");
                CardConfig::from_path(path)?
            }
            None => CardConfig::default(),
        };
        CardPipeline::new(config)
    }
}

#[derive(Deserialize)]
struct NerRequest {
    text: String,
    #[serde(default)]
    debug: bool,
    #[serde(default)]
    rank_persons: bool,
}

#[derive(Deserialize)]
struct BatchRequest {
    texts: Vec<String>,
    #[serde(default)]
    debug: bool,
    #[serde(default)]
    rank_persons: bool,
}

#[derive(Serialize)]
struct BatchResponse {
    results: Vec<Extraction>,
}

/// Mensagem WebSocket recebida do cliente
#[derive(Deserialize)]
struct WsRequest {
    text: String,
    #[serde(default)]
    debug: bool,
}

#[derive(Serialize)]
struct ConfigSummary {
    version: String,
    labeler: String,
    title_words: usize,
    org_suffixes: usize,
    address_words: usize,
    noise_words: usize,
    pattern_groups: Vec<String>,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let server = ServerConfig::from_env();
    let pipeline = match server.load_pipeline() {
        Ok(pipeline) => pipeline,
        Err(err) => {
            error!(error = %err, "configuração inválida");
            std::process::exit(1);
        }
    };
    info!(version = %pipeline.config().version, labeler = pipeline.labeler_name(), "pipeline compilado");

    let addr: SocketAddr = match server.addr.parse() {
        Ok(addr) => addr,
        Err(err) => {
            error!(addr = %server.addr, error = %err, "endereço inválido");
            std::process::exit(1);
        }
    };
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(err) => {
            error!(%addr, error = %err, "não foi possível abrir a porta");
            std::process::exit(1);
        }
    };

    let app = router(Arc::new(AppState { pipeline }));
    info!("🚀 Servidor de cartões iniciado em http://{addr}");
    if let Err(err) = axum::serve(listener, app).await {
        error!(error = %err, "servidor encerrado com erro");
        std::process::exit(1);
    }
}

fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/ner", post(ner_handler))
        .route("/ner/batch", post(batch_handler))
        .route("/ws", get(ws_handler))
        .route("/health", get(health_handler))
        .route("/config", get(config_handler))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(cors))
        .with_state(state)
}

/// Extração via HTTP POST (sem streaming). Texto vazio devolve lista vazia.
async fn ner_handler(State(state): State<Arc<AppState>>, Json(req): Json<NerRequest>) -> impl IntoResponse {
    let options = ExtractOptions {
        debug: req.debug,
        rank_persons: req.rank_persons,
    };
    let text = req.text;
    let pipeline_state = Arc::clone(&state);
    let result = tokio::task::spawn_blocking(move || pipeline_state.pipeline.extract_with(&text, options)).await;

    match result {
        Ok(extraction) => Json(extraction).into_response(),
        Err(err) => {
            error!(error = %err, "extração interrompida");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({"error": "falha ao processar o texto"})),
            )
                .into_response()
        }
    }
}

/// Lote de cartões, processado em paralelo fora do runtime async
async fn batch_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<BatchRequest>,
) -> impl IntoResponse {
    let options = ExtractOptions {
        debug: req.debug,
        rank_persons: req.rank_persons,
    };
    let texts = req.texts;
    let pipeline_state = Arc::clone(&state);
    let result =
        tokio::task::spawn_blocking(move || pipeline_state.pipeline.extract_batch(&texts, options)).await;

    match result {
        Ok(results) => Json(BatchResponse { results }).into_response(),
        Err(err) => {
            error!(error = %err, "lote interrompido");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({"error": "falha ao processar o lote"})),
            )
                .into_response()
        }
    }
}

async fn health_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "config_version": state.pipeline.config().version,
    }))
}

async fn config_handler(State(state): State<Arc<AppState>>) -> Json<ConfigSummary> {
    let config = state.pipeline.config();
    Json(ConfigSummary {
        version: config.version.clone(),
        labeler: state.pipeline.labeler_name().to_string(),
        title_words: config.lexicons.title.len(),
        org_suffixes: config.lexicons.org_suffix.len(),
        address_words: config.lexicons.address.len(),
        noise_words: config.lexicons.noise.len(),
        pattern_groups: state.pipeline.patterns().groups().iter().map(|g| g.name.clone()).collect(),
    })
}

/// Upgrade HTTP → WebSocket
async fn ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_websocket(socket, state))
}

/// Lógica do WebSocket: recebe texto, executa o pipeline e devolve cada evento
async fn handle_websocket(mut socket: WebSocket, state: Arc<AppState>) {
    info!("WebSocket conectado");

    while let Some(Ok(msg)) = socket.recv().await {
        match msg {
            Message::Text(text) => {
                // Tenta parsear como JSON {text, debug}; senão usa como texto puro
                let (text, options) = match serde_json::from_str::<WsRequest>(&text) {
                    Ok(req) => (req.text, ExtractOptions { debug: req.debug, ..Default::default() }),
                    Err(_) => (text.to_string(), ExtractOptions::default()),
                };

                info!(chars = text.len(), "analisando via WebSocket");

                // O pipeline é síncrono: roda fora do runtime e coleta os eventos no fim
                let (tx, rx) = std::sync::mpsc::channel::<PipelineEvent>();
                let pipeline_state = Arc::clone(&state);
                let handle = tokio::task::spawn_blocking(move || {
                    pipeline_state.pipeline.extract_streaming(&text, options, tx);
                });
                if let Err(err) = handle.await {
                    warn!(error = %err, "análise interrompida");
                    continue;
                }

                let events: Vec<PipelineEvent> = rx.try_iter().collect();
                for event in &events {
                    match serde_json::to_string(event) {
                        Ok(json) => {
                            if socket.send(Message::Text(json)).await.is_err() {
                                return; // cliente desconectou
                            }
                        }
                        Err(err) => warn!(error = %err, "evento não serializável"),
                    }
                }
            }
            Message::Close(_) => {
                info!("WebSocket desconectado");
                return;
            }
            Message::Ping(payload) => {
                let _ = socket.send(Message::Pong(payload)).await;
            }
            _ => {}
        }
    }
}
