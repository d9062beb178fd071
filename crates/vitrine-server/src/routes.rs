//! HTTP and WebSocket routes.

use crate::state::AppState;
use axum::{
    Json, Router,
    extract::{
        State,
        rejection::JsonRejection,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use futures_util::{SinkExt, StreamExt, stream::SplitSink};
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{debug, error, info, warn};
use vitrine_core::articles::{ArticleAccepted, ErrorBody, MessageBody};
use vitrine_core::{Article, NewArticle, RelayEvent};

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/api/article", post(submit_article))
        .route("/api/articles", get(list_articles).delete(clear_articles))
        .route("/ws", get(ws_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Index page
async fn index() -> &'static str {
    "Vitrine Relay Server - POST articles to /api/article, listen at /ws"
}

/// Health check
async fn health() -> &'static str {
    "ok"
}

fn bad_request(message: impl Into<String>) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorBody {
            error: message.into(),
        }),
    )
        .into_response()
}

async fn submit_article(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<NewArticle>, JsonRejection>,
) -> Response {
    let Json(new_article) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            warn!("Rejected article body: {}", rejection.body_text());
            return bad_request(format!("Invalid article body: {}", rejection.body_text()));
        }
    };
    let (name, price) = match new_article.validate() {
        Ok(fields) => fields,
        Err(e) => {
            warn!("Rejected article {:?}: {}", new_article, e);
            return bad_request(e.to_string());
        }
    };

    let article = state.add_article(name, price).await;
    info!("Article received: {}", article.label());
    Json(ArticleAccepted {
        message: "Article received and broadcast".into(),
        article,
    })
    .into_response()
}

async fn list_articles(State(state): State<Arc<AppState>>) -> Json<Vec<Article>> {
    Json(state.articles().await)
}

async fn clear_articles(State(state): State<Arc<AppState>>) -> Json<MessageBody> {
    let removed = state.clear().await;
    info!("Cleared {} articles", removed);
    Json(MessageBody {
        message: "All articles have been deleted".into(),
    })
}

/// WebSocket upgrade handler
async fn ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

type Sender = SplitSink<WebSocket, Message>;

async fn send_event(sender: &mut Sender, event: &RelayEvent) -> Result<(), axum::Error> {
    match serde_json::to_string(event) {
        Ok(json) => sender.send(Message::Text(json.into())).await,
        Err(e) => {
            error!("Failed to serialize relay event: {}", e);
            Ok(())
        }
    }
}

/// Handle a viewer connection: snapshot first, then every event.
async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (mut sender, mut receiver) = socket.split();
    let (articles, mut events) = state.subscribe().await;
    info!("Viewer connected ({} total)", state.viewer_count());

    if send_event(&mut sender, &RelayEvent::InitialSnapshot { articles }).await.is_err() {
        return;
    }

    loop {
        tokio::select! {
            msg = receiver.next() => {
                match msg {
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => {} // Viewers only listen
                    Some(Err(e)) => {
                        warn!("WebSocket error: {}", e);
                        break;
                    }
                }
            }

            event = events.recv() => {
                match event {
                    Ok(event) => {
                        if send_event(&mut sender, &event).await.is_err() {
                            break;
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        warn!("Viewer lagged by {} events, resending snapshot", skipped);
                        let (articles, fresh) = state.subscribe().await;
                        events = fresh;
                        if send_event(&mut sender, &RelayEvent::InitialSnapshot { articles }).await.is_err() {
                            break;
                        }
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        }
    }

    drop(events);
    debug!("Viewer disconnected ({} remaining)", state.viewer_count());
}
