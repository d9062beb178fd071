//! Client for the article relay.
//!
//! Subscribes to the relay's WebSocket broadcast and issues the REST calls
//! for submitting and clearing articles. The client never edits the article
//! mirror itself: a clear request only takes effect locally once the relay
//! broadcasts `articles-cleared`.

use crate::articles::{Article, ArticleAccepted, ErrorBody, NewArticle, RelayEvent};
use thiserror::Error;
use url::Url;

/// Relay address used when none is configured.
pub const DEFAULT_RELAY_URL: &str = "http://localhost:3001";

/// Relay client errors.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("Invalid relay URL: {0}")]
    InvalidUrl(String),
    #[error("Already connected")]
    AlreadyConnected,
    #[error("Request failed: {0}")]
    Transport(String),
    #[error("Relay rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },
}

/// Where the relay lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayConfig {
    base_url: Url,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_RELAY_URL).expect("default relay URL is valid"),
        }
    }
}

impl RelayConfig {
    /// Parse an `http://` or `https://` base URL.
    pub fn new(base_url: &str) -> Result<Self, RelayError> {
        let base_url = Url::parse(base_url).map_err(|e| RelayError::InvalidUrl(format!("{}: {}", base_url, e)))?;
        match base_url.scheme() {
            "http" | "https" => Ok(Self { base_url }),
            other => Err(RelayError::InvalidUrl(format!("unsupported scheme {}", other))),
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// REST endpoint under `/api/`.
    pub fn api_url(&self, endpoint: &str) -> Result<Url, RelayError> {
        self.base_url
            .join(&format!("/api/{}", endpoint))
            .map_err(|e| RelayError::InvalidUrl(e.to_string()))
    }

    /// Broadcast channel endpoint (`ws://` or `wss://` + `/ws`).
    pub fn ws_url(&self) -> Result<Url, RelayError> {
        let mut url = self
            .base_url
            .join("/ws")
            .map_err(|e| RelayError::InvalidUrl(e.to_string()))?;
        let scheme = if self.base_url.scheme() == "https" { "wss" } else { "ws" };
        url.set_scheme(scheme)
            .map_err(|_| RelayError::InvalidUrl(format!("cannot use {} scheme", scheme)))?;
        Ok(url)
    }
}

/// Connection state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
    Error,
}

/// Events produced by the relay client.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientEvent {
    /// Connected to the broadcast channel.
    Connected,
    /// Broadcast channel closed.
    Disconnected,
    /// An article event from the relay, to be applied to the mirror.
    Relay(RelayEvent),
    /// A submit succeeded; the article arrives separately as `article-added`.
    Submitted(Article),
    /// A clear request succeeded; the mirror empties on `articles-cleared`.
    ClearRequested,
    /// A REST request failed. Not retried.
    RequestFailed { message: String },
    /// The broadcast connection failed.
    Error { message: String },
}

/// Decode a WebSocket text frame.
pub fn parse_frame(text: &str) -> Option<RelayEvent> {
    match serde_json::from_str::<RelayEvent>(text) {
        Ok(event) => Some(event),
        Err(e) => {
            log::warn!("Failed to parse relay message: {} ({})", text, e);
            None
        }
    }
}

fn rejection(status: u16, body: &str) -> RelayError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .map(|b| b.error)
        .unwrap_or_else(|_| body.to_string());
    RelayError::Rejected { status, message }
}

// ============================================================================
// Native client
// ============================================================================

#[cfg(not(target_arch = "wasm32"))]
mod native_client {
    use super::*;
    use std::sync::mpsc::{channel, Receiver, Sender, TryRecvError};
    use std::thread::{self, JoinHandle};
    use std::time::Duration;
    use tungstenite::{connect, Message};

    /// Blocking REST calls against the relay.
    #[derive(Debug, Clone)]
    pub struct RelayHttp {
        config: RelayConfig,
        client: reqwest::blocking::Client,
    }

    impl RelayHttp {
        pub fn new(config: RelayConfig) -> Self {
            Self {
                config,
                client: reqwest::blocking::Client::new(),
            }
        }

        /// `POST /api/article`
        pub fn submit(&self, article: &NewArticle) -> Result<Article, RelayError> {
            let response = self
                .client
                .post(self.config.api_url("article")?)
                .json(article)
                .send()
                .map_err(|e| RelayError::Transport(e.to_string()))?;
            let status = response.status();
            if !status.is_success() {
                let body = response.text().unwrap_or_default();
                return Err(rejection(status.as_u16(), &body));
            }
            let accepted: ArticleAccepted = response.json().map_err(|e| RelayError::Transport(e.to_string()))?;
            Ok(accepted.article)
        }

        /// `GET /api/articles`
        pub fn list(&self) -> Result<Vec<Article>, RelayError> {
            let response = self
                .client
                .get(self.config.api_url("articles")?)
                .send()
                .map_err(|e| RelayError::Transport(e.to_string()))?;
            let status = response.status();
            if !status.is_success() {
                let body = response.text().unwrap_or_default();
                return Err(rejection(status.as_u16(), &body));
            }
            response.json().map_err(|e| RelayError::Transport(e.to_string()))
        }

        /// `DELETE /api/articles`
        pub fn clear(&self) -> Result<(), RelayError> {
            let response = self
                .client
                .delete(self.config.api_url("articles")?)
                .send()
                .map_err(|e| RelayError::Transport(e.to_string()))?;
            let status = response.status();
            if !status.is_success() {
                let body = response.text().unwrap_or_default();
                return Err(rejection(status.as_u16(), &body));
            }
            Ok(())
        }
    }

    /// Commands sent to the WebSocket thread.
    enum WsCommand {
        Close,
    }

    /// Relay client for native platforms.
    ///
    /// Socket reads and REST requests run on background threads; results are
    /// collected through `poll_events()` so the owner is never blocked.
    pub struct RelayClient {
        config: RelayConfig,
        http: RelayHttp,
        state: ConnectionState,
        /// Events from the current WebSocket thread. Replaced on every
        /// `connect`, so a previous connection can never report into this one.
        ws_rx: Option<Receiver<ClientEvent>>,
        /// REST results, shared by every request thread.
        request_tx: Sender<ClientEvent>,
        request_rx: Receiver<ClientEvent>,
        /// Channel to send commands to the WebSocket thread.
        cmd_tx: Option<Sender<WsCommand>>,
        _thread: Option<JoinHandle<()>>,
    }

    impl RelayClient {
        /// Create a new disconnected client.
        pub fn new(config: RelayConfig) -> Self {
            let (request_tx, request_rx) = channel();
            Self {
                http: RelayHttp::new(config.clone()),
                config,
                state: ConnectionState::Disconnected,
                ws_rx: None,
                request_tx,
                request_rx,
                cmd_tx: None,
                _thread: None,
            }
        }

        pub fn config(&self) -> &RelayConfig {
            &self.config
        }

        /// Open the broadcast connection.
        pub fn connect(&mut self) -> Result<(), RelayError> {
            if self.cmd_tx.is_some() {
                return Err(RelayError::AlreadyConnected);
            }
            let url = self.config.ws_url()?;
            self.state = ConnectionState::Connecting;

            let (cmd_tx, cmd_rx) = channel::<WsCommand>();
            let (event_tx, event_rx) = channel::<ClientEvent>();

            let handle = thread::spawn(move || {
                log::info!("Relay thread: connecting to {}", url);

                let (mut socket, response) = match connect(url.as_str()) {
                    Ok(ok) => ok,
                    Err(e) => {
                        log::error!("Relay connection failed: {}", e);
                        let _ = event_tx.send(ClientEvent::Error {
                            message: format!("Connection failed: {}", e),
                        });
                        return;
                    }
                };
                log::info!("Relay connected, status: {}", response.status());
                let _ = event_tx.send(ClientEvent::Connected);

                // Short read timeout so close commands are noticed promptly.
                if let tungstenite::stream::MaybeTlsStream::Plain(tcp) = socket.get_mut() {
                    let _ = tcp.set_read_timeout(Some(Duration::from_millis(50)));
                    let _ = tcp.set_write_timeout(Some(Duration::from_secs(5)));
                }

                loop {
                    match cmd_rx.try_recv() {
                        Ok(WsCommand::Close) => {
                            log::info!("Relay close requested");
                            let _ = socket.close(None);
                            break;
                        }
                        Err(TryRecvError::Disconnected) => break,
                        Err(TryRecvError::Empty) => {}
                    }

                    match socket.read() {
                        Ok(Message::Text(text)) => {
                            if let Some(event) = parse_frame(&text) {
                                if event_tx.send(ClientEvent::Relay(event)).is_err() {
                                    break;
                                }
                            }
                        }
                        Ok(Message::Ping(data)) => {
                            let _ = socket.send(Message::Pong(data));
                        }
                        Ok(Message::Close(_)) => {
                            log::info!("Relay sent close frame");
                            break;
                        }
                        Ok(_) => {}
                        Err(tungstenite::Error::Io(ref e))
                            if e.kind() == std::io::ErrorKind::WouldBlock
                                || e.kind() == std::io::ErrorKind::TimedOut =>
                        {
                            continue;
                        }
                        Err(e) => {
                            log::error!("Relay read error: {}", e);
                            break;
                        }
                    }
                }

                log::info!("Relay thread exiting");
                let _ = event_tx.send(ClientEvent::Disconnected);
            });

            self.cmd_tx = Some(cmd_tx);
            self.ws_rx = Some(event_rx);
            self._thread = Some(handle);
            Ok(())
        }

        /// Close the broadcast connection. Events still queued from it are
        /// discarded.
        pub fn disconnect(&mut self) {
            if let Some(tx) = self.cmd_tx.take() {
                let _ = tx.send(WsCommand::Close);
            }
            self.ws_rx = None;
            self._thread = None;
            self.state = ConnectionState::Disconnected;
        }

        /// Submit an article in the background. The outcome is reported as
        /// `Submitted` or `RequestFailed`.
        pub fn submit_article(&self, article: NewArticle) {
            let http = self.http.clone();
            let event_tx = self.request_tx.clone();
            thread::spawn(move || {
                let event = match http.submit(&article) {
                    Ok(article) => ClientEvent::Submitted(article),
                    Err(e) => {
                        log::error!("Error submitting article: {}", e);
                        ClientEvent::RequestFailed { message: e.to_string() }
                    }
                };
                let _ = event_tx.send(event);
            });
        }

        /// Ask the relay to delete every article. Local state is left alone
        /// until the relay broadcasts `articles-cleared`.
        pub fn clear_articles(&self) {
            let http = self.http.clone();
            let event_tx = self.request_tx.clone();
            thread::spawn(move || {
                let event = match http.clear() {
                    Ok(()) => {
                        log::info!("All articles have been cleared");
                        ClientEvent::ClearRequested
                    }
                    Err(e) => {
                        log::error!("Failed to clear articles: {}", e);
                        ClientEvent::RequestFailed { message: e.to_string() }
                    }
                };
                let _ = event_tx.send(event);
            });
        }

        /// Drain pending events (non-blocking).
        pub fn poll_events(&mut self) -> Vec<ClientEvent> {
            let mut events = Vec::new();
            if let Some(ref rx) = self.ws_rx {
                while let Ok(event) = rx.try_recv() {
                    match &event {
                        ClientEvent::Connected => self.state = ConnectionState::Connected,
                        ClientEvent::Disconnected => {
                            self.state = ConnectionState::Disconnected;
                            self.cmd_tx = None;
                        }
                        ClientEvent::Error { .. } => {
                            self.state = ConnectionState::Error;
                            self.cmd_tx = None;
                        }
                        _ => {}
                    }
                    events.push(event);
                }
            }
            while let Ok(event) = self.request_rx.try_recv() {
                events.push(event);
            }
            events
        }

        pub fn state(&self) -> ConnectionState {
            self.state
        }

        pub fn is_connected(&self) -> bool {
            self.state == ConnectionState::Connected
        }
    }

    impl Drop for RelayClient {
        fn drop(&mut self) {
            self.disconnect();
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use native_client::{RelayClient, RelayHttp};
