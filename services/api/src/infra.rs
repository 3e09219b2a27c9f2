use jobmatch::auth::{CredentialError, TokenIssuer};
use jobmatch::config::{AppConfig, MailConfig};
use jobmatch::error::AppError;
use jobmatch::lifecycle::LifecycleEngine;
use jobmatch::notify::{EmailMessage, MailError, Mailer};
use jobmatch::store::{MemoryStore, StoreError};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info};

pub(crate) type Engine = LifecycleEngine<MemoryStore, QueuedMailer>;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Shared request context: the store, the lifecycle engine over it, and the
/// token issuer.
#[derive(Clone)]
pub(crate) struct ApiContext {
    pub(crate) store: Arc<MemoryStore>,
    pub(crate) engine: Arc<Engine>,
    pub(crate) tokens: Arc<TokenIssuer>,
}

impl ApiContext {
    pub(crate) fn new(config: &AppConfig) -> Self {
        let store = Arc::new(MemoryStore::new());
        let mailer = Arc::new(QueuedMailer::spawn(&config.mail));
        Self {
            store: store.clone(),
            engine: Arc::new(LifecycleEngine::new(store, mailer)),
            tokens: Arc::new(TokenIssuer::new(&config.auth)),
        }
    }
}

/// Mailer handing messages to a background task, keeping transport latency
/// off the request path. Without a configured sender every message is
/// dropped after a debug log.
pub(crate) struct QueuedMailer {
    queue: mpsc::UnboundedSender<EmailMessage>,
}

impl QueuedMailer {
    pub(crate) fn spawn(config: &MailConfig) -> Self {
        let (queue, mut inbox) = mpsc::unbounded_channel::<EmailMessage>();
        let from = config.from.clone();
        tokio::spawn(async move {
            while let Some(message) = inbox.recv().await {
                match &from {
                    Some(sender) => info!(
                        from = %sender,
                        to = %message.to,
                        subject = %message.subject,
                        "email dispatched"
                    ),
                    None => debug!(to = %message.to, "no sender configured, email dropped"),
                }
            }
        });
        Self { queue }
    }
}

impl Mailer for QueuedMailer {
    fn send(&self, message: EmailMessage) -> Result<(), MailError> {
        self.queue
            .send(message)
            .map_err(|_| MailError::Transport("mail queue closed".to_string()))
    }
}

pub(crate) fn store_failure(err: StoreError) -> AppError {
    AppError::Server(axum::Error::new(err))
}

pub(crate) fn credential_failure(err: CredentialError) -> AppError {
    AppError::Server(axum::Error::new(err))
}

#[cfg(test)]
pub(crate) fn test_context() -> ApiContext {
    use jobmatch::config::{
        AdminConfig, AppEnvironment, AuthConfig, ServerConfig, TelemetryConfig,
    };

    ApiContext::new(&AppConfig {
        environment: AppEnvironment::Test,
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        telemetry: TelemetryConfig {
            log_level: "info".to_string(),
        },
        auth: AuthConfig {
            jwt_secret: "test-secret".to_string(),
            token_ttl_hours: 1,
        },
        admin: AdminConfig {
            email: "admin@jobmatch.test".to_string(),
            password: "admin123456".to_string(),
        },
        mail: MailConfig { from: None },
    })
}
