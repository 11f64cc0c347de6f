use crate::client::BackendClient;
use crate::config::Config;
use crate::session::{session_id, Session, Visit};
use axum::http::HeaderMap;
use std::{collections::HashMap, sync::Arc, time::Duration};
use tokio::{sync::Mutex, time::Instant};
use tracing::debug;
use uuid::Uuid;

struct SessionEntry {
    session: Arc<Session>,
    last_seen: Instant,
}

#[derive(Clone)]
pub struct AppState {
    pub client: BackendClient,
    sessions: Arc<Mutex<HashMap<Uuid, SessionEntry>>>,
    notice_hide_after: Duration,
    session_idle: Duration,
    refresh_control: bool,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        Self::with_client(BackendClient::new(config), config)
    }

    pub fn with_client(client: BackendClient, config: &Config) -> Self {
        Self {
            client,
            sessions: Arc::new(Mutex::new(HashMap::new())),
            notice_hide_after: config.notice_hide_after,
            session_idle: config.session_idle,
            refresh_control: config.refresh_control,
        }
    }

    /// Finds the session named by the request's cookie, or starts a new one.
    /// Sessions idle for longer than the configured window are dropped first.
    pub async fn visit(&self, headers: &HeaderMap) -> Visit {
        let now = Instant::now();
        let mut sessions = self.sessions.lock().await;
        let idle = self.session_idle;
        sessions.retain(|_, entry| now.saturating_duration_since(entry.last_seen) < idle);

        if let Some(id) = session_id(headers) {
            if let Some(entry) = sessions.get_mut(&id) {
                entry.last_seen = now;
                return Visit {
                    id,
                    session: Arc::clone(&entry.session),
                    is_new: false,
                };
            }
        }

        let id = Uuid::new_v4();
        let session = Arc::new(Session::new(self.refresh_control, self.notice_hide_after));
        sessions.insert(
            id,
            SessionEntry {
                session: Arc::clone(&session),
                last_seen: now,
            },
        );
        debug!(%id, open = sessions.len(), "session started");
        Visit {
            id,
            session,
            is_new: true,
        }
    }
}
