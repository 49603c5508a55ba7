//! In-process login sessions, keyed by bearer token.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

/// One authenticated login.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub user_id: Uuid,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

pub type SessionStore = Arc<RwLock<HashMap<Uuid, AuthSession>>>;

pub fn create_session_store() -> SessionStore {
    Arc::new(RwLock::new(HashMap::new()))
}

/// Issue a new bearer token for the given user.
pub async fn insert_session(store: &SessionStore, user_id: Uuid, email: String) -> Uuid {
    let token = Uuid::new_v4();
    store.write().await.insert(
        token,
        AuthSession {
            user_id,
            email,
            created_at: Utc::now(),
        },
    );
    token
}

pub async fn session_for_token(store: &SessionStore, token: Uuid) -> Option<AuthSession> {
    store.read().await.get(&token).cloned()
}

/// Drop a session. Returns false when the token was unknown.
pub async fn remove_session(store: &SessionStore, token: Uuid) -> bool {
    store.write().await.remove(&token).is_some()
}
