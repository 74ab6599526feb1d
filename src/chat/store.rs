use log::info;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{ Mutex, RwLock };
use uuid::Uuid;

use super::ChatSession;
use crate::models::chat::Language;

pub const DEFAULT_MAX_SESSIONS: usize = 1000;

pub type SharedSession = Arc<Mutex<ChatSession>>;

struct Entry {
    session: SharedSession,
    created: u64,
}

#[derive(Default)]
struct Sessions {
    entries: HashMap<Uuid, Entry>,
    next_seq: u64,
}

/// Web chat sessions keyed by id. The oldest session is evicted once `max_sessions` is reached.
pub struct SessionStore {
    sessions: RwLock<Sessions>,
    max_sessions: usize,
    default_language: Language,
}

impl SessionStore {
    pub fn new(max_sessions: usize, default_language: Language) -> Self {
        Self {
            sessions: RwLock::new(Sessions::default()),
            max_sessions: max_sessions.max(1),
            default_language,
        }
    }

    pub async fn create(&self) -> (Uuid, SharedSession) {
        let id = Uuid::new_v4();
        let session = Arc::new(Mutex::new(ChatSession::new(self.default_language)));
        let mut sessions = self.sessions.write().await;

        if sessions.entries.len() >= self.max_sessions {
            let oldest = sessions.entries
                .iter()
                .min_by_key(|(_, entry)| entry.created)
                .map(|(id, _)| *id);
            if let Some(oldest) = oldest {
                info!("Session limit reached, evicting {}", oldest);
                sessions.entries.remove(&oldest);
            }
        }

        let created = sessions.next_seq;
        sessions.next_seq += 1;
        sessions.entries.insert(id, Entry { session: session.clone(), created });
        (id, session)
    }

    pub async fn get(&self, id: &Uuid) -> Option<SharedSession> {
        self.sessions.read().await.entries.get(id).map(|entry| entry.session.clone())
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.entries.len()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_SESSIONS, Language::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn created_sessions_are_retrievable() {
        let store = SessionStore::default();
        let (id, session) = store.create().await;
        session.lock().await.toggle_processing_steps();

        let again = store.get(&id).await.unwrap();
        assert!(again.lock().await.show_processing_steps());
        assert!(store.get(&Uuid::new_v4()).await.is_none());
    }

    #[tokio::test]
    async fn oldest_session_is_evicted_at_capacity() {
        let store = SessionStore::new(2, Language::Ar);
        let (first, _) = store.create().await;
        let (second, _) = store.create().await;
        let (third, session) = store.create().await;

        assert_eq!(store.len().await, 2);
        assert!(store.get(&first).await.is_none());
        assert!(store.get(&second).await.is_some());
        assert!(store.get(&third).await.is_some());
        assert_eq!(session.lock().await.language(), Language::Ar);
    }
}
