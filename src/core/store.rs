// src/core/store.rs — In-memory session store

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::core::session::Session;
use crate::infra::errors::PersuadeError;

/// Cloneable handle to the shared session map; insertion order is preserved
/// for `list`. The lock is synchronous and never held across an await, so a
/// scheduler tick's read-check-append runs as one atomic critical section.
#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<Mutex<StoreInner>>,
}

#[derive(Default)]
struct StoreInner {
    sessions: HashMap<String, Session>,
    order: Vec<String>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, session: Session) {
        let mut inner = self.lock();
        inner.order.push(session.id.clone());
        inner.sessions.insert(session.id.clone(), session);
    }

    /// Snapshot of one session.
    pub fn get(&self, id: &str) -> Option<Session> {
        self.lock().sessions.get(id).cloned()
    }

    /// Apply `mutate` to the session under the lock. `NotFound` if absent.
    pub fn update<T>(
        &self,
        id: &str,
        mutate: impl FnOnce(&mut Session) -> T,
    ) -> Result<T, PersuadeError> {
        let mut inner = self.lock();
        match inner.sessions.get_mut(id) {
            Some(session) => Ok(mutate(session)),
            None => Err(PersuadeError::NotFound { id: id.to_string() }),
        }
    }

    pub fn remove(&self, id: &str) -> Option<Session> {
        let mut inner = self.lock();
        let removed = inner.sessions.remove(id);
        if removed.is_some() {
            inner.order.retain(|existing| existing != id);
        }
        removed
    }

    /// Snapshots of all sessions in creation order.
    pub fn list(&self) -> Vec<Session> {
        let inner = self.lock();
        inner
            .order
            .iter()
            .filter_map(|id| inner.sessions.get(id).cloned())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.lock().sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().sessions.is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, StoreInner> {
        self.inner.lock().expect("session store lock poisoned")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::session::{SessionConfig, SessionStatus};

    fn session(name: &str) -> Session {
        Session::new(
            SessionConfig {
                training_name: name.into(),
                provider: "openai".into(),
                model: "gpt-4".into(),
                topic: "topic".into(),
                prompt: "prompt".into(),
                iterations: 10,
                retry_interval: 5,
                goal: None,
            },
            0.3,
        )
    }

    #[test]
    fn test_insert_and_get() {
        let store = SessionStore::new();
        let s = session("a");
        let id = s.id.clone();
        store.insert(s);

        let got = store.get(&id).unwrap();
        assert_eq!(got.config.training_name, "a");
        assert!(store.get("missing").is_none());
    }

    #[test]
    fn test_update_mutates_in_place() {
        let store = SessionStore::new();
        let s = session("a");
        let id = s.id.clone();
        store.insert(s);

        let status = store
            .update(&id, |session| {
                session.status = SessionStatus::Running;
                session.status
            })
            .unwrap();
        assert_eq!(status, SessionStatus::Running);
        assert_eq!(store.get(&id).unwrap().status, SessionStatus::Running);
    }

    #[test]
    fn test_update_missing_is_not_found() {
        let store = SessionStore::new();
        let err = store.update("missing", |_| ()).unwrap_err();
        assert!(matches!(err, PersuadeError::NotFound { .. }));
    }

    #[test]
    fn test_remove() {
        let store = SessionStore::new();
        let s = session("a");
        let id = s.id.clone();
        store.insert(s);

        assert!(store.remove(&id).is_some());
        assert!(store.remove(&id).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_list_preserves_creation_order() {
        let store = SessionStore::new();
        for name in ["first", "second", "third"] {
            store.insert(session(name));
        }

        let names: Vec<String> = store
            .list()
            .into_iter()
            .map(|s| s.config.training_name)
            .collect();
        assert_eq!(names, ["first", "second", "third"]);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_list_skips_removed() {
        let store = SessionStore::new();
        let a = session("a");
        let b = session("b");
        let a_id = a.id.clone();
        store.insert(a);
        store.insert(b);

        store.remove(&a_id);
        let names: Vec<String> = store
            .list()
            .into_iter()
            .map(|s| s.config.training_name)
            .collect();
        assert_eq!(names, ["b"]);
    }
}
