// ============================================================================
// SESSION STATE - Dueño único de la sesión y de su persistencia
// ============================================================================

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use crate::errors::SessionError;
use crate::models::auth::{Credentials, PersistedSession, Role, Session, User};
use crate::services::storage::{load_json, save_json, SessionStorage};
use crate::state::ReactiveState;

/// Store de sesión. Es el único escritor; los resolvers reciben un
/// `SessionReader` que comparte la misma celda.
#[derive(Clone)]
pub struct SessionStore {
    state: ReactiveState<Session>,
    storage: Rc<dyn SessionStorage>,
    storage_key: String,
    legacy_token_key: Option<String>,
    restored: Rc<Cell<bool>>,
}

impl SessionStore {
    /// Crear store vacío (cargando) sobre un backend de almacenamiento
    pub fn new(storage: Rc<dyn SessionStorage>, storage_key: impl Into<String>) -> Self {
        Self {
            state: ReactiveState::new(Session::loading()),
            storage,
            storage_key: storage_key.into(),
            legacy_token_key: None,
            restored: Rc::new(Cell::new(false)),
        }
    }

    /// Clave antigua (`auth_token`) que también se borra en logout
    pub fn with_legacy_token_key(mut self, key: impl Into<String>) -> Self {
        self.legacy_token_key = Some(key.into());
        self
    }

    /// Restaurar la sesión persistida. Solo la primera llamada tiene efecto;
    /// cualquier fallo deja una sesión vacía.
    pub async fn restore(&self) {
        if self.restored.replace(true) {
            log::warn!("⚠️ [SESSION] restore() ya se ejecutó, se ignora");
            return;
        }

        let persisted = load_json::<PersistedSession>(self.storage.as_ref(), &self.storage_key)
            .and_then(PersistedSession::into_credentials);

        self.state.update(|session| {
            if session.credentials.is_some() {
                // Un login llegó antes que la restauración: manda la memoria
                log::info!("ℹ️ [SESSION] Login previo a la restauración, se conserva");
            } else if let Some(credentials) = persisted {
                log::info!(
                    "💾 [SESSION] Sesión restaurada para {} ({})",
                    credentials.user.username,
                    credentials.user.role.as_str()
                );
                session.credentials = Some(credentials);
            } else {
                log::info!("ℹ️ [SESSION] No hay sesión guardada");
            }
            session.is_loading = false;
            true
        });
    }

    /// Login: reemplaza token y usuario de una vez y persiste.
    /// Un fallo de escritura se registra pero no revierte la memoria.
    pub fn login(&self, token: impl Into<String>, user: User) -> Result<(), SessionError> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(SessionError::EmptyToken);
        }
        if user.username.trim().is_empty() {
            return Err(SessionError::InvalidUser("username vacío".to_string()));
        }

        let credentials = Credentials { token, user };
        let record = PersistedSession::from_credentials(&credentials);
        log::info!(
            "🔐 [SESSION] Login de {} ({})",
            credentials.user.username,
            credentials.user.role.as_str()
        );

        self.state.update(|session| {
            session.credentials = Some(credentials);
            true
        });

        if let Err(e) = save_json(self.storage.as_ref(), &self.storage_key, &record) {
            log::error!("❌ [SESSION] Error guardando sesión en storage: {}", e);
        }

        Ok(())
    }

    /// Logout idempotente: limpia memoria y storage
    pub fn logout(&self) {
        let changed = self.state.update(|session| session.credentials.take().is_some());

        if let Err(e) = self.storage.remove(&self.storage_key) {
            log::error!("❌ [SESSION] Error eliminando sesión de storage: {}", e);
        }
        if let Some(ref legacy) = self.legacy_token_key {
            if let Err(e) = self.storage.remove(legacy) {
                log::error!("❌ [SESSION] Error eliminando {}: {}", legacy, e);
            }
        }

        if changed {
            log::info!("👋 [SESSION] Logout");
        }
    }

    /// Copia de la sesión actual (válida incluso antes de restore)
    pub fn current_session(&self) -> Session {
        self.state.get()
    }

    /// Handle de solo lectura para los resolvers
    pub fn reader(&self) -> SessionReader {
        SessionReader {
            session: self.state.shared(),
        }
    }

    /// Suscribirse a cambios observables de la sesión
    pub fn subscribe<F>(&self, callback: F)
    where
        F: Fn() + 'static,
    {
        self.state.subscribe(callback);
    }
}

/// Vista de solo lectura de la sesión
#[derive(Clone)]
pub struct SessionReader {
    session: Rc<RefCell<Session>>,
}

impl SessionReader {
    pub fn snapshot(&self) -> Session {
        self.session.borrow().clone()
    }

    pub fn is_loading(&self) -> bool {
        self.session.borrow().is_loading
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.borrow().is_authenticated()
    }

    pub fn role(&self) -> Option<Role> {
        self.session.borrow().role()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use crate::services::storage::test_support::FailingStorage;
    use crate::services::storage::MemoryStorage;

    const KEY: &str = "auth_session";

    fn user(role: Role) -> User {
        User {
            id: 3,
            username: "mohamed".to_string(),
            email: "mohamed@example.sd".to_string(),
            full_name: "Mohamed Ali".to_string(),
            phone: None,
            role,
        }
    }

    fn store_with(storage: &MemoryStorage) -> SessionStore {
        SessionStore::new(Rc::new(storage.clone()), KEY)
    }

    #[test]
    fn test_starts_empty_and_loading() {
        let store = store_with(&MemoryStorage::new());
        let session = store.current_session();
        assert!(session.is_loading);
        assert!(!session.is_authenticated());
    }

    #[test]
    fn test_login_is_visible_immediately_and_persisted() {
        let storage = MemoryStorage::new();
        let store = store_with(&storage);

        store.login("tok-1", user(Role::Merchant)).unwrap();

        let session = store.current_session();
        assert_eq!(session.token(), Some("tok-1"));
        assert_eq!(session.user(), Some(&user(Role::Merchant)));
        assert!(session.is_authenticated());

        let record: PersistedSession = load_json(&storage, KEY).unwrap();
        assert_eq!(record.token, "tok-1");
    }

    #[test]
    fn test_login_rejects_blank_arguments() {
        let store = store_with(&MemoryStorage::new());
        assert_eq!(store.login("  ", user(Role::Admin)), Err(SessionError::EmptyToken));

        let mut nameless = user(Role::Admin);
        nameless.username = String::new();
        assert!(matches!(
            store.login("tok", nameless),
            Err(SessionError::InvalidUser(_))
        ));
        assert!(!store.current_session().is_authenticated());
    }

    #[test]
    fn test_write_failure_keeps_memory_state() {
        let storage = FailingStorage {
            fail_writes: true,
            ..FailingStorage::default()
        };
        let storage = Rc::new(storage);
        let store = SessionStore::new(storage.clone(), KEY);

        store.login("tok", user(Role::Customer)).unwrap();

        assert_eq!(storage.write_attempts.get(), 1);
        assert!(store.current_session().is_authenticated());
    }

    #[test]
    fn test_restore_reads_persisted_session_once() {
        let storage = MemoryStorage::new();
        store_with(&storage).login("tok-9", user(Role::Admin)).unwrap();

        let store = store_with(&storage);
        block_on(store.restore());

        let session = store.current_session();
        assert!(!session.is_loading);
        assert_eq!(session.token(), Some("tok-9"));
        assert_eq!(session.role(), Some(Role::Admin));

        // Una segunda restauración no pisa un logout posterior
        store.logout();
        block_on(store.restore());
        assert!(!store.current_session().is_authenticated());
    }

    #[test]
    fn test_restore_without_record_or_with_garbage_is_empty() {
        let storage = MemoryStorage::new();
        let store = store_with(&storage);
        block_on(store.restore());
        assert_eq!(
            store.current_session(),
            Session {
                credentials: None,
                is_loading: false
            }
        );

        storage.save(KEY, "{\"token\": 12").unwrap();
        let store = store_with(&storage);
        block_on(store.restore());
        assert!(!store.current_session().is_loading);
        assert!(!store.current_session().is_authenticated());
    }

    #[test]
    fn test_restore_with_read_failure_is_empty() {
        let storage = FailingStorage {
            fail_reads: true,
            ..FailingStorage::default()
        };
        let store = SessionStore::new(Rc::new(storage), KEY);
        block_on(store.restore());
        assert!(!store.current_session().is_loading);
        assert!(!store.current_session().is_authenticated());
    }

    #[test]
    fn test_login_before_restore_wins() {
        let storage = MemoryStorage::new();
        store_with(&storage).login("old", user(Role::Customer)).unwrap();

        let store = store_with(&storage);
        store.login("new", user(Role::Admin)).unwrap();
        block_on(store.restore());

        assert_eq!(store.current_session().token(), Some("new"));
        assert!(!store.current_session().is_loading);
    }

    #[test]
    fn test_logout_clears_memory_storage_and_legacy_key() {
        let storage = MemoryStorage::new();
        storage.save("auth_token", "legacy").unwrap();
        let store = store_with(&storage).with_legacy_token_key("auth_token");

        store.login("tok", user(Role::Customer)).unwrap();
        store.logout();

        assert!(!store.current_session().is_authenticated());
        assert!(!storage.contains(KEY));
        assert!(!storage.contains("auth_token"));
    }

    #[test]
    fn test_restore_accepts_record_without_timestamp() {
        let storage = MemoryStorage::new();
        storage
            .save(KEY, r#"{"token":"tok","user":{"id":1,"username":"amna","role":"customer"}}"#)
            .unwrap();

        let store = store_with(&storage);
        block_on(store.restore());

        let session = store.current_session();
        assert!(session.is_authenticated());
        assert_eq!(session.token(), Some("tok"));
        assert_eq!(session.role(), Some(Role::Customer));
    }

    #[test]
    fn test_logout_clears_memory_even_if_remove_fails() {
        let storage = Rc::new(FailingStorage {
            fail_writes: true,
            ..FailingStorage::default()
        });
        let store = SessionStore::new(storage.clone(), KEY).with_legacy_token_key("auth_token");
        block_on(store.restore());
        store.login("tok", user(Role::Merchant)).unwrap();

        store.logout();

        let session = store.current_session();
        assert!(!session.is_authenticated());
        assert!(session.user().is_none());
        assert!(!session.is_loading);
    }

    #[test]
    fn test_logout_twice_is_same_as_once() {
        let store = store_with(&MemoryStorage::new());
        block_on(store.restore());
        store.login("tok", user(Role::Customer)).unwrap();

        store.logout();
        let once = store.current_session();
        store.logout();
        assert_eq!(store.current_session(), once);
    }

    #[test]
    fn test_subscribers_fire_only_on_observable_change() {
        let store = store_with(&MemoryStorage::new());
        let hits = Rc::new(Cell::new(0));
        let counter = hits.clone();
        store.subscribe(move || counter.set(counter.get() + 1));

        store.logout();
        assert_eq!(hits.get(), 0);

        store.login("tok", user(Role::Customer)).unwrap();
        store.logout();
        store.logout();
        assert_eq!(hits.get(), 2);
    }

    #[test]
    fn test_reader_tracks_writer() {
        let store = store_with(&MemoryStorage::new());
        let reader = store.reader();
        assert!(reader.is_loading());

        block_on(store.restore());
        store.login("tok", user(Role::StoreOwner)).unwrap();

        assert!(!reader.is_loading());
        assert!(reader.is_authenticated());
        assert_eq!(reader.role(), Some(Role::StoreOwner));
        assert_eq!(reader.snapshot(), store.current_session());
    }
}
