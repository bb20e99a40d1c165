// ============================================================================
// APP STATE - Estado global de la aplicación
// ============================================================================

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use crate::config::AppConfig;
use crate::models::deep_link::ImportAttachment;
use crate::models::route::Resolution;
use crate::services::storage::SessionStorage;
use crate::state::{PreferencesState, ReactiveState, SessionStore};
use crate::utils::constants::ROOT_PATH;

/// Estado global de la aplicación
#[derive(Clone)]
pub struct AppState {
    pub session: SessionStore,
    pub preferences: PreferencesState,

    // Navegación
    /// Última ubicación solicitada (con query)
    pub location: ReactiveState<String>,
    /// Parámetros del último deep link (no forman parte de `location`)
    pub location_params: Rc<RefCell<HashMap<String, String>>>,
    pub resolution: ReactiveState<Resolution>,

    /// Archivo recibido por el file handler, pendiente de importar
    pub pending_import: Rc<RefCell<Option<ImportAttachment>>>,
}

impl AppState {
    /// Crear nuevo estado de aplicación
    pub fn new(config: &AppConfig, storage: Rc<dyn SessionStorage>) -> Self {
        let session = SessionStore::new(storage.clone(), config.session_storage_key.clone())
            .with_legacy_token_key(config.legacy_token_key.clone());
        let preferences = PreferencesState::new(storage, config.country_storage_key.clone());

        Self {
            session,
            preferences,
            location: ReactiveState::new(ROOT_PATH.to_string()),
            location_params: Rc::new(RefCell::new(HashMap::new())),
            resolution: ReactiveState::new(Resolution::Loading),
            pending_import: Rc::new(RefCell::new(None)),
        }
    }

    /// Guardar adjunto para la pantalla de importación (reemplaza el anterior)
    pub fn set_pending_import(&self, attachment: ImportAttachment) {
        *self.pending_import.borrow_mut() = Some(attachment);
    }

    /// Entregar el adjunto una sola vez
    pub fn take_pending_import(&self) -> Option<ImportAttachment> {
        self.pending_import.borrow_mut().take()
    }
}
