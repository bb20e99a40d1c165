// ============================================================================
// PREFERENCES STATE - Preferencias persistidas (país seleccionado)
// ============================================================================

use std::rc::Rc;
use crate::services::storage::SessionStorage;
use crate::state::ReactiveState;

/// Preferencias del usuario fuera de la sesión
#[derive(Clone)]
pub struct PreferencesState {
    selected_country: ReactiveState<Option<String>>,
    storage: Rc<dyn SessionStorage>,
    country_key: String,
}

impl PreferencesState {
    pub fn new(storage: Rc<dyn SessionStorage>, country_key: impl Into<String>) -> Self {
        Self {
            selected_country: ReactiveState::new(None),
            storage,
            country_key: country_key.into(),
        }
    }

    /// Cargar preferencias desde storage
    pub async fn restore(&self) {
        let country = match self.storage.load(&self.country_key) {
            Ok(value) => value.filter(|c| !c.trim().is_empty()),
            Err(e) => {
                log::warn!("⚠️ [PREFS] Error leyendo país: {}", e);
                None
            }
        };
        if let Some(ref code) = country {
            log::info!("🌍 [PREFS] País guardado: {}", code);
        }
        self.selected_country.set(country);
    }

    /// Establecer país y guardarlo
    pub fn select_country(&self, code: &str) {
        let code = code.trim().to_string();
        if code.is_empty() {
            return;
        }
        if let Err(e) = self.storage.save(&self.country_key, &code) {
            log::error!("❌ [PREFS] Error guardando país: {}", e);
        }
        self.selected_country.set(Some(code));
    }

    pub fn selected_country(&self) -> Option<String> {
        self.selected_country.get()
    }

    pub fn has_country(&self) -> bool {
        self.selected_country.borrow().is_some()
    }

    pub fn subscribe<F>(&self, callback: F)
    where
        F: Fn() + 'static,
    {
        self.selected_country.subscribe(callback);
    }
}
