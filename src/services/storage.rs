// ============================================================================
// STORAGE - Almacenamiento clave/valor persistente
// ============================================================================
// localStorage en el navegador, memoria como fallback (modo privado, tests)
// ============================================================================

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use serde::{de::DeserializeOwned, Serialize};
use crate::errors::StorageError;

/// Backend de almacenamiento de cadenas
pub trait SessionStorage {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn save(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Carga y deserializa un valor JSON. Ausente o corrupto → `None`.
pub fn load_json<T: DeserializeOwned>(storage: &dyn SessionStorage, key: &str) -> Option<T> {
    let raw = match storage.load(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            log::warn!("⚠️ [STORAGE] No se pudo leer {}: {}", key, e);
            return None;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            log::warn!("⚠️ [STORAGE] Valor corrupto en {}: {}", key, e);
            None
        }
    }
}

/// Serializa y guarda un valor JSON
pub fn save_json<T: Serialize>(
    storage: &dyn SessionStorage,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let json = serde_json::to_string(value)?;
    storage.save(key, &json)
}

/// Almacenamiento en memoria
#[derive(Clone, Default)]
pub struct MemoryStorage {
    entries: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.borrow().contains_key(key)
    }
}

impl SessionStorage for MemoryStorage {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn save(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

/// localStorage del navegador
#[cfg(target_arch = "wasm32")]
pub struct LocalStorage;

#[cfg(target_arch = "wasm32")]
impl LocalStorage {
    /// Comprueba que localStorage es accesible (falla en algunos modos privados)
    pub fn is_available() -> bool {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .is_some()
    }
}

#[cfg(target_arch = "wasm32")]
impl SessionStorage for LocalStorage {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        use gloo_storage::Storage;

        gloo_storage::LocalStorage::raw()
            .get_item(key)
            .map_err(|e| StorageError::Read {
                key: key.to_string(),
                message: format!("{:?}", e),
            })
    }

    fn save(&self, key: &str, value: &str) -> Result<(), StorageError> {
        use gloo_storage::Storage;

        gloo_storage::LocalStorage::raw()
            .set_item(key, value)
            .map_err(|e| StorageError::Write {
                key: key.to_string(),
                message: format!("{:?}", e),
            })
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        use gloo_storage::Storage;

        gloo_storage::LocalStorage::raw()
            .remove_item(key)
            .map_err(|e| StorageError::Remove {
                key: key.to_string(),
                message: format!("{:?}", e),
            })
    }
}

/// Backend por defecto de la plataforma
pub fn default_storage() -> Rc<dyn SessionStorage> {
    #[cfg(target_arch = "wasm32")]
    {
        if LocalStorage::is_available() {
            return Rc::new(LocalStorage);
        }
        log::warn!("⚠️ [STORAGE] localStorage no disponible, usando memoria");
    }

    Rc::new(MemoryStorage::new())
}
