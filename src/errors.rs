// ============================================================================
// ERRORS - Tipos de error del núcleo de navegación
// ============================================================================

use thiserror::Error;

/// Errores del almacenamiento persistente (localStorage / memoria)
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("almacenamiento no disponible")]
    Unavailable,

    #[error("error leyendo la clave {key}: {message}")]
    Read { key: String, message: String },

    #[error("error escribiendo la clave {key}: {message}")]
    Write { key: String, message: String },

    #[error("error eliminando la clave {key}: {message}")]
    Remove { key: String, message: String },

    #[error("error de serialización: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errores de las transiciones de sesión
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("el token de sesión está vacío")]
    EmptyToken,

    #[error("usuario inválido: {0}")]
    InvalidUser(String),
}

/// Errores al construir la tabla de rutas
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouteTableError {
    #[error("patrón de ruta inválido: {0}")]
    InvalidPattern(String),

    #[error("ruta declarada dos veces: {0}")]
    DuplicatePath(String),

    #[error("la ruta de aterrizaje {0} no está declarada")]
    MissingLanding(String),

    #[error("la ruta {0} debe ser pública")]
    NotPublic(String),

    #[error("la ruta de onboarding {0} no está declarada")]
    MissingOnboarding(String),
}

/// Errores del puente con el navegador
#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("window no disponible")]
    NoWindow,

    #[error("error JS: {0}")]
    Js(String),
}

impl PlatformError {
    #[cfg(target_arch = "wasm32")]
    pub fn from_js(value: wasm_bindgen::JsValue) -> Self {
        PlatformError::Js(value.as_string().unwrap_or_else(|| format!("{:?}", value)))
    }
}
