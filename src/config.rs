use serde::{Deserialize, Serialize};
use crate::utils::constants::{
    DEFAULT_APP_SCHEME, STORAGE_KEY_COUNTRY, STORAGE_KEY_LEGACY_TOKEN, STORAGE_KEY_SESSION,
};

/// Variante de navegación a cargar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Web,
    Mobile,
}

impl Platform {
    fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "mobile" => Platform::Mobile,
            _ => Platform::Web,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: String,
    pub enable_logging: bool,
    pub log_level: String,
    pub platform: Platform,
    pub app_scheme: String,
    pub session_storage_key: String,
    pub legacy_token_key: String,
    pub country_storage_key: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            enable_logging: true,
            log_level: "info".to_string(),
            platform: Platform::Web,
            app_scheme: DEFAULT_APP_SCHEME.to_string(),
            session_storage_key: STORAGE_KEY_SESSION.to_string(),
            legacy_token_key: STORAGE_KEY_LEGACY_TOKEN.to_string(),
            country_storage_key: STORAGE_KEY_COUNTRY.to_string(),
        }
    }
}

impl AppConfig {
    /// Carga la configuración desde variables de entorno en tiempo de compilación
    pub fn from_env() -> Self {
        Self {
            environment: option_env!("ENVIRONMENT")
                .unwrap_or("development").to_string(),
            enable_logging: option_env!("ENABLE_LOGGING")
                .unwrap_or("true").parse().unwrap_or(true),
            log_level: option_env!("LOG_LEVEL")
                .unwrap_or("info").to_string(),
            platform: Platform::parse(option_env!("APP_PLATFORM").unwrap_or("web")),
            app_scheme: DEFAULT_APP_SCHEME.to_string(),
            session_storage_key: option_env!("SESSION_STORAGE_KEY")
                .unwrap_or(STORAGE_KEY_SESSION).to_string(),
            legacy_token_key: STORAGE_KEY_LEGACY_TOKEN.to_string(),
            country_storage_key: option_env!("COUNTRY_STORAGE_KEY")
                .unwrap_or(STORAGE_KEY_COUNTRY).to_string(),
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Verifica si el modo de logging está habilitado
    pub fn is_logging_enabled(&self) -> bool {
        self.enable_logging
    }

    /// Nivel de log; valores desconocidos → info
    pub fn log_level(&self) -> log::Level {
        self.log_level.parse().unwrap_or(log::Level::Info)
    }
}

// Configuración global estática
lazy_static::lazy_static! {
    pub static ref CONFIG: AppConfig = AppConfig::from_env();
}
