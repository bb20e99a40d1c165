/// Esquema registrado para enlaces `web+sudanese-market://<ruta>`
/// Configurado en tiempo de compilación (APP_SCHEME), por defecto el de producción.
pub const DEFAULT_APP_SCHEME: &str = match option_env!("APP_SCHEME") {
    Some(scheme) => scheme,
    None => "web+sudanese-market",
};

/// Esquema de acciones (`web+bayt-sudani`), entregado como parámetro `action`
pub const ACTION_SCHEME: &str = "web+bayt-sudani";

// Claves de almacenamiento
pub const STORAGE_KEY_SESSION: &str = "auth_session";
pub const STORAGE_KEY_LEGACY_TOKEN: &str = "auth_token";
pub const STORAGE_KEY_COUNTRY: &str = "selectedCountry";

// Rutas con significado especial
pub const ROOT_PATH: &str = "/";
pub const HANDLE_LINK_PATH: &str = "/handle-link";
pub const IMPORT_DATA_PATH: &str = "/import-data";

// Parámetros de activación (query de /handle-link)
pub const PARAM_URL: &str = "url";
pub const PARAM_ACTION: &str = "action";
