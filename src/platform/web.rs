use wasm_bindgen::JsValue;
use crate::errors::PlatformError;
use crate::models::deep_link::{FileHandle, FileOpenEvent};
use crate::utils::constants::ROOT_PATH;

/// Ruta + query actuales del navegador
pub fn current_location() -> String {
    let Some(location) = web_sys::window().map(|w| w.location()) else {
        return ROOT_PATH.to_string();
    };

    let pathname = location.pathname().unwrap_or_else(|_| ROOT_PATH.to_string());
    let search = location.search().unwrap_or_default();
    format!("{}{}", pathname, search)
}

/// Reemplazar la entrada actual del historial (redirecciones)
pub fn replace_location(path: &str) -> Result<(), PlatformError> {
    let window = web_sys::window().ok_or(PlatformError::NoWindow)?;
    let history = window.history().map_err(PlatformError::from_js)?;
    history
        .replace_state_with_url(&JsValue::NULL, "", Some(path))
        .map_err(PlatformError::from_js)
}

/// Añadir entrada al historial (navegación normal)
pub fn push_location(path: &str) -> Result<(), PlatformError> {
    let window = web_sys::window().ok_or(PlatformError::NoWindow)?;
    let history = window.history().map_err(PlatformError::from_js)?;
    history
        .push_state_with_url(&JsValue::NULL, "", Some(path))
        .map_err(PlatformError::from_js)
}

/// Convertir un File del file handler en un evento de apertura
pub fn file_open_event(file: web_sys::File) -> FileOpenEvent {
    let mime = file.type_();
    FileOpenEvent {
        name: file.name(),
        size: file.size() as u64,
        mime_type: if mime.trim().is_empty() { None } else { Some(mime) },
        handle: FileHandle::new(file),
    }
}

/// Avisar a la UI de que la pantalla cambió
pub fn dispatch_screen_changed(screen: &str) -> Result<(), PlatformError> {
    let window = web_sys::window().ok_or(PlatformError::NoWindow)?;
    let init = web_sys::CustomEventInit::new();
    init.set_detail(&JsValue::from_str(screen));
    let event = web_sys::CustomEvent::new_with_event_init_dict("screenChanged", &init)
        .map_err(PlatformError::from_js)?;
    window
        .dispatch_event(&event)
        .map(|_| ())
        .map_err(PlatformError::from_js)
}
