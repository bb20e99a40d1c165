// ============================================================================
// BAYT SUDANI PWA - NÚCLEO DE NAVEGACIÓN (RUST PURO)
// ============================================================================
// - State: sesión + preferencias con Rc<RefCell> y subscribers
// - Services: storage, tabla de rutas, resolvers de acceso y deep links
// - Models: sesión, rutas, activaciones
// - Platform: puente con window.location / history
// ============================================================================

pub mod config;
pub mod errors;
pub mod models;
pub mod state;
pub mod services;
pub mod utils;
pub mod platform;
pub mod app;

pub use app::App;
pub use config::{AppConfig, Platform, CONFIG};

#[cfg(target_arch = "wasm32")]
mod bindings {
    use std::cell::RefCell;
    use wasm_bindgen::prelude::*;
    use crate::app::App;
    use crate::config::CONFIG;
    use crate::models::auth::User;
    use crate::models::deep_link::Activation;
    use crate::models::route::Resolution;
    use crate::platform;
    use crate::services::default_storage;

    // Instancia global de la App
    thread_local! {
        static APP: RefCell<Option<App>> = RefCell::new(None);
    }

    #[wasm_bindgen(start)]
    pub fn main() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();

        if CONFIG.is_logging_enabled() {
            wasm_logger::init(wasm_logger::Config::new(CONFIG.log_level()));
        }
        log::info!("🚀 Bayt Sudani PWA - {:?} ({})", CONFIG.platform, CONFIG.environment);

        let app = App::from_config(&CONFIG, default_storage())
            .map_err(|e| JsValue::from(js_sys::Error::new(&e.to_string())))?;

        // Sincronizar barra de direcciones y avisar a la UI en cada cambio
        let resolution = app.state().resolution.clone();
        let location = app.state().location.clone();
        app.on_resolution_change(move || {
            let current = resolution.get();
            let location = location.get();
            if let Some(target) = platform::address_bar_target(&current, &location) {
                if platform::current_location() != target {
                    if let Err(e) = platform::replace_location(target) {
                        log::warn!("⚠️ [MAIN] No se pudo reemplazar la URL: {}", e);
                    }
                }
            }
            if let Err(e) = platform::dispatch_screen_changed(current.screen().as_str()) {
                log::warn!("⚠️ [MAIN] No se pudo emitir screenChanged: {}", e);
            }
        });

        APP.with(|cell| {
            *cell.borrow_mut() = Some(app.clone());
        });

        let location = platform::current_location();
        wasm_bindgen_futures::spawn_local(async move {
            let resolution = app.start(&location).await;
            log::info!("✅ [MAIN] Pantalla inicial: {}", resolution.screen().as_str());
        });

        Ok(())
    }

    fn app() -> Result<App, JsValue> {
        APP.with(|cell| cell.borrow().clone())
            .ok_or_else(|| JsValue::from(js_sys::Error::new("App no está inicializada")))
    }

    fn screen_of(resolution: &Resolution) -> String {
        resolution.screen().as_str().to_string()
    }

    /// Navegación interna desde JavaScript; devuelve la pantalla resultante.
    /// La entrada de historial se crea antes; redirecciones y deep links la reemplazan.
    #[wasm_bindgen]
    pub fn navigate_to(path: &str) -> Result<String, JsValue> {
        let app = app()?;
        if let Err(e) = platform::push_location(path) {
            log::warn!("⚠️ [MAIN] No se pudo actualizar el historial: {}", e);
        }
        Ok(screen_of(&app.navigate(path)))
    }

    /// Archivo recibido por el file handler del manifest
    #[wasm_bindgen]
    pub fn handle_file_open(file: web_sys::File) -> Result<String, JsValue> {
        let activation = Activation::from_file(platform::file_open_event(file));
        Ok(screen_of(&app()?.handle_activation(activation)))
    }

    /// Login con token y usuario serializado (JSON)
    #[wasm_bindgen]
    pub fn login_with(token: &str, user_json: &str) -> Result<String, JsValue> {
        let user: User = serde_json::from_str(user_json)
            .map_err(|e| JsValue::from(js_sys::Error::new(&e.to_string())))?;
        let resolution = app()?
            .login(token, user)
            .map_err(|e| JsValue::from(js_sys::Error::new(&e.to_string())))?;
        Ok(screen_of(&resolution))
    }

    #[wasm_bindgen]
    pub fn logout() -> Result<String, JsValue> {
        Ok(screen_of(&app()?.logout()))
    }

    #[wasm_bindgen]
    pub fn select_country(code: &str) -> Result<String, JsValue> {
        Ok(screen_of(&app()?.select_country(code)))
    }

    #[wasm_bindgen]
    pub fn current_screen() -> Result<String, JsValue> {
        Ok(app()?.current_screen().as_str().to_string())
    }

    /// Menú visible para la sesión actual (JSON)
    #[wasm_bindgen]
    pub fn navigation_items() -> Result<String, JsValue> {
        serde_json::to_string(&app()?.navigation_items())
            .map_err(|e| JsValue::from(js_sys::Error::new(&e.to_string())))
    }
}
