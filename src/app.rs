// ============================================================================
// APP - Composición: sesión + resolvers + ubicación actual
// ============================================================================

use std::collections::HashMap;
use std::rc::Rc;
use crate::config::{AppConfig, Platform};
use crate::errors::{RouteTableError, SessionError};
use crate::models::auth::{Session, User};
use crate::models::deep_link::{Activation, DeepLinkTarget, ImportAttachment};
use crate::models::route::{NavItem, Resolution, Screen};
use crate::services::{DeepLinkResolver, RouteAccessResolver, RouteTable, SessionStorage};
use crate::state::AppState;
use crate::utils::constants::HANDLE_LINK_PATH;
use crate::utils::path::{normalize_path, query_of};

/// Aplicación principal
#[derive(Clone)]
pub struct App {
    state: AppState,
    navigator: Navigator,
}

impl App {
    /// Crear aplicación con la tabla de rutas de la plataforma configurada
    pub fn from_config(
        config: &AppConfig,
        storage: Rc<dyn SessionStorage>,
    ) -> Result<Self, RouteTableError> {
        let table = match config.platform {
            Platform::Web => RouteTable::web()?,
            Platform::Mobile => RouteTable::mobile()?,
        };
        Ok(Self::new(config, storage, table))
    }

    /// Crear aplicación con una tabla concreta
    pub fn new(config: &AppConfig, storage: Rc<dyn SessionStorage>, table: RouteTable) -> Self {
        let state = AppState::new(config, storage);
        let resolver = RouteAccessResolver::new(Rc::new(table), state.session.reader())
            .with_preferences(state.preferences.clone());

        let navigator = Navigator {
            state: state.clone(),
            resolver,
            deep_links: DeepLinkResolver::new(config.app_scheme.clone()),
        };

        // Cualquier cambio de sesión o de país re-evalúa la ubicación actual
        {
            let navigator = navigator.clone();
            state.session.subscribe(move || navigator.refresh());
        }
        {
            let navigator = navigator.clone();
            state.preferences.subscribe(move || navigator.refresh());
        }

        Self { state, navigator }
    }

    /// Restaurar preferencias y sesión, y resolver la ubicación inicial
    pub async fn start(&self, initial_location: &str) -> Resolution {
        log::info!("🚀 [APP] Iniciando en {}", initial_location);
        // Mientras se restaura, la ubicación queda registrada como Loading
        self.navigator.settle(initial_location);

        self.state.preferences.restore().await;
        self.state.session.restore().await;

        self.navigator.refresh();
        self.current_resolution()
    }

    /// Navegar a una ruta interna
    pub fn navigate(&self, requested: &str) -> Resolution {
        self.navigator.settle(requested)
    }

    /// Activación externa (protocolo, acción o archivo)
    pub fn handle_activation(&self, activation: Activation) -> Resolution {
        self.navigator.follow(&activation)
    }

    pub fn login(&self, token: impl Into<String>, user: User) -> Result<Resolution, SessionError> {
        self.state.session.login(token, user)?;
        Ok(self.current_resolution())
    }

    pub fn logout(&self) -> Resolution {
        self.state.session.logout();
        self.current_resolution()
    }

    pub fn select_country(&self, code: &str) -> Resolution {
        self.state.preferences.select_country(code);
        self.current_resolution()
    }

    pub fn session(&self) -> Session {
        self.state.session.current_session()
    }

    pub fn current_location(&self) -> String {
        self.state.location.get()
    }

    pub fn current_resolution(&self) -> Resolution {
        self.state.resolution.get()
    }

    pub fn current_screen(&self) -> Screen {
        self.state.resolution.borrow().screen()
    }

    pub fn navigation_items(&self) -> Vec<NavItem> {
        self.navigator.resolver.navigation_items()
    }

    /// Adjunto para la pantalla de importación (una sola vez)
    pub fn take_pending_import(&self) -> Option<ImportAttachment> {
        self.state.take_pending_import()
    }

    /// Suscribirse a cambios de la resolución actual (re-render)
    pub fn on_resolution_change<F>(&self, callback: F)
    where
        F: Fn() + 'static,
    {
        self.state.resolution.subscribe(callback);
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }
}

/// Lógica de navegación compartida con los subscribers
#[derive(Clone)]
struct Navigator {
    state: AppState,
    resolver: RouteAccessResolver,
    deep_links: DeepLinkResolver,
}

impl Navigator {
    /// Resolver una ubicación y registrarla; `/handle-link` se sigue una vez
    fn settle(&self, requested: &str) -> Resolution {
        let resolution = self.resolver.resolve(requested);

        if let Resolution::Render { screen: Screen::HandleLink, .. } = resolution {
            let activation = query_of(requested)
                .map(Activation::from_query)
                .unwrap_or_default();
            return self.follow(&activation);
        }

        self.commit(requested.to_string(), HashMap::new(), resolution)
    }

    /// Resolver un deep link y navegar a su destino
    fn follow(&self, activation: &Activation) -> Resolution {
        let mut target = self.deep_links.resolve(activation);

        if normalize_path(&target.path) == HANDLE_LINK_PATH {
            log::warn!("⚠️ [APP] Deep link hacia {}, se usa /", HANDLE_LINK_PATH);
            target = DeepLinkTarget::root();
        }

        if let Some(attachment) = target.attachment.take() {
            log::info!("📥 [APP] Import pendiente: {}", attachment.name);
            self.state.set_pending_import(attachment);
        }

        let resolution = self.resolver.resolve(&target.path);
        self.commit(target.path, target.params, resolution)
    }

    /// Re-evaluar la ubicación actual (cambio de sesión/preferencias).
    /// Los parámetros del deep link que la produjo se conservan.
    fn refresh(&self) {
        let location = self.state.location.get();
        let resolution = self.resolver.resolve(&location);

        if let Resolution::Render { screen: Screen::HandleLink, .. } = resolution {
            self.settle(&location);
            return;
        }

        let params = self.state.location_params.borrow().clone();
        let resolution = with_params(resolution, &params);
        if resolution != self.state.resolution.get() {
            self.commit(location, params, resolution);
        }
    }

    fn commit(
        &self,
        location: String,
        params: HashMap<String, String>,
        resolution: Resolution,
    ) -> Resolution {
        let resolution = with_params(resolution, &params);
        log::info!("🧭 [APP] {} → {}", location, resolution.screen().as_str());
        *self.state.location_params.borrow_mut() = params;
        self.state.location.set(location);
        self.state.resolution.set(resolution.clone());
        resolution
    }
}

/// Los parámetros de ruta tienen prioridad sobre los del deep link
fn with_params(resolution: Resolution, extra: &HashMap<String, String>) -> Resolution {
    match resolution {
        Resolution::Render { screen, mut params } => {
            for (key, value) in extra {
                params.entry(key.clone()).or_insert_with(|| value.clone());
            }
            Resolution::Render { screen, params }
        }
        other => other,
    }
}
