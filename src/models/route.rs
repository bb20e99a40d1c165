use std::collections::{HashMap, HashSet};
use serde::{Deserialize, Serialize};
use crate::models::auth::Role;

/// Identificador de pantalla entregado a la capa de render
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Screen {
    // Comunes
    Loading,
    NotFound,
    Landing,
    Home,
    Marketplace,
    Stores,
    Restaurants,
    Services,
    Jobs,
    Announcements,
    Profile,
    Login,
    Register,
    AdminDashboard,
    StoreDetails,
    MerchantDashboard,
    CreateProduct,
    CreateStore,
    HandleLink,
    ImportData,
    // App móvil
    CountrySelection,
}

impl Screen {
    pub fn as_str(&self) -> &'static str {
        match self {
            Screen::Loading => "loading",
            Screen::NotFound => "not-found",
            Screen::Landing => "landing",
            Screen::Home => "home",
            Screen::Marketplace => "marketplace",
            Screen::Stores => "stores",
            Screen::Restaurants => "restaurants",
            Screen::Services => "services",
            Screen::Jobs => "jobs",
            Screen::Announcements => "announcements",
            Screen::Profile => "profile",
            Screen::Login => "login",
            Screen::Register => "register",
            Screen::AdminDashboard => "admin-dashboard",
            Screen::StoreDetails => "store-details",
            Screen::MerchantDashboard => "merchant-dashboard",
            Screen::CreateProduct => "create-product",
            Screen::CreateStore => "create-store",
            Screen::HandleLink => "handle-link",
            Screen::ImportData => "import-data",
            Screen::CountrySelection => "country-selection",
        }
    }
}

/// Regla de visibilidad de una ruta
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Visibility {
    Public,
    Authenticated,
    RoleRestricted(HashSet<Role>),
}

impl Visibility {
    pub fn roles(roles: &[Role]) -> Self {
        Visibility::RoleRestricted(roles.iter().copied().collect())
    }
}

/// Declaración estática de una ruta navegable
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteDescriptor {
    pub path: &'static str,
    pub visibility: Visibility,
    pub screen: Screen,
    /// Etiqueta del menú de navegación (si la ruta aparece en él)
    pub nav_label: Option<&'static str>,
}

impl RouteDescriptor {
    pub fn public(path: &'static str, screen: Screen) -> Self {
        Self {
            path,
            visibility: Visibility::Public,
            screen,
            nav_label: None,
        }
    }

    pub fn authenticated(path: &'static str, screen: Screen) -> Self {
        Self {
            visibility: Visibility::Authenticated,
            ..Self::public(path, screen)
        }
    }

    pub fn restricted(path: &'static str, screen: Screen, roles: &[Role]) -> Self {
        Self {
            visibility: Visibility::roles(roles),
            ..Self::public(path, screen)
        }
    }

    pub fn with_nav_label(mut self, label: &'static str) -> Self {
        self.nav_label = Some(label);
        self
    }
}

/// Resultado de evaluar una navegación
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Restauración de sesión en curso: solo el placeholder
    Loading,
    Render {
        screen: Screen,
        params: HashMap<String, String>,
    },
    /// Acceso denegado o precondición pendiente
    Redirect { to: String, screen: Screen },
    NotFound,
}

impl Resolution {
    pub fn render(screen: Screen) -> Self {
        Resolution::Render {
            screen,
            params: HashMap::new(),
        }
    }

    /// Pantalla que debe mostrarse finalmente
    pub fn screen(&self) -> Screen {
        match self {
            Resolution::Loading => Screen::Loading,
            Resolution::Render { screen, .. } => *screen,
            Resolution::Redirect { screen, .. } => *screen,
            Resolution::NotFound => Screen::NotFound,
        }
    }

    pub fn is_redirect(&self) -> bool {
        matches!(self, Resolution::Redirect { .. })
    }
}

/// Entrada del menú de navegación visible para la sesión actual
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavItem {
    pub path: &'static str,
    pub label: &'static str,
    pub screen: Screen,
}
