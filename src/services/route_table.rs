// ============================================================================
// ROUTE TABLE - Tabla estática de rutas (datos, no control de flujo)
// ============================================================================

use std::collections::{HashMap, HashSet};
use crate::errors::RouteTableError;
use crate::models::auth::Role;
use crate::models::route::{RouteDescriptor, Screen, Visibility};
use crate::utils::path::PathPattern;

const SELLERS: &[Role] = &[Role::Admin, Role::Merchant, Role::StoreOwner];

/// Ruta con su patrón compilado
#[derive(Debug, Clone)]
pub struct CompiledRoute {
    pub descriptor: RouteDescriptor,
    pub pattern: PathPattern,
}

/// Pantallas que sustituyen a `/` según autenticación
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RootScreens {
    pub unauthenticated: Screen,
    pub authenticated: Screen,
}

/// Tabla de rutas validada e inmutable
#[derive(Debug, Clone)]
pub struct RouteTable {
    /// Orden de declaración
    routes: Vec<CompiledRoute>,
    /// Índices en orden de matching (prefijo literal más largo primero)
    match_order: Vec<usize>,
    landing_path: &'static str,
    landing_screen: Screen,
    root: RootScreens,
    onboarding: Option<(&'static str, Screen)>,
}

/// Match de una ruta solicitada
#[derive(Debug, Clone)]
pub struct RouteMatch<'a> {
    pub route: &'a RouteDescriptor,
    pub params: HashMap<String, String>,
}

impl RouteTable {
    pub fn builder() -> RouteTableBuilder {
        RouteTableBuilder::default()
    }

    /// Primer match completo, probando antes los prefijos literales más largos
    pub fn find(&self, path: &str) -> Option<RouteMatch<'_>> {
        self.match_order.iter().find_map(|&idx| {
            let route = &self.routes[idx];
            route.pattern.matches(path).map(|params| RouteMatch {
                route: &route.descriptor,
                params,
            })
        })
    }

    /// Rutas en orden de declaración
    pub fn routes(&self) -> impl Iterator<Item = &RouteDescriptor> {
        self.routes.iter().map(|r| &r.descriptor)
    }

    pub fn landing_path(&self) -> &'static str {
        self.landing_path
    }

    pub fn landing_screen(&self) -> Screen {
        self.landing_screen
    }

    pub fn root(&self) -> RootScreens {
        self.root
    }

    pub fn onboarding(&self) -> Option<(&'static str, Screen)> {
        self.onboarding
    }

    /// Router del PWA web
    pub fn web() -> Result<Self, RouteTableError> {
        Self::builder()
            .route(RouteDescriptor::public("/", Screen::Landing).with_nav_label("الرئيسية"))
            .route(RouteDescriptor::public("/marketplace", Screen::Marketplace).with_nav_label("السوق"))
            .route(RouteDescriptor::public("/stores", Screen::Stores).with_nav_label("المتاجر"))
            .route(RouteDescriptor::public("/restaurants", Screen::Restaurants).with_nav_label("المطاعم"))
            .route(RouteDescriptor::public("/services", Screen::Services).with_nav_label("الخدمات"))
            .route(RouteDescriptor::public("/jobs", Screen::Jobs).with_nav_label("الوظائف"))
            .route(RouteDescriptor::public("/announcements", Screen::Announcements).with_nav_label("الإعلانات"))
            .route(RouteDescriptor::authenticated("/profile", Screen::Profile).with_nav_label("الملف الشخصي"))
            .route(RouteDescriptor::restricted("/admin/dashboard", Screen::AdminDashboard, &[Role::Admin]).with_nav_label("لوحة الإدارة"))
            .route(RouteDescriptor::restricted("/admin/stores/:id", Screen::StoreDetails, &[Role::Admin]))
            .route(RouteDescriptor::restricted("/merchant/dashboard", Screen::MerchantDashboard, &[Role::Merchant, Role::StoreOwner]).with_nav_label("لوحة التاجر"))
            .route(RouteDescriptor::restricted("/stores/create", Screen::CreateStore, SELLERS).with_nav_label("إنشاء متجر"))
            .route(RouteDescriptor::restricted("/products/create", Screen::CreateProduct, SELLERS).with_nav_label("إضافة منتج"))
            .route(RouteDescriptor::public("/auth/landing", Screen::Landing))
            .route(RouteDescriptor::public("/auth/login", Screen::Login))
            .route(RouteDescriptor::public("/auth/register", Screen::Register))
            .route(RouteDescriptor::public("/handle-link", Screen::HandleLink))
            .route(RouteDescriptor::public("/import-data", Screen::ImportData))
            .landing("/auth/landing")
            .root(Screen::Landing, Screen::Home)
            .build()
    }

    /// Navegación de la app móvil: login como aterrizaje, selección de país
    /// como onboarding y todo el contenido tras autenticación
    pub fn mobile() -> Result<Self, RouteTableError> {
        Self::builder()
            .route(RouteDescriptor::public("/country", Screen::CountrySelection))
            .route(RouteDescriptor::public("/login", Screen::Login))
            .route(RouteDescriptor::authenticated("/", Screen::Home).with_nav_label("الرئيسية"))
            .route(RouteDescriptor::authenticated("/marketplace", Screen::Marketplace).with_nav_label("المتاجر"))
            .route(RouteDescriptor::authenticated("/services", Screen::Services).with_nav_label("الخدمات"))
            .route(RouteDescriptor::authenticated("/jobs", Screen::Jobs).with_nav_label("الوظائف"))
            .route(RouteDescriptor::authenticated("/announcements", Screen::Announcements).with_nav_label("الإعلانات"))
            .route(RouteDescriptor::authenticated("/profile", Screen::Profile).with_nav_label("الملف الشخصي"))
            .route(RouteDescriptor::authenticated("/stores/:id", Screen::StoreDetails))
            .route(RouteDescriptor::restricted("/stores/create", Screen::CreateStore, SELLERS))
            .route(RouteDescriptor::restricted("/products/create", Screen::CreateProduct, SELLERS))
            .route(RouteDescriptor::public("/handle-link", Screen::HandleLink))
            .route(RouteDescriptor::authenticated("/import-data", Screen::ImportData))
            .landing("/login")
            .root(Screen::Login, Screen::Home)
            .onboarding("/country")
            .build()
    }
}

/// Constructor con validación
#[derive(Debug, Default)]
pub struct RouteTableBuilder {
    routes: Vec<RouteDescriptor>,
    landing: Option<&'static str>,
    root: Option<RootScreens>,
    onboarding: Option<&'static str>,
}

impl RouteTableBuilder {
    pub fn route(mut self, descriptor: RouteDescriptor) -> Self {
        self.routes.push(descriptor);
        self
    }

    pub fn landing(mut self, path: &'static str) -> Self {
        self.landing = Some(path);
        self
    }

    pub fn root(mut self, unauthenticated: Screen, authenticated: Screen) -> Self {
        self.root = Some(RootScreens {
            unauthenticated,
            authenticated,
        });
        self
    }

    pub fn onboarding(mut self, path: &'static str) -> Self {
        self.onboarding = Some(path);
        self
    }

    pub fn build(self) -> Result<RouteTable, RouteTableError> {
        let mut seen = HashSet::new();
        let mut routes = Vec::with_capacity(self.routes.len());

        for descriptor in self.routes {
            let pattern = PathPattern::parse(descriptor.path)
                .ok_or_else(|| RouteTableError::InvalidPattern(descriptor.path.to_string()))?;
            if !seen.insert(descriptor.path) {
                return Err(RouteTableError::DuplicatePath(descriptor.path.to_string()));
            }
            routes.push(CompiledRoute { descriptor, pattern });
        }

        // Orden estable: a igual prefijo literal se respeta la declaración
        let mut match_order: Vec<usize> = (0..routes.len()).collect();
        match_order.sort_by_key(|&idx| std::cmp::Reverse(routes[idx].pattern.literal_prefix_len()));

        let landing_path = self.landing.unwrap_or("/");
        let landing_screen = Self::public_screen(&routes, landing_path)
            .map_err(|missing| match missing {
                true => RouteTableError::MissingLanding(landing_path.to_string()),
                false => RouteTableError::NotPublic(landing_path.to_string()),
            })?;

        let onboarding = match self.onboarding {
            Some(path) => {
                let screen = Self::public_screen(&routes, path).map_err(|missing| match missing {
                    true => RouteTableError::MissingOnboarding(path.to_string()),
                    false => RouteTableError::NotPublic(path.to_string()),
                })?;
                Some((path, screen))
            }
            None => None,
        };

        let root = self.root.unwrap_or(RootScreens {
            unauthenticated: landing_screen,
            authenticated: landing_screen,
        });

        Ok(RouteTable {
            routes,
            match_order,
            landing_path,
            landing_screen,
            root,
            onboarding,
        })
    }

    /// Pantalla de una ruta declarada y pública. `Err(true)` si no existe,
    /// `Err(false)` si no es pública.
    fn public_screen(routes: &[CompiledRoute], path: &str) -> Result<Screen, bool> {
        let route = routes
            .iter()
            .find(|r| r.descriptor.path == path)
            .ok_or(true)?;
        match route.descriptor.visibility {
            Visibility::Public => Ok(route.descriptor.screen),
            Visibility::Authenticated | Visibility::RoleRestricted(_) => Err(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_tables_are_valid() {
        let web = RouteTable::web().unwrap();
        assert_eq!(web.landing_path(), "/auth/landing");
        assert_eq!(web.landing_screen(), Screen::Landing);
        assert!(web.onboarding().is_none());

        let mobile = RouteTable::mobile().unwrap();
        assert_eq!(mobile.landing_screen(), Screen::Login);
        assert_eq!(mobile.onboarding(), Some(("/country", Screen::CountrySelection)));
    }

    #[test]
    fn test_literal_segments_win_over_params() {
        let table = RouteTable::mobile().unwrap();
        let create = table.find("/stores/create").unwrap();
        assert_eq!(create.route.screen, Screen::CreateStore);
        assert!(create.params.is_empty());

        let details = table.find("/stores/42").unwrap();
        assert_eq!(details.route.screen, Screen::StoreDetails);
        assert_eq!(details.params.get("id").map(String::as_str), Some("42"));
    }

    #[test]
    fn test_literal_wins_even_when_declared_after_param() {
        let table = RouteTable::builder()
            .route(RouteDescriptor::public("/", Screen::Landing))
            .route(RouteDescriptor::public("/stores/:id", Screen::StoreDetails))
            .route(RouteDescriptor::public("/stores/create", Screen::CreateStore))
            .build()
            .unwrap();

        assert_eq!(table.find("/stores/create").unwrap().route.screen, Screen::CreateStore);
        assert_eq!(table.find("/stores/9").unwrap().route.screen, Screen::StoreDetails);
    }

    #[test]
    fn test_unmatched_path() {
        assert!(RouteTable::web().unwrap().find("/no/such/page").is_none());
    }

    #[test]
    fn test_rejects_invalid_tables() {
        let invalid = RouteTable::builder()
            .route(RouteDescriptor::public("jobs", Screen::Jobs))
            .build();
        assert_eq!(invalid.unwrap_err(), RouteTableError::InvalidPattern("jobs".to_string()));

        let duplicate = RouteTable::builder()
            .route(RouteDescriptor::public("/", Screen::Landing))
            .route(RouteDescriptor::public("/", Screen::Home))
            .build();
        assert_eq!(duplicate.unwrap_err(), RouteTableError::DuplicatePath("/".to_string()));

        let missing = RouteTable::builder()
            .route(RouteDescriptor::public("/jobs", Screen::Jobs))
            .landing("/welcome")
            .build();
        assert_eq!(missing.unwrap_err(), RouteTableError::MissingLanding("/welcome".to_string()));

        let gated_landing = RouteTable::builder()
            .route(RouteDescriptor::authenticated("/welcome", Screen::Landing))
            .landing("/welcome")
            .build();
        assert_eq!(gated_landing.unwrap_err(), RouteTableError::NotPublic("/welcome".to_string()));

        let gated_onboarding = RouteTable::builder()
            .route(RouteDescriptor::public("/", Screen::Landing))
            .route(RouteDescriptor::restricted("/country", Screen::CountrySelection, &[Role::Admin]))
            .onboarding("/country")
            .build();
        assert_eq!(gated_onboarding.unwrap_err(), RouteTableError::NotPublic("/country".to_string()));
    }

    #[test]
    fn test_routes_keep_declaration_order() {
        let table = RouteTable::web().unwrap();
        let first: Vec<&str> = table.routes().take(3).map(|r| r.path).collect();
        assert_eq!(first, vec!["/", "/marketplace", "/stores"]);
    }
}
