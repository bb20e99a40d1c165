// ============================================================================
// ROUTE RESOLVER - Control de acceso a rutas derivado de la sesión
// ============================================================================
// Solo lee la sesión (SessionReader); nunca la modifica.
// ============================================================================

use std::rc::Rc;
use crate::models::auth::{Role, Session};
use crate::models::route::{NavItem, Resolution, RouteDescriptor, Screen, Visibility};
use crate::services::route_table::RouteTable;
use crate::state::{PreferencesState, SessionReader};
use crate::utils::constants::ROOT_PATH;
use crate::utils::path::normalize_path;

/// Decide qué pantalla se muestra para cada navegación
#[derive(Clone)]
pub struct RouteAccessResolver {
    table: Rc<RouteTable>,
    session: SessionReader,
    preferences: Option<PreferencesState>,
}

impl RouteAccessResolver {
    pub fn new(table: Rc<RouteTable>, session: SessionReader) -> Self {
        Self {
            table,
            session,
            preferences: None,
        }
    }

    /// Preferencias consultadas por la ruta de onboarding (si la tabla tiene una)
    pub fn with_preferences(mut self, preferences: PreferencesState) -> Self {
        self.preferences = Some(preferences);
        self
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    /// Resolver una navegación contra la sesión actual
    pub fn resolve(&self, requested: &str) -> Resolution {
        let path = normalize_path(requested);
        let session = self.session.snapshot();

        // Mientras se restaura la sesión no se muestra nada más
        if session.is_loading {
            log::debug!("⏳ [ROUTER] {} en espera de la sesión", path);
            return Resolution::Loading;
        }

        if let Some((onboarding_path, onboarding_screen)) = self.table.onboarding() {
            if path != onboarding_path && !self.onboarding_complete() {
                log::info!("🌍 [ROUTER] {} → {} (onboarding pendiente)", path, onboarding_path);
                return Resolution::Redirect {
                    to: onboarding_path.to_string(),
                    screen: onboarding_screen,
                };
            }
        }

        // `/` sustituye contenido según autenticación, no deniega
        if path == ROOT_PATH {
            return Resolution::render(self.root_screen(&session));
        }

        let Some(matched) = self.table.find(&path) else {
            log::info!("🔍 [ROUTER] {} no existe", path);
            return Resolution::NotFound;
        };

        if Self::permits(&matched.route.visibility, &session) {
            Resolution::Render {
                screen: matched.route.screen,
                params: matched.params,
            }
        } else {
            log::info!(
                "🔒 [ROUTER] {} denegada → {}",
                path,
                self.table.landing_path()
            );
            self.redirect_to_landing()
        }
    }

    /// Predicado de acceso sin resultado de navegación
    pub fn can_access(&self, requested: &str) -> bool {
        matches!(self.resolve(requested), Resolution::Render { .. })
    }

    /// Entradas del menú visibles para la sesión actual
    pub fn navigation_items(&self) -> Vec<NavItem> {
        let session = self.session.snapshot();
        if session.is_loading {
            return Vec::new();
        }

        self.table
            .routes()
            .filter(|route| Self::permits(&route.visibility, &session))
            .filter_map(|route| self.nav_item(route, &session))
            .collect()
    }

    /// `/` se anuncia con la pantalla que realmente se renderiza
    fn nav_item(&self, route: &RouteDescriptor, session: &Session) -> Option<NavItem> {
        let label = route.nav_label?;
        let screen = if route.path == ROOT_PATH {
            self.root_screen(session)
        } else {
            route.screen
        };
        Some(NavItem {
            path: route.path,
            label,
            screen,
        })
    }

    fn root_screen(&self, session: &Session) -> Screen {
        let root = self.table.root();
        if session.is_authenticated() {
            root.authenticated
        } else {
            root.unauthenticated
        }
    }

    fn redirect_to_landing(&self) -> Resolution {
        Resolution::Redirect {
            to: self.table.landing_path().to_string(),
            screen: self.table.landing_screen(),
        }
    }

    fn onboarding_complete(&self) -> bool {
        self.preferences
            .as_ref()
            .map(PreferencesState::has_country)
            .unwrap_or(false)
    }

    /// Único punto de decisión de visibilidad
    fn permits(visibility: &Visibility, session: &Session) -> bool {
        match visibility {
            Visibility::Public => true,
            Visibility::Authenticated => session.is_authenticated(),
            Visibility::RoleRestricted(roles) => match session.role() {
                Some(role) if session.is_authenticated() => Self::role_allowed(role, roles),
                _ => false,
            },
        }
    }

    fn role_allowed(role: Role, allowed: &std::collections::HashSet<Role>) -> bool {
        match role {
            Role::Admin | Role::Merchant | Role::StoreOwner | Role::Customer => {
                allowed.contains(&role)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use proptest::prelude::*;
    use crate::models::auth::User;
    use crate::models::route::{RouteDescriptor, Screen};
    use crate::services::storage::MemoryStorage;
    use crate::state::SessionStore;

    fn user(role: Role) -> User {
        User {
            id: 11,
            username: "fatima".to_string(),
            email: "fatima@example.sd".to_string(),
            full_name: "Fatima Hassan".to_string(),
            phone: Some("+249900000000".to_string()),
            role,
        }
    }

    fn restored_store() -> SessionStore {
        let store = SessionStore::new(Rc::new(MemoryStorage::new()), "auth_session");
        block_on(store.restore());
        store
    }

    fn web_resolver(store: &SessionStore) -> RouteAccessResolver {
        RouteAccessResolver::new(Rc::new(RouteTable::web().unwrap()), store.reader())
    }

    fn landing() -> Resolution {
        Resolution::Redirect {
            to: "/auth/landing".to_string(),
            screen: Screen::Landing,
        }
    }

    #[test]
    fn test_loading_blocks_everything() {
        let store = SessionStore::new(Rc::new(MemoryStorage::new()), "auth_session");
        let resolver = web_resolver(&store);

        for path in ["/", "/jobs", "/admin/dashboard", "/missing", "/auth/landing"] {
            assert_eq!(resolver.resolve(path), Resolution::Loading);
        }
        assert!(resolver.navigation_items().is_empty());
    }

    #[test]
    fn test_root_substitutes_landing_or_home() {
        let store = restored_store();
        let resolver = web_resolver(&store);
        assert_eq!(resolver.resolve("/"), Resolution::render(Screen::Landing));

        store.login("tok", user(Role::Customer)).unwrap();
        assert_eq!(resolver.resolve("/"), Resolution::render(Screen::Home));
        assert_eq!(resolver.resolve(""), Resolution::render(Screen::Home));

        store.logout();
        assert_eq!(resolver.resolve("/?utm=x"), Resolution::render(Screen::Landing));
    }

    #[test]
    fn test_public_routes_render_for_anyone() {
        let store = restored_store();
        let resolver = web_resolver(&store);
        assert_eq!(resolver.resolve("/jobs"), Resolution::render(Screen::Jobs));
        assert_eq!(resolver.resolve("/jobs/"), Resolution::render(Screen::Jobs));
    }

    #[test]
    fn test_unknown_route_is_not_found() {
        let store = restored_store();
        let resolver = web_resolver(&store);
        assert_eq!(resolver.resolve("/does-not-exist"), Resolution::NotFound);
    }

    #[test]
    fn test_authenticated_route_redirects_to_landing() {
        let store = restored_store();
        let resolver = web_resolver(&store);
        assert_eq!(resolver.resolve("/profile"), landing());

        store.login("tok", user(Role::Customer)).unwrap();
        assert_eq!(resolver.resolve("/profile"), Resolution::render(Screen::Profile));
    }

    #[test]
    fn test_wrong_role_gets_same_redirect_as_anonymous() {
        let table = RouteTable::builder()
            .route(RouteDescriptor::public("/", Screen::Landing))
            .route(RouteDescriptor::restricted(
                "/merchant/dashboard",
                Screen::MerchantDashboard,
                &[Role::Admin, Role::Merchant],
            ))
            .build()
            .unwrap();
        let store = restored_store();
        let resolver = RouteAccessResolver::new(Rc::new(table), store.reader());

        let anonymous = resolver.resolve("/merchant/dashboard");

        store.login("tok", user(Role::Customer)).unwrap();
        let customer = resolver.resolve("/merchant/dashboard");

        let expected = Resolution::Redirect {
            to: "/".to_string(),
            screen: Screen::Landing,
        };
        assert_eq!(anonymous, expected);
        assert_eq!(customer, expected);
        assert_ne!(customer, Resolution::NotFound);

        store.login("tok", user(Role::Merchant)).unwrap();
        assert_eq!(
            resolver.resolve("/merchant/dashboard"),
            Resolution::render(Screen::MerchantDashboard)
        );
    }

    #[test]
    fn test_params_reach_the_screen() {
        let store = restored_store();
        store.login("tok", user(Role::Admin)).unwrap();
        let resolver = web_resolver(&store);

        match resolver.resolve("/admin/stores/77") {
            Resolution::Render { screen, params } => {
                assert_eq!(screen, Screen::StoreDetails);
                assert_eq!(params.get("id").map(String::as_str), Some("77"));
            }
            other => panic!("resolución inesperada: {:?}", other),
        }
    }

    #[test]
    fn test_navigation_items_follow_role() {
        let store = restored_store();
        let resolver = web_resolver(&store);

        let anonymous: Vec<&str> = resolver.navigation_items().iter().map(|i| i.path).collect();
        assert!(anonymous.contains(&"/jobs"));
        assert!(!anonymous.contains(&"/profile"));

        store.login("tok", user(Role::StoreOwner)).unwrap();
        let owner: Vec<&str> = resolver.navigation_items().iter().map(|i| i.path).collect();
        assert!(owner.contains(&"/merchant/dashboard"));
        assert!(owner.contains(&"/products/create"));
        assert!(!owner.contains(&"/admin/dashboard"));

        store.login("tok", user(Role::Admin)).unwrap();
        let admin: Vec<&str> = resolver.navigation_items().iter().map(|i| i.path).collect();
        assert!(admin.contains(&"/admin/dashboard"));
        assert!(!admin.contains(&"/merchant/dashboard"));
    }

    #[test]
    fn test_root_nav_item_matches_rendered_screen() {
        let store = restored_store();
        let resolver = web_resolver(&store);
        let root_screen = |r: &RouteAccessResolver| {
            r.navigation_items()
                .into_iter()
                .find(|i| i.path == "/")
                .map(|i| i.screen)
        };

        assert_eq!(root_screen(&resolver), Some(Screen::Landing));
        assert_eq!(resolver.resolve("/").screen(), Screen::Landing);

        store.login("tok", user(Role::Customer)).unwrap();
        assert_eq!(root_screen(&resolver), Some(Screen::Home));
        assert_eq!(resolver.resolve("/").screen(), Screen::Home);
    }

    #[test]
    fn test_mobile_onboarding_comes_first() {
        let storage = Rc::new(MemoryStorage::new());
        let store = SessionStore::new(storage.clone(), "auth_session");
        block_on(store.restore());
        let prefs = PreferencesState::new(storage, "selectedCountry");
        let resolver = RouteAccessResolver::new(Rc::new(RouteTable::mobile().unwrap()), store.reader())
            .with_preferences(prefs.clone());

        let country = Resolution::Redirect {
            to: "/country".to_string(),
            screen: Screen::CountrySelection,
        };
        assert_eq!(resolver.resolve("/"), country);
        assert_eq!(resolver.resolve("/jobs"), country);
        assert_eq!(resolver.resolve("/country"), Resolution::render(Screen::CountrySelection));

        prefs.select_country("SD");
        assert_eq!(resolver.resolve("/"), Resolution::render(Screen::Login));
        assert_eq!(
            resolver.resolve("/jobs"),
            Resolution::Redirect {
                to: "/login".to_string(),
                screen: Screen::Login
            }
        );

        store.login("tok", user(Role::Customer)).unwrap();
        assert_eq!(resolver.resolve("/"), Resolution::render(Screen::Home));
        assert!(resolver.can_access("/stores/5"));
        assert!(!resolver.can_access("/stores/create"));
    }

    fn arb_role() -> impl Strategy<Value = Role> {
        prop_oneof![
            Just(Role::Admin),
            Just(Role::Merchant),
            Just(Role::StoreOwner),
            Just(Role::Customer),
        ]
    }

    proptest! {
        #[test]
        fn prop_loading_only_yields_placeholder(path in "[a-z/:?#=]{0,24}") {
            let store = SessionStore::new(Rc::new(MemoryStorage::new()), "auth_session");
            let resolver = web_resolver(&store);
            prop_assert_eq!(resolver.resolve(&path), Resolution::Loading);
        }

        #[test]
        fn prop_restricted_route_never_renders_for_other_roles(
            role in arb_role(),
            allowed in proptest::collection::hash_set(arb_role(), 1..4),
            logged_in in any::<bool>(),
        ) {
            let roles: Vec<Role> = allowed.iter().copied().collect();
            let table = RouteTable::builder()
                .route(RouteDescriptor::public("/", Screen::Landing))
                .route(RouteDescriptor::restricted("/secret", Screen::AdminDashboard, &roles))
                .build()
                .unwrap();
            let store = restored_store();
            if logged_in {
                store.login("tok", user(role)).unwrap();
            }
            let resolver = RouteAccessResolver::new(Rc::new(table), store.reader());

            let resolution = resolver.resolve("/secret");
            if logged_in && allowed.contains(&role) {
                prop_assert_eq!(resolution, Resolution::render(Screen::AdminDashboard));
            } else {
                prop_assert_eq!(resolution, Resolution::Redirect { to: "/".to_string(), screen: Screen::Landing });
            }
        }
    }
}
