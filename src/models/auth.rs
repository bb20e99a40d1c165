use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Rol del usuario. Conjunto cerrado: añadir un rol obliga a revisar
/// cada `match` del control de acceso.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Merchant,
    StoreOwner,
    /// El backend antiguo enviaba `user` para los clientes
    #[serde(alias = "user")]
    Customer,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Merchant => "merchant",
            Role::StoreOwner => "store_owner",
            Role::Customer => "customer",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub role: Role,
}

/// Token y usuario siempre juntos: una sesión a medias no es representable
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub token: String,
    pub user: User,
}

/// Estado de sesión observable por la UI
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub credentials: Option<Credentials>,
    /// true solo hasta que termina la primera restauración
    pub is_loading: bool,
}

impl Session {
    /// Sesión inicial del proceso: vacía y cargando
    pub fn loading() -> Self {
        Self {
            credentials: None,
            is_loading: true,
        }
    }

    pub fn token(&self) -> Option<&str> {
        self.credentials.as_ref().map(|c| c.token.as_str())
    }

    pub fn user(&self) -> Option<&User> {
        self.credentials.as_ref().map(|c| &c.user)
    }

    pub fn role(&self) -> Option<Role> {
        self.user().map(|u| u.role)
    }

    /// Derivado, nunca almacenado
    pub fn is_authenticated(&self) -> bool {
        self.token().is_some() && self.user().is_some()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::loading()
    }
}

/// Registro persistido en localStorage / AsyncStorage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedSession {
    pub token: String,
    pub user: User,
    /// Informativo; registros antiguos (`{token, user}`) no lo traen
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<DateTime<Utc>>,
}

impl PersistedSession {
    pub fn from_credentials(credentials: &Credentials) -> Self {
        Self {
            token: credentials.token.clone(),
            user: credentials.user.clone(),
            saved_at: Some(Utc::now()),
        }
    }

    /// Un registro con token o usuario en blanco se considera corrupto
    pub fn into_credentials(self) -> Option<Credentials> {
        if self.token.trim().is_empty() || self.user.username.trim().is_empty() {
            return None;
        }
        Some(Credentials {
            token: self.token,
            user: self.user,
        })
    }
}
