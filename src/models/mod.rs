pub mod auth;
pub mod route;
pub mod deep_link;

pub use auth::{Credentials, PersistedSession, Role, Session, User};
pub use route::{NavItem, Resolution, RouteDescriptor, Screen, Visibility};
pub use deep_link::{
    Activation, DeepLinkTarget, FileClass, FileHandle, FileOpenEvent, ImportAttachment,
};
