// ============================================================================
// PLATFORM - Acceso al navegador (window.location / history)
// ============================================================================

#[cfg(target_arch = "wasm32")]
pub mod web;

#[cfg(target_arch = "wasm32")]
pub use web::*;

use crate::models::route::Resolution;

/// URL que debe mostrar la barra de direcciones tras una resolución.
/// Una redirección muestra su destino; el resto, la ubicación registrada.
/// Durante la carga no se toca.
pub fn address_bar_target<'a>(resolution: &'a Resolution, location: &'a str) -> Option<&'a str> {
    match resolution {
        Resolution::Loading => None,
        Resolution::Redirect { to, .. } => Some(to.as_str()),
        Resolution::Render { .. } | Resolution::NotFound => Some(location),
    }
}
