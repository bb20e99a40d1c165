// ============================================================================
// DEEP LINK SERVICE - Activaciones externas → destino interno
// ============================================================================
// Nunca falla: cualquier entrada rara termina en la raíz.
// ============================================================================

use std::collections::HashMap;
use percent_encoding::percent_decode_str;
use url::Url;
use crate::models::deep_link::{
    Activation, DeepLinkTarget, FileClass, FileOpenEvent, ImportAttachment,
};
use crate::utils::constants::{ACTION_SCHEME, IMPORT_DATA_PATH};

/// Palabras clave conocidas (`web+bayt-sudani`) y su ruta
const ACTION_ROUTES: &[(&str, &str)] = &[
    ("marketplace", "/marketplace"),
    ("stores", "/stores"),
    ("services", "/services"),
    ("jobs", "/jobs"),
    ("profile", "/profile"),
];

/// Resolver de deep links
#[derive(Debug, Clone)]
pub struct DeepLinkResolver {
    app_scheme: String,
}

impl DeepLinkResolver {
    /// `app_scheme` sin `:` (ej. `web+sudanese-market`)
    pub fn new(app_scheme: impl Into<String>) -> Self {
        let scheme: String = app_scheme.into();
        Self {
            app_scheme: scheme.trim_end_matches(':').to_ascii_lowercase(),
        }
    }

    pub fn app_scheme(&self) -> &str {
        &self.app_scheme
    }

    /// Clasifica la activación y produce el destino. Prioridad: url, action, archivo.
    pub fn resolve(&self, activation: &Activation) -> DeepLinkTarget {
        if let Some(raw) = non_empty(activation.url.as_deref()) {
            return self.resolve_uri(raw);
        }
        if let Some(keyword) = non_empty(activation.action.as_deref()) {
            return Self::resolve_action(keyword);
        }
        if let Some(ref file) = activation.file {
            return Self::resolve_file(file);
        }
        DeepLinkTarget::root()
    }

    /// Rama de esquema propio: `web+sudanese-market://stores/42` → `/stores/42`
    pub fn resolve_uri(&self, raw: &str) -> DeepLinkTarget {
        let decoded = match percent_decode_str(raw).decode_utf8() {
            Ok(decoded) => decoded,
            Err(e) => {
                log::warn!("⚠️ [DEEPLINK] URI con UTF-8 inválido ({}), se usa /", e);
                return DeepLinkTarget::root();
            }
        };

        let uri = match Url::parse(decoded.trim()) {
            Ok(uri) => uri,
            Err(e) => {
                log::warn!("⚠️ [DEEPLINK] Error parseando {:?}: {}", decoded, e);
                return DeepLinkTarget::root();
            }
        };

        if uri.scheme() != self.app_scheme {
            log::warn!("⚠️ [DEEPLINK] Esquema ajeno {:?}, se usa /", uri.scheme());
            return DeepLinkTarget::root();
        }

        let path = Self::path_of(&uri);
        log::info!("🔗 [DEEPLINK] {} → {}", decoded, path);
        DeepLinkTarget::to_path(path)
    }

    /// Rama de palabra clave; desconocida → raíz
    pub fn resolve_action(keyword: &str) -> DeepLinkTarget {
        let keyword = keyword.trim();
        match ACTION_ROUTES.iter().find(|(name, _)| *name == keyword) {
            Some((_, path)) => {
                log::info!("🔗 [DEEPLINK] {}:{} → {}", ACTION_SCHEME, keyword, path);
                DeepLinkTarget::to_path(*path)
            }
            None => {
                log::warn!("⚠️ [DEEPLINK] Acción {} desconocida {:?}, se usa /", ACTION_SCHEME, keyword);
                DeepLinkTarget::root()
            }
        }
    }

    /// Rama de archivo: todas las clases van a la pantalla de importación
    pub fn resolve_file(file: &FileOpenEvent) -> DeepLinkTarget {
        let class = classify_file(file.mime_type.as_deref(), &file.name);
        log::info!(
            "📄 [DEEPLINK] Archivo {} ({} bytes, {}) → {}",
            file.name,
            file.size,
            class.as_str(),
            IMPORT_DATA_PATH
        );

        let mut params = HashMap::new();
        params.insert("name".to_string(), file.name.clone());
        params.insert("kind".to_string(), class.as_str().to_string());

        DeepLinkTarget {
            path: IMPORT_DATA_PATH.to_string(),
            params,
            attachment: Some(ImportAttachment {
                name: file.name.clone(),
                size: file.size,
                mime_type: file.mime_type.clone(),
                class,
                handle: file.handle.clone(),
            }),
        }
    }

    /// La autoridad forma parte de la ruta: en `esquema://stores/42`
    /// el parser deja `stores` como host.
    fn path_of(uri: &Url) -> String {
        let mut segments: Vec<&str> = Vec::new();
        if let Some(host) = uri.host_str() {
            if !host.is_empty() {
                segments.push(host);
            }
        }
        segments.extend(uri.path().split('/').filter(|s| !s.is_empty()));

        if segments.is_empty() {
            "/".to_string()
        } else {
            format!("/{}", segments.join("/"))
        }
    }
}

/// Clasifica por MIME; sin MIME usable se mira la extensión
pub fn classify_file(mime_type: Option<&str>, name: &str) -> FileClass {
    let mime = mime_type
        .map(|m| m.split(';').next().unwrap_or("").trim().to_ascii_lowercase())
        .filter(|m| !m.is_empty());

    match mime.as_deref() {
        Some("text/csv") => FileClass::Tabular,
        Some("application/pdf") => FileClass::Document,
        Some("application/vnd.ms-excel")
        | Some("application/vnd.openxmlformats-officedocument.spreadsheetml.sheet") => {
            FileClass::Spreadsheet
        }
        Some("application/json") => FileClass::StructuredData,
        Some(_) => FileClass::Unknown,
        None => classify_extension(name),
    }
}

fn classify_extension(name: &str) -> FileClass {
    let extension = name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "csv" => FileClass::Tabular,
        "pdf" => FileClass::Document,
        "xls" | "xlsx" => FileClass::Spreadsheet,
        "json" => FileClass::StructuredData,
        _ => FileClass::Unknown,
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
