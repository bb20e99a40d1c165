use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use serde::{Deserialize, Serialize};
use crate::utils::constants::{PARAM_ACTION, PARAM_URL, ROOT_PATH};

/// Referencia opaca al contenido del archivo (en web: `web_sys::File`).
/// El resolver no la lee; solo la entrega al importador.
#[derive(Clone)]
pub struct FileHandle(Rc<dyn Any>);

impl FileHandle {
    pub fn new<T: Any>(inner: T) -> Self {
        Self(Rc::new(inner))
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref::<T>()
    }
}

impl fmt::Debug for FileHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FileHandle(..)")
    }
}

impl PartialEq for FileHandle {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

/// Evento de apertura de archivo (file handler del PWA / service worker)
#[derive(Debug, Clone, PartialEq)]
pub struct FileOpenEvent {
    pub name: String,
    pub size: u64,
    pub mime_type: Option<String>,
    pub handle: FileHandle,
}

/// Clase de archivo según su tipo MIME
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FileClass {
    Tabular,
    Document,
    Spreadsheet,
    StructuredData,
    Unknown,
}

impl FileClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileClass::Tabular => "tabular",
            FileClass::Document => "document",
            FileClass::Spreadsheet => "spreadsheet",
            FileClass::StructuredData => "structured-data",
            FileClass::Unknown => "unknown",
        }
    }
}

/// Contexto entregado a la pantalla de importación
#[derive(Debug, Clone, PartialEq)]
pub struct ImportAttachment {
    pub name: String,
    pub size: u64,
    pub mime_type: Option<String>,
    pub class: FileClass,
    pub handle: FileHandle,
}

/// Activación externa en bruto
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Activation {
    pub url: Option<String>,
    pub action: Option<String>,
    pub file: Option<FileOpenEvent>,
}

impl Activation {
    /// Lee `url` y `action` de una query con las reglas de `URLSearchParams`
    pub fn from_query(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut activation = Self::default();

        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            // Como URLSearchParams.get: gana la primera aparición
            if key == PARAM_URL && activation.url.is_none() {
                activation.url = Some(value.into_owned());
            } else if key == PARAM_ACTION && activation.action.is_none() {
                activation.action = Some(value.into_owned());
            }
        }

        activation
    }

    pub fn from_file(file: FileOpenEvent) -> Self {
        Self {
            file: Some(file),
            ..Self::default()
        }
    }
}

/// Destino interno canónico de navegación
#[derive(Debug, Clone, PartialEq)]
pub struct DeepLinkTarget {
    pub path: String,
    pub params: HashMap<String, String>,
    pub attachment: Option<ImportAttachment>,
}

impl DeepLinkTarget {
    pub fn root() -> Self {
        Self::to_path(ROOT_PATH)
    }

    pub fn to_path(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            params: HashMap::new(),
            attachment: None,
        }
    }

    pub fn is_root(&self) -> bool {
        self.path == ROOT_PATH
    }
}
