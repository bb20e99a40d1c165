// ============================================================================
// PATH - Normalización de rutas y patrones `/segmento/:param`
// ============================================================================

use std::collections::HashMap;

/// Segmento de un patrón de ruta
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Param(String),
}

/// Normaliza una ruta solicitada: sin query ni fragmento, sin barras
/// duplicadas ni barra final. Una ruta vacía es la raíz.
pub fn normalize_path(raw: &str) -> String {
    let without_fragment = raw.split('#').next().unwrap_or("");
    let without_query = without_fragment.split('?').next().unwrap_or("");

    let segments: Vec<&str> = without_query
        .split('/')
        .filter(|segment| !segment.is_empty())
        .collect();

    if segments.is_empty() {
        "/".to_string()
    } else {
        format!("/{}", segments.join("/"))
    }
}

/// Devuelve la query (sin `?`) de una ubicación, si existe
pub fn query_of(raw: &str) -> Option<&str> {
    let without_fragment = raw.split('#').next().unwrap_or("");
    without_fragment
        .split_once('?')
        .map(|(_, query)| query)
        .filter(|query| !query.is_empty())
}

/// Separa una ruta normalizada en segmentos
pub fn split_segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|segment| !segment.is_empty()).collect()
}

/// Patrón compilado de una ruta
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    segments: Vec<Segment>,
}

impl PathPattern {
    /// Compila un patrón. Devuelve `None` si no empieza por `/`
    /// o si algún parámetro no tiene nombre.
    pub fn parse(pattern: &str) -> Option<Self> {
        if !pattern.starts_with('/') {
            return None;
        }

        let mut segments = Vec::new();
        for raw in split_segments(pattern) {
            match raw.strip_prefix(':') {
                Some("") => return None,
                Some(name) => segments.push(Segment::Param(name.to_string())),
                None => segments.push(Segment::Literal(raw.to_string())),
            }
        }

        Some(Self { segments })
    }

    /// Número de segmentos literales antes del primer parámetro
    pub fn literal_prefix_len(&self) -> usize {
        self.segments
            .iter()
            .take_while(|segment| matches!(segment, Segment::Literal(_)))
            .count()
    }

    /// Intenta casar una ruta normalizada completa; devuelve los parámetros
    pub fn matches(&self, path: &str) -> Option<HashMap<String, String>> {
        let requested = split_segments(path);
        if requested.len() != self.segments.len() {
            return None;
        }

        let mut params = HashMap::new();
        for (segment, value) in self.segments.iter().zip(requested) {
            match segment {
                Segment::Literal(literal) if literal == value => {}
                Segment::Literal(_) => return None,
                Segment::Param(name) => {
                    params.insert(name.clone(), value.to_string());
                }
            }
        }

        Some(params)
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }
}
