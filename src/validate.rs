// validate.rs
// Fixed-pattern field validation shared by every form controller. The
// backend remains the authority; these checks only gate the network call.

use std::sync::LazyLock;

use regex_lite::Regex;

static RE_NOMBRE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-zÁÉÍÓÚáéíóúÑñÜü ]{2,}$").unwrap());
static RE_TELEFONO: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]{10}$").unwrap());
static RE_EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap());

/// Placeholder tokens a template body may carry. A template meant for
/// sending must contain at least one of these.
pub const MARCADORES: &[&str] = &[
    "{cliente_nombre}",
    "{cliente_telefono}",
    "{negocio_nombre}",
    "{fecha}",
];

/// Letters, spaces and accents only, at least two characters.
pub fn nombre_valido(valor: &str) -> bool {
    RE_NOMBRE.is_match(valor.trim())
}

/// Exactly ten digits, no separators.
pub fn telefono_valido(valor: &str) -> bool {
    RE_TELEFONO.is_match(valor)
}

/// `local@dominio.tld`. Empty passes: the field is optional and the caller
/// decides whether an empty value is acceptable.
pub fn email_valido(valor: &str) -> bool {
    valor.is_empty() || RE_EMAIL.is_match(valor)
}

pub fn contiene_marcador(cuerpo: &str) -> bool {
    MARCADORES.iter().any(|m| cuerpo.contains(m))
}

/// Trims and drops empty strings, so optional fields never travel as "".
pub fn limpiar_opcional(valor: &str) -> Option<String> {
    let limpio = valor.trim();
    if limpio.is_empty() {
        None
    } else {
        Some(limpio.to_string())
    }
}
