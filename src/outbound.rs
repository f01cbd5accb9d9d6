// outbound.rs
// "Send message" hand-off: substitute the template placeholders and build a
// deep link the OS/browser opens. There is no delivery confirmation.

use chrono::NaiveDate;

use crate::models::{Cliente, Perfil};

/// Replaces every recognized placeholder with its value. Unknown tokens pass
/// through verbatim so a typo is visible in the preview instead of vanishing.
pub fn render_plantilla(
    cuerpo: &str,
    cliente: &Cliente,
    perfil: Option<&Perfil>,
    hoy: NaiveDate,
) -> String {
    let negocio = perfil.map(|p| p.nombre_negocio.as_str()).unwrap_or("");
    cuerpo
        .replace("{cliente_nombre}", &cliente.nombre)
        .replace("{cliente_telefono}", &cliente.telefono)
        .replace("{negocio_nombre}", negocio)
        .replace("{fecha}", &hoy.format("%d/%m/%Y").to_string())
}

/// wa.me deep link with the message percent-encoded.
pub fn enlace_whatsapp(telefono: &str, mensaje: &str) -> String {
    format!(
        "https://wa.me/{}?text={}",
        telefono,
        urlencoding::encode(mensaje)
    )
}

/// mailto: link with subject and body percent-encoded.
pub fn enlace_mailto(email: &str, asunto: &str, cuerpo: &str) -> String {
    format!(
        "mailto:{}?subject={}&body={}",
        email,
        urlencoding::encode(asunto),
        urlencoding::encode(cuerpo)
    )
}
