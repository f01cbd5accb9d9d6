// pages module: one controller per screen, binding a collection store, a
// form controller and the search/filter state to renderable rows. Rendering
// itself (layout, styling) lives outside this crate.

mod clientes;
mod ventas;
mod facturas;
mod plantillas;

pub use clientes::*;
pub use ventas::*;
pub use facturas::*;
pub use plantillas::*;

/// Case-insensitive containment used by every search box.
pub(crate) fn coincide(texto: &str, busqueda: &str) -> bool {
    busqueda.trim().is_empty()
        || texto.to_lowercase().contains(&busqueda.trim().to_lowercase())
}
