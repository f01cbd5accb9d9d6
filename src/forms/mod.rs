// forms module: modal form controllers, one per entity. Shared pieces live
// here; each controller owns a fixed-field draft and a parallel error struct
// so the validator and the renderer share one compile-checked field list.

mod cliente;
mod venta;
mod factura;
mod plantilla;

pub use cliente::*;
pub use venta::*;
pub use factura::*;
pub use plantilla::*;

/// What the modal is working on. Opening always re-seeds the draft from the
/// latest record, so reusing one modal for another target replaces it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Modal {
    #[default]
    Cerrado,
    Crear,
    Editar(String),
}

impl Modal {
    pub fn abierto(&self) -> bool {
        !matches!(self, Modal::Cerrado)
    }
}

/// Outcome of a submit attempt. `Invalido` and `Cancelado` leave the modal
/// open with the draft intact; network failures arrive as `Err` instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Envio {
    Guardado,
    Invalido,
    Cancelado,
}

/// Blocking yes/no prompt shown before consequential actions. The UI layer
/// provides the real dialog; tests and the headless shell pick a policy.
pub trait Confirmador {
    fn confirmar(&self, mensaje: &str) -> bool;
}

pub struct ConfirmarSiempre;

impl Confirmador for ConfirmarSiempre {
    fn confirmar(&self, _mensaje: &str) -> bool {
        true
    }
}

pub struct RechazarSiempre;

impl Confirmador for RechazarSiempre {
    fn confirmar(&self, _mensaje: &str) -> bool {
        false
    }
}
