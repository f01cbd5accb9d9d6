// notify.rs
// In-memory toast queue. Stores push a notice on every mutation outcome and
// the shell (or a UI layer) drains them after each action.

use std::sync::Arc;

use parking_lot::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nivel {
    Exito,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub nivel: Nivel,
    pub mensaje: String,
}

#[derive(Clone, Default)]
pub struct Notifier {
    cola: Arc<Mutex<Vec<Notice>>>,
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn exito(&self, mensaje: &str) {
        self.cola.lock().push(Notice {
            nivel: Nivel::Exito,
            mensaje: mensaje.to_string(),
        });
    }

    pub fn error(&self, mensaje: &str) {
        self.cola.lock().push(Notice {
            nivel: Nivel::Error,
            mensaje: mensaje.to_string(),
        });
    }

    /// Takes everything queued since the last drain.
    pub fn drenar(&self) -> Vec<Notice> {
        std::mem::take(&mut *self.cola.lock())
    }

    pub fn pendientes(&self) -> usize {
        self.cola.lock().len()
    }
}
