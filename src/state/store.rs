// Generic in-memory collection store. Load replaces wholesale, mutations
// only ever merge the server echo, order is whatever the backend returned
// (callers sort at render time).

use std::sync::Arc;

use parking_lot::RwLock;

/// A record living in a collection store.
pub trait Recurso: Clone {
    fn id(&self) -> &str;
}

/// Replaces the record with the same id in place, keeping its position; a
/// record not present yet is appended. Pure, so reconciliation is testable
/// without any I/O.
pub fn merge_record<T: Recurso>(items: &mut Vec<T>, record: T) {
    match items.iter().position(|item| item.id() == record.id()) {
        Some(idx) => items[idx] = record,
        None => items.push(record),
    }
}

#[derive(Clone)]
pub struct ListStore<T> {
    items: Arc<RwLock<Vec<T>>>,
    cargando: Arc<RwLock<bool>>,
}

impl<T> Default for ListStore<T> {
    fn default() -> Self {
        ListStore {
            items: Arc::new(RwLock::new(Vec::new())),
            cargando: Arc::new(RwLock::new(false)),
        }
    }
}

impl<T: Recurso> ListStore<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// True while a load() is in flight; the page disables its own refresh
    /// trigger off this flag.
    pub fn cargando(&self) -> bool {
        *self.cargando.read()
    }

    pub fn marcar_cargando(&self, valor: bool) {
        *self.cargando.write() = valor;
    }

    /// Wholesale replacement. Safe to call on every mount: never appends.
    pub fn reemplazar(&self, nuevos: Vec<T>) {
        *self.items.write() = nuevos;
    }

    /// Appends the server-returned record, regardless of any sort key.
    pub fn agregar(&self, record: T) {
        self.items.write().push(record);
    }

    /// In-place replacement by id (same position).
    pub fn reconciliar(&self, record: T) {
        merge_record(&mut self.items.write(), record);
    }

    pub fn quitar(&self, id: &str) {
        self.items.write().retain(|item| item.id() != id);
    }

    pub fn obtener(&self, id: &str) -> Option<T> {
        self.items.read().iter().find(|item| item.id() == id).cloned()
    }

    pub fn snapshot(&self) -> Vec<T> {
        self.items.read().clone()
    }

    pub fn len(&self) -> usize {
        self.items.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.read().is_empty()
    }
}
