// state module: AppState, initialization, and re-exports of submodules.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::api::ApiClient;
use crate::config::{AppConfig, Preferencias};
use crate::models::{Cliente, Factura, Nota, Perfil, Plantilla, Venta};
use crate::notify::Notifier;

mod store;
mod clientes;
mod ventas;
mod facturas;
mod plantillas;
mod cuenta;

pub use store::{ListStore, Recurso, merge_record};
pub use clientes::*;
pub use ventas::*;
pub use facturas::*;
pub use plantillas::*;
pub use cuenta::*;

impl Recurso for Cliente {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Recurso for Venta {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Recurso for Factura {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Recurso for Plantilla {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Recurso for Nota {
    fn id(&self) -> &str {
        &self.id
    }
}

/// App-wide state handed to every page controller. Cloning is cheap; all
/// shared pieces sit behind Arcs so tests can build isolated instances.
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub api: ApiClient,
    pub notifier: Notifier,
    pub perfil: Arc<RwLock<Option<Perfil>>>,
    pub preferencias: Arc<RwLock<Preferencias>>,
    pub clientes: ListStore<Cliente>,
    pub ventas: ListStore<Venta>,
    pub facturas: ListStore<Factura>,
    /// Soft-deleted invoices, shown in the separate trash view.
    pub papelera: ListStore<Factura>,
    pub plantillas: ListStore<Plantilla>,
    /// Notes of the client currently open; reloaded per client.
    pub notas: ListStore<Nota>,
}

pub fn init_state(config: AppConfig) -> AppState {
    let api = ApiClient::new(&config.api_base_url);
    let preferencias = Preferencias::cargar(&config.prefs_file);

    AppState {
        api,
        notifier: Notifier::new(),
        perfil: Arc::new(RwLock::new(None)),
        preferencias: Arc::new(RwLock::new(preferencias)),
        clientes: ListStore::new(),
        ventas: ListStore::new(),
        facturas: ListStore::new(),
        papelera: ListStore::new(),
        plantillas: ListStore::new(),
        notas: ListStore::new(),
        config,
    }
}

impl AppState {
    pub fn sesion_activa(&self) -> bool {
        self.perfil.read().is_some()
    }

    /// Flips the theme and persists the preference; a write failure keeps
    /// the in-memory flag so the UI still follows the toggle.
    pub fn alternar_tema(&self) -> bool {
        let mut prefs = self.preferencias.write();
        prefs.tema_oscuro = !prefs.tema_oscuro;
        if let Err(err) = prefs.guardar(&self.config.prefs_file) {
            tracing::warn!("no se pudo guardar preferencias: {err:#}");
        }
        prefs.tema_oscuro
    }
}
