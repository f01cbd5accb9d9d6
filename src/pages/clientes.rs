// Clients screen: list + modal + per-client notes, with the local exports.

use anyhow::Result;

use crate::export;
use crate::forms::{ClienteForm, Confirmador};
use crate::models::{Cliente, EstadoCliente};
use crate::state::{AppState, delete_cliente, load_clientes, load_notas};

use super::coincide;

#[derive(Debug, Clone)]
pub struct FilaCliente {
    pub id: String,
    pub nombre: String,
    pub telefono: String,
    pub email: String,
    pub categoria: EstadoCliente,
    pub alta: String,
}

#[derive(Default)]
pub struct PaginaClientes {
    pub form: ClienteForm,
    pub busqueda: String,
    pub filtro_categoria: Option<EstadoCliente>,
}

impl PaginaClientes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Safe on every mount: the store replaces, never appends.
    pub async fn montar(&self, state: &AppState) -> Result<()> {
        load_clientes(state).await
    }

    /// Rows for the current search/filter, sorted by name at render time
    /// (the store keeps server order).
    pub fn filas(&self, state: &AppState) -> Vec<FilaCliente> {
        let mut filas: Vec<FilaCliente> = state
            .clientes
            .snapshot()
            .into_iter()
            .filter(|cliente| self.visible(cliente))
            .map(|cliente| FilaCliente {
                alta: cliente.creado_en.format("%Y-%m-%d").to_string(),
                email: cliente.email.unwrap_or_else(|| "-".into()),
                id: cliente.id,
                nombre: cliente.nombre,
                telefono: cliente.telefono,
                categoria: cliente.categoria,
            })
            .collect();
        filas.sort_by(|a, b| a.nombre.to_lowercase().cmp(&b.nombre.to_lowercase()));
        filas
    }

    fn visible(&self, cliente: &Cliente) -> bool {
        if let Some(categoria) = self.filtro_categoria {
            if cliente.categoria != categoria {
                return false;
            }
        }
        coincide(&cliente.nombre, &self.busqueda) || coincide(&cliente.telefono, &self.busqueda)
    }

    pub fn abrir_crear(&mut self) {
        self.form.abrir_para_crear();
    }

    pub fn abrir_editar(&mut self, state: &AppState, id: &str) -> bool {
        match state.clientes.obtener(id) {
            Some(cliente) => {
                self.form.abrir_para_editar(&cliente);
                true
            }
            None => false,
        }
    }

    /// Confirm-then-delete; declining is the manual retry gate, nothing is
    /// sent. Returns whether the delete actually ran.
    pub async fn eliminar(
        &self,
        state: &AppState,
        id: &str,
        confirmador: &dyn Confirmador,
    ) -> Result<bool> {
        if !confirmador.confirmar("¿Eliminar este cliente? Sus ventas y facturas se conservan.") {
            return Ok(false);
        }
        delete_cliente(state, id).await?;
        Ok(true)
    }

    /// Loads the notes panel for one client; the notes store holds a single
    /// client's notes at a time.
    pub async fn abrir_notas(&self, state: &AppState, cliente_id: &str) -> Result<()> {
        load_notas(state, cliente_id).await
    }

    pub fn exportar_xlsx(&self, state: &AppState) -> Result<Vec<u8>> {
        export::libro_clientes(&state.clientes.snapshot(), &state.notas.snapshot())
    }

    pub fn exportar_pdf(&self, state: &AppState) -> Result<Vec<u8>> {
        export::pdf_clientes(&state.clientes.snapshot(), &state.config.fuentes_dir)
    }
}
