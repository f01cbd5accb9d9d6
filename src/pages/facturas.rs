// Invoices screen: active and trash views over the two factura stores, with
// the derived status computed fresh per render and the strong-worded purge
// confirmation.

use anyhow::Result;
use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::forms::{Confirmador, FacturaForm};
use crate::models::{EstadoVisible, estado_visible, nombre_de_cliente};
use crate::state::{
    AppState, load_clientes, load_facturas, load_papelera, mover_a_papelera, purgar_factura,
    restaurar_factura, url_pdf_factura,
};

use super::coincide;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VistaFacturas {
    #[default]
    Activas,
    Papelera,
}

#[derive(Debug, Clone)]
pub struct FilaFactura {
    pub id: String,
    pub folio: String,
    pub cliente: String,
    pub total: Decimal,
    pub saldo: Decimal,
    pub vence: String,
    pub estado: EstadoVisible,
}

#[derive(Default)]
pub struct PaginaFacturas {
    pub form: FacturaForm,
    pub vista: VistaFacturas,
    pub busqueda: String,
}

impl PaginaFacturas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Active list, trash and the client lookup load concurrently; none of
    /// them waits on another.
    pub async fn montar(&self, state: &AppState) -> Result<()> {
        let (activas, papelera, clientes) = tokio::join!(
            load_facturas(state),
            load_papelera(state),
            load_clientes(state)
        );
        activas.and(papelera).and(clientes)
    }

    /// Rows of the current view, due-soonest first. `hoy` flows in from the
    /// caller so the derived labels are recomputed on every render.
    pub fn filas(&self, state: &AppState, hoy: NaiveDate) -> Vec<FilaFactura> {
        let clientes = state.clientes.snapshot();
        let mut facturas = match self.vista {
            VistaFacturas::Activas => state.facturas.snapshot(),
            VistaFacturas::Papelera => state.papelera.snapshot(),
        };
        facturas.sort_by(|a, b| a.vence.cmp(&b.vence));

        facturas
            .into_iter()
            .map(|factura| FilaFactura {
                cliente: nombre_de_cliente(&clientes, factura.cliente_id.as_deref()),
                total: factura.total,
                saldo: factura.saldo,
                vence: factura.vence.format("%Y-%m-%d").to_string(),
                estado: estado_visible(factura.estado, factura.vence, hoy),
                folio: factura.folio,
                id: factura.id,
            })
            .filter(|fila| {
                coincide(&fila.cliente, &self.busqueda) || coincide(&fila.folio, &self.busqueda)
            })
            .collect()
    }

    pub fn abrir_crear(&mut self) {
        self.form.abrir_para_crear();
    }

    pub fn abrir_editar(&mut self, state: &AppState, id: &str) -> bool {
        match state.facturas.obtener(id) {
            Some(factura) => {
                self.form.abrir_para_editar(&factura);
                true
            }
            None => false,
        }
    }

    /// Reversible move to trash; the light confirmation wording.
    pub async fn a_papelera(
        &self,
        state: &AppState,
        id: &str,
        confirmador: &dyn Confirmador,
    ) -> Result<bool> {
        if !confirmador.confirmar("¿Enviar esta factura a la papelera?") {
            return Ok(false);
        }
        mover_a_papelera(state, id).await?;
        Ok(true)
    }

    pub async fn restaurar(&self, state: &AppState, id: &str) -> Result<()> {
        restaurar_factura(state, id).await
    }

    /// One-way purge, gated by the strong confirmation, distinct from the
    /// wording used for ordinary deletes.
    pub async fn purgar(
        &self,
        state: &AppState,
        id: &str,
        confirmador: &dyn Confirmador,
    ) -> Result<bool> {
        if !confirmador.confirmar(
            "Esta acción eliminará la factura y su PDF para siempre. No se puede deshacer. \
             ¿Eliminar definitivamente?",
        ) {
            return Ok(false);
        }
        purgar_factura(state, id).await?;
        Ok(true)
    }

    /// The invoicing variant fetches its PDF from the backend; the UI just
    /// follows this URL.
    pub fn url_pdf(&self, state: &AppState, id: &str) -> String {
        url_pdf_factura(state, id)
    }
}
