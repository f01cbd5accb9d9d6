// Sales screen. Client names come from the clientes store; while that load
// is still in flight the rows show the fallback marker and settle on the
// next render.

use anyhow::Result;
use rust_decimal::Decimal;

use crate::export;
use crate::forms::{Confirmador, VentaForm};
use crate::models::{EstadoPago, TipoVenta, nombre_de_cliente};
use crate::state::{AppState, delete_venta, load_clientes, load_ventas};

use super::coincide;

#[derive(Debug, Clone)]
pub struct FilaVenta {
    pub id: String,
    pub cliente: String,
    pub fecha: String,
    pub tipo: TipoVenta,
    pub monto: Decimal,
    pub estado_pago: EstadoPago,
}

#[derive(Default)]
pub struct PaginaVentas {
    pub form: VentaForm,
    pub busqueda: String,
    pub filtro_pago: Option<EstadoPago>,
}

impl PaginaVentas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Both stores load concurrently; neither depends on the other to
    /// finish. A failed client load still leaves the sales list usable.
    pub async fn montar(&self, state: &AppState) -> Result<()> {
        let (ventas, clientes) = tokio::join!(load_ventas(state), load_clientes(state));
        ventas.and(clientes)
    }

    /// Rows sorted by date, newest first, resolved against the client list.
    pub fn filas(&self, state: &AppState) -> Vec<FilaVenta> {
        let clientes = state.clientes.snapshot();
        let mut ventas = state.ventas.snapshot();
        ventas.sort_by(|a, b| b.fecha.cmp(&a.fecha));

        ventas
            .into_iter()
            .filter(|venta| {
                self.filtro_pago
                    .map(|filtro| venta.estado_pago == filtro)
                    .unwrap_or(true)
            })
            .map(|venta| FilaVenta {
                cliente: nombre_de_cliente(&clientes, Some(&venta.cliente_id)),
                fecha: venta.fecha.format("%Y-%m-%d").to_string(),
                tipo: venta.tipo,
                monto: venta.monto,
                estado_pago: venta.estado_pago,
                id: venta.id,
            })
            .filter(|fila| coincide(&fila.cliente, &self.busqueda))
            .collect()
    }

    pub fn abrir_crear(&mut self) {
        self.form.abrir_para_crear();
    }

    pub fn abrir_editar(&mut self, state: &AppState, id: &str) -> bool {
        match state.ventas.obtener(id) {
            Some(venta) => {
                self.form.abrir_para_editar(&venta);
                true
            }
            None => false,
        }
    }

    pub async fn eliminar(
        &self,
        state: &AppState,
        id: &str,
        confirmador: &dyn Confirmador,
    ) -> Result<bool> {
        if !confirmador.confirmar("¿Eliminar esta venta?") {
            return Ok(false);
        }
        delete_venta(state, id).await?;
        Ok(true)
    }

    pub fn exportar_xlsx(&self, state: &AppState) -> Result<Vec<u8>> {
        export::libro_ventas(&state.ventas.snapshot(), &state.clientes.snapshot())
    }

    pub fn exportar_pdf(&self, state: &AppState) -> Result<Vec<u8>> {
        export::pdf_ventas(
            &state.ventas.snapshot(),
            &state.clientes.snapshot(),
            &state.config.fuentes_dir,
        )
    }
}
