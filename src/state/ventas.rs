// Ventas store. Same contract as clientes: load replaces wholesale, every
// mutation merges only the server echo and emits a toast either way.

use anyhow::Result;
use tracing::{info, warn};

use crate::models::{Venta, VentaDraft};

use super::AppState;

pub async fn load_ventas(state: &AppState) -> Result<()> {
    state.ventas.marcar_cargando(true);
    let resultado = state.api.get::<Vec<Venta>>("ventas").await;
    state.ventas.marcar_cargando(false);

    match resultado {
        Ok(lista) => {
            state.ventas.reemplazar(lista);
            Ok(())
        }
        Err(err) => {
            state.notifier.error("No se pudieron cargar las ventas");
            warn!("fallo al cargar ventas: {err:#}");
            Err(err)
        }
    }
}

pub async fn create_venta(state: &AppState, draft: &VentaDraft) -> Result<Venta> {
    match state.api.post::<_, Venta>("ventas", draft).await {
        Ok(creada) => {
            state.ventas.agregar(creada.clone());
            state.notifier.exito("Venta registrada");
            info!(id = %creada.id, "venta creada");
            Ok(creada)
        }
        Err(err) => {
            state.notifier.error("No se pudo registrar la venta");
            warn!("fallo al crear venta: {err:#}");
            Err(err)
        }
    }
}

pub async fn update_venta(state: &AppState, id: &str, draft: &VentaDraft) -> Result<Venta> {
    match state
        .api
        .put::<_, Venta>(&format!("ventas/{id}"), draft)
        .await
    {
        Ok(actualizada) => {
            state.ventas.reconciliar(actualizada.clone());
            state.notifier.exito("Venta actualizada");
            info!(id = %actualizada.id, "venta actualizada");
            Ok(actualizada)
        }
        Err(err) => {
            state.notifier.error("No se pudo actualizar la venta");
            warn!("fallo al actualizar venta {id}: {err:#}");
            Err(err)
        }
    }
}

pub async fn delete_venta(state: &AppState, id: &str) -> Result<()> {
    match state.api.delete(&format!("ventas/{id}")).await {
        Ok(()) => {
            state.ventas.quitar(id);
            state.notifier.exito("Venta eliminada");
            info!(%id, "venta eliminada");
            Ok(())
        }
        Err(err) => {
            state.notifier.error("No se pudo eliminar la venta");
            warn!("fallo al eliminar venta {id}: {err:#}");
            Err(err)
        }
    }
}
