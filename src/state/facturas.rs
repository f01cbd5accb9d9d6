// Facturas store: CRUD plus the three-state lifecycle. An invoice moves
// active -> papelera (reversible) -> purged (one-way); trash moves re-fetch
// both lists because the record changes sides.

use anyhow::Result;
use tracing::{info, warn};

use crate::models::{Factura, FacturaDraft};

use super::AppState;

pub async fn load_facturas(state: &AppState) -> Result<()> {
    state.facturas.marcar_cargando(true);
    let resultado = state.api.get::<Vec<Factura>>("facturas").await;
    state.facturas.marcar_cargando(false);

    match resultado {
        Ok(lista) => {
            state.facturas.reemplazar(lista);
            Ok(())
        }
        Err(err) => {
            state.notifier.error("No se pudieron cargar las facturas");
            warn!("fallo al cargar facturas: {err:#}");
            Err(err)
        }
    }
}

pub async fn load_papelera(state: &AppState) -> Result<()> {
    state.papelera.marcar_cargando(true);
    let resultado = state.api.get::<Vec<Factura>>("facturas/papelera").await;
    state.papelera.marcar_cargando(false);

    match resultado {
        Ok(lista) => {
            state.papelera.reemplazar(lista);
            Ok(())
        }
        Err(err) => {
            state.notifier.error("No se pudo cargar la papelera");
            warn!("fallo al cargar papelera: {err:#}");
            Err(err)
        }
    }
}

pub async fn create_factura(state: &AppState, draft: &FacturaDraft) -> Result<Factura> {
    match state.api.post::<_, Factura>("facturas", draft).await {
        Ok(creada) => {
            state.facturas.agregar(creada.clone());
            state.notifier.exito("Factura creada");
            info!(id = %creada.id, folio = %creada.folio, "factura creada");
            Ok(creada)
        }
        Err(err) => {
            state.notifier.error("No se pudo crear la factura");
            warn!("fallo al crear factura: {err:#}");
            Err(err)
        }
    }
}

pub async fn update_factura(state: &AppState, id: &str, draft: &FacturaDraft) -> Result<Factura> {
    match state
        .api
        .put::<_, Factura>(&format!("facturas/{id}"), draft)
        .await
    {
        Ok(actualizada) => {
            state.facturas.reconciliar(actualizada.clone());
            state.notifier.exito("Factura actualizada");
            info!(id = %actualizada.id, "factura actualizada");
            Ok(actualizada)
        }
        Err(err) => {
            state.notifier.error("No se pudo actualizar la factura");
            warn!("fallo al actualizar factura {id}: {err:#}");
            Err(err)
        }
    }
}

/// Soft delete. The record leaves the active list and shows up in the trash
/// view; both lists are re-fetched so local state matches the move.
pub async fn mover_a_papelera(state: &AppState, id: &str) -> Result<()> {
    match state.api.post_accion(&format!("facturas/{id}/papelera")).await {
        Ok(()) => {
            state.notifier.exito("Factura enviada a la papelera");
            info!(%id, "factura a papelera");
            recargar_listas(state).await
        }
        Err(err) => {
            state.notifier.error("No se pudo enviar la factura a la papelera");
            warn!("fallo al mover factura {id} a papelera: {err:#}");
            Err(err)
        }
    }
}

pub async fn restaurar_factura(state: &AppState, id: &str) -> Result<()> {
    match state.api.post_accion(&format!("facturas/{id}/restaurar")).await {
        Ok(()) => {
            state.notifier.exito("Factura restaurada");
            info!(%id, "factura restaurada");
            recargar_listas(state).await
        }
        Err(err) => {
            state.notifier.error("No se pudo restaurar la factura");
            warn!("fallo al restaurar factura {id}: {err:#}");
            Err(err)
        }
    }
}

/// Hard delete from the trash. One-way; the backend also removes the
/// generated PDF. Callers gate this behind the strong confirmation.
pub async fn purgar_factura(state: &AppState, id: &str) -> Result<()> {
    match state.api.delete(&format!("facturas/{id}/purga")).await {
        Ok(()) => {
            state.papelera.quitar(id);
            state.notifier.exito("Factura eliminada definitivamente");
            info!(%id, "factura purgada");
            Ok(())
        }
        Err(err) => {
            state.notifier.error("No se pudo eliminar la factura definitivamente");
            warn!("fallo al purgar factura {id}: {err:#}");
            Err(err)
        }
    }
}

/// PDF retrieval is backend-side for invoices: the UI redirects to this URL
/// instead of generating bytes locally.
pub fn url_pdf_factura(state: &AppState, id: &str) -> String {
    state.api.url(&format!("facturas/{id}/pdf"))
}

async fn recargar_listas(state: &AppState) -> Result<()> {
    // Either list failing to refresh already notified; surface the first
    // error so the caller knows state may be stale.
    let activas = load_facturas(state).await;
    let papelera = load_papelera(state).await;
    activas.and(papelera)
}
