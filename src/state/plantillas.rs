// Plantillas store. The placeholder invariant is enforced by the form
// controller before any of these run.

use anyhow::Result;
use tracing::{info, warn};

use crate::models::{Plantilla, PlantillaDraft};

use super::AppState;

pub async fn load_plantillas(state: &AppState) -> Result<()> {
    state.plantillas.marcar_cargando(true);
    let resultado = state.api.get::<Vec<Plantilla>>("plantillas").await;
    state.plantillas.marcar_cargando(false);

    match resultado {
        Ok(lista) => {
            state.plantillas.reemplazar(lista);
            Ok(())
        }
        Err(err) => {
            state.notifier.error("No se pudieron cargar las plantillas");
            warn!("fallo al cargar plantillas: {err:#}");
            Err(err)
        }
    }
}

pub async fn create_plantilla(state: &AppState, draft: &PlantillaDraft) -> Result<Plantilla> {
    match state.api.post::<_, Plantilla>("plantillas", draft).await {
        Ok(creada) => {
            state.plantillas.agregar(creada.clone());
            state.notifier.exito("Plantilla guardada");
            info!(id = %creada.id, "plantilla creada");
            Ok(creada)
        }
        Err(err) => {
            state.notifier.error("No se pudo guardar la plantilla");
            warn!("fallo al crear plantilla: {err:#}");
            Err(err)
        }
    }
}

pub async fn update_plantilla(
    state: &AppState,
    id: &str,
    draft: &PlantillaDraft,
) -> Result<Plantilla> {
    match state
        .api
        .put::<_, Plantilla>(&format!("plantillas/{id}"), draft)
        .await
    {
        Ok(actualizada) => {
            state.plantillas.reconciliar(actualizada.clone());
            state.notifier.exito("Plantilla actualizada");
            info!(id = %actualizada.id, "plantilla actualizada");
            Ok(actualizada)
        }
        Err(err) => {
            state.notifier.error("No se pudo actualizar la plantilla");
            warn!("fallo al actualizar plantilla {id}: {err:#}");
            Err(err)
        }
    }
}

pub async fn delete_plantilla(state: &AppState, id: &str) -> Result<()> {
    match state.api.delete(&format!("plantillas/{id}")).await {
        Ok(()) => {
            state.plantillas.quitar(id);
            state.notifier.exito("Plantilla eliminada");
            info!(%id, "plantilla eliminada");
            Ok(())
        }
        Err(err) => {
            state.notifier.error("No se pudo eliminar la plantilla");
            warn!("fallo al eliminar plantilla {id}: {err:#}");
            Err(err)
        }
    }
}
