// Clientes store: CRUD against the backend plus the per-client notes and
// attachments (append-only). Local state only ever reflects the server echo.

use anyhow::Result;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde_json::json;
use tracing::{info, warn};

use crate::models::{Adjunto, Cliente, ClienteDraft, Nota};

use super::AppState;

pub async fn load_clientes(state: &AppState) -> Result<()> {
    state.clientes.marcar_cargando(true);
    let resultado = state.api.get::<Vec<Cliente>>("clientes").await;
    state.clientes.marcar_cargando(false);

    match resultado {
        Ok(lista) => {
            state.clientes.reemplazar(lista);
            Ok(())
        }
        Err(err) => {
            state.notifier.error("No se pudieron cargar los clientes");
            warn!("fallo al cargar clientes: {err:#}");
            Err(err)
        }
    }
}

pub async fn create_cliente(state: &AppState, draft: &ClienteDraft) -> Result<Cliente> {
    match state.api.post::<_, Cliente>("clientes", draft).await {
        Ok(creado) => {
            state.clientes.agregar(creado.clone());
            state.notifier.exito("Cliente guardado");
            info!(id = %creado.id, "cliente creado");
            Ok(creado)
        }
        Err(err) => {
            state.notifier.error("No se pudo guardar el cliente");
            warn!("fallo al crear cliente: {err:#}");
            Err(err)
        }
    }
}

pub async fn update_cliente(state: &AppState, id: &str, draft: &ClienteDraft) -> Result<Cliente> {
    match state
        .api
        .put::<_, Cliente>(&format!("clientes/{id}"), draft)
        .await
    {
        Ok(actualizado) => {
            state.clientes.reconciliar(actualizado.clone());
            state.notifier.exito("Cliente actualizado");
            info!(id = %actualizado.id, "cliente actualizado");
            Ok(actualizado)
        }
        Err(err) => {
            state.notifier.error("No se pudo actualizar el cliente");
            warn!("fallo al actualizar cliente {id}: {err:#}");
            Err(err)
        }
    }
}

/// Non-cascading: ventas y facturas keep their reference and render the
/// "cliente eliminado" marker.
pub async fn delete_cliente(state: &AppState, id: &str) -> Result<()> {
    match state.api.delete(&format!("clientes/{id}")).await {
        Ok(()) => {
            state.clientes.quitar(id);
            state.notifier.exito("Cliente eliminado");
            info!(%id, "cliente eliminado");
            Ok(())
        }
        Err(err) => {
            state.notifier.error("No se pudo eliminar el cliente");
            warn!("fallo al eliminar cliente {id}: {err:#}");
            Err(err)
        }
    }
}

// --- Notas y adjuntos ---

/// Replaces the notes store with the notes of one client. The store holds a
/// single client's notes at a time; opening another client reloads it.
pub async fn load_notas(state: &AppState, cliente_id: &str) -> Result<()> {
    state.notas.marcar_cargando(true);
    let resultado = state
        .api
        .get::<Vec<Nota>>(&format!("clientes/{cliente_id}/notas"))
        .await;
    state.notas.marcar_cargando(false);

    match resultado {
        Ok(lista) => {
            state.notas.reemplazar(lista);
            Ok(())
        }
        Err(err) => {
            state.notifier.error("No se pudieron cargar las notas");
            warn!("fallo al cargar notas de {cliente_id}: {err:#}");
            Err(err)
        }
    }
}

pub async fn create_nota(state: &AppState, cliente_id: &str, contenido: &str) -> Result<Nota> {
    let payload = json!({ "contenido": contenido });
    match state
        .api
        .post::<_, Nota>(&format!("clientes/{cliente_id}/notas"), &payload)
        .await
    {
        Ok(nota) => {
            state.notas.agregar(nota.clone());
            state.notifier.exito("Nota guardada");
            Ok(nota)
        }
        Err(err) => {
            state.notifier.error("No se pudo guardar la nota");
            warn!("fallo al crear nota para {cliente_id}: {err:#}");
            Err(err)
        }
    }
}

pub async fn delete_nota(state: &AppState, nota_id: &str) -> Result<()> {
    match state.api.delete(&format!("notas/{nota_id}")).await {
        Ok(()) => {
            state.notas.quitar(nota_id);
            state.notifier.exito("Nota eliminada");
            Ok(())
        }
        Err(err) => {
            state.notifier.error("No se pudo eliminar la nota");
            warn!("fallo al eliminar nota {nota_id}: {err:#}");
            Err(err)
        }
    }
}

/// Uploads file content base64-encoded and reconciles the owning note with
/// the server echo, so the attachment list never drifts from the backend.
pub async fn create_adjunto(
    state: &AppState,
    nota_id: &str,
    nombre_archivo: &str,
    contenido: &[u8],
) -> Result<Adjunto> {
    let payload = json!({
        "nombre_archivo": nombre_archivo,
        "contenido_b64": BASE64.encode(contenido),
    });
    match state
        .api
        .post::<_, Adjunto>(&format!("notas/{nota_id}/adjuntos"), &payload)
        .await
    {
        Ok(adjunto) => {
            if let Some(mut nota) = state.notas.obtener(nota_id) {
                nota.adjuntos.push(adjunto.clone());
                state.notas.reconciliar(nota);
            }
            state.notifier.exito("Archivo adjuntado");
            Ok(adjunto)
        }
        Err(err) => {
            state.notifier.error("No se pudo adjuntar el archivo");
            warn!("fallo al adjuntar a nota {nota_id}: {err:#}");
            Err(err)
        }
    }
}

pub async fn delete_adjunto(state: &AppState, nota_id: &str, adjunto_id: &str) -> Result<()> {
    match state.api.delete(&format!("adjuntos/{adjunto_id}")).await {
        Ok(()) => {
            if let Some(mut nota) = state.notas.obtener(nota_id) {
                nota.adjuntos.retain(|a| a.id != adjunto_id);
                state.notas.reconciliar(nota);
            }
            state.notifier.exito("Adjunto eliminado");
            Ok(())
        }
        Err(err) => {
            state.notifier.error("No se pudo eliminar el adjunto");
            warn!("fallo al eliminar adjunto {adjunto_id}: {err:#}");
            Err(err)
        }
    }
}
