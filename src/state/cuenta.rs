// Account side-services: subscription status and the third-party redirect
// URLs. Calendar and checkout redirect the whole page to the provider; no
// local state survives that round trip, so these only fetch the URL.

use anyhow::Result;
use serde::Deserialize;
use serde_json::json;
use tracing::warn;

use crate::models::Suscripcion;

use super::AppState;

#[derive(Deserialize)]
struct RespuestaUrl {
    url: String,
}

pub async fn cargar_suscripcion(state: &AppState) -> Result<Suscripcion> {
    match state.api.get::<Suscripcion>("suscripcion").await {
        Ok(suscripcion) => Ok(suscripcion),
        Err(err) => {
            state.notifier.error("No se pudo consultar la suscripción");
            warn!("fallo al cargar suscripción: {err:#}");
            Err(err)
        }
    }
}

/// Provider URL for the calendar OAuth connection; the caller redirects the
/// full page there and the provider returns to the fixed callback path.
pub async fn url_autorizacion_calendario(state: &AppState) -> Result<String> {
    match state
        .api
        .get::<RespuestaUrl>("integraciones/calendario/url")
        .await
    {
        Ok(respuesta) => Ok(respuesta.url),
        Err(err) => {
            state.notifier.error("No se pudo iniciar la conexión del calendario");
            warn!("fallo al pedir url de calendario: {err:#}");
            Err(err)
        }
    }
}

/// Checkout URL for the given plan; same full-page redirect contract.
pub async fn url_checkout(state: &AppState, plan: &str) -> Result<String> {
    let payload = json!({ "plan": plan });
    match state
        .api
        .post::<_, RespuestaUrl>("pagos/checkout", &payload)
        .await
    {
        Ok(respuesta) => Ok(respuesta.url),
        Err(err) => {
            state.notifier.error("No se pudo iniciar el pago");
            warn!("fallo al pedir checkout: {err:#}");
            Err(err)
        }
    }
}
