// session.rs
// Session lifecycle: login/registro exchange credentials for a bearer token,
// logout is best-effort server-side and always clears locally, and startup
// restores the persisted token by confirming the profile.

use std::fs;

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info, warn};

use crate::models::{Perfil, Registro};
use crate::state::AppState;

#[derive(Deserialize)]
struct RespuestaAuth {
    token: String,
    perfil: Perfil,
}

/// Exchanges credentials for a token, persists it and stores the profile.
/// Failures notify and re-throw so the login form stays open.
pub async fn login(state: &AppState, email: &str, contrasena: &str) -> Result<Perfil> {
    let payload = json!({ "email": email, "contrasena": contrasena });
    match state.api.post::<_, RespuestaAuth>("auth/login", &payload).await {
        Ok(respuesta) => {
            establecer_sesion(state, respuesta)
        }
        Err(err) => {
            state.notifier.error("Correo o contraseña incorrectos");
            warn!("fallo de login: {err:#}");
            Err(err)
        }
    }
}

/// Registers the business account and establishes a session, like login.
pub async fn registrar(state: &AppState, registro: &Registro) -> Result<Perfil> {
    match state
        .api
        .post::<_, RespuestaAuth>("auth/registro", registro)
        .await
    {
        Ok(respuesta) => {
            state.notifier.exito("Cuenta creada");
            establecer_sesion(state, respuesta)
        }
        Err(err) => {
            state.notifier.error("No se pudo crear la cuenta");
            warn!("fallo de registro: {err:#}");
            Err(err)
        }
    }
}

/// Best-effort server-side invalidation; local token and profile are cleared
/// regardless of what the server answers.
pub async fn logout(state: &AppState) -> Result<()> {
    if let Err(err) = state.api.post_accion("auth/logout").await {
        debug!("logout remoto falló, se limpia igual: {err:#}");
    }
    limpiar_sesion(state);
    info!("sesión cerrada");
    Ok(())
}

/// Startup path: if a token was persisted, confirm it by fetching the
/// profile. Any failure silently downgrades to logged-out; "no user" is the
/// single source of truth for gating private screens.
pub async fn restaurar_sesion(state: &AppState) {
    let token = match fs::read_to_string(&state.config.token_file) {
        Ok(raw) if !raw.trim().is_empty() => raw.trim().to_string(),
        _ => return,
    };

    state.api.set_token(&token);
    match state.api.get::<Perfil>("perfil").await {
        Ok(perfil) => {
            info!(negocio = %perfil.nombre_negocio, "sesión restaurada");
            *state.perfil.write() = Some(perfil);
        }
        Err(err) => {
            debug!("token persistido inválido, sesión descartada: {err:#}");
            limpiar_sesion(state);
        }
    }
}

/// Sends the edited profile and keeps only the server echo.
pub async fn actualizar_perfil(state: &AppState, perfil: &Perfil) -> Result<Perfil> {
    match state.api.put::<_, Perfil>("perfil", perfil).await {
        Ok(actualizado) => {
            *state.perfil.write() = Some(actualizado.clone());
            state.notifier.exito("Perfil actualizado");
            Ok(actualizado)
        }
        Err(err) => {
            state.notifier.error("No se pudo actualizar el perfil");
            warn!("fallo al actualizar perfil: {err:#}");
            Err(err)
        }
    }
}

fn establecer_sesion(state: &AppState, respuesta: RespuestaAuth) -> Result<Perfil> {
    state.api.set_token(&respuesta.token);
    persistir_token(state, &respuesta.token)?;
    *state.perfil.write() = Some(respuesta.perfil.clone());
    info!(negocio = %respuesta.perfil.nombre_negocio, "sesión iniciada");
    Ok(respuesta.perfil)
}

fn persistir_token(state: &AppState, token: &str) -> Result<()> {
    fs::write(&state.config.token_file, token).with_context(|| {
        format!(
            "no se pudo persistir el token en {}",
            state.config.token_file.display()
        )
    })
}

fn limpiar_sesion(state: &AppState) {
    state.api.clear_token();
    *state.perfil.write() = None;
    let _ = fs::remove_file(&state.config.token_file);
}
