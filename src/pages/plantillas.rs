// Templates screen, plus the "send message" hand-off that renders a template
// for one client and builds the deep link.

use anyhow::Result;
use chrono::NaiveDate;

use crate::forms::{Confirmador, PlantillaForm};
use crate::outbound;
use crate::state::{AppState, delete_plantilla, load_plantillas};

use super::coincide;

#[derive(Debug, Clone)]
pub struct FilaPlantilla {
    pub id: String,
    pub nombre: String,
    pub categoria: String,
    pub cuerpo: String,
}

#[derive(Default)]
pub struct PaginaPlantillas {
    pub form: PlantillaForm,
    pub busqueda: String,
    pub filtro_categoria: Option<String>,
}

impl PaginaPlantillas {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn montar(&self, state: &AppState) -> Result<()> {
        load_plantillas(state).await
    }

    pub fn filas(&self, state: &AppState) -> Vec<FilaPlantilla> {
        let mut filas: Vec<FilaPlantilla> = state
            .plantillas
            .snapshot()
            .into_iter()
            .filter(|plantilla| {
                self.filtro_categoria
                    .as_deref()
                    .map(|categoria| plantilla.categoria == categoria)
                    .unwrap_or(true)
                    && coincide(&plantilla.nombre, &self.busqueda)
            })
            .map(|plantilla| FilaPlantilla {
                id: plantilla.id,
                nombre: plantilla.nombre,
                categoria: plantilla.categoria,
                cuerpo: plantilla.cuerpo,
            })
            .collect();
        filas.sort_by(|a, b| a.nombre.to_lowercase().cmp(&b.nombre.to_lowercase()));
        filas
    }

    pub fn abrir_crear(&mut self) {
        self.form.abrir_para_crear();
    }

    pub fn abrir_editar(&mut self, state: &AppState, id: &str) -> bool {
        match state.plantillas.obtener(id) {
            Some(plantilla) => {
                self.form.abrir_para_editar(&plantilla);
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
        if !confirmador.confirmar("¿Eliminar esta plantilla?") {
            return Ok(false);
        }
        delete_plantilla(state, id).await?;
        Ok(true)
    }

    /// WhatsApp deep link for one client with the template body rendered.
    /// Empty when either side of the lookup is missing.
    pub fn enlace_whatsapp(
        &self,
        state: &AppState,
        plantilla_id: &str,
        cliente_id: &str,
        hoy: NaiveDate,
    ) -> Option<String> {
        let plantilla = state.plantillas.obtener(plantilla_id)?;
        let cliente = state.clientes.obtener(cliente_id)?;
        let perfil = state.perfil.read().clone();
        let mensaje = outbound::render_plantilla(&plantilla.cuerpo, &cliente, perfil.as_ref(), hoy);
        Some(outbound::enlace_whatsapp(&cliente.telefono, &mensaje))
    }

    /// mailto: variant; only offered when the client has an email.
    pub fn enlace_correo(
        &self,
        state: &AppState,
        plantilla_id: &str,
        cliente_id: &str,
        hoy: NaiveDate,
    ) -> Option<String> {
        let plantilla = state.plantillas.obtener(plantilla_id)?;
        let cliente = state.clientes.obtener(cliente_id)?;
        let email = cliente.email.clone()?;
        let perfil = state.perfil.read().clone();
        let mensaje = outbound::render_plantilla(&plantilla.cuerpo, &cliente, perfil.as_ref(), hoy);
        Some(outbound::enlace_mailto(&email, &plantilla.nombre, &mensaje))
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use crate::config::AppConfig;
    use crate::models::{Cliente, EstadoCliente, Plantilla};
    use crate::state::init_state;

    use super::*;

    fn state_con_datos() -> AppState {
        let state = init_state(AppConfig::from_env());
        state.plantillas.reemplazar(vec![Plantilla {
            id: "p1".into(),
            nombre: "Recordatorio".into(),
            cuerpo: "Hola {cliente_nombre}".into(),
            categoria: "citas".into(),
            creada_en: Utc::now(),
            actualizada_en: None,
        }]);
        state.clientes.reemplazar(vec![Cliente {
            id: "c1".into(),
            nombre: "Ana Lopez".into(),
            telefono: "9392283101".into(),
            email: Some("ana@example.com".into()),
            direccion: None,
            identificacion: None,
            genero: None,
            canal: None,
            canal_otro: None,
            notas: None,
            categoria: EstadoCliente::Activo,
            creado_en: Utc::now(),
            actualizado_en: None,
        }]);
        state
    }

    #[test]
    fn enlace_whatsapp_rellena_destinatario_y_cuerpo() {
        let state = state_con_datos();
        let pagina = PaginaPlantillas::new();
        let hoy = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();

        let enlace = pagina.enlace_whatsapp(&state, "p1", "c1", hoy).unwrap();
        assert!(enlace.starts_with("https://wa.me/9392283101?text="));
        assert!(enlace.contains("Ana%20Lopez"));

        assert!(pagina.enlace_whatsapp(&state, "p1", "no-existe", hoy).is_none());
    }

    #[test]
    fn enlace_correo_requiere_email() {
        let state = state_con_datos();
        let pagina = PaginaPlantillas::new();
        let hoy = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();

        assert!(pagina.enlace_correo(&state, "p1", "c1", hoy).is_some());

        let mut sin_correo = state.clientes.obtener("c1").unwrap();
        sin_correo.email = None;
        state.clientes.reconciliar(sin_correo);
        assert!(pagina.enlace_correo(&state, "p1", "c1", hoy).is_none());
    }
}
