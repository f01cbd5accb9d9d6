// Template modal controller. The one business rule: a body without any
// recognized placeholder is rejected before it reaches the store.

use anyhow::Result;

use crate::models::{Plantilla, PlantillaDraft};
use crate::state::{AppState, create_plantilla, update_plantilla};
use crate::validate;

use super::{Confirmador, Envio, Modal};

#[derive(Debug, Clone, Default)]
pub struct PlantillaCampos {
    pub nombre: String,
    pub cuerpo: String,
    pub categoria: String,
}

#[derive(Debug, Clone, Default)]
pub struct PlantillaErrores {
    pub nombre: Option<String>,
    pub cuerpo: Option<String>,
    pub categoria: Option<String>,
}

impl PlantillaErrores {
    pub fn hay(&self) -> bool {
        self.nombre.is_some() || self.cuerpo.is_some() || self.categoria.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CampoPlantilla {
    Nombre,
    Cuerpo,
    Categoria,
}

#[derive(Default)]
pub struct PlantillaForm {
    pub modal: Modal,
    pub enviando: bool,
    pub campos: PlantillaCampos,
    pub errores: PlantillaErrores,
}

impl PlantillaForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn abrir_para_crear(&mut self) {
        self.campos = PlantillaCampos::default();
        self.errores = PlantillaErrores::default();
        self.enviando = false;
        self.modal = Modal::Crear;
    }

    pub fn abrir_para_editar(&mut self, plantilla: &Plantilla) {
        self.campos = PlantillaCampos {
            nombre: plantilla.nombre.clone(),
            cuerpo: plantilla.cuerpo.clone(),
            categoria: plantilla.categoria.clone(),
        };
        self.errores = PlantillaErrores::default();
        self.enviando = false;
        self.modal = Modal::Editar(plantilla.id.clone());
    }

    pub fn cerrar(&mut self) {
        self.modal = Modal::Cerrado;
        self.campos = PlantillaCampos::default();
        self.errores = PlantillaErrores::default();
        self.enviando = false;
    }

    pub fn escribir(&mut self, campo: CampoPlantilla, valor: &str) {
        match campo {
            CampoPlantilla::Nombre => {
                self.campos.nombre = valor.to_string();
                self.errores.nombre = None;
            }
            CampoPlantilla::Cuerpo => {
                self.campos.cuerpo = valor.to_string();
                self.errores.cuerpo = None;
            }
            CampoPlantilla::Categoria => {
                self.campos.categoria = valor.to_string();
                self.errores.categoria = None;
            }
        }
    }

    pub fn validar(&mut self) -> bool {
        let mut errores = PlantillaErrores::default();

        if self.campos.nombre.trim().is_empty() {
            errores.nombre = Some("El nombre es obligatorio".into());
        }

        if self.campos.cuerpo.trim().is_empty() {
            errores.cuerpo = Some("El mensaje es obligatorio".into());
        } else if !validate::contiene_marcador(&self.campos.cuerpo) {
            errores.cuerpo = Some(
                "El mensaje debe incluir al menos un marcador, por ejemplo {cliente_nombre}"
                    .into(),
            );
        }

        if self.campos.categoria.trim().is_empty() {
            errores.categoria = Some("Selecciona una categoría".into());
        }

        let ok = !errores.hay();
        self.errores = errores;
        ok
    }

    pub async fn enviar(
        &mut self,
        state: &AppState,
        _confirmador: &dyn Confirmador,
    ) -> Result<Envio> {
        if self.enviando {
            return Ok(Envio::Cancelado);
        }
        if !self.validar() {
            return Ok(Envio::Invalido);
        }

        let draft = PlantillaDraft {
            nombre: self.campos.nombre.trim().to_string(),
            cuerpo: self.campos.cuerpo.clone(),
            categoria: self.campos.categoria.trim().to_string(),
        };

        self.enviando = true;
        let resultado = match self.modal.clone() {
            Modal::Editar(id) => update_plantilla(state, &id, &draft).await.map(|_| ()),
            _ => create_plantilla(state, &draft).await.map(|_| ()),
        };
        self.enviando = false;

        match resultado {
            Ok(()) => {
                self.cerrar();
                Ok(Envio::Guardado)
            }
            Err(err) => Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cuerpo_sin_marcador_se_rechaza() {
        let mut form = PlantillaForm::new();
        form.abrir_para_crear();
        form.escribir(CampoPlantilla::Nombre, "Bienvenida");
        form.escribir(CampoPlantilla::Categoria, "saludo");
        form.escribir(CampoPlantilla::Cuerpo, "Hello there");

        assert!(!form.validar());
        assert!(form.errores.cuerpo.is_some());

        form.escribir(CampoPlantilla::Cuerpo, "Hello {cliente_nombre}");
        assert!(form.validar());
    }
}
