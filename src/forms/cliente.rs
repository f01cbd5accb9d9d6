// Client modal controller. Draft fields are all strings (inputs stay
// controlled: a field absent on the record seeds as "" and never as a
// missing key); errors clear per field on write.

use anyhow::Result;

use crate::models::{Cliente, ClienteDraft, EstadoCliente};
use crate::state::{AppState, create_cliente, update_cliente};
use crate::validate;

use super::{Confirmador, Envio, Modal};

pub const CANAL_OTRO: &str = "otro";

#[derive(Debug, Clone, Default)]
pub struct ClienteCampos {
    pub nombre: String,
    pub telefono: String,
    pub email: String,
    pub direccion: String,
    pub identificacion: String,
    pub genero: String,
    pub canal: String,
    pub canal_otro: String,
    pub notas: String,
    pub categoria: String,
}

#[derive(Debug, Clone, Default)]
pub struct ClienteErrores {
    pub nombre: Option<String>,
    pub telefono: Option<String>,
    pub email: Option<String>,
    pub canal_otro: Option<String>,
    pub categoria: Option<String>,
}

impl ClienteErrores {
    pub fn hay(&self) -> bool {
        self.nombre.is_some()
            || self.telefono.is_some()
            || self.email.is_some()
            || self.canal_otro.is_some()
            || self.categoria.is_some()
    }
}

/// Every editable field of the modal, so writes are exhaustive and each one
/// clears exactly its own stale error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CampoCliente {
    Nombre,
    Telefono,
    Email,
    Direccion,
    Identificacion,
    Genero,
    Canal,
    CanalOtro,
    Notas,
    Categoria,
}

#[derive(Default)]
pub struct ClienteForm {
    pub modal: Modal,
    pub enviando: bool,
    pub campos: ClienteCampos,
    pub errores: ClienteErrores,
}

impl ClienteForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn abrir_para_crear(&mut self) {
        self.campos = ClienteCampos {
            categoria: EstadoCliente::Activo.as_str().to_string(),
            ..ClienteCampos::default()
        };
        self.errores = ClienteErrores::default();
        self.enviando = false;
        self.modal = Modal::Crear;
    }

    pub fn abrir_para_editar(&mut self, cliente: &Cliente) {
        self.campos = ClienteCampos {
            nombre: cliente.nombre.clone(),
            telefono: cliente.telefono.clone(),
            email: cliente.email.clone().unwrap_or_default(),
            direccion: cliente.direccion.clone().unwrap_or_default(),
            identificacion: cliente.identificacion.clone().unwrap_or_default(),
            genero: cliente.genero.clone().unwrap_or_default(),
            canal: cliente.canal.clone().unwrap_or_default(),
            canal_otro: cliente.canal_otro.clone().unwrap_or_default(),
            notas: cliente.notas.clone().unwrap_or_default(),
            categoria: cliente.categoria.as_str().to_string(),
        };
        self.errores = ClienteErrores::default();
        self.enviando = false;
        self.modal = Modal::Editar(cliente.id.clone());
    }

    pub fn cerrar(&mut self) {
        self.modal = Modal::Cerrado;
        self.campos = ClienteCampos::default();
        self.errores = ClienteErrores::default();
        self.enviando = false;
    }

    /// Updates one field and clears that field's error; other errors stay.
    pub fn escribir(&mut self, campo: CampoCliente, valor: &str) {
        match campo {
            CampoCliente::Nombre => {
                self.campos.nombre = valor.to_string();
                self.errores.nombre = None;
            }
            CampoCliente::Telefono => {
                self.campos.telefono = valor.to_string();
                self.errores.telefono = None;
            }
            CampoCliente::Email => {
                self.campos.email = valor.to_string();
                self.errores.email = None;
            }
            CampoCliente::Direccion => self.campos.direccion = valor.to_string(),
            CampoCliente::Identificacion => self.campos.identificacion = valor.to_string(),
            CampoCliente::Genero => self.campos.genero = valor.to_string(),
            CampoCliente::Canal => {
                self.campos.canal = valor.to_string();
                self.errores.canal_otro = None;
            }
            CampoCliente::CanalOtro => {
                self.campos.canal_otro = valor.to_string();
                self.errores.canal_otro = None;
            }
            CampoCliente::Notas => self.campos.notas = valor.to_string(),
            CampoCliente::Categoria => {
                self.campos.categoria = valor.to_string();
                self.errores.categoria = None;
            }
        }
    }

    /// All-or-nothing: every failing field gets its message and nothing is
    /// sent while any of them fails.
    pub fn validar(&mut self) -> bool {
        let mut errores = ClienteErrores::default();

        if self.campos.nombre.trim().is_empty() {
            errores.nombre = Some("El nombre es obligatorio".into());
        } else if !validate::nombre_valido(&self.campos.nombre) {
            errores.nombre = Some("Solo letras y espacios, mínimo 2 caracteres".into());
        }

        if self.campos.telefono.trim().is_empty() {
            errores.telefono = Some("El teléfono es obligatorio".into());
        } else if !validate::telefono_valido(&self.campos.telefono) {
            errores.telefono = Some("Debe tener exactamente 10 dígitos".into());
        }

        if !validate::email_valido(&self.campos.email) {
            errores.email = Some("Correo inválido".into());
        }

        if let Err(mensaje) = EstadoCliente::parse(&self.campos.categoria) {
            errores.categoria = Some(mensaje);
        }

        if self.campos.canal == CANAL_OTRO && self.campos.canal_otro.trim().is_empty() {
            errores.canal_otro = Some("Indica el canal".into());
        }

        let ok = !errores.hay();
        self.errores = errores;
        ok
    }

    /// Validates, asks for confirmation (client saves are consequential) and
    /// delegates to the store. The draft survives failure and cancellation.
    pub async fn enviar(
        &mut self,
        state: &AppState,
        confirmador: &dyn Confirmador,
    ) -> Result<Envio> {
        if self.enviando {
            return Ok(Envio::Cancelado);
        }
        if !self.validar() {
            return Ok(Envio::Invalido);
        }

        let mensaje = match &self.modal {
            Modal::Editar(_) => "¿Guardar los cambios de este cliente?",
            _ => "¿Registrar este cliente?",
        };
        if !confirmador.confirmar(mensaje) {
            return Ok(Envio::Cancelado);
        }

        let draft = self.draft();
        self.enviando = true;
        let resultado = match self.modal.clone() {
            Modal::Editar(id) => update_cliente(state, &id, &draft).await.map(|_| ()),
            _ => create_cliente(state, &draft).await.map(|_| ()),
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

    fn draft(&self) -> ClienteDraft {
        ClienteDraft {
            nombre: self.campos.nombre.trim().to_string(),
            telefono: self.campos.telefono.trim().to_string(),
            email: validate::limpiar_opcional(&self.campos.email),
            direccion: validate::limpiar_opcional(&self.campos.direccion),
            identificacion: validate::limpiar_opcional(&self.campos.identificacion),
            genero: validate::limpiar_opcional(&self.campos.genero),
            canal: validate::limpiar_opcional(&self.campos.canal),
            canal_otro: validate::limpiar_opcional(&self.campos.canal_otro),
            notas: validate::limpiar_opcional(&self.campos.notas),
            categoria: self.campos.categoria.clone(),
        }
    }
}
