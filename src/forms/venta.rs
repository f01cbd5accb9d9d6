// Sale modal controller. The amount is text until submit; parsing at the
// boundary is the only place it becomes a decimal.

use anyhow::Result;
use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::models::{EstadoPago, TipoVenta, Venta, VentaDraft};
use crate::state::{AppState, create_venta, update_venta};

use super::{Confirmador, Envio, Modal};

#[derive(Debug, Clone, Default)]
pub struct VentaCampos {
    pub cliente_id: String,
    pub monto: String,
    pub tipo: String,
    pub fecha: String,
    pub estado_pago: String,
}

#[derive(Debug, Clone, Default)]
pub struct VentaErrores {
    pub cliente_id: Option<String>,
    pub monto: Option<String>,
    pub tipo: Option<String>,
    pub fecha: Option<String>,
    pub estado_pago: Option<String>,
}

impl VentaErrores {
    pub fn hay(&self) -> bool {
        self.cliente_id.is_some()
            || self.monto.is_some()
            || self.tipo.is_some()
            || self.fecha.is_some()
            || self.estado_pago.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CampoVenta {
    ClienteId,
    Monto,
    Tipo,
    Fecha,
    EstadoPago,
}

#[derive(Default)]
pub struct VentaForm {
    pub modal: Modal,
    pub enviando: bool,
    pub campos: VentaCampos,
    pub errores: VentaErrores,
}

impl VentaForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn abrir_para_crear(&mut self) {
        self.campos = VentaCampos {
            tipo: TipoVenta::Unica.as_str().to_string(),
            estado_pago: EstadoPago::Pendiente.as_str().to_string(),
            ..VentaCampos::default()
        };
        self.errores = VentaErrores::default();
        self.enviando = false;
        self.modal = Modal::Crear;
    }

    pub fn abrir_para_editar(&mut self, venta: &Venta) {
        self.campos = VentaCampos {
            cliente_id: venta.cliente_id.clone(),
            monto: venta.monto.to_string(),
            tipo: venta.tipo.as_str().to_string(),
            fecha: venta.fecha.format("%Y-%m-%d").to_string(),
            estado_pago: venta.estado_pago.as_str().to_string(),
        };
        self.errores = VentaErrores::default();
        self.enviando = false;
        self.modal = Modal::Editar(venta.id.clone());
    }

    pub fn cerrar(&mut self) {
        self.modal = Modal::Cerrado;
        self.campos = VentaCampos::default();
        self.errores = VentaErrores::default();
        self.enviando = false;
    }

    pub fn escribir(&mut self, campo: CampoVenta, valor: &str) {
        match campo {
            CampoVenta::ClienteId => {
                self.campos.cliente_id = valor.to_string();
                self.errores.cliente_id = None;
            }
            CampoVenta::Monto => {
                self.campos.monto = valor.to_string();
                self.errores.monto = None;
            }
            CampoVenta::Tipo => {
                self.campos.tipo = valor.to_string();
                self.errores.tipo = None;
            }
            CampoVenta::Fecha => {
                self.campos.fecha = valor.to_string();
                self.errores.fecha = None;
            }
            CampoVenta::EstadoPago => {
                self.campos.estado_pago = valor.to_string();
                self.errores.estado_pago = None;
            }
        }
    }

    pub fn validar(&mut self) -> bool {
        let mut errores = VentaErrores::default();

        if self.campos.cliente_id.trim().is_empty() {
            errores.cliente_id = Some("Selecciona un cliente".into());
        }

        match self.campos.monto.trim().parse::<Decimal>() {
            Ok(monto) if monto > Decimal::ZERO => {}
            Ok(_) => errores.monto = Some("El monto debe ser mayor a cero".into()),
            Err(_) => errores.monto = Some("Monto inválido".into()),
        }

        if let Err(mensaje) = TipoVenta::parse(&self.campos.tipo) {
            errores.tipo = Some(mensaje);
        }

        if NaiveDate::parse_from_str(self.campos.fecha.trim(), "%Y-%m-%d").is_err() {
            errores.fecha = Some("Fecha inválida (AAAA-MM-DD)".into());
        }

        if let Err(mensaje) = EstadoPago::parse(&self.campos.estado_pago) {
            errores.estado_pago = Some(mensaje);
        }

        let ok = !errores.hay();
        self.errores = errores;
        ok
    }

    /// Low-stakes edit: no confirmation prompt, per the form contract.
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

        let draft = self.draft();
        self.enviando = true;
        let resultado = match self.modal.clone() {
            Modal::Editar(id) => update_venta(state, &id, &draft).await.map(|_| ()),
            _ => create_venta(state, &draft).await.map(|_| ()),
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

    /// Only called after validar(), so the parses cannot fail here.
    fn draft(&self) -> VentaDraft {
        VentaDraft {
            cliente_id: self.campos.cliente_id.trim().to_string(),
            monto: self.campos.monto.trim().parse().unwrap_or_default(),
            tipo: TipoVenta::parse(&self.campos.tipo).unwrap_or(TipoVenta::Unica),
            fecha: NaiveDate::parse_from_str(self.campos.fecha.trim(), "%Y-%m-%d")
                .unwrap_or_default(),
            estado_pago: EstadoPago::parse(&self.campos.estado_pago)
                .unwrap_or(EstadoPago::Pendiente),
        }
    }
}
