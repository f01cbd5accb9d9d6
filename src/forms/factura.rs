// Invoice modal controller. Line items are edited as text rows; subtotal,
// total and balance are recomputed from the draft on every render and the
// stored figures always come from the server echo.

use anyhow::Result;
use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::models::{EstadoFactura, Factura, FacturaDraft, LineaFactura};
use crate::state::{AppState, create_factura, update_factura};

use super::{Confirmador, Envio, Modal};

#[derive(Debug, Clone, Default)]
pub struct LineaCampos {
    pub descripcion: String,
    pub cantidad: String,
    pub precio: String,
}

#[derive(Debug, Clone, Default)]
pub struct LineaErrores {
    pub descripcion: Option<String>,
    pub cantidad: Option<String>,
    pub precio: Option<String>,
}

impl LineaErrores {
    pub fn hay(&self) -> bool {
        self.descripcion.is_some() || self.cantidad.is_some() || self.precio.is_some()
    }
}

#[derive(Debug, Clone, Default)]
pub struct FacturaCampos {
    pub cliente_id: String,
    pub lineas: Vec<LineaCampos>,
    pub impuesto: String,
    pub deposito: String,
    pub estado: String,
    pub vence: String,
    pub nota: String,
    pub condiciones: String,
}

#[derive(Debug, Clone, Default)]
pub struct FacturaErrores {
    pub lineas: Vec<LineaErrores>,
    pub sin_lineas: Option<String>,
    pub impuesto: Option<String>,
    pub deposito: Option<String>,
    pub estado: Option<String>,
    pub vence: Option<String>,
}

impl FacturaErrores {
    pub fn hay(&self) -> bool {
        self.sin_lineas.is_some()
            || self.impuesto.is_some()
            || self.deposito.is_some()
            || self.estado.is_some()
            || self.vence.is_some()
            || self.lineas.iter().any(LineaErrores::hay)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CampoFactura {
    ClienteId,
    Impuesto,
    Deposito,
    Estado,
    Vence,
    Nota,
    Condiciones,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CampoLinea {
    Descripcion,
    Cantidad,
    Precio,
}

#[derive(Default)]
pub struct FacturaForm {
    pub modal: Modal,
    pub enviando: bool,
    pub campos: FacturaCampos,
    pub errores: FacturaErrores,
}

impl FacturaForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn abrir_para_crear(&mut self) {
        self.campos = FacturaCampos {
            lineas: vec![LineaCampos::default()],
            impuesto: "0".into(),
            deposito: "0".into(),
            estado: EstadoFactura::Borrador.as_str().to_string(),
            ..FacturaCampos::default()
        };
        self.errores = FacturaErrores::default();
        self.enviando = false;
        self.modal = Modal::Crear;
    }

    pub fn abrir_para_editar(&mut self, factura: &Factura) {
        self.campos = FacturaCampos {
            cliente_id: factura.cliente_id.clone().unwrap_or_default(),
            lineas: factura
                .lineas
                .iter()
                .map(|linea| LineaCampos {
                    descripcion: linea.descripcion.clone(),
                    cantidad: linea.cantidad.to_string(),
                    precio: linea.precio.to_string(),
                })
                .collect(),
            impuesto: factura.impuesto.to_string(),
            deposito: factura.deposito.to_string(),
            estado: factura.estado.as_str().to_string(),
            vence: factura.vence.format("%Y-%m-%d").to_string(),
            nota: factura.nota.clone().unwrap_or_default(),
            condiciones: factura.condiciones.clone().unwrap_or_default(),
        };
        self.errores = FacturaErrores::default();
        self.enviando = false;
        self.modal = Modal::Editar(factura.id.clone());
    }

    pub fn cerrar(&mut self) {
        self.modal = Modal::Cerrado;
        self.campos = FacturaCampos::default();
        self.errores = FacturaErrores::default();
        self.enviando = false;
    }

    pub fn escribir(&mut self, campo: CampoFactura, valor: &str) {
        match campo {
            CampoFactura::ClienteId => self.campos.cliente_id = valor.to_string(),
            CampoFactura::Impuesto => {
                self.campos.impuesto = valor.to_string();
                self.errores.impuesto = None;
            }
            CampoFactura::Deposito => {
                self.campos.deposito = valor.to_string();
                self.errores.deposito = None;
            }
            CampoFactura::Estado => {
                self.campos.estado = valor.to_string();
                self.errores.estado = None;
            }
            CampoFactura::Vence => {
                self.campos.vence = valor.to_string();
                self.errores.vence = None;
            }
            CampoFactura::Nota => self.campos.nota = valor.to_string(),
            CampoFactura::Condiciones => self.campos.condiciones = valor.to_string(),
        }
    }

    pub fn agregar_linea(&mut self) {
        self.campos.lineas.push(LineaCampos::default());
        self.errores.sin_lineas = None;
    }

    pub fn quitar_linea(&mut self, indice: usize) {
        if indice < self.campos.lineas.len() {
            self.campos.lineas.remove(indice);
        }
        if indice < self.errores.lineas.len() {
            self.errores.lineas.remove(indice);
        }
    }

    pub fn escribir_linea(&mut self, indice: usize, campo: CampoLinea, valor: &str) {
        let Some(linea) = self.campos.lineas.get_mut(indice) else {
            return;
        };
        if self.errores.lineas.len() <= indice {
            self.errores
                .lineas
                .resize_with(indice + 1, LineaErrores::default);
        }
        let error = &mut self.errores.lineas[indice];
        match campo {
            CampoLinea::Descripcion => {
                linea.descripcion = valor.to_string();
                error.descripcion = None;
            }
            CampoLinea::Cantidad => {
                linea.cantidad = valor.to_string();
                error.cantidad = None;
            }
            CampoLinea::Precio => {
                linea.precio = valor.to_string();
                error.precio = None;
            }
        }
    }

    /// Draft totals for rendering: (subtotal, total, saldo). Unparseable
    /// rows count as zero until validation points at them.
    pub fn totales(&self) -> (Decimal, Decimal, Decimal) {
        let subtotal: Decimal = self
            .campos
            .lineas
            .iter()
            .filter_map(|linea| {
                let cantidad: u32 = linea.cantidad.trim().parse().ok()?;
                let precio: Decimal = linea.precio.trim().parse().ok()?;
                Some(precio * Decimal::from(cantidad))
            })
            .sum();
        let impuesto: Decimal = self.campos.impuesto.trim().parse().unwrap_or_default();
        let deposito: Decimal = self.campos.deposito.trim().parse().unwrap_or_default();
        let total = subtotal + impuesto;
        (subtotal, total, total - deposito)
    }

    pub fn validar(&mut self) -> bool {
        let mut errores = FacturaErrores::default();

        if self.campos.lineas.is_empty() {
            errores.sin_lineas = Some("Agrega al menos un concepto".into());
        }

        for linea in &self.campos.lineas {
            let mut error = LineaErrores::default();
            if linea.descripcion.trim().is_empty() {
                error.descripcion = Some("Describe el concepto".into());
            }
            match linea.cantidad.trim().parse::<u32>() {
                Ok(cantidad) if cantidad > 0 => {}
                _ => error.cantidad = Some("Cantidad inválida".into()),
            }
            match linea.precio.trim().parse::<Decimal>() {
                Ok(precio) if precio >= Decimal::ZERO => {}
                _ => error.precio = Some("Precio inválido".into()),
            }
            errores.lineas.push(error);
        }

        match self.campos.impuesto.trim().parse::<Decimal>() {
            Ok(impuesto) if impuesto >= Decimal::ZERO => {}
            _ => errores.impuesto = Some("Impuesto inválido".into()),
        }

        match self.campos.deposito.trim().parse::<Decimal>() {
            Ok(deposito) if deposito >= Decimal::ZERO => {}
            _ => errores.deposito = Some("Depósito inválido".into()),
        }

        if let Err(mensaje) = EstadoFactura::parse(&self.campos.estado) {
            errores.estado = Some(mensaje);
        }

        if NaiveDate::parse_from_str(self.campos.vence.trim(), "%Y-%m-%d").is_err() {
            errores.vence = Some("Fecha de vencimiento inválida (AAAA-MM-DD)".into());
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

        let draft = self.draft();
        self.enviando = true;
        let resultado = match self.modal.clone() {
            Modal::Editar(id) => update_factura(state, &id, &draft).await.map(|_| ()),
            _ => create_factura(state, &draft).await.map(|_| ()),
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
    fn draft(&self) -> FacturaDraft {
        let cliente = self.campos.cliente_id.trim();
        FacturaDraft {
            cliente_id: if cliente.is_empty() {
                None
            } else {
                Some(cliente.to_string())
            },
            lineas: self
                .campos
                .lineas
                .iter()
                .map(|linea| LineaFactura {
                    descripcion: linea.descripcion.trim().to_string(),
                    cantidad: linea.cantidad.trim().parse().unwrap_or(1),
                    precio: linea.precio.trim().parse().unwrap_or_default(),
                })
                .collect(),
            impuesto: self.campos.impuesto.trim().parse().unwrap_or_default(),
            deposito: self.campos.deposito.trim().parse().unwrap_or_default(),
            estado: EstadoFactura::parse(&self.campos.estado).unwrap_or(EstadoFactura::Borrador),
            vence: NaiveDate::parse_from_str(self.campos.vence.trim(), "%Y-%m-%d")
                .unwrap_or_default(),
            nota: crate::validate::limpiar_opcional(&self.campos.nota),
            condiciones: crate::validate::limpiar_opcional(&self.campos.condiciones),
        }
    }
}
