// models.rs
// Domain models shared by the stores, forms and exporters. Field names match
// the backend wire format (Spanish), ids are server-assigned strings.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Lifecycle status of a client ("categoria" on the wire).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EstadoCliente {
    Activo,
    Pendiente,
    Inactivo,
}

impl EstadoCliente {
    pub fn as_str(&self) -> &'static str {
        match self {
            EstadoCliente::Activo => "activo",
            EstadoCliente::Pendiente => "pendiente",
            EstadoCliente::Inactivo => "inactivo",
        }
    }

    pub fn parse(value: &str) -> Result<Self, String> {
        match value {
            "activo" => Ok(EstadoCliente::Activo),
            "pendiente" => Ok(EstadoCliente::Pendiente),
            "inactivo" => Ok(EstadoCliente::Inactivo),
            other => Err(format!("categoria inválida: {other}")),
        }
    }
}

/// Customer record owned by the authenticated business account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cliente {
    pub id: String,
    pub nombre: String,
    pub telefono: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub direccion: Option<String>,
    #[serde(default)]
    pub identificacion: Option<String>,
    #[serde(default)]
    pub genero: Option<String>,
    /// Source channel ("referido", "redes", "otro", ...).
    #[serde(default)]
    pub canal: Option<String>,
    /// Free-text companion, required when canal == "otro".
    #[serde(default)]
    pub canal_otro: Option<String>,
    #[serde(default)]
    pub notas: Option<String>,
    pub categoria: EstadoCliente,
    pub creado_en: DateTime<Utc>,
    #[serde(default)]
    pub actualizado_en: Option<DateTime<Utc>>,
}

/// Editable field set sent on create and update; the server echo is the only
/// thing merged back into local state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClienteDraft {
    pub nombre: String,
    pub telefono: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub direccion: Option<String>,
    #[serde(default)]
    pub identificacion: Option<String>,
    #[serde(default)]
    pub genero: Option<String>,
    #[serde(default)]
    pub canal: Option<String>,
    #[serde(default)]
    pub canal_otro: Option<String>,
    #[serde(default)]
    pub notas: Option<String>,
    pub categoria: String,
}

/// One-off vs recurring sale.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TipoVenta {
    Unica,
    Mensual,
}

impl TipoVenta {
    pub fn as_str(&self) -> &'static str {
        match self {
            TipoVenta::Unica => "unica",
            TipoVenta::Mensual => "mensual",
        }
    }

    pub fn parse(value: &str) -> Result<Self, String> {
        match value {
            "unica" => Ok(TipoVenta::Unica),
            "mensual" => Ok(TipoVenta::Mensual),
            other => Err(format!("tipo de venta inválido: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EstadoPago {
    Pendiente,
    Pagado,
}

impl EstadoPago {
    pub fn as_str(&self) -> &'static str {
        match self {
            EstadoPago::Pendiente => "pendiente",
            EstadoPago::Pagado => "pagado",
        }
    }

    pub fn parse(value: &str) -> Result<Self, String> {
        match value {
            "pendiente" => Ok(EstadoPago::Pendiente),
            "pagado" => Ok(EstadoPago::Pagado),
            other => Err(format!("estado de pago inválido: {other}")),
        }
    }
}

/// Sale record. The amount travels as text and is parsed at the boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Venta {
    pub id: String,
    /// Kept even after the referenced client is deleted (soft reference).
    pub cliente_id: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub monto: Decimal,
    pub tipo: TipoVenta,
    pub fecha: NaiveDate,
    pub estado_pago: EstadoPago,
    pub creado_en: DateTime<Utc>,
    #[serde(default)]
    pub actualizado_en: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VentaDraft {
    pub cliente_id: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub monto: Decimal,
    pub tipo: TipoVenta,
    pub fecha: NaiveDate,
    pub estado_pago: EstadoPago,
}

/// Stored invoice status. "Vencida" and "por vencer" are derived at render
/// time and never persisted.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EstadoFactura {
    Borrador,
    Pendiente,
    Pagada,
}

impl EstadoFactura {
    pub fn as_str(&self) -> &'static str {
        match self {
            EstadoFactura::Borrador => "borrador",
            EstadoFactura::Pendiente => "pendiente",
            EstadoFactura::Pagada => "pagada",
        }
    }

    pub fn parse(value: &str) -> Result<Self, String> {
        match value {
            "borrador" => Ok(EstadoFactura::Borrador),
            "pendiente" => Ok(EstadoFactura::Pendiente),
            "pagada" => Ok(EstadoFactura::Pagada),
            other => Err(format!("estado de factura inválido: {other}")),
        }
    }
}

/// Status label shown in lists, recomputed on every render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EstadoVisible {
    Borrador,
    Pendiente,
    PorVencer,
    Vencida,
    Pagada,
}

impl EstadoVisible {
    pub fn as_str(&self) -> &'static str {
        match self {
            EstadoVisible::Borrador => "borrador",
            EstadoVisible::Pendiente => "pendiente",
            EstadoVisible::PorVencer => "por vencer",
            EstadoVisible::Vencida => "vencida",
            EstadoVisible::Pagada => "pagada",
        }
    }
}

/// Days before the due date at which a pending invoice starts showing
/// "por vencer".
pub const DIAS_POR_VENCER: i64 = 7;

/// Derived status of an invoice. Pure function of stored fields and today's
/// date; callers pass `hoy` so lists stay testable.
pub fn estado_visible(estado: EstadoFactura, vence: NaiveDate, hoy: NaiveDate) -> EstadoVisible {
    match estado {
        EstadoFactura::Borrador => EstadoVisible::Borrador,
        EstadoFactura::Pagada => EstadoVisible::Pagada,
        EstadoFactura::Pendiente => {
            if vence < hoy {
                EstadoVisible::Vencida
            } else if (vence - hoy).num_days() <= DIAS_POR_VENCER {
                EstadoVisible::PorVencer
            } else {
                EstadoVisible::Pendiente
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineaFactura {
    pub descripcion: String,
    pub cantidad: u32,
    #[serde(with = "rust_decimal::serde::str")]
    pub precio: Decimal,
}

impl LineaFactura {
    pub fn total(&self) -> Decimal {
        self.precio * Decimal::from(self.cantidad)
    }
}

/// Invoice. `cliente_id` goes null on the backend once the client is deleted;
/// lists render the "cliente eliminado" marker in that case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Factura {
    pub id: String,
    pub folio: String,
    #[serde(default)]
    pub cliente_id: Option<String>,
    pub lineas: Vec<LineaFactura>,
    #[serde(with = "rust_decimal::serde::str")]
    pub subtotal: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub impuesto: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub total: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub deposito: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub saldo: Decimal,
    pub estado: EstadoFactura,
    pub vence: NaiveDate,
    #[serde(default)]
    pub nota: Option<String>,
    #[serde(default)]
    pub condiciones: Option<String>,
    pub creado_en: DateTime<Utc>,
    #[serde(default)]
    pub actualizado_en: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FacturaDraft {
    #[serde(default)]
    pub cliente_id: Option<String>,
    pub lineas: Vec<LineaFactura>,
    #[serde(with = "rust_decimal::serde::str")]
    pub impuesto: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub deposito: Decimal,
    pub estado: EstadoFactura,
    pub vence: NaiveDate,
    #[serde(default)]
    pub nota: Option<String>,
    #[serde(default)]
    pub condiciones: Option<String>,
}

/// Note attached to exactly one client. Append-only from the UI: notes are
/// created and deleted, never edited.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Nota {
    pub id: String,
    pub cliente_id: String,
    pub contenido: String,
    #[serde(default)]
    pub adjuntos: Vec<Adjunto>,
    pub creada_en: DateTime<Utc>,
}

/// File attached to exactly one note. Content travels base64-encoded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Adjunto {
    pub id: String,
    pub nota_id: String,
    pub nombre_archivo: String,
    pub creado_en: DateTime<Utc>,
}

/// Message template; the body carries placeholder tokens such as
/// `{cliente_nombre}` that are substituted right before sending.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plantilla {
    pub id: String,
    pub nombre: String,
    pub cuerpo: String,
    pub categoria: String,
    pub creada_en: DateTime<Utc>,
    #[serde(default)]
    pub actualizada_en: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlantillaDraft {
    pub nombre: String,
    pub cuerpo: String,
    pub categoria: String,
}

/// Marker shown wherever a sale or invoice still points at a client that no
/// longer exists (deletion never cascades).
pub const CLIENTE_ELIMINADO: &str = "Cliente eliminado";

/// Resolves a soft client reference for display. Tolerates a not-yet-loaded
/// or dangling lookup by falling back to the deletion marker.
pub fn nombre_de_cliente(clientes: &[Cliente], id: Option<&str>) -> String {
    id.and_then(|id| clientes.iter().find(|c| c.id == id))
        .map(|c| c.nombre.clone())
        .unwrap_or_else(|| CLIENTE_ELIMINADO.to_string())
}

/// Authenticated business account profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Perfil {
    pub id: String,
    pub nombre_negocio: String,
    pub email: String,
    #[serde(default)]
    pub telefono: Option<String>,
}

/// Registration payload; establishes a session like login does.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Registro {
    pub nombre_negocio: String,
    pub email: String,
    pub contrasena: String,
    #[serde(default)]
    pub telefono: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Suscripcion {
    pub plan: String,
    pub activa: bool,
    #[serde(default)]
    pub renueva_el: Option<NaiveDate>,
}
