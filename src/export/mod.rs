// export module: pure collection-to-bytes transforms plus the download
// boundary. The CRM variant generates everything locally from the already
// loaded collections; invoices fetch their PDF from the backend instead.

mod xlsx;
mod pdf;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rust_decimal::Decimal;

use crate::models::{Cliente, EstadoPago, Nota, Venta, nombre_de_cliente};

pub use pdf::{pdf_clientes, pdf_ventas};
pub use xlsx::{Celda, Hoja, escribir_libro};

pub const ARCHIVO_CLIENTES_XLSX: &str = "clientes.xlsx";
pub const ARCHIVO_VENTAS_XLSX: &str = "ventas.xlsx";
pub const ARCHIVO_CLIENTES_PDF: &str = "clientes.pdf";
pub const ARCHIVO_VENTAS_PDF: &str = "ventas.pdf";

/// "Clientes" + "Notas" workbook. Deterministic and non-mutating: the same
/// collections always yield the same bytes.
pub fn libro_clientes(clientes: &[Cliente], notas: &[Nota]) -> Result<Vec<u8>> {
    let mut hoja_clientes = Hoja::new("Clientes");
    hoja_clientes.fila(vec![
        Celda::texto("Nombre"),
        Celda::texto("Teléfono"),
        Celda::texto("Correo"),
        Celda::texto("Dirección"),
        Celda::texto("Canal"),
        Celda::texto("Estado"),
        Celda::texto("Alta"),
    ]);
    for cliente in clientes {
        hoja_clientes.fila(vec![
            Celda::texto(cliente.nombre.clone()),
            Celda::texto(cliente.telefono.clone()),
            Celda::texto(cliente.email.clone().unwrap_or_default()),
            Celda::texto(cliente.direccion.clone().unwrap_or_default()),
            Celda::texto(cliente.canal.clone().unwrap_or_default()),
            Celda::texto(cliente.categoria.as_str()),
            Celda::texto(cliente.creado_en.format("%Y-%m-%d").to_string()),
        ]);
    }

    let mut hoja_notas = Hoja::new("Notas");
    hoja_notas.fila(vec![
        Celda::texto("Cliente"),
        Celda::texto("Nota"),
        Celda::texto("Adjuntos"),
        Celda::texto("Fecha"),
    ]);
    for nota in notas {
        hoja_notas.fila(vec![
            Celda::texto(nombre_de_cliente(clientes, Some(&nota.cliente_id))),
            Celda::texto(nota.contenido.clone()),
            Celda::numero(nota.adjuntos.len()),
            Celda::texto(nota.creada_en.format("%Y-%m-%d").to_string()),
        ]);
    }

    escribir_libro(&[hoja_clientes, hoja_notas])
}

/// "Ventas" + "Resumen" workbook, with the client name resolved per row.
pub fn libro_ventas(ventas: &[Venta], clientes: &[Cliente]) -> Result<Vec<u8>> {
    let mut hoja_ventas = Hoja::new("Ventas");
    hoja_ventas.fila(vec![
        Celda::texto("Cliente"),
        Celda::texto("Fecha"),
        Celda::texto("Tipo"),
        Celda::texto("Monto"),
        Celda::texto("Pago"),
    ]);
    for venta in ventas {
        hoja_ventas.fila(vec![
            Celda::texto(nombre_de_cliente(clientes, Some(&venta.cliente_id))),
            Celda::texto(venta.fecha.format("%Y-%m-%d").to_string()),
            Celda::texto(venta.tipo.as_str()),
            Celda::numero(venta.monto),
            Celda::texto(venta.estado_pago.as_str()),
        ]);
    }

    let mut cobrado = Decimal::ZERO;
    let mut pendiente = Decimal::ZERO;
    for venta in ventas {
        match venta.estado_pago {
            EstadoPago::Pagado => cobrado += venta.monto,
            EstadoPago::Pendiente => pendiente += venta.monto,
        }
    }
    let total: Decimal = ventas.iter().map(|venta| venta.monto).sum();

    let mut resumen = Hoja::new("Resumen");
    resumen.fila(vec![Celda::texto("Concepto"), Celda::texto("Valor")]);
    resumen.fila(vec![Celda::texto("Ventas"), Celda::numero(ventas.len())]);
    resumen.fila(vec![Celda::texto("Cobrado"), Celda::numero(cobrado)]);
    resumen.fila(vec![Celda::texto("Por cobrar"), Celda::numero(pendiente)]);
    resumen.fila(vec![Celda::texto("Total"), Celda::numero(total)]);

    escribir_libro(&[hoja_ventas, resumen])
}

/// Download boundary: hands the generated bytes to the filesystem under the
/// fixed suggested filename, creating the downloads directory on demand.
pub fn guardar_descarga(dir: &Path, nombre: &str, bytes: &[u8]) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("no se pudo crear {}", dir.display()))?;
    let destino = dir.join(nombre);
    fs::write(&destino, bytes)
        .with_context(|| format!("no se pudo escribir {}", destino.display()))?;
    Ok(destino)
}

/// Filename for a one-off export tied to a business name, slugified the way
/// the rest of the app builds identifiers.
pub fn nombre_con_negocio(prefijo: &str, negocio: &str, extension: &str) -> String {
    format!("{prefijo}-{}.{extension}", slug::slugify(negocio))
}
