// PDF rendering of the same tabular views, with a totals footer. Fonts load
// from the configured directory; rendering happens fully in memory.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Result, anyhow};
use genpdf::{Element as _, elements, style};
use rust_decimal::Decimal;

use crate::models::{Cliente, EstadoPago, Venta, nombre_de_cliente};

const FUENTE: &str = "LiberationSans";

fn documento(titulo: &str, fuentes_dir: &Path) -> Result<genpdf::Document> {
    let familia = genpdf::fonts::from_files(fuentes_dir, FUENTE, None).map_err(|err| {
        anyhow!(
            "no se encontraron las fuentes {FUENTE} en {}: {err}",
            fuentes_dir.display()
        )
    })?;
    let mut doc = genpdf::Document::new(familia);
    doc.set_title(titulo);
    let mut decorador = genpdf::SimplePageDecorator::new();
    decorador.set_margins(10);
    doc.set_page_decorator(decorador);
    doc.push(
        elements::Paragraph::new(titulo).styled(style::Style::new().bold().with_font_size(16)),
    );
    doc.push(elements::Break::new(1.5));
    Ok(doc)
}

fn renderizar(doc: genpdf::Document) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    doc.render(&mut buffer)
        .map_err(|err| anyhow!("no se pudo renderizar el PDF: {err}"))?;
    Ok(buffer)
}

/// Client directory as a table plus a per-status count footer.
pub fn pdf_clientes(clientes: &[Cliente], fuentes_dir: &Path) -> Result<Vec<u8>> {
    let mut doc = documento("Clientes", fuentes_dir)?;

    let negrita = style::Style::new().bold();
    let mut tabla = elements::TableLayout::new(vec![3, 2, 3, 2]);
    tabla.set_cell_decorator(elements::FrameCellDecorator::new(true, true, false));
    tabla
        .row()
        .element(elements::Paragraph::new("Nombre").styled(negrita))
        .element(elements::Paragraph::new("Teléfono").styled(negrita))
        .element(elements::Paragraph::new("Correo").styled(negrita))
        .element(elements::Paragraph::new("Estado").styled(negrita))
        .push()
        .map_err(|err| anyhow!("encabezado de tabla: {err}"))?;

    for cliente in clientes {
        tabla
            .row()
            .element(elements::Paragraph::new(cliente.nombre.clone()))
            .element(elements::Paragraph::new(cliente.telefono.clone()))
            .element(elements::Paragraph::new(
                cliente.email.clone().unwrap_or_else(|| "-".into()),
            ))
            .element(elements::Paragraph::new(cliente.categoria.as_str()))
            .push()
            .map_err(|err| anyhow!("fila de cliente: {err}"))?;
    }
    doc.push(tabla);

    let mut por_estado: BTreeMap<&str, usize> = BTreeMap::new();
    for cliente in clientes {
        *por_estado.entry(cliente.categoria.as_str()).or_default() += 1;
    }
    doc.push(elements::Break::new(1.5));
    doc.push(elements::Paragraph::new("Resumen").styled(negrita));
    for (estado, cuenta) in por_estado {
        doc.push(elements::Paragraph::new(format!("{estado}: {cuenta}")));
    }
    doc.push(
        elements::Paragraph::new(format!("Total de clientes: {}", clientes.len()))
            .styled(negrita),
    );

    renderizar(doc)
}

/// Sales table with the client name resolved against the loaded client list,
/// plus totals by sale kind and payment status.
pub fn pdf_ventas(ventas: &[Venta], clientes: &[Cliente], fuentes_dir: &Path) -> Result<Vec<u8>> {
    let mut doc = documento("Ventas", fuentes_dir)?;

    let negrita = style::Style::new().bold();
    let mut tabla = elements::TableLayout::new(vec![3, 2, 2, 2, 2]);
    tabla.set_cell_decorator(elements::FrameCellDecorator::new(true, true, false));
    tabla
        .row()
        .element(elements::Paragraph::new("Cliente").styled(negrita))
        .element(elements::Paragraph::new("Fecha").styled(negrita))
        .element(elements::Paragraph::new("Tipo").styled(negrita))
        .element(elements::Paragraph::new("Monto").styled(negrita))
        .element(elements::Paragraph::new("Pago").styled(negrita))
        .push()
        .map_err(|err| anyhow!("encabezado de tabla: {err}"))?;

    for venta in ventas {
        tabla
            .row()
            .element(elements::Paragraph::new(nombre_de_cliente(
                clientes,
                Some(&venta.cliente_id),
            )))
            .element(elements::Paragraph::new(
                venta.fecha.format("%Y-%m-%d").to_string(),
            ))
            .element(elements::Paragraph::new(venta.tipo.as_str()))
            .element(elements::Paragraph::new(format!("$ {}", venta.monto)))
            .element(elements::Paragraph::new(venta.estado_pago.as_str()))
            .push()
            .map_err(|err| anyhow!("fila de venta: {err}"))?;
    }
    doc.push(tabla);

    let mut por_tipo: BTreeMap<&str, Decimal> = BTreeMap::new();
    let mut cobrado = Decimal::ZERO;
    let mut pendiente = Decimal::ZERO;
    for venta in ventas {
        *por_tipo.entry(venta.tipo.as_str()).or_default() += venta.monto;
        match venta.estado_pago {
            EstadoPago::Pagado => cobrado += venta.monto,
            EstadoPago::Pendiente => pendiente += venta.monto,
        }
    }

    doc.push(elements::Break::new(1.5));
    doc.push(elements::Paragraph::new("Resumen").styled(negrita));
    for (tipo, total) in por_tipo {
        doc.push(elements::Paragraph::new(format!("{tipo}: $ {total}")));
    }
    doc.push(elements::Paragraph::new(format!("Cobrado: $ {cobrado}")));
    doc.push(elements::Paragraph::new(format!("Por cobrar: $ {pendiente}")));
    let total: Decimal = ventas.iter().map(|venta| venta.monto).sum();
    doc.push(elements::Paragraph::new(format!("Total: $ {total}")).styled(negrita));

    renderizar(doc)
}
