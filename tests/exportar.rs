// Export properties: deterministic bytes, intact inputs, the expected sheet
// layout, and the download boundary writing under the fixed filename.

use std::io::Read;

use chrono::{DateTime, NaiveDate, Utc};
use facturapro::export::{
    ARCHIVO_CLIENTES_XLSX, guardar_descarga, libro_clientes, libro_ventas, nombre_con_negocio,
    pdf_ventas,
};
use facturapro::models::{Cliente, EstadoCliente, EstadoPago, Nota, TipoVenta, Venta};
use rust_decimal::Decimal;

fn momento(texto: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(texto).unwrap().with_timezone(&Utc)
}

fn clientes() -> Vec<Cliente> {
    vec![
        Cliente {
            id: "c1".into(),
            nombre: "Ana Lopez".into(),
            telefono: "9392283101".into(),
            email: Some("ana@example.com".into()),
            direccion: None,
            identificacion: None,
            genero: None,
            canal: Some("referido".into()),
            canal_otro: None,
            notas: None,
            categoria: EstadoCliente::Activo,
            creado_en: momento("2025-01-05T10:00:00Z"),
            actualizado_en: None,
        },
        Cliente {
            id: "c2".into(),
            nombre: "Luis Mora".into(),
            telefono: "5512345678".into(),
            email: None,
            direccion: None,
            identificacion: None,
            genero: None,
            canal: None,
            canal_otro: None,
            notas: None,
            categoria: EstadoCliente::Pendiente,
            creado_en: momento("2025-02-01T09:30:00Z"),
            actualizado_en: None,
        },
    ]
}

fn notas() -> Vec<Nota> {
    vec![Nota {
        id: "n1".into(),
        cliente_id: "c1".into(),
        contenido: "Prefiere citas por la tarde".into(),
        adjuntos: vec![],
        creada_en: momento("2025-03-01T12:00:00Z"),
    }]
}

fn ventas() -> Vec<Venta> {
    vec![
        Venta {
            id: "v1".into(),
            cliente_id: "c1".into(),
            monto: Decimal::new(15050, 2),
            tipo: TipoVenta::Unica,
            fecha: NaiveDate::from_ymd_opt(2025, 5, 1).unwrap(),
            estado_pago: EstadoPago::Pagado,
            creado_en: momento("2025-05-01T10:00:00Z"),
            actualizado_en: None,
        },
        Venta {
            id: "v2".into(),
            cliente_id: "c-borrado".into(),
            monto: Decimal::new(30000, 2),
            tipo: TipoVenta::Mensual,
            fecha: NaiveDate::from_ymd_opt(2025, 5, 15).unwrap(),
            estado_pago: EstadoPago::Pendiente,
            creado_en: momento("2025-05-15T10:00:00Z"),
            actualizado_en: None,
        },
    ]
}

#[test]
fn exportar_dos_veces_da_bytes_identicos() {
    let clientes = clientes();
    let notas = notas();

    let primero = libro_clientes(&clientes, &notas).unwrap();
    let segundo = libro_clientes(&clientes, &notas).unwrap();
    assert_eq!(primero, segundo);

    let ventas = ventas();
    let primero = libro_ventas(&ventas, &clientes).unwrap();
    let segundo = libro_ventas(&ventas, &clientes).unwrap();
    assert_eq!(primero, segundo);
}

#[test]
fn exportar_no_muta_las_colecciones() {
    let clientes = clientes();
    let ventas = ventas();
    let nombres_antes: Vec<String> = clientes.iter().map(|c| c.nombre.clone()).collect();

    libro_ventas(&ventas, &clientes).unwrap();

    let nombres_despues: Vec<String> = clientes.iter().map(|c| c.nombre.clone()).collect();
    assert_eq!(nombres_antes, nombres_despues);
    assert_eq!(ventas.len(), 2);
}

#[test]
fn el_libro_trae_las_hojas_esperadas() {
    let bytes = libro_clientes(&clientes(), &notas()).unwrap();
    let cursor = std::io::Cursor::new(bytes);
    let mut archivo = zip::ZipArchive::new(cursor).unwrap();

    let nombres: Vec<String> = archivo.file_names().map(str::to_string).collect();
    assert!(nombres.contains(&"xl/worksheets/sheet1.xml".to_string()));
    assert!(nombres.contains(&"xl/worksheets/sheet2.xml".to_string()));

    let mut workbook = String::new();
    archivo
        .by_name("xl/workbook.xml")
        .unwrap()
        .read_to_string(&mut workbook)
        .unwrap();
    assert!(workbook.contains("name=\"Clientes\""));
    assert!(workbook.contains("name=\"Notas\""));

    // The deleted client shows the marker inside the sales sheet too.
    let bytes = libro_ventas(&ventas(), &clientes()).unwrap();
    let cursor = std::io::Cursor::new(bytes);
    let mut archivo = zip::ZipArchive::new(cursor).unwrap();
    let mut hoja = String::new();
    archivo
        .by_name("xl/worksheets/sheet1.xml")
        .unwrap()
        .read_to_string(&mut hoja)
        .unwrap();
    assert!(hoja.contains("Cliente eliminado"));
    assert!(hoja.contains("150.50"));
}

#[test]
fn guardar_descarga_usa_el_nombre_fijo() {
    let dir = tempfile::tempdir().unwrap();
    let destino = guardar_descarga(dir.path(), ARCHIVO_CLIENTES_XLSX, b"contenido").unwrap();
    assert!(destino.ends_with("clientes.xlsx"));
    assert_eq!(std::fs::read(destino).unwrap(), b"contenido");
}

#[test]
fn nombre_con_negocio_va_en_slug() {
    assert_eq!(
        nombre_con_negocio("ventas", "Estética Ana", "xlsx"),
        "ventas-estetica-ana.xlsx"
    );
}

#[test]
fn pdf_de_ventas_si_hay_fuentes() {
    // Same skip idiom as the rest of the suite when the environment lacks a
    // piece: without a fonts directory there is nothing to render with.
    let fuentes = std::path::PathBuf::from(
        std::env::var("FUENTES_DIR").unwrap_or_else(|_| "fonts".to_string()),
    );
    if !fuentes.is_dir() {
        eprintln!("Se omite la prueba de PDF; no existe {}", fuentes.display());
        return;
    }

    let bytes = pdf_ventas(&ventas(), &clientes(), &fuentes).unwrap();
    assert!(bytes.starts_with(b"%PDF"));
}
