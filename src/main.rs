// main.rs
// Headless shell: loads configuration, restores the session (or logs in with
// credentials from the environment), mounts every page concurrently, prints
// the lists as plain text and writes the export files. A graphical front end
// would drive the same controllers.

use anyhow::Result;
use chrono::Local;
use dotenvy::dotenv;
use tracing_subscriber::EnvFilter;

use facturapro::config::AppConfig;
use facturapro::export;
use facturapro::notify::Nivel;
use facturapro::pages::{PaginaClientes, PaginaFacturas, PaginaPlantillas, PaginaVentas};
use facturapro::session;
use facturapro::state::{AppState, init_state};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = AppConfig::from_env();
    println!("FacturaPro — backend: {}", config.api_base_url);
    let state = init_state(config);

    session::restaurar_sesion(&state).await;
    if !state.sesion_activa() {
        let email = std::env::var("FACTURAPRO_EMAIL").unwrap_or_default();
        let contrasena = std::env::var("FACTURAPRO_PASSWORD").unwrap_or_default();
        if email.is_empty() || contrasena.is_empty() {
            println!("Sin sesión. Define FACTURAPRO_EMAIL y FACTURAPRO_PASSWORD.");
            return Ok(());
        }
        session::login(&state, &email, &contrasena).await?;
    }

    let clientes = PaginaClientes::new();
    let ventas = PaginaVentas::new();
    let facturas = PaginaFacturas::new();
    let plantillas = PaginaPlantillas::new();

    // Independent collections mount concurrently; a page that fails to load
    // already notified, so here it only costs its section of the listing.
    let (r_clientes, r_ventas, r_facturas, r_plantillas) = tokio::join!(
        clientes.montar(&state),
        ventas.montar(&state),
        facturas.montar(&state),
        plantillas.montar(&state),
    );
    for resultado in [r_clientes, r_ventas, r_facturas, r_plantillas] {
        if let Err(err) = resultado {
            eprintln!("carga incompleta: {err:#}");
        }
    }

    let hoy = Local::now().date_naive();

    println!("\n== Clientes ==");
    for fila in clientes.filas(&state) {
        println!(
            "{:<24} {:<12} {:<24} {}",
            fila.nombre,
            fila.telefono,
            fila.email,
            fila.categoria.as_str()
        );
    }

    println!("\n== Ventas ==");
    for fila in ventas.filas(&state) {
        println!(
            "{:<12} {:<24} {:<8} $ {:<10} {}",
            fila.fecha,
            fila.cliente,
            fila.tipo.as_str(),
            fila.monto,
            fila.estado_pago.as_str()
        );
    }

    println!("\n== Facturas ==");
    for fila in facturas.filas(&state, hoy) {
        println!(
            "{:<10} {:<24} $ {:<10} vence {} [{}]",
            fila.folio,
            fila.cliente,
            fila.total,
            fila.vence,
            fila.estado.as_str()
        );
    }

    println!("\n== Plantillas ==");
    for fila in plantillas.filas(&state) {
        println!("{:<24} [{}]", fila.nombre, fila.categoria);
    }

    escribir_exportaciones(&state, &clientes, &ventas);
    drenar_avisos(&state);

    Ok(())
}

fn escribir_exportaciones(state: &AppState, clientes: &PaginaClientes, ventas: &PaginaVentas) {
    let dir = state.config.descargas_dir.clone();
    match clientes.exportar_xlsx(state) {
        Ok(bytes) => match export::guardar_descarga(&dir, export::ARCHIVO_CLIENTES_XLSX, &bytes) {
            Ok(ruta) => println!("\nExportado {}", ruta.display()),
            Err(err) => eprintln!("no se pudo guardar la exportación: {err:#}"),
        },
        Err(err) => eprintln!("exportación de clientes falló: {err:#}"),
    }
    match ventas.exportar_xlsx(state) {
        Ok(bytes) => match export::guardar_descarga(&dir, export::ARCHIVO_VENTAS_XLSX, &bytes) {
            Ok(ruta) => println!("Exportado {}", ruta.display()),
            Err(err) => eprintln!("no se pudo guardar la exportación: {err:#}"),
        },
        Err(err) => eprintln!("exportación de ventas falló: {err:#}"),
    }
    // The PDF variants need the fonts directory; skip quietly if absent.
    if state.config.fuentes_dir.is_dir() {
        if let Ok(bytes) = clientes.exportar_pdf(state) {
            let _ = export::guardar_descarga(&dir, export::ARCHIVO_CLIENTES_PDF, &bytes);
        }
        if let Ok(bytes) = ventas.exportar_pdf(state) {
            let _ = export::guardar_descarga(&dir, export::ARCHIVO_VENTAS_PDF, &bytes);
        }
    }
}

fn drenar_avisos(state: &AppState) {
    let avisos = state.notifier.drenar();
    if avisos.is_empty() {
        return;
    }
    println!("\n== Avisos ==");
    for aviso in avisos {
        let marca = match aviso.nivel {
            Nivel::Exito => "ok",
            Nivel::Error => "error",
        };
        println!("[{marca}] {}", aviso.mensaje);
    }
}
