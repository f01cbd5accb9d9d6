// Shared bootstrap for the integration tests: an in-process stub of the REST
// backend plus an isolated AppState pointed at it. The stub keeps records as
// raw JSON, mints deterministic ids ("c1", "v1", ...) and echoes the
// canonical record on every mutation, like the real backend does.

use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, Ordering},
    },
};

use axum::{
    Json, Router, middleware,
    extract::{Path, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use chrono::Utc;
use rust_decimal::Decimal;
use serde_json::{Value, json};

use facturapro::config::AppConfig;
use facturapro::state::{AppState, init_state};

pub const EMAIL_DEMO: &str = "demo@negocio.mx";
pub const PASSWORD_DEMO: &str = "secreto123";

#[derive(Default)]
pub struct StubDb {
    pub clientes: Mutex<Vec<Value>>,
    pub ventas: Mutex<Vec<Value>>,
    pub facturas: Mutex<Vec<Value>>,
    pub papelera: Mutex<Vec<Value>>,
    pub plantillas: Mutex<Vec<Value>>,
    pub notas: Mutex<Vec<Value>>,
    contadores: Mutex<HashMap<&'static str, usize>>,
    token: Mutex<Option<String>>,
    perfil: Mutex<Option<Value>>,
    /// When set, the next data request answers 500 and the flag clears.
    pub fallar_proxima: AtomicBool,
    pub rechazar_login: AtomicBool,
    pub fallar_logout: AtomicBool,
}

impl StubDb {
    fn siguiente_id(&self, prefijo: &'static str) -> String {
        let mut contadores = self.contadores.lock().unwrap();
        let contador = contadores.entry(prefijo).or_insert(0);
        *contador += 1;
        format!("{prefijo}{contador}")
    }

    fn debe_fallar(&self) -> bool {
        self.fallar_proxima.swap(false, Ordering::SeqCst)
    }

    pub fn token_emitido(&self) -> Option<String> {
        self.token.lock().unwrap().clone()
    }
}

pub struct TestContext {
    pub state: AppState,
    pub db: Arc<StubDb>,
    pub base_url: String,
    _dir: tempfile::TempDir,
}

/// Boots the stub on an ephemeral port and builds an isolated AppState
/// whose token file lives in a temp directory.
pub async fn setup() -> TestContext {
    let db = Arc::new(StubDb::default());

    let protegido = Router::new()
        .route("/perfil", get(obtener_perfil).put(actualizar_perfil))
        .route("/suscripcion", get(obtener_suscripcion))
        .route("/integraciones/calendario/url", get(url_calendario))
        .route("/pagos/checkout", post(checkout))
        .route("/clientes", get(listar_clientes).post(crear_cliente))
        .route(
            "/clientes/{id}",
            put(actualizar_cliente).delete(borrar_cliente),
        )
        .route(
            "/clientes/{id}/notas",
            get(listar_notas).post(crear_nota),
        )
        .route("/notas/{id}", axum::routing::delete(borrar_nota))
        .route("/notas/{id}/adjuntos", post(crear_adjunto))
        .route("/adjuntos/{id}", axum::routing::delete(borrar_adjunto))
        .route("/ventas", get(listar_ventas).post(crear_venta))
        .route("/ventas/{id}", put(actualizar_venta).delete(borrar_venta))
        .route("/facturas", get(listar_facturas).post(crear_factura))
        .route("/facturas/papelera", get(listar_papelera))
        .route("/facturas/{id}", put(actualizar_factura))
        .route("/facturas/{id}/papelera", post(factura_a_papelera))
        .route("/facturas/{id}/restaurar", post(restaurar_factura))
        .route("/facturas/{id}/purga", axum::routing::delete(purgar_factura))
        .route("/plantillas", get(listar_plantillas).post(crear_plantilla))
        .route(
            "/plantillas/{id}",
            put(actualizar_plantilla).delete(borrar_plantilla),
        )
        .route_layer(middleware::from_fn_with_state(db.clone(), requiere_token));

    let app = Router::new()
        .route("/auth/login", post(login))
        .route("/auth/registro", post(registro))
        .route("/auth/logout", post(logout))
        .merge(protegido)
        .with_state(db.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("no se pudo abrir el puerto del stub");
    let direccion = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let dir = tempfile::tempdir().expect("no se pudo crear el directorio temporal");
    let base_url = format!("http://{direccion}");
    let config = AppConfig {
        api_base_url: base_url.clone(),
        token_file: dir.path().join("token"),
        descargas_dir: dir.path().join("descargas"),
        fuentes_dir: dir.path().join("fonts"),
        prefs_file: dir.path().join("prefs.json"),
    };

    TestContext {
        state: init_state(config),
        db,
        base_url,
        _dir: dir,
    }
}

/// setup() + a logged-in session, the common starting point.
pub async fn setup_con_sesion() -> TestContext {
    let ctx = setup().await;
    facturapro::session::login(&ctx.state, EMAIL_DEMO, PASSWORD_DEMO)
        .await
        .expect("login contra el stub falló");
    ctx
}

// --- auth ---

async fn requiere_token(
    State(db): State<Arc<StubDb>>,
    request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let esperado = db
        .token
        .lock()
        .unwrap()
        .as_ref()
        .map(|token| format!("Bearer {token}"));
    let recibido = request
        .headers()
        .get("authorization")
        .and_then(|valor| valor.to_str().ok())
        .map(str::to_string);
    match (esperado, recibido) {
        (Some(esperado), Some(recibido)) if esperado == recibido => Ok(next.run(request).await),
        _ => Err(StatusCode::UNAUTHORIZED),
    }
}

async fn login(State(db): State<Arc<StubDb>>, Json(body): Json<Value>) -> Response {
    if db.rechazar_login.load(Ordering::SeqCst) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    let email = body["email"].as_str().unwrap_or_default();
    let contrasena = body["contrasena"].as_str().unwrap_or_default();
    if email != EMAIL_DEMO || contrasena != PASSWORD_DEMO {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    let perfil = json!({
        "id": "u1",
        "nombre_negocio": "Estética Ana",
        "email": email,
        "telefono": "5512345678",
    });
    *db.perfil.lock().unwrap() = Some(perfil.clone());
    *db.token.lock().unwrap() = Some("tok-demo".into());
    Json(json!({ "token": "tok-demo", "perfil": perfil })).into_response()
}

async fn registro(State(db): State<Arc<StubDb>>, Json(body): Json<Value>) -> Response {
    let perfil = json!({
        "id": "u1",
        "nombre_negocio": body["nombre_negocio"],
        "email": body["email"],
        "telefono": body["telefono"],
    });
    *db.perfil.lock().unwrap() = Some(perfil.clone());
    *db.token.lock().unwrap() = Some("tok-registro".into());
    Json(json!({ "token": "tok-registro", "perfil": perfil })).into_response()
}

async fn logout(State(db): State<Arc<StubDb>>) -> Response {
    if db.fallar_logout.load(Ordering::SeqCst) {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    *db.token.lock().unwrap() = None;
    StatusCode::NO_CONTENT.into_response()
}

async fn obtener_perfil(State(db): State<Arc<StubDb>>) -> Response {
    match db.perfil.lock().unwrap().clone() {
        Some(perfil) => Json(perfil).into_response(),
        None => StatusCode::UNAUTHORIZED.into_response(),
    }
}

async fn actualizar_perfil(State(db): State<Arc<StubDb>>, Json(body): Json<Value>) -> Response {
    *db.perfil.lock().unwrap() = Some(body.clone());
    Json(body).into_response()
}

async fn obtener_suscripcion(State(db): State<Arc<StubDb>>) -> Response {
    if db.debe_fallar() {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    Json(json!({ "plan": "pro", "activa": true, "renueva_el": "2026-01-01" })).into_response()
}

async fn url_calendario() -> Response {
    Json(json!({ "url": "https://proveedor.example/oauth?volver=/calendario" })).into_response()
}

async fn checkout(Json(body): Json<Value>) -> Response {
    let plan = body["plan"].as_str().unwrap_or("pro");
    Json(json!({ "url": format!("https://pagos.example/checkout/{plan}") })).into_response()
}

// --- helpers de colección ---

fn listar(coleccion: &Mutex<Vec<Value>>) -> Response {
    Json(Value::Array(coleccion.lock().unwrap().clone())).into_response()
}

fn quitar_por_id(coleccion: &Mutex<Vec<Value>>, id: &str) -> Option<Value> {
    let mut lista = coleccion.lock().unwrap();
    let posicion = lista.iter().position(|item| item["id"] == id)?;
    Some(lista.remove(posicion))
}

fn reemplazar_por_id(coleccion: &Mutex<Vec<Value>>, id: &str, nuevo: Value) -> bool {
    let mut lista = coleccion.lock().unwrap();
    match lista.iter().position(|item| item["id"] == id) {
        Some(posicion) => {
            lista[posicion] = nuevo;
            true
        }
        None => false,
    }
}

// --- clientes, notas y adjuntos ---

async fn listar_clientes(State(db): State<Arc<StubDb>>) -> Response {
    if db.debe_fallar() {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    listar(&db.clientes)
}

async fn crear_cliente(State(db): State<Arc<StubDb>>, Json(mut body): Json<Value>) -> Response {
    if db.debe_fallar() {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    body["id"] = json!(db.siguiente_id("c"));
    body["creado_en"] = json!(Utc::now().to_rfc3339());
    db.clientes.lock().unwrap().push(body.clone());
    Json(body).into_response()
}

async fn actualizar_cliente(
    State(db): State<Arc<StubDb>>,
    Path(id): Path<String>,
    Json(mut body): Json<Value>,
) -> Response {
    if db.debe_fallar() {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    let previo = match db
        .clientes
        .lock()
        .unwrap()
        .iter()
        .find(|item| item["id"] == id.as_str())
        .cloned()
    {
        Some(previo) => previo,
        None => return StatusCode::NOT_FOUND.into_response(),
    };
    body["id"] = json!(id);
    body["creado_en"] = previo["creado_en"].clone();
    body["actualizado_en"] = json!(Utc::now().to_rfc3339());
    reemplazar_por_id(&db.clientes, &id, body.clone());
    Json(body).into_response()
}

async fn borrar_cliente(State(db): State<Arc<StubDb>>, Path(id): Path<String>) -> StatusCode {
    if db.debe_fallar() {
        return StatusCode::INTERNAL_SERVER_ERROR;
    }
    match quitar_por_id(&db.clientes, &id) {
        Some(_) => StatusCode::NO_CONTENT,
        None => StatusCode::NOT_FOUND,
    }
}

async fn listar_notas(State(db): State<Arc<StubDb>>, Path(cliente_id): Path<String>) -> Response {
    if db.debe_fallar() {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    let notas: Vec<Value> = db
        .notas
        .lock()
        .unwrap()
        .iter()
        .filter(|nota| nota["cliente_id"] == cliente_id.as_str())
        .cloned()
        .collect();
    Json(Value::Array(notas)).into_response()
}

async fn crear_nota(
    State(db): State<Arc<StubDb>>,
    Path(cliente_id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    if db.debe_fallar() {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    let nota = json!({
        "id": db.siguiente_id("n"),
        "cliente_id": cliente_id,
        "contenido": body["contenido"],
        "adjuntos": [],
        "creada_en": Utc::now().to_rfc3339(),
    });
    db.notas.lock().unwrap().push(nota.clone());
    Json(nota).into_response()
}

async fn borrar_nota(State(db): State<Arc<StubDb>>, Path(id): Path<String>) -> StatusCode {
    match quitar_por_id(&db.notas, &id) {
        Some(_) => StatusCode::NO_CONTENT,
        None => StatusCode::NOT_FOUND,
    }
}

async fn crear_adjunto(
    State(db): State<Arc<StubDb>>,
    Path(nota_id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    if db.debe_fallar() {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    let adjunto = json!({
        "id": db.siguiente_id("a"),
        "nota_id": nota_id,
        "nombre_archivo": body["nombre_archivo"],
        "creado_en": Utc::now().to_rfc3339(),
    });
    let mut notas = db.notas.lock().unwrap();
    match notas.iter_mut().find(|nota| nota["id"] == nota_id.as_str()) {
        Some(nota) => {
            nota["adjuntos"]
                .as_array_mut()
                .unwrap()
                .push(adjunto.clone());
            Json(adjunto).into_response()
        }
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn borrar_adjunto(State(db): State<Arc<StubDb>>, Path(id): Path<String>) -> StatusCode {
    let mut notas = db.notas.lock().unwrap();
    for nota in notas.iter_mut() {
        let adjuntos = nota["adjuntos"].as_array_mut().unwrap();
        let antes = adjuntos.len();
        adjuntos.retain(|adjunto| adjunto["id"] != id.as_str());
        if adjuntos.len() != antes {
            return StatusCode::NO_CONTENT;
        }
    }
    StatusCode::NOT_FOUND
}

// --- ventas ---

async fn listar_ventas(State(db): State<Arc<StubDb>>) -> Response {
    if db.debe_fallar() {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    listar(&db.ventas)
}

async fn crear_venta(State(db): State<Arc<StubDb>>, Json(mut body): Json<Value>) -> Response {
    if db.debe_fallar() {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    body["id"] = json!(db.siguiente_id("v"));
    body["creado_en"] = json!(Utc::now().to_rfc3339());
    db.ventas.lock().unwrap().push(body.clone());
    Json(body).into_response()
}

async fn actualizar_venta(
    State(db): State<Arc<StubDb>>,
    Path(id): Path<String>,
    Json(mut body): Json<Value>,
) -> Response {
    if db.debe_fallar() {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    let previo = match db
        .ventas
        .lock()
        .unwrap()
        .iter()
        .find(|item| item["id"] == id.as_str())
        .cloned()
    {
        Some(previo) => previo,
        None => return StatusCode::NOT_FOUND.into_response(),
    };
    body["id"] = json!(id);
    body["creado_en"] = previo["creado_en"].clone();
    body["actualizado_en"] = json!(Utc::now().to_rfc3339());
    reemplazar_por_id(&db.ventas, &id, body.clone());
    Json(body).into_response()
}

async fn borrar_venta(State(db): State<Arc<StubDb>>, Path(id): Path<String>) -> StatusCode {
    if db.debe_fallar() {
        return StatusCode::INTERNAL_SERVER_ERROR;
    }
    match quitar_por_id(&db.ventas, &id) {
        Some(_) => StatusCode::NO_CONTENT,
        None => StatusCode::NOT_FOUND,
    }
}

// --- facturas ---

fn decimal_en(valor: &Value) -> Decimal {
    valor
        .as_str()
        .and_then(|texto| texto.parse().ok())
        .unwrap_or_default()
}

/// Computes folio and the money figures the way the real backend would, so
/// the echo is canonical and differs from the submitted draft.
fn completar_factura(db: &StubDb, mut body: Value, id: String, creado_en: Value) -> Value {
    let lineas = body["lineas"].as_array().cloned().unwrap_or_default();
    let subtotal: Decimal = lineas
        .iter()
        .map(|linea| {
            let cantidad = Decimal::from(linea["cantidad"].as_u64().unwrap_or(0));
            decimal_en(&linea["precio"]) * cantidad
        })
        .sum();
    let impuesto = decimal_en(&body["impuesto"]);
    let deposito = decimal_en(&body["deposito"]);
    let total = subtotal + impuesto;

    body["id"] = json!(id);
    if body.get("folio").map(|f| f.is_null()).unwrap_or(true) {
        body["folio"] = json!(format!("F-{:04}", db.contadores.lock().unwrap()["f"]));
    }
    body["subtotal"] = json!(subtotal.to_string());
    body["total"] = json!(total.to_string());
    body["saldo"] = json!((total - deposito).to_string());
    body["creado_en"] = creado_en;
    body
}

async fn listar_facturas(State(db): State<Arc<StubDb>>) -> Response {
    if db.debe_fallar() {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    listar(&db.facturas)
}

async fn listar_papelera(State(db): State<Arc<StubDb>>) -> Response {
    if db.debe_fallar() {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    listar(&db.papelera)
}

async fn crear_factura(State(db): State<Arc<StubDb>>, Json(body): Json<Value>) -> Response {
    if db.debe_fallar() {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    let id = db.siguiente_id("f");
    let factura = completar_factura(&db, body, id, json!(Utc::now().to_rfc3339()));
    db.facturas.lock().unwrap().push(factura.clone());
    Json(factura).into_response()
}

async fn actualizar_factura(
    State(db): State<Arc<StubDb>>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    if db.debe_fallar() {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    let previo = match db
        .facturas
        .lock()
        .unwrap()
        .iter()
        .find(|item| item["id"] == id.as_str())
        .cloned()
    {
        Some(previo) => previo,
        None => return StatusCode::NOT_FOUND.into_response(),
    };
    let mut factura = completar_factura(&db, body, id.clone(), previo["creado_en"].clone());
    factura["folio"] = previo["folio"].clone();
    factura["actualizado_en"] = json!(Utc::now().to_rfc3339());
    reemplazar_por_id(&db.facturas, &id, factura.clone());
    Json(factura).into_response()
}

async fn factura_a_papelera(State(db): State<Arc<StubDb>>, Path(id): Path<String>) -> StatusCode {
    if db.debe_fallar() {
        return StatusCode::INTERNAL_SERVER_ERROR;
    }
    match quitar_por_id(&db.facturas, &id) {
        Some(factura) => {
            db.papelera.lock().unwrap().push(factura);
            StatusCode::NO_CONTENT
        }
        None => StatusCode::NOT_FOUND,
    }
}

async fn restaurar_factura(State(db): State<Arc<StubDb>>, Path(id): Path<String>) -> StatusCode {
    if db.debe_fallar() {
        return StatusCode::INTERNAL_SERVER_ERROR;
    }
    match quitar_por_id(&db.papelera, &id) {
        Some(factura) => {
            db.facturas.lock().unwrap().push(factura);
            StatusCode::NO_CONTENT
        }
        None => StatusCode::NOT_FOUND,
    }
}

async fn purgar_factura(State(db): State<Arc<StubDb>>, Path(id): Path<String>) -> StatusCode {
    if db.debe_fallar() {
        return StatusCode::INTERNAL_SERVER_ERROR;
    }
    match quitar_por_id(&db.papelera, &id) {
        Some(_) => StatusCode::NO_CONTENT,
        None => StatusCode::NOT_FOUND,
    }
}

// --- plantillas ---

async fn listar_plantillas(State(db): State<Arc<StubDb>>) -> Response {
    if db.debe_fallar() {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    listar(&db.plantillas)
}

async fn crear_plantilla(State(db): State<Arc<StubDb>>, Json(mut body): Json<Value>) -> Response {
    if db.debe_fallar() {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    body["id"] = json!(db.siguiente_id("p"));
    body["creada_en"] = json!(Utc::now().to_rfc3339());
    db.plantillas.lock().unwrap().push(body.clone());
    Json(body).into_response()
}

async fn actualizar_plantilla(
    State(db): State<Arc<StubDb>>,
    Path(id): Path<String>,
    Json(mut body): Json<Value>,
) -> Response {
    if db.debe_fallar() {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    let previo = match db
        .plantillas
        .lock()
        .unwrap()
        .iter()
        .find(|item| item["id"] == id.as_str())
        .cloned()
    {
        Some(previo) => previo,
        None => return StatusCode::NOT_FOUND.into_response(),
    };
    body["id"] = json!(id);
    body["creada_en"] = previo["creada_en"].clone();
    body["actualizada_en"] = json!(Utc::now().to_rfc3339());
    reemplazar_por_id(&db.plantillas, &id, body.clone());
    Json(body).into_response()
}

async fn borrar_plantilla(State(db): State<Arc<StubDb>>, Path(id): Path<String>) -> StatusCode {
    if db.debe_fallar() {
        return StatusCode::INTERNAL_SERVER_ERROR;
    }
    match quitar_por_id(&db.plantillas, &id) {
        Some(_) => StatusCode::NO_CONTENT,
        None => StatusCode::NOT_FOUND,
    }
}
