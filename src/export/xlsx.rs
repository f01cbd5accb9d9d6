// Minimal SpreadsheetML writer. Only what the exports need: inline-string
// and numeric cells, one worksheet per sheet, no styles. Zip entries carry a
// fixed timestamp so the same input always produces the same bytes.

use std::io::{Cursor, Write as _};

use anyhow::{Context, Result};
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

#[derive(Debug, Clone)]
pub enum Celda {
    Texto(String),
    Numero(String),
}

impl Celda {
    pub fn texto(valor: impl Into<String>) -> Self {
        Celda::Texto(valor.into())
    }

    /// The caller formats the number; decimals arrive via `to_string()` so
    /// no float round trip sneaks into the output.
    pub fn numero(valor: impl ToString) -> Self {
        Celda::Numero(valor.to_string())
    }
}

#[derive(Debug, Clone)]
pub struct Hoja {
    pub nombre: String,
    pub filas: Vec<Vec<Celda>>,
}

impl Hoja {
    pub fn new(nombre: &str) -> Self {
        Hoja {
            nombre: nombre.to_string(),
            filas: Vec::new(),
        }
    }

    pub fn fila(&mut self, celdas: Vec<Celda>) {
        self.filas.push(celdas);
    }
}

/// Serializes the workbook to xlsx bytes. Does not mutate its input and is
/// deterministic for a given input.
pub fn escribir_libro(hojas: &[Hoja]) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    // Default zip::DateTime is the DOS epoch; fixing it keeps the archive
    // byte-identical across runs.
    let opciones = SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Deflated)
        .last_modified_time(zip::DateTime::default());

    zip.start_file("[Content_Types].xml", opciones)?;
    zip.write_all(content_types(hojas.len()).as_bytes())?;

    zip.start_file("_rels/.rels", opciones)?;
    zip.write_all(RELS_RAIZ.as_bytes())?;

    zip.start_file("xl/workbook.xml", opciones)?;
    zip.write_all(workbook(hojas).as_bytes())?;

    zip.start_file("xl/_rels/workbook.xml.rels", opciones)?;
    zip.write_all(workbook_rels(hojas.len()).as_bytes())?;

    for (indice, hoja) in hojas.iter().enumerate() {
        zip.start_file(format!("xl/worksheets/sheet{}.xml", indice + 1), opciones)?;
        zip.write_all(worksheet(hoja).as_bytes())?;
    }

    let cursor = zip.finish().context("no se pudo cerrar el libro xlsx")?;
    Ok(cursor.into_inner())
}

fn content_types(hojas: usize) -> String {
    let mut overrides = String::new();
    for indice in 1..=hojas {
        overrides.push_str(&format!(
            "<Override PartName=\"/xl/worksheets/sheet{indice}.xml\" \
             ContentType=\"application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml\"/>"
        ));
    }
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
         <Types xmlns=\"http://schemas.openxmlformats.org/package/2006/content-types\">\
         <Default Extension=\"rels\" ContentType=\"application/vnd.openxmlformats-package.relationships+xml\"/>\
         <Default Extension=\"xml\" ContentType=\"application/xml\"/>\
         <Override PartName=\"/xl/workbook.xml\" \
          ContentType=\"application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml\"/>\
         {overrides}</Types>"
    )
}

const RELS_RAIZ: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
<Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">\
<Relationship Id=\"rId1\" \
Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument\" \
Target=\"xl/workbook.xml\"/></Relationships>";

fn workbook(hojas: &[Hoja]) -> String {
    let mut sheets = String::new();
    for (indice, hoja) in hojas.iter().enumerate() {
        sheets.push_str(&format!(
            "<sheet name=\"{}\" sheetId=\"{}\" r:id=\"rId{}\"/>",
            escapar(&hoja.nombre),
            indice + 1,
            indice + 1
        ));
    }
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
         <workbook xmlns=\"http://schemas.openxmlformats.org/spreadsheetml/2006/main\" \
         xmlns:r=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships\">\
         <sheets>{sheets}</sheets></workbook>"
    )
}

fn workbook_rels(hojas: usize) -> String {
    let mut rels = String::new();
    for indice in 1..=hojas {
        rels.push_str(&format!(
            "<Relationship Id=\"rId{indice}\" \
             Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet\" \
             Target=\"worksheets/sheet{indice}.xml\"/>"
        ));
    }
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
         <Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">\
         {rels}</Relationships>"
    )
}

fn worksheet(hoja: &Hoja) -> String {
    let mut filas = String::new();
    for celdas in &hoja.filas {
        filas.push_str("<row>");
        for celda in celdas {
            match celda {
                Celda::Texto(texto) => filas.push_str(&format!(
                    "<c t=\"inlineStr\"><is><t xml:space=\"preserve\">{}</t></is></c>",
                    escapar(texto)
                )),
                Celda::Numero(valor) => {
                    filas.push_str(&format!("<c><v>{}</v></c>", escapar(valor)))
                }
            }
        }
        filas.push_str("</row>");
    }
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
         <worksheet xmlns=\"http://schemas.openxmlformats.org/spreadsheetml/2006/main\">\
         <sheetData>{filas}</sheetData></worksheet>"
    )
}

fn escapar(texto: &str) -> String {
    texto
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
