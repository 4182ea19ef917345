#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{Request, Response},
};
use http_body_util::BodyExt;
use rust_xlsxwriter::Workbook;
use sheet_preview::config::AppConfig;
use sheet_preview::{AppState, create_app};
use std::path::Path;
use tempfile::TempDir;

pub const BOUNDARY: &str = "---------------------------123456789012345678901234567";

pub enum Part<'a> {
    File {
        name: &'a str,
        filename: &'a str,
        contents: &'a [u8],
    },
    Text {
        name: &'a str,
        value: &'a str,
    },
}

/// App backed by a fresh scratch directory
pub fn setup() -> (TempDir, Router) {
    setup_with(|_| {})
}

pub fn setup_with(adjust: impl FnOnce(&mut AppConfig)) -> (TempDir, Router) {
    let dir = tempfile::tempdir().unwrap();
    let mut config = AppConfig::development(dir.path());
    adjust(&mut config);
    let app = create_app(AppState::new(config).unwrap());
    (dir, app)
}

pub fn multipart_body(parts: &[Part]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match part {
            Part::File {
                name,
                filename,
                contents,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n\
                         Content-Type: application/octet-stream\r\n\r\n",
                        name, filename
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(contents);
            }
            Part::Text { name, value } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"\r\n\r\n{}",
                        name, value
                    )
                    .as_bytes(),
                );
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

pub fn upload_request(uri: &str, parts: &[Part]) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            "Content-Type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(multipart_body(parts)))
        .unwrap()
}

/// Builds an .xlsx workbook; cells that parse as numbers are written as numbers
pub fn xlsx(sheets: &[(&str, &[&[&str]])]) -> Vec<u8> {
    let mut workbook = Workbook::new();
    for (name, rows) in sheets {
        let sheet = workbook.add_worksheet();
        sheet.set_name(*name).unwrap();
        for (r, row) in rows.iter().enumerate() {
            for (c, value) in row.iter().enumerate() {
                match value.parse::<f64>() {
                    Ok(number) => sheet.write_number(r as u32, c as u16, number).unwrap(),
                    Err(_) => sheet.write_string(r as u32, c as u16, *value).unwrap(),
                };
            }
        }
    }
    workbook.save_to_buffer().unwrap()
}

/// Two columns, five data rows
pub fn data_xlsx() -> Vec<u8> {
    xlsx(&[(
        "Sheet1",
        &[
            &["name", "score"],
            &["ann", "10"],
            &["bob", "20"],
            &["cid", "30"],
            &["dee", "40"],
            &["eve", "50"],
        ],
    )])
}

pub async fn body_string(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub fn scratch_entries(dir: &Path) -> usize {
    std::fs::read_dir(dir).unwrap().count()
}
