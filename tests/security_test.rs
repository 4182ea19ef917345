mod common;

use axum::http::StatusCode;
use common::{Part, body_string, data_xlsx, scratch_entries, setup, setup_with, upload_request};
use serde_json::Value;
use tower::ServiceExt;

#[tokio::test]
async fn test_missing_file_field_is_rejected() {
    let (dir, app) = setup();

    let response = app
        .oneshot(upload_request(
            "/upload",
            &[Part::Text {
                name: "Question",
                value: "anything?",
            }],
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_string(response).await, "No file uploaded");
    assert_eq!(scratch_entries(dir.path()), 0);
}

#[tokio::test]
async fn test_file_under_wrong_field_name_is_missing() {
    let (dir, app) = setup();
    let contents = data_xlsx();

    let response = app
        .oneshot(upload_request(
            "/upload",
            &[Part::File {
                name: "file",
                filename: "data.xlsx",
                contents: &contents,
            }],
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_string(response).await, "No file uploaded");
    assert_eq!(scratch_entries(dir.path()), 0);
}

#[tokio::test]
async fn test_empty_filename_is_rejected() {
    let (dir, app) = setup();

    let response = app
        .oneshot(upload_request(
            "/upload",
            &[Part::File {
                name: "excel_file",
                filename: "",
                contents: b"",
            }],
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_string(response).await, "No selected file");
    assert_eq!(scratch_entries(dir.path()), 0);
}

#[tokio::test]
async fn test_disallowed_extensions_are_never_parsed() {
    let (dir, app) = setup();

    // Garbage content: parsing it would answer 500, not 400
    for filename in ["notes.csv", "report.pdf", "macro.xlsm", "noextension", "evil.xlsx.exe"] {
        let response = app
            .clone()
            .oneshot(upload_request(
                "/upload",
                &[Part::File {
                    name: "excel_file",
                    filename,
                    contents: b"not a spreadsheet",
                }],
            ))
            .await
            .unwrap();

        assert_eq!(
            response.status(),
            StatusCode::BAD_REQUEST,
            "{} should be rejected",
            filename
        );
        let body = body_string(response).await;
        assert!(body.starts_with("File type not allowed"), "{}", body);
        assert_eq!(scratch_entries(dir.path()), 0);
    }
}

#[tokio::test]
async fn test_path_traversal_filename_stays_in_scratch_dir() {
    let (dir, app) = setup();
    let contents = data_xlsx();

    let response = app
        .oneshot(upload_request(
            "/api/preview",
            &[Part::File {
                name: "excel_file",
                filename: "../../outside.xlsx",
                contents: &contents,
            }],
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json: Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(json["filename"], "outside.xlsx");
    assert!(!dir.path().join("../../outside.xlsx").exists());
    assert_eq!(scratch_entries(dir.path()), 0);
}

#[tokio::test]
async fn test_corrupt_spreadsheet_is_a_server_error() {
    let (dir, app) = setup();

    let response = app
        .oneshot(upload_request(
            "/upload",
            &[Part::File {
                name: "excel_file",
                filename: "broken.xlsx",
                contents: b"PK\x03\x04 truncated zip",
            }],
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_string(response).await;
    assert!(body.starts_with("Error processing file: "), "{}", body);
    assert!(body.len() > "Error processing file: ".len());
    assert_eq!(scratch_entries(dir.path()), 0);
}

#[tokio::test]
async fn test_xlsx_content_declared_as_xls_is_a_server_error() {
    let (dir, app) = setup();
    let contents = data_xlsx();

    let response = app
        .oneshot(upload_request(
            "/api/preview",
            &[Part::File {
                name: "excel_file",
                filename: "data.xls",
                contents: &contents,
            }],
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json: Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert!(
        json["error"]
            .as_str()
            .unwrap()
            .starts_with("Error processing file: ")
    );
    assert_eq!(scratch_entries(dir.path()), 0);
}

#[tokio::test]
async fn test_api_errors_are_json() {
    let (_dir, app) = setup();

    let response = app
        .oneshot(upload_request(
            "/api/preview",
            &[Part::File {
                name: "excel_file",
                filename: "table.ods",
                contents: b"whatever",
            }],
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json: Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(
        json["error"],
        "File type not allowed: '.ods'. Allowed types: xls, xlsx"
    );
}

#[tokio::test]
async fn test_oversized_upload_is_rejected() {
    let (dir, app) = setup_with(|config| config.max_file_size = 1024);
    let contents = vec![b'x'; 8 * 1024];

    let response = app
        .oneshot(upload_request(
            "/upload",
            &[Part::File {
                name: "excel_file",
                filename: "huge.xlsx",
                contents: &contents,
            }],
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(scratch_entries(dir.path()), 0);
}
