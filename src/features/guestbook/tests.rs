use std::future::IntoFuture;

use axum::http::{header, HeaderValue, StatusCode};
use axum_test::multipart::{MultipartForm, Part};
use serde_json::{json, Value};

use crate::features::guestbook::dtos::{DocumentationStatus, SubmissionResponseDto};
use crate::features::guestbook::models::GuestEntry;
use crate::shared::test_helpers::{
    fake_entry_dto, test_app, valid_entry_dto, FakeBackend, InMemoryGuestRepository,
    TestAppBuilder, ADMIN_TOKEN,
};
use crate::shared::types::{ErrorBody, ListResponse};

fn form_fields() -> MultipartForm {
    let dto = valid_entry_dto();
    MultipartForm::new()
        .add_text("nama", dto.nama)
        .add_text("nik", dto.nik)
        .add_text("desaKelurahan", dto.desa_kelurahan)
        .add_text("alamat", dto.alamat)
        .add_text("noTelepon", dto.no_telepon)
        .add_text("keperluan", dto.keperluan)
}

fn photo_part() -> Part {
    Part::bytes(vec![0xFF, 0xD8, 0xFF, 0xE0])
        .file_name("pelayanan.jpg")
        .mime_type("image/jpeg")
}

#[tokio::test]
async fn test_budi_santoso_without_file_is_created() {
    let app = test_app();

    let response = app.server.post("/guestbook").json(&valid_entry_dto()).await;

    assert_eq!(response.status_code(), StatusCode::CREATED);
    let body: Value = response.json();
    assert!(body["id"].as_i64().unwrap() > 0);
    assert_eq!(body["nama"], "Budi Santoso");
    assert_eq!(body["desaKelurahan"], "Desa Kelir");
    assert!(body["dokumentasiPelayanan"].is_null());
    assert!(body["createdAt"].is_string());
    assert_eq!(app.repository.create_calls(), 1);
}

#[tokio::test]
async fn test_unknown_id_is_not_found() {
    let app = test_app();

    let response = app.server.get("/guestbook/9999").await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    let body: ErrorBody = response.json();
    assert_eq!(body.error, "Data tamu tidak ditemukan");
}

#[tokio::test]
async fn test_non_numeric_id_is_bad_request() {
    let app = test_app();

    for method in ["GET", "PUT", "DELETE"] {
        let response = match method {
            "GET" => app.server.get("/guestbook/abc").await,
            "PUT" => app.server.put("/guestbook/abc").json(&json!({})).await,
            _ => app.server.delete("/guestbook/abc").await,
        };
        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST, "{}", method);
        let body: ErrorBody = response.json();
        assert_eq!(body.error, "ID tidak valid");
    }
}

#[tokio::test]
async fn test_invalid_nik_is_rejected_before_create() {
    let app = test_app();
    let mut dto = valid_entry_dto();
    dto.nik = "35101234".to_string();

    let response = app.server.post("/guestbook").json(&dto).await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: ErrorBody = response.json();
    let fields = body.fields.unwrap();
    assert_eq!(fields["nik"], vec!["NIK harus terdiri dari 16 digit"]);
    assert_eq!(app.repository.create_calls(), 0);
}

#[tokio::test]
async fn test_missing_fields_are_reported_together() {
    let app = test_app();

    let response = app.server.post("/guestbook").json(&json!({})).await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let fields = response.json::<ErrorBody>().fields.unwrap();
    for field in ["nama", "nik", "desaKelurahan", "alamat", "noTelepon", "keperluan"] {
        assert!(fields.contains_key(field), "missing error for {}", field);
    }
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let app = test_app();

    let response = app
        .server
        .post("/guestbook")
        .content_type("application/json")
        .bytes("{\"nama\": ".into())
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(app.repository.create_calls(), 0);
}

#[tokio::test]
async fn test_submit_with_photo_uses_primary_storage() {
    let app = test_app();

    let response = app
        .server
        .post("/guestbook/submit")
        .multipart(form_fields().add_part("file", photo_part()))
        .await;

    assert_eq!(response.status_code(), StatusCode::CREATED);
    let body: SubmissionResponseDto = response.json();
    assert_eq!(body.documentation.status, DocumentationStatus::Primary);
    assert!(body
        .data
        .dokumentasi_pelayanan
        .unwrap()
        .starts_with("https://storage.test/primary/"));
    assert!(body.warnings.is_empty());
    assert_eq!(app.primary.calls(), 1);
    assert_eq!(app.secondary.calls(), 0);
}

#[tokio::test]
async fn test_submit_falls_back_to_local_storage() {
    let app = TestAppBuilder::new()
        .primary(FakeBackend::durable("primary").failing())
        .build();

    let response = app
        .server
        .post("/guestbook/submit")
        .multipart(form_fields().add_part("file", photo_part()))
        .await;

    assert_eq!(response.status_code(), StatusCode::CREATED);
    let body: SubmissionResponseDto = response.json();
    assert_eq!(body.documentation.status, DocumentationStatus::Fallback);
    assert!(body
        .data
        .dokumentasi_pelayanan
        .unwrap()
        .starts_with("/uploads/"));
    assert_eq!(body.warnings.len(), 1);
    assert_eq!(app.secondary.stored_count(), 1);
}

#[tokio::test]
async fn test_submit_without_file_part() {
    let app = test_app();

    let response = app
        .server
        .post("/guestbook/submit")
        .multipart(form_fields())
        .await;

    assert_eq!(response.status_code(), StatusCode::CREATED);
    let body: SubmissionResponseDto = response.json();
    assert_eq!(body.documentation.status, DocumentationStatus::None);
    assert!(body.data.dokumentasi_pelayanan.is_none());
    assert_eq!(app.primary.calls(), 0);
}

#[tokio::test]
async fn test_submit_empty_file_input_counts_as_no_file() {
    let app = test_app();
    let empty = Part::bytes(Vec::new())
        .file_name("")
        .mime_type("application/octet-stream");

    let response = app
        .server
        .post("/guestbook/submit")
        .multipart(form_fields().add_part("file", empty))
        .await;

    assert_eq!(response.status_code(), StatusCode::CREATED);
    assert_eq!(app.primary.calls(), 0);
}

#[tokio::test]
async fn test_submit_non_image_is_field_error() {
    let app = test_app();
    let pdf = Part::bytes(b"%PDF-1.7".to_vec())
        .file_name("surat.pdf")
        .mime_type("application/pdf");

    let response = app
        .server
        .post("/guestbook/submit")
        .multipart(form_fields().add_part("file", pdf))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let fields = response.json::<ErrorBody>().fields.unwrap();
    assert!(fields.contains_key("dokumentasiPelayanan"));
    assert_eq!(app.primary.calls(), 0);
    assert_eq!(app.repository.create_calls(), 0);
}

#[tokio::test]
async fn test_search_matches_any_text_column() {
    let app = test_app();
    for dto in [
        fake_entry_dto("Desa Kelir", "Pengurusan KTP"),
        fake_entry_dto("Desa Ketapang", "Surat pindah ke kelir"),
        fake_entry_dto("Kelurahan Klatak", "Legalisir akta"),
    ] {
        app.server
            .post("/guestbook")
            .json(&dto)
            .await
            .assert_status(StatusCode::CREATED);
    }

    let response = app
        .server
        .get("/guestbook")
        .add_query_param("search", "Kelir")
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let page: ListResponse<GuestEntry> = response.json();
    assert_eq!(page.total, 2);
    assert_eq!(page.meta.total_pages, 1);
    for entry in &page.data {
        let haystack = format!(
            "{} {} {} {}",
            entry.nama, entry.nik, entry.desa_kelurahan, entry.keperluan
        )
        .to_lowercase();
        assert!(haystack.contains("kelir"));
    }
}

#[tokio::test]
async fn test_pagination_meta() {
    let app = test_app();
    for _ in 0..12 {
        app.server
            .post("/guestbook")
            .json(&fake_entry_dto("Kelurahan Bulusan", "Konsultasi bantuan sosial"))
            .await
            .assert_status(StatusCode::CREATED);
    }

    let first: ListResponse<GuestEntry> = app
        .server
        .get("/guestbook")
        .add_query_param("limit", 5)
        .await
        .json();
    assert_eq!(first.total, 12);
    assert_eq!(first.data.len(), 5);
    assert_eq!(first.meta.page, 1);
    assert_eq!(first.meta.limit, 5);
    assert_eq!(first.meta.total_pages, 3);

    let last: ListResponse<GuestEntry> = app
        .server
        .get("/guestbook")
        .add_query_param("limit", 5)
        .add_query_param("page", 3)
        .await
        .json();
    assert_eq!(last.data.len(), 2);

    let defaults: ListResponse<GuestEntry> = app.server.get("/guestbook").await.json();
    assert_eq!(defaults.meta.page, 1);
    assert_eq!(defaults.meta.limit, 10);
    assert_eq!(defaults.data.len(), 10);
}

#[tokio::test]
async fn test_invalid_page_parameter_is_bad_request() {
    let app = test_app();

    let response = app
        .server
        .get("/guestbook")
        .add_query_param("page", "satu")
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_huge_page_returns_empty_page() {
    let app = test_app();
    app.server
        .post("/guestbook")
        .json(&valid_entry_dto())
        .await
        .assert_status(StatusCode::CREATED);

    let response = app
        .server
        .get("/guestbook")
        .add_query_param("page", i64::MAX)
        .add_query_param("limit", 10)
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: ListResponse<GuestEntry> = response.json();
    assert!(body.data.is_empty());
    assert_eq!(body.total, 1);
    assert_eq!(body.meta.page, i64::MAX);
}

#[tokio::test]
async fn test_concurrent_submissions_get_distinct_ids() {
    let app = test_app();

    let first = app
        .server
        .post("/guestbook")
        .json(&fake_entry_dto("Desa Bulusari", "Pengurusan KK"));
    let second = app
        .server
        .post("/guestbook")
        .json(&valid_entry_dto());
    let (first, second) = tokio::join!(first.into_future(), second.into_future());

    let first: GuestEntry = first.json();
    let second: GuestEntry = second.json();
    assert_ne!(first.id, second.id);

    let page: ListResponse<GuestEntry> = app.server.get("/guestbook").await.json();
    assert_eq!(page.total, 2);
    let newest = first.id.max(second.id);
    let oldest = first.id.min(second.id);
    let ids: Vec<i32> = page.data.iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![newest, oldest]);
    assert!(page.data[0].created_at >= page.data[1].created_at);
}

#[tokio::test]
async fn test_duplicate_nik_is_accepted() {
    let app = test_app();

    for _ in 0..2 {
        app.server
            .post("/guestbook")
            .json(&valid_entry_dto())
            .await
            .assert_status(StatusCode::CREATED);
    }
    assert_eq!(app.repository.create_calls(), 2);
}

#[tokio::test]
async fn test_update_and_delete_round() {
    let app = test_app();
    let created: GuestEntry = app
        .server
        .post("/guestbook")
        .json(&valid_entry_dto())
        .await
        .json();
    let path = format!("/guestbook/{}", created.id);

    let updated = app
        .server
        .put(&path)
        .json(&json!({ "keperluan": "Legalisir KK", "noTelepon": "085200001111" }))
        .await;
    assert_eq!(updated.status_code(), StatusCode::OK);
    let updated: GuestEntry = updated.json();
    assert_eq!(updated.keperluan, "Legalisir KK");
    assert_eq!(updated.no_telepon, "085200001111");
    assert_eq!(updated.nama, created.nama);

    let fetched: GuestEntry = app.server.get(&path).await.json();
    assert_eq!(fetched, updated);

    let deleted = app.server.delete(&path).await;
    assert_eq!(deleted.status_code(), StatusCode::OK);
    assert_eq!(deleted.json::<Value>()["message"], "Data tamu berhasil dihapus");

    app.server
        .get(&path)
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_rejects_invalid_values() {
    let app = test_app();
    let created: GuestEntry = app
        .server
        .post("/guestbook")
        .json(&valid_entry_dto())
        .await
        .json();

    let response = app
        .server
        .put(&format!("/guestbook/{}", created.id))
        .json(&json!({ "desaKelurahan": "Desa Tidak Ada" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let fields = response.json::<ErrorBody>().fields.unwrap();
    assert!(fields.contains_key("desaKelurahan"));
}

#[tokio::test]
async fn test_responses_are_not_cacheable() {
    let app = test_app();

    let list = app.server.get("/guestbook").await;
    let missing = app.server.get("/guestbook/1").await;
    let created = app.server.post("/guestbook").json(&valid_entry_dto()).await;

    for response in [list, missing, created] {
        assert_eq!(
            response.header(header::CACHE_CONTROL),
            "no-store, no-cache, must-revalidate, proxy-revalidate"
        );
        assert_eq!(response.header(header::PRAGMA), "no-cache");
        assert_eq!(response.header(header::EXPIRES), "0");
    }
}

#[tokio::test]
async fn test_admin_routes_require_token_when_configured() {
    let app = TestAppBuilder::new().with_admin_token().build();

    let anonymous = app.server.get("/guestbook").await;
    assert_eq!(anonymous.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        anonymous.header(header::CACHE_CONTROL),
        "no-store, no-cache, must-revalidate, proxy-revalidate"
    );

    let wrong = app
        .server
        .get("/guestbook/1")
        .add_header(header::AUTHORIZATION, HeaderValue::from_static("Bearer salah"))
        .await;
    assert_eq!(wrong.status_code(), StatusCode::UNAUTHORIZED);

    let bearer = HeaderValue::from_str(&format!("Bearer {}", ADMIN_TOKEN)).unwrap();
    let admin = app
        .server
        .get("/guestbook")
        .add_header(header::AUTHORIZATION, bearer)
        .await;
    assert_eq!(admin.status_code(), StatusCode::OK);

    // Registering a visit stays public
    app.server
        .post("/guestbook")
        .json(&valid_entry_dto())
        .await
        .assert_status(StatusCode::CREATED);
}

#[tokio::test]
async fn test_persistence_failure_is_reported_with_redacted_detail() {
    let app = TestAppBuilder::new()
        .repository(InMemoryGuestRepository::new().failing())
        .build();

    let response = app.server.post("/guestbook").json(&valid_entry_dto()).await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: ErrorBody = response.json();
    assert_eq!(body.error, "Terjadi kesalahan saat menyimpan data");
    if let Some(detail) = body.detail {
        assert!(!detail.contains("hunter2"));
    }

    let list = app.server.get("/guestbook").await;
    assert_eq!(list.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        list.json::<ErrorBody>().error,
        "Terjadi kesalahan saat mengambil data"
    );
}

#[tokio::test]
async fn test_locations_lists_every_desa_and_kelurahan() {
    let app = test_app();

    let body: Value = app.server.get("/locations").await.json();
    let names: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(Value::as_str)
        .collect();

    assert_eq!(names.len(), 9);
    assert!(names.contains(&"Desa Kelir"));
    assert!(names.contains(&"Kelurahan Gombengsari"));
}
