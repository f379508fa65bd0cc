// Copyright (C) 2024 The Ghostpir Developers. All rights reserved.
//
// SPDX-License-Identifier: Apache-2.0

//! Black-box end-to-end scenarios (S1-S6 plus vector-length enforcement),
//! driving the router in-process via `tower::ServiceExt::oneshot` rather
//! than binding a real socket.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use ghostpir_api::{build_router, AppState};
use ghostpir_catalog::CatalogStore;
use ghostpir_session::SessionStore;
use ghostpir_storage::ChunkCache;
use ghostpir_utils::Config;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

fn test_state() -> (Arc<AppState>, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    std::env::set_var("ADMIN_SECRET", "test-secret");
    let config = Config::new(dir.path().join("data"), dir.path().join("uploads"));
    let catalog = CatalogStore::open(config.catalog_db_path()).unwrap();
    let state = Arc::new(AppState {
        catalog,
        cache: ChunkCache::new(),
        sessions: SessionStore::default(),
        config,
    });
    (state, dir)
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn multipart_body(
    boundary: &str,
    fields: &[(&str, &str)],
    file_field: &str,
    file_name: &str,
    file_bytes: &[u8],
) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
        body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
        );
        body.extend_from_slice(value.as_bytes());
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{file_field}\"; filename=\"{file_name}\"\r\n\
             Content-Type: application/octet-stream\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(file_bytes);
    body.extend_from_slice(b"\r\n");
    body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());
    body
}

async fn upload_module(
    state: &Arc<AppState>,
    title: &str,
    topic: &str,
    tier: i64,
    filename: &str,
    raw: &[u8],
) -> Value {
    let boundary = "GhostpirBoundary";
    let body = multipart_body(
        boundary,
        &[
            ("admin_key", "test-secret"),
            ("title", title),
            ("topic", topic),
            ("tier", &tier.to_string()),
        ],
        "file",
        filename,
        raw,
    );

    let request = Request::builder()
        .method("POST")
        .uri("/admin/upload")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .unwrap();

    let response = build_router(state.clone()).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await
}

fn flate2_compress(raw: &[u8]) -> Vec<u8> {
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;
    let mut encoder = GzEncoder::new(Vec::new(), Compression::new(6));
    encoder.write_all(raw).unwrap();
    encoder.finish().unwrap()
}

#[tokio::test]
async fn s1_single_small_module_roundtrips() {
    let (state, _dir) = test_state();
    let upload = upload_module(&state, "A", "x", 1, "hello.txt", b"hello\n").await;
    let module_id = upload["module_id"].as_i64().unwrap();
    assert_eq!(module_id, 1);

    let router = build_router(state.clone());
    let response = router
        .oneshot(Request::get("/catalog").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let catalog = body_json(response).await;
    let modules = catalog["modules"].as_array().unwrap();
    assert_eq!(modules.len(), 1);
    assert_eq!(modules[0]["id"], 1);
    assert_eq!(modules[0]["chunk_count"], 1);
    assert_eq!(modules[0]["filename"], "hello.txt");

    let compressed = flate2_compress(b"hello\n");
    assert_eq!(modules[0]["compressed_size"], compressed.len() as i64);

    let router = build_router(state.clone());
    let kpir_req = Request::builder()
        .method("POST")
        .uri("/kpir")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({"token": "unused-but-required-shape", "vectors": [[1],[0],[0]], "chunk_index": 0}).to_string(),
        ))
        .unwrap();
    // No session issued yet: expect 401, proving session gating runs before
    // vector validation.
    let response = router.oneshot(kpir_req).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let router = build_router(state.clone());
    let session_req = Request::builder()
        .method("POST")
        .uri("/session")
        .header("content-type", "application/json")
        .body(Body::from(json!({"ghost_id": "g"}).to_string()))
        .unwrap();
    let response = router.oneshot(session_req).await.unwrap();
    let session = body_json(response).await;
    let token = session["token"].as_str().unwrap().to_string();

    let router = build_router(state.clone());
    let kpir_req = Request::builder()
        .method("POST")
        .uri("/kpir")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({"token": token, "vectors": [[1],[0],[0]], "chunk_index": 0}).to_string(),
        ))
        .unwrap();
    let response = router.oneshot(kpir_req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let result = body_json(response).await;
    let responses = result["responses"].as_array().unwrap();
    assert_eq!(responses.len(), 3);

    let mut summed = vec![0u32; 4096];
    for r in responses {
        for (i, b) in r.as_array().unwrap().iter().enumerate() {
            summed[i] += b.as_u64().unwrap() as u32;
        }
    }
    let mut expected = vec![0u8; 4096];
    expected[..compressed.len()].copy_from_slice(&compressed);
    for (i, e) in expected.iter().enumerate() {
        assert_eq!((summed[i] % 256) as u8, *e);
    }
}

#[tokio::test]
async fn s2_short_chunk_contributes_zero() {
    let (state, _dir) = test_state();
    let raw1: Vec<u8> = (0..3500u32).map(|i| (i % 251) as u8).collect();
    let raw2: Vec<u8> = (0..9000u32).map(|i| (i % 241) as u8).collect();
    upload_module(&state, "M1", "x", 1, "m1.bin", &raw1).await;
    upload_module(&state, "M2", "x", 1, "m2.bin", &raw2).await;

    let router = build_router(state.clone());
    let session_req = Request::builder()
        .method("POST")
        .uri("/session")
        .header("content-type", "application/json")
        .body(Body::from(json!({"ghost_id": "g"}).to_string()))
        .unwrap();
    let response = router.oneshot(session_req).await.unwrap();
    let token = body_json(response).await["token"].as_str().unwrap().to_string();

    // Module 1 (selector row 0) has no chunk index 1 -> all-zero response.
    let router = build_router(state.clone());
    let req = Request::builder()
        .method("POST")
        .uri("/kpir")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({"token": token, "vectors": [[1,0],[0,0],[0,0]], "chunk_index": 1}).to_string(),
        ))
        .unwrap();
    let response = router.oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let result = body_json(response).await;
    for r in result["responses"].as_array().unwrap() {
        assert!(r.as_array().unwrap().iter().all(|b| b.as_u64() == Some(0)));
    }
}

#[tokio::test]
async fn s3_session_tokens_are_distinct() {
    let (state, _dir) = test_state();
    let router = build_router(state.clone());
    let req = Request::builder()
        .method("POST")
        .uri("/session")
        .header("content-type", "application/json")
        .body(Body::from(json!({"ghost_id": "g"}).to_string()))
        .unwrap();
    let a = body_json(router.oneshot(req).await.unwrap()).await;

    let router = build_router(state.clone());
    let req = Request::builder()
        .method("POST")
        .uri("/session")
        .header("content-type", "application/json")
        .body(Body::from(json!({"ghost_id": "g"}).to_string()))
        .unwrap();
    let b = body_json(router.oneshot(req).await.unwrap()).await;

    let token_a = a["token"].as_str().unwrap();
    let token_b = b["token"].as_str().unwrap();
    assert_eq!(token_a.len(), 64);
    assert_eq!(token_b.len(), 64);
    assert_ne!(token_a, token_b);
}

#[tokio::test]
async fn s4_unknown_token_is_rejected() {
    let (state, _dir) = test_state();
    let router = build_router(state.clone());
    let req = Request::builder()
        .method("POST")
        .uri("/kpir")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({"token": "deadbeef".repeat(8), "vectors": [[],[],[]], "chunk_index": 0}).to_string(),
        ))
        .unwrap();
    let response = router.oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn s5_delete_cascades_to_disk_and_cache() {
    let (state, _dir) = test_state();
    let upload = upload_module(&state, "A", "x", 1, "hello.txt", b"hello\n").await;
    let module_id = upload["module_id"].as_i64().unwrap();
    let chunk_dir = state.config.module_chunk_dir(module_id);
    assert!(chunk_dir.exists());

    let router = build_router(state.clone());
    let req = Request::builder()
        .method("DELETE")
        .uri(format!("/admin/modules/{module_id}"))
        .header("content-type", "application/json")
        .body(Body::from(json!({"admin_key": "test-secret"}).to_string()))
        .unwrap();
    let response = router.oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(!chunk_dir.exists());

    let router = build_router(state.clone());
    let req = Request::get("/catalog").body(Body::empty()).unwrap();
    let catalog = body_json(router.oneshot(req).await.unwrap()).await;
    assert!(catalog["modules"].as_array().unwrap().is_empty());

    let router = build_router(state.clone());
    let req = Request::get(format!("/integrity?module_id={module_id}&chunk_index=0"))
        .body(Body::empty())
        .unwrap();
    let response = router.oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn s6_all_zero_vectors_on_three_modules() {
    let (state, _dir) = test_state();
    upload_module(&state, "A", "x", 1, "a.bin", b"aaaa").await;
    upload_module(&state, "B", "x", 1, "b.bin", b"bbbb").await;
    upload_module(&state, "C", "x", 1, "c.bin", b"cccc").await;

    let router = build_router(state.clone());
    let session_req = Request::builder()
        .method("POST")
        .uri("/session")
        .header("content-type", "application/json")
        .body(Body::from(json!({"ghost_id": "g"}).to_string()))
        .unwrap();
    let token = body_json(router.oneshot(session_req).await.unwrap()).await["token"]
        .as_str()
        .unwrap()
        .to_string();

    let router = build_router(state.clone());
    let req = Request::builder()
        .method("POST")
        .uri("/kpir")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({
                "token": token,
                "vectors": [[0,0,0],[0,0,0],[0,0,0]],
                "chunk_index": 0
            })
            .to_string(),
        ))
        .unwrap();
    let response = router.oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let result = body_json(response).await;
    let responses = result["responses"].as_array().unwrap();
    assert_eq!(responses.len(), 3);
    for r in responses {
        let bytes = r.as_array().unwrap();
        assert_eq!(bytes.len(), 4096);
        assert!(bytes.iter().all(|b| b.as_u64() == Some(0)));
    }
}

#[tokio::test]
async fn vector_length_mismatch_is_bad_request_without_touching_engine() {
    let (state, _dir) = test_state();
    upload_module(&state, "A", "x", 1, "a.bin", b"aaaa").await;

    let router = build_router(state.clone());
    let session_req = Request::builder()
        .method("POST")
        .uri("/session")
        .header("content-type", "application/json")
        .body(Body::from(json!({"ghost_id": "g"}).to_string()))
        .unwrap();
    let token = body_json(router.oneshot(session_req).await.unwrap()).await["token"]
        .as_str()
        .unwrap()
        .to_string();

    let router = build_router(state.clone());
    let req = Request::builder()
        .method("POST")
        .uri("/kpir")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({"token": token, "vectors": [[1,2],[0],[0]], "chunk_index": 0}).to_string(),
        ))
        .unwrap();
    let response = router.oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn kpir_on_empty_cache_is_service_unavailable() {
    let (state, _dir) = test_state();
    let router = build_router(state.clone());
    let session_req = Request::builder()
        .method("POST")
        .uri("/session")
        .header("content-type", "application/json")
        .body(Body::from(json!({"ghost_id": "g"}).to_string()))
        .unwrap();
    let token = body_json(router.oneshot(session_req).await.unwrap()).await["token"]
        .as_str()
        .unwrap()
        .to_string();

    let router = build_router(state.clone());
    let req = Request::builder()
        .method("POST")
        .uri("/kpir")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({"token": token, "vectors": [[],[],[]], "chunk_index": 0}).to_string(),
        ))
        .unwrap();
    let response = router.oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn admin_operations_reject_wrong_secret() {
    let (state, _dir) = test_state();
    let boundary = "GhostpirBoundary";
    let body = multipart_body(
        boundary,
        &[
            ("admin_key", "wrong"),
            ("title", "A"),
            ("topic", "x"),
            ("tier", "1"),
        ],
        "file",
        "a.bin",
        b"aaaa",
    );
    let router = build_router(state.clone());
    let req = Request::builder()
        .method("POST")
        .uri("/admin/upload")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .unwrap();
    let response = router.oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn quiz_add_list_and_delete() {
    let (state, _dir) = test_state();
    let upload = upload_module(&state, "A", "x", 1, "a.bin", b"aaaa").await;
    let module_id = upload["module_id"].as_i64().unwrap();

    let router = build_router(state.clone());
    let req = Request::builder()
        .method("POST")
        .uri("/admin/quiz")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({
                "admin_key": "test-secret",
                "module_id": module_id,
                "question": "2+2?",
                "options": ["3", "4"],
                "correct": 1
            })
            .to_string(),
        ))
        .unwrap();
    let response = router.oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let added = body_json(response).await;
    let question_id = added["question_id"].as_i64().unwrap();

    let router = build_router(state.clone());
    let req = Request::get(format!("/quiz/{module_id}")).body(Body::empty()).unwrap();
    let listed = body_json(router.oneshot(req).await.unwrap()).await;
    assert_eq!(listed["questions"].as_array().unwrap().len(), 1);

    let router = build_router(state.clone());
    let req = Request::builder()
        .method("DELETE")
        .uri(format!("/admin/quiz/{question_id}"))
        .header("content-type", "application/json")
        .body(Body::from(json!({"admin_key": "test-secret"}).to_string()))
        .unwrap();
    let response = router.oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
