//! # 식물(Plant) 라우트 핸들러
//!
//! 식물 카탈로그의 REST 엔드포인트를 처리하는 HTTP 핸들러 함수들입니다.
//!
//! ## 엔드포인트
//! - `GET    /api/v1/plants`             → 검색 조건/페이지네이션으로 목록 조회
//! - `GET    /api/v1/plants/{id}`        → 단일 식물 조회 (ETag 지원)
//! - `GET    /api/v1/plants/file/{id}`   → 식물 첨부파일 다운로드
//! - `POST   /api/v1/plants`             → 새 식물 생성
//! - `PUT    /api/v1/plants/{id}`        → 식물 수정 (If-Match 버전 헤더 필수)
//! - `PUT    /api/v1/plants/{id}/file`   → 첨부파일 업로드(교체)
//! - `DELETE /api/v1/plants/{id}`        → 식물 삭제
//!
//! ## Axum 핸들러 패턴
//! 핸들러는 **Extractor(추출기)**를 매개변수로 받습니다:
//! - `State(state)`: 앱 전역 상태 (DB 풀, 검색 설정)
//! - `Path(id)`: URL 경로 파라미터
//! - `Query(..)`: URL 쿼리 파라미터
//! - `Json(body)`: 요청 본문을 JSON으로 파싱
//!
//! 반환 타입이 `Result<T, AppError>`이면 Axum이 자동으로
//! `Ok` → 응답, `Err` → 에러 JSON으로 변환합니다.

use crate::{
    error::AppError,
    models::*,
    services::{
        criteria::{split_query, CriteriaConfig},
        pageable::create_pageable,
        plant_read, plant_write,
    },
};
use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use sqlx::SqlitePool;
use std::collections::HashMap;

/// 애플리케이션 공유 상태
///
/// 모든 요청 핸들러가 `State(state): State<AppState>`로 접근합니다.
/// `criteria`는 시작 시 한 번 만들어지는 불변 검색 설정입니다 —
/// 전역 가변 상태 없이 여기로 주입됩니다.
#[derive(Clone)]
pub struct AppState {
    /// SQLite 연결 풀 (내부적으로 Arc로 공유)
    pub pool: SqlitePool,
    /// 유효한 검색 키와 열거형 값의 불변 목록
    pub criteria: CriteriaConfig,
}

/// 경로 파라미터를 식물 ID로 파싱합니다. 정수가 아니면 404입니다.
fn parse_id(raw: &str) -> Result<i64, AppError> {
    raw.parse::<i64>()
        .map_err(|_| AppError::NotFound(format!("invalid plant id \"{raw}\"")))
}

/// `GET /plants` — 검색 조건과 페이지네이션으로 식물을 검색합니다.
///
/// 쿼리 파라미터 중 `page`/`size`는 페이지 요청으로, 나머지는 전부
/// 검색 조건으로 해석됩니다. 예:
/// `GET /plants?name=fern&species=INDOOR&shade=true&page=2&size=10`
///
/// 알 수 없는 조건 키, 빈 결과, 범위 밖 페이지는 모두 404입니다.
pub async fn get_plants(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Json<Value>, AppError> {
    tracing::debug!(?params, "get_plants");

    let (criteria, page, size) = split_query(params);
    let pageable = create_pageable(page.as_deref(), size.as_deref());

    let slice = plant_read::find(&state.pool, &state.criteria, &criteria, pageable).await?;

    // size 0(무제한 조회)은 create_page의 전제조건을 깨므로 여기서 처리합니다
    if pageable.size == 0 {
        let info = PageInfo {
            size: 0,
            number: pageable.number,
            total_elements: slice.total_elements,
            total_pages: 0,
        };
        return Ok(Json(json!({ "content": slice.content, "page": info })));
    }

    let page = create_page(slice, pageable);
    Ok(Json(json!(page)))
}

/// `GET /plants/{id}` — 단일 식물을 조회합니다.
///
/// ## ETag / 조건부 GET
/// 응답에 `ETag: "버전"` 헤더가 실립니다. 클라이언트가 같은 값을
/// `If-None-Match`로 보내면 본문 없이 304를 돌려줍니다.
pub async fn get_plant_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let id = parse_id(&id)?;
    tracing::debug!(id, "get_plant_by_id");

    let plant = plant_read::find_by_id(&state.pool, id, true).await?;

    let etag = format!("\"{}\"", plant.version);
    if let Some(if_none_match) = headers.get(header::IF_NONE_MATCH) {
        if if_none_match.to_str().ok() == Some(etag.as_str()) {
            tracing::debug!(id, "get_plant_by_id: not modified");
            return Ok(StatusCode::NOT_MODIFIED.into_response());
        }
    }

    Ok(([(header::ETAG, etag)], Json(plant)).into_response())
}

/// `GET /plants/file/{id}` — 식물의 첨부파일을 내려줍니다.
///
/// 파일이 없으면 404입니다. Content-Type은 저장된 mimetype을 쓰고,
/// 없으면 image/png로 간주합니다.
pub async fn get_plant_file(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let id = parse_id(&id)?;
    tracing::debug!(id, "get_plant_file");

    let file = plant_read::find_file_by_plant_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("no file found".to_string()))?;

    let content_type = file.mimetype.as_deref().unwrap_or("image/png").to_string();
    let disposition = format!("inline; filename=\"{}\"", file.filename);
    Ok((
        [
            (header::CONTENT_TYPE, content_type),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        file.data,
    )
        .into_response())
}

/// `POST /plants` — 새 식물을 생성합니다.
///
/// 성공 시 201과 함께 `Location` 헤더에 새 리소스 경로를 돌려줍니다.
/// 같은 이름이 이미 있으면 422입니다.
pub async fn create_plant(
    State(state): State<AppState>,
    Json(req): Json<CreatePlantRequest>,
) -> Result<Response, AppError> {
    tracing::debug!(name = %req.name, "create_plant");

    let id = plant_write::create(&state.pool, &req).await?;

    let location = format!("/api/v1/plants/{id}");
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(json!({ "id": id })),
    )
        .into_response())
}

/// `PUT /plants/{id}` — 식물을 수정합니다.
///
/// ## 낙관적 동시성 제어
/// `If-Match: "버전"` 헤더가 필수입니다:
/// - 헤더 누락 또는 형식 오류 → 428 Precondition Required
/// - 낡은 버전 → 412 Precondition Failed
/// - 성공 → 204, 새 버전이 `ETag` 헤더로 내려갑니다
pub async fn update_plant(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(req): Json<UpdatePlantRequest>,
) -> Result<Response, AppError> {
    let id = parse_id(&id)?;

    let version = headers
        .get(header::IF_MATCH)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::VersionInvalid("missing If-Match header".to_string()))?;
    tracing::debug!(id, version, "update_plant");

    let new_version = plant_write::update(&state.pool, id, &req, version).await?;

    let etag = format!("\"{new_version}\"");
    Ok((StatusCode::NO_CONTENT, [(header::ETAG, etag)]).into_response())
}

/// `PUT /plants/{id}/file` — 첨부파일을 업로드합니다 (기존 파일 교체).
///
/// 본문은 파일 바이트 그대로이고, `Content-Type` 헤더가 mimetype으로
/// 저장됩니다. 파일 이름은 `?filename=` 쿼리 파라미터로 받습니다.
pub async fn upload_plant_file(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<StatusCode, AppError> {
    let id = parse_id(&id)?;

    if body.is_empty() {
        return Err(AppError::BadRequest("empty file body".to_string()));
    }

    let filename = params
        .get("filename")
        .map(String::as_str)
        .unwrap_or("upload.bin");
    let mimetype = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok());
    tracing::debug!(id, filename, "upload_plant_file");

    plant_write::add_file(&state.pool, id, filename, mimetype, &body).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `DELETE /plants/{id}` — 식물을 삭제합니다.
///
/// 자식 행(이미지/첨부파일)도 한 트랜잭션으로 함께 사라집니다.
/// 성공 시 204, 해당 ID가 없으면 404입니다.
pub async fn delete_plant(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let id = parse_id(&id)?;
    tracing::debug!(id, "delete_plant");

    let deleted = plant_write::delete(&state.pool, id).await?;
    if !deleted {
        return Err(AppError::NotFound(format!("no plant with id {id}")));
    }
    Ok(StatusCode::NO_CONTENT)
}
