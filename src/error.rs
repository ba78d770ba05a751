//! # 에러 처리 모듈
//!
//! 애플리케이션에서 발생할 수 있는 모든 에러 타입을 정의합니다.
//! Rust에서는 예외(exception) 대신 `Result<T, E>` 타입으로 에러를 처리합니다.
//!
//! 이 모듈의 핵심:
//! - `AppError` 열거형(enum): 모든 에러 종류를 하나의 타입으로 통합
//! - `IntoResponse` 구현: 에러를 HTTP 응답으로 자동 변환
//!
//! ## NotFound에 대한 메모
//! "결과 없음", "범위 밖 페이지", "잘못된 검색 조건"은 전부 같은
//! `NotFound`로 수렴합니다 (기존 동작과의 호환을 위해 보존).
//! 원인 구분은 메시지 텍스트와 발생 지점의 debug 로그로만 가능합니다.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// 애플리케이션에서 발생할 수 있는 모든 에러 종류
///
/// 각 에러 variant는 적절한 HTTP 상태 코드와 메시지로 변환됩니다.
/// 핸들러에서 `Result<T, AppError>`를 반환하면,
/// Axum이 자동으로 `IntoResponse`를 호출하여 HTTP 응답으로 변환합니다.
#[derive(Debug, Error)]
pub enum AppError {
    /// 요청한 리소스를 찾을 수 없음 (HTTP 404).
    /// 메시지에 원인(ID, 검색 조건, 페이지 번호 등)이 들어갑니다.
    #[error("Not found: {0}")]
    NotFound(String),

    /// 같은 이름의 식물이 이미 존재함 — 생성 시 중복 검사 (HTTP 422)
    #[error("A plant named \"{0}\" already exists")]
    NameExists(String),

    /// 버전 토큰의 형식이 잘못됨, 예: 따옴표 누락 (HTTP 428)
    #[error("Invalid version token: {0}")]
    VersionInvalid(String),

    /// 버전 토큰이 저장된 버전보다 오래됨 — 낙관적 동시성 충돌 (HTTP 412)
    #[error("Outdated version: {0}")]
    VersionOutdated(i64),

    /// 잘못된 요청 (HTTP 400)
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// 데이터베이스 오류 (HTTP 500)
    /// #[from]: sqlx::Error → AppError::Database 자동 변환.
    /// sqlx 호출에 `?`를 쓰면 이 variant로 전파됩니다.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl IntoResponse for AppError {
    /// AppError를 HTTP 응답으로 변환합니다.
    ///
    /// 내부 에러(Database)는 실제 에러 내용을 로그에만 기록하고,
    /// 클라이언트에는 일반적인 메시지만 반환합니다 (보안을 위해).
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AppError::NotFound(ref msg) => (StatusCode::NOT_FOUND, "not_found", msg.clone()),
            AppError::NameExists(_) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "name_exists", self.to_string())
            }
            AppError::VersionInvalid(_) => (
                StatusCode::PRECONDITION_REQUIRED,
                "version_invalid",
                self.to_string(),
            ),
            AppError::VersionOutdated(_) => (
                StatusCode::PRECONDITION_FAILED,
                "version_outdated",
                self.to_string(),
            ),
            AppError::BadRequest(ref msg) => (StatusCode::BAD_REQUEST, "bad_request", msg.clone()),
            AppError::Database(ref e) => {
                tracing::error!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "database_error",
                    "A database error occurred".to_string(),
                )
            }
        };

        // 결과: { "error": { "code": "not_found", "message": "..." } }
        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
