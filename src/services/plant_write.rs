//! # 식물 쓰기 서비스
//!
//! 생성/수정/삭제와 첨부파일 업로드의 비즈니스 규칙을 담당합니다:
//! - 생성: 이름 중복 검사, 키워드 대문자 정규화, 자식 포함 트랜잭션 삽입
//! - 수정: 낙관적 동시성 제어 — 호출자가 보낸 버전 토큰이 저장된 버전보다
//!   오래되면 거부하고, 수락된 수정마다 버전을 정확히 1 올립니다
//! - 삭제: 자식 행까지 단일 트랜잭션으로 제거

use crate::db;
use crate::error::AppError;
use crate::models::*;
use crate::services::plant_read;
use sqlx::SqlitePool;

/// 버전 토큰의 최대 자릿수 (`"0"` ~ `"999"`).
const VERSION_MAX_DIGITS: usize = 3;

/// 새 식물을 만듭니다.
///
/// # 반환값
/// 새로 부여된 식물 ID. 버전은 0으로 시작합니다.
///
/// # 에러
/// 같은 이름의 식물이 이미 있으면 `NameExists`.
pub async fn create(pool: &SqlitePool, req: &CreatePlantRequest) -> Result<i64, AppError> {
    tracing::debug!(name = %req.name, "create");

    if db::name_exists(pool, &req.name).await? {
        return Err(AppError::NameExists(req.name.clone()));
    }

    // 키워드는 저장 전에 대문자/중복 제거로 정규화됩니다
    let keywords = join_keywords(req.keywords.as_deref().unwrap_or(&[]));
    let id = db::create_plant(pool, req, keywords).await?;

    // 알림 발송은 외부 협력자 — 여기서는 이벤트만 기록합니다
    tracing::info!(id, name = %req.name, "create: new plant");
    Ok(id)
}

/// 기존 식물을 수정합니다.
///
/// # 매개변수
/// - `version`: 호출자가 기대하는 버전 토큰, 따옴표 포함 (예: `"0"`)
///
/// # 반환값
/// 낙관적 동시성 제어에 따른 **새** 버전 번호.
///
/// # 에러
/// - `NotFound`: 해당 ID의 식물이 없음
/// - `VersionInvalid`: 토큰이 `"숫자"` 형식이 아님
/// - `VersionOutdated`: 토큰이 저장된 버전보다 오래됨
pub async fn update(
    pool: &SqlitePool,
    id: i64,
    req: &UpdatePlantRequest,
    version: &str,
) -> Result<i64, AppError> {
    tracing::debug!(id, version, "update");

    let expected = parse_version(version)?;

    let row = db::find_plant_row(pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("no plant with id {id}")))?;
    if expected < row.version {
        tracing::debug!(expected, stored = row.version, "update: version outdated");
        return Err(AppError::VersionOutdated(expected));
    }

    let keywords = req.keywords.as_deref().map(join_keywords);
    let affected = db::update_plant(pool, id, req, keywords).await?;
    if affected == 0 {
        // 버전 검사와 수정 사이에 행이 사라진 경우
        return Err(AppError::NotFound(format!("no plant with id {id}")));
    }

    let new_version = row.version + 1;
    tracing::debug!(id, new_version, "update: done");
    Ok(new_version)
}

/// 식물을 ID로 삭제합니다. 자식 행들도 같은 트랜잭션에서 제거됩니다.
///
/// # 반환값
/// - `Ok(true)`: 식물이 있었고 삭제됨
/// - `Ok(false)`: 해당 ID의 식물이 없음
pub async fn delete(pool: &SqlitePool, id: i64) -> Result<bool, AppError> {
    tracing::debug!(id, "delete");
    let deleted = db::delete_plant(pool, id).await?;
    tracing::debug!(id, deleted, "delete: done");
    Ok(deleted)
}

/// 기존 식물에 첨부파일(예: 사진)을 저장합니다.
///
/// 이미 파일이 있으면 교체합니다 — 식물당 파일은 최대 1개입니다.
///
/// # 에러
/// 해당 ID의 식물이 없으면 `NotFound`.
pub async fn add_file(
    pool: &SqlitePool,
    plant_id: i64,
    filename: &str,
    mimetype: Option<&str>,
    data: &[u8],
) -> Result<(), AppError> {
    tracing::debug!(plant_id, filename, "add_file");

    // 식물이 있는지 먼저 확인합니다 (없으면 NotFound 전파)
    plant_read::find_by_id(pool, plant_id, false).await?;

    db::replace_file(pool, plant_id, filename, mimetype, data).await?;
    Ok(())
}

/// `"숫자"` 형식의 버전 토큰을 파싱합니다 (예: `"0"` → 0).
///
/// 최대 3자리까지 허용합니다. 형식이 어긋나면 `VersionInvalid`입니다.
fn parse_version(version: &str) -> Result<i64, AppError> {
    let invalid = || AppError::VersionInvalid(version.to_string());

    let digits = version
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .ok_or_else(invalid)?;
    if digits.is_empty()
        || digits.len() > VERSION_MAX_DIGITS
        || !digits.bytes().all(|b| b.is_ascii_digit())
    {
        return Err(invalid());
    }
    digits.parse::<i64>().map_err(|_| invalid())
}
