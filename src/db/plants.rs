//! # 식물 데이터베이스 쿼리 모듈
//!
//! `plant`와 `plant_image` 테이블에 대한 쿼리 함수들이 정의되어 있습니다.
//!
//! 모든 함수는 `async`이며 `SqlitePool`을 받아 데이터베이스와 상호작용합니다.
//! 에러 발생 시 `AppError`를 반환합니다.
//!
//! 읽기에는 트랜잭션이 필요 없습니다. 여러 자식 행을 함께 만들거나 지우는
//! 쓰기(`create_plant`, `delete_plant`)는 전부-아니면-전무를 보장하기 위해
//! 단일 트랜잭션으로 감쌉니다.

use crate::db::query_builder::{PlantQuery, PLANT_COLUMNS};
use crate::error::AppError;
use crate::models::*;
use sqlx::SqlitePool;

/// ID로 식물 한 행을 조회합니다.
///
/// # 반환값
/// - `Ok(Some(PlantRow))`: 행을 찾은 경우
/// - `Ok(None)`: 해당 ID의 식물이 없는 경우 (NotFound 변환은 서비스 몫)
pub async fn find_plant_row(pool: &SqlitePool, id: i64) -> Result<Option<PlantRow>, AppError> {
    let row = sqlx::query_as::<_, PlantRow>(&format!(
        "SELECT {PLANT_COLUMNS} FROM plant WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// 식물 한 건의 이미지들을 조회합니다.
///
/// 이미지가 없는 식물도 빈 목록으로 정상 반환됩니다 — 이미지의 부재가
/// 식물 조회를 막으면 안 됩니다 (outer join과 같은 의미).
pub async fn find_images(pool: &SqlitePool, plant_id: i64) -> Result<Vec<PlantImage>, AppError> {
    let images = sqlx::query_as::<_, PlantImage>(
        r#"
        SELECT id, plant_id, caption, content_type
        FROM plant_image
        WHERE plant_id = ?
        "#,
    )
    .bind(plant_id)
    .fetch_all(pool)
    .await?;

    Ok(images)
}

/// 쿼리 빌더가 조립한 검색 쿼리를 실행해 한 페이지의 행들을 가져옵니다.
pub async fn find_plants(pool: &SqlitePool, query: &PlantQuery) -> Result<Vec<PlantRow>, AppError> {
    let sql = query.select_sql();
    let mut q = sqlx::query_as::<_, PlantRow>(&sql);
    // ? 자리에 순서대로 값을 바인딩합니다 (쿼리 빌더가 정한 순서 그대로)
    for bind in query.binds() {
        q = q.bind(bind.as_str());
    }
    let rows = q.fetch_all(pool).await?;
    Ok(rows)
}

/// 같은 WHERE 절로 전체 일치 건수를 가져옵니다.
///
/// 내용 조회와는 별도의 쿼리라서, 동시 쓰기가 있으면 두 쿼리가 같은
/// 스냅샷을 본다는 보장은 없습니다 — 최선 노력(best effort) 건수입니다.
pub async fn count_plants(pool: &SqlitePool, query: &PlantQuery) -> Result<u32, AppError> {
    let sql = query.count_sql();
    let mut q = sqlx::query_scalar::<_, i64>(&sql);
    for bind in query.binds() {
        q = q.bind(bind.as_str());
    }
    let count = q.fetch_one(pool).await?;
    Ok(u32::try_from(count).unwrap_or(u32::MAX))
}

/// 이 이름의 식물이 이미 있는지 확인합니다 (생성 시 중복 검사용).
pub async fn name_exists(pool: &SqlitePool, name: &str) -> Result<bool, AppError> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM plant WHERE name = ?")
        .bind(name)
        .fetch_one(pool)
        .await?;
    Ok(count > 0)
}

/// 새 식물을 이미지와 함께 단일 트랜잭션으로 삽입합니다.
///
/// # 매개변수
/// - `req`: 생성 요청 (이미지 목록 포함 가능)
/// - `keywords`: 이미 정규화(대문자/중복 제거)된 저장 형태. 빈 목록이면 None
///
/// # 반환값
/// 새로 부여된 식물 ID. `version`은 0으로 시작합니다.
pub async fn create_plant(
    pool: &SqlitePool,
    req: &CreatePlantRequest,
    keywords: Option<String>,
) -> Result<i64, AppError> {
    let mut tx = pool.begin().await?;

    let result = sqlx::query(
        r#"
        INSERT INTO plant (name, species, height_cm, hardy, acquired, keywords)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
        // version/created_at/updated_at은 DEFAULT 값이 사용됩니다
    )
    .bind(&req.name)
    .bind(req.species)
    .bind(req.height_cm)
    .bind(req.hardy)
    .bind(&req.acquired)
    .bind(&keywords)
    .execute(&mut *tx)
    .await?;

    let plant_id = result.last_insert_rowid();

    // 자식 이미지들은 부모가 만들어진 같은 트랜잭션 안에서 삽입합니다
    if let Some(images) = &req.images {
        for image in images {
            sqlx::query(
                "INSERT INTO plant_image (plant_id, caption, content_type) VALUES (?, ?, ?)",
            )
            .bind(plant_id)
            .bind(&image.caption)
            .bind(&image.content_type)
            .execute(&mut *tx)
            .await?;
        }
    }

    tx.commit().await?;
    Ok(plant_id)
}

/// 식물을 수정합니다 (부분 업데이트).
///
/// 요청에 포함된 필드만 바꾸고, `version`은 1 올리고 `updated_at`을
/// 갱신합니다. 동적으로 SQL UPDATE 문을 구성합니다.
///
/// # 반환값
/// 영향받은 행 수 (0이면 해당 ID 없음).
pub async fn update_plant(
    pool: &SqlitePool,
    id: i64,
    req: &UpdatePlantRequest,
    keywords: Option<Option<String>>,
) -> Result<u64, AppError> {
    let now = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);

    // ── 동적 쿼리 구성 ──
    // 보낸 필드만 SET 절에 포함시키고, 바인딩은 아래에서 같은 순서로 답니다.
    let mut sql = String::from("UPDATE plant SET version = version + 1, updated_at = ?");
    if req.name.is_some() {
        sql.push_str(", name = ?");
    }
    if req.species.is_some() {
        sql.push_str(", species = ?");
    }
    if req.height_cm.is_some() {
        sql.push_str(", height_cm = ?");
    }
    if req.hardy.is_some() {
        sql.push_str(", hardy = ?");
    }
    if req.acquired.is_some() {
        sql.push_str(", acquired = ?");
    }
    if keywords.is_some() {
        sql.push_str(", keywords = ?");
    }
    sql.push_str(" WHERE id = ?");

    let mut query = sqlx::query(&sql).bind(&now);
    if let Some(name) = &req.name {
        query = query.bind(name);
    }
    if let Some(species) = req.species {
        query = query.bind(species);
    }
    if let Some(height_cm) = req.height_cm {
        query = query.bind(height_cm);
    }
    if let Some(hardy) = req.hardy {
        query = query.bind(hardy);
    }
    if let Some(acquired) = &req.acquired {
        query = query.bind(acquired);
    }
    if let Some(kw) = &keywords {
        query = query.bind(kw);
    }
    query = query.bind(id);

    let result = query.execute(pool).await?;
    Ok(result.rows_affected())
}

/// 식물을 자식 행들과 함께 단일 트랜잭션으로 삭제합니다.
///
/// 자식(이미지/첨부파일)을 먼저 지우고 부모를 지웁니다 — 전부 지워지거나
/// 아무것도 지워지지 않습니다.
///
/// # 반환값
/// - `Ok(true)`: 삭제 성공 (부모 행 1건 이상 영향)
/// - `Ok(false)`: 해당 ID의 식물이 없음
pub async fn delete_plant(pool: &SqlitePool, id: i64) -> Result<bool, AppError> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM plant_image WHERE plant_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM plant_file WHERE plant_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    let result = sqlx::query("DELETE FROM plant WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(result.rows_affected() > 0)
}
