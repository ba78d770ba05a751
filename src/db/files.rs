//! # 첨부파일 데이터베이스 쿼리 모듈
//!
//! `plant_file` 테이블(식물당 최대 1개의 바이너리)에 대한 쿼리 함수들입니다.

use crate::error::AppError;
use crate::models::PlantFile;
use sqlx::SqlitePool;

/// 식물 ID로 첨부파일을 조회합니다.
///
/// # 반환값
/// - `Ok(Some(PlantFile))`: 파일이 있는 경우
/// - `Ok(None)`: 파일이 없는 경우 — 에러가 아니라 정상적인 부재입니다
pub async fn find_file_by_plant_id(
    pool: &SqlitePool,
    plant_id: i64,
) -> Result<Option<PlantFile>, AppError> {
    let file = sqlx::query_as::<_, PlantFile>(
        r#"
        SELECT id, plant_id, filename, mimetype, data
        FROM plant_file
        WHERE plant_id = ?
        "#,
    )
    .bind(plant_id)
    .fetch_optional(pool)
    .await?;

    Ok(file)
}

/// 식물의 첨부파일을 교체합니다.
///
/// 기존 파일이 있으면 지우고 새 파일을 넣습니다 — 식물당 1개 불변식을
/// 지키기 위해 두 작업을 한 트랜잭션으로 묶습니다.
pub async fn replace_file(
    pool: &SqlitePool,
    plant_id: i64,
    filename: &str,
    mimetype: Option<&str>,
    data: &[u8],
) -> Result<(), AppError> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM plant_file WHERE plant_id = ?")
        .bind(plant_id)
        .execute(&mut *tx)
        .await?;

    sqlx::query(
        "INSERT INTO plant_file (plant_id, filename, mimetype, data) VALUES (?, ?, ?, ?)",
    )
    .bind(plant_id)
    .bind(filename)
    .bind(mimetype)
    .bind(data)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(())
}
