//! # Verdano 웹 서버 진입점
//!
//! 식물 카탈로그 백엔드의 시작점(entry point)입니다.
//!
//! 이 파일이 수행하는 작업:
//! 1. 환경변수(.env) 로딩
//! 2. 로깅(tracing) 초기화
//! 3. SQLite 데이터베이스 연결 풀 생성
//! 4. 데이터베이스 마이그레이션 실행
//! 5. 검색 설정(CriteriaConfig) 생성 — 불변, 시작 시 1회
//! 6. API 라우터 설정
//! 7. HTTP 서버 시작

// ── 모듈 선언 ──
// `mod` 키워드는 다른 파일을 모듈로 가져옵니다.
// Rust에서는 파일 시스템 구조가 곧 모듈 구조입니다.
mod config;
mod db;
mod error;
mod models;
mod routes;
mod services;

use anyhow::Result;
use axum::{
    routing::{get, put},
    Router,
};
use config::Config;
use routes::plants::AppState;
use services::criteria::CriteriaConfig;
use sqlx::sqlite::SqlitePoolOptions;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // ── 1단계: 환경변수 로딩 ──
    // .env 파일이 없어도 에러 없이 넘어갑니다 (.ok()).
    dotenvy::dotenv().ok();

    // ── 2단계: 로깅(tracing) 초기화 ──
    // RUST_LOG 환경변수가 없으면 기본값으로 verdano를 debug 레벨로 설정합니다.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "verdano=debug,tower_http=debug,axum=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // ── 3단계: 설정 로딩 ──
    let config = Config::from_env()?;
    tracing::info!("Starting Verdano server on {}:{}", config.host, config.port);

    // ── 4단계: SQLite 연결 풀 생성 ──
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await?;

    // ── 5단계: 데이터베이스 마이그레이션 실행 ──
    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations").run(&pool).await?;

    // ── 6단계: 애플리케이션 상태(State) 생성 ──
    // 검색 설정은 여기서 한 번 만들어져 이후 읽기 전용으로 공유됩니다.
    let state = AppState {
        pool: pool.clone(),
        criteria: CriteriaConfig::plant(),
    };

    // ── 7단계: API 라우터 설정 ──
    let api_routes = Router::new()
        // 식물 검색/생성
        .route("/plants", get(routes::get_plants).post(routes::create_plant))
        // 첨부파일 다운로드 — "{id}"보다 구체적인 경로를 먼저 선언합니다
        .route("/plants/file/{id}", get(routes::get_plant_file))
        // 단일 조회/수정/삭제
        .route(
            "/plants/{id}",
            get(routes::get_plant_by_id)
                .put(routes::update_plant)
                .delete(routes::delete_plant),
        )
        // 첨부파일 업로드(교체)
        .route("/plants/{id}/file", put(routes::upload_plant_file))
        // 헬스체크
        .route("/health", get(routes::health_check))
        .with_state(state);

    // ── 8단계: CORS 미들웨어 설정 ──
    // 개발 환경에서는 모두 허용합니다. 프로덕션에서는 출처를 제한해야 합니다.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .nest("/api/v1", api_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    // ── 9단계: 서버 시작 ──
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
