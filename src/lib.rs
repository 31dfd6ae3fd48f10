pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

use crate::services::question_service::QuestionService;
use sqlx::PgPool;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub question_service: QuestionService,
}

impl AppState {
    pub fn new(pool: PgPool) -> Self {
        let question_service = QuestionService::new(pool.clone());

        Self {
            pool,
            question_service,
        }
    }
}
