use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Choice {
    pub id: i32,
    pub choice_text: String,
    pub is_correct: bool,
    pub question_id: i32,
}
