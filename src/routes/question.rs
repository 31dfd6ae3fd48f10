use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Json},
};
use validator::Validate;

use crate::{
    dto::question_dto::{
        ChoiceResponse, CreateQuestionPayload, DeletionResponse, QuestionResponse,
        RandomQuizQuery, UpdateChoicePayload, UpdateQuestionPayload, VerificationResponse,
    },
    error::Result,
    AppState,
};

const DEFAULT_QUIZ_SIZE: i64 = 5;

#[utoipa::path(
    get,
    path = "/questao/listar/",
    responses(
        (status = 200, description = "All questions with their choices", body = Json<Vec<QuestionResponse>>),
        (status = 404, description = "No questions in the store")
    )
)]
#[axum::debug_handler]
pub async fn list_questions(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let items = state.question_service.list_all().await?;
    let questions: Vec<QuestionResponse> = items.into_iter().map(Into::into).collect();
    Ok(Json(questions))
}

#[utoipa::path(
    get,
    path = "/questao/buscar/{id}",
    params(
        ("id" = i32, Path, description = "Question ID")
    ),
    responses(
        (status = 200, description = "Question found", body = Json<QuestionResponse>),
        (status = 404, description = "Question not found")
    )
)]
#[axum::debug_handler]
pub async fn get_question(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse> {
    let item = state.question_service.get_by_id(id).await?;
    Ok(Json(QuestionResponse::from(item)))
}

#[utoipa::path(
    get,
    path = "/questao/items/{id}",
    params(
        ("id" = i32, Path, description = "Question ID")
    ),
    responses(
        (status = 200, description = "Choices for the question", body = Json<Vec<ChoiceResponse>>),
        (status = 404, description = "No choices for this question")
    )
)]
#[axum::debug_handler]
pub async fn list_question_choices(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse> {
    let choices = state.question_service.get_choices(id).await?;
    let choices: Vec<ChoiceResponse> = choices.into_iter().map(Into::into).collect();
    Ok(Json(choices))
}

#[utoipa::path(
    get,
    path = "/questao/quiz/aleatorio",
    params(
        ("count" = Option<i64>, Query, description = "Number of questions to sample, default 5")
    ),
    responses(
        (status = 200, description = "Random questions, fewer if the store is smaller", body = Json<Vec<QuestionResponse>>),
        (status = 404, description = "No questions in the store")
    )
)]
#[axum::debug_handler]
pub async fn random_quiz(
    State(state): State<AppState>,
    Query(query): Query<RandomQuizQuery>,
) -> Result<impl IntoResponse> {
    let count = query.count.unwrap_or(DEFAULT_QUIZ_SIZE).max(1);
    let items = state.question_service.random_sample(count).await?;
    let questions: Vec<QuestionResponse> = items.into_iter().map(Into::into).collect();
    Ok(Json(questions))
}

#[utoipa::path(
    get,
    path = "/questao/{id}/verificar",
    params(
        ("id" = i32, Path, description = "Choice ID")
    ),
    responses(
        (status = 200, description = "Verification result", body = Json<VerificationResponse>),
        (status = 404, description = "Choice not found")
    )
)]
#[axum::debug_handler]
pub async fn verify_choice(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse> {
    let choice = state.question_service.get_choice_by_id(id).await?;
    Ok(Json(VerificationResponse::from(choice)))
}

#[utoipa::path(
    post,
    path = "/questao/criar",
    request_body = CreateQuestionPayload,
    responses(
        (status = 200, description = "Question created with its choices", body = Json<QuestionResponse>),
        (status = 400, description = "Invalid payload")
    )
)]
#[axum::debug_handler]
pub async fn create_question(
    State(state): State<AppState>,
    Json(payload): Json<CreateQuestionPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let item = state.question_service.create(payload).await?;
    Ok(Json(QuestionResponse::from(item)))
}

#[utoipa::path(
    post,
    path = "/questao/{id}/update",
    params(
        ("id" = i32, Path, description = "Question ID")
    ),
    request_body = UpdateQuestionPayload,
    responses(
        (status = 200, description = "Question updated", body = Json<QuestionResponse>),
        (status = 400, description = "Invalid payload"),
        (status = 404, description = "Question not found")
    )
)]
#[axum::debug_handler]
pub async fn update_question(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateQuestionPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let item = state.question_service.update(id, payload).await?;
    Ok(Json(QuestionResponse::from(item)))
}

#[utoipa::path(
    post,
    path = "/questao/items/{id}/update",
    params(
        ("id" = i32, Path, description = "Choice ID")
    ),
    request_body = UpdateChoicePayload,
    responses(
        (status = 200, description = "Choice updated", body = Json<ChoiceResponse>),
        (status = 400, description = "Invalid payload"),
        (status = 404, description = "Choice not found")
    )
)]
#[axum::debug_handler]
pub async fn update_choice(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateChoicePayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let choice = state.question_service.update_choice(id, payload).await?;
    Ok(Json(ChoiceResponse::from(choice)))
}

#[utoipa::path(
    post,
    path = "/questao/{id}/deletar",
    params(
        ("id" = i32, Path, description = "Question ID")
    ),
    responses(
        (status = 200, description = "Question and its choices deleted", body = Json<DeletionResponse>),
        (status = 404, description = "Question not found")
    )
)]
#[axum::debug_handler]
pub async fn delete_question(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse> {
    state.question_service.delete(id).await?;
    Ok(Json(DeletionResponse {
        deleted_id: id,
        message: format!("Question with id {} was deleted successfully", id),
    }))
}

#[utoipa::path(
    post,
    path = "/items/{id}/deletar",
    params(
        ("id" = i32, Path, description = "Choice ID")
    ),
    responses(
        (status = 200, description = "Choice deleted", body = Json<DeletionResponse>),
        (status = 404, description = "Choice not found")
    )
)]
#[axum::debug_handler]
pub async fn delete_choice(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse> {
    state.question_service.delete_choice(id).await?;
    Ok(Json(DeletionResponse {
        deleted_id: id,
        message: format!("Choice with id {} was deleted successfully", id),
    }))
}
