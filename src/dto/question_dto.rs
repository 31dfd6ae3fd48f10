use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::choice::Choice;
use crate::services::question_service::QuestionWithChoices;

pub const CORRECT_MESSAGE: &str = "Correct answer! Congratulations.";
pub const INCORRECT_MESSAGE: &str = "Incorrect answer. Try again.";

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ChoicePayload {
    #[validate(length(min = 1))]
    pub choice_text: String,
    // No serde default: an omitted flag is a client error, not a correct answer.
    pub is_correct: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateQuestionPayload {
    #[validate(length(min = 1))]
    pub question_text: String,
    #[validate(nested)]
    pub choices: Vec<ChoicePayload>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateQuestionPayload {
    #[validate(length(min = 1))]
    pub question_text: Option<String>,
    #[validate(nested)]
    pub choices: Option<Vec<ChoicePayload>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateChoicePayload {
    #[validate(length(min = 1))]
    pub choice_text: String,
    pub is_correct: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RandomQuizQuery {
    pub count: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChoiceResponse {
    pub id: i32,
    pub choice_text: String,
    pub is_correct: bool,
}

impl From<Choice> for ChoiceResponse {
    fn from(choice: Choice) -> Self {
        Self {
            id: choice.id,
            choice_text: choice.choice_text,
            is_correct: choice.is_correct,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionResponse {
    pub id: i32,
    pub question_text: String,
    pub choices: Vec<ChoiceResponse>,
}

impl From<QuestionWithChoices> for QuestionResponse {
    fn from(item: QuestionWithChoices) -> Self {
        Self {
            id: item.question.id,
            question_text: item.question.question_text,
            choices: item.choices.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationResponse {
    pub choice_id: i32,
    pub is_correct: bool,
    pub message: String,
}

impl From<Choice> for VerificationResponse {
    fn from(choice: Choice) -> Self {
        let message = if choice.is_correct {
            CORRECT_MESSAGE
        } else {
            INCORRECT_MESSAGE
        };
        Self {
            choice_id: choice.id,
            is_correct: choice.is_correct,
            message: message.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeletionResponse {
    pub deleted_id: i32,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn choice_payload_requires_explicit_is_correct() {
        let missing: Result<ChoicePayload, _> =
            serde_json::from_str(r#"{"choice_text": "Paris"}"#);
        assert!(missing.is_err());

        let explicit: ChoicePayload =
            serde_json::from_str(r#"{"choice_text": "Paris", "is_correct": false}"#).unwrap();
        assert!(!explicit.is_correct);
    }

    #[test]
    fn create_payload_rejects_empty_question_text() {
        let payload = CreateQuestionPayload {
            question_text: "".to_string(),
            choices: vec![],
        };
        assert!(payload.validate().is_err());
    }

    #[test]
    fn create_payload_rejects_empty_choice_text() {
        let payload = CreateQuestionPayload {
            question_text: "Capital of France?".to_string(),
            choices: vec![ChoicePayload {
                choice_text: "".to_string(),
                is_correct: true,
            }],
        };
        assert!(payload.validate().is_err());
    }

    #[test]
    fn update_payload_allows_unset_fields() {
        let payload: UpdateQuestionPayload = serde_json::from_str("{}").unwrap();
        assert!(payload.question_text.is_none());
        assert!(payload.choices.is_none());
        assert!(payload.validate().is_ok());
    }

    #[test]
    fn verification_message_follows_flag() {
        let correct = VerificationResponse::from(Choice {
            id: 1,
            choice_text: "Paris".to_string(),
            is_correct: true,
            question_id: 1,
        });
        assert_eq!(correct.message, CORRECT_MESSAGE);

        let incorrect = VerificationResponse::from(Choice {
            id: 2,
            choice_text: "London".to_string(),
            is_correct: false,
            question_id: 1,
        });
        assert_eq!(incorrect.message, INCORRECT_MESSAGE);
    }

    #[test]
    fn choice_response_hides_question_id() {
        let response = ChoiceResponse::from(Choice {
            id: 7,
            choice_text: "Paris".to_string(),
            is_correct: true,
            question_id: 3,
        });
        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("question_id").is_none());
        assert_eq!(json["id"], 7);
    }
}
