use std::collections::HashMap;

use sqlx::PgPool;

use crate::dto::question_dto::{CreateQuestionPayload, UpdateChoicePayload, UpdateQuestionPayload};
use crate::error::{Error, Result};
use crate::models::choice::Choice;
use crate::models::question::Question;

#[derive(Clone)]
pub struct QuestionService {
    pool: PgPool,
}

#[derive(Debug, Clone)]
pub struct QuestionWithChoices {
    pub question: Question,
    pub choices: Vec<Choice>,
}

impl QuestionService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// All questions with their choices. Two statements total, grouped in
    /// memory, so listing never degrades into one query per question.
    pub async fn list_all(&self) -> Result<Vec<QuestionWithChoices>> {
        let questions = sqlx::query_as::<_, Question>(
            r#"
            SELECT id, question_text FROM questions
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        if questions.is_empty() {
            return Err(Error::NotFound("No questions found".to_string()));
        }

        let choices = self.choices_for(&questions).await?;
        Ok(attach_choices(questions, choices))
    }

    pub async fn get_by_id(&self, question_id: i32) -> Result<QuestionWithChoices> {
        let question = sqlx::query_as::<_, Question>(
            r#"
            SELECT id, question_text FROM questions
            WHERE id = $1
            "#,
        )
        .bind(question_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Question with id {} not found", question_id)))?;

        let choices = sqlx::query_as::<_, Choice>(
            r#"
            SELECT id, choice_text, is_correct, question_id FROM choices
            WHERE question_id = $1
            ORDER BY id ASC
            "#,
        )
        .bind(question_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(QuestionWithChoices { question, choices })
    }

    pub async fn get_choices(&self, question_id: i32) -> Result<Vec<Choice>> {
        let choices = sqlx::query_as::<_, Choice>(
            r#"
            SELECT id, choice_text, is_correct, question_id FROM choices
            WHERE question_id = $1
            ORDER BY id ASC
            "#,
        )
        .bind(question_id)
        .fetch_all(&self.pool)
        .await?;

        if choices.is_empty() {
            return Err(Error::NotFound(format!(
                "No choices found for question {}",
                question_id
            )));
        }

        Ok(choices)
    }

    /// Up to `count` questions in random order. Fewer than `count` rows in the
    /// store is not an error; an empty store is.
    pub async fn random_sample(&self, count: i64) -> Result<Vec<QuestionWithChoices>> {
        let questions = sqlx::query_as::<_, Question>(
            r#"
            SELECT id, question_text FROM questions
            ORDER BY RANDOM()
            LIMIT $1
            "#,
        )
        .bind(count)
        .fetch_all(&self.pool)
        .await?;

        if questions.is_empty() {
            return Err(Error::NotFound("No questions found".to_string()));
        }

        let choices = self.choices_for(&questions).await?;
        Ok(attach_choices(questions, choices))
    }

    pub async fn get_choice_by_id(&self, choice_id: i32) -> Result<Choice> {
        let choice = sqlx::query_as::<_, Choice>(
            r#"
            SELECT id, choice_text, is_correct, question_id FROM choices
            WHERE id = $1
            "#,
        )
        .bind(choice_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Choice with id {} not found", choice_id)))?;

        Ok(choice)
    }

    /// Inserts the question and its choices as one transaction: either the
    /// whole set lands or none of it does.
    pub async fn create(&self, payload: CreateQuestionPayload) -> Result<QuestionWithChoices> {
        let mut tx = self.pool.begin().await?;

        let question = sqlx::query_as::<_, Question>(
            r#"
            INSERT INTO questions (question_text)
            VALUES ($1)
            RETURNING id, question_text
            "#,
        )
        .bind(&payload.question_text)
        .fetch_one(&mut *tx)
        .await?;

        let mut choices = Vec::with_capacity(payload.choices.len());
        for choice in &payload.choices {
            let inserted = sqlx::query_as::<_, Choice>(
                r#"
                INSERT INTO choices (choice_text, is_correct, question_id)
                VALUES ($1, $2, $3)
                RETURNING id, choice_text, is_correct, question_id
                "#,
            )
            .bind(&choice.choice_text)
            .bind(choice.is_correct)
            .bind(question.id)
            .fetch_one(&mut *tx)
            .await?;
            choices.push(inserted);
        }

        tx.commit().await?;

        Ok(QuestionWithChoices { question, choices })
    }

    /// Replace-style update. An unset field is a no-op; a supplied choice list
    /// discards every existing choice for the question and inserts the new
    /// ones in the same transaction, so choice ids change on every replace.
    pub async fn update(
        &self,
        question_id: i32,
        payload: UpdateQuestionPayload,
    ) -> Result<QuestionWithChoices> {
        let mut tx = self.pool.begin().await?;

        let question = sqlx::query_as::<_, Question>(
            r#"
            UPDATE questions
            SET question_text = COALESCE($2, question_text)
            WHERE id = $1
            RETURNING id, question_text
            "#,
        )
        .bind(question_id)
        .bind(payload.question_text.as_deref())
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Question with id {} not found", question_id)))?;

        let choices = match payload.choices {
            Some(new_choices) => {
                sqlx::query("DELETE FROM choices WHERE question_id = $1")
                    .bind(question_id)
                    .execute(&mut *tx)
                    .await?;

                let mut inserted = Vec::with_capacity(new_choices.len());
                for choice in &new_choices {
                    let row = sqlx::query_as::<_, Choice>(
                        r#"
                        INSERT INTO choices (choice_text, is_correct, question_id)
                        VALUES ($1, $2, $3)
                        RETURNING id, choice_text, is_correct, question_id
                        "#,
                    )
                    .bind(&choice.choice_text)
                    .bind(choice.is_correct)
                    .bind(question_id)
                    .fetch_one(&mut *tx)
                    .await?;
                    inserted.push(row);
                }
                inserted
            }
            None => {
                sqlx::query_as::<_, Choice>(
                    r#"
                    SELECT id, choice_text, is_correct, question_id FROM choices
                    WHERE question_id = $1
                    ORDER BY id ASC
                    "#,
                )
                .bind(question_id)
                .fetch_all(&mut *tx)
                .await?
            }
        };

        tx.commit().await?;

        Ok(QuestionWithChoices { question, choices })
    }

    /// Overwrites both fields of one choice; its siblings are untouched.
    pub async fn update_choice(
        &self,
        choice_id: i32,
        payload: UpdateChoicePayload,
    ) -> Result<Choice> {
        let choice = sqlx::query_as::<_, Choice>(
            r#"
            UPDATE choices
            SET choice_text = $2, is_correct = $3
            WHERE id = $1
            RETURNING id, choice_text, is_correct, question_id
            "#,
        )
        .bind(choice_id)
        .bind(&payload.choice_text)
        .bind(payload.is_correct)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Choice with id {} not found", choice_id)))?;

        Ok(choice)
    }

    /// Deletes the question row; the ON DELETE CASCADE constraint removes its
    /// choices in the same statement.
    pub async fn delete(&self, question_id: i32) -> Result<()> {
        let result = sqlx::query("DELETE FROM questions WHERE id = $1")
            .bind(question_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!(
                "Question with id {} not found",
                question_id
            )));
        }

        Ok(())
    }

    pub async fn delete_choice(&self, choice_id: i32) -> Result<()> {
        let result = sqlx::query("DELETE FROM choices WHERE id = $1")
            .bind(choice_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!(
                "Choice with id {} not found",
                choice_id
            )));
        }

        Ok(())
    }

    async fn choices_for(&self, questions: &[Question]) -> Result<Vec<Choice>> {
        let ids: Vec<i32> = questions.iter().map(|q| q.id).collect();
        let choices = sqlx::query_as::<_, Choice>(
            r#"
            SELECT id, choice_text, is_correct, question_id FROM choices
            WHERE question_id = ANY($1)
            ORDER BY id ASC
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(choices)
    }
}

fn attach_choices(questions: Vec<Question>, choices: Vec<Choice>) -> Vec<QuestionWithChoices> {
    let mut by_parent: HashMap<i32, Vec<Choice>> = HashMap::new();
    for choice in choices {
        by_parent.entry(choice.question_id).or_default().push(choice);
    }

    questions
        .into_iter()
        .map(|question| {
            let choices = by_parent.remove(&question.id).unwrap_or_default();
            QuestionWithChoices { question, choices }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(id: i32, text: &str) -> Question {
        Question {
            id,
            question_text: text.to_string(),
        }
    }

    fn choice(id: i32, question_id: i32, text: &str, is_correct: bool) -> Choice {
        Choice {
            id,
            choice_text: text.to_string(),
            is_correct,
            question_id,
        }
    }

    #[test]
    fn attach_choices_groups_by_parent() {
        let questions = vec![question(1, "Q1"), question(2, "Q2")];
        let choices = vec![
            choice(10, 1, "A", true),
            choice(11, 2, "B", false),
            choice(12, 1, "C", false),
        ];

        let grouped = attach_choices(questions, choices);

        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped[0].question.id, 1);
        assert_eq!(grouped[0].choices.len(), 2);
        assert_eq!(grouped[1].question.id, 2);
        assert_eq!(grouped[1].choices.len(), 1);
        assert_eq!(grouped[1].choices[0].id, 11);
    }

    #[test]
    fn attach_choices_keeps_questions_without_choices() {
        let questions = vec![question(1, "Q1")];
        let grouped = attach_choices(questions, vec![]);

        assert_eq!(grouped.len(), 1);
        assert!(grouped[0].choices.is_empty());
    }
}
