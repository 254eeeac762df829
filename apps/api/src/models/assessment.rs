use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// The fixed questionnaire vocabulary. Wire form is the camelCase id the UI sends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum QuestionId {
    Experience,
    Education,
    Skills,
    Interests,
    WorkStyle,
    Goals,
    Country,
}

impl QuestionId {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionId::Experience => "experience",
            QuestionId::Education => "education",
            QuestionId::Skills => "skills",
            QuestionId::Interests => "interests",
            QuestionId::WorkStyle => "workStyle",
            QuestionId::Goals => "goals",
            QuestionId::Country => "country",
        }
    }
}

/// A single-select answer carries a scalar; multi-select and dropdown-multiselect carry a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Scalar(String),
    List(Vec<String>),
}

impl AnswerValue {
    /// Non-blank values, trimmed. A scalar yields at most one.
    pub fn values(&self) -> Vec<String> {
        let raw: Vec<&String> = match self {
            AnswerValue::Scalar(s) => vec![s],
            AnswerValue::List(items) => items.iter().collect(),
        };
        raw.into_iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect()
    }

    /// Prompt rendering: lists are joined with `, `.
    pub fn display(&self) -> String {
        match self {
            AnswerValue::Scalar(s) => s.clone(),
            AnswerValue::List(items) => items.join(", "),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessmentAnswer {
    #[serde(rename = "questionId")]
    pub question_id: QuestionId,
    pub answer: AnswerValue,
}

impl AssessmentAnswer {
    pub fn new(question_id: QuestionId, answer: AnswerValue) -> Self {
        Self {
            question_id,
            answer,
        }
    }
}

/// One submission's answers. Holds at most one answer per question; a later answer for the
/// same question replaces the earlier one in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<AssessmentAnswer>", into = "Vec<AssessmentAnswer>")]
pub struct AssessmentAnswers(Vec<AssessmentAnswer>);

impl AssessmentAnswers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, answer: AssessmentAnswer) {
        match self
            .0
            .iter_mut()
            .find(|a| a.question_id == answer.question_id)
        {
            Some(existing) => existing.answer = answer.answer,
            None => self.0.push(answer),
        }
    }

    pub fn get(&self, question_id: QuestionId) -> Option<&AnswerValue> {
        self.0
            .iter()
            .find(|a| a.question_id == question_id)
            .map(|a| &a.answer)
    }

    pub fn iter(&self) -> impl Iterator<Item = &AssessmentAnswer> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Countries chosen in the `country` answer, in selection order.
    pub fn selected_countries(&self) -> Vec<String> {
        self.get(QuestionId::Country)
            .map(AnswerValue::values)
            .unwrap_or_default()
    }

    /// Skills chosen in the `skills` answer.
    pub fn skills(&self) -> Vec<String> {
        self.get(QuestionId::Skills)
            .map(AnswerValue::values)
            .unwrap_or_default()
    }
}

impl From<Vec<AssessmentAnswer>> for AssessmentAnswers {
    fn from(answers: Vec<AssessmentAnswer>) -> Self {
        let mut set = AssessmentAnswers::new();
        for answer in answers {
            set.insert(answer);
        }
        set
    }
}

impl From<AssessmentAnswers> for Vec<AssessmentAnswer> {
    fn from(answers: AssessmentAnswers) -> Self {
        answers.0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AssessmentRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub answers: Value,
    pub created_at: DateTime<Utc>,
}
