//! An api call to `/ask` should end up here.

use axum::response::Json;
use axum::Extension;
use serde_derive::{Deserialize, Serialize};

use crate::error::RequestError;
use crate::pipeline;
use crate::state::ServerState;

/// The request body of the ask POST endpoint.
#[derive(Debug, Deserialize)]
pub struct AskRequest {
    pub question: String,
}

/// The rendered answer, or the model's own reply when the question was
/// unanswerable.
#[derive(Debug, Serialize)]
pub struct AskResponse {
    pub answer: String,
}

pub async fn ask(
    Extension(state): Extension<ServerState>,
    Json(request): Json<AskRequest>,
) -> Result<Json<AskResponse>, RequestError> {
    let answer = pipeline::answer_question(&state, &request.question)
        .await?;

    Ok(Json(AskResponse {
        answer: answer.into_text(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_body_is_a_single_text_field() {
        let request: AskRequest =
            serde_json::from_str(r#"{"question": "how many users are there?"}"#).unwrap();
        assert_eq!(request.question, "how many users are there?");
    }

    #[test]
    fn response_serializes_to_an_answer_field() {
        let body = serde_json::to_value(AskResponse {
            answer: "SELECT 1".to_string(),
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({ "answer": "SELECT 1" }));
    }
}
