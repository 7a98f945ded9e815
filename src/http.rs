//! Ambient HTTP surface: `POST /chat` and `GET /health`.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{routing::get, routing::post, Json, Router};
use hestia_core::{FinalResponse, HistoryRole, HistoryTurn, SessionFacade, UserInput};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::error;

/// Shared state handed to every route handler.
#[derive(Clone)]
pub struct AppState {
    /// The planning session facade.
    pub session: Arc<SessionFacade>,
}

/// Build the application's router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/chat", post(chat))
        .with_state(state)
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

#[derive(Debug, Deserialize)]
struct ChatTurn {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatRequest {
    message: String,
    #[serde(default)]
    conversation_history: Vec<ChatTurn>,
    /// Accepted for forward compatibility with edit-in-place flows; the
    /// planner doesn't yet thread this into its fact model.
    #[serde(default)]
    #[allow(dead_code)]
    existing_automation_id: Option<String>,
}

#[derive(Debug, Serialize)]
struct ChatResponse {
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    code_proposal: Option<CodeProposalDto>,
}

#[derive(Debug, Serialize)]
struct CodeProposalDto {
    summary: String,
    files: Vec<FileDto>,
}

#[derive(Debug, Serialize)]
struct FileDto {
    code: String,
    filename: String,
    #[serde(rename = "type")]
    kind: String,
}

impl From<FinalResponse> for ChatResponse {
    fn from(response: FinalResponse) -> Self {
        let code_proposal = response.code_proposal.map(|proposal| CodeProposalDto {
            summary: proposal.summary,
            files: proposal
                .files
                .into_iter()
                .map(|file| FileDto {
                    code: file.code,
                    filename: file.filename,
                    kind: match file.kind {
                        hestia_tools::CodeKind::Automation => "automation".to_string(),
                        hestia_tools::CodeKind::Library => "library".to_string(),
                    },
                })
                .collect(),
        });
        Self { message: response.message, code_proposal }
    }
}

/// Errors the HTTP boundary can surface; every internal error enum composes
/// up into this one spot rather than leaking its variants to callers.
struct AppError {
    status: StatusCode,
    message: String,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorBody { error: self.message })).into_response()
    }
}

impl From<hestia_core::Error> for AppError {
    fn from(err: hestia_core::Error) -> Self {
        match err {
            hestia_core::Error::Planning(message) => AppError {
                status: StatusCode::BAD_REQUEST,
                message,
            },
            other => {
                error!(error = %other, "unhandled planning session error");
                AppError {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    message: "internal error".to_string(),
                }
            }
        }
    }
}

fn parse_role(role: &str) -> Result<HistoryRole, AppError> {
    match role {
        "user" => Ok(HistoryRole::User),
        "assistant" => Ok(HistoryRole::Assistant),
        other => Err(AppError {
            status: StatusCode::BAD_REQUEST,
            message: format!("unknown conversation_history role: {other}"),
        }),
    }
}

async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    let mut history = Vec::with_capacity(request.conversation_history.len());
    for turn in request.conversation_history {
        history.push(HistoryTurn {
            role: parse_role(&turn.role)?,
            content: turn.content,
        });
    }

    let input = UserInput::new(request.message, history)?;
    let response = state.session.run(input).await?;
    Ok(Json(response.into()))
}
