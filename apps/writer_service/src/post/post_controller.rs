use askama::Template;
use axum::{
    extract::rejection::JsonRejection,
    response::{Html, IntoResponse},
    routing::{get, post},
    Extension, Form, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::Instrument;
use uuid::Uuid;
use xhs_llm::{LlmError, PostDraft};

use super::post_page::{generation_failed, PostPage, MISSING_API_KEY, MISSING_THEME};
use crate::{app_module::AppState, error::AppError};

#[derive(Debug, Deserialize)]
pub struct GeneratePostRequest {
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub theme: String,
}

#[derive(Debug, Serialize)]
pub struct GeneratePostResponse {
    pub titles: Vec<String>,
    pub content: String,
    pub model: String,
    pub generated_at: DateTime<Utc>,
}

pub fn post_router() -> Router {
    Router::new()
        .route("/", get(index))
        .route("/generate", post(generate_page))
        .route("/v1/posts/generate", post(generate_post))
        .route("/v1/posts/schema", get(post_schema))
}

pub async fn index(Extension(ctx): Extension<AppState>) -> Result<Html<String>, AppError> {
    let page = PostPage::new(&ctx.config.api_key_help_url);
    Ok(Html(page.render()?))
}

/// Form submission. Every outcome, failures included, renders the page with status 200.
pub async fn generate_page(
    Extension(ctx): Extension<AppState>,
    Form(request): Form<GeneratePostRequest>,
) -> Result<Html<String>, AppError> {
    let page = PostPage::new(&ctx.config.api_key_help_url).with_theme(&request.theme);

    let outcome = match check_inputs(&request) {
        Err(message) => Err(message.to_string()),
        Ok(()) => run_generation(&ctx, &request)
            .await
            .map_err(|e| generation_failed(&e.to_string())),
    };

    let body = match &outcome {
        Ok(draft) => page.with_draft(draft).render()?,
        Err(message) => page.with_error(message.as_str()).render()?,
    };

    Ok(Html(body))
}

pub async fn generate_post(
    Extension(ctx): Extension<AppState>,
    payload: Result<Json<GeneratePostRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(request) = payload.map_err(|rejection| AppError::Validation(rejection.body_text()))?;
    check_inputs(&request).map_err(|message| AppError::Validation(message.to_string()))?;

    let draft = run_generation(&ctx, &request).await?;

    Ok(Json(GeneratePostResponse {
        titles: draft.titles,
        content: draft.content,
        model: ctx.service.post_writer.settings().model.clone(),
        generated_at: Utc::now(),
    }))
}

/// JSON schema the model output is validated against.
pub async fn post_schema(Extension(ctx): Extension<AppState>) -> Json<Value> {
    Json(ctx.service.post_writer.parser().schema().clone())
}

fn check_inputs(request: &GeneratePostRequest) -> Result<(), &'static str> {
    if request.api_key.trim().is_empty() {
        return Err(MISSING_API_KEY);
    }
    if request.theme.trim().is_empty() {
        return Err(MISSING_THEME);
    }
    Ok(())
}

async fn run_generation(ctx: &AppState, request: &GeneratePostRequest) -> Result<PostDraft, LlmError> {
    let span = tracing::info_span!("generate_post", request_id = %Uuid::new_v4());

    async {
        let result = ctx
            .service
            .post_writer
            .generate(&request.theme, &request.api_key)
            .await;
        if let Err(e) = &result {
            tracing::error!("Error generating post: {}", e);
        }
        result
    }
    .instrument(span)
    .await
}
