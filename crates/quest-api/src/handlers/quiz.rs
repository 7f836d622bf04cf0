//! 测验 API 处理器
//!
//! 生成测验与提交评分，评分通过后触发进度更新与凭证发放

use axum::{Json, extract::State};
use tracing::info;
use validator::Validate;

use quest_engine::{GeneratedQuiz, SubmissionOutcome};

use crate::{
    dto::{ApiResponse, GenerateQuizRequest, SubmitQuizRequest},
    error::ApiError,
    state::AppState,
};

/// 为某单元生成一份测验
///
/// 返回体不包含任何题目的正确答案。
pub async fn generate_quiz(
    State(state): State<AppState>,
    Json(req): Json<GenerateQuizRequest>,
) -> Result<Json<ApiResponse<GeneratedQuiz>>, ApiError> {
    req.validate()?;

    let quiz = state
        .engine
        .generate_quiz(&req.address, &req.unit_id, req.num_questions)
        .await?;
    Ok(Json(ApiResponse::success(quiz)))
}

/// 提交测验答案
///
/// 通过时返回新增 XP、累计进度与本次触发的发放记录。
pub async fn submit_quiz(
    State(state): State<AppState>,
    Json(req): Json<SubmitQuizRequest>,
) -> Result<Json<ApiResponse<SubmissionOutcome>>, ApiError> {
    req.validate()?;

    let outcome = state
        .engine
        .submit_quiz(&req.address, &req.session_id, &req.answers)
        .await?;
    info!(
        session_id = %req.session_id,
        passed = outcome.passed,
        score_percent = outcome.score_percent,
        "测验提交已处理"
    );
    Ok(Json(ApiResponse::success(outcome)))
}
