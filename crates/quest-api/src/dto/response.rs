//! REST API 响应 DTO 定义
//!
//! 所有端点的响应体结构

use serde::Serialize;

use quest_engine::{BadgeInfo, Unit};

/// API 统一响应
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub success: bool,
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// 创建成功响应
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            code: "SUCCESS".to_string(),
            message: "操作成功".to_string(),
            data: Some(data),
        }
    }

    /// 创建成功响应（无数据）
    pub fn success_empty() -> ApiResponse<()> {
        ApiResponse {
            success: true,
            code: "SUCCESS".to_string(),
            message: "操作成功".to_string(),
            data: None,
        }
    }
}

/// 路线图响应：按目录顺序的完整单元列表
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoadmapResponse {
    pub units: Vec<Unit>,
}

/// 链上凭证余额响应
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceResponse {
    pub address: String,
    pub chain: String,
    pub balance: u64,
}

/// 某学习者在某链上的持仓明细
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HoldingsResponse {
    pub address: String,
    pub chain: String,
    pub badges: Vec<BadgeInfo>,
}

/// 批量发放响应
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchIssueResponse {
    pub chain: String,
    pub token_ids: Vec<u64>,
}

/// 已注册网络列表
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainsResponse {
    pub chains: Vec<String>,
}
