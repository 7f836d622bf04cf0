//! REST API 请求 DTO 定义
//!
//! 所有端点的请求参数和请求体结构

use std::collections::HashMap;

use serde::Deserialize;
use validator::Validate;

/// 生成测验请求
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GenerateQuizRequest {
    #[validate(length(min = 1, max = 128, message = "地址长度必须在1-128个字符之间"))]
    pub address: String,
    #[validate(length(min = 1, max = 64, message = "单元 ID 长度必须在1-64个字符之间"))]
    pub unit_id: String,
    /// 题目数量，默认 5，具体上下界由测验配置决定
    #[serde(default = "default_num_questions")]
    pub num_questions: usize,
}

fn default_num_questions() -> usize {
    5
}

/// 提交测验请求
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubmitQuizRequest {
    #[validate(length(min = 1, max = 128, message = "地址长度必须在1-128个字符之间"))]
    pub address: String,
    #[validate(length(min = 1, max = 64, message = "会话 ID 长度必须在1-64个字符之间"))]
    pub session_id: String,
    /// 题目 id -> 所选选项下标
    pub answers: HashMap<String, usize>,
}

/// 铸造白名单变更请求
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct MinterRequest {
    /// 调用方身份，必须是链的 owner
    #[validate(length(min = 1, max = 128, message = "调用方身份长度必须在1-128个字符之间"))]
    pub caller: String,
    #[validate(length(min = 1, max = 128, message = "铸造身份长度必须在1-128个字符之间"))]
    pub minter: String,
}

/// 批量发放请求
///
/// 四个平行数组，长度不一致时整批拒绝
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BatchIssueRequest {
    #[validate(length(min = 1, message = "recipients 不能为空"))]
    pub recipients: Vec<String>,
    pub unit_ids: Vec<String>,
    pub uris: Vec<String>,
    /// 稀有度序数（0-3），越界值在链调用前拒绝
    pub rarities: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_request_defaults_question_count() {
        let req: GenerateQuizRequest =
            serde_json::from_str(r#"{"address":"0xAlice","unitId":"intro-defi"}"#).unwrap();
        assert_eq!(req.num_questions, 5);
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_empty_address_rejected() {
        let req: GenerateQuizRequest =
            serde_json::from_str(r#"{"address":"","unitId":"intro-defi"}"#).unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_submit_request_camel_case_fields() {
        let req: SubmitQuizRequest = serde_json::from_str(
            r#"{"address":"0xAlice","sessionId":"abc","answers":{"1":0,"2":2}}"#,
        )
        .unwrap();
        assert_eq!(req.session_id, "abc");
        assert_eq!(req.answers.len(), 2);
    }
}
