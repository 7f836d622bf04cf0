//! 外部出题服务
//!
//! 出题算法不在引擎范围内：内容服务是一个黑盒，输入主题与题目数量，
//! 返回题目对象列表。此处只定义调用边界与响应清洗。

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, instrument};

use quest_shared::config::ContentProviderConfig;

use crate::error::{QuestError, Result};
use crate::models::Question;

/// 出题服务接口
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuizProvider: Send + Sync {
    /// 为指定主题生成 N 道选择题
    async fn generate(&self, topic: &str, num_questions: usize) -> Result<Vec<Question>>;
}

/// 出题服务返回的原始载荷
#[derive(Debug, Deserialize)]
struct QuizPayload {
    #[serde(default)]
    #[allow(dead_code)]
    topic: String,
    questions: Vec<RawQuestion>,
}

/// 原始题目：id 可能缺失（由模型生成），解析后统一回填
#[derive(Debug, Deserialize)]
struct RawQuestion {
    #[serde(default)]
    id: Option<serde_json::Value>,
    text: String,
    choices: Vec<String>,
    correct_index: usize,
}

/// 聊天补全式响应结构
#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: String,
}

/// 从模型输出中截取 JSON 对象
///
/// 模型偶尔会带上 markdown 围栏或解释性文字，
/// 取第一个 `{` 到最后一个 `}` 之间的窗口。
pub(crate) fn extract_json(raw: &str) -> Result<&str> {
    let start = raw.find('{');
    let end = raw.rfind('}');
    match (start, end) {
        (Some(s), Some(e)) if e > s => Ok(&raw[s..=e]),
        _ => Err(QuestError::Provider(
            "响应中找不到有效的 JSON 对象".to_string(),
        )),
    }
}

/// 清洗并校验原始题目
///
/// - id 缺失时按序号回填（"1" 起）
/// - id 重复的题目集整体拒绝：一份答案不允许同时命中两道题
/// - 选项为空或 correct_index 越界的题目视为上游故障，整体拒绝
fn sanitize_questions(raw: Vec<RawQuestion>) -> Result<Vec<Question>> {
    let mut seen_ids = std::collections::HashSet::new();
    let mut questions = Vec::with_capacity(raw.len());
    for (i, q) in raw.into_iter().enumerate() {
        if q.choices.is_empty() {
            return Err(QuestError::Provider(format!("第 {} 题没有选项", i + 1)));
        }
        if q.correct_index >= q.choices.len() {
            return Err(QuestError::Provider(format!(
                "第 {} 题 correct_index 越界: {} >= {}",
                i + 1,
                q.correct_index,
                q.choices.len()
            )));
        }

        let id = match q.id {
            Some(serde_json::Value::String(s)) if !s.is_empty() => s,
            Some(serde_json::Value::Number(n)) => n.to_string(),
            _ => (i + 1).to_string(),
        };
        if !seen_ids.insert(id.clone()) {
            return Err(QuestError::Provider(format!("题目 id 重复: {id}")));
        }

        questions.push(Question {
            id,
            text: q.text,
            choices: q.choices,
            correct_index: q.correct_index,
        });
    }
    Ok(questions)
}

/// 基于 HTTP 聊天补全接口的出题服务实现
pub struct HttpQuizProvider {
    client: reqwest::Client,
    config: ContentProviderConfig,
}

impl HttpQuizProvider {
    pub fn new(config: ContentProviderConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| QuestError::Internal(format!("HTTP 客户端初始化失败: {e}")))?;
        Ok(Self { client, config })
    }

    fn build_prompt(topic: &str, num_questions: usize) -> String {
        format!(
            "Generate a {num_questions}-question multiple-choice quiz about '{topic}'. \
             The response must be a single, valid JSON object with the exact schema: \
             {{\"topic\":\"{topic}\",\"questions\":[{{\"id\":\"1\",\"text\":\"...\",\
             \"choices\":[\"...\"],\"correct_index\":0}}]}}"
        )
    }
}

#[async_trait]
impl QuizProvider for HttpQuizProvider {
    #[instrument(skip(self))]
    async fn generate(&self, topic: &str, num_questions: usize) -> Result<Vec<Question>> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or_else(|| QuestError::Provider("出题服务 API key 未配置".to_string()))?;

        let body = json!({
            "model": self.config.model,
            "messages": [
                {
                    "role": "system",
                    "content": "You are a helpful assistant that only outputs valid, raw JSON. \
                                Do not include markdown, code fences, or any explanatory text."
                },
                {"role": "user", "content": Self::build_prompt(topic, num_questions)}
            ],
        });

        let response = self
            .client
            .post(&self.config.endpoint)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| QuestError::Provider(format!("出题服务请求失败: {e}")))?;

        if !response.status().is_success() {
            return Err(QuestError::Provider(format!(
                "出题服务返回异常状态: {}",
                response.status()
            )));
        }

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| QuestError::Provider(format!("出题服务响应解析失败: {e}")))?;

        let content = chat
            .choices
            .first()
            .map(|c| c.message.content.as_str())
            .ok_or_else(|| QuestError::Provider("出题服务未返回任何候选".to_string()))?;

        let payload: QuizPayload = serde_json::from_str(extract_json(content)?)
            .map_err(|e| QuestError::Provider(format!("题目 JSON 解析失败: {e}")))?;

        debug!(
            topic = %topic,
            returned = payload.questions.len(),
            "出题服务返回题目"
        );
        sanitize_questions(payload.questions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_json_plain() {
        let raw = r#"{"topic":"DeFi","questions":[]}"#;
        assert_eq!(extract_json(raw).unwrap(), raw);
    }

    #[test]
    fn test_extract_json_with_fences() {
        let raw = "```json\n{\"topic\":\"DeFi\"}\n```";
        assert_eq!(extract_json(raw).unwrap(), "{\"topic\":\"DeFi\"}");
    }

    #[test]
    fn test_extract_json_missing_braces() {
        assert!(extract_json("no json here").is_err());
        assert!(extract_json("} reversed {").is_err());
    }

    #[test]
    fn test_sanitize_backfills_missing_ids() {
        let raw = vec![
            RawQuestion {
                id: None,
                text: "q1".to_string(),
                choices: vec!["a".to_string(), "b".to_string()],
                correct_index: 0,
            },
            RawQuestion {
                id: Some(serde_json::Value::Number(7.into())),
                text: "q2".to_string(),
                choices: vec!["a".to_string(), "b".to_string()],
                correct_index: 1,
            },
        ];
        let questions = sanitize_questions(raw).unwrap();
        assert_eq!(questions[0].id, "1");
        assert_eq!(questions[1].id, "7");
    }

    #[test]
    fn test_sanitize_rejects_out_of_range_answer() {
        let raw = vec![RawQuestion {
            id: None,
            text: "q".to_string(),
            choices: vec!["a".to_string()],
            correct_index: 3,
        }];
        let err = sanitize_questions(raw).unwrap_err();
        assert_eq!(err.error_code(), "PROVIDER_ERROR");
    }

    #[test]
    fn test_sanitize_rejects_duplicate_ids() {
        let raw = vec![
            RawQuestion {
                id: Some(serde_json::Value::String("1".to_string())),
                text: "q1".to_string(),
                choices: vec!["a".to_string(), "b".to_string()],
                correct_index: 0,
            },
            RawQuestion {
                id: Some(serde_json::Value::String("1".to_string())),
                text: "q2".to_string(),
                choices: vec!["a".to_string(), "b".to_string()],
                correct_index: 1,
            },
        ];
        let err = sanitize_questions(raw).unwrap_err();
        assert_eq!(err.error_code(), "PROVIDER_ERROR");
    }

    #[test]
    fn test_sanitize_rejects_empty_choices() {
        let raw = vec![RawQuestion {
            id: None,
            text: "q".to_string(),
            choices: vec![],
            correct_index: 0,
        }];
        assert!(sanitize_questions(raw).is_err());
    }

    #[test]
    fn test_prompt_contains_schema_and_topic() {
        let prompt = HttpQuizProvider::build_prompt("Crypto Wallets", 5);
        assert!(prompt.contains("Crypto Wallets"));
        assert!(prompt.contains("5-question"));
        assert!(prompt.contains("correct_index"));
    }
}
