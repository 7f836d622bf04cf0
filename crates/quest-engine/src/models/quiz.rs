//! 测验题目模型

use serde::{Deserialize, Serialize};

/// 测验题目
///
/// correct_index 在提交前绝不能暴露给学习者，
/// 对外展示使用 `QuestionView`。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub text: String,
    pub choices: Vec<String>,
    #[serde(rename = "correct_index")]
    pub correct_index: usize,
}

/// 对学习者展示的题目视图（剥离答案）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionView {
    pub id: String,
    pub text: String,
    pub choices: Vec<String>,
}

impl From<&Question> for QuestionView {
    fn from(q: &Question) -> Self {
        Self {
            id: q.id.clone(),
            text: q.text.clone(),
            choices: q.choices.clone(),
        }
    }
}
