//! 档案查询与学习分析
//!
//! 从提交历史派生只读统计：分类表现、最具挑战单元、进度反馈。
//! 全部为纯函数式派生，不修改档案。

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;
use tracing::instrument;

use crate::error::Result;
use crate::models::{LearnerProfile, Unit};
use crate::progress::ProgressStore;
use crate::roadmap::RoadmapGraph;

/// 单个分类的表现统计
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CategoryPerformance {
    pub category: String,
    pub attempts: u32,
    /// 该分类所有提交的平均得分（百分比，向下取整）
    pub average_score: u32,
}

/// 学习分析视图
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningAnalytics {
    pub address: String,
    pub xp: u64,
    pub streak: u32,
    pub completed_count: usize,
    pub total_units: usize,
    pub category_performance: Vec<CategoryPerformance>,
    /// 已完成单元中提交次数最多的一个，同次数按目录顺序取前者
    pub most_challenging_unit: Option<String>,
    pub next_suggested_unit: Option<String>,
    pub feedback: String,
}

/// 只读查询服务
pub struct QueryService {
    graph: Arc<RoadmapGraph>,
    progress: Arc<dyn ProgressStore>,
}

impl QueryService {
    pub fn new(graph: Arc<RoadmapGraph>, progress: Arc<dyn ProgressStore>) -> Self {
        Self { graph, progress }
    }

    #[instrument(skip(self))]
    pub async fn analytics(&self, address: &str) -> Result<LearningAnalytics> {
        let profile = self.progress.get(address).await?;
        Ok(self.analyze(&profile))
    }

    fn analyze(&self, profile: &LearnerProfile) -> LearningAnalytics {
        LearningAnalytics {
            address: profile.address.clone(),
            xp: profile.xp,
            streak: profile.streak,
            completed_count: profile.completed_units.len(),
            total_units: self.graph.len(),
            category_performance: self.category_performance(profile),
            most_challenging_unit: self.most_challenging(profile),
            next_suggested_unit: self.graph.next_suggested(profile).map(|u| u.id.clone()),
            feedback: progression_feedback(profile.completed_units.len()),
        }
    }

    /// 按分类聚合提交历史
    fn category_performance(&self, profile: &LearnerProfile) -> Vec<CategoryPerformance> {
        let mut buckets: BTreeMap<&str, (u32, u64)> = BTreeMap::new();
        for attempt in &profile.quiz_attempts {
            let Some(unit) = self.graph.get(&attempt.unit_id) else {
                continue;
            };
            let bucket = buckets.entry(unit.category.as_str()).or_insert((0, 0));
            bucket.0 += 1;
            bucket.1 += u64::from(attempt.score_percent);
        }
        buckets
            .into_iter()
            .map(|(category, (attempts, score_sum))| CategoryPerformance {
                category: category.to_string(),
                attempts,
                average_score: (score_sum / u64::from(attempts)) as u32,
            })
            .collect()
    }

    /// 最具挑战单元：已完成单元中提交次数最多者
    ///
    /// 目录顺序遍历保证同次数时的稳定选择。
    fn most_challenging(&self, profile: &LearnerProfile) -> Option<String> {
        let mut best: Option<(&Unit, u32)> = None;
        for unit in self.graph.units() {
            if !profile.has_completed(&unit.id) {
                continue;
            }
            let attempts = profile.attempts_by_unit.get(&unit.id).copied().unwrap_or(0);
            if best.map_or(true, |(_, max)| attempts > max) {
                best = Some((unit, attempts));
            }
        }
        best.map(|(unit, _)| unit.id.clone())
    }
}

/// 根据完成数量生成进度反馈文案
fn progression_feedback(completed: usize) -> String {
    match completed {
        0 => "Welcome to DefiQuest! Start your learning journey by completing your first quest."
            .to_string(),
        1..=2 => format!(
            "Great start! You've completed {completed} quest(s). Keep building your DeFi knowledge foundation."
        ),
        3..=4 => format!(
            "Excellent progress! With {completed} quests completed, you're becoming a DeFi enthusiast. Consider exploring advanced topics."
        ),
        _ => format!(
            "Outstanding achievement! You've mastered {completed} quests. You're well on your way to becoming a DeFi expert!"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::Utc;

    use crate::models::QuizAttemptRecord;
    use crate::progress::MockProgressStore;
    use crate::roadmap::builtin_roadmap;

    fn service_with_profile(profile: LearnerProfile) -> QueryService {
        let graph = Arc::new(RoadmapGraph::load(builtin_roadmap()).unwrap());
        let mut store = MockProgressStore::new();
        store.expect_get().returning(move |_| Ok(profile.clone()));
        QueryService::new(graph, Arc::new(store))
    }

    fn attempt(unit_id: &str, score: u32, passed: bool) -> QuizAttemptRecord {
        QuizAttemptRecord {
            unit_id: unit_id.to_string(),
            score_percent: score,
            passed,
            timestamp: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_fresh_profile_analytics() {
        let service = service_with_profile(LearnerProfile::new("0xAlice"));
        let analytics = service.analytics("0xAlice").await.unwrap();

        assert_eq!(analytics.completed_count, 0);
        assert_eq!(analytics.total_units, 8);
        assert!(analytics.category_performance.is_empty());
        assert!(analytics.most_challenging_unit.is_none());
        assert_eq!(analytics.next_suggested_unit.as_deref(), Some("intro-blockchain"));
        assert!(analytics.feedback.starts_with("Welcome"));
    }

    #[tokio::test]
    async fn test_category_average_score() {
        let mut profile = LearnerProfile::new("0xAlice");
        // intro-blockchain 与 intro-defi 同属 Fundamentals
        profile.quiz_attempts = vec![
            attempt("intro-blockchain", 40, true),
            attempt("intro-blockchain", 80, true),
            attempt("intro-defi", 60, true),
        ];
        let service = service_with_profile(profile);
        let analytics = service.analytics("0xAlice").await.unwrap();

        let fundamentals = analytics
            .category_performance
            .iter()
            .find(|c| c.category == "Fundamentals")
            .unwrap();
        assert_eq!(fundamentals.attempts, 3);
        assert_eq!(fundamentals.average_score, 60);
    }

    #[tokio::test]
    async fn test_most_challenging_only_counts_completed() {
        let mut profile = LearnerProfile::new("0xAlice");
        let now = Utc::now();
        profile.completed_units.insert("intro-blockchain".to_string(), now);
        profile.completed_units.insert("intro-defi".to_string(), now);
        profile.attempts_by_unit.insert("intro-blockchain".to_string(), 2);
        profile.attempts_by_unit.insert("intro-defi".to_string(), 4);
        // 未完成单元即使提交再多也不参与统计
        profile.attempts_by_unit.insert("intro-wallets".to_string(), 9);

        let service = service_with_profile(profile);
        let analytics = service.analytics("0xAlice").await.unwrap();
        assert_eq!(analytics.most_challenging_unit.as_deref(), Some("intro-defi"));
    }

    #[tokio::test]
    async fn test_most_challenging_tie_breaks_by_catalog_order() {
        let mut profile = LearnerProfile::new("0xAlice");
        let now = Utc::now();
        profile.completed_units.insert("intro-blockchain".to_string(), now);
        profile.completed_units.insert("intro-defi".to_string(), now);
        profile.attempts_by_unit.insert("intro-blockchain".to_string(), 3);
        profile.attempts_by_unit.insert("intro-defi".to_string(), 3);

        let service = service_with_profile(profile);
        let analytics = service.analytics("0xAlice").await.unwrap();
        // intro-blockchain 在目录中先于 intro-defi
        assert_eq!(
            analytics.most_challenging_unit.as_deref(),
            Some("intro-blockchain")
        );
    }

    #[test]
    fn test_feedback_tiers() {
        assert!(progression_feedback(0).starts_with("Welcome"));
        assert!(progression_feedback(1).starts_with("Great start"));
        assert!(progression_feedback(2).starts_with("Great start"));
        assert!(progression_feedback(3).starts_with("Excellent progress"));
        assert!(progression_feedback(4).starts_with("Excellent progress"));
        assert!(progression_feedback(5).starts_with("Outstanding achievement"));
        assert!(progression_feedback(8).starts_with("Outstanding achievement"));
    }
}
