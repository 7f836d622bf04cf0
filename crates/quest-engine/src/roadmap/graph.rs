//! 前置条件图
//!
//! 目录在服务启动时加载一次并整体校验，之后只读。
//! 采用 id 索引的 arena 结构（Vec + HashMap）而非指针互联的节点图，
//! 目录顺序即 Vec 顺序。

use std::collections::{HashMap, HashSet, VecDeque};

use tracing::info;

use crate::error::GraphError;
use crate::models::{LearnerProfile, Unit};

/// 学习路线图
///
/// 不可变的单元目录及其前置条件边，提供纯函数式的图查询。
#[derive(Debug, Clone, Default)]
pub struct RoadmapGraph {
    /// 按目录顺序存放的单元
    units: Vec<Unit>,
    /// 单元 id -> units 下标
    index: HashMap<String, usize>,
}

impl RoadmapGraph {
    /// 从单元列表构建路线图并整体校验
    ///
    /// 校验内容（任一失败则整个目录拒绝加载）：
    /// - 单元 id 唯一
    /// - 不允许自引用前置条件
    /// - 前置条件必须指向目录内的单元
    /// - 前置条件图无环（Kahn 拓扑排序检测）
    pub fn load(units: Vec<Unit>) -> Result<Self, GraphError> {
        let mut index = HashMap::with_capacity(units.len());
        for (i, unit) in units.iter().enumerate() {
            if index.insert(unit.id.clone(), i).is_some() {
                return Err(GraphError::DuplicateUnit(unit.id.clone()));
            }
        }

        for unit in &units {
            for prereq in &unit.prerequisites {
                if prereq == &unit.id {
                    return Err(GraphError::SelfReference(unit.id.clone()));
                }
                if !index.contains_key(prereq) {
                    return Err(GraphError::UnknownPrerequisite {
                        unit_id: unit.id.clone(),
                        prerequisite: prereq.clone(),
                    });
                }
            }
        }

        let graph = Self { units, index };
        graph.detect_cycle()?;

        info!(unit_count = graph.units.len(), "路线图目录加载并校验完成");
        Ok(graph)
    }

    /// Kahn 拓扑排序检测环路
    ///
    /// 排序无法覆盖全部节点时，剩余节点即构成环，
    /// 返回时按目录顺序列出涉及的单元 id。
    fn detect_cycle(&self) -> Result<(), GraphError> {
        // in_degree[i] = 单元 i 未处理的前置条件数
        let mut in_degree: Vec<usize> = self
            .units
            .iter()
            .map(|u| u.prerequisites.len())
            .collect();

        // dependents[i] = 以单元 i 为前置条件的单元下标
        let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); self.units.len()];
        for (i, unit) in self.units.iter().enumerate() {
            for prereq in &unit.prerequisites {
                let p = self.index[prereq];
                dependents[p].push(i);
            }
        }

        let mut queue: VecDeque<usize> = in_degree
            .iter()
            .enumerate()
            .filter(|&(_, &d)| d == 0)
            .map(|(i, _)| i)
            .collect();

        let mut visited = 0usize;
        while let Some(i) = queue.pop_front() {
            visited += 1;
            for &dep in &dependents[i] {
                in_degree[dep] -= 1;
                if in_degree[dep] == 0 {
                    queue.push_back(dep);
                }
            }
        }

        if visited < self.units.len() {
            let cycle: Vec<String> = in_degree
                .iter()
                .enumerate()
                .filter(|&(_, &d)| d > 0)
                .map(|(i, _)| self.units[i].id.clone())
                .collect();
            return Err(GraphError::CycleDetected(cycle));
        }

        Ok(())
    }

    /// 按 id 查询单元
    pub fn get(&self, id: &str) -> Option<&Unit> {
        self.index.get(id).map(|&i| &self.units[i])
    }

    /// 目录顺序的全部单元
    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    /// 单元数量
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// 目录是否为空
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// 某学习者当前可解锁的单元集合
    ///
    /// 可用 = 未完成 且 所有前置条件均已完成。
    pub fn units_available_for(&self, profile: &LearnerProfile) -> Vec<&Unit> {
        self.units
            .iter()
            .filter(|u| self.is_available(u, profile))
            .collect()
    }

    /// 推荐下一个单元（目录顺序中第一个可用单元）
    ///
    /// 全部完成时返回 None。
    pub fn next_suggested(&self, profile: &LearnerProfile) -> Option<&Unit> {
        self.units.iter().find(|u| self.is_available(u, profile))
    }

    /// 某单元缺少的前置条件（空集即已满足）
    pub fn missing_prerequisites(&self, unit: &Unit, profile: &LearnerProfile) -> Vec<String> {
        unit.prerequisites
            .iter()
            .filter(|p| !profile.has_completed(p))
            .cloned()
            .collect()
    }

    fn is_available(&self, unit: &Unit, profile: &LearnerProfile) -> bool {
        !profile.has_completed(&unit.id)
            && unit.prerequisites.iter().all(|p| profile.has_completed(p))
    }

    /// 目录内出现的分类集合（目录顺序去重）
    pub fn categories(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.units
            .iter()
            .filter(|u| seen.insert(u.category.as_str()))
            .map(|u| u.category.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn unit(id: &str, prereqs: &[&str]) -> Unit {
        Unit {
            id: id.to_string(),
            title: id.to_string(),
            description: String::new(),
            introduction: String::new(),
            category: "Fundamentals".to_string(),
            xp_reward: 50,
            prerequisites: prereqs.iter().map(|s| s.to_string()).collect(),
            resources: vec![],
        }
    }

    fn profile_with_completed(ids: &[&str]) -> LearnerProfile {
        let mut profile = LearnerProfile::new("0xaa");
        for id in ids {
            profile
                .completed_units
                .insert(id.to_string(), Utc::now());
        }
        profile
    }

    #[test]
    fn test_empty_catalog_loads() {
        let graph = RoadmapGraph::load(vec![]).unwrap();
        assert!(graph.is_empty());
    }

    #[test]
    fn test_duplicate_unit_rejected() {
        let err = RoadmapGraph::load(vec![unit("a", &[]), unit("a", &[])]).unwrap_err();
        assert_eq!(err, GraphError::DuplicateUnit("a".to_string()));
    }

    #[test]
    fn test_self_reference_rejected() {
        let err = RoadmapGraph::load(vec![unit("a", &["a"])]).unwrap_err();
        assert_eq!(err, GraphError::SelfReference("a".to_string()));
    }

    #[test]
    fn test_unknown_prerequisite_rejected() {
        let err = RoadmapGraph::load(vec![unit("a", &["ghost"])]).unwrap_err();
        assert_eq!(
            err,
            GraphError::UnknownPrerequisite {
                unit_id: "a".to_string(),
                prerequisite: "ghost".to_string(),
            }
        );
    }

    #[test]
    fn test_cycle_rejected_whole_catalog() {
        // a -> b, b -> a 构成环，整个目录不可用
        let err = RoadmapGraph::load(vec![unit("a", &["b"]), unit("b", &["a"])]).unwrap_err();
        match err {
            GraphError::CycleDetected(ids) => {
                assert_eq!(ids, vec!["a".to_string(), "b".to_string()]);
            }
            other => panic!("expected CycleDetected, got {other:?}"),
        }
    }

    #[test]
    fn test_longer_cycle_detected() {
        let units = vec![
            unit("a", &[]),
            unit("b", &["a", "d"]),
            unit("c", &["b"]),
            unit("d", &["c"]),
        ];
        assert!(matches!(
            RoadmapGraph::load(units),
            Err(GraphError::CycleDetected(_))
        ));
    }

    #[test]
    fn test_availability_frontier() {
        // 路线图 [A, B->{A}, C->{A,B}]
        let graph = RoadmapGraph::load(vec![
            unit("a", &[]),
            unit("b", &["a"]),
            unit("c", &["a", "b"]),
        ])
        .unwrap();

        let fresh = profile_with_completed(&[]);
        let ids: Vec<&str> = graph
            .units_available_for(&fresh)
            .iter()
            .map(|u| u.id.as_str())
            .collect();
        assert_eq!(ids, vec!["a"]);

        let after_a = profile_with_completed(&["a"]);
        let ids: Vec<&str> = graph
            .units_available_for(&after_a)
            .iter()
            .map(|u| u.id.as_str())
            .collect();
        assert_eq!(ids, vec!["b"]);

        let after_ab = profile_with_completed(&["a", "b"]);
        let ids: Vec<&str> = graph
            .units_available_for(&after_ab)
            .iter()
            .map(|u| u.id.as_str())
            .collect();
        assert_eq!(ids, vec!["c"]);
    }

    #[test]
    fn test_next_suggested_catalog_order_and_completion() {
        let graph = RoadmapGraph::load(vec![
            unit("a", &[]),
            unit("b", &["a"]),
            unit("c", &["b"]),
        ])
        .unwrap();

        let fresh = profile_with_completed(&[]);
        assert_eq!(graph.next_suggested(&fresh).unwrap().id, "a");

        let done = profile_with_completed(&["a", "b", "c"]);
        assert!(graph.next_suggested(&done).is_none());
    }

    #[test]
    fn test_missing_prerequisites() {
        let graph = RoadmapGraph::load(vec![
            unit("a", &[]),
            unit("b", &[]),
            unit("c", &["a", "b"]),
        ])
        .unwrap();
        let profile = profile_with_completed(&["a"]);
        let c = graph.get("c").unwrap();
        assert_eq!(graph.missing_prerequisites(c, &profile), vec!["b"]);
    }

    #[test]
    fn test_categories_catalog_order_dedup() {
        let mut u1 = unit("a", &[]);
        u1.category = "Fundamentals".to_string();
        let mut u2 = unit("b", &[]);
        u2.category = "Advanced".to_string();
        let mut u3 = unit("c", &[]);
        u3.category = "Fundamentals".to_string();

        let graph = RoadmapGraph::load(vec![u1, u2, u3]).unwrap();
        assert_eq!(graph.categories(), vec!["Fundamentals", "Advanced"]);
    }
}
