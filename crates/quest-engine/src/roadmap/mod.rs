//! 学习路线图模块
//!
//! 不可变的单元目录与前置条件图查询

pub mod catalog;
pub mod graph;

pub use catalog::{builtin_roadmap, load_roadmap};
pub use graph::RoadmapGraph;
