//! REST API 处理器

pub mod badges;
pub mod chains;
pub mod health;
pub mod profile;
pub mod quiz;
pub mod roadmap;
