//! 链交互子系统：适配器接口、权限模型、模拟链与注册表

pub mod access;
pub mod adapter;
pub mod registry;
pub mod simulated;

pub use access::MinterAccess;
pub use adapter::{BadgeInfo, ChainAdapter, MintRequest};
pub use registry::ChainRegistry;
pub use simulated::SimulatedChain;

#[cfg(test)]
pub use adapter::MockChainAdapter;
