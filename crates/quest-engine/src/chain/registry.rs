//! 链注册表
//!
//! 引擎支持同时面向多个网络发放。注册表按网络名持有适配器，
//! 启动时根据配置装配，运行期只读。

use std::collections::HashMap;
use std::sync::Arc;

use quest_shared::config::IssuerConfig;

use crate::chain::adapter::ChainAdapter;
use crate::chain::simulated::SimulatedChain;
use crate::error::{QuestError, Result};

/// 按网络名索引的适配器集合
#[derive(Default)]
pub struct ChainRegistry {
    chains: HashMap<String, Arc<dyn ChainAdapter>>,
}

impl ChainRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 根据发放配置构建模拟链注册表
    ///
    /// 每条链以配置的 owner 初始化，并把配置的 minter 预先加入白名单。
    pub async fn from_config(config: &IssuerConfig) -> Result<Self> {
        let mut registry = Self::new();
        for chain_config in &config.chains {
            let chain = SimulatedChain::new(&chain_config.name, &chain_config.owner);
            chain
                .authorize_minter(&chain_config.owner, &chain_config.minter)
                .await?;
            registry.register(Arc::new(chain));
        }
        Ok(registry)
    }

    pub fn register(&mut self, chain: Arc<dyn ChainAdapter>) {
        self.chains.insert(chain.name().to_string(), chain);
    }

    pub fn get(&self, name: &str) -> Result<Arc<dyn ChainAdapter>> {
        self.chains
            .get(name)
            .cloned()
            .ok_or_else(|| QuestError::ChainNotFound(name.to_string()))
    }

    /// 已注册的网络名，字典序
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.chains.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.chains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }
}
