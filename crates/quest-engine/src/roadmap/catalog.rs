//! 内置学习目录
//!
//! 默认的 DeFi 学习路线图，亦可通过配置指定 JSON 目录文件覆盖

use std::path::Path;

use crate::error::{GraphError, QuestError, Result};
use crate::models::{Unit, UnitResource};

use super::graph::RoadmapGraph;

fn unit(
    id: &str,
    title: &str,
    category: &str,
    description: &str,
    introduction: &str,
    xp: u32,
    prerequisites: &[&str],
    resources: &[(&str, &str)],
) -> Unit {
    Unit {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        introduction: introduction.to_string(),
        category: category.to_string(),
        xp_reward: xp,
        prerequisites: prerequisites.iter().map(|s| s.to_string()).collect(),
        resources: resources
            .iter()
            .map(|(t, u)| UnitResource {
                title: t.to_string(),
                url: u.to_string(),
            })
            .collect(),
    }
}

/// 内置 DeFi 路线图目录
///
/// 从基础概念到进阶主题的 8 个单元，前置条件图无环。
pub fn builtin_roadmap() -> Vec<Unit> {
    vec![
        unit(
            "intro-blockchain",
            "What is a Blockchain?",
            "Fundamentals",
            "Learn the core concepts of distributed ledger technology.",
            "A blockchain is a decentralized, distributed digital ledger of records \
             called blocks, used to record transactions across many computers so that \
             no block can be altered retroactively.",
            50,
            &[],
            &[(
                "Blockchain Explained by Investopedia",
                "https://www.investopedia.com/terms/b/blockchain.asp",
            )],
        ),
        unit(
            "intro-defi",
            "Introduction to DeFi",
            "Fundamentals",
            "Discover the world of decentralized finance.",
            "Decentralized Finance (DeFi) is blockchain-based finance that does not \
             rely on central intermediaries, using smart contracts instead.",
            100,
            &["intro-blockchain"],
            &[(
                "DeFi Explained by Coinbase",
                "https://www.coinbase.com/learn/crypto-basics/what-is-defi",
            )],
        ),
        unit(
            "intro-wallets",
            "Crypto Wallets",
            "Fundamentals",
            "Understand how to securely store and manage assets.",
            "A crypto wallet stores the public and private keys for cryptocurrency \
             transactions, and often offers encryption and signing functionality.",
            100,
            &["intro-blockchain"],
            &[(
                "Guide to Crypto Wallets by a16z",
                "https://a16zcrypto.com/posts/article/a-simple-guide-to-crypto-wallets/",
            )],
        ),
        unit(
            "intermediate-nfts",
            "NFTs & Digital Ownership",
            "Intermediate",
            "Explore the basics of Non-Fungible Tokens.",
            "A non-fungible token (NFT) is a unique, non-interchangeable unit of data \
             stored on a blockchain, used to represent unique items.",
            100,
            &["intro-wallets"],
            &[(
                "NFTs, Explained by a16z",
                "https://a16z.com/2021/09/21/nfts-and-a-thousand-true-fans/",
            )],
        ),
        unit(
            "intermediate-swapping",
            "Token Swapping & DEXes",
            "Intermediate",
            "Learn to use Decentralized Exchanges.",
            "A decentralized exchange (DEX) is a peer-to-peer marketplace where \
             transactions occur directly between crypto traders, non-custodially.",
            150,
            &["intro-defi", "intro-wallets"],
            &[(
                "What is a DEX? by Gemini",
                "https://www.gemini.com/cryptopedia/decentralized-exchange-crypto-dex",
            )],
        ),
        unit(
            "advanced-yield",
            "Yield Farming Basics",
            "Advanced",
            "Earn passive income with your crypto assets.",
            "Yield farming, also referred to as liquidity mining, is a way to generate \
             rewards by locking up cryptocurrency holdings.",
            200,
            &["intermediate-swapping"],
            &[(
                "Yield Farming Guide by Chainlink",
                "https://chain.link/education/yield-farming",
            )],
        ),
        unit(
            "advanced-daos",
            "Intro to DAOs",
            "Advanced",
            "Understand Decentralized Autonomous Organizations.",
            "A decentralized autonomous organization (DAO) is an organization \
             represented by rules encoded as a transparent computer program, \
             controlled by its members.",
            250,
            &["intermediate-swapping"],
            &[("DAOs Explained by Aragon", "https://aragon.org/dao")],
        ),
        unit(
            "expert-blockdag",
            "The Rise of BlockDAG",
            "Expert",
            "Learn the next evolution of blockchain architecture.",
            "BlockDAG is a distributed ledger technology that allows blocks to be \
             added in parallel, leading to higher throughput and scalability.",
            300,
            &["advanced-yield"],
            &[(
                "BlockDAG Technology Explained",
                "https://blockdag.network/learn",
            )],
        ),
    ]
}

/// 加载路线图
///
/// 指定了目录文件时从 JSON 文件读取，否则使用内置目录。
/// 无论来源，加载后都经过同一套整体校验。
pub fn load_roadmap(catalog_path: Option<&Path>) -> Result<RoadmapGraph> {
    let units = match catalog_path {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .map_err(|e| QuestError::Internal(format!("读取目录文件失败: {e}")))?;
            serde_json::from_str::<Vec<Unit>>(&raw)?
        }
        None => builtin_roadmap(),
    };

    RoadmapGraph::load(units).map_err(GraphError::into)
}
