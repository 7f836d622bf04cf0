//! 铸造权限控制
//!
//! 链上合约的权限模型：一个 owner 加一个可变更的 minter 白名单。
//! owner 天然具备铸造权；白名单的增删只有 owner 能操作。

use std::collections::HashSet;

use crate::error::{QuestError, Result};
use crate::models::normalize_address;

/// owner + 白名单的权限表
#[derive(Debug, Clone)]
pub struct MinterAccess {
    owner: String,
    minters: HashSet<String>,
}

impl MinterAccess {
    pub fn new(owner: &str) -> Self {
        Self {
            owner: normalize_address(owner),
            minters: HashSet::new(),
        }
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// 判断身份是否可铸造：owner 或白名单成员
    pub fn can_mint(&self, identity: &str) -> bool {
        let identity = normalize_address(identity);
        identity == self.owner || self.minters.contains(&identity)
    }

    pub fn is_owner(&self, identity: &str) -> bool {
        normalize_address(identity) == self.owner
    }

    /// 将身份加入白名单，仅 owner 可调用
    pub fn authorize(&mut self, caller: &str, chain: &str, minter: &str) -> Result<()> {
        self.require_owner(caller, chain)?;
        self.minters.insert(normalize_address(minter));
        Ok(())
    }

    /// 将身份移出白名单，仅 owner 可调用。owner 自身不受白名单影响。
    pub fn revoke(&mut self, caller: &str, chain: &str, minter: &str) -> Result<()> {
        self.require_owner(caller, chain)?;
        self.minters.remove(&normalize_address(minter));
        Ok(())
    }

    fn require_owner(&self, caller: &str, chain: &str) -> Result<()> {
        if !self.is_owner(caller) {
            return Err(QuestError::NotAuthorized {
                identity: normalize_address(caller),
                chain: chain.to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_can_always_mint() {
        let access = MinterAccess::new("0xOwner");
        assert!(access.can_mint("0xowner"));
        assert!(!access.can_mint("0xstranger"));
    }

    #[test]
    fn test_owner_authorizes_minter() {
        let mut access = MinterAccess::new("0xOwner");
        access.authorize("0xOwner", "ethereum", "0xMinter").unwrap();
        assert!(access.can_mint("0xMINTER"));
    }

    #[test]
    fn test_non_owner_cannot_authorize() {
        let mut access = MinterAccess::new("0xOwner");
        let err = access
            .authorize("0xStranger", "ethereum", "0xMinter")
            .unwrap_err();
        assert_eq!(err.error_code(), "NOT_AUTHORIZED");
    }

    #[test]
    fn test_revoke_removes_minter_but_not_owner() {
        let mut access = MinterAccess::new("0xOwner");
        access.authorize("0xOwner", "ethereum", "0xMinter").unwrap();
        access.revoke("0xOwner", "ethereum", "0xMinter").unwrap();
        assert!(!access.can_mint("0xMinter"));

        // owner 被 revoke 也不影响其铸造权
        access.revoke("0xOwner", "ethereum", "0xOwner").unwrap();
        assert!(access.can_mint("0xOwner"));
    }
}
