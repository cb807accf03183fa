//! Wallet policies
//!
//! Knobs that change coordinator behaviour without touching the ledger.

use std::fmt;
use std::str::FromStr;

/// What to do when sender and recipient are the same employee
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelfTransferPolicy {
    /// Refuse with `DomainError::SelfTransfer`
    #[default]
    Reject,
    /// Debit then credit the same wallet and record the transfer
    Allow,
}

impl FromStr for SelfTransferPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reject" => Ok(Self::Reject),
            "allow" => Ok(Self::Allow),
            other => Err(format!("unknown self-transfer policy: {}", other)),
        }
    }
}

impl fmt::Display for SelfTransferPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reject => write!(f, "reject"),
            Self::Allow => write!(f, "allow"),
        }
    }
}

/// Policy shared by the transfer and purchase coordinators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WalletPolicy {
    pub self_transfer: SelfTransferPolicy,
    /// Extra attempts after a serialization conflict (0 = fail immediately)
    pub serialization_retries: u32,
}

impl WalletPolicy {
    pub fn with_self_transfer(mut self, policy: SelfTransferPolicy) -> Self {
        self.self_transfer = policy;
        self
    }

    pub fn with_serialization_retries(mut self, retries: u32) -> Self {
        self.serialization_retries = retries;
        self
    }
}
