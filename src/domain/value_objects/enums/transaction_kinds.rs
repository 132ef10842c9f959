use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Ledger entry classification; the signed amount carries the direction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub enum TransactionKind {
    Deposit,
    Purchase,
    Referral,
}

impl Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self {
            TransactionKind::Deposit => "deposit",
            TransactionKind::Purchase => "purchase",
            TransactionKind::Referral => "referral",
        };
        write!(f, "{}", kind)
    }
}

impl TransactionKind {
    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "deposit" => Some(TransactionKind::Deposit),
            "purchase" => Some(TransactionKind::Purchase),
            "referral" => Some(TransactionKind::Referral),
            _ => None,
        }
    }
}
