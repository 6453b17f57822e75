//! Identifiers and the per-operation call context.

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::{error::Result, CoreError};

/// Identity of a caller (oracle, maintainer, bettor, liquidity provider).
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AccountId(String);

impl AccountId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for AccountId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Who is calling and at what (chain) time.
///
/// Every mutating operation receives one of these; the timestamp is the only
/// source of "now" inside the crate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Call {
    pub sender: AccountId,
    pub timestamp: u64,
}

impl Call {
    pub fn new(sender: impl Into<AccountId>, timestamp: u64) -> Self {
        Self {
            sender: sender.into(),
            timestamp,
        }
    }
}

macro_rules! sequential_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
        pub struct $name(pub u64);

        impl $name {
            /// The identifier following this one.
            pub fn next(self) -> Self {
                Self(self.0 + 1)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

sequential_id!(
    /// Internal, core-local condition identifier (starts at 1)
    ConditionId
);
sequential_id!(
    /// Core-local bet identifier (starts at 1)
    BetId
);
sequential_id!(
    /// Receipt token identifier (starts at 1)
    ReceiptId
);
sequential_id!(
    /// Liquidity deposit identifier (starts at 1)
    DepositId
);

/// Identifier an oracle chooses for its own condition.
pub type OracleConditionId = u64;

/// Identifier of one side of a condition. Zero is reserved as "no outcome".
pub type OutcomeId = u64;

/// Index of a core inside the pool router; the highest index is active.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CoreVersion(pub usize);

impl fmt::Display for CoreVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// Opaque 32-byte content reference attached to a condition.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct Metadata(pub [u8; 32]);

impl Metadata {
    /// Hash a content reference (e.g. an IPFS CID) into metadata.
    pub fn from_content(content: &str) -> Self {
        let digest = Sha256::digest(content.as_bytes());
        Self(digest.into())
    }

    /// Parse 64 hex characters.
    pub fn from_hex(encoded: &str) -> Result<Self> {
        let bytes = hex::decode(encoded).map_err(|_| CoreError::WrongDataFormat)?;
        let bytes: [u8; 32] = bytes.try_into().map_err(|_| CoreError::WrongDataFormat)?;
        Ok(Self(bytes))
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for Metadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}
