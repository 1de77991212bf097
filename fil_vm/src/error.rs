use std::error::Error as StdError;
use std::fmt;

use cid::Cid;
use fvm_ipld_encoding::Error as SerializationError;
use fvm_shared::address::Address;
use thiserror::Error;

use crate::send::EXIT_FAILED;
use crate::state_tree::StateTreeError;
use crate::transfer::TransferError;

/// Which of the two actors in a message an error concerns
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    From,
    To,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::From => f.write_str("from"),
            Side::To => f.write_str("to"),
        }
    }
}

/// A message-level rejection. The node keeps running; the message is discarded.
#[derive(Error, Debug)]
pub enum RevertError {
    #[error(transparent)]
    Transfer(#[from] TransferError),
    #[error("missing export: {0}")]
    MissingExport(String),
    #[error("invalid params for {method}: {source}")]
    InvalidParams {
        method: String,
        #[source]
        source: SerializationError,
    },
    #[error("{0}")]
    Aborted(String),
}

/// A system-level failure. The state tree or code loading infrastructure is broken.
#[derive(Error, Debug)]
pub enum FaultError {
    #[error("could not set {side} actor {address} after send: {source}")]
    SetActor {
        side: Side,
        address: Address,
        #[source]
        source: StateTreeError,
    },
    #[error("could not get {side} actor {address}: {source}")]
    GetActor {
        side: Side,
        address: Address,
        #[source]
        source: StateTreeError,
    },
    #[error("unable to load code {code} for to actor: {source}")]
    LoadCode {
        code: Cid,
        #[source]
        source: StateTreeError,
    },
    #[error("{context}: {source}")]
    Storage {
        context: &'static str,
        #[source]
        source: StateTreeError,
    },
    #[error("could not encode return value: {0}")]
    Encoding(#[source] SerializationError),
    #[error("{context}: {source}")]
    Actor {
        context: String,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },
}

/// Every error that crosses the VM boundary carries exactly one of these two tags
#[derive(Error, Debug)]
pub enum VmError {
    #[error(transparent)]
    Revert(#[from] RevertError),
    #[error(transparent)]
    Fault(#[from] FaultError),
}

impl VmError {
    /// A revert raised by actor code
    pub fn revert(reason: impl Into<String>) -> Self {
        VmError::Revert(RevertError::Aborted(reason.into()))
    }

    /// A fault raised by actor code, wrapping the underlying cause with context
    ///
    /// The cause stays reachable through [`StdError::source`].
    pub fn fault(
        context: impl Into<String>,
        cause: impl Into<Box<dyn StdError + Send + Sync>>,
    ) -> Self {
        VmError::Fault(FaultError::Actor { context: context.into(), source: cause.into() })
    }

    pub fn should_revert(&self) -> bool {
        matches!(self, VmError::Revert(_))
    }

    pub fn is_fault(&self) -> bool {
        matches!(self, VmError::Fault(_))
    }

    /// Both tags map to the same exit code, callers must branch on the tag itself
    pub fn exit_code(&self) -> u8 {
        EXIT_FAILED
    }
}

impl From<TransferError> for VmError {
    fn from(error: TransferError) -> Self {
        VmError::Revert(RevertError::Transfer(error))
    }
}
