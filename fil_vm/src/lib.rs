//! The message-passing boundary of the VM.
//!
//! This is the _only_ part of the code base that moves data across actor boundaries: a single
//! [`send`] applies a value transfer, persists both actors and dispatches into built-in actor code.

pub mod actor;
pub mod builtin;
pub mod context;
pub mod error;
pub mod fake_state_tree;
pub mod message;
pub mod send;
pub mod state_tree;
pub mod transfer;

pub use actor::Actor;
pub use builtin::{BuiltinActors, Executable, ExportTable, ExportedMethod, Exports};
pub use context::VmContext;
pub use error::{FaultError, RevertError, Side, VmError};
pub use message::Message;
pub use send::{send, send_with, SendOutcome, SendResult, EXIT_FAILED, EXIT_OK};
pub use state_tree::{HamtStateTree, StateTree, StateTreeError};
pub use transfer::{BalanceTransfer, Transfer, TransferError};
