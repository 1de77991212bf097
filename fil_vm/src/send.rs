use fvm_ipld_encoding::RawBytes;
use tracing::{debug, warn};

use crate::actor::Actor;
use crate::context::VmContext;
use crate::error::{FaultError, RevertError, Side, VmError};
use crate::message::Message;
use crate::state_tree::StateTree;
use crate::transfer::{BalanceTransfer, Transfer};

/// Exit code of a message that applied its transfer and/or dispatched successfully
pub const EXIT_OK: u8 = 0;
/// Exit code of a message that failed, whichever way the error is tagged
pub const EXIT_FAILED: u8 = 1;

pub type SendResult = std::result::Result<RawBytes, VmError>;

/// The outcome of a single message pass
///
/// If `error` is set it is always tagged as either a revert or a fault, and `exit_code` is
/// [`EXIT_FAILED`].
#[derive(Debug)]
pub struct SendOutcome {
    pub return_data: RawBytes,
    pub exit_code: u8,
    pub error: Option<VmError>,
}

impl SendOutcome {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    pub fn into_result(self) -> SendResult {
        match self.error {
            Some(error) => Err(error),
            None => Ok(self.return_data),
        }
    }
}

impl From<SendResult> for SendOutcome {
    fn from(result: SendResult) -> Self {
        match result {
            Ok(return_data) => Self { return_data, exit_code: EXIT_OK, error: None },
            Err(error) => Self {
                return_data: RawBytes::default(),
                exit_code: error.exit_code(),
                error: Some(error),
            },
        }
    }
}

/// Executes a message pass inside the VM, applying value with [`BalanceTransfer`]
pub fn send<ST: StateTree>(from: Actor, to: Actor, msg: &Message, tree: &mut ST) -> SendOutcome {
    send_with(&BalanceTransfer, from, to, msg, tree)
}

/// Executes a message pass with the given transfer capability
///
/// Both actors are persisted as soon as the transfer succeeds, before the code of the receiving
/// actor is even resolved. A failed dispatch therefore still leaves the transfer in the tree; the
/// caller decides from the error's tag whether to commit or discard the whole transition.
pub fn send_with<ST: StateTree>(
    transfer: &dyn Transfer,
    from: Actor,
    to: Actor,
    msg: &Message,
    tree: &mut ST,
) -> SendOutcome {
    let result = apply(transfer, from, to, msg, tree);
    if let Err(VmError::Fault(fault)) = &result {
        warn!(from = %msg.from, to = %msg.to, method = %msg.method, "fault during send: {fault}");
    }
    result.into()
}

fn apply<ST: StateTree>(
    transfer: &dyn Transfer,
    mut from: Actor,
    mut to: Actor,
    msg: &Message,
    tree: &mut ST,
) -> SendResult {
    if let Some(value) = &msg.value {
        if msg.from == msg.to {
            // both records are copies of one actor, so validate against scratch copies and move
            // nothing
            transfer.transfer(&mut from.clone(), &mut to.clone(), value)?;
            to = from.clone();
        } else {
            transfer.transfer(&mut from, &mut to, value)?;
        }
    }

    // save balance changes
    tree.set_actor(&msg.from, &from).map_err(|source| FaultError::SetActor {
        side: Side::From,
        address: msg.from,
        source,
    })?;
    tree.set_actor(&msg.to, &to).map_err(|source| FaultError::SetActor {
        side: Side::To,
        address: msg.to,
        source,
    })?;

    if msg.is_transfer_only() {
        debug!(from = %msg.from, to = %msg.to, "value transfer only, skipping dispatch");
        return Ok(RawBytes::default());
    }

    let executable = tree
        .builtin_actor_code(&to.code)
        .map_err(|source| FaultError::LoadCode { code: to.code, source })?;

    if !executable.exports().contains(msg.method.as_str()) {
        return Err(RevertError::MissingExport(msg.method.clone()).into());
    }
    let method = executable
        .method(&msg.method)
        .ok_or_else(|| RevertError::MissingExport(msg.method.clone()))?;

    debug!(from = %msg.from, to = %msg.to, method = %msg.method, "dispatching message");
    let mut ctx = VmContext::new(from, to, msg, tree, transfer);
    method(&mut ctx)
}
