use cid::multihash::Code;
use cid::Cid;
use fvm_ipld_encoding::{CborStore, RawBytes};
use fvm_shared::address::Address;
use fvm_shared::econ::TokenAmount;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::actor::Actor;
use crate::error::{FaultError, RevertError, Side, VmError};
use crate::message::Message;
use crate::send::{send_with, SendResult};
use crate::state_tree::{StateTree, StateTreeError};
use crate::transfer::Transfer;

/// The capability handed to actor code while it services a message
///
/// Actor records held here are the ones already persisted by the enclosing send. Anything that
/// changes them (storage writes, nested sends) goes through the state tree first and the context
/// then reloads its copies.
pub struct VmContext<'a, ST> {
    from: Actor,
    to: Actor,
    message: &'a Message,
    tree: &'a mut ST,
    transfer: &'a dyn Transfer,
}

impl<'a, ST: StateTree> VmContext<'a, ST> {
    pub fn new(
        from: Actor,
        to: Actor,
        message: &'a Message,
        tree: &'a mut ST,
        transfer: &'a dyn Transfer,
    ) -> Self {
        Self { from, to, message, tree, transfer }
    }

    pub fn message(&self) -> &Message {
        self.message
    }

    pub fn from(&self) -> &Actor {
        &self.from
    }

    pub fn to(&self) -> &Actor {
        &self.to
    }

    pub fn from_address(&self) -> Address {
        self.message.from
    }

    /// The address of the actor whose code is running
    pub fn to_address(&self) -> Address {
        self.message.to
    }

    /// Decodes the message parameters
    ///
    /// Malformed parameters are the sender's problem, so decode failures revert.
    pub fn params<P: DeserializeOwned>(&self) -> Result<P, VmError> {
        self.message.params.deserialize().map_err(|source| {
            RevertError::InvalidParams { method: self.message.method.clone(), source }.into()
        })
    }

    pub fn encode_return<R: Serialize>(&self, value: &R) -> SendResult {
        RawBytes::serialize(value).map_err(|e| FaultError::Encoding(e).into())
    }

    /// Loads the receiving actor's storage, if it has written any
    pub fn state<S: DeserializeOwned>(&self) -> Result<Option<S>, VmError> {
        let head = match self.to.head {
            Some(head) => head,
            None => return Ok(None),
        };

        match self.tree.store().get_cbor::<S>(&head) {
            Ok(Some(state)) => Ok(Some(state)),
            Ok(None) => Err(storage_fault("actor head missing", StateTreeError::MissingState(head))),
            Err(e) => Err(storage_fault("could not read actor storage", e.into())),
        }
    }

    /// Replaces the receiving actor's storage, persisting the new head immediately
    pub fn set_state<S: Serialize>(&mut self, state: &S) -> Result<Cid, VmError> {
        let head = self
            .tree
            .store()
            .put_cbor(state, Code::Blake2b256)
            .map_err(|e| storage_fault("could not write actor storage", e.into()))?;

        self.to.head = Some(head);
        let address = self.to_address();
        self.tree.set_actor(&address, &self.to).map_err(|source| FaultError::SetActor {
            side: Side::To,
            address,
            source,
        })?;
        self.reload()?;

        Ok(head)
    }

    /// Sends a nested message from the receiving actor
    ///
    /// The outcome of the nested call is returned to the caller with its tag intact; the caller
    /// decides whether to propagate it.
    pub fn send(
        &mut self,
        to: Address,
        method: &str,
        value: Option<TokenAmount>,
        params: RawBytes,
    ) -> SendResult {
        let message =
            Message { from: self.to_address(), to, method: method.to_string(), value, params };

        let from = self.tree.get_actor(&message.from).map_err(|source| FaultError::GetActor {
            side: Side::From,
            address: message.from,
            source,
        })?;
        let to = self.tree.get_actor(&message.to).map_err(|source| FaultError::GetActor {
            side: Side::To,
            address: message.to,
            source,
        })?;

        let result = send_with(self.transfer, from, to, &message, &mut *self.tree).into_result();
        self.reload()?;
        result
    }

    /// Refreshes the held actor records from the tree
    fn reload(&mut self) -> Result<(), VmError> {
        let (from, to) = (self.from_address(), self.to_address());
        self.from = self.tree.get_actor(&from).map_err(|source| FaultError::GetActor {
            side: Side::From,
            address: from,
            source,
        })?;
        self.to = self.tree.get_actor(&to).map_err(|source| FaultError::GetActor {
            side: Side::To,
            address: to,
            source,
        })?;
        Ok(())
    }
}

fn storage_fault(context: &'static str, source: StateTreeError) -> VmError {
    FaultError::Storage { context, source }.into()
}
