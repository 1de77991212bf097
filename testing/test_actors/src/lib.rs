//! Small built-in actors for driving the VM boundary in tests
//!
//! Every actor is generic over the state tree so it can be installed into a plain
//! [`fil_vm::HamtStateTree`] or a [`fil_vm::fake_state_tree::FaultyStateTree`] wrapping one.

use cid::multihash::{Code, MultihashDigest};
use cid::Cid;
use fil_vm::{BuiltinActors, ExportTable, StateTree};
use fvm_ipld_encoding::IPLD_RAW;

pub mod counter;
pub mod failing;
pub mod forwarder;

/// Derives a stable code reference from an actor's name
pub fn code_cid(name: &str) -> Cid {
    Cid::new_v1(IPLD_RAW, Code::Blake2b256.digest(name.as_bytes()))
}

pub fn account_code() -> Cid {
    code_cid("fil/test/account")
}

pub fn counter_code() -> Cid {
    code_cid("fil/test/counter")
}

pub fn forwarder_code() -> Cid {
    code_cid("fil/test/forwarder")
}

pub fn failing_code() -> Cid {
    code_cid("fil/test/failing")
}

/// Registers every test actor with the given registry
///
/// The account actor exports nothing, so it can only receive plain value transfers.
pub fn install<ST: StateTree + 'static>(builtins: &mut BuiltinActors<ST>) {
    builtins.register(account_code(), ExportTable::<ST>::new());
    builtins.register(counter_code(), counter::exports::<ST>());
    builtins.register(forwarder_code(), forwarder::exports::<ST>());
    builtins.register(failing_code(), failing::exports::<ST>());
}

