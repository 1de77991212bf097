use std::cell::RefCell;
use std::rc::Rc;

use anyhow::anyhow;
use cid::Cid;
use fvm_shared::address::Address;

use crate::actor::Actor;
use crate::builtin::{BuiltinActors, Executable};
use crate::state_tree::{StateTree, StateTreeError};

/// A state tree wrapper that can be twiddled to fail, for exercising fault handling
///
/// Every call that reaches the wrapper is recorded, so tests can assert that nothing happened
/// after a failure.
#[derive(Debug)]
pub struct FaultyStateTree<ST> {
    pub inner: ST,
    /// Code resolved by this wrapper; executables see the wrapper, not the inner tree
    pub builtins: BuiltinActors<Self>,
    /// `set_actor` fails for this address
    pub fail_set_actor: Option<Address>,
    /// `get_actor` fails for this address
    pub fail_get_actor: Option<Address>,
    /// Every code lookup fails
    pub fail_code_lookup: bool,

    /// Addresses written via `set_actor`, in order, including failed writes
    pub writes: Vec<Address>,
    /// Code references looked up via `builtin_actor_code`
    pub code_lookups: RefCell<Vec<Cid>>,
}

impl<ST> FaultyStateTree<ST> {
    pub fn new(inner: ST) -> Self {
        Self {
            inner,
            builtins: BuiltinActors::default(),
            fail_set_actor: None,
            fail_get_actor: None,
            fail_code_lookup: false,
            writes: Vec::new(),
            code_lookups: RefCell::new(Vec::new()),
        }
    }
}

impl<ST: StateTree> StateTree for FaultyStateTree<ST> {
    type Store = ST::Store;

    fn get_actor(&self, address: &Address) -> Result<Actor, StateTreeError> {
        if self.fail_get_actor == Some(*address) {
            return Err(anyhow!("injected read failure for {}", address).into());
        }
        self.inner.get_actor(address)
    }

    fn set_actor(&mut self, address: &Address, actor: &Actor) -> Result<(), StateTreeError> {
        self.writes.push(*address);
        if self.fail_set_actor == Some(*address) {
            return Err(anyhow!("injected write failure for {}", address).into());
        }
        self.inner.set_actor(address, actor)
    }

    fn builtin_actor_code(&self, code: &Cid) -> Result<Rc<dyn Executable<Self>>, StateTreeError> {
        self.code_lookups.borrow_mut().push(*code);
        if self.fail_code_lookup {
            return Err(StateTreeError::MissingCode(*code));
        }
        self.builtins.resolve(code)
    }

    fn store(&self) -> &ST::Store {
        self.inner.store()
    }
}
