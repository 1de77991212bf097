use std::fmt;
use std::rc::Rc;

use cid::Cid;
use fvm_ipld_blockstore::Blockstore;
use fvm_ipld_hamt::{BytesKey, Error as HamtError, Hamt};
use fvm_shared::address::Address;
use fvm_shared::econ::TokenAmount;
use num_traits::Zero;
use thiserror::Error;

use crate::actor::Actor;
use crate::builtin::{BuiltinActors, Executable};

/// Bit-width of the actor HAMT when none is specified.
pub const DEFAULT_HAMT_BIT_WIDTH: u32 = 5;

#[derive(Error, Debug)]
pub enum StateTreeError {
    #[error("actor not found: {0}")]
    ActorNotFound(Address),
    #[error("no builtin actor code for {0}")]
    MissingCode(Cid),
    #[error("missing state at cid: {0}")]
    MissingState(Cid),
    #[error("ipld hamt error: {0}")]
    Hamt(#[from] HamtError),
    #[error(transparent)]
    Blockstore(#[from] anyhow::Error),
}

/// The durable, addressable store of every actor record
///
/// Every error returned here is an infrastructure failure from the point of view of the VM and is
/// surfaced as a fault.
pub trait StateTree: Sized {
    type Store: Blockstore;

    fn get_actor(&self, address: &Address) -> Result<Actor, StateTreeError>;

    fn set_actor(&mut self, address: &Address, actor: &Actor) -> Result<(), StateTreeError>;

    /// Resolves an actor's code reference to the executable servicing it
    fn builtin_actor_code(&self, code: &Cid) -> Result<Rc<dyn Executable<Self>>, StateTreeError>;

    /// The blockstore holding actor storage
    fn store(&self) -> &Self::Store;
}

type ActorMap<'bs, BS> = Hamt<&'bs BS, Actor, BytesKey>;

/// A state tree keeping actors in a HAMT keyed by address bytes
///
/// Each write flushes the HAMT, so [`HamtStateTree::root`] is always a snapshot that can later be
/// restored with [`HamtStateTree::revert_to`].
pub struct HamtStateTree<BS: Blockstore> {
    store: BS,
    root: Cid,
    hamt_bit_width: u32,
    builtins: BuiltinActors<Self>,
}

impl<BS: Blockstore> HamtStateTree<BS> {
    /// Create an empty state tree, flushing the empty actor map to the blockstore
    pub fn new(store: BS) -> Result<Self, StateTreeError> {
        Self::new_with_bit_width(store, DEFAULT_HAMT_BIT_WIDTH)
    }

    /// Create an empty state tree with an explicit HAMT bit-width
    ///
    /// Caller must ensure 1 <= hamt_bit_width <= 8.
    pub fn new_with_bit_width(store: BS, hamt_bit_width: u32) -> Result<Self, StateTreeError> {
        let root = ActorMap::new_with_bit_width(&store, hamt_bit_width).flush()?;
        Ok(Self { store, root, hamt_bit_width, builtins: BuiltinActors::default() })
    }

    /// The current state root
    pub fn root(&self) -> Cid {
        self.root
    }

    /// Restores an earlier state root, discarding every write made since
    ///
    /// The root must be an actor map. Any other block in the store (an actor's storage head, for
    /// example) is refused and the current root is kept.
    pub fn revert_to(&mut self, root: Cid) -> Result<(), StateTreeError> {
        if !self.store.has(&root)? {
            return Err(StateTreeError::MissingState(root));
        }
        ActorMap::load_with_bit_width(&root, &self.store, self.hamt_bit_width)?;
        self.root = root;
        Ok(())
    }

    /// Sums the balances of every actor in the tree
    ///
    /// This involves iterating through the entire HAMT
    pub fn total_balance(&self) -> Result<TokenAmount, StateTreeError> {
        let mut total = TokenAmount::zero();
        self.actor_map()?.for_each(|_, actor| {
            total = &total + &actor.balance();
            Ok(())
        })?;
        Ok(total)
    }

    pub fn builtins_mut(&mut self) -> &mut BuiltinActors<Self> {
        &mut self.builtins
    }

    fn actor_map(&self) -> Result<ActorMap<'_, BS>, StateTreeError> {
        Ok(ActorMap::load_with_bit_width(&self.root, &self.store, self.hamt_bit_width)?)
    }
}

impl<BS: Blockstore> StateTree for HamtStateTree<BS> {
    type Store = BS;

    fn get_actor(&self, address: &Address) -> Result<Actor, StateTreeError> {
        self.actor_map()?
            .get(&address_key(address))?
            .cloned()
            .ok_or(StateTreeError::ActorNotFound(*address))
    }

    fn set_actor(&mut self, address: &Address, actor: &Actor) -> Result<(), StateTreeError> {
        let mut actors = self.actor_map()?;
        actors.set(address_key(address), actor.clone())?;
        let root = actors.flush()?;
        self.root = root;
        Ok(())
    }

    fn builtin_actor_code(&self, code: &Cid) -> Result<Rc<dyn Executable<Self>>, StateTreeError> {
        self.builtins.resolve(code)
    }

    fn store(&self) -> &BS {
        &self.store
    }
}

impl<BS: Blockstore> fmt::Debug for HamtStateTree<BS> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HamtStateTree")
            .field("root", &self.root)
            .field("hamt_bit_width", &self.hamt_bit_width)
            .field("builtins", &self.builtins)
            .finish()
    }
}

pub fn address_key(address: &Address) -> BytesKey {
    BytesKey(address.to_bytes())
}
