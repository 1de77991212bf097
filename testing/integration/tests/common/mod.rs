use cid::Cid;
use fil_vm::fake_state_tree::FaultyStateTree;
use fil_vm::{send, Actor, HamtStateTree, Message, SendOutcome, StateTree};
use fvm_ipld_blockstore::MemoryBlockstore;
use fvm_ipld_encoding::RawBytes;
use fvm_shared::address::Address;
use fvm_shared::econ::TokenAmount;

pub type Tree = HamtStateTree<MemoryBlockstore>;

/// Helper routines to simplify common operations against a state tree
pub trait TestHelpers {
    /// Call a method on an actor, loading both actors from the tree first
    fn call_method(
        &mut self,
        from: Address,
        to: Address,
        method: &str,
        value: Option<TokenAmount>,
        params: RawBytes,
    ) -> SendOutcome;

    /// Call a method on an actor and assert a successful result
    fn call_method_ok(
        &mut self,
        from: Address,
        to: Address,
        method: &str,
        value: Option<TokenAmount>,
        params: RawBytes,
    ) -> RawBytes;

    /// Install an actor with the given code and balance at an ID address
    fn install_actor(&mut self, code: Cid, actor_id: u64, balance: TokenAmount) -> Address;

    fn balance_of(&self, address: &Address) -> TokenAmount;
}

impl<ST: StateTree> TestHelpers for ST {
    fn call_method(
        &mut self,
        from: Address,
        to: Address,
        method: &str,
        value: Option<TokenAmount>,
        params: RawBytes,
    ) -> SendOutcome {
        let message = Message { from, to, method: method.to_string(), value, params };
        let from_actor = self.get_actor(&from).unwrap();
        let to_actor = self.get_actor(&to).unwrap();
        send(from_actor, to_actor, &message, self)
    }

    fn call_method_ok(
        &mut self,
        from: Address,
        to: Address,
        method: &str,
        value: Option<TokenAmount>,
        params: RawBytes,
    ) -> RawBytes {
        let outcome = self.call_method(from, to, method, value, params);
        assert!(outcome.is_ok(), "call failed: {outcome:#?}");
        outcome.return_data
    }

    fn install_actor(&mut self, code: Cid, actor_id: u64, balance: TokenAmount) -> Address {
        let address = Address::new_id(actor_id);
        self.set_actor(&address, &Actor::with_balance(code, balance)).unwrap();
        address
    }

    fn balance_of(&self, address: &Address) -> TokenAmount {
        self.get_actor(address).unwrap().balance()
    }
}

/// Construct an empty tree with every test actor registered
#[allow(dead_code)]
pub fn construct_tree() -> Tree {
    let mut tree = HamtStateTree::new(MemoryBlockstore::new()).unwrap();
    fil_vm_test_actors::install(tree.builtins_mut());
    tree
}

/// Construct a fault-injecting tree with every test actor registered
#[allow(dead_code)]
pub fn construct_faulty_tree() -> FaultyStateTree<Tree> {
    let mut tree = FaultyStateTree::new(HamtStateTree::new(MemoryBlockstore::new()).unwrap());
    fil_vm_test_actors::install(&mut tree.builtins);
    tree
}
