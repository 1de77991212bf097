use cid::Cid;
use fvm_ipld_encoding::tuple::*;
use fvm_shared::econ::TokenAmount;

/// An account or contract record as stored in the state tree
///
/// A record is loaded by address at the start of a transition, moved into [`crate::send`] and
/// written back before any actor code runs. It is never cached across transitions.
#[derive(Serialize_tuple, Deserialize_tuple, PartialEq, Eq, Clone, Debug)]
pub struct Actor {
    /// Selects the built-in code that services messages sent to this actor
    pub code: Cid,
    /// Root of the actor's own storage, absent until the actor first writes state
    pub head: Option<Cid>,
    /// Balance held by the actor, absent meaning zero
    pub balance: Option<TokenAmount>,
}

impl Actor {
    /// Creates an actor with no storage and an absent balance
    pub fn new(code: Cid) -> Self {
        Self { code, head: None, balance: None }
    }

    /// Creates an actor holding an explicit balance
    pub fn with_balance(code: Cid, balance: TokenAmount) -> Self {
        Self { code, head: None, balance: Some(balance) }
    }

    /// Returns the balance, treating an absent balance as zero
    pub fn balance(&self) -> TokenAmount {
        self.balance.clone().unwrap_or_default()
    }
}
