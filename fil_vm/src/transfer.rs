use fvm_shared::econ::TokenAmount;
use thiserror::Error;
use tracing::trace;

use crate::actor::Actor;

#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum TransferError {
    #[error("cannot transfer negative value {0:?}")]
    NegativeValue(TokenAmount),
    #[error("not enough balance: {balance:?} is less than {amount:?}")]
    InsufficientBalance { balance: TokenAmount, amount: TokenAmount },
}

/// Moves value between two actor records
///
/// Implementations only touch the two records they are given; persisting them is the caller's
/// job. Either both balances change or neither does.
pub trait Transfer {
    fn transfer(
        &self,
        from: &mut Actor,
        to: &mut Actor,
        amount: &TokenAmount,
    ) -> Result<(), TransferError>;
}

/// The balance transfer applied by [`crate::send`]
#[derive(Debug, Default, Clone, Copy)]
pub struct BalanceTransfer;

impl Transfer for BalanceTransfer {
    fn transfer(
        &self,
        from: &mut Actor,
        to: &mut Actor,
        amount: &TokenAmount,
    ) -> Result<(), TransferError> {
        // send must never be usable to pull funds
        if amount.is_negative() {
            return Err(TransferError::NegativeValue(amount.clone()));
        }

        let debited = from.balance();
        if debited < *amount {
            return Err(TransferError::InsufficientBalance {
                balance: debited,
                amount: amount.clone(),
            });
        }

        let credited = to.balance();
        from.balance = Some(&debited - amount);
        to.balance = Some(&credited + amount);
        trace!(amount = ?amount, "transferred value");

        Ok(())
    }
}
