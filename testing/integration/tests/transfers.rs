use fil_vm::{Actor, RevertError, StateTree, TransferError, VmError, EXIT_FAILED, EXIT_OK};
use fil_vm_test_actors::{account_code, counter_code};
use fvm_ipld_encoding::RawBytes;
use fvm_shared::address::Address;
use fvm_shared::bigint::Zero;
use fvm_shared::econ::TokenAmount;

mod common;
use common::{construct_tree, TestHelpers};

#[test]
fn it_transfers_value_between_accounts() {
    let mut tree = construct_tree();
    let alice = tree.install_actor(account_code(), 100, TokenAmount::from_atto(100));
    let bob = tree.install_actor(account_code(), 101, TokenAmount::zero());

    let outcome =
        tree.call_method(alice, bob, "", Some(TokenAmount::from_atto(30)), RawBytes::default());

    assert!(outcome.error.is_none());
    assert_eq!(outcome.exit_code, EXIT_OK);
    assert_eq!(outcome.return_data, RawBytes::default());
    assert_eq!(tree.balance_of(&alice), TokenAmount::from_atto(70));
    assert_eq!(tree.balance_of(&bob), TokenAmount::from_atto(30));
}

#[test]
fn it_conserves_supply_across_many_transfers() {
    let mut tree = construct_tree();
    let accounts: Vec<_> = (0..5)
        .map(|i| tree.install_actor(account_code(), 100 + i, TokenAmount::from_atto(50)))
        .collect();
    let supply = tree.total_balance().unwrap();

    for (i, amount) in [10, 60, 0, 25, -3, 49, 51, 7].into_iter().enumerate() {
        let from = accounts[i % accounts.len()];
        let to = accounts[(i + 2) % accounts.len()];
        let outcome =
            tree.call_method(from, to, "", Some(TokenAmount::from_atto(amount)), RawBytes::default());
        if let Some(error) = outcome.error {
            assert!(error.should_revert(), "transfers must only ever revert: {error}");
        }
        assert_eq!(tree.total_balance().unwrap(), supply);
    }
}

#[test]
fn it_rejects_overdrawn_transfers_without_changing_balances() {
    let mut tree = construct_tree();
    let alice = tree.install_actor(account_code(), 100, TokenAmount::from_atto(10));
    let bob = tree.install_actor(account_code(), 101, TokenAmount::from_atto(5));
    let root = tree.root();

    let outcome =
        tree.call_method(alice, bob, "", Some(TokenAmount::from_atto(11)), RawBytes::default());

    assert_eq!(outcome.exit_code, EXIT_FAILED);
    assert!(matches!(
        outcome.error,
        Some(VmError::Revert(RevertError::Transfer(TransferError::InsufficientBalance { .. })))
    ));
    assert_eq!(tree.root(), root);
    assert_eq!(tree.balance_of(&alice), TokenAmount::from_atto(10));
    assert_eq!(tree.balance_of(&bob), TokenAmount::from_atto(5));
}

#[test]
fn it_rejects_negative_transfers() {
    let mut tree = construct_tree();
    let alice = tree.install_actor(account_code(), 100, TokenAmount::from_atto(10));
    let bob = tree.install_actor(account_code(), 101, TokenAmount::from_atto(5));

    // a negative send would otherwise pull funds from bob
    let outcome =
        tree.call_method(alice, bob, "", Some(TokenAmount::from_atto(-5)), RawBytes::default());

    assert!(matches!(
        outcome.error,
        Some(VmError::Revert(RevertError::Transfer(TransferError::NegativeValue(_))))
    ));
    assert_eq!(tree.balance_of(&alice), TokenAmount::from_atto(10));
    assert_eq!(tree.balance_of(&bob), TokenAmount::from_atto(5));
}

#[test]
fn it_credits_an_absent_balance_with_exactly_the_amount() {
    let mut tree = construct_tree();
    let alice = tree.install_actor(account_code(), 100, TokenAmount::from_atto(100));
    let bob = Address::new_id(101);
    tree.set_actor(&bob, &Actor::new(account_code())).unwrap();

    tree.call_method_ok(alice, bob, "", Some(TokenAmount::from_atto(1)), RawBytes::default());

    assert_eq!(tree.get_actor(&bob).unwrap().balance, Some(TokenAmount::from_atto(1)));
}

#[test]
fn it_keeps_the_transfer_when_the_export_is_missing() {
    let mut tree = construct_tree();
    let alice = tree.install_actor(account_code(), 100, TokenAmount::from_atto(100));
    let counter = tree.install_actor(counter_code(), 101, TokenAmount::zero());
    let before = tree.root();

    let outcome = tree.call_method(
        alice,
        counter,
        "Decrement",
        Some(TokenAmount::from_atto(40)),
        RawBytes::default(),
    );

    assert_eq!(outcome.exit_code, EXIT_FAILED);
    let error = outcome.error.unwrap();
    assert!(error.should_revert());
    assert_eq!(error.to_string(), "missing export: Decrement");
    assert_eq!(tree.balance_of(&alice), TokenAmount::from_atto(60));
    assert_eq!(tree.balance_of(&counter), TokenAmount::from_atto(40));

    // the caller may still discard the whole transition
    tree.revert_to(before).unwrap();
    assert_eq!(tree.balance_of(&alice), TokenAmount::from_atto(100));
    assert_eq!(tree.balance_of(&counter), TokenAmount::zero());
}

#[test]
fn it_validates_self_sends_without_minting() {
    let mut tree = construct_tree();
    let alice = tree.install_actor(account_code(), 100, TokenAmount::from_atto(100));

    tree.call_method_ok(alice, alice, "", Some(TokenAmount::from_atto(100)), RawBytes::default());
    assert_eq!(tree.balance_of(&alice), TokenAmount::from_atto(100));

    let outcome =
        tree.call_method(alice, alice, "", Some(TokenAmount::from_atto(-1)), RawBytes::default());
    assert!(outcome.error.unwrap().should_revert());
    assert_eq!(tree.balance_of(&alice), TokenAmount::from_atto(100));
}

#[test]
fn it_dispatches_without_value() {
    let mut tree = construct_tree();
    let alice = tree.install_actor(account_code(), 100, TokenAmount::zero());

    // an account exports nothing, so calling any method on it reverts
    let outcome = tree.call_method(alice, alice, "Constructor", None, RawBytes::default());
    assert_eq!(outcome.exit_code, EXIT_FAILED);
    assert!(outcome.error.unwrap().should_revert());
}
