use fil_vm::{ExportTable, SendResult, StateTree, VmContext, VmError};
use fvm_ipld_encoding::tuple::*;

#[derive(Serialize_tuple, Deserialize_tuple, Clone, Debug, Default, PartialEq, Eq)]
pub struct CounterState {
    pub count: u64,
}

pub fn exports<ST: StateTree>() -> ExportTable<ST> {
    ExportTable::new()
        .with("Increment", increment::<ST>)
        .with("IncrementBy", increment_by::<ST>)
        .with("Get", get::<ST>)
        .with("Balance", balance::<ST>)
}

fn increment<ST: StateTree>(ctx: &mut VmContext<'_, ST>) -> SendResult {
    add(ctx, 1)
}

/// Takes the increment as a CBOR-encoded u64
fn increment_by<ST: StateTree>(ctx: &mut VmContext<'_, ST>) -> SendResult {
    let delta: u64 = ctx.params()?;
    add(ctx, delta)
}

fn get<ST: StateTree>(ctx: &mut VmContext<'_, ST>) -> SendResult {
    let state = ctx.state::<CounterState>()?.unwrap_or_default();
    ctx.encode_return(&state.count)
}

/// Reports the balance the counter observes while running
fn balance<ST: StateTree>(ctx: &mut VmContext<'_, ST>) -> SendResult {
    ctx.encode_return(&ctx.to().balance())
}

fn add<ST: StateTree>(ctx: &mut VmContext<'_, ST>, delta: u64) -> SendResult {
    let mut state = ctx.state::<CounterState>()?.unwrap_or_default();
    state.count = state
        .count
        .checked_add(delta)
        .ok_or_else(|| VmError::revert(format!("counter overflow adding {delta}")))?;
    ctx.set_state(&state)?;
    ctx.encode_return(&state.count)
}
