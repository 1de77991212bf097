use fil_vm::{ExportTable, SendResult, StateTree, VmContext};
use fvm_ipld_encoding::tuple::*;
use fvm_ipld_encoding::RawBytes;
use fvm_shared::address::Address;
use fvm_shared::econ::TokenAmount;

/// Instructs the forwarder to send a message of its own
#[derive(Serialize_tuple, Deserialize_tuple, Clone, Debug, PartialEq, Eq)]
pub struct ForwardParams {
    pub to: Address,
    pub method: String,
    pub value: TokenAmount,
    pub params: RawBytes,
}

#[derive(Serialize_tuple, Deserialize_tuple, Clone, Debug, PartialEq, Eq)]
pub struct ForwardReturn {
    /// Whatever the nested call returned
    pub return_data: RawBytes,
    /// The forwarder's balance once the nested call completed
    pub balance: TokenAmount,
}

pub fn exports<ST: StateTree>() -> ExportTable<ST> {
    ExportTable::new().with("Forward", forward::<ST>).with("TrySend", try_send::<ST>)
}

/// Sends the nested message and propagates its error unchanged
fn forward<ST: StateTree>(ctx: &mut VmContext<'_, ST>) -> SendResult {
    let params: ForwardParams = ctx.params()?;
    let return_data = ctx.send(params.to, &params.method, Some(params.value), params.params)?;
    ctx.encode_return(&ForwardReturn { return_data, balance: ctx.to().balance() })
}

/// Sends the nested message and reports its exit code instead of failing
fn try_send<ST: StateTree>(ctx: &mut VmContext<'_, ST>) -> SendResult {
    let params: ForwardParams = ctx.params()?;
    let exit_code = match ctx.send(params.to, &params.method, Some(params.value), params.params) {
        Ok(_) => fil_vm::EXIT_OK,
        Err(e) if e.should_revert() => e.exit_code(),
        // faults are never swallowed
        Err(e) => return Err(e),
    };
    ctx.encode_return(&exit_code)
}
