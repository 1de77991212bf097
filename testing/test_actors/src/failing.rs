use fil_vm::{ExportTable, SendResult, StateTree, VmContext, VmError};

pub fn exports<ST: StateTree>() -> ExportTable<ST> {
    ExportTable::new().with("Revert", revert::<ST>).with("Fault", fault::<ST>)
}

fn revert<ST: StateTree>(_ctx: &mut VmContext<'_, ST>) -> SendResult {
    Err(VmError::revert("requested revert"))
}

fn fault<ST: StateTree>(_ctx: &mut VmContext<'_, ST>) -> SendResult {
    Err(VmError::fault("requested fault", "index corrupted"))
}
