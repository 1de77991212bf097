use fvm_ipld_encoding::RawBytes;
use fvm_shared::address::Address;
use fvm_shared::econ::TokenAmount;
use serde::Serialize;

/// A message passed from one actor to another
///
/// An empty `method` means the message is a pure value transfer and nothing is dispatched. An
/// absent `value` means no transfer was requested.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Message {
    pub from: Address,
    pub to: Address,
    pub method: String,
    pub value: Option<TokenAmount>,
    /// CBOR-encoded method parameters
    pub params: RawBytes,
}

impl Message {
    /// A pure value transfer
    pub fn transfer(from: Address, to: Address, value: TokenAmount) -> Self {
        Self { from, to, method: String::new(), value: Some(value), params: RawBytes::default() }
    }

    /// A method call carrying no value
    pub fn call(from: Address, to: Address, method: impl Into<String>) -> Self {
        Self { from, to, method: method.into(), value: None, params: RawBytes::default() }
    }

    pub fn with_value(mut self, value: TokenAmount) -> Self {
        self.value = Some(value);
        self
    }

    /// Encodes `params` as the message parameters
    pub fn with_params<P: Serialize>(
        mut self,
        params: &P,
    ) -> Result<Self, fvm_ipld_encoding::Error> {
        self.params = RawBytes::serialize(params)?;
        Ok(self)
    }

    /// True if the message only moves value and dispatches nothing
    pub fn is_transfer_only(&self) -> bool {
        self.method.is_empty()
    }
}
