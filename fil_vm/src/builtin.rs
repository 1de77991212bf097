use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::rc::Rc;

use cid::Cid;

use crate::context::VmContext;
use crate::send::SendResult;
use crate::state_tree::StateTreeError;

/// The method names an executable can service
pub type Exports = BTreeSet<String>;

/// An exported actor method, run against the context of the message that invoked it
pub type ExportedMethod<ST> = fn(&mut VmContext<'_, ST>) -> SendResult;

/// The resolved, callable form of an actor's code
pub trait Executable<ST> {
    fn exports(&self) -> Exports;

    /// Looks up the method servicing `name`
    fn method(&self, name: &str) -> Option<ExportedMethod<ST>>;
}

/// A fixed table of exported methods keyed by name
pub struct ExportTable<ST> {
    methods: BTreeMap<&'static str, ExportedMethod<ST>>,
}

impl<ST> ExportTable<ST> {
    pub fn new() -> Self {
        Self { methods: BTreeMap::new() }
    }

    /// Adds an export, replacing any existing method of the same name
    pub fn with(mut self, name: &'static str, method: ExportedMethod<ST>) -> Self {
        self.methods.insert(name, method);
        self
    }
}

impl<ST> Default for ExportTable<ST> {
    fn default() -> Self {
        Self::new()
    }
}

impl<ST> Executable<ST> for ExportTable<ST> {
    fn exports(&self) -> Exports {
        self.methods.keys().map(|name| name.to_string()).collect()
    }

    fn method(&self, name: &str) -> Option<ExportedMethod<ST>> {
        self.methods.get(name).copied()
    }
}

/// Maps code references to the built-in executables that implement them
pub struct BuiltinActors<ST> {
    code: HashMap<Cid, Rc<dyn Executable<ST>>>,
}

impl<ST> BuiltinActors<ST> {
    /// Installs `executable` as the code for `code`, returning any executable it replaces
    pub fn register<E>(&mut self, code: Cid, executable: E) -> Option<Rc<dyn Executable<ST>>>
    where
        E: Executable<ST> + 'static,
    {
        self.code.insert(code, Rc::new(executable))
    }

    /// Missing code is an infrastructure problem, never a user error
    pub fn resolve(&self, code: &Cid) -> Result<Rc<dyn Executable<ST>>, StateTreeError> {
        self.code.get(code).cloned().ok_or(StateTreeError::MissingCode(*code))
    }

    pub fn contains(&self, code: &Cid) -> bool {
        self.code.contains_key(code)
    }
}

impl<ST> Default for BuiltinActors<ST> {
    fn default() -> Self {
        Self { code: HashMap::new() }
    }
}

impl<ST> fmt::Debug for BuiltinActors<ST> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.code.keys()).finish()
    }
}
