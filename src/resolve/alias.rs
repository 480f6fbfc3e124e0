//! Names bound to the same callable.
//!
//! A call site may use any alias of the function being resolved (`pvar`
//! for `print_var`, say), so the locator searches for all of them.

use std::collections::BTreeSet;

use rustc_hash::FxHashMap;

/// Identity of a callable, shared by all of its aliases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CallableId(pub u32);

pub type AliasSet = BTreeSet<String>;

/// Fallback renames applied to the callee name, for aliases that are not
/// discoverable from a namespace.
const DERIVED_ALIASES: &[(&str, &str)] = &[("print_var", "pvar")];

/// Name → callable bindings of one module.
#[derive(Debug, Clone, Default)]
pub struct Namespace {
    members: Vec<(String, CallableId)>,
    next_id: u32,
}

impl Namespace {
    pub fn new() -> Self {
        Namespace::default()
    }

    /// Bind `name` to a new callable and return its identity.
    pub fn define(&mut self, name: &str) -> CallableId {
        let id = CallableId(self.next_id);
        self.next_id += 1;
        self.bind(name, id);
        id
    }

    /// Bind `alias` to whatever `target` is bound to. Returns `None` when
    /// `target` is unknown.
    pub fn alias(&mut self, alias: &str, target: &str) -> Option<CallableId> {
        let id = self.get(target)?;
        self.bind(alias, id);
        Some(id)
    }

    /// Bind `name` to `id`, replacing any earlier binding of `name`.
    pub fn bind(&mut self, name: &str, id: CallableId) {
        self.members.retain(|(n, _)| n != name);
        self.members.push((name.to_string(), id));
        self.next_id = self.next_id.max(id.0 + 1);
    }

    pub fn get(&self, name: &str) -> Option<CallableId> {
        self.members.iter().find(|(n, _)| n == name).map(|(_, id)| *id)
    }

    /// Members in binding order.
    pub fn members(&self) -> impl Iterator<Item = (&str, CallableId)> {
        self.members.iter().map(|(n, id)| (n.as_str(), *id))
    }

    /// Import every binding of `other`, as a glob import would. Identities
    /// are offset so they cannot collide with this namespace's own.
    pub fn import_all(&mut self, other: &Namespace) {
        let base = self.next_id;
        for (name, id) in other.members() {
            self.bind(name, CallableId(base + id.0));
        }
    }
}

/// Namespaces by module name.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    modules: FxHashMap<String, Namespace>,
}

impl Registry {
    pub fn new() -> Self {
        Registry::default()
    }

    pub fn insert(&mut self, module: impl Into<String>, ns: Namespace) {
        self.modules.insert(module.into(), ns);
    }

    pub fn get(&self, module: &str) -> Option<&Namespace> {
        self.modules.get(module)
    }

    pub fn get_mut(&mut self, module: &str) -> Option<&mut Namespace> {
        self.modules.get_mut(module)
    }
}

/// All names in `ns` bound to the same callable as `called`, plus `called`
/// itself and its derived renames.
///
/// When `ns` is missing or does not bind `called` (member tables can be
/// incomplete during teardown), the set degrades to `called` and its
/// derived renames.
pub fn aliases(ns: Option<&Namespace>, called: &str) -> AliasSet {
    let mut set = AliasSet::new();
    set.insert(called.to_string());

    match ns.and_then(|ns| ns.get(called).map(|id| (ns, id))) {
        Some((ns, id)) => {
            for (name, member) in ns.members() {
                if member == id {
                    set.insert(name.to_string());
                }
            }
        }
        None => {
            tracing::debug!(called, "callee not found in namespace; using its own name");
        }
    }

    for (from, to) in DERIVED_ALIASES {
        set.insert(called.replace(from, to));
    }
    set
}

/// Regex alternation matching any of `aliases`.
pub fn alternation(aliases: &AliasSet) -> String {
    aliases
        .iter()
        .map(|a| regex::escape(a))
        .collect::<Vec<_>>()
        .join("|")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(names: &[&str]) -> AliasSet {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn finds_every_binding_of_the_same_callable() {
        let mut ns = Namespace::new();
        ns.define("helper");
        ns.define("show");
        ns.alias("sh", "show");
        ns.alias("display", "show");
        assert_eq!(aliases(Some(&ns), "sh"), set(&["display", "sh", "show"]));
    }

    #[test]
    fn unknown_callee_degrades_to_own_name() {
        let ns = Namespace::new();
        assert_eq!(aliases(Some(&ns), "show"), set(&["show"]));
        assert_eq!(aliases(None, "show"), set(&["show"]));
    }

    #[test]
    fn derived_abbreviation_is_always_added() {
        assert_eq!(aliases(None, "qprint_var"), set(&["qprint_var", "qpvar"]));
    }

    #[test]
    fn rebinding_moves_a_name() {
        let mut ns = Namespace::new();
        let a = ns.define("a");
        let b = ns.define("b");
        ns.bind("c", a);
        ns.bind("c", b);
        assert_eq!(ns.get("c"), Some(b));
        assert_eq!(aliases(Some(&ns), "a"), set(&["a"]));
    }

    #[test]
    fn import_all_keeps_alias_groups() {
        let mut lib = Namespace::new();
        lib.define("print_time");
        lib.alias("ptime", "print_time");
        let mut user = Namespace::new();
        user.define("main");
        user.import_all(&lib);
        assert_eq!(user.get("print_time"), user.get("ptime"));
        assert_ne!(user.get("main"), user.get("ptime"));
    }

    #[test]
    fn alternation_escapes_names() {
        assert_eq!(alternation(&set(&["a.b", "c"])), r"a\.b|c");
    }
}
