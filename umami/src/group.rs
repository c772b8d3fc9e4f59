//! Option tables, groups and the registry that owns them.

use crate::error::{Error, Result};
use crate::option::{HandlerId, Opt, ValueKind};
use crate::value::{FromValue, IntoValue};

/// Default number of top-level groups a registry accepts.
pub const MAX_OPTION_GROUPS: usize = 10;

/// Handle to a group owned by a [`Registry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GroupId(usize);

// ============================================================================
// OptionTable
// ============================================================================

#[derive(Debug)]
struct Entry {
    opt: Opt,
    parsed: bool,
}

/// Ordered option descriptors, each with its own "parsed" bit.
#[derive(Debug, Default)]
pub struct OptionTable {
    entries: Vec<Entry>,
}

impl OptionTable {
    pub fn new() -> Self {
        OptionTable {
            entries: Vec::new(),
        }
    }

    pub fn option(mut self, opt: Opt) -> Self {
        self.entries.push(Entry { opt, parsed: false });
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Opt> {
        self.entries.iter().map(|e| &e.opt)
    }

    pub fn get(&self, index: usize) -> Option<&Opt> {
        self.entries.get(index).map(|e| &e.opt)
    }

    /// Index of the first option called `name`.
    pub fn find(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.opt.name == name)
    }

    fn lookup(&self, name: &str) -> Result<&Opt> {
        self.get_named(name)
            .ok_or_else(|| Error::NotFound(name.to_string()))
    }

    fn get_named(&self, name: &str) -> Option<&Opt> {
        self.find(name).map(|i| &self.entries[i].opt)
    }

    pub(crate) fn is_parsed_at(&self, index: usize) -> bool {
        self.entries[index].parsed
    }

    pub(crate) fn mark_parsed_at(&mut self, index: usize) {
        self.entries[index].parsed = true;
    }

    /// False when the option was never matched or does not exist.
    pub fn is_parsed(&self, name: &str) -> bool {
        self.find(name).is_some_and(|i| self.entries[i].parsed)
    }

    pub fn set_parsed(&mut self, name: &str, state: bool) {
        if let Some(i) = self.find(name) {
            self.entries[i].parsed = state;
        }
    }

    pub fn set_all_parsed(&mut self, state: bool) {
        for entry in &mut self.entries {
            entry.parsed = state;
        }
    }

    pub fn all_parsed(&self) -> bool {
        self.entries.iter().all(|e| e.parsed)
    }

    /// Index of the first option without a destination.
    pub fn first_unbound(&self) -> Option<usize> {
        self.entries.iter().position(|e| e.opt.destination.is_none())
    }

    /// Whether every option of the table selects a handler.
    pub fn only_handlers(&self) -> bool {
        self.entries
            .iter()
            .all(|e| e.opt.kind == ValueKind::Function)
    }

    /// Whether the option's defined flag is set. Options without a defined
    /// flag, and unknown names, report false.
    pub fn is_defined(&self, name: &str) -> bool {
        self.get_named(name)
            .and_then(|opt| opt.defined.as_ref())
            .is_some_and(|flag| flag.get())
    }

    /// Set the option's defined flag. Returns false when the option has no
    /// defined flag (or does not exist).
    pub fn set_defined(&self, name: &str, state: bool) -> bool {
        match self.get_named(name).and_then(|opt| opt.defined.as_ref()) {
            Some(flag) => {
                flag.set(state);
                true
            }
            None => false,
        }
    }

    /// Read an option's destination by name.
    pub fn value<T: FromValue>(&self, name: &str) -> Result<T> {
        let opt = self.lookup(name)?;
        let value = opt
            .destination
            .as_ref()
            .and_then(|d| d.load())
            .ok_or_else(|| Error::NotFound(name.to_string()))?;
        T::from_value(&value)
    }

    /// Write an option's destination by name.
    pub fn set_value<V: IntoValue>(&self, name: &str, value: V) -> Result<()> {
        let opt = self.lookup(name)?;
        match &opt.destination {
            Some(dest) => dest.store(value.into_value()),
            None => Err(Error::NotFound(name.to_string())),
        }
    }

    /// Whether `other` describes the same options bound to the same cells.
    pub fn same_bindings(&self, other: &OptionTable) -> bool {
        self.len() == other.len()
            && self.iter().zip(other.iter()).all(|(a, b)| {
                a.name == b.name
                    && a.kind == b.kind
                    && match (&a.destination, &b.destination) {
                        (Some(x), Some(y)) => x.same_target(y),
                        (None, None) => true,
                        _ => false,
                    }
            })
    }

    fn handler_positions(&self, handler: HandlerId) -> impl Iterator<Item = usize> + '_ {
        self.entries
            .iter()
            .enumerate()
            .filter(move |(_, e)| e.opt.handler_id() == Some(handler))
            .map(|(i, _)| i)
    }
}

// ============================================================================
// OptionGroup
// ============================================================================

#[derive(Debug)]
pub struct OptionGroup {
    name: String,
    extended_help: Option<String>,
    table: OptionTable,
}

impl OptionGroup {
    pub fn new(name: &str, table: OptionTable) -> Self {
        OptionGroup {
            name: name.to_string(),
            extended_help: None,
            table,
        }
    }

    pub fn extended_help(mut self, text: &str) -> Self {
        self.extended_help = Some(text.to_string());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn help(&self) -> Option<&str> {
        self.extended_help.as_deref()
    }

    pub fn table(&self) -> &OptionTable {
        &self.table
    }

    pub fn table_mut(&mut self) -> &mut OptionTable {
        &mut self.table
    }
}

// ============================================================================
// Registry
// ============================================================================

/// What a call to [`Registry::register`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Registered {
    Added(GroupId),
    /// The same group (same name, options bound to the same cells) was
    /// already registered; nothing changed.
    Duplicate(GroupId),
    /// The group was attached to the handler option called `option`.
    Linked { group: GroupId, option: String },
}

impl Registered {
    pub fn id(&self) -> GroupId {
        match self {
            Registered::Added(id) | Registered::Duplicate(id) => *id,
            Registered::Linked { group, .. } => *group,
        }
    }
}

/// Bounded, insertion-ordered set of top-level groups, plus storage for the
/// groups linked to handler options.
#[derive(Debug)]
pub struct Registry {
    groups: Vec<OptionGroup>,
    order: Vec<GroupId>,
    capacity: usize,
}

impl Registry {
    pub fn new(capacity: usize) -> Self {
        Registry {
            groups: Vec::new(),
            order: Vec::new(),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of top-level groups.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Top-level groups in registration order.
    pub fn groups(&self) -> impl Iterator<Item = GroupId> + '_ {
        self.order.iter().copied()
    }

    pub fn group(&self, id: GroupId) -> &OptionGroup {
        &self.groups[id.0]
    }

    pub fn group_mut(&mut self, id: GroupId) -> &mut OptionGroup {
        &mut self.groups[id.0]
    }

    /// Any group, top-level or linked, by name.
    pub fn find(&self, name: &str) -> Option<GroupId> {
        self.groups
            .iter()
            .position(|g| g.name == name)
            .map(GroupId)
    }

    /// Register a top-level group, or link `group` to the handler options
    /// bound to `handler` (the first one in each registered group).
    pub fn register(
        &mut self,
        group: OptionGroup,
        handler: Option<HandlerId>,
    ) -> Result<Registered> {
        if self.order.len() >= self.capacity {
            return Err(Error::RegistryFull {
                group: group.name,
                capacity: self.capacity,
            });
        }

        for opt in group.table.iter() {
            opt.validate()?;
        }

        match handler {
            Some(handler) => {
                // First matching option of every group that carries one.
                let targets: Vec<(GroupId, usize)> = self
                    .order
                    .iter()
                    .filter_map(|&gid| {
                        self.groups[gid.0]
                            .table
                            .handler_positions(handler)
                            .next()
                            .map(|i| (gid, i))
                    })
                    .collect();
                let Some(&(owner, index)) = targets.first() else {
                    return Err(Error::UnresolvedHandler(handler));
                };

                let id = GroupId(self.groups.len());
                self.groups.push(group);
                for &(gid, i) in &targets {
                    self.groups[gid.0].table.entries[i].opt.linked = Some(id);
                }
                Ok(Registered::Linked {
                    group: id,
                    option: self.groups[owner.0].table.entries[index].opt.name.clone(),
                })
            }
            None => {
                if let Some(existing) = self
                    .order
                    .iter()
                    .copied()
                    .find(|id| self.groups[id.0].name == group.name)
                {
                    if !self.groups[existing.0].table.same_bindings(&group.table) {
                        return Err(Error::DuplicateGroup(group.name));
                    }
                    return Ok(Registered::Duplicate(existing));
                }
                let id = GroupId(self.groups.len());
                self.groups.push(group);
                self.order.push(id);
                Ok(Registered::Added(id))
            }
        }
    }

    /// The first top-level handler option bound to `handler`.
    pub fn find_handler(&self, handler: HandlerId) -> Option<(GroupId, usize)> {
        self.order.iter().find_map(|&gid| {
            self.groups[gid.0]
                .table
                .handler_positions(handler)
                .next()
                .map(|i| (gid, i))
        })
    }

    /// Read an option of `group` by name.
    pub fn get<T: FromValue>(&self, group: GroupId, name: &str) -> Result<T> {
        self.group(group).table.value(name)
    }

    /// Write an option of `group` by name.
    pub fn set<V: IntoValue>(&self, group: GroupId, name: &str, value: V) -> Result<()> {
        self.group(group).table.set_value(name, value)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Registry::new(MAX_OPTION_GROUPS)
    }
}
