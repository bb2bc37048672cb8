use crate::{Record, SqlType, normalize_label, underscore_name};
use parking_lot::RwLock;
use std::{
    any::TypeId,
    collections::HashMap,
    sync::{Arc, LazyLock},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Access {
    /// Directly assigned.
    Field,
    /// Read through a getter and written through a setter.
    Accessor,
}

/// Which capability a schema index selects members by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Rows into the type, needs writable members.
    Mapping,
    /// The type into parameters, needs readable members.
    Binding,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub name: &'static str,
    pub type_name: &'static str,
    pub sql_type: SqlType,
    pub access: Access,
    pub readable: bool,
    pub writable: bool,
}

impl Member {
    pub const fn field(name: &'static str, type_name: &'static str, sql_type: SqlType) -> Self {
        Self {
            name,
            type_name,
            sql_type,
            access: Access::Field,
            readable: true,
            writable: true,
        }
    }
    pub const fn accessor(
        name: &'static str,
        type_name: &'static str,
        sql_type: SqlType,
        readable: bool,
        writable: bool,
    ) -> Self {
        Self {
            name,
            type_name,
            sql_type,
            access: Access::Accessor,
            readable,
            writable,
        }
    }
    pub fn supports(&self, direction: Direction) -> bool {
        match direction {
            Direction::Mapping => self.writable,
            Direction::Binding => self.readable,
        }
    }
}

/// Normalized name to member lookup for one type and one direction.
#[derive(Debug)]
pub struct SchemaIndex {
    type_name: &'static str,
    members: &'static [Member],
    keys: HashMap<String, usize>,
}

impl SchemaIndex {
    pub fn build(type_name: &'static str, members: &'static [Member], direction: Direction) -> Self {
        let (fields, accessors): (Vec<_>, Vec<_>) = members
            .iter()
            .enumerate()
            .filter(|(_, m)| m.supports(direction))
            .partition(|(_, m)| m.access == Access::Field);
        let mut keys = HashMap::with_capacity(members.len() * 2);
        // Accessors come last so that they replace fields with the same key
        for (i, member) in fields.into_iter().chain(accessors) {
            let lowercase = member.name.to_lowercase();
            let underscore = underscore_name(member.name);
            let names = if lowercase == underscore {
                vec![lowercase]
            } else {
                vec![lowercase, underscore]
            };
            for name in names {
                match keys.insert(name.clone(), i) {
                    Some(previous) if previous != i => {
                        let previous = &members[previous];
                        if previous.access == member.access {
                            log::warn!(
                                "Members `{}` and `{}` of {} both answer to `{}`, the last one declared is used",
                                previous.name,
                                member.name,
                                type_name,
                                name,
                            );
                        } else {
                            log::trace!(
                                "Accessor `{}` of {} replaces field `{}` for `{}`",
                                member.name,
                                type_name,
                                previous.name,
                                name,
                            );
                        }
                    }
                    _ => {}
                }
            }
        }
        Self {
            type_name,
            members,
            keys,
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn members(&self) -> &'static [Member] {
        self.members
    }

    /// Member answering to a column label or parameter name. Whitespace is
    /// removed and the comparison ignores case.
    pub fn lookup(&self, name: &str) -> Option<(usize, &'static Member)> {
        let members = self.members;
        self.keys
            .get(&normalize_label(name))
            .map(|&i| (i, &members[i]))
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

static INDEXES: LazyLock<RwLock<HashMap<(TypeId, Direction), Arc<SchemaIndex>>>> =
    LazyLock::new(Default::default);

/// Schema index of `T`, built on first use and shared afterwards.
pub fn index_for<T: Record>(direction: Direction) -> Arc<SchemaIndex> {
    let key = (TypeId::of::<T>(), direction);
    if let Some(index) = INDEXES.read().get(&key) {
        return index.clone();
    }
    let index = Arc::new(SchemaIndex::build(
        std::any::type_name::<T>(),
        T::members(),
        direction,
    ));
    INDEXES.write().entry(key).or_insert(index).clone()
}
