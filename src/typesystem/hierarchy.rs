//! Central registry of type definitions.
//!
//! The [`TypeHierarchy`] stores every type a mapping configuration may refer to, together
//! with its direct base type, its implemented interfaces and its declared members. It is
//! the explicit hierarchy table behind [`TypeRelation`] and the default
//! [`crate::resolver::MemberResolver`].
//!
//! # Registry Architecture
//!
//! - **Id-based lookup**: Primary storage using a skip list keyed by [`TypeId`]
//! - **Name-based lookup**: Secondary indices for full names and simple names
//! - **Id allocation**: Atomic counters for type ids and member rows
//!
//! # Invariants
//!
//! A base type or interface must be registered before the types that refer to it. This
//! makes cycles in the hierarchy impossible by construction; walks over the base chain
//! are still bounded by the configured maximum depth.
//!
//! # Thread Safety
//!
//! All collections are concurrent, a hierarchy can be shared behind an `Arc` between
//! several class maps built on different threads. Member names are claimed per declaring
//! type before a member is published, so concurrent registrations of the same name
//! yield exactly one member.

use std::{
    collections::{HashMap, HashSet},
    sync::atomic::{AtomicU32, Ordering},
};

use crossbeam_skiplist::SkipMap;
use dashmap::{mapref::entry::Entry, DashMap};
use tracing::debug;

use crate::{
    config::LookupConfig,
    member::{MemberAttributes, MemberDescriptor, MemberKind, Token},
    typesystem::{TypeDef, TypeDefRc, TypeFlavor, TypeId, TypeRelation},
    Error::{MemberInsert, RecursionLimit, TypeInsert, TypeNotFound},
    Result,
};

/// Central registry of all types known to a mapping configuration
///
/// # Performance Characteristics
///
/// - **Id lookup**: O(log n) using skip list
/// - **Name lookup**: O(1) average using hash indices
/// - **Assignability**: O(depth + interfaces) per query
pub struct TypeHierarchy {
    /// Primary type storage indexed by id
    types: SkipMap<TypeId, TypeDefRc>,
    /// Atomic counter for generating type ids
    next_type: AtomicU32,
    /// Atomic counter for generating member rows (shared between fields and properties)
    next_member_row: AtomicU32,
    /// Secondary index: types indexed by full name (namespace.name), unique
    types_by_fullname: DashMap<String, TypeId>,
    /// Secondary index: types indexed by simple name (may have duplicates)
    types_by_name: DashMap<String, Vec<TypeId>>,
    /// Claimed member names per declaring type
    member_tokens: DashMap<(TypeId, String), Token>,
    /// Upper bound for base chain walks
    max_depth: usize,
}

impl TypeHierarchy {
    /// Create a new, empty hierarchy using the default depth limit
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(&LookupConfig::default())
    }

    /// Create a new, empty hierarchy bounded by `config.max_hierarchy_depth`
    #[must_use]
    pub fn with_config(config: &LookupConfig) -> Self {
        TypeHierarchy {
            types: SkipMap::new(),
            next_type: AtomicU32::new(0x0200_0001),
            next_member_row: AtomicU32::new(1),
            types_by_fullname: DashMap::new(),
            types_by_name: DashMap::new(),
            member_tokens: DashMap::new(),
            max_depth: config.max_hierarchy_depth,
        }
    }

    /// Register a new type
    ///
    /// ## Arguments
    /// * 'namespace'  - The namespace of the type (can be empty)
    /// * 'name'       - The type name
    /// * 'flavor'     - Class, value type or interface
    /// * 'base'       - The direct base type, which must already be registered
    /// * 'interfaces' - Implemented interfaces, which must already be registered
    ///
    /// # Errors
    /// Returns [`crate::Error::TypeNotFound`] if the base or an interface is unknown, and
    /// [`crate::Error::TypeInsert`] if a type with the same full name already exists.
    pub fn insert_type(
        &self,
        namespace: &str,
        name: &str,
        flavor: TypeFlavor,
        base: Option<TypeId>,
        interfaces: &[TypeId],
    ) -> Result<TypeId> {
        if let Some(base) = base {
            if !self.types.contains_key(&base) {
                return Err(TypeNotFound(base));
            }
        }
        if let Some(missing) = interfaces
            .iter()
            .find(|interface| !self.types.contains_key(*interface))
        {
            return Err(TypeNotFound(*missing));
        }

        let id = TypeId::new(self.next_type.fetch_add(1, Ordering::Relaxed));
        let type_def = TypeDef::new(
            id,
            namespace.to_string(),
            name.to_string(),
            flavor,
            base,
            interfaces.to_vec(),
        );
        let fullname = type_def.fullname();

        match self.types_by_fullname.entry(fullname.clone()) {
            Entry::Occupied(_) => return Err(TypeInsert(fullname)),
            Entry::Vacant(slot) => {
                self.types.insert(id, TypeDefRc::new(type_def));
                slot.insert(id);
            }
        }

        self.types_by_name
            .entry(name.to_string())
            .or_default()
            .push(id);

        debug!(type_id = %id, fullname = %fullname, %flavor, "registered type");
        Ok(id)
    }

    /// Register a member on an existing type and return its descriptor
    ///
    /// ## Arguments
    /// * '`type_id`'     - The declaring type
    /// * 'name'          - The member name, unique within the declaring type
    /// * 'kind'          - Field or property
    /// * '`member_type`' - The type of the member value, if known
    /// * 'flags'         - Access characteristics
    ///
    /// # Errors
    /// Returns [`crate::Error::TypeNotFound`] if the declaring or value type is unknown, and
    /// [`crate::Error::MemberInsert`] if the type already declares a member with this name.
    pub fn add_member(
        &self,
        type_id: TypeId,
        name: &str,
        kind: MemberKind,
        member_type: Option<TypeId>,
        flags: MemberAttributes,
    ) -> Result<MemberDescriptor> {
        let type_def = self.get(type_id).ok_or(TypeNotFound(type_id))?;
        if let Some(member_type) = member_type {
            if !self.types.contains_key(&member_type) {
                return Err(TypeNotFound(member_type));
            }
        }

        let slot = match self.member_tokens.entry((type_id, name.to_string())) {
            Entry::Occupied(_) => {
                return Err(MemberInsert {
                    type_id,
                    name: name.to_string(),
                })
            }
            Entry::Vacant(slot) => slot,
        };

        let row = self.next_member_row.fetch_add(1, Ordering::Relaxed);
        let mut member = MemberDescriptor::new(
            Token::from_parts(kind.table(), row),
            name,
            type_id,
            kind,
        )
        .with_flags(flags);
        member.member_type = member_type;

        // The claimed entry is held until the member is visible on the type.
        type_def.members.push(member.clone());
        slot.insert(member.token);
        debug!(type_id = %type_id, member = name, token = %member.token, "registered member");
        Ok(member)
    }

    /// Get a type by id
    #[must_use]
    pub fn get(&self, id: TypeId) -> Option<TypeDefRc> {
        self.types.get(&id).map(|entry| entry.value().clone())
    }

    /// Get a type by its full name (Namespace.Name)
    #[must_use]
    pub fn get_by_fullname(&self, fullname: &str) -> Option<TypeDefRc> {
        let id = *self.types_by_fullname.get(fullname)?.value();
        self.get(id)
    }

    /// Get all types with a simple name, in registration order
    #[must_use]
    pub fn get_by_name(&self, name: &str) -> Vec<TypeDefRc> {
        self.types_by_name
            .get(name)
            .map(|ids| ids.value().iter().filter_map(|id| self.get(*id)).collect())
            .unwrap_or_default()
    }

    /// Returns the number of registered types
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns true if no type is registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Iterate over all registered types, ordered by id
    pub fn iter(&self) -> crossbeam_skiplist::map::Iter<'_, TypeId, TypeDefRc> {
        self.types.iter()
    }

    /// Returns all registered types, ordered by id
    #[must_use]
    pub fn all_types(&self) -> Vec<TypeDefRc> {
        self.types
            .iter()
            .map(|entry| entry.value().clone())
            .collect()
    }

    /// Returns the base chain of a type, nearest base first, excluding the type itself
    ///
    /// # Errors
    /// Returns [`crate::Error::TypeNotFound`] for unknown types, and
    /// [`crate::Error::RecursionLimit`] if the chain is deeper than the configured limit.
    pub fn ancestors(&self, id: TypeId) -> Result<Vec<TypeId>> {
        let mut current = self.get(id).ok_or(TypeNotFound(id))?;
        let mut chain = Vec::new();

        while let Some(base) = current.base() {
            if chain.len() >= self.max_depth {
                return Err(RecursionLimit(self.max_depth));
            }
            chain.push(base);
            current = self.get(base).ok_or(TypeNotFound(base))?;
        }

        Ok(chain)
    }

    /// Returns the members declared directly on a type, in declaration order
    ///
    /// # Errors
    /// Returns [`crate::Error::TypeNotFound`] for unknown types.
    pub fn members_of(&self, id: TypeId) -> Result<Vec<MemberDescriptor>> {
        let type_def = self.get(id).ok_or(TypeNotFound(id))?;
        Ok(type_def
            .members
            .iter()
            .map(|(_, member)| member.clone())
            .collect())
    }

    /// Returns a member declared directly on a type
    #[must_use]
    pub fn declared_member(&self, id: TypeId, name: &str) -> Option<MemberDescriptor> {
        self.get(id)?.declared_member(name).cloned()
    }

    /// Looks a member up on a type and then on its base chain
    ///
    /// The returned descriptor carries the type that actually declares the member.
    ///
    /// # Errors
    /// Same as [`TypeHierarchy::ancestors`].
    pub fn find_member(&self, id: TypeId, name: &str) -> Result<Option<MemberDescriptor>> {
        if let Some(member) = self.declared_member(id, name) {
            return Ok(Some(member));
        }

        for base in self.ancestors(id)? {
            if let Some(member) = self.declared_member(base, name) {
                return Ok(Some(member));
            }
        }

        Ok(None)
    }

    /// Returns the declared and inherited members of a type
    ///
    /// Members are ordered from the root of the base chain down to the type itself. A
    /// member re-declared on a derived type hides the base member of the same name and
    /// takes its position.
    ///
    /// # Errors
    /// Same as [`TypeHierarchy::ancestors`].
    pub fn all_members(&self, id: TypeId) -> Result<Vec<MemberDescriptor>> {
        let mut chain = self.ancestors(id)?;
        chain.reverse();
        chain.push(id);

        let mut members: Vec<MemberDescriptor> = Vec::new();
        let mut positions: HashMap<String, usize> = HashMap::new();
        for type_id in chain {
            for member in self.members_of(type_id)? {
                match positions.get(&member.name) {
                    Some(&index) => members[index] = member,
                    None => {
                        positions.insert(member.name.clone(), members.len());
                        members.push(member);
                    }
                }
            }
        }

        Ok(members)
    }
}

impl Default for TypeHierarchy {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRelation for TypeHierarchy {
    fn is_assignable_from(&self, target: TypeId, source: TypeId) -> bool {
        if target == source {
            return true;
        }

        let mut visited = HashSet::new();
        let mut pending = vec![source];
        while let Some(current) = pending.pop() {
            if !visited.insert(current) {
                continue;
            }

            let Some(type_def) = self.get(current) else {
                continue;
            };

            if let Some(base) = type_def.base() {
                if base == target {
                    return true;
                }
                pending.push(base);
            }

            for interface in &type_def.interfaces {
                if *interface == target {
                    return true;
                }
                pending.push(*interface);
            }
        }

        false
    }
}
