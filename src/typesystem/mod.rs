//! Type hierarchy used to relate member declaring types.
//!
//! Member lookup needs a single question answered about types: can a value of one type be
//! assigned to a location of another. This module provides that capability as the
//! [`TypeRelation`] trait, plus an explicit hierarchy table implementing it.
//!
//! # Key Components
//!
//! - [`TypeId`]: Identity of a registered type
//! - [`TypeDef`]: A registered type with its base, interfaces and declared members
//! - [`TypeHierarchy`]: Central registry of type definitions
//! - [`TypeBuilder`]: Fluent API for registering types and their members
//! - [`TypeRelation`]: The assignability capability consumed by lookups
//!
//! # Examples
//!
//! ```rust
//! use std::sync::Arc;
//! use memberscope::typesystem::{TypeBuilder, TypeHierarchy, TypeRelation};
//!
//! let hierarchy = Arc::new(TypeHierarchy::new());
//! let base = TypeBuilder::new(hierarchy.clone())
//!     .class("Billing", "Invoice")
//!     .property("Amount", None)
//!     .build()?;
//! let derived = TypeBuilder::new(hierarchy.clone())
//!     .class("Billing", "CreditNote")
//!     .extends(base)?
//!     .build()?;
//!
//! assert!(hierarchy.is_assignable_from(base, derived));
//! assert!(!hierarchy.is_assignable_from(derived, base));
//! # Ok::<(), memberscope::Error>(())
//! ```

mod builder;
mod hierarchy;

use std::{fmt, sync::Arc};

use strum::Display;

pub use builder::TypeBuilder;
pub use hierarchy::TypeHierarchy;

use crate::member::MemberDescriptor;

/// Reference to a `TypeDef`
pub type TypeDefRc = Arc<TypeDef>;

/// Identity of a type registered in a [`TypeHierarchy`].
///
/// Ids are allocated sequentially from `0x02000001`; `0` is never a valid id.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TypeId(pub u32);

impl TypeId {
    /// Creates a new id from a raw 32-bit value
    #[must_use]
    pub fn new(value: u32) -> Self {
        TypeId(value)
    }

    /// Returns the raw id value
    #[must_use]
    pub fn value(&self) -> u32 {
        self.0
    }
}

impl fmt::Debug for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeId(0x{:08x})", self.0)
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08x}", self.0)
    }
}

/// The flavor of a registered type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum TypeFlavor {
    /// Reference type, may have one base class
    Class,
    /// Value type
    ValueType,
    /// Interface, only participates through implementation lists
    Interface,
}

/// Answers whether values of one type are assignable to locations of another.
///
/// `is_assignable_from(target, source)` must be reflexive. Implementations are free to
/// source the answer from an explicit table ([`TypeHierarchy`]) or anything else; any
/// `Fn(TypeId, TypeId) -> bool` closure is a `TypeRelation` as well.
pub trait TypeRelation {
    /// Returns true if a value of `source` can be assigned to a location of `target`,
    /// i.e. `target` is `source`, one of its base types, or one of its interfaces
    fn is_assignable_from(&self, target: TypeId, source: TypeId) -> bool;
}

impl<F> TypeRelation for F
where
    F: Fn(TypeId, TypeId) -> bool,
{
    fn is_assignable_from(&self, target: TypeId, source: TypeId) -> bool {
        self(target, source)
    }
}

/// A registered type: name, flavor, direct base, implemented interfaces and declared members.
pub struct TypeDef {
    /// Identity within the owning hierarchy
    pub id: TypeId,
    /// Namespace (can be empty)
    pub namespace: String,
    /// Type name
    pub name: String,
    /// Class, value type or interface
    pub flavor: TypeFlavor,
    /// Direct base type ('extends')
    base: Option<TypeId>,
    /// Directly implemented (or, for interfaces, inherited) interfaces
    pub interfaces: Vec<TypeId>,
    /// Members declared on this type, in declaration order
    pub members: boxcar::Vec<MemberDescriptor>,
}

impl TypeDef {
    /// Create a new type definition without members
    pub fn new(
        id: TypeId,
        namespace: String,
        name: String,
        flavor: TypeFlavor,
        base: Option<TypeId>,
        interfaces: Vec<TypeId>,
    ) -> Self {
        TypeDef {
            id,
            namespace,
            name,
            flavor,
            base,
            interfaces,
            members: boxcar::Vec::new(),
        }
    }

    /// Access the direct base type of this type, if it exists
    #[must_use]
    pub fn base(&self) -> Option<TypeId> {
        self.base
    }

    /// Returns the full name (Namespace.Name) of the type
    #[must_use]
    pub fn fullname(&self) -> String {
        if self.namespace.is_empty() {
            self.name.clone()
        } else {
            format!("{0}.{1}", self.namespace, self.name)
        }
    }

    /// Find a member declared directly on this type
    #[must_use]
    pub fn declared_member(&self, name: &str) -> Option<&MemberDescriptor> {
        self.members
            .iter()
            .find_map(|(_, member)| (member.name == name).then_some(member))
    }
}

impl fmt::Debug for TypeDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDef")
            .field("id", &self.id)
            .field("fullname", &self.fullname())
            .field("flavor", &self.flavor)
            .field("base", &self.base)
            .field("interfaces", &self.interfaces)
            .field("members", &self.members.count())
            .finish()
    }
}
