//! Builder for type registrations.
//!
//! This module provides the [`TypeBuilder`] struct, which offers a fluent API for registering a type
//! together with its base type, its interfaces and its members in a [`TypeHierarchy`].
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use memberscope::typesystem::{TypeBuilder, TypeHierarchy};
//!
//! let hierarchy = Arc::new(TypeHierarchy::new());
//! let address = TypeBuilder::new(hierarchy.clone())
//!     .class("Crm", "Address")
//!     .property("City", None)
//!     .build()?;
//! let customer = TypeBuilder::new(hierarchy.clone())
//!     .class("Crm", "Customer")
//!     .property("Name", None)
//!     .property("Address", Some(address))
//!     .build()?;
//!
//! assert_eq!(hierarchy.members_of(customer)?.len(), 2);
//! # Ok::<(), memberscope::Error>(())
//! ```

use std::{collections::HashSet, sync::Arc};

use crate::{
    member::{MemberAttributes, MemberKind},
    typesystem::{TypeFlavor, TypeHierarchy, TypeId},
    Error::TypeNotFound,
    Result,
};

/// A member waiting for its declaring type to be registered
struct PendingMember {
    name: String,
    kind: MemberKind,
    member_type: Option<TypeId>,
    flags: MemberAttributes,
}

/// Provides a fluent API for registering types
pub struct TypeBuilder {
    /// Type hierarchy receiving the type
    hierarchy: Arc<TypeHierarchy>,
    /// Namespace of the type being built
    namespace: String,
    /// Name of the type being built
    name: Option<String>,
    /// Flavor of the type being built
    flavor: TypeFlavor,
    /// Direct base type
    base: Option<TypeId>,
    /// Implemented interfaces
    interfaces: Vec<TypeId>,
    /// Members to register once the type exists
    members: Vec<PendingMember>,
}

impl TypeBuilder {
    /// Create a new builder with the given hierarchy
    ///
    /// ## Arguments
    /// * 'hierarchy' - The type hierarchy to register into
    pub fn new(hierarchy: Arc<TypeHierarchy>) -> Self {
        TypeBuilder {
            hierarchy,
            namespace: String::new(),
            name: None,
            flavor: TypeFlavor::Class,
            base: None,
            interfaces: Vec::new(),
            members: Vec::new(),
        }
    }

    /// Build a class type
    ///
    /// ## Arguments
    /// * 'namespace' - The namespace of the class
    /// * 'name'      - The name of the class
    #[must_use]
    pub fn class(self, namespace: &str, name: &str) -> Self {
        self.named(namespace, name, TypeFlavor::Class)
    }

    /// Build a value type
    ///
    /// ## Arguments
    /// * 'namespace' - The namespace of the value type
    /// * 'name'      - The name of the value type
    #[must_use]
    pub fn value_type(self, namespace: &str, name: &str) -> Self {
        self.named(namespace, name, TypeFlavor::ValueType)
    }

    /// Build an interface type
    ///
    /// ## Arguments
    /// * 'namespace' - The namespace of the interface
    /// * 'name'      - The name of the interface
    #[must_use]
    pub fn interface(self, namespace: &str, name: &str) -> Self {
        self.named(namespace, name, TypeFlavor::Interface)
    }

    fn named(mut self, namespace: &str, name: &str, flavor: TypeFlavor) -> Self {
        self.namespace = namespace.to_string();
        self.name = Some(name.to_string());
        self.flavor = flavor;
        self
    }

    /// Set the base type
    ///
    /// ## Arguments
    /// * 'base' - The id of the base type
    ///
    /// # Errors
    /// Returns an error if the base type is not registered.
    pub fn extends(mut self, base: TypeId) -> Result<Self> {
        if self.hierarchy.get(base).is_none() {
            return Err(TypeNotFound(base));
        }

        self.base = Some(base);
        Ok(self)
    }

    /// Add an implemented interface
    ///
    /// ## Arguments
    /// * 'interface' - The id of the interface
    ///
    /// # Errors
    /// Returns an error if the interface is not registered.
    pub fn implements(mut self, interface: TypeId) -> Result<Self> {
        if self.hierarchy.get(interface).is_none() {
            return Err(TypeNotFound(interface));
        }

        self.interfaces.push(interface);
        Ok(self)
    }

    /// Declare a readable and writable field
    #[must_use]
    pub fn field(self, name: &str, member_type: Option<TypeId>) -> Self {
        self.member(
            name,
            MemberKind::Field,
            member_type,
            MemberAttributes::READ_WRITE,
        )
    }

    /// Declare a property with a getter and a setter
    #[must_use]
    pub fn property(self, name: &str, member_type: Option<TypeId>) -> Self {
        self.member(
            name,
            MemberKind::Property,
            member_type,
            MemberAttributes::READ_WRITE,
        )
    }

    /// Declare a member with explicit flags
    ///
    /// ## Arguments
    /// * 'name'          - The member name
    /// * 'kind'          - Field or property
    /// * '`member_type`' - The type of the member value, if known
    /// * 'flags'         - Access characteristics
    #[must_use]
    pub fn member(
        mut self,
        name: &str,
        kind: MemberKind,
        member_type: Option<TypeId>,
        flags: MemberAttributes,
    ) -> Self {
        self.members.push(PendingMember {
            name: name.to_string(),
            kind,
            member_type,
            flags,
        });
        self
    }

    /// Register the type and its members, returning the id of the new type
    ///
    /// Members are validated before the type is inserted, a failed build leaves the
    /// hierarchy unchanged.
    ///
    /// # Errors
    /// Returns an error if no name was given, the type cannot be inserted or one of the
    /// members cannot be registered.
    pub fn build(self) -> Result<TypeId> {
        let Some(name) = self.name.as_deref() else {
            return Err(invalid_argument!(
                "TypeBuilder requires class(), value_type() or interface() before build()"
            ));
        };

        self.validate_members(name)?;

        let id = self.hierarchy.insert_type(
            &self.namespace,
            name,
            self.flavor,
            self.base,
            &self.interfaces,
        )?;

        for member in &self.members {
            self.hierarchy.add_member(
                id,
                &member.name,
                member.kind,
                member.member_type,
                member.flags,
            )?;
        }

        Ok(id)
    }

    fn validate_members(&self, type_name: &str) -> Result<()> {
        let mut names = HashSet::with_capacity(self.members.len());
        for member in &self.members {
            if !names.insert(member.name.as_str()) {
                return Err(invalid_argument!(
                    "member '{}' is declared twice on {}",
                    member.name,
                    type_name
                ));
            }
            if let Some(member_type) = member.member_type {
                if self.hierarchy.get(member_type).is_none() {
                    return Err(TypeNotFound(member_type));
                }
            }
        }

        Ok(())
    }
}
