//! # memberscope Prelude
//!
//! This module provides a convenient prelude for the most commonly used types and traits
//! from the memberscope library. Import this module to get quick access to the essential
//! types for declaring and querying member mappings.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all memberscope operations
pub use crate::Error;

/// The result type used throughout memberscope
pub use crate::Result;

/// Lookup configuration
pub use crate::config::{LookupConfig, MatchMode};

// ================================================================================================
// Members
// ================================================================================================

/// Member identity and characteristics
pub use crate::member::{MemberAttributes, MemberDescriptor, MemberKind, Token};

// ================================================================================================
// Type System
// ================================================================================================

/// Type hierarchy and the assignability capability
pub use crate::typesystem::{
    TypeBuilder, TypeDef, TypeDefRc, TypeFlavor, TypeHierarchy, TypeId, TypeRelation,
};

/// Member-access expressions and their resolution
pub use crate::resolver::{AccessExpression, MemberResolver};

// ================================================================================================
// Mapping
// ================================================================================================

/// Association records, registries and class maps
pub use crate::mapping::{
    ClassMap, ColumnBinding, MemberBinding, MemberMap, MemberMapRegistry, MemberReferenceMap,
};
