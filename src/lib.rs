// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![deny(unsafe_code)]

//! # memberscope
//!
//! Member-to-column mapping definitions with hierarchy-aware member lookup.
//!
//! `memberscope` is the configuration-time half of a record mapping layer. It keeps the
//! associations between object members (fields and properties) and external record
//! columns, and answers which association belongs to a member, matching members by name
//! across a type hierarchy instead of by strict identity.
//!
//! ## Features
//!
//! - **Ordered registries** - Associations kept in declaration order with full list operations
//! - **Structural lookup** - A member accessed through a derived type finds the base type mapping
//! - **Ambiguity detection** - Overlapping registrations fail loudly instead of resolving silently
//! - **Explicit type hierarchy** - Bases, interfaces and members registered without reflection
//! - **Expression resolution** - Accessors such as `x.Address.City` resolved to the declaring member
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use memberscope::prelude::*;
//!
//! let hierarchy = Arc::new(TypeHierarchy::new());
//! let document = TypeBuilder::new(hierarchy.clone())
//!     .class("Billing", "Document")
//!     .property("Amount", None)
//!     .build()?;
//! let invoice = TypeBuilder::new(hierarchy.clone())
//!     .class("Billing", "Invoice")
//!     .extends(document)?
//!     .property("Number", None)
//!     .build()?;
//!
//! let mut class_map = ClassMap::new(invoice);
//! class_map
//!     .map_expression(&AccessExpression::parameter(invoice).member("Amount"), &hierarchy)?
//!     .name(&["amount"]);
//!
//! // The member declared on Document is found through Document as well.
//! let amount = hierarchy.declared_member(document, "Amount").unwrap();
//! let found = class_map.member_maps().find(&amount, hierarchy.as_ref())?;
//! assert_eq!(found.unwrap().column.primary_name(), Some("amount"));
//! # Ok::<(), memberscope::Error>(())
//! ```
//!
//! ## Architecture
//!
//! - [`mapping`] - Association records, [`mapping::MemberMapRegistry`] and [`mapping::ClassMap`]
//! - [`typesystem`] - [`typesystem::TypeHierarchy`] and the [`typesystem::TypeRelation`] capability
//! - [`resolver`] - Member-access expressions and their resolution
//! - [`member`] - Member descriptors and tokens
//! - [`config`] - Lookup configuration
//! - [`Error`] and [`Result`] - Error handling
//!
//! ## Logging
//!
//! Registry mutations are reported as `tracing` events at `trace` level, hierarchy
//! registrations and class map decisions at `debug` level. The library never installs a
//! subscriber and never logs errors, which are always returned to the caller.
#[macro_use]
pub(crate) mod error;

/// Shared functionality which is used in unit tests
#[cfg(test)]
pub(crate) mod test;

/// Convenient re-exports of the most commonly used types and traits.
///
/// # Example
///
/// ```rust
/// use memberscope::prelude::*;
///
/// let registry: MemberMapRegistry<MemberMap> = MemberMapRegistry::new();
/// assert!(registry.is_empty());
/// ```
pub mod prelude;

pub mod config;
pub mod mapping;
pub mod member;
pub mod resolver;
pub mod typesystem;

/// `memberscope` Result type
///
/// A type alias for [`std::result::Result<T, Error>`] where the error type is always [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// `memberscope` Error type
///
/// The main error type for all operations in this crate.
///
/// # Examples
///
/// ```rust
/// use memberscope::{Error, mapping::{MemberMap, MemberMapRegistry}};
///
/// let mut registry: MemberMapRegistry<MemberMap> = MemberMapRegistry::new();
/// match registry.remove_at(0) {
///     Ok(_) => println!("Removed"),
///     Err(Error::IndexOutOfRange { index, len }) => println!("{index} is not below {len}"),
///     Err(e) => println!("Error: {e}"),
/// }
/// ```
pub use error::Error;
