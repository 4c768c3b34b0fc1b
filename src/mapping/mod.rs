//! Member-to-column mapping definitions.
//!
//! This module holds the configuration-time side of record mapping: association records
//! that bind members to columns, the ordered registry they are kept in, and the class map
//! that declares them.
//!
//! # Key Components
//!
//! - [`MemberBinding`]: The one thing a registry needs from an association, its member
//! - [`MemberMap`]: A member bound to a single column ([`ColumnBinding`])
//! - [`MemberReferenceMap`]: A member whose value is mapped by another [`ClassMap`]
//! - [`MemberMapRegistry`]: Ordered associations with structural member lookup
//! - [`ClassMap`]: Declares the associations of one type, reusing existing ones
//!
//! # Examples
//!
//! ```rust
//! use std::sync::Arc;
//! use memberscope::{
//!     mapping::ClassMap,
//!     resolver::AccessExpression,
//!     typesystem::{TypeBuilder, TypeHierarchy},
//! };
//!
//! let hierarchy = Arc::new(TypeHierarchy::new());
//! let invoice = TypeBuilder::new(hierarchy.clone())
//!     .class("Billing", "Invoice")
//!     .property("Number", None)
//!     .property("Amount", None)
//!     .build()?;
//!
//! let mut class_map = ClassMap::new(invoice);
//! class_map
//!     .map_expression(&AccessExpression::parameter(invoice).member("Number"), &hierarchy)?
//!     .name(&["invoice_no"]);
//! class_map
//!     .map_expression(&AccessExpression::parameter(invoice).member("Amount"), &hierarchy)?
//!     .optional();
//!
//! assert_eq!(class_map.header_names(), vec!["invoice_no", "Amount"]);
//! # Ok::<(), memberscope::Error>(())
//! ```

mod binding;
mod classmap;
mod registry;

pub use binding::{ColumnBinding, MemberBinding, MemberMap, MemberReferenceMap};
pub use classmap::ClassMap;
pub use registry::MemberMapRegistry;
