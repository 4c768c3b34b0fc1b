//! Association records binding a member to external columns.

use std::sync::Arc;

use crate::{mapping::ClassMap, member::MemberDescriptor};

/// A record associating a member with a column (or with a nested mapping).
///
/// [`crate::mapping::MemberMapRegistry`] only ever reads the member of a binding; what the
/// member is bound to is opaque to it.
pub trait MemberBinding {
    /// The member this record is bound to
    fn member(&self) -> &MemberDescriptor;
}

impl<T: MemberBinding + ?Sized> MemberBinding for &T {
    fn member(&self) -> &MemberDescriptor {
        (**self).member()
    }
}

impl<T: MemberBinding + ?Sized> MemberBinding for Box<T> {
    fn member(&self) -> &MemberDescriptor {
        (**self).member()
    }
}

impl<T: MemberBinding + ?Sized> MemberBinding for Arc<T> {
    fn member(&self) -> &MemberDescriptor {
        (**self).member()
    }
}

impl MemberBinding for MemberDescriptor {
    fn member(&self) -> &MemberDescriptor {
        self
    }
}

/// Column-side settings of a single-column member map
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ColumnBinding {
    /// Header names the column may appear under, the first one is used when writing
    pub names: Vec<String>,
    /// Which occurrence of a duplicated header name to bind to
    pub name_index: usize,
    /// Fixed column position, takes precedence over the names
    pub index: Option<usize>,
    /// Missing columns are not an error
    pub optional: bool,
    /// The member is skipped entirely
    pub ignore: bool,
    /// Value used when the column is empty or missing
    pub default: Option<String>,
    /// Name of the converter used for the member value
    pub converter: Option<String>,
}

impl ColumnBinding {
    /// A binding to a single header name
    #[must_use]
    pub fn named(name: &str) -> Self {
        ColumnBinding {
            names: vec![name.to_string()],
            ..Self::default()
        }
    }

    /// The header name used when writing, if any
    #[must_use]
    pub fn primary_name(&self) -> Option<&str> {
        self.names.first().map(String::as_str)
    }
}

/// Association of one member with one column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberMap {
    member: MemberDescriptor,
    /// Column settings
    pub column: ColumnBinding,
}

impl MemberMap {
    /// Map `member` to a column named like the member
    #[must_use]
    pub fn new(member: MemberDescriptor) -> Self {
        let column = ColumnBinding::named(&member.name);
        MemberMap { member, column }
    }

    /// Replace the header names of the column
    pub fn name(&mut self, names: &[&str]) -> &mut Self {
        self.column.names = names.iter().map(|name| (*name).to_string()).collect();
        self
    }

    /// Bind to the given occurrence of a duplicated header name
    pub fn name_index(&mut self, index: usize) -> &mut Self {
        self.column.name_index = index;
        self
    }

    /// Bind to a fixed column position
    pub fn index(&mut self, index: usize) -> &mut Self {
        self.column.index = Some(index);
        self
    }

    /// Do not fail when the column is missing
    pub fn optional(&mut self) -> &mut Self {
        self.column.optional = true;
        self
    }

    /// Skip or un-skip the member
    pub fn ignore(&mut self, ignore: bool) -> &mut Self {
        self.column.ignore = ignore;
        self
    }

    /// Value to use for empty or missing columns
    pub fn default_value(&mut self, value: &str) -> &mut Self {
        self.column.default = Some(value.to_string());
        self
    }

    /// Converter used for the member value
    pub fn converter(&mut self, converter: &str) -> &mut Self {
        self.column.converter = Some(converter.to_string());
        self
    }
}

impl MemberBinding for MemberMap {
    fn member(&self) -> &MemberDescriptor {
        &self.member
    }
}

/// Association of a member with the class map of its value.
///
/// The columns of the referenced type are flattened into the owning record, optionally
/// behind a header prefix.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberReferenceMap {
    member: MemberDescriptor,
    mapping: ClassMap,
    prefix: Option<String>,
}

impl MemberReferenceMap {
    /// Reference `member`, mapping its value with `mapping`
    #[must_use]
    pub fn new(member: MemberDescriptor, mapping: ClassMap) -> Self {
        MemberReferenceMap {
            member,
            mapping,
            prefix: None,
        }
    }

    /// Set the header prefix of the referenced columns
    ///
    /// `None` uses the member name followed by a dot, e.g. `Address.`.
    pub fn prefix(&mut self, prefix: Option<&str>) -> &mut Self {
        let prefix = match prefix {
            Some(prefix) => prefix.to_string(),
            None => format!("{}.", self.member.name),
        };
        self.prefix = Some(prefix);
        self
    }

    /// The header prefix, if one was set
    #[must_use]
    pub fn get_prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    /// The class map of the referenced type
    #[must_use]
    pub fn mapping(&self) -> &ClassMap {
        &self.mapping
    }

    /// Mutable access to the class map of the referenced type
    pub fn mapping_mut(&mut self) -> &mut ClassMap {
        &mut self.mapping
    }

    /// Replace the class map of the referenced type
    pub fn set_mapping(&mut self, mapping: ClassMap) {
        self.mapping = mapping;
    }
}

impl MemberBinding for MemberReferenceMap {
    fn member(&self) -> &MemberDescriptor {
        &self.member
    }
}
