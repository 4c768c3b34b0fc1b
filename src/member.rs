//! Member descriptors and member tokens.
//!
//! A [`MemberDescriptor`] identifies a field or property by its name and declaring type.
//! It is the only piece of an association that a [`crate::mapping::MemberMapRegistry`]
//! inspects. Descriptors are normally handed out by
//! [`crate::typesystem::TypeHierarchy::add_member`], which also allocates the member's
//! [`Token`] (its slot).

use std::fmt;

use bitflags::bitflags;
use strum::{Display, EnumIter};

use crate::typesystem::TypeId;

/// A token identifying a member slot.
///
/// Tokens consist of a 32-bit value where:
/// - The high byte (bits 24-31) indicates the member table ([`MemberKind::table`])
/// - The low 24 bits (bits 0-23) indicate the row within that table
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Token(pub u32);

impl Token {
    /// Creates a new token from a raw 32-bit value
    #[must_use]
    pub fn new(value: u32) -> Self {
        Token(value)
    }

    /// Creates a token from a member table and a row
    #[must_use]
    pub fn from_parts(table: u8, row: u32) -> Self {
        Token((u32::from(table) << 24) | (row & 0x00FF_FFFF))
    }

    /// Returns the raw token value
    #[must_use]
    pub fn value(&self) -> u32 {
        self.0
    }

    /// Extracts the table from the token (high byte)
    #[must_use]
    pub fn table(&self) -> u8 {
        (self.0 >> 24) as u8
    }

    /// Extracts the row index from the token (low 24 bits)
    #[must_use]
    pub fn row(&self) -> u32 {
        self.0 & 0x00FF_FFFF
    }

    /// Returns true if this is a null token (value 0)
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.0 == 0
    }
}

impl From<u32> for Token {
    fn from(value: u32) -> Self {
        Token(value)
    }
}

impl From<Token> for u32 {
    fn from(token: Token) -> Self {
        token.0
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Token(0x{:08x}, table: 0x{:02x}, row: {})",
            self.0,
            self.table(),
            self.row()
        )
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08x}", self.0)
    }
}

/// The kind of a member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum MemberKind {
    /// A field, storage declared directly on the type
    Field,
    /// A property, accessed through getter/setter
    Property,
}

impl MemberKind {
    /// Table byte used in tokens of this member kind
    #[must_use]
    pub fn table(&self) -> u8 {
        match self {
            MemberKind::Field => 0x04,
            MemberKind::Property => 0x17,
        }
    }
}

bitflags! {
    /// Access characteristics of a member
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct MemberAttributes: u32 {
        /// Member belongs to the type, not to instances
        const STATIC = 0x0001;
        /// Member value can be read
        const READABLE = 0x0002;
        /// Member value can be written
        const WRITABLE = 0x0004;
        /// Member can be read and written
        const READ_WRITE = Self::READABLE.bits() | Self::WRITABLE.bits();
    }
}

/// Identifies a field or property by name and declaring type.
///
/// The `declaring_type` is the type that declares the member, which is not necessarily the
/// type it was accessed through: a member inherited from `Base` and accessed on `Derived`
/// is still declared on `Base`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MemberDescriptor {
    /// Slot of the member
    pub token: Token,
    /// Member name
    pub name: String,
    /// Type that declares the member
    pub declaring_type: TypeId,
    /// Field or property
    pub kind: MemberKind,
    /// Type of the member value, if known
    pub member_type: Option<TypeId>,
    /// Access characteristics
    pub flags: MemberAttributes,
}

impl MemberDescriptor {
    /// Create a new readable and writable instance member without a known value type
    ///
    /// ## Arguments
    /// * 'token'          - The slot of the member
    /// * 'name'           - The member name
    /// * 'declaring_type' - The type declaring the member
    /// * 'kind'           - Field or property
    pub fn new(
        token: Token,
        name: impl Into<String>,
        declaring_type: TypeId,
        kind: MemberKind,
    ) -> Self {
        MemberDescriptor {
            token,
            name: name.into(),
            declaring_type,
            kind,
            member_type: None,
            flags: MemberAttributes::READ_WRITE,
        }
    }

    /// Set the type of the member value
    #[must_use]
    pub fn with_member_type(mut self, member_type: TypeId) -> Self {
        self.member_type = Some(member_type);
        self
    }

    /// Replace the access flags
    #[must_use]
    pub fn with_flags(mut self, flags: MemberAttributes) -> Self {
        self.flags = flags;
        self
    }

    /// Returns true if `other` refers to the same member slot on the same declaring type.
    ///
    /// Value type and flags are not part of the identity.
    #[must_use]
    pub fn is_identical(&self, other: &MemberDescriptor) -> bool {
        self.token == other.token
            && self.declaring_type == other.declaring_type
            && self.name == other.name
    }

    /// Returns true if the member value can be read from an instance
    #[must_use]
    pub fn is_readable_instance(&self) -> bool {
        self.flags.contains(MemberAttributes::READABLE)
            && !self.flags.contains(MemberAttributes::STATIC)
    }
}

impl fmt::Display for MemberDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{} ({})", self.declaring_type, self.name, self.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_parts() {
        let token = Token::from_parts(0x17, 5);
        assert_eq!(token.value(), 0x17000005);
        assert_eq!(token.table(), 0x17);
        assert_eq!(token.row(), 5);
        assert!(!token.is_null());

        let truncated = Token::from_parts(0x04, 0x0100_0002);
        assert_eq!(truncated.table(), 0x04);
        assert_eq!(truncated.row(), 2);

        assert!(Token::new(0).is_null());
    }

    #[test]
    fn test_token_conversions() {
        let token: Token = 0x04000001.into();
        assert_eq!(u32::from(token), 0x04000001);
        assert_eq!(format!("{token}"), "0x04000001");
        assert_eq!(
            format!("{token:?}"),
            "Token(0x04000001, table: 0x04, row: 1)"
        );
    }

    #[test]
    fn test_member_kind_tables() {
        assert_eq!(MemberKind::Field.table(), 0x04);
        assert_eq!(MemberKind::Property.table(), 0x17);
        assert_eq!(MemberKind::Property.to_string(), "Property");
    }

    #[test]
    fn test_identity_ignores_value_type_and_flags() {
        let declaring = TypeId::new(0x02000001);
        let amount = MemberDescriptor::new(
            Token::from_parts(0x17, 1),
            "Amount",
            declaring,
            MemberKind::Property,
        );
        let annotated = amount
            .clone()
            .with_member_type(TypeId::new(0x02000002))
            .with_flags(MemberAttributes::READABLE);

        assert!(amount.is_identical(&annotated));
        assert_ne!(amount, annotated);

        let other_slot = MemberDescriptor::new(
            Token::from_parts(0x17, 2),
            "Amount",
            declaring,
            MemberKind::Property,
        );
        assert!(!amount.is_identical(&other_slot));
    }

    #[test]
    fn test_readable_instance() {
        let member = MemberDescriptor::new(
            Token::from_parts(0x04, 1),
            "Count",
            TypeId::new(0x02000001),
            MemberKind::Field,
        );
        assert!(member.is_readable_instance());
        assert!(!member
            .clone()
            .with_flags(MemberAttributes::READABLE | MemberAttributes::STATIC)
            .is_readable_instance());
        assert!(!member
            .with_flags(MemberAttributes::WRITABLE)
            .is_readable_instance());
    }
}
