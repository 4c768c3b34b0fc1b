//! Member-access expressions and their resolution to member descriptors.
//!
//! An [`AccessExpression`] is the data form of an accessor such as `x => x.Address.City`.
//! A [`MemberResolver`] turns it into the [`MemberDescriptor`] of the accessed member. The
//! [`TypeHierarchy`] is the default resolver: it computes the static type of the accessed
//! target and looks the member up on that type and its bases, so the descriptor it returns
//! always names the type that *declares* the member.
//!
//! # Examples
//!
//! ```rust
//! use std::sync::Arc;
//! use memberscope::{
//!     resolver::{AccessExpression, MemberResolver},
//!     typesystem::{TypeBuilder, TypeHierarchy},
//! };
//!
//! let hierarchy = Arc::new(TypeHierarchy::new());
//! let base = TypeBuilder::new(hierarchy.clone())
//!     .class("Billing", "Document")
//!     .property("Amount", None)
//!     .build()?;
//! let derived = TypeBuilder::new(hierarchy.clone())
//!     .class("Billing", "Invoice")
//!     .extends(base)?
//!     .build()?;
//!
//! let expression = AccessExpression::parameter(derived).member("Amount");
//! let member = hierarchy.resolve(&expression)?;
//! assert_eq!(member.declaring_type, base);
//! # Ok::<(), memberscope::Error>(())
//! ```

use std::fmt;

use crate::{
    member::MemberDescriptor,
    typesystem::{TypeHierarchy, TypeId},
    Error::InvalidExpression,
    Result,
};

/// A typed member-access expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessExpression {
    /// The accessor parameter, typed
    Parameter(TypeId),
    /// Access of a named member on the value of `target`
    Member {
        /// Expression producing the accessed value
        target: Box<AccessExpression>,
        /// Name of the accessed member
        name: String,
    },
    /// A conversion wrapper (e.g. boxing to `object`), transparent for resolution
    Convert(Box<AccessExpression>),
    /// A literal value, never a member access
    Constant(String),
}

impl AccessExpression {
    /// The accessor parameter of type `type_id`
    #[must_use]
    pub fn parameter(type_id: TypeId) -> Self {
        AccessExpression::Parameter(type_id)
    }

    /// Access `name` on the value of this expression
    #[must_use]
    pub fn member(self, name: &str) -> Self {
        AccessExpression::Member {
            target: Box::new(self),
            name: name.to_string(),
        }
    }

    /// Wrap this expression in a conversion
    #[must_use]
    pub fn convert(self) -> Self {
        AccessExpression::Convert(Box::new(self))
    }

    /// Builds the chained access `x.path[0].path[1]...` on a parameter of `type_id`
    #[must_use]
    pub fn member_path(type_id: TypeId, path: &[&str]) -> Self {
        path.iter()
            .fold(Self::parameter(type_id), |target, name| target.member(name))
    }

    /// Returns the expression below any number of conversion wrappers
    #[must_use]
    pub fn strip_convert(&self) -> &Self {
        let mut current = self;
        while let AccessExpression::Convert(inner) = current {
            current = inner;
        }
        current
    }
}

impl fmt::Display for AccessExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessExpression::Parameter(_) => write!(f, "x"),
            AccessExpression::Member { target, name } => write!(f, "{target}.{name}"),
            AccessExpression::Convert(inner) => write!(f, "Convert({inner})"),
            AccessExpression::Constant(value) => write!(f, "\"{value}\""),
        }
    }
}

/// Resolves member-access expressions to member descriptors.
///
/// Any `Fn(&AccessExpression) -> Result<MemberDescriptor>` closure is a resolver as well,
/// which allows call sites to inject a custom resolution strategy.
pub trait MemberResolver {
    /// Resolve `expression` to the descriptor of the accessed member
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidExpression`] if the expression is not a member
    /// access on a known type.
    fn resolve(&self, expression: &AccessExpression) -> Result<MemberDescriptor>;
}

impl<F> MemberResolver for F
where
    F: Fn(&AccessExpression) -> Result<MemberDescriptor>,
{
    fn resolve(&self, expression: &AccessExpression) -> Result<MemberDescriptor> {
        self(expression)
    }
}

impl MemberResolver for TypeHierarchy {
    fn resolve(&self, expression: &AccessExpression) -> Result<MemberDescriptor> {
        match expression.strip_convert() {
            AccessExpression::Member { target, name } => {
                let owner = self.static_type(target)?;
                self.find_member(owner, name)?.ok_or_else(|| {
                    InvalidExpression(format!(
                        "'{name}' is not a member of {owner} in '{expression}'"
                    ))
                })
            }
            other => Err(InvalidExpression(format!(
                "'{other}' is not a member access"
            ))),
        }
    }
}

impl TypeHierarchy {
    /// Static type of the value produced by `expression`
    fn static_type(&self, expression: &AccessExpression) -> Result<TypeId> {
        match expression {
            AccessExpression::Convert(inner) => self.static_type(inner),
            AccessExpression::Parameter(type_id) => match self.get(*type_id) {
                Some(_) => Ok(*type_id),
                None => Err(InvalidExpression(format!(
                    "parameter type {type_id} is not registered"
                ))),
            },
            member @ AccessExpression::Member { .. } => {
                let resolved = self.resolve(member)?;
                resolved.member_type.ok_or_else(|| {
                    InvalidExpression(format!(
                        "the type of '{member}' is unknown, it cannot be accessed further"
                    ))
                })
            }
            AccessExpression::Constant(value) => Err(InvalidExpression(format!(
                "constant \"{value}\" has no members"
            ))),
        }
    }
}
