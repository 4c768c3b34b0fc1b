use thiserror::Error;

use crate::typesystem::TypeId;

macro_rules! invalid_argument {
    // Single string version
    ($msg:expr) => {
        crate::Error::InvalidArgument {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::InvalidArgument {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// Every error is reported synchronously at the offending call. None of them are transient:
/// they describe either a programming error (bad index, missing argument) or a defect in the
/// mapping configuration (ambiguous registrations, unresolvable expressions).
///
/// # Error Categories
///
/// ## Sequence Errors
/// - [`Error::IndexOutOfRange`] - Index based access outside of the valid bounds
/// - [`Error::InvalidArgument`] - Argument rejected, e.g. copy destination too small
/// - [`Error::NullReference`] - A required argument was absent
///
/// ## Lookup Errors
/// - [`Error::MultipleMatches`] - More than one association matches a member
/// - [`Error::InvalidExpression`] - An access expression does not denote a member
///
/// ## Type Hierarchy Errors
/// - [`Error::TypeNotFound`] - Referenced type is not registered
/// - [`Error::TypeInsert`] - Type could not be registered
/// - [`Error::MemberInsert`] - Member could not be registered on a type
/// - [`Error::RecursionLimit`] - Maximum hierarchy depth exceeded
///
/// # Examples
///
/// ```rust
/// use memberscope::{Error, mapping::MemberMapRegistry, mapping::MemberMap};
///
/// let registry: MemberMapRegistry<MemberMap> = MemberMapRegistry::new();
/// match registry.get(3) {
///     Ok(map) => println!("Column: {:?}", map.column.primary_name()),
///     Err(Error::IndexOutOfRange { index, len }) => {
///         eprintln!("Index {index} is outside of 0..{len}");
///     }
///     Err(e) => eprintln!("Other error: {e}"),
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    // Sequence Errors
    /// An index was outside of the valid range of the registry.
    ///
    /// For element access and removal the valid range is `0..len`, for insertion it is
    /// `0..=len`.
    ///
    /// # Fields
    ///
    /// * `index` - The offending index
    /// * `len` - Length of the registry at the time of the call
    #[error("Index {index} is out of range (length {len})")]
    IndexOutOfRange {
        /// The requested index
        index: usize,
        /// The length of the sequence when the access was attempted
        len: usize,
    },

    /// An argument was rejected.
    ///
    /// Raised for instance when a copy destination does not have enough room from the
    /// requested offset. The error includes the source location where it was raised.
    ///
    /// # Fields
    ///
    /// * `message` - Description of the rejected argument
    /// * `file` - Source file where the error was detected
    /// * `line` - Source line where the error was detected
    #[error("Invalid argument - {file}:{line}: {message}")]
    InvalidArgument {
        /// The message to be printed for the InvalidArgument error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// A required argument was absent.
    ///
    /// The associated value names the missing argument.
    #[error("Required argument '{0}' is absent")]
    NullReference(&'static str),

    // Lookup Errors
    /// More than one association matches the requested member.
    ///
    /// Structural lookup matches members by name across a type hierarchy, so two
    /// registrations on related types can both claim the same member. This is a defect in
    /// the mapping configuration and is never resolved by picking one of the candidates.
    #[error("{count} member maps match '{member}', the mapping is ambiguous")]
    MultipleMatches {
        /// Name of the member that was looked up
        member: String,
        /// Number of associations that matched
        count: usize,
    },

    /// The access expression could not be resolved to a member.
    ///
    /// Propagated from a [`crate::resolver::MemberResolver`].
    #[error("Invalid member access expression - {0}")]
    InvalidExpression(String),

    // Type Hierarchy Errors
    /// Failed to find a type in the `TypeHierarchy`.
    ///
    /// The associated [`TypeId`] identifies which type was not found.
    #[error("Failed to find type in TypeHierarchy - {0}")]
    TypeNotFound(TypeId),

    /// Failed to insert a new type into the `TypeHierarchy`.
    ///
    /// The associated value is the full name of the rejected type.
    #[error("Failed to insert new type into TypeHierarchy - {0}")]
    TypeInsert(String),

    /// Failed to register a member on a type, the type already declares a member with
    /// this name.
    #[error("Type {type_id} already declares a member named '{name}'")]
    MemberInsert {
        /// The declaring type
        type_id: TypeId,
        /// Name of the rejected member
        name: String,
    },

    /// Recursion limit reached.
    ///
    /// Walking a base chain or nested reference maps is bounded by
    /// [`crate::config::LookupConfig::max_hierarchy_depth`]. The associated value shows
    /// the limit that was reached.
    #[error("Reach the maximum recursion level allowed - {0}")]
    RecursionLimit(usize),
}
