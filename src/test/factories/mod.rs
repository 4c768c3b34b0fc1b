//! Factory for the sample type hierarchy used across unit tests.
//!
//! ```text
//! System.Decimal (value type)        System.String
//!
//! IAuditable { Amount }              Document { Id, Amount: Decimal }
//!        ^                                    ^
//!        +------- Invoice : Document, IAuditable { Number }
//!                           ^
//!                 CreditNote : Invoice { Reason }
//!
//! Parcel { Amount }                  (unrelated to everything above)
//!
//! Address { Street, City: String }   Customer { Name, Address: Address }
//! ```

use std::sync::Arc;

use crate::{
    member::{MemberDescriptor, MemberKind, Token},
    typesystem::{TypeBuilder, TypeHierarchy, TypeId},
};

/// The sample hierarchy and the ids/descriptors tests refer to
pub struct SampleHierarchy {
    pub hierarchy: Arc<TypeHierarchy>,
    pub decimal: TypeId,
    pub string: TypeId,
    pub auditable: TypeId,
    pub base: TypeId,
    pub middle: TypeId,
    pub derived: TypeId,
    pub unrelated: TypeId,
    pub address: TypeId,
    pub customer: TypeId,
    /// `Document.Amount`
    pub base_amount: MemberDescriptor,
    /// `IAuditable.Amount`
    pub auditable_amount: MemberDescriptor,
    /// `Parcel.Amount`
    pub unrelated_amount: MemberDescriptor,
}

impl SampleHierarchy {
    pub fn new() -> Self {
        let hierarchy = Arc::new(TypeHierarchy::new());
        let builder = || TypeBuilder::new(hierarchy.clone());

        let decimal = builder().value_type("System", "Decimal").build().unwrap();
        let string = builder().class("System", "String").build().unwrap();
        let auditable = builder()
            .interface("Billing", "IAuditable")
            .property("Amount", Some(decimal))
            .build()
            .unwrap();
        let base = builder()
            .class("Billing", "Document")
            .property("Id", None)
            .property("Amount", Some(decimal))
            .build()
            .unwrap();
        let middle = builder()
            .class("Billing", "Invoice")
            .extends(base)
            .unwrap()
            .implements(auditable)
            .unwrap()
            .property("Number", Some(string))
            .build()
            .unwrap();
        let derived = builder()
            .class("Billing", "CreditNote")
            .extends(middle)
            .unwrap()
            .property("Reason", Some(string))
            .build()
            .unwrap();
        let unrelated = builder()
            .class("Shipping", "Parcel")
            .property("Amount", Some(decimal))
            .build()
            .unwrap();
        let address = builder()
            .class("Crm", "Address")
            .property("Street", Some(string))
            .property("City", Some(string))
            .build()
            .unwrap();
        let customer = builder()
            .class("Crm", "Customer")
            .property("Name", Some(string))
            .property("Address", Some(address))
            .build()
            .unwrap();

        let base_amount = hierarchy.declared_member(base, "Amount").unwrap();
        let auditable_amount = hierarchy.declared_member(auditable, "Amount").unwrap();
        let unrelated_amount = hierarchy.declared_member(unrelated, "Amount").unwrap();

        SampleHierarchy {
            hierarchy,
            decimal,
            string,
            auditable,
            base,
            middle,
            derived,
            unrelated,
            address,
            customer,
            base_amount,
            auditable_amount,
            unrelated_amount,
        }
    }

    /// A property descriptor that is not registered in the hierarchy, as if `declaring`
    /// re-declared `name` in its own slot
    pub fn redeclared(&self, declaring: TypeId, name: &str) -> MemberDescriptor {
        MemberDescriptor::new(
            Token::from_parts(MemberKind::Property.table(), 0x00FF_FF00 + declaring.value() % 0xFF),
            name,
            declaring,
            MemberKind::Property,
        )
    }
}
