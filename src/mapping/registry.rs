//! Ordered registry of member maps with structural member lookup.
//!
//! [`MemberMapRegistry`] holds the associations of one mapping definition in insertion
//! order. Besides the usual sequence operations it answers one question: which
//! association, if any, belongs to a given member.
//!
//! # Matching Rule
//!
//! A registered member `m` matches a queried member `q` when
//!
//! 1. `m` and `q` are the identical member (same slot on the same declaring type), or
//! 2. under [`MatchMode::Structural`], `m.name == q.name` and either declaring type is
//!    assignable from the other.
//!
//! The second rule lets a lookup through a derived type find the association registered
//! for the base type member, and the other way around. Because it is many-to-one, a lookup
//! that matches more than one association fails with [`crate::Error::MultipleMatches`]
//! instead of picking one.
//!
//! # Examples
//!
//! ```rust
//! use std::sync::Arc;
//! use memberscope::{
//!     mapping::{MemberMap, MemberMapRegistry},
//!     resolver::AccessExpression,
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
//! let amount = hierarchy.declared_member(base, "Amount").unwrap();
//! let mut registry = MemberMapRegistry::new();
//! registry.add(MemberMap::new(amount));
//!
//! let expression = AccessExpression::parameter(derived).member("Amount");
//! let found = registry.find_expression(&expression, hierarchy.as_ref(), hierarchy.as_ref())?;
//! assert!(found.is_some());
//! # Ok::<(), memberscope::Error>(())
//! ```

use std::ops::Index;

use tracing::trace;

use crate::{
    config::{LookupConfig, MatchMode},
    mapping::MemberBinding,
    member::MemberDescriptor,
    resolver::{AccessExpression, MemberResolver},
    typesystem::TypeRelation,
    Error::{IndexOutOfRange, MultipleMatches, NullReference},
    Result,
};

/// An ordered, mutable collection of member associations
///
/// Insertion order is preserved and the same association may be added more than once;
/// uniqueness is the caller's concern. Valid indices are always `0..len()`.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberMapRegistry<T> {
    items: Vec<T>,
    config: LookupConfig,
}

impl<T> MemberMapRegistry<T> {
    /// Create an empty registry with the default lookup configuration
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(LookupConfig::default())
    }

    /// Create an empty registry with an explicit lookup configuration
    #[must_use]
    pub fn with_config(config: LookupConfig) -> Self {
        MemberMapRegistry {
            items: Vec::new(),
            config,
        }
    }

    /// The lookup configuration
    #[must_use]
    pub fn config(&self) -> &LookupConfig {
        &self.config
    }

    /// Number of associations
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if the registry holds no association
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The association at `index`
    ///
    /// # Errors
    /// Returns [`crate::Error::IndexOutOfRange`] if `index >= len()`.
    pub fn get(&self, index: usize) -> Result<&T> {
        let len = self.items.len();
        self.items.get(index).ok_or(IndexOutOfRange { index, len })
    }

    /// Mutable access to the association at `index`
    ///
    /// # Errors
    /// Returns [`crate::Error::IndexOutOfRange`] if `index >= len()`.
    pub fn get_mut(&mut self, index: usize) -> Result<&mut T> {
        let len = self.items.len();
        self.items.get_mut(index).ok_or(IndexOutOfRange { index, len })
    }

    /// Replace the association at `index`, returning the previous one
    ///
    /// # Errors
    /// Returns [`crate::Error::IndexOutOfRange`] if `index >= len()`.
    pub fn set(&mut self, index: usize, item: T) -> Result<T> {
        let slot = self.get_mut(index)?;
        Ok(std::mem::replace(slot, item))
    }

    /// Append an association
    pub fn add(&mut self, item: T) {
        self.items.push(item);
        trace!(len = self.items.len(), "member map added");
    }

    /// Insert an association at `index`, shifting later ones to the right
    ///
    /// `index == len()` appends.
    ///
    /// # Errors
    /// Returns [`crate::Error::IndexOutOfRange`] if `index > len()`.
    pub fn insert(&mut self, index: usize, item: T) -> Result<()> {
        let len = self.items.len();
        if index > len {
            return Err(IndexOutOfRange { index, len });
        }

        self.items.insert(index, item);
        trace!(index, len = self.items.len(), "member map inserted");
        Ok(())
    }

    /// Remove the association at `index`, shifting later ones to the left
    ///
    /// # Errors
    /// Returns [`crate::Error::IndexOutOfRange`] if `index >= len()`.
    pub fn remove_at(&mut self, index: usize) -> Result<T> {
        let len = self.items.len();
        if index >= len {
            return Err(IndexOutOfRange { index, len });
        }

        let removed = self.items.remove(index);
        trace!(index, len = self.items.len(), "member map removed");
        Ok(removed)
    }

    /// Remove all associations
    pub fn clear(&mut self) {
        self.items.clear();
        trace!("member maps cleared");
    }

    /// Iterate over the associations in order
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// The associations as a slice
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// Copy all associations into `destination`, starting at `offset`
    ///
    /// # Errors
    /// Returns [`crate::Error::NullReference`] if `destination` is absent, and
    /// [`crate::Error::InvalidArgument`] if it has fewer than `len()` slots from `offset`.
    pub fn copy_to(&self, destination: Option<&mut [T]>, offset: usize) -> Result<()>
    where
        T: Clone,
    {
        let Some(destination) = destination else {
            return Err(NullReference("destination"));
        };

        let available = destination.len().saturating_sub(offset);
        if offset > destination.len() || available < self.items.len() {
            return Err(invalid_argument!(
                "destination of length {} cannot hold {} member maps from offset {}",
                destination.len(),
                self.items.len(),
                offset
            ));
        }

        destination[offset..offset + self.items.len()].clone_from_slice(&self.items);
        Ok(())
    }
}

impl<T: PartialEq> MemberMapRegistry<T> {
    /// Returns true if an equal association is registered
    #[must_use]
    pub fn contains(&self, item: &T) -> bool {
        self.items.contains(item)
    }

    /// Position of the first equal association, `None` if there is none
    #[must_use]
    pub fn index_of(&self, item: &T) -> Option<usize> {
        self.items.iter().position(|candidate| candidate == item)
    }

    /// Remove the first equal association, returning whether one was removed
    pub fn remove(&mut self, item: &T) -> bool {
        match self.index_of(item) {
            Some(index) => {
                self.items.remove(index);
                trace!(index, len = self.items.len(), "member map removed");
                true
            }
            None => false,
        }
    }
}

impl<T: MemberBinding> MemberMapRegistry<T> {
    /// Position of the association matching `member`
    ///
    /// ## Arguments
    /// * 'member'   - The member to look up
    /// * 'relation' - Assignability between declaring types
    ///
    /// # Errors
    /// Returns [`crate::Error::MultipleMatches`] if more than one association matches.
    pub fn position(
        &self,
        member: &MemberDescriptor,
        relation: &dyn TypeRelation,
    ) -> Result<Option<usize>> {
        let mut matches = self
            .items
            .iter()
            .enumerate()
            .filter(|(_, item)| self.matches(item.member(), member, relation))
            .map(|(index, _)| index);

        let Some(first) = matches.next() else {
            return Ok(None);
        };

        let others = matches.count();
        if others > 0 {
            return Err(MultipleMatches {
                member: member.name.clone(),
                count: others + 1,
            });
        }

        Ok(Some(first))
    }

    /// The association matching `member`, `None` if there is none
    ///
    /// ## Arguments
    /// * 'member'   - The member to look up
    /// * 'relation' - Assignability between declaring types
    ///
    /// # Errors
    /// Returns [`crate::Error::MultipleMatches`] if more than one association matches.
    pub fn find(
        &self,
        member: &MemberDescriptor,
        relation: &dyn TypeRelation,
    ) -> Result<Option<&T>> {
        Ok(self
            .position(member, relation)?
            .map(|index| &self.items[index]))
    }

    /// Mutable access to the association matching `member`
    ///
    /// # Errors
    /// Returns [`crate::Error::MultipleMatches`] if more than one association matches.
    pub fn find_mut(
        &mut self,
        member: &MemberDescriptor,
        relation: &dyn TypeRelation,
    ) -> Result<Option<&mut T>> {
        Ok(self
            .position(member, relation)?
            .map(|index| &mut self.items[index]))
    }

    /// The association matching the member accessed by `expression`
    ///
    /// ## Arguments
    /// * 'expression' - The member-access expression
    /// * 'resolver'   - Resolves the expression to a member
    /// * 'relation'   - Assignability between declaring types
    ///
    /// # Errors
    /// Propagates [`crate::Error::InvalidExpression`] from the resolver, and returns
    /// [`crate::Error::MultipleMatches`] if more than one association matches.
    pub fn find_expression(
        &self,
        expression: &AccessExpression,
        resolver: &dyn MemberResolver,
        relation: &dyn TypeRelation,
    ) -> Result<Option<&T>> {
        let member = resolver.resolve(expression)?;
        self.find(&member, relation)
    }

    fn matches(
        &self,
        candidate: &MemberDescriptor,
        query: &MemberDescriptor,
        relation: &dyn TypeRelation,
    ) -> bool {
        if candidate.is_identical(query) {
            return true;
        }

        self.config.match_mode == MatchMode::Structural
            && candidate.name == query.name
            && (relation.is_assignable_from(candidate.declaring_type, query.declaring_type)
                || relation.is_assignable_from(query.declaring_type, candidate.declaring_type))
    }
}

impl<T> Default for MemberMapRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Index<usize> for MemberMapRegistry<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.items[index]
    }
}

impl<T> Extend<T> for MemberMapRegistry<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.items.extend(iter);
        trace!(len = self.items.len(), "member maps extended");
    }
}

impl<T> FromIterator<T> for MemberMapRegistry<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut registry = Self::new();
        registry.extend(iter);
        registry
    }
}

impl<'a, T> IntoIterator for &'a MemberMapRegistry<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<T> IntoIterator for MemberMapRegistry<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{mapping::MemberMap, test::factories::SampleHierarchy, Error};

    fn registry_of(members: &[&MemberDescriptor]) -> MemberMapRegistry<MemberMap> {
        members
            .iter()
            .map(|member| MemberMap::new((*member).clone()))
            .collect()
    }

    fn names(registry: &MemberMapRegistry<MemberMap>) -> Vec<String> {
        registry
            .iter()
            .map(|map| map.column.primary_name().unwrap_or_default().to_string())
            .collect()
    }

    fn named(name: &str, sample: &SampleHierarchy) -> MemberMap {
        let mut map = MemberMap::new(sample.base_amount.clone());
        map.name(&[name]);
        map
    }

    #[test]
    fn test_add_and_count() {
        let sample = SampleHierarchy::new();
        let mut registry = MemberMapRegistry::new();
        assert!(registry.is_empty());

        let a = named("a", &sample);
        let b = named("b", &sample);
        registry.add(a.clone());
        registry.add(b.clone());
        registry.add(a.clone());
        assert_eq!(registry.len(), 3);
        assert_eq!(names(&registry), vec!["a", "b", "a"]);

        assert!(registry.remove(&a));
        assert_eq!(registry.len(), 2);
        assert_eq!(names(&registry), vec!["b", "a"]);

        assert!(registry.remove(&a));
        assert!(!registry.remove(&a));
        assert_eq!(registry.len(), 1);

        registry.clear();
        assert_eq!(registry.len(), 0);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_get_set_bounds() {
        let sample = SampleHierarchy::new();
        let mut registry: MemberMapRegistry<MemberMap> =
            [named("a", &sample), named("b", &sample)].into_iter().collect();

        assert_eq!(registry.get(1).unwrap().column.primary_name(), Some("b"));
        assert_eq!(registry[0].column.primary_name(), Some("a"));
        assert!(matches!(
            registry.get(2),
            Err(Error::IndexOutOfRange { index: 2, len: 2 })
        ));

        let previous = registry.set(1, named("c", &sample)).unwrap();
        assert_eq!(previous.column.primary_name(), Some("b"));
        assert_eq!(names(&registry), vec!["a", "c"]);
        assert!(matches!(
            registry.set(5, named("d", &sample)),
            Err(Error::IndexOutOfRange { index: 5, len: 2 })
        ));

        registry.get_mut(0).unwrap().optional();
        assert!(registry[0].column.optional);
        assert!(registry.get_mut(9).is_err());
    }

    #[test]
    fn test_insert_and_remove_at() {
        let sample = SampleHierarchy::new();
        let mut registry: MemberMapRegistry<MemberMap> =
            [named("a", &sample), named("b", &sample)].into_iter().collect();

        for (index, name) in [(0, "x"), (3, "y"), (2, "z")] {
            registry.insert(index, named(name, &sample)).unwrap();
            assert_eq!(registry.get(index).unwrap().column.primary_name(), Some(name));
        }
        assert_eq!(names(&registry), vec!["x", "a", "z", "b", "y"]);

        assert!(matches!(
            registry.insert(6, named("w", &sample)),
            Err(Error::IndexOutOfRange { index: 6, len: 5 })
        ));

        let removed = registry.remove_at(1).unwrap();
        assert_eq!(removed.column.primary_name(), Some("a"));
        assert_eq!(registry.len(), 4);
        assert_eq!(names(&registry), vec!["x", "z", "b", "y"]);

        assert!(matches!(
            registry.remove_at(4),
            Err(Error::IndexOutOfRange { index: 4, len: 4 })
        ));
        assert_eq!(registry.len(), 4);
    }

    #[test]
    fn test_contains_and_index_of() {
        let sample = SampleHierarchy::new();
        let a = named("a", &sample);
        let b = named("b", &sample);
        let missing = named("missing", &sample);
        let registry: MemberMapRegistry<MemberMap> =
            [a.clone(), b.clone(), a.clone()].into_iter().collect();

        assert_eq!(registry.index_of(&a), Some(0));
        assert_eq!(registry.index_of(&b), Some(1));
        assert_eq!(registry.index_of(&missing), None);

        for item in [&a, &b, &missing] {
            assert_eq!(registry.index_of(item).is_none(), !registry.contains(item));
        }
    }

    #[test]
    fn test_copy_to() {
        let sample = SampleHierarchy::new();
        let registry: MemberMapRegistry<MemberMap> =
            [named("a", &sample), named("b", &sample)].into_iter().collect();

        let mut destination = vec![named("-", &sample); 4];
        registry.copy_to(Some(destination.as_mut_slice()), 1).unwrap();
        let copied: Vec<_> = destination
            .iter()
            .map(|map| map.column.primary_name().unwrap())
            .collect();
        assert_eq!(copied, vec!["-", "a", "b", "-"]);

        assert!(matches!(
            registry.copy_to(None, 0),
            Err(Error::NullReference("destination"))
        ));
        assert!(matches!(
            registry.copy_to(Some(destination.as_mut_slice()), 3),
            Err(Error::InvalidArgument { .. })
        ));
        assert!(matches!(
            registry.copy_to(Some(destination.as_mut_slice()), 7),
            Err(Error::InvalidArgument { .. })
        ));

        let empty: MemberMapRegistry<MemberMap> = MemberMapRegistry::new();
        empty.copy_to(Some(destination.as_mut_slice()), 4).unwrap();
    }

    #[test]
    fn test_enumeration_is_restartable() {
        let sample = SampleHierarchy::new();
        let registry: MemberMapRegistry<MemberMap> =
            [named("a", &sample), named("b", &sample)].into_iter().collect();

        let first: Vec<_> = registry.iter().collect();
        let second: Vec<_> = (&registry).into_iter().collect();
        assert_eq!(first, second);
        assert_eq!(registry.as_slice().len(), 2);

        let owned: Vec<MemberMap> = registry.into_iter().collect();
        assert_eq!(owned.len(), 2);
    }

    #[test]
    fn test_find_exact() {
        let sample = SampleHierarchy::new();
        let registry = registry_of(&[&sample.base_amount]);

        let found = registry
            .find(&sample.base_amount, sample.hierarchy.as_ref())
            .unwrap()
            .unwrap();
        assert_eq!(found.member(), &sample.base_amount);
    }

    #[test]
    fn test_find_structural_both_directions() {
        let sample = SampleHierarchy::new();
        let relation = sample.hierarchy.as_ref();

        let registered_on_base = registry_of(&[&sample.base_amount]);
        let derived_query = sample.redeclared(sample.derived, "Amount");
        let found = registered_on_base.find(&derived_query, relation).unwrap();
        assert_eq!(found.unwrap().member(), &sample.base_amount);

        let derived_amount = sample.redeclared(sample.derived, "Amount");
        let registered_on_derived = registry_of(&[&derived_amount]);
        let found = registered_on_derived
            .find(&sample.base_amount, relation)
            .unwrap();
        assert_eq!(found.unwrap().member(), &derived_amount);
    }

    #[test]
    fn test_find_no_match() {
        let sample = SampleHierarchy::new();
        let relation = sample.hierarchy.as_ref();
        let registry = registry_of(&[&sample.unrelated_amount]);

        assert!(registry.find(&sample.base_amount, relation).unwrap().is_none());

        let other_name = sample.redeclared(sample.unrelated, "Weight");
        assert!(registry.find(&other_name, relation).unwrap().is_none());

        let empty: MemberMapRegistry<MemberMap> = MemberMapRegistry::new();
        assert!(empty.find(&sample.base_amount, relation).unwrap().is_none());
    }

    #[test]
    fn test_find_ambiguous() {
        let sample = SampleHierarchy::new();
        let relation = sample.hierarchy.as_ref();

        // Invoice derives from Document and implements IAuditable, both declare Amount.
        let registry = registry_of(&[&sample.base_amount, &sample.auditable_amount]);
        let query = sample.redeclared(sample.middle, "Amount");

        assert!(matches!(
            registry.find(&query, relation),
            Err(Error::MultipleMatches { ref member, count: 2 }) if member == "Amount"
        ));

        // Unrelated types on their own never collide.
        assert!(registry
            .find(&sample.unrelated_amount, relation)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_find_ambiguous_along_base_chain() {
        let sample = SampleHierarchy::new();
        let derived_amount = sample.redeclared(sample.derived, "Amount");
        let registry = registry_of(&[&sample.base_amount, &derived_amount]);
        let query = sample.redeclared(sample.middle, "Amount");

        assert!(matches!(
            registry.find(&query, sample.hierarchy.as_ref()),
            Err(Error::MultipleMatches { count: 2, .. })
        ));
    }

    #[test]
    fn test_find_duplicates_are_ambiguous() {
        let sample = SampleHierarchy::new();
        let registry = registry_of(&[&sample.base_amount, &sample.base_amount]);

        assert!(matches!(
            registry.find(&sample.base_amount, sample.hierarchy.as_ref()),
            Err(Error::MultipleMatches { count: 2, .. })
        ));
    }

    #[test]
    fn test_find_exact_mode() {
        let sample = SampleHierarchy::new();
        let mut registry = MemberMapRegistry::with_config(LookupConfig::exact());
        registry.add(MemberMap::new(sample.base_amount.clone()));
        let relation = sample.hierarchy.as_ref();

        assert!(registry.find(&sample.base_amount, relation).unwrap().is_some());
        let derived_query = sample.redeclared(sample.derived, "Amount");
        assert!(registry.find(&derived_query, relation).unwrap().is_none());
    }

    #[test]
    fn test_find_expression() {
        let sample = SampleHierarchy::new();
        let hierarchy = sample.hierarchy.as_ref();
        let registry = registry_of(&[&sample.base_amount]);

        let through_derived = AccessExpression::parameter(sample.derived).member("Amount");
        let found = registry
            .find_expression(&through_derived, hierarchy, hierarchy)
            .unwrap();
        assert_eq!(found.unwrap().member(), &sample.base_amount);

        let invalid = AccessExpression::parameter(sample.derived);
        assert!(matches!(
            registry.find_expression(&invalid, hierarchy, hierarchy),
            Err(Error::InvalidExpression(_))
        ));
    }

    #[test]
    fn test_find_is_read_only() {
        let sample = SampleHierarchy::new();
        let registry = registry_of(&[&sample.base_amount, &sample.unrelated_amount]);
        let before = registry.clone();

        let _ = registry.find(&sample.base_amount, sample.hierarchy.as_ref());
        let _ = registry.find(&sample.auditable_amount, sample.hierarchy.as_ref());
        assert_eq!(registry, before);
    }

    #[test]
    fn test_find_mut_and_position() {
        let sample = SampleHierarchy::new();
        let mut registry = registry_of(&[&sample.unrelated_amount, &sample.base_amount]);
        let relation = sample.hierarchy.as_ref();

        assert_eq!(registry.position(&sample.base_amount, relation).unwrap(), Some(1));
        registry
            .find_mut(&sample.base_amount, relation)
            .unwrap()
            .unwrap()
            .index(3);
        assert_eq!(registry[1].column.index, Some(3));
        assert_eq!(registry[0].column.index, None);
    }

    #[test]
    fn test_closure_relation() {
        let sample = SampleHierarchy::new();
        let registry = registry_of(&[&sample.unrelated_amount]);
        let everything_related = |_: crate::typesystem::TypeId, _: crate::typesystem::TypeId| true;

        let found = registry
            .find(&sample.base_amount, &everything_related)
            .unwrap();
        assert!(found.is_some());
    }
}
