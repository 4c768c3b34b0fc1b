//! Mapping definition of one type.

use tracing::debug;

use crate::{
    config::LookupConfig,
    mapping::{MemberBinding, MemberMap, MemberMapRegistry, MemberReferenceMap},
    member::MemberDescriptor,
    resolver::{AccessExpression, MemberResolver},
    typesystem::{TypeFlavor, TypeHierarchy, TypeId, TypeRelation},
    Error::RecursionLimit,
    Result,
};

/// The mapping definition of a type: which members map to which columns.
///
/// Declaring a member twice returns the association created the first time, also when the
/// second declaration goes through a derived or base type of the original one.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassMap {
    type_id: TypeId,
    member_maps: MemberMapRegistry<MemberMap>,
    reference_maps: MemberMapRegistry<MemberReferenceMap>,
}

impl ClassMap {
    /// Create an empty mapping for `type_id`
    #[must_use]
    pub fn new(type_id: TypeId) -> Self {
        Self::with_config(type_id, LookupConfig::default())
    }

    /// Create an empty mapping for `type_id` using an explicit lookup configuration
    #[must_use]
    pub fn with_config(type_id: TypeId, config: LookupConfig) -> Self {
        ClassMap {
            type_id,
            member_maps: MemberMapRegistry::with_config(config),
            reference_maps: MemberMapRegistry::with_config(config),
        }
    }

    /// The mapped type
    #[must_use]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// The single-column associations
    #[must_use]
    pub fn member_maps(&self) -> &MemberMapRegistry<MemberMap> {
        &self.member_maps
    }

    /// Mutable access to the single-column associations
    pub fn member_maps_mut(&mut self) -> &mut MemberMapRegistry<MemberMap> {
        &mut self.member_maps
    }

    /// The nested reference associations
    #[must_use]
    pub fn reference_maps(&self) -> &MemberMapRegistry<MemberReferenceMap> {
        &self.reference_maps
    }

    /// Mutable access to the nested reference associations
    pub fn reference_maps_mut(&mut self) -> &mut MemberMapRegistry<MemberReferenceMap> {
        &mut self.reference_maps
    }

    /// Map a member to a column, returning the existing association if there is one
    ///
    /// ## Arguments
    /// * 'member'   - The member to map
    /// * 'relation' - Assignability between declaring types
    ///
    /// # Errors
    /// Returns [`crate::Error::MultipleMatches`] if the registered maps are ambiguous.
    pub fn map(
        &mut self,
        member: &MemberDescriptor,
        relation: &dyn TypeRelation,
    ) -> Result<&mut MemberMap> {
        let index = find_or_add(&mut self.member_maps, member, relation, || {
            MemberMap::new(member.clone())
        })?;
        self.member_maps.get_mut(index)
    }

    /// Map the member accessed by `expression` to a column
    ///
    /// # Errors
    /// Propagates [`crate::Error::InvalidExpression`] from resolution, and returns
    /// [`crate::Error::MultipleMatches`] if the registered maps are ambiguous.
    pub fn map_expression(
        &mut self,
        expression: &AccessExpression,
        hierarchy: &TypeHierarchy,
    ) -> Result<&mut MemberMap> {
        let member = hierarchy.resolve(expression)?;
        self.map(&member, hierarchy)
    }

    /// Map a member with the class map of its value
    ///
    /// A member that is already referenced gets `mapping` as its new class map.
    ///
    /// ## Arguments
    /// * 'member'   - The referencing member
    /// * 'mapping'  - The class map of the member value
    /// * 'relation' - Assignability between declaring types
    ///
    /// # Errors
    /// Returns [`crate::Error::MultipleMatches`] if the registered maps are ambiguous.
    pub fn reference(
        &mut self,
        member: &MemberDescriptor,
        mapping: ClassMap,
        relation: &dyn TypeRelation,
    ) -> Result<&mut MemberReferenceMap> {
        let index = match self.reference_maps.position(member, relation)? {
            Some(index) => {
                self.reference_maps.get_mut(index)?.set_mapping(mapping);
                debug!(member = %member.name, created = false, "reference map replaced");
                index
            }
            None => {
                self.reference_maps
                    .add(MemberReferenceMap::new(member.clone(), mapping));
                debug!(member = %member.name, created = true, "reference map declared");
                self.reference_maps.len() - 1
            }
        };
        self.reference_maps.get_mut(index)
    }

    /// Map the member accessed by `expression` with the class map of its value
    ///
    /// # Errors
    /// Propagates [`crate::Error::InvalidExpression`] from resolution, and returns
    /// [`crate::Error::MultipleMatches`] if the registered maps are ambiguous.
    pub fn reference_expression(
        &mut self,
        expression: &AccessExpression,
        mapping: ClassMap,
        hierarchy: &TypeHierarchy,
    ) -> Result<&mut MemberReferenceMap> {
        let member = hierarchy.resolve(expression)?;
        self.reference(&member, mapping, hierarchy)
    }

    /// Map every readable instance member of the type, including inherited ones
    ///
    /// Members whose value is a class with members of its own become references with an
    /// automatically mapped class map. Self-referencing types are not followed a second
    /// time along the same path.
    ///
    /// # Errors
    /// Returns [`crate::Error::RecursionLimit`] if references nest deeper than
    /// `max_hierarchy_depth`, and propagates hierarchy and lookup errors.
    pub fn auto_map(&mut self, hierarchy: &TypeHierarchy) -> Result<()> {
        let mut parents = vec![self.type_id];
        self.auto_map_nested(hierarchy, &mut parents)
    }

    fn auto_map_nested(
        &mut self,
        hierarchy: &TypeHierarchy,
        parents: &mut Vec<TypeId>,
    ) -> Result<()> {
        let config = *self.member_maps.config();
        if parents.len() > config.max_hierarchy_depth {
            return Err(RecursionLimit(config.max_hierarchy_depth));
        }

        for member in hierarchy.all_members(self.type_id)? {
            if !member.is_readable_instance() {
                continue;
            }

            match member.member_type.and_then(|id| hierarchy.get(id)) {
                Some(value_type)
                    if value_type.flavor == TypeFlavor::Class
                        && !hierarchy.all_members(value_type.id)?.is_empty() =>
                {
                    if parents.contains(&value_type.id) {
                        debug!(member = %member.name, "circular reference skipped");
                        continue;
                    }

                    let mut nested = ClassMap::with_config(value_type.id, config);
                    parents.push(value_type.id);
                    let mapped = nested.auto_map_nested(hierarchy, parents);
                    parents.pop();
                    mapped?;

                    self.reference(&member, nested, hierarchy)?;
                }
                _ => {
                    self.map(&member, hierarchy)?;
                }
            }
        }

        Ok(())
    }

    /// Header names of all mapped columns, in declaration order
    ///
    /// Ignored members are skipped; columns of references follow the single-column maps
    /// and carry the reference prefix.
    #[must_use]
    pub fn header_names(&self) -> Vec<String> {
        let mut headers: Vec<String> = self
            .member_maps
            .iter()
            .filter(|map| !map.column.ignore)
            .map(|map| {
                map.column
                    .primary_name()
                    .unwrap_or(&map.member().name)
                    .to_string()
            })
            .collect();

        for reference in &self.reference_maps {
            let prefix = reference.get_prefix().unwrap_or_default();
            headers.extend(
                reference
                    .mapping()
                    .header_names()
                    .into_iter()
                    .map(|name| format!("{prefix}{name}")),
            );
        }

        headers
    }
}

fn find_or_add<T: MemberBinding>(
    registry: &mut MemberMapRegistry<T>,
    member: &MemberDescriptor,
    relation: &dyn TypeRelation,
    create: impl FnOnce() -> T,
) -> Result<usize> {
    if let Some(index) = registry.position(member, relation)? {
        debug!(member = %member.name, created = false, "member map reused");
        return Ok(index);
    }

    registry.add(create());
    debug!(member = %member.name, created = true, "member map declared");
    Ok(registry.len() - 1)
}
