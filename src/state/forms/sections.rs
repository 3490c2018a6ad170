//! Conditional section resolution
//!
//! Decides which optional groups of fields exist for a given draft. The
//! result depends only on the gating fields and the child count.

use super::draft::DraftState;
use super::field::{FieldId, MARRIED};
use std::collections::BTreeSet;

/// An optional group of fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Section {
    /// Number-of-children selector
    ChildCount,
    /// Name and birth date for one child (0-based)
    ChildDetails(usize),
}

impl Section {
    /// Fields that belong to the section
    pub fn fields(&self) -> Vec<FieldId> {
        match self {
            Self::ChildCount => vec![FieldId::ChildCount],
            Self::ChildDetails(i) => vec![FieldId::ChildName(*i), FieldId::ChildBirthDate(*i)],
        }
    }
}

/// Sections that must render and validate for `draft`
pub fn visible_sections(draft: &DraftState) -> BTreeSet<Section> {
    if draft.value(FieldId::MaritalStatus) != MARRIED {
        return BTreeSet::new();
    }

    std::iter::once(Section::ChildCount)
        .chain((0..draft.child_count()).map(Section::ChildDetails))
        .collect()
}

/// Whether `field` lives in a section that is currently visible.
/// Fields outside any conditional section are always visible.
pub fn is_field_visible(draft: &DraftState, field: FieldId) -> bool {
    let sections = visible_sections(draft);
    match field.child_index() {
        Some(i) => sections.contains(&Section::ChildDetails(i)),
        None if field == FieldId::ChildCount => sections.contains(&Section::ChildCount),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn married_with(count: usize) -> DraftState {
        let mut draft = DraftState::new();
        draft.set_field(FieldId::MaritalStatus, MARRIED);
        draft.set_conditional_count(count);
        draft
    }

    #[test]
    fn test_married_with_two_children() {
        let draft = married_with(2);
        let expected: BTreeSet<Section> = [
            Section::ChildCount,
            Section::ChildDetails(0),
            Section::ChildDetails(1),
        ]
        .into_iter()
        .collect();
        assert_eq!(visible_sections(&draft), expected);
    }

    #[test]
    fn test_not_married_hides_children_regardless_of_count() {
        let mut draft = married_with(3);
        draft.set_field(FieldId::MaritalStatus, "Divorcé(e)");
        assert!(visible_sections(&draft).is_empty());
        assert!(!is_field_visible(&draft, FieldId::ChildName(0)));
        assert!(!is_field_visible(&draft, FieldId::ChildCount));
    }

    #[test]
    fn test_married_with_zero_children_shows_only_selector() {
        let draft = married_with(0);
        let expected: BTreeSet<Section> = [Section::ChildCount].into_iter().collect();
        assert_eq!(visible_sections(&draft), expected);
    }

    #[test]
    fn test_no_memory_of_past_visibility() {
        let mut draft = married_with(2);
        draft.set_field(FieldId::MaritalStatus, "Célibataire");
        draft.set_field(FieldId::MaritalStatus, MARRIED);
        assert_eq!(visible_sections(&draft), visible_sections(&married_with(2)));
    }

    #[test]
    fn test_unconditional_fields_always_visible() {
        let draft = DraftState::new();
        assert!(is_field_visible(&draft, FieldId::Email));
        assert!(is_field_visible(&draft, FieldId::Terms));
    }

    #[test]
    fn test_section_fields() {
        assert_eq!(
            Section::ChildDetails(1).fields(),
            vec![FieldId::ChildName(1), FieldId::ChildBirthDate(1)]
        );
    }
}
