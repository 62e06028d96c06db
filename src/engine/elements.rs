//! Insertion-ordered element set with replace-by-id merging

use std::collections::HashMap;

use crate::model::VisualElement;

/// Visual elements keyed by id, in first-seen order
///
/// Upserting an id that is already present replaces the element in its
/// original slot; new ids are appended. Merging is linear in the number of
/// incoming elements.
#[derive(Debug, Clone, Default)]
pub struct ElementSet {
    slots: HashMap<String, usize>,
    elements: Vec<VisualElement>,
}

impl ElementSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from elements, later duplicates replacing earlier ones
    pub fn from_elements<'a>(elements: impl IntoIterator<Item = &'a VisualElement>) -> Self {
        let mut set = Self::new();
        set.merge(elements);
        set
    }

    /// Insert an element, or replace the one with the same id in place
    pub fn upsert(&mut self, element: VisualElement) {
        match self.slots.get(&element.id) {
            Some(&slot) => self.elements[slot] = element,
            None => {
                self.slots.insert(element.id.clone(), self.elements.len());
                self.elements.push(element);
            }
        }
    }

    /// Upsert every element in order
    pub fn merge<'a>(&mut self, elements: impl IntoIterator<Item = &'a VisualElement>) {
        for element in elements {
            self.upsert(element.clone());
        }
    }

    /// Look up an element by id
    pub fn get(&self, id: &str) -> Option<&VisualElement> {
        self.slots.get(id).map(|&slot| &self.elements[slot])
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Iterate in first-seen order
    pub fn iter(&self) -> impl Iterator<Item = &VisualElement> {
        self.elements.iter()
    }

    /// Take the ordered elements
    pub fn into_vec(self) -> Vec<VisualElement> {
        self.elements
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn el(id: &str, content: &str) -> VisualElement {
        VisualElement::new(id, "div", content)
    }

    #[test]
    fn new_ids_append_in_order() {
        let mut set = ElementSet::new();
        set.upsert(el("a", "1"));
        set.upsert(el("b", "2"));
        set.upsert(el("c", "3"));
        let ids: Vec<_> = set.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["a", "b", "c"]);
    }

    #[test]
    fn existing_id_is_replaced_in_place() {
        let mut set = ElementSet::from_elements(&[el("a", "X"), el("b", "B")]);
        set.upsert(el("a", "Y"));

        assert_eq!(set.len(), 2);
        let elements = set.into_vec();
        assert_eq!(elements[0].id, "a");
        assert_eq!(elements[0].content, "Y");
        assert_eq!(elements[1].id, "b");
    }

    #[test]
    fn duplicates_within_one_merge_collapse() {
        let set = ElementSet::from_elements(&[el("a", "1"), el("a", "2")]);
        assert_eq!(set.len(), 1);
        assert_eq!(set.get("a").map(|e| e.content.as_str()), Some("2"));
    }

    #[test]
    fn empty_set() {
        let set = ElementSet::new();
        assert!(set.is_empty());
        assert!(set.get("a").is_none());
    }

    mod props {
        use proptest::prelude::*;

        use super::*;

        proptest! {
            #[test]
            fn ids_stay_unique_and_keep_first_position(
                ids in proptest::collection::vec(0u8..8, 0..40),
            ) {
                let mut set = ElementSet::new();
                for (n, id) in ids.iter().enumerate() {
                    set.upsert(el(&format!("e{id}"), &n.to_string()));
                }

                let got: Vec<String> = set.iter().map(|e| e.id.clone()).collect();
                let mut first_seen: Vec<String> = Vec::new();
                for id in &ids {
                    let id = format!("e{id}");
                    if !first_seen.contains(&id) {
                        first_seen.push(id);
                    }
                }
                prop_assert_eq!(&got, &first_seen);

                // Each id holds the content of its last write
                for id in &first_seen {
                    let last = ids.iter().rposition(|i| &format!("e{i}") == id).unwrap();
                    prop_assert_eq!(set.get(id).map(|e| e.content.clone()), Some(last.to_string()));
                }
            }
        }
    }
}
