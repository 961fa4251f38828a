//! Row selection for bulk actions.

use crate::model::EntityId;

/// Selected ids in the order they were picked.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    ids: Vec<EntityId>,
}

impl Selection {
    pub fn toggle(&mut self, id: EntityId) {
        match self.ids.iter().position(|x| *x == id) {
            Some(idx) => {
                self.ids.remove(idx);
            }
            None => self.ids.push(id),
        }
    }

    /// Select all of `all` unless every one of them is already selected, then clear.
    pub fn toggle_all(&mut self, all: &[EntityId]) {
        let everything = !all.is_empty() && all.iter().all(|id| self.contains(*id));
        self.ids = if everything { Vec::new() } else { all.to_vec() };
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.ids.contains(&id)
    }

    pub fn remove(&mut self, id: EntityId) {
        self.ids.retain(|x| *x != id);
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn ids(&self) -> &[EntityId] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_adds_then_removes() {
        let mut s = Selection::default();
        s.toggle(3);
        s.toggle(1);
        assert_eq!(s.ids(), &[3, 1]);
        s.toggle(3);
        assert_eq!(s.ids(), &[1]);
    }

    #[test]
    fn toggle_all_flips_between_everything_and_nothing() {
        let mut s = Selection::default();
        s.toggle(2);
        s.toggle_all(&[1, 2, 3]);
        assert_eq!(s.ids(), &[1, 2, 3]);
        s.toggle_all(&[1, 2, 3]);
        assert!(s.is_empty());
        s.toggle_all(&[]);
        assert!(s.is_empty());
    }
}
