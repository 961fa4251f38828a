//! One entity screen: a store plus the table state around it.
//!
//! `EntityScreen` ties the store, the list query, the selection and the
//! search debouncer together so the terminal app (and tests) drive a whole
//! screen through one value. Mutations go through [`crate::handlers`]; after
//! each change the current page is clamped to the last valid one.

use std::time::Instant;

use crate::debounce::Debouncer;
use crate::error::Result;
use crate::handlers;
use crate::listview::{self, DerivedPage, ListQuery};
use crate::model::{Column, Entity, EntityId, EntityKind};
use crate::notify::Notifier;
use crate::selection::Selection;
use crate::store::EntityStore;

#[derive(Clone, Debug)]
pub struct EntityScreen<T: Entity> {
    store: EntityStore<T>,
    query: ListQuery<T::Column>,
    selection: Selection,
    search: Debouncer,
    /// Highlighted row within the current page.
    cursor: usize,
}

impl<T: Entity> EntityScreen<T> {
    pub fn new(seed: Vec<T>) -> Self {
        Self {
            store: EntityStore::new(seed),
            query: ListQuery::new(T::ID_COLUMN),
            selection: Selection::default(),
            search: Debouncer::default(),
            cursor: 0,
        }
    }

    pub fn store(&self) -> &EntityStore<T> {
        &self.store
    }

    pub fn query(&self) -> &ListQuery<T::Column> {
        &self.query
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn search_input(&self) -> &str {
        self.search.input()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn view(&self) -> DerivedPage<'_, T> {
        listview::derive(self.store.list(), &self.query)
    }

    /// Entity under the cursor on the current page.
    pub fn highlighted(&self) -> Option<&T> {
        self.view().rows.get(self.cursor).copied()
    }

    /// Filter values offered by the filter menu.
    pub fn categories(&self) -> Vec<String> {
        listview::categories(self.store.list())
    }

    fn settle(&mut self) {
        let total = listview::filter_and_sort(self.store.list(), &self.query).len();
        let pages = listview::page_count(total);
        self.query.page = listview::clamp_page(self.query.page, pages);
        let on_page = total.saturating_sub((self.query.page - 1) * listview::PAGE_SIZE);
        let rows = on_page.min(listview::PAGE_SIZE);
        self.cursor = self.cursor.min(rows.saturating_sub(1));
    }

    // -- search / filter / sort / paging --

    pub fn type_search(&mut self, c: char, now: Instant) {
        self.search.push(c, now);
    }

    pub fn erase_search(&mut self, now: Instant) {
        self.search.pop(now);
    }

    pub fn set_search_input(&mut self, input: &str, now: Instant) {
        self.search.set(input, now);
    }

    /// Apply a debounced search term once its delay has passed. Returns true if applied.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.search.poll(now) {
            Some(term) => {
                self.apply_search(term);
                true
            }
            None => false,
        }
    }

    pub fn commit_search(&mut self) {
        let term = self.search.flush();
        self.apply_search(term);
    }

    pub fn clear_search(&mut self) {
        self.search.clear();
        self.apply_search(String::new());
    }

    fn apply_search(&mut self, term: String) {
        self.query.search = term;
        self.settle();
    }

    pub fn set_filter(&mut self, filter: Option<String>) {
        self.query.filter = filter.filter(|f| !f.is_empty());
        self.settle();
    }

    pub fn sort_by(&mut self, column: T::Column) {
        self.query.sort.toggle(column);
        self.settle();
    }

    /// Move the sort to the next sortable column, starting ascending.
    pub fn sort_next_column(&mut self) {
        let cols = T::COLUMNS;
        let at = cols.iter().position(|c| *c == self.query.sort.key).unwrap_or(0);
        let next = (1..=cols.len())
            .map(|step| cols[(at + step) % cols.len()])
            .find(|c| c.sortable());
        if let Some(col) = next {
            self.sort_by(col);
        }
    }

    /// Flip the direction of the current sort column.
    pub fn reverse_sort(&mut self) {
        let key = self.query.sort.key;
        self.sort_by(key);
    }

    pub fn goto_page(&mut self, page: usize) {
        self.query.page = page;
        self.cursor = 0;
        self.settle();
    }

    pub fn next_page(&mut self) {
        self.goto_page(self.query.page + 1);
    }

    pub fn prev_page(&mut self) {
        self.goto_page(self.query.page.saturating_sub(1));
    }

    pub fn cursor_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn cursor_down(&mut self) {
        self.cursor += 1;
        self.settle();
    }

    // -- selection --

    pub fn toggle_row(&mut self, id: EntityId) {
        self.selection.toggle(id);
    }

    pub fn toggle_highlighted(&mut self) {
        if let Some(id) = self.highlighted().map(Entity::id) {
            self.toggle_row(id);
        }
    }

    pub fn toggle_all(&mut self) {
        let ids = self.store.ids();
        self.selection.toggle_all(&ids);
    }

    // -- mutations --

    pub fn add(&mut self, draft: T::Draft, notifier: &mut dyn Notifier) -> Result<EntityId> {
        let id = handlers::add(&mut self.store, draft, notifier)?;
        self.settle();
        Ok(id)
    }

    pub fn edit(&mut self, entity: T, notifier: &mut dyn Notifier) -> Result<bool> {
        let applied = handlers::edit(&mut self.store, entity, notifier)?;
        self.settle();
        Ok(applied)
    }

    pub fn delete(&mut self, id: EntityId, notifier: &mut dyn Notifier) -> bool {
        let removed = handlers::delete(&mut self.store, &mut self.selection, id, notifier);
        self.settle();
        removed
    }

    pub fn bulk_delete(&mut self, notifier: &mut dyn Notifier) -> Result<usize> {
        let removed = handlers::bulk_delete(&mut self.store, &mut self.selection, notifier)?;
        self.settle();
        Ok(removed)
    }

    /// Back to the seed data with a fresh table state.
    pub fn reload(&mut self) {
        self.store.reset();
        self.query = ListQuery::new(T::ID_COLUMN);
        self.selection.clear();
        self.search.clear();
        self.cursor = 0;
    }
}

/// One table row prepared for display.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RowView {
    pub id: EntityId,
    pub checked: bool,
    pub cells: Vec<String>,
}

/// Entity-agnostic view of a screen, so a front end can drive whichever
/// screen is active without knowing its entity type.
pub trait ScreenOps {
    fn kind(&self) -> EntityKind;
    /// Column headers, the active sort column carrying its direction arrow.
    fn headers(&self) -> Vec<String>;
    fn rows(&self) -> Vec<RowView>;
    /// `(page, page_count, total)` of the current view.
    fn pager(&self) -> (usize, usize, usize);
    fn cursor(&self) -> usize;
    fn highlighted_id(&self) -> Option<EntityId>;
    fn selected(&self) -> usize;
    fn search_input(&self) -> &str;
    fn filter(&self) -> Option<&str>;
    fn categories(&self) -> Vec<String>;

    fn type_search(&mut self, c: char, now: Instant);
    fn erase_search(&mut self, now: Instant);
    fn commit_search(&mut self);
    fn clear_search(&mut self);
    fn tick(&mut self, now: Instant) -> bool;
    fn set_filter(&mut self, filter: Option<String>);
    fn sort_next_column(&mut self);
    fn reverse_sort(&mut self);
    fn next_page(&mut self);
    fn prev_page(&mut self);
    fn cursor_up(&mut self);
    fn cursor_down(&mut self);
    fn toggle_highlighted(&mut self);
    fn toggle_all(&mut self);
    fn delete(&mut self, id: EntityId, notifier: &mut dyn Notifier) -> bool;
    fn bulk_delete(&mut self, notifier: &mut dyn Notifier) -> Result<usize>;
    fn reload(&mut self);
}

impl<T: Entity> ScreenOps for EntityScreen<T> {
    fn kind(&self) -> EntityKind {
        T::KIND
    }

    fn headers(&self) -> Vec<String> {
        let sort = self.query.sort;
        T::COLUMNS
            .iter()
            .map(|c| {
                if *c == sort.key {
                    format!("{} {}", c.label(), sort.direction.arrow())
                } else {
                    c.label().to_string()
                }
            })
            .collect()
    }

    fn rows(&self) -> Vec<RowView> {
        self.view()
            .rows
            .into_iter()
            .map(|e| RowView {
                id: e.id(),
                checked: self.selection.contains(e.id()),
                cells: T::COLUMNS.iter().map(|c| e.cell(*c)).collect(),
            })
            .collect()
    }

    fn pager(&self) -> (usize, usize, usize) {
        let v = self.view();
        (v.page, v.page_count, v.total)
    }

    fn cursor(&self) -> usize {
        self.cursor
    }

    fn highlighted_id(&self) -> Option<EntityId> {
        self.highlighted().map(Entity::id)
    }

    fn selected(&self) -> usize {
        self.selection.len()
    }

    fn search_input(&self) -> &str {
        self.search.input()
    }

    fn filter(&self) -> Option<&str> {
        self.query.filter.as_deref()
    }

    fn categories(&self) -> Vec<String> {
        EntityScreen::categories(self)
    }

    fn type_search(&mut self, c: char, now: Instant) {
        EntityScreen::type_search(self, c, now)
    }

    fn erase_search(&mut self, now: Instant) {
        EntityScreen::erase_search(self, now)
    }

    fn commit_search(&mut self) {
        EntityScreen::commit_search(self)
    }

    fn clear_search(&mut self) {
        EntityScreen::clear_search(self)
    }

    fn tick(&mut self, now: Instant) -> bool {
        EntityScreen::tick(self, now)
    }

    fn set_filter(&mut self, filter: Option<String>) {
        EntityScreen::set_filter(self, filter)
    }

    fn sort_next_column(&mut self) {
        EntityScreen::sort_next_column(self)
    }

    fn reverse_sort(&mut self) {
        EntityScreen::reverse_sort(self)
    }

    fn next_page(&mut self) {
        EntityScreen::next_page(self)
    }

    fn prev_page(&mut self) {
        EntityScreen::prev_page(self)
    }

    fn cursor_up(&mut self) {
        EntityScreen::cursor_up(self)
    }

    fn cursor_down(&mut self) {
        EntityScreen::cursor_down(self)
    }

    fn toggle_highlighted(&mut self) {
        EntityScreen::toggle_highlighted(self)
    }

    fn toggle_all(&mut self) {
        EntityScreen::toggle_all(self)
    }

    fn delete(&mut self, id: EntityId, notifier: &mut dyn Notifier) -> bool {
        EntityScreen::delete(self, id, notifier)
    }

    fn bulk_delete(&mut self, notifier: &mut dyn Notifier) -> Result<usize> {
        EntityScreen::bulk_delete(self, notifier)
    }

    fn reload(&mut self) {
        EntityScreen::reload(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Permission, PermissionColumn};
    use crate::notify::PreparedNotifier;
    use std::time::Duration;

    fn screen(n: u64) -> EntityScreen<Permission> {
        EntityScreen::new(
            (1..=n)
                .map(|id| Permission {
                    id,
                    name: format!("perm-{id:02}"),
                    description: if id % 2 == 0 { "even".into() } else { "odd".into() },
                })
                .collect(),
        )
    }

    #[test]
    fn page_is_clamped_after_deleting_last_row() {
        let mut s = screen(6);
        s.goto_page(2);
        assert_eq!(s.view().rows.len(), 1);
        let mut n = PreparedNotifier::default();
        assert!(s.delete(6, n.answer(true)));
        assert_eq!(s.query().page, 1);
        assert_eq!(s.view().rows.len(), 5);
    }

    #[test]
    fn debounced_search_applies_on_tick() {
        let mut s = screen(6);
        let t0 = Instant::now();
        s.type_search('e', t0);
        s.type_search('v', t0);
        assert!(!s.tick(t0 + Duration::from_millis(100)));
        assert_eq!(s.view().total, 6);
        assert!(s.tick(t0 + Duration::from_millis(600)));
        assert_eq!(s.view().total, 3);
        s.clear_search();
        assert_eq!(s.view().total, 6);
    }

    #[test]
    fn sort_next_column_cycles_and_reverse_flips() {
        let mut s = screen(3);
        s.sort_next_column();
        assert_eq!(s.query().sort.key, PermissionColumn::Name);
        s.reverse_sort();
        assert_eq!(s.highlighted().map(|p| p.id), Some(3));
    }

    #[test]
    fn cursor_stays_on_page() {
        let mut s = screen(7);
        for _ in 0..10 {
            s.cursor_down();
        }
        assert_eq!(s.cursor(), 4);
        s.next_page();
        assert_eq!(s.cursor(), 0);
        s.cursor_down();
        s.cursor_down();
        assert_eq!(s.cursor(), 1);
    }

    #[test]
    fn type_erased_rows_carry_sort_arrow_and_checkbox() {
        let mut s = screen(3);
        s.toggle_row(2);
        let ops: &dyn ScreenOps = &s;
        assert_eq!(ops.headers()[0], "ID ↑");
        let rows = ops.rows();
        assert_eq!(rows.len(), 3);
        assert!(rows[1].checked && !rows[0].checked);
        assert_eq!(rows[1].cells, vec!["2", "perm-02", "even"]);
        assert_eq!(ops.pager(), (1, 1, 3));
    }
}
