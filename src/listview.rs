//! Derive the visible page of a screen from its collection and the current
//! search, filter, sort and page parameters.
//!
//! Everything here is pure: the same inputs always give the same rows.

use std::cmp::Ordering;

use crate::model::{Column, Entity};

/// Rows per page on every entity screen.
pub const PAGE_SIZE: usize = 5;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn arrow(self) -> &'static str {
        match self {
            SortDirection::Ascending => "↑",
            SortDirection::Descending => "↓",
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SortConfig<C> {
    pub key: C,
    pub direction: SortDirection,
}

impl<C: Column> SortConfig<C> {
    pub fn ascending(key: C) -> Self {
        Self { key, direction: SortDirection::Ascending }
    }

    /// Same key flips the direction; a different key starts ascending.
    /// Columns that cannot be sorted are ignored.
    pub fn toggle(&mut self, key: C) {
        if !key.sortable() {
            return;
        }
        if self.key == key {
            self.direction = match self.direction {
                SortDirection::Ascending => SortDirection::Descending,
                SortDirection::Descending => SortDirection::Ascending,
            };
        } else {
            *self = Self::ascending(key);
        }
    }
}

/// User-controlled parameters of one screen's table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListQuery<C> {
    pub search: String,
    pub filter: Option<String>,
    pub sort: SortConfig<C>,
    /// 1-based.
    pub page: usize,
}

impl<C: Column> ListQuery<C> {
    pub fn new(sort_key: C) -> Self {
        Self { search: String::new(), filter: None, sort: SortConfig::ascending(sort_key), page: 1 }
    }
}

/// One rendered page plus the totals needed for the pager.
#[derive(Debug)]
pub struct DerivedPage<'a, T> {
    pub rows: Vec<&'a T>,
    /// Page actually shown, after clamping.
    pub page: usize,
    pub page_count: usize,
    /// Matches across all pages.
    pub total: usize,
}

pub fn page_count(len: usize) -> usize {
    len.div_ceil(PAGE_SIZE)
}

/// Keep `page` within `1..=page_count`; with no pages the answer is 1.
pub fn clamp_page(page: usize, page_count: usize) -> usize {
    page.clamp(1, page_count.max(1))
}

/// `term` must already be lowercase.
pub fn matches_search<T: Entity>(item: &T, term: &str) -> bool {
    term.is_empty() || item.search_fields().iter().any(|f| f.to_lowercase().contains(term))
}

pub fn matches_filter<T: Entity>(item: &T, filter: Option<&str>) -> bool {
    match filter {
        Some(value) if !value.is_empty() => item.category() == value,
        _ => true,
    }
}

fn compare<T: Entity>(a: &T, b: &T, sort: &SortConfig<T::Column>) -> Ordering {
    let ord = match (a.sort_value(sort.key), b.sort_value(sort.key)) {
        (Some(x), Some(y)) => x.cmp(&y),
        _ => Ordering::Equal,
    };
    match sort.direction {
        SortDirection::Ascending => ord,
        SortDirection::Descending => ord.reverse(),
    }
}

/// Search, filter and sort, without paging.
pub fn filter_and_sort<'a, T: Entity>(items: &'a [T], query: &ListQuery<T::Column>) -> Vec<&'a T> {
    let term = query.search.to_lowercase();
    let mut rows: Vec<&T> = items
        .iter()
        .filter(|e| matches_search(*e, &term))
        .filter(|e| matches_filter(*e, query.filter.as_deref()))
        .collect();
    // stable: ties keep collection order
    rows.sort_by(|a, b| compare(*a, *b, &query.sort));
    rows
}

pub fn derive<'a, T: Entity>(items: &'a [T], query: &ListQuery<T::Column>) -> DerivedPage<'a, T> {
    let matched = filter_and_sort(items, query);
    let total = matched.len();
    let pages = page_count(total);
    let page = clamp_page(query.page, pages);
    let rows = matched.into_iter().skip((page - 1) * PAGE_SIZE).take(PAGE_SIZE).collect();
    DerivedPage { rows, page, page_count: pages, total }
}

/// Distinct filter values in first-seen order.
pub fn categories<T: Entity>(items: &[T]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for item in items {
        if !out.iter().any(|c| c == item.category()) {
            out.push(item.category().to_string());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    use crate::model::{PermissionSet, Role, RoleColumn, User, UserColumn, UserStatus};

    fn role(id: u64, name: &str, description: &str) -> Role {
        Role {
            id,
            name: name.to_string(),
            description: description.to_string(),
            permissions: PermissionSet::default(),
        }
    }

    fn roles() -> Vec<Role> {
        vec![
            role(1, "Admin", "Full access"),
            role(2, "Editor", "Can edit content"),
            role(3, "Viewer", "Read only access"),
            role(4, "Auditor", "Reviews ADMIN logs"),
            role(5, "Support", "Helps users"),
            role(6, "Editor", "Second editor"),
            role(7, "Guest", "Limited access"),
        ]
    }

    fn names(page: &DerivedPage<'_, Role>) -> Vec<u64> {
        page.rows.iter().map(|r| r.id).collect()
    }

    #[test]
    fn search_is_case_insensitive_over_name_and_description() {
        let items = roles();
        let mut q = ListQuery::new(RoleColumn::Id);
        q.search = "admin".into();
        assert_eq!(names(&derive(&items, &q)), vec![1, 4]);
    }

    #[test]
    fn search_and_filter_compose() {
        let items = roles();
        let mut q = ListQuery::new(RoleColumn::Id);
        q.filter = Some("Editor".into());
        assert_eq!(names(&derive(&items, &q)), vec![2, 6]);
        q.search = "second".into();
        assert_eq!(names(&derive(&items, &q)), vec![6]);
        q.filter = Some(String::new());
        assert_eq!(names(&derive(&items, &q)), vec![6]);
    }

    #[test]
    fn sort_toggle_and_reset_to_ascending() {
        let mut sort = SortConfig::ascending(RoleColumn::Id);
        sort.toggle(RoleColumn::Id);
        assert_eq!(sort.direction, SortDirection::Descending);
        sort.toggle(RoleColumn::Name);
        assert_eq!(sort, SortConfig::ascending(RoleColumn::Name));
        sort.toggle(RoleColumn::Permissions);
        assert_eq!(sort.key, RoleColumn::Name);
    }

    #[test]
    fn sort_by_name_is_stable_for_ties() {
        let items = roles();
        let mut q = ListQuery::new(RoleColumn::Id);
        q.sort = SortConfig::ascending(RoleColumn::Name);
        let ids: Vec<u64> = filter_and_sort(&items, &q).iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 4, 2, 6, 7, 5, 3]);
        q.sort.direction = SortDirection::Descending;
        let ids: Vec<u64> = filter_and_sort(&items, &q).iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![3, 5, 7, 2, 6, 4, 1]);
    }

    fn users() -> Vec<User> {
        let user = |id: u64, name: &str, role: &str, status: UserStatus, day: u32| User {
            id,
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            role: role.to_string(),
            status,
            created: Utc.with_ymd_and_hms(2024, 3, day, 9, 0, 0).unwrap(),
        };
        vec![
            user(1, "Mia", "HR", UserStatus::Active, 12),
            user(2, "Ben", "Admin", UserStatus::Inactive, 3),
            user(3, "Ava", "Manager", UserStatus::Active, 12),
            user(4, "Ben", "HR", UserStatus::Inactive, 27),
            user(5, "Zoe", "Admin", UserStatus::Active, 3),
            user(6, "Ivy", "Manager", UserStatus::Inactive, 19),
        ]
    }

    #[test]
    fn sorting_sorted_rows_again_changes_nothing() {
        let items = users();
        for column in User::COLUMNS.iter().copied().filter(|c| c.sortable()) {
            for direction in [SortDirection::Ascending, SortDirection::Descending] {
                let mut q = ListQuery::new(UserColumn::Id);
                q.sort = SortConfig { key: column, direction };
                let once: Vec<User> = filter_and_sort(&items, &q).into_iter().cloned().collect();
                let twice: Vec<u64> = filter_and_sort(&once, &q).iter().map(|u| u.id).collect();
                let once_ids: Vec<u64> = once.iter().map(|u| u.id).collect();
                assert_eq!(once_ids, twice, "{column:?} {direction:?}");
                assert_eq!(
                    filter_and_sort(&items, &q).iter().map(|u| u.id).collect::<Vec<_>>(),
                    once_ids
                );
            }
        }
    }

    #[test]
    fn created_and_status_sort_keep_ties_in_order() {
        let items = users();
        let mut q = ListQuery::new(UserColumn::Id);
        q.sort = SortConfig::ascending(UserColumn::Created);
        let ids: Vec<u64> = filter_and_sort(&items, &q).iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![2, 5, 1, 3, 6, 4]);
        q.sort = SortConfig::ascending(UserColumn::Status);
        let ids: Vec<u64> = filter_and_sort(&items, &q).iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![1, 3, 5, 2, 4, 6]);
    }

    #[test]
    fn pagination_slices_and_clamps() {
        let items = roles();
        let mut q = ListQuery::new(RoleColumn::Id);
        q.page = 2;
        let page = derive(&items, &q);
        assert_eq!(page.page_count, 2);
        assert_eq!(names(&page), vec![6, 7]);

        q.page = 9;
        assert_eq!(derive(&items, &q).page, 2);

        q.search = "nothing matches".into();
        let empty = derive(&items, &q);
        assert_eq!(empty.page_count, 0);
        assert!(empty.rows.is_empty());
        assert_eq!(empty.page, 1);
    }

    #[test]
    fn categories_keep_first_seen_order() {
        assert_eq!(
            categories(&roles()),
            vec!["Admin", "Editor", "Viewer", "Auditor", "Support", "Guest"]
        );
    }
}
