//! Dashboard totals across the three stores.

use crate::model::{Permission, Role, User, UserStatus};
use crate::screen::EntityScreen;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Totals {
    pub users: usize,
    pub roles: usize,
    pub permissions: usize,
    pub active_users: usize,
}

impl Totals {
    pub fn compute(
        users: &EntityScreen<User>,
        roles: &EntityScreen<Role>,
        permissions: &EntityScreen<Permission>,
    ) -> Self {
        let users = users.store().list();
        Self {
            users: users.len(),
            roles: roles.store().len(),
            permissions: permissions.store().len(),
            active_users: users.iter().filter(|u| u.status == UserStatus::Active).count(),
        }
    }

    /// Card label and value, in display order.
    pub fn cards(&self) -> [(&'static str, usize); 4] {
        [
            ("Total Users", self.users),
            ("Roles", self.roles),
            ("Permissions", self.permissions),
            ("Active Users", self.active_users),
        ]
    }
}
