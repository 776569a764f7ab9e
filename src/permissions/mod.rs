//! Role-based permission system.
//!
//! Permissions are a fixed set of bit flags combined into a per-role mask.
//! Roles are seeded at bootstrap by [`reconcile_roles`], which is safe to run
//! on every startup.

mod roles;
mod set;

pub use roles::{
    default_role, find_role_by_name, reconcile_roles, update_role, Role, RoleDefinition,
    DEFAULT_ROLE_TABLE,
};
pub use set::Permission;
