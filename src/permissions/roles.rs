//! Roles and the bootstrap reconciliation routine.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use super::Permission;

/// A named role holding a permission mask.
///
/// Exactly one role is the default, assigned to users created without an
/// explicit role. Roles are never deleted while a user references them (the
/// foreign key enforces this).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Role {
    pub id: Uuid,
    pub name: String,
    pub is_default: bool,
    #[sqlx(try_from = "i64")]
    pub permissions: Permission,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Role {
    /// Check whether this role grants `permission`.
    #[must_use]
    pub fn has_permission(&self, permission: Permission) -> bool {
        self.permissions.has(permission)
    }

    /// Add a permission to the mask. Idempotent.
    pub fn add_permission(&mut self, permission: Permission) {
        self.permissions.insert(permission);
    }

    /// Remove a permission from the mask with AND-NOT. Idempotent, and safe
    /// even if the bit was never set.
    pub fn remove_permission(&mut self, permission: Permission) {
        self.permissions.remove(permission);
    }

    /// Zero the mask.
    pub fn reset_permissions(&mut self) {
        self.permissions = Permission::empty();
    }
}

/// One row of the static role table consumed by [`reconcile_roles`].
#[derive(Debug, Clone, Copy)]
pub struct RoleDefinition {
    pub name: &'static str,
    pub permissions: &'static [Permission],
}

/// Canonical roles seeded at bootstrap.
pub const DEFAULT_ROLE_TABLE: &[RoleDefinition] = &[
    RoleDefinition {
        name: "User",
        permissions: &[Permission::FOLLOW, Permission::REVIEW, Permission::PUBLISH],
    },
    RoleDefinition {
        name: "Moderator",
        permissions: &[
            Permission::FOLLOW,
            Permission::REVIEW,
            Permission::PUBLISH,
            Permission::MODERATE,
        ],
    },
    RoleDefinition {
        name: "Administrator",
        permissions: &[
            Permission::FOLLOW,
            Permission::REVIEW,
            Permission::PUBLISH,
            Permission::MODERATE,
            Permission::ADMIN,
        ],
    },
];

/// Seed or update the canonical roles.
///
/// For each definition the role is created if missing, its mask is reset and
/// rebuilt from the listed permissions, and `is_default` is set iff the name
/// matches `default_role`. Idempotent: reruns leave the table byte-identical,
/// so this runs on every bootstrap.
pub async fn reconcile_roles(
    pool: &PgPool,
    definitions: &[RoleDefinition],
    default_role: &str,
) -> sqlx::Result<()> {
    let mut tx = pool.begin().await?;

    // Clear stale default flags first so the single-default index cannot
    // reject the upsert below when the configured default changes.
    sqlx::query("UPDATE roles SET is_default = FALSE, updated_at = NOW() WHERE is_default AND name <> $1")
        .bind(default_role)
        .execute(&mut *tx)
        .await?;

    for def in definitions {
        let mask = def
            .permissions
            .iter()
            .fold(Permission::empty(), |mask, p| mask | *p);

        sqlx::query(
            r"INSERT INTO roles (id, name, is_default, permissions)
               VALUES ($1, $2, $3, $4)
               ON CONFLICT (name) DO UPDATE
               SET permissions = EXCLUDED.permissions,
                   is_default = EXCLUDED.is_default,
                   updated_at = NOW()",
        )
        .bind(Uuid::now_v7())
        .bind(def.name)
        .bind(def.name == default_role)
        .bind(mask.to_db())
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    tracing::info!(roles = definitions.len(), default = default_role, "Roles reconciled");
    Ok(())
}

/// Fetch a role by name.
pub async fn find_role_by_name(pool: &PgPool, name: &str) -> sqlx::Result<Option<Role>> {
    sqlx::query_as::<_, Role>("SELECT * FROM roles WHERE name = $1")
        .bind(name)
        .fetch_optional(pool)
        .await
}

/// Fetch the default role, if one has been seeded.
pub async fn default_role(pool: &PgPool) -> sqlx::Result<Option<Role>> {
    sqlx::query_as::<_, Role>("SELECT * FROM roles WHERE is_default")
        .fetch_optional(pool)
        .await
}

/// Persist an administratively edited role mask.
pub async fn update_role(pool: &PgPool, role: &Role) -> sqlx::Result<()> {
    sqlx::query("UPDATE roles SET permissions = $2, updated_at = NOW() WHERE id = $1")
        .bind(role.id)
        .bind(role.permissions.to_db())
        .execute(pool)
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn role_with(mask: Permission) -> Role {
        Role {
            id: Uuid::now_v7(),
            name: "Test".into(),
            is_default: false,
            permissions: mask,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_add_permission_is_idempotent() {
        let mut role = role_with(Permission::empty());
        role.add_permission(Permission::FOLLOW);
        role.add_permission(Permission::FOLLOW);
        assert_eq!(role.permissions, Permission::FOLLOW);
    }

    #[test]
    fn test_remove_permission_is_idempotent() {
        let mut role = role_with(Permission::FOLLOW | Permission::PUBLISH);
        role.remove_permission(Permission::PUBLISH);
        role.remove_permission(Permission::PUBLISH);
        assert_eq!(role.permissions, Permission::FOLLOW);
    }

    #[test]
    fn test_remove_permission_leaves_other_bits() {
        let mut role = role_with(Permission::all());
        role.remove_permission(Permission::MODERATE);
        assert!(role.has_permission(Permission::FOLLOW));
        assert!(role.has_permission(Permission::ADMIN));
        assert!(!role.has_permission(Permission::MODERATE));
    }

    #[test]
    fn test_reset_permissions() {
        let mut role = role_with(Permission::all());
        role.reset_permissions();
        assert_eq!(role.permissions, Permission::empty());
    }

    #[test]
    fn test_default_table_masks_match_presets() {
        let masks: Vec<Permission> = DEFAULT_ROLE_TABLE
            .iter()
            .map(|d| d.permissions.iter().fold(Permission::empty(), |m, p| m | *p))
            .collect();
        assert_eq!(
            masks,
            vec![
                Permission::USER_DEFAULT,
                Permission::MODERATOR_DEFAULT,
                Permission::ADMINISTRATOR_DEFAULT,
            ]
        );
    }

    #[test]
    fn test_role_grants_exactly_its_configured_permissions() {
        for def in DEFAULT_ROLE_TABLE {
            let mask = def.permissions.iter().fold(Permission::empty(), |m, p| m | *p);
            let role = role_with(mask);
            for perm in Permission::all().iter() {
                assert_eq!(
                    role.has_permission(perm),
                    def.permissions.contains(&perm),
                    "{} / {perm:?}",
                    def.name
                );
            }
        }
    }
}
