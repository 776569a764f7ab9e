//! Permission bit flags.
//!
//! Each permission is a distinct power of two so masks compose with bitwise
//! OR and permissions are removed with AND-NOT, never arithmetic.

use bitflags::bitflags;

bitflags! {
    /// User permissions represented as a 64-bit bitfield.
    ///
    /// Stored as BIGINT in PostgreSQL.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
    #[serde(transparent)]
    pub struct Permission: u64 {
        /// Follow other users
        const FOLLOW   = 1 << 0;
        /// Review other users' compositions
        const REVIEW   = 1 << 1;
        /// Publish compositions
        const PUBLISH  = 1 << 2;
        /// Moderate reviews and descriptions
        const MODERATE = 1 << 3;
        /// Full administrative access
        const ADMIN    = 1 << 4;
    }
}

impl Permission {
    /// Permissions granted to ordinary users.
    pub const USER_DEFAULT: Self = Self::FOLLOW.union(Self::REVIEW).union(Self::PUBLISH);

    /// Permissions granted to moderators.
    pub const MODERATOR_DEFAULT: Self = Self::USER_DEFAULT.union(Self::MODERATE);

    /// Permissions granted to administrators.
    pub const ADMINISTRATOR_DEFAULT: Self = Self::MODERATOR_DEFAULT.union(Self::ADMIN);

    /// Create a permission mask from a database BIGINT value.
    ///
    /// Unknown bits are silently dropped so old rows stay readable after a
    /// permission is retired.
    #[must_use]
    pub const fn from_db(value: i64) -> Self {
        Self::from_bits_truncate(value as u64)
    }

    /// Convert the mask to a database BIGINT value.
    #[must_use]
    pub const fn to_db(self) -> i64 {
        self.bits() as i64
    }

    /// Check that every bit of `permission` is present in this mask.
    #[must_use]
    pub const fn has(self, permission: Self) -> bool {
        self.contains(permission)
    }
}

impl Default for Permission {
    fn default() -> Self {
        Self::empty()
    }
}

// Implement From for Permission to work with sqlx `try_from`
impl From<i64> for Permission {
    fn from(value: i64) -> Self {
        Self::from_db(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_bits_are_distinct_powers_of_two() {
        let all = [
            Permission::FOLLOW,
            Permission::REVIEW,
            Permission::PUBLISH,
            Permission::MODERATE,
            Permission::ADMIN,
        ];

        for perm in all {
            assert!(perm.bits().is_power_of_two(), "{perm:?} is not a power of two");
        }

        // Combining all equals the sum of individual bits, so no bit is shared
        let combined: u64 = all.iter().fold(0, |acc, p| acc | p.bits());
        let sum: u64 = all.iter().map(|p| p.bits()).sum();
        assert_eq!(combined, sum);
    }

    #[test]
    fn test_permission_values() {
        assert_eq!(Permission::FOLLOW.bits(), 1);
        assert_eq!(Permission::REVIEW.bits(), 2);
        assert_eq!(Permission::PUBLISH.bits(), 4);
        assert_eq!(Permission::MODERATE.bits(), 8);
        assert_eq!(Permission::ADMIN.bits(), 16);
    }

    #[test]
    fn test_user_default_preset() {
        let user = Permission::USER_DEFAULT;
        assert!(user.has(Permission::FOLLOW));
        assert!(user.has(Permission::REVIEW));
        assert!(user.has(Permission::PUBLISH));
        assert!(!user.has(Permission::MODERATE));
        assert!(!user.has(Permission::ADMIN));
    }

    #[test]
    fn test_moderator_default_extends_user() {
        let moderator = Permission::MODERATOR_DEFAULT;
        assert!(moderator.contains(Permission::USER_DEFAULT));
        assert!(moderator.has(Permission::MODERATE));
        assert!(!moderator.has(Permission::ADMIN));
    }

    #[test]
    fn test_administrator_default_has_everything() {
        assert_eq!(Permission::ADMINISTRATOR_DEFAULT, Permission::all());
    }

    #[test]
    fn test_has_requires_all_bits() {
        let perms = Permission::FOLLOW | Permission::REVIEW;
        assert!(perms.has(Permission::FOLLOW | Permission::REVIEW));
        assert!(!perms.has(Permission::FOLLOW | Permission::ADMIN));
    }

    #[test]
    fn test_from_db_truncates_unknown_bits() {
        let db_value: i64 = (1 << 0) | (1 << 40);
        let perms = Permission::from_db(db_value);
        assert!(perms.has(Permission::FOLLOW));
        assert_eq!(perms.bits(), 1);
    }

    #[test]
    fn test_from_db_with_negative_value() {
        // A negative BIGINT is just a bit pattern with the high bit set
        let perms = Permission::from_db(-1);
        assert_eq!(perms, Permission::all());
    }

    #[test]
    fn test_db_roundtrip() {
        let original = Permission::FOLLOW | Permission::MODERATE;
        assert_eq!(Permission::from_db(original.to_db()), original);
    }

    #[test]
    fn test_default_is_empty() {
        assert_eq!(Permission::default(), Permission::empty());
    }
}
