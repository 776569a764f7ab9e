//! User identity: credentials, roles, confirmation, and profile.
//!
//! Users are created through the explicit [`create_user`] factory so the
//! default-role lookup and the mandatory self-follow edge are visible,
//! transactional side effects rather than hidden constructor magic.

mod error;
mod model;
mod store;

pub use error::UserError;
pub use model::{NewUser, User, UserSummary};
pub use store::{
    change_password, confirm, create_user, find_by_email, find_by_id, find_by_username,
    role_permissions, summary,
};
