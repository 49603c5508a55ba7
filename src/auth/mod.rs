//! Authentication: password digests, login sessions, and the admin
//! check.

pub mod password;
pub mod session;

pub use password::{generate_salt, hash_password, verify_password};
pub use session::{
    create_session_store, insert_session, remove_session, session_for_token, AuthSession,
    SessionStore,
};

/// Admin check: the session email must equal the configured
/// administrator address. An empty configured address matches nobody.
pub fn is_admin(session: &AuthSession, admin_email: &str) -> bool {
    !admin_email.is_empty() && session.email == admin_email
}
