//! User directory — fixed credential set and the login lookup.
//!
//! DESIGN
//! ======
//! The directory is built once at startup and shared read-only behind an
//! `Arc` in handler state. Tests construct their own directories instead of
//! touching a global list.
//!
//! Passwords are compared as plaintext. This is a known simplification of a
//! demo credential set; a real deployment needs a salted one-way hash.

use serde::Serialize;

// =============================================================================
// USER
// =============================================================================

/// A known user. `id` is opaque; `email` is assumed unique but not enforced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    #[serde(skip_serializing)]
    pub password: String,
}

impl User {
    #[must_use]
    pub fn new(id: impl Into<String>, email: impl Into<String>, name: impl Into<String>, password: impl Into<String>) -> Self {
        Self { id: id.into(), email: email.into(), name: name.into(), password: password.into() }
    }
}

// =============================================================================
// DIRECTORY
// =============================================================================

/// Immutable, ordered set of users.
#[derive(Debug, Clone, Default)]
pub struct UserDirectory {
    users: Vec<User>,
}

impl UserDirectory {
    #[must_use]
    pub fn new(users: Vec<User>) -> Self {
        Self { users }
    }

    /// The three demo accounts the host ships with.
    #[must_use]
    pub fn seeded() -> Self {
        Self::new(vec![
            User::new("1", "test@test.com", "Test User", "test"),
            User::new("2", "test2@test.com", "Test User 2", "test"),
            User::new("3", "test3@test.com", "Test User 3", "test"),
        ])
    }

    /// Return the first user whose email and password both match exactly.
    ///
    /// Matching is case-sensitive with no normalization. Empty strings are
    /// ordinary inputs and simply fail to match the seeded set.
    #[must_use]
    pub fn authenticate(&self, email: &str, password: &str) -> Option<&User> {
        self.users
            .iter()
            .find(|user| user.email == email && user.password == password)
    }

    #[must_use]
    pub fn users(&self) -> &[User] {
        &self.users
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.users.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[cfg(test)]
#[path = "users_test.rs"]
mod tests;
