//! Authorization seam for admin-only comment actions.
//!
//! The review engine never decides who is an admin. Callers consult an
//! `Authorizer` before invoking `admin_respond` / `resolve_comment`.

use std::collections::HashSet;

use crate::errors::CoreError;

pub trait Authorizer {
    fn is_admin(&self, actor: &str) -> bool;

    /// Fail with `CoreError::Unauthorized` unless `actor` is an admin.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Unauthorized` naming the refused action.
    fn require_admin(&self, actor: &str, action: &str) -> Result<(), CoreError> {
        if self.is_admin(actor) {
            Ok(())
        } else {
            Err(CoreError::Unauthorized {
                actor: actor.to_string(),
                action: action.to_string(),
            })
        }
    }
}

/// Admin set loaded from configuration.
#[derive(Debug, Clone, Default)]
pub struct AllowlistAuthorizer {
    admins: HashSet<String>,
}

impl AllowlistAuthorizer {
    pub fn new<I, S>(admins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            admins: admins.into_iter().map(Into::into).collect(),
        }
    }
}

impl Authorizer for AllowlistAuthorizer {
    fn is_admin(&self, actor: &str) -> bool {
        self.admins.contains(actor)
    }
}
