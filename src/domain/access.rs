//! Premium content gating and ownership rules.
//!
//! Everything here is pure: callers resolve the reader's identity and
//! subscription state, then ask whether the chapter body may be served.

use std::fmt::Display;

use super::DomainError;
use crate::models::user::Role;

/// An authenticated caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub user_id: i32,
    pub role: Role,
}

impl Identity {
    pub fn new(user_id: i32, role: Role) -> Self {
        Self { user_id, role }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Owners and admins may mutate a resource.
    pub fn can_manage(&self, owner_id: i32) -> bool {
        self.user_id == owner_id || self.is_admin()
    }

    pub fn ensure_can_manage(&self, owner_id: i32, what: &str) -> Result<(), DomainError> {
        if self.can_manage(owner_id) {
            Ok(())
        } else {
            Err(DomainError::forbidden(format!(
                "You are not allowed to modify this {what}"
            )))
        }
    }

    pub fn ensure_role(&self, allowed: &[Role]) -> Result<(), DomainError> {
        if allowed.contains(&self.role) {
            Ok(())
        } else {
            Err(DomainError::forbidden(
                "You do not have permission to access this resource",
            ))
        }
    }
}

/// The premium flags and owner of a chapter, as seen by the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentGate {
    pub chapter_premium: bool,
    pub story_premium: bool,
    pub author_id: i32,
}

impl ContentGate {
    pub fn is_gated(&self) -> bool {
        self.chapter_premium || self.story_premium
    }

    /// Whether answering `can_read` requires knowing the reader's
    /// subscription. Lets callers skip the lookup entirely.
    pub fn needs_entitlement(&self, reader: Option<&Identity>) -> bool {
        match reader {
            Some(r) => self.is_gated() && !r.can_manage(self.author_id),
            None => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entitlement {
    Active,
    Missing,
}

impl Entitlement {
    /// Interpret a subscription lookup. Errors count as no subscription.
    pub fn from_lookup<T, E: Display>(lookup: Result<Option<T>, E>) -> Self {
        match lookup {
            Ok(Some(_)) => Entitlement::Active,
            Ok(None) => Entitlement::Missing,
            Err(e) => {
                tracing::warn!("Subscription lookup failed, treating as inactive: {}", e);
                Entitlement::Missing
            }
        }
    }
}

pub fn can_read(reader: Option<&Identity>, gate: &ContentGate, entitlement: Entitlement) -> bool {
    if !gate.is_gated() {
        return true;
    }

    match reader {
        None => false,
        Some(r) => entitlement == Entitlement::Active || r.can_manage(gate.author_id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const AUTHOR: i32 = 10;

    fn gate(chapter_premium: bool, story_premium: bool) -> ContentGate {
        ContentGate {
            chapter_premium,
            story_premium,
            author_id: AUTHOR,
        }
    }

    #[test]
    fn free_content_is_readable_by_anyone() {
        let g = gate(false, false);
        assert!(can_read(None, &g, Entitlement::Missing));
        let reader = Identity::new(1, Role::Reader);
        assert!(can_read(Some(&reader), &g, Entitlement::Missing));
    }

    #[test]
    fn premium_story_gates_free_chapter() {
        let g = gate(false, true);
        assert!(g.is_gated());
        assert!(!can_read(None, &g, Entitlement::Active));
    }

    #[test]
    fn anonymous_never_reads_gated_content() {
        for g in [gate(true, false), gate(false, true), gate(true, true)] {
            assert!(!can_read(None, &g, Entitlement::Active));
            assert!(!can_read(None, &g, Entitlement::Missing));
        }
    }

    #[test]
    fn subscriber_reads_gated_content() {
        let reader = Identity::new(1, Role::Reader);
        assert!(can_read(Some(&reader), &gate(true, true), Entitlement::Active));
        assert!(!can_read(Some(&reader), &gate(true, true), Entitlement::Missing));
    }

    #[test]
    fn author_and_admin_bypass_subscription() {
        let author = Identity::new(AUTHOR, Role::Author);
        let admin = Identity::new(99, Role::Admin);
        let g = gate(true, false);
        assert!(can_read(Some(&author), &g, Entitlement::Missing));
        assert!(can_read(Some(&admin), &g, Entitlement::Missing));
        assert!(!g.needs_entitlement(Some(&author)));
        assert!(!g.needs_entitlement(Some(&admin)));
    }

    #[test]
    fn lookup_errors_fail_closed() {
        let lookup: Result<Option<()>, String> = Err("timeout".into());
        assert_eq!(Entitlement::from_lookup(lookup), Entitlement::Missing);
        assert_eq!(
            Entitlement::from_lookup::<_, String>(Ok(Some(1))),
            Entitlement::Active
        );
    }

    #[test]
    fn other_authors_need_a_subscription() {
        let other = Identity::new(11, Role::Author);
        let g = gate(true, false);
        assert!(g.needs_entitlement(Some(&other)));
        assert!(other.ensure_can_manage(AUTHOR, "story").is_err());
    }
}
