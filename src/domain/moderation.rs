//! Comment moderation: `Normal -> Reported -> {Normal, Deleted}`.

use serde::Serialize;

use crate::models::user::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ModerationState {
    Normal,
    Reported,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModerationAction {
    Report,
    Approve,
    Delete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModerationOutcome {
    /// Nothing to write; the action is a no-op in this state.
    Unchanged(ModerationState),
    Moved(ModerationState),
    Deleted,
}

impl ModerationState {
    pub fn from_flag(is_reported: bool) -> Self {
        if is_reported {
            ModerationState::Reported
        } else {
            ModerationState::Normal
        }
    }

    pub fn is_reported(self) -> bool {
        self == ModerationState::Reported
    }

    pub fn apply(self, action: ModerationAction) -> ModerationOutcome {
        use ModerationAction::*;
        use ModerationState::*;

        match (self, action) {
            (_, Delete) => ModerationOutcome::Deleted,
            (Normal, Report) => ModerationOutcome::Moved(Reported),
            (Reported, Approve) => ModerationOutcome::Moved(Normal),
            (state, _) => ModerationOutcome::Unchanged(state),
        }
    }
}

impl ModerationAction {
    /// Reporting is open to any signed-in user; the rest is admin work.
    pub fn required_role(self) -> Option<Role> {
        match self {
            ModerationAction::Report => None,
            ModerationAction::Approve | ModerationAction::Delete => Some(Role::Admin),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_then_approve_returns_to_normal() {
        let s = ModerationState::Normal;
        let ModerationOutcome::Moved(reported) = s.apply(ModerationAction::Report) else {
            panic!("report should move the comment");
        };
        assert!(reported.is_reported());
        assert_eq!(
            reported.apply(ModerationAction::Approve),
            ModerationOutcome::Moved(ModerationState::Normal)
        );
    }

    #[test]
    fn reporting_twice_is_a_no_op() {
        assert_eq!(
            ModerationState::Reported.apply(ModerationAction::Report),
            ModerationOutcome::Unchanged(ModerationState::Reported)
        );
    }

    #[test]
    fn delete_is_terminal_from_any_state() {
        assert_eq!(
            ModerationState::Normal.apply(ModerationAction::Delete),
            ModerationOutcome::Deleted
        );
        assert_eq!(
            ModerationState::Reported.apply(ModerationAction::Delete),
            ModerationOutcome::Deleted
        );
    }

    #[test]
    fn only_admins_resolve_reports() {
        assert_eq!(ModerationAction::Report.required_role(), None);
        assert_eq!(ModerationAction::Approve.required_role(), Some(Role::Admin));
        assert_eq!(ModerationAction::Delete.required_role(), Some(Role::Admin));
    }
}
