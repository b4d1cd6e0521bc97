//! Roster resolution: turning a team key into availability records.
//!
//! The engine never fetches users itself. Callers hand it a
//! [`RosterProvider`], and the provider decides where records come from.
//! [`StaticRoster`] is the in-memory provider used by the CLI and tests.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::availability::UserAvailability;
use crate::error::{OverlapError, Result};

/// How a request names its team.
///
/// Serialized untagged, so the wire forms are `{"project_id": "p1"}` and
/// `{"user_ids": ["a", "b"]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TeamSelector {
    /// The members of a project, resolved by the provider.
    Project { project_id: String },
    /// An explicit, ad-hoc list of users.
    Users { user_ids: Vec<String> },
}

impl TeamSelector {
    pub fn project(project_id: impl Into<String>) -> Self {
        Self::Project {
            project_id: project_id.into(),
        }
    }

    pub fn users<I, S>(user_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Users {
            user_ids: user_ids.into_iter().map(Into::into).collect(),
        }
    }
}

/// Supplies availability records for a team.
///
/// Implementations report their own failures as
/// [`OverlapError::RosterResolution`].
pub trait RosterProvider {
    fn resolve(&self, selector: &TeamSelector) -> Result<Vec<UserAvailability>>;
}

impl<F> RosterProvider for F
where
    F: Fn(&TeamSelector) -> Result<Vec<UserAvailability>>,
{
    fn resolve(&self, selector: &TeamSelector) -> Result<Vec<UserAvailability>> {
        self(selector)
    }
}

// ── StaticRoster ────────────────────────────────────────────────────────────

/// An in-memory roster: a user directory plus project memberships.
///
/// Deserializes from:
///
/// ```json
/// {
///   "users": [{ "user_id": "a", "timezone": "UTC", ... }],
///   "projects": { "p1": ["a", "b"] }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaticRoster {
    #[serde(default)]
    pub users: Vec<UserAvailability>,
    #[serde(default)]
    pub projects: BTreeMap<String, Vec<String>>,
}

impl StaticRoster {
    pub fn new(users: Vec<UserAvailability>) -> Self {
        Self {
            users,
            projects: BTreeMap::new(),
        }
    }

    pub fn with_project<I, S>(mut self, project_id: impl Into<String>, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.projects
            .insert(project_id.into(), members.into_iter().map(Into::into).collect());
        self
    }

    fn lookup(&self, user_ids: &[String]) -> Result<Vec<UserAvailability>> {
        let directory: HashMap<&str, &UserAvailability> = self
            .users
            .iter()
            .map(|user| (user.user_id.as_str(), user))
            .collect();

        user_ids
            .iter()
            .map(|id| {
                directory.get(id.as_str()).map(|user| (*user).clone()).ok_or_else(|| {
                    OverlapError::RosterResolution(format!("unknown user '{}'", id))
                })
            })
            .collect()
    }
}

impl RosterProvider for StaticRoster {
    fn resolve(&self, selector: &TeamSelector) -> Result<Vec<UserAvailability>> {
        match selector {
            TeamSelector::Project { project_id } => {
                let members = self.projects.get(project_id).ok_or_else(|| {
                    OverlapError::RosterResolution(format!("unknown project '{}'", project_id))
                })?;
                self.lookup(members)
            }
            TeamSelector::Users { user_ids } => self.lookup(user_ids),
        }
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn roster() -> StaticRoster {
        StaticRoster::new(vec![
            UserAvailability::new("a", "UTC", 9, 17, vec![1, 2, 3, 4, 5]),
            UserAvailability::new("b", "Europe/Berlin", 9, 17, vec![1, 2, 3, 4, 5]),
            UserAvailability::new("c", "Asia/Tokyo", 9, 17, vec![1, 2, 3, 4, 5]),
        ])
        .with_project("apollo", ["c", "a"])
    }

    fn ids(users: &[UserAvailability]) -> Vec<&str> {
        users.iter().map(|u| u.user_id.as_str()).collect()
    }

    #[test]
    fn test_resolve_project_in_membership_order() {
        let users = roster().resolve(&TeamSelector::project("apollo")).unwrap();
        assert_eq!(ids(&users), vec!["c", "a"]);
    }

    #[test]
    fn test_resolve_explicit_users() {
        let users = roster().resolve(&TeamSelector::users(["b", "a"])).unwrap();
        assert_eq!(ids(&users), vec!["b", "a"]);
    }

    #[test]
    fn test_unknown_project_is_roster_error() {
        let err = roster().resolve(&TeamSelector::project("gemini")).unwrap_err();
        assert!(matches!(err, OverlapError::RosterResolution(_)), "got: {err}");
        assert!(err.to_string().contains("gemini"));
    }

    #[test]
    fn test_unknown_user_is_roster_error() {
        let err = roster().resolve(&TeamSelector::users(["a", "zz"])).unwrap_err();
        assert!(err.to_string().contains("unknown user 'zz'"), "got: {err}");
    }

    #[test]
    fn test_closure_provider() {
        let provider = |_: &TeamSelector| -> Result<Vec<UserAvailability>> {
            Err(OverlapError::RosterResolution("backend unavailable".to_string()))
        };
        let err = provider.resolve(&TeamSelector::project("x")).unwrap_err();
        assert_eq!(
            err,
            OverlapError::RosterResolution("backend unavailable".to_string())
        );
    }

    #[test]
    fn test_selector_wire_forms() {
        let project: TeamSelector = serde_json::from_str(r#"{"project_id": "p1"}"#).unwrap();
        assert_eq!(project, TeamSelector::project("p1"));

        let users: TeamSelector = serde_json::from_str(r#"{"user_ids": ["a", "b"]}"#).unwrap();
        assert_eq!(users, TeamSelector::users(["a", "b"]));
    }

    #[test]
    fn test_static_roster_deserializes() {
        let json = r#"{
            "users": [
                {"user_id": "a", "timezone": "UTC", "working_hours_start": 9,
                 "working_hours_end": 17, "working_days": [1, 2]}
            ],
            "projects": {"p1": ["a"]}
        }"#;
        let roster: StaticRoster = serde_json::from_str(json).unwrap();
        assert_eq!(roster.users.len(), 1);
        assert_eq!(roster.projects["p1"], vec!["a".to_string()]);
    }
}
