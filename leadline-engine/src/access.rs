use std::collections::BTreeSet;

use leadline_protocol::lead::{Caller, LeadRecord, View};
use serde::{Deserialize, Serialize};

/// Whether `caller` may see `record` in `view`.
///
/// Admins see every record on the requested side of the soft-delete line.
/// Everyone else sees only what they created, except that superusers get the
/// whole trash.
pub fn is_visible(record: &LeadRecord, caller: &Caller, view: View) -> bool {
    let owns = record.created_by == caller.identity;
    match view {
        View::Active => record.is_active() && (caller.is_admin || owns),
        View::Trash => record.deleted && (caller.is_admin || caller.is_superuser || owns),
    }
}

/// Subset of `records` visible to `caller`, in input order.
pub fn visible(
    records: impl IntoIterator<Item = LeadRecord>,
    caller: &Caller,
    view: View,
) -> Vec<LeadRecord> {
    records
        .into_iter()
        .filter(|record| is_visible(record, caller, view))
        .collect()
}

/// Creator restriction an admin may place on views and reports.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreatorScope {
    #[default]
    All,
    Only(BTreeSet<String>),
}

impl CreatorScope {
    /// Scope limited to the given creators. No creators means no restriction.
    pub fn only<I, T>(creators: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let creators: BTreeSet<String> = creators.into_iter().map(Into::into).collect();
        if creators.is_empty() {
            CreatorScope::All
        } else {
            CreatorScope::Only(creators)
        }
    }

    pub fn includes(&self, creator: &str) -> bool {
        match self {
            CreatorScope::All => true,
            CreatorScope::Only(creators) => creators.contains(creator),
        }
    }

    /// Non-admins are always scoped to themselves whatever they asked for.
    pub fn for_caller(self, caller: &Caller) -> Self {
        if caller.is_admin {
            self
        } else {
            CreatorScope::only([caller.identity.clone()])
        }
    }
}

/// Keeps only the records whose creator is within `scope`.
pub fn restrict_to_creators(records: Vec<LeadRecord>, scope: &CreatorScope) -> Vec<LeadRecord> {
    match scope {
        CreatorScope::All => records,
        CreatorScope::Only(_) => records
            .into_iter()
            .filter(|record| scope.includes(&record.created_by))
            .collect(),
    }
}

/// Distinct creators across `records`, sorted.
pub fn creators<'a>(records: impl IntoIterator<Item = &'a LeadRecord>) -> Vec<String> {
    records
        .into_iter()
        .filter(|record| !record.created_by.is_empty())
        .map(|record| record.created_by.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{deleted, lead};
    use test_case::test_case;

    fn fixture() -> Vec<LeadRecord> {
        vec![
            lead(1, "alice", "2024-01-01 09:00:00"),
            lead(2, "bob", "2024-01-01 10:00:00"),
            deleted(lead(3, "alice", "2024-01-02 09:00:00"), "alice"),
            deleted(lead(4, "bob", "2024-01-02 10:00:00"), "carol"),
            deleted(lead(5, "carol", "2024-01-02 11:00:00"), "dave"),
        ]
    }

    fn ids(records: &[LeadRecord]) -> Vec<u64> {
        records.iter().map(|record| record.id).collect()
    }

    #[test_case(Caller::admin("root"), View::Active, vec![1, 2] ; "admin active")]
    #[test_case(Caller::admin("root"), View::Trash, vec![3, 4, 5] ; "admin trash")]
    #[test_case(Caller::member("alice"), View::Active, vec![1] ; "member active")]
    #[test_case(Caller::member("alice"), View::Trash, vec![3] ; "member trash")]
    #[test_case(Caller::member("carol"), View::Trash, vec![5] ; "member ignores own deletions")]
    #[test_case(Caller::superuser("carol"), View::Trash, vec![3, 4, 5] ; "superuser trash")]
    #[test_case(Caller::superuser("erin"), View::Trash, vec![3, 4, 5] ; "superuser no deletions")]
    #[test_case(Caller::superuser("carol"), View::Active, vec![] ; "superuser active is own")]
    fn visibility_by_role(caller: Caller, view: View, expected: Vec<u64>) {
        assert_eq!(ids(&visible(fixture(), &caller, view)), expected);
    }

    #[test]
    fn active_and_trash_never_overlap() {
        let callers = [
            Caller::admin("root"),
            Caller::member("alice"),
            Caller::superuser("carol"),
        ];
        for caller in callers {
            let active = visible(fixture(), &caller, View::Active);
            let trash = visible(fixture(), &caller, View::Trash);
            assert!(active.iter().all(|record| !trash.contains(record)));
            assert!(active.iter().all(LeadRecord::is_active));
        }
    }

    #[test]
    fn members_cannot_widen_their_scope() {
        let scope = CreatorScope::only(["bob"]).for_caller(&Caller::member("alice"));
        assert_eq!(scope, CreatorScope::only(["alice"]));

        let admin = CreatorScope::only(["bob"]).for_caller(&Caller::admin("root"));
        let scoped = restrict_to_creators(fixture(), &admin);
        assert_eq!(ids(&scoped), vec![2, 4]);
        assert_eq!(CreatorScope::only(Vec::<String>::new()), CreatorScope::All);
    }

    #[test]
    fn lists_distinct_creators() {
        assert_eq!(creators(&fixture()), vec!["alice", "bob", "carol"]);
    }
}
