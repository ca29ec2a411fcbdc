//! Row visibility: which creators' records a user may see.
//!
//! Roles are checked in a fixed order: `Admin`/`Hr` see everyone, a
//! `Coordinator` sees the supervisors linked to them plus themselves, and
//! everybody else sees only their own records.

use std::collections::HashSet;

use diesel::pg::PgConnection;
use diesel::prelude::*;
use uuid::Uuid;

use crate::auth::{AuthenticatedUser, Role};
use crate::schema::{hierarchy_edges, users};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreatorScope {
    Everyone,
    Only(HashSet<Uuid>),
}

impl CreatorScope {
    pub fn for_role(
        role: Role,
        user_id: Uuid,
        linked_supervisors: impl IntoIterator<Item = Uuid>,
    ) -> Self {
        match role {
            Role::Admin | Role::Hr => CreatorScope::Everyone,
            Role::Coordinator => {
                let mut ids: HashSet<Uuid> = linked_supervisors.into_iter().collect();
                ids.insert(user_id);
                CreatorScope::Only(ids)
            }
            Role::FrontLine | Role::None => CreatorScope::Only(HashSet::from([user_id])),
        }
    }

    /// Records whose creator was deleted are only visible to `Everyone` scopes.
    pub fn permits(&self, creator: Option<Uuid>) -> bool {
        match self {
            CreatorScope::Everyone => true,
            CreatorScope::Only(ids) => creator.is_some_and(|id| ids.contains(&id)),
        }
    }

    /// Creator ids for an `IN` filter, `None` when no filter applies.
    pub fn creator_filter(&self) -> Option<Vec<Uuid>> {
        match self {
            CreatorScope::Everyone => None,
            CreatorScope::Only(ids) => Some(ids.iter().copied().collect()),
        }
    }
}

pub fn creator_scope(
    conn: &mut PgConnection,
    user: &AuthenticatedUser,
) -> QueryResult<CreatorScope> {
    let supervisors = if user.role == Role::Coordinator {
        hierarchy_edges::table
            .filter(hierarchy_edges::coordinator_id.eq(user.user_id))
            .select(hierarchy_edges::supervisor_id)
            .load::<Uuid>(conn)?
    } else {
        Vec::new()
    };

    Ok(CreatorScope::for_role(user.role, user.user_id, supervisors))
}

/// Materialized form of [`creator_scope`]: the full user set for `Everyone`.
pub fn visible_creators(
    conn: &mut PgConnection,
    user: &AuthenticatedUser,
) -> QueryResult<HashSet<Uuid>> {
    match creator_scope(conn, user)? {
        CreatorScope::Everyone => Ok(users::table
            .select(users::id)
            .load::<Uuid>(conn)?
            .into_iter()
            .collect()),
        CreatorScope::Only(ids) => Ok(ids),
    }
}
