use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use diesel::{pg::PgConnection, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    auth::AuthenticatedUser,
    error::{AppError, AppResult},
    models::{HierarchyEdge, NewHierarchyEdge, User},
    routes::records::is_unique_violation,
    schema::{hierarchy_edges, users},
    state::AppState,
};

#[derive(Debug, Default, Deserialize)]
pub struct HierarchyQuery {
    /// Case-insensitive username match on either side of the edge.
    pub q: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateEdgeRequest {
    pub coordinator_id: Uuid,
    pub supervisor_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct HierarchyEdgeResponse {
    pub id: Uuid,
    pub coordinator_id: Uuid,
    pub coordinator_username: String,
    pub supervisor_id: Uuid,
    pub supervisor_username: String,
}

pub async fn list_edges(
    State(state): State<AppState>,
    Query(params): Query<HierarchyQuery>,
    user: AuthenticatedUser,
) -> AppResult<Json<Vec<HierarchyEdgeResponse>>> {
    user.require_hr_or_admin()?;
    let mut conn = state.db()?;

    let edges: Vec<HierarchyEdge> = hierarchy_edges::table
        .order(hierarchy_edges::created_at.asc())
        .load(&mut conn)?;
    let usernames: HashMap<Uuid, String> = users::table
        .select((users::id, users::username))
        .load::<(Uuid, String)>(&mut conn)?
        .into_iter()
        .collect();

    let needle = params
        .q
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .map(str::to_lowercase);

    let response = edges
        .into_iter()
        .filter_map(|edge| {
            let coordinator_username = usernames.get(&edge.coordinator_id)?.clone();
            let supervisor_username = usernames.get(&edge.supervisor_id)?.clone();
            Some(HierarchyEdgeResponse {
                id: edge.id,
                coordinator_id: edge.coordinator_id,
                coordinator_username,
                supervisor_id: edge.supervisor_id,
                supervisor_username,
            })
        })
        .filter(|edge| match &needle {
            Some(needle) => {
                edge.coordinator_username.to_lowercase().contains(needle)
                    || edge.supervisor_username.to_lowercase().contains(needle)
            }
            None => true,
        })
        .collect();

    Ok(Json(response))
}

pub async fn create_edge(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<CreateEdgeRequest>,
) -> AppResult<(StatusCode, Json<HierarchyEdgeResponse>)> {
    user.require_hr_or_admin()?;

    if payload.coordinator_id == payload.supervisor_id {
        return Err(AppError::bad_request(
            "a coordinator cannot be linked to themselves",
        ));
    }

    let mut conn = state.db()?;
    let coordinator = find_user(&mut conn, payload.coordinator_id, "coordinator")?;
    let supervisor = find_user(&mut conn, payload.supervisor_id, "supervisor")?;

    let new_edge = NewHierarchyEdge {
        id: Uuid::new_v4(),
        coordinator_id: coordinator.id,
        supervisor_id: supervisor.id,
    };

    match diesel::insert_into(hierarchy_edges::table)
        .values(&new_edge)
        .execute(&mut conn)
    {
        Ok(_) => {}
        Err(err) if is_unique_violation(&err) => {
            return Err(AppError::bad_request(format!(
                "{} is already linked to {}",
                supervisor.username, coordinator.username
            )));
        }
        Err(err) => return Err(AppError::from(err)),
    }

    tracing::info!(
        coordinator = %coordinator.username,
        supervisor = %supervisor.username,
        linked_by = %user.user_id,
        "hierarchy edge created"
    );

    Ok((
        StatusCode::CREATED,
        Json(HierarchyEdgeResponse {
            id: new_edge.id,
            coordinator_id: coordinator.id,
            coordinator_username: coordinator.username,
            supervisor_id: supervisor.id,
            supervisor_username: supervisor.username,
        }),
    ))
}

pub async fn delete_edge(
    State(state): State<AppState>,
    Path(edge_id): Path<Uuid>,
    user: AuthenticatedUser,
) -> AppResult<StatusCode> {
    user.require_hr_or_admin()?;
    let mut conn = state.db()?;

    let deleted = diesel::delete(hierarchy_edges::table.find(edge_id)).execute(&mut conn)?;
    if deleted == 0 {
        return Err(AppError::not_found());
    }

    tracing::info!(edge_id = %edge_id, unlinked_by = %user.user_id, "hierarchy edge deleted");
    Ok(StatusCode::NO_CONTENT)
}

fn find_user(conn: &mut PgConnection, user_id: Uuid, side: &str) -> AppResult<User> {
    users::table
        .find(user_id)
        .first::<User>(conn)
        .optional()?
        .ok_or_else(|| AppError::bad_request(format!("{side} user {user_id} does not exist")))
}
