use axum::{extract::State, Json};
use diesel::prelude::*;
use serde::Serialize;
use uuid::Uuid;

use crate::{
    auth::{AuthenticatedUser, Role},
    error::AppResult,
    models::User,
    schema::users,
    state::AppState,
};

#[derive(Debug, Serialize)]
pub struct UserSummary {
    pub id: Uuid,
    pub username: String,
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub role: Role,
}

impl From<User> for UserSummary {
    fn from(user: User) -> Self {
        Self {
            role: Role::from_stored(&user.role),
            id: user.id,
            username: user.username,
            display_name: user.display_name,
            email: user.email,
        }
    }
}

pub async fn list_users(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> AppResult<Json<Vec<UserSummary>>> {
    user.require_hr_or_admin()?;
    let mut conn = state.db()?;

    let rows: Vec<User> = users::table
        .order(users::username.asc())
        .load(&mut conn)?;

    Ok(Json(rows.into_iter().map(UserSummary::from).collect()))
}
