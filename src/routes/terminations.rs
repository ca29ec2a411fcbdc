use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Response,
    Json,
};
use chrono::{NaiveDate, Utc};
use diesel::{pg::PgConnection, prelude::*};
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    auth::AuthenticatedUser,
    error::{AppError, AppResult},
    models::{NewTermination, RecordStatus, Termination, TerminationFields},
    notify,
    routes::records::{ensure_visible, xlsx_attachment, RecordListQuery, StatusUpdateRequest},
    schema::terminations,
    state::AppState,
    validation::{
        cpf, optional_amount, optional_digits, optional_text, required_text, ValidationResult,
    },
    visibility::creator_scope,
};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct TerminationPayload {
    pub name: Option<String>,
    pub cpf: Option<String>,
    pub rg: Option<String>,
    pub admitted_on: Option<NaiveDate>,
    pub terminated_on: Option<NaiveDate>,
    pub total_amount: Option<Decimal>,
    pub last_three_months_amount: Option<Decimal>,
    pub bank: Option<String>,
    pub agency: Option<String>,
    pub operation: Option<String>,
    pub checking_account: Option<String>,
    pub account_holder: Option<String>,
    pub phone: Option<String>,
}

impl TerminationPayload {
    pub fn validate(self) -> ValidationResult<TerminationFields> {
        Ok(TerminationFields {
            name: required_text("name", self.name, 100)?,
            cpf: cpf("cpf", self.cpf)?,
            rg: optional_text("rg", self.rg, 20)?,
            admitted_on: self.admitted_on,
            terminated_on: self.terminated_on,
            total_amount: optional_amount("total_amount", self.total_amount)?,
            last_three_months_amount: optional_amount(
                "last_three_months_amount",
                self.last_three_months_amount,
            )?,
            bank: optional_text("bank", self.bank, 50)?,
            agency: optional_digits("agency", self.agency, 10)?,
            operation: optional_digits("operation", self.operation, 5)?,
            checking_account: optional_digits("checking_account", self.checking_account, 15)?,
            account_holder: optional_text("account_holder", self.account_holder, 100)?,
            phone: optional_digits("phone", self.phone, 15)?,
        })
    }
}

pub async fn list_terminations(
    State(state): State<AppState>,
    Query(params): Query<RecordListQuery>,
    user: AuthenticatedUser,
) -> AppResult<Json<Vec<Termination>>> {
    let mut conn = state.db()?;
    let scope = creator_scope(&mut conn, &user)?;

    let mut query = terminations::table.into_boxed();
    if let Some(creators) = scope.creator_filter() {
        query = query.filter(terminations::created_by.eq_any(creators));
    }
    if let Some(status) = params.status_filter()? {
        query = query.filter(terminations::status.eq(status.as_str()));
    }
    if let Some(pattern) = params.search_pattern() {
        query = query.filter(
            terminations::name
                .ilike(pattern.clone())
                .or(terminations::cpf.ilike(pattern.clone()))
                .or(terminations::rg.ilike(pattern).assume_not_null()),
        );
    }
    if let Some(creator) = params.created_by {
        query = query.filter(terminations::created_by.eq(creator));
    }
    if let Some(from) = params.date_from {
        query = query.filter(terminations::terminated_on.ge(from));
    }
    if let Some(to) = params.date_to {
        query = query.filter(terminations::terminated_on.le(to));
    }

    let records = query
        .order(terminations::created_at.desc())
        .load::<Termination>(&mut conn)?;

    Ok(Json(records))
}

pub async fn create_termination(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<TerminationPayload>,
) -> AppResult<(StatusCode, Json<Termination>)> {
    let fields = payload.validate()?;

    let record = {
        let mut conn = state.db()?;
        let new_record = NewTermination {
            id: Uuid::new_v4(),
            created_by: Some(user.user_id),
            status: RecordStatus::default().as_str().to_string(),
            fields,
        };

        diesel::insert_into(terminations::table)
            .values(&new_record)
            .execute(&mut conn)?;

        terminations::table
            .find(new_record.id)
            .first::<Termination>(&mut conn)?
    };

    tracing::info!(
        record_id = %record.id,
        created_by = %user.user_id,
        "termination registered"
    );

    state
        .notify(notify::termination_created(&record, &user.username))
        .await;
    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn get_termination(
    State(state): State<AppState>,
    Path(record_id): Path<Uuid>,
    user: AuthenticatedUser,
) -> AppResult<Json<Termination>> {
    let mut conn = state.db()?;
    Ok(Json(load_visible(&mut conn, &user, record_id)?))
}

pub async fn update_termination(
    State(state): State<AppState>,
    Path(record_id): Path<Uuid>,
    user: AuthenticatedUser,
    Json(payload): Json<TerminationPayload>,
) -> AppResult<Json<Termination>> {
    let fields = payload.validate()?;
    let mut conn = state.db()?;
    load_visible(&mut conn, &user, record_id)?;

    diesel::update(terminations::table.find(record_id))
        .set((&fields, terminations::updated_at.eq(Utc::now().naive_utc())))
        .execute(&mut conn)?;

    let record = terminations::table
        .find(record_id)
        .first::<Termination>(&mut conn)?;
    Ok(Json(record))
}

pub async fn update_termination_status(
    State(state): State<AppState>,
    Path(record_id): Path<Uuid>,
    user: AuthenticatedUser,
    Json(payload): Json<StatusUpdateRequest>,
) -> AppResult<Json<Termination>> {
    let status = payload.parse()?;
    let mut conn = state.db()?;
    load_visible(&mut conn, &user, record_id)?;

    diesel::update(terminations::table.find(record_id))
        .set((
            terminations::status.eq(status.as_str()),
            terminations::updated_at.eq(Utc::now().naive_utc()),
        ))
        .execute(&mut conn)?;

    let record = terminations::table
        .find(record_id)
        .first::<Termination>(&mut conn)?;
    Ok(Json(record))
}

pub async fn delete_termination(
    State(state): State<AppState>,
    Path(record_id): Path<Uuid>,
    user: AuthenticatedUser,
) -> AppResult<StatusCode> {
    user.require_hr_or_admin()?;
    let mut conn = state.db()?;

    let deleted = diesel::delete(terminations::table.find(record_id)).execute(&mut conn)?;
    if deleted == 0 {
        return Err(AppError::not_found());
    }

    tracing::info!(record_id = %record_id, deleted_by = %user.user_id, "termination deleted");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn export_termination(
    State(state): State<AppState>,
    Path(record_id): Path<Uuid>,
    user: AuthenticatedUser,
) -> AppResult<Response> {
    user.require_hr_or_admin()?;
    let record = {
        let mut conn = state.db()?;
        terminations::table
            .find(record_id)
            .first::<Termination>(&mut conn)?
    };

    let exported = state.exporter.export(&record)?;
    xlsx_attachment(exported)
}

fn load_visible(
    conn: &mut PgConnection,
    user: &AuthenticatedUser,
    record_id: Uuid,
) -> AppResult<Termination> {
    let record = terminations::table
        .find(record_id)
        .first::<Termination>(conn)?;
    let scope = creator_scope(conn, user)?;
    ensure_visible(&scope, record.created_by)?;
    Ok(record)
}
