use std::collections::{HashMap, HashSet};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Response,
    Json,
};
use chrono::{NaiveDate, Utc};
use diesel::{dsl::count_star, pg::PgConnection, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    auth::AuthenticatedUser,
    error::{AppError, AppResult},
    export::{sheets::MISSING_SUPERVISOR, OffboardingSheet},
    models::{NewOffboarding, Offboarding, OffboardingFields, RecordStatus, User},
    notify,
    routes::records::{ensure_visible, xlsx_attachment, RecordListQuery, StatusUpdateRequest},
    schema::{offboardings, users},
    state::AppState,
    validation::{optional_text, required, required_text, ValidationResult},
    visibility::creator_scope,
};

const NOTES_MAX: usize = 2000;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct OffboardingPayload {
    pub employee_code: Option<String>,
    pub name: Option<String>,
    pub contact: Option<String>,
    pub hired_on: Option<NaiveDate>,
    pub terminated_on: Option<NaiveDate>,
    pub work_area: Option<String>,
    pub reason: Option<String>,
    pub uniform_returned: bool,
    pub voice_chip_returned: bool,
    pub data_chip_returned: bool,
    pub tablet_returned: bool,
    pub tablet_charger_returned: bool,
    pub tablet_headset_returned: bool,
    pub catalog_returned: bool,
    pub order_pad_returned: bool,
    pub resignation_letter_returned: bool,
    pub delinquency_report_returned: bool,
    pub replacement_in_selection: bool,
    pub telemarketing_released: bool,
    pub new_hire_planned: bool,
    pub notes: Option<String>,
}

impl OffboardingPayload {
    pub fn validate(self) -> ValidationResult<OffboardingFields> {
        Ok(OffboardingFields {
            employee_code: required_text("employee_code", self.employee_code, 20)?,
            name: required_text("name", self.name, 100)?,
            contact: optional_text("contact", self.contact, 50)?,
            hired_on: required("hired_on", self.hired_on)?,
            terminated_on: self.terminated_on,
            work_area: required_text("work_area", self.work_area, 100)?,
            reason: Some(required_text("reason", self.reason, NOTES_MAX)?),
            uniform_returned: self.uniform_returned,
            voice_chip_returned: self.voice_chip_returned,
            data_chip_returned: self.data_chip_returned,
            tablet_returned: self.tablet_returned,
            tablet_charger_returned: self.tablet_charger_returned,
            tablet_headset_returned: self.tablet_headset_returned,
            catalog_returned: self.catalog_returned,
            order_pad_returned: self.order_pad_returned,
            resignation_letter_returned: self.resignation_letter_returned,
            delinquency_report_returned: self.delinquency_report_returned,
            replacement_in_selection: self.replacement_in_selection,
            telemarketing_released: self.telemarketing_released,
            new_hire_planned: self.new_hire_planned,
            notes: optional_text("notes", self.notes, NOTES_MAX)?,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct OffboardingResponse {
    #[serde(flatten)]
    pub record: Offboarding,
    pub supervisor: String,
    /// Offboardings filed by the same creator, across all visibility scopes.
    pub creator_offboarding_count: i64,
}

pub async fn list_offboardings(
    State(state): State<AppState>,
    Query(params): Query<RecordListQuery>,
    user: AuthenticatedUser,
) -> AppResult<Json<Vec<OffboardingResponse>>> {
    let mut conn = state.db()?;
    let scope = creator_scope(&mut conn, &user)?;

    let mut query = offboardings::table.into_boxed();
    if let Some(creators) = scope.creator_filter() {
        query = query.filter(offboardings::created_by.eq_any(creators));
    }
    if let Some(status) = params.status_filter()? {
        query = query.filter(offboardings::status.eq(status.as_str()));
    }
    if let Some(pattern) = params.search_pattern() {
        query = query.filter(
            offboardings::name
                .ilike(pattern.clone())
                .or(offboardings::employee_code.ilike(pattern.clone()))
                .or(offboardings::work_area.ilike(pattern)),
        );
    }
    if let Some(work_area) = params.work_area_filter() {
        query = query.filter(offboardings::work_area.eq(work_area));
    }
    if let Some(creator) = params.created_by {
        query = query.filter(offboardings::created_by.eq(creator));
    }
    if let Some(from) = params.date_from {
        query = query.filter(offboardings::terminated_on.ge(from));
    }
    if let Some(to) = params.date_to {
        query = query.filter(offboardings::terminated_on.le(to));
    }

    let records: Vec<Offboarding> = query
        .order((
            offboardings::registered_on.desc(),
            offboardings::created_at.desc(),
        ))
        .load(&mut conn)?;

    Ok(Json(to_responses(&mut conn, records)?))
}

pub async fn create_offboarding(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<OffboardingPayload>,
) -> AppResult<(StatusCode, Json<OffboardingResponse>)> {
    let fields = payload.validate()?;

    let (response, notification) = {
        let mut conn = state.db()?;
        let new_record = NewOffboarding {
            id: Uuid::new_v4(),
            created_by: Some(user.user_id),
            status: RecordStatus::default().as_str().to_string(),
            fields,
        };

        diesel::insert_into(offboardings::table)
            .values(&new_record)
            .execute(&mut conn)?;

        let record: Offboarding = offboardings::table.find(new_record.id).first(&mut conn)?;
        tracing::info!(
            record_id = %record.id,
            employee_code = %record.employee_code,
            created_by = %user.user_id,
            "offboarding registered"
        );

        let notification = notify::offboarding_created(&record, &user.username);
        (to_response(&mut conn, record)?, notification)
    };

    state.notify(notification).await;
    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn get_offboarding(
    State(state): State<AppState>,
    Path(record_id): Path<Uuid>,
    user: AuthenticatedUser,
) -> AppResult<Json<OffboardingResponse>> {
    let mut conn = state.db()?;
    let record = load_visible(&mut conn, &user, record_id)?;
    Ok(Json(to_response(&mut conn, record)?))
}

pub async fn update_offboarding(
    State(state): State<AppState>,
    Path(record_id): Path<Uuid>,
    user: AuthenticatedUser,
    Json(payload): Json<OffboardingPayload>,
) -> AppResult<Json<OffboardingResponse>> {
    let fields = payload.validate()?;
    let mut conn = state.db()?;
    load_visible(&mut conn, &user, record_id)?;

    diesel::update(offboardings::table.find(record_id))
        .set((
            &fields,
            offboardings::updated_at.eq(Utc::now().naive_utc()),
        ))
        .execute(&mut conn)?;

    let record: Offboarding = offboardings::table.find(record_id).first(&mut conn)?;
    Ok(Json(to_response(&mut conn, record)?))
}

pub async fn update_offboarding_status(
    State(state): State<AppState>,
    Path(record_id): Path<Uuid>,
    user: AuthenticatedUser,
    Json(payload): Json<StatusUpdateRequest>,
) -> AppResult<Json<OffboardingResponse>> {
    let status = payload.parse()?;
    let mut conn = state.db()?;
    load_visible(&mut conn, &user, record_id)?;

    diesel::update(offboardings::table.find(record_id))
        .set((
            offboardings::status.eq(status.as_str()),
            offboardings::updated_at.eq(Utc::now().naive_utc()),
        ))
        .execute(&mut conn)?;

    let record: Offboarding = offboardings::table.find(record_id).first(&mut conn)?;
    Ok(Json(to_response(&mut conn, record)?))
}

pub async fn delete_offboarding(
    State(state): State<AppState>,
    Path(record_id): Path<Uuid>,
    user: AuthenticatedUser,
) -> AppResult<StatusCode> {
    user.require_hr_or_admin()?;
    let mut conn = state.db()?;

    let deleted = diesel::delete(offboardings::table.find(record_id)).execute(&mut conn)?;
    if deleted == 0 {
        return Err(AppError::not_found());
    }

    tracing::info!(record_id = %record_id, deleted_by = %user.user_id, "offboarding deleted");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn export_offboarding(
    State(state): State<AppState>,
    Path(record_id): Path<Uuid>,
    user: AuthenticatedUser,
) -> AppResult<Response> {
    user.require_hr_or_admin()?;
    let mut conn = state.db()?;

    let record: Offboarding = offboardings::table.find(record_id).first(&mut conn)?;
    let creator = match record.created_by {
        Some(creator_id) => users::table
            .find(creator_id)
            .first::<User>(&mut conn)
            .optional()?,
        None => None,
    };
    drop(conn);

    let sheet = OffboardingSheet::new(record, creator.as_ref());
    let exported = state.exporter.export(&sheet)?;
    xlsx_attachment(exported)
}

fn load_visible(
    conn: &mut PgConnection,
    user: &AuthenticatedUser,
    record_id: Uuid,
) -> AppResult<Offboarding> {
    let record: Offboarding = offboardings::table.find(record_id).first(conn)?;
    let scope = creator_scope(conn, user)?;
    ensure_visible(&scope, record.created_by)?;
    Ok(record)
}

fn to_response(conn: &mut PgConnection, record: Offboarding) -> AppResult<OffboardingResponse> {
    to_responses(conn, vec![record])?
        .into_iter()
        .next()
        .ok_or_else(AppError::not_found)
}

fn to_responses(
    conn: &mut PgConnection,
    records: Vec<Offboarding>,
) -> AppResult<Vec<OffboardingResponse>> {
    let creator_ids: Vec<Uuid> = records
        .iter()
        .filter_map(|record| record.created_by)
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();

    if creator_ids.is_empty() {
        return Ok(records
            .into_iter()
            .map(|record| OffboardingResponse {
                record,
                supervisor: MISSING_SUPERVISOR.to_string(),
                creator_offboarding_count: 0,
            })
            .collect());
    }

    let labels: HashMap<Uuid, String> = users::table
        .filter(users::id.eq_any(creator_ids.clone()))
        .load::<User>(conn)?
        .into_iter()
        .map(|creator| (creator.id, creator.supervisor_label()))
        .collect();

    let count_rows: Vec<(Option<Uuid>, i64)> = offboardings::table
        .filter(offboardings::created_by.eq_any(creator_ids))
        .group_by(offboardings::created_by)
        .select((offboardings::created_by, count_star()))
        .load(conn)?;
    let counts: HashMap<Uuid, i64> = count_rows
        .into_iter()
        .filter_map(|(creator, count)| creator.map(|id| (id, count)))
        .collect();

    Ok(records
        .into_iter()
        .map(|record| {
            let creator = record.created_by;
            OffboardingResponse {
                supervisor: creator
                    .and_then(|id| labels.get(&id).cloned())
                    .unwrap_or_else(|| MISSING_SUPERVISOR.to_string()),
                creator_offboarding_count: creator
                    .and_then(|id| counts.get(&id).copied())
                    .unwrap_or(0),
                record,
            }
        })
        .collect())
}
