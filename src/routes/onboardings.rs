use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Response,
    Json,
};
use chrono::{NaiveDate, Utc};
use diesel::{pg::PgConnection, prelude::*};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    auth::AuthenticatedUser,
    error::{AppError, AppResult},
    models::{NewOnboarding, Onboarding, OnboardingFields, RecordStatus},
    notify,
    routes::records::{
        ensure_visible, is_unique_violation, xlsx_attachment, RecordListQuery,
        StatusUpdateRequest,
    },
    schema::onboardings,
    state::AppState,
    validation::{
        cpf, optional_digits, optional_text, required, required_email, required_text, state_code,
        ValidationError, ValidationResult,
    },
    visibility::creator_scope,
};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct OnboardingPayload {
    pub employee_code: Option<String>,
    pub name: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub birthplace: Option<String>,
    pub birth_state: Option<String>,
    pub mother_name: Option<String>,
    pub father_name: Option<String>,
    pub address: Option<String>,
    pub district: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub rg: Option<String>,
    pub rg_issuer: Option<String>,
    pub rg_issued_on: Option<NaiveDate>,
    pub cpf: Option<String>,
    pub bank: Option<String>,
    pub agency: Option<String>,
    pub account: Option<String>,
    pub operation: Option<String>,
    pub admitted_on: Option<NaiveDate>,
    pub job_title: Option<String>,
    pub is_replacement: bool,
    pub responsible_supervisor: Option<String>,
    pub coordinator_name: Option<String>,
    pub gov_account: Option<String>,
    pub gov_password: Option<String>,
    pub notes: Option<String>,
}

fn required_digits(
    field: &'static str,
    value: Option<String>,
    max: usize,
) -> ValidationResult<String> {
    optional_digits(field, value, max)?.ok_or(ValidationError::Required { field })
}

impl OnboardingPayload {
    pub fn validate(self) -> ValidationResult<OnboardingFields> {
        Ok(OnboardingFields {
            employee_code: required_text("employee_code", self.employee_code, 20)?,
            name: required_text("name", self.name, 100)?,
            birth_date: required("birth_date", self.birth_date)?,
            birthplace: required_text("birthplace", self.birthplace, 100)?,
            birth_state: state_code("birth_state", self.birth_state)?,
            mother_name: optional_text("mother_name", self.mother_name, 100)?,
            father_name: optional_text("father_name", self.father_name, 100)?,
            address: required_text("address", self.address, 200)?,
            district: required_text("district", self.district, 100)?,
            city: required_text("city", self.city, 100)?,
            state: required_text("state", self.state, 50)?,
            postal_code: required_text("postal_code", self.postal_code, 9)?,
            phone: required_text("phone", self.phone, 20)?,
            email: required_email("email", self.email, 254)?,
            rg: required_text("rg", self.rg, 20)?,
            rg_issuer: required_text("rg_issuer", self.rg_issuer, 20)?,
            rg_issued_on: required("rg_issued_on", self.rg_issued_on)?,
            cpf: cpf("cpf", self.cpf)?,
            bank: required_text("bank", self.bank, 50)?,
            agency: required_digits("agency", self.agency, 10)?,
            account: required_digits("account", self.account, 15)?,
            operation: required_digits("operation", self.operation, 5)?,
            admitted_on: required("admitted_on", self.admitted_on)?,
            job_title: required_text("job_title", self.job_title, 100)?,
            is_replacement: self.is_replacement,
            responsible_supervisor: required_text(
                "responsible_supervisor",
                self.responsible_supervisor,
                100,
            )?,
            coordinator_name: optional_text("coordinator_name", self.coordinator_name, 100)?,
            gov_account: optional_text("gov_account", self.gov_account, 100)?,
            gov_password: optional_text("gov_password", self.gov_password, 100)?,
            notes: optional_text("notes", self.notes, 2000)?,
        })
    }
}

pub async fn list_onboardings(
    State(state): State<AppState>,
    Query(params): Query<RecordListQuery>,
    user: AuthenticatedUser,
) -> AppResult<Json<Vec<Onboarding>>> {
    let mut conn = state.db()?;
    let scope = creator_scope(&mut conn, &user)?;

    let mut query = onboardings::table.into_boxed();
    if let Some(creators) = scope.creator_filter() {
        query = query.filter(onboardings::created_by.eq_any(creators));
    }
    if let Some(status) = params.status_filter()? {
        query = query.filter(onboardings::status.eq(status.as_str()));
    }
    if let Some(pattern) = params.search_pattern() {
        query = query.filter(
            onboardings::name
                .ilike(pattern.clone())
                .or(onboardings::employee_code.ilike(pattern.clone()))
                .or(onboardings::cpf.ilike(pattern.clone()))
                .or(onboardings::job_title.ilike(pattern.clone()))
                .or(onboardings::responsible_supervisor.ilike(pattern)),
        );
    }
    if let Some(job_title) = params.job_title_filter() {
        query = query.filter(onboardings::job_title.eq(job_title));
    }
    if let Some(creator) = params.created_by {
        query = query.filter(onboardings::created_by.eq(creator));
    }
    if let Some(from) = params.date_from {
        query = query.filter(onboardings::admitted_on.ge(from));
    }
    if let Some(to) = params.date_to {
        query = query.filter(onboardings::admitted_on.le(to));
    }

    let records = query
        .order((
            onboardings::registered_on.desc(),
            onboardings::created_at.desc(),
        ))
        .load::<Onboarding>(&mut conn)?;

    Ok(Json(records))
}

pub async fn create_onboarding(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<OnboardingPayload>,
) -> AppResult<(StatusCode, Json<Onboarding>)> {
    let fields = payload.validate()?;

    let record = {
        let mut conn = state.db()?;
        ensure_cpf_available(&mut conn, &fields.cpf, None)?;

        let new_record = NewOnboarding {
            id: Uuid::new_v4(),
            created_by: Some(user.user_id),
            status: RecordStatus::default().as_str().to_string(),
            fields,
        };

        match diesel::insert_into(onboardings::table)
            .values(&new_record)
            .execute(&mut conn)
        {
            Ok(_) => {}
            Err(err) if is_unique_violation(&err) => {
                return Err(duplicate_cpf_race(&new_record.fields.cpf));
            }
            Err(err) => return Err(AppError::from(err)),
        }

        onboardings::table
            .find(new_record.id)
            .first::<Onboarding>(&mut conn)?
    };

    tracing::info!(
        record_id = %record.id,
        employee_code = %record.employee_code,
        created_by = %user.user_id,
        "onboarding registered"
    );

    state
        .notify(notify::onboarding_created(&record, &user.username))
        .await;
    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn get_onboarding(
    State(state): State<AppState>,
    Path(record_id): Path<Uuid>,
    user: AuthenticatedUser,
) -> AppResult<Json<Onboarding>> {
    let mut conn = state.db()?;
    Ok(Json(load_visible(&mut conn, &user, record_id)?))
}

pub async fn update_onboarding(
    State(state): State<AppState>,
    Path(record_id): Path<Uuid>,
    user: AuthenticatedUser,
    Json(payload): Json<OnboardingPayload>,
) -> AppResult<Json<Onboarding>> {
    let fields = payload.validate()?;
    let mut conn = state.db()?;
    load_visible(&mut conn, &user, record_id)?;
    ensure_cpf_available(&mut conn, &fields.cpf, Some(record_id))?;

    match diesel::update(onboardings::table.find(record_id))
        .set((&fields, onboardings::updated_at.eq(Utc::now().naive_utc())))
        .execute(&mut conn)
    {
        Ok(_) => {}
        Err(err) if is_unique_violation(&err) => return Err(duplicate_cpf_race(&fields.cpf)),
        Err(err) => return Err(AppError::from(err)),
    }

    let record = onboardings::table
        .find(record_id)
        .first::<Onboarding>(&mut conn)?;
    Ok(Json(record))
}

pub async fn update_onboarding_status(
    State(state): State<AppState>,
    Path(record_id): Path<Uuid>,
    user: AuthenticatedUser,
    Json(payload): Json<StatusUpdateRequest>,
) -> AppResult<Json<Onboarding>> {
    let status = payload.parse()?;
    let mut conn = state.db()?;
    load_visible(&mut conn, &user, record_id)?;

    diesel::update(onboardings::table.find(record_id))
        .set((
            onboardings::status.eq(status.as_str()),
            onboardings::updated_at.eq(Utc::now().naive_utc()),
        ))
        .execute(&mut conn)?;

    let record = onboardings::table
        .find(record_id)
        .first::<Onboarding>(&mut conn)?;
    Ok(Json(record))
}

pub async fn delete_onboarding(
    State(state): State<AppState>,
    Path(record_id): Path<Uuid>,
    user: AuthenticatedUser,
) -> AppResult<StatusCode> {
    user.require_hr_or_admin()?;
    let mut conn = state.db()?;

    let deleted = diesel::delete(onboardings::table.find(record_id)).execute(&mut conn)?;
    if deleted == 0 {
        return Err(AppError::not_found());
    }

    tracing::info!(record_id = %record_id, deleted_by = %user.user_id, "onboarding deleted");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn export_onboarding(
    State(state): State<AppState>,
    Path(record_id): Path<Uuid>,
    user: AuthenticatedUser,
) -> AppResult<Response> {
    user.require_hr_or_admin()?;
    let record = {
        let mut conn = state.db()?;
        onboardings::table
            .find(record_id)
            .first::<Onboarding>(&mut conn)?
    };

    let exported = state.exporter.export(&record)?;
    xlsx_attachment(exported)
}

/// Rejects a CPF already held by another onboarding record.
fn ensure_cpf_available(
    conn: &mut PgConnection,
    cpf: &str,
    exclude: Option<Uuid>,
) -> AppResult<()> {
    let mut query = onboardings::table
        .filter(onboardings::cpf.eq(cpf))
        .select(onboardings::employee_code)
        .into_boxed();
    if let Some(record_id) = exclude {
        query = query.filter(onboardings::id.ne(record_id));
    }

    match query.first::<String>(conn).optional()? {
        Some(employee_code) => Err(ValidationError::DuplicateCpf {
            cpf: cpf.to_string(),
            employee_code,
        }
        .into()),
        None => Ok(()),
    }
}

fn duplicate_cpf_race(cpf: &str) -> AppError {
    AppError::bad_request(format!("an admission with CPF {cpf} is already registered"))
}

fn load_visible(
    conn: &mut PgConnection,
    user: &AuthenticatedUser,
    record_id: Uuid,
) -> AppResult<Onboarding> {
    let record = onboardings::table
        .find(record_id)
        .first::<Onboarding>(conn)?;
    let scope = creator_scope(conn, user)?;
    ensure_visible(&scope, record.created_by)?;
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> OnboardingPayload {
        OnboardingPayload {
            employee_code: Some("RCA-77".into()),
            name: Some("Bruno Alves".into()),
            birth_date: NaiveDate::from_ymd_opt(1995, 7, 20),
            birthplace: Some("Recife".into()),
            birth_state: Some("pe".into()),
            address: Some("Rua A, 10".into()),
            district: Some("Boa Vista".into()),
            city: Some("Recife".into()),
            state: Some("Pernambuco".into()),
            postal_code: Some("50000-000".into()),
            phone: Some("81999990000".into()),
            email: Some("bruno@example.com".into()),
            rg: Some("1234567".into()),
            rg_issuer: Some("SDS".into()),
            rg_issued_on: NaiveDate::from_ymd_opt(2012, 1, 10),
            cpf: Some("123.456.789-09".into()),
            bank: Some("Caixa".into()),
            agency: Some("0123".into()),
            account: Some("000123456".into()),
            operation: Some("013".into()),
            admitted_on: NaiveDate::from_ymd_opt(2024, 4, 1),
            job_title: Some("RCA".into()),
            responsible_supervisor: Some("João".into()),
            ..Default::default()
        }
    }

    #[test]
    fn normalizes_cpf_and_state() {
        let fields = payload().validate().unwrap();
        assert_eq!(fields.cpf, "12345678909");
        assert_eq!(fields.birth_state, "PE");
        assert_eq!(fields.gov_password, None);
    }

    #[test]
    fn bank_fields_must_be_digits() {
        let mut bad_agency = payload();
        bad_agency.agency = Some("01-23".into());
        assert_eq!(
            bad_agency.validate().unwrap_err(),
            ValidationError::NotDigits { field: "agency" }
        );

        let mut long_operation = payload();
        long_operation.operation = Some("123456".into());
        assert_eq!(
            long_operation.validate().unwrap_err(),
            ValidationError::TooLong {
                field: "operation",
                max: 5
            }
        );
    }

    #[test]
    fn short_cpf_is_rejected() {
        let mut short = payload();
        short.cpf = Some("1234567890".into());
        assert_eq!(
            short.validate().unwrap_err(),
            ValidationError::InvalidCpf { field: "cpf" }
        );
    }
}
