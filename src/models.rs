use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schema::*;

/// Lifecycle marker shared by every record kind. Transitions are unconstrained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RecordStatus {
    #[default]
    Pending,
    Confirmed,
    Exchange,
}

impl RecordStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            RecordStatus::Pending => "pending",
            RecordStatus::Confirmed => "confirmed",
            RecordStatus::Exchange => "exchange",
        }
    }
}

impl fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(RecordStatus::Pending),
            "confirmed" => Ok(RecordStatus::Confirmed),
            "exchange" => Ok(RecordStatus::Exchange),
            other => Err(format!("unknown record status: {other}")),
        }
    }
}

#[derive(Debug, Clone, Queryable, Identifiable)]
#[diesel(table_name = users)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub password_hash: String,
    pub role: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl User {
    /// Label printed as "supervisor" on offboarding sheets and lists.
    pub fn supervisor_label(&self) -> String {
        match self.display_name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => self.username.clone(),
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = users)]
pub struct NewUser {
    pub id: Uuid,
    pub username: String,
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub password_hash: String,
    pub role: String,
}

#[derive(Debug, Clone, Queryable, Identifiable, Serialize)]
#[diesel(table_name = hierarchy_edges)]
pub struct HierarchyEdge {
    pub id: Uuid,
    pub coordinator_id: Uuid,
    pub supervisor_id: Uuid,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = hierarchy_edges)]
pub struct NewHierarchyEdge {
    pub id: Uuid,
    pub coordinator_id: Uuid,
    pub supervisor_id: Uuid,
}

#[derive(Debug, Clone, Queryable, Identifiable, Serialize)]
#[diesel(table_name = offboardings)]
pub struct Offboarding {
    pub id: Uuid,
    pub employee_code: String,
    pub name: String,
    pub contact: Option<String>,
    pub hired_on: NaiveDate,
    pub terminated_on: Option<NaiveDate>,
    pub work_area: String,
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
    pub registered_on: NaiveDate,
    pub created_by: Option<Uuid>,
    pub status: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Offboarding {
    /// Returned-item flags in sheet order (A10 through A19).
    pub fn returned_items(&self) -> [bool; 10] {
        [
            self.uniform_returned,
            self.voice_chip_returned,
            self.data_chip_returned,
            self.tablet_returned,
            self.tablet_charger_returned,
            self.tablet_headset_returned,
            self.catalog_returned,
            self.order_pad_returned,
            self.resignation_letter_returned,
            self.delinquency_report_returned,
        ]
    }
}

/// Editable offboarding columns, shared by insert and full update.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = offboardings, treat_none_as_null = true)]
pub struct OffboardingFields {
    pub employee_code: String,
    pub name: String,
    pub contact: Option<String>,
    pub hired_on: NaiveDate,
    pub terminated_on: Option<NaiveDate>,
    pub work_area: String,
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

#[derive(Debug, Insertable)]
#[diesel(table_name = offboardings)]
pub struct NewOffboarding {
    pub id: Uuid,
    pub created_by: Option<Uuid>,
    pub status: String,
    #[diesel(embed)]
    pub fields: OffboardingFields,
}

#[derive(Debug, Clone, Queryable, Identifiable, Serialize)]
#[diesel(table_name = onboardings)]
pub struct Onboarding {
    pub id: Uuid,
    pub employee_code: String,
    pub name: String,
    pub birth_date: NaiveDate,
    pub birthplace: String,
    pub birth_state: String,
    pub mother_name: Option<String>,
    pub father_name: Option<String>,
    pub address: String,
    pub district: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub phone: String,
    pub email: String,
    pub rg: String,
    pub rg_issuer: String,
    pub rg_issued_on: NaiveDate,
    pub cpf: String,
    pub bank: String,
    pub agency: String,
    pub account: String,
    pub operation: String,
    pub admitted_on: NaiveDate,
    pub job_title: String,
    pub is_replacement: bool,
    pub responsible_supervisor: String,
    pub coordinator_name: Option<String>,
    pub gov_account: Option<String>,
    pub gov_password: Option<String>,
    pub notes: Option<String>,
    pub registered_on: NaiveDate,
    pub created_by: Option<Uuid>,
    pub status: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = onboardings, treat_none_as_null = true)]
pub struct OnboardingFields {
    pub employee_code: String,
    pub name: String,
    pub birth_date: NaiveDate,
    pub birthplace: String,
    pub birth_state: String,
    pub mother_name: Option<String>,
    pub father_name: Option<String>,
    pub address: String,
    pub district: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub phone: String,
    pub email: String,
    pub rg: String,
    pub rg_issuer: String,
    pub rg_issued_on: NaiveDate,
    pub cpf: String,
    pub bank: String,
    pub agency: String,
    pub account: String,
    pub operation: String,
    pub admitted_on: NaiveDate,
    pub job_title: String,
    pub is_replacement: bool,
    pub responsible_supervisor: String,
    pub coordinator_name: Option<String>,
    pub gov_account: Option<String>,
    pub gov_password: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = onboardings)]
pub struct NewOnboarding {
    pub id: Uuid,
    pub created_by: Option<Uuid>,
    pub status: String,
    #[diesel(embed)]
    pub fields: OnboardingFields,
}

#[derive(Debug, Clone, Queryable, Identifiable, Serialize)]
#[diesel(table_name = terminations)]
pub struct Termination {
    pub id: Uuid,
    pub name: String,
    pub cpf: String,
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
    pub created_by: Option<Uuid>,
    pub status: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = terminations, treat_none_as_null = true)]
pub struct TerminationFields {
    pub name: String,
    pub cpf: String,
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

#[derive(Debug, Insertable)]
#[diesel(table_name = terminations)]
pub struct NewTermination {
    pub id: Uuid,
    pub created_by: Option<Uuid>,
    pub status: String,
    #[diesel(embed)]
    pub fields: TerminationFields,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parses_case_insensitively() {
        assert_eq!("Confirmed".parse(), Ok(RecordStatus::Confirmed));
        assert_eq!(" exchange ".parse(), Ok(RecordStatus::Exchange));
        assert!("archived".parse::<RecordStatus>().is_err());
    }

    #[test]
    fn supervisor_label_prefers_display_name() {
        let mut user = User {
            id: Uuid::new_v4(),
            username: "jsilva".into(),
            display_name: Some("João".into()),
            email: None,
            password_hash: String::new(),
            role: "front_line".into(),
            created_at: NaiveDateTime::default(),
            updated_at: NaiveDateTime::default(),
        };
        assert_eq!(user.supervisor_label(), "João");

        user.display_name = Some("  ".into());
        assert_eq!(user.supervisor_label(), "jsilva");
    }
}
