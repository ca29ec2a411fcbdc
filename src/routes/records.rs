//! Pieces shared by the offboarding, onboarding and termination handlers.

use axum::{
    http::{
        header::{CONTENT_DISPOSITION, CONTENT_TYPE},
        HeaderValue,
    },
    response::{IntoResponse, Response},
};
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    export::{ExportedSheet, XLSX_CONTENT_TYPE},
    models::RecordStatus,
    visibility::CreatorScope,
};

/// List filters. `date_from`/`date_to` bound the kind's main date column
/// (termination date, or admission date for onboardings), inclusive.
#[derive(Debug, Default, Deserialize)]
pub struct RecordListQuery {
    pub status: Option<String>,
    pub q: Option<String>,
    pub created_by: Option<Uuid>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub work_area: Option<String>,
    pub job_title: Option<String>,
}

impl RecordListQuery {
    pub fn status_filter(&self) -> AppResult<Option<RecordStatus>> {
        match self.status.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(value) => value
                .parse::<RecordStatus>()
                .map(Some)
                .map_err(AppError::bad_request),
        }
    }

    /// `ILIKE` pattern for the free-text filter, wildcards in the input escaped.
    pub fn search_pattern(&self) -> Option<String> {
        let text = self.q.as_deref().map(str::trim).filter(|q| !q.is_empty())?;
        let escaped = text
            .replace('\\', "\\\\")
            .replace('%', "\\%")
            .replace('_', "\\_");
        Some(format!("%{escaped}%"))
    }

    pub fn work_area_filter(&self) -> Option<String> {
        exact_text(self.work_area.as_deref())
    }

    pub fn job_title_filter(&self) -> Option<String> {
        exact_text(self.job_title.as_deref())
    }
}

fn exact_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: String,
}

impl StatusUpdateRequest {
    pub fn parse(&self) -> AppResult<RecordStatus> {
        self.status.parse().map_err(AppError::bad_request)
    }
}

/// Out-of-scope records answer exactly like missing ones.
pub fn ensure_visible(scope: &CreatorScope, creator: Option<Uuid>) -> AppResult<()> {
    if scope.permits(creator) {
        Ok(())
    } else {
        Err(AppError::not_found())
    }
}

pub fn is_unique_violation(err: &diesel::result::Error) -> bool {
    matches!(
        err,
        diesel::result::Error::DatabaseError(diesel::result::DatabaseErrorKind::UniqueViolation, _)
    )
}

fn attachment_content_disposition(filename: &str) -> String {
    let sanitized: String = filename
        .chars()
        .map(|ch| match ch {
            '"' | '\\' | '\r' | '\n' => '_',
            _ => ch,
        })
        .collect();
    let ascii_fallback: String = sanitized
        .chars()
        .map(|ch| if ch.is_ascii() { ch } else { '_' })
        .collect();
    let encoded =
        percent_encoding::utf8_percent_encode(&sanitized, percent_encoding::NON_ALPHANUMERIC);
    format!("attachment; filename=\"{ascii_fallback}\"; filename*=UTF-8''{encoded}")
}

pub fn xlsx_attachment(sheet: ExportedSheet) -> AppResult<Response> {
    let disposition = HeaderValue::from_str(&attachment_content_disposition(&sheet.filename))
        .map_err(|err| AppError::internal(format!("invalid export filename: {err}")))?;

    Ok((
        [
            (CONTENT_TYPE, HeaderValue::from_static(XLSX_CONTENT_TYPE)),
            (CONTENT_DISPOSITION, disposition),
        ],
        sheet.bytes,
    )
        .into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_pattern_escapes_wildcards() {
        let query = RecordListQuery {
            q: Some(" 50%_off ".into()),
            ..Default::default()
        };
        assert_eq!(query.search_pattern().as_deref(), Some("%50\\%\\_off%"));
        assert_eq!(RecordListQuery::default().search_pattern(), None);
    }

    #[test]
    fn status_filter_rejects_unknown_values() {
        let query = RecordListQuery {
            status: Some("archived".into()),
            ..Default::default()
        };
        assert_eq!(query.status_filter().unwrap_err().status().as_u16(), 400);

        let query = RecordListQuery {
            status: Some("EXCHANGE".into()),
            ..Default::default()
        };
        assert_eq!(query.status_filter().unwrap(), Some(RecordStatus::Exchange));
    }

    #[test]
    fn blank_exact_filters_are_ignored() {
        let query = RecordListQuery {
            work_area: Some("  Zona Sul ".into()),
            job_title: Some("   ".into()),
            ..Default::default()
        };
        assert_eq!(query.work_area_filter().as_deref(), Some("Zona Sul"));
        assert_eq!(query.job_title_filter(), None);
    }

    #[test]
    fn content_disposition_keeps_filename_and_encodes_it() {
        let header = attachment_content_disposition("desligamento_RCA-12.xlsx");
        assert!(header.starts_with("attachment; filename=\"desligamento_RCA-12.xlsx\""));
        assert!(header.contains("filename*=UTF-8''desligamento%5FRCA%2D12%2Exlsx"));

        let header = attachment_content_disposition("admissao_Jo\"ão.xlsx");
        assert!(header.contains("filename=\"admissao_Jo__o.xlsx\""));
    }
}
