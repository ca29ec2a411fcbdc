//! Record-to-spreadsheet export.
//!
//! Each record kind owns a fixed cell table (see [`sheets`]) that is written
//! into a per-kind `.xlsx` template loaded from the configured directory.

pub mod sheets;
pub mod xlsx;

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

pub use sheets::OffboardingSheet;
pub use xlsx::{CellValue, CellWrite, TemplateError, XLSX_CONTENT_TYPE};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Offboarding,
    Onboarding,
    Termination,
}

impl RecordKind {
    pub const ALL: [RecordKind; 3] = [
        RecordKind::Offboarding,
        RecordKind::Onboarding,
        RecordKind::Termination,
    ];

    pub fn slug(self) -> &'static str {
        match self {
            RecordKind::Offboarding => "desligamento",
            RecordKind::Onboarding => "admissao",
            RecordKind::Termination => "distrato",
        }
    }

    pub fn template_file(self) -> &'static str {
        match self {
            RecordKind::Offboarding => "FORMULÁRIO DESLIGAMENTO RCA.xlsx",
            RecordKind::Onboarding => "FORMULÁRIO ADMISSAO RCA.xlsx",
            RecordKind::Termination => "FORMULÁRIO DISTRATO RCA.xlsx",
        }
    }
}

/// `(coordinate, extractor)` pairs written in order into a template.
pub type CellMap<T> = &'static [(&'static str, fn(&T) -> CellValue)];

pub trait SheetSource: Sized + 'static {
    const KIND: RecordKind;
    const CELLS: CellMap<Self>;

    /// Code used in the download filename.
    fn identifying_code(&self) -> String;

    fn cells(&self) -> Vec<CellWrite> {
        Self::CELLS
            .iter()
            .map(|(coordinate, extract)| CellWrite {
                coordinate: *coordinate,
                value: extract(self),
            })
            .collect()
    }

    fn coordinates() -> Vec<&'static str> {
        Self::CELLS.iter().map(|(coordinate, _)| *coordinate).collect()
    }
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("spreadsheet template {} is unavailable: {source}", .path.display())]
    TemplateUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("spreadsheet template {} cannot be filled: {source}", .path.display())]
    Template {
        path: PathBuf,
        #[source]
        source: TemplateError,
    },
}

#[derive(Debug, Clone)]
pub struct ExportedSheet {
    pub filename: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct Exporter {
    template_dir: PathBuf,
}

impl Exporter {
    pub fn new(template_dir: impl Into<PathBuf>) -> Self {
        Self {
            template_dir: template_dir.into(),
        }
    }

    pub fn template_path(&self, kind: RecordKind) -> PathBuf {
        self.template_dir.join(kind.template_file())
    }

    pub fn export<S: SheetSource>(&self, source: &S) -> Result<ExportedSheet, ExportError> {
        let path = self.template_path(S::KIND);
        let template = load_template(&path)?;
        let bytes = xlsx::fill_template(&template, &source.cells())
            .map_err(|source| ExportError::Template { path, source })?;
        let filename = export_filename(S::KIND, &source.identifying_code());

        tracing::info!(
            kind = S::KIND.slug(),
            filename = %filename,
            size_bytes = bytes.len(),
            "record spreadsheet exported"
        );

        Ok(ExportedSheet { filename, bytes })
    }

    /// Checks that every template exists and accepts its cell table.
    pub fn verify_templates(&self) -> Result<(), ExportError> {
        self.verify::<OffboardingSheet>()?;
        self.verify::<crate::models::Onboarding>()?;
        self.verify::<crate::models::Termination>()?;
        Ok(())
    }

    fn verify<S: SheetSource>(&self) -> Result<(), ExportError> {
        let path = self.template_path(S::KIND);
        let template = load_template(&path)?;
        xlsx::verify_template(&template, &S::coordinates())
            .map_err(|source| ExportError::Template { path, source })
    }
}

fn load_template(path: &Path) -> Result<Vec<u8>, ExportError> {
    std::fs::read(path).map_err(|source| ExportError::TemplateUnavailable {
        path: path.to_path_buf(),
        source,
    })
}

pub fn export_filename(kind: RecordKind, identifying_code: &str) -> String {
    format!("{}_{}.xlsx", kind.slug(), identifying_code)
}

pub fn text(value: &str) -> CellValue {
    CellValue::Text(value.to_string())
}

pub fn optional_text(value: Option<&str>) -> CellValue {
    CellValue::Text(value.unwrap_or_default().to_string())
}

pub fn date(value: Option<NaiveDate>) -> CellValue {
    CellValue::Text(
        value
            .map(|date| date.format("%d/%m/%Y").to_string())
            .unwrap_or_default(),
    )
}

pub fn yes_no(value: bool) -> CellValue {
    CellValue::Text(if value { "SIM" } else { "NÃO" }.to_string())
}

pub fn amount(value: Option<Decimal>) -> CellValue {
    CellValue::Number(
        value
            .map(|amount| amount.round_dp(2).normalize().to_string())
            .unwrap_or_else(|| "0".to_string()),
    )
}
