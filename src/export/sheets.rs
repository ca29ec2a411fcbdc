//! Cell tables for the three record forms.

use super::{amount, date, optional_text, text, yes_no, CellMap, RecordKind, SheetSource};
use crate::models::{Offboarding, Onboarding, Termination, User};

/// Placeholder printed when an offboarding has no surviving creator.
pub const MISSING_SUPERVISOR: &str = "—";

/// An offboarding together with the label of the supervisor who filed it.
#[derive(Debug, Clone)]
pub struct OffboardingSheet {
    pub record: Offboarding,
    pub supervisor: String,
}

impl OffboardingSheet {
    pub fn new(record: Offboarding, creator: Option<&User>) -> Self {
        let supervisor = creator
            .map(User::supervisor_label)
            .unwrap_or_else(|| MISSING_SUPERVISOR.to_string());
        Self { record, supervisor }
    }

    fn item(&self, index: usize) -> bool {
        self.record.returned_items()[index]
    }
}

impl SheetSource for OffboardingSheet {
    const KIND: RecordKind = RecordKind::Offboarding;
    const CELLS: CellMap<Self> = &[
        ("B3", |s: &Self| text(&s.supervisor)),
        ("E3", |s: &Self| date(s.record.terminated_on)),
        ("A6", |s: &Self| text(&s.record.employee_code)),
        ("B6", |s: &Self| text(&s.record.name)),
        ("C6", |s: &Self| optional_text(s.record.contact.as_deref())),
        ("D6", |s: &Self| date(Some(s.record.hired_on))),
        ("E6", |s: &Self| date(s.record.terminated_on)),
        ("F6", |s: &Self| text(&s.record.work_area)),
        ("C7", |s: &Self| optional_text(s.record.reason.as_deref())),
        ("A10", |s: &Self| yes_no(s.item(0))),
        ("A11", |s: &Self| yes_no(s.item(1))),
        ("A12", |s: &Self| yes_no(s.item(2))),
        ("A13", |s: &Self| yes_no(s.item(3))),
        ("A14", |s: &Self| yes_no(s.item(4))),
        ("A15", |s: &Self| yes_no(s.item(5))),
        ("A16", |s: &Self| yes_no(s.item(6))),
        ("A17", |s: &Self| yes_no(s.item(7))),
        ("A18", |s: &Self| yes_no(s.item(8))),
        ("A19", |s: &Self| yes_no(s.item(9))),
        ("E22", |s: &Self| yes_no(s.record.replacement_in_selection)),
        ("E23", |s: &Self| yes_no(s.record.telemarketing_released)),
        ("E24", |s: &Self| yes_no(s.record.new_hire_planned)),
    ];

    fn identifying_code(&self) -> String {
        self.record.employee_code.clone()
    }
}

impl SheetSource for Onboarding {
    const KIND: RecordKind = RecordKind::Onboarding;
    const CELLS: CellMap<Self> = &[
        ("G3", |r: &Self| text(&r.employee_code)),
        ("B6", |r: &Self| text(&r.name)),
        ("B7", |r: &Self| date(Some(r.birth_date))),
        ("E7", |r: &Self| text(&r.birthplace)),
        ("B8", |r: &Self| optional_text(r.mother_name.as_deref())),
        ("B9", |r: &Self| optional_text(r.father_name.as_deref())),
        ("B10", |r: &Self| text(&r.address)),
        ("B11", |r: &Self| text(&r.district)),
        ("F11", |r: &Self| text(&r.postal_code)),
        ("B12", |r: &Self| text(&r.city)),
        ("B13", |r: &Self| text(&r.phone)),
        ("E13", |r: &Self| text(&r.email)),
        ("B14", |r: &Self| text(&r.rg)),
        ("E14", |r: &Self| text(&r.rg_issuer)),
        ("G14", |r: &Self| date(Some(r.rg_issued_on))),
        ("B15", |r: &Self| text(&r.cpf)),
        ("B16", |r: &Self| text(&r.agency)),
        ("E16", |r: &Self| text(&r.account)),
        ("G16", |r: &Self| text(&r.operation)),
        ("B18", |r: &Self| date(Some(r.admitted_on))),
        ("D18", |r: &Self| text(&r.job_title)),
        ("F18", |r: &Self| yes_no(r.is_replacement)),
        ("C19", |r: &Self| text(&r.responsible_supervisor)),
        ("F19", |r: &Self| optional_text(r.coordinator_name.as_deref())),
        ("B20", |r: &Self| optional_text(r.gov_account.as_deref())),
        ("D20", |r: &Self| optional_text(r.gov_password.as_deref())),
    ];

    fn identifying_code(&self) -> String {
        self.employee_code.clone()
    }
}

impl SheetSource for Termination {
    const KIND: RecordKind = RecordKind::Termination;
    const CELLS: CellMap<Self> = &[
        ("B5", |r: &Self| text(&r.name)),
        ("E5", |r: &Self| text(&r.cpf)),
        ("F5", |r: &Self| optional_text(r.rg.as_deref())),
        ("B10", |r: &Self| date(r.admitted_on)),
        ("C10", |r: &Self| date(r.terminated_on)),
        ("B13", |r: &Self| amount(r.total_amount)),
        ("B16", |r: &Self| amount(r.last_three_months_amount)),
        ("C23", |r: &Self| optional_text(r.bank.as_deref())),
        ("C24", |r: &Self| optional_text(r.agency.as_deref())),
        ("C25", |r: &Self| optional_text(r.operation.as_deref())),
        ("C26", |r: &Self| optional_text(r.checking_account.as_deref())),
        ("C27", |r: &Self| optional_text(r.account_holder.as_deref())),
        ("C28", |r: &Self| optional_text(r.phone.as_deref())),
    ];

    fn identifying_code(&self) -> String {
        self.id.to_string()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::str::FromStr;

    use chrono::{NaiveDate, NaiveDateTime};
    use rust_decimal::Decimal;
    use uuid::Uuid;

    use super::*;
    use crate::export::xlsx::{fill_template, fixtures, read_cells};
    use crate::export::CellValue;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn offboarding() -> Offboarding {
        Offboarding {
            id: Uuid::new_v4(),
            employee_code: "RCA-12".into(),
            name: "Ana Souza".into(),
            contact: Some("81999990000".into()),
            hired_on: ymd(2021, 2, 1),
            terminated_on: Some(ymd(2024, 3, 5)),
            work_area: "Zona Norte".into(),
            reason: Some("Pedido de demissão".into()),
            uniform_returned: true,
            voice_chip_returned: false,
            data_chip_returned: true,
            tablet_returned: true,
            tablet_charger_returned: false,
            tablet_headset_returned: false,
            catalog_returned: true,
            order_pad_returned: false,
            resignation_letter_returned: true,
            delinquency_report_returned: false,
            replacement_in_selection: true,
            telemarketing_released: false,
            new_hire_planned: true,
            notes: None,
            registered_on: ymd(2024, 3, 5),
            created_by: None,
            status: "pending".into(),
            created_at: NaiveDateTime::default(),
            updated_at: NaiveDateTime::default(),
        }
    }

    fn termination() -> Termination {
        Termination {
            id: Uuid::nil(),
            name: "Carlos Lima".into(),
            cpf: "12345678909".into(),
            rg: None,
            admitted_on: Some(ymd(2020, 1, 15)),
            terminated_on: None,
            total_amount: Some(Decimal::from_str("1500.50").unwrap()),
            last_three_months_amount: None,
            bank: Some("Caixa".into()),
            agency: Some("0123".into()),
            operation: Some("013".into()),
            checking_account: Some("000123456".into()),
            account_holder: Some("Carlos Lima".into()),
            phone: Some("81988887777".into()),
            created_by: None,
            status: "pending".into(),
            created_at: NaiveDateTime::default(),
            updated_at: NaiveDateTime::default(),
        }
    }

    fn by_coordinate<S: SheetSource>(source: &S) -> BTreeMap<&'static str, CellValue> {
        source
            .cells()
            .into_iter()
            .map(|cell| (cell.coordinate, cell.value))
            .collect()
    }

    #[test]
    fn offboarding_cells_follow_the_form_layout() {
        let sheet = OffboardingSheet::new(offboarding(), None);
        let cells = by_coordinate(&sheet);

        assert_eq!(cells["B3"], CellValue::Text("—".into()));
        assert_eq!(cells["E3"], CellValue::Text("05/03/2024".into()));
        assert_eq!(cells["D6"], CellValue::Text("01/02/2021".into()));
        assert_eq!(cells["A10"], CellValue::Text("SIM".into()));
        assert_eq!(cells["A11"], CellValue::Text("NÃO".into()));
        assert_eq!(cells["A18"], CellValue::Text("SIM".into()));
        assert_eq!(cells["A19"], CellValue::Text("NÃO".into()));
        assert_eq!(cells["E22"], CellValue::Text("SIM".into()));
        assert_eq!(cells["E23"], CellValue::Text("NÃO".into()));
        assert_eq!(cells.len(), 22);
        assert_eq!(sheet.identifying_code(), "RCA-12");
    }

    #[test]
    fn offboarding_without_termination_date_leaves_date_cells_empty() {
        let mut record = offboarding();
        record.terminated_on = None;
        let cells = by_coordinate(&OffboardingSheet::new(record, None));
        assert_eq!(cells["E3"], CellValue::Text(String::new()));
        assert_eq!(cells["E6"], CellValue::Text(String::new()));
    }

    #[test]
    fn termination_amounts_are_numeric_and_default_to_zero() {
        let record = termination();
        let cells = by_coordinate(&record);
        assert_eq!(cells["B13"], CellValue::Number("1500.5".into()));
        assert_eq!(cells["B16"], CellValue::Number("0".into()));
        assert_eq!(cells["F5"], CellValue::Text(String::new()));
        assert_eq!(cells["C10"], CellValue::Text(String::new()));
        assert_eq!(record.identifying_code(), Uuid::nil().to_string());
    }

    #[test]
    fn filled_termination_reads_back() {
        let template = fixtures::workbook("A1:H40");
        let output = fill_template(&template, &termination().cells()).unwrap();
        let cells = read_cells(&output).unwrap();
        assert_eq!(cells["B5"], "Carlos Lima");
        assert_eq!(cells["E5"], "12345678909");
        assert_eq!(cells["B10"], "15/01/2020");
        assert_eq!(cells["B13"], "1500.5");
        assert_eq!(cells["B16"], "0");
        assert_eq!(cells["C28"], "81988887777");
    }

    #[test]
    fn every_table_fits_an_a1_h40_form() {
        let template = fixtures::workbook("A1:H40");
        for coordinates in [
            OffboardingSheet::coordinates(),
            Onboarding::coordinates(),
            Termination::coordinates(),
        ] {
            crate::export::xlsx::verify_template(&template, &coordinates).unwrap();
        }
    }
}
