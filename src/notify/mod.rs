//! Creation notices mailed to the HR inbox.
//!
//! Delivery is best-effort: a failed send is logged and never surfaces to
//! the request that created the record.

pub mod ses;

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;

use crate::models::{Offboarding, Onboarding, Termination};

pub use ses::SesNotifier;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub subject: String,
    pub body: String,
}

#[async_trait]
pub trait Notifier: Send + Sync + 'static {
    async fn send(&self, recipients: &[String], notification: &Notification) -> Result<()>;
}

/// Used when no sender address is configured: the notice only reaches the log.
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, recipients: &[String], notification: &Notification) -> Result<()> {
        tracing::info!(
            component = "notify",
            recipients = %recipients.join(","),
            subject = %notification.subject,
            "mail delivery disabled, notification logged only"
        );
        Ok(())
    }
}

pub async fn notify_best_effort(
    notifier: &dyn Notifier,
    recipients: &[String],
    notification: Notification,
) {
    if recipients.is_empty() {
        return;
    }
    if let Err(err) = notifier.send(recipients, &notification).await {
        tracing::warn!(
            component = "notify",
            subject = %notification.subject,
            error = %err,
            "failed to send record notification"
        );
    }
}

fn date_or_dash(value: Option<NaiveDate>) -> String {
    value
        .map(|date| date.format("%d/%m/%Y").to_string())
        .unwrap_or_else(|| "-".to_string())
}

fn or_dash(value: Option<&str>) -> &str {
    match value.map(str::trim) {
        Some(text) if !text.is_empty() => text,
        _ => "-",
    }
}

pub fn offboarding_created(record: &Offboarding, registered_by: &str) -> Notification {
    Notification {
        subject: "📤 Novo desligamento registrado".to_string(),
        body: format!(
            "Um novo desligamento foi registrado:\n\n\
             Nome: {}\n\
             Código: {}\n\
             Área: {}\n\
             Data de Demissão: {}\n\
             Registrado por: {registered_by}",
            record.name,
            record.employee_code,
            record.work_area,
            date_or_dash(record.terminated_on),
        ),
    }
}

pub fn onboarding_created(record: &Onboarding, registered_by: &str) -> Notification {
    Notification {
        subject: "📥 Nova admissão registrada".to_string(),
        body: format!(
            "Uma nova admissão foi registrada:\n\n\
             Nome: {}\n\
             Código RCA: {}\n\
             Data de Admissão: {}\n\
             Cargo: {}\n\
             Supervisor Responsável: {}\n\
             Registrado por: {registered_by}",
            record.name,
            record.employee_code,
            date_or_dash(Some(record.admitted_on)),
            or_dash(Some(&record.job_title)),
            or_dash(Some(&record.responsible_supervisor)),
        ),
    }
}

pub fn termination_created(record: &Termination, registered_by: &str) -> Notification {
    Notification {
        subject: "📄 Novo distrato registrado".to_string(),
        body: format!(
            "Um novo distrato foi registrado:\n\n\
             Nome: {}\n\
             CPF: {}\n\
             Data de Demissão: {}\n\
             Registrado por: {registered_by}",
            record.name,
            record.cpf,
            date_or_dash(record.terminated_on),
        ),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use anyhow::anyhow;
    use chrono::NaiveDateTime;
    use uuid::Uuid;

    use super::*;

    struct Recording(Mutex<Vec<Notification>>);

    #[async_trait]
    impl Notifier for Recording {
        async fn send(&self, _recipients: &[String], notification: &Notification) -> Result<()> {
            self.0.lock().unwrap().push(notification.clone());
            Ok(())
        }
    }

    struct Broken;

    #[async_trait]
    impl Notifier for Broken {
        async fn send(&self, _recipients: &[String], _notification: &Notification) -> Result<()> {
            Err(anyhow!("smtp relay refused the connection"))
        }
    }

    fn termination() -> Termination {
        Termination {
            id: Uuid::new_v4(),
            name: "Carlos Lima".into(),
            cpf: "12345678909".into(),
            rg: None,
            admitted_on: None,
            terminated_on: None,
            total_amount: None,
            last_three_months_amount: None,
            bank: None,
            agency: None,
            operation: None,
            checking_account: None,
            account_holder: None,
            phone: None,
            created_by: None,
            status: "pending".into(),
            created_at: NaiveDateTime::default(),
            updated_at: NaiveDateTime::default(),
        }
    }

    #[test]
    fn termination_notice_uses_dash_for_missing_date() {
        let notice = termination_created(&termination(), "maria");
        assert_eq!(notice.subject, "📄 Novo distrato registrado");
        assert!(notice.body.contains("Data de Demissão: -"));
        assert!(notice.body.contains("Registrado por: maria"));
    }

    #[tokio::test]
    async fn failures_are_swallowed() {
        let recipients = vec!["rh@example.com".to_string()];
        notify_best_effort(&Broken, &recipients, termination_created(&termination(), "x")).await;
    }

    #[tokio::test]
    async fn no_recipients_means_no_send() {
        let recorder = Recording(Mutex::new(Vec::new()));
        notify_best_effort(&recorder, &[], termination_created(&termination(), "x")).await;
        assert!(recorder.0.lock().unwrap().is_empty());

        let recipients = vec!["rh@example.com".to_string()];
        notify_best_effort(&recorder, &recipients, termination_created(&termination(), "x")).await;
        assert_eq!(recorder.0.lock().unwrap().len(), 1);
    }
}
