use anyhow::{Context, Result};
use async_trait::async_trait;
use aws_config::meta::region::RegionProviderChain;
use aws_credential_types::Credentials;
use aws_sdk_sesv2::config::Region;
use aws_sdk_sesv2::types::{Body, Content, Destination, EmailContent, Message};
use aws_sdk_sesv2::Client as SesClient;

use super::{Notification, Notifier};
use crate::config::AppConfig;

pub async fn build_client(config: &AppConfig) -> SesClient {
    let region = Region::new(config.aws_region.clone());
    let region_provider = RegionProviderChain::first_try(Some(region))
        .or_default_provider()
        .or_else("sa-east-1");

    #[allow(deprecated)]
    let mut loader = aws_config::from_env().region(region_provider);

    if let Some(endpoint) = &config.aws_endpoint_url {
        loader = loader.endpoint_url(endpoint);
    }

    if let (Some(access_key), Some(secret_key)) = (
        config.aws_access_key_id.clone(),
        config.aws_secret_access_key.clone(),
    ) {
        let credentials = Credentials::new(access_key, secret_key, None, None, "static");
        loader = loader.credentials_provider(credentials);
    }

    let base_config = loader.load().await;
    SesClient::new(&base_config)
}

pub struct SesNotifier {
    client: SesClient,
    from: String,
}

impl SesNotifier {
    pub fn new(client: SesClient, from: impl Into<String>) -> Self {
        Self {
            client,
            from: from.into(),
        }
    }
}

#[async_trait]
impl Notifier for SesNotifier {
    async fn send(&self, recipients: &[String], notification: &Notification) -> Result<()> {
        let subject = Content::builder()
            .data(&notification.subject)
            .charset("UTF-8")
            .build()
            .context("invalid mail subject")?;
        let text = Content::builder()
            .data(&notification.body)
            .charset("UTF-8")
            .build()
            .context("invalid mail body")?;
        let message = Message::builder()
            .subject(subject)
            .body(Body::builder().text(text).build())
            .build();
        let destination = Destination::builder()
            .set_to_addresses(Some(recipients.to_vec()))
            .build();

        self.client
            .send_email()
            .from_email_address(&self.from)
            .destination(destination)
            .content(EmailContent::builder().simple(message).build())
            .send()
            .await
            .context("SES send_email failed")?;

        tracing::info!(
            component = "notify",
            recipients = recipients.len(),
            subject = %notification.subject,
            "record notification sent"
        );
        Ok(())
    }
}
