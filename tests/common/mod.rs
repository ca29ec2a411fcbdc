use std::collections::HashSet;
use std::env;
use std::io::{Cursor, Write};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{anyhow, bail, ensure, Context, Result};
use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::PgConnection;
use diesel_migrations::MigrationHarness;
use http_body_util::BodyExt;
use once_cell::sync::Lazy;
use rh_backend::auth::jwt::JwtService;
use rh_backend::auth::{AuthenticatedUser, Role};
use rh_backend::config::AppConfig;
use rh_backend::db::{self, PgPool};
use rh_backend::export::RecordKind;
use rh_backend::models::{NewHierarchyEdge, NewUser};
use rh_backend::notify::{Notification, Notifier};
use rh_backend::routes;
use rh_backend::state::AppState;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tempfile::TempDir;
use tokio::sync::Mutex;
use tower::util::ServiceExt;
use uuid::Uuid;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

static DB_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

#[allow(dead_code)]
#[derive(Clone, Debug)]
pub struct SentNotification {
    pub recipients: Vec<String>,
    pub notification: Notification,
}

#[derive(Default)]
pub struct FakeNotifier {
    sent: Mutex<Vec<SentNotification>>,
    failing: AtomicBool,
}

#[async_trait]
impl Notifier for FakeNotifier {
    async fn send(&self, recipients: &[String], notification: &Notification) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            bail!("mail relay unavailable");
        }
        self.sent.lock().await.push(SentNotification {
            recipients: recipients.to_vec(),
            notification: notification.clone(),
        });
        Ok(())
    }
}

impl FakeNotifier {
    #[allow(dead_code)]
    pub async fn sent(&self) -> Vec<SentNotification> {
        self.sent.lock().await.clone()
    }

    #[allow(dead_code)]
    pub fn fail_sends(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

pub struct TestApp {
    pub state: AppState,
    router: Router,
    notifier: Arc<FakeNotifier>,
    templates: TempDir,
}

impl TestApp {
    pub async fn new() -> Result<Self> {
        let database_url = env::var("TEST_DATABASE_URL")
            .context("TEST_DATABASE_URL must be set for integration tests")?;

        let templates = tempfile::tempdir().context("failed to create template dir")?;
        for kind in RecordKind::ALL {
            std::fs::write(
                templates.path().join(kind.template_file()),
                template_workbook("A1:H40")?,
            )?;
        }

        let config = AppConfig {
            database_url: database_url.clone(),
            database_max_pool_size: db::DEFAULT_MAX_POOL_SIZE,
            server_host: "127.0.0.1".to_string(),
            server_port: 0,
            jwt_secret: "test-secret".to_string(),
            jwt_issuer: "test-issuer".to_string(),
            jwt_audience: "test-audience".to_string(),
            jwt_expiry_minutes: 60,
            cors_allowed_origin: None,
            template_dir: templates.path().to_path_buf(),
            mail_from: None,
            notify_recipients: vec!["rh@example.com".to_string()],
            aws_endpoint_url: None,
            aws_access_key_id: None,
            aws_secret_access_key: None,
            aws_region: "sa-east-1".to_string(),
        };

        let pool = db::init_pool_with_size(&config.database_url, config.database_max_pool_size)?;
        prepare_database(&pool).await?;

        let notifier = Arc::new(FakeNotifier::default());
        let notifier_for_state: Arc<dyn Notifier> = notifier.clone();
        let jwt = JwtService::from_config(&config)?;
        let state = AppState::new(pool.clone(), config, jwt, notifier_for_state);
        let router = routes::create_router(state.clone());

        Ok(Self {
            state,
            router,
            notifier,
            templates,
        })
    }

    pub async fn cleanup(&self) -> Result<()> {
        let pool = self.state.pool.clone();
        tokio::task::spawn_blocking(move || -> Result<()> {
            let mut conn = pool
                .get()
                .map_err(|err| anyhow!("failed to get cleanup connection: {err}"))?;
            truncate_all(&mut conn)?;
            Ok(())
        })
        .await
        .context("cleanup task panicked")?
    }

    #[allow(dead_code)]
    pub fn notifier(&self) -> Arc<FakeNotifier> {
        self.notifier.clone()
    }

    #[allow(dead_code)]
    pub fn template_path(&self, kind: RecordKind) -> PathBuf {
        self.templates.path().join(kind.template_file())
    }

    #[allow(dead_code)]
    pub fn replace_template(&self, kind: RecordKind, bytes: &[u8]) -> Result<()> {
        std::fs::write(self.template_path(kind), bytes)?;
        Ok(())
    }

    #[allow(dead_code)]
    pub fn remove_template(&self, kind: RecordKind) -> Result<()> {
        std::fs::remove_file(self.template_path(kind))?;
        Ok(())
    }

    pub async fn insert_user(&self, username: &str, password: &str, role: &str) -> Result<Uuid> {
        self.insert_named_user(username, None, password, role).await
    }

    pub async fn insert_named_user(
        &self,
        username: &str,
        display_name: Option<&str>,
        password: &str,
        role: &str,
    ) -> Result<Uuid> {
        let username = username.to_string();
        let display_name = display_name.map(str::to_string);
        let password = password.to_string();
        let role = role.to_string();
        self.with_conn(move |conn| {
            let password_hash = rh_backend::auth::password::hash_password(&password)?;
            let user = NewUser {
                id: Uuid::new_v4(),
                username,
                display_name,
                email: None,
                password_hash,
                role,
            };
            diesel::insert_into(rh_backend::schema::users::table)
                .values(&user)
                .execute(conn)
                .context("failed to insert user")?;
            Ok(user.id)
        })
        .await
    }

    #[allow(dead_code)]
    pub async fn delete_user(&self, user_id: Uuid) -> Result<()> {
        self.with_conn(move |conn| {
            diesel::delete(rh_backend::schema::users::table.find(user_id))
                .execute(conn)
                .context("failed to delete user")?;
            Ok(())
        })
        .await
    }

    #[allow(dead_code)]
    pub async fn link(&self, coordinator_id: Uuid, supervisor_id: Uuid) -> Result<()> {
        self.with_conn(move |conn| {
            diesel::insert_into(rh_backend::schema::hierarchy_edges::table)
                .values(&NewHierarchyEdge {
                    id: Uuid::new_v4(),
                    coordinator_id,
                    supervisor_id,
                })
                .execute(conn)
                .context("failed to insert hierarchy edge")?;
            Ok(())
        })
        .await
    }

    #[allow(dead_code)]
    pub async fn visible_creators(&self, user_id: Uuid, role: Role) -> Result<HashSet<Uuid>> {
        self.with_conn(move |conn| {
            let user = AuthenticatedUser {
                user_id,
                username: String::new(),
                role,
            };
            Ok(rh_backend::visibility::visible_creators(conn, &user)?)
        })
        .await
    }

    /// Creates a user with `role` and returns `(id, bearer token)`.
    #[allow(dead_code)]
    pub async fn user_with_token(&self, username: &str, role: &str) -> Result<(Uuid, String)> {
        let password = format!("{username}-pass");
        let id = self.insert_user(username, &password, role).await?;
        let token = self.login_token(username, &password).await?;
        Ok((id, token))
    }

    pub async fn login_token(&self, username: &str, password: &str) -> Result<String> {
        #[derive(Serialize)]
        struct LoginPayload<'a> {
            username: &'a str,
            password: &'a str,
        }

        let response = self
            .post_json(
                "/api/auth/login",
                &LoginPayload { username, password },
                None,
            )
            .await?;

        ensure!(
            response.status() == StatusCode::OK,
            "login failed with status {}",
            response.status()
        );

        let body = body_to_vec(response.into_body()).await?;
        #[derive(serde::Deserialize)]
        struct LoginResponse {
            access_token: String,
        }
        let parsed: LoginResponse = serde_json::from_slice(&body)?;
        Ok(parsed.access_token)
    }

    pub async fn post_json<T: Serialize + ?Sized>(
        &self,
        path: &str,
        payload: &T,
        token: Option<&str>,
    ) -> Result<hyper::Response<Body>> {
        self.send_json(Method::POST, path, payload, token).await
    }

    #[allow(dead_code)]
    pub async fn put_json<T: Serialize + ?Sized>(
        &self,
        path: &str,
        payload: &T,
        token: Option<&str>,
    ) -> Result<hyper::Response<Body>> {
        self.send_json(Method::PUT, path, payload, token).await
    }

    #[allow(dead_code)]
    pub async fn patch_json<T: Serialize + ?Sized>(
        &self,
        path: &str,
        payload: &T,
        token: Option<&str>,
    ) -> Result<hyper::Response<Body>> {
        self.send_json(Method::PATCH, path, payload, token).await
    }

    async fn send_json<T: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        payload: &T,
        token: Option<&str>,
    ) -> Result<hyper::Response<Body>> {
        let body = serde_json::to_vec(payload)?;
        let mut builder = Request::builder()
            .method(method)
            .uri(path)
            .header("content-type", "application/json");
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {token}"));
        }
        let request = builder.body(Body::from(body))?;
        Ok(self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("infallible response"))
    }

    pub async fn get(&self, path: &str, token: Option<&str>) -> Result<hyper::Response<Body>> {
        let mut builder = Request::builder().method(Method::GET).uri(path);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {token}"));
        }
        let request = builder.body(Body::empty())?;
        Ok(self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("infallible response"))
    }

    #[allow(dead_code)]
    pub async fn delete(&self, path: &str, token: Option<&str>) -> Result<hyper::Response<Body>> {
        let builder = Request::builder().method(Method::DELETE).uri(path);
        let builder = if let Some(token) = token {
            builder.header("authorization", format!("Bearer {token}"))
        } else {
            builder
        };
        let request = builder.body(Body::empty())?;
        Ok(self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("infallible response"))
    }

    async fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut PgConnection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.state.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = pool
                .get()
                .map_err(|err| anyhow!("failed to get database connection: {err}"))?;
            f(&mut conn)
        })
        .await
        .context("connection task panicked")?
    }
}

pub async fn acquire_db_lock() -> tokio::sync::MutexGuard<'static, ()> {
    DB_LOCK.lock().await
}

pub async fn body_to_vec(body: Body) -> Result<Vec<u8>> {
    let collected = body
        .collect()
        .await
        .map_err(|err| anyhow!("failed to read response body: {err}"))?;
    Ok(collected.to_bytes().to_vec())
}

#[allow(dead_code)]
pub async fn json_body<T: DeserializeOwned>(response: hyper::Response<Body>) -> Result<T> {
    let body = body_to_vec(response.into_body()).await?;
    serde_json::from_slice(&body).with_context(|| {
        format!(
            "unexpected response body: {}",
            String::from_utf8_lossy(&body)
        )
    })
}

/// A single-sheet form declaring `dimension` as its used range, with a
/// title in A1 and a styled blank in B6.
pub fn template_workbook(dimension: &str) -> Result<Vec<u8>> {
    let sheet = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><dimension ref="{dimension}"/><sheetData><row r="1"><c r="A1" t="inlineStr"><is><t>FORMULÁRIO RCA</t></is></c></row><row r="6"><c r="B6" s="1"/></row></sheetData></worksheet>"#
    );
    let parts: [(&str, &str); 5] = [
        (
            "[Content_Types].xml",
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/></Types>"#,
        ),
        (
            "_rels/.rels",
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#,
        ),
        (
            "xl/workbook.xml",
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets><sheet name="Formulario" sheetId="1" r:id="rId1"/></sheets></workbook>"#,
        ),
        (
            "xl/_rels/workbook.xml.rels",
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/></Relationships>"#,
        ),
        ("xl/worksheets/sheet1.xml", sheet.as_str()),
    ];

    let mut buf = Cursor::new(Vec::new());
    {
        let mut zip = ZipWriter::new(&mut buf);
        let options = SimpleFileOptions::default();
        for (name, body) in parts {
            zip.start_file(name, options)?;
            zip.write_all(body.as_bytes())?;
        }
        zip.finish()?;
    }
    Ok(buf.into_inner())
}

async fn prepare_database(pool: &PgPool) -> Result<()> {
    let pool = pool.clone();
    tokio::task::spawn_blocking(move || -> Result<()> {
        let mut conn = pool
            .get()
            .map_err(|err| anyhow!("failed to acquire connection: {err}"))?;
        conn.run_pending_migrations(db::MIGRATIONS)
            .map_err(|err| anyhow!("failed to run migrations: {err}"))?;
        truncate_all(&mut conn)?;
        Ok(())
    })
    .await
    .context("migration task panicked")?
}

fn truncate_all(conn: &mut PgConnection) -> Result<()> {
    conn.batch_execute(
        "TRUNCATE TABLE offboardings, onboardings, terminations, hierarchy_edges, users RESTART IDENTITY CASCADE;",
    )
    .context("failed to truncate tables")?;
    Ok(())
}
