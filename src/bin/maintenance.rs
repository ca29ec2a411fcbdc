use std::env;

use anyhow::{anyhow, bail, Context, Result};
use chrono::Utc;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, PooledConnection};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use rh_backend::{
    auth::{password, Role},
    config::AppConfig,
    db,
    export::Exporter,
    models::{NewHierarchyEdge, NewUser, User},
    schema::{hierarchy_edges, users},
};

const USAGE: &str = "Usage:
  maintenance create-user <username> <password> [role] [display name]
  maintenance set-role <username> <role>
  maintenance link <coordinator username> <supervisor username>
  maintenance check-templates

Roles: none, front_line, coordinator, hr, admin (RH, COORDENADORES and COLABORADORES are accepted).";

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    init_tracing();

    let args: Vec<String> = env::args().skip(1).collect();
    let args: Vec<&str> = args.iter().map(String::as_str).collect();

    match args.as_slice() {
        ["create-user", username, secret, rest @ ..] => {
            let role = match rest.first() {
                Some(raw) => parse_role(raw)?,
                None => Role::None,
            };
            let display_name = (rest.len() > 1).then(|| rest[1..].join(" "));
            create_user(username, secret, role, display_name)?
        }
        ["set-role", username, role] => set_role(username, parse_role(role)?)?,
        ["link", coordinator, supervisor] => link(coordinator, supervisor)?,
        ["check-templates"] => check_templates()?,
        [cmd, ..] => {
            eprintln!("Unknown command or arguments: {cmd}\n{USAGE}");
            std::process::exit(1);
        }
        [] => {
            eprintln!("{USAGE}");
            std::process::exit(1);
        }
    }

    Ok(())
}

fn parse_role(raw: &str) -> Result<Role> {
    raw.parse::<Role>().map_err(|err| anyhow!(err))
}

type Conn = PooledConnection<ConnectionManager<PgConnection>>;

fn connect() -> Result<Conn> {
    let config = AppConfig::from_env()?;
    tracing::info!(
        component = "maintenance",
        database_url = %config.redacted_database_url(),
        "loaded backend configuration"
    );
    let pool = db::init_pool_with_size(&config.database_url, 1)?;
    db::run_migrations(&pool)?;
    pool.get().context("failed to get database connection")
}

fn find_user(conn: &mut PgConnection, username: &str) -> Result<User> {
    users::table
        .filter(users::username.eq(username))
        .first::<User>(conn)
        .optional()?
        .ok_or_else(|| anyhow!("no user named {username}"))
}

fn create_user(
    username: &str,
    secret: &str,
    role: Role,
    display_name: Option<String>,
) -> Result<()> {
    let username = username.trim();
    if username.is_empty() {
        bail!("username must not be empty");
    }

    let mut conn = connect()?;
    let new_user = NewUser {
        id: Uuid::new_v4(),
        username: username.to_string(),
        display_name,
        email: None,
        password_hash: password::hash_password(secret)?,
        role: role.as_str().to_string(),
    };

    diesel::insert_into(users::table)
        .values(&new_user)
        .execute(&mut conn)
        .with_context(|| format!("failed to create user {username}"))?;

    println!("Created user {username} ({role}) with id {}.", new_user.id);
    Ok(())
}

fn set_role(username: &str, role: Role) -> Result<()> {
    let mut conn = connect()?;
    let user = find_user(&mut conn, username)?;

    diesel::update(users::table.find(user.id))
        .set((
            users::role.eq(role.as_str()),
            users::updated_at.eq(Utc::now().naive_utc()),
        ))
        .execute(&mut conn)
        .context("failed to update role")?;

    println!("{username} is now {role}; the change applies at their next login.");
    Ok(())
}

fn link(coordinator: &str, supervisor: &str) -> Result<()> {
    let mut conn = connect()?;
    let coordinator = find_user(&mut conn, coordinator)?;
    let supervisor = find_user(&mut conn, supervisor)?;
    if coordinator.id == supervisor.id {
        bail!("a coordinator cannot be linked to themselves");
    }

    let inserted = diesel::insert_into(hierarchy_edges::table)
        .values(&NewHierarchyEdge {
            id: Uuid::new_v4(),
            coordinator_id: coordinator.id,
            supervisor_id: supervisor.id,
        })
        .on_conflict_do_nothing()
        .execute(&mut conn)
        .context("failed to create hierarchy edge")?;

    if inserted == 0 {
        println!(
            "{} is already linked to {}.",
            supervisor.username, coordinator.username
        );
    } else {
        println!("Linked {} under {}.", supervisor.username, coordinator.username);
    }
    Ok(())
}

fn check_templates() -> Result<()> {
    let template_dir = env::var("TEMPLATE_DIR").unwrap_or_else(|_| "templates".to_string());
    let exporter = Exporter::new(&template_dir);
    exporter
        .verify_templates()
        .with_context(|| format!("templates in {template_dir} are not usable"))?;
    println!("All spreadsheet templates in {template_dir} accept their cell tables.");
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}
