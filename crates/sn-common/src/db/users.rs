use deadpool_postgres::GenericClient;
use tracing::{info, instrument};
use ulid::Ulid;

use crate::api::{User, UserCreate, UserResponse};
use crate::db::util::{TimedClientExt, count_to_u32};
use crate::db::{PgPool, db_error, is_unique_violation};

db_error!(UserStorageError {
    #[error("email already registered: {0}")]
    EmailTaken(String),
    #[error("user not found: {0}")]
    UserNotFound(String),
    #[error("a user cannot connect to themselves")]
    SelfConnection,
});

const USER_DETAIL_SQL: &str = "SELECT u.user_id, u.name, u.email, u.title, u.location, u.bio,
        e.company_name AS company,
        COALESCE((SELECT array_agg(us.skill_name ORDER BY us.skill_name)
                  FROM sn.user_skills us WHERE us.user_id = u.user_id), '{}') AS skills,
        COALESCE((SELECT array_agg(k.dst ORDER BY k.dst)
                  FROM sn.knows k WHERE k.src = u.user_id), '{}') AS connections
 FROM sn.users u
 LEFT JOIN sn.employment e ON e.user_id = u.user_id
 WHERE u.user_id = $1";

async fn load_user(
    client: &impl GenericClient,
    user_id: &str,
) -> Result<Option<UserResponse>, tokio_postgres::Error> {
    let row = client
        .timed_query_opt(USER_DETAIL_SQL, &[&user_id], "load_user")
        .await?;

    Ok(row.map(|row| UserResponse {
        user_id: row.get("user_id"),
        name: row.get("name"),
        email: row.get("email"),
        title: row.get("title"),
        location: row.get("location"),
        bio: row.get("bio"),
        skills: row.get("skills"),
        company: row.get("company"),
        connections: row.get("connections"),
    }))
}

/// Insert a user with its skills and employer in one transaction. Missing
/// skills and companies are created on the fly.
#[instrument(skip(pool, input), fields(email = %input.email))]
pub async fn insert_user(pool: &PgPool, input: &UserCreate) -> Result<UserResponse, UserStorageError> {
    let mut client = pool.get().await?;
    let tx = client.transaction().await?;
    let user_id = Ulid::new().to_string();

    let inserted = tx
        .timed_execute(
            "INSERT INTO sn.users (user_id, name, email, title, location, bio)
             VALUES ($1, $2, $3, $4, $5, $6)",
            &[
                &user_id,
                &input.name,
                &input.email,
                &input.title,
                &input.location,
                &input.bio,
            ],
            "insert_user",
        )
        .await;
    match inserted {
        Err(err) if is_unique_violation(&err) => {
            return Err(UserStorageError::EmailTaken(input.email.clone()));
        }
        other => other?,
    };

    if !input.skills.is_empty() {
        tx.timed_execute(
            "INSERT INTO sn.skills (name) SELECT UNNEST($1::text[]) ON CONFLICT (name) DO NOTHING",
            &[&input.skills],
            "insert_user_skills_catalogue",
        )
        .await?;
        tx.timed_execute(
            "INSERT INTO sn.user_skills (user_id, skill_name)
             SELECT $1, UNNEST($2::text[])
             ON CONFLICT DO NOTHING",
            &[&user_id, &input.skills],
            "insert_user_skills",
        )
        .await?;
    }

    if let Some(company) = &input.company {
        tx.timed_execute(
            "INSERT INTO sn.companies (name) VALUES ($1) ON CONFLICT (name) DO NOTHING",
            &[company],
            "insert_user_company",
        )
        .await?;
        tx.timed_execute(
            "INSERT INTO sn.employment (user_id, company_name) VALUES ($1, $2)",
            &[&user_id, company],
            "insert_user_employment",
        )
        .await?;
    }

    let created = load_user(&tx, &user_id).await?;
    tx.commit().await?;

    info!(user_id = %user_id, "created user");
    created.ok_or(UserStorageError::UserNotFound(user_id))
}

#[instrument(skip(pool))]
pub async fn fetch_user(pool: &PgPool, user_id: &str) -> Result<Option<UserResponse>, UserStorageError> {
    let client = pool.get().await?;
    Ok(load_user(&client, user_id).await?)
}

/// Page through users ordered by name.
#[instrument(skip(pool))]
pub async fn list_users(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<User>, UserStorageError> {
    let client = pool.get().await?;
    let rows = client
        .timed_query(
            "SELECT u.user_id, u.name, u.email, u.title, u.location, u.bio,
                    (SELECT COUNT(*) FROM sn.knows k WHERE k.src = u.user_id) AS connection_count,
                    (SELECT COUNT(*) FROM sn.user_skills us WHERE us.user_id = u.user_id) AS skill_count
             FROM sn.users u
             ORDER BY u.name, u.user_id
             LIMIT $1 OFFSET $2",
            &[&limit, &offset],
            "list_users",
        )
        .await?;

    Ok(rows
        .into_iter()
        .map(|row| User {
            user_id: row.get("user_id"),
            name: row.get("name"),
            email: row.get("email"),
            title: row.get("title"),
            location: row.get("location"),
            bio: row.get("bio"),
            connection_count: count_to_u32(row.get("connection_count")),
            skill_count: count_to_u32(row.get("skill_count")),
        })
        .collect())
}

/// Create the undirected edge between two users. Returns `false` when it
/// already existed.
#[instrument(skip(pool))]
pub async fn connect_users(pool: &PgPool, user_id: &str, other_id: &str) -> Result<bool, UserStorageError> {
    if user_id == other_id {
        return Err(UserStorageError::SelfConnection);
    }

    let client = pool.get().await?;
    let ids = vec![user_id.to_string(), other_id.to_string()];
    let found: Vec<String> = client
        .timed_query(
            "SELECT user_id FROM sn.users WHERE user_id = ANY($1)",
            &[&ids],
            "connect_users_lookup",
        )
        .await?
        .into_iter()
        .map(|row| row.get("user_id"))
        .collect();
    if let Some(missing) = ids.into_iter().find(|id| !found.contains(id)) {
        return Err(UserStorageError::UserNotFound(missing));
    }

    let inserted = client
        .timed_execute(
            "INSERT INTO sn.connections (user_a, user_b)
             VALUES (LEAST($1::text, $2::text), GREATEST($1::text, $2::text))
             ON CONFLICT DO NOTHING",
            &[&user_id, &other_id],
            "connect_users",
        )
        .await?;

    Ok(inserted == 1)
}
