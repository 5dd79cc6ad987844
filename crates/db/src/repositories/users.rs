use crate::models::DbUser;
use eyre::Result;
use sqlx::{Pool, Postgres, Transaction};

pub async fn create_user(
    tx: &mut Transaction<'_, Postgres>,
    auth_id: &str,
    first_name: &str,
    last_name: &str,
    role: &str,
    phone_number: Option<&str>,
) -> Result<DbUser> {
    tracing::debug!("Creating user: auth_id={}, role={}", auth_id, role);

    let user = sqlx::query_as::<_, DbUser>(
        r#"
        INSERT INTO users (auth_id, first_name, last_name, role, phone_number)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, auth_id, first_name, last_name, role, phone_number
        "#,
    )
    .bind(auth_id)
    .bind(first_name)
    .bind(last_name)
    .bind(role)
    .bind(phone_number)
    .fetch_one(&mut **tx)
    .await?;

    Ok(user)
}

/// Re-inserts a previously deleted user row with its original id. Used by
/// the rollback path of account deletes.
pub async fn insert_user_row(tx: &mut Transaction<'_, Postgres>, user: &DbUser) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO users (id, auth_id, first_name, last_name, role, phone_number)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(user.id)
    .bind(&user.auth_id)
    .bind(&user.first_name)
    .bind(&user.last_name)
    .bind(&user.role)
    .bind(&user.phone_number)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

pub async fn get_user_by_id(pool: &Pool<Postgres>, id: i32) -> Result<Option<DbUser>> {
    let user = sqlx::query_as::<_, DbUser>(
        r#"
        SELECT id, auth_id, first_name, last_name, role, phone_number
        FROM users
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

pub async fn get_user_by_auth_id(pool: &Pool<Postgres>, auth_id: &str) -> Result<Option<DbUser>> {
    let user = sqlx::query_as::<_, DbUser>(
        r#"
        SELECT id, auth_id, first_name, last_name, role, phone_number
        FROM users
        WHERE auth_id = $1
        "#,
    )
    .bind(auth_id)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

pub async fn get_users(pool: &Pool<Postgres>) -> Result<Vec<DbUser>> {
    let users = sqlx::query_as::<_, DbUser>(
        r#"
        SELECT id, auth_id, first_name, last_name, role, phone_number
        FROM users
        ORDER BY id ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(users)
}

pub async fn get_users_by_role(pool: &Pool<Postgres>, role: &str) -> Result<Vec<DbUser>> {
    let users = sqlx::query_as::<_, DbUser>(
        r#"
        SELECT id, auth_id, first_name, last_name, role, phone_number
        FROM users
        WHERE role = $1
        ORDER BY id ASC
        "#,
    )
    .bind(role)
    .fetch_all(pool)
    .await?;

    Ok(users)
}

pub async fn update_user(
    tx: &mut Transaction<'_, Postgres>,
    id: i32,
    first_name: &str,
    last_name: &str,
    role: &str,
    phone_number: Option<&str>,
) -> Result<DbUser> {
    let user = sqlx::query_as::<_, DbUser>(
        r#"
        UPDATE users
        SET first_name = $2, last_name = $3, role = $4, phone_number = $5
        WHERE id = $1
        RETURNING id, auth_id, first_name, last_name, role, phone_number
        "#,
    )
    .bind(id)
    .bind(first_name)
    .bind(last_name)
    .bind(role)
    .bind(phone_number)
    .fetch_one(&mut **tx)
    .await?;

    Ok(user)
}

pub async fn delete_user(tx: &mut Transaction<'_, Postgres>, id: i32) -> Result<()> {
    sqlx::query(
        r#"
        DELETE FROM users
        WHERE id = $1
        "#,
    )
    .bind(id)
    .execute(&mut **tx)
    .await?;

    Ok(())
}
