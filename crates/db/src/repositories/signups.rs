use crate::models::DbSignup;
use eyre::Result;
use sqlx::{Pool, Postgres, Transaction};

pub async fn create_signup(
    pool: &Pool<Postgres>,
    shift_id: i32,
    user_id: i32,
    num_volunteers: i32,
    note: Option<&str>,
    status: &str,
) -> Result<DbSignup> {
    let signup = sqlx::query_as::<_, DbSignup>(
        r#"
        INSERT INTO signups (shift_id, user_id, num_volunteers, note, status)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING shift_id, user_id, num_volunteers, note, status
        "#,
    )
    .bind(shift_id)
    .bind(user_id)
    .bind(num_volunteers)
    .bind(note)
    .bind(status)
    .fetch_one(pool)
    .await?;

    Ok(signup)
}

/// Re-inserts a previously deleted signup row. Used by the rollback path of
/// volunteer deletes.
pub async fn insert_signup_row(tx: &mut Transaction<'_, Postgres>, signup: &DbSignup) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO signups (shift_id, user_id, num_volunteers, note, status)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(signup.shift_id)
    .bind(signup.user_id)
    .bind(signup.num_volunteers)
    .bind(&signup.note)
    .bind(&signup.status)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

pub async fn get_signup(
    pool: &Pool<Postgres>,
    shift_id: i32,
    user_id: i32,
) -> Result<Option<DbSignup>> {
    let signup = sqlx::query_as::<_, DbSignup>(
        r#"
        SELECT shift_id, user_id, num_volunteers, note, status
        FROM signups
        WHERE shift_id = $1 AND user_id = $2
        "#,
    )
    .bind(shift_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(signup)
}

pub async fn get_signups_by_shift(pool: &Pool<Postgres>, shift_id: i32) -> Result<Vec<DbSignup>> {
    let signups = sqlx::query_as::<_, DbSignup>(
        r#"
        SELECT shift_id, user_id, num_volunteers, note, status
        FROM signups
        WHERE shift_id = $1
        ORDER BY user_id ASC
        "#,
    )
    .bind(shift_id)
    .fetch_all(pool)
    .await?;

    Ok(signups)
}

pub async fn get_signups_by_user(pool: &Pool<Postgres>, user_id: i32) -> Result<Vec<DbSignup>> {
    let signups = sqlx::query_as::<_, DbSignup>(
        r#"
        SELECT shift_id, user_id, num_volunteers, note, status
        FROM signups
        WHERE user_id = $1
        ORDER BY shift_id ASC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(signups)
}

pub async fn update_signup(
    pool: &Pool<Postgres>,
    shift_id: i32,
    user_id: i32,
    num_volunteers: i32,
    note: Option<&str>,
    status: &str,
) -> Result<DbSignup> {
    let signup = sqlx::query_as::<_, DbSignup>(
        r#"
        UPDATE signups
        SET num_volunteers = $3, note = $4, status = $5
        WHERE shift_id = $1 AND user_id = $2
        RETURNING shift_id, user_id, num_volunteers, note, status
        "#,
    )
    .bind(shift_id)
    .bind(user_id)
    .bind(num_volunteers)
    .bind(note)
    .bind(status)
    .fetch_one(pool)
    .await?;

    Ok(signup)
}

pub async fn delete_signups_by_user(
    tx: &mut Transaction<'_, Postgres>,
    user_id: i32,
) -> Result<()> {
    sqlx::query("DELETE FROM signups WHERE user_id = $1")
        .bind(user_id)
        .execute(&mut **tx)
        .await?;

    Ok(())
}
