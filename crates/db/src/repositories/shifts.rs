use crate::models::DbShift;
use chrono::{DateTime, Utc};
use eyre::Result;
use sqlx::{Pool, Postgres, Transaction};

pub async fn create_shift(
    tx: &mut Transaction<'_, Postgres>,
    posting_id: i32,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
) -> Result<DbShift> {
    let shift = sqlx::query_as::<_, DbShift>(
        r#"
        INSERT INTO shifts (posting_id, start_time, end_time)
        VALUES ($1, $2, $3)
        RETURNING id, posting_id, start_time, end_time
        "#,
    )
    .bind(posting_id)
    .bind(start_time)
    .bind(end_time)
    .fetch_one(&mut **tx)
    .await?;

    Ok(shift)
}

pub async fn get_shift_by_id(pool: &Pool<Postgres>, id: i32) -> Result<Option<DbShift>> {
    let shift = sqlx::query_as::<_, DbShift>(
        r#"
        SELECT id, posting_id, start_time, end_time
        FROM shifts
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(shift)
}

pub async fn get_shifts(pool: &Pool<Postgres>) -> Result<Vec<DbShift>> {
    let shifts = sqlx::query_as::<_, DbShift>(
        r#"
        SELECT id, posting_id, start_time, end_time
        FROM shifts
        ORDER BY start_time ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(shifts)
}

pub async fn get_shifts_by_posting(pool: &Pool<Postgres>, posting_id: i32) -> Result<Vec<DbShift>> {
    let shifts = sqlx::query_as::<_, DbShift>(
        r#"
        SELECT id, posting_id, start_time, end_time
        FROM shifts
        WHERE posting_id = $1
        ORDER BY start_time ASC
        "#,
    )
    .bind(posting_id)
    .fetch_all(pool)
    .await?;

    Ok(shifts)
}

/// Transaction-scoped read used by the bulk protocol so the conflict check
/// and the inserts observe the same snapshot.
pub async fn get_shifts_by_posting_tx(
    tx: &mut Transaction<'_, Postgres>,
    posting_id: i32,
) -> Result<Vec<DbShift>> {
    let shifts = sqlx::query_as::<_, DbShift>(
        r#"
        SELECT id, posting_id, start_time, end_time
        FROM shifts
        WHERE posting_id = $1
        ORDER BY start_time ASC
        "#,
    )
    .bind(posting_id)
    .fetch_all(&mut **tx)
    .await?;

    Ok(shifts)
}

pub async fn update_shift(
    pool: &Pool<Postgres>,
    id: i32,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
) -> Result<DbShift> {
    let shift = sqlx::query_as::<_, DbShift>(
        r#"
        UPDATE shifts
        SET start_time = $2, end_time = $3
        WHERE id = $1
        RETURNING id, posting_id, start_time, end_time
        "#,
    )
    .bind(id)
    .bind(start_time)
    .bind(end_time)
    .fetch_one(pool)
    .await?;

    Ok(shift)
}

pub async fn delete_shift(tx: &mut Transaction<'_, Postgres>, id: i32) -> Result<()> {
    sqlx::query("DELETE FROM signups WHERE shift_id = $1")
        .bind(id)
        .execute(&mut **tx)
        .await?;

    sqlx::query("DELETE FROM shifts WHERE id = $1")
        .bind(id)
        .execute(&mut **tx)
        .await?;

    Ok(())
}

pub async fn delete_shifts_by_posting(
    tx: &mut Transaction<'_, Postgres>,
    posting_id: i32,
) -> Result<()> {
    sqlx::query(
        r#"
        DELETE FROM signups
        WHERE shift_id IN (SELECT id FROM shifts WHERE posting_id = $1)
        "#,
    )
    .bind(posting_id)
    .execute(&mut **tx)
    .await?;

    sqlx::query("DELETE FROM shifts WHERE posting_id = $1")
        .bind(posting_id)
        .execute(&mut **tx)
        .await?;

    Ok(())
}
