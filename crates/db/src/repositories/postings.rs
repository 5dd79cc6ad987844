use crate::models::DbPosting;
use chrono::NaiveDate;
use eyre::Result;
use sqlx::{Pool, Postgres, Transaction};

#[allow(clippy::too_many_arguments)]
pub async fn create_posting(
    tx: &mut Transaction<'_, Postgres>,
    branch_id: i32,
    title: &str,
    posting_type: &str,
    status: &str,
    description: &str,
    start_date: NaiveDate,
    end_date: NaiveDate,
    num_volunteers: i32,
    auto_closing_date: Option<NaiveDate>,
) -> Result<DbPosting> {
    let posting = sqlx::query_as::<_, DbPosting>(
        r#"
        INSERT INTO postings
            (branch_id, title, posting_type, status, description,
             start_date, end_date, num_volunteers, auto_closing_date)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING id, branch_id, title, posting_type, status, description,
                  start_date, end_date, num_volunteers, auto_closing_date
        "#,
    )
    .bind(branch_id)
    .bind(title)
    .bind(posting_type)
    .bind(status)
    .bind(description)
    .bind(start_date)
    .bind(end_date)
    .bind(num_volunteers)
    .bind(auto_closing_date)
    .fetch_one(&mut **tx)
    .await?;

    Ok(posting)
}

pub async fn get_posting_by_id(pool: &Pool<Postgres>, id: i32) -> Result<Option<DbPosting>> {
    let posting = sqlx::query_as::<_, DbPosting>(
        r#"
        SELECT id, branch_id, title, posting_type, status, description,
               start_date, end_date, num_volunteers, auto_closing_date
        FROM postings
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(posting)
}

pub async fn get_postings(pool: &Pool<Postgres>) -> Result<Vec<DbPosting>> {
    let postings = sqlx::query_as::<_, DbPosting>(
        r#"
        SELECT id, branch_id, title, posting_type, status, description,
               start_date, end_date, num_volunteers, auto_closing_date
        FROM postings
        ORDER BY id ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(postings)
}

#[allow(clippy::too_many_arguments)]
pub async fn update_posting(
    tx: &mut Transaction<'_, Postgres>,
    id: i32,
    branch_id: i32,
    title: &str,
    posting_type: &str,
    status: &str,
    description: &str,
    start_date: NaiveDate,
    end_date: NaiveDate,
    num_volunteers: i32,
    auto_closing_date: Option<NaiveDate>,
) -> Result<DbPosting> {
    let posting = sqlx::query_as::<_, DbPosting>(
        r#"
        UPDATE postings
        SET branch_id = $2, title = $3, posting_type = $4, status = $5,
            description = $6, start_date = $7, end_date = $8,
            num_volunteers = $9, auto_closing_date = $10
        WHERE id = $1
        RETURNING id, branch_id, title, posting_type, status, description,
                  start_date, end_date, num_volunteers, auto_closing_date
        "#,
    )
    .bind(id)
    .bind(branch_id)
    .bind(title)
    .bind(posting_type)
    .bind(status)
    .bind(description)
    .bind(start_date)
    .bind(end_date)
    .bind(num_volunteers)
    .bind(auto_closing_date)
    .fetch_one(&mut **tx)
    .await?;

    Ok(posting)
}

/// Replaces the posting's required skill set.
pub async fn set_posting_skills(
    tx: &mut Transaction<'_, Postgres>,
    posting_id: i32,
    skill_ids: &[i32],
) -> Result<()> {
    sqlx::query("DELETE FROM posting_skills WHERE posting_id = $1")
        .bind(posting_id)
        .execute(&mut **tx)
        .await?;

    for skill_id in skill_ids {
        sqlx::query(
            r#"
            INSERT INTO posting_skills (posting_id, skill_id)
            VALUES ($1, $2)
            ON CONFLICT (posting_id, skill_id) DO NOTHING
            "#,
        )
        .bind(posting_id)
        .bind(skill_id)
        .execute(&mut **tx)
        .await?;
    }

    Ok(())
}

pub async fn get_posting_skill_ids(pool: &Pool<Postgres>, posting_id: i32) -> Result<Vec<i32>> {
    let ids = sqlx::query_scalar::<_, i32>(
        r#"
        SELECT skill_id
        FROM posting_skills
        WHERE posting_id = $1
        ORDER BY skill_id ASC
        "#,
    )
    .bind(posting_id)
    .fetch_all(pool)
    .await?;

    Ok(ids)
}

/// Deletes a posting together with its skills, shifts and shift signups.
pub async fn delete_posting(tx: &mut Transaction<'_, Postgres>, id: i32) -> Result<()> {
    sqlx::query("DELETE FROM posting_skills WHERE posting_id = $1")
        .bind(id)
        .execute(&mut **tx)
        .await?;

    sqlx::query(
        r#"
        DELETE FROM signups
        WHERE shift_id IN (SELECT id FROM shifts WHERE posting_id = $1)
        "#,
    )
    .bind(id)
    .execute(&mut **tx)
    .await?;

    sqlx::query("DELETE FROM shifts WHERE posting_id = $1")
        .bind(id)
        .execute(&mut **tx)
        .await?;

    sqlx::query("DELETE FROM postings WHERE id = $1")
        .bind(id)
        .execute(&mut **tx)
        .await?;

    Ok(())
}
