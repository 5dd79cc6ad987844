use crate::models::DbVolunteer;
use chrono::NaiveDate;
use eyre::Result;
use sqlx::{Pool, Postgres, Transaction};

pub async fn create_volunteer(
    tx: &mut Transaction<'_, Postgres>,
    user_id: i32,
    hire_date: NaiveDate,
    date_of_birth: Option<NaiveDate>,
    pronouns: Option<&str>,
) -> Result<DbVolunteer> {
    let volunteer = sqlx::query_as::<_, DbVolunteer>(
        r#"
        INSERT INTO volunteers (user_id, hire_date, date_of_birth, pronouns)
        VALUES ($1, $2, $3, $4)
        RETURNING user_id, hire_date, date_of_birth, pronouns
        "#,
    )
    .bind(user_id)
    .bind(hire_date)
    .bind(date_of_birth)
    .bind(pronouns)
    .fetch_one(&mut **tx)
    .await?;

    Ok(volunteer)
}

pub async fn get_volunteer_by_user_id(
    pool: &Pool<Postgres>,
    user_id: i32,
) -> Result<Option<DbVolunteer>> {
    let volunteer = sqlx::query_as::<_, DbVolunteer>(
        r#"
        SELECT user_id, hire_date, date_of_birth, pronouns
        FROM volunteers
        WHERE user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(volunteer)
}

pub async fn update_volunteer(
    tx: &mut Transaction<'_, Postgres>,
    user_id: i32,
    hire_date: NaiveDate,
    date_of_birth: Option<NaiveDate>,
    pronouns: Option<&str>,
) -> Result<DbVolunteer> {
    let volunteer = sqlx::query_as::<_, DbVolunteer>(
        r#"
        UPDATE volunteers
        SET hire_date = $2, date_of_birth = $3, pronouns = $4
        WHERE user_id = $1
        RETURNING user_id, hire_date, date_of_birth, pronouns
        "#,
    )
    .bind(user_id)
    .bind(hire_date)
    .bind(date_of_birth)
    .bind(pronouns)
    .fetch_one(&mut **tx)
    .await?;

    Ok(volunteer)
}

pub async fn delete_volunteer(tx: &mut Transaction<'_, Postgres>, user_id: i32) -> Result<()> {
    sqlx::query(
        r#"
        DELETE FROM volunteers
        WHERE user_id = $1
        "#,
    )
    .bind(user_id)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

/// Replaces the volunteer's skill set with exactly `skill_ids`.
pub async fn set_volunteer_skills(
    tx: &mut Transaction<'_, Postgres>,
    user_id: i32,
    skill_ids: &[i32],
) -> Result<()> {
    sqlx::query("DELETE FROM volunteer_skills WHERE user_id = $1")
        .bind(user_id)
        .execute(&mut **tx)
        .await?;

    for skill_id in skill_ids {
        sqlx::query(
            r#"
            INSERT INTO volunteer_skills (user_id, skill_id)
            VALUES ($1, $2)
            ON CONFLICT (user_id, skill_id) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(skill_id)
        .execute(&mut **tx)
        .await?;
    }

    Ok(())
}

/// Replaces the volunteer's branch set with exactly `branch_ids`.
pub async fn set_volunteer_branches(
    tx: &mut Transaction<'_, Postgres>,
    user_id: i32,
    branch_ids: &[i32],
) -> Result<()> {
    sqlx::query("DELETE FROM volunteer_branches WHERE user_id = $1")
        .bind(user_id)
        .execute(&mut **tx)
        .await?;

    for branch_id in branch_ids {
        sqlx::query(
            r#"
            INSERT INTO volunteer_branches (user_id, branch_id)
            VALUES ($1, $2)
            ON CONFLICT (user_id, branch_id) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(branch_id)
        .execute(&mut **tx)
        .await?;
    }

    Ok(())
}

pub async fn get_volunteer_skill_ids(pool: &Pool<Postgres>, user_id: i32) -> Result<Vec<i32>> {
    let ids = sqlx::query_scalar::<_, i32>(
        r#"
        SELECT skill_id
        FROM volunteer_skills
        WHERE user_id = $1
        ORDER BY skill_id ASC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(ids)
}

pub async fn get_volunteer_branch_ids(pool: &Pool<Postgres>, user_id: i32) -> Result<Vec<i32>> {
    let ids = sqlx::query_scalar::<_, i32>(
        r#"
        SELECT branch_id
        FROM volunteer_branches
        WHERE user_id = $1
        ORDER BY branch_id ASC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(ids)
}

/// Detaches all skill and branch relations, the precondition for deleting
/// the volunteer row itself.
pub async fn clear_volunteer_relations(
    tx: &mut Transaction<'_, Postgres>,
    user_id: i32,
) -> Result<()> {
    sqlx::query("DELETE FROM volunteer_skills WHERE user_id = $1")
        .bind(user_id)
        .execute(&mut **tx)
        .await?;

    sqlx::query("DELETE FROM volunteer_branches WHERE user_id = $1")
        .bind(user_id)
        .execute(&mut **tx)
        .await?;

    Ok(())
}
