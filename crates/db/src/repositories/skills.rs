use crate::models::DbSkill;
use eyre::Result;
use sqlx::{Pool, Postgres};

pub async fn create_skill(pool: &Pool<Postgres>, name: &str) -> Result<DbSkill> {
    let skill = sqlx::query_as::<_, DbSkill>(
        r#"
        INSERT INTO skills (name)
        VALUES ($1)
        RETURNING id, name
        "#,
    )
    .bind(name)
    .fetch_one(pool)
    .await?;

    Ok(skill)
}

pub async fn get_skill_by_id(pool: &Pool<Postgres>, id: i32) -> Result<Option<DbSkill>> {
    let skill = sqlx::query_as::<_, DbSkill>(
        r#"
        SELECT id, name
        FROM skills
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(skill)
}

pub async fn get_skills(pool: &Pool<Postgres>) -> Result<Vec<DbSkill>> {
    let skills = sqlx::query_as::<_, DbSkill>(
        r#"
        SELECT id, name
        FROM skills
        ORDER BY id ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(skills)
}

pub async fn get_skills_by_ids(pool: &Pool<Postgres>, ids: &[i32]) -> Result<Vec<DbSkill>> {
    let skills = sqlx::query_as::<_, DbSkill>(
        r#"
        SELECT id, name
        FROM skills
        WHERE id = ANY($1)
        ORDER BY id ASC
        "#,
    )
    .bind(ids)
    .fetch_all(pool)
    .await?;

    Ok(skills)
}

pub async fn update_skill(pool: &Pool<Postgres>, id: i32, name: &str) -> Result<DbSkill> {
    let skill = sqlx::query_as::<_, DbSkill>(
        r#"
        UPDATE skills
        SET name = $2
        WHERE id = $1
        RETURNING id, name
        "#,
    )
    .bind(id)
    .bind(name)
    .fetch_one(pool)
    .await?;

    Ok(skill)
}

pub async fn delete_skill(pool: &Pool<Postgres>, id: i32) -> Result<()> {
    sqlx::query(
        r#"
        DELETE FROM skills
        WHERE id = $1
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?;

    Ok(())
}
