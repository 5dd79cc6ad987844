use crate::models::DbBranch;
use eyre::Result;
use sqlx::{Pool, Postgres};

pub async fn create_branch(pool: &Pool<Postgres>, name: &str) -> Result<DbBranch> {
    let branch = sqlx::query_as::<_, DbBranch>(
        r#"
        INSERT INTO branches (name)
        VALUES ($1)
        RETURNING id, name
        "#,
    )
    .bind(name)
    .fetch_one(pool)
    .await?;

    Ok(branch)
}

pub async fn get_branch_by_id(pool: &Pool<Postgres>, id: i32) -> Result<Option<DbBranch>> {
    let branch = sqlx::query_as::<_, DbBranch>(
        r#"
        SELECT id, name
        FROM branches
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(branch)
}

pub async fn get_branches(pool: &Pool<Postgres>) -> Result<Vec<DbBranch>> {
    let branches = sqlx::query_as::<_, DbBranch>(
        r#"
        SELECT id, name
        FROM branches
        ORDER BY id ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(branches)
}

pub async fn get_branches_by_ids(pool: &Pool<Postgres>, ids: &[i32]) -> Result<Vec<DbBranch>> {
    let branches = sqlx::query_as::<_, DbBranch>(
        r#"
        SELECT id, name
        FROM branches
        WHERE id = ANY($1)
        ORDER BY id ASC
        "#,
    )
    .bind(ids)
    .fetch_all(pool)
    .await?;

    Ok(branches)
}

pub async fn update_branch(pool: &Pool<Postgres>, id: i32, name: &str) -> Result<DbBranch> {
    let branch = sqlx::query_as::<_, DbBranch>(
        r#"
        UPDATE branches
        SET name = $2
        WHERE id = $1
        RETURNING id, name
        "#,
    )
    .bind(id)
    .bind(name)
    .fetch_one(pool)
    .await?;

    Ok(branch)
}

pub async fn delete_branch(pool: &Pool<Postgres>, id: i32) -> Result<()> {
    sqlx::query(
        r#"
        DELETE FROM branches
        WHERE id = $1
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?;

    Ok(())
}
