use crate::models::DbEmployee;
use eyre::Result;
use sqlx::{Pool, Postgres, Transaction};

pub async fn create_employee(
    tx: &mut Transaction<'_, Postgres>,
    user_id: i32,
    branch_id: i32,
) -> Result<DbEmployee> {
    let employee = sqlx::query_as::<_, DbEmployee>(
        r#"
        INSERT INTO employees (user_id, branch_id)
        VALUES ($1, $2)
        RETURNING user_id, branch_id
        "#,
    )
    .bind(user_id)
    .bind(branch_id)
    .fetch_one(&mut **tx)
    .await?;

    Ok(employee)
}

pub async fn get_employee_by_user_id(
    pool: &Pool<Postgres>,
    user_id: i32,
) -> Result<Option<DbEmployee>> {
    let employee = sqlx::query_as::<_, DbEmployee>(
        r#"
        SELECT user_id, branch_id
        FROM employees
        WHERE user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(employee)
}

pub async fn update_employee(
    tx: &mut Transaction<'_, Postgres>,
    user_id: i32,
    branch_id: i32,
) -> Result<DbEmployee> {
    let employee = sqlx::query_as::<_, DbEmployee>(
        r#"
        UPDATE employees
        SET branch_id = $2
        WHERE user_id = $1
        RETURNING user_id, branch_id
        "#,
    )
    .bind(user_id)
    .bind(branch_id)
    .fetch_one(&mut **tx)
    .await?;

    Ok(employee)
}

pub async fn delete_employee(tx: &mut Transaction<'_, Postgres>, user_id: i32) -> Result<()> {
    sqlx::query(
        r#"
        DELETE FROM employees
        WHERE user_id = $1
        "#,
    )
    .bind(user_id)
    .execute(&mut **tx)
    .await?;

    Ok(())
}
