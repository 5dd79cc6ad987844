use eyre::Result;
use sqlx::{Pool, Postgres};
use tracing::info;

pub async fn initialize_database(pool: &Pool<Postgres>) -> Result<()> {
    info!("Initializing database schema...");

    // Create users table. Email is deliberately absent: the identity
    // directory is its system of record.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id SERIAL PRIMARY KEY,
            auth_id VARCHAR(255) NOT NULL UNIQUE,
            first_name VARCHAR(255) NOT NULL,
            last_name VARCHAR(255) NOT NULL,
            role VARCHAR(32) NOT NULL,
            phone_number VARCHAR(64) NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create branches table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS branches (
            id SERIAL PRIMARY KEY,
            name VARCHAR(255) NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create skills table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS skills (
            id SERIAL PRIMARY KEY,
            name VARCHAR(255) NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create volunteers table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS volunteers (
            user_id INTEGER PRIMARY KEY REFERENCES users(id),
            hire_date DATE NOT NULL,
            date_of_birth DATE NULL,
            pronouns VARCHAR(64) NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create employees table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS employees (
            user_id INTEGER PRIMARY KEY REFERENCES users(id),
            branch_id INTEGER NOT NULL REFERENCES branches(id)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create volunteer many-to-many relation tables
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS volunteer_skills (
            user_id INTEGER NOT NULL REFERENCES volunteers(user_id),
            skill_id INTEGER NOT NULL REFERENCES skills(id),
            PRIMARY KEY (user_id, skill_id)
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS volunteer_branches (
            user_id INTEGER NOT NULL REFERENCES volunteers(user_id),
            branch_id INTEGER NOT NULL REFERENCES branches(id),
            PRIMARY KEY (user_id, branch_id)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create postings table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS postings (
            id SERIAL PRIMARY KEY,
            branch_id INTEGER NOT NULL REFERENCES branches(id),
            title VARCHAR(255) NOT NULL,
            posting_type VARCHAR(32) NOT NULL,
            status VARCHAR(32) NOT NULL,
            description TEXT NOT NULL,
            start_date DATE NOT NULL,
            end_date DATE NOT NULL,
            num_volunteers INTEGER NOT NULL,
            auto_closing_date DATE NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create posting_skills relation table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS posting_skills (
            posting_id INTEGER NOT NULL REFERENCES postings(id),
            skill_id INTEGER NOT NULL REFERENCES skills(id),
            PRIMARY KEY (posting_id, skill_id)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create shifts table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS shifts (
            id SERIAL PRIMARY KEY,
            posting_id INTEGER NOT NULL REFERENCES postings(id),
            start_time TIMESTAMP WITH TIME ZONE NOT NULL,
            end_time TIMESTAMP WITH TIME ZONE NOT NULL,
            CONSTRAINT valid_time_range CHECK (end_time > start_time)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create signups table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS signups (
            shift_id INTEGER NOT NULL REFERENCES shifts(id),
            user_id INTEGER NOT NULL REFERENCES users(id),
            num_volunteers INTEGER NOT NULL DEFAULT 1,
            note TEXT NULL,
            status VARCHAR(32) NOT NULL DEFAULT 'PENDING',
            PRIMARY KEY (shift_id, user_id)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create indexes
    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_users_auth_id ON users(auth_id);
        CREATE INDEX IF NOT EXISTS idx_shifts_posting_id ON shifts(posting_id);
        CREATE INDEX IF NOT EXISTS idx_shifts_start_time ON shifts(start_time);
        CREATE INDEX IF NOT EXISTS idx_postings_branch_id ON postings(branch_id);
        CREATE INDEX IF NOT EXISTS idx_signups_user_id ON signups(user_id);
        CREATE INDEX IF NOT EXISTS idx_volunteer_skills_skill_id ON volunteer_skills(skill_id);
        CREATE INDEX IF NOT EXISTS idx_volunteer_branches_branch_id ON volunteer_branches(branch_id);
        "#,
    )
    .execute(pool)
    .await?;

    info!("Database schema initialized successfully.");
    Ok(())
}
