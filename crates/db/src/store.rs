//! Account-oriented persistence behind a trait.
//!
//! The account consistency coordinator in the API layer sequences writes
//! across this store and the external identity directory. It needs pre-write
//! snapshots and restore operations for its compensating actions, so the
//! store surface is modelled around whole records rather than field patches.

use async_trait::async_trait;
use chrono::NaiveDate;
use eyre::Result;
use mockall::automock;
use sqlx::{Pool, Postgres};

use crate::models::{DbBranch, DbEmployee, DbSignup, DbSkill, DbUser, DbVolunteer};
use crate::repositories::{branches, employees, signups, skills, users, volunteers};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub auth_id: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
    pub phone_number: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserUpdate {
    pub first_name: String,
    pub last_name: String,
    pub role: String,
    pub phone_number: Option<String>,
}

impl UserUpdate {
    /// Captures the mutable fields of an existing row, for rollback.
    pub fn snapshot_of(user: &DbUser) -> Self {
        Self {
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            role: user.role.clone(),
            phone_number: user.phone_number.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolunteerProfile {
    pub hire_date: NaiveDate,
    pub date_of_birth: Option<NaiveDate>,
    pub pronouns: Option<String>,
    pub skill_ids: Vec<i32>,
    pub branch_ids: Vec<i32>,
}

/// A volunteer's full relational state: base user row, profile row, relation
/// ids and signups. Doubles as the pre-delete snapshot for restores.
#[derive(Debug, Clone)]
pub struct VolunteerRecord {
    pub user: DbUser,
    pub profile: DbVolunteer,
    pub skill_ids: Vec<i32>,
    pub branch_ids: Vec<i32>,
    pub signups: Vec<DbSignup>,
}

#[derive(Debug, Clone)]
pub struct EmployeeRecord {
    pub user: DbUser,
    pub employee: DbEmployee,
}

#[automock]
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn get_user(&self, id: i32) -> Result<Option<DbUser>>;
    async fn get_user_by_auth_id(&self, auth_id: &str) -> Result<Option<DbUser>>;
    async fn list_users(&self) -> Result<Vec<DbUser>>;
    async fn create_user(&self, new_user: NewUser) -> Result<DbUser>;
    async fn update_user(&self, id: i32, update: UserUpdate) -> Result<DbUser>;
    async fn delete_user(&self, id: i32) -> Result<()>;
    async fn restore_user(&self, user: DbUser) -> Result<()>;

    async fn get_volunteer(&self, user_id: i32) -> Result<Option<VolunteerRecord>>;
    async fn list_volunteers(&self) -> Result<Vec<VolunteerRecord>>;
    async fn create_volunteer(
        &self,
        new_user: NewUser,
        profile: VolunteerProfile,
    ) -> Result<VolunteerRecord>;
    async fn update_volunteer(
        &self,
        user_id: i32,
        update: UserUpdate,
        profile: VolunteerProfile,
    ) -> Result<VolunteerRecord>;
    async fn delete_volunteer(&self, user_id: i32) -> Result<()>;
    async fn restore_volunteer(&self, record: VolunteerRecord) -> Result<()>;

    async fn get_employee(&self, user_id: i32) -> Result<Option<EmployeeRecord>>;
    async fn list_employees(&self) -> Result<Vec<EmployeeRecord>>;
    async fn create_employee(&self, new_user: NewUser, branch_id: i32) -> Result<EmployeeRecord>;
    async fn update_employee(
        &self,
        user_id: i32,
        update: UserUpdate,
        branch_id: i32,
    ) -> Result<EmployeeRecord>;
    async fn delete_employee(&self, user_id: i32) -> Result<()>;
    async fn restore_employee(&self, record: EmployeeRecord) -> Result<()>;

    // Reference lookups used when hydrating volunteer/employee responses.
    async fn get_skills_by_ids(&self, ids: Vec<i32>) -> Result<Vec<DbSkill>>;
    async fn get_branches_by_ids(&self, ids: Vec<i32>) -> Result<Vec<DbBranch>>;
}

/// Postgres-backed store. Every mutation runs inside one transaction so the
/// user row and its profile/relations commit or roll back together.
#[derive(Clone)]
pub struct PgUserStore {
    pool: Pool<Postgres>,
}

impl PgUserStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    async fn load_volunteer_record(&self, user: DbUser) -> Result<Option<VolunteerRecord>> {
        let Some(profile) = volunteers::get_volunteer_by_user_id(&self.pool, user.id).await? else {
            return Ok(None);
        };
        let skill_ids = volunteers::get_volunteer_skill_ids(&self.pool, user.id).await?;
        let branch_ids = volunteers::get_volunteer_branch_ids(&self.pool, user.id).await?;
        let user_signups = signups::get_signups_by_user(&self.pool, user.id).await?;

        Ok(Some(VolunteerRecord {
            user,
            profile,
            skill_ids,
            branch_ids,
            signups: user_signups,
        }))
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn get_user(&self, id: i32) -> Result<Option<DbUser>> {
        users::get_user_by_id(&self.pool, id).await
    }

    async fn get_user_by_auth_id(&self, auth_id: &str) -> Result<Option<DbUser>> {
        users::get_user_by_auth_id(&self.pool, auth_id).await
    }

    async fn list_users(&self) -> Result<Vec<DbUser>> {
        users::get_users(&self.pool).await
    }

    async fn create_user(&self, new_user: NewUser) -> Result<DbUser> {
        let mut tx = self.pool.begin().await?;
        let user = users::create_user(
            &mut tx,
            &new_user.auth_id,
            &new_user.first_name,
            &new_user.last_name,
            &new_user.role,
            new_user.phone_number.as_deref(),
        )
        .await?;
        tx.commit().await?;

        Ok(user)
    }

    async fn update_user(&self, id: i32, update: UserUpdate) -> Result<DbUser> {
        let mut tx = self.pool.begin().await?;
        let user = users::update_user(
            &mut tx,
            id,
            &update.first_name,
            &update.last_name,
            &update.role,
            update.phone_number.as_deref(),
        )
        .await?;
        tx.commit().await?;

        Ok(user)
    }

    async fn delete_user(&self, id: i32) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        users::delete_user(&mut tx, id).await?;
        tx.commit().await?;

        Ok(())
    }

    async fn restore_user(&self, user: DbUser) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        users::insert_user_row(&mut tx, &user).await?;
        tx.commit().await?;

        Ok(())
    }

    async fn get_volunteer(&self, user_id: i32) -> Result<Option<VolunteerRecord>> {
        let Some(user) = users::get_user_by_id(&self.pool, user_id).await? else {
            return Ok(None);
        };
        self.load_volunteer_record(user).await
    }

    async fn list_volunteers(&self) -> Result<Vec<VolunteerRecord>> {
        let mut records = Vec::new();
        for user in users::get_users_by_role(&self.pool, "volunteer").await? {
            if let Some(record) = self.load_volunteer_record(user).await? {
                records.push(record);
            }
        }

        Ok(records)
    }

    async fn create_volunteer(
        &self,
        new_user: NewUser,
        profile: VolunteerProfile,
    ) -> Result<VolunteerRecord> {
        let mut tx = self.pool.begin().await?;

        let user = users::create_user(
            &mut tx,
            &new_user.auth_id,
            &new_user.first_name,
            &new_user.last_name,
            &new_user.role,
            new_user.phone_number.as_deref(),
        )
        .await?;
        let volunteer = volunteers::create_volunteer(
            &mut tx,
            user.id,
            profile.hire_date,
            profile.date_of_birth,
            profile.pronouns.as_deref(),
        )
        .await?;
        volunteers::set_volunteer_skills(&mut tx, user.id, &profile.skill_ids).await?;
        volunteers::set_volunteer_branches(&mut tx, user.id, &profile.branch_ids).await?;

        tx.commit().await?;

        Ok(VolunteerRecord {
            user,
            profile: volunteer,
            skill_ids: profile.skill_ids,
            branch_ids: profile.branch_ids,
            signups: Vec::new(),
        })
    }

    async fn update_volunteer(
        &self,
        user_id: i32,
        update: UserUpdate,
        profile: VolunteerProfile,
    ) -> Result<VolunteerRecord> {
        let mut tx = self.pool.begin().await?;

        let user = users::update_user(
            &mut tx,
            user_id,
            &update.first_name,
            &update.last_name,
            &update.role,
            update.phone_number.as_deref(),
        )
        .await?;
        let volunteer = volunteers::update_volunteer(
            &mut tx,
            user_id,
            profile.hire_date,
            profile.date_of_birth,
            profile.pronouns.as_deref(),
        )
        .await?;
        volunteers::set_volunteer_skills(&mut tx, user_id, &profile.skill_ids).await?;
        volunteers::set_volunteer_branches(&mut tx, user_id, &profile.branch_ids).await?;

        tx.commit().await?;

        Ok(VolunteerRecord {
            user,
            profile: volunteer,
            skill_ids: profile.skill_ids,
            branch_ids: profile.branch_ids,
            signups: Vec::new(),
        })
    }

    async fn delete_volunteer(&self, user_id: i32) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        // Relations go first, then the profile, then the base row.
        volunteers::clear_volunteer_relations(&mut tx, user_id).await?;
        signups::delete_signups_by_user(&mut tx, user_id).await?;
        volunteers::delete_volunteer(&mut tx, user_id).await?;
        users::delete_user(&mut tx, user_id).await?;

        tx.commit().await?;

        Ok(())
    }

    async fn restore_volunteer(&self, record: VolunteerRecord) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        users::insert_user_row(&mut tx, &record.user).await?;
        volunteers::create_volunteer(
            &mut tx,
            record.user.id,
            record.profile.hire_date,
            record.profile.date_of_birth,
            record.profile.pronouns.as_deref(),
        )
        .await?;
        volunteers::set_volunteer_skills(&mut tx, record.user.id, &record.skill_ids).await?;
        volunteers::set_volunteer_branches(&mut tx, record.user.id, &record.branch_ids).await?;
        for signup in &record.signups {
            signups::insert_signup_row(&mut tx, signup).await?;
        }

        tx.commit().await?;

        Ok(())
    }

    async fn get_employee(&self, user_id: i32) -> Result<Option<EmployeeRecord>> {
        let Some(user) = users::get_user_by_id(&self.pool, user_id).await? else {
            return Ok(None);
        };
        let Some(employee) = employees::get_employee_by_user_id(&self.pool, user_id).await? else {
            return Ok(None);
        };

        Ok(Some(EmployeeRecord { user, employee }))
    }

    async fn list_employees(&self) -> Result<Vec<EmployeeRecord>> {
        let mut records = Vec::new();
        for user in users::get_users_by_role(&self.pool, "employee").await? {
            if let Some(employee) =
                employees::get_employee_by_user_id(&self.pool, user.id).await?
            {
                records.push(EmployeeRecord { user, employee });
            }
        }

        Ok(records)
    }

    async fn create_employee(&self, new_user: NewUser, branch_id: i32) -> Result<EmployeeRecord> {
        let mut tx = self.pool.begin().await?;

        let user = users::create_user(
            &mut tx,
            &new_user.auth_id,
            &new_user.first_name,
            &new_user.last_name,
            &new_user.role,
            new_user.phone_number.as_deref(),
        )
        .await?;
        let employee = employees::create_employee(&mut tx, user.id, branch_id).await?;

        tx.commit().await?;

        Ok(EmployeeRecord { user, employee })
    }

    async fn update_employee(
        &self,
        user_id: i32,
        update: UserUpdate,
        branch_id: i32,
    ) -> Result<EmployeeRecord> {
        let mut tx = self.pool.begin().await?;

        let user = users::update_user(
            &mut tx,
            user_id,
            &update.first_name,
            &update.last_name,
            &update.role,
            update.phone_number.as_deref(),
        )
        .await?;
        let employee = employees::update_employee(&mut tx, user_id, branch_id).await?;

        tx.commit().await?;

        Ok(EmployeeRecord { user, employee })
    }

    async fn delete_employee(&self, user_id: i32) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        signups::delete_signups_by_user(&mut tx, user_id).await?;
        employees::delete_employee(&mut tx, user_id).await?;
        users::delete_user(&mut tx, user_id).await?;

        tx.commit().await?;

        Ok(())
    }

    async fn restore_employee(&self, record: EmployeeRecord) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        users::insert_user_row(&mut tx, &record.user).await?;
        employees::create_employee(&mut tx, record.user.id, record.employee.branch_id).await?;

        tx.commit().await?;

        Ok(())
    }

    async fn get_skills_by_ids(&self, ids: Vec<i32>) -> Result<Vec<DbSkill>> {
        skills::get_skills_by_ids(&self.pool, &ids).await
    }

    async fn get_branches_by_ids(&self, ids: Vec<i32>) -> Result<Vec<DbBranch>> {
        branches::get_branches_by_ids(&self.pool, &ids).await
    }
}
