//! Account consistency coordinator.
//!
//! User accounts live in two systems with no shared transaction: the
//! relational store (profile data, keyed by numeric id) and the identity
//! directory (email and credentials, keyed by an opaque string id). Every
//! mutation here is a two-phase sequence:
//!
//! - create: directory first, because the directory mints the `auth_id` the
//!   relational row references; a failed relational write deletes the
//!   just-created identity.
//! - update/delete: relational first, because its preconditions (existence,
//!   relations) must hold before the directory is touched; a failed directory
//!   write restores the relational side from a pre-write snapshot.
//!
//! A failed compensation is logged with the orphaned key and the original
//! error still propagates; nothing is retried. Concurrent mutations on the
//! same user can race (last secondary write wins) — accepted limitation.

use std::sync::Arc;

use tracing::{error, warn};
use volly_core::errors::{VollyError, VollyResult};
use volly_core::models::branch::BranchResponse;
use volly_core::models::skill::SkillResponse;
use volly_core::models::user::{
    CreateEmployeeRequest, CreateUserRequest, CreateVolunteerRequest, EmployeeResponse, Role,
    UpdateEmployeeRequest, UpdateUserRequest, UpdateVolunteerRequest, UserResponse,
    VolunteerResponse,
};
use volly_db::models::DbUser;
use volly_db::store::{EmployeeRecord, NewUser, UserStore, UserUpdate, VolunteerProfile, VolunteerRecord};
use volly_directory::{IdentityDirectory, IdentityRecord};

/// Where a dual-write mutation stands. Used for structured logging on the
/// failure paths; `Committed` mutations just return their result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WritePhase {
    Init,
    PrimaryDone,
    Committed,
    RolledBack,
    RollbackFailed,
}

impl std::fmt::Display for WritePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            WritePhase::Init => "init",
            WritePhase::PrimaryDone => "primary_done",
            WritePhase::Committed => "committed",
            WritePhase::RolledBack => "rolled_back",
            WritePhase::RollbackFailed => "rollback_failed",
        };
        f.write_str(name)
    }
}

#[derive(Clone)]
pub struct AccountService {
    store: Arc<dyn UserStore>,
    directory: Arc<dyn IdentityDirectory>,
}

impl AccountService {
    pub fn new(store: Arc<dyn UserStore>, directory: Arc<dyn IdentityDirectory>) -> Self {
        Self { store, directory }
    }

    // ---- creates (directory is the primary system) ----

    pub async fn create_user(&self, request: CreateUserRequest) -> VollyResult<UserResponse> {
        validate_names(&request.first_name, &request.last_name)?;

        let (identity, minted) = self
            .resolve_identity(&request.email, request.password.as_deref(), request.auth_id.as_deref())
            .await?;

        let new_user = NewUser {
            auth_id: identity.id.clone(),
            first_name: request.first_name,
            last_name: request.last_name,
            role: request.role.as_str().to_string(),
            phone_number: request.phone_number,
        };

        match self.store.create_user(new_user).await {
            Ok(user) => user_response(&user, &identity.email),
            Err(err) => Err(self.compensate_create(&identity, minted, err.into()).await),
        }
    }

    pub async fn create_volunteer(
        &self,
        request: CreateVolunteerRequest,
    ) -> VollyResult<VolunteerResponse> {
        validate_names(&request.first_name, &request.last_name)?;

        let (identity, minted) = self
            .resolve_identity(&request.email, request.password.as_deref(), request.auth_id.as_deref())
            .await?;

        let new_user = NewUser {
            auth_id: identity.id.clone(),
            first_name: request.first_name,
            last_name: request.last_name,
            role: Role::Volunteer.as_str().to_string(),
            phone_number: request.phone_number,
        };
        let profile = VolunteerProfile {
            hire_date: request.hire_date,
            date_of_birth: request.date_of_birth,
            pronouns: request.pronouns,
            skill_ids: request.skill_ids,
            branch_ids: request.branch_ids,
        };

        match self.store.create_volunteer(new_user, profile).await {
            Ok(record) => self.volunteer_response(record, &identity.email).await,
            Err(err) => Err(self.compensate_create(&identity, minted, err.into()).await),
        }
    }

    pub async fn create_employee(
        &self,
        request: CreateEmployeeRequest,
    ) -> VollyResult<EmployeeResponse> {
        validate_names(&request.first_name, &request.last_name)?;

        let (identity, minted) = self
            .resolve_identity(&request.email, request.password.as_deref(), request.auth_id.as_deref())
            .await?;

        let new_user = NewUser {
            auth_id: identity.id.clone(),
            first_name: request.first_name,
            last_name: request.last_name,
            role: Role::Employee.as_str().to_string(),
            phone_number: request.phone_number,
        };

        match self.store.create_employee(new_user, request.branch_id).await {
            Ok(record) => employee_response(&record, &identity.email),
            Err(err) => Err(self.compensate_create(&identity, minted, err.into()).await),
        }
    }

    // ---- reads (merge store row with directory email) ----

    pub async fn get_user(&self, id: i32) -> VollyResult<UserResponse> {
        let user = self
            .store
            .get_user(id)
            .await?
            .ok_or_else(|| VollyError::NotFound(format!("User with id {id} not found")))?;
        let identity = self.directory.get_identity(&user.auth_id).await?;
        user_response(&user, &identity.email)
    }

    pub async fn get_user_by_email(&self, email: &str) -> VollyResult<UserResponse> {
        let identity = self.directory.get_identity_by_email(email).await?;
        let user = self
            .store
            .get_user_by_auth_id(&identity.id)
            .await?
            .ok_or_else(|| VollyError::NotFound(format!("No user for email {email}")))?;
        user_response(&user, &identity.email)
    }

    /// Lists users, resolving each email from the directory one at a time.
    /// Sequential on purpose: results stay in store order and a directory
    /// failure surfaces immediately instead of being half-applied.
    pub async fn list_users(&self) -> VollyResult<Vec<UserResponse>> {
        let mut responses = Vec::new();
        for user in self.store.list_users().await? {
            let identity = self.directory.get_identity(&user.auth_id).await?;
            responses.push(user_response(&user, &identity.email)?);
        }
        Ok(responses)
    }

    pub async fn get_volunteer(&self, user_id: i32) -> VollyResult<VolunteerResponse> {
        let record = self.store.get_volunteer(user_id).await?.ok_or_else(|| {
            VollyError::NotFound(format!("Volunteer with user id {user_id} not found"))
        })?;
        let identity = self.directory.get_identity(&record.user.auth_id).await?;
        self.volunteer_response(record, &identity.email).await
    }

    pub async fn list_volunteers(&self) -> VollyResult<Vec<VolunteerResponse>> {
        let mut responses = Vec::new();
        for record in self.store.list_volunteers().await? {
            let identity = self.directory.get_identity(&record.user.auth_id).await?;
            responses.push(self.volunteer_response(record, &identity.email).await?);
        }
        Ok(responses)
    }

    pub async fn get_employee(&self, user_id: i32) -> VollyResult<EmployeeResponse> {
        let record = self.store.get_employee(user_id).await?.ok_or_else(|| {
            VollyError::NotFound(format!("Employee with user id {user_id} not found"))
        })?;
        let identity = self.directory.get_identity(&record.user.auth_id).await?;
        employee_response(&record, &identity.email)
    }

    pub async fn list_employees(&self) -> VollyResult<Vec<EmployeeResponse>> {
        let mut responses = Vec::new();
        for record in self.store.list_employees().await? {
            let identity = self.directory.get_identity(&record.user.auth_id).await?;
            responses.push(employee_response(&record, &identity.email)?);
        }
        Ok(responses)
    }

    // ---- updates (relational store is the primary system) ----

    pub async fn update_user_by_id(
        &self,
        id: i32,
        request: UpdateUserRequest,
    ) -> VollyResult<UserResponse> {
        validate_names(&request.first_name, &request.last_name)?;

        let current = self
            .store
            .get_user(id)
            .await?
            .ok_or_else(|| VollyError::NotFound(format!("User with id {id} not found")))?;
        let snapshot = UserUpdate::snapshot_of(&current);

        let update = UserUpdate {
            first_name: request.first_name,
            last_name: request.last_name,
            role: request.role.as_str().to_string(),
            phone_number: request.phone_number,
        };
        let updated = self.store.update_user(id, update).await?;

        match self
            .directory
            .update_identity_email(&current.auth_id, &request.email)
            .await
        {
            Ok(identity) => user_response(&updated, &identity.email),
            Err(err) => {
                match self.store.update_user(id, snapshot).await {
                    Ok(_) => warn!(
                        user_id = id,
                        phase = %WritePhase::RolledBack,
                        "directory email update failed; relational fields restored"
                    ),
                    Err(rollback_err) => error!(
                        user_id = id,
                        auth_id = %current.auth_id,
                        phase = %WritePhase::RollbackFailed,
                        error = %rollback_err,
                        "directory email update failed and relational restore also failed; \
                         user row is inconsistent"
                    ),
                }
                Err(err)
            }
        }
    }

    pub async fn update_volunteer_by_id(
        &self,
        user_id: i32,
        request: UpdateVolunteerRequest,
    ) -> VollyResult<VolunteerResponse> {
        validate_names(&request.first_name, &request.last_name)?;

        let current = self.store.get_volunteer(user_id).await?.ok_or_else(|| {
            VollyError::NotFound(format!("Volunteer with user id {user_id} not found"))
        })?;
        let auth_id = current.user.auth_id.clone();
        let user_snapshot = UserUpdate::snapshot_of(&current.user);
        let profile_snapshot = VolunteerProfile {
            hire_date: current.profile.hire_date,
            date_of_birth: current.profile.date_of_birth,
            pronouns: current.profile.pronouns.clone(),
            skill_ids: current.skill_ids.clone(),
            branch_ids: current.branch_ids.clone(),
        };

        let update = UserUpdate {
            first_name: request.first_name,
            last_name: request.last_name,
            role: Role::Volunteer.as_str().to_string(),
            phone_number: request.phone_number,
        };
        let profile = VolunteerProfile {
            hire_date: request.hire_date,
            date_of_birth: request.date_of_birth,
            pronouns: request.pronouns,
            skill_ids: request.skill_ids,
            branch_ids: request.branch_ids,
        };
        let updated = self.store.update_volunteer(user_id, update, profile).await?;

        match self
            .directory
            .update_identity_email(&auth_id, &request.email)
            .await
        {
            Ok(identity) => self.volunteer_response(updated, &identity.email).await,
            Err(err) => {
                match self
                    .store
                    .update_volunteer(user_id, user_snapshot, profile_snapshot)
                    .await
                {
                    Ok(_) => warn!(
                        user_id,
                        phase = %WritePhase::RolledBack,
                        "directory email update failed; volunteer fields restored"
                    ),
                    Err(rollback_err) => error!(
                        user_id,
                        auth_id = %auth_id,
                        phase = %WritePhase::RollbackFailed,
                        error = %rollback_err,
                        "directory email update failed and volunteer restore also failed; \
                         volunteer row is inconsistent"
                    ),
                }
                Err(err)
            }
        }
    }

    pub async fn update_employee_by_id(
        &self,
        user_id: i32,
        request: UpdateEmployeeRequest,
    ) -> VollyResult<EmployeeResponse> {
        validate_names(&request.first_name, &request.last_name)?;

        let current = self.store.get_employee(user_id).await?.ok_or_else(|| {
            VollyError::NotFound(format!("Employee with user id {user_id} not found"))
        })?;
        let auth_id = current.user.auth_id.clone();
        let user_snapshot = UserUpdate::snapshot_of(&current.user);
        let branch_snapshot = current.employee.branch_id;

        let update = UserUpdate {
            first_name: request.first_name,
            last_name: request.last_name,
            role: Role::Employee.as_str().to_string(),
            phone_number: request.phone_number,
        };
        let updated = self
            .store
            .update_employee(user_id, update, request.branch_id)
            .await?;

        match self
            .directory
            .update_identity_email(&auth_id, &request.email)
            .await
        {
            Ok(identity) => employee_response(&updated, &identity.email),
            Err(err) => {
                match self
                    .store
                    .update_employee(user_id, user_snapshot, branch_snapshot)
                    .await
                {
                    Ok(_) => warn!(
                        user_id,
                        phase = %WritePhase::RolledBack,
                        "directory email update failed; employee fields restored"
                    ),
                    Err(rollback_err) => error!(
                        user_id,
                        auth_id = %auth_id,
                        phase = %WritePhase::RollbackFailed,
                        error = %rollback_err,
                        "directory email update failed and employee restore also failed; \
                         employee row is inconsistent"
                    ),
                }
                Err(err)
            }
        }
    }

    // ---- deletes (relational store is the primary system) ----

    pub async fn delete_user_by_id(&self, id: i32) -> VollyResult<i32> {
        let user = self
            .store
            .get_user(id)
            .await?
            .ok_or_else(|| VollyError::NotFound(format!("User with id {id} not found")))?;

        self.store.delete_user(id).await?;

        if let Err(err) = self.directory.delete_identity(&user.auth_id).await {
            match self.store.restore_user(user.clone()).await {
                Ok(()) => warn!(
                    user_id = id,
                    phase = %WritePhase::RolledBack,
                    "directory delete failed; user row re-created"
                ),
                Err(rollback_err) => error!(
                    user_id = id,
                    auth_id = %user.auth_id,
                    phase = %WritePhase::RollbackFailed,
                    error = %rollback_err,
                    "directory delete failed and user restore also failed; \
                     directory still holds this identity"
                ),
            }
            return Err(err);
        }

        Ok(id)
    }

    pub async fn delete_volunteer_by_id(&self, user_id: i32) -> VollyResult<i32> {
        let record = self.store.get_volunteer(user_id).await?.ok_or_else(|| {
            VollyError::NotFound(format!("Volunteer with user id {user_id} not found"))
        })?;
        let auth_id = record.user.auth_id.clone();

        self.store.delete_volunteer(user_id).await?;

        if let Err(err) = self.directory.delete_identity(&auth_id).await {
            match self.store.restore_volunteer(record).await {
                Ok(()) => warn!(
                    user_id,
                    phase = %WritePhase::RolledBack,
                    "directory delete failed; volunteer rows re-created"
                ),
                Err(rollback_err) => error!(
                    user_id,
                    auth_id = %auth_id,
                    phase = %WritePhase::RollbackFailed,
                    error = %rollback_err,
                    "directory delete failed and volunteer restore also failed; \
                     directory still holds this identity"
                ),
            }
            return Err(err);
        }

        Ok(user_id)
    }

    pub async fn delete_employee_by_id(&self, user_id: i32) -> VollyResult<i32> {
        let record = self.store.get_employee(user_id).await?.ok_or_else(|| {
            VollyError::NotFound(format!("Employee with user id {user_id} not found"))
        })?;
        let auth_id = record.user.auth_id.clone();

        self.store.delete_employee(user_id).await?;

        if let Err(err) = self.directory.delete_identity(&auth_id).await {
            match self.store.restore_employee(record).await {
                Ok(()) => warn!(
                    user_id,
                    phase = %WritePhase::RolledBack,
                    "directory delete failed; employee rows re-created"
                ),
                Err(rollback_err) => error!(
                    user_id,
                    auth_id = %auth_id,
                    phase = %WritePhase::RollbackFailed,
                    error = %rollback_err,
                    "directory delete failed and employee restore also failed; \
                     directory still holds this identity"
                ),
            }
            return Err(err);
        }

        Ok(user_id)
    }

    // ---- by-email variants: resolve email -> directory id -> store row ----

    pub async fn delete_user_by_email(&self, email: &str) -> VollyResult<i32> {
        let user = self.resolve_user_by_email(email).await?;
        self.delete_user_by_id(user.id).await
    }

    pub async fn delete_volunteer_by_email(&self, email: &str) -> VollyResult<i32> {
        let user = self.resolve_user_by_email(email).await?;
        self.delete_volunteer_by_id(user.id).await
    }

    pub async fn delete_employee_by_email(&self, email: &str) -> VollyResult<i32> {
        let user = self.resolve_user_by_email(email).await?;
        self.delete_employee_by_id(user.id).await
    }

    async fn resolve_user_by_email(&self, email: &str) -> VollyResult<DbUser> {
        let identity = self.directory.get_identity_by_email(email).await?;
        self.store
            .get_user_by_auth_id(&identity.id)
            .await?
            .ok_or_else(|| VollyError::NotFound(format!("No user for email {email}")))
    }

    // ---- helpers ----

    /// Fetches an existing identity (provider-originated signups hand us an
    /// `auth_id`) or mints a new one from email and password. The boolean
    /// says whether this call created the identity and therefore whether a
    /// failed relational write may delete it again.
    async fn resolve_identity(
        &self,
        email: &str,
        password: Option<&str>,
        auth_id: Option<&str>,
    ) -> VollyResult<(IdentityRecord, bool)> {
        if email.trim().is_empty() {
            return Err(VollyError::Validation("email must not be empty".to_string()));
        }

        match auth_id {
            Some(id) => Ok((self.directory.get_identity(id).await?, false)),
            None => {
                let password = password.ok_or_else(|| {
                    VollyError::Validation(
                        "either a password or an existing auth id is required".to_string(),
                    )
                })?;
                let identity = self.directory.create_identity(email, password).await?;
                Ok((identity, true))
            }
        }
    }

    /// Compensates a failed relational create. Identities we did not mint are
    /// left alone. Always returns the original error.
    async fn compensate_create(
        &self,
        identity: &IdentityRecord,
        minted: bool,
        original: VollyError,
    ) -> VollyError {
        if !minted {
            warn!(
                directory_id = %identity.id,
                phase = %WritePhase::RolledBack,
                "relational create failed; pre-existing identity left in place"
            );
            return original;
        }

        match self.directory.delete_identity(&identity.id).await {
            Ok(()) => warn!(
                directory_id = %identity.id,
                phase = %WritePhase::RolledBack,
                "relational create failed; directory identity deleted"
            ),
            Err(rollback_err) => error!(
                directory_id = %identity.id,
                phase = %WritePhase::RollbackFailed,
                error = %rollback_err,
                "relational create failed and identity delete also failed; \
                 directory identity is orphaned"
            ),
        }

        original
    }

    async fn volunteer_response(
        &self,
        record: VolunteerRecord,
        email: &str,
    ) -> VollyResult<VolunteerResponse> {
        let skills = self.store.get_skills_by_ids(record.skill_ids.clone()).await?;
        let branches = self
            .store
            .get_branches_by_ids(record.branch_ids.clone())
            .await?;

        Ok(VolunteerResponse {
            id: record.user.id,
            auth_id: record.user.auth_id.clone(),
            first_name: record.user.first_name.clone(),
            last_name: record.user.last_name.clone(),
            email: email.to_string(),
            role: Role::Volunteer,
            phone_number: record.user.phone_number.clone(),
            hire_date: record.profile.hire_date,
            date_of_birth: record.profile.date_of_birth,
            pronouns: record.profile.pronouns.clone(),
            skills: skills
                .into_iter()
                .map(|s| SkillResponse { id: s.id, name: s.name })
                .collect(),
            branches: branches
                .into_iter()
                .map(|b| BranchResponse { id: b.id, name: b.name })
                .collect(),
        })
    }
}

fn validate_names(first_name: &str, last_name: &str) -> VollyResult<()> {
    if first_name.trim().is_empty() || last_name.trim().is_empty() {
        return Err(VollyError::Validation(
            "first and last name must not be empty".to_string(),
        ));
    }
    Ok(())
}

fn parse_role(role: &str) -> VollyResult<Role> {
    Role::parse(role).ok_or_else(|| {
        VollyError::Internal(format!("unknown role {role:?} in users table").into())
    })
}

fn user_response(user: &DbUser, email: &str) -> VollyResult<UserResponse> {
    Ok(UserResponse {
        id: user.id,
        auth_id: user.auth_id.clone(),
        first_name: user.first_name.clone(),
        last_name: user.last_name.clone(),
        email: email.to_string(),
        role: parse_role(&user.role)?,
        phone_number: user.phone_number.clone(),
    })
}

fn employee_response(record: &EmployeeRecord, email: &str) -> VollyResult<EmployeeResponse> {
    Ok(EmployeeResponse {
        id: record.user.id,
        auth_id: record.user.auth_id.clone(),
        first_name: record.user.first_name.clone(),
        last_name: record.user.last_name.clone(),
        email: email.to_string(),
        role: Role::Employee,
        phone_number: record.user.phone_number.clone(),
        branch_id: record.employee.branch_id,
    })
}
