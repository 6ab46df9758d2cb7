//! `PostgreSQL` repository implementation for the user directory.

use super::{
    models::{StatusRow, TaskTypeRow, UserRow},
    schema::{task_statuses, task_types, users},
};
use crate::directory::{
    domain::{
        CatalogName, CredentialHash, PersistedUserData, Role, Status, StatusId, TaskType,
        TaskTypeId, User, UserId, Username,
    },
    ports::{DirectoryRepository, DirectoryRepositoryError, DirectoryRepositoryResult},
};
use crate::persistence::{PgPool, escape_like_pattern};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL`-backed directory.
#[derive(Debug, Clone)]
pub struct PostgresDirectory {
    pool: PgPool,
}

impl PostgresDirectory {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> DirectoryRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> DirectoryRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(DirectoryRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(DirectoryRepositoryError::persistence)?
    }
}

#[async_trait]
impl DirectoryRepository for PostgresDirectory {
    async fn store_user(&self, user: &User) -> DirectoryRepositoryResult<()> {
        let user_id = user.id();
        let username = user.username().as_str().to_owned();
        let row = to_user_row(user);

        self.run_blocking(move |connection| {
            diesel::insert_into(users::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info)
                        if is_constraint(info.as_ref(), "users_username_key") =>
                    {
                        DirectoryRepositoryError::DuplicateUsername(username.clone())
                    }
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        DirectoryRepositoryError::DuplicateUser(user_id)
                    }
                    _ => DirectoryRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn update_user(&self, user: &User) -> DirectoryRepositoryResult<()> {
        let user_id = user.id();
        let username = user.username().as_str().to_owned();
        let row = to_user_row(user);

        self.run_blocking(move |connection| {
            let updated = diesel::update(users::table.filter(users::id.eq(user_id.into_inner())))
                .set(&row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        DirectoryRepositoryError::DuplicateUsername(username.clone())
                    }
                    _ => DirectoryRepositoryError::persistence(err),
                })?;
            if updated == 0 {
                return Err(DirectoryRepositoryError::UserNotFound(user_id));
            }
            Ok(())
        })
        .await
    }

    async fn remove_user(&self, id: UserId) -> DirectoryRepositoryResult<()> {
        self.run_blocking(move |connection| {
            // Subordinates are detached by the `ON DELETE SET NULL` foreign key.
            let deleted = diesel::delete(users::table.filter(users::id.eq(id.into_inner())))
                .execute(connection)
                .map_err(DirectoryRepositoryError::persistence)?;
            if deleted == 0 {
                return Err(DirectoryRepositoryError::UserNotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn find_user(&self, id: UserId) -> DirectoryRepositoryResult<Option<User>> {
        self.run_blocking(move |connection| {
            let row = users::table
                .filter(users::id.eq(id.into_inner()))
                .select(UserRow::as_select())
                .first::<UserRow>(connection)
                .optional()
                .map_err(DirectoryRepositoryError::persistence)?;
            row.map(row_to_user).transpose()
        })
        .await
    }

    async fn find_user_by_username(
        &self,
        username: &str,
    ) -> DirectoryRepositoryResult<Option<User>> {
        let lookup = username.trim().to_owned();
        self.run_blocking(move |connection| {
            let row = users::table
                .filter(users::username.eq(lookup))
                .select(UserRow::as_select())
                .first::<UserRow>(connection)
                .optional()
                .map_err(DirectoryRepositoryError::persistence)?;
            row.map(row_to_user).transpose()
        })
        .await
    }

    async fn find_subordinates(&self, leader_id: UserId) -> DirectoryRepositoryResult<Vec<User>> {
        self.run_blocking(move |connection| {
            let rows = users::table
                .filter(users::leader_id.eq(leader_id.into_inner()))
                .order(users::username.asc())
                .select(UserRow::as_select())
                .load::<UserRow>(connection)
                .map_err(DirectoryRepositoryError::persistence)?;
            rows.into_iter().map(row_to_user).collect()
        })
        .await
    }

    async fn store_task_type(&self, task_type: &TaskType) -> DirectoryRepositoryResult<()> {
        let name = task_type.name().as_str().to_owned();
        let row = TaskTypeRow {
            id: task_type.id().into_inner(),
            name: name.clone(),
        };
        self.run_blocking(move |connection| {
            diesel::insert_into(task_types::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| duplicate_name_or_persistence(err, &name))?;
            Ok(())
        })
        .await
    }

    async fn find_task_type(&self, id: TaskTypeId) -> DirectoryRepositoryResult<Option<TaskType>> {
        self.run_blocking(move |connection| {
            let row = task_types::table
                .filter(task_types::id.eq(id.into_inner()))
                .select(TaskTypeRow::as_select())
                .first::<TaskTypeRow>(connection)
                .optional()
                .map_err(DirectoryRepositoryError::persistence)?;
            row.map(row_to_task_type).transpose()
        })
        .await
    }

    async fn list_task_types(&self) -> DirectoryRepositoryResult<Vec<TaskType>> {
        self.run_blocking(move |connection| {
            let rows = task_types::table
                .order(task_types::name.asc())
                .select(TaskTypeRow::as_select())
                .load::<TaskTypeRow>(connection)
                .map_err(DirectoryRepositoryError::persistence)?;
            rows.into_iter().map(row_to_task_type).collect()
        })
        .await
    }

    async fn store_status(&self, status: &Status) -> DirectoryRepositoryResult<()> {
        let name = status.name().as_str().to_owned();
        let row = to_status_row(status);
        self.run_blocking(move |connection| {
            diesel::insert_into(task_statuses::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| duplicate_name_or_persistence(err, &name))?;
            Ok(())
        })
        .await
    }

    async fn update_status(&self, status: &Status) -> DirectoryRepositoryResult<()> {
        let status_id = status.id();
        let name = status.name().as_str().to_owned();
        let row = to_status_row(status);
        self.run_blocking(move |connection| {
            let updated = diesel::update(
                task_statuses::table.filter(task_statuses::id.eq(status_id.into_inner())),
            )
            .set(&row)
            .execute(connection)
            .map_err(|err| duplicate_name_or_persistence(err, &name))?;
            if updated == 0 {
                return Err(DirectoryRepositoryError::StatusNotFound(status_id));
            }
            Ok(())
        })
        .await
    }

    async fn find_status(&self, id: StatusId) -> DirectoryRepositoryResult<Option<Status>> {
        self.run_blocking(move |connection| {
            let row = task_statuses::table
                .filter(task_statuses::id.eq(id.into_inner()))
                .select(StatusRow::as_select())
                .first::<StatusRow>(connection)
                .optional()
                .map_err(DirectoryRepositoryError::persistence)?;
            row.map(row_to_status).transpose()
        })
        .await
    }

    async fn find_status_by_name(&self, name: &str) -> DirectoryRepositoryResult<Option<Status>> {
        let pattern = escape_like_pattern(name.trim());
        self.run_blocking(move |connection| {
            let row = task_statuses::table
                .filter(task_statuses::name.ilike(pattern))
                .select(StatusRow::as_select())
                .first::<StatusRow>(connection)
                .optional()
                .map_err(DirectoryRepositoryError::persistence)?;
            row.map(row_to_status).transpose()
        })
        .await
    }

    async fn list_statuses(&self) -> DirectoryRepositoryResult<Vec<Status>> {
        self.run_blocking(move |connection| {
            let rows = task_statuses::table
                .order(task_statuses::name.asc())
                .select(StatusRow::as_select())
                .load::<StatusRow>(connection)
                .map_err(DirectoryRepositoryError::persistence)?;
            rows.into_iter().map(row_to_status).collect()
        })
        .await
    }
}

fn to_user_row(user: &User) -> UserRow {
    UserRow {
        id: user.id().into_inner(),
        username: user.username().as_str().to_owned(),
        credential_hash: user.credential().expose().to_owned(),
        role: user.role().as_str().to_owned(),
        job_function: user.job_function().to_owned(),
        leader_id: user.leader_id().map(UserId::into_inner),
    }
}

fn row_to_user(row: UserRow) -> DirectoryRepositoryResult<User> {
    let UserRow {
        id,
        username,
        credential_hash,
        role,
        job_function,
        leader_id,
    } = row;

    let data = PersistedUserData {
        id: UserId::from_uuid(id),
        username: Username::new(username).map_err(DirectoryRepositoryError::persistence)?,
        credential: CredentialHash::new(credential_hash)
            .map_err(DirectoryRepositoryError::persistence)?,
        role: Role::try_from(role.as_str()).map_err(DirectoryRepositoryError::persistence)?,
        job_function,
        leader_id: leader_id.map(UserId::from_uuid),
    };
    Ok(User::from_persisted(data))
}

fn row_to_task_type(row: TaskTypeRow) -> DirectoryRepositoryResult<TaskType> {
    let name = CatalogName::new(row.name).map_err(DirectoryRepositoryError::persistence)?;
    Ok(TaskType::from_persisted(TaskTypeId::from_uuid(row.id), name))
}

fn to_status_row(status: &Status) -> StatusRow {
    StatusRow {
        id: status.id().into_inner(),
        name: status.name().as_str().to_owned(),
    }
}

fn row_to_status(row: StatusRow) -> DirectoryRepositoryResult<Status> {
    let name = CatalogName::new(row.name).map_err(DirectoryRepositoryError::persistence)?;
    Ok(Status::from_persisted(StatusId::from_uuid(row.id), name))
}

fn duplicate_name_or_persistence(err: DieselError, name: &str) -> DirectoryRepositoryError {
    match err {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            DirectoryRepositoryError::DuplicateCatalogName(name.to_owned())
        }
        _ => DirectoryRepositoryError::persistence(err),
    }
}

fn is_constraint(info: &dyn DatabaseErrorInformation, expected: &str) -> bool {
    info.constraint_name().is_some_and(|name| name == expected)
}
