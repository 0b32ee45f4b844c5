//! Task business logic - CRUD, the DONE transition, and the calendar view.
//!
//! A task is completed by updating its status to DONE. That transition is
//! terminal: it stamps `completed_at` and pays the task award inside a
//! transaction, and can never be re-entered or reverted, so a task pays out
//! at most once.

use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use std::str::FromStr;

use crate::core::progress;
use crate::entities::{Task, TaskStatus, User, task};
use crate::errors::{Error, Result};

/// Maximum number of tasks per user
pub const MAX_TASKS_PER_USER: u64 = 200;

/// Optional changes to apply to an existing task. Absent fields are left
/// untouched.
#[derive(Debug, Clone, Default)]
pub struct TaskChanges {
    /// New title
    pub title: Option<String>,
    /// New description
    pub description: Option<String>,
    /// New due date
    pub due_date: Option<DateTimeUtc>,
    /// New status; DONE triggers the completion award
    pub status: Option<TaskStatus>,
}

/// Retrieves all tasks of a user, ordered by due date then newest created.
pub async fn list_for_user(db: &DatabaseConnection, user_id: i64) -> Result<Vec<task::Model>> {
    Task::find()
        .filter(task::Column::UserId.eq(user_id))
        .order_by_asc(task::Column::DueDate)
        .order_by_desc(task::Column::CreatedAt)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a task by id, verifying it belongs to the given user.
pub async fn get_owned(db: &DatabaseConnection, task_id: i64, user_id: i64) -> Result<task::Model> {
    Task::find_by_id(task_id)
        .filter(task::Column::UserId.eq(user_id))
        .one(db)
        .await?
        .ok_or(Error::NotFound { entity: "task", id: task_id })
}

/// Creates a new PENDING task for a user.
pub async fn create(
    db: &DatabaseConnection,
    user_id: i64,
    title: &str,
    description: Option<String>,
    due_date: Option<DateTimeUtc>,
) -> Result<task::Model> {
    if title.trim().is_empty() {
        return Err(Error::InvalidValue {
            field: "title",
            message: "task title cannot be empty".to_string(),
        });
    }

    User::find_by_id(user_id)
        .one(db)
        .await?
        .ok_or(Error::NotFound { entity: "user", id: user_id })?;

    let count = Task::find()
        .filter(task::Column::UserId.eq(user_id))
        .count(db)
        .await?;
    if count >= MAX_TASKS_PER_USER {
        return Err(Error::LimitExceeded {
            resource: "tasks",
            limit: MAX_TASKS_PER_USER,
        });
    }

    let model = task::ActiveModel {
        title: Set(title.trim().to_string()),
        description: Set(description),
        due_date: Set(due_date),
        status: Set(TaskStatus::Pending.as_str().to_string()),
        user_id: Set(user_id),
        created_at: Set(chrono::Utc::now()),
        completed_at: Set(None),
        ..Default::default()
    };

    model.insert(db).await.map_err(Into::into)
}

/// Updates a task. Ownership-checked.
///
/// Setting the status to DONE on a PENDING task completes it: `completed_at`
/// is stamped and the task award is paid in the same transaction. Once DONE,
/// any further status change is rejected.
pub async fn update(
    db: &DatabaseConnection,
    task_id: i64,
    user_id: i64,
    changes: TaskChanges,
) -> Result<task::Model> {
    let current = get_owned(db, task_id, user_id).await?;
    let current_status = TaskStatus::from_str(&current.status)?;

    if let Some(title) = &changes.title {
        if title.trim().is_empty() {
            return Err(Error::InvalidValue {
                field: "title",
                message: "task title cannot be empty".to_string(),
            });
        }
    }

    let completing = match changes.status {
        Some(TaskStatus::Done) if current_status == TaskStatus::Pending => true,
        Some(_) if current_status == TaskStatus::Done => {
            return Err(Error::InvalidValue {
                field: "status",
                message: "a DONE task cannot change status".to_string(),
            });
        }
        _ => false,
    };

    let mut active: task::ActiveModel = current.into();
    if let Some(title) = changes.title {
        active.title = Set(title.trim().to_string());
    }
    if let Some(description) = changes.description {
        active.description = Set(Some(description));
    }
    if let Some(due_date) = changes.due_date {
        active.due_date = Set(Some(due_date));
    }
    if let Some(status) = changes.status {
        active.status = Set(status.as_str().to_string());
    }

    if completing {
        active.completed_at = Set(Some(chrono::Utc::now()));

        let txn = db.begin().await?;
        let updated = active.update(&txn).await?;
        progress::award(&txn, user_id, progress::TASK_XP, progress::TASK_COINS).await?;
        txn.commit().await?;

        tracing::debug!(task_id, user_id, "task completed");
        return Ok(updated);
    }

    active.update(db).await.map_err(Into::into)
}

/// Deletes a task. Ownership-checked.
pub async fn delete(db: &DatabaseConnection, task_id: i64, user_id: i64) -> Result<()> {
    let task = get_owned(db, task_id, user_id).await?;
    task.delete(db).await?;
    Ok(())
}

/// Retrieves the user's tasks whose due date falls inside `[from, to]`,
/// earliest due first. Tasks without a due date never appear here.
pub async fn list_calendar(
    db: &DatabaseConnection,
    user_id: i64,
    from: DateTimeUtc,
    to: DateTimeUtc,
) -> Result<Vec<task::Model>> {
    Task::find()
        .filter(task::Column::UserId.eq(user_id))
        .filter(task::Column::DueDate.gte(from))
        .filter(task::Column::DueDate.lte(to))
        .order_by_asc(task::Column::DueDate)
        .all(db)
        .await
        .map_err(Into::into)
}
