use sqlx::SqliteConnection;

use crate::error::AppError;
use crate::models::task::SORT_ORDER_STEP;
use crate::models::{DescriptionListInput, Pagination, TagInput, Task, TaskInput, TaskUpdate};
use crate::repository::{description_lists, tags};

// Tasks without a sort position go last; ties are broken by id.
const ORDERING: &str = "ORDER BY sort_order IS NULL, sort_order, id";

async fn with_children(conn: &mut SqliteConnection, mut task: Task) -> Result<Task, AppError> {
    task.tags = tags::list_for_task(conn, task.id).await?;
    task.description_lists = description_lists::list_for_task(conn, task.id).await?;
    Ok(task)
}

async fn all_with_children(
    conn: &mut SqliteConnection,
    tasks: Vec<Task>,
) -> Result<Vec<Task>, AppError> {
    let mut loaded = Vec::with_capacity(tasks.len());
    for task in tasks {
        loaded.push(with_children(conn, task).await?);
    }
    Ok(loaded)
}

/// Loads a task with its tags and description lists.
pub async fn get_by_id(conn: &mut SqliteConnection, id: i64) -> Result<Option<Task>, AppError> {
    let task = sqlx::query_as::<_, Task>(
        "SELECT id, title, task_category_id, is_active, user_id, sort_order FROM tasks \
         WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;

    match task {
        Some(task) => Ok(Some(with_children(conn, task).await?)),
        None => Ok(None),
    }
}

/// Every task regardless of owner.
pub async fn list(conn: &mut SqliteConnection, page: Pagination) -> Result<Vec<Task>, AppError> {
    let tasks = sqlx::query_as::<_, Task>(&format!(
        "SELECT id, title, task_category_id, is_active, user_id, sort_order FROM tasks \
         {ORDERING} LIMIT $1 OFFSET $2"
    ))
    .bind(page.limit)
    .bind(page.skip)
    .fetch_all(&mut *conn)
    .await?;
    all_with_children(conn, tasks).await
}

/// Template tasks, i.e. tasks without an owner.
pub async fn list_unowned(
    conn: &mut SqliteConnection,
    page: Pagination,
) -> Result<Vec<Task>, AppError> {
    let tasks = sqlx::query_as::<_, Task>(&format!(
        "SELECT id, title, task_category_id, is_active, user_id, sort_order FROM tasks \
         WHERE user_id IS NULL {ORDERING} LIMIT $1 OFFSET $2"
    ))
    .bind(page.limit)
    .bind(page.skip)
    .fetch_all(&mut *conn)
    .await?;
    all_with_children(conn, tasks).await
}

pub async fn list_for_user(
    conn: &mut SqliteConnection,
    user_id: i64,
    page: Pagination,
) -> Result<Vec<Task>, AppError> {
    let tasks = sqlx::query_as::<_, Task>(&format!(
        "SELECT id, title, task_category_id, is_active, user_id, sort_order FROM tasks \
         WHERE user_id = $1 {ORDERING} LIMIT $2 OFFSET $3"
    ))
    .bind(user_id)
    .bind(page.limit)
    .bind(page.skip)
    .fetch_all(&mut *conn)
    .await?;
    all_with_children(conn, tasks).await
}

/// Inserts a task and gives it the sort position `id × 100`. Issues several statements.
///
/// `user_id = None` creates an unowned template task.
pub async fn create(
    conn: &mut SqliteConnection,
    input: &TaskInput,
    user_id: Option<i64>,
) -> Result<Task, AppError> {
    let (id,): (i64,) = sqlx::query_as(
        "INSERT INTO tasks (title, task_category_id, is_active, user_id) VALUES ($1, $2, $3, $4) \
         RETURNING id",
    )
    .bind(&input.title)
    .bind(input.task_category_id)
    .bind(input.is_active)
    .bind(user_id)
    .fetch_one(&mut *conn)
    .await
    .map_err(|e| AppError::from(e).on_missing_parent("Task category not found"))?;

    let task = sqlx::query_as::<_, Task>(
        "UPDATE tasks SET sort_order = id * $1 WHERE id = $2 \
         RETURNING id, title, task_category_id, is_active, user_id, sort_order",
    )
    .bind(SORT_ORDER_STEP)
    .bind(id)
    .fetch_one(&mut *conn)
    .await?;

    log::info!("Created task {} for owner {:?}", task.id, task.user_id);
    Ok(task)
}

/// Replaces `existing` with `replacement`. Issues several statements.
///
/// Scalars are overwritten; carried tag and description list collections replace the stored
/// ones as a whole (see [`TaskUpdate`]). Ownership never changes through an update.
pub async fn update(
    conn: &mut SqliteConnection,
    existing: &Task,
    replacement: &TaskUpdate,
) -> Result<Task, AppError> {
    let result = sqlx::query(
        "UPDATE tasks SET title = $1, task_category_id = $2, is_active = $3, sort_order = $4 \
         WHERE id = $5",
    )
    .bind(&replacement.title)
    .bind(replacement.task_category_id)
    .bind(replacement.is_active)
    .bind(replacement.sort_order)
    .bind(existing.id)
    .execute(&mut *conn)
    .await
    .map_err(|e| AppError::from(e).on_missing_parent("Task category not found"))?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Task not found".into()));
    }

    if let Some(tag_inputs) = &replacement.tags {
        tags::replace_for_task(conn, existing.id, tag_inputs).await?;
    }
    if let Some(list_inputs) = &replacement.description_lists {
        description_lists::replace_for_task(conn, existing.id, list_inputs).await?;
    }

    log::info!("Updated task {}", existing.id);
    get_by_id(conn, existing.id)
        .await?
        .ok_or_else(|| AppError::NotFound("Task not found".into()))
}

/// Deletes `existing`; its tags, description lists and their descriptions go with it.
pub async fn delete(conn: &mut SqliteConnection, existing: &Task) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
        .bind(existing.id)
        .execute(&mut *conn)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Task not found".into()));
    }
    log::info!("Deleted task {}", existing.id);
    Ok(())
}

/// Creates a copy of `template` owned by `user_id`, re-creating its tags, description lists
/// and descriptions. Issues several statements; run it inside a transaction so a failure
/// leaves no partial copy behind.
pub async fn copy_for_user(
    conn: &mut SqliteConnection,
    template: &Task,
    user_id: i64,
) -> Result<Task, AppError> {
    let copy = create(
        conn,
        &TaskInput {
            title: template.title.clone(),
            task_category_id: template.task_category_id,
            is_active: template.is_active,
        },
        Some(user_id),
    )
    .await?;

    let tag_inputs: Vec<TagInput> = template.tags.iter().map(TagInput::from).collect();
    tags::replace_for_task(conn, copy.id, &tag_inputs).await?;

    let list_inputs: Vec<DescriptionListInput> = template
        .description_lists
        .iter()
        .map(DescriptionListInput::from)
        .collect();
    description_lists::replace_for_task(conn, copy.id, &list_inputs).await?;

    log::info!(
        "Copied task {} to task {} for user {}",
        template.id,
        copy.id,
        user_id
    );
    get_by_id(conn, copy.id)
        .await?
        .ok_or_else(|| AppError::NotFound("Task not found".into()))
}
