use sqlx::SqliteConnection;

use crate::error::AppError;
use crate::models::{DescriptionList, DescriptionListInput, Pagination};
use crate::repository::descriptions;

const DUPLICATE_TITLE: &str = "Task description list already registered";

async fn with_descriptions(
    conn: &mut SqliteConnection,
    mut list: DescriptionList,
) -> Result<DescriptionList, AppError> {
    list.descriptions = descriptions::list_for_list(conn, list.id).await?;
    Ok(list)
}

pub async fn get_by_id(
    conn: &mut SqliteConnection,
    id: i64,
) -> Result<Option<DescriptionList>, AppError> {
    let list = sqlx::query_as::<_, DescriptionList>(
        "SELECT id, title, task_id FROM task_description_lists WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;

    match list {
        Some(list) => Ok(Some(with_descriptions(conn, list).await?)),
        None => Ok(None),
    }
}

/// Looks a list up by title within one task.
pub async fn get_by_title(
    conn: &mut SqliteConnection,
    task_id: i64,
    title: &str,
) -> Result<Option<DescriptionList>, AppError> {
    let list = sqlx::query_as::<_, DescriptionList>(
        "SELECT id, title, task_id FROM task_description_lists WHERE task_id = $1 AND title = $2",
    )
    .bind(task_id)
    .bind(title)
    .fetch_optional(&mut *conn)
    .await?;

    match list {
        Some(list) => Ok(Some(with_descriptions(conn, list).await?)),
        None => Ok(None),
    }
}

/// Every list regardless of task, each with its descriptions.
pub async fn list(
    conn: &mut SqliteConnection,
    page: Pagination,
) -> Result<Vec<DescriptionList>, AppError> {
    let lists = sqlx::query_as::<_, DescriptionList>(
        "SELECT id, title, task_id FROM task_description_lists ORDER BY id LIMIT $1 OFFSET $2",
    )
    .bind(page.limit)
    .bind(page.skip)
    .fetch_all(&mut *conn)
    .await?;

    let mut loaded = Vec::with_capacity(lists.len());
    for list in lists {
        loaded.push(with_descriptions(conn, list).await?);
    }
    Ok(loaded)
}

pub async fn list_for_task(
    conn: &mut SqliteConnection,
    task_id: i64,
) -> Result<Vec<DescriptionList>, AppError> {
    let lists = sqlx::query_as::<_, DescriptionList>(
        "SELECT id, title, task_id FROM task_description_lists WHERE task_id = $1 ORDER BY id",
    )
    .bind(task_id)
    .fetch_all(&mut *conn)
    .await?;

    let mut loaded = Vec::with_capacity(lists.len());
    for list in lists {
        loaded.push(with_descriptions(conn, list).await?);
    }
    Ok(loaded)
}

/// Creates a list under `task_id` together with its descriptions. Issues several statements.
///
/// A title already used by another list of the same task is reported as `AlreadyExists`.
pub async fn create(
    conn: &mut SqliteConnection,
    task_id: i64,
    input: &DescriptionListInput,
) -> Result<DescriptionList, AppError> {
    let mut list = sqlx::query_as::<_, DescriptionList>(
        "INSERT INTO task_description_lists (title, task_id) VALUES ($1, $2) \
         RETURNING id, title, task_id",
    )
    .bind(&input.title)
    .bind(task_id)
    .fetch_one(&mut *conn)
    .await
    .map_err(|e| {
        AppError::from(e)
            .on_conflict(DUPLICATE_TITLE)
            .on_missing_parent("Task not found")
    })?;

    if let Some(entries) = &input.descriptions {
        list.descriptions = descriptions::replace_for_list(conn, list.id, entries).await?;
    }
    log::info!("Created description list {} on task {}", list.id, task_id);
    Ok(list)
}

/// Replaces the title of `existing`, and its descriptions when the replacement carries them.
/// Issues several statements.
pub async fn update(
    conn: &mut SqliteConnection,
    existing: &DescriptionList,
    replacement: &DescriptionListInput,
) -> Result<DescriptionList, AppError> {
    let result = sqlx::query("UPDATE task_description_lists SET title = $1 WHERE id = $2")
        .bind(&replacement.title)
        .bind(existing.id)
        .execute(&mut *conn)
        .await
        .map_err(|e| AppError::from(e).on_conflict(DUPLICATE_TITLE))?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Description list not found".into()));
    }

    if let Some(entries) = &replacement.descriptions {
        descriptions::replace_for_list(conn, existing.id, entries).await?;
    }

    get_by_id(conn, existing.id)
        .await?
        .ok_or_else(|| AppError::NotFound("Description list not found".into()))
}

/// Deletes `existing`; its descriptions go with it.
pub async fn delete(
    conn: &mut SqliteConnection,
    existing: &DescriptionList,
) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM task_description_lists WHERE id = $1")
        .bind(existing.id)
        .execute(&mut *conn)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Description list not found".into()));
    }
    log::info!("Deleted description list {}", existing.id);
    Ok(())
}

/// Swaps every list of a task (and their descriptions) for `replacement`. Issues several
/// statements.
pub async fn replace_for_task(
    conn: &mut SqliteConnection,
    task_id: i64,
    replacement: &[DescriptionListInput],
) -> Result<Vec<DescriptionList>, AppError> {
    sqlx::query("DELETE FROM task_description_lists WHERE task_id = $1")
        .bind(task_id)
        .execute(&mut *conn)
        .await?;

    let mut lists = Vec::with_capacity(replacement.len());
    for input in replacement {
        lists.push(create(conn, task_id, input).await?);
    }
    Ok(lists)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;
    use crate::models::{DescriptionInput, Task, TaskCategoryInput, TaskInput};
    use crate::repository::{task_categories, tasks};

    async fn task(conn: &mut SqliteConnection, title: &str) -> Task {
        let category = match task_categories::get_by_title(conn, "Fitness").await.unwrap() {
            Some(category) => category,
            None => task_categories::create(
                conn,
                &TaskCategoryInput {
                    title: "Fitness".into(),
                    description: None,
                },
            )
            .await
            .unwrap(),
        };
        tasks::create(
            conn,
            &TaskInput {
                title: title.into(),
                task_category_id: category.id,
                is_active: true,
            },
            None,
        )
        .await
        .unwrap()
    }

    fn input(title: &str, entries: &[&str]) -> DescriptionListInput {
        DescriptionListInput {
            title: title.into(),
            descriptions: Some(
                entries
                    .iter()
                    .map(|text| DescriptionInput {
                        description: text.to_string(),
                    })
                    .collect(),
            ),
        }
    }

    #[actix_rt::test]
    async fn test_title_is_unique_per_task() {
        let pool = test_pool().await;
        let mut conn = pool.acquire().await.unwrap();
        let run = task(&mut conn, "Run").await;
        let swim = task(&mut conn, "Swim").await;

        create(&mut conn, run.id, &input("Warmup", &[])).await.unwrap();
        let err = create(&mut conn, run.id, &input("Warmup", &[]))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::AlreadyExists(ref m) if m == DUPLICATE_TITLE));

        let other = create(&mut conn, swim.id, &input("Warmup", &[])).await.unwrap();
        assert_eq!(other.task_id, swim.id);

        let found = get_by_title(&mut conn, swim.id, "Warmup").await.unwrap().unwrap();
        assert_eq!(found.id, other.id);
        assert!(get_by_title(&mut conn, swim.id, "Cooldown").await.unwrap().is_none());
    }

    #[actix_rt::test]
    async fn test_list_pages_across_tasks() {
        let pool = test_pool().await;
        let mut conn = pool.acquire().await.unwrap();
        let run = task(&mut conn, "Run").await;
        let swim = task(&mut conn, "Swim").await;
        create(&mut conn, run.id, &input("Warmup", &["Jog"])).await.unwrap();
        create(&mut conn, swim.id, &input("Warmup", &[])).await.unwrap();
        create(&mut conn, run.id, &input("Cooldown", &["Walk", "Stretch"]))
            .await
            .unwrap();

        let all = list(&mut conn, Pagination::default()).await.unwrap();
        let owners: Vec<i64> = all.iter().map(|l| l.task_id).collect();
        assert_eq!(owners, vec![run.id, swim.id, run.id]);

        let page = list(&mut conn, Pagination { skip: 2, limit: 1 }).await.unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].title, "Cooldown");
        assert_eq!(page[0].descriptions.len(), 2);
    }

    #[actix_rt::test]
    async fn test_create_for_missing_task_is_not_found() {
        let pool = test_pool().await;
        let mut conn = pool.acquire().await.unwrap();
        let err = create(&mut conn, 999, &input("Warmup", &[])).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(ref m) if m == "Task not found"));
    }

    #[actix_rt::test]
    async fn test_update_keeps_or_replaces_descriptions() {
        let pool = test_pool().await;
        let mut conn = pool.acquire().await.unwrap();
        let run = task(&mut conn, "Run").await;
        let list = create(&mut conn, run.id, &input("Warmup", &["Jog", "Stretch"]))
            .await
            .unwrap();
        assert_eq!(list.descriptions.len(), 2);

        let renamed = update(
            &mut conn,
            &list,
            &DescriptionListInput {
                title: "Warm-up".into(),
                descriptions: None,
            },
        )
        .await
        .unwrap();
        assert_eq!(renamed.title, "Warm-up");
        assert_eq!(renamed.descriptions, list.descriptions);

        let replaced = update(&mut conn, &renamed, &input("Warm-up", &["Skip rope"]))
            .await
            .unwrap();
        let texts: Vec<&str> = replaced
            .descriptions
            .iter()
            .map(|d| d.description.as_str())
            .collect();
        assert_eq!(texts, vec!["Skip rope"]);
    }

    #[actix_rt::test]
    async fn test_delete_cascades_to_descriptions() {
        let pool = test_pool().await;
        let mut conn = pool.acquire().await.unwrap();
        let run = task(&mut conn, "Run").await;
        let list = create(&mut conn, run.id, &input("Warmup", &["Jog"])).await.unwrap();
        let description_id = list.descriptions[0].id;

        delete(&mut conn, &list).await.unwrap();
        assert!(get_by_id(&mut conn, list.id).await.unwrap().is_none());
        assert!(descriptions::get_by_id(&mut conn, description_id)
            .await
            .unwrap()
            .is_none());
    }
}
