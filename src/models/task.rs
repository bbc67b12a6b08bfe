use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::{Validate, ValidationErrors};

use super::description_list::{DescriptionList, DescriptionListInput};
use super::tag::{Tag, TagInput};

/// Step between the sort positions handed out to new tasks, leaving room to insert between.
pub const SORT_ORDER_STEP: i64 = 100;

/// A task as stored in the database and returned by the API, with its tags and description
/// lists loaded.
///
/// `user_id` is `None` for unowned template tasks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub task_category_id: i64,
    pub is_active: bool,
    pub user_id: Option<i64>,
    pub sort_order: Option<i64>,
    #[sqlx(skip)]
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[sqlx(skip)]
    #[serde(default)]
    pub description_lists: Vec<DescriptionList>,
}

impl Task {
    pub fn is_owned_by(&self, user_id: i64) -> bool {
        self.user_id == Some(user_id)
    }

    pub fn is_unowned(&self) -> bool {
        self.user_id.is_none()
    }
}

/// Payload for creating a task.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TaskInput {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    pub task_category_id: i64,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

/// Payload for replacing a task.
///
/// Every scalar field is overwritten, including `sort_order` (absent means cleared).
/// `tags` and `description_lists` are replace-sets: an absent collection keeps what is
/// stored, a present one (even empty) replaces the stored collection as a whole.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TaskUpdate {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    pub task_category_id: i64,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub sort_order: Option<i64>,
    #[serde(default)]
    pub tags: Option<Vec<TagInput>>,
    #[serde(default)]
    pub description_lists: Option<Vec<DescriptionListInput>>,
}

impl TaskUpdate {
    /// Validates the task fields and every element of the carried collections.
    pub fn validate_all(&self) -> Result<(), ValidationErrors> {
        self.validate()?;
        for tag in self.tags.iter().flatten() {
            tag.validate()?;
        }
        for list in self.description_lists.iter().flatten() {
            list.validate_all()?;
        }
        Ok(())
    }
}

fn default_active() -> bool {
    true
}
