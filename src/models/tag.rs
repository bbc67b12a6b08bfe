use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Tag {
    pub id: i64,
    pub title: String,
    pub task_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TagInput {
    #[validate(length(min = 1, max = 30))]
    pub title: String,
}

impl From<&Tag> for TagInput {
    fn from(tag: &Tag) -> Self {
        Self {
            title: tag.title.clone(),
        }
    }
}
