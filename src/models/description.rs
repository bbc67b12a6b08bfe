use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A free-text entry of a description list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Description {
    pub id: i64,
    pub description: String,
    pub description_list_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DescriptionInput {
    #[validate(length(min = 1, max = 2000))]
    pub description: String,
}

/// Replaces the text of a description and may move it to another list.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct DescriptionUpdate {
    #[validate(length(min = 1, max = 2000))]
    pub description: String,
    pub description_list_id: i64,
}

impl From<&Description> for DescriptionInput {
    fn from(description: &Description) -> Self {
        Self {
            description: description.description.clone(),
        }
    }
}
