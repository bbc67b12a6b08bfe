use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::{Validate, ValidationErrors};

use super::description::{Description, DescriptionInput};

/// A named grouping of descriptions under one task. Titles are unique per task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct DescriptionList {
    pub id: i64,
    pub title: String,
    pub task_id: i64,
    #[sqlx(skip)]
    #[serde(default)]
    pub descriptions: Vec<Description>,
}

/// Body used to create a list, or to replace one.
///
/// `descriptions` follows replace-set semantics: when absent the stored descriptions are
/// kept, when present they are deleted and re-created from this collection.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DescriptionListInput {
    #[validate(length(min = 1, max = 50))]
    pub title: String,
    #[serde(default)]
    pub descriptions: Option<Vec<DescriptionInput>>,
}

impl DescriptionListInput {
    /// Validates the list and every carried description.
    pub fn validate_all(&self) -> Result<(), ValidationErrors> {
        self.validate()?;
        for description in self.descriptions.iter().flatten() {
            description.validate()?;
        }
        Ok(())
    }
}

impl From<&DescriptionList> for DescriptionListInput {
    fn from(list: &DescriptionList) -> Self {
        Self {
            title: list.title.clone(),
            descriptions: Some(list.descriptions.iter().map(DescriptionInput::from).collect()),
        }
    }
}
