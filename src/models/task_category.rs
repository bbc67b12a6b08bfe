use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct TaskCategory {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
}

/// Body of the create and update endpoints. An update replaces both fields.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct TaskCategoryInput {
    #[validate(length(min = 1, max = 30))]
    pub title: String,
    #[validate(length(max = 500))]
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_length_limits() {
        let valid = TaskCategoryInput {
            title: "Fitness".into(),
            description: None,
        };
        assert!(valid.validate().is_ok());

        let too_long = TaskCategoryInput {
            title: "c".repeat(31),
            description: None,
        };
        assert!(too_long.validate().is_err());

        let empty = TaskCategoryInput {
            title: String::new(),
            description: Some("Nothing".into()),
        };
        assert!(empty.validate().is_err());
    }
}
