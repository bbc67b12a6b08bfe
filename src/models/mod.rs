pub mod description;
pub mod description_list;
pub mod tag;
pub mod task;
pub mod task_category;
pub mod user;

use serde::{Deserialize, Serialize};
use validator::Validate;

pub use description::{Description, DescriptionInput, DescriptionUpdate};
pub use description_list::{DescriptionList, DescriptionListInput};
pub use tag::{Tag, TagInput};
pub use task::{Task, TaskInput, TaskUpdate};
pub use task_category::{TaskCategory, TaskCategoryInput};
pub use user::{User, UserCreate};

/// `skip`/`limit` query parameters accepted by every listing endpoint.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Validate)]
pub struct Pagination {
    #[serde(default)]
    #[validate(range(min = 0))]
    pub skip: i64,
    #[serde(default = "default_limit")]
    #[validate(range(min = 0, max = 1000))]
    pub limit: i64,
}

fn default_limit() -> i64 {
    100
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: default_limit(),
        }
    }
}
