//! Data access, one module per entity.
//!
//! Every function takes a `&mut SqliteConnection`, so a caller can hand in either a pooled
//! connection (each statement commits on its own) or an open transaction (the caller decides
//! when to commit). Functions issuing several statements say so in their docs and should be
//! called inside a transaction.

pub mod description_lists;
pub mod descriptions;
pub mod tags;
pub mod task_categories;
pub mod tasks;
pub mod users;
