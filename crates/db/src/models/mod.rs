//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - Where the entity is mutable, an update DTO (all `Option` fields)

pub mod merchant;
pub mod staff;
pub mod store;
pub mod store_staff;
