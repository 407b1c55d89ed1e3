//! Entities surface: uniform list/filter/create/update/delete per type.

pub mod handle;
pub mod service;

pub use handle::EntityHandle;
pub use service::EntityService;
