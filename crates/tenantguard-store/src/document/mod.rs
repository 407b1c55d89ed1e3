//! The versioned store document and its persistence.

pub mod model;
pub mod reconcile;
pub mod store;

pub use model::{StoreDocument, StoreMeta};
pub use reconcile::reconcile;
pub use store::DocumentStore;
