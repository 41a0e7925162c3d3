//! Lost and found item report entities.

pub mod category;
pub mod event;
pub mod model;
pub mod status;

pub use category::ItemCategory;
pub use event::ItemReported;
pub use model::{Item, NewItem};
pub use status::{ItemStatus, Partition};
