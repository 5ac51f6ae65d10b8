// Records module
// Public interface for record categories and their backing files

mod category;
mod store;

pub use category::{Category, UnknownCategory};
pub use store::RecordStore;
