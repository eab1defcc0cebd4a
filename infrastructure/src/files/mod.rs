//! File set persistence

mod store;

pub use store::{FileSetStore, FileStoreError};
