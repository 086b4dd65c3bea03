#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

mod document_store;
pub mod records;
mod repository;

pub use document_store::{Collection, DocumentStore, StoreError};
