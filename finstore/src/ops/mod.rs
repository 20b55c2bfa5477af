//! `FinStore` operations, one module per concern.

pub mod actuality;
pub mod download;
pub mod exporters;
pub mod history;
