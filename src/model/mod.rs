pub mod catalog;
pub mod fluent;
pub mod request;
