pub mod fluent;
pub mod po;
