pub mod convert;
pub mod encoding;
pub mod lookup;
pub mod qa;
pub mod rebuild;
pub mod spacing;
pub mod transcode;
