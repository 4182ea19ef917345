pub mod preview;
pub mod scratch;
pub mod upload_service;
