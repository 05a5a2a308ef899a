pub mod calendar;
pub mod domain;
pub mod error;
pub mod protocol;
pub mod upload;
