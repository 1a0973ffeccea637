pub mod datasets;
pub mod health;
pub mod reports;
pub mod upload;
