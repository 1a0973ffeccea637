pub mod dataset_service;
pub mod report_service;

pub use dataset_service::*;
pub use report_service::*;
