pub mod geography_service;
pub mod notification_service;
pub mod record_normalizer;
pub mod validation;
pub mod vle_record_service;

pub use geography_service::*;
pub use notification_service::*;
pub use record_normalizer::*;
pub use validation::*;
pub use vle_record_service::*;
