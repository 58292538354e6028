pub mod overlay;
pub mod query;
pub mod record;
pub mod response;
pub mod settings;
pub mod signal;
