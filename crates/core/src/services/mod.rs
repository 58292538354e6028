pub mod annotation_service;
pub mod cumulative_return_service;
pub mod layout_service;
pub mod shape_service;
pub mod table_service;
