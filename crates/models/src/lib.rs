pub mod dedup;
pub mod rating;
pub mod role;
pub mod semester;
pub mod subject_type;
pub mod validation;
