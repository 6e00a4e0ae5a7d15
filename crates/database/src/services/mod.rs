pub mod assignment;
pub mod auth;
pub mod directory;
pub mod profile;
pub mod review;
pub mod stats;
pub mod subject;
pub mod teacher;
