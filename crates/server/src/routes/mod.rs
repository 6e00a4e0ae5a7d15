pub mod admin;
pub mod auth;
pub mod health;
pub mod oauth;
pub mod pages;
pub mod teachers_list;
