pub mod error;
pub mod flash;
pub mod pages;
pub mod record_view;
pub mod routes;
