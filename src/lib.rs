#[macro_use]
extern crate diesel;
#[macro_use]
extern crate diesel_migrations;

pub mod import_events;
pub mod models;
pub mod schema;
pub mod setup;
