//! REST backend for users and the notes assigned to them
//!
//! Users carry a unique username, an Argon2-hashed password, roles and an
//! active flag. Notes belong to a user and carry a unique title. A note can
//! only be created for an existing, active user, and a user cannot be
//! deleted while any note references them.

pub mod config;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod models;
pub mod password;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;
