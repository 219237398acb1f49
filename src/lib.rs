//! Place recommendations for groups of friends.
//!
//! Given a user, some of their friends, a map viewport and a few cuisines,
//! the service ranks the places in the viewport for the group and stores
//! the top picks as a recommendation record other services can share. It
//! also serves the map itself: the places the user's circle has tasted or
//! wants to taste, with the circle's star ratings on the busiest ones.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
