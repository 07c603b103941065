//! Kidari Server
//!
//! Session gating for the 키다리 선생님 volunteer coordination site: an edge
//! gate that keeps anonymous visitors out of member paths, and route guards
//! that enforce roles inside member and admin handlers.

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod pages;
