//! Shared test utilities
//!
//! Each integration test binary pulls in the whole module, so not every
//! helper is used everywhere.
#![allow(dead_code)]

pub mod db;
pub mod factories;
pub mod fakes;
