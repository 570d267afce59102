//! Application Layer - Use Cases
//!
//! This layer orchestrates domain logic and infrastructure.
//! Contains use case implementations.

pub mod config;
pub mod create_level;
pub mod create_team;
pub mod join_team;
pub mod leave_team;
pub mod progress;
pub mod servers;
pub mod submit_answer;
