//! Domain Layer - Business logic and entities
//!
//! This layer contains:
//! - Domain entities (Team, TeamMember, Level, Submission, GameServer)
//! - Domain value objects (TeamName, AnswerAttempt)
//! - Domain services (answer encoding)
//! - Repository traits (interfaces)

pub mod entities;
pub mod services;
pub mod repository;
pub mod value_objects;
