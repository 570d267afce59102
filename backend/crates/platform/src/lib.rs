//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Cryptographic utilities (SHA-1, SHA-256, HMAC, Base64)
//! - Cookie management

pub mod cookie;
pub mod crypto;
