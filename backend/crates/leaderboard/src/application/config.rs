//! Application Configuration
//!
//! Configuration for the leaderboard application layer.

/// Leaderboard application configuration
#[derive(Debug, Clone)]
pub struct LeaderboardConfig {
    /// Cookie name carrying the signed identity token
    pub identity_cookie_name: String,
    /// Secret shared with the identity provider, used to verify identity
    /// token signatures (32 bytes)
    pub identity_secret: [u8; 32],
    /// Token required for level creation and server registration; `None`
    /// disables the admin surface entirely
    pub admin_token: Option<String>,
}

impl Default for LeaderboardConfig {
    fn default() -> Self {
        Self {
            identity_cookie_name: "ctf_identity".to_string(),
            identity_secret: [0u8; 32],
            admin_token: None,
        }
    }
}

impl LeaderboardConfig {
    /// Create config with a random identity secret (for development; in
    /// production the secret comes from the environment, shared with the
    /// identity provider)
    pub fn development() -> Self {
        use rand::RngCore;
        let mut secret = [0u8; 32];
        rand::rng().fill_bytes(&mut secret);
        Self {
            identity_secret: secret,
            ..Default::default()
        }
    }
}
