//! Offline secret generation.

use async_trait::async_trait;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use secretagent_core::{ApiKeyCriteria, PasswordCriteria};

use crate::generator::{ApiKeyResponse, PasswordResponse, SecretGenerator};
use crate::Result;

const LOWERCASE: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const UPPERCASE: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const DIGITS: &[u8] = b"0123456789";
const SYMBOLS: &[u8] = b"!@#$%^&*()-_=+[]{};:,.<>?";
const ALPHANUMERIC: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Length of the random part of an API key.
const API_KEY_RANDOM_LEN: usize = 40;

/// Longest access-level scope embedded in an API key.
const MAX_SCOPE_LEN: usize = 16;

/// Generator that never leaves the machine.
///
/// Passwords always contain at least one character from every requested
/// class. API keys look like `sk_<scope>_<random>`, with the scope derived
/// from the access level.
pub struct LocalGenerator {
    rng: Mutex<StdRng>,
}

impl LocalGenerator {
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Deterministic generator, for tests.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    fn password(&self, criteria: &PasswordCriteria) -> String {
        let mut classes: Vec<&[u8]> = vec![LOWERCASE, UPPERCASE];
        if criteria.include_numbers {
            classes.push(DIGITS);
        }
        if criteria.include_symbols {
            classes.push(SYMBOLS);
        }
        let pool: Vec<u8> = classes.concat();

        let mut rng = self.rng.lock();
        let length = (criteria.length as usize).max(classes.len());

        let mut chars: Vec<u8> = classes
            .iter()
            .map(|class| class[rng.gen_range(0..class.len())])
            .collect();
        while chars.len() < length {
            chars.push(pool[rng.gen_range(0..pool.len())]);
        }
        chars.shuffle(&mut *rng);

        chars.into_iter().map(char::from).collect()
    }

    fn api_key(&self, criteria: &ApiKeyCriteria) -> ApiKeyResponse {
        let mut rng = self.rng.lock();
        let random: String = (0..API_KEY_RANDOM_LEN)
            .map(|_| char::from(ALPHANUMERIC[rng.gen_range(0..ALPHANUMERIC.len())]))
            .collect();

        let scope = scope_slug(&criteria.access_level);
        let comments = format!(
            "Generated locally for \"{}\" with {} access. Keep it out of source control and rotate it if it is ever exposed.",
            criteria.service_description.trim(),
            criteria.access_level.trim(),
        );

        ApiKeyResponse {
            api_key: format!("sk_{scope}_{random}").into(),
            comments: Some(comments),
        }
    }
}

impl Default for LocalGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Lowercase alphanumeric slug of an access level, e.g. "Read-Only" -> "readonly".
fn scope_slug(access_level: &str) -> String {
    let slug: String = access_level
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .take(MAX_SCOPE_LEN)
        .collect();

    if slug.is_empty() {
        "key".to_string()
    } else {
        slug
    }
}

#[async_trait]
impl SecretGenerator for LocalGenerator {
    fn name(&self) -> &str {
        "local"
    }

    async fn generate_password(&self, criteria: &PasswordCriteria) -> Result<PasswordResponse> {
        Ok(PasswordResponse {
            password: self.password(criteria).into(),
        })
    }

    async fn suggest_api_key(&self, criteria: &ApiKeyCriteria) -> Result<ApiKeyResponse> {
        Ok(self.api_key(criteria))
    }
}
