//! Service identifiers attached to generated records.

use rand::Rng;

/// Environment variable that pins every record to one service.
pub const SERVICE_NAME_ENV: &str = "SERVICE_NAME";

pub const DEFAULT_SERVICES: [&str; 6] = [
    "web-service",
    "auth-service",
    "user-service",
    "order-service",
    "inventory-service",
    "payment-service",
];

/// Non-empty set of service names to sample from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceSet {
    names: Vec<String>,
}

impl ServiceSet {
    /// Build from a list. Falls back to the default set when `names` is empty.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        if names.is_empty() {
            return Self::default();
        }
        Self { names }
    }

    /// A singleton set, as produced by a `SERVICE_NAME` override.
    pub fn single(name: impl Into<String>) -> Self {
        Self {
            names: vec![name.into()],
        }
    }

    /// Pick one name uniformly at random.
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> &str {
        &self.names[rng.gen_range(0..self.names.len())]
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }
}

impl Default for ServiceSet {
    fn default() -> Self {
        Self {
            names: DEFAULT_SERVICES.iter().map(|s| s.to_string()).collect(),
        }
    }
}
