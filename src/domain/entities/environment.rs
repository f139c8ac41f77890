use std::fmt;

use serde::Deserialize;

/// The store environment a receipt was generated in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
pub enum Environment {
    /// Indicates that the receipt was generated for testing in the sandbox
    /// environment.
    Sandbox,
    /// Indicates that the receipt was generated in the production environment.
    Production,

    /// Any other label, including an empty or missing one.
    #[serde(untagged)]
    Unknown(String),
}

impl Default for Environment {
    fn default() -> Self {
        Environment::Unknown(String::new())
    }
}

impl Environment {
    pub fn as_str(&self) -> &str {
        match self {
            Environment::Sandbox => "Sandbox",
            Environment::Production => "Production",
            Environment::Unknown(label) => label,
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
