//! Renderer configuration.

/// Environment variable overriding the issuer named in the document footer.
pub const ISSUER_ENV: &str = "TAAG_ISSUER_NAME";

const DEFAULT_ISSUER: &str = "Taag Media";

/// Document renderer configuration.
///
/// Tax rate and currency formatting are fixed policy, not configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RendererConfig {
    /// Name printed in the footer ("Generated on ... by <issuer>").
    pub issuer: String,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            issuer: DEFAULT_ISSUER.to_string(),
        }
    }
}

impl RendererConfig {
    /// Defaults, overridden by `TAAG_ISSUER_NAME` when set and non-empty.
    pub fn from_env() -> Self {
        match std::env::var(ISSUER_ENV) {
            Ok(issuer) if !issuer.trim().is_empty() => Self::default().with_issuer(issuer.trim()),
            _ => Self::default(),
        }
    }

    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = issuer.into();
        self
    }
}
