//! Bearer-token resolution for the hosted and gateway providers.

use std::path::PathBuf;

use sauth::SecretString;
use tokio::process::Command;
use tokio::sync::OnceCell;

use crate::{ProviderConfig, ProviderError, ProviderKind};

/// Tokens shorter than this (after trimming) are treated as absent.
pub const MIN_TOKEN_LEN: usize = 20;
pub const GATEWAY_PLACEHOLDER_TOKEN: &str = "switchboard-gateway";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenSource {
    Injected,
    File,
    Cli,
    Placeholder,
}

/// Resolves a token once and reuses it for the executor's lifetime.
///
/// Order: injected token, token file, then `gh auth token`. The gateway
/// provider accepts any injected value and otherwise uses a placeholder.
#[derive(Debug)]
pub struct TokenResolver {
    kind: ProviderKind,
    injected: Option<SecretString>,
    token_file: Option<PathBuf>,
    use_cli: bool,
    resolved: OnceCell<(SecretString, TokenSource)>,
}

impl TokenResolver {
    pub fn from_config(config: &ProviderConfig) -> Self {
        Self {
            kind: config.kind,
            injected: config.token.clone(),
            token_file: config.token_file.clone(),
            use_cli: config.use_cli_token,
            resolved: OnceCell::new(),
        }
    }

    pub async fn token(&self) -> Result<&SecretString, ProviderError> {
        let (token, _) = self
            .resolved
            .get_or_try_init(|| self.resolve())
            .await?;
        Ok(token)
    }

    pub fn source(&self) -> Option<TokenSource> {
        self.resolved.get().map(|(_, source)| *source)
    }

    async fn resolve(&self) -> Result<(SecretString, TokenSource), ProviderError> {
        if self.kind == ProviderKind::GatewayProxy {
            return Ok(match self.injected.as_ref().filter(|token| !token.is_empty()) {
                Some(token) => (token.clone(), TokenSource::Injected),
                None => (
                    SecretString::new(GATEWAY_PLACEHOLDER_TOKEN),
                    TokenSource::Placeholder,
                ),
            });
        }

        if let Some(token) = self.injected.as_ref().and_then(|t| acceptable(t.expose())) {
            return Ok((token, TokenSource::Injected));
        }

        if let Some(path) = &self.token_file {
            match tokio::fs::read_to_string(path).await {
                Ok(contents) => {
                    if let Some(token) = acceptable(&contents) {
                        return Ok((token, TokenSource::File));
                    }
                    tracing::debug!(
                        phase = "provider",
                        event = "token_file_rejected",
                        path = %path.display()
                    );
                }
                Err(err) => tracing::debug!(
                    phase = "provider",
                    event = "token_file_unreadable",
                    path = %path.display(),
                    error = %err
                ),
            }
        }

        if self.use_cli
            && let Some(token) = cli_token().await
        {
            return Ok((token, TokenSource::Cli));
        }

        Err(ProviderError::configuration(format!(
            "no usable token for {} provider: set a token, a token file, or run `gh auth login`",
            self.kind
        )))
    }
}

fn acceptable(raw: &str) -> Option<SecretString> {
    let trimmed = raw.trim();
    (trimmed.len() >= MIN_TOKEN_LEN).then(|| SecretString::new(trimmed))
}

async fn cli_token() -> Option<SecretString> {
    let output = match Command::new("gh").args(["auth", "token"]).output().await {
        Ok(output) => output,
        Err(err) => {
            tracing::debug!(phase = "provider", event = "gh_cli_unavailable", error = %err);
            return None;
        }
    };

    if !output.status.success() {
        return None;
    }

    acceptable(&String::from_utf8_lossy(&output.stdout))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::ProviderErrorKind;

    const LONG_TOKEN: &str = "ghp_0123456789abcdefghijklmnop";

    fn hosted() -> ProviderConfig {
        ProviderConfig::new(ProviderKind::HostedInference, "gpt-4o-mini").without_cli_token()
    }

    #[tokio::test]
    async fn injected_token_wins_when_long_enough() {
        let resolver = TokenResolver::from_config(&hosted().with_token(format!("  {LONG_TOKEN}\n")));
        assert_eq!(resolver.token().await.expect("token").expose(), LONG_TOKEN);
        assert_eq!(resolver.source(), Some(TokenSource::Injected));
    }

    #[tokio::test]
    async fn short_injected_token_falls_through_to_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "{LONG_TOKEN}").expect("write token");

        let resolver = TokenResolver::from_config(
            &hosted().with_token("short").with_token_file(file.path()),
        );
        assert_eq!(resolver.token().await.expect("token").expose(), LONG_TOKEN);
        assert_eq!(resolver.source(), Some(TokenSource::File));
    }

    #[tokio::test]
    async fn missing_token_is_a_configuration_error() {
        let resolver = TokenResolver::from_config(&hosted().with_token_file("/nonexistent/token"));
        let error = resolver.token().await.expect_err("no token");
        assert_eq!(error.kind, ProviderErrorKind::Configuration);
    }

    #[tokio::test]
    async fn gateway_accepts_any_token_or_placeholder() {
        let base = ProviderConfig::new(ProviderKind::GatewayProxy, "llama").without_cli_token();

        let resolver = TokenResolver::from_config(&base.clone().with_token("x"));
        assert_eq!(resolver.token().await.expect("token").expose(), "x");

        let resolver = TokenResolver::from_config(&base);
        assert_eq!(
            resolver.token().await.expect("placeholder").expose(),
            GATEWAY_PLACEHOLDER_TOKEN
        );
        assert_eq!(resolver.source(), Some(TokenSource::Placeholder));
    }
}
