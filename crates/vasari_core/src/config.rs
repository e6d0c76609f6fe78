//! Configuration model.
//!
//! The configuration is an explicit value threaded into every orchestrator
//! and router call; nothing reads it from ambient global state. It loads
//! from TOML, with every section defaulting so a partial file works.

use crate::Platform;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;
use vasari_error::{ConfigError, ConfigErrorKind, ParseError, ParseErrorKind, VasariResult};

/// Top-level configuration for the pipeline.
///
/// # Examples
///
/// ```
/// use vasari_core::{Platform, VasariConfig};
///
/// let config = VasariConfig::from_toml_str(
///     r#"
///     [limits]
///     x_max_chars = 200
///
///     [routing]
///     summarize = ["openai:small-1", "anthropic:mid-2"]
///     "#,
/// )
/// .unwrap();
///
/// assert_eq!(config.limit_for(Platform::X), 200);
/// assert_eq!(config.limit_for(Platform::Threads), 500);
/// assert_eq!(config.routing["summarize"].len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VasariConfig {
    /// Per-platform enable flags
    pub platforms: PlatformToggles,
    /// Per-platform character ceilings
    pub limits: PlatformLimits,
    /// Operational mode switches
    pub modes: Modes,
    /// Generation call bounds
    pub llm: LlmSettings,
    /// Stage name to ordered `provider:model` route list
    pub routing: HashMap<String, Vec<String>>,
    /// `provider:model` to pricing
    pub pricing: HashMap<String, Pricing>,
    /// Scheduler settings
    pub scheduler: SchedulerSettings,
    /// Optional rolling 7-day publish cap per platform
    pub caps: HashMap<Platform, u32>,
}

impl VasariConfig {
    /// Parse a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> VasariResult<Self> {
        toml::from_str(text)
            .map_err(|e| ConfigError::new(ConfigErrorKind::TomlParse(e.to_string())).into())
    }

    /// Load a configuration from a TOML file.
    pub fn load(path: impl AsRef<std::path::Path>) -> VasariResult<Self> {
        let text = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            ConfigError::new(ConfigErrorKind::FileRead(format!(
                "{}: {e}",
                path.as_ref().display()
            )))
        })?;
        Self::from_toml_str(&text)
    }

    /// Character ceiling for a platform.
    pub fn limit_for(&self, platform: Platform) -> usize {
        self.limits.limit_for(platform)
    }

    /// Platforms currently enabled for draft generation.
    pub fn enabled_platforms(&self) -> Vec<Platform> {
        self.platforms.enabled()
    }

    /// Pricing entry for a `provider:model` key, if configured.
    pub fn price_for(&self, key: &str) -> Option<&Pricing> {
        self.pricing.get(key)
    }

    /// Rolling 7-day publish cap for a platform, if configured.
    pub fn cap_for(&self, platform: Platform) -> Option<u32> {
        self.caps.get(&platform).copied()
    }
}

/// Per-platform enable flags. All platforms default on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformToggles {
    /// Generate drafts for X
    pub x_enabled: bool,
    /// Generate drafts for Threads
    pub threads_enabled: bool,
    /// Generate drafts for LinkedIn
    pub linkedin_enabled: bool,
}

impl Default for PlatformToggles {
    fn default() -> Self {
        Self {
            x_enabled: true,
            threads_enabled: true,
            linkedin_enabled: true,
        }
    }
}

impl PlatformToggles {
    /// Enabled platforms in canonical order.
    pub fn enabled(&self) -> Vec<Platform> {
        [
            (Platform::X, self.x_enabled),
            (Platform::Threads, self.threads_enabled),
            (Platform::LinkedIn, self.linkedin_enabled),
        ]
        .into_iter()
        .filter_map(|(platform, on)| on.then_some(platform))
        .collect()
    }
}

/// Per-platform character ceilings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformLimits {
    /// X ceiling
    pub x_max_chars: usize,
    /// Threads ceiling
    pub threads_max_chars: usize,
    /// LinkedIn ceiling
    pub linkedin_max_chars: usize,
}

impl Default for PlatformLimits {
    fn default() -> Self {
        Self {
            x_max_chars: Platform::X.default_limit(),
            threads_max_chars: Platform::Threads.default_limit(),
            linkedin_max_chars: Platform::LinkedIn.default_limit(),
        }
    }
}

impl PlatformLimits {
    /// Ceiling for one platform.
    pub fn limit_for(&self, platform: Platform) -> usize {
        match platform {
            Platform::X => self.x_max_chars,
            Platform::Threads => self.threads_max_chars,
            Platform::LinkedIn => self.linkedin_max_chars,
        }
    }
}

/// Operational mode switches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Modes {
    /// Whether generation providers are used at all
    pub llm_enabled: bool,
    /// Static dry-run default (a global-setting override wins at runtime)
    pub dry_run: bool,
    /// Whether publish requires an approved/scheduled draft
    pub approval_required: bool,
}

impl Default for Modes {
    fn default() -> Self {
        Self {
            llm_enabled: true,
            dry_run: true,
            approval_required: true,
        }
    }
}

/// Bounds applied to every generation call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    /// Sampling temperature
    pub temperature: f32,
    /// Output token ceiling
    pub max_tokens: u32,
    /// Per-call timeout
    pub timeout_seconds: u64,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            temperature: 0.4,
            max_tokens: 700,
            timeout_seconds: 30,
        }
    }
}

/// Per-route pricing in USD per 1000 tokens.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Pricing {
    /// Prompt token price per 1k
    pub input_per_1k: f64,
    /// Completion token price per 1k
    pub output_per_1k: f64,
}

impl Pricing {
    /// Estimated cost for a call with the given token counts.
    pub fn estimate(&self, tokens_in: u32, tokens_out: u32) -> f64 {
        (f64::from(tokens_in) / 1000.0) * self.input_per_1k
            + (f64::from(tokens_out) / 1000.0) * self.output_per_1k
    }
}

/// Scheduler runner settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerSettings {
    /// IANA timezone name used to interpret user-supplied datetimes and
    /// compute "now" for the sweep
    pub timezone: String,
}

impl Default for SchedulerSettings {
    fn default() -> Self {
        Self {
            timezone: "UTC".to_string(),
        }
    }
}

/// An ordered `(provider, model)` pair tried for a stage.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Route {
    /// Registered provider name
    pub provider: String,
    /// Model identifier passed to the provider
    pub model: String,
}

impl Route {
    /// The `provider:model` key used by the pricing table.
    pub fn pricing_key(&self) -> String {
        format!("{}:{}", self.provider, self.model)
    }
}

impl FromStr for Route {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (provider, model) = s
            .split_once(':')
            .ok_or_else(|| ParseError::new(ParseErrorKind::Route(s.to_string())))?;
        if provider.is_empty() || model.is_empty() {
            return Err(ParseError::new(ParseErrorKind::Route(s.to_string())));
        }
        Ok(Self {
            provider: provider.to_string(),
            model: model.to_string(),
        })
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.provider, self.model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_all_sections() {
        let config = VasariConfig::default();
        assert!(config.modes.dry_run);
        assert!(config.modes.approval_required);
        assert_eq!(config.limit_for(Platform::LinkedIn), 3000);
        assert_eq!(config.enabled_platforms().len(), 3);
        assert!(config.routing.is_empty());
    }

    #[test]
    fn parses_partial_toml() {
        let config = VasariConfig::from_toml_str(
            r#"
            [modes]
            dry_run = false

            [platforms]
            threads_enabled = false

            [pricing."openai:small-1"]
            input_per_1k = 0.5
            output_per_1k = 1.5

            [caps]
            x = 5
            "#,
        )
        .unwrap();
        assert!(!config.modes.dry_run);
        assert_eq!(
            config.enabled_platforms(),
            vec![Platform::X, Platform::LinkedIn]
        );
        let pricing = config.price_for("openai:small-1").unwrap();
        assert_eq!(pricing.estimate(1000, 1000), 2.0);
        assert_eq!(config.cap_for(Platform::X), Some(5));
        assert_eq!(config.cap_for(Platform::Threads), None);
    }

    #[test]
    fn route_parsing() {
        let route: Route = "anthropic:mid-2".parse().unwrap();
        assert_eq!(route.provider, "anthropic");
        assert_eq!(route.pricing_key(), "anthropic:mid-2");
        assert!("nomodel".parse::<Route>().is_err());
        assert!(":x".parse::<Route>().is_err());
    }
}
