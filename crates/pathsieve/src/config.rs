//! Configuration management for pathsieve.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.
//!
//! A configuration lists *views*. Each view is one independent filter, and a
//! document is filtered to the union of what the views keep. Exclusions that
//! must all hold go into one `rules` view:
//!
//! ```toml
//! [[views]]
//! kind = "rules"
//! includes = ["ids", "emails"]
//! excludes = ["emails[].secret"]
//! exclude_pointers = ["/ids/0"]
//!
//! [[views]]
//! kind = "pointer"
//! exclude = "/address"
//! ```

use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::filter::{CompoundFilter, IntersectFilter, PointerFilter, RuleFilter, TokenFilter};
use crate::rules::RuleSet;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default configuration directory name.
const CONFIG_DIR_NAME: &str = "pathsieve";

/// Prefix of configuration environment variables.
const ENV_PREFIX: &str = "PATHSIEVE_";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `PATHSIEVE_`, sections split on `__`)
/// 2. TOML config file at `~/.config/pathsieve/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Independent filters whose results are combined.
    pub views: Vec<ViewConfig>,
    /// Output configuration.
    pub output: OutputConfig,
}

/// One independent filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ViewConfig {
    /// Include/exclude path rules.
    Rules {
        /// Paths to keep; empty keeps everything not excluded.
        #[serde(default)]
        includes: Vec<String>,
        /// Paths to drop; always checked first.
        #[serde(default)]
        excludes: Vec<String>,
        /// JSON pointers to drop, on top of the path rules.
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        exclude_pointers: Vec<String>,
    },
    /// Everything except one JSON pointer location.
    Pointer {
        /// The JSON pointer to drop.
        exclude: String,
    },
}

/// Output-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Terminate every output document with a newline.
    pub newline: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { newline: true }
    }
}

impl ViewConfig {
    /// Build the filter for one pass.
    ///
    /// A rules view with pointers keeps only what the rules and every pointer
    /// keep.
    ///
    /// # Errors
    ///
    /// Returns an error if a rule or pointer is malformed.
    pub fn build_filter(&self) -> Result<Box<dyn TokenFilter>> {
        let filter: Box<dyn TokenFilter> = match self {
            Self::Rules {
                includes,
                excludes,
                exclude_pointers,
            } => {
                let rules = RuleFilter::new(RuleSet::new(includes, excludes)?);
                if exclude_pointers.is_empty() {
                    Box::new(rules)
                } else {
                    let mut filters: Vec<Box<dyn TokenFilter>> = vec![Box::new(rules)];
                    for pointer in exclude_pointers {
                        filters.push(Box::new(PointerFilter::new(pointer)?));
                    }
                    Box::new(IntersectFilter::of(filters))
                }
            }
            Self::Pointer { exclude } => Box::new(PointerFilter::new(exclude)?),
        };
        Ok(filter)
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        debug!(path = %config_file.display(), views = config.views.len(), "Configuration loaded");
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(CONFIG_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first malformed rule or pointer.
    pub fn validate(&self) -> Result<()> {
        for (index, view) in self.views.iter().enumerate() {
            view.build_filter().map_err(|e| Error::ConfigValidation {
                message: format!("view {index}: {e}"),
            })?;
        }
        Ok(())
    }

    /// Build the filter for one pass: the union of all views.
    ///
    /// # Errors
    ///
    /// Returns an error if a rule or pointer is malformed.
    pub fn build_filter(&self) -> Result<CompoundFilter> {
        let filters = self
            .views
            .iter()
            .map(ViewConfig::build_filter)
            .collect::<Result<Vec<_>>>()?;
        Ok(CompoundFilter::of(filters))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::Disposition;
    use serde_json::json;
    use std::io::Write;

    fn rules(includes: &[&str], excludes: &[&str]) -> ViewConfig {
        ViewConfig::Rules {
            includes: includes.iter().map(ToString::to_string).collect(),
            excludes: excludes.iter().map(ToString::to_string).collect(),
            exclude_pointers: Vec::new(),
        }
    }

    fn exclusions(excludes: &[&str], pointers: &[&str]) -> ViewConfig {
        ViewConfig::Rules {
            includes: Vec::new(),
            excludes: excludes.iter().map(ToString::to_string).collect(),
            exclude_pointers: pointers.iter().map(ToString::to_string).collect(),
        }
    }

    fn apply(config: &Config, document: &serde_json::Value) -> serde_json::Value {
        crate::filter_value(document, config.build_filter().unwrap()).unwrap()
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.views.is_empty());
        assert!(config.output.newline);
    }

    #[test]
    fn test_validate_valid_config() {
        let mut config = Config::default();
        config.views.push(rules(&["a.b"], &["c"]));
        config.views.push(ViewConfig::Pointer {
            exclude: "/d/0".to_string(),
        });
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_invalid_rule() {
        let mut config = Config::default();
        config.views.push(rules(&["a..b"], &[]));

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("view 0"));
        assert!(err.contains("a..b"));
    }

    #[test]
    fn test_validate_invalid_pointer() {
        let mut config = Config::default();
        config.views.push(ViewConfig::Pointer {
            exclude: "no-slash".to_string(),
        });
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_build_filter_without_views_includes_all() {
        let filter = Config::default().build_filter().unwrap();
        assert_eq!(filter.disposition(), Disposition::IncludeAll);
    }

    #[test]
    fn test_build_filter_with_views() {
        let mut config = Config::default();
        config.views.push(rules(&["ids"], &[]));
        config.views.push(rules(&["emails"], &[]));
        let filter = config.build_filter().unwrap();
        assert_eq!(filter.len(), 2);
    }

    #[test]
    fn test_views_are_a_union() {
        let mut config = Config::default();
        config.views.push(ViewConfig::Pointer {
            exclude: "/a".to_string(),
        });
        config.views.push(ViewConfig::Pointer {
            exclude: "/b".to_string(),
        });
        let document = json!({"a": 1, "b": 2, "c": 3});
        assert_eq!(apply(&config, &document), document);
    }

    #[test]
    fn test_exclusions_in_one_view_all_hold() {
        let mut config = Config::default();
        config.views.push(exclusions(&[], &["/a", "/b"]));
        assert_eq!(
            apply(&config, &json!({"a": 1, "b": 2, "c": 3})),
            json!({"c": 3})
        );

        let mut config = Config::default();
        config.views.push(exclusions(&["secret"], &["/x"]));
        assert_eq!(
            apply(&config, &json!({"secret": 1, "x": 2, "c": 3})),
            json!({"c": 3})
        );
    }

    #[test]
    fn test_validate_invalid_exclude_pointer() {
        let mut config = Config::default();
        config.views.push(exclusions(&[], &["/ok", "bad"]));
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("view 0"));
        assert!(err.contains("bad"));
    }

    #[test]
    fn test_default_config_path() {
        let path = Config::default_config_path();
        assert!(path.to_string_lossy().contains("pathsieve"));
        assert!(path.to_string_lossy().contains("config.toml"));
    }

    #[test]
    fn test_load_nonexistent_config() {
        let result = Config::load_from(Some(PathBuf::from("/nonexistent/config.toml")));
        assert!(result.is_ok());
        assert_eq!(result.unwrap(), Config::default());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[[views]]
kind = "rules"
includes = ["items[].id"]

[[views]]
kind = "pointer"
exclude = "/secret"

[output]
newline = false
"#
        )
        .unwrap();

        let config = Config::load_from(Some(file.path().to_path_buf())).unwrap();
        assert_eq!(config.views.len(), 2);
        assert_eq!(config.views[0], rules(&["items[].id"], &[]));
        assert_eq!(
            config.views[1],
            ViewConfig::Pointer {
                exclude: "/secret".to_string()
            }
        );
        assert!(!config.output.newline);
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[[views]]
kind = "rules"
excludes = ["a[0]"]
"#
        )
        .unwrap();

        let err = Config::load_from(Some(file.path().to_path_buf())).unwrap_err();
        assert!(matches!(err, Error::ConfigValidation { .. }));
    }

    #[test]
    fn test_view_config_serialize() {
        let json = serde_json::to_string(&rules(&["a"], &[])).unwrap();
        assert!(json.contains(r#""kind":"rules""#));
    }

    #[test]
    fn test_view_config_deserialize() {
        let json = r#"{"kind": "pointer", "exclude": "/a"}"#;
        let view: ViewConfig = serde_json::from_str(json).unwrap();
        assert_eq!(
            view,
            ViewConfig::Pointer {
                exclude: "/a".to_string()
            }
        );
    }

    #[test]
    fn test_config_clone() {
        let config = Config::default();
        assert_eq!(config.clone(), config);
    }
}
