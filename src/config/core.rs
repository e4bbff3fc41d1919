use anyhow::{Context, Result, bail};
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use figment::value::{Dict, Map, Value};
use figment::{Figment, Metadata, Profile, Provider};
use serde::Serialize;
use std::path::Path;

use super::LinkGlobsConfig;

/// Base name of the per-directory configuration file
pub const CONFIG_FILE_STEM: &str = "link-globs";

/// Prefix for environment overrides (`LINK_GLOBS_MATCH`, `LINK_GLOBS_MATCH_OPTIONS__DOT`)
pub const ENV_PREFIX: &str = "LINK_GLOBS_";

/// Load the merged configuration.
///
/// Priority, lowest first: built-in defaults, `link-globs.{toml,json,yaml,yml}`
/// in the working directory, the custom file, `LINK_GLOBS_*` environment
/// variables, CLI overrides. The result is validated before it is returned.
pub fn load<T: Serialize>(custom_config: Option<&Path>, cli_overrides: Option<T>) -> Result<LinkGlobsConfig> {
    tracing::trace!("CONFIG LOAD: Starting");

    let figment = figment(custom_config, cli_overrides)?;

    let config: LinkGlobsConfig = figment
        .extract()
        .context("Failed to parse link-globs configuration")?;
    config.validate()?;

    tracing::trace!("CONFIG LOAD: match = {:?}, nodes = {}", config.match_pattern, config.nodes.len());
    Ok(config)
}

/// The figment chain behind [`load`], exposed for `config show`
pub fn figment<T: Serialize>(custom_config: Option<&Path>, cli_overrides: Option<T>) -> Result<Figment> {
    let mut figment = Figment::from(Serialized::defaults(LinkGlobsConfig::default()))
        .merge(SnakeCaseKeys(Toml::file(format!("{}.toml", CONFIG_FILE_STEM))))
        .merge(SnakeCaseKeys(Json::file(format!("{}.json", CONFIG_FILE_STEM))))
        .merge(SnakeCaseKeys(Yaml::file(format!("{}.yaml", CONFIG_FILE_STEM))))
        .merge(SnakeCaseKeys(Yaml::file(format!("{}.yml", CONFIG_FILE_STEM))));

    if let Some(path) = custom_config {
        if !path.is_file() {
            bail!("Config file not found: {}", path.display());
        }
        tracing::trace!("CONFIG LOAD: Custom file {}", path.display());
        figment = match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => figment.merge(SnakeCaseKeys(Json::file(path))),
            Some("yaml") | Some("yml") => figment.merge(SnakeCaseKeys(Yaml::file(path))),
            _ => figment.merge(SnakeCaseKeys(Toml::file(path))),
        };
    }

    figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

    if let Some(overrides) = cli_overrides {
        tracing::trace!("CONFIG LOAD: Applying CLI overrides");
        figment = figment.merge(Serialized::defaults(overrides));
    }

    Ok(figment)
}

/// Wraps a file provider so camelCase keys (`matchOptions`, `matchBase`)
/// land on the snake_case fields. A snake_case key wins when a file spells
/// both.
struct SnakeCaseKeys<P>(P);

impl<P: Provider> Provider for SnakeCaseKeys<P> {
    fn metadata(&self) -> Metadata {
        self.0.metadata()
    }

    fn data(&self) -> std::result::Result<Map<Profile, Dict>, figment::Error> {
        Ok(self
            .0
            .data()?
            .into_iter()
            .map(|(profile, dict)| (profile, snake_case_dict(dict)))
            .collect())
    }
}

fn snake_case_dict(dict: Dict) -> Dict {
    let (exact, camel): (Vec<_>, Vec<_>) = dict.into_iter().partition(|(key, _)| snake_case(key) == *key);

    let mut renamed: Dict = exact
        .into_iter()
        .map(|(key, value)| (key, snake_case_value(value)))
        .collect();
    for (key, value) in camel {
        renamed
            .entry(snake_case(&key))
            .or_insert_with(|| snake_case_value(value));
    }
    renamed
}

fn snake_case_value(value: Value) -> Value {
    match value {
        Value::Dict(tag, dict) => Value::Dict(tag, snake_case_dict(dict)),
        Value::Array(tag, values) => Value::Array(tag, values.into_iter().map(snake_case_value).collect()),
        other => other,
    }
}

fn snake_case(key: &str) -> String {
    let mut snake = String::with_capacity(key.len() + 4);
    for (i, ch) in key.char_indices() {
        if ch.is_ascii_uppercase() {
            if i > 0 {
                snake.push('_');
            }
            snake.push(ch.to_ascii_lowercase());
        } else {
            snake.push(ch);
        }
    }
    snake
}
