use anyhow::{Result, anyhow};
use clap::{Args, Subcommand};
use std::path::Path;

use crate::cli::Output;
use crate::config::{self, LinkGlobsConfig};

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Display current merged configuration
    Show {
        /// Output format: json, toml, yaml
        #[arg(short, long, default_value = "toml")]
        format: String,
    },
    /// Validate configuration
    Validate,
}

pub fn execute(args: ConfigArgs, custom_config: Option<&str>, output: &Output) -> Result<()> {
    let custom_config = custom_config.map(Path::new);

    match args.command {
        ConfigCommand::Show { format } => {
            let config = config::load(custom_config, None::<&()>)?;
            println!("{}", render(&config, &format)?);
        }
        ConfigCommand::Validate => {
            let config = config::load(custom_config, None::<&()>)?;
            output.verbose(&format!(
                "match = {}, {} node definition(s), encoding {}",
                config.match_pattern,
                config.nodes.len(),
                config.encoding
            ));
            output.success("Configuration is valid!");
        }
    }

    Ok(())
}

fn render(config: &LinkGlobsConfig, format: &str) -> Result<String> {
    match format.to_lowercase().as_str() {
        "json" => Ok(serde_json::to_string_pretty(config)?),
        "yaml" | "yml" => Ok(serde_yml::to_string(config)?),
        "toml" => Ok(toml::to_string_pretty(config)?),
        _ => Err(anyhow!("Unsupported format: {}. Use json, toml, or yaml", format)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_formats() {
        let config = LinkGlobsConfig::default();

        let toml = render(&config, "toml").unwrap();
        assert!(toml.contains("**/*.html"));
        assert!(toml.contains("[[nodes]]"));

        let json = render(&config, "JSON").unwrap();
        let parsed: LinkGlobsConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);

        let yaml = render(&config, "yaml").unwrap();
        assert!(yaml.contains("encoding: utf8"));

        assert!(render(&config, "ini").is_err());
    }
}
