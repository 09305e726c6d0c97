//! Command-line arguments shared by every tool

use crate::config::{ClientConfig, Environment};
use crate::Result;
use clap::{Args, Parser};

/// Where the API key is looked up, shown at the end of `--help`
pub const CREDENTIALS_HELP: &str = "\
The API key is read from the RD_API environment variable, or else from
`api_key` in the config file ($RDT_CONFIG, default rdt/config.toml in the
user config directory). A .env file is not read; export RD_API instead.";

/// API selection flags
#[derive(Args, Debug, Clone, Default)]
pub struct ApiArgs {
    /// API deployment to use (default: prd, or `environment` from the config file)
    #[arg(long = "env", value_enum)]
    pub environment: Option<Environment>,

    /// Explicit API base URL, overriding --env
    #[arg(long)]
    pub base_url: Option<String>,
}

impl ApiArgs {
    /// Resolve the client configuration for these flags
    pub fn client_config(&self) -> Result<ClientConfig> {
        ClientConfig::resolve(self.environment, self.base_url.clone())
    }
}

/// Parse process arguments
///
/// Usage errors exit with status 1; `--help` and `--version` exit 0.
pub fn parse_args<P: Parser>() -> P {
    match P::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            std::process::exit(code);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Parser, Debug)]
    #[command(after_help = CREDENTIALS_HELP)]
    struct TestArgs {
        #[command(flatten)]
        api: ApiArgs,
    }

    #[test]
    fn test_api_args_parse() {
        let args = TestArgs::try_parse_from(["tool", "--env", "dev"]).unwrap();
        assert_eq!(args.api.environment, Some(Environment::Dev));
        assert!(args.api.base_url.is_none());

        let args =
            TestArgs::try_parse_from(["tool", "--base-url", "http://127.0.0.1:9000"]).unwrap();
        assert_eq!(args.api.base_url.as_deref(), Some("http://127.0.0.1:9000"));
        assert!(args.api.environment.is_none());
    }

    #[test]
    fn test_unknown_environment_rejected() {
        assert!(TestArgs::try_parse_from(["tool", "--env", "staging"]).is_err());
    }

    #[test]
    fn test_help_names_key_sources() {
        use clap::CommandFactory;

        let help = TestArgs::command().render_help().to_string();
        assert!(help.contains("RD_API"));
        assert!(help.contains("RDT_CONFIG"));
    }
}
