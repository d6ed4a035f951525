use clap::{Parser, builder::BoolishValueParser};
use std::error::Error;
use std::fmt;
use std::net::SocketAddr;
use std::time::Duration;

use vizql_core::config::{
    QueryOptions, ReturnFormat, VizqlConfig, metadata_url_for_server, vizql_url_for_server,
};

const DEFAULT_RETURN_FORMAT: &str = "OBJECTS";
const DEFAULT_MCP_HTTP_ADDR: &str = "127.0.0.1:4030";
const DEFAULT_QUERY_TIMEOUT_SECS: u64 = 10;
const DEFAULT_METADATA_TIMEOUT_SECS: u64 = 20;

#[derive(Parser, Debug)]
#[command(name = "vizql-mcpd", version, about = "VizQL MCP daemon.")]
#[allow(clippy::struct_excessive_bools)]
struct CliArgs {
    #[arg(long, env = "TABLEAU_SERVER_URL")]
    server_url: Option<String>,

    #[arg(long, env = "TABLEAU_VIZQL_URL")]
    vizql_url: Option<String>,

    #[arg(long, env = "TABLEAU_METADATA_URL")]
    metadata_url: Option<String>,

    #[arg(long, env = "TABLEAU_DATASOURCE_LUID")]
    datasource_luid: Option<String>,

    #[arg(long, env = "TABLEAU_PAT")]
    auth_token: Option<String>,

    #[arg(long, env = "VIZQL_RETURN_FORMAT", default_value = DEFAULT_RETURN_FORMAT)]
    return_format: String,

    #[arg(
        long,
        env = "VIZQL_QUERY_DEBUG",
        default_value_t = false,
        value_parser = BoolishValueParser::new()
    )]
    query_debug: bool,

    #[arg(
        long,
        env = "VIZQL_DISAGGREGATE",
        default_value_t = false,
        value_parser = BoolishValueParser::new()
    )]
    disaggregate: bool,

    #[arg(
        long,
        env = "VIZQL_QUERY_TIMEOUT_SECS",
        default_value_t = DEFAULT_QUERY_TIMEOUT_SECS
    )]
    query_timeout_secs: u64,

    #[arg(
        long,
        env = "VIZQL_METADATA_TIMEOUT_SECS",
        default_value_t = DEFAULT_METADATA_TIMEOUT_SECS
    )]
    metadata_timeout_secs: u64,

    #[arg(
        long = "stdio",
        env = "VIZQL_ENABLE_STDIO",
        default_value_t = true,
        value_parser = BoolishValueParser::new()
    )]
    enable_stdio: bool,

    #[arg(
        long = "http",
        env = "VIZQL_SERVE_HTTP",
        default_value_t = false,
        value_parser = BoolishValueParser::new()
    )]
    serve_http: bool,

    #[arg(long, env = "VIZQL_MCP_HTTP_ADDR", default_value = DEFAULT_MCP_HTTP_ADDR)]
    mcp_http_addr: SocketAddr,
}

/// Runtime configuration loaded from CLI arguments and environment variables.
#[derive(Clone)]
pub struct McpdConfig {
    pub vizql_url: String,
    pub metadata_url: String,
    pub datasource_luid: String,
    pub auth_token: Option<String>,
    pub options: QueryOptions,
    pub query_timeout: Duration,
    pub metadata_timeout: Duration,
    pub enable_stdio: bool,
    pub serve_http: bool,
    pub mcp_http_addr: SocketAddr,
}

#[derive(Debug)]
pub enum ConfigError {
    MissingSetting(&'static str),
    InvalidSetting { name: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingSetting(name) => write!(f, "missing required setting: {name}"),
            Self::InvalidSetting { name, value } => {
                write!(f, "invalid {name} value: {value}")
            }
        }
    }
}

impl Error for ConfigError {}

impl McpdConfig {
    pub fn from_args() -> Result<Self, ConfigError> {
        let args = CliArgs::parse();
        Self::try_from(args)
    }

    /// Assembles the bridge configuration this daemon serves.
    pub fn vizql(&self) -> VizqlConfig {
        let mut config = VizqlConfig::new(
            self.vizql_url.clone(),
            self.metadata_url.clone(),
            self.datasource_luid.clone(),
        )
        .with_options(self.options)
        .with_query_timeout(self.query_timeout)
        .with_metadata_timeout(self.metadata_timeout);
        if let Some(token) = &self.auth_token {
            config = config.with_auth_token(token.clone());
        }
        config
    }
}

impl TryFrom<CliArgs> for McpdConfig {
    type Error = ConfigError;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        let server_url = args.server_url.filter(|value| !value.trim().is_empty());
        let vizql_override = args.vizql_url.filter(|value| !value.trim().is_empty());
        let metadata_override = args.metadata_url.filter(|value| !value.trim().is_empty());
        let auth_token = args.auth_token.filter(|value| !value.trim().is_empty());

        let vizql_url = match (vizql_override, &server_url) {
            (Some(url), _) => url,
            (None, Some(server)) => vizql_url_for_server(server),
            (None, None) => return Err(ConfigError::MissingSetting("TABLEAU_SERVER_URL")),
        };
        let metadata_url = match (metadata_override, &server_url) {
            (Some(url), _) => url,
            (None, Some(server)) => metadata_url_for_server(server),
            (None, None) => return Err(ConfigError::MissingSetting("TABLEAU_SERVER_URL")),
        };

        let datasource_luid = args
            .datasource_luid
            .filter(|value| !value.trim().is_empty())
            .ok_or(ConfigError::MissingSetting("TABLEAU_DATASOURCE_LUID"))?;

        let return_format = parse_return_format(&args.return_format)?;

        if args.query_timeout_secs == 0 {
            return Err(ConfigError::InvalidSetting {
                name: "VIZQL_QUERY_TIMEOUT_SECS",
                value: args.query_timeout_secs.to_string(),
            });
        }
        if args.metadata_timeout_secs == 0 {
            return Err(ConfigError::InvalidSetting {
                name: "VIZQL_METADATA_TIMEOUT_SECS",
                value: args.metadata_timeout_secs.to_string(),
            });
        }

        Ok(Self {
            vizql_url,
            metadata_url,
            datasource_luid,
            auth_token,
            options: QueryOptions {
                return_format,
                debug: args.query_debug,
                disaggregate: args.disaggregate,
            },
            query_timeout: Duration::from_secs(args.query_timeout_secs),
            metadata_timeout: Duration::from_secs(args.metadata_timeout_secs),
            enable_stdio: args.enable_stdio,
            serve_http: args.serve_http,
            mcp_http_addr: args.mcp_http_addr,
        })
    }
}

fn parse_return_format(value: &str) -> Result<ReturnFormat, ConfigError> {
    if value.eq_ignore_ascii_case("objects") {
        Ok(ReturnFormat::Objects)
    } else if value.eq_ignore_ascii_case("arrays") {
        Ok(ReturnFormat::Arrays)
    } else {
        Err(ConfigError::InvalidSetting {
            name: "VIZQL_RETURN_FORMAT",
            value: value.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_args() -> CliArgs {
        CliArgs {
            server_url: Some("https://tableau.example.com".to_string()),
            vizql_url: None,
            metadata_url: None,
            datasource_luid: Some("luid-1".to_string()),
            auth_token: Some("token-1".to_string()),
            return_format: DEFAULT_RETURN_FORMAT.to_string(),
            query_debug: false,
            disaggregate: false,
            query_timeout_secs: DEFAULT_QUERY_TIMEOUT_SECS,
            metadata_timeout_secs: DEFAULT_METADATA_TIMEOUT_SECS,
            enable_stdio: true,
            serve_http: false,
            mcp_http_addr: DEFAULT_MCP_HTTP_ADDR.parse().expect("valid MCP addr"),
        }
    }

    fn parse_err(args: CliArgs) -> ConfigError {
        match McpdConfig::try_from(args) {
            Ok(_) => panic!("config should be rejected"),
            Err(err) => err,
        }
    }

    #[test]
    fn derives_endpoints_from_the_server_url() {
        let config = McpdConfig::try_from(base_args()).expect("config should parse");

        assert_eq!(
            config.vizql_url,
            "https://tableau.example.com/api/v1/vizql-data-service"
        );
        assert_eq!(
            config.metadata_url,
            "https://tableau.example.com/api/metadata/graphql"
        );
    }

    #[test]
    fn explicit_urls_override_the_derived_ones() {
        let mut args = base_args();
        args.vizql_url = Some("https://proxy.example.com/vds".to_string());
        args.metadata_url = Some("https://proxy.example.com/graphql".to_string());

        let config = McpdConfig::try_from(args).expect("config should parse");

        assert_eq!(config.vizql_url, "https://proxy.example.com/vds");
        assert_eq!(config.metadata_url, "https://proxy.example.com/graphql");
    }

    #[test]
    fn missing_server_and_urls_is_an_error() {
        let mut args = base_args();
        args.server_url = None;

        let err = parse_err(args);
        assert_eq!(err.to_string(), "missing required setting: TABLEAU_SERVER_URL");
    }

    #[test]
    fn missing_datasource_luid_is_an_error() {
        let mut args = base_args();
        args.datasource_luid = Some("   ".to_string());

        let err = parse_err(args);
        assert_eq!(
            err.to_string(),
            "missing required setting: TABLEAU_DATASOURCE_LUID"
        );
    }

    #[test]
    fn blank_auth_token_is_dropped() {
        let mut args = base_args();
        args.auth_token = Some("   ".to_string());

        let config = McpdConfig::try_from(args).expect("config should parse");
        assert!(config.auth_token.is_none());
    }

    #[test]
    fn return_format_parses_case_insensitively() {
        let mut args = base_args();
        args.return_format = "arrays".to_string();

        let config = McpdConfig::try_from(args).expect("config should parse");
        assert_eq!(config.options.return_format, ReturnFormat::Arrays);
    }

    #[test]
    fn unknown_return_format_is_an_error() {
        let mut args = base_args();
        args.return_format = "COLUMNS".to_string();

        let err = parse_err(args);
        assert_eq!(err.to_string(), "invalid VIZQL_RETURN_FORMAT value: COLUMNS");
    }

    #[test]
    fn zero_timeout_is_an_error() {
        let mut args = base_args();
        args.query_timeout_secs = 0;

        let err = parse_err(args);
        assert_eq!(err.to_string(), "invalid VIZQL_QUERY_TIMEOUT_SECS value: 0");
    }

    #[test]
    fn vizql_conversion_carries_every_setting() {
        let mut args = base_args();
        args.query_debug = true;
        args.query_timeout_secs = 3;
        args.metadata_timeout_secs = 9;

        let config = McpdConfig::try_from(args).expect("config should parse");
        let vizql = config.vizql();

        assert_eq!(vizql.datasource_luid, "luid-1");
        assert_eq!(vizql.auth_token.as_deref(), Some("token-1"));
        assert!(vizql.options.debug);
        assert_eq!(vizql.query_timeout, Duration::from_secs(3));
        assert_eq!(vizql.metadata_timeout, Duration::from_secs(9));
    }
}
