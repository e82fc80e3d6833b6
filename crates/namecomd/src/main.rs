// # namecomd - name.com resource lifecycle shim
//
// This binary is a THIN integration layer: it reads provider configuration
// from the environment, builds the API client and resource registry, and runs
// a single lifecycle operation. All mapping and lifecycle logic lives in
// namecom-core.
//
// ## Usage
//
// ```bash
// namecomd schema
// namecomd import <resource_type> <id>
// namecomd create|read|delete <resource_type>   < state.json
// namecomd update|plan <resource_type>          < {"prior": .., "planned": ..}
// ```
//
// Resulting state is written to stdout as JSON. A read of a resource that no
// longer exists prints `null`.
//
// ## Configuration
//
// - `NAMECOM_USER`: API username
// - `NAMECOM_TOKEN`: API token
// - `NAMECOM_TEST`: Use the test API endpoint (`true`/`1`)
// - `NAMECOM_LOG_LEVEL`: Log level (default `info`), logs go to stderr
//
// ## Example
//
// ```bash
// export NAMECOM_USER=alice
// export NAMECOM_TOKEN=your_token
//
// namecomd import namecom_record example.com/12345
// ```

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use namecom_client::NameComClientFactory;
use namecom_core::traits::{
    DeleteDnssecRequest, DeleteRecordRequest, Dnssec, Domain, GetDnssecRequest, GetDomainRequest,
    GetRecordRequest, Record, SetNameserversRequest,
};
use namecom_core::{NameComApi, NameComApiFactory, ProviderConfig, ResourceRegistry};
use serde_json::Value;
use std::env;
use std::io::Read;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

/// Exit codes for different termination scenarios
///
/// - 0: Operation succeeded
/// - 1: Usage or configuration error
/// - 2: Operation failed
#[derive(Debug, Clone, Copy)]
enum ShimExitCode {
    /// Operation succeeded
    Success = 0,
    /// Usage or configuration error
    ConfigError = 1,
    /// Operation failed
    OperationError = 2,
}

impl From<ShimExitCode> for ExitCode {
    fn from(code: ShimExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Lifecycle operation requested on the command line
#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Schema,
    Create(String),
    Read(String),
    Update(String),
    Delete(String),
    Plan(String),
    Import(String, String),
}

impl Command {
    fn parse(args: &[String]) -> Result<Self> {
        let arg = |i: usize, what: &str| -> Result<String> {
            args.get(i)
                .cloned()
                .with_context(|| format!("missing {} argument", what))
        };

        let op = arg(0, "operation")?;
        let command = match op.as_str() {
            "schema" => Command::Schema,
            "create" => Command::Create(arg(1, "resource type")?),
            "read" => Command::Read(arg(1, "resource type")?),
            "update" => Command::Update(arg(1, "resource type")?),
            "delete" => Command::Delete(arg(1, "resource type")?),
            "plan" => Command::Plan(arg(1, "resource type")?),
            "import" => Command::Import(arg(1, "resource type")?, arg(2, "import id")?),
            other => bail!(
                "unknown operation '{}'. Supported: schema, create, read, update, delete, plan, import",
                other
            ),
        };
        Ok(command)
    }

    fn needs_client(&self) -> bool {
        !matches!(self, Command::Schema | Command::Plan(_))
    }
}

/// Application configuration
struct Config {
    provider: ProviderConfig,
    log_level: String,
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Self {
        let test = env::var("NAMECOM_TEST")
            .map(|v| matches!(v.to_lowercase().as_str(), "true" | "1"))
            .unwrap_or(false);

        Self {
            provider: ProviderConfig::new("", "", test).with_env_fallback(),
            log_level: env::var("NAMECOM_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        }
    }

    fn level(&self) -> Level {
        match self.log_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        }
    }
}

/// Split a `{"prior": .., "planned": ..}` document
fn prior_and_planned(mut input: Value) -> Result<(Value, Value)> {
    let prior = input
        .get_mut("prior")
        .map(Value::take)
        .context("input must contain a \"prior\" state")?;
    let planned = input
        .get_mut("planned")
        .map(Value::take)
        .context("input must contain a \"planned\" state")?;
    Ok((prior, planned))
}

fn read_stdin() -> Result<Value> {
    let mut buf = String::new();
    std::io::stdin()
        .read_to_string(&mut buf)
        .context("failed to read state from stdin")?;
    serde_json::from_str(&buf).context("stdin is not valid JSON")
}

async fn run(command: Command, registry: &ResourceRegistry) -> Result<Value> {
    let output = match command {
        Command::Schema => serde_json::to_value(registry.schemas())?,
        Command::Create(kind) => registry.create(&kind, read_stdin()?).await?,
        Command::Read(kind) => registry
            .read(&kind, read_stdin()?)
            .await?
            .unwrap_or(Value::Null),
        Command::Update(kind) => {
            let (prior, planned) = prior_and_planned(read_stdin()?)?;
            registry.update(&kind, prior, planned).await?
        }
        Command::Delete(kind) => registry.delete(&kind, read_stdin()?).await?,
        Command::Plan(kind) => {
            let (prior, planned) = prior_and_planned(read_stdin()?)?;
            serde_json::to_value(registry.plan(&kind, prior, planned)?)?
        }
        Command::Import(kind, id) => serde_json::to_value(registry.import(&kind, &id).await?)?,
    };
    Ok(output)
}

/// API client used by commands that never reach the network
struct Offline;

#[async_trait]
impl NameComApi for Offline {
    async fn create_record(&self, _: &Record) -> namecom_core::Result<Record> {
        Err(offline())
    }
    async fn get_record(&self, _: &GetRecordRequest) -> namecom_core::Result<Record> {
        Err(offline())
    }
    async fn update_record(&self, _: &Record) -> namecom_core::Result<Record> {
        Err(offline())
    }
    async fn delete_record(&self, _: &DeleteRecordRequest) -> namecom_core::Result<()> {
        Err(offline())
    }
    async fn set_nameservers(&self, _: &SetNameserversRequest) -> namecom_core::Result<Domain> {
        Err(offline())
    }
    async fn get_domain(&self, _: &GetDomainRequest) -> namecom_core::Result<Domain> {
        Err(offline())
    }
    async fn create_dnssec(&self, _: &Dnssec) -> namecom_core::Result<Dnssec> {
        Err(offline())
    }
    async fn get_dnssec(&self, _: &GetDnssecRequest) -> namecom_core::Result<Dnssec> {
        Err(offline())
    }
    async fn delete_dnssec(&self, _: &DeleteDnssecRequest) -> namecom_core::Result<()> {
        Err(offline())
    }
    fn client_name(&self) -> &'static str {
        "offline"
    }
}

fn offline() -> namecom_core::Error {
    namecom_core::Error::config("no API client configured for this command")
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let config = Config::from_env();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.level())
        .with_writer(std::io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("failed to install tracing subscriber: {}", e);
    }

    let args: Vec<String> = env::args().skip(1).collect();
    let command = match Command::parse(&args) {
        Ok(command) => command,
        Err(e) => {
            error!("{:#}", e);
            return ShimExitCode::ConfigError.into();
        }
    };

    let api: Arc<dyn NameComApi> = if command.needs_client() {
        match NameComClientFactory.create(&config.provider) {
            Ok(client) => {
                info!(
                    "Using name.com {} API as {}",
                    if config.provider.test { "TEST" } else { "production" },
                    config.provider.username
                );
                Arc::from(client)
            }
            Err(e) => {
                error!("Configuration error: {}", e);
                return ShimExitCode::ConfigError.into();
            }
        }
    } else {
        Arc::new(Offline)
    };

    let registry = ResourceRegistry::with_builtin(api);

    match run(command, &registry).await {
        Ok(output) => {
            println!("{}", output);
            ShimExitCode::Success.into()
        }
        Err(e) => {
            error!("{:#}", e);
            ShimExitCode::OperationError.into()
        }
    }
}
