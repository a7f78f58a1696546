//! Optimize command implementation for the lastmile CLI.

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use lastmile_core::{
    AnyDriver, DispatchRequest, ErrorBody, InMemoryOrderStore, LogAssignmentSink, OrderId,
    OrderRecord, OrderStore, OrderStoreError,
};
use lastmile_data::orders::{HttpOrderStore, HttpOrderStoreConfig, OrdersResponse};
use lastmile_solver_nn::{Dispatcher, NearestNeighbourOptimizer, OptimizerConfig};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::io::{BufReader, Write};
use std::time::Duration;

use crate::fs::{file_is_file, open_utf8_file};
use crate::{
    ARG_API_TOKEN, ARG_MAX_ITERATIONS, ARG_ORDER_API_URL, ARG_ORDERS, ARG_REQUEST,
    ARG_TIME_BUDGET_MS, CliError, ENV_REQUEST,
};

/// CLI arguments for the `optimize` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Plan a driver's route from a JSON dispatch request. Orders \
                 are resolved from an exported orders file or, when no file \
                 is given, from the platform's order API. The planned route \
                 is printed as JSON; on failure an error body is printed \
                 instead.",
    about = "Plan a delivery route"
)]
#[ortho_config(prefix = "LASTMILE")]
pub(crate) struct OptimizeArgs {
    /// Path to a JSON file containing a dispatch request.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) request_path: Option<Utf8PathBuf>,
    /// JSON file of exported orders; takes precedence over the order API.
    #[arg(long = ARG_ORDERS, value_name = "path")]
    #[serde(default)]
    pub(crate) orders: Option<Utf8PathBuf>,
    /// Base URL of the order API (e.g. "http://localhost:5000").
    #[arg(long = ARG_ORDER_API_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) order_api_url: Option<String>,
    /// Bearer token for the order API.
    #[arg(long = ARG_API_TOKEN, value_name = "token")]
    #[serde(default)]
    pub(crate) api_token: Option<String>,
    /// Cap on local improvement iterations.
    #[arg(long = ARG_MAX_ITERATIONS, value_name = "count")]
    #[serde(default)]
    pub(crate) max_iterations: Option<usize>,
    /// Wall-clock budget for the search, in milliseconds.
    #[arg(long = ARG_TIME_BUDGET_MS, value_name = "ms")]
    #[serde(default)]
    pub(crate) time_budget_ms: Option<u64>,
}

impl OptimizeArgs {
    pub(crate) fn into_config(self) -> Result<OptimizeConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        OptimizeConfig::try_from(merged)
    }
}

/// Where the command reads order records from.
#[derive(Clone, PartialEq, Eq)]
pub(crate) enum OrderSourceConfig {
    /// Exported orders file.
    File(Utf8PathBuf),
    /// The platform's order API.
    Api {
        base_url: String,
        token: Option<String>,
    },
}

impl std::fmt::Debug for OrderSourceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File(path) => f.debug_tuple("File").field(path).finish(),
            Self::Api { base_url, token } => f
                .debug_struct("Api")
                .field("base_url", base_url)
                .field("token", &token.as_ref().map(|_| "<redacted>"))
                .finish(),
        }
    }
}

/// Resolved `optimize` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct OptimizeConfig {
    /// Path to the JSON dispatch request.
    pub(crate) request_path: Utf8PathBuf,
    /// Order source.
    pub(crate) orders: OrderSourceConfig,
    /// Search limits.
    pub(crate) optimizer: OptimizerConfig,
}

impl OptimizeConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        Self::require_existing(&self.request_path, ARG_REQUEST)?;
        if let OrderSourceConfig::File(path) = &self.orders {
            Self::require_existing(path, ARG_ORDERS)?;
        }
        Ok(())
    }

    fn require_existing(path: &Utf8Path, field: &'static str) -> Result<(), CliError> {
        match file_is_file(path) {
            Ok(true) => Ok(()),
            Ok(false) => Err(CliError::SourcePathNotFile {
                field,
                path: path.to_path_buf(),
            }),
            Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
                Err(CliError::MissingSourceFile {
                    field,
                    path: path.to_path_buf(),
                })
            }
            Err(source) => Err(CliError::InspectSourcePath {
                field,
                path: path.to_path_buf(),
                source,
            }),
        }
    }
}

impl TryFrom<OptimizeArgs> for OptimizeConfig {
    type Error = CliError;

    fn try_from(args: OptimizeArgs) -> Result<Self, Self::Error> {
        let request_path = args.request_path.ok_or(CliError::MissingArgument {
            field: ARG_REQUEST,
            env: ENV_REQUEST,
        })?;

        let orders = match (args.orders, args.order_api_url) {
            (Some(path), _) => OrderSourceConfig::File(path),
            (None, Some(base_url)) => OrderSourceConfig::Api {
                base_url,
                token: args.api_token,
            },
            (None, None) => return Err(CliError::MissingOrderSource),
        };

        let mut optimizer = OptimizerConfig::default();
        if let Some(iterations) = args.max_iterations {
            optimizer = optimizer.with_max_improvement_iterations(iterations);
        }
        if let Some(millis) = args.time_budget_ms {
            optimizer = optimizer.with_time_budget(Duration::from_millis(millis));
        }

        Ok(Self {
            request_path,
            orders,
            optimizer,
        })
    }
}

/// The order store chosen by configuration.
enum OrderSource {
    File(InMemoryOrderStore),
    Api(HttpOrderStore),
}

impl OrderSource {
    fn open(config: &OrderSourceConfig) -> Result<Self, CliError> {
        match config {
            OrderSourceConfig::File(path) => {
                let response: OrdersResponse = load_json(path, ARG_ORDERS)?;
                let records = response.into_records();
                log::debug!("loaded {} orders from {path}", records.len());
                Ok(Self::File(InMemoryOrderStore::with_records(records)))
            }
            OrderSourceConfig::Api { base_url, token } => {
                let mut store_config = HttpOrderStoreConfig::new(base_url.clone());
                if let Some(secret) = token {
                    store_config = store_config.with_bearer_token(secret.clone());
                }
                Ok(Self::Api(HttpOrderStore::with_config(store_config)?))
            }
        }
    }
}

impl OrderStore for OrderSource {
    fn resolve_orders(&self, ids: &[OrderId]) -> Result<Vec<OrderRecord>, OrderStoreError> {
        match self {
            Self::File(store) => store.resolve_orders(ids),
            Self::Api(store) => store.resolve_orders(ids),
        }
    }
}

pub(crate) fn run_optimize(args: OptimizeArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_optimize_with(args, &mut stdout)
}

pub(crate) fn run_optimize_with(args: OptimizeArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = resolve_optimize_config(args)?;
    optimize_with_config(&config, writer)
}

fn resolve_optimize_config(args: OptimizeArgs) -> Result<OptimizeConfig, CliError> {
    let config = args.into_config()?;
    config.validate_sources()?;
    Ok(config)
}

/// Plan the configured request and write the route plan, or the error body
/// when planning fails.
pub(crate) fn optimize_with_config(
    config: &OptimizeConfig,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let request = load_dispatch_request(&config.request_path)?;
    let store = OrderSource::open(&config.orders)?;
    let optimizer = NearestNeighbourOptimizer::with_config(config.optimizer.clone());
    let dispatcher = Dispatcher::new(store, AnyDriver, optimizer, LogAssignmentSink);

    match dispatcher.plan(&request) {
        Ok(plan) => write_json(writer, &plan),
        Err(err) => {
            write_json(writer, &ErrorBody::from(&err))?;
            Err(CliError::Dispatch(err))
        }
    }
}

/// Loads a JSON-encoded [`DispatchRequest`] from disk.
pub(crate) fn load_dispatch_request(path: &Utf8Path) -> Result<DispatchRequest, CliError> {
    load_json(path, ARG_REQUEST)
}

fn load_json<T: DeserializeOwned>(path: &Utf8Path, field: &'static str) -> Result<T, CliError> {
    let file = open_utf8_file(path).map_err(|source| CliError::OpenInput {
        field,
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| CliError::ParseInput {
        field,
        path: path.to_path_buf(),
        source,
    })
}

fn write_json<T: Serialize>(writer: &mut dyn Write, value: &T) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(value).map_err(CliError::SerialiseOutput)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}
