//! Configuration loading with layered precedence.
//!
//! This module provides functions to load configuration with the precedence
//! order (lowest to highest): application defaults, configuration file,
//! environment variables, command-line arguments.
//!
//! Layers are composed manually through `MergeComposer` rather than with the
//! derived `load()`, because the clap `Cli` owns subcommand dispatch and
//! because typed environment values are validated fail-fast here instead of
//! being silently ignored.
//!
//! # Environment Variable Handling
//!
//! Environment variables with unparseable values (for example
//! `CCACTOR_POLLING_INTERVAL_SECS=soon`) return an error immediately.
//!
//! The legacy `CF_STAGING_TIMEOUT` and `CF_STARTUP_TIMEOUT` variables (whole
//! minutes) are honoured as aliases for the polling section. When both the
//! alias and the `CCACTOR_POLLING_*` variable are set, the latter wins.
//!
//! Environment access goes through [`mockable::Env`] so tests can supply a
//! fake environment without touching the process.

use camino::Utf8PathBuf;
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use mockable::{DefaultEnv, Env};
use ortho_config::discovery::ConfigDiscovery;
use ortho_config::serde_json::{self, Map, Value};
use ortho_config::{MergeComposer, toml};
use tracing::debug;

use crate::config::{AppConfig, Cli};
use crate::error::{ConfigError, Result};

// ============================================================================
// Environment Variable Specification Table
// ============================================================================

/// The type of value expected from an environment variable.
#[derive(Clone, Copy)]
enum EnvVarType {
    /// String value (always accepted).
    String,
    /// Boolean value (`true`/`false`). Invalid values return an error.
    Bool,
    /// Unsigned 64-bit integer. Invalid values return an error.
    U64,
}

/// Specification for a single environment variable mapping.
struct EnvVarSpec {
    /// The environment variable name (e.g., `CCACTOR_API_ENDPOINT`).
    env_var: &'static str,
    /// The JSON path segments (e.g., `["polling", "interval_secs"]`).
    path: &'static [&'static str],
    /// The expected value type.
    var_type: EnvVarType,
}

/// Table of all environment variables and their JSON paths.
///
/// Entries are applied in order, so an alias must precede the canonical
/// variable it shadows.
const ENV_VAR_SPECS: &[EnvVarSpec] = &[
    EnvVarSpec {
        env_var: "CCACTOR_API_ENDPOINT",
        path: &["api_endpoint"],
        var_type: EnvVarType::String,
    },
    EnvVarSpec {
        env_var: "CCACTOR_ACCESS_TOKEN",
        path: &["access_token"],
        var_type: EnvVarType::String,
    },
    EnvVarSpec {
        env_var: "CCACTOR_CONNECTION_SKIP_SSL_VALIDATION",
        path: &["connection", "skip_ssl_validation"],
        var_type: EnvVarType::Bool,
    },
    EnvVarSpec {
        env_var: "CCACTOR_CONNECTION_REQUEST_TIMEOUT_SECS",
        path: &["connection", "request_timeout_secs"],
        var_type: EnvVarType::U64,
    },
    EnvVarSpec {
        env_var: "CCACTOR_POLLING_INTERVAL_SECS",
        path: &["polling", "interval_secs"],
        var_type: EnvVarType::U64,
    },
    EnvVarSpec {
        env_var: "CCACTOR_POLLING_ASYNC_TIMEOUT_MINS",
        path: &["polling", "async_timeout_mins"],
        var_type: EnvVarType::U64,
    },
    // Legacy aliases precede the canonical names they shadow.
    EnvVarSpec {
        env_var: "CF_STAGING_TIMEOUT",
        path: &["polling", "staging_timeout_mins"],
        var_type: EnvVarType::U64,
    },
    EnvVarSpec {
        env_var: "CCACTOR_POLLING_STAGING_TIMEOUT_MINS",
        path: &["polling", "staging_timeout_mins"],
        var_type: EnvVarType::U64,
    },
    EnvVarSpec {
        env_var: "CF_STARTUP_TIMEOUT",
        path: &["polling", "startup_timeout_mins"],
        var_type: EnvVarType::U64,
    },
    EnvVarSpec {
        env_var: "CCACTOR_POLLING_STARTUP_TIMEOUT_MINS",
        path: &["polling", "startup_timeout_mins"],
        var_type: EnvVarType::U64,
    },
];

/// Returns the list of environment variable names recognised by the config loader.
///
/// Tests use this to clear every variable that could leak into a run.
#[must_use]
pub fn env_var_names() -> Vec<&'static str> {
    ENV_VAR_SPECS.iter().map(|spec| spec.env_var).collect()
}

/// Load a configuration file and push it to the composer.
///
/// Uses `cap_std::fs_utf8` for capability-oriented filesystem access: the
/// parent directory is opened first and the file is read from there.
fn load_config_file(path: &Utf8PathBuf, composer: &mut MergeComposer) -> Result<()> {
    let current_dir = Utf8PathBuf::from(".");
    let parent = path
        .parent()
        .filter(|p| !p.as_str().is_empty())
        .unwrap_or_else(|| current_dir.as_ref());
    let file_name = path.file_name().unwrap_or(path.as_str());

    let dir = Dir::open_ambient_dir(parent, ambient_authority()).map_err(|e| {
        ConfigError::ParseError {
            message: format!("failed to open directory {parent}: {e}"),
        }
    })?;

    let content = dir
        .read_to_string(file_name)
        .map_err(|e| ConfigError::ParseError {
            message: format!("failed to read {path}: {e}"),
        })?;

    let value =
        toml::from_str::<serde_json::Value>(&content).map_err(|e| ConfigError::ParseError {
            message: format!("failed to parse {path}: {e}"),
        })?;

    debug!(path = %path, "loaded configuration file");
    composer.push_file(value, Some(path.clone()));
    Ok(())
}

/// Load configuration with full layer precedence from the process environment.
///
/// # Errors
///
/// Returns `ConfigError` if configuration loading fails due to a malformed
/// configuration file, an invalid typed environment variable value, or a
/// merge failure.
pub fn load_config(cli: &Cli) -> Result<AppConfig> {
    load_config_with_env(cli, &DefaultEnv::new())
}

/// Load configuration with full layer precedence from `env`.
///
/// Sources, lowest precedence first:
/// 1. Application defaults defined in the struct
/// 2. Configuration file (the `--config` path, `CCACTOR_CONFIG_PATH`, or XDG
///    discovery)
/// 3. Environment variables from [`ENV_VAR_SPECS`]
/// 4. Command-line arguments
///
/// # Errors
///
/// Returns `ConfigError` if configuration loading fails.
pub fn load_config_with_env<E: Env>(cli: &Cli, env: &E) -> Result<AppConfig> {
    let mut composer = MergeComposer::new();

    let defaults =
        serde_json::to_value(AppConfig::default()).map_err(|e| ConfigError::ParseError {
            message: format!("failed to serialise defaults: {e}"),
        })?;
    composer.push_defaults(defaults);

    let config_path: Option<Utf8PathBuf> = cli
        .config
        .clone()
        .filter(|p| p.exists())
        .or_else(|| discover_config_file(env));

    if let Some(ref path) = config_path {
        load_config_file(path, &mut composer)?;
    }

    let env_values = collect_env_vars(env)?;
    if !env_values.is_null() {
        composer.push_environment(env_values);
    }

    let cli_overrides = build_cli_overrides(cli);
    if !cli_overrides.is_null() {
        composer.push_cli(cli_overrides);
    }

    let config =
        AppConfig::merge_from_layers(composer.layers()).map_err(ConfigError::OrthoConfig)?;

    Ok(config)
}

/// Find the first existing configuration file.
///
/// An explicit `CCACTOR_CONFIG_PATH` that points at an existing file wins
/// over the XDG and dotfile candidates.
fn discover_config_file<E: Env>(env: &E) -> Option<Utf8PathBuf> {
    if let Some(explicit) = env
        .string("CCACTOR_CONFIG_PATH")
        .filter(|value| !value.is_empty())
        .map(Utf8PathBuf::from)
        .filter(|p| p.exists())
    {
        return Some(explicit);
    }

    let discovery = ConfigDiscovery::builder("ccactor")
        .config_file_name("config.toml")
        .dotfile_name(".ccactor.toml")
        .build();
    discovery
        .candidates()
        .into_iter()
        .filter(|p| p.exists())
        .find_map(|p| Utf8PathBuf::try_from(p).ok())
}

/// Collect recognised environment variables into a JSON value.
///
/// # Errors
///
/// Returns `ConfigError::InvalidValue` if a typed environment variable (bool,
/// u64) has an unparseable value.
fn collect_env_vars<E: Env>(env: &E) -> Result<Value> {
    let mut root = Map::new();

    for spec in ENV_VAR_SPECS {
        let Some(raw_value) = env.string(spec.env_var) else {
            continue;
        };

        let json_value = match spec.var_type {
            EnvVarType::String => Value::String(raw_value),
            EnvVarType::Bool => match raw_value.parse::<bool>() {
                Ok(b) => Value::Bool(b),
                Err(_) => {
                    return Err(ConfigError::InvalidValue {
                        field: spec.env_var.to_owned(),
                        reason: format!("expected bool (true/false), got '{raw_value}'"),
                    }
                    .into());
                }
            },
            EnvVarType::U64 => match raw_value.trim().parse::<u64>() {
                Ok(n) => Value::Number(n.into()),
                Err(_) => {
                    return Err(ConfigError::InvalidValue {
                        field: spec.env_var.to_owned(),
                        reason: format!("expected unsigned integer, got '{raw_value}'"),
                    }
                    .into());
                }
            },
        };

        insert_at_path(&mut root, spec.path, json_value);
    }

    if root.is_empty() {
        Ok(Value::Null)
    } else {
        Ok(Value::Object(root))
    }
}

/// Insert a value at a nested path in a JSON map, creating intermediate
/// objects as needed.
fn insert_at_path(root: &mut Map<String, Value>, path: &[&str], value: Value) {
    let Some((&field, parents)) = path.split_last() else {
        return;
    };

    let mut current = root;
    for &segment in parents {
        let entry = current
            .entry(segment.to_owned())
            .or_insert_with(|| Value::Object(Map::new()));
        let Some(obj) = entry.as_object_mut() else {
            return;
        };
        current = obj;
    }

    current.insert(field.to_owned(), value);
}

/// Build a JSON value containing CLI overrides.
fn build_cli_overrides(cli: &Cli) -> Value {
    let mut overrides = Map::new();

    if let Some(ref endpoint) = cli.api_endpoint {
        overrides.insert(
            "api_endpoint".to_owned(),
            Value::String(endpoint.clone()),
        );
    }

    if overrides.is_empty() {
        Value::Null
    } else {
        Value::Object(overrides)
    }
}
