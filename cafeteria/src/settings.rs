//! Resolve a single setting from layered sources.
//!
//! Precedence, highest first:
//!
//! 1. a value passed explicitly (for example from the command line);
//! 2. an environment variable;
//! 3. an entry from a configuration file;
//! 4. the default.

use std::env;

/// The layer that supplied a resolved setting.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SettingSource {
    /// The explicitly passed argument.
    Argument,
    /// The named environment variable.
    Environment,
    /// The configuration entry.
    Config,
    /// The fallback default.
    Default,
}

/// Resolve a setting, returning the winning value.
///
/// Environment values are taken as text; variables that are unset or not
/// valid Unicode are skipped.
///
/// # Examples
///
/// ```
/// use cafeteria::resolve_setting;
///
/// let port = resolve_setting(
///     String::from("80"),
///     None,
///     Some("CAFETERIA_DOC_UNSET_PORT"),
///     Some(String::from("8080")),
/// );
/// assert_eq!(port, "8080");
/// ```
#[must_use]
pub fn resolve_setting<T>(
    default: T,
    arg_value: Option<T>,
    env_var: Option<&str>,
    config_value: Option<T>,
) -> T
where
    T: From<String>,
{
    resolve_setting_with_source(default, arg_value, env_var, config_value).0
}

/// Resolve a setting, also reporting which layer supplied it.
#[must_use]
pub fn resolve_setting_with_source<T>(
    default: T,
    arg_value: Option<T>,
    env_var: Option<&str>,
    config_value: Option<T>,
) -> (T, SettingSource)
where
    T: From<String>,
{
    let (value, source) = if let Some(value) = arg_value {
        (value, SettingSource::Argument)
    } else if let Some(value) = env_var.and_then(read_env) {
        (T::from(value), SettingSource::Environment)
    } else if let Some(value) = config_value {
        (value, SettingSource::Config)
    } else {
        (default, SettingSource::Default)
    };
    tracing::debug!(?env_var, ?source, "resolved setting");
    (value, source)
}

fn read_env(name: &str) -> Option<String> {
    env::var_os(name).and_then(|raw| raw.into_string().ok())
}
