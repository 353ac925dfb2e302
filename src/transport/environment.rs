/// Environment assembly for spawned MCP servers
use std::collections::HashMap;
use std::ffi::OsString;

/// Environment handed to a spawned subprocess
pub type EnvironmentMap = HashMap<String, String>;

/// Variables inherited by default, mirroring what a login shell provides.
#[cfg(windows)]
pub const DEFAULT_INHERITED_ENV_VARS: &[&str] = &[
    "APPDATA",
    "HOMEDRIVE",
    "HOMEPATH",
    "LOCALAPPDATA",
    "PATH",
    "PROCESSOR_ARCHITECTURE",
    "SYSTEMDRIVE",
    "SYSTEMROOT",
    "TEMP",
    "USERNAME",
    "USERPROFILE",
    "PROGRAMFILES",
];

/// Variables inherited by default, mirroring what a login shell provides.
#[cfg(not(windows))]
pub const DEFAULT_INHERITED_ENV_VARS: &[&str] = &["HOME", "LOGNAME", "PATH", "SHELL", "TERM", "USER"];

/// Point-in-time copy of a process environment
///
/// Entries are kept as raw OS strings; only entries that are valid Unicode
/// make it into an [`EnvironmentMap`].
#[derive(Debug, Clone, Default)]
pub struct EnvironmentSnapshot {
    vars: Vec<(OsString, OsString)>,
}

impl EnvironmentSnapshot {
    /// Capture the environment of the current process
    pub fn capture() -> Self {
        Self {
            vars: std::env::vars_os().collect(),
        }
    }

    /// Build a snapshot from explicit entries
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<OsString>,
        V: Into<OsString>,
    {
        Self {
            vars: pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }

    /// Entries holding a genuine string value
    pub fn string_vars(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars
            .iter()
            .filter_map(|(k, v)| Some((k.to_str()?, v.to_str()?)))
    }

    /// Look up a variable holding a genuine string value
    pub fn get(&self, key: &str) -> Option<&str> {
        self.string_vars()
            .filter(|(k, _)| key_matches(k, key))
            .map(|(_, v)| v)
            .last()
    }
}

#[cfg(windows)]
fn key_matches(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b)
}

#[cfg(not(windows))]
fn key_matches(a: &str, b: &str) -> bool {
    a == b
}

/// The allow-listed subset of `snapshot` a subprocess always receives
pub fn default_environment(snapshot: &EnvironmentSnapshot) -> EnvironmentMap {
    DEFAULT_INHERITED_ENV_VARS
        .iter()
        .filter_map(|key| {
            let value = snapshot.get(key)?;
            // Exported shell functions
            if value.starts_with("()") {
                return None;
            }
            Some((key.to_string(), value.to_string()))
        })
        .collect()
}

/// Set `key` in `env`, replacing any entry for the same variable
///
/// Variable names are case-insensitive on Windows, so `Path` replaces `PATH`
/// there instead of sitting next to it.
pub fn insert_var(env: &mut EnvironmentMap, key: &str, value: &str) {
    insert_with_case(env, key, value, cfg!(windows));
}

fn insert_with_case(env: &mut EnvironmentMap, key: &str, value: &str, ignore_case: bool) {
    if ignore_case {
        env.retain(|existing, _| !existing.eq_ignore_ascii_case(key));
    }
    env.insert(key.to_string(), value.to_string());
}

/// Merge the default environment with every string-valued entry of `snapshot`
///
/// Snapshot values win over defaults. Entries whose key or value is not valid
/// Unicode are left out rather than passed on as empty strings.
pub fn assemble_environment(snapshot: &EnvironmentSnapshot) -> EnvironmentMap {
    let mut env = default_environment(snapshot);
    for (key, value) in snapshot.string_vars() {
        insert_var(&mut env, key, value);
    }
    env
}
