/// Executable resolution for stdio servers, without going through a shell
use super::environment::EnvironmentMap;
use std::path::{Path, PathBuf};

/// Extensions tried on Windows when `PATHEXT` is not set
#[cfg(windows)]
const DEFAULT_PATHEXT: &str = ".COM;.EXE;.BAT;.CMD";

/// Program and arguments to spawn
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedExecutable {
    pub path: String,
    pub args: Vec<String>,
}

/// Resolve `command` against the `PATH` of `env`
///
/// Commands containing a path separator are used as given. Bare names are
/// looked up on `PATH`, trying each `PATHEXT` extension on Windows so that
/// `npx` finds `npx.cmd`. Anything that cannot be resolved, including an
/// empty command, is passed through untouched and left for the spawn to
/// reject. Arguments are never interpreted.
pub fn resolve_executable(command: &str, args: &[String], env: &EnvironmentMap) -> ResolvedExecutable {
    let path = if command.is_empty() || has_separator(command) {
        command.to_string()
    } else {
        search_path(command, env)
            .map(|p| p.to_string_lossy().into_owned())
            .unwrap_or_else(|| command.to_string())
    };

    tracing::debug!(command, resolved = %path, "resolved executable");

    ResolvedExecutable {
        path,
        args: args.to_vec(),
    }
}

fn has_separator(command: &str) -> bool {
    command.contains('/') || (cfg!(windows) && command.contains('\\'))
}

fn env_var<'a>(env: &'a EnvironmentMap, key: &str) -> Option<&'a str> {
    if cfg!(windows) {
        env.iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    } else {
        env.get(key).map(String::as_str)
    }
}

fn search_path(command: &str, env: &EnvironmentMap) -> Option<PathBuf> {
    let path_var = env_var(env, "PATH")?;
    let candidates = candidate_names(command, env);

    std::env::split_paths(path_var)
        .filter(|dir| !dir.as_os_str().is_empty())
        .flat_map(|dir| candidates.iter().map(move |name| dir.join(name)))
        .find(|candidate| is_executable(candidate))
}

#[cfg(windows)]
fn candidate_names(command: &str, env: &EnvironmentMap) -> Vec<String> {
    let pathext = env_var(env, "PATHEXT").unwrap_or(DEFAULT_PATHEXT);
    let has_extension = Path::new(command).extension().is_some();

    let mut names = Vec::new();
    if has_extension {
        names.push(command.to_string());
    }
    names.extend(
        pathext
            .split(';')
            .filter(|ext| !ext.is_empty())
            .map(|ext| format!("{}{}", command, ext.to_ascii_lowercase())),
    );
    names
}

#[cfg(not(windows))]
fn candidate_names(command: &str, _env: &EnvironmentMap) -> Vec<String> {
    vec![command.to_string()]
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    std::fs::metadata(path)
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env_with_path(path: &Path) -> EnvironmentMap {
        [("PATH".to_string(), path.to_string_lossy().into_owned())]
            .into_iter()
            .collect()
    }

    #[test]
    fn test_empty_command_passes_through() {
        let resolved = resolve_executable("", &[], &EnvironmentMap::new());
        assert_eq!(resolved.path, "");
        assert!(resolved.args.is_empty());
    }

    #[test]
    fn test_command_with_separator_is_used_as_given() {
        let args = vec!["--flag".to_string(), "a b; rm -rf /".to_string()];
        let resolved = resolve_executable("./bin/server", &args, &EnvironmentMap::new());
        assert_eq!(resolved.path, "./bin/server");
        assert_eq!(resolved.args, args);
    }

    #[test]
    fn test_unknown_command_passes_through() {
        let dir = tempfile::tempdir().unwrap();
        let resolved = resolve_executable("definitely-not-installed", &[], &env_with_path(dir.path()));
        assert_eq!(resolved.path, "definitely-not-installed");
    }

    #[cfg(unix)]
    #[test]
    fn test_bare_command_resolves_on_path() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let server = dir.path().join("mcp-server");
        std::fs::write(&server, "#!/bin/sh\n").unwrap();
        std::fs::set_permissions(&server, std::fs::Permissions::from_mode(0o755)).unwrap();

        let resolved = resolve_executable("mcp-server", &["--stdio".to_string()], &env_with_path(dir.path()));

        assert_eq!(resolved.path, server.to_string_lossy());
        assert_eq!(resolved.args, vec!["--stdio".to_string()]);
    }

    #[cfg(unix)]
    #[test]
    fn test_non_executable_file_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("notes"), "plain file").unwrap();

        let resolved = resolve_executable("notes", &[], &env_with_path(dir.path()));
        assert_eq!(resolved.path, "notes");
    }

    #[cfg(windows)]
    #[test]
    fn test_shim_extension_is_found() {
        let dir = tempfile::tempdir().unwrap();
        let shim = dir.path().join("npx.cmd");
        std::fs::write(&shim, "@echo off\r\n").unwrap();

        let resolved = resolve_executable("npx", &[], &env_with_path(dir.path()));
        assert_eq!(resolved.path, shim.to_string_lossy());
    }
}
