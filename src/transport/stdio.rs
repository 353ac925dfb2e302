/// Stdio channel builder - spawns an MCP server as a subprocess
use super::channel::Channel;
use super::environment::{EnvironmentSnapshot, assemble_environment, insert_var};
use super::executable::resolve_executable;
use crate::error::{Error, Result};
use rmcp::transport::TokioChildProcess;
use std::collections::HashMap;
use std::process::Stdio;
use tokio::process::Command;

/// Spawn `command` and wrap it in a stdio channel
///
/// The child gets exactly the assembled environment: the defaults and every
/// string-valued entry of `snapshot`, then `overrides`. stdin/stdout carry the
/// protocol; stderr is piped so diagnostics never mix with the parent's own
/// output. Must be called from within a tokio runtime.
pub fn build_stdio_channel(
    command: &str,
    args: &[String],
    overrides: Option<&HashMap<String, String>>,
    snapshot: &EnvironmentSnapshot,
) -> Result<Channel> {
    let mut env = assemble_environment(snapshot);
    if let Some(overrides) = overrides {
        for (key, value) in overrides {
            insert_var(&mut env, key, value);
        }
    }

    let resolved = resolve_executable(command, args, &env);

    let mut cmd = Command::new(&resolved.path);
    cmd.args(&resolved.args).env_clear().envs(&env);

    let (transport, stderr) = TokioChildProcess::builder(cmd)
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|source| Error::Spawn {
            command: resolved.path.clone(),
            source,
        })?;

    tracing::info!(
        command = %resolved.path,
        args = resolved.args.len(),
        env_vars = env.len(),
        "spawned stdio MCP server"
    );

    Ok(Channel::Stdio { transport, stderr })
}
