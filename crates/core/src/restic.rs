// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! restic command-line construction for the sftp transport

/// Program name of the backup tool.
pub const PROGRAM: &str = "restic";

/// Builds restic argument vectors for repositories reached over sftp.
///
/// Carries the connection settings every invocation shares: the ssh host,
/// an optional port, extra ssh options, and operator-supplied pass-through
/// restic arguments.
#[derive(Debug, Clone)]
pub struct ResticCommand {
    host: String,
    port: Option<u16>,
    ssh_options: Vec<String>,
    extra_args: Vec<String>,
}

impl ResticCommand {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: None,
            ssh_options: Vec::new(),
            extra_args: Vec::new(),
        }
    }

    pub fn with_port(mut self, port: Option<u16>) -> Self {
        self.port = port;
        self
    }

    pub fn with_ssh_options(mut self, options: Vec<String>) -> Self {
        self.ssh_options = options;
        self
    }

    pub fn with_extra_args(mut self, args: Vec<String>) -> Self {
        self.extra_args = args;
        self
    }

    /// Full address of a repository on the sftp host.
    pub fn full_repo(&self, repo: &str) -> String {
        format!("sftp:{}:{}", self.host, repo)
    }

    /// The ssh command restic uses for the sftp transport.
    pub fn ssh_command(&self) -> Vec<String> {
        let mut cmd = vec!["ssh".to_string(), self.host.clone()];
        cmd.extend(self.ssh_options.iter().cloned());
        if let Some(port) = self.port {
            cmd.push("-p".to_string());
            cmd.push(port.to_string());
        }
        cmd.push("-s".to_string());
        cmd.push("sftp".to_string());
        cmd
    }

    /// Argument vector for one invocation: transport options, the repository,
    /// the pass-through arguments, then the subcommand.
    pub fn build(&self, repo: &str, subcommand: &[&str]) -> Vec<String> {
        let mut args = vec![
            "-o".to_string(),
            format!("sftp.command={}", self.ssh_command().join(" ")),
            "-r".to_string(),
            self.full_repo(repo),
        ];
        args.extend(self.extra_args.iter().cloned());
        args.extend(subcommand.iter().map(|s| s.to_string()));
        args
    }
}

#[cfg(test)]
#[path = "restic_tests.rs"]
mod tests;
