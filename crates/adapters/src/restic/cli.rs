// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Restic adapter shelling out to the restic binary

use std::path::Path;
use std::process::Output;

use async_trait::async_trait;
use rsw_core::restic::{ResticCommand, PROGRAM};
use tokio::process::Command;
use tracing::debug;

use super::{ResticAdapter, ResticError};

/// Restic adapter invoking the `restic` binary over an SSH transport.
#[derive(Clone)]
pub struct ResticCli {
    command: ResticCommand,
}

impl ResticCli {
    pub fn new(command: ResticCommand) -> Self {
        Self { command }
    }

    async fn run(&self, repo: &str, args: &[&str]) -> Result<Output, ResticError> {
        let argv = self.command.build(repo, args);
        debug!("running: {} {}", PROGRAM, argv.join(" "));
        // A cancelled execution must not leave a restic process behind.
        let output = Command::new(PROGRAM)
            .args(&argv)
            .kill_on_drop(true)
            .output()
            .await?;
        Ok(output)
    }
}

fn check(output: Output) -> Result<(), ResticError> {
    if output.status.success() {
        return Ok(());
    }
    Err(ResticError::CommandFailed {
        code: output.status.code().unwrap_or(-1),
        stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
    })
}

#[async_trait]
impl ResticAdapter for ResticCli {
    async fn repo_exists(&self, repo: &str) -> Result<bool, ResticError> {
        let output = self.run(repo, &["cat", "config"]).await?;
        Ok(output.status.success())
    }

    async fn init_repo(&self, repo: &str) -> Result<(), ResticError> {
        check(self.run(repo, &["init"]).await?)
    }

    async fn backup(&self, repo: &str, path: &Path) -> Result<(), ResticError> {
        let path = path.display().to_string();
        check(self.run(repo, &["backup", &path]).await?)
    }

    async fn forget(&self, repo: &str, args: &[String]) -> Result<(), ResticError> {
        let mut argv: Vec<&str> = vec!["forget"];
        argv.extend(args.iter().map(String::as_str));
        check(self.run(repo, &argv).await?)
    }
}
