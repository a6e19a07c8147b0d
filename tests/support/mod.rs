#![allow(dead_code)]

use anyhow::{Context, Result, bail};
use serde_json::{Value, json};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

pub fn repo_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

pub fn bundled_dataset() -> PathBuf {
    repo_root().join("data/models.json")
}

/// Two llama3 variants used throughout the scenarios.
pub fn llama_document() -> Value {
    json!({
        "last_updated": "2025-01-15T08:30:00+00:00",
        "total_pages": 1,
        "total_models": 2,
        "models": [
            {
                "name": "llama3:8b",
                "description": "Meta Llama 3: the most capable openly available LLM to date",
                "capabilities": ["chat", "tools"],
                "sizes": ["8b"],
                "url": "https://ollama.com/library/llama3:8b"
            },
            {
                "name": "llama3:70b",
                "description": "Meta Llama 3: the most capable openly available LLM to date",
                "capabilities": ["chat"],
                "sizes": ["70b"],
                "url": "https://ollama.com/library/llama3:70b"
            }
        ]
    })
}

/// Temporary directory holding a `models.json` that tests can rewrite.
pub struct DatasetDir {
    pub dir: TempDir,
    pub path: PathBuf,
}

impl DatasetDir {
    pub fn new(document: &Value) -> Result<Self> {
        let dir = TempDir::new().context("failed to allocate dataset dir")?;
        let path = dir.path().join("models.json");
        let dataset = Self { dir, path };
        dataset.write(document)?;
        Ok(dataset)
    }

    pub fn write(&self, document: &Value) -> Result<()> {
        self.write_raw(&serde_json::to_string_pretty(document)?)
    }

    pub fn write_raw(&self, contents: &str) -> Result<()> {
        fs::write(&self.path, contents)
            .with_context(|| format!("writing {}", self.path.display()))
    }
}

pub fn run_command(mut cmd: Command) -> Result<Output> {
    let output = cmd
        .output()
        .with_context(|| format!("failed to run command: {:?}", cmd))?;
    if output.status.success() {
        Ok(output)
    } else {
        bail!(
            "command {:?} failed: status {:?}\nstdout: {}\nstderr: {}",
            cmd,
            output.status.code(),
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        )
    }
}

/// Spawn `bin` with `args`, feed `input` on stdin, and collect the output.
pub fn run_with_stdin(bin: &Path, args: &[&str], input: &str) -> Result<Output> {
    let mut child = Command::new(bin)
        .args(args)
        .env_remove("MODEL_CATALOG_PATH")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .with_context(|| format!("failed to spawn {}", bin.display()))?;
    child
        .stdin
        .take()
        .context("stdin not captured")?
        .write_all(input.as_bytes())?;
    Ok(child.wait_with_output()?)
}

pub fn stdout_json(output: &Output) -> Result<Value> {
    serde_json::from_slice(&output.stdout).with_context(|| {
        format!(
            "stdout is not JSON: {}",
            String::from_utf8_lossy(&output.stdout)
        )
    })
}
