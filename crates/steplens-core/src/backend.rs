//! Sources of decompilation results
//!
//! The transformation engine is an external program; the viewer only needs
//! an initial source text and, for a given source, the resulting steps.

use crate::model::StepSet;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{ChildStdin, Command, Stdio};
use std::thread;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to run `{program}`: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },
    #[error("`{program}` exited with {status}: {stderr}")]
    Failed {
        program: String,
        status: String,
        stderr: String,
    },
    #[error("invalid step data: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("decompiler panicked: {0}")]
    Panicked(String),
}

/// Source code shown when no initial file is configured
pub const SAMPLE_SOURCE: &str = "if {$a} {\n\tputs a\n} else {\n\tputs b\n}\n";

/// Host-supplied decompilation capabilities
pub trait Decompiler: Send {
    /// Source text to pre-populate the editor with
    fn initial_code(&self) -> Result<String, BackendError>;

    /// Run the pipeline over `source` and return every step
    fn decompile_steps(&self, source: &str) -> Result<StepSet, BackendError>;
}

/// Feed `source` to the child and close its stdin. A child that exits
/// without reading all of it is not an error here; its exit status decides.
fn write_source(stdin: Option<ChildStdin>, source: &str) -> io::Result<()> {
    let Some(mut stdin) = stdin else {
        return Ok(());
    };
    match stdin.write_all(source.as_bytes()) {
        Err(err) if err.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        other => other,
    }
}

fn read_initial(path: Option<&Path>) -> Result<String, BackendError> {
    match path {
        Some(path) => Ok(std::fs::read_to_string(path)?),
        None => Ok(SAMPLE_SOURCE.to_string()),
    }
}

/// Runs an external program: source on stdin, JSON step set on stdout
#[derive(Debug, Clone)]
pub struct CommandDecompiler {
    program: String,
    args: Vec<String>,
    initial_path: Option<PathBuf>,
}

impl CommandDecompiler {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            initial_path: None,
        }
    }

    /// Build from a `[program, args...]` list
    pub fn from_argv(argv: &[String]) -> Option<Self> {
        let (program, args) = argv.split_first()?;
        Some(Self::new(program.clone(), args.to_vec()))
    }

    pub fn with_initial_code(mut self, path: Option<PathBuf>) -> Self {
        self.initial_path = path;
        self
    }
}

impl Decompiler for CommandDecompiler {
    fn initial_code(&self) -> Result<String, BackendError> {
        read_initial(self.initial_path.as_deref())
    }

    fn decompile_steps(&self, source: &str) -> Result<StepSet, BackendError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|err| BackendError::Spawn {
                program: self.program.clone(),
                source: err,
            })?;

        // stdin is written while stdout/stderr drain, or a chatty child and a
        // large source block each other on full pipes
        let stdin = child.stdin.take();
        let (output, written) = thread::scope(|scope| {
            let writer = scope.spawn(move || write_source(stdin, source));
            let output = child.wait_with_output();
            let written = writer
                .join()
                .unwrap_or_else(|_| Err(io::Error::other("stdin writer panicked")));
            (output, written)
        });
        let output = output?;

        if !output.status.success() {
            return Err(BackendError::Failed {
                program: self.program.clone(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        written?;
        let set: StepSet = serde_json::from_slice(&output.stdout)?;
        tracing::info!(
            program = %self.program,
            steps = set.step_count(),
            changes = set.changes.len(),
            "decompiled"
        );
        Ok(set)
    }
}

/// Serves a precomputed step set from a JSON file, whatever the source
#[derive(Debug, Clone)]
pub struct FixtureDecompiler {
    path: PathBuf,
    initial_path: Option<PathBuf>,
}

impl FixtureDecompiler {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            initial_path: None,
        }
    }

    pub fn with_initial_code(mut self, path: Option<PathBuf>) -> Self {
        self.initial_path = path;
        self
    }
}

impl Decompiler for FixtureDecompiler {
    fn initial_code(&self) -> Result<String, BackendError> {
        read_initial(self.initial_path.as_deref())
    }

    fn decompile_steps(&self, _source: &str) -> Result<StepSet, BackendError> {
        let json = std::fs::read_to_string(&self.path)?;
        Ok(StepSet::from_json(&json)?)
    }
}
