//! Server configuration.

use std::io;
use std::path::{Path, PathBuf};

use clap::Parser;
use gazeaid_core::{CoreError, Role, TaskDescriptor, TaskRegistry};
use gazeaid_launcher::{DetectionFailurePolicy, SupervisorConfig};
use thiserror::Error;

/// Allow-listed script names.
pub const SCRIPT_HEADAWAY: &str = "headaway.py";
pub const SCRIPT_EYETRACKING: &str = "eyetracking.py";
pub const SCRIPT_ARDUINO: &str = "arduino_control.py";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Bind address must not be empty")]
    EmptyBindAddr,

    #[error("Interpreter must not be empty")]
    EmptyInterpreter,

    #[error("Invalid CORS origin: {0}")]
    InvalidOrigin(String),

    #[error("Invalid task list: {0}")]
    Tasks(#[from] CoreError),
}

/// GazeAid server - patient/doctor portal and game launcher
#[derive(Debug, Parser)]
#[command(name = "gazeaid-server")]
#[command(about = "Web backend that launches GazeAid training games", long_about = None)]
pub struct Cli {
    /// Address to listen on
    #[arg(short, long, env = "GAZEAID_BIND", default_value = "0.0.0.0:5000")]
    pub bind: String,

    /// Directory holding the game scripts, templates/ and static/
    #[arg(long, env = "GAZEAID_BASE_DIR", default_value = ".")]
    pub base_dir: PathBuf,

    /// Interpreter used to run the game scripts
    #[arg(long, env = "GAZEAID_INTERPRETER", default_value = "python3")]
    pub interpreter: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "GAZEAID_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Refuse launches while the process table cannot be read
    #[arg(long)]
    pub fail_closed: bool,
}

/// A user created at startup.
#[derive(Debug, Clone)]
pub struct SeedUser {
    pub email: String,
    pub password: String,
    pub name: String,
    pub role: Role,
}

impl SeedUser {
    fn new(email: &str, password: &str, name: &str, role: Role) -> Self {
        Self {
            email: email.to_string(),
            password: password.to_string(),
            name: name.to_string(),
            role,
        }
    }
}

/// Server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP bind address.
    pub bind_addr: String,

    /// Root directory for scripts, templates and static files.
    pub base_dir: PathBuf,

    /// Interpreter for game scripts.
    pub interpreter: PathBuf,

    /// Origins allowed to send credentialed requests.
    pub cors_origins: Vec<String>,

    /// How long a login lasts (hours).
    pub session_ttl_hours: i64,

    /// Answer given when the process table cannot be read.
    pub detection_policy: DetectionFailurePolicy,

    /// Accounts available at startup.
    pub seed_users: Vec<SeedUser>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:5000".to_string(),
            base_dir: PathBuf::from("."),
            interpreter: PathBuf::from("python3"),
            cors_origins: vec![
                "http://localhost:5000".to_string(),
                "http://127.0.0.1:5000".to_string(),
            ],
            session_ttl_hours: 24 * 31,
            detection_policy: DetectionFailurePolicy::AssumeNotRunning,
            seed_users: vec![
                SeedUser::new("doctor@example.com", "doctor123", "Dr. Jane Smith", Role::Doctor),
                SeedUser::new("patient@example.com", "patient123", "John Doe", Role::Patient),
            ],
        }
    }
}

impl Config {
    /// Build a configuration from command line arguments.
    pub fn from_cli(cli: &Cli) -> Self {
        let detection_policy = if cli.fail_closed {
            DetectionFailurePolicy::AssumeRunning
        } else {
            DetectionFailurePolicy::AssumeNotRunning
        };

        Self {
            bind_addr: cli.bind.clone(),
            base_dir: absolute(&cli.base_dir),
            interpreter: cli.interpreter.clone(),
            detection_policy,
            ..Self::default()
        }
    }

    /// Reject settings the server cannot start with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bind_addr.trim().is_empty() {
            return Err(ConfigError::EmptyBindAddr);
        }
        if self.interpreter.as_os_str().is_empty() {
            return Err(ConfigError::EmptyInterpreter);
        }
        self.task_registry()?;
        Ok(())
    }

    pub fn templates_dir(&self) -> PathBuf {
        self.base_dir.join("templates")
    }

    pub fn static_dir(&self) -> PathBuf {
        self.base_dir.join("static")
    }

    /// The launch allow-list. Scripts live directly in the base directory.
    pub fn task_registry(&self) -> Result<TaskRegistry, ConfigError> {
        let base = self.base_dir.as_path();
        let registry = TaskRegistry::new([
            TaskDescriptor::in_dir(SCRIPT_HEADAWAY, base),
            // Launched from the web UI, so it must not open its own window.
            TaskDescriptor::in_dir(SCRIPT_EYETRACKING, base).with_arg("--headless"),
            TaskDescriptor::in_dir(SCRIPT_ARDUINO, base),
        ])?;
        Ok(registry)
    }

    pub fn supervisor_config(&self) -> Result<SupervisorConfig, ConfigError> {
        Ok(
            SupervisorConfig::new(&self.interpreter, &self.base_dir, self.task_registry()?)
                .with_detection_policy(self.detection_policy),
        )
    }

    /// Create the static and template directories if they are missing.
    pub fn ensure_directories(&self) -> io::Result<()> {
        let static_dir = self.static_dir();
        for dir in [
            self.templates_dir(),
            static_dir.join("css"),
            static_dir.join("js"),
            static_dir.join("images"),
        ] {
            std::fs::create_dir_all(dir)?;
        }
        Ok(())
    }
}

/// Resolve `path` against the current directory so the script paths seen in
/// the process table are stable.
fn absolute(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}
