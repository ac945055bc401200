//! Read-only view of the OS process table.

use std::path::{Path, PathBuf};

use sysinfo::{ProcessRefreshKind, ProcessStatus, ProcessesToUpdate, System, UpdateKind};

use crate::error::ProcessTableError;

/// One live process as seen at snapshot time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessEntry {
    pub pid: u32,

    /// Resolved executable, when readable.
    pub exe: Option<PathBuf>,

    /// Invocation arguments including argv[0]. Empty when the process's
    /// metadata could not be read.
    pub cmdline: Vec<String>,
}

/// Source of process snapshots.
///
/// Implementations must take a fresh snapshot on every call.
pub trait ProcessTable: Send + Sync {
    fn snapshot(&self) -> Result<Vec<ProcessEntry>, ProcessTableError>;
}

/// The real OS process table, read through `sysinfo`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemProcessTable;

impl ProcessTable for SystemProcessTable {
    fn snapshot(&self) -> Result<Vec<ProcessEntry>, ProcessTableError> {
        if !sysinfo::IS_SUPPORTED_SYSTEM {
            return Err(ProcessTableError::Unsupported);
        }

        let mut system = System::new();
        system.refresh_processes_specifics(
            ProcessesToUpdate::All,
            true,
            ProcessRefreshKind::nothing()
                .with_cmd(UpdateKind::Always)
                .with_exe(UpdateKind::Always),
        );

        let entries: Vec<ProcessEntry> = system
            .processes()
            .iter()
            .filter(|(_, process)| process.status() != ProcessStatus::Zombie)
            .map(|(pid, process)| ProcessEntry {
                pid: pid.as_u32(),
                exe: process.exe().map(Path::to_path_buf),
                cmdline: process
                    .cmd()
                    .iter()
                    .map(|arg| arg.to_string_lossy().into_owned())
                    .collect(),
            })
            .collect();

        // We are running ourselves, so an empty table means the read failed.
        if entries.is_empty() {
            return Err(ProcessTableError::Empty);
        }
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(target_os = "linux")]
    #[test]
    fn test_snapshot_contains_current_process() {
        let entries = SystemProcessTable.snapshot().unwrap();
        let me = std::process::id();
        let entry = entries.iter().find(|e| e.pid == me).unwrap();
        assert!(!entry.cmdline.is_empty());
    }
}
