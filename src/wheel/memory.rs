//! In-memory device tree for testing.
//!
//! Serves a fixed list of nodes and records every attribute write attempt
//! instead of touching sysfs.

use crate::wheel::tree::{DeviceTree, InterfaceNode, TreeError};
use log::info;
use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
struct MemoryState {
    nodes: Vec<InterfaceNode>,
    failing: HashSet<PathBuf>,
    enumeration_error: Option<TreeError>,
    writes: Vec<(PathBuf, String)>,
    scans: usize,
}

/// Device tree backed by a node list. Clones share state.
#[derive(Clone, Debug, Default)]
pub struct MemoryTree {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_node(self, node: InterfaceNode) -> Self {
        self.lock().nodes.push(node);
        self
    }

    /// Make writes to `path` fail (they are still recorded).
    pub fn fail_writes_to<P: Into<PathBuf>>(self, path: P) -> Self {
        self.lock().failing.insert(path.into());
        self
    }

    /// Make every enumeration fail with `error`.
    pub fn fail_enumeration(self, error: TreeError) -> Self {
        self.lock().enumeration_error = Some(error);
        self
    }

    /// Every write attempt so far, in order.
    pub fn writes(&self) -> Vec<(PathBuf, String)> {
        self.lock().writes.clone()
    }

    /// Number of enumerations so far.
    pub fn scans(&self) -> usize {
        self.lock().scans
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl DeviceTree for MemoryTree {
    fn interface_nodes(&self) -> Result<Vec<InterfaceNode>, TreeError> {
        let mut state = self.lock();
        state.scans += 1;
        match &state.enumeration_error {
            Some(error) => Err(error.clone()),
            None => Ok(state.nodes.clone()),
        }
    }

    fn write_attribute(&self, path: &Path, value: &str) -> io::Result<()> {
        info!("[MEMORY TREE] write {} <- {}", path.display(), value);
        let mut state = self.lock();
        state.writes.push((path.to_path_buf(), value.to_string()));
        if state.failing.contains(path) {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "write refused"));
        }
        Ok(())
    }
}
