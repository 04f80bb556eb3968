// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for the background compression worker.

use std::fmt::{Display, Formatter};

/// The worker task was spawned with its input.
///
/// # Log Level
/// `debug!`
pub struct WorkerSpawned {
    pub input_size: usize,
}

impl Display for WorkerSpawned {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Spawned compression worker with {} byte input",
            self.input_size
        )
    }
}

/// The worker posted its terminal message.
///
/// # Log Level
/// `debug!`
pub struct WorkerFinished {
    pub succeeded: bool,
}

impl Display for WorkerFinished {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        if self.succeeded {
            write!(f, "Compression worker finished with a result")
        } else {
            write!(f, "Compression worker finished with an error")
        }
    }
}

/// The channel closed before a terminal message arrived.
///
/// # Log Level
/// `error!`
pub struct WorkerVanished;

impl Display for WorkerVanished {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Compression worker exited without posting a result")
    }
}
