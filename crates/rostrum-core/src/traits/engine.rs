// SPDX-FileCopyrightText: 2026 Rostrum Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Workflow engine boundary.

use async_trait::async_trait;

use crate::error::RostrumError;
use crate::types::DebateSpec;

/// The external generation workflow, invoked polymorphically: same call
/// shape, different internal agent behavior per persona.
///
/// Given a job spec the engine runs to completion, publishing zero or
/// more events to the job's log and finally reporting terminal status
/// through the metadata store. The coordination layer treats its
/// internals as a black box and never branches on its state.
#[async_trait]
pub trait DebateEngine: Send + Sync + 'static {
    /// Runs one generation job to completion.
    async fn run(&self, spec: DebateSpec) -> Result<(), RostrumError>;
}
