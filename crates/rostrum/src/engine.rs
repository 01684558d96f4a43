// SPDX-FileCopyrightText: 2026 Rostrum Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scripted stand-in for the external debate workflow engine.
//!
//! Publishes the same event kinds the real workflow produces
//! (`moderator_intro_done`, `agent_done` per turn,
//! `moderator_conclusion_done`) and records terminal status, so the
//! whole coordination path can be exercised end to end without the
//! upstream multi-agent system.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::info;

use rostrum_core::{
    DebateEngine, DebateSpec, DebateStatus, EventLog, MetadataStore, RostrumError,
};

const ROUNDS: usize = 2;
const TURN_DELAY: Duration = Duration::from_millis(400);

/// Canned-content engine for local runs and demos.
pub struct ScriptedEngine {
    events: Arc<dyn EventLog>,
    storage: Arc<dyn MetadataStore>,
}

impl ScriptedEngine {
    pub fn new(events: Arc<dyn EventLog>, storage: Arc<dyn MetadataStore>) -> Self {
        Self { events, storage }
    }

    async fn publish(
        &self,
        debate_id: &str,
        kind: &str,
        payload: serde_json::Value,
    ) -> Result<(), RostrumError> {
        self.events
            .publish(debate_id, kind, &payload.to_string())
            .await?;
        Ok(())
    }
}

#[async_trait]
impl DebateEngine for ScriptedEngine {
    async fn run(&self, spec: DebateSpec) -> Result<(), RostrumError> {
        info!(debate_id = %spec.debate_id, topic = %spec.topic, "scripted engine starting");

        self.publish(
            &spec.debate_id,
            "moderator_intro_done",
            serde_json::json!({
                "agent": "moderator_agent",
                "output": format!(
                    "Welcome to tonight's debate on \"{}\", between {} and {}.",
                    spec.topic, spec.debater_1, spec.debater_2
                ),
            }),
        )
        .await?;

        for round in 1..=ROUNDS {
            for debater in [&spec.debater_1, &spec.debater_2] {
                tokio::time::sleep(TURN_DELAY).await;
                self.publish(
                    &spec.debate_id,
                    "agent_done",
                    serde_json::json!({
                        "agent": debater,
                        "output": serde_json::json!({
                            "argument": {
                                "text": format!(
                                    "{debater}'s round {round} position on {}.",
                                    spec.topic
                                ),
                                "type": "attack",
                                "confidence": 0.7,
                            }
                        })
                        .to_string(),
                    }),
                )
                .await?;
            }
        }

        tokio::time::sleep(TURN_DELAY).await;
        self.publish(
            &spec.debate_id,
            "moderator_conclusion_done",
            serde_json::json!({
                "agent": "moderator_agent",
                "output": format!("That concludes the debate on \"{}\".", spec.topic),
            }),
        )
        .await?;

        self.storage
            .update_debate_status(&spec.debate_id, DebateStatus::Completed, None)
            .await?;

        info!(debate_id = %spec.debate_id, "scripted engine finished");
        Ok(())
    }
}
