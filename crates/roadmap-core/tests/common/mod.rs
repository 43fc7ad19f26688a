//! Helpers shared by the roadmap-core integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use serde_json::json;
use sqlx::SqlitePool;

use roadmap_core::Roadmap;
use roadmap_core::feedback::FeedbackModel;
use roadmap_core::plan::PlanDocument;

/// Model that always answers with the same text and counts its calls.
#[derive(Debug, Default)]
pub struct CannedModel {
    pub reply: String,
    pub calls: AtomicUsize,
}

impl CannedModel {
    pub fn new(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: reply.to_owned(),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FeedbackModel for CannedModel {
    fn name(&self) -> &str {
        "canned"
    }

    async fn complete(&self, _prompt: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.reply.clone())
    }
}

/// Model whose every call fails.
#[derive(Debug, Default)]
pub struct BrokenModel;

#[async_trait]
impl FeedbackModel for BrokenModel {
    fn name(&self) -> &str {
        "broken"
    }

    async fn complete(&self, _prompt: &str) -> Result<String> {
        Err(anyhow!("connection refused"))
    }
}

pub fn roadmap(pool: &SqlitePool) -> Roadmap {
    Roadmap::new(pool.clone(), CannedModel::new("keep going"))
}

/// `p1` / "Intro" / "Learn X" with week 1 holding an empty day 1.
pub fn intro_plan(plan_id: &str) -> PlanDocument {
    serde_json::from_value(json!({
        "plan_id": plan_id,
        "title": "Intro",
        "goal": "Learn X",
        "weeks": [{"week": 1, "days": [{"day": 1, "tasks": []}]}],
        "resources": {}
    }))
    .expect("intro plan should deserialize")
}
