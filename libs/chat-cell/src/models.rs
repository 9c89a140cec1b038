use serde::{Deserialize, Serialize};

use doctor_cell::AvailabilityRow;
use shared_models::DepartmentRef;
use triage_cell::Intent;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
}

/// Which tier produced a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReplySource {
    #[serde(rename = "rule-based")]
    RuleBased,
    #[serde(rename = "generation")]
    Generation,
    #[serde(rename = "retrieval+generation")]
    RetrievalGeneration,
}

impl ReplySource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReplySource::RuleBased => "rule-based",
            ReplySource::Generation => "generation",
            ReplySource::RetrievalGeneration => "retrieval+generation",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    pub reply: String,
    pub intent: Intent,
    pub source: ReplySource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<DepartmentRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub availability: Option<Vec<AvailabilityRow>>,
}

impl ChatReply {
    pub fn rule_based(reply: impl Into<String>, intent: Intent) -> Self {
        Self {
            reply: reply.into(),
            intent,
            source: ReplySource::RuleBased,
            department: None,
            availability: None,
        }
    }
}

/// Response branch, used to label fallback events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Branch {
    Urgent,
    RouteNoDept,
    RouteWithDept,
    Lab,
    General,
}

impl Branch {
    pub fn as_str(&self) -> &'static str {
        match self {
            Branch::Urgent => "urgent",
            Branch::RouteNoDept => "route_no_dept",
            Branch::RouteWithDept => "route_with_dept",
            Branch::Lab => "lab",
            Branch::General => "general",
        }
    }
}

/// Knowledge partitions available to retrieval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KnowledgeCollection {
    Lab,
    Daily,
}

impl KnowledgeCollection {
    pub fn as_str(&self) -> &'static str {
        match self {
            KnowledgeCollection::Lab => "lab",
            KnowledgeCollection::Daily => "daily",
        }
    }
}

/// Task label passed to the generation service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationTask {
    DepartmentRouting,
    DepartmentRoutingMissing,
    LabHelp,
    GeneralHealthInfo,
}

/// Metadata handed to the generation service alongside the prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationContext {
    pub task: GenerationTask,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<DepartmentRef>,
}

impl GenerationContext {
    pub fn task(task: GenerationTask) -> Self {
        Self { task, department: None }
    }

    pub fn for_department(department: DepartmentRef) -> Self {
        Self {
            task: GenerationTask::DepartmentRouting,
            department: Some(department),
        }
    }
}
