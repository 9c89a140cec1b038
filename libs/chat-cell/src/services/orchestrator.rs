use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use serde_json::json;
use tracing::{info, warn};

use doctor_cell::{AvailabilityRow, AvailabilityService};
use shared_config::AppConfig;
use shared_models::{DepartmentRef, EventKind, EventLog, TracingEventLog};
use triage_cell::{classify, looks_like_lab, ClassificationResult, Intent};

use crate::error::Fault;
use crate::models::{
    Branch, ChatReply, GenerationContext, GenerationTask, KnowledgeCollection, ReplySource,
};
use crate::services::pipeline::FallbackChain;
use crate::services::{templates, Retriever, TextGenerator};

/// Picks a response strategy per intent and runs its fallback chain.
pub struct ChatOrchestrator {
    generator: Arc<dyn TextGenerator>,
    retriever: Arc<dyn Retriever>,
    availability: Arc<AvailabilityService>,
    events: Arc<dyn EventLog>,
    tier_deadline: Duration,
    top_k: usize,
}

impl ChatOrchestrator {
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        retriever: Arc<dyn Retriever>,
        availability: Arc<AvailabilityService>,
        config: &AppConfig,
    ) -> Self {
        // A translated reply costs two generation calls.
        let calls = if config.translate_replies { 2 } else { 1 };
        Self {
            generator,
            retriever,
            availability,
            events: Arc::new(TracingEventLog),
            tier_deadline: config.generation_timeout * calls,
            top_k: config.retrieval_top_k,
        }
    }

    pub fn with_event_log(mut self, events: Arc<dyn EventLog>) -> Self {
        self.events = events;
        self
    }

    pub fn with_tier_deadline(mut self, deadline: Duration) -> Self {
        self.tier_deadline = deadline;
        self
    }

    /// Classifies `message`, answers it and logs the exchange.
    pub async fn chat(&self, message: &str) -> ChatReply {
        let classification = classify(message);
        info!("Chat message classified as {}", classification.intent);

        let reply = self.respond(message, &classification).await;

        self.events.record(
            EventKind::Chat,
            json!({
                "req": message,
                "reply": reply.reply,
                "intent": reply.intent,
                "source": reply.source,
                "dept_code": reply.department.as_ref().map(|d| d.code.clone()),
            }),
        );

        reply
    }

    /// Answers an already classified message. Never fails: every branch ends
    /// in a fixed rule-based text.
    pub async fn respond(&self, message: &str, classification: &ClassificationResult) -> ChatReply {
        match classification.intent {
            // No external calls on the urgent path.
            Intent::Urgent => ChatReply::rule_based(templates::URGENT_REPLY, Intent::Urgent),
            Intent::Route => match &classification.department {
                Some(department) => self.route_with_department(message, department.clone()).await,
                None => self.route_without_department(message).await,
            },
            Intent::Lab => self.lab(message).await,
            Intent::General => self.general(message).await,
        }
    }

    async fn route_with_department(&self, message: &str, department: DepartmentRef) -> ChatReply {
        let availability = self.availability_for(&department.code);
        let context = GenerationContext::for_department(department.clone());

        let outcome = FallbackChain::new(Branch::RouteWithDept, self.tier_deadline, self.events.as_ref())
            .then(ReplySource::RetrievalGeneration, || {
                self.retrieval_generation(KnowledgeCollection::Daily, message, &context)
                    .boxed()
            })
            .then(ReplySource::Generation, || self.generation(message, &context).boxed())
            .run(templates::route_reply(&department.name))
            .await;

        ChatReply {
            reply: outcome.text,
            intent: Intent::Route,
            source: outcome.source,
            department: Some(department),
            availability,
        }
    }

    async fn route_without_department(&self, message: &str) -> ChatReply {
        let context = GenerationContext::task(GenerationTask::DepartmentRoutingMissing);

        let outcome = FallbackChain::new(Branch::RouteNoDept, self.tier_deadline, self.events.as_ref())
            .then(ReplySource::Generation, || self.generation(message, &context).boxed())
            .run(templates::ROUTE_MISSING_REPLY)
            .await;

        ChatReply {
            reply: outcome.text,
            intent: Intent::Route,
            source: outcome.source,
            department: None,
            availability: None,
        }
    }

    async fn lab(&self, message: &str) -> ChatReply {
        self.knowledge_reply(Branch::Lab, message, true, templates::LAB_REPLY)
            .await
    }

    async fn general(&self, message: &str) -> ChatReply {
        // Raw-text lab signal overrides a general classification.
        let lab_override = looks_like_lab(message);
        self.knowledge_reply(Branch::General, message, lab_override, templates::GENERAL_REPLY)
            .await
    }

    async fn knowledge_reply(&self, branch: Branch, message: &str, lab: bool, rule_based: &str) -> ChatReply {
        let (collection, task, intent) = if lab {
            (KnowledgeCollection::Lab, GenerationTask::LabHelp, Intent::Lab)
        } else {
            (KnowledgeCollection::Daily, GenerationTask::GeneralHealthInfo, Intent::General)
        };
        let context = GenerationContext::task(task);

        let outcome = FallbackChain::new(branch, self.tier_deadline, self.events.as_ref())
            .then(ReplySource::RetrievalGeneration, || {
                self.retrieval_generation(collection, message, &context).boxed()
            })
            .then(ReplySource::Generation, || self.generation(message, &context).boxed())
            .run(rule_based)
            .await;

        ChatReply {
            reply: outcome.text,
            intent,
            source: outcome.source,
            department: None,
            availability: None,
        }
    }

    async fn retrieval_generation(
        &self,
        collection: KnowledgeCollection,
        message: &str,
        context: &GenerationContext,
    ) -> Result<String, Fault> {
        let query = match &context.department {
            Some(department) => format!("{} {}", department.name, message),
            None => message.to_string(),
        };

        let snippets = self
            .retriever
            .retrieve(collection.as_str(), &query, self.top_k)
            .await?;
        if snippets.is_empty() {
            return Err(Fault::NoContext);
        }

        let prompt = templates::user_prompt(&snippets, message);
        Ok(self.generator.generate(&prompt, context).await?)
    }

    async fn generation(&self, message: &str, context: &GenerationContext) -> Result<String, Fault> {
        let prompt = templates::user_prompt(&[], message);
        Ok(self.generator.generate(&prompt, context).await?)
    }

    fn availability_for(&self, department_code: &str) -> Option<Vec<AvailabilityRow>> {
        match self.availability.availability(department_code) {
            Ok(rows) => Some(rows),
            Err(e) => {
                warn!("Availability lookup failed for {}: {}", department_code, e);
                None
            }
        }
    }
}
