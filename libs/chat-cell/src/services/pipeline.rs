use std::time::Duration;

use futures::future::BoxFuture;
use serde_json::json;
use tokio::time::timeout;
use tracing::debug;

use shared_models::{EventKind, EventLog};

use crate::error::Fault;
use crate::models::{Branch, ReplySource};

type Attempt<'a> = Box<dyn FnOnce() -> BoxFuture<'a, Result<String, Fault>> + Send + 'a>;

/// Text picked by the chain and the tier that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainOutcome {
    pub text: String,
    pub source: ReplySource,
}

/// Ordered tiers tried in turn, each under a deadline. A fault, timeout or
/// blank text moves on to the next tier; the rule-based text ends the chain.
pub struct FallbackChain<'a> {
    branch: Branch,
    deadline: Duration,
    events: &'a dyn EventLog,
    tiers: Vec<(ReplySource, Attempt<'a>)>,
}

impl<'a> FallbackChain<'a> {
    pub fn new(branch: Branch, deadline: Duration, events: &'a dyn EventLog) -> Self {
        Self {
            branch,
            deadline,
            events,
            tiers: Vec::new(),
        }
    }

    /// Appends a tier. `attempt` is only invoked if every earlier tier failed.
    pub fn then<F>(mut self, source: ReplySource, attempt: F) -> Self
    where
        F: FnOnce() -> BoxFuture<'a, Result<String, Fault>> + Send + 'a,
    {
        self.tiers.push((source, Box::new(attempt)));
        self
    }

    pub async fn run(self, rule_based: impl Into<String>) -> ChainOutcome {
        for (source, attempt) in self.tiers {
            let fault = match timeout(self.deadline, attempt()).await {
                Ok(Ok(text)) if !text.trim().is_empty() => {
                    debug!("Branch {} answered by {}", self.branch.as_str(), source.as_str());
                    return ChainOutcome {
                        text: text.trim().to_string(),
                        source,
                    };
                }
                Ok(Ok(_)) => Fault::Empty,
                Ok(Err(fault)) => fault,
                Err(_) => Fault::Timeout(self.deadline),
            };

            self.events.record(
                EventKind::Fallback,
                json!({
                    "branch": self.branch.as_str(),
                    "tier": source.as_str(),
                    "error": fault.to_string(),
                }),
            );
        }

        ChainOutcome {
            text: rule_based.into(),
            source: ReplySource::RuleBased,
        }
    }
}
