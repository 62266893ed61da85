use async_graphql::SimpleObject;
use serde::{Deserialize, Serialize};

/// Markdown feedback on a completed quiz.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, SimpleObject)]
pub struct PerformanceSummary {
    pub summary: String,
}
