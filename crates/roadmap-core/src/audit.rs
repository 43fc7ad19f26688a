//! Operation history: written after every successful mutation, read back per
//! plan or for all plans.

use serde_json::Value;
use tracing::{debug, error};

use roadmap_db::models::{OperationRecord, OperationType};
use roadmap_db::queries::history;

use crate::error::ServiceError;
use crate::service::Roadmap;

/// History scope selecting every plan.
pub const ALL_PLANS: &str = "all";

impl Roadmap {
    /// Append an audit entry for a mutation that has already been stored.
    ///
    /// A failed append is logged and swallowed: the data change is committed
    /// and only its history entry is lost.
    pub(crate) async fn record(&self, plan_id: &str, operation: OperationType, details: Value) {
        match history::append_operation(&self.pool, plan_id, operation, &details).await {
            Ok(_) => debug!(plan_id, %operation, "operation recorded"),
            Err(e) => error!(plan_id, %operation, "failed to record operation: {e:#}"),
        }
    }

    /// History of one plan, or of every plan when `scope` is [`ALL_PLANS`].
    ///
    /// Unknown plans have an empty history.
    pub async fn operation_history(
        &self,
        scope: &str,
    ) -> Result<Vec<OperationRecord>, ServiceError> {
        let plan_id = (scope != ALL_PLANS).then_some(scope);
        Ok(history::list_operations(&self.pool, plan_id).await?)
    }
}
