use crate::{
    batch::StatementBatch,
    result::{BatchError, ExecutionOutcome, Result},
};

/// Trait for executing statement batches against different database backends.
///
/// A batch is consumed by the run: each `StatementBatch` opens exactly one
/// transaction and ends in exactly one terminal outcome. The async
/// PostgreSQL backend is reachable through its free function instead.
pub trait BatchRunner {
    fn batch_run(&mut self, batch: StatementBatch) -> anyhow::Result<ExecutionOutcome>;
}

/// Map a statement failure plus the result of the rollback attempt onto the
/// terminal outcome. A clean rollback reports `RolledBack`; a failed rollback
/// escalates to `RollbackFailed` so that neither cause is swallowed.
pub(crate) fn resolve_failure(
    failing_index: usize,
    cause: BatchError,
    rollback_result: Result<()>,
) -> ExecutionOutcome {
    match rollback_result {
        Ok(()) => ExecutionOutcome::RolledBack {
            failing_index,
            cause,
        },
        Err(rollback_cause) => ExecutionOutcome::RollbackFailed {
            cause,
            rollback_cause,
        },
    }
}
