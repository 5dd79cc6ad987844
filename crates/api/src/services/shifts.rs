//! Bulk shift creation for postings.
//!
//! The pure expansion/selection logic lives in `volly_core::scheduling`; this
//! service wraps it in the persistence protocol: one transaction per batch,
//! candidates processed sequentially so each conflict check sees the shifts
//! accepted earlier in the same batch, per-candidate rejections logged and
//! skipped rather than aborting, and a hard failure rolling back everything.

use sqlx::PgPool;
use tracing::info;
use volly_core::errors::{VollyError, VollyResult};
use volly_core::models::shift::{BulkShiftRequest, ShiftResponse, TimeBlock, UpdateShiftRequest};
use volly_core::scheduling;
use volly_db::models::DbShift;
use volly_db::repositories::{postings, shifts};

#[derive(Clone)]
pub struct ShiftService {
    pool: PgPool,
}

impl ShiftService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Expands a bulk request and persists the valid, non-duplicate blocks.
    /// Skipped candidates are logged; callers detect omissions by comparing
    /// input and output counts.
    pub async fn create_shifts(&self, request: &BulkShiftRequest) -> VollyResult<Vec<ShiftResponse>> {
        scheduling::validate_templates(&request.times).map_err(VollyError::Validation)?;
        let candidates = scheduling::expand_time_blocks(request)?;

        self.require_posting(request.posting_id).await?;

        let mut tx = self.pool.begin().await.map_err(db_err)?;

        let existing: Vec<TimeBlock> = shifts::get_shifts_by_posting_tx(&mut tx, request.posting_id)
            .await
            .map_err(VollyError::Database)?
            .iter()
            .map(block_of)
            .collect();

        let created = self
            .insert_selected(&mut tx, request.posting_id, &existing, candidates)
            .await?;

        tx.commit().await.map_err(db_err)?;

        Ok(created)
    }

    /// Replaces all shifts of a posting with the expansion of `request`
    /// (replace semantics, not merge). Runs in the same single-transaction
    /// protocol as `create_shifts`.
    pub async fn update_shifts(
        &self,
        posting_id: i32,
        request: &BulkShiftRequest,
    ) -> VollyResult<Vec<ShiftResponse>> {
        scheduling::validate_templates(&request.times).map_err(VollyError::Validation)?;
        let candidates = scheduling::expand_time_blocks(request)?;

        self.require_posting(posting_id).await?;

        let mut tx = self.pool.begin().await.map_err(db_err)?;

        shifts::delete_shifts_by_posting(&mut tx, posting_id)
            .await
            .map_err(VollyError::Database)?;

        // The posting's previous shifts were just removed, so only in-batch
        // duplicates remain possible.
        let created = self
            .insert_selected(&mut tx, posting_id, &[], candidates)
            .await?;

        tx.commit().await.map_err(db_err)?;

        Ok(created)
    }

    pub async fn get_shift(&self, id: i32) -> VollyResult<ShiftResponse> {
        let shift = shifts::get_shift_by_id(&self.pool, id)
            .await
            .map_err(VollyError::Database)?
            .ok_or_else(|| VollyError::NotFound(format!("Shift with id {id} not found")))?;
        Ok(response_of(&shift))
    }

    pub async fn list_shifts(&self, posting_id: Option<i32>) -> VollyResult<Vec<ShiftResponse>> {
        let rows = match posting_id {
            Some(posting_id) => shifts::get_shifts_by_posting(&self.pool, posting_id).await,
            None => shifts::get_shifts(&self.pool).await,
        }
        .map_err(VollyError::Database)?;

        Ok(rows.iter().map(response_of).collect())
    }

    /// Updates one shift's interval from wall-clock strings, applying the
    /// same strict parsing and same-day checks as the batch path.
    pub async fn update_shift(&self, id: i32, request: &UpdateShiftRequest) -> VollyResult<ShiftResponse> {
        let block = scheduling::parse_shift_times(&request.start_time, &request.end_time)
            .map_err(VollyError::Validation)?;

        shifts::get_shift_by_id(&self.pool, id)
            .await
            .map_err(VollyError::Database)?
            .ok_or_else(|| VollyError::NotFound(format!("Shift with id {id} not found")))?;

        let shift = shifts::update_shift(&self.pool, id, block.start_time, block.end_time)
            .await
            .map_err(VollyError::Database)?;

        Ok(response_of(&shift))
    }

    pub async fn delete_shift(&self, id: i32) -> VollyResult<i32> {
        shifts::get_shift_by_id(&self.pool, id)
            .await
            .map_err(VollyError::Database)?
            .ok_or_else(|| VollyError::NotFound(format!("Shift with id {id} not found")))?;

        let mut tx = self.pool.begin().await.map_err(db_err)?;
        shifts::delete_shift(&mut tx, id)
            .await
            .map_err(VollyError::Database)?;
        tx.commit().await.map_err(db_err)?;

        Ok(id)
    }

    pub async fn delete_shifts_by_posting(&self, posting_id: i32) -> VollyResult<()> {
        self.require_posting(posting_id).await?;

        let mut tx = self.pool.begin().await.map_err(db_err)?;
        shifts::delete_shifts_by_posting(&mut tx, posting_id)
            .await
            .map_err(VollyError::Database)?;
        tx.commit().await.map_err(db_err)?;

        Ok(())
    }

    /// Sequential fold over the candidates: select, then insert the accepted
    /// blocks in order within the caller's transaction.
    async fn insert_selected(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        posting_id: i32,
        existing: &[TimeBlock],
        candidates: Vec<TimeBlock>,
    ) -> VollyResult<Vec<ShiftResponse>> {
        let selection = scheduling::select_time_blocks(existing, candidates);

        for (block, reason) in &selection.skipped {
            info!(
                posting_id,
                start_time = %block.start_time,
                reason = %reason,
                "skipping shift candidate"
            );
        }

        let mut created = Vec::with_capacity(selection.accepted.len());
        for block in selection.accepted {
            let shift = shifts::create_shift(tx, posting_id, block.start_time, block.end_time)
                .await
                .map_err(VollyError::Database)?;
            created.push(response_of(&shift));
        }

        Ok(created)
    }

    async fn require_posting(&self, posting_id: i32) -> VollyResult<()> {
        postings::get_posting_by_id(&self.pool, posting_id)
            .await
            .map_err(VollyError::Database)?
            .ok_or_else(|| {
                VollyError::NotFound(format!("Posting with id {posting_id} not found"))
            })?;
        Ok(())
    }
}

fn db_err(err: sqlx::Error) -> VollyError {
    VollyError::Database(eyre::Report::new(err))
}

fn block_of(shift: &DbShift) -> TimeBlock {
    TimeBlock {
        start_time: shift.start_time,
        end_time: shift.end_time,
    }
}

fn response_of(shift: &DbShift) -> ShiftResponse {
    ShiftResponse {
        id: shift.id,
        posting_id: shift.posting_id,
        start_time: shift.start_time,
        end_time: shift.end_time,
    }
}
