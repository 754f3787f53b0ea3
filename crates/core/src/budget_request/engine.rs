//! Budget request engine: create, decide, and expose approved lines.

use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use procura_shared::types::money::apply_percentage;
use procura_shared::types::{AreaId, BudgetRequestId, UserId};
use rust_decimal::Decimal;
use tracing::info;

use crate::allocation::AreaYear;

use super::error::BudgetRequestError;
use super::types::{
    ApprovedBudgetLine, BudgetRequest, BudgetRequestStatus, CreateBudgetRequestInput, LineItem,
};

/// In-memory engine owning budget requests.
///
/// The one-active-request-per-(area, year) rule is enforced through an
/// index updated under its entry guard, so two concurrent creates for
/// the same key admit exactly one request.
#[derive(Debug, Default)]
pub struct BudgetRequestEngine {
    requests: DashMap<BudgetRequestId, BudgetRequest>,
    /// The non-rejected request per key. Entries are removed on rejection.
    active: DashMap<AreaYear, BudgetRequestId>,
}

impl BudgetRequestEngine {
    /// Creates an empty engine.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a budget request.
    ///
    /// # Errors
    ///
    /// Returns a validation error for negative amounts, and
    /// `ActiveRequestExists` if the area already has a non-rejected
    /// request for the year.
    pub fn create(
        &self,
        input: CreateBudgetRequestInput,
    ) -> Result<BudgetRequest, BudgetRequestError> {
        if input.requested_amount.is_sign_negative() {
            return Err(BudgetRequestError::NegativeRequestedAmount);
        }
        if input
            .line_items
            .iter()
            .any(|line| line.estimated_value.is_sign_negative())
        {
            return Err(BudgetRequestError::NegativeLineItemValue);
        }

        let key = AreaYear::new(input.area_id, input.year);
        let id = BudgetRequestId::new();
        let request = BudgetRequest {
            id,
            area_id: input.area_id,
            year: input.year,
            requested_amount: input.requested_amount,
            justification: input.justification,
            status: BudgetRequestStatus::Pending,
            approval_percentage: None,
            approved_amount: None,
            approver_id: None,
            decided_at: None,
            rejection_reason: None,
            line_items: input
                .line_items
                .into_iter()
                .map(|line| LineItem {
                    account_id: line.account_id,
                    concept_id: line.concept_id,
                    estimated_value: line.estimated_value,
                    approved_value: None,
                })
                .collect(),
            created_at: Utc::now(),
        };

        match self.active.entry(key) {
            Entry::Occupied(_) => {
                return Err(BudgetRequestError::ActiveRequestExists {
                    area_id: input.area_id,
                    year: input.year,
                });
            }
            Entry::Vacant(vacant) => {
                // The record lands before the index points at it: once
                // the key is observably taken, the backing request is
                // already readable.
                self.requests.insert(id, request.clone());
                vacant.insert(id);
            }
        }

        info!(request_id = %id, area_id = %request.area_id, year = request.year,
            requested = %request.requested_amount, "budget request created");
        Ok(request)
    }

    /// Approves a pending request at a percentage of the requested amount.
    ///
    /// The aggregate and every line item are rounded independently through
    /// the shared rounding policy; at 100% the values are reproduced
    /// exactly. The sum of rounded lines may drift from the rounded
    /// aggregate by up to one unit per line; that drift is accepted.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyDecided` unless the request is pending, and
    /// `InvalidPercentage` for percentages above 100.
    pub fn approve(
        &self,
        id: BudgetRequestId,
        approver_id: UserId,
        percentage: u8,
    ) -> Result<BudgetRequest, BudgetRequestError> {
        if percentage > 100 {
            return Err(BudgetRequestError::InvalidPercentage(percentage));
        }

        let mut request = self
            .requests
            .get_mut(&id)
            .ok_or(BudgetRequestError::NotFound(id))?;
        if request.status != BudgetRequestStatus::Pending {
            return Err(BudgetRequestError::AlreadyDecided {
                status: request.status,
            });
        }

        request.status = BudgetRequestStatus::Approved;
        request.approval_percentage = Some(percentage);
        request.approved_amount = Some(apply_percentage(request.requested_amount, percentage));
        request.approver_id = Some(approver_id);
        request.decided_at = Some(Utc::now());
        for line in &mut request.line_items {
            line.approved_value = Some(apply_percentage(line.estimated_value, percentage));
        }

        info!(request_id = %id, %approver_id, percentage,
            approved = %request.approved_amount.unwrap_or_default(),
            "budget request approved");
        Ok(request.clone())
    }

    /// Rejects a pending request. Terminal; no ledger effect.
    ///
    /// # Errors
    ///
    /// Returns `RejectionReasonRequired` for an empty reason and
    /// `AlreadyDecided` unless the request is pending.
    pub fn reject(
        &self,
        id: BudgetRequestId,
        approver_id: UserId,
        reason: String,
    ) -> Result<BudgetRequest, BudgetRequestError> {
        if reason.trim().is_empty() {
            return Err(BudgetRequestError::RejectionReasonRequired);
        }

        let mut request = self
            .requests
            .get_mut(&id)
            .ok_or(BudgetRequestError::NotFound(id))?;
        if request.status != BudgetRequestStatus::Pending {
            return Err(BudgetRequestError::AlreadyDecided {
                status: request.status,
            });
        }

        request.status = BudgetRequestStatus::Rejected;
        request.approver_id = Some(approver_id);
        request.decided_at = Some(Utc::now());
        request.rejection_reason = Some(reason);

        // A rejected request no longer blocks a new one for the key.
        let key = AreaYear::new(request.area_id, request.year);
        self.active.remove_if(&key, |_, active_id| *active_id == id);

        info!(request_id = %id, %approver_id, "budget request rejected");
        Ok(request.clone())
    }

    /// Returns a request by id.
    pub fn get(&self, id: BudgetRequestId) -> Result<BudgetRequest, BudgetRequestError> {
        self.requests
            .get(&id)
            .map(|request| request.value().clone())
            .ok_or(BudgetRequestError::NotFound(id))
    }

    /// Returns the non-rejected request for an area and year, if any.
    #[must_use]
    pub fn get_by_area_year(&self, area_id: AreaId, year: i32) -> Option<BudgetRequest> {
        let id = *self.active.get(&AreaYear::new(area_id, year))?;
        self.requests.get(&id).map(|request| request.value().clone())
    }

    /// Returns the approved budget lines for an area and year.
    ///
    /// Duplicate (account, concept) pairs are summed. Empty unless the
    /// area's request for the year is approved.
    #[must_use]
    pub fn approved_lines(&self, area_id: AreaId, year: i32) -> Vec<ApprovedBudgetLine> {
        let Some(request) = self.get_by_area_year(area_id, year) else {
            return Vec::new();
        };
        if request.status != BudgetRequestStatus::Approved {
            return Vec::new();
        }

        let mut lines: Vec<ApprovedBudgetLine> = Vec::new();
        for item in &request.line_items {
            let approved = item.approved_value.unwrap_or(Decimal::ZERO);
            match lines
                .iter_mut()
                .find(|l| l.account_id == item.account_id && l.concept_id == item.concept_id)
            {
                Some(line) => line.approved_value += approved,
                None => lines.push(ApprovedBudgetLine {
                    account_id: item.account_id,
                    concept_id: item.concept_id,
                    approved_value: approved,
                }),
            }
        }
        lines
    }
}
