// src/asistenku/models/finance.rs
use crate::models::common::{PrincipalId, Rupiah};
use candid::CandidType;
use serde::{Deserialize, Serialize};

/// Earnings summary of one partner, read by the finance dashboard.
#[derive(CandidType, Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct FinancialPartner {
    #[serde(rename = "principalId")]
    pub principal_id: PrincipalId,
    pub name: String,
    #[serde(rename = "completedTasks")]
    pub completed_tasks: u32,
    #[serde(rename = "totalEarnings")]
    pub total_earnings: Rupiah,
    #[serde(rename = "pendingPayout")]
    pub pending_payout: Rupiah,
}
