// src/asistenku/backend/mod.rs
//
// Typed view of the remote actor. Every state change in the app goes through
// one of these operations; the actor owns persistence and authorization.

pub mod canister;
pub mod local;

pub use canister::CanisterBackend;
pub use local::LocalBackend;

use crate::error::AsistenkuError;
use crate::models::common::{LayanankuId, PrincipalId, ServiceId, TaskId, TimestampNs};
use crate::models::layananku::LayanankuInput;
use crate::models::wire::{
    WireLayanankuPublic, WireLayanankuRecord, WireTaskRecord, WireUserProfile,
};
use crate::models::{
    ClientData, FinancialPartner, InternalData, PartnerData, Role, Service, TaskInput,
    TaskStatusInternal, UserStatus,
};
use candid::CandidType;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Editable contact fields of the caller's own profile.
#[derive(CandidType, Deserialize, Serialize, Clone, Debug, Default, PartialEq, Eq, Validate)]
pub struct ProfileUpdate {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(min = 8, max = 20))]
    pub whatsapp: Option<String>,
}

#[allow(async_fn_in_trait)]
pub trait BackendInterface {
    // --- Profiles ---
    async fn get_caller_user_profile(&self) -> Result<Option<WireUserProfile>, AsistenkuError>;
    async fn get_user_profile(
        &self,
        principal: PrincipalId,
    ) -> Result<Option<WireUserProfile>, AsistenkuError>;
    async fn register_client(&self, data: ClientData) -> Result<WireUserProfile, AsistenkuError>;
    async fn register_partner(&self, data: PartnerData) -> Result<WireUserProfile, AsistenkuError>;
    async fn register_internal(
        &self,
        role: Role,
        data: InternalData,
    ) -> Result<WireUserProfile, AsistenkuError>;
    async fn update_caller_profile(
        &self,
        update: ProfileUpdate,
    ) -> Result<WireUserProfile, AsistenkuError>;
    async fn list_users(&self) -> Result<Vec<WireUserProfile>, AsistenkuError>;
    async fn set_user_status(
        &self,
        principal: PrincipalId,
        status: UserStatus,
    ) -> Result<(), AsistenkuError>;
    async fn assign_role(&self, principal: PrincipalId, role: Role) -> Result<(), AsistenkuError>;

    // --- Superadmin ---
    async fn is_superadmin_claimed(&self) -> Result<bool, AsistenkuError>;
    async fn claim_superadmin(&self) -> Result<bool, AsistenkuError>;

    // --- Internal access code ---
    async fn validate_internal_access_code(&self, code: String) -> Result<bool, AsistenkuError>;
    async fn set_internal_access_code(&self, code: String) -> Result<(), AsistenkuError>;

    // --- Tasks ---
    async fn create_task(&self, input: TaskInput) -> Result<WireTaskRecord, AsistenkuError>;
    async fn get_task(&self, task_id: TaskId) -> Result<Option<WireTaskRecord>, AsistenkuError>;
    async fn list_my_tasks(&self) -> Result<Vec<WireTaskRecord>, AsistenkuError>;
    async fn list_all_tasks(&self) -> Result<Vec<WireTaskRecord>, AsistenkuError>;
    async fn list_partner_tasks(&self) -> Result<Vec<WireTaskRecord>, AsistenkuError>;
    async fn update_task_status(
        &self,
        task_id: TaskId,
        status: TaskStatusInternal,
    ) -> Result<WireTaskRecord, AsistenkuError>;
    async fn assign_partner(
        &self,
        task_id: TaskId,
        partner: PrincipalId,
    ) -> Result<WireTaskRecord, AsistenkuError>;
    async fn assign_asistenmu(
        &self,
        task_id: TaskId,
        name: String,
    ) -> Result<WireTaskRecord, AsistenkuError>;
    async fn set_internal_deadline(
        &self,
        task_id: TaskId,
        deadline: Option<TimestampNs>,
    ) -> Result<WireTaskRecord, AsistenkuError>;

    // --- Service catalog ---
    async fn list_services(&self) -> Result<Vec<Service>, AsistenkuError>;
    async fn get_service(&self, service_id: ServiceId) -> Result<Option<Service>, AsistenkuError>;
    async fn upsert_service(&self, service: Service) -> Result<Service, AsistenkuError>;

    // --- Layananku ---
    async fn get_my_layananku(&self) -> Result<Option<WireLayanankuPublic>, AsistenkuError>;
    async fn list_layananku(&self) -> Result<Vec<WireLayanankuRecord>, AsistenkuError>;
    async fn create_layananku(
        &self,
        input: LayanankuInput,
    ) -> Result<WireLayanankuRecord, AsistenkuError>;
    async fn update_share_principals(
        &self,
        layananku_id: LayanankuId,
        principals: Vec<PrincipalId>,
    ) -> Result<WireLayanankuRecord, AsistenkuError>;

    // --- Finance ---
    async fn list_financial_partners(&self) -> Result<Vec<FinancialPartner>, AsistenkuError>;
}
