// src/asistenku/backend/canister.rs
//
// Candid transport to the backend actor. Update methods answer with the
// actor's `{#ok; #err : Text}` result; queries answer with the bare value.
// Records travel with camelCase fields and enums as candid variants, in both
// directions.

use crate::backend::{BackendInterface, ProfileUpdate};
use crate::config::ClientConfig;
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
use candid::utils::ArgumentEncoder;
use candid::{CandidType, Principal};
use ic_cdk::api::call::RejectionCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;

#[derive(CandidType, Deserialize, Debug)]
enum ActorResult<T> {
    #[serde(rename = "ok")]
    Ok(T),
    #[serde(rename = "err")]
    Err(String),
}

fn map_rejection(method: &str, (code, message): (RejectionCode, String)) -> AsistenkuError {
    log_error!("Call to {} rejected ({:?}): {}", method, code, message);
    match code {
        RejectionCode::SysTransient => AsistenkuError::ActorNotReady,
        _ => AsistenkuError::Rejected(message),
    }
}

pub struct CanisterBackend {
    canister_id: Option<Principal>,
}

impl CanisterBackend {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            canister_id: config.backend_canister_id,
        }
    }

    pub fn canister_id(&self) -> Option<Principal> {
        self.canister_id
    }

    fn target(&self) -> Result<Principal, AsistenkuError> {
        self.canister_id.ok_or(AsistenkuError::ActorNotReady)
    }

    async fn query<A, R>(&self, method: &str, args: A) -> Result<R, AsistenkuError>
    where
        A: ArgumentEncoder,
        R: CandidType + DeserializeOwned,
    {
        let target = self.target()?;
        let (value,): (R,) = ic_cdk::call(target, method, args)
            .await
            .map_err(|rejection| map_rejection(method, rejection))?;
        Ok(value)
    }

    async fn update<A, R>(&self, method: &str, args: A) -> Result<R, AsistenkuError>
    where
        A: ArgumentEncoder,
        R: CandidType + DeserializeOwned,
    {
        match self.query::<A, ActorResult<R>>(method, args).await? {
            ActorResult::Ok(value) => Ok(value),
            ActorResult::Err(message) => Err(AsistenkuError::Backend(message)),
        }
    }
}

impl BackendInterface for CanisterBackend {
    async fn get_caller_user_profile(&self) -> Result<Option<WireUserProfile>, AsistenkuError> {
        self.query("getCallerUserProfile", ()).await
    }

    async fn get_user_profile(
        &self,
        principal: PrincipalId,
    ) -> Result<Option<WireUserProfile>, AsistenkuError> {
        self.query("getUserProfile", (principal,)).await
    }

    async fn register_client(&self, data: ClientData) -> Result<WireUserProfile, AsistenkuError> {
        self.update("registerClient", (data,)).await
    }

    async fn register_partner(&self, data: PartnerData) -> Result<WireUserProfile, AsistenkuError> {
        self.update("registerPartner", (data,)).await
    }

    async fn register_internal(
        &self,
        role: Role,
        data: InternalData,
    ) -> Result<WireUserProfile, AsistenkuError> {
        self.update("registerInternal", (role, data)).await
    }

    async fn update_caller_profile(
        &self,
        update: ProfileUpdate,
    ) -> Result<WireUserProfile, AsistenkuError> {
        self.update("updateCallerProfile", (update,)).await
    }

    async fn list_users(&self) -> Result<Vec<WireUserProfile>, AsistenkuError> {
        self.query("listUsers", ()).await
    }

    async fn set_user_status(
        &self,
        principal: PrincipalId,
        status: UserStatus,
    ) -> Result<(), AsistenkuError> {
        self.update("setUserStatus", (principal, status)).await
    }

    async fn assign_role(&self, principal: PrincipalId, role: Role) -> Result<(), AsistenkuError> {
        self.update("assignRole", (principal, role)).await
    }

    async fn is_superadmin_claimed(&self) -> Result<bool, AsistenkuError> {
        self.query("isSuperadminClaimed", ()).await
    }

    async fn claim_superadmin(&self) -> Result<bool, AsistenkuError> {
        self.update("claimSuperadmin", ()).await
    }

    async fn validate_internal_access_code(&self, code: String) -> Result<bool, AsistenkuError> {
        self.query("validateInternalAccessCode", (code,)).await
    }

    async fn set_internal_access_code(&self, code: String) -> Result<(), AsistenkuError> {
        self.update("setInternalAccessCode", (code,)).await
    }

    async fn create_task(&self, input: TaskInput) -> Result<WireTaskRecord, AsistenkuError> {
        self.update("createTask", (input,)).await
    }

    async fn get_task(&self, task_id: TaskId) -> Result<Option<WireTaskRecord>, AsistenkuError> {
        self.query("getTask", (task_id,)).await
    }

    async fn list_my_tasks(&self) -> Result<Vec<WireTaskRecord>, AsistenkuError> {
        self.query("listMyTasks", ()).await
    }

    async fn list_all_tasks(&self) -> Result<Vec<WireTaskRecord>, AsistenkuError> {
        self.query("listAllTasks", ()).await
    }

    async fn list_partner_tasks(&self) -> Result<Vec<WireTaskRecord>, AsistenkuError> {
        self.query("listPartnerTasks", ()).await
    }

    async fn update_task_status(
        &self,
        task_id: TaskId,
        status: TaskStatusInternal,
    ) -> Result<WireTaskRecord, AsistenkuError> {
        self.update("updateTaskStatus", (task_id, status)).await
    }

    async fn assign_partner(
        &self,
        task_id: TaskId,
        partner: PrincipalId,
    ) -> Result<WireTaskRecord, AsistenkuError> {
        self.update("assignPartner", (task_id, partner)).await
    }

    async fn assign_asistenmu(
        &self,
        task_id: TaskId,
        name: String,
    ) -> Result<WireTaskRecord, AsistenkuError> {
        self.update("assignAsistenmu", (task_id, name)).await
    }

    async fn set_internal_deadline(
        &self,
        task_id: TaskId,
        deadline: Option<TimestampNs>,
    ) -> Result<WireTaskRecord, AsistenkuError> {
        self.update("setInternalDeadline", (task_id, deadline)).await
    }

    async fn list_services(&self) -> Result<Vec<Service>, AsistenkuError> {
        self.query("listServices", ()).await
    }

    async fn get_service(&self, service_id: ServiceId) -> Result<Option<Service>, AsistenkuError> {
        self.query("getService", (service_id,)).await
    }

    async fn upsert_service(&self, service: Service) -> Result<Service, AsistenkuError> {
        self.update("upsertService", (service,)).await
    }

    async fn get_my_layananku(&self) -> Result<Option<WireLayanankuPublic>, AsistenkuError> {
        self.query("getMyLayananku", ()).await
    }

    async fn list_layananku(&self) -> Result<Vec<WireLayanankuRecord>, AsistenkuError> {
        self.query("listLayananku", ()).await
    }

    async fn create_layananku(
        &self,
        input: LayanankuInput,
    ) -> Result<WireLayanankuRecord, AsistenkuError> {
        self.update("createLayananku", (input,)).await
    }

    async fn update_share_principals(
        &self,
        layananku_id: LayanankuId,
        principals: Vec<PrincipalId>,
    ) -> Result<WireLayanankuRecord, AsistenkuError> {
        self.update("updateSharePrincipals", (layananku_id, principals)).await
    }

    async fn list_financial_partners(&self) -> Result<Vec<FinancialPartner>, AsistenkuError> {
        self.query("listFinancialPartners", ()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use candid::types::{Type, TypeInner};

    #[test]
    fn unconfigured_backend_is_not_ready() {
        let backend = CanisterBackend::new(&ClientConfig::default());
        let result = futures::executor::block_on(backend.list_services());
        assert_eq!(result, Err(AsistenkuError::ActorNotReady));
    }

    #[test]
    fn transient_rejections_mean_not_ready() {
        let err = map_rejection("listServices", (RejectionCode::SysTransient, "busy".to_string()));
        assert_eq!(err, AsistenkuError::ActorNotReady);
        let rejection = (RejectionCode::CanisterReject, "nope".to_string());
        let err = map_rejection("listServices", rejection);
        assert_eq!(err, AsistenkuError::Rejected("nope".to_string()));
    }

    #[test]
    fn actor_result_uses_motoko_tags() {
        let bytes = candid::encode_one(ActorResult::<u32>::Err("Kuota habis".to_string()))
            .expect("encodes");
        let decoded: ActorResult<u32> = candid::decode_one(&bytes).expect("decodes");
        assert!(matches!(decoded, ActorResult::Err(message) if message == "Kuota habis"));
    }

    fn record_fields(ty: &Type) -> Vec<(String, bool)> {
        match ty.as_ref() {
            TypeInner::Record(fields) => fields
                .iter()
                .map(|field| {
                    let is_variant = matches!(field.ty.as_ref(), TypeInner::Variant(_));
                    (field.id.to_string(), is_variant)
                })
                .collect(),
            other => panic!("expected a record, got {:?}", other),
        }
    }

    #[test]
    fn records_share_one_wire_convention() {
        let records = [
            TaskInput::ty(),
            LayanankuInput::ty(),
            WireTaskRecord::ty(),
            WireUserProfile::ty(),
            WireLayanankuRecord::ty(),
        ];
        for ty in &records {
            for (label, _) in record_fields(ty) {
                assert!(!label.contains('_'), "snake_case field {label} on the wire");
            }
        }

        let input = record_fields(&TaskInput::ty());
        assert!(input.contains(&("requestType".to_string(), true)));
        assert!(input.contains(&("clientDeadline".to_string(), false)));
        let output = record_fields(&WireTaskRecord::ty());
        assert!(output.contains(&("requestType".to_string(), true)));
        assert!(output.contains(&("statusInternal".to_string(), true)));
        let profile = record_fields(&WireUserProfile::ty());
        assert!(profile.contains(&("role".to_string(), true)));
        assert!(profile.contains(&("status".to_string(), true)));
    }

    #[test]
    fn enum_arguments_are_variants() {
        for ty in [Role::ty(), UserStatus::ty(), TaskStatusInternal::ty()] {
            assert!(matches!(ty.as_ref(), TypeInner::Variant(_)));
        }
    }
}
