// src/asistenku/query/hooks.rs
//
// One method per screen-level query or mutation. Each declares its cache key,
// what it invalidates and its toasts, and hands back normalized domain types.

use crate::backend::{BackendInterface, ProfileUpdate};
use crate::config::ClientConfig;
use crate::error::AsistenkuError;
use crate::models::common::{LayanankuId, PrincipalId, ServiceId, TaskId, TimestampNs};
use crate::models::layananku::{LayanankuInput, LayanankuPublic, LayanankuRecord};
use crate::models::wire::{WireTaskRecord, WireUserProfile};
use crate::models::{
    ClientData, FinancialPartner, InternalData, PartnerData, Role, Service, TaskInput, TaskRecord,
    TaskStatusInternal, UserProfile, UserStatus,
};
use crate::query::cache::{MutationSpec, QueryClient};
use crate::query::keys::{QueryKey, QueryKind};
use crate::services::triage::{classify, task_board, TaskBucket, TaskBuckets};
use std::rc::Rc;
use validator::Validate;

const PROFILE_KINDS: &[QueryKind] = &[
    QueryKind::CallerProfile,
    QueryKind::UserProfile,
    QueryKind::Users,
];
const TASK_KINDS: &[QueryKind] = &[
    QueryKind::MyTasks,
    QueryKind::AllTasks,
    QueryKind::PartnerTasks,
    QueryKind::Task,
    QueryKind::FinancialPartners,
];
const LAYANANKU_KINDS: &[QueryKind] = &[QueryKind::MyLayananku, QueryKind::Layananku];

const REGISTER: MutationSpec = MutationSpec {
    invalidates: PROFILE_KINDS,
    success: "Pendaftaran berhasil",
    failure: "Pendaftaran gagal",
};
const UPDATE_PROFILE: MutationSpec = MutationSpec {
    invalidates: PROFILE_KINDS,
    success: "Profil diperbarui",
    failure: "Gagal memperbarui profil",
};
const MANAGE_USER: MutationSpec = MutationSpec {
    invalidates: PROFILE_KINDS,
    success: "Pengguna diperbarui",
    failure: "Gagal memperbarui pengguna",
};
const CLAIM_SUPERADMIN: MutationSpec = MutationSpec {
    invalidates: &[QueryKind::SuperadminClaimed, QueryKind::CallerProfile, QueryKind::Users],
    success: "Superadmin berhasil diklaim",
    failure: "Gagal mengklaim superadmin",
};
const SET_ACCESS_CODE: MutationSpec = MutationSpec {
    invalidates: &[QueryKind::AccessCode],
    success: "Kode akses diperbarui",
    failure: "Gagal memperbarui kode akses",
};
const SUBMIT_REQUEST: MutationSpec = MutationSpec {
    invalidates: &[QueryKind::MyTasks, QueryKind::AllTasks],
    success: "Permintaan terkirim",
    failure: "Gagal mengirim permintaan",
};
const UPDATE_TASK: MutationSpec = MutationSpec {
    invalidates: TASK_KINDS,
    success: "Tugas diperbarui",
    failure: "Gagal memperbarui tugas",
};
const UPSERT_SERVICE: MutationSpec = MutationSpec {
    invalidates: &[QueryKind::Services, QueryKind::Service],
    success: "Layanan disimpan",
    failure: "Gagal menyimpan layanan",
};
const SAVE_LAYANANKU: MutationSpec = MutationSpec {
    invalidates: LAYANANKU_KINDS,
    success: "Layananku disimpan",
    failure: "Gagal menyimpan Layananku",
};

/// Indonesian label of an internal task status.
pub fn status_label(status: TaskStatusInternal) -> &'static str {
    match status {
        TaskStatusInternal::Requested => "Diajukan",
        TaskStatusInternal::InProgress => "Sedang dikerjakan",
        TaskStatusInternal::QaAsistenmu => "QA Asistenmu",
        TaskStatusInternal::Revision => "Revisi",
        TaskStatusInternal::Done => "Selesai",
    }
}

/// One line of a task table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TaskRow {
    pub task_id: TaskId,
    pub title: String,
    pub badge: &'static str,
    pub status: TaskStatusInternal,
    pub status_label: &'static str,
    pub bucket: TaskBucket,
    pub deadline: Option<TimestampNs>,
    pub asistenmu: Option<String>,
}

impl TaskRow {
    pub fn from_task(task: &TaskRecord) -> Self {
        Self {
            task_id: task.task_id.clone(),
            title: task.title.clone(),
            badge: task.request_type.badge(),
            status: task.status_internal,
            status_label: status_label(task.status_internal),
            bucket: classify(task.status_internal),
            deadline: task.effective_deadline(),
            asistenmu: task.assigned_asistenmu_name.clone(),
        }
    }
}

fn normalize_profiles(wire: Vec<WireUserProfile>) -> Result<Vec<UserProfile>, AsistenkuError> {
    wire.into_iter().map(UserProfile::try_from).collect()
}

fn normalize_tasks(wire: Vec<WireTaskRecord>) -> Result<Vec<TaskRecord>, AsistenkuError> {
    Ok(wire.into_iter().map(TaskRecord::from).collect())
}

pub struct Hooks<B> {
    backend: Rc<B>,
    client: QueryClient,
}

impl<B: BackendInterface + 'static> Hooks<B> {
    pub fn new(backend: Rc<B>, config: &ClientConfig) -> Self {
        Self {
            backend,
            client: QueryClient::new(config),
        }
    }

    pub fn backend(&self) -> &Rc<B> {
        &self.backend
    }

    pub fn client(&self) -> &QueryClient {
        &self.client
    }

    async fn query<T, F, Fut>(
        &self,
        key: QueryKey,
        retry: u32,
        call: F,
    ) -> Result<Rc<T>, AsistenkuError>
    where
        T: 'static,
        F: Fn(Rc<B>) -> Fut + 'static,
        Fut: std::future::Future<Output = Result<T, AsistenkuError>> + 'static,
    {
        let backend = self.backend.clone();
        self.client
            .fetch(key, retry, move || call(backend.clone()))
            .await
    }

    // --- Profiles ---

    /// Profile of the signed-in principal. Not retried: a missing profile is
    /// an answer, not a failure.
    pub async fn caller_profile(&self) -> Result<Rc<Option<UserProfile>>, AsistenkuError> {
        self.query(QueryKind::CallerProfile.into(), 0, |backend: Rc<B>| async move {
            backend
                .get_caller_user_profile()
                .await?
                .map(UserProfile::try_from)
                .transpose()
        })
        .await
    }

    pub async fn user_profile(
        &self,
        principal: PrincipalId,
    ) -> Result<Rc<Option<UserProfile>>, AsistenkuError> {
        let key = QueryKey::with_param(QueryKind::UserProfile, principal.to_text());
        self.query(key, self.client.default_retry(), move |backend: Rc<B>| async move {
            backend
                .get_user_profile(principal)
                .await?
                .map(UserProfile::try_from)
                .transpose()
        })
        .await
    }

    pub async fn users(&self) -> Result<Rc<Vec<UserProfile>>, AsistenkuError> {
        let retry = self.client.default_retry();
        self.query(QueryKind::Users.into(), retry, |backend: Rc<B>| async move {
            normalize_profiles(backend.list_users().await?)
        })
        .await
    }

    pub async fn register_client(&self, data: ClientData) -> Result<UserProfile, AsistenkuError> {
        let call = async { UserProfile::try_from(self.backend.register_client(data).await?) };
        self.client.mutate(REGISTER, call).await
    }

    pub async fn register_partner(&self, data: PartnerData) -> Result<UserProfile, AsistenkuError> {
        let call = async { UserProfile::try_from(self.backend.register_partner(data).await?) };
        self.client.mutate(REGISTER, call).await
    }

    pub async fn register_internal(
        &self,
        role: Role,
        data: InternalData,
    ) -> Result<UserProfile, AsistenkuError> {
        let call = async {
            UserProfile::try_from(self.backend.register_internal(role, data).await?)
        };
        self.client.mutate(REGISTER, call).await
    }

    pub async fn update_profile(
        &self,
        update: ProfileUpdate,
    ) -> Result<UserProfile, AsistenkuError> {
        let call = async {
            update.validate()?;
            UserProfile::try_from(self.backend.update_caller_profile(update).await?)
        };
        self.client.mutate(UPDATE_PROFILE, call).await
    }

    pub async fn set_user_status(
        &self,
        principal: PrincipalId,
        status: UserStatus,
    ) -> Result<(), AsistenkuError> {
        self.client
            .mutate(MANAGE_USER, self.backend.set_user_status(principal, status))
            .await
    }

    pub async fn assign_role(
        &self,
        principal: PrincipalId,
        role: Role,
    ) -> Result<(), AsistenkuError> {
        self.client
            .mutate(MANAGE_USER, self.backend.assign_role(principal, role))
            .await
    }

    // --- Superadmin and internal access ---

    pub async fn superadmin_claimed(&self) -> Result<bool, AsistenkuError> {
        let retry = self.client.default_retry();
        let claimed = self
            .query(QueryKind::SuperadminClaimed.into(), retry, |backend: Rc<B>| async move {
                backend.is_superadmin_claimed().await
            })
            .await?;
        Ok(*claimed)
    }

    pub async fn claim_superadmin(&self) -> Result<(), AsistenkuError> {
        let call = async {
            if self.backend.claim_superadmin().await? {
                Ok(())
            } else {
                Err(AsistenkuError::Backend("Superadmin sudah diklaim".to_string()))
            }
        };
        self.client.mutate(CLAIM_SUPERADMIN, call).await
    }

    /// Checks an internal access code. Not retried, and cached only under
    /// the code's digest.
    pub async fn validate_access_code(&self, code: &str) -> Result<bool, AsistenkuError> {
        let code = code.trim().to_string();
        let key = QueryKey::hashed(QueryKind::AccessCode, &code);
        let valid = self
            .query(key, 0, move |backend: Rc<B>| {
                let code = code.clone();
                async move { backend.validate_internal_access_code(code).await }
            })
            .await?;
        Ok(*valid)
    }

    pub async fn set_access_code(&self, code: &str) -> Result<(), AsistenkuError> {
        self.client
            .mutate(SET_ACCESS_CODE, self.backend.set_internal_access_code(code.trim().to_string()))
            .await
    }

    // --- Tasks ---

    pub async fn my_tasks(&self) -> Result<Rc<Vec<TaskRecord>>, AsistenkuError> {
        let retry = self.client.default_retry();
        self.query(QueryKind::MyTasks.into(), retry, |backend: Rc<B>| async move {
            normalize_tasks(backend.list_my_tasks().await?)
        })
        .await
    }

    pub async fn all_tasks(&self) -> Result<Rc<Vec<TaskRecord>>, AsistenkuError> {
        let retry = self.client.default_retry();
        self.query(QueryKind::AllTasks.into(), retry, |backend: Rc<B>| async move {
            normalize_tasks(backend.list_all_tasks().await?)
        })
        .await
    }

    pub async fn partner_tasks(&self) -> Result<Rc<Vec<TaskRecord>>, AsistenkuError> {
        let retry = self.client.default_retry();
        self.query(QueryKind::PartnerTasks.into(), retry, |backend: Rc<B>| async move {
            normalize_tasks(backend.list_partner_tasks().await?)
        })
        .await
    }

    pub async fn task(&self, task_id: &str) -> Result<Rc<Option<TaskRecord>>, AsistenkuError> {
        let key = QueryKey::with_param(QueryKind::Task, task_id);
        let task_id = task_id.to_string();
        self.query(key, self.client.default_retry(), move |backend: Rc<B>| {
            let task_id = task_id.clone();
            async move {
                let task = backend.get_task(task_id).await?;
                Ok::<_, AsistenkuError>(task.map(TaskRecord::from))
            }
        })
        .await
    }

    /// The caller's tasks as table rows, in backend order.
    pub async fn my_task_rows(&self) -> Result<Vec<TaskRow>, AsistenkuError> {
        Ok(self.my_tasks().await?.iter().map(TaskRow::from_task).collect())
    }

    pub async fn partner_task_rows(&self) -> Result<Vec<TaskRow>, AsistenkuError> {
        Ok(self.partner_tasks().await?.iter().map(TaskRow::from_task).collect())
    }

    /// Every task split into dashboard tabs, the active tab priority-sorted.
    pub async fn task_board(&self) -> Result<TaskBuckets, AsistenkuError> {
        Ok(task_board(self.all_tasks().await?.iter().cloned()))
    }

    /// Client request form. Title and description are trimmed before
    /// validation; the task starts out REQUESTED.
    pub async fn submit_request(&self, input: TaskInput) -> Result<TaskRecord, AsistenkuError> {
        let input = TaskInput {
            title: input.title.trim().to_string(),
            description: input.description.trim().to_string(),
            ..input
        };
        let call = async {
            input.validate()?;
            Ok::<_, AsistenkuError>(TaskRecord::from(self.backend.create_task(input).await?))
        };
        self.client.mutate(SUBMIT_REQUEST, call).await
    }

    pub async fn update_task_status(
        &self,
        task_id: &str,
        status: TaskStatusInternal,
    ) -> Result<TaskRecord, AsistenkuError> {
        let call = async {
            let wire = self.backend.update_task_status(task_id.to_string(), status).await?;
            Ok::<_, AsistenkuError>(TaskRecord::from(wire))
        };
        self.client.mutate(UPDATE_TASK, call).await
    }

    /// Partner work dialog: accept and start.
    pub async fn start_work(&self, task_id: &str) -> Result<TaskRecord, AsistenkuError> {
        self.update_task_status(task_id, TaskStatusInternal::InProgress).await
    }

    /// Partner work dialog: hand the result to the asistenmu for QA.
    pub async fn submit_for_qa(&self, task_id: &str) -> Result<TaskRecord, AsistenkuError> {
        self.update_task_status(task_id, TaskStatusInternal::QaAsistenmu).await
    }

    /// Partner work dialog: decline. The task goes back to REQUESTED so it
    /// can be delegated again.
    pub async fn reject_work(&self, task_id: &str) -> Result<TaskRecord, AsistenkuError> {
        self.update_task_status(task_id, TaskStatusInternal::Requested).await
    }

    pub async fn assign_partner(
        &self,
        task_id: &str,
        partner: PrincipalId,
    ) -> Result<TaskRecord, AsistenkuError> {
        let call = async {
            let wire = self.backend.assign_partner(task_id.to_string(), partner).await?;
            Ok::<_, AsistenkuError>(TaskRecord::from(wire))
        };
        self.client.mutate(UPDATE_TASK, call).await
    }

    pub async fn assign_asistenmu(
        &self,
        task_id: &str,
        name: &str,
    ) -> Result<TaskRecord, AsistenkuError> {
        let call = async {
            let wire = self
                .backend
                .assign_asistenmu(task_id.to_string(), name.trim().to_string())
                .await?;
            Ok::<_, AsistenkuError>(TaskRecord::from(wire))
        };
        self.client.mutate(UPDATE_TASK, call).await
    }

    pub async fn set_internal_deadline(
        &self,
        task_id: &str,
        deadline: Option<TimestampNs>,
    ) -> Result<TaskRecord, AsistenkuError> {
        let call = async {
            let wire = self.backend.set_internal_deadline(task_id.to_string(), deadline).await?;
            Ok::<_, AsistenkuError>(TaskRecord::from(wire))
        };
        self.client.mutate(UPDATE_TASK, call).await
    }

    // --- Service catalog ---

    pub async fn services(&self) -> Result<Rc<Vec<Service>>, AsistenkuError> {
        let retry = self.client.default_retry();
        self.query(QueryKind::Services.into(), retry, |backend: Rc<B>| async move {
            backend.list_services().await
        })
        .await
    }

    pub async fn service(&self, service_id: &str) -> Result<Rc<Option<Service>>, AsistenkuError> {
        let key = QueryKey::with_param(QueryKind::Service, service_id);
        let service_id: ServiceId = service_id.to_string();
        self.query(key, self.client.default_retry(), move |backend: Rc<B>| {
            let service_id = service_id.clone();
            async move { backend.get_service(service_id).await }
        })
        .await
    }

    pub async fn upsert_service(&self, service: Service) -> Result<Service, AsistenkuError> {
        let call = async {
            service.validate()?;
            self.backend.upsert_service(service).await
        };
        self.client.mutate(UPSERT_SERVICE, call).await
    }

    // --- Layananku ---

    pub async fn my_layananku(&self) -> Result<Rc<Option<LayanankuPublic>>, AsistenkuError> {
        let retry = self.client.default_retry();
        self.query(QueryKind::MyLayananku.into(), retry, |backend: Rc<B>| async move {
            backend
                .get_my_layananku()
                .await?
                .map(LayanankuPublic::try_from)
                .transpose()
        })
        .await
    }

    pub async fn layananku(&self) -> Result<Rc<Vec<LayanankuRecord>>, AsistenkuError> {
        let retry = self.client.default_retry();
        self.query(QueryKind::Layananku.into(), retry, |backend: Rc<B>| async move {
            backend
                .list_layananku()
                .await?
                .into_iter()
                .map(LayanankuRecord::try_from)
                .collect::<Result<Vec<_>, AsistenkuError>>()
        })
        .await
    }

    pub async fn create_layananku(
        &self,
        input: LayanankuInput,
    ) -> Result<LayanankuRecord, AsistenkuError> {
        let call = async {
            input.check()?;
            LayanankuRecord::try_from(self.backend.create_layananku(input).await?)
        };
        self.client.mutate(SAVE_LAYANANKU, call).await
    }

    pub async fn update_share_principals(
        &self,
        layananku_id: LayanankuId,
        principals: Vec<PrincipalId>,
    ) -> Result<LayanankuRecord, AsistenkuError> {
        let call = async {
            let wire = self.backend.update_share_principals(layananku_id, principals).await?;
            LayanankuRecord::try_from(wire)
        };
        self.client.mutate(SAVE_LAYANANKU, call).await
    }

    // --- Finance ---

    pub async fn financial_partners(&self) -> Result<Rc<Vec<FinancialPartner>>, AsistenkuError> {
        let retry = self.client.default_retry();
        self.query(QueryKind::FinancialPartners.into(), retry, |backend: Rc<B>| async move {
            backend.list_financial_partners().await
        })
        .await
    }
}
