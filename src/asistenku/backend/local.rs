// src/asistenku/backend/local.rs
//
// In-memory actor with the same authorization rules as the deployed backend.
// Used by tests and by local development without a replica.

use crate::backend::{BackendInterface, ProfileUpdate};
use crate::error::AsistenkuError;
use crate::models::common::{LayanankuId, PrincipalId, Rupiah, ServiceId, TaskId, TimestampNs};
use crate::models::layananku::{LayanankuInput, LayanankuRecord, MAX_SHARE_PRINCIPALS};
use crate::models::wire::{
    WireLayanankuPublic, WireLayanankuRecord, WireTaskRecord, WireUserProfile,
};
use crate::models::{
    ClientData, FinancialPartner, InternalData, PartnerData, RequestType, Role, RoleData, Service,
    TaskInput, TaskRecord, TaskStatusInternal, UserProfile, UserStatus,
};
use crate::utils::guards::{can_manage_users, is_valid_user_status};
use crate::utils::time::Clock;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll};
use validator::Validate;

/// Partner fee per completed task.
pub fn partner_fee(request_type: RequestType) -> Rupiah {
    match request_type {
        RequestType::Normal => 50_000,
        RequestType::Priority => 75_000,
        RequestType::Urgent => 100_000,
    }
}

fn denied() -> AsistenkuError {
    AsistenkuError::Backend("Akses ditolak".to_string())
}

#[derive(Default)]
struct LocalState {
    caller: Option<PrincipalId>,
    profiles: BTreeMap<PrincipalId, UserProfile>,
    /// Records served verbatim, tags included, ahead of `profiles`.
    raw_profiles: BTreeMap<PrincipalId, WireUserProfile>,
    tasks: BTreeMap<TaskId, TaskRecord>,
    services: BTreeMap<ServiceId, Service>,
    layananku: BTreeMap<LayanankuId, LayanankuRecord>,
    access_code: Option<String>,
    superadmin: Option<PrincipalId>,
    next_id: u64,
    calls: BTreeMap<&'static str, u32>,
    offline: bool,
    fail_next: Option<AsistenkuError>,
    latency_polls: u32,
}

impl LocalState {
    fn next_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{}-{}", prefix, self.next_id)
    }

    fn caller(&self) -> Result<PrincipalId, AsistenkuError> {
        self.caller
            .ok_or_else(|| AsistenkuError::Backend("Silakan login terlebih dahulu".to_string()))
    }

    /// Caller's profile, provided its status still allows access.
    fn caller_profile(&self) -> Result<&UserProfile, AsistenkuError> {
        let caller = self.caller()?;
        let profile = self
            .profiles
            .get(&caller)
            .ok_or_else(|| AsistenkuError::Backend("Profil tidak ditemukan".to_string()))?;
        if !is_valid_user_status(profile.status) {
            return Err(AsistenkuError::Backend(format!("Akun berstatus {}", profile.status)));
        }
        Ok(profile)
    }

    fn require_role(&self, allowed: impl Fn(Role) -> bool) -> Result<&UserProfile, AsistenkuError> {
        let profile = self.caller_profile()?;
        if allowed(profile.role) {
            Ok(profile)
        } else {
            Err(denied())
        }
    }

    fn register(
        &mut self,
        role: Role,
        status: UserStatus,
        data: RoleData,
        now: TimestampNs,
    ) -> Result<WireUserProfile, AsistenkuError> {
        let caller = self.caller()?;
        if self.profiles.contains_key(&caller) {
            return Err(AsistenkuError::Backend("Akun sudah terdaftar".to_string()));
        }
        if data.display_name().trim().is_empty() {
            return Err(AsistenkuError::InvalidInput("Nama wajib diisi".to_string()));
        }
        let profile = UserProfile {
            id: self.next_id("U"),
            principal_id: caller,
            role,
            status,
            data,
            created_at: now,
        };
        let wire = WireUserProfile::from_profile(&profile);
        self.profiles.insert(caller, profile);
        Ok(wire)
    }

    fn task_mut(&mut self, task_id: &str) -> Result<&mut TaskRecord, AsistenkuError> {
        self.tasks
            .get_mut(task_id)
            .ok_or_else(|| AsistenkuError::NotFound(format!("Task {}", task_id)))
    }

    fn can_see_task(&self, task: &TaskRecord) -> bool {
        match self.caller_profile() {
            Ok(profile) => {
                profile.role.is_internal()
                    || task.client_id == profile.principal_id
                    || task.assigned_partner_id == Some(profile.principal_id)
            }
            Err(_) => false,
        }
    }
}

/// Completes after being polled `remaining + 1` times, waking itself in
/// between. Models the actor's round trip so concurrent callers overlap.
struct RoundTrip {
    remaining: u32,
}

impl Future for RoundTrip {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.remaining == 0 {
            return Poll::Ready(());
        }
        self.remaining -= 1;
        cx.waker().wake_by_ref();
        Poll::Pending
    }
}

pub struct LocalBackend {
    state: RefCell<LocalState>,
    clock: Rc<dyn Clock>,
}

impl LocalBackend {
    pub fn new(clock: Rc<dyn Clock>) -> Self {
        Self {
            state: RefCell::new(LocalState::default()),
            clock,
        }
    }

    /// Sets the principal subsequent calls are made as. `None` is anonymous.
    pub fn set_caller(&self, caller: Option<PrincipalId>) {
        self.state.borrow_mut().caller = caller;
    }

    pub fn call_count(&self, operation: &str) -> u32 {
        self.state.borrow().calls.get(operation).copied().unwrap_or(0)
    }

    /// While offline every call fails with `ActorNotReady`.
    pub fn set_offline(&self, offline: bool) {
        self.state.borrow_mut().offline = offline;
    }

    /// Makes the next call fail with `error`, whatever the operation.
    pub fn fail_next(&self, error: AsistenkuError) {
        self.state.borrow_mut().fail_next = Some(error);
    }

    /// Number of extra polls every call takes before it answers.
    pub fn set_latency(&self, polls: u32) {
        self.state.borrow_mut().latency_polls = polls;
    }

    pub fn seed_access_code(&self, code: &str) {
        self.state.borrow_mut().access_code = Some(code.to_string());
    }

    /// Inserts a profile directly, bypassing registration rules.
    pub fn seed_profile(&self, profile: UserProfile) {
        self.state
            .borrow_mut()
            .profiles
            .insert(profile.principal_id, profile);
    }

    /// Serves `wire` as the profile of its principal exactly as given, so
    /// tags the client does not know can reach it.
    pub fn seed_raw_profile(&self, wire: WireUserProfile) {
        self.state
            .borrow_mut()
            .raw_profiles
            .insert(wire.principal_id, wire);
    }

    pub fn seed_service(&self, service: Service) {
        self.state
            .borrow_mut()
            .services
            .insert(service.id.clone(), service);
    }

    async fn enter(&self, operation: &'static str) -> Result<(), AsistenkuError> {
        let latency = {
            let mut state = self.state.borrow_mut();
            *state.calls.entry(operation).or_default() += 1;
            state.latency_polls
        };
        RoundTrip { remaining: latency }.await;

        let mut state = self.state.borrow_mut();
        if state.offline {
            return Err(AsistenkuError::ActorNotReady);
        }
        if let Some(error) = state.fail_next.take() {
            log_info!("LocalBackend: injected failure for {}", operation);
            return Err(error);
        }
        Ok(())
    }

    fn now(&self) -> TimestampNs {
        self.clock.now_ns()
    }
}

impl BackendInterface for LocalBackend {
    async fn get_caller_user_profile(&self) -> Result<Option<WireUserProfile>, AsistenkuError> {
        self.enter("getCallerUserProfile").await?;
        let state = self.state.borrow();
        let caller = match state.caller {
            Some(caller) => caller,
            None => return Ok(None),
        };
        if let Some(raw) = state.raw_profiles.get(&caller) {
            return Ok(Some(raw.clone()));
        }
        Ok(state.profiles.get(&caller).map(WireUserProfile::from_profile))
    }

    async fn get_user_profile(
        &self,
        principal: PrincipalId,
    ) -> Result<Option<WireUserProfile>, AsistenkuError> {
        self.enter("getUserProfile").await?;
        let state = self.state.borrow();
        let caller = state.caller_profile()?;
        if caller.principal_id != principal && !caller.role.is_internal() {
            return Err(denied());
        }
        Ok(state.profiles.get(&principal).map(WireUserProfile::from_profile))
    }

    async fn register_client(&self, data: ClientData) -> Result<WireUserProfile, AsistenkuError> {
        self.enter("registerClient").await?;
        let now = self.now();
        let mut state = self.state.borrow_mut();
        let wire = state.register(Role::Client, UserStatus::Active, RoleData::Client(data), now)?;
        log_info!("Registered client {}", wire.principal_id);
        Ok(wire)
    }

    async fn register_partner(&self, data: PartnerData) -> Result<WireUserProfile, AsistenkuError> {
        self.enter("registerPartner").await?;
        let now = self.now();
        let mut state = self.state.borrow_mut();
        let data = RoleData::Partner(data);
        let wire = state.register(Role::Partner, UserStatus::Pending, data, now)?;
        log_info!("Registered partner {} pending verification", wire.principal_id);
        Ok(wire)
    }

    async fn register_internal(
        &self,
        role: Role,
        data: InternalData,
    ) -> Result<WireUserProfile, AsistenkuError> {
        self.enter("registerInternal").await?;
        if !role.is_internal() || role == Role::Superadmin {
            return Err(AsistenkuError::Backend(format!(
                "Peran {} tidak dapat didaftarkan sebagai internal",
                role
            )));
        }
        let now = self.now();
        let mut state = self.state.borrow_mut();
        let wire = state.register(role, UserStatus::Pending, RoleData::Internal(data), now)?;
        Ok(wire)
    }

    async fn update_caller_profile(
        &self,
        update: ProfileUpdate,
    ) -> Result<WireUserProfile, AsistenkuError> {
        self.enter("updateCallerProfile").await?;
        update.validate()?;
        let mut state = self.state.borrow_mut();
        let caller = state.caller_profile()?.principal_id;
        let profile = state
            .profiles
            .get_mut(&caller)
            .ok_or_else(|| AsistenkuError::Backend("Profil tidak ditemukan".to_string()))?;
        let (name, email, whatsapp) = match &mut profile.data {
            RoleData::Client(data) => (&mut data.name, &mut data.email, &mut data.whatsapp),
            RoleData::Partner(data) => (&mut data.name, &mut data.email, &mut data.whatsapp),
            RoleData::Internal(data) => (&mut data.name, &mut data.email, &mut data.whatsapp),
        };
        if let Some(value) = update.name {
            *name = value;
        }
        if let Some(value) = update.email {
            *email = value;
        }
        if let Some(value) = update.whatsapp {
            *whatsapp = value;
        }
        Ok(WireUserProfile::from_profile(profile))
    }

    async fn list_users(&self) -> Result<Vec<WireUserProfile>, AsistenkuError> {
        self.enter("listUsers").await?;
        let state = self.state.borrow();
        state.require_role(can_manage_users)?;
        Ok(state.profiles.values().map(WireUserProfile::from_profile).collect())
    }

    async fn set_user_status(
        &self,
        principal: PrincipalId,
        status: UserStatus,
    ) -> Result<(), AsistenkuError> {
        self.enter("setUserStatus").await?;
        let mut state = self.state.borrow_mut();
        state.require_role(can_manage_users)?;
        if state.superadmin == Some(principal) {
            return Err(AsistenkuError::Backend("Status superadmin tidak dapat diubah".to_string()));
        }
        let profile = state
            .profiles
            .get_mut(&principal)
            .ok_or_else(|| AsistenkuError::NotFound(format!("Profil {}", principal)))?;
        profile.status = status;
        log_info!("Status of {} set to {}", principal, status);
        Ok(())
    }

    async fn assign_role(&self, principal: PrincipalId, role: Role) -> Result<(), AsistenkuError> {
        self.enter("assignRole").await?;
        let mut state = self.state.borrow_mut();
        state.require_role(can_manage_users)?;
        if role == Role::Superadmin {
            return Err(AsistenkuError::Backend("Superadmin hanya dapat diklaim".to_string()));
        }
        let profile = state
            .profiles
            .get_mut(&principal)
            .ok_or_else(|| AsistenkuError::NotFound(format!("Profil {}", principal)))?;
        if !profile.data.fits(role) {
            return Err(AsistenkuError::Backend(
                "Peran tidak sesuai dengan data profil".to_string(),
            ));
        }
        profile.role = role;
        log_info!("Role of {} set to {}", principal, role);
        Ok(())
    }

    async fn is_superadmin_claimed(&self) -> Result<bool, AsistenkuError> {
        self.enter("isSuperadminClaimed").await?;
        Ok(self.state.borrow().superadmin.is_some())
    }

    async fn claim_superadmin(&self) -> Result<bool, AsistenkuError> {
        self.enter("claimSuperadmin").await?;
        let now = self.now();
        let mut state = self.state.borrow_mut();
        let caller = state.caller()?;
        if state.superadmin.is_some() {
            log_warn!("Superadmin already claimed, refusing {}", caller);
            return Ok(false);
        }
        let fits = state
            .profiles
            .get(&caller)
            .map(|profile| profile.data.fits(Role::Superadmin));
        match fits {
            Some(true) => {
                if let Some(profile) = state.profiles.get_mut(&caller) {
                    profile.role = Role::Superadmin;
                    profile.status = UserStatus::Active;
                }
            }
            Some(false) => {
                return Err(AsistenkuError::Backend(
                    "Akun klien atau partner tidak dapat menjadi superadmin".to_string(),
                ))
            }
            None => {
                let profile = UserProfile {
                    id: state.next_id("U"),
                    principal_id: caller,
                    role: Role::Superadmin,
                    status: UserStatus::Active,
                    data: RoleData::Internal(InternalData {
                        name: "Superadmin".to_string(),
                        ..InternalData::default()
                    }),
                    created_at: now,
                };
                state.profiles.insert(caller, profile);
            }
        }
        state.superadmin = Some(caller);
        log_info!("Superadmin claimed by {}", caller);
        Ok(true)
    }

    async fn validate_internal_access_code(&self, code: String) -> Result<bool, AsistenkuError> {
        self.enter("validateInternalAccessCode").await?;
        let state = self.state.borrow();
        Ok(matches!(&state.access_code, Some(expected) if *expected == code.trim()))
    }

    async fn set_internal_access_code(&self, code: String) -> Result<(), AsistenkuError> {
        self.enter("setInternalAccessCode").await?;
        let mut state = self.state.borrow_mut();
        state.require_role(|role| role == Role::Superadmin)?;
        let code = code.trim();
        if code.len() < 6 {
            return Err(AsistenkuError::InvalidInput("Kode akses minimal 6 karakter".to_string()));
        }
        state.access_code = Some(code.to_string());
        log_info!("Internal access code rotated");
        Ok(())
    }

    async fn create_task(&self, input: TaskInput) -> Result<WireTaskRecord, AsistenkuError> {
        self.enter("createTask").await?;
        input.validate()?;
        if input.title.trim().is_empty() {
            return Err(AsistenkuError::InvalidInput("Judul permintaan wajib diisi".to_string()));
        }
        let now = self.now();
        let mut state = self.state.borrow_mut();
        let client_id = state.require_role(|role| role == Role::Client)?.principal_id;
        let task = TaskRecord {
            task_id: state.next_id("T"),
            client_id,
            title: input.title.trim().to_string(),
            description: input.description,
            request_type: input.request_type,
            status_internal: TaskStatusInternal::Requested,
            client_deadline: input.client_deadline,
            internal_deadline: None,
            assigned_partner_id: None,
            assigned_asistenmu_name: None,
            created_at: now,
            updated_at: now,
        };
        log_info!("Task {} created by {} ({})", task.task_id, client_id, task.request_type);
        let wire = WireTaskRecord::from_task(&task);
        state.tasks.insert(task.task_id.clone(), task);
        Ok(wire)
    }

    async fn get_task(&self, task_id: TaskId) -> Result<Option<WireTaskRecord>, AsistenkuError> {
        self.enter("getTask").await?;
        let state = self.state.borrow();
        Ok(state
            .tasks
            .get(&task_id)
            .filter(|task| state.can_see_task(task))
            .map(WireTaskRecord::from_task))
    }

    async fn list_my_tasks(&self) -> Result<Vec<WireTaskRecord>, AsistenkuError> {
        self.enter("listMyTasks").await?;
        let state = self.state.borrow();
        let caller = state.caller_profile()?.principal_id;
        Ok(state
            .tasks
            .values()
            .filter(|task| task.client_id == caller)
            .map(WireTaskRecord::from_task)
            .collect())
    }

    async fn list_all_tasks(&self) -> Result<Vec<WireTaskRecord>, AsistenkuError> {
        self.enter("listAllTasks").await?;
        let state = self.state.borrow();
        state.require_role(|role| role.is_internal())?;
        Ok(state.tasks.values().map(WireTaskRecord::from_task).collect())
    }

    async fn list_partner_tasks(&self) -> Result<Vec<WireTaskRecord>, AsistenkuError> {
        self.enter("listPartnerTasks").await?;
        let state = self.state.borrow();
        let partner = state.require_role(|role| role == Role::Partner)?.principal_id;
        Ok(state
            .tasks
            .values()
            .filter(|task| task.assigned_partner_id == Some(partner))
            .map(WireTaskRecord::from_task)
            .collect())
    }

    async fn update_task_status(
        &self,
        task_id: TaskId,
        status: TaskStatusInternal,
    ) -> Result<WireTaskRecord, AsistenkuError> {
        self.enter("updateTaskStatus").await?;
        let now = self.now();
        let mut state = self.state.borrow_mut();
        let (caller, role) = {
            let profile = state.caller_profile()?;
            (profile.principal_id, profile.role)
        };
        let task = state.task_mut(&task_id)?;
        let allowed = match role {
            Role::Partner => {
                task.assigned_partner_id == Some(caller)
                    && matches!(
                        status,
                        TaskStatusInternal::Requested
                            | TaskStatusInternal::InProgress
                            | TaskStatusInternal::QaAsistenmu
                    )
            }
            Role::Client => {
                task.client_id == caller
                    && matches!(status, TaskStatusInternal::Revision | TaskStatusInternal::Done)
            }
            _ => true,
        };
        if !allowed {
            return Err(denied());
        }
        if status == TaskStatusInternal::Requested && role == Role::Partner {
            task.assigned_partner_id = None;
        }
        task.status_internal = status;
        task.updated_at = now;
        log_info!("Task {} moved to {} by {}", task_id, status, caller);
        Ok(WireTaskRecord::from_task(task))
    }

    async fn assign_partner(
        &self,
        task_id: TaskId,
        partner: PrincipalId,
    ) -> Result<WireTaskRecord, AsistenkuError> {
        self.enter("assignPartner").await?;
        let now = self.now();
        let mut state = self.state.borrow_mut();
        state.require_role(|role| role.is_internal())?;
        match state.profiles.get(&partner) {
            Some(profile)
                if profile.role == Role::Partner && is_valid_user_status(profile.status) => {}
            _ => return Err(AsistenkuError::Backend("Partner tidak valid".to_string())),
        }
        let task = state.task_mut(&task_id)?;
        task.assigned_partner_id = Some(partner);
        task.updated_at = now;
        Ok(WireTaskRecord::from_task(task))
    }

    async fn assign_asistenmu(
        &self,
        task_id: TaskId,
        name: String,
    ) -> Result<WireTaskRecord, AsistenkuError> {
        self.enter("assignAsistenmu").await?;
        let now = self.now();
        let mut state = self.state.borrow_mut();
        state.require_role(|role| role.is_internal())?;
        let name = name.trim().to_string();
        let task = state.task_mut(&task_id)?;
        task.assigned_asistenmu_name = if name.is_empty() { None } else { Some(name) };
        task.updated_at = now;
        Ok(WireTaskRecord::from_task(task))
    }

    async fn set_internal_deadline(
        &self,
        task_id: TaskId,
        deadline: Option<TimestampNs>,
    ) -> Result<WireTaskRecord, AsistenkuError> {
        self.enter("setInternalDeadline").await?;
        let now = self.now();
        let mut state = self.state.borrow_mut();
        state.require_role(|role| role.is_internal())?;
        let task = state.task_mut(&task_id)?;
        task.internal_deadline = deadline;
        task.updated_at = now;
        Ok(WireTaskRecord::from_task(task))
    }

    async fn list_services(&self) -> Result<Vec<Service>, AsistenkuError> {
        self.enter("listServices").await?;
        Ok(self.state.borrow().services.values().cloned().collect())
    }

    async fn get_service(&self, service_id: ServiceId) -> Result<Option<Service>, AsistenkuError> {
        self.enter("getService").await?;
        Ok(self.state.borrow().services.get(&service_id).cloned())
    }

    async fn upsert_service(&self, mut service: Service) -> Result<Service, AsistenkuError> {
        self.enter("upsertService").await?;
        service.validate()?;
        let mut state = self.state.borrow_mut();
        state.require_role(can_manage_users)?;
        if service.id.trim().is_empty() {
            service.id = state.next_id("S");
        }
        state.services.insert(service.id.clone(), service.clone());
        Ok(service)
    }

    async fn get_my_layananku(&self) -> Result<Option<WireLayanankuPublic>, AsistenkuError> {
        self.enter("getMyLayananku").await?;
        let now = self.now();
        let state = self.state.borrow();
        let caller = state.caller_profile()?.principal_id;
        let mut mine: Vec<&LayanankuRecord> = state
            .layananku
            .values()
            .filter(|record| {
                record.client_id == caller || record.share_principals.contains(&caller)
            })
            .collect();
        // Active subscriptions first, then the latest to end.
        mine.sort_by_key(|record| (!record.is_active_at(now), std::cmp::Reverse(record.end_at)));
        Ok(mine
            .first()
            .map(|record| WireLayanankuPublic::from_public(&record.to_public())))
    }

    async fn list_layananku(&self) -> Result<Vec<WireLayanankuRecord>, AsistenkuError> {
        self.enter("listLayananku").await?;
        let state = self.state.borrow();
        state.require_role(|role| role.is_internal())?;
        Ok(state.layananku.values().map(WireLayanankuRecord::from_record).collect())
    }

    async fn create_layananku(
        &self,
        input: LayanankuInput,
    ) -> Result<WireLayanankuRecord, AsistenkuError> {
        self.enter("createLayananku").await?;
        input.check()?;
        let mut state = self.state.borrow_mut();
        state.require_role(|role| {
            matches!(role, Role::Admin | Role::Superadmin | Role::Asistenmu)
        })?;
        match state.profiles.get(&input.client_id) {
            Some(profile) if profile.role == Role::Client => {}
            _ => return Err(AsistenkuError::Backend("Klien tidak ditemukan".to_string())),
        }
        let record = LayanankuRecord {
            id: state.next_id("L"),
            client_id: input.client_id,
            kind: input.kind,
            start_at: input.start_at,
            end_at: input.end_at,
            share_principals: dedup(input.share_principals),
            asistenmu_principal: input.asistenmu_principal,
            asistenmu_name: input.asistenmu_name,
        };
        let wire = WireLayanankuRecord::from_record(&record);
        state.layananku.insert(record.id.clone(), record);
        Ok(wire)
    }

    async fn update_share_principals(
        &self,
        layananku_id: LayanankuId,
        principals: Vec<PrincipalId>,
    ) -> Result<WireLayanankuRecord, AsistenkuError> {
        self.enter("updateSharePrincipals").await?;
        let principals = dedup(principals);
        if principals.len() > MAX_SHARE_PRINCIPALS {
            return Err(AsistenkuError::Backend(format!(
                "Maksimal {} akun dapat dibagikan",
                MAX_SHARE_PRINCIPALS
            )));
        }
        let mut state = self.state.borrow_mut();
        let (caller, internal) = {
            let profile = state.caller_profile()?;
            (profile.principal_id, profile.role.is_internal())
        };
        let record = state
            .layananku
            .get_mut(&layananku_id)
            .ok_or_else(|| AsistenkuError::NotFound(format!("Layananku {}", layananku_id)))?;
        if record.client_id != caller && !internal {
            return Err(denied());
        }
        record.share_principals = principals;
        Ok(WireLayanankuRecord::from_record(record))
    }

    async fn list_financial_partners(&self) -> Result<Vec<FinancialPartner>, AsistenkuError> {
        self.enter("listFinancialPartners").await?;
        let state = self.state.borrow();
        state.require_role(|role| {
            matches!(role, Role::Finance | Role::Management | Role::Admin | Role::Superadmin)
        })?;
        let partners = state
            .profiles
            .values()
            .filter(|profile| profile.role == Role::Partner)
            .map(|profile| {
                let done = state
                    .tasks
                    .values()
                    .filter(|task| {
                        task.assigned_partner_id == Some(profile.principal_id) && task.is_done()
                    });
                let (completed_tasks, total_earnings) = done.fold((0u32, 0), |(count, sum), task| {
                    (count + 1, sum + partner_fee(task.request_type))
                });
                FinancialPartner {
                    principal_id: profile.principal_id,
                    name: profile.display_name().to_string(),
                    completed_tasks,
                    total_earnings,
                    pending_payout: total_earnings,
                }
            })
            .collect();
        Ok(partners)
    }
}

fn dedup(principals: Vec<PrincipalId>) -> Vec<PrincipalId> {
    let mut unique = Vec::with_capacity(principals.len());
    for principal in principals {
        if !unique.contains(&principal) {
            unique.push(principal);
        }
    }
    unique
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::layananku::LayananKind;
    use crate::utils::time::ManualClock;
    use candid::Principal;
    use futures::executor::block_on;

    fn principal(n: u8) -> Principal {
        Principal::from_slice(&[n])
    }

    fn backend() -> LocalBackend {
        LocalBackend::new(Rc::new(ManualClock::new(1_700_000_000_000)))
    }

    fn client(name: &str) -> ClientData {
        ClientData {
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            whatsapp: "081234567890".to_string(),
            company: None,
        }
    }

    #[test]
    fn registration_is_once_per_principal() {
        let backend = backend();
        backend.set_caller(Some(principal(1)));
        let wire = block_on(backend.register_client(client("Budi"))).expect("registers");
        assert_eq!(wire.status, "#active");
        assert_eq!(
            block_on(backend.register_partner(PartnerData::default())),
            Err(AsistenkuError::Backend("Akun sudah terdaftar".to_string()))
        );
    }

    #[test]
    fn internal_registration_refuses_public_roles() {
        let backend = backend();
        backend.set_caller(Some(principal(2)));
        for role in [Role::Client, Role::Partner, Role::Superadmin] {
            let data = InternalData {
                name: "Sari".to_string(),
                ..InternalData::default()
            };
            assert!(block_on(backend.register_internal(role, data)).is_err());
        }
    }

    #[test]
    fn superadmin_is_claimed_once() {
        let backend = backend();
        backend.set_caller(Some(principal(3)));
        assert_eq!(block_on(backend.claim_superadmin()), Ok(true));
        backend.set_caller(Some(principal(4)));
        assert_eq!(block_on(backend.claim_superadmin()), Ok(false));
        assert_eq!(block_on(backend.is_superadmin_claimed()), Ok(true));
    }

    #[test]
    fn only_managers_assign_roles() {
        let backend = backend();
        backend.set_caller(Some(principal(5)));
        block_on(backend.register_client(client("Ani"))).expect("registers");
        assert_eq!(block_on(backend.assign_role(principal(5), Role::Admin)), Err(denied()));

        backend.set_caller(Some(principal(6)));
        block_on(backend.claim_superadmin()).expect("claims");
        // Client payload cannot carry an internal role.
        assert!(block_on(backend.assign_role(principal(5), Role::Admin)).is_err());
        assert_eq!(block_on(backend.set_user_status(principal(5), UserStatus::Suspended)), Ok(()));
    }

    #[test]
    fn share_principals_are_capped() {
        let backend = backend();
        backend.set_caller(Some(principal(10)));
        block_on(backend.register_client(client("Dewi"))).expect("registers");
        backend.set_caller(Some(principal(11)));
        block_on(backend.claim_superadmin()).expect("claims");
        let record = block_on(backend.create_layananku(LayanankuInput {
            client_id: principal(10),
            kind: LayananKind::Rapi,
            start_at: 1,
            end_at: u64::MAX,
            share_principals: vec![principal(20), principal(20)],
            asistenmu_principal: None,
            asistenmu_name: Some("Rina".to_string()),
        }))
        .expect("creates");
        assert_eq!(record.share_principals.len(), 1);

        backend.set_caller(Some(principal(10)));
        let seven: Vec<Principal> = (30..37).map(principal).collect();
        assert!(block_on(backend.update_share_principals(record.id.clone(), seven)).is_err());
        let public = block_on(backend.get_my_layananku()).expect("query").expect("has one");
        assert_eq!(public.share_count, 1);
        assert_eq!(public.kind, "#RAPI");
    }

    #[test]
    fn offline_and_injected_failures() {
        let backend = backend();
        backend.set_offline(true);
        assert_eq!(block_on(backend.list_services()), Err(AsistenkuError::ActorNotReady));
        backend.set_offline(false);
        backend.fail_next(AsistenkuError::Rejected("boom".to_string()));
        assert!(block_on(backend.list_services()).is_err());
        assert_eq!(block_on(backend.list_services()), Ok(vec![]));
        assert_eq!(backend.call_count("listServices"), 3);
    }

    #[test]
    fn earnings_follow_completed_tasks() {
        let backend = backend();
        backend.set_caller(Some(principal(40)));
        block_on(backend.register_client(client("Eko"))).expect("registers");
        let input = TaskInput::new("Fix invoice", "", RequestType::Urgent);
        let task = block_on(backend.create_task(input)).expect("task");

        backend.set_caller(Some(principal(41)));
        block_on(backend.register_partner(PartnerData {
            name: "Putri".to_string(),
            ..PartnerData::default()
        }))
        .expect("partner");

        backend.set_caller(Some(principal(42)));
        block_on(backend.claim_superadmin()).expect("claims");
        block_on(backend.assign_partner(task.task_id.clone(), principal(41))).expect("assigned");
        block_on(backend.update_task_status(task.task_id.clone(), TaskStatusInternal::Done))
            .expect("done");

        let partners = block_on(backend.list_financial_partners()).expect("finance");
        assert_eq!(partners.len(), 1);
        assert_eq!(partners[0].completed_tasks, 1);
        assert_eq!(partners[0].total_earnings, partner_fee(RequestType::Urgent));
    }
}
