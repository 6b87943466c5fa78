// src/asistenku/models/wire.rs
//
// Records exactly as the backend actor returns them. Variant fields are kept
// as received tags and are normalized into the closed domain enums here, on
// receipt.

use crate::error::AsistenkuError;
use crate::models::common::{LayanankuId, PrincipalId, ProfileId, TaskId, TimestampNs};
use crate::models::layananku::{LayananKind, LayanankuPublic, LayanankuRecord};
use crate::models::task::{RequestType, TaskRecord, TaskStatusInternal};
use crate::models::user_profile::{
    ClientData, InternalData, PartnerData, Role, RoleData, UserProfile, UserStatus,
};
use crate::models::variant::Tag;
use candid::CandidType;
use serde::{Deserialize, Serialize};

/// Renders a tag the way the backend does when it sends variants as text.
pub fn backend_tag(tag: &str) -> String {
    format!("#{}", tag)
}

#[derive(CandidType, Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct WireUserProfile {
    pub id: ProfileId,
    #[serde(rename = "principalId")]
    pub principal_id: PrincipalId,
    pub role: Tag<Role>,
    pub status: Tag<UserStatus>,
    #[serde(rename = "createdAt")]
    pub created_at: TimestampNs,
    #[serde(rename = "clientData")]
    pub client_data: Option<ClientData>,
    #[serde(rename = "partnerData")]
    pub partner_data: Option<PartnerData>,
    #[serde(rename = "internalData")]
    pub internal_data: Option<InternalData>,
}

impl WireUserProfile {
    pub fn from_profile(profile: &UserProfile) -> Self {
        let (client_data, partner_data, internal_data) = match &profile.data {
            RoleData::Client(data) => (Some(data.clone()), None, None),
            RoleData::Partner(data) => (None, Some(data.clone()), None),
            RoleData::Internal(data) => (None, None, Some(data.clone())),
        };
        Self {
            id: profile.id.clone(),
            principal_id: profile.principal_id,
            role: Tag::new(profile.role.as_str()),
            status: Tag::new(backend_tag(profile.status.as_str())),
            created_at: profile.created_at,
            client_data,
            partner_data,
            internal_data,
        }
    }
}

impl TryFrom<WireUserProfile> for UserProfile {
    type Error = AsistenkuError;

    fn try_from(wire: WireUserProfile) -> Result<Self, Self::Error> {
        let role: Role = wire.role.as_str().parse()?;
        let status: UserStatus = wire.status.as_str().parse()?;

        let mut payloads = Vec::with_capacity(1);
        if let Some(data) = wire.client_data {
            payloads.push(RoleData::Client(data));
        }
        if let Some(data) = wire.partner_data {
            payloads.push(RoleData::Partner(data));
        }
        if let Some(data) = wire.internal_data {
            payloads.push(RoleData::Internal(data));
        }
        if payloads.len() != 1 {
            return Err(AsistenkuError::Decode(format!(
                "profile {} carries {} role payloads, expected exactly one",
                wire.id,
                payloads.len()
            )));
        }
        let data = payloads.remove(0);
        if !data.fits(role) {
            return Err(AsistenkuError::Decode(format!(
                "profile {} has a payload that does not match role {}",
                wire.id, role
            )));
        }

        Ok(UserProfile {
            id: wire.id,
            principal_id: wire.principal_id,
            role,
            status,
            data,
            created_at: wire.created_at,
        })
    }
}

#[derive(CandidType, Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct WireTaskRecord {
    #[serde(rename = "taskId")]
    pub task_id: TaskId,
    #[serde(rename = "clientId")]
    pub client_id: PrincipalId,
    pub title: String,
    pub description: String,
    #[serde(rename = "requestType")]
    pub request_type: Tag<RequestType>,
    #[serde(rename = "statusInternal")]
    pub status_internal: Tag<TaskStatusInternal>,
    #[serde(rename = "clientDeadline")]
    pub client_deadline: Option<TimestampNs>,
    #[serde(rename = "internalDeadline")]
    pub internal_deadline: Option<TimestampNs>,
    #[serde(rename = "assignedPartnerId")]
    pub assigned_partner_id: Option<PrincipalId>,
    #[serde(rename = "assignedAsistenmuName")]
    pub assigned_asistenmu_name: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: TimestampNs,
    #[serde(rename = "updatedAt")]
    pub updated_at: TimestampNs,
}

impl WireTaskRecord {
    pub fn from_task(task: &TaskRecord) -> Self {
        Self {
            task_id: task.task_id.clone(),
            client_id: task.client_id,
            title: task.title.clone(),
            description: task.description.clone(),
            request_type: Tag::new(backend_tag(task.request_type.as_str())),
            status_internal: Tag::new(backend_tag(task.status_internal.as_str())),
            client_deadline: task.client_deadline,
            internal_deadline: task.internal_deadline,
            assigned_partner_id: task.assigned_partner_id,
            assigned_asistenmu_name: task.assigned_asistenmu_name.clone(),
            created_at: task.created_at,
            updated_at: task.updated_at,
        }
    }
}

impl From<WireTaskRecord> for TaskRecord {
    fn from(wire: WireTaskRecord) -> Self {
        let request_type = wire.request_type.as_str().parse().unwrap_or_else(|_| {
            log_warn!(
                "Task {} has unrecognized request type {:?}, treating as NORMAL",
                wire.task_id,
                wire.request_type
            );
            RequestType::Normal
        });
        TaskRecord {
            status_internal: TaskStatusInternal::from_tag_lossy(wire.status_internal.as_str()),
            request_type,
            task_id: wire.task_id,
            client_id: wire.client_id,
            title: wire.title,
            description: wire.description,
            client_deadline: wire.client_deadline,
            internal_deadline: wire.internal_deadline,
            assigned_partner_id: wire.assigned_partner_id,
            assigned_asistenmu_name: wire.assigned_asistenmu_name,
            created_at: wire.created_at,
            updated_at: wire.updated_at,
        }
    }
}

#[derive(CandidType, Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct WireLayanankuRecord {
    pub id: LayanankuId,
    #[serde(rename = "clientId")]
    pub client_id: PrincipalId,
    pub kind: Tag<LayananKind>,
    #[serde(rename = "startAt")]
    pub start_at: TimestampNs,
    #[serde(rename = "endAt")]
    pub end_at: TimestampNs,
    #[serde(rename = "sharePrincipals")]
    pub share_principals: Vec<PrincipalId>,
    #[serde(rename = "asistenmuPrincipal")]
    pub asistenmu_principal: Option<PrincipalId>,
    #[serde(rename = "asistenmuName")]
    pub asistenmu_name: Option<String>,
}

impl WireLayanankuRecord {
    pub fn from_record(record: &LayanankuRecord) -> Self {
        Self {
            id: record.id.clone(),
            client_id: record.client_id,
            kind: Tag::new(backend_tag(record.kind.as_str())),
            start_at: record.start_at,
            end_at: record.end_at,
            share_principals: record.share_principals.clone(),
            asistenmu_principal: record.asistenmu_principal,
            asistenmu_name: record.asistenmu_name.clone(),
        }
    }
}

impl TryFrom<WireLayanankuRecord> for LayanankuRecord {
    type Error = AsistenkuError;

    fn try_from(wire: WireLayanankuRecord) -> Result<Self, Self::Error> {
        let kind: LayananKind = wire.kind.as_str().parse()?;
        Ok(LayanankuRecord {
            id: wire.id,
            client_id: wire.client_id,
            kind,
            start_at: wire.start_at,
            end_at: wire.end_at,
            share_principals: wire.share_principals,
            asistenmu_principal: wire.asistenmu_principal,
            asistenmu_name: wire.asistenmu_name,
        })
    }
}

#[derive(CandidType, Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct WireLayanankuPublic {
    pub id: LayanankuId,
    pub kind: Tag<LayananKind>,
    #[serde(rename = "startAt")]
    pub start_at: TimestampNs,
    #[serde(rename = "endAt")]
    pub end_at: TimestampNs,
    #[serde(rename = "shareCount")]
    pub share_count: u32,
    #[serde(rename = "asistenmuName")]
    pub asistenmu_name: Option<String>,
}

impl WireLayanankuPublic {
    pub fn from_public(public: &LayanankuPublic) -> Self {
        Self {
            id: public.id.clone(),
            kind: Tag::new(backend_tag(public.kind.as_str())),
            start_at: public.start_at,
            end_at: public.end_at,
            share_count: public.share_count,
            asistenmu_name: public.asistenmu_name.clone(),
        }
    }
}

impl TryFrom<WireLayanankuPublic> for LayanankuPublic {
    type Error = AsistenkuError;

    fn try_from(wire: WireLayanankuPublic) -> Result<Self, Self::Error> {
        Ok(LayanankuPublic {
            kind: wire.kind.as_str().parse()?,
            id: wire.id,
            start_at: wire.start_at,
            end_at: wire.end_at,
            share_count: wire.share_count,
            asistenmu_name: wire.asistenmu_name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CLIENT_JSON: &str = r##"{
        "id": "U-1",
        "principalId": "2vxsx-fae",
        "role": "client",
        "status": "#active",
        "createdAt": 1,
        "clientData": {
            "name": "Budi", "email": "budi@example.com", "whatsapp": "0812", "company": null
        }
    }"##;

    #[test]
    fn decodes_json_profile_with_tagged_status() {
        let wire: WireUserProfile = serde_json::from_str(CLIENT_JSON).expect("valid profile json");
        let profile = UserProfile::try_from(wire).expect("normalizes");
        assert_eq!(profile.role, Role::Client);
        assert_eq!(profile.status, UserStatus::Active);
        assert_eq!(profile.display_name(), "Budi");
    }

    #[test]
    fn object_shaped_status_is_accepted() {
        let json = CLIENT_JSON.replace(r##""#active""##, r#"{"pending": null}"#);
        let wire: WireUserProfile = serde_json::from_str(&json).expect("valid profile json");
        assert_eq!(UserProfile::try_from(wire).map(|p| p.status), Ok(UserStatus::Pending));
    }

    #[test]
    fn mismatched_payload_is_rejected() {
        let mut wire: WireUserProfile = serde_json::from_str(CLIENT_JSON).expect("valid json");
        wire.role = Tag::new("PARTNER");
        assert!(matches!(UserProfile::try_from(wire), Err(AsistenkuError::Decode(_))));
    }

    #[test]
    fn two_payloads_are_rejected() {
        let mut wire: WireUserProfile = serde_json::from_str(CLIENT_JSON).expect("valid json");
        wire.internal_data = Some(InternalData::default());
        assert!(matches!(UserProfile::try_from(wire), Err(AsistenkuError::Decode(_))));
    }

    #[test]
    fn task_tags_normalize() {
        let json = r##"{
            "taskId": "T-1", "clientId": "2vxsx-fae", "title": "Fix invoice", "description": "...",
            "requestType": {"URGENT": null}, "statusInternal": "#IN_PROGRESS",
            "createdAt": 5, "updatedAt": 5
        }"##;
        let wire: WireTaskRecord = serde_json::from_str(json).expect("valid task json");
        let task = TaskRecord::from(wire);
        assert_eq!(task.request_type, RequestType::Urgent);
        assert_eq!(task.status_internal, TaskStatusInternal::InProgress);
        assert_eq!(task.effective_deadline(), None);
    }

    /// Profile record shaped like the actor's candid declaration.
    #[derive(CandidType, Deserialize)]
    struct ActorProfile {
        id: String,
        #[serde(rename = "principalId")]
        principal_id: PrincipalId,
        role: Role,
        status: UserStatus,
        #[serde(rename = "createdAt")]
        created_at: TimestampNs,
        #[serde(rename = "clientData")]
        client_data: Option<ClientData>,
        #[serde(rename = "partnerData")]
        partner_data: Option<PartnerData>,
        #[serde(rename = "internalData")]
        internal_data: Option<InternalData>,
    }

    #[test]
    fn decodes_candid_profile_with_variant_tags() {
        let actor = ActorProfile {
            id: "U-7".to_string(),
            principal_id: candid::Principal::anonymous(),
            role: Role::Client,
            status: UserStatus::Active,
            created_at: 9,
            client_data: Some(ClientData {
                name: "Budi".to_string(),
                ..ClientData::default()
            }),
            partner_data: None,
            internal_data: None,
        };
        let bytes = candid::encode_one(&actor).expect("encodes");
        let wire: WireUserProfile = candid::decode_one(&bytes).expect("variant fields decode");
        assert_eq!(wire.role.as_str(), "CLIENT");
        assert_eq!(wire.status.as_str(), "active");

        let profile = UserProfile::try_from(wire).expect("normalizes");
        assert_eq!(profile.role, Role::Client);
        assert_eq!(profile.status, UserStatus::Active);
    }

    #[test]
    fn outgoing_records_carry_variants() {
        let task = TaskRecord::from(serde_json::from_str::<WireTaskRecord>(
            r##"{
                "taskId": "T-2", "clientId": "2vxsx-fae", "title": "Rekap", "description": "",
                "requestType": "#PRIORITY", "statusInternal": "#REVISION",
                "createdAt": 1, "updatedAt": 2
            }"##,
        )
        .expect("valid task json"));
        let bytes = candid::encode_one(WireTaskRecord::from_task(&task)).expect("encodes");
        let back: WireTaskRecord = candid::decode_one(&bytes).expect("decodes");
        assert_eq!(back.request_type.as_str(), "PRIORITY");
        assert_eq!(back.status_internal.as_str(), "REVISION");
    }
}
