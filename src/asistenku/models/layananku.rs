// src/asistenku/models/layananku.rs
use crate::error::AsistenkuError;
use crate::models::common::{LayanankuId, PrincipalId, TimestampNs};
use crate::utils::guards::normalize_tag;
use candid::CandidType;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use validator::Validate;

/// A subscription may be shared with at most this many extra principals.
pub const MAX_SHARE_PRINCIPALS: usize = 6;

#[derive(CandidType, Deserialize, Serialize, Clone, Debug, PartialEq, Eq, Copy)]
pub enum LayananKind {
    #[serde(rename = "TENANG")]
    Tenang,
    #[serde(rename = "RAPI")]
    Rapi,
    #[serde(rename = "FOKUS")]
    Fokus,
    #[serde(rename = "JAGA")]
    Jaga,
}

impl LayananKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LayananKind::Tenang => "TENANG",
            LayananKind::Rapi => "RAPI",
            LayananKind::Fokus => "FOKUS",
            LayananKind::Jaga => "JAGA",
        }
    }
}

impl FromStr for LayananKind {
    type Err = AsistenkuError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_tag(s).as_str() {
            "TENANG" => Ok(LayananKind::Tenang),
            "RAPI" => Ok(LayananKind::Rapi),
            "FOKUS" => Ok(LayananKind::Fokus),
            "JAGA" => Ok(LayananKind::Jaga),
            _ => Err(AsistenkuError::Decode(format!("unknown layanan kind {:?}", s))),
        }
    }
}

/// Full subscription record, as seen by staff.
#[derive(CandidType, Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct LayanankuRecord {
    pub id: LayanankuId,
    pub client_id: PrincipalId,
    pub kind: LayananKind,
    pub start_at: TimestampNs,
    pub end_at: TimestampNs,
    pub share_principals: Vec<PrincipalId>,
    pub asistenmu_principal: Option<PrincipalId>,
    pub asistenmu_name: Option<String>,
}

impl LayanankuRecord {
    pub fn is_active_at(&self, now: TimestampNs) -> bool {
        self.start_at <= now && now <= self.end_at
    }

    pub fn to_public(&self) -> LayanankuPublic {
        LayanankuPublic {
            id: self.id.clone(),
            kind: self.kind,
            start_at: self.start_at,
            end_at: self.end_at,
            share_count: self.share_principals.len() as u32,
            asistenmu_name: self.asistenmu_name.clone(),
        }
    }
}

/// Client-facing view of a subscription; share principals are not exposed.
#[derive(CandidType, Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct LayanankuPublic {
    pub id: LayanankuId,
    pub kind: LayananKind,
    pub start_at: TimestampNs,
    pub end_at: TimestampNs,
    pub share_count: u32,
    pub asistenmu_name: Option<String>,
}

impl LayanankuPublic {
    pub fn is_active_at(&self, now: TimestampNs) -> bool {
        self.start_at <= now && now <= self.end_at
    }
}

#[derive(CandidType, Deserialize, Serialize, Clone, Debug, PartialEq, Eq, Validate)]
pub struct LayanankuInput {
    #[serde(rename = "clientId")]
    pub client_id: PrincipalId,
    pub kind: LayananKind,
    #[serde(rename = "startAt")]
    pub start_at: TimestampNs,
    #[serde(rename = "endAt")]
    pub end_at: TimestampNs,
    #[serde(rename = "sharePrincipals")]
    #[validate(length(max = 6))]
    pub share_principals: Vec<PrincipalId>,
    #[serde(rename = "asistenmuPrincipal")]
    pub asistenmu_principal: Option<PrincipalId>,
    #[serde(rename = "asistenmuName")]
    pub asistenmu_name: Option<String>,
}

impl LayanankuInput {
    pub fn check(&self) -> Result<(), AsistenkuError> {
        self.validate()?;
        if self.end_at <= self.start_at {
            return Err(AsistenkuError::InvalidInput(
                "Layananku must end after it starts".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use candid::Principal;

    fn input(shares: usize) -> LayanankuInput {
        LayanankuInput {
            client_id: Principal::anonymous(),
            kind: LayananKind::Fokus,
            start_at: 10,
            end_at: 20,
            share_principals: (0..shares).map(|i| Principal::from_slice(&[i as u8 + 1])).collect(),
            asistenmu_principal: None,
            asistenmu_name: Some("Rina".to_string()),
        }
    }

    #[test]
    fn share_limit_is_six() {
        assert!(input(MAX_SHARE_PRINCIPALS).check().is_ok());
        assert!(matches!(
            input(MAX_SHARE_PRINCIPALS + 1).check(),
            Err(AsistenkuError::InvalidInput(_))
        ));
    }

    #[test]
    fn window_must_be_ordered() {
        let mut bad = input(0);
        bad.end_at = bad.start_at;
        assert!(bad.check().is_err());
    }

    #[test]
    fn public_view_counts_shares() {
        let record = LayanankuRecord {
            id: "L-1".to_string(),
            client_id: Principal::anonymous(),
            kind: LayananKind::Jaga,
            start_at: 100,
            end_at: 200,
            share_principals: vec![Principal::from_slice(&[9]); 3],
            asistenmu_principal: None,
            asistenmu_name: None,
        };
        let public = record.to_public();
        assert_eq!(public.share_count, 3);
        assert!(public.is_active_at(150));
        assert!(!public.is_active_at(201));
    }
}
