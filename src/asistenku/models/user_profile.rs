// src/asistenku/models/user_profile.rs
use crate::error::AsistenkuError;
use crate::models::common::{PrincipalId, ProfileId, TimestampNs};
use crate::utils::guards::{normalize_role, normalize_status_tag};
use candid::CandidType;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(CandidType, Deserialize, Serialize, Clone, Debug, PartialEq, Eq, Hash, Copy)]
pub enum Role {
    #[serde(rename = "CLIENT")]
    Client,
    #[serde(rename = "PARTNER")]
    Partner,
    #[serde(rename = "ADMIN")]
    Admin,
    #[serde(rename = "ASISTENMU")]
    Asistenmu,
    #[serde(rename = "SUPERVISOR")]
    Supervisor,
    #[serde(rename = "MANAGEMENT")]
    Management,
    #[serde(rename = "FINANCE")]
    Finance,
    #[serde(rename = "CUSTOMER_SERVICE")]
    CustomerService,
    #[serde(rename = "SUPERADMIN")]
    Superadmin,
}

impl Role {
    pub const ALL: [Role; 9] = [
        Role::Client,
        Role::Partner,
        Role::Admin,
        Role::Asistenmu,
        Role::Supervisor,
        Role::Management,
        Role::Finance,
        Role::CustomerService,
        Role::Superadmin,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Client => "CLIENT",
            Role::Partner => "PARTNER",
            Role::Admin => "ADMIN",
            Role::Asistenmu => "ASISTENMU",
            Role::Supervisor => "SUPERVISOR",
            Role::Management => "MANAGEMENT",
            Role::Finance => "FINANCE",
            Role::CustomerService => "CUSTOMER_SERVICE",
            Role::Superadmin => "SUPERADMIN",
        }
    }

    /// Staff roles that register through the internal gate.
    pub fn is_internal(&self) -> bool {
        !matches!(self, Role::Client | Role::Partner)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = AsistenkuError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = normalize_role(s);
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == normalized)
            .ok_or_else(|| AsistenkuError::Decode(format!("unknown role {:?}", s)))
    }
}

#[derive(CandidType, Deserialize, Serialize, Clone, Debug, PartialEq, Eq, Copy)]
pub enum UserStatus {
    #[serde(rename = "active")]
    Active,
    #[serde(rename = "pending")]
    Pending,
    #[serde(rename = "suspended")]
    Suspended,
    #[serde(rename = "blacklisted")]
    Blacklisted,
}

impl UserStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserStatus::Active => "active",
            UserStatus::Pending => "pending",
            UserStatus::Suspended => "suspended",
            UserStatus::Blacklisted => "blacklisted",
        }
    }
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserStatus {
    type Err = AsistenkuError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_status_tag(s).as_str() {
            "active" => Ok(UserStatus::Active),
            "pending" => Ok(UserStatus::Pending),
            "suspended" => Ok(UserStatus::Suspended),
            "blacklisted" => Ok(UserStatus::Blacklisted),
            _ => Err(AsistenkuError::Decode(format!("unknown user status {:?}", s))),
        }
    }
}

#[derive(CandidType, Deserialize, Serialize, Clone, Debug, PartialEq, Eq, Default)]
pub struct ClientData {
    pub name: String,
    pub email: String,
    pub whatsapp: String,
    pub company: Option<String>,
}

#[derive(CandidType, Deserialize, Serialize, Clone, Debug, PartialEq, Eq, Default)]
pub struct PartnerData {
    pub name: String,
    pub email: String,
    pub whatsapp: String,
    pub city: String,
    pub skills: Vec<String>,
}

#[derive(CandidType, Deserialize, Serialize, Clone, Debug, PartialEq, Eq, Default)]
pub struct InternalData {
    pub name: String,
    pub email: String,
    pub whatsapp: String,
}

/// Role payload. Exactly one exists per profile, and it matches the role.
#[derive(CandidType, Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub enum RoleData {
    Client(ClientData),
    Partner(PartnerData),
    Internal(InternalData),
}

impl RoleData {
    pub fn fits(&self, role: Role) -> bool {
        match self {
            RoleData::Client(_) => role == Role::Client,
            RoleData::Partner(_) => role == Role::Partner,
            RoleData::Internal(_) => role.is_internal(),
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            RoleData::Client(data) => &data.name,
            RoleData::Partner(data) => &data.name,
            RoleData::Internal(data) => &data.name,
        }
    }
}

#[derive(CandidType, Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct UserProfile {
    pub id: ProfileId,
    pub principal_id: PrincipalId,
    pub role: Role,
    pub status: UserStatus,
    pub data: RoleData,
    pub created_at: TimestampNs,
}

impl UserProfile {
    pub fn display_name(&self) -> &str {
        self.data.display_name()
    }

    pub fn client_data(&self) -> Option<&ClientData> {
        match &self.data {
            RoleData::Client(data) => Some(data),
            _ => None,
        }
    }

    pub fn partner_data(&self) -> Option<&PartnerData> {
        match &self.data {
            RoleData::Partner(data) => Some(data),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_parses_loosely() {
        assert_eq!(" customer_service ".parse::<Role>().ok(), Some(Role::CustomerService));
        assert_eq!("#admin".parse::<Role>().ok(), Some(Role::Admin));
        assert!("janitor".parse::<Role>().is_err());
    }

    #[test]
    fn status_parses_tagged_text() {
        assert_eq!("#active".parse::<UserStatus>().ok(), Some(UserStatus::Active));
        assert_eq!("Blacklisted".parse::<UserStatus>().ok(), Some(UserStatus::Blacklisted));
        assert!("archived".parse::<UserStatus>().is_err());
    }

    #[test]
    fn payload_fits_role() {
        assert!(RoleData::Client(ClientData::default()).fits(Role::Client));
        assert!(!RoleData::Client(ClientData::default()).fits(Role::Partner));
        assert!(RoleData::Internal(InternalData::default()).fits(Role::Finance));
        assert!(!RoleData::Internal(InternalData::default()).fits(Role::Client));
    }
}
