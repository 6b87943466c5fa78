// src/asistenku/services/access_gate.rs
//
// Presentation-only gating: decides which screen a dashboard shows for the
// fetched profile. The backend enforces authorization on every call.

use crate::models::user_profile::UserProfile;
use crate::utils::guards::{is_valid_status, normalize_role, profile_has_role, roles_match};
use candid::CandidType;
use serde::{Deserialize, Serialize};

/// Where the guarded page lives.
#[derive(CandidType, Deserialize, Serialize, Clone, Debug, PartialEq, Eq, Copy)]
pub enum Surface {
    /// Client and partner pages: a mismatch is an inline message.
    Public,
    /// Staff pages: a mismatch replaces the page with an access-denied screen.
    Internal,
}

#[derive(CandidType, Deserialize, Serialize, Clone, Debug, PartialEq, Eq, Copy)]
pub enum AccessDecision {
    #[serde(rename = "GRANTED")]
    Granted,
    #[serde(rename = "DENIED_INTERNAL")]
    DeniedInternal,
    #[serde(rename = "DENIED_PUBLIC")]
    DeniedPublic,
}

impl AccessDecision {
    pub fn is_granted(&self) -> bool {
        matches!(self, AccessDecision::Granted)
    }

    fn denied(surface: Surface) -> Self {
        match surface {
            Surface::Public => AccessDecision::DeniedPublic,
            Surface::Internal => AccessDecision::DeniedInternal,
        }
    }
}

/// Decision for a normalized profile. A missing profile is denied.
pub fn check_access(
    profile: Option<&UserProfile>,
    required_role: &str,
    surface: Surface,
) -> AccessDecision {
    match profile {
        Some(profile) if profile_has_role(profile, required_role) => AccessDecision::Granted,
        _ => AccessDecision::denied(surface),
    }
}

/// Decision for unnormalized backend text (`" Client "`, `"#active"`).
pub fn check_access_raw(
    role: Option<&str>,
    status: Option<&str>,
    required_role: &str,
    surface: Surface,
) -> AccessDecision {
    match (role, status) {
        (Some(role), Some(status))
            if roles_match(role, required_role) && is_valid_status(status) =>
        {
            AccessDecision::Granted
        }
        _ => AccessDecision::denied(surface),
    }
}

/// Inline text for a public-surface mismatch.
pub fn mismatch_message(required_role: &str, actual_role: Option<&str>) -> String {
    let required = normalize_role(required_role);
    match actual_role.map(normalize_role) {
        Some(actual) if !actual.is_empty() => format!(
            "Akun ini terdaftar sebagai {}. Halaman ini khusus {}.",
            actual, required
        ),
        _ => format!("Akun ini belum terdaftar sebagai {}.", required),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user_profile::{ClientData, InternalData, Role, RoleData, UserStatus};
    use candid::Principal;

    fn profile(role: Role, status: UserStatus) -> UserProfile {
        let data = match role {
            Role::Client => RoleData::Client(ClientData::default()),
            _ => RoleData::Internal(InternalData::default()),
        };
        UserProfile {
            id: "U-1".to_string(),
            principal_id: Principal::anonymous(),
            role,
            status,
            data,
            created_at: 0,
        }
    }

    #[test]
    fn matching_role_and_live_status_is_granted() {
        let client = profile(Role::Client, UserStatus::Pending);
        let decide =
            |required: &str, surface: Surface| check_access(Some(&client), required, surface);
        assert_eq!(decide("client", Surface::Public), AccessDecision::Granted);
        assert_eq!(decide(" CLIENT ", Surface::Internal), AccessDecision::Granted);
    }

    #[test]
    fn denial_depends_on_surface() {
        let admin = profile(Role::Admin, UserStatus::Active);
        let decide =
            |required: &str, surface: Surface| check_access(Some(&admin), required, surface);
        assert_eq!(decide("FINANCE", Surface::Internal), AccessDecision::DeniedInternal);
        assert_eq!(decide("CLIENT", Surface::Public), AccessDecision::DeniedPublic);
        assert_eq!(check_access(None, "CLIENT", Surface::Public), AccessDecision::DeniedPublic);
    }

    #[test]
    fn suspended_profiles_are_denied() {
        let finance = profile(Role::Finance, UserStatus::Suspended);
        let decision = check_access(Some(&finance), "FINANCE", Surface::Internal);
        assert_eq!(decision, AccessDecision::DeniedInternal);
        let blocked = profile(Role::Finance, UserStatus::Blacklisted);
        assert!(!check_access(Some(&blocked), "FINANCE", Surface::Internal).is_granted());
    }

    #[test]
    fn raw_variant_normalizes_both_sides() {
        for role in ["client", "CLIENT", " Client "] {
            assert_eq!(
                check_access_raw(Some(role), Some("#active"), "CLIENT", Surface::Public),
                AccessDecision::Granted
            );
        }
        assert_eq!(
            check_access_raw(Some("client"), Some("active"), "CLIENT", Surface::Public),
            check_access_raw(Some("client"), Some("#active"), "CLIENT", Surface::Public)
        );
        assert_eq!(
            check_access_raw(Some("client"), Some("#suspended"), "CLIENT", Surface::Public),
            AccessDecision::DeniedPublic
        );
        assert_eq!(
            check_access_raw(None, None, "ADMIN", Surface::Internal),
            AccessDecision::DeniedInternal
        );
    }

    #[test]
    fn mismatch_message_names_both_roles() {
        let message = mismatch_message("client", Some(" partner "));
        assert!(message.contains("PARTNER") && message.contains("CLIENT"));
        assert!(mismatch_message("client", None).contains("belum terdaftar"));
    }
}
