// src/asistenku/utils/guards.rs
//
// The one place where role and status text is normalized and compared.
// View code and the access gate go through these predicates; nothing else
// strips tags or changes case on its own.

use crate::models::user_profile::{Role, UserProfile, UserStatus};

/// Removes the `#` that Motoko's textual variant rendering puts in front of a
/// tag, plus surrounding whitespace. Case is left untouched.
pub fn strip_variant_tag(raw: &str) -> &str {
    let trimmed = raw.trim();
    trimmed.strip_prefix('#').unwrap_or(trimmed).trim()
}

/// Upper-cased tag text, the canonical form of role, request-type and task
/// status tags.
pub fn normalize_tag(raw: &str) -> String {
    strip_variant_tag(raw).to_uppercase()
}

/// Trimmed, upper-cased role text. A leading `#` is dropped as well, since
/// roles arrive as textual variant tags just like statuses do.
pub fn normalize_role(raw: &str) -> String {
    normalize_tag(raw)
}

/// Case-insensitive role equality after trimming both sides. `#client`
/// matches `CLIENT`.
pub fn roles_match(actual: &str, required: &str) -> bool {
    let required = normalize_role(required);
    !required.is_empty() && normalize_role(actual) == required
}

/// Lower-cased status text with a leading `#` removed.
pub fn normalize_status_tag(raw: &str) -> String {
    strip_variant_tag(raw).to_lowercase()
}

/// Statuses that may enter a dashboard: active and pending.
pub fn is_valid_status(raw: &str) -> bool {
    matches!(normalize_status_tag(raw).as_str(), "active" | "pending")
}

pub fn is_valid_user_status(status: UserStatus) -> bool {
    matches!(status, UserStatus::Active | UserStatus::Pending)
}

/// Role and status check on an already normalized profile.
pub fn profile_has_role(profile: &UserProfile, required: &str) -> bool {
    roles_match(profile.role.as_str(), required) && is_valid_user_status(profile.status)
}

/// Roles allowed to manage other users (role assignment, status changes).
pub fn can_manage_users(role: Role) -> bool {
    matches!(role, Role::Admin | Role::Superadmin)
}
