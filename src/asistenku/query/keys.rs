// src/asistenku/query/keys.rs
use crate::utils::crypto::calculate_sha256_hex;
use std::fmt;

/// What a cached query holds. Mutations invalidate by kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum QueryKind {
    CallerProfile,
    UserProfile,
    Users,
    SuperadminClaimed,
    AccessCode,
    MyTasks,
    AllTasks,
    PartnerTasks,
    Task,
    Services,
    Service,
    MyLayananku,
    Layananku,
    FinancialPartners,
}

impl QueryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryKind::CallerProfile => "callerUserProfile",
            QueryKind::UserProfile => "userProfile",
            QueryKind::Users => "users",
            QueryKind::SuperadminClaimed => "superadminClaimed",
            QueryKind::AccessCode => "internalAccessCode",
            QueryKind::MyTasks => "myTasks",
            QueryKind::AllTasks => "allTasks",
            QueryKind::PartnerTasks => "partnerTasks",
            QueryKind::Task => "task",
            QueryKind::Services => "services",
            QueryKind::Service => "service",
            QueryKind::MyLayananku => "myLayananku",
            QueryKind::Layananku => "layananku",
            QueryKind::FinancialPartners => "financialPartners",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct QueryKey {
    pub kind: QueryKind,
    pub param: Option<String>,
}

impl QueryKey {
    pub fn new(kind: QueryKind) -> Self {
        Self { kind, param: None }
    }

    pub fn with_param(kind: QueryKind, param: impl Into<String>) -> Self {
        Self {
            kind,
            param: Some(param.into()),
        }
    }

    /// Key whose parameter is a secret. Only its digest is kept.
    pub fn hashed(kind: QueryKind, secret: &str) -> Self {
        Self::with_param(kind, calculate_sha256_hex(secret.as_bytes()))
    }
}

impl From<QueryKind> for QueryKey {
    fn from(kind: QueryKind) -> Self {
        QueryKey::new(kind)
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.param {
            Some(param) => write!(f, "{}/{}", self.kind.as_str(), param),
            None => f.write_str(self.kind.as_str()),
        }
    }
}
