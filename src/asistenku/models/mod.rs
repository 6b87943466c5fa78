// src/asistenku/models/mod.rs

pub mod common;
pub mod finance;
pub mod layananku;
pub mod service;
pub mod task;
pub mod user_profile;
pub mod variant;
pub mod wire;

pub use common::*;
pub use finance::FinancialPartner;
pub use layananku::{
    LayananKind, LayanankuInput, LayanankuPublic, LayanankuRecord, MAX_SHARE_PRINCIPALS,
};
pub use service::Service;
pub use task::{RequestType, TaskInput, TaskRecord, TaskStatusInternal};
pub use user_profile::{
    ClientData, InternalData, PartnerData, Role, RoleData, UserProfile, UserStatus,
};
