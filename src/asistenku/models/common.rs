// src/asistenku/models/common.rs
use candid::Principal;

pub type PrincipalId = Principal;
pub type ProfileId = String;
pub type TaskId = String;
pub type ServiceId = String;
pub type LayanankuId = String;

pub type TimestampNs = u64; // Nanoseconds since epoch, as the backend reports time
pub type TimestampMs = u64; // Milliseconds since epoch, used by session flags
pub type Rupiah = u64;
