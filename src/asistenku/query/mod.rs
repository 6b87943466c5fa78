// src/asistenku/query/mod.rs

pub mod cache;
pub mod hooks;
pub mod keys;
pub mod toast;

pub use cache::{ConnectionState, MutationSpec, QueryClient};
pub use hooks::{Hooks, TaskRow};
pub use keys::{QueryKey, QueryKind};
pub use toast::{Toast, ToastKind, Toasts};
