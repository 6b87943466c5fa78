// src/asistenku/navigation.rs
//
// Decides what a path renders: the page itself or one of the gate, access and
// error screens in front of it.

use crate::backend::BackendInterface;
use crate::error::AsistenkuError;
use crate::models::Role;
use crate::query::Hooks;
use crate::routes::{self, Access, Page};
use crate::services::access_gate::{
    check_access, check_access_raw, mismatch_message, AccessDecision, Surface,
};
use crate::services::internal_gate::{GateState, InternalGate};
use std::cell::Cell;
use std::rc::Rc;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Screen {
    Page(Page),
    NotFound,
    /// Internal page requested while the gate is locked.
    InternalGate,
    AccessDenied,
    /// Public page for another role. Rendered inline, no redirect.
    RoleMismatch {
        required: Role,
        actual: Option<Role>,
    },
    /// Backend actor not ready yet.
    Connecting,
    /// Error boundary.
    Fallback(String),
}

impl Screen {
    /// Inline text of a role mismatch.
    pub fn inline_message(&self) -> Option<String> {
        match self {
            Screen::RoleMismatch { required, actual } => Some(mismatch_message(
                required.as_str(),
                actual.as_ref().map(Role::as_str),
            )),
            _ => None,
        }
    }
}

fn decided(decision: AccessDecision, page: Page, required: Role, actual: Option<Role>) -> Screen {
    match decision {
        AccessDecision::Granted => Screen::Page(page),
        AccessDecision::DeniedInternal => Screen::AccessDenied,
        AccessDecision::DeniedPublic => Screen::RoleMismatch { required, actual },
    }
}

pub struct Navigator<B> {
    hooks: Rc<Hooks<B>>,
    gate: InternalGate,
    current: Cell<Option<&'static str>>,
}

impl<B: BackendInterface + 'static> Navigator<B> {
    pub fn new(hooks: Rc<Hooks<B>>, gate: InternalGate) -> Self {
        Self {
            hooks,
            gate,
            current: Cell::new(None),
        }
    }

    pub fn hooks(&self) -> &Rc<Hooks<B>> {
        &self.hooks
    }

    pub fn gate(&self) -> &InternalGate {
        &self.gate
    }

    /// Mounts `path`. Moving to another route drops the query cache.
    pub async fn enter(&self, path: &str) -> Screen {
        let route = match routes::resolve(path) {
            Some(route) => route,
            None => {
                log_info!("No route for {:?}", path);
                return Screen::NotFound;
            }
        };

        let previous = self.current.replace(Some(route.path));
        if previous.is_some() && previous != Some(route.path) {
            self.hooks.client().clear();
        }

        match route.access {
            Access::Public => Screen::Page(route.page),
            Access::Gate => match self.gate.on_mount() {
                GateState::Unlocked => Screen::Page(route.page),
                GateState::Locked => Screen::InternalGate,
            },
            Access::Role { role, surface } => {
                if surface == Surface::Internal && self.gate.on_mount() == GateState::Locked {
                    return Screen::InternalGate;
                }
                self.guard(route.page, role, surface).await
            }
        }
    }

    async fn guard(&self, page: Page, required: Role, surface: Surface) -> Screen {
        let profile = match self.hooks.caller_profile().await {
            Ok(profile) => profile,
            Err(AsistenkuError::ActorNotReady) => return Screen::Connecting,
            Err(AsistenkuError::Decode(reason)) => {
                log_warn!("Profile does not normalize ({}), raw tags decide {:?}", reason, page);
                return self.guard_raw(page, required, surface).await;
            }
            Err(err) => {
                log_error!("Cannot load profile for {:?}: {}", page, err);
                return Screen::Fallback(err.user_message(""));
            }
        };

        let decision = check_access((*profile).as_ref(), required.as_str(), surface);
        decided(decision, page, required, (*profile).as_ref().map(|p| p.role))
    }

    /// Access for a profile whose role or status is outside the known tags.
    /// The raw text still decides, so an unknown tag is a denial.
    async fn guard_raw(&self, page: Page, required: Role, surface: Surface) -> Screen {
        let wire = match self.hooks.backend().get_caller_user_profile().await {
            Ok(wire) => wire,
            Err(AsistenkuError::ActorNotReady) => return Screen::Connecting,
            Err(err) => {
                log_error!("Cannot load profile for {:?}: {}", page, err);
                return Screen::Fallback(err.user_message(""));
            }
        };
        let role = wire.as_ref().map(|w| w.role.as_str());
        let status = wire.as_ref().map(|w| w.status.as_str());
        let decision = check_access_raw(role, status, required.as_str(), surface);
        decided(decision, page, required, role.and_then(|r| r.parse().ok()))
    }

    /// Submits an internal access code from the gate screen.
    pub async fn unlock(&self, code: &str) -> Result<GateState, AsistenkuError> {
        let state = self.gate.unlock(self.hooks.backend().as_ref(), code).await?;
        if state == GateState::Locked {
            self.hooks.client().toasts().error("Kode akses tidak valid");
        }
        Ok(state)
    }

    /// Signs out: cache dropped, gate locked.
    pub fn sign_out(&self) {
        self.hooks.client().clear();
        self.gate.lock();
        self.current.set(None);
    }
}
