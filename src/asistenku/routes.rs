// src/asistenku/routes.rs
//
// Fixed route table. Paths carry no parameters.

use crate::models::Role;
use crate::services::access_gate::Surface;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Page {
    Home,
    Services,
    ClientLogin,
    ClientRegister,
    ClientDashboard,
    PartnerLogin,
    PartnerRegister,
    PartnerDashboard,
    InternalGate,
    InternalLogin,
    InternalRegister,
    ClaimSuperadmin,
    AdminDashboard,
    SuperadminDashboard,
    AsistenmuDashboard,
    SupervisorDashboard,
    ManagementDashboard,
    FinanceDashboard,
    CustomerServiceDashboard,
}

/// What a visitor needs before a page renders.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Access {
    Public,
    /// Internal access code accepted within the gate TTL.
    Gate,
    Role { role: Role, surface: Surface },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Route {
    pub path: &'static str,
    pub page: Page,
    pub access: Access,
}

const fn public(path: &'static str, page: Page) -> Route {
    Route {
        path,
        page,
        access: Access::Public,
    }
}

const fn gated(path: &'static str, page: Page) -> Route {
    Route {
        path,
        page,
        access: Access::Gate,
    }
}

const fn client_side(path: &'static str, page: Page, role: Role) -> Route {
    Route {
        path,
        page,
        access: Access::Role { role, surface: Surface::Public },
    }
}

const fn staff(path: &'static str, page: Page, role: Role) -> Route {
    Route {
        path,
        page,
        access: Access::Role { role, surface: Surface::Internal },
    }
}

pub const ROUTES: &[Route] = &[
    public("/", Page::Home),
    public("/services", Page::Services),
    public("/client/login", Page::ClientLogin),
    public("/client/register", Page::ClientRegister),
    client_side("/client/dashboard", Page::ClientDashboard, Role::Client),
    public("/partner/login", Page::PartnerLogin),
    public("/partner/register", Page::PartnerRegister),
    client_side("/partner/dashboard", Page::PartnerDashboard, Role::Partner),
    public("/internal", Page::InternalGate),
    gated("/internal/login", Page::InternalLogin),
    gated("/internal/register", Page::InternalRegister),
    gated("/internal/claim-superadmin", Page::ClaimSuperadmin),
    staff("/internal/admin", Page::AdminDashboard, Role::Admin),
    staff("/internal/superadmin", Page::SuperadminDashboard, Role::Superadmin),
    staff("/internal/asistenmu", Page::AsistenmuDashboard, Role::Asistenmu),
    staff("/internal/supervisor", Page::SupervisorDashboard, Role::Supervisor),
    staff("/internal/management", Page::ManagementDashboard, Role::Management),
    staff("/internal/finance", Page::FinanceDashboard, Role::Finance),
    staff("/internal/customer-service", Page::CustomerServiceDashboard, Role::CustomerService),
];

/// Exact lookup. A single trailing slash is ignored.
pub fn resolve(path: &str) -> Option<&'static Route> {
    let path = path.trim();
    let path = match path.strip_suffix('/') {
        Some(stripped) if !stripped.is_empty() => stripped,
        _ => path,
    };
    ROUTES.iter().find(|route| route.path == path)
}

/// Dashboard a freshly signed-in profile is sent to.
pub fn dashboard_for(role: Role) -> &'static str {
    match role {
        Role::Client => "/client/dashboard",
        Role::Partner => "/partner/dashboard",
        Role::Admin => "/internal/admin",
        Role::Superadmin => "/internal/superadmin",
        Role::Asistenmu => "/internal/asistenmu",
        Role::Supervisor => "/internal/supervisor",
        Role::Management => "/internal/management",
        Role::Finance => "/internal/finance",
        Role::CustomerService => "/internal/customer-service",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_tolerated() {
        assert_eq!(resolve("/client/dashboard/").map(|r| r.page), Some(Page::ClientDashboard));
        assert_eq!(resolve("/").map(|r| r.page), Some(Page::Home));
        assert!(resolve("/client/dashboard//").is_none());
        assert!(resolve("/nowhere").is_none());
    }

    #[test]
    fn every_role_has_a_routed_dashboard() {
        for role in Role::ALL {
            let route = resolve(dashboard_for(role)).expect("dashboard is routed");
            assert!(matches!(route.access, Access::Role { role: r, .. } if r == role));
        }
    }

    #[test]
    fn paths_are_unique() {
        for (i, a) in ROUTES.iter().enumerate() {
            assert!(ROUTES[i + 1..].iter().all(|b| b.path != a.path), "duplicate {}", a.path);
        }
    }
}
