//! Static route policy and the gate decision function.
//!
//! The policy maps path prefixes to route classes and CRM screens to the
//! admin sub-roles allowed to open them. The decision function is pure:
//! given a route class and the resolved session state it returns exactly
//! one terminal action. Keeping it free of I/O means every redirect rule
//! is unit-testable without a server.

use crate::database::models::SubRole;

pub const LOGIN_PATH: &str = "/login";
pub const CRM_ROOT: &str = "/crm";
pub const PORTAL_ROOT: &str = "/portal";

/// Classification of an incoming path. Prefixes absent from the policy are
/// implicitly public.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteClass {
    Public,
    Crm,
    Portal,
    LoginSurface,
}

/// Session state reconstructed per request from cookies plus the role
/// lookup. A failed role lookup resolves to `NoRole`, never to an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Unauthenticated,
    /// Valid session but the role lookup failed or returned nothing.
    NoRole,
    Admin { sub_role: Option<SubRole> },
    Cliente,
}

/// Terminal action for one request. Every request maps to exactly one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateAction {
    Proceed,
    RedirectToLogin { return_to: String },
    RedirectToPortal,
    RedirectToCrm,
}

/// CRM screens restricted to specific sub-roles. Screens not listed here
/// admit any admin.
const CRM_SCREEN_POLICY: &[(&str, &[SubRole])] = &[
    ("/crm/leads", &[SubRole::Ceo, SubRole::Coo, SubRole::Ventas]),
    ("/crm/budgets", &[SubRole::Ceo, SubRole::Coo, SubRole::Ventas]),
    ("/crm/qa", &[SubRole::Ceo, SubRole::Qa]),
    ("/crm/projects", &[SubRole::Ceo, SubRole::Coo, SubRole::Pm]),
    ("/crm/settings", &[SubRole::Ceo, SubRole::Coo]),
];

/// Classifies a path against the fixed prefix policy.
pub fn classify(path: &str) -> RouteClass {
    if path == LOGIN_PATH {
        RouteClass::LoginSurface
    } else if path == CRM_ROOT || path.starts_with("/crm/") {
        RouteClass::Crm
    } else if path == PORTAL_ROOT || path.starts_with("/portal/") {
        RouteClass::Portal
    } else {
        RouteClass::Public
    }
}

/// Whether an admin with the given sub-role may open the CRM screen at
/// `path`. Admins without a sub-role only see unrestricted screens.
fn crm_screen_allows(path: &str, sub_role: Option<SubRole>) -> bool {
    for (prefix, allowed) in CRM_SCREEN_POLICY {
        if path == *prefix || path.starts_with(&format!("{}/", prefix)) {
            return match sub_role {
                Some(sub) => allowed.contains(&sub),
                None => false,
            };
        }
    }
    true
}

/// Decides the terminal action for one request.
///
/// Stateless and idempotent: the same path and session state always yield
/// the same action.
pub fn decide(path: &str, session: &SessionState) -> GateAction {
    let class = classify(path);

    match (class, session) {
        // Public prefixes never gate.
        (RouteClass::Public, _) => GateAction::Proceed,

        // No session: anything non-public bounces to login, carrying the
        // original path so the user lands back where they aimed.
        (RouteClass::Crm, SessionState::Unauthenticated)
        | (RouteClass::Portal, SessionState::Unauthenticated) => GateAction::RedirectToLogin {
            return_to: path.to_string(),
        },
        (RouteClass::LoginSurface, SessionState::Unauthenticated) => GateAction::Proceed,

        // Authenticated but no resolvable role: fail closed. CRM is out of
        // the question; the portal requires a role too.
        (RouteClass::Crm, SessionState::NoRole) => GateAction::RedirectToPortal,
        (RouteClass::Portal, SessionState::NoRole) => GateAction::RedirectToLogin {
            return_to: path.to_string(),
        },
        (RouteClass::LoginSurface, SessionState::NoRole) => GateAction::Proceed,

        // Admins: CRM screens may further restrict by sub-role.
        (RouteClass::Crm, SessionState::Admin { sub_role }) => {
            if crm_screen_allows(path, *sub_role) {
                GateAction::Proceed
            } else {
                GateAction::RedirectToPortal
            }
        }
        (RouteClass::Portal, SessionState::Admin { .. }) => GateAction::Proceed,
        (RouteClass::LoginSurface, SessionState::Admin { .. }) => GateAction::RedirectToCrm,

        // Clients live in the portal.
        (RouteClass::Crm, SessionState::Cliente) => GateAction::RedirectToPortal,
        (RouteClass::Portal, SessionState::Cliente) => GateAction::Proceed,
        (RouteClass::LoginSurface, SessionState::Cliente) => GateAction::RedirectToPortal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_fixed_prefixes() {
        assert_eq!(classify("/crm"), RouteClass::Crm);
        assert_eq!(classify("/crm/leads/42"), RouteClass::Crm);
        assert_eq!(classify("/portal"), RouteClass::Portal);
        assert_eq!(classify("/portal/documents"), RouteClass::Portal);
        assert_eq!(classify("/login"), RouteClass::LoginSurface);
        assert_eq!(classify("/"), RouteClass::Public);
        assert_eq!(classify("/about"), RouteClass::Public);
        // Prefix match is on path segments, not raw strings.
        assert_eq!(classify("/crmx"), RouteClass::Public);
        assert_eq!(classify("/portalize"), RouteClass::Public);
    }

    #[test]
    fn unauthenticated_non_public_redirects_to_login_with_return_path() {
        let action = decide("/portal/documents", &SessionState::Unauthenticated);
        assert_eq!(
            action,
            GateAction::RedirectToLogin {
                return_to: "/portal/documents".to_string()
            }
        );

        let action = decide("/crm/leads", &SessionState::Unauthenticated);
        assert_eq!(
            action,
            GateAction::RedirectToLogin {
                return_to: "/crm/leads".to_string()
            }
        );
    }

    #[test]
    fn unauthenticated_public_and_login_proceed() {
        assert_eq!(decide("/", &SessionState::Unauthenticated), GateAction::Proceed);
        assert_eq!(
            decide("/login", &SessionState::Unauthenticated),
            GateAction::Proceed
        );
    }

    #[test]
    fn cliente_never_reaches_crm() {
        assert_eq!(decide("/crm", &SessionState::Cliente), GateAction::RedirectToPortal);
        assert_eq!(
            decide("/crm/dashboard", &SessionState::Cliente),
            GateAction::RedirectToPortal
        );
    }

    #[test]
    fn role_lookup_failure_fails_closed_on_crm() {
        // Authenticated principal whose role lookup errored: the stricter
        // branch wins and the CRM redirects to the portal.
        assert_eq!(
            decide("/crm/dashboard", &SessionState::NoRole),
            GateAction::RedirectToPortal
        );
    }

    #[test]
    fn no_role_on_portal_redirects_to_login() {
        assert_eq!(
            decide("/portal", &SessionState::NoRole),
            GateAction::RedirectToLogin {
                return_to: "/portal".to_string()
            }
        );
    }

    #[test]
    fn login_surface_redirects_to_role_landing() {
        assert_eq!(
            decide("/login", &SessionState::Admin { sub_role: None }),
            GateAction::RedirectToCrm
        );
        assert_eq!(decide("/login", &SessionState::Cliente), GateAction::RedirectToPortal);
    }

    #[test]
    fn admin_allowed_on_portal_and_unrestricted_crm() {
        let admin = SessionState::Admin {
            sub_role: Some(SubRole::Pm),
        };
        assert_eq!(decide("/portal/videos", &admin), GateAction::Proceed);
        assert_eq!(decide("/crm", &admin), GateAction::Proceed);
        assert_eq!(decide("/crm/dashboard", &admin), GateAction::Proceed);
    }

    #[test]
    fn crm_screens_enforce_sub_roles() {
        let qa = SessionState::Admin {
            sub_role: Some(SubRole::Qa),
        };
        assert_eq!(decide("/crm/qa/reports", &qa), GateAction::Proceed);
        assert_eq!(decide("/crm/budgets", &qa), GateAction::RedirectToPortal);

        let ventas = SessionState::Admin {
            sub_role: Some(SubRole::Ventas),
        };
        assert_eq!(decide("/crm/budgets/7", &ventas), GateAction::Proceed);
        assert_eq!(decide("/crm/settings", &ventas), GateAction::RedirectToPortal);

        let ceo = SessionState::Admin {
            sub_role: Some(SubRole::Ceo),
        };
        for path in ["/crm/leads", "/crm/budgets", "/crm/qa", "/crm/settings"] {
            assert_eq!(decide(path, &ceo), GateAction::Proceed, "ceo blocked on {path}");
        }

        // Admin without sub-role only sees unrestricted screens.
        let bare = SessionState::Admin { sub_role: None };
        assert_eq!(decide("/crm/leads", &bare), GateAction::RedirectToPortal);
        assert_eq!(decide("/crm/dashboard", &bare), GateAction::Proceed);
    }

    #[test]
    fn decisions_are_idempotent() {
        let admin = SessionState::Admin {
            sub_role: Some(SubRole::Ceo),
        };
        let first = decide("/crm/leads", &admin);
        for _ in 0..10 {
            assert_eq!(decide("/crm/leads", &admin), first);
        }
    }
}
