use crate::session::{Role, SessionContext};

/// Path family reserved for administrators.
pub const ADMIN_PREFIX: &str = "/administrators";
/// Path family reserved for members.
pub const MEMBER_PREFIX: &str = "/member";

pub const ADMIN_LOGIN: &str = "/administrators/auth/login";
pub const MEMBER_LOGIN: &str = "/member/auth/login";
pub const MEMBER_SIGNUP: &str = "/member/auth/signup";

/// Pages reachable without any role. Compared against the normalized path.
pub const PUBLIC_ROUTES: [&str; 3] = [MEMBER_LOGIN, MEMBER_SIGNUP, ADMIN_LOGIN];

/// Verdict
///
/// Outcome of a single navigation check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Let the navigation proceed.
    Allow,
    /// Stop the navigation and send the viewer to this path instead.
    Redirect(&'static str),
}

/// Removes exactly one trailing `/`, if any.
pub fn normalize_path(path: &str) -> &str {
    path.strip_suffix('/').unwrap_or(path)
}

/// evaluate
///
/// The gate itself, as a pure function of the target path and the viewer's role:
/// 1. A public route (normalized form) is always allowed.
/// 2. `/administrators*` (raw form) needs `admin`, else redirect to the admin login.
/// 3. `/member*` (raw form) needs `member`, else redirect to the member login.
/// 4. Every other path is allowed.
pub fn evaluate(path: &str, role: Option<Role>) -> Verdict {
    if PUBLIC_ROUTES.contains(&normalize_path(path)) {
        return Verdict::Allow;
    }

    if path.starts_with(ADMIN_PREFIX) && role != Some(Role::Admin) {
        return Verdict::Redirect(ADMIN_LOGIN);
    }

    if path.starts_with(MEMBER_PREFIX) && role != Some(Role::Member) {
        return Verdict::Redirect(MEMBER_LOGIN);
    }

    Verdict::Allow
}

/// RouteGuard
///
/// Runs once per navigation, before the page is reached. Reads the role from
/// the session it was given and never writes to it.
#[derive(Debug, Clone)]
pub struct RouteGuard {
    session: SessionContext,
}

impl RouteGuard {
    pub fn new(session: SessionContext) -> Self {
        Self { session }
    }

    pub fn check(&self, path: &str) -> Verdict {
        let role = self.session.role();
        let verdict = evaluate(path, role);

        match verdict {
            Verdict::Allow => {
                tracing::debug!(path, role = ?role, "navigation allowed");
            }
            Verdict::Redirect(target) => {
                tracing::info!(path, role = ?role, redirect_to = target, "navigation redirected");
            }
        }

        verdict
    }
}
