use invest_portal::{
    MemorySessionStore, Role, RouteGuard, SessionContext, Verdict,
    guard::{ADMIN_LOGIN, MEMBER_LOGIN, PUBLIC_ROUTES, evaluate, normalize_path},
    session::ROLE_KEY,
};

const ROLES: [Option<Role>; 3] = [None, Some(Role::Admin), Some(Role::Member)];

fn guard_with_role(role: Option<&str>) -> RouteGuard {
    let store = match role {
        Some(value) => MemorySessionStore::new().with(ROLE_KEY, value),
        None => MemorySessionStore::new(),
    };
    RouteGuard::new(SessionContext::new(store))
}

// --- Normalization ---

#[test]
fn test_normalize_strips_single_trailing_slash() {
    assert_eq!(normalize_path("/member/auth/login/"), "/member/auth/login");
    assert_eq!(normalize_path("/member/auth/login"), "/member/auth/login");
    assert_eq!(normalize_path("/member/auth/login//"), "/member/auth/login/");
    assert_eq!(normalize_path("/"), "");
}

// --- Public routes ---

#[test]
fn test_public_routes_allowed_for_every_role() {
    for route in PUBLIC_ROUTES {
        for role in ROLES {
            assert_eq!(evaluate(route, role), Verdict::Allow, "{route} with {role:?}");
            let with_slash = format!("{route}/");
            assert_eq!(evaluate(&with_slash, role), Verdict::Allow, "{with_slash} with {role:?}");
        }
    }
}

#[test]
fn test_public_route_match_is_exact_after_normalization() {
    // Two trailing slashes normalize to one, which is not on the list.
    assert_eq!(
        evaluate("/member/auth/login//", None),
        Verdict::Redirect(MEMBER_LOGIN)
    );
    assert_eq!(
        evaluate("/administrators/auth/login/extra", None),
        Verdict::Redirect(ADMIN_LOGIN)
    );
}

#[test]
fn test_admin_signup_is_not_public() {
    assert_eq!(
        evaluate("/administrators/auth/signup", None),
        Verdict::Redirect(ADMIN_LOGIN)
    );
}

// --- Administrator zone ---

#[test]
fn test_admin_zone_requires_admin_role() {
    for path in ["/administrators", "/administrators/users", "/administrators/dashboard/"] {
        assert_eq!(evaluate(path, Some(Role::Admin)), Verdict::Allow, "{path}");
        assert_eq!(evaluate(path, Some(Role::Member)), Verdict::Redirect(ADMIN_LOGIN), "{path}");
        assert_eq!(evaluate(path, None), Verdict::Redirect(ADMIN_LOGIN), "{path}");
    }
}

#[test]
fn test_admin_prefix_is_a_plain_string_prefix() {
    assert_eq!(
        evaluate("/administratorsfoo", Some(Role::Member)),
        Verdict::Redirect(ADMIN_LOGIN)
    );
}

// --- Member zone ---

#[test]
fn test_member_zone_requires_member_role() {
    for path in ["/member", "/member/portfolio", "/member/investments/42/", "/members"] {
        assert_eq!(evaluate(path, Some(Role::Member)), Verdict::Allow, "{path}");
        assert_eq!(evaluate(path, Some(Role::Admin)), Verdict::Redirect(MEMBER_LOGIN), "{path}");
        assert_eq!(evaluate(path, None), Verdict::Redirect(MEMBER_LOGIN), "{path}");
    }
}

// --- Everything else ---

#[test]
fn test_paths_outside_both_zones_are_open() {
    for path in ["/", "", "/about", "/health", "/api/member", "/Administrators/users"] {
        for role in ROLES {
            assert_eq!(evaluate(path, role), Verdict::Allow, "{path} with {role:?}");
        }
    }
}

#[test]
fn test_evaluation_is_idempotent() {
    for path in ["/administrators/users", "/member/portfolio", "/member/auth/signup/", "/x"] {
        for role in ROLES {
            assert_eq!(evaluate(path, role), evaluate(path, role));
        }
    }
}

// --- Guard over a session ---

#[test]
fn test_guard_scenario_admin_dashboard_with_trailing_slash() {
    let guard = guard_with_role(Some("admin"));
    assert_eq!(guard.check("/administrators/dashboard/"), Verdict::Allow);
}

#[test]
fn test_guard_scenario_member_login_without_role() {
    let guard = guard_with_role(None);
    assert_eq!(guard.check("/member/auth/login"), Verdict::Allow);
}

#[test]
fn test_guard_scenario_member_visiting_admin_users() {
    let guard = guard_with_role(Some("member"));
    assert_eq!(
        guard.check("/administrators/users"),
        Verdict::Redirect("/administrators/auth/login")
    );
}

#[test]
fn test_guard_treats_unknown_role_as_absent() {
    for stored in ["Admin", "superuser", "", " admin"] {
        let guard = guard_with_role(Some(stored));
        assert_eq!(guard.check("/administrators"), Verdict::Redirect(ADMIN_LOGIN), "{stored:?}");
        assert_eq!(guard.check("/member"), Verdict::Redirect(MEMBER_LOGIN), "{stored:?}");
        assert_eq!(guard.check("/about"), Verdict::Allow, "{stored:?}");
    }
}

#[test]
fn test_guard_does_not_change_session() {
    let session = SessionContext::new(MemorySessionStore::new().with(ROLE_KEY, "member"));
    let guard = RouteGuard::new(session.clone());

    let _ = guard.check("/administrators/users");
    let _ = guard.check("/member/portfolio");

    assert_eq!(session.role(), Some(Role::Member));
}
