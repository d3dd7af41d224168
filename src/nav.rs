use crate::session::Session;

/// Outcome of the pre-navigation auth check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Proceed,
    RedirectToLogin,
    RedirectToDashboard,
}

/// Route metadata the guard cares about.
#[derive(Debug, Clone, Copy)]
pub struct RouteMeta {
    pub requires_auth: bool,
    /// Login/register entry routes bounce already-authenticated users.
    pub entry_route: bool,
}

/// Pure guard decision over the session's authenticated predicate.
pub fn route_guard(route: RouteMeta, session: &Session) -> GuardDecision {
    if route.requires_auth && !session.is_authenticated() {
        GuardDecision::RedirectToLogin
    } else if route.entry_route && session.is_authenticated() {
        GuardDecision::RedirectToDashboard
    } else {
        GuardDecision::Proceed
    }
}
