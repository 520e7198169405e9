use actix_web::{
    dev::Payload, error::ErrorUnauthorized, Error as ActixError, FromRequest, HttpRequest,
};
use std::future::{ready, Ready};

use crate::config::Config;
use crate::database::models::{Role, User};
use crate::database::repositories::UserRepository;
use crate::error::AppError;

/// The claimed identity of a request, read once at the HTTP boundary and
/// threaded explicitly into every workflow call.
#[derive(Debug, Clone)]
pub struct RequestIdentity {
    pub email: String,
}

impl FromRequest for RequestIdentity {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let email = req
            .headers()
            .get("x-user-email")
            .and_then(|h| h.to_str().ok())
            .map(|e| e.trim().to_string())
            .filter(|e| !e.is_empty());

        match email {
            Some(email) => ready(Ok(RequestIdentity { email })),
            None => ready(Err(ErrorUnauthorized("Missing x-user-email header"))),
        }
    }
}

/// What the gate decided about one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessDecision {
    Permit,
    /// Authenticated request to the root path; send it to the landing route.
    RedirectTo(String),
    /// No usable identity, unknown account, or failed role resolution.
    DenyUnauthenticated,
    /// Known identity without the role the route demands.
    DenyForbidden,
}

/// Pure routing policy: allow-list, admin prefix, exempt paths.
#[derive(Debug, Clone)]
pub struct AccessPolicy {
    allowed_emails: Vec<String>,
    admin_route_prefix: String,
    default_landing_route: String,
}

impl AccessPolicy {
    pub fn from_config(config: &Config) -> Self {
        Self {
            allowed_emails: config.allowed_emails.clone(),
            admin_route_prefix: config.admin_route_prefix.clone(),
            default_landing_route: config.default_landing_route.clone(),
        }
    }

    pub fn new(
        allowed_emails: Vec<String>,
        admin_route_prefix: String,
        default_landing_route: String,
    ) -> Self {
        Self {
            allowed_emails,
            admin_route_prefix,
            default_landing_route,
        }
    }

    /// Paths usable without an identity: liveness and sign-out.
    pub fn is_exempt(&self, path: &str) -> bool {
        path == "/health" || path == "/api/signout"
    }

    pub fn is_admin_route(&self, path: &str) -> bool {
        path == self.admin_route_prefix
            || path.starts_with(&format!("{}/", self.admin_route_prefix))
    }

    /// An empty allow-list disables the list check entirely; a configured
    /// list admits exactly its members.
    pub fn allows_email(&self, email: &str) -> bool {
        self.allowed_emails.is_empty()
            || self
                .allowed_emails
                .iter()
                .any(|allowed| allowed.eq_ignore_ascii_case(email))
    }

    /// The whole gate as a pure function over an already-attempted role
    /// lookup. A failed lookup is a denial: the gate fails closed.
    pub fn decide_with_role(
        &self,
        path: &str,
        email: Option<&str>,
        role_lookup: Result<Option<Role>, AppError>,
    ) -> AccessDecision {
        let Some(email) = email else {
            return AccessDecision::DenyUnauthenticated;
        };

        if !self.allows_email(email) {
            return AccessDecision::DenyUnauthenticated;
        }

        let role = match role_lookup {
            Ok(Some(role)) => role,
            // Unknown account or failed resolution both deny.
            Ok(None) => return AccessDecision::DenyUnauthenticated,
            Err(_) => return AccessDecision::DenyUnauthenticated,
        };

        if self.is_admin_route(path) && role != Role::Admin {
            return AccessDecision::DenyForbidden;
        }

        if path == "/" {
            return AccessDecision::RedirectTo(self.default_landing_route.clone());
        }

        AccessDecision::Permit
    }
}

/// Request-time gate: resolves the claimed identity's role and applies
/// the policy.
#[derive(Clone)]
pub struct AccessGate {
    policy: AccessPolicy,
    user_repository: UserRepository,
}

impl AccessGate {
    pub fn new(policy: AccessPolicy, user_repository: UserRepository) -> Self {
        Self {
            policy,
            user_repository,
        }
    }

    pub fn policy(&self) -> &AccessPolicy {
        &self.policy
    }

    pub async fn decide(&self, path: &str, email: Option<&str>) -> AccessDecision {
        if self.policy.is_exempt(path) {
            return AccessDecision::Permit;
        }

        let role_lookup = match email {
            Some(email) => self
                .user_repository
                .role_of(email)
                .await
                .map_err(AppError::from),
            None => Ok(None),
        };

        self.policy.decide_with_role(path, email, role_lookup)
    }

    /// Resolves the claimed identity to its account, for handlers that
    /// need the acting user.
    pub async fn require_user(&self, identity: &RequestIdentity) -> Result<User, AppError> {
        self.user_repository
            .find_by_email(&identity.email)
            .await?
            .ok_or(AppError::Unauthorized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn policy() -> AccessPolicy {
        AccessPolicy::new(
            vec!["admin@example.com".to_string(), "user@example.com".to_string()],
            "/admin".to_string(),
            "/vagtplan".to_string(),
        )
    }

    #[test]
    fn missing_identity_is_denied() {
        let decision = policy().decide_with_role("/vagtplan", None, Ok(Some(Role::User)));
        assert_eq!(decision, AccessDecision::DenyUnauthenticated);
    }

    #[test]
    fn unlisted_identity_is_denied() {
        let decision = policy().decide_with_role(
            "/vagtplan",
            Some("intruder@example.com"),
            Ok(Some(Role::User)),
        );
        assert_eq!(decision, AccessDecision::DenyUnauthenticated);
    }

    #[test]
    fn failed_role_resolution_is_denied() {
        // The gate fails closed when the lookup errors out.
        let decision = policy().decide_with_role(
            "/vagtplan",
            Some("user@example.com"),
            Err(AppError::InternalServerError(None)),
        );
        assert_eq!(decision, AccessDecision::DenyUnauthenticated);
    }

    #[test]
    fn unknown_account_is_denied() {
        let decision = policy().decide_with_role("/vagtplan", Some("user@example.com"), Ok(None));
        assert_eq!(decision, AccessDecision::DenyUnauthenticated);
    }

    #[test]
    fn admin_routes_require_the_admin_role() {
        let p = policy();
        assert_eq!(
            p.decide_with_role("/admin/brugere", Some("user@example.com"), Ok(Some(Role::User))),
            AccessDecision::DenyForbidden
        );
        assert_eq!(
            p.decide_with_role(
                "/admin/brugere",
                Some("admin@example.com"),
                Ok(Some(Role::Admin))
            ),
            AccessDecision::Permit
        );
    }

    #[test]
    fn admin_prefix_does_not_match_lookalike_paths() {
        let p = policy();
        assert_eq!(
            p.decide_with_role(
                "/administration",
                Some("user@example.com"),
                Ok(Some(Role::User))
            ),
            AccessDecision::Permit
        );
    }

    #[test]
    fn root_path_redirects_to_the_landing_route() {
        let decision =
            policy().decide_with_role("/", Some("user@example.com"), Ok(Some(Role::User)));
        assert_eq!(
            decision,
            AccessDecision::RedirectTo("/vagtplan".to_string())
        );
    }

    #[test]
    fn ordinary_routes_permit_any_listed_identity() {
        let decision = policy().decide_with_role(
            "/api/ferieplan/user",
            Some("user@example.com"),
            Ok(Some(Role::User)),
        );
        assert_eq!(decision, AccessDecision::Permit);
    }

    #[test]
    fn empty_allow_list_disables_the_list_check() {
        let open = AccessPolicy::new(vec![], "/admin".to_string(), "/vagtplan".to_string());
        assert!(open.allows_email("anyone@example.com"));
    }

    #[test]
    fn allow_list_matching_ignores_case() {
        assert!(policy().allows_email("Admin@Example.com"));
    }
}
