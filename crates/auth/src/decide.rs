use tracing::Span;

use crate::{Claims, Effect, GroupName, Groups, PolicyResult, Verb};
use crate::authorizer::AuthzError;

/// Which rule matched for a set of groups and a verb.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Admins may do anything.
    AdminAllow,
    /// Users may read and create.
    UserAllow,
    /// Users are recognized but may not delete.
    UserDeleteDenied,
    /// No rule matched.
    Unauthorized,
}

impl Decision {
    /// Effect and the group that earned it, or `None` for [`Decision::Unauthorized`].
    pub fn outcome(self) -> Option<(GroupName, Effect)> {
        match self {
            Decision::AdminAllow => Some((GroupName::Admin, Effect::Allow)),
            Decision::UserAllow => Some((GroupName::User, Effect::Allow)),
            Decision::UserDeleteDenied => Some((GroupName::User, Effect::Deny)),
            Decision::Unauthorized => None,
        }
    }
}

/// Ordered rule table, first match wins.
///
/// - No IO
/// - No panics
/// - No state
pub fn evaluate(groups: &Groups, verb: Verb) -> Decision {
    if groups.contains(&GroupName::Admin) {
        return Decision::AdminAllow;
    }
    if groups.contains(&GroupName::User) {
        return match verb {
            Verb::Get | Verb::Post => Decision::UserAllow,
            Verb::Delete => Decision::UserDeleteDenied,
            Verb::Put => Decision::Unauthorized,
        };
    }
    Decision::Unauthorized
}

/// Decide whether verified `claims` may perform `verb` on `resource`.
///
/// Logs the claims and the computed result inside `audit`, the caller's
/// per-invocation span. Returns exactly one outcome: a policy binding
/// `resource` to Allow/Deny, or [`AuthzError::Unauthorized`].
pub fn decide(
    claims: &Claims,
    verb: Verb,
    resource: &str,
    audit: &Span,
) -> Result<PolicyResult, AuthzError> {
    audit.in_scope(|| {
        tracing::info!(
            sub = %claims.sub,
            username = claims.username.as_deref().unwrap_or_default(),
            groups = ?claims.groups,
            %verb,
            resource,
            "evaluating authorization"
        );

        let decision = evaluate(&claims.groups, verb);
        let Some((group, effect)) = decision.outcome() else {
            tracing::warn!(sub = %claims.sub, %verb, resource, "no rule grants access");
            return Err(AuthzError::Unauthorized);
        };

        let result = PolicyResult {
            principal_id: group.as_str().to_string(),
            effect,
            resource: resource.to_string(),
        };
        tracing::info!(
            principal_id = %result.principal_id,
            effect = %result.effect,
            rule = ?decision,
            "authorization decided"
        );
        Ok(result)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const RESOURCE: &str = "arn:aws:execute-api:us-east-1:123456789012:api/prod/GET/users";

    fn claims(groups: &[GroupName]) -> Claims {
        Claims {
            sub: "0b7e5c1e-0000-4000-8000-000000000001".to_string(),
            username: None,
            token_use: Some("access".to_string()),
            client_id: Some("client".to_string()),
            iss: None,
            iat: 0,
            exp: 1,
            groups: groups.iter().copied().collect(),
        }
    }

    fn run(groups: &[GroupName], verb: Verb) -> Result<PolicyResult, AuthzError> {
        decide(&claims(groups), verb, RESOURCE, &Span::none())
    }

    #[test]
    fn admin_delete_is_allowed() {
        let result = run(&[GroupName::Admin], Verb::Delete).unwrap();
        assert_eq!(result.effect, Effect::Allow);
        assert_eq!(result.principal_id, "Admin");
        assert_eq!(result.resource, RESOURCE);
    }

    #[test]
    fn user_get_is_allowed() {
        let result = run(&[GroupName::User], Verb::Get).unwrap();
        assert_eq!(result.effect, Effect::Allow);
        assert_eq!(result.principal_id, "User");
    }

    #[test]
    fn user_post_is_allowed() {
        assert_eq!(run(&[GroupName::User], Verb::Post).unwrap().effect, Effect::Allow);
    }

    #[test]
    fn user_delete_is_an_explicit_deny() {
        let result = run(&[GroupName::User], Verb::Delete).unwrap();
        assert_eq!(result.effect, Effect::Deny);
        assert_eq!(result.principal_id, "User");
    }

    #[test]
    fn user_put_is_unauthorized() {
        assert!(matches!(run(&[GroupName::User], Verb::Put), Err(AuthzError::Unauthorized)));
    }

    #[test]
    fn no_groups_is_unauthorized() {
        for verb in Verb::ALL {
            assert!(matches!(run(&[], verb), Err(AuthzError::Unauthorized)));
        }
    }

    #[test]
    fn guest_group_is_unauthorized() {
        let claims: Claims = serde_json::from_value(serde_json::json!({
            "sub": "s", "iat": 0, "exp": 1, "cognito:groups": ["Guest"]
        }))
        .unwrap();
        let err = decide(&claims, Verb::Get, RESOURCE, &Span::none()).unwrap_err();
        assert!(matches!(err, AuthzError::Unauthorized));
    }

    #[test]
    fn admin_rule_wins_over_user_deny() {
        let result = run(&[GroupName::User, GroupName::Admin], Verb::Delete).unwrap();
        assert_eq!(result.effect, Effect::Allow);
        assert_eq!(result.principal_id, "Admin");
    }

    fn any_verb() -> impl Strategy<Value = Verb> {
        prop::sample::select(Verb::ALL.to_vec())
    }

    fn any_groups() -> impl Strategy<Value = Vec<GroupName>> {
        prop::collection::vec(prop::sample::select(GroupName::ALL.to_vec()), 0..4)
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: any group set containing Admin is allowed for every verb and resource.
        #[test]
        fn admin_always_allows(verb in any_verb(), groups in any_groups(), resource in "[a-z/]{0,24}") {
            let mut groups = groups;
            groups.push(GroupName::Admin);
            let result = decide(&claims(&groups), verb, &resource, &Span::none()).unwrap();
            prop_assert_eq!(result.effect, Effect::Allow);
            prop_assert_eq!(result.resource, resource);
        }

        /// Property: identical inputs always yield identical outcomes.
        #[test]
        fn decision_is_idempotent(verb in any_verb(), groups in any_groups()) {
            let first = run(&groups, verb);
            let second = run(&groups, verb);
            match (first, second) {
                (Ok(a), Ok(b)) => { prop_assert_eq!(a, b); }
                (Err(_), Err(_)) => {}
                _ => { prop_assert!(false, "outcomes diverged"); }
            }
        }

        /// Property: names outside the recognized groups never grant access.
        #[test]
        fn unknown_groups_never_allow(verb in any_verb(), names in prop::collection::vec("[A-Za-z]{1,10}", 0..5)) {
            let names: Vec<String> = names
                .into_iter()
                .filter(|n| GroupName::from_name(n).is_none())
                .collect();
            let claims: Claims = serde_json::from_value(serde_json::json!({
                "sub": "s", "iat": 0, "exp": 1, "cognito:groups": names
            }))
            .unwrap();
            prop_assert!(decide(&claims, verb, RESOURCE, &Span::none()).is_err());
        }
    }
}
