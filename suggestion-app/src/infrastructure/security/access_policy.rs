use crate::domain::User;

/// Role-based vote/admin eligibility.
///
/// Role ids are opaque strings assigned on the Discord guild. With
/// `dev_mode` on, every check passes for any logged-in user.
#[derive(Debug, Clone, Default)]
pub struct AccessPolicy {
    voter_roles: Vec<String>,
    admin_roles: Vec<String>,
    dev_mode: bool,
}

impl AccessPolicy {
    pub fn new(voter_roles: Vec<String>, admin_roles: Vec<String>, dev_mode: bool) -> Self {
        Self {
            voter_roles,
            admin_roles,
            dev_mode,
        }
    }

    pub fn dev_mode(&self) -> bool {
        self.dev_mode
    }

    pub fn can_vote(&self, user: &User) -> bool {
        self.has_role(user, &self.voter_roles) || self.has_role(user, &self.admin_roles)
    }

    pub fn is_admin(&self, user: &User) -> bool {
        self.has_role(user, &self.admin_roles)
    }

    fn has_role(&self, user: &User, required: &[String]) -> bool {
        self.dev_mode || user.has_any_role(required)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_with(roles: &[&str]) -> User {
        User::new(
            "1".to_string(),
            "tester".to_string(),
            roles.iter().map(|r| r.to_string()).collect(),
        )
    }

    fn policy() -> AccessPolicy {
        AccessPolicy::new(vec!["voter".into()], vec!["admin".into()], false)
    }

    #[test]
    fn test_voter_can_vote_but_is_not_admin() {
        let user = user_with(&["voter"]);
        assert!(policy().can_vote(&user));
        assert!(!policy().is_admin(&user));
    }

    #[test]
    fn test_admin_can_vote() {
        let user = user_with(&["admin"]);
        assert!(policy().can_vote(&user));
        assert!(policy().is_admin(&user));
    }

    #[test]
    fn test_no_matching_role() {
        let user = user_with(&["guest"]);
        assert!(!policy().can_vote(&user));
        assert!(!policy().is_admin(&user));
        assert!(!policy().can_vote(&user_with(&[])));
    }

    #[test]
    fn test_empty_role_lists_deny() {
        let policy = AccessPolicy::new(vec![], vec![], false);
        assert!(!policy.can_vote(&user_with(&["voter", "admin"])));
    }

    #[test]
    fn test_dev_mode_is_permissive() {
        let policy = AccessPolicy::new(vec![], vec![], true);
        let user = user_with(&[]);
        assert!(policy.can_vote(&user));
        assert!(policy.is_admin(&user));
    }
}
