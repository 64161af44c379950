use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, Result};

const MIN_SESSION_TIMEOUT: u32 = 5;
const MAX_SESSION_TIMEOUT: u32 = 1440;

/// Per-workspace access policy (one per workspace, upserted)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecurityPolicy {
    pub workspace_id: String,
    pub require_mfa: bool,
    /// Email domains allowed to join; empty means any
    pub allowed_domains: Vec<String>,
    pub session_timeout_minutes: u32,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SecurityPolicyUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub require_mfa: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_domains: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_timeout_minutes: Option<u32>,
}

impl SecurityPolicy {
    /// Policy returned for workspaces that never stored one
    pub fn default_for(workspace_id: &str) -> Self {
        Self {
            workspace_id: workspace_id.to_string(),
            require_mfa: false,
            allowed_domains: Vec::new(),
            session_timeout_minutes: 60,
            updated_at: Utc::now(),
        }
    }

    pub fn apply(&mut self, update: SecurityPolicyUpdate) -> Result<()> {
        if let Some(timeout) = update.session_timeout_minutes {
            if !(MIN_SESSION_TIMEOUT..=MAX_SESSION_TIMEOUT).contains(&timeout) {
                return Err(DomainError::validation(
                    "session_timeout_minutes",
                    format!(
                        "must be between {} and {}",
                        MIN_SESSION_TIMEOUT, MAX_SESSION_TIMEOUT
                    ),
                ));
            }
        }
        if let Some(ref domains) = update.allowed_domains {
            if domains.iter().any(|d| d.trim().is_empty() || d.contains('@')) {
                return Err(DomainError::validation(
                    "allowed_domains",
                    "entries must be bare domain names",
                ));
            }
        }

        if let Some(require_mfa) = update.require_mfa {
            self.require_mfa = require_mfa;
        }
        if let Some(domains) = update.allowed_domains {
            self.allowed_domains = domains.into_iter().map(|d| d.to_lowercase()).collect();
        }
        if let Some(timeout) = update.session_timeout_minutes {
            self.session_timeout_minutes = timeout;
        }
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Whether `email` may join under this policy
    pub fn allows_email(&self, email: &str) -> bool {
        if self.allowed_domains.is_empty() {
            return true;
        }
        match email.rsplit_once('@') {
            Some((_, domain)) => {
                let domain = domain.to_lowercase();
                self.allowed_domains.iter().any(|d| *d == domain)
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_bounds() {
        let mut policy = SecurityPolicy::default_for("ws-1");
        let update = SecurityPolicyUpdate {
            session_timeout_minutes: Some(2),
            ..Default::default()
        };
        assert!(policy.apply(update).is_err());
        assert_eq!(policy.session_timeout_minutes, 60);
    }

    #[test]
    fn test_domain_allow_list() {
        let mut policy = SecurityPolicy::default_for("ws-1");
        assert!(policy.allows_email("anyone@anywhere.io"));

        policy
            .apply(SecurityPolicyUpdate {
                allowed_domains: Some(vec!["Example.com".to_string()]),
                ..Default::default()
            })
            .unwrap();

        assert!(policy.allows_email("ada@example.com"));
        assert!(!policy.allows_email("ada@other.com"));
    }
}
