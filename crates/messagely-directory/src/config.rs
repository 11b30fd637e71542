use std::str::FromStr;

use argon2::Params;

use crate::error::DirectoryError;

#[derive(Debug, Clone, Default)]
pub struct DirectoryConfig {
    pub hash_cost: HashCost,
    pub auth_policy: AuthPolicy,
}

/// Argon2id cost parameters applied to newly hashed credentials.
/// Existing hashes keep verifying with the parameters they were created with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashCost {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl HashCost {
    /// Smallest cost argon2 accepts. Only for tests.
    pub fn fast() -> Self {
        Self {
            memory_kib: Params::MIN_M_COST,
            iterations: Params::MIN_T_COST,
            parallelism: Params::MIN_P_COST,
        }
    }
}

impl Default for HashCost {
    fn default() -> Self {
        Self {
            memory_kib: Params::DEFAULT_M_COST,
            iterations: Params::DEFAULT_T_COST,
            parallelism: Params::DEFAULT_P_COST,
        }
    }
}

/// How `authenticate` reports an unknown username versus a wrong password.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AuthPolicy {
    /// "Username not found" (NotFound) vs "Incorrect password" (Authentication).
    #[default]
    Distinct,
    /// Both become Authentication("Invalid credentials"), so callers cannot
    /// probe which usernames exist.
    Uniform,
}

impl AuthPolicy {
    pub(crate) fn unknown_username(self) -> DirectoryError {
        match self {
            Self::Distinct => DirectoryError::NotFound("Username not found".into()),
            Self::Uniform => DirectoryError::Authentication("Invalid credentials".into()),
        }
    }

    pub(crate) fn wrong_password(self) -> DirectoryError {
        match self {
            Self::Distinct => DirectoryError::Authentication("Incorrect password".into()),
            Self::Uniform => DirectoryError::Authentication("Invalid credentials".into()),
        }
    }
}

impl FromStr for AuthPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "distinct" => Ok(Self::Distinct),
            "uniform" => Ok(Self::Uniform),
            other => Err(anyhow::anyhow!("Unknown auth policy '{}' (expected distinct or uniform)", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_policy_names() {
        assert_eq!("distinct".parse::<AuthPolicy>().unwrap(), AuthPolicy::Distinct);
        assert_eq!(" Uniform ".parse::<AuthPolicy>().unwrap(), AuthPolicy::Uniform);
        assert!("strict".parse::<AuthPolicy>().is_err());
    }

    #[test]
    fn uniform_policy_hides_which_check_failed() {
        let unknown = AuthPolicy::Uniform.unknown_username();
        let wrong = AuthPolicy::Uniform.wrong_password();
        assert_eq!(unknown.to_string(), wrong.to_string());
        assert_eq!(unknown.kind(), wrong.kind());
    }
}
