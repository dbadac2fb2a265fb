use std::sync::LazyLock;

use regex::Regex;

use crate::domain::error::DomainError;

pub const MAX_DOMAIN_NAME_LEN: usize = 50;

/// Reserved name of the microservice gateway.
pub const GATEWAY_SERVICE: &str = "api-gateway";

static DOMAIN_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z][a-z0-9_]*$").expect("static regex is valid"));

static PROJECT_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_-]*$").expect("static regex is valid"));

static SERVICE_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z][a-z0-9_-]*$").expect("static regex is valid"));

/// Centralized name validation.
///
/// All checks run before any disk mutation.
pub struct DomainValidator;

impl DomainValidator {
    pub fn validate_domain_name(name: &str) -> Result<(), DomainError> {
        let invalid = |reason: &str| DomainError::InvalidDomainName {
            name: name.into(),
            reason: reason.into(),
        };
        if name.is_empty() {
            return Err(invalid("name is empty"));
        }
        if name.len() > MAX_DOMAIN_NAME_LEN {
            return Err(invalid("longer than 50 characters"));
        }
        if !DOMAIN_NAME.is_match(name) {
            return Err(invalid(
                "must start with a lowercase letter and contain only a-z, 0-9 and _",
            ));
        }
        Ok(())
    }

    pub fn validate_project_name(name: &str) -> Result<(), DomainError> {
        if name.trim().is_empty() {
            return Err(DomainError::InvalidProjectName {
                name: name.into(),
                reason: "name is empty".into(),
            });
        }
        if !PROJECT_NAME.is_match(name) {
            return Err(DomainError::InvalidProjectName {
                name: name.into(),
                reason: "must start with a letter and contain only letters, digits, - and _"
                    .into(),
            });
        }
        Ok(())
    }

    /// Validate the named microservices, rejecting duplicates.
    pub fn validate_service_names(names: &[String], include_gateway: bool) -> Result<(), DomainError> {
        for (i, name) in names.iter().enumerate() {
            if !SERVICE_NAME.is_match(name) {
                return Err(DomainError::InvalidServiceName {
                    name: name.clone(),
                    reason: "must start with a lowercase letter and contain only a-z, 0-9, - and _"
                        .into(),
                });
            }
            if include_gateway && name == GATEWAY_SERVICE {
                return Err(DomainError::InvalidServiceName {
                    name: name.clone(),
                    reason: "reserved for the API gateway".into(),
                });
            }
            if names[..i].contains(name) {
                return Err(DomainError::DuplicateService { name: name.clone() });
            }
        }
        Ok(())
    }

    /// Onion entities become Python modules, so they follow the domain rule.
    pub fn validate_entity_name(name: &str) -> Result<(), DomainError> {
        if !DOMAIN_NAME.is_match(name) || name.len() > MAX_DOMAIN_NAME_LEN {
            return Err(DomainError::InvalidEntityName {
                name: name.into(),
                reason: "must be a lowercase Python identifier".into(),
            });
        }
        Ok(())
    }
}
