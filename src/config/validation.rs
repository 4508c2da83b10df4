//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check upstream URLs are well-formed plain-http addresses
//! - Check mounted paths are absolute
//! - Check the bundler command is runnable in principle
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServerConfig → Result<(), Vec<ValidationError>>
//! - Runs after environment overrides, before the config is accepted

use crate::config::schema::ServerConfig;

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: &'static str,
    /// Human-readable description.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

fn check_upstream_url(field: &'static str, value: &str, errors: &mut Vec<ValidationError>) {
    match url::Url::parse(value) {
        Ok(url) => {
            if url.scheme() != "http" {
                errors.push(ValidationError {
                    field,
                    message: format!("unsupported scheme `{}` (only http upstreams)", url.scheme()),
                });
            }
            if url.host_str().is_none() {
                errors.push(ValidationError {
                    field,
                    message: "missing host".to_string(),
                });
            }
        }
        Err(e) => errors.push(ValidationError {
            field,
            message: format!("invalid url `{value}`: {e}"),
        }),
    }
}

fn check_absolute_path(field: &'static str, value: &str, errors: &mut Vec<ValidationError>) {
    if !value.starts_with('/') {
        errors.push(ValidationError {
            field,
            message: format!("`{value}` must start with `/`"),
        });
    }
}

/// Validate a configuration, collecting every problem found.
pub fn validate_config(config: &ServerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_upstream_url("upstreams.cms_url", &config.upstreams.cms_url, &mut errors);
    check_upstream_url("upstreams.render_url", &config.upstreams.render_url, &mut errors);

    check_absolute_path("webhook.path", &config.webhook.path, &mut errors);
    check_absolute_path("webhook.forward_path", &config.webhook.forward_path, &mut errors);

    if config.webhook.signature_header.trim().is_empty() {
        errors.push(ValidationError {
            field: "webhook.signature_header",
            message: "must not be empty".to_string(),
        });
    }

    if config.build.command.trim().is_empty() {
        errors.push(ValidationError {
            field: "build.command",
            message: "must not be empty".to_string(),
        });
    }

    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<std::net::SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError {
            field: "observability.metrics_address",
            message: format!(
                "`{}` is not a socket address",
                config.observability.metrics_address
            ),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
