//! Console diagnostic report

use colored::Colorize;

use crate::app::options::AppOptions;
use crate::authn::management_token::ManagementToken;
use crate::authn::session::{FileTokenStorage, TokenStorage};
use crate::http::api::ManagementApi;
use crate::http::client::{ApiError, HttpClient};
use crate::utils::{format_timestamp, version_info};

/// Result of probing the management API
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiProbe {
    /// The API accepted the stored token
    Authorized,
    /// The API answered but rejected the request
    Answered(u16),
    /// No response at all
    Unreachable(String),
}

impl ApiProbe {
    fn from_result<T>(result: Result<T, ApiError>) -> Self {
        match result {
            Ok(_) => ApiProbe::Authorized,
            Err(ApiError::Status { status, .. }) => ApiProbe::Answered(status),
            Err(e) => ApiProbe::Unreachable(e.to_string()),
        }
    }

    pub fn is_reachable(&self) -> bool {
        !matches!(self, ApiProbe::Unreachable(_))
    }
}

/// Probe the API with `token`. An empty token still tells whether the API answers.
pub async fn probe_api(api: &dyn ManagementApi, token: Option<&str>) -> ApiProbe {
    ApiProbe::from_result(api.device_counts(token.unwrap_or_default()).await)
}

fn ok(msg: &str) {
    println!("  {} {}", "✓".green().bold(), msg);
}

fn warn(msg: &str) {
    println!("  {} {}", "⚠".yellow(), msg.yellow());
}

fn fail(msg: &str) {
    println!("  {} {}", "✗".red().bold(), msg.red());
}

/// Print the diagnostic report for `options`
pub async fn run_diagnostic(options: &AppOptions) {
    let version = version_info();
    println!();
    println!("{}", "Harbor Console diagnostic".cyan().bold());
    println!(
        "  version {} ({}, built {})",
        version.version, version.git_hash, version.build_time
    );
    println!(
        "  storage {}",
        options.storage.layout.base_dir.display().to_string().dimmed()
    );
    println!();

    println!("{}", "Stored session".yellow().bold());
    let storage = FileTokenStorage::new(options.storage.layout.session_file());
    let token = match storage.load().await {
        Ok(token) => token,
        Err(e) => {
            fail(&format!("Unreadable session file: {}", e));
            None
        }
    };
    match &token {
        None => warn("No operator session stored"),
        Some(raw) => match ManagementToken::from_raw(raw.as_str()) {
            Ok(jwt) if jwt.is_expired() => warn(&format!(
                "Token for {} expired at {}",
                jwt.user_id(),
                format_timestamp(jwt.expires_at().as_ref())
            )),
            Ok(jwt) => ok(&format!(
                "Token for {} valid until {}",
                jwt.user_id(),
                format_timestamp(jwt.expires_at().as_ref())
            )),
            Err(_) => ok("Opaque token stored"),
        },
    }
    println!();

    println!("{}", "Management API".yellow().bold());
    println!("  {}", options.api.base_url.dimmed());
    let client = match HttpClient::new(&options.api.base_url, options.api.request_timeout) {
        Ok(client) => client,
        Err(e) => {
            fail(&format!("Invalid API configuration: {}", e));
            return;
        }
    };
    match probe_api(&client, token.as_deref()).await {
        ApiProbe::Authorized => ok("Reachable, session accepted"),
        ApiProbe::Answered(401) if token.is_some() => {
            warn("Reachable, stored session rejected (sign in again)")
        }
        ApiProbe::Answered(status) => ok(&format!("Reachable (HTTP {})", status)),
        ApiProbe::Unreachable(reason) => fail(&format!("Unreachable: {}", reason)),
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_classification() {
        let ok: Result<(), ApiError> = Ok(());
        assert_eq!(ApiProbe::from_result(ok), ApiProbe::Authorized);

        let rejected: Result<(), ApiError> = Err(ApiError::Status {
            status: 401,
            message: "unauthorized".to_string(),
        });
        let probe = ApiProbe::from_result(rejected);
        assert_eq!(probe, ApiProbe::Answered(401));
        assert!(probe.is_reachable());

        let garbled: Result<(), ApiError> = Err(ApiError::Decode("eof".to_string()));
        assert!(!ApiProbe::from_result(garbled).is_reachable());
    }
}
