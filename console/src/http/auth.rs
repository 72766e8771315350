//! Management authentication API

use http::Method;
use openapi_client::TokenResponse;
use secrecy::{ExposeSecret, SecretString};

use crate::http::client::{decode_required, ApiError, HttpClient, RequestOptions};

/// Operator credentials submitted on the login form
#[derive(Debug, Clone)]
pub struct Credentials {
    pub email: String,
    pub password: SecretString,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: SecretString::from(password.into()),
        }
    }
}

impl HttpClient {
    /// Exchange credentials for a management token
    pub async fn login(&self, credentials: &Credentials) -> Result<TokenResponse, ApiError> {
        let body = serde_json::json!({
            "email": credentials.email,
            "password": credentials.password.expose_secret(),
        });
        let options = RequestOptions::default()
            .with_method(Method::POST)
            .with_json(body);
        decode_required(self.request("/management/auth/login", options).await?)
    }

    /// Exchange a still-valid token for a fresh one
    pub async fn refresh_token(&self, token: &str) -> Result<TokenResponse, ApiError> {
        let options = RequestOptions::get(token).with_method(Method::POST);
        decode_required(self.request("/management/auth/refresh", options).await?)
    }
}
