use api_types::{
    bank::BankAccount,
    profile::{PaymentProfile, ProfileNew},
};
use reqwest::Url;

use serde::Deserialize;

use crate::error::{AppError, Result};

#[derive(Debug)]
pub enum ClientError {
    Unauthorized,
    Forbidden,
    NotFound,
    Conflict(String),
    Validation(String),
    Server(String),
    Transport(reqwest::Error),
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Debug, Clone)]
pub struct Client {
    base_url: Url,
    http: reqwest::Client,
}

impl Client {
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|err| AppError::Terminal(format!("invalid base_url: {err}")))?;
        Ok(Self {
            base_url,
            http: reqwest::Client::new(),
        })
    }

    pub async fn payment_profiles(
        &self,
    ) -> std::result::Result<Vec<PaymentProfile>, ClientError> {
        let endpoint = self
            .base_url
            .join("api/payment-profiles")
            .map_err(|err| ClientError::Server(format!("invalid base_url: {err}")))?;

        let res = self
            .http
            .get(endpoint)
            .send()
            .await
            .map_err(ClientError::Transport)?;

        if res.status().is_success() {
            return res
                .json::<Vec<PaymentProfile>>()
                .await
                .map_err(ClientError::Transport);
        }

        let status = res.status();
        let body = res
            .json::<ErrorResponse>()
            .await
            .map(|err| err.error)
            .unwrap_or_else(|_| "unknown error".to_string());

        let err = match status.as_u16() {
            401 => ClientError::Unauthorized,
            403 => ClientError::Forbidden,
            404 => ClientError::NotFound,
            409 => ClientError::Conflict(body),
            422 => ClientError::Validation(body),
            _ => ClientError::Server(body),
        };
        Err(err)
    }

    pub async fn create_payment_profile(
        &self,
        payload: &ProfileNew,
    ) -> std::result::Result<PaymentProfile, ClientError> {
        let endpoint = self
            .base_url
            .join("api/payment-profiles")
            .map_err(|err| ClientError::Server(format!("invalid base_url: {err}")))?;

        let res = self
            .http
            .post(endpoint)
            .json(payload)
            .send()
            .await
            .map_err(ClientError::Transport)?;

        if res.status().is_success() {
            return res
                .json::<PaymentProfile>()
                .await
                .map_err(ClientError::Transport);
        }

        let status = res.status();
        let body = res
            .json::<ErrorResponse>()
            .await
            .map(|err| err.error)
            .unwrap_or_else(|_| "unknown error".to_string());

        let err = match status.as_u16() {
            401 => ClientError::Unauthorized,
            403 => ClientError::Forbidden,
            404 => ClientError::NotFound,
            409 => ClientError::Conflict(body),
            422 => ClientError::Validation(body),
            _ => ClientError::Server(body),
        };
        Err(err)
    }

    pub async fn bank_accounts(&self) -> std::result::Result<Vec<BankAccount>, ClientError> {
        let endpoint = self
            .base_url
            .join("api/settings/banks")
            .map_err(|err| ClientError::Server(format!("invalid base_url: {err}")))?;

        let res = self
            .http
            .get(endpoint)
            .send()
            .await
            .map_err(ClientError::Transport)?;

        if res.status().is_success() {
            return res
                .json::<Vec<BankAccount>>()
                .await
                .map_err(ClientError::Transport);
        }

        let status = res.status();
        let body = res
            .json::<ErrorResponse>()
            .await
            .map(|err| err.error)
            .unwrap_or_else(|_| "unknown error".to_string());

        let err = match status.as_u16() {
            401 => ClientError::Unauthorized,
            403 => ClientError::Forbidden,
            404 => ClientError::NotFound,
            409 => ClientError::Conflict(body),
            422 => ClientError::Validation(body),
            _ => ClientError::Server(body),
        };
        Err(err)
    }
}
