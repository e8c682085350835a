//! Stripe integration via REST API (no SDK dependency)

use std::time::Duration;

use async_trait::async_trait;

use super::payment::{PaymentError, PaymentGateway};
use crate::orders::money::to_minor_units;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Stripe PaymentIntents client
#[derive(Debug, Clone)]
pub struct StripeGateway {
    client: reqwest::Client,
    secret_key: String,
    api_base: String,
}

impl StripeGateway {
    pub fn new(
        secret_key: impl Into<String>,
        api_base: impl Into<String>,
    ) -> Result<Self, PaymentError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            secret_key: secret_key.into(),
            api_base: api_base.into().trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl PaymentGateway for StripeGateway {
    async fn create_payment_intent(
        &self,
        amount: f64,
        currency: &str,
    ) -> Result<String, PaymentError> {
        let minor_units = to_minor_units(amount);
        if minor_units <= 0 {
            return Err(PaymentError::InvalidAmount(amount));
        }

        let resp = self
            .client
            .post(format!("{}/v1/payment_intents", self.api_base))
            .basic_auth(&self.secret_key, None::<&str>)
            .form(&[
                ("amount", minor_units.to_string()),
                ("currency", currency.to_string()),
                ("automatic_payment_methods[enabled]", "true".to_string()),
            ])
            .send()
            .await?;

        let status = resp.status();
        let body: serde_json::Value = resp.json().await?;

        if let Some(secret) = body["client_secret"].as_str() {
            tracing::info!(amount_minor = minor_units, currency, "Stripe payment intent created");
            return Ok(secret.to_string());
        }

        let message = body["error"]["message"]
            .as_str()
            .map(String::from)
            .unwrap_or_else(|| format!("HTTP {status}: {body}"));
        tracing::warn!(status = %status, error = %message, "Stripe create_payment_intent failed");
        Err(PaymentError::Provider(message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::Form;
    use axum::http::{HeaderMap, StatusCode};
    use axum::response::IntoResponse;
    use axum::routing::post;
    use axum::{Json, Router};
    use std::collections::HashMap;

    /// 本地假 Stripe，返回 (base_url, 服务任务)
    async fn fake_stripe(
        handler: Router,
    ) -> (String, tokio::task::JoinHandle<()>) {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let task = tokio::spawn(async move {
            axum::serve(listener, handler).await.unwrap();
        });
        (format!("http://{addr}"), task)
    }

    #[tokio::test]
    async fn test_posts_minor_units_with_basic_auth() {
        let app = Router::new().route(
            "/v1/payment_intents",
            post(
                |headers: HeaderMap, Form(form): Form<HashMap<String, String>>| async move {
                    let auth = headers
                        .get("authorization")
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or_default()
                        .to_string();
                    // "sk_test_123:" base64
                    assert_eq!(auth, "Basic c2tfdGVzdF8xMjM6");
                    assert_eq!(form["amount"], "65050");
                    assert_eq!(form["currency"], "inr");
                    assert_eq!(form["automatic_payment_methods[enabled]"], "true");
                    Json(serde_json::json!({ "id": "pi_1", "client_secret": "pi_1_secret_abc" }))
                },
            ),
        );
        let (base, task) = fake_stripe(app).await;

        let gateway = StripeGateway::new("sk_test_123", format!("{base}/")).unwrap();
        let secret = gateway.create_payment_intent(650.5, "inr").await.unwrap();

        assert_eq!(secret, "pi_1_secret_abc");
        task.abort();
    }

    #[tokio::test]
    async fn test_provider_error_message_is_reported() {
        let app = Router::new().route(
            "/v1/payment_intents",
            post(|| async {
                (
                    StatusCode::BAD_REQUEST,
                    Json(serde_json::json!({
                        "error": {
                            "message": "Invalid currency: xyz",
                            "type": "invalid_request_error"
                        }
                    })),
                )
                    .into_response()
            }),
        );
        let (base, task) = fake_stripe(app).await;

        let gateway = StripeGateway::new("sk_test_123", base).unwrap();
        let err = gateway.create_payment_intent(10.0, "xyz").await.unwrap_err();

        match err {
            PaymentError::Provider(message) => assert_eq!(message, "Invalid currency: xyz"),
            other => panic!("unexpected error: {other:?}"),
        }
        task.abort();
    }

    #[tokio::test]
    async fn test_non_positive_amount_is_rejected_locally() {
        let gateway = StripeGateway::new("sk_test_123", "http://127.0.0.1:9").unwrap();
        let err = gateway.create_payment_intent(0.0, "inr").await.unwrap_err();
        assert!(matches!(err, PaymentError::InvalidAmount(_)));
    }
}
