//! HTTP client for the HandCash Connect API.
//!
//! Provides [`HandCashClient`], which signs each call for the caller's auth
//! token, sends it to the configured [`Environment`], and decodes the
//! response.

use std::time::Duration;

use handcash::profile::{Permissions, PublicProfile, PublicProfiles, PublicProfilesRequest, User};
use handcash::signer::{AuthToken, Body, Method, RequestDescriptor, build_signed_request};
use handcash::wallet::{BalanceRequest, PayParameters, PaymentRequest, PaymentResponse, SpendableBalance};
use handcash::{CurrencyCode, Environment};
use reqwest::header::{CONTENT_TYPE, HeaderValue, USER_AGENT};
use serde::de::DeserializeOwned;
#[cfg(feature = "telemetry")]
use tracing::{debug, instrument};
use url::Url;

use crate::constants::{
    DEFAULT_TIMEOUT, DEFAULT_USER_AGENT, ENDPOINT_CURRENT_PROFILE, ENDPOINT_FRIENDS,
    ENDPOINT_PAY, ENDPOINT_PAYMENT, ENDPOINT_PERMISSIONS, ENDPOINT_PUBLIC_PROFILES,
    ENDPOINT_SPENDABLE_BALANCE,
};
use crate::error::ClientError;

/// Configuration for [`HandCashClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Target environment.
    pub environment: Environment,

    /// HTTP request timeout. Ignored when `http_client` is set.
    pub timeout: Duration,

    /// Optional pre-configured reqwest client. If `None`, a new client is
    /// created with the configured timeout.
    pub http_client: Option<reqwest::Client>,

    /// `User-Agent` header value.
    pub user_agent: String,
}

impl ClientConfig {
    /// Creates a config for the given environment.
    #[must_use]
    pub fn new(environment: Environment) -> Self {
        Self {
            environment,
            timeout: DEFAULT_TIMEOUT,
            http_client: None,
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }

    /// Sets the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets a pre-configured reqwest client.
    #[must_use]
    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Sets the `User-Agent` header value.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// Async client for the HandCash Connect API.
///
/// The client holds no credentials: every operation takes the auth token of
/// the user it acts for, so one client can serve many users concurrently.
///
/// # Example
///
/// ```no_run
/// use handcash::signer::AuthToken;
/// use handcash::Environment;
/// use handcash_http::{ClientConfig, HandCashClient};
///
/// # async fn run() -> Result<(), handcash_http::ClientError> {
/// let client = HandCashClient::new(ClientConfig::new(Environment::production()))?;
/// let user = client.get_profile(&AuthToken::new("<auth token>")).await?;
/// println!("{}", user.public_profile.handle);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HandCashClient {
    environment: Environment,
    user_agent: HeaderValue,
    client: reqwest::Client,
}

impl HandCashClient {
    /// Creates a new client from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidUrl`] if the environment's API URL does
    /// not parse, [`ClientError::InvalidParameters`] if it cannot serve as a
    /// base URL or the user agent is not a valid header value, and
    /// [`ClientError::Request`] if the HTTP client cannot be built.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let api_url = Url::parse(&config.environment.api_url)?;
        if api_url.cannot_be_a_base() {
            return Err(ClientError::invalid_parameters(format!(
                "API URL '{api_url}' cannot be a base URL"
            )));
        }

        let user_agent = HeaderValue::from_str(&config.user_agent)
            .map_err(|e| ClientError::invalid_parameters(format!("user agent: {e}")))?;

        let client = match config.http_client {
            Some(client) => client,
            None => reqwest::Client::builder()
                .timeout(config.timeout)
                .build()?,
        };

        Ok(Self {
            environment: config.environment,
            user_agent,
            client,
        })
    }

    /// Returns the environment this client talks to.
    #[must_use]
    pub const fn environment(&self) -> &Environment {
        &self.environment
    }

    /// URL a user visits to authorize `app_id` in this environment.
    #[must_use]
    pub fn redirection_url(&self, app_id: &str) -> String {
        self.environment.redirection_url(app_id)
    }

    /// Fetches the current user's profile.
    ///
    /// # Errors
    ///
    /// Returns a [`ClientError`] on signing, network, status or decode failure.
    pub async fn get_profile(&self, auth_token: &AuthToken) -> Result<User, ClientError> {
        self.send(auth_token, RequestDescriptor::get(ENDPOINT_CURRENT_PROFILE))
            .await
    }

    /// Looks up public profiles by handle.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidParameters`] if `handles` is empty, or
    /// any other [`ClientError`] on failure.
    pub async fn get_public_profiles_by_handle<S: AsRef<str>>(
        &self,
        auth_token: &AuthToken,
        handles: &[S],
    ) -> Result<Vec<PublicProfile>, ClientError> {
        if handles.is_empty() {
            return Err(ClientError::invalid_parameters("no handles given"));
        }
        let request = PublicProfilesRequest {
            aliases: handles.iter().map(|h| h.as_ref().to_owned()).collect(),
        };
        let descriptor =
            RequestDescriptor::get(ENDPOINT_PUBLIC_PROFILES).with_body(Body::json(&request)?);
        let profiles: PublicProfiles = self.send(auth_token, descriptor).await?;
        Ok(profiles.items)
    }

    /// Fetches the current user's friends.
    ///
    /// # Errors
    ///
    /// Returns a [`ClientError`] on signing, network, status or decode failure.
    pub async fn get_friends(
        &self,
        auth_token: &AuthToken,
    ) -> Result<Vec<PublicProfile>, ClientError> {
        let profiles: PublicProfiles = self
            .send(auth_token, RequestDescriptor::get(ENDPOINT_FRIENDS))
            .await?;
        Ok(profiles.items)
    }

    /// Fetches the permissions the user granted to the app.
    ///
    /// # Errors
    ///
    /// Returns a [`ClientError`] on signing, network, status or decode failure.
    pub async fn get_permissions(
        &self,
        auth_token: &AuthToken,
    ) -> Result<Permissions, ClientError> {
        self.send(auth_token, RequestDescriptor::get(ENDPOINT_PERMISSIONS))
            .await
    }

    /// Fetches the amount the app may still spend for the user.
    ///
    /// With `currency_code` set, the fiat balance is expressed in that
    /// currency; otherwise the server uses the user's local currency.
    ///
    /// # Errors
    ///
    /// Returns a [`ClientError`] on signing, network, status or decode failure.
    pub async fn get_spendable_balance(
        &self,
        auth_token: &AuthToken,
        currency_code: Option<CurrencyCode>,
    ) -> Result<SpendableBalance, ClientError> {
        let mut descriptor = RequestDescriptor::get(ENDPOINT_SPENDABLE_BALANCE);
        if let Some(currency_code) = currency_code {
            descriptor = descriptor.with_body(Body::json(&BalanceRequest { currency_code })?);
        }
        self.send(auth_token, descriptor).await
    }

    /// Makes a payment from the user's wallet.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidParameters`] if there are no receivers or
    /// a receiver has an empty destination or a non-positive amount,
    /// [`ClientError::InvalidResponse`] if the server's answer carries no
    /// transaction id, or any other [`ClientError`] on failure.
    pub async fn pay(
        &self,
        auth_token: &AuthToken,
        params: &PayParameters,
    ) -> Result<PaymentResponse, ClientError> {
        validate_pay_parameters(params)?;
        let descriptor = RequestDescriptor::post(ENDPOINT_PAY).with_body(Body::json(params)?);
        let payment: PaymentResponse = self.send(auth_token, descriptor).await?;
        if payment.transaction_id.is_empty() {
            return Err(ClientError::InvalidResponse(
                "payment response has no transaction id".to_owned(),
            ));
        }
        Ok(payment)
    }

    /// Fetches a payment by transaction id.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidParameters`] if `transaction_id` is
    /// empty, or any other [`ClientError`] on failure.
    pub async fn get_payment(
        &self,
        auth_token: &AuthToken,
        transaction_id: &str,
    ) -> Result<PaymentResponse, ClientError> {
        let transaction_id = transaction_id.trim();
        if transaction_id.is_empty() {
            return Err(ClientError::invalid_parameters("missing transaction id"));
        }
        let request = PaymentRequest {
            transaction_id: transaction_id.to_owned(),
        };
        let descriptor = RequestDescriptor::get(ENDPOINT_PAYMENT).with_body(Body::json(&request)?);
        self.send(auth_token, descriptor).await
    }

    /// Signs, sends and decodes one request.
    #[cfg_attr(
        feature = "telemetry",
        instrument(
            name = "handcash.http.request",
            skip_all,
            fields(method = %descriptor.method(), endpoint = descriptor.endpoint()),
            err
        )
    )]
    async fn send<T: DeserializeOwned>(
        &self,
        auth_token: &AuthToken,
        descriptor: RequestDescriptor,
    ) -> Result<T, ClientError> {
        let signed = build_signed_request(&descriptor, &self.environment.api_url, auth_token, None)?;

        let mut request = self
            .client
            .request(reqwest_method(signed.method()), signed.uri())
            .header(USER_AGENT, self.user_agent.clone())
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        for (name, value) in signed.headers().pairs() {
            request = request.header(name, value);
        }
        if let Some(body) = signed.body_json() {
            request = request.body(body.to_owned());
        }

        let response = request.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            #[cfg(feature = "telemetry")]
            debug!(%status, "HandCash API rejected request");
            return Err(ClientError::from_status(status, &bytes));
        }

        Ok(serde_json::from_slice(&bytes)?)
    }
}

const fn reqwest_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Patch => reqwest::Method::PATCH,
        Method::Delete => reqwest::Method::DELETE,
    }
}

fn validate_pay_parameters(params: &PayParameters) -> Result<(), ClientError> {
    if params.receivers.is_empty() {
        return Err(ClientError::invalid_parameters("payment has no receivers"));
    }
    for receiver in &params.receivers {
        if receiver.to.trim().is_empty() {
            return Err(ClientError::invalid_parameters("receiver has no destination"));
        }
        if !receiver.amount.is_finite() || receiver.amount <= 0.0 {
            return Err(ClientError::invalid_parameters(format!(
                "invalid amount {} for receiver '{}'",
                receiver.amount, receiver.to
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use handcash::SignError;
    use handcash::signer::{PublicKey, verify};
    use handcash::wallet::Payment;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, header_exists, method, path};
    use wiremock::{Mock, MockServer, Request, ResponseTemplate};

    const TOKEN: &str = "68d8fadc95324afa853f00923e0b86f06a76ceb7a6afbb1784e0dde8f43989a0";
    const PUBLIC_KEY: &str = "0275e7081e5b6e73c94998098e075c0ed888d1eb33c721ee38ee741648b108c90d";

    fn token() -> AuthToken {
        AuthToken::new(TOKEN)
    }

    fn client_for(server: &MockServer) -> HandCashClient {
        let environment = Environment::custom("mock", server.uri(), server.uri());
        HandCashClient::new(ClientConfig::new(environment)).unwrap()
    }

    fn header_str<'a>(request: &'a Request, name: &str) -> &'a str {
        request.headers.get(name).unwrap().to_str().unwrap()
    }

    /// Rebuilds the canonical payload from what arrived on the wire and
    /// checks the signature the way the HandCash server does.
    fn assert_wire_signature_valid(request: &Request) {
        let timestamp = header_str(request, "oauth-timestamp");
        let body = if request.body.is_empty() {
            "{}".to_owned()
        } else {
            String::from_utf8(request.body.clone()).unwrap()
        };
        let payload = format!(
            "{}\n{}\n{}\n{}",
            request.method.as_str(),
            request.url.path(),
            timestamp,
            body
        );
        let public_key =
            PublicKey::from_slice(&hex::decode(header_str(request, "oauth-publickey")).unwrap())
                .unwrap();
        let signature = hex::decode(header_str(request, "oauth-signature")).unwrap();
        assert!(verify(&payload, &signature, &public_key), "payload {payload:?}");
    }

    fn payment_json() -> serde_json::Value {
        json!({
            "transactionId": "4eb7ab228ab9a23831b5b788e3f0eb5bed6dcdbb6d9d808eaba559c49afb9b0a",
            "note": "Thanks dude!",
            "type": "send",
            "time": 1_608_222_315,
            "satoshiFees": 113,
            "satoshiAmount": 5_935,
            "fiatExchangeRate": 168.5,
            "fiatCurrencyCode": "USD",
            "participants": [],
            "attachments": [],
            "appAction": "like"
        })
    }

    #[tokio::test]
    async fn test_get_profile_sends_signed_headers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(ENDPOINT_CURRENT_PROFILE))
            .and(header("oauth-publickey", PUBLIC_KEY))
            .and(header_exists("oauth-signature"))
            .and(header_exists("oauth-timestamp"))
            .and(header("user-agent", DEFAULT_USER_AGENT))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "publicProfile": { "handle": "mrz", "displayName": "MrZ" },
                "privateProfile": { "email": "mrz@example.com" }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let user = client_for(&server).get_profile(&token()).await.unwrap();
        assert_eq!(user.public_profile.handle, "mrz");
        assert_eq!(user.private_profile.email, "mrz@example.com");

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].body.is_empty());
        assert_wire_signature_valid(&requests[0]);
    }

    #[tokio::test]
    async fn test_pay_sends_the_signed_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(ENDPOINT_PAY))
            .and(body_json(json!({
                "description": "Thanks dude!",
                "receivers": [{ "to": "mrz@moneybutton.com", "currencyCode": "USD", "amount": 0.01 }]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(payment_json()))
            .expect(1)
            .mount(&server)
            .await;

        let params = PayParameters::new()
            .with_description("Thanks dude!")
            .with_receiver(Payment::new("mrz@moneybutton.com", 0.01, CurrencyCode::Usd));
        let payment = client_for(&server).pay(&token(), &params).await.unwrap();
        assert_eq!(payment.satoshi_amount, 5_935);

        let requests = server.received_requests().await.unwrap();
        assert_wire_signature_valid(&requests[0]);
    }

    #[tokio::test]
    async fn test_pay_decodes_unlisted_currency_and_null_note() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(ENDPOINT_PAY))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "transactionId": "4eb7ab228ab9a23831b5b788e3f0eb5bed6dcdbb6d9d808eaba559c49afb9b0a",
                "note": null,
                "type": "send",
                "satoshiAmount": 5_935,
                "fiatCurrencyCode": "INR",
                "participants": null
            })))
            .expect(1)
            .mount(&server)
            .await;

        let params =
            PayParameters::new().with_receiver(Payment::new("mrz", 1.0, CurrencyCode::Usd));
        let payment = client_for(&server).pay(&token(), &params).await.unwrap();
        assert_eq!(
            payment.transaction_id,
            "4eb7ab228ab9a23831b5b788e3f0eb5bed6dcdbb6d9d808eaba559c49afb9b0a"
        );
        assert_eq!(payment.fiat_currency_code, "INR");
        assert_eq!(payment.fiat_currency(), None);
        assert!(payment.note.is_empty());
        assert!(payment.participants.is_empty());
    }

    #[tokio::test]
    async fn test_pay_rejects_missing_receivers_before_sending() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client.pay(&token(), &PayParameters::new()).await.unwrap_err();
        assert!(matches!(err, ClientError::InvalidParameters(_)));

        let zero = PayParameters::new().with_receiver(Payment::new("mrz", 0.0, CurrencyCode::Usd));
        let err = client.pay(&token(), &zero).await.unwrap_err();
        assert!(matches!(err, ClientError::InvalidParameters(_)));
    }

    #[tokio::test]
    async fn test_pay_requires_transaction_id() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(ENDPOINT_PAY))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "note": "?" })))
            .mount(&server)
            .await;

        let params =
            PayParameters::new().with_receiver(Payment::new("mrz", 100.0, CurrencyCode::Sat));
        let err = client_for(&server).pay(&token(), &params).await.unwrap_err();
        assert!(matches!(err, ClientError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_get_payment_sends_transaction_id() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(ENDPOINT_PAYMENT))
            .and(body_json(json!({ "transactionId": "abc123" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(payment_json()))
            .expect(1)
            .mount(&server)
            .await;

        let payment = client_for(&server)
            .get_payment(&token(), " abc123 ")
            .await
            .unwrap();
        assert_eq!(payment.fiat_currency(), Some(CurrencyCode::Usd));

        let requests = server.received_requests().await.unwrap();
        assert_wire_signature_valid(&requests[0]);
    }

    #[tokio::test]
    async fn test_get_payment_rejects_empty_id() {
        let server = MockServer::start().await;
        let err = client_for(&server)
            .get_payment(&token(), "  ")
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::InvalidParameters(_)));
    }

    #[tokio::test]
    async fn test_spendable_balance_with_currency() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(ENDPOINT_SPENDABLE_BALANCE))
            .and(body_json(json!({ "currencyCode": "EUR" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "spendableSatoshiBalance": 2000,
                "spendableFiatBalance": 0.34,
                "currencyCode": "EUR"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let balance = client_for(&server)
            .get_spendable_balance(&token(), Some(CurrencyCode::Eur))
            .await
            .unwrap();
        assert_eq!(balance.spendable_satoshi_balance, 2000);
        assert_eq!(balance.currency(), Some(CurrencyCode::Eur));
    }

    #[tokio::test]
    async fn test_friends_and_public_profiles() {
        let server = MockServer::start().await;
        let profiles = json!({ "items": [{ "handle": "a" }, { "handle": "b" }] });
        Mock::given(method("GET"))
            .and(path(ENDPOINT_FRIENDS))
            .respond_with(ResponseTemplate::new(200).set_body_json(&profiles))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(ENDPOINT_PUBLIC_PROFILES))
            .and(body_json(json!({ "aliases": ["a", "b"] })))
            .respond_with(ResponseTemplate::new(200).set_body_json(&profiles))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let friends = client.get_friends(&token()).await.unwrap();
        assert_eq!(friends.len(), 2);

        let found = client
            .get_public_profiles_by_handle(&token(), &["a", "b"])
            .await
            .unwrap();
        assert_eq!(found[1].handle, "b");

        let empty: [&str; 0] = [];
        let err = client
            .get_public_profiles_by_handle(&token(), &empty)
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::InvalidParameters(_)));
    }

    #[tokio::test]
    async fn test_permissions() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(ENDPOINT_PERMISSIONS))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "items": ["PAY"], "appId": "app-1" })),
            )
            .mount(&server)
            .await;

        let permissions = client_for(&server).get_permissions(&token()).await.unwrap();
        assert_eq!(permissions.items, vec!["PAY".to_owned()]);
        assert_eq!(permissions.app_id, "app-1");
    }

    #[tokio::test]
    async fn test_error_status_carries_server_message() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(ENDPOINT_CURRENT_PROFILE))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(json!({ "message": "Invalid signature" })),
            )
            .mount(&server)
            .await;

        let err = client_for(&server).get_profile(&token()).await.unwrap_err();
        match err {
            ClientError::Status { status, message } => {
                assert_eq!(status, reqwest::StatusCode::UNAUTHORIZED);
                assert_eq!(message, "Invalid signature");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_undecodable_success_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(ENDPOINT_PERMISSIONS))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = client_for(&server).get_permissions(&token()).await.unwrap_err();
        assert!(matches!(err, ClientError::Decode(_)));
    }

    #[tokio::test]
    async fn test_invalid_token_never_reaches_the_network() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let err = client_for(&server)
            .get_profile(&AuthToken::new("fakeToken"))
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Sign(SignError::InvalidToken(_))));
    }

    #[test]
    fn test_new_rejects_invalid_api_url() {
        let environment = Environment::custom("broken", "not a url", "not a url");
        let err = HandCashClient::new(ClientConfig::new(environment)).unwrap_err();
        assert!(matches!(err, ClientError::InvalidUrl(_)));
    }

    #[test]
    fn test_redirection_url_uses_client_url() {
        let client = HandCashClient::new(ClientConfig::new(Environment::beta())).unwrap();
        assert_eq!(
            client.redirection_url("app-1"),
            "https://beta-app.handcash.io/#/authorizeApp?appId=app-1"
        );
    }
}
