//! Postita async client implementation.

use crate::request::{send_fields, send_finvoice_fields, send_with_address_fields};
use crate::{Address, Document, Error, FinvoiceOptions, JobFilter, Result, SendOptions};
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT};
use reqwest::multipart::Form;
use reqwest::{Method, Response};
use std::fmt;
use std::fmt::Display;
use std::time::Duration;

/// Async client for the Postita print and mail service.
///
/// Every call is a single authenticated request. Use [`Client::new`] for
/// defaults or [`Client::builder`] for a custom endpoint, proxy, or timeout.
#[derive(Clone)]
pub struct Client {
    http: reqwest::Client,
    user: String,
    pass: String,
    proxy: Option<String>,
    base_url: String,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("user", &self.user)
            .field("pass", &"<redacted>")
            .field("proxy", &self.proxy)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl Client {
    /// Create a builder for configuring the client.
    pub fn builder(user: impl Into<String>, pass: impl Into<String>) -> ClientBuilder {
        ClientBuilder::new(user, pass)
    }

    /// Create a client against the production API.
    ///
    /// Credentials are not checked here; a wrong password shows up as a `401`
    /// on the first call.
    ///
    /// # Examples
    /// ```no_run
    /// # use postita_client::Client;
    /// # fn main() -> Result<(), postita_client::Error> {
    /// let client = Client::new("myuser", "mypass123")?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(user: impl Into<String>, pass: impl Into<String>) -> Result<Self> {
        ClientBuilder::new(user, pass).build()
    }

    /// Endpoint root every path is joined onto. Always ends with `/`.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Username sent with every request.
    pub fn user(&self) -> &str {
        &self.user
    }

    /// Get the proxy URL if one was configured.
    pub fn proxy(&self) -> Option<&str> {
        self.proxy.as_deref()
    }

    /// Submit a PDF to be printed and mailed.
    ///
    /// The job is confirmed automatically and funds are reserved right away.
    /// The PDF must already contain the recipient address; see
    /// [`Client::send_with_address`] otherwise.
    ///
    /// # Examples
    /// ```no_run
    /// # use postita_client::{Client, Document, PostClass, SendOptions};
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), postita_client::Error> {
    /// let client = Client::new("myuser", "mypass123")?;
    /// let pdf = Document::from_path("letter.pdf").await?;
    /// let options = SendOptions::new().post_class(PostClass::SecondClass);
    /// let job = client.send("my-test-job-name", &pdf, &options).await?;
    /// println!("{job}");
    /// # Ok(())
    /// # }
    /// ```
    pub async fn send(
        &self,
        job_name: &str,
        pdf: &Document,
        options: &SendOptions,
    ) -> Result<serde_json::Value> {
        let fields = send_fields(job_name, pdf, options);
        self.post_form("send", fields).await
    }

    /// Submit a Finvoice XML document.
    ///
    /// See [`FinvoiceOptions`] for attaching a ready-made PDF or holding the
    /// job unconfirmed.
    ///
    /// # Examples
    /// ```no_run
    /// # use postita_client::{Client, Document, FinvoiceOptions};
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), postita_client::Error> {
    /// let client = Client::new("myuser", "mypass123")?;
    /// let xml = Document::from_path("invoices.xml").await?;
    /// let options = FinvoiceOptions::new().confirm(false);
    /// let job = client.send_finvoice("march invoices", &xml, &options).await?;
    /// println!("{job}");
    /// # Ok(())
    /// # }
    /// ```
    pub async fn send_finvoice(
        &self,
        job_name: &str,
        finvoice: &Document,
        options: &FinvoiceOptions,
    ) -> Result<serde_json::Value> {
        let fields = send_finvoice_fields(job_name, finvoice, options);
        self.post_form("send_finvoice", fields).await
    }

    /// Like [`Client::send`], but the service prepends a cover page with
    /// `address` printed in the window position.
    ///
    /// # Examples
    /// ```no_run
    /// # use postita_client::{Address, Client, Document, SendOptions};
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), postita_client::Error> {
    /// let client = Client::new("myuser", "mypass123")?;
    /// let pdf = Document::from_path("letter.pdf").await?;
    /// let address = Address {
    ///     name1: "Matti Meikäläinen".into(),
    ///     address1: "Mannerheimintie 1".into(),
    ///     zipcity: "00100 Helsinki".into(),
    ///     country: "Finland".into(),
    ///     ..Address::default()
    /// };
    /// client
    ///     .send_with_address("letter", &pdf, &address, &SendOptions::default())
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn send_with_address(
        &self,
        job_name: &str,
        pdf: &Document,
        address: &Address,
        options: &SendOptions,
    ) -> Result<serde_json::Value> {
        let fields = send_with_address_fields(job_name, pdf, address, options);
        self.post_form("send_with_address", fields).await
    }

    /// Confirm an unconfirmed (`NE`) job for sending on the next working day.
    ///
    /// Fails with `400` when the job is not in the new state.
    ///
    /// # Examples
    /// ```no_run
    /// # use postita_client::Client;
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), postita_client::Error> {
    /// let client = Client::new("myuser", "mypass123")?;
    /// client.confirm(673368).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn confirm(&self, job_id: impl Display) -> Result<serde_json::Value> {
        self.get_json(&format!("account_info/{job_id}")).await
    }

    /// Confirm every unconfirmed job on the account.
    pub async fn confirm_all(&self) -> Result<serde_json::Value> {
        self.confirm("all").await
    }

    /// Remove a job still waiting to be processed, along with its document.
    ///
    /// # Examples
    /// ```no_run
    /// # use postita_client::Client;
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), postita_client::Error> {
    /// let client = Client::new("myuser", "mypass123")?;
    /// client.delete(673368).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn delete(&self, job_id: impl Display) -> Result<serde_json::Value> {
        self.get_json(&format!("delete/{job_id}")).await
    }

    /// Balance, credit limit and available funds.
    pub async fn account_info(&self) -> Result<serde_json::Value> {
        self.get_json("account_info").await
    }

    /// Status of a single job.
    ///
    /// # Examples
    /// ```no_run
    /// # use postita_client::Client;
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), postita_client::Error> {
    /// let client = Client::new("myuser", "mypass123")?;
    /// let info = client.job_info(673368).await?;
    /// println!("{info}");
    /// # Ok(())
    /// # }
    /// ```
    pub async fn job_info(&self, job_id: impl Display) -> Result<serde_json::Value> {
        self.get_json(&format!("job_info/{job_id}")).await
    }

    /// List jobs created after a date, or jobs with a given status code.
    ///
    /// # Examples
    /// ```no_run
    /// # use postita_client::{Client, JobStatus};
    /// # use chrono::NaiveDate;
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), postita_client::Error> {
    /// let client = Client::new("myuser", "mypass123")?;
    /// let since = NaiveDate::from_ymd_opt(2023, 3, 5).unwrap();
    /// let recent = client.list_jobs(since).await?;
    /// let pending = client.list_jobs(JobStatus::New).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn list_jobs(&self, filter: impl Into<JobFilter>) -> Result<serde_json::Value> {
        let filter = filter.into();
        self.get_json(&format!("job_info/{}", filter.to_path_segment())).await
    }

    /// Fetch the document originally submitted for a job.
    ///
    /// # Examples
    /// ```no_run
    /// # use postita_client::Client;
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), postita_client::Error> {
    /// let client = Client::new("myuser", "mypass123")?;
    /// let pdf = client.job_pdf(673368).await?;
    /// tokio::fs::write("job.pdf", pdf).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn job_pdf(&self, job_id: impl Display) -> Result<Vec<u8>> {
        let response = self.request(Method::GET, &format!("job_pdf/{job_id}")).await?;
        Ok(response.bytes().await?.to_vec())
    }

    /// Common multipart POST pattern.
    async fn post_form(
        &self,
        path: &str,
        fields: Vec<(&'static str, String)>,
    ) -> Result<serde_json::Value> {
        let form = fields
            .into_iter()
            .fold(Form::new(), |form, (name, value)| form.text(name, value));

        tracing::debug!(method = "POST", path, user = %self.user, "postita request");

        let response = self
            .http
            .post(self.url(path))
            .basic_auth(&self.user, Some(&self.pass))
            .multipart(form)
            .send()
            .await?;

        Self::json(Self::check(path, response).await?).await
    }

    async fn get_json(&self, path: &str) -> Result<serde_json::Value> {
        let response = self.request(Method::GET, path).await?;
        Self::json(response).await
    }

    /// Common bodiless request pattern.
    async fn request(&self, method: Method, path: &str) -> Result<Response> {
        tracing::debug!(method = %method, path, user = %self.user, "postita request");

        let response = self
            .http
            .request(method, self.url(path))
            .basic_auth(&self.user, Some(&self.pass))
            .send()
            .await?;

        Self::check(path, response).await
    }

    /// Turn a non-2xx response into [`Error::Status`] with the body intact.
    async fn check(path: &str, response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await?;
        tracing::warn!(path, status = status.as_u16(), "postita request rejected");
        Err(Error::Status { status, body })
    }

    async fn json(response: Response) -> Result<serde_json::Value> {
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

const BASE_URL: &str = "https://postita.fi/api/";
const USER_AGENT_VALUE: &str = concat!("postita-client/", env!("CARGO_PKG_VERSION"));

/// Builder for configuring a Postita client.
///
/// Start with [`Client::builder`] to override defaults.
#[derive(Clone)]
pub struct ClientBuilder {
    user: String,
    pass: String,
    proxy: Option<String>,
    danger_accept_invalid_certs: bool,
    user_agent: String,
    base_url: String,
    timeout: Option<Duration>,
}

impl fmt::Debug for ClientBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientBuilder")
            .field("user", &self.user)
            .field("pass", &"<redacted>")
            .field("proxy", &self.proxy)
            .field("danger_accept_invalid_certs", &self.danger_accept_invalid_certs)
            .field("user_agent", &self.user_agent)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl ClientBuilder {
    /// Create a new builder with default settings.
    ///
    /// Defaults:
    /// - No proxy
    /// - `danger_accept_invalid_certs = false`
    /// - `postita-client/<version>` user agent
    /// - Production endpoint `https://postita.fi/api/`
    /// - No timeout
    pub fn new(user: impl Into<String>, pass: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            pass: pass.into(),
            proxy: None,
            danger_accept_invalid_certs: false,
            user_agent: USER_AGENT_VALUE.to_string(),
            base_url: BASE_URL.to_string(),
            timeout: None,
        }
    }

    /// Set a proxy URL (e.g., "socks5://127.0.0.1:1080").
    pub fn proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    /// Control whether to accept invalid TLS certificates (default: false).
    pub fn danger_accept_invalid_certs(mut self, value: bool) -> Self {
        self.danger_accept_invalid_certs = value;
        self
    }

    /// Override the default user agent string.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Override the API root. A trailing `/` is added if missing.
    ///
    /// Useful for testing against a local server.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        self.base_url = base_url;
        self
    }

    /// Give up on requests that take longer than `timeout`.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the client.
    ///
    /// No network traffic happens here.
    pub fn build(self) -> Result<Client> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json, */*"));
        if let Ok(value) = HeaderValue::from_str(&self.user_agent) {
            headers.insert(USER_AGENT, value);
        }

        let mut builder = reqwest::Client::builder()
            .danger_accept_invalid_certs(self.danger_accept_invalid_certs)
            .default_headers(headers);

        if let Some(proxy_url) = &self.proxy {
            builder = builder.proxy(reqwest::Proxy::all(proxy_url)?);
        }
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        let http = builder.build()?;

        Ok(Client {
            http,
            user: self.user,
            pass: self.pass,
            proxy: self.proxy,
            base_url: self.base_url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_gets_trailing_slash() {
        let client = Client::builder("alice", "secret")
            .base_url("http://localhost:8080/api")
            .build()
            .unwrap();
        assert_eq!(client.base_url(), "http://localhost:8080/api/");
        assert_eq!(client.url("job_info/42"), "http://localhost:8080/api/job_info/42");
    }

    #[test]
    fn defaults_point_at_production() {
        let client = Client::new("alice", "secret").unwrap();
        assert_eq!(client.base_url(), "https://postita.fi/api/");
        assert_eq!(client.user(), "alice");
        assert_eq!(client.proxy(), None);
    }

    #[test]
    fn debug_redacts_password() {
        let client = Client::new("alice", "secret").unwrap();
        let text = format!("{client:?}");
        assert!(text.contains("alice"));
        assert!(!text.contains("secret"));

        let builder = Client::builder("alice", "secret");
        assert!(!format!("{builder:?}").contains("secret"));
    }

    #[test]
    fn invalid_proxy_fails_build() {
        let result = Client::builder("a", "b").proxy("::not a url::").build();
        assert!(matches!(result, Err(Error::Request(_))));
    }

    #[test]
    fn proxy_is_remembered() {
        let client = Client::builder("alice", "secret")
            .proxy("http://127.0.0.1:3128")
            .build()
            .unwrap();
        assert_eq!(client.proxy(), Some("http://127.0.0.1:3128"));
    }
}
