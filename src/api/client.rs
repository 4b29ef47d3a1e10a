use std::time::Duration;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Client, RequestBuilder, StatusCode, Url, redirect};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use super::types::ModuleInfo;
use crate::config::ClientConfig;
use crate::error::{ConformanceError, Result, require};
use crate::poller::{self, ModuleInfoSource, ModuleOutcome, WaitOptions};

/// Per-request ceiling. Kept well below the default poll interval budget.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Authenticated client for the test-orchestration REST API.
///
/// Every call expects one exact status code; anything else, redirects
/// included, fails with [`ConformanceError::UnexpectedStatus`].
#[derive(Debug, Clone)]
pub struct ConformanceClient {
    client: Client,
    base_url: Url,
}

impl ConformanceClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;

        let base_url = Url::parse(config.base_url.trim())
            .map_err(|e| ConformanceError::Config(format!("invalid base URL: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ConformanceError::Config(format!(
                "base URL cannot carry a path: {base_url}"
            )));
        }

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(token) = config.bearer_token.as_deref().filter(|t| !t.is_empty()) {
            let mut value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|_| ConformanceError::Config("bearer token is not a valid header value".into()))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .redirect(redirect::Policy::none())
            .default_headers(headers)
            .build()?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `GET /api/runner/available`
    pub async fn available_test_modules(&self) -> Result<Value> {
        let url = self.endpoint(&["api", "runner", "available"]);
        self.send(self.client.get(url), "getAllTestModules", StatusCode::OK)
            .await
    }

    /// `POST /api/plan?planName=&variant=` with the plan configuration as body.
    ///
    /// Only a `null` configuration counts as missing.
    pub async fn create_test_plan(
        &self,
        plan_name: &str,
        configuration: &Value,
        variant: Option<&str>,
    ) -> Result<Value> {
        require(plan_name, "planName")?;
        if configuration.is_null() {
            return Err(ConformanceError::MissingArgument {
                argument: "configuration",
            });
        }

        let url = self.endpoint(&["api", "plan"]);
        let mut request = self.client.post(url).query(&[("planName", plan_name)]);
        if let Some(variant) = variant {
            request = request.query(&[("variant", variant)]);
        }
        self.send(request.json(configuration), "createTestPlan", StatusCode::CREATED)
            .await
    }

    /// `GET /api/plan/{planId}`
    pub async fn test_plan(&self, plan_id: &str) -> Result<Value> {
        require(plan_id, "planId")?;
        let url = self.endpoint(&["api", "plan", plan_id]);
        self.send(self.client.get(url), "getTestPlan", StatusCode::OK)
            .await
    }

    /// `POST /api/runner?test=&plan=`, spawning one module run from a plan.
    pub async fn create_test_from_plan(&self, plan: &str, test: &str) -> Result<Value> {
        require(plan, "plan")?;
        require(test, "test")?;
        let url = self.endpoint(&["api", "runner"]);
        let request = self.client.post(url).query(&[("test", test), ("plan", plan)]);
        self.send(request, "createTestFromPlan", StatusCode::CREATED)
            .await
    }

    /// `GET /api/info/{moduleId}`
    pub async fn module_info(&self, module_id: &str) -> Result<ModuleInfo> {
        require(module_id, "moduleId")?;
        let url = self.endpoint(&["api", "info", module_id]);
        self.send(self.client.get(url), "getModuleInfo", StatusCode::OK)
            .await
    }

    /// `GET /api/log/{moduleId}`
    pub async fn test_log(&self, module_id: &str) -> Result<Value> {
        require(module_id, "moduleId")?;
        let url = self.endpoint(&["api", "log", module_id]);
        self.send(self.client.get(url), "getTestLog", StatusCode::OK)
            .await
    }

    /// Polls `module_id` until it reaches one of `options.states`.
    /// See [`poller::wait_for_state`].
    pub async fn wait_for_state(
        &self,
        module_id: &str,
        options: &WaitOptions,
    ) -> Result<ModuleOutcome> {
        poller::wait_for_state(self, module_id, options).await
    }

    /// Polls several modules concurrently. See [`poller::wait_for_modules`].
    pub async fn wait_for_modules(
        &self,
        module_ids: &[&str],
        options: &WaitOptions,
    ) -> Vec<Result<ModuleOutcome>> {
        poller::wait_for_modules(self, module_ids, options).await
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        debug_assert!(!self.base_url.cannot_be_a_base());
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        operation: &'static str,
        expected: StatusCode,
    ) -> Result<T> {
        debug!(operation, "dispatching request");
        let response = request.send().await?;

        let status = response.status();
        if status != expected {
            warn!(
                operation,
                expected = expected.as_u16(),
                actual = status.as_u16(),
                "unexpected response status"
            );
            return Err(ConformanceError::UnexpectedStatus {
                operation,
                expected: expected.as_u16(),
                actual: status.as_u16(),
            });
        }

        let body = response.json::<T>().await?;
        Ok(body)
    }
}

impl ModuleInfoSource for ConformanceClient {
    async fn module_info(&self, module_id: &str) -> Result<ModuleInfo> {
        ConformanceClient::module_info(self, module_id).await
    }
}
