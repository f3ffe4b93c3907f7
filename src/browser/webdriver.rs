use super::BrowserPage;
use crate::error::{Result, ScraperError};
use async_trait::async_trait;
use reqwest::{Client, Method, Response};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, info, instrument};

/// W3C key under which element references are returned.
const ELEMENT_KEY: &str = "element-6066-11e4-a52e-4f735466cecf";
const COMMAND_TIMEOUT: Duration = Duration::from_secs(120);

/// A page driven through the W3C WebDriver protocol (chromedriver, geckodriver, ...).
///
/// The driver process is expected to be running already; this type only owns
/// the browsing session it creates.
pub struct WebDriverPage {
    client: Client,
    session_url: String,
}

impl WebDriverPage {
    #[instrument(skip(headless))]
    pub async fn connect(endpoint: &str, headless: bool) -> Result<Self> {
        let client = Client::builder().timeout(COMMAND_TIMEOUT).build()?;

        let mut args = vec!["--window-size=1280,1024"];
        if headless {
            args.push("--headless=new");
        }
        let capabilities = json!({
            "capabilities": {
                "alwaysMatch": {
                    "browserName": "chrome",
                    "goog:chromeOptions": { "args": args }
                }
            }
        });

        let endpoint = endpoint.trim_end_matches('/');
        let response = client
            .post(format!("{}/session", endpoint))
            .json(&capabilities)
            .send()
            .await?;
        let value = Self::unwrap_value(response).await?;
        let session_id = value["sessionId"]
            .as_str()
            .ok_or_else(|| ScraperError::Browser("session response missing sessionId".into()))?;

        info!("Opened WebDriver session {}", session_id);
        Ok(Self {
            client,
            session_url: format!("{}/session/{}", endpoint, session_id),
        })
    }

    /// Ends the browsing session.
    pub async fn close(self) -> Result<()> {
        self.command(Method::DELETE, "", None).await?;
        debug!("Closed WebDriver session");
        Ok(())
    }

    async fn command(&self, method: Method, path: &str, body: Option<Value>) -> Result<Value> {
        let url = format!("{}{}", self.session_url, path);
        let mut request = self.client.request(method, &url);
        if let Some(body) = body {
            request = request.json(&body);
        }
        let response = request.send().await?;
        Self::unwrap_value(response).await
    }

    async fn unwrap_value(response: Response) -> Result<Value> {
        let status = response.status();
        let body: Value = response.json().await?;
        let value = body.get("value").cloned().unwrap_or(Value::Null);
        if status.is_success() {
            return Ok(value);
        }
        let error = value["error"].as_str().unwrap_or("unknown error");
        let message = value["message"].as_str().unwrap_or_default();
        Err(ScraperError::Browser(format!(
            "{} (HTTP {}): {}",
            error,
            status.as_u16(),
            message
        )))
    }

    async fn find_all(&self, selector: &str) -> Result<Vec<String>> {
        let value = self
            .command(
                Method::POST,
                "/elements",
                Some(json!({ "using": "css selector", "value": selector })),
            )
            .await?;
        let ids = value
            .as_array()
            .map(|elements| {
                elements
                    .iter()
                    .filter_map(|el| el[ELEMENT_KEY].as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default();
        Ok(ids)
    }

    async fn find_first(&self, selector: &str) -> Result<String> {
        self.find_all(selector)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| ScraperError::Browser(format!("no element matches '{}'", selector)))
    }

    async fn element_text(&self, element: &str) -> Result<String> {
        let value = self
            .command(Method::GET, &format!("/element/{}/text", element), None)
            .await?;
        Ok(value.as_str().unwrap_or_default().to_string())
    }

    async fn click_element(&self, element: &str) -> Result<()> {
        self.command(Method::POST, &format!("/element/{}/click", element), Some(json!({})))
            .await?;
        Ok(())
    }
}

#[async_trait]
impl BrowserPage for WebDriverPage {
    async fn goto(&self, url: &str, timeout: Duration) -> Result<()> {
        self.command(
            Method::POST,
            "/timeouts",
            Some(json!({ "pageLoad": timeout.as_millis() as u64 })),
        )
        .await?;

        match tokio::time::timeout(
            timeout,
            self.command(Method::POST, "/url", Some(json!({ "url": url }))),
        )
        .await
        {
            Ok(result) => result.map(|_| ()),
            Err(_) => Err(ScraperError::Timeout(timeout, format!("navigation to {}", url))),
        }
    }

    async fn current_url(&self) -> Result<String> {
        let value = self.command(Method::GET, "/url", None).await?;
        Ok(value.as_str().unwrap_or_default().to_string())
    }

    async fn is_ready(&self) -> Result<bool> {
        let value = self
            .command(
                Method::POST,
                "/execute/sync",
                Some(json!({ "script": "return document.readyState;", "args": [] })),
            )
            .await?;
        Ok(value.as_str() == Some("complete"))
    }

    async fn count(&self, selector: &str) -> Result<usize> {
        Ok(self.find_all(selector).await?.len())
    }

    async fn inner_html(&self, selector: &str) -> Result<Option<String>> {
        let Some(element) = self.find_all(selector).await?.into_iter().next() else {
            return Ok(None);
        };
        let value = self
            .command(
                Method::GET,
                &format!("/element/{}/property/innerHTML", element),
                None,
            )
            .await?;
        Ok(Some(value.as_str().unwrap_or_default().to_string()))
    }

    async fn fill(&self, selector: &str, value: &str) -> Result<()> {
        let element = self.find_first(selector).await?;
        self.command(Method::POST, &format!("/element/{}/clear", element), Some(json!({})))
            .await?;
        self.command(
            Method::POST,
            &format!("/element/{}/value", element),
            Some(json!({ "text": value })),
        )
        .await?;
        Ok(())
    }

    async fn click(&self, selector: &str) -> Result<()> {
        let element = self.find_first(selector).await?;
        self.click_element(&element).await
    }

    async fn click_link_with_text(&self, selector: &str, label: &str) -> Result<()> {
        for element in self.find_all(selector).await? {
            if self.element_text(&element).await?.trim() == label {
                return self.click_element(&element).await;
            }
        }
        Err(ScraperError::Browser(format!(
            "no '{}' element labelled '{}'",
            selector, label
        )))
    }
}
