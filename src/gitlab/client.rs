use crate::error::{Result, TrailError};
use reqwest::blocking::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;

const PER_PAGE: &str = "100";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Thin blocking client for the GitLab REST API. Auth goes through the
/// `PRIVATE-TOKEN` header; list endpoints are drained page by page following
/// the `x-next-page` response header.
pub struct GitLabClient {
    http: Client,
    base_url: String,
    token: String,
}

impl GitLabClient {
    pub fn new(base_url: &str, token: &str, insecure: bool) -> Result<Self> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .danger_accept_invalid_certs(insecure)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        })
    }

    /// Fetch a single JSON object.
    pub fn get_one<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .http
            .get(&url)
            .header("PRIVATE-TOKEN", &self.token)
            .send()?;
        decode(response, &url)
    }

    /// Fetch a JSON array endpoint, following pagination until exhausted.
    pub fn get_paged<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<T>> {
        let url = format!("{}{}", self.base_url, path);
        let mut items = Vec::new();
        let mut page: Option<String> = None;

        loop {
            let mut request = self
                .http
                .get(&url)
                .header("PRIVATE-TOKEN", &self.token)
                .query(&[("per_page", PER_PAGE)])
                .query(query);
            if let Some(page) = &page {
                request = request.query(&[("page", page.as_str())]);
            }

            let response = request.send()?;
            let next = response
                .headers()
                .get("x-next-page")
                .and_then(|value| value.to_str().ok())
                .filter(|value| !value.is_empty())
                .map(str::to_string);

            let mut batch: Vec<T> = decode(response, &url)?;
            items.append(&mut batch);

            match next {
                Some(next) => page = Some(next),
                None => break,
            }
        }

        Ok(items)
    }
}

fn decode<T: DeserializeOwned>(response: Response, url: &str) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().unwrap_or_default();
        return Err(TrailError::RemoteUnavailable(format!(
            "GitLab returned {status} for {url}: {body}"
        )));
    }
    response.json().map_err(TrailError::from)
}
