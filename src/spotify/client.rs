use std::future::Future;

use reqwest::{Client, Response};
use serde_json::Value;

use crate::{Error, Res, config::Config};

/// Bearer-authenticated access to the Spotify Web API.
///
/// Every remote call of the track fetcher and the playlist builder goes
/// through this trait, which lets tests substitute an in-memory fake.
/// Implementations must not retry: a status of 400 or above is reported as
/// [`Error::Api`] straight away.
pub trait SpotifyApi: Send + Sync {
    /// `GET {base}{path}?{query}` and return the decoded JSON body.
    fn get(
        &self,
        access_token: &str,
        path: &str,
        query: &[(&str, String)],
    ) -> impl Future<Output = Res<Value>> + Send;

    /// `POST {base}{path}` with a JSON body and return the decoded JSON body.
    fn post(
        &self,
        access_token: &str,
        path: &str,
        body: &Value,
    ) -> impl Future<Output = Res<Value>> + Send;
}

/// Builds the shared HTTP client with the fixed per-call timeout.
pub fn http_client(config: &Config) -> Res<Client> {
    Ok(Client::builder().timeout(config.request_timeout).build()?)
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(config: &Config, http: Client) -> Self {
        Self {
            http,
            base_url: config.api_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl SpotifyApi for ApiClient {
    async fn get(&self, access_token: &str, path: &str, query: &[(&str, String)]) -> Res<Value> {
        let response = self
            .http
            .get(self.url(path))
            .bearer_auth(access_token)
            .query(query)
            .send()
            .await?;

        read_json("GET", path, response).await
    }

    async fn post(&self, access_token: &str, path: &str, body: &Value) -> Res<Value> {
        let response = self
            .http
            .post(self.url(path))
            .bearer_auth(access_token)
            .json(body)
            .send()
            .await?;

        read_json("POST", path, response).await
    }
}

async fn read_json(method: &'static str, path: &str, response: Response) -> Res<Value> {
    let status = response.status().as_u16();
    let body = response.text().await?;

    if status >= 400 {
        return Err(Error::Api {
            method,
            path: path.to_string(),
            status,
            body,
        });
    }

    if body.trim().is_empty() {
        return Ok(Value::Null);
    }

    Ok(serde_json::from_str(&body)?)
}
