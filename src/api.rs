// api.rs
// Shared REST transport. One client per app; the bearer token is attached to
// every request once a session exists.

use std::sync::Arc;

use anyhow::{Context, Result, bail};
use parking_lot::RwLock;
use reqwest::{Client, RequestBuilder};
use serde::{Serialize, de::DeserializeOwned};

#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    token: Arc<RwLock<Option<String>>>,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        ApiClient {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token: Arc::new(RwLock::new(None)),
        }
    }

    pub fn set_token(&self, token: &str) {
        *self.token.write() = Some(token.to_string());
    }

    pub fn clear_token(&self) {
        *self.token.write() = None;
    }

    pub fn has_token(&self) -> bool {
        self.token.read().is_some()
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match self.token.read().as_deref() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self
            .authorize(self.http.get(self.url(path)))
            .send()
            .await
            .with_context(|| format!("GET {path} no respondió"))?;
        Self::parse(path, response).await
    }

    pub async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let response = self
            .authorize(self.http.post(self.url(path)).json(body))
            .send()
            .await
            .with_context(|| format!("POST {path} no respondió"))?;
        Self::parse(path, response).await
    }

    pub async fn put<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let response = self
            .authorize(self.http.put(self.url(path)).json(body))
            .send()
            .await
            .with_context(|| format!("PUT {path} no respondió"))?;
        Self::parse(path, response).await
    }

    pub async fn delete(&self, path: &str) -> Result<()> {
        let response = self
            .authorize(self.http.delete(self.url(path)))
            .send()
            .await
            .with_context(|| format!("DELETE {path} no respondió"))?;
        if !response.status().is_success() {
            bail!("DELETE {path} devolvió {}", response.status());
        }
        Ok(())
    }

    /// POST without a body and without a payload in the answer (logout,
    /// trash moves). Non-2xx is an error; the body, if any, is ignored.
    pub async fn post_accion(&self, path: &str) -> Result<()> {
        let response = self
            .authorize(self.http.post(self.url(path)))
            .send()
            .await
            .with_context(|| format!("POST {path} no respondió"))?;
        if !response.status().is_success() {
            bail!("POST {path} devolvió {}", response.status());
        }
        Ok(())
    }

    async fn parse<T: DeserializeOwned>(path: &str, response: reqwest::Response) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            let detalle = response.text().await.unwrap_or_default();
            if detalle.trim().is_empty() {
                bail!("{path} devolvió {status}");
            }
            bail!("{path} devolvió {status}: {detalle}");
        }
        response
            .json::<T>()
            .await
            .with_context(|| format!("{path} devolvió un cuerpo inesperado"))
    }
}
