use std::time::Duration;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};

use crate::landmarks::types::LandmarkSet;
use crate::service::api::GestureApi;
use crate::service::error::{Result, ServiceError};
use crate::service::types::{
    CollectFrameRequest, DeleteResponse, GestureList, ModelMetrics, PredictRequest, Prediction,
};

/// HTTP implementation of `GestureApi`.
#[derive(Debug, Clone)]
pub struct ServiceClient {
    base_url: String,
    client: reqwest::Client,
}

impl ServiceClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ServiceError::Http(e.to_string()))?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.client.get(self.url(path)).send().await?;
        Self::json(response).await
    }

    async fn post<T: Serialize + ?Sized, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<R> {
        let response = self.client.post(self.url(path)).json(body).send().await?;
        Self::json(response).await
    }

    async fn json<R: DeserializeOwned>(response: reqwest::Response) -> Result<R> {
        let response = Self::check_status(response).await?;
        response
            .json::<R>()
            .await
            .map_err(|e| ServiceError::Parse(e.to_string()))
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        Err(ServiceError::ServerError {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl GestureApi for ServiceClient {
    async fn predict(&self, landmarks: &LandmarkSet) -> Result<Prediction> {
        self.post("/process", &PredictRequest { landmarks }).await
    }

    async fn collect_frame(&self, landmarks: &LandmarkSet, label: &str) -> Result<()> {
        let response = self
            .client
            .post(self.url("/gestures/collect_frame"))
            .json(&CollectFrameRequest { landmarks, label })
            .send()
            .await?;
        Self::check_status(response).await?;
        Ok(())
    }

    async fn list_gestures(&self) -> Result<GestureList> {
        self.get("/gestures/list").await
    }

    async fn delete_gesture(&self, name: &str) -> Result<DeleteResponse> {
        let path = format!("/gestures/delete/{}", urlencoding::encode(name));
        let response = self.client.delete(self.url(&path)).send().await?;
        Self::json(response).await
    }

    async fn train_now(&self) -> Result<()> {
        let response = self
            .client
            .post(self.url("/gestures/train_now"))
            .send()
            .await?;
        Self::check_status(response).await?;
        Ok(())
    }

    async fn metrics(&self) -> Result<ModelMetrics> {
        self.get("/metrics").await
    }
}
