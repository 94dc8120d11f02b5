use std::time::Duration;

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;
use time::{Date, PrimitiveDateTime};

use crate::{
    domain::{formats, Task, TasksResponse, TimeEntry, TimerHandle, TimerRequest},
    TimecampURL,
};

pub struct TimecampClient {
    http: reqwest::Client,
    base_url: TimecampURL,
    api_key: String,
}

impl TimecampClient {
    /// Build a client for `base_url`. Every request is bounded by `timeout`.
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, TimecampError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(TimecampError::InvalidCredential);
        }

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TimecampError::Other(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: TimecampURL::new(base_url),
            api_key,
        })
    }

    fn endpoint(&self, resource: &str) -> TimecampURL {
        self.base_url.append_path(resource).with_token(&self.api_key)
    }

    async fn read_json<T: DeserializeOwned>(
        resp: reqwest::Response,
    ) -> Result<T, TimecampError> {
        if resp.status() == 401 || resp.status() == 403 {
            return Err(TimecampError::Unauthorized);
        }

        let resp = resp
            .error_for_status()
            .map_err(|e| TimecampError::ResponseError(e.without_url().to_string()))?;

        resp.json::<T>().await.map_err(|e| {
            TimecampError::ParsingError(format!(
                "Failed to parse response as JSON: {}",
                e.without_url()
            ))
        })
    }

    async fn fetch<T: DeserializeOwned>(&self, url: TimecampURL) -> Result<T, TimecampError> {
        let resp = self
            .http
            .get(url.as_ref())
            .send()
            .await
            .map_err(|e| TimecampError::ResponseError(e.without_url().to_string()))?;

        Self::read_json(resp).await
    }

    async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        url: TimecampURL,
        body: &B,
    ) -> Result<T, TimecampError> {
        let resp = self
            .http
            .post(url.as_ref())
            .json(body)
            .send()
            .await
            .map_err(|e| TimecampError::ResponseError(e.without_url().to_string()))?;

        Self::read_json(resp).await
    }

    pub async fn fetch_tasks(&self) -> Result<Vec<Task>, TimecampError> {
        let response: TasksResponse = self.fetch(self.endpoint("tasks")).await?;
        let tasks = response.into_tasks();
        tracing::debug!(count = tasks.len(), "Fetched tasks");
        Ok(tasks)
    }

    pub async fn fetch_entries(
        &self,
        from: Date,
        to: Date,
    ) -> Result<Vec<TimeEntry>, TimecampError> {
        let from = format_date(from)?;
        let to = format_date(to)?;
        let url = self
            .endpoint("entries")
            .append_path(&format!("from/{}/to/{}", from, to));

        let entries: Vec<TimeEntry> = self.fetch(url).await?;
        tracing::debug!(count = entries.len(), %from, %to, "Fetched time entries");
        Ok(entries)
    }

    pub async fn start_timer(
        &self,
        task_id: u64,
        started_at: PrimitiveDateTime,
    ) -> Result<TimerHandle, TimecampError> {
        let body = TimerRequest::Start {
            task_id,
            started_at,
        };
        self.post(self.endpoint("timer"), &body).await
    }

    pub async fn stop_timer(
        &self,
        timer_id: u64,
        stopped_at: PrimitiveDateTime,
    ) -> Result<(), TimecampError> {
        let body = TimerRequest::Stop {
            timer_id,
            stopped_at,
        };
        // The reply only echoes the elapsed time; it still has to be valid JSON.
        let _: serde_json::Value = self.post(self.endpoint("timer"), &body).await?;
        Ok(())
    }
}

fn format_date(date: Date) -> Result<String, TimecampError> {
    date.format(formats::DATE)
        .map_err(|e| TimecampError::Other(format!("Failed to format date: {}", e)))
}

#[derive(Error, Debug)]
pub enum TimecampError {
    #[error("API token is empty")]
    InvalidCredential,
    #[error("Unauthorized")]
    Unauthorized,
    #[error("ResponseError: {0}")]
    ResponseError(String),
    #[error("ParsingError: {0}")]
    ParsingError(String),
    #[error("Other: {0}")]
    Other(String),
}
