//! reqwest-backed client for the prediction backend.

use async_trait::async_trait;
use foldify_payload::SubmissionBody;
use reqwest::header::COOKIE;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::client::{BackendClient, DashboardClient, JobList, ZipAvailability};
use crate::error::SubmitError;

pub const SESSION_COOKIE: &str = "session";

#[derive(Debug, Deserialize)]
struct MessageBody {
    #[serde(default)]
    message: String,
}

/// Talks to the backend over HTTP, optionally on behalf of a browser session
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
    session: Option<String>,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            session: None,
        }
    }

    /// A copy that forwards the caller's `session` cookie
    pub fn with_session(&self, token: Option<String>) -> Self {
        Self {
            client: self.client.clone(),
            base_url: self.base_url.clone(),
            session: token,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> Result<Url, SubmitError> {
        Url::parse(&format!("{}{}", self.base_url, path))
            .map_err(|e| SubmitError::Request(e.to_string()))
    }

    /// `path` followed by `segment` as a single percent-encoded path segment.
    /// Job names arrive from browsers, so `/`, `?` and `#` inside them must
    /// not reach the backend's router.
    fn url_with_segment(&self, path: &str, segment: &str) -> Result<Url, SubmitError> {
        if matches!(segment, "" | "." | "..") {
            return Err(SubmitError::Request(format!("invalid job name: {:?}", segment)));
        }
        let mut url = self.url(path)?;
        url.path_segments_mut()
            .map_err(|_| SubmitError::Request(format!("{} cannot carry a path", self.base_url)))?
            .push(segment);
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self.client.request(method, url);
        match &self.session {
            Some(token) => builder.header(COOKIE, format!("{}={}", SESSION_COOKIE, token)),
            None => builder,
        }
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response, SubmitError> {
        let response = builder.send().await.map_err(|e| {
            if e.is_builder() {
                SubmitError::Request(e.to_string())
            } else {
                warn!("backend unreachable: {}", e);
                SubmitError::NoResponse
            }
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.map_err(|e| {
            warn!("backend answered {} with an unreadable body: {}", status, e);
            SubmitError::Request(e.to_string())
        })?;
        let err = SubmitError::from_response(status.as_u16(), &body);
        warn!("backend answered {}: {}", status, err);
        Err(err)
    }

    async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, SubmitError> {
        response
            .json::<T>()
            .await
            .map_err(|e| SubmitError::Request(e.to_string()))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, SubmitError> {
        let response = self.send(self.request(Method::GET, url)).await?;
        Self::read_json(response).await
    }

    async fn message(&self, method: Method, url: Url) -> Result<String, SubmitError> {
        let response = self.send(self.request(method, url)).await?;
        Ok(Self::read_json::<MessageBody>(response).await?.message)
    }
}

fn multipart_form(data: &serde_json::Value, files: &[foldify_payload::FilePart]) -> Form {
    let mut form = Form::new().text("data", data.to_string());
    for file in files {
        let part = Part::bytes(file.content.clone()).file_name(file.file_name.clone());
        form = form.part(file.field, part);
    }
    form
}

#[async_trait]
impl BackendClient for HttpBackend {
    async fn submit(&self, endpoint: &str, body: &SubmissionBody) -> Result<String, SubmitError> {
        debug!("submitting to {}", endpoint);
        let builder = self.request(Method::POST, self.url(endpoint)?);
        let builder = match body {
            SubmissionBody::Json(value) => builder.json(value),
            SubmissionBody::Multipart { data, files } => builder.multipart(multipart_form(data, files)),
        };

        let response = self.send(builder).await?;
        Ok(Self::read_json::<MessageBody>(response).await?.message)
    }
}

#[async_trait]
impl DashboardClient for HttpBackend {
    async fn user_jobs(&self) -> Result<JobList, SubmitError> {
        self.get_json(self.url("/api/flask/dashboard/user_jobs")?).await
    }

    async fn public_jobs(&self) -> Result<JobList, SubmitError> {
        self.get_json(self.url("/api/flask/dashboard/public_jobs")?).await
    }

    async fn running_jobs(&self) -> Result<JobList, SubmitError> {
        self.get_json(self.url("/api/flask/dashboard/running_jobs")?).await
    }

    async fn delete_job(&self, job_name: &str) -> Result<String, SubmitError> {
        let url = self.url_with_segment("/api/flask/dashboard/delete", job_name)?;
        self.message(Method::DELETE, url).await
    }

    async fn delete_jobs(&self, job_names: &[String]) -> Result<String, SubmitError> {
        if let Some(bad) = job_names.iter().find(|name| matches!(name.as_str(), "" | "." | "..")) {
            return Err(SubmitError::Request(format!("invalid job name: {:?}", bad)));
        }
        let url = self.url_with_segment("/api/flask/dashboard/delete_multiple", &job_names.join(","))?;
        self.message(Method::DELETE, url).await
    }

    async fn switch_publicity(&self, job_name: &str) -> Result<String, SubmitError> {
        let url = self.url_with_segment("/api/flask/result/switch_publicity", job_name)?;
        self.message(Method::GET, url).await
    }

    async fn zip_available(&self, job_name: &str) -> Result<ZipAvailability, SubmitError> {
        let url = self.url_with_segment("/api/flask/download/zip_available", job_name)?;
        self.get_json(url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_is_normalised() {
        let backend = HttpBackend::new("http://localhost:5000/");
        assert_eq!(backend.base_url(), "http://localhost:5000");
        assert_eq!(
            backend.url("/api/flask/esmfold/submit").unwrap().as_str(),
            "http://localhost:5000/api/flask/esmfold/submit"
        );
    }

    #[test]
    fn test_job_name_stays_one_path_segment() {
        let backend = HttpBackend::new("http://localhost:5000");

        let url = backend
            .url_with_segment("/api/flask/dashboard/delete", "../../result/switch_publicity/victim")
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:5000/api/flask/dashboard/delete/..%2F..%2Fresult%2Fswitch_publicity%2Fvictim"
        );

        let url = backend
            .url_with_segment("/api/flask/download/zip_available", "x?admin=1")
            .unwrap();
        assert_eq!(url.path(), "/api/flask/download/zip_available/x%3Fadmin=1");
        assert_eq!(url.query(), None);

        let url = backend
            .url_with_segment("/api/flask/result/switch_publicity", "a#b")
            .unwrap();
        assert_eq!(url.fragment(), None);
    }

    #[tokio::test]
    async fn test_dot_segments_are_refused() {
        // refused before any connection attempt
        let backend = HttpBackend::new("http://127.0.0.1:9");
        assert!(matches!(backend.delete_job("..").await, Err(SubmitError::Request(_))));
        assert!(matches!(backend.zip_available(".").await, Err(SubmitError::Request(_))));
        assert!(matches!(
            backend.delete_jobs(&["ok".to_string(), "..".to_string()]).await,
            Err(SubmitError::Request(_))
        ));
    }

    #[test]
    fn test_session_cookie_is_forwarded() {
        let backend = HttpBackend::new("http://localhost:5000").with_session(Some("tok".into()));
        let url = backend.url("/api/flask/dashboard/user_jobs").unwrap();
        let request = backend
            .request(Method::GET, url)
            .build()
            .unwrap();
        assert_eq!(request.headers()[COOKIE], "session=tok");
    }

    #[tokio::test]
    async fn test_unreachable_backend() {
        // port 9 (discard) is closed on test machines
        let backend = HttpBackend::new("http://127.0.0.1:9");
        let body = SubmissionBody::Json(serde_json::json!({}));
        let err = backend.submit("/api/flask/esmfold/submit", &body).await.unwrap_err();
        assert_eq!(err, SubmitError::NoResponse);
    }
}
