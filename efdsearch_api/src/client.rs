//! HTTP client for the Senate eFD search portal.

use std::time::Duration;

use reqwest::StatusCode;
use url::Url;

use crate::{
    query::{Query, SearchQuery},
    session::Session,
    types::SearchResponse,
    user_agent::get_user_agent,
    Error,
};

/// Path the portal redirects to when the session has not accepted the
/// consent statement or has expired.
const CONSENT_PATH: &str = "/search/home";

/// HTTP client for the eFD portal.
///
/// Every request carries the session cookies and the matching
/// `X-CSRFToken` header, so requests only go to the base URL's origin:
/// absolute links elsewhere are refused and redirects off the origin are
/// not followed. One `reqwest::Client` is built up front and reused for all
/// requests, with a 30-second timeout.
pub struct Client {
    /// Base URL of the portal. Defaults to `https://efdsearch.senate.gov`.
    base_url: String,
    origin: url::Origin,
    session: Session,
    http: reqwest::Client,
}

impl Client {
    /// Creates a new client pointing at the production portal.
    pub fn new(session: Session) -> Result<Self, Error> {
        Self::with_base_url("https://efdsearch.senate.gov", session)
    }

    /// Creates a new client with a custom base URL. Used for testing with wiremock.
    pub fn with_base_url(base_url: &str, session: Session) -> Result<Self, Error> {
        if session.is_empty() {
            return Err(Error::AuthenticationRequired);
        }
        let base_url = base_url.trim_end_matches('/').to_string();
        let origin = Url::parse(&base_url)
            .map_err(|e| {
                tracing::error!("Invalid base URL {}: {}", base_url, e);
                Error::RequestFailed
            })?
            .origin();
        let http = reqwest::Client::builder()
            .user_agent(get_user_agent())
            .timeout(Duration::from_secs(30))
            .redirect(same_origin_redirects())
            .build()
            .map_err(|e| {
                tracing::error!("Failed to build HTTP client: {}", e);
                Error::RequestFailed
            })?;
        Ok(Self {
            base_url,
            origin,
            session,
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn get_url(&self, path: &str) -> Result<Url, Error> {
        let absolute = path.starts_with("http://") || path.starts_with("https://");
        let joined = if absolute {
            path.to_string()
        } else if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        };
        let url = Url::parse(&joined).map_err(|e| {
            tracing::error!("Invalid URL constructed from {}: {}", path, e);
            Error::RequestFailed
        })?;
        if url.origin() != self.origin {
            tracing::error!("Refusing to send the session to {}", url);
            return Err(Error::ForeignLink(path.to_string()));
        }
        Ok(url)
    }

    /// Fetches one page of the search listing.
    pub async fn search_reports(&self, query: &SearchQuery) -> Result<SearchResponse, Error> {
        let url = self.get_url("/search/report/data/")?;
        let referer = format!("{}/search/", self.base_url);
        let request = self
            .http
            .post(url)
            .header("accept", "application/json, text/javascript, */*; q=0.01")
            .header("accept-language", "en-US,en;q=0.9")
            .header("origin", self.base_url.as_str())
            .header("referer", referer)
            .header("x-requested-with", "XMLHttpRequest")
            .header("sec-fetch-dest", "empty")
            .header("sec-fetch-mode", "cors")
            .header("sec-fetch-site", "same-origin")
            .form(&query.to_form());
        let body = self.send(request).await?;

        let parsed = serde_json::from_str::<SearchResponse>(&body).map_err(|e| {
            let snippet = truncate_body(&body);
            tracing::error!("Failed to parse search response: {} | body: {}", e, snippet);
            Error::RequestFailed
        })?;

        if !parsed.is_ok() {
            tracing::error!("Search returned result {:?}", parsed.result);
            return Err(Error::UnexpectedResult(parsed.result));
        }

        Ok(parsed)
    }

    /// Fetches a filing document by its link, as found in the search listing.
    pub async fn get_filing(&self, link: &str) -> Result<String, Error> {
        let url = self.get_url(link)?;
        let request = self
            .http
            .get(url)
            .header("accept", "text/html,application/xhtml+xml")
            .header("accept-language", "en-US,en;q=0.9")
            .header("referer", format!("{}/search/", self.base_url))
            .header("upgrade-insecure-requests", "1");
        self.send(request).await
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<String, Error> {
        let resp = request
            .header("cookie", self.session.cookie_header())
            .header("x-csrftoken", self.session.csrf_token.as_str())
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to get resource: {}", e);
                Error::RequestFailed
            })?;

        let status = resp.status();
        if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
            tracing::error!("Session rejected with status {}", status);
            return Err(Error::AuthenticationRequired);
        }
        if resp.url().path().starts_with(CONSENT_PATH) {
            tracing::error!("Redirected to the consent page; session is not usable");
            return Err(Error::AuthenticationRequired);
        }

        let body = resp.text().await.map_err(|e| {
            tracing::error!("Failed to read response body: {}", e);
            Error::RequestFailed
        })?;

        if !status.is_success() {
            let snippet = truncate_body(&body);
            tracing::error!("Request failed with status {}: {}", status, snippet);
            return Err(Error::HttpStatus {
                status: status.as_u16(),
                body: snippet,
            });
        }

        Ok(body)
    }
}

/// Follows redirects only while they stay on the origin of the first request.
fn same_origin_redirects() -> reqwest::redirect::Policy {
    reqwest::redirect::Policy::custom(|attempt| {
        let same_origin = attempt
            .previous()
            .first()
            .map_or(true, |first| first.origin() == attempt.url().origin());
        if !same_origin {
            tracing::warn!("Not following redirect to {}", attempt.url());
            attempt.stop()
        } else if attempt.previous().len() > 10 {
            attempt.error("too many redirects")
        } else {
            attempt.follow()
        }
    })
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 2000;
    if body.len() <= MAX {
        body.to_string()
    } else {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...[truncated]", &body[..end])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> Client {
        Client::with_base_url("https://efd.example/", Session::new("tok", "sid")).unwrap()
    }

    #[test]
    fn blank_session_is_rejected_up_front() {
        let result = Client::with_base_url("https://efd.example", Session::new("", ""));
        assert!(matches!(result, Err(Error::AuthenticationRequired)));
    }

    #[test]
    fn relative_links_join_onto_base() {
        let c = client();
        assert_eq!(c.base_url(), "https://efd.example");
        assert_eq!(
            c.get_url("/search/view/ptr/abc/").unwrap().as_str(),
            "https://efd.example/search/view/ptr/abc/"
        );
        assert_eq!(
            c.get_url("search/view/annual/abc/").unwrap().as_str(),
            "https://efd.example/search/view/annual/abc/"
        );
    }

    #[test]
    fn absolute_links_on_the_portal_are_kept() {
        let c = client();
        assert_eq!(
            c.get_url("https://efd.example/search/view/ptr/abc/").unwrap().as_str(),
            "https://efd.example/search/view/ptr/abc/"
        );
    }

    #[test]
    fn absolute_links_elsewhere_are_refused() {
        let c = client();
        for link in [
            "https://other.example/x",
            "http://efd.example/search/view/ptr/abc/",
            "https://efd.example:8443/search/view/ptr/abc/",
        ] {
            assert!(
                matches!(c.get_url(link), Err(Error::ForeignLink(_))),
                "{link} should be refused"
            );
        }
    }

    #[test]
    fn truncate_long_body() {
        let body = "a".repeat(2500);
        let out = truncate_body(&body);
        assert!(out.ends_with("...[truncated]"));
        assert_eq!(out.len(), 2000 + "...[truncated]".len());
    }
}
