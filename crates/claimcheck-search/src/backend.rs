//! Search backend abstraction and a scripted backend

use crate::SearchError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard};

/// One organic search result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    /// Result title
    pub title: String,
    /// Text snippet
    pub snippet: String,
    /// Result URL
    pub url: String,
}

impl SearchHit {
    /// Create a hit
    pub fn new(
        title: impl Into<String>,
        snippet: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            snippet: snippet.into(),
            url: url.into(),
        }
    }
}

/// A search request, optionally restricted to a set of domains
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    /// Free-text query (the claim)
    pub query: String,
    /// Allowed domains; empty means unrestricted
    pub domains: Vec<String>,
    /// Most results wanted
    pub max_results: usize,
}

impl SearchRequest {
    /// Create a request
    pub fn new(query: impl Into<String>, domains: &[&str], max_results: usize) -> Self {
        Self {
            query: query.into(),
            domains: domains.iter().map(|d| d.to_string()).collect(),
            max_results,
        }
    }

    /// Query with the domain restriction appended as a `site:` OR-filter
    ///
    /// # Examples
    ///
    /// ```
    /// use claimcheck_search::SearchRequest;
    ///
    /// let request = SearchRequest::new("Earth is flat", &["snopes.com", "politifact.com"], 5);
    /// assert_eq!(
    ///     request.query_string(),
    ///     "Earth is flat (site:snopes.com OR site:politifact.com)"
    /// );
    /// ```
    pub fn query_string(&self) -> String {
        if self.domains.is_empty() {
            return self.query.clone();
        }
        let filter = self
            .domains
            .iter()
            .map(|d| format!("site:{}", d))
            .collect::<Vec<_>>()
            .join(" OR ");
        format!("{} ({})", self.query, filter)
    }
}

/// A web search engine
#[async_trait]
pub trait WebSearchBackend: Send + Sync {
    /// Run one search
    async fn search(&self, request: &SearchRequest) -> Result<Vec<SearchHit>, SearchError>;

    /// Backend name for logs
    fn name(&self) -> &str;
}

#[async_trait]
impl<T: WebSearchBackend + ?Sized> WebSearchBackend for Box<T> {
    async fn search(&self, request: &SearchRequest) -> Result<Vec<SearchHit>, SearchError> {
        (**self).search(request).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

#[async_trait]
impl<T: WebSearchBackend + ?Sized> WebSearchBackend for Arc<T> {
    async fn search(&self, request: &SearchRequest) -> Result<Vec<SearchHit>, SearchError> {
        (**self).search(request).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Which requests a scripted rule answers
#[derive(Debug, Clone)]
enum Matcher {
    /// Requests whose domain filter includes this domain
    Domain(String),
    /// Requests without a domain filter
    Unrestricted,
}

impl Matcher {
    fn matches(&self, request: &SearchRequest) -> bool {
        match self {
            Matcher::Domain(domain) => request.domains.iter().any(|d| d == domain),
            Matcher::Unrestricted => request.domains.is_empty(),
        }
    }
}

#[derive(Debug, Clone)]
enum Reply {
    Hits(Vec<SearchHit>),
    Fail(SearchError),
}

#[derive(Default)]
struct StaticState {
    rules: Vec<(Matcher, Reply)>,
    rate_limited_calls: usize,
    requests: Vec<SearchRequest>,
}

/// Scripted backend for tests and offline runs
///
/// Rules are matched against the request's domain filter. Hits from every
/// matching rule are concatenated and truncated to `max_results`; the first
/// matching failure rule wins over hits.
///
/// # Examples
///
/// ```
/// use claimcheck_search::{SearchHit, SearchRequest, StaticBackend, WebSearchBackend};
///
/// let backend = StaticBackend::new().on_domain(
///     "snopes.com",
///     vec![SearchHit::new("Flat Earth", "The Earth is not flat.", "https://www.snopes.com/x")],
/// );
///
/// let runtime = tokio::runtime::Runtime::new().unwrap();
/// let hits = runtime
///     .block_on(backend.search(&SearchRequest::new("Earth is flat", &["snopes.com"], 5)))
///     .unwrap();
/// assert_eq!(hits.len(), 1);
/// assert_eq!(backend.request_count(), 1);
/// ```
#[derive(Clone, Default)]
pub struct StaticBackend {
    state: Arc<Mutex<StaticState>>,
}

impl StaticBackend {
    /// Backend that returns nothing
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, StaticState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn push(self, matcher: Matcher, reply: Reply) -> Self {
        self.lock().rules.push((matcher, reply));
        self
    }

    /// Return `hits` for requests restricted to (among others) `domain`
    pub fn on_domain(self, domain: &str, hits: Vec<SearchHit>) -> Self {
        self.push(Matcher::Domain(domain.to_string()), Reply::Hits(hits))
    }

    /// Return `hits` for unrestricted requests
    pub fn on_unrestricted(self, hits: Vec<SearchHit>) -> Self {
        self.push(Matcher::Unrestricted, Reply::Hits(hits))
    }

    /// Fail requests restricted to `domain`
    pub fn fail_on_domain(self, domain: &str, error: SearchError) -> Self {
        self.push(Matcher::Domain(domain.to_string()), Reply::Fail(error))
    }

    /// Fail unrestricted requests
    pub fn fail_unrestricted(self, error: SearchError) -> Self {
        self.push(Matcher::Unrestricted, Reply::Fail(error))
    }

    /// Answer the next `calls` requests with a rate-limit error
    pub fn rate_limit_first(self, calls: usize) -> Self {
        self.lock().rate_limited_calls = calls;
        self
    }

    /// Every request received so far
    pub fn requests(&self) -> Vec<SearchRequest> {
        self.lock().requests.clone()
    }

    /// Number of requests received so far
    pub fn request_count(&self) -> usize {
        self.lock().requests.len()
    }
}

#[async_trait]
impl WebSearchBackend for StaticBackend {
    async fn search(&self, request: &SearchRequest) -> Result<Vec<SearchHit>, SearchError> {
        let mut state = self.lock();
        state.requests.push(request.clone());

        if state.rate_limited_calls > 0 {
            state.rate_limited_calls -= 1;
            return Err(SearchError::RateLimited("scripted rate limit".to_string()));
        }

        let mut hits = Vec::new();
        for (matcher, reply) in &state.rules {
            if !matcher.matches(request) {
                continue;
            }
            match reply {
                Reply::Fail(error) => return Err(error.clone()),
                Reply::Hits(more) => hits.extend(more.iter().cloned()),
            }
        }
        hits.truncate(request.max_results);
        Ok(hits)
    }

    fn name(&self) -> &str {
        "static"
    }
}
