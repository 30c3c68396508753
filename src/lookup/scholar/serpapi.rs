//! Google Scholar through SerpAPI.
//!
//! Uses three engines: `google_scholar` (publication search, related and
//! citing articles), `google_scholar_profiles` (author search) and
//! `google_scholar_author` (an author's publication list).
//! See: https://serpapi.com/google-scholar-api

use super::{Author, AuthorPublication, Publication, ScholarProvider};
use crate::config::ScholarSettings;
use crate::error::{Result, ScoutError};
use crate::http::{get_json, RetryPolicy};
use crate::lookup::{PaperSort, PublicationSort};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument};

const PROVIDER: &str = "serpapi";

/// Most articles the author engine returns per page.
const AUTHOR_PAGE_MAX: usize = 100;

/// Message SerpAPI uses when a search simply has no hits.
const NO_RESULTS_MARKER: &str = "hasn't returned any results";

#[derive(Debug, Deserialize)]
struct ScholarSearchResponse {
    #[serde(default)]
    organic_results: Vec<OrganicResult>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OrganicResult {
    title: String,
    result_id: Option<String>,
    link: Option<String>,
    snippet: Option<String>,
    #[serde(default)]
    publication_info: PublicationInfo,
    #[serde(default)]
    inline_links: InlineLinks,
}

#[derive(Debug, Default, Deserialize)]
struct PublicationInfo {
    summary: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct InlineLinks {
    cited_by: Option<CitedBy>,
}

#[derive(Debug, Deserialize)]
struct CitedBy {
    total: Option<u64>,
    cites_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProfilesResponse {
    #[serde(default)]
    profiles: Vec<Profile>,
    pagination: Option<ProfilesPagination>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Profile {
    name: String,
    author_id: String,
    affiliations: Option<String>,
    cited_by: Option<u64>,
    #[serde(default)]
    interests: Vec<Interest>,
}

#[derive(Debug, Deserialize)]
struct Interest {
    title: String,
}

#[derive(Debug, Deserialize)]
struct ProfilesPagination {
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AuthorResponse {
    #[serde(default)]
    articles: Vec<Article>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Article {
    title: String,
    publication: Option<String>,
    year: Option<String>,
    cited_by: Option<ArticleCitedBy>,
}

#[derive(Debug, Deserialize)]
struct ArticleCitedBy {
    value: Option<u64>,
}

/// Client for the SerpAPI Google Scholar engines.
pub struct SerpApiScholar {
    client: Client,
    retry: RetryPolicy,
    endpoint: String,
    api_key: Option<String>,
    page_size: usize,
}

impl SerpApiScholar {
    pub fn new(client: Client, retry: RetryPolicy, settings: &ScholarSettings) -> Self {
        Self {
            client,
            retry,
            endpoint: settings.endpoint.clone(),
            api_key: settings.resolved_api_key(),
            page_size: settings.page_size.clamp(1, 20),
        }
    }

    fn base_params(&self, engine: &str) -> Result<Vec<(&'static str, String)>> {
        let key = self.api_key.as_ref().ok_or_else(|| {
            ScoutError::Config(
                "SerpAPI key not configured; set scholar.api_key or SERPAPI_API_KEY".to_string(),
            )
        })?;
        Ok(vec![
            ("engine", engine.to_string()),
            ("api_key", key.clone()),
            ("hl", "en".to_string()),
        ])
    }

    async fn fetch<T: serde::de::DeserializeOwned>(
        &self,
        params: &[(&'static str, String)],
    ) -> Result<T> {
        get_json(&self.retry, PROVIDER, || {
            self.client.get(&self.endpoint).query(params)
        })
        .await
    }

    /// Page through `google_scholar` results until `limit` hits are collected.
    async fn scholar_search(
        &self,
        extra: Vec<(&'static str, String)>,
        limit: usize,
    ) -> Result<Vec<Publication>> {
        let mut hits = Vec::new();
        while hits.len() < limit {
            let num = (limit - hits.len()).min(self.page_size);
            let mut params = self.base_params("google_scholar")?;
            params.extend(extra.iter().cloned());
            params.push(("start", hits.len().to_string()));
            params.push(("num", num.to_string()));

            let response: ScholarSearchResponse = self.fetch(&params).await?;
            check_error(response.error.as_deref(), response.organic_results.is_empty())?;

            let page: Vec<Publication> = response
                .organic_results
                .into_iter()
                .map(publication_from)
                .collect();
            let page_len = page.len();
            hits.extend(page);
            debug!("google_scholar page returned {} results", page_len);
            if page_len < num {
                break;
            }
        }
        hits.truncate(limit);
        Ok(hits)
    }

    /// Page through `google_scholar_profiles` results.
    async fn profile_search(&self, mauthors: String, limit: usize) -> Result<Vec<Author>> {
        let mut authors = Vec::new();
        let mut token: Option<String> = None;
        while authors.len() < limit {
            let mut params = self.base_params("google_scholar_profiles")?;
            params.push(("mauthors", mauthors.clone()));
            if let Some(t) = &token {
                params.push(("after_author", t.clone()));
            }

            let response: ProfilesResponse = self.fetch(&params).await?;
            check_error(response.error.as_deref(), response.profiles.is_empty())?;
            if response.profiles.is_empty() {
                break;
            }
            authors.extend(response.profiles.into_iter().map(author_from));

            token = response.pagination.and_then(|p| p.next_page_token);
            if token.is_none() {
                break;
            }
        }
        authors.truncate(limit);
        Ok(authors)
    }
}

#[async_trait]
impl ScholarProvider for SerpApiScholar {
    #[instrument(skip(self))]
    async fn search_authors(&self, name: &str, limit: usize) -> Result<Vec<Author>> {
        self.profile_search(name.to_string(), limit).await
    }

    #[instrument(skip(self))]
    async fn search_authors_by_interests(
        &self,
        interests: &[String],
        limit: usize,
    ) -> Result<Vec<Author>> {
        self.profile_search(interest_labels(interests), limit).await
    }

    #[instrument(skip(self))]
    async fn author_publications(
        &self,
        uid: &str,
        sort: PublicationSort,
        limit: usize,
    ) -> Result<Vec<AuthorPublication>> {
        let mut articles = Vec::new();
        while articles.len() < limit {
            let num = (limit - articles.len()).min(AUTHOR_PAGE_MAX);
            let mut params = self.base_params("google_scholar_author")?;
            params.push(("author_id", uid.to_string()));
            params.push(("start", articles.len().to_string()));
            params.push(("num", num.to_string()));
            if sort == PublicationSort::Year {
                params.push(("sort", "pubdate".to_string()));
            }

            let response: AuthorResponse = self.fetch(&params).await?;
            check_error(response.error.as_deref(), response.articles.is_empty())?;

            let page_len = response.articles.len();
            articles.extend(response.articles.into_iter().map(article_from));
            if page_len < num {
                break;
            }
        }
        articles.truncate(limit);
        Ok(articles)
    }

    #[instrument(skip(self))]
    async fn search_publications(
        &self,
        query: &str,
        sort: PaperSort,
        limit: usize,
    ) -> Result<Vec<Publication>> {
        let mut extra = vec![("q", query.to_string())];
        if sort == PaperSort::Date {
            extra.push(("scisbd", "1".to_string()));
        }
        self.scholar_search(extra, limit).await
    }

    #[instrument(skip(self, paper), fields(title = %paper.title))]
    async fn related_publications(
        &self,
        paper: &Publication,
        limit: usize,
    ) -> Result<Vec<Publication>> {
        match &paper.result_id {
            Some(id) => {
                let q = format!("related:{}:scholar.google.com/", id);
                self.scholar_search(vec![("q", q)], limit).await
            }
            None => Ok(Vec::new()),
        }
    }

    #[instrument(skip(self, paper), fields(title = %paper.title))]
    async fn citing_publications(
        &self,
        paper: &Publication,
        limit: usize,
    ) -> Result<Vec<Publication>> {
        match &paper.cites_id {
            Some(id) => self.scholar_search(vec![("cites", id.clone())], limit).await,
            None => Ok(Vec::new()),
        }
    }
}

/// An `error` field with no results is either "no hits" or a real failure.
fn check_error(error: Option<&str>, empty: bool) -> Result<()> {
    match error {
        Some(msg) if empty && !msg.contains(NO_RESULTS_MARKER) => Err(ScoutError::Provider {
            provider: PROVIDER.to_string(),
            status: 200,
            message: msg.to_string(),
        }),
        _ => Ok(()),
    }
}

/// Google Scholar profile labels use underscores for spaces.
fn interest_labels(interests: &[String]) -> String {
    interests
        .iter()
        .map(|i| format!("label:{}", i.trim().replace(' ', "_")))
        .collect::<Vec<_>>()
        .join(" ")
}

fn author_from(profile: Profile) -> Author {
    Author {
        name: profile.name,
        uid: profile.author_id,
        affiliation: profile.affiliations,
        interests: profile.interests.into_iter().map(|i| i.title).collect(),
        citations: profile.cited_by,
    }
}

fn article_from(article: Article) -> AuthorPublication {
    AuthorPublication {
        title: article.title,
        year: article.year.filter(|y| !y.is_empty()),
        venue: article.publication.filter(|p| !p.is_empty()),
        citations: article.cited_by.and_then(|c| c.value).unwrap_or(0),
    }
}

fn publication_from(result: OrganicResult) -> Publication {
    let summary = result
        .publication_info
        .summary
        .as_deref()
        .map(parse_summary)
        .unwrap_or_default();
    let cited_by = result.inline_links.cited_by;

    Publication {
        title: result.title,
        authors: summary.authors,
        year: summary.year,
        venue: summary.venue,
        abstract_text: result.snippet,
        url: result.link,
        citations: cited_by.as_ref().and_then(|c| c.total).unwrap_or(0),
        result_id: result.result_id,
        cites_id: cited_by.and_then(|c| c.cites_id),
    }
}

#[derive(Debug, Default, PartialEq)]
struct Summary {
    authors: Option<String>,
    venue: Option<String>,
    year: Option<String>,
}

/// Parse `"A Author, B Author - Venue, 2021 - host.org"`.
fn parse_summary(summary: &str) -> Summary {
    let mut parts = summary.split(" - ").map(str::trim);
    let authors = parts.next().filter(|s| !s.is_empty()).map(str::to_string);
    let middle = parts.next().unwrap_or("");

    let (venue, year) = if is_year(middle) {
        (None, Some(middle.to_string()))
    } else {
        match middle.rsplit_once(',') {
            Some((venue, tail)) if is_year(tail.trim()) => {
                (Some(venue.trim().to_string()), Some(tail.trim().to_string()))
            }
            _ if !middle.is_empty() => (Some(middle.to_string()), None),
            _ => (None, None),
        }
    };

    Summary {
        authors,
        venue: venue.filter(|v| !v.is_empty()),
        year,
    }
}

fn is_year(s: &str) -> bool {
    s.len() == 4 && s.chars().all(|c| c.is_ascii_digit())
}
