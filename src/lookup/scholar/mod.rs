//! Google Scholar lookups: author search, author publications, paper search,
//! related papers and citing papers.
//!
//! The seven tools share one [`ScholarProvider`]; the production provider is
//! [`SerpApiScholar`]. Tests substitute an in-memory provider.

mod serpapi;

pub use serpapi::SerpApiScholar;

use super::{
    limit_arg, optional_string_arg, string_arg, LookupQuery, LookupRecord, LookupTool, PaperSort,
    ParamSpec, ParamType, PublicationSort, DEFAULT_LIMIT,
};
use crate::error::Result;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::instrument;

/// An author profile.
#[derive(Debug, Clone, PartialEq)]
pub struct Author {
    pub name: String,
    /// Provider-assigned author identifier.
    pub uid: String,
    pub affiliation: Option<String>,
    pub interests: Vec<String>,
    pub citations: Option<u64>,
}

impl Author {
    pub fn to_record(&self) -> LookupRecord {
        LookupRecord::new()
            .with("name", self.name.clone())
            .with("uid", self.uid.clone())
            .with("affiliation", self.affiliation.clone())
            .with("interests", self.interests.clone())
            .with("citation", self.citations)
    }
}

/// An entry in an author's publication list.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthorPublication {
    pub title: String,
    pub year: Option<String>,
    pub venue: Option<String>,
    pub citations: u64,
}

impl AuthorPublication {
    pub fn to_record(&self) -> LookupRecord {
        LookupRecord::new()
            .with("title", self.title.clone())
            .with("pub_year", self.year.clone())
            .with("venue", self.venue.clone())
            .with("citation", self.citations)
    }
}

/// A publication search hit.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Publication {
    pub title: String,
    pub authors: Option<String>,
    pub year: Option<String>,
    pub venue: Option<String>,
    pub abstract_text: Option<String>,
    pub url: Option<String>,
    pub citations: u64,
    /// Provider handle used to find related articles.
    pub result_id: Option<String>,
    /// Provider handle used to find citing articles.
    pub cites_id: Option<String>,
}

impl Publication {
    pub fn to_record(&self) -> LookupRecord {
        LookupRecord::new()
            .with("title", self.title.clone())
            .with("author", self.authors.clone())
            .with("pub_year", self.year.clone())
            .with("venue", self.venue.clone())
            .with("abstract", self.abstract_text.clone())
            .with("url", self.url.clone())
            .with("citation", self.citations)
    }
}

/// Backend for scholar lookups. Every method returns at most `limit` items in
/// provider order.
#[async_trait]
pub trait ScholarProvider: Send + Sync {
    async fn search_authors(&self, name: &str, limit: usize) -> Result<Vec<Author>>;

    async fn search_authors_by_interests(
        &self,
        interests: &[String],
        limit: usize,
    ) -> Result<Vec<Author>>;

    async fn author_publications(
        &self,
        uid: &str,
        sort: PublicationSort,
        limit: usize,
    ) -> Result<Vec<AuthorPublication>>;

    async fn search_publications(
        &self,
        query: &str,
        sort: PaperSort,
        limit: usize,
    ) -> Result<Vec<Publication>>;

    async fn related_publications(&self, paper: &Publication, limit: usize)
        -> Result<Vec<Publication>>;

    async fn citing_publications(&self, paper: &Publication, limit: usize)
        -> Result<Vec<Publication>>;

    /// Best match for a title, if any.
    async fn single_publication(&self, title: &str) -> Result<Option<Publication>> {
        let mut hits = self.search_publications(title, PaperSort::Relevance, 1).await?;
        Ok(if hits.is_empty() {
            None
        } else {
            Some(hits.swap_remove(0))
        })
    }
}

/// The scholar lookups exposed as tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScholarLookup {
    AuthorByName,
    AuthorByInterests,
    AuthorPapers,
    SearchPaper,
    SinglePaper,
    RelatedPaper,
    CitePaper,
}

impl ScholarLookup {
    pub const ALL: [ScholarLookup; 7] = [
        ScholarLookup::AuthorByName,
        ScholarLookup::AuthorByInterests,
        ScholarLookup::AuthorPapers,
        ScholarLookup::SearchPaper,
        ScholarLookup::SinglePaper,
        ScholarLookup::RelatedPaper,
        ScholarLookup::CitePaper,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ScholarLookup::AuthorByName => "search_author_by_name",
            ScholarLookup::AuthorByInterests => "search_author_by_interests",
            ScholarLookup::AuthorPapers => "author_uid2paper",
            ScholarLookup::SearchPaper => "search_paper",
            ScholarLookup::SinglePaper => "search_single_paper",
            ScholarLookup::RelatedPaper => "search_related_paper",
            ScholarLookup::CitePaper => "search_cite_paper",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            ScholarLookup::AuthorByName => {
                "Search an author with Google Scholar. \
                 Input a name, return a list of authors with info (including UID)."
            }
            ScholarLookup::AuthorByInterests => {
                "Search authors given keywords of research interests. \
                 Input interests, return a list of authors."
            }
            ScholarLookup::AuthorPapers => {
                "Search the papers given the UID of an author. \
                 You can use search_author_by_name first to get UID."
            }
            ScholarLookup::SearchPaper => {
                "Search a paper with the title relevant to the input text. \
                 Input text query, return a list of papers."
            }
            ScholarLookup::SinglePaper => {
                "Search a paper with the title matching the input text. \
                 Input text query, return a single paper."
            }
            ScholarLookup::RelatedPaper => {
                "Search the papers related to the target one. \
                 Input the complete paper title, return a list of relevant papers."
            }
            ScholarLookup::CitePaper => {
                "Search the papers citing to the target one. \
                 Input the complete paper title, return a list of papers citing the one."
            }
        }
    }

    /// Argument holding the query text or identifier.
    fn target_param(self) -> ParamSpec {
        match self {
            ScholarLookup::AuthorByName => ParamSpec::required(
                "author",
                ParamType::String,
                "Author name with the institute name (optional), e.g., Tan Lee",
            ),
            ScholarLookup::AuthorByInterests => ParamSpec::required(
                "interests",
                ParamType::String,
                "Research interests separated by comma, e.g., 'crowdsourcing,privacy'",
            ),
            ScholarLookup::AuthorPapers => ParamSpec::required(
                "uid",
                ParamType::String,
                "A unique identifier assigned to author in Google Scholar",
            ),
            ScholarLookup::SearchPaper | ScholarLookup::SinglePaper => {
                ParamSpec::required("title", ParamType::String, "Title name")
            }
            ScholarLookup::RelatedPaper | ScholarLookup::CitePaper => {
                ParamSpec::required("title", ParamType::String, "Complete paper title")
            }
        }
    }

    fn default_limit(self) -> usize {
        match self {
            ScholarLookup::SinglePaper => 1,
            _ => DEFAULT_LIMIT,
        }
    }

    pub fn parameters(self) -> Vec<ParamSpec> {
        let mut params = vec![self.target_param()];
        match self {
            ScholarLookup::AuthorPapers => params.push(
                ParamSpec::optional(
                    "sort_by",
                    ParamType::String,
                    "Either 'citedby' or 'year'.",
                    json!(PublicationSort::default().to_string()),
                )
                .one_of(PublicationSort::VALUES),
            ),
            ScholarLookup::SearchPaper => params.push(
                ParamSpec::optional(
                    "sort_by",
                    ParamType::String,
                    "Either 'relevance' or 'date'.",
                    json!(PaperSort::default().to_string()),
                )
                .one_of(PaperSort::VALUES),
            ),
            _ => {}
        }
        let top_k_help = match self {
            ScholarLookup::SearchPaper => {
                "Number of results to display. 5 is preferred. Set to 1 if given the complete title"
            }
            ScholarLookup::SinglePaper => "Number of results to display (at most 1).",
            _ => "Number of results to display. 5 is preferred.",
        };
        params.push(ParamSpec::optional(
            "top_k",
            ParamType::Integer,
            top_k_help,
            json!(self.default_limit()),
        ));
        params
    }
}

/// Split a comma-separated interest list into trimmed, non-empty terms.
pub fn split_interests(interests: &str) -> Vec<String> {
    interests
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// A scholar lookup bound to a provider.
pub struct ScholarTool {
    kind: ScholarLookup,
    provider: Arc<dyn ScholarProvider>,
}

impl ScholarTool {
    pub fn new(kind: ScholarLookup, provider: Arc<dyn ScholarProvider>) -> Self {
        Self { kind, provider }
    }

    /// One tool per lookup kind, sharing `provider`.
    pub fn all(provider: Arc<dyn ScholarProvider>) -> Vec<ScholarTool> {
        ScholarLookup::ALL
            .iter()
            .map(|kind| ScholarTool::new(*kind, provider.clone()))
            .collect()
    }

    pub fn kind(&self) -> ScholarLookup {
        self.kind
    }

    #[instrument(skip(self, query), fields(target = %query.target))]
    async fn run_authors(&self, query: &LookupQuery) -> Result<Vec<LookupRecord>> {
        if query.limit == 0 {
            return Ok(Vec::new());
        }
        let authors = if self.kind == ScholarLookup::AuthorByInterests {
            let terms = split_interests(&query.target);
            if terms.is_empty() {
                return Ok(Vec::new());
            }
            self.provider
                .search_authors_by_interests(&terms, query.limit)
                .await?
        } else {
            self.provider
                .search_authors(&query.target, query.limit)
                .await?
        };
        let records = authors.iter().map(Author::to_record).collect();
        Ok(bounded(records, query.limit))
    }

    #[instrument(skip(self, query), fields(title = %query.target))]
    async fn run_single_paper(&self, query: &LookupQuery) -> Result<Vec<LookupRecord>> {
        if query.limit == 0 {
            return Ok(Vec::new());
        }
        let records = self
            .provider
            .single_publication(&query.target)
            .await?
            .iter()
            .map(Publication::to_record)
            .collect();
        Ok(bounded(records, query.limit))
    }

    /// Best match for the title, then its related or citing papers.
    #[instrument(skip(self, query), fields(tool = self.kind.name(), title = %query.target))]
    async fn run_linked_papers(&self, query: &LookupQuery) -> Result<Vec<LookupRecord>> {
        if query.limit == 0 {
            return Ok(Vec::new());
        }
        let Some(paper) = self.provider.single_publication(&query.target).await? else {
            return Ok(Vec::new());
        };
        let linked = if self.kind == ScholarLookup::CitePaper {
            self.provider
                .citing_publications(&paper, query.limit)
                .await?
        } else {
            self.provider
                .related_publications(&paper, query.limit)
                .await?
        };
        let records = linked.iter().map(Publication::to_record).collect();
        Ok(bounded(records, query.limit))
    }

    #[instrument(skip(self, query), fields(uid = %query.target, sort = %query.sort))]
    async fn run_author_papers(
        &self,
        query: &LookupQuery<PublicationSort>,
    ) -> Result<Vec<LookupRecord>> {
        if query.limit == 0 {
            return Ok(Vec::new());
        }
        let records = self
            .provider
            .author_publications(&query.target, query.sort, query.limit)
            .await?
            .iter()
            .map(AuthorPublication::to_record)
            .collect();
        Ok(bounded(records, query.limit))
    }

    #[instrument(skip(self, query), fields(title = %query.target, sort = %query.sort))]
    async fn run_search_paper(&self, query: &LookupQuery<PaperSort>) -> Result<Vec<LookupRecord>> {
        if query.limit == 0 {
            return Ok(Vec::new());
        }
        let records = self
            .provider
            .search_publications(&query.target, query.sort, query.limit)
            .await?
            .iter()
            .map(Publication::to_record)
            .collect();
        Ok(bounded(records, query.limit))
    }
}

/// Providers are asked for `limit` items; enforce it regardless.
fn bounded(mut records: Vec<LookupRecord>, limit: usize) -> Vec<LookupRecord> {
    records.truncate(limit);
    records
}

#[async_trait]
impl LookupTool for ScholarTool {
    fn name(&self) -> &'static str {
        self.kind.name()
    }

    fn description(&self) -> &'static str {
        self.kind.description()
    }

    fn parameters(&self) -> Vec<ParamSpec> {
        self.kind.parameters()
    }

    async fn call(&self, args: &Value) -> Result<Vec<LookupRecord>> {
        let target_name = self.kind.target_param().name;
        let target = string_arg(args, target_name)?;
        let limit = limit_arg(args, "top_k", self.kind.default_limit())?;

        match self.kind {
            ScholarLookup::AuthorByName | ScholarLookup::AuthorByInterests => {
                self.run_authors(&LookupQuery::new(target, limit)?).await
            }
            ScholarLookup::AuthorPapers => {
                let sort = match optional_string_arg(args, "sort_by")? {
                    Some(s) => s.parse()?,
                    None => PublicationSort::default(),
                };
                self.run_author_papers(&LookupQuery::sorted(target, sort, limit)?)
                    .await
            }
            ScholarLookup::SearchPaper => {
                let sort = match optional_string_arg(args, "sort_by")? {
                    Some(s) => s.parse()?,
                    None => PaperSort::default(),
                };
                self.run_search_paper(&LookupQuery::sorted(target, sort, limit)?)
                    .await
            }
            ScholarLookup::SinglePaper => {
                self.run_single_paper(&LookupQuery::new(target, limit.min(1))?)
                    .await
            }
            ScholarLookup::RelatedPaper | ScholarLookup::CitePaper => {
                self.run_linked_papers(&LookupQuery::new(target, limit)?)
                    .await
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::ScoutError;
    use crate::lookup::{render, NO_RESULTS};
    use std::sync::Mutex;

    /// In-memory provider recording the calls it receives.
    #[derive(Default)]
    pub(crate) struct FakeProvider {
        pub authors: Vec<Author>,
        pub articles: Vec<AuthorPublication>,
        pub papers: Vec<Publication>,
        pub related: Vec<Publication>,
        pub citing: Vec<Publication>,
        pub calls: Mutex<Vec<String>>,
    }

    impl FakeProvider {
        fn record(&self, call: String) {
            self.calls.lock().unwrap().push(call);
        }

        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ScholarProvider for FakeProvider {
        async fn search_authors(&self, name: &str, limit: usize) -> Result<Vec<Author>> {
            self.record(format!("authors:{}", name));
            Ok(self.authors.iter().take(limit).cloned().collect())
        }

        async fn search_authors_by_interests(
            &self,
            interests: &[String],
            limit: usize,
        ) -> Result<Vec<Author>> {
            self.record(format!("interests:{}", interests.join("|")));
            Ok(self.authors.iter().take(limit).cloned().collect())
        }

        async fn author_publications(
            &self,
            uid: &str,
            sort: PublicationSort,
            _limit: usize,
        ) -> Result<Vec<AuthorPublication>> {
            self.record(format!("articles:{}:{}", uid, sort));
            // Deliberately ignores the limit to check the tool enforces it.
            Ok(self.articles.clone())
        }

        async fn search_publications(
            &self,
            query: &str,
            sort: PaperSort,
            limit: usize,
        ) -> Result<Vec<Publication>> {
            self.record(format!("papers:{}:{}:{}", query, sort, limit));
            Ok(self.papers.iter().take(limit).cloned().collect())
        }

        async fn related_publications(
            &self,
            paper: &Publication,
            limit: usize,
        ) -> Result<Vec<Publication>> {
            self.record(format!("related:{}", paper.title));
            Ok(self.related.iter().take(limit).cloned().collect())
        }

        async fn citing_publications(
            &self,
            paper: &Publication,
            limit: usize,
        ) -> Result<Vec<Publication>> {
            self.record(format!("citing:{}", paper.title));
            Ok(self.citing.iter().take(limit).cloned().collect())
        }
    }

    pub(crate) fn paper(title: &str) -> Publication {
        Publication {
            title: title.to_string(),
            authors: Some("Z Yao".to_string()),
            year: Some("2023".to_string()),
            venue: Some("ACL".to_string()),
            citations: 3,
            ..Default::default()
        }
    }

    pub(crate) fn author(name: &str) -> Author {
        Author {
            name: name.to_string(),
            uid: format!("uid-{}", name),
            affiliation: Some("George Mason University".to_string()),
            interests: vec!["NLP".to_string()],
            citations: Some(42),
        }
    }

    fn article(title: &str, year: &str) -> AuthorPublication {
        AuthorPublication {
            title: title.to_string(),
            year: Some(year.to_string()),
            venue: None,
            citations: 1,
        }
    }

    fn tool(kind: ScholarLookup, provider: &Arc<FakeProvider>) -> ScholarTool {
        ScholarTool::new(kind, provider.clone())
    }

    #[tokio::test]
    async fn test_author_by_name_fields_and_limit() {
        let provider = Arc::new(FakeProvider {
            authors: vec![author("a"), author("b"), author("c")],
            ..Default::default()
        });
        let records = tool(ScholarLookup::AuthorByName, &provider)
            .call(&json!({"author": "Ziyu Yao", "top_k": 2}))
            .await
            .unwrap();

        assert_eq!(records.len(), 2);
        let names: Vec<_> = records[0].field_names().collect();
        assert_eq!(names, vec!["name", "uid", "affiliation", "interests", "citation"]);
        assert_eq!(records[1].get_str("uid"), Some("uid-b"));
        assert_eq!(provider.calls(), vec!["authors:Ziyu Yao"]);
    }

    #[tokio::test]
    async fn test_interests_are_split_and_trimmed() {
        let provider = Arc::new(FakeProvider {
            authors: vec![author("a")],
            ..Default::default()
        });
        tool(ScholarLookup::AuthorByInterests, &provider)
            .call(&json!({"interests": "crowdsourcing, privacy,,"}))
            .await
            .unwrap();
        assert_eq!(provider.calls(), vec!["interests:crowdsourcing|privacy"]);
    }

    #[tokio::test]
    async fn test_author_papers_enforces_limit_and_passes_sort() {
        let provider = Arc::new(FakeProvider {
            articles: (0..10).map(|i| article(&format!("p{}", i), "2020")).collect(),
            ..Default::default()
        });
        let records = tool(ScholarLookup::AuthorPapers, &provider)
            .call(&json!({"uid": "abc", "sort_by": "year", "top_k": 4}))
            .await
            .unwrap();

        assert_eq!(records.len(), 4);
        assert_eq!(records[0].get_str("title"), Some("p0"));
        assert_eq!(records[3].get_str("title"), Some("p3"));
        assert_eq!(provider.calls(), vec!["articles:abc:year"]);
    }

    #[tokio::test]
    async fn test_invalid_sort_is_rejected_before_provider_call() {
        let provider = Arc::new(FakeProvider::default());
        let err = tool(ScholarLookup::SearchPaper, &provider)
            .call(&json!({"title": "GenTopia", "sort_by": "citedby"}))
            .await
            .unwrap_err();

        assert!(matches!(err, ScoutError::InvalidInput(_)));
        assert!(provider.calls().is_empty());
    }

    #[tokio::test]
    async fn test_search_paper_default_sort() {
        let provider = Arc::new(FakeProvider {
            papers: vec![paper("one"), paper("two")],
            ..Default::default()
        });
        let records = tool(ScholarLookup::SearchPaper, &provider)
            .call(&json!({"title": "GenTopia"}))
            .await
            .unwrap();

        assert_eq!(records.len(), 2);
        let names: Vec<_> = records[0].field_names().collect();
        assert_eq!(
            names,
            vec!["title", "author", "pub_year", "venue", "abstract", "url", "citation"]
        );
        assert_eq!(provider.calls(), vec!["papers:GenTopia:relevance:5"]);
    }

    #[tokio::test]
    async fn test_single_paper_returns_at_most_one() {
        let provider = Arc::new(FakeProvider {
            papers: vec![paper("best"), paper("second")],
            ..Default::default()
        });
        let records = tool(ScholarLookup::SinglePaper, &provider)
            .call(&json!({"title": "best", "top_k": 5}))
            .await
            .unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get_str("title"), Some("best"));
    }

    #[tokio::test]
    async fn test_cite_paper_resolves_title_first() {
        let provider = Arc::new(FakeProvider {
            papers: vec![paper("GenTopia")],
            citing: vec![paper("c1"), paper("c2"), paper("c3")],
            ..Default::default()
        });
        let records = tool(ScholarLookup::CitePaper, &provider)
            .call(&json!({"title": "GenTopia", "top_k": 2}))
            .await
            .unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[1].get_str("title"), Some("c2"));
        assert_eq!(
            provider.calls(),
            vec!["papers:GenTopia:relevance:1", "citing:GenTopia"]
        );
    }

    #[tokio::test]
    async fn test_related_without_match_renders_sentinel() {
        let provider = Arc::new(FakeProvider {
            related: vec![paper("r1")],
            ..Default::default()
        });
        let records = tool(ScholarLookup::RelatedPaper, &provider)
            .call(&json!({"title": "Nothing like this"}))
            .await
            .unwrap();

        assert!(records.is_empty());
        assert_eq!(render(&records), NO_RESULTS);
        assert_eq!(provider.calls(), vec!["papers:Nothing like this:relevance:1"]);
    }

    #[tokio::test]
    async fn test_zero_limit_makes_no_provider_call() {
        let provider = Arc::new(FakeProvider {
            authors: vec![author("a")],
            ..Default::default()
        });
        let records = tool(ScholarLookup::AuthorByName, &provider)
            .call(&json!({"author": "x", "top_k": 0}))
            .await
            .unwrap();
        assert!(records.is_empty());
        assert!(provider.calls().is_empty());
    }

    #[tokio::test]
    async fn test_missing_target_argument() {
        let provider = Arc::new(FakeProvider::default());
        let err = tool(ScholarLookup::AuthorPapers, &provider)
            .call(&json!({"sort_by": "year"}))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("uid"));
    }

    #[test]
    fn test_parameters_declare_sort_enum() {
        let params = ScholarLookup::AuthorPapers.parameters();
        let names: Vec<_> = params.iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["uid", "sort_by", "top_k"]);
        assert_eq!(params[1].allowed, Some(PublicationSort::VALUES));

        let single = ScholarLookup::SinglePaper.parameters();
        assert_eq!(single.last().unwrap().default, Some(json!(1)));
    }

    #[tokio::test]
    async fn test_each_kind_reaches_its_provider_operation() {
        let cases = [
            (ScholarLookup::AuthorByName, json!({"author": "Yao"}), vec!["authors:Yao"]),
            (ScholarLookup::AuthorByInterests, json!({"interests": "nlp"}), vec!["interests:nlp"]),
            (ScholarLookup::AuthorPapers, json!({"uid": "u1"}), vec!["articles:u1:citedby"]),
            (
                ScholarLookup::SearchPaper,
                json!({"title": "T", "sort_by": "date"}),
                vec!["papers:T:date:5"],
            ),
            (ScholarLookup::SinglePaper, json!({"title": "T"}), vec!["papers:T:relevance:1"]),
            (
                ScholarLookup::RelatedPaper,
                json!({"title": "T"}),
                vec!["papers:T:relevance:1", "related:T"],
            ),
            (
                ScholarLookup::CitePaper,
                json!({"title": "T"}),
                vec!["papers:T:relevance:1", "citing:T"],
            ),
        ];

        for (kind, args, expected) in cases {
            let provider = Arc::new(FakeProvider {
                papers: vec![paper("T")],
                ..Default::default()
            });
            tool(kind, &provider).call(&args).await.unwrap();
            assert_eq!(provider.calls(), expected, "{}", kind.name());
        }
    }

    #[test]
    fn test_tool_names_are_unique() {
        let mut names: Vec<_> = ScholarLookup::ALL.iter().map(|k| k.name()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), 7);
    }
}
