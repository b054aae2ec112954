//! TMDB (The Movie Database) API client and response mapper.
//!
//! Requests follow the v2.1 path layout:
//!
//! ```text
//! /{version}/{Domain}.{method}/{lang}/json/{apikey}/{term}
//! ```
//!
//! Every response body is a JSON array. The mapper turns it into transient
//! [`ApiMedia`] / [`ApiGenre`] value objects; nothing here touches the
//! database.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use rb_core::namespace::is_imdb_id;
use rb_core::{ApiGenre, ApiId, ApiMedia, ApiPerson, Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::config::TmdbConfig;
use crate::provider::{LookupTerm, MetadataSource};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

const OUTPUT_FORMAT: &str = "json";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const NOTHING_FOUND: &str = "Nothing found";

// ---------------------------------------------------------------------------
// Request addressing
// ---------------------------------------------------------------------------

/// API domain, the part of the method name before the dot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Domain {
    Movie,
    Genres,
}

impl Domain {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Movie => "Movie",
            Self::Genres => "Genres",
        }
    }
}

/// API method, the part of the method name after the dot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiMethod {
    ImdbLookup,
    Search,
    GetInfo,
    GetList,
}

impl ApiMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ImdbLookup => "imdbLookup",
            Self::Search => "search",
            Self::GetInfo => "getInfo",
            Self::GetList => "getList",
        }
    }
}

impl fmt::Display for ApiMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully resolved request: which method to call and with what term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub domain: Domain,
    pub method: ApiMethod,
    pub term: String,
}

impl Request {
    /// Choose the API call for a lookup term.
    ///
    /// Text matching the IMDB id shape goes to `Movie.imdbLookup`, any other
    /// text to `Movie.search`. Numeric TMDB ids go straight to
    /// `Movie.getInfo`.
    pub fn for_term(term: &LookupTerm) -> Self {
        match term {
            LookupTerm::Text(text) if is_imdb_id(text) => Self {
                domain: Domain::Movie,
                method: ApiMethod::ImdbLookup,
                term: text.clone(),
            },
            LookupTerm::Text(text) => Self {
                domain: Domain::Movie,
                method: ApiMethod::Search,
                term: text.clone(),
            },
            LookupTerm::TmdbId(id) => Self::get_info(*id),
            LookupTerm::GenreList => Self {
                domain: Domain::Genres,
                method: ApiMethod::GetList,
                term: String::new(),
            },
        }
    }

    fn get_info(id: i64) -> Self {
        Self {
            domain: Domain::Movie,
            method: ApiMethod::GetInfo,
            term: id.to_string(),
        }
    }

    /// `Domain.method`, as it appears in the request path.
    pub fn api_method(&self) -> String {
        format!("{}.{}", self.domain.as_str(), self.method)
    }
}

// ---------------------------------------------------------------------------
// TMDB response types (private)
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct TmdbMovie {
    id: Option<i64>,
    name: Option<String>,
    overview: Option<String>,
    released: Option<String>,
    runtime: Option<i64>,
    certification: Option<String>,
    imdb_id: Option<String>,
    genres: Option<Vec<TmdbGenre>>,
    cast: Option<Vec<TmdbCast>>,
    posters: Option<Vec<TmdbPoster>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct TmdbGenre {
    id: Option<i64>,
    name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct TmdbCast {
    id: Option<i64>,
    name: Option<String>,
    job: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct TmdbPoster {
    image: PosterImage,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct TmdbSearchHit {
    id: Option<i64>,
}

/// One entry of a movie's poster list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PosterImage {
    /// Size tag, e.g. `cover`, `mid`, `thumb`, `original`.
    pub size: Option<String>,
    pub url: Option<String>,
}

impl PosterImage {
    fn url_if_size(&self, size: &str) -> Option<&str> {
        match (self.size.as_deref(), self.url.as_deref()) {
            (Some(s), Some(url)) if s == size && !url.is_empty() => Some(url),
            _ => None,
        }
    }
}

/// Pick the poster URL: a `cover` image if any has a URL, else a `mid`
/// image, else the empty string.
pub fn select_poster(posters: &[PosterImage]) -> String {
    let cover = posters.iter().find_map(|p| p.url_if_size("cover"));
    let mid = || posters.iter().find_map(|p| p.url_if_size("mid"));
    cover.or_else(mid).unwrap_or_default().to_string()
}

// ---------------------------------------------------------------------------
// Parsers
// ---------------------------------------------------------------------------

/// What a parser extracted from one response.
#[derive(Debug, Clone, PartialEq)]
pub enum Parsed {
    Media(Vec<ApiMedia>),
    /// Bare TMDB ids still to be resolved with `Movie.getInfo`.
    Ids(Vec<i64>),
    Genres(Vec<ApiGenre>),
}

type Parser = fn(&Value) -> Result<Parsed>;

const PARSERS: &[(ApiMethod, Parser)] = &[
    (ApiMethod::ImdbLookup, parse_info),
    (ApiMethod::GetInfo, parse_info),
    (ApiMethod::Search, parse_search),
    (ApiMethod::GetList, parse_genre_list),
];

fn parser_for(method: ApiMethod) -> Result<Parser> {
    PARSERS
        .iter()
        .find(|(m, _)| *m == method)
        .map(|(_, parser)| *parser)
        .ok_or_else(|| Error::Internal(format!("no parser registered for {method}")))
}

/// True when the provider signalled an empty result instead of data.
fn is_nothing_found(body: &Value) -> bool {
    match body {
        Value::String(s) => s.contains(NOTHING_FOUND),
        Value::Array(items) => items
            .iter()
            .any(|item| item.as_str().is_some_and(|s| s.contains(NOTHING_FOUND))),
        _ => false,
    }
}

/// Map a raw response body for `request` into value objects.
pub fn parse_response(request: &Request, body: &str) -> Result<Parsed> {
    let json: Value = serde_json::from_str(body).map_err(|e| {
        Error::Api(format!("{} returned invalid JSON: {e}", request.api_method()))
    })?;
    if is_nothing_found(&json) {
        return Err(Error::not_found("movie", &request.term));
    }
    parser_for(request.method)?(&json)
}

fn as_array<'a>(json: &'a Value, what: &str) -> Result<&'a Vec<Value>> {
    json.as_array()
        .ok_or_else(|| Error::Api(format!("{what} response is not an array")))
}

fn from_value<T: for<'de> Deserialize<'de>>(value: &Value, what: &str) -> Result<T> {
    T::deserialize(value).map_err(|e| Error::Api(format!("malformed {what}: {e}")))
}

fn parse_info(json: &Value) -> Result<Parsed> {
    let first = as_array(json, "getInfo")?
        .first()
        .ok_or_else(|| Error::Api("getInfo response is empty".into()))?;
    let movie: TmdbMovie = from_value(first, "movie")?;
    Ok(Parsed::Media(vec![map_movie(movie)]))
}

fn parse_search(json: &Value) -> Result<Parsed> {
    let hits = as_array(json, "search")?
        .iter()
        .map(|v| from_value::<TmdbSearchHit>(v, "search hit").map(|h| h.id.unwrap_or(0)))
        .collect::<Result<Vec<_>>>()?;
    Ok(Parsed::Ids(hits))
}

/// The first element of a genre list is a header, not a genre.
fn parse_genre_list(json: &Value) -> Result<Parsed> {
    let genres = as_array(json, "getList")?
        .iter()
        .skip(1)
        .map(|v| from_value::<TmdbGenre>(v, "genre").map(map_genre))
        .collect::<Result<Vec<_>>>()?;
    Ok(Parsed::Genres(genres))
}

fn map_genre(genre: TmdbGenre) -> ApiGenre {
    ApiGenre {
        name: genre.name.unwrap_or_default(),
        ids: vec![ApiId::tmdb(genre.id.unwrap_or(0))],
    }
}

/// Cast entries whose job matches `job`, case-insensitively.
fn people_with_job(cast: &[TmdbCast], job: &str) -> Vec<ApiPerson> {
    cast.iter()
        .filter(|c| c.job.as_deref().is_some_and(|j| j.eq_ignore_ascii_case(job)))
        .map(|c| ApiPerson {
            name: c.name.clone().unwrap_or_default(),
            role: c.job.clone().unwrap_or_default(),
            ids: vec![ApiId::tmdb(c.id.unwrap_or(0))],
        })
        .collect()
}

fn map_movie(movie: TmdbMovie) -> ApiMedia {
    let cast = movie.cast.unwrap_or_default();
    let posters: Vec<PosterImage> = movie
        .posters
        .unwrap_or_default()
        .into_iter()
        .map(|p| p.image)
        .collect();
    let rating = movie
        .certification
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| "NR".to_string());

    ApiMedia {
        title: movie.name.unwrap_or_default(),
        description: movie.overview.unwrap_or_default(),
        released: movie.released.filter(|r| !r.is_empty()),
        runtime: movie.runtime.unwrap_or(0),
        rating,
        genres: movie
            .genres
            .unwrap_or_default()
            .into_iter()
            .map(map_genre)
            .collect(),
        actors: people_with_job(&cast, "actor"),
        director: people_with_job(&cast, "director"),
        ids: vec![
            ApiId::tmdb(movie.id.unwrap_or(0)),
            ApiId::imdb(movie.imdb_id.unwrap_or_else(|| "tt0000000".to_string())),
        ],
        poster_url: select_poster(&posters),
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

pub struct TmdbClient {
    http: reqwest::Client,
    base_url: String,
    version: String,
    language: String,
    api_key: String,
}

impl TmdbClient {
    pub fn new(config: &TmdbConfig) -> Self {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("Failed to build HTTP client with timeout: {}", e);
                reqwest::Client::new()
            });

        Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            version: config.version.clone(),
            language: config.language.clone(),
            api_key: config.api_key.clone(),
        }
    }

    /// Request path for `request`, without the host.
    pub fn path(&self, request: &Request) -> String {
        format!(
            "/{}/{}/{}/{}/{}/{}",
            self.version,
            request.api_method(),
            self.language,
            OUTPUT_FORMAT,
            self.api_key,
            urlencoding::encode(&request.term),
        )
    }

    /// Issue one request and parse its body.
    pub async fn call(&self, request: &Request) -> Result<Parsed> {
        let url = format!("{}{}", self.base_url, self.path(request));
        debug!(method = %request.api_method(), term = %request.term, "TMDB request");

        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::Network(format!("TMDB request failed: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Network(format!("TMDB {status}: {body}")));
        }

        let body = resp
            .text()
            .await
            .map_err(|e| Error::Network(format!("TMDB response read failed: {e}")))?;
        parse_response(request, &body)
    }
}

#[async_trait]
impl MetadataSource for TmdbClient {
    fn name(&self) -> &'static str {
        "tmdb"
    }

    async fn lookup(&self, term: &LookupTerm) -> Result<Vec<ApiMedia>> {
        let request = Request::for_term(term);
        match self.call(&request).await? {
            Parsed::Media(media) => Ok(media),
            Parsed::Ids(ids) => {
                debug!(count = ids.len(), "resolving search hits");
                let mut media = Vec::with_capacity(ids.len());
                for id in ids {
                    if let Parsed::Media(found) = self.call(&Request::get_info(id)).await? {
                        media.extend(found.into_iter().take(1));
                    }
                }
                Ok(media)
            }
            Parsed::Genres(_) => Err(Error::Api(format!(
                "{} returned a genre list",
                request.api_method()
            ))),
        }
    }

    async fn genres(&self) -> Result<Vec<ApiGenre>> {
        let request = Request::for_term(&LookupTerm::GenreList);
        match self.call(&request).await? {
            Parsed::Genres(genres) => Ok(genres),
            _ => Err(Error::Api("Genres.getList returned no genre list".into())),
        }
    }
}
