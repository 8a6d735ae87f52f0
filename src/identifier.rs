use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Error, Result};

const ARXIV_BASE: &str = "https://arxiv.org/";
const AR5IV_BASE: &str = "https://ar5iv.labs.arxiv.org/html/";

/// The resources arXiv publishes for an article.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArxivResource {
    Abs,
    Pdf,
    Format,
    Src,
    Cits,
    Html,
}

impl ArxivResource {
    pub const ALL: [ArxivResource; 6] = [
        ArxivResource::Abs,
        ArxivResource::Pdf,
        ArxivResource::Format,
        ArxivResource::Src,
        ArxivResource::Cits,
        ArxivResource::Html,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ArxivResource::Abs => "abs",
            ArxivResource::Pdf => "pdf",
            ArxivResource::Format => "format",
            ArxivResource::Src => "src",
            ArxivResource::Cits => "cits",
            ArxivResource::Html => "html",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            ArxivResource::Abs => "Main page of the article, linking to all other resources.",
            ArxivResource::Pdf => "Direct link to the article PDF.",
            ArxivResource::Format => "Page giving access to other formats.",
            ArxivResource::Src => "Original source files submitted by the authors.",
            ArxivResource::Cits => "Citation tracking across platforms and databases.",
            ArxivResource::Html => "The ar5iv HTML rendition of the article.",
        }
    }
}

impl fmt::Display for ArxivResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ArxivResource {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        ArxivResource::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| format!("unknown resource `{s}` (expected abs, pdf, format, src, cits or html)"))
    }
}

/// A parsed arXiv URI: the article's DOI plus, for full URLs, the resource
/// the URI pointed at.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ArxivUri<'a> {
    pub doi: &'a str,
    pub resource: Option<ArxivResource>,
}

impl<'a> ArxivUri<'a> {
    /// Parse one of the recognised shapes: a bare DOI (optionally `doi:` or
    /// `doi://` prefixed), `https://arxiv.org/{resource}/{doi}`, or
    /// `https://ar5iv.labs.arxiv.org/html/{doi}`.
    pub fn parse(uri: &'a str) -> Option<Self> {
        let s = uri.trim();
        if let Some(doi) = s.strip_prefix(AR5IV_BASE) {
            return (!doi.is_empty()).then_some(ArxivUri {
                doi,
                resource: Some(ArxivResource::Html),
            });
        }
        if let Some(rest) = s.strip_prefix(ARXIV_BASE) {
            let (resource, doi) = rest.split_once('/')?;
            let resource = resource.parse().ok()?;
            return (!doi.is_empty()).then_some(ArxivUri {
                doi,
                resource: Some(resource),
            });
        }
        extract_doi(s).map(|doi| ArxivUri {
            doi,
            resource: None,
        })
    }

    /// Inverse of [`parse`](ArxivUri::parse): the canonical URI for this value.
    pub fn compile(&self) -> String {
        match self.resource {
            None => self.doi.to_string(),
            Some(ArxivResource::Html) => format!("{AR5IV_BASE}{}", self.doi),
            Some(resource) => format!("{ARXIV_BASE}{}/{}", resource.as_str(), self.doi),
        }
    }

    pub fn with_resource(self, resource: ArxivResource) -> Self {
        Self {
            resource: Some(resource),
            ..self
        }
    }
}

/// Translate `uri` to the URL of `resource`, echoing the input unchanged when
/// it is not arXiv-parsable.
///
/// ```
/// use xv::{ArxivResource, arxiv_url};
///
/// assert_eq!(
///     arxiv_url("https://arxiv.org/abs/10.3233", ArxivResource::Pdf),
///     "https://arxiv.org/pdf/10.3233",
/// );
/// assert_eq!(arxiv_url("not a uri", ArxivResource::Pdf), "not a uri");
/// ```
pub fn arxiv_url(uri: &str, resource: ArxivResource) -> String {
    arxiv_url_with(uri, resource, |raw| raw.to_string())
}

/// [`arxiv_url`] with a caller-supplied fallback for unparsable input.
pub fn arxiv_url_with<F>(uri: &str, resource: ArxivResource, fallback: F) -> String
where
    F: FnOnce(&str) -> String,
{
    match ArxivUri::parse(uri) {
        Some(parsed) => parsed.with_resource(resource).compile(),
        None => fallback(uri),
    }
}

/// [`arxiv_url`] without a fallback: unparsable input is an error.
pub fn try_arxiv_url(uri: &str, resource: ArxivResource) -> Result<String> {
    ArxivUri::parse(uri)
        .map(|parsed| parsed.with_resource(resource).compile())
        .ok_or_else(|| Error::UriParse(uri.to_string()))
}

// Official DOI shape per the IDF handbook: "10." followed by 4-9 digits, a
// slash, then the registrant's suffix. arXiv additionally assigns its own
// DOIs under the 10.48550 prefix.
static OFFICIAL_DOI: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:doi:|doi://)?(10\.\d{4,9}/[-._;()/:A-Za-z0-9]+)$").unwrap()
});

static ARXIV_DOI: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:doi:|doi://)?(10\.48550/arXiv\.\d{4}\.\d{4,5})$").unwrap()
});

/// The DOI inside `s`, stripped of any `doi:`/`doi://` prefix, or `None` when
/// `s` is not a DOI.
pub fn extract_doi(s: &str) -> Option<&str> {
    OFFICIAL_DOI
        .captures(s.trim())
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Like [`extract_doi`], but only for arXiv-assigned DOIs
/// (`10.48550/arXiv.YYMM.NNNNN`, no version suffix).
pub fn extract_arxiv_doi(s: &str) -> Option<&str> {
    ARXIV_DOI
        .captures(s.trim())
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}
