//! Minimal Atom reader for arXiv API responses.
//!
//! Only the elements the client maps are kept. Namespace prefixes are ignored
//! (`opensearch:totalResults`, `arxiv:primary_category`).

use anyhow::{anyhow, Context, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// arXiv reports query errors as a single entry whose id points here.
const ERROR_ID_MARKER: &str = "/api/errors";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Feed {
    pub total_results: Option<usize>,
    pub entries: Vec<RawEntry>,
}

impl Feed {
    /// The error entry when this feed is an arXiv error report.
    pub fn error(&self) -> Option<&RawEntry> {
        self.entries.iter().find(|e| e.is_error())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Link {
    pub href: String,
    pub rel: Option<String>,
    pub title: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawEntry {
    pub id: String,
    pub title: String,
    pub summary: String,
    pub authors: Vec<String>,
    pub published: String,
    pub updated: String,
    pub links: Vec<Link>,
    pub primary_category: Option<String>,
    pub categories: Vec<String>,
}

impl RawEntry {
    pub fn is_error(&self) -> bool {
        self.id.contains(ERROR_ID_MARKER)
    }

    /// `http://arxiv.org/abs/2401.01234v2` -> `2401.01234v2`.
    pub fn short_id(&self) -> &str {
        match self.id.split_once("arxiv.org/abs/") {
            Some((_, short)) => short,
            None => self.id.rsplit('/').next().unwrap_or(&self.id),
        }
    }

    /// The `title="pdf"` link, else the abstract URL rewritten to `/pdf/`.
    pub fn pdf_link(&self) -> String {
        self.links
            .iter()
            .find(|l| l.title.as_deref() == Some("pdf"))
            .map(|l| l.href.clone())
            .unwrap_or_else(|| self.id.replacen("/abs/", "/pdf/", 1))
    }
}

/// Collapse runs of whitespace (arXiv wraps titles and abstracts) into single spaces.
pub fn normalize_ws(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Capture {
    Id,
    Title,
    Summary,
    Published,
    Updated,
    AuthorName,
    TotalResults,
}

/// Parse a full arXiv Atom response.
pub fn parse_feed(xml: &str) -> Result<Feed> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut feed = Feed::default();
    let mut saw_feed = false;
    let mut entry: Option<RawEntry> = None;
    let mut in_author = false;
    let mut capture: Option<Capture> = None;
    let mut text = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Eof) => break,
            Ok(Event::Start(e)) => {
                let name = e.local_name();
                match name.as_ref() {
                    b"feed" => saw_feed = true,
                    b"entry" => entry = Some(RawEntry::default()),
                    b"author" => in_author = true,
                    _ => {}
                }
                if let Some(current) = entry.as_mut() {
                    collect_attrs(current, &e)?;
                }
                capture = match (name.as_ref(), entry.is_some(), in_author) {
                    (b"totalResults", false, _) => Some(Capture::TotalResults),
                    (b"id", true, _) => Some(Capture::Id),
                    (b"title", true, _) => Some(Capture::Title),
                    (b"summary", true, _) => Some(Capture::Summary),
                    (b"published", true, _) => Some(Capture::Published),
                    (b"updated", true, _) => Some(Capture::Updated),
                    (b"name", true, true) => Some(Capture::AuthorName),
                    _ => None,
                };
                text.clear();
            }
            Ok(Event::Empty(e)) => {
                if let Some(current) = entry.as_mut() {
                    collect_attrs(current, &e)?;
                }
            }
            Ok(Event::Text(t)) => {
                if capture.is_some() {
                    text.push_str(&t.unescape().context("invalid text in Atom feed")?);
                }
            }
            Ok(Event::CData(t)) => {
                if capture.is_some() {
                    text.push_str(&String::from_utf8_lossy(t.as_ref()));
                }
            }
            Ok(Event::End(e)) => {
                let name = e.local_name();
                match name.as_ref() {
                    b"entry" => {
                        if let Some(done) = entry.take() {
                            feed.entries.push(done);
                        }
                    }
                    b"author" => in_author = false,
                    _ => {}
                }
                if let Some(kind) = capture.take() {
                    store(&mut feed, entry.as_mut(), kind, &text)?;
                }
                text.clear();
            }
            Err(e) => {
                return Err(anyhow!("malformed Atom feed at byte {}: {}", reader.buffer_position(), e));
            }
            _ => {}
        }
    }

    if !saw_feed {
        return Err(anyhow!("response is not an Atom feed"));
    }
    Ok(feed)
}

fn store(feed: &mut Feed, entry: Option<&mut RawEntry>, kind: Capture, text: &str) -> Result<()> {
    if kind == Capture::TotalResults {
        let total = text
            .trim()
            .parse::<usize>()
            .with_context(|| format!("bad totalResults value '{}'", text.trim()))?;
        feed.total_results = Some(total);
        return Ok(());
    }
    let Some(entry) = entry else {
        return Ok(());
    };
    match kind {
        Capture::Id => entry.id = text.trim().to_string(),
        Capture::Title => entry.title = normalize_ws(text),
        Capture::Summary => entry.summary = normalize_ws(text),
        Capture::Published => entry.published = text.trim().to_string(),
        Capture::Updated => entry.updated = text.trim().to_string(),
        Capture::AuthorName => {
            let name = normalize_ws(text);
            if !name.is_empty() {
                entry.authors.push(name);
            }
        }
        Capture::TotalResults => {}
    }
    Ok(())
}

fn collect_attrs(entry: &mut RawEntry, e: &BytesStart<'_>) -> Result<()> {
    match e.local_name().as_ref() {
        b"link" => {
            let href = attr(e, b"href")?.unwrap_or_default();
            if !href.is_empty() {
                entry.links.push(Link { href, rel: attr(e, b"rel")?, title: attr(e, b"title")? });
            }
        }
        b"primary_category" => entry.primary_category = attr(e, b"term")?,
        b"category" => {
            if let Some(term) = attr(e, b"term")? {
                if !entry.categories.contains(&term) {
                    entry.categories.push(term);
                }
            }
        }
        _ => {}
    }
    Ok(())
}

fn attr(e: &BytesStart<'_>, key: &[u8]) -> Result<Option<String>> {
    for a in e.attributes() {
        let a = a.context("invalid attribute in Atom feed")?;
        if a.key.local_name().as_ref() == key {
            return Ok(Some(a.unescape_value().context("invalid attribute value")?.into_owned()));
        }
    }
    Ok(None)
}
