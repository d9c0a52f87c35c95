//! Daily readings from the USCCB website.
//!
//! Readings are published one page per Mass at `{base}/MMDDYY.cfm`, with days that have more
//! than one Mass adding a suffix such as `MMDDYY-Vigil.cfm`. Each reading is rendered as a
//! `b-verse` block holding a `name` heading, an `address` (the citation), and a `content-body`.

use crate::mass::{LiturgicalCalendar, Mass, MassType, Reading, Section};
use async_trait::async_trait;
use eyre::Context;
use jiff::Timestamp;
use jiff::civil::Date;
use jiff::tz::TimeZone;
use regex::{Captures, Regex};
use std::sync::LazyLock;

pub const DEFAULT_BASE_URL: &str = "https://bible.usccb.org/bible/readings";

static TITLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)<div class="wr-block b-lectionary[^"]*">.*?<h2[^>]*>(.*?)</h2>"#)
        .expect("title pattern is valid")
});
static VERSE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r#"(?s)<h3 class="name">(.*?)</h3>"#,
        r#".*?<div class="address">(.*?)</div>"#,
        r#".*?<div class="content-body">(.*?)</div>"#,
    ))
    .expect("verse pattern is valid")
});
static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));
static LINE_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<br\s*/?>").expect("line break pattern is valid"));
static PARAGRAPH_END: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</p>").expect("paragraph pattern is valid"));
static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("tag pattern is valid"));
static ENTITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(#[0-9]+|#[xX][0-9a-fA-F]+|[a-zA-Z]+);").expect("entity pattern is valid")
});
static BLANK_LINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("blank line pattern is valid"));

/// A [`LiturgicalCalendar`] that reads Mass content from the USCCB daily readings pages.
#[derive(Debug, Clone)]
pub struct UsccbProvider {
    client: reqwest::Client,
    base_url: String,
    timezone: TimeZone,
}

impl UsccbProvider {
    pub fn new(timezone: TimeZone) -> eyre::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("stjoseph/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("build readings HTTP client")?;
        Ok(Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
            timezone,
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn page_url(&self, date: Date, kind: MassType) -> String {
        format!(
            "{}/{}{}.cfm",
            self.base_url,
            date.strftime("%m%d%y"),
            kind.url_suffix()
        )
    }

    /// Fetches a readings page, or `None` if the site has no such page.
    async fn fetch(&self, url: &str) -> eyre::Result<Option<String>> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("fetch readings from {url}"))?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = response
            .error_for_status()
            .with_context(|| format!("fetch readings from {url}"))?;
        let html = response
            .text()
            .await
            .with_context(|| format!("read readings page {url}"))?;
        Ok(Some(html))
    }
}

#[async_trait]
impl LiturgicalCalendar for UsccbProvider {
    fn today(&self) -> Date {
        Timestamp::now().to_zoned(self.timezone.clone()).date()
    }

    async fn mass_from_date(&self, date: Date, types: &[MassType]) -> eyre::Result<Option<Mass>> {
        let types = if types.is_empty() {
            &[MassType::Default][..]
        } else {
            types
        };
        for &kind in types {
            let url = self.page_url(date, kind);
            let Some(html) = self.fetch(&url).await? else {
                tracing::debug!(%url, "no readings page");
                continue;
            };
            match parse_mass(&html, &url, date) {
                Some(mass) => return Ok(Some(mass)),
                None => tracing::warn!(%url, "readings page has no readings"),
            }
        }
        Ok(None)
    }
}

/// Extracts a [`Mass`] from a readings page; `None` if the page lists no readings.
pub fn parse_mass(html: &str, url: &str, date: Date) -> Option<Mass> {
    let title = TITLE
        .captures(html)
        .map(|caps| html_to_text(&caps[1]))
        .filter(|title| !title.is_empty());

    let mut sections: Vec<Section> = Vec::new();
    for caps in VERSE.captures_iter(html) {
        let header = html_to_text(&caps[1]);
        let reading = Reading {
            citation: html_to_text(&caps[2]),
            text: html_to_text(&caps[3]),
        };
        match sections.last_mut() {
            Some(section) if section.header == header => section.readings.push(reading),
            _ => sections.push(Section {
                header,
                readings: vec![reading],
            }),
        }
    }

    if sections.is_empty() {
        return None;
    }
    Some(Mass {
        date: Some(date),
        title,
        url: url.to_string(),
        sections,
    })
}

/// Renders an HTML fragment as plain text, keeping line and paragraph breaks.
fn html_to_text(html: &str) -> String {
    let text = WHITESPACE.replace_all(html, " ");
    let text = LINE_BREAK.replace_all(&text, "\n");
    let text = PARAGRAPH_END.replace_all(&text, "\n\n");
    let text = TAG.replace_all(&text, "");
    let text = decode_entities(&text);
    let text = text.lines().map(str::trim).collect::<Vec<_>>().join("\n");
    BLANK_LINES.replace_all(text.trim(), "\n\n").into_owned()
}

fn decode_entities(text: &str) -> String {
    ENTITY
        .replace_all(text, |caps: &Captures<'_>| {
            let entity = &caps[1];
            let decoded = if let Some(hex) = entity
                .strip_prefix("#x")
                .or_else(|| entity.strip_prefix("#X"))
            {
                u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
            } else if let Some(dec) = entity.strip_prefix('#') {
                dec.parse().ok().and_then(char::from_u32)
            } else {
                named_entity(entity)
            };
            decoded.map_or_else(|| caps[0].to_string(), String::from)
        })
        .into_owned()
}

fn named_entity(name: &str) -> Option<char> {
    Some(match name {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => ' ',
        "lsquo" => '\u{2018}',
        "rsquo" => '\u{2019}',
        "ldquo" => '\u{201C}',
        "rdquo" => '\u{201D}',
        "ndash" => '\u{2013}',
        "mdash" => '\u{2014}',
        "hellip" => '\u{2026}',
        _ => return None,
    })
}
