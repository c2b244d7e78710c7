use serde::Deserialize;
use url::Url;

pub const DEFAULT_CATEGORY: &str = r#"{"value":"1","label":"Uncategorized"}"#;

/// A single domain or absolute URL to bookmark. Identity is the normalized
/// string; there is no way to build one except through the normalizers below.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WorkItem(String);

impl WorkItem {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_url(&self) -> bool {
        self.0.contains("://")
    }

    /// URL handed to the metadata endpoint.
    pub fn target_url(&self) -> String {
        if self.is_url() {
            self.0.clone()
        } else {
            format!("https://{}", self.0)
        }
    }
}

impl std::fmt::Display for WorkItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub domain: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub content_html: Option<String>,
    pub content_text: Option<String>,
    pub content_published_date: Option<String>,
    pub icon_url: Option<String>,
    pub main_image_url: Option<String>,
    pub author: Option<String>,
    pub url: Option<String>,
}

impl Metadata {
    /// True when the service answered with no usable field at all.
    pub fn is_empty(&self) -> bool {
        [
            &self.domain,
            &self.title,
            &self.description,
            &self.content_html,
            &self.content_text,
            &self.content_published_date,
            &self.icon_url,
            &self.main_image_url,
            &self.author,
            &self.url,
        ]
        .iter()
        .all(|field| field.is_none())
    }
}

/// Flat form body for the bookmark-create action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookmarkForm {
    pub domain: String,
    pub content_html: String,
    pub content_published_date: String,
    pub url: String,
    pub category: String,
    pub tags: String,
    pub importance: String,
    pub title: String,
    pub icon_url: String,
    pub description: String,
    pub main_image_url: String,
    pub content_text: String,
    pub author: String,
    pub note: String,
}

impl BookmarkForm {
    pub fn from_metadata(metadata: &Metadata, default_image: &str) -> Self {
        let text = |value: &Option<String>| value.clone().unwrap_or_default();

        let main_image_url = metadata
            .main_image_url
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or(default_image)
            .to_string();

        Self {
            domain: text(&metadata.domain),
            content_html: text(&metadata.content_html),
            content_published_date: text(&metadata.content_published_date),
            url: text(&metadata.url),
            category: DEFAULT_CATEGORY.to_string(),
            tags: String::new(),
            importance: String::new(),
            title: text(&metadata.title),
            icon_url: text(&metadata.icon_url),
            description: text(&metadata.description),
            main_image_url,
            content_text: text(&metadata.content_text),
            author: text(&metadata.author),
            note: String::new(),
        }
    }

    pub fn fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("domain", self.domain.clone()),
            ("content_html", self.content_html.clone()),
            ("content_published_date", self.content_published_date.clone()),
            ("url", self.url.clone()),
            ("category", self.category.clone()),
            ("tags", self.tags.clone()),
            ("importance", self.importance.clone()),
            ("title", self.title.clone()),
            ("icon_url", self.icon_url.clone()),
            ("description", self.description.clone()),
            ("main_image_url", self.main_image_url.clone()),
            ("content_text", self.content_text.clone()),
            ("author", self.author.clone()),
            ("note", self.note.clone()),
        ]
    }
}

/// Lower-cases a bare domain and checks it is a usable host.
pub fn normalize_domain(input: &str) -> Option<WorkItem> {
    let trimmed = input.trim().trim_end_matches('.').to_lowercase();
    if trimmed.is_empty() || trimmed.contains(['/', '@', ' ']) {
        return None;
    }

    let parsed = Url::parse(&format!("https://{trimmed}")).ok()?;
    if parsed.port().is_some()
        || parsed.path() != "/"
        || parsed.query().is_some()
        || parsed.fragment().is_some()
    {
        return None;
    }

    parsed.host_str().map(|host| WorkItem(host.to_string()))
}

/// Accepts an absolute URL (scheme and host required) or a bare domain.
///
/// URLs keep their scheme, so `http://` and `https://` variants stay distinct.
/// The canonical serialization lower-cases scheme and host and gives an empty
/// path a single `/`, which makes `https://example.com` and
/// `https://example.com/` the same item. Any other trailing slash is kept.
pub fn normalize_url_entry(input: &str) -> Option<WorkItem> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }

    if !trimmed.contains("://") {
        return normalize_domain(trimmed);
    }

    let url = Url::parse(trimmed).ok()?;
    if !matches!(url.scheme(), "http" | "https") {
        return None;
    }
    match url.host_str() {
        Some(host) if !host.is_empty() => Some(WorkItem(url.to_string())),
        _ => None,
    }
}

/// `Alice@Example.COM ` -> `example.com`
pub fn domain_from_email(input: &str) -> Option<WorkItem> {
    let email = input.trim().to_lowercase();
    let (local, domain) = email.rsplit_once('@')?;
    if local.is_empty() {
        return None;
    }
    normalize_domain(domain)
}
