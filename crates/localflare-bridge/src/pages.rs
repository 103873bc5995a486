//! Page routes.
//!
//! A page handler returns the page text; HTML documents get the call-proxy
//! injected before they are served. Routes default to `GET` and may list
//! other methods. Path patterns use `:name` for one segment and `*name`
//! for the rest of the path.

use std::collections::{BTreeMap, HashMap};
use std::fmt::{self, Display};
use std::str::FromStr;
use std::sync::Arc;

use localflare_common::StartupError;
use tracing::debug;

/// HTTP methods a page route can answer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PageMethod {
    #[default]
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl PageMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

impl Display for PageMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PageMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(Self::Get),
            "POST" => Ok(Self::Post),
            "PUT" => Ok(Self::Put),
            "PATCH" => Ok(Self::Patch),
            "DELETE" => Ok(Self::Delete),
            other => Err(format!("unsupported page method: {other}")),
        }
    }
}

/// What a page handler sees of the incoming request.
#[derive(Debug, Clone, Default)]
pub struct PageRequest {
    pub method: PageMethod,
    /// Request path, e.g. `/files`.
    pub path: String,
    /// Decoded query-string parameters.
    pub query: HashMap<String, String>,
    /// Captured path parameters for routes such as `/users/:id`.
    pub params: HashMap<String, String>,
    /// Request body as text (lossy UTF-8). Empty for most `GET`s.
    pub body: String,
}

impl PageRequest {
    pub fn query(&self, key: &str) -> Option<&str> {
        self.query.get(key).map(String::as_str)
    }

    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }
}

pub(crate) type PageHandler = Arc<dyn Fn(&PageRequest) -> Result<String, String> + Send + Sync>;

/// Page routes keyed by path, then method. Registering the same path and
/// method twice keeps the last handler.
#[derive(Default, Clone)]
pub struct PageRoutes {
    routes: BTreeMap<String, BTreeMap<PageMethod, PageHandler>>,
}

impl PageRoutes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a `GET` page handler for `path` (a leading `/` is added if
    /// missing).
    pub fn insert<F, E>(&mut self, path: impl Into<String>, handler: F)
    where
        F: Fn(&PageRequest) -> Result<String, E> + Send + Sync + 'static,
        E: Display,
    {
        self.insert_for(path, &[PageMethod::Get], handler);
    }

    /// Register `handler` for each of `methods` on `path`. An empty list
    /// means `GET`.
    pub fn insert_for<F, E>(&mut self, path: impl Into<String>, methods: &[PageMethod], handler: F)
    where
        F: Fn(&PageRequest) -> Result<String, E> + Send + Sync + 'static,
        E: Display,
    {
        let path = normalize_path(path.into());
        let boxed: PageHandler = Arc::new(move |req| handler(req).map_err(|e| e.to_string()));
        let methods = if methods.is_empty() {
            &[PageMethod::Get][..]
        } else {
            methods
        };

        let by_method = self.routes.entry(path.clone()).or_default();
        for &method in methods {
            if by_method.insert(method, Arc::clone(&boxed)).is_some() {
                debug!(path = %path, %method, "page route replaced");
            } else {
                debug!(path = %path, %method, "page route registered");
            }
        }
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (&str, &BTreeMap<PageMethod, PageHandler>)> {
        self.routes.iter().map(|(p, h)| (p.as_str(), h))
    }

    /// Number of registered paths.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Reject malformed patterns and pairs of patterns the router cannot
    /// tell apart, such as `/users/:id` next to `/users/:name`. `reserved`
    /// paths are routed separately; a page may not conflict with them, and
    /// a page at exactly a reserved path is left to the caller.
    pub fn check(&self, reserved: &[&str]) -> Result<(), StartupError> {
        let mut parsed: Vec<(&str, Vec<Segment<'_>>)> = reserved
            .iter()
            .filter_map(|path| parse_pattern(path).ok().map(|segments| (*path, segments)))
            .collect();
        for path in self.routes.keys() {
            if reserved.contains(&path.as_str()) {
                continue;
            }
            let segments = parse_pattern(path).map_err(|reason| StartupError::Route {
                path: path.clone(),
                reason,
            })?;
            if let Some((other, _)) = parsed.iter().find(|(_, seen)| conflicts(seen, &segments)) {
                return Err(StartupError::Route {
                    path: path.clone(),
                    reason: format!("conflicts with {other}"),
                });
            }
            parsed.push((path.as_str(), segments));
        }
        Ok(())
    }
}

fn normalize_path(path: String) -> String {
    if path.starts_with('/') {
        path
    } else {
        format!("/{path}")
    }
}

// =============================================================================
// PATTERNS
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Segment<'a> {
    Literal(&'a str),
    Param(&'a str),
    CatchAll(&'a str),
}

fn parse_pattern(path: &str) -> Result<Vec<Segment<'_>>, String> {
    let raw: Vec<&str> = path.trim_start_matches('/').split('/').collect();
    let last = raw.len() - 1;
    let mut segments = Vec::with_capacity(raw.len());
    let mut names: Vec<&str> = Vec::new();

    for (i, seg) in raw.into_iter().enumerate() {
        let segment = if let Some(name) = seg.strip_prefix(':') {
            Segment::Param(name)
        } else if let Some(name) = seg.strip_prefix('*') {
            if i != last {
                return Err(format!("catch-all *{name} must be the last segment"));
            }
            Segment::CatchAll(name)
        } else if seg.contains([':', '*']) {
            return Err(format!("segment {seg:?} mixes text and a parameter"));
        } else {
            Segment::Literal(seg)
        };

        if let Segment::Param(name) | Segment::CatchAll(name) = segment {
            if name.is_empty() || name.contains([':', '*']) {
                return Err(format!("segment {seg:?} has no valid parameter name"));
            }
            if names.contains(&name) {
                return Err(format!("parameter {name} appears twice"));
            }
            names.push(name);
        }
        segments.push(segment);
    }
    Ok(segments)
}

/// Whether two patterns would need the same router slot with different
/// parameter names or kinds.
fn conflicts(a: &[Segment<'_>], b: &[Segment<'_>]) -> bool {
    for (x, y) in a.iter().zip(b) {
        match (x, y) {
            (Segment::Literal(l), Segment::Literal(r)) if l == r => continue,
            (Segment::Param(l), Segment::Param(r)) if l == r => continue,
            (Segment::Param(_), Segment::Param(_)) => return true,
            (Segment::CatchAll(l), Segment::CatchAll(r)) => return l != r,
            // Static text takes priority over a parameter; the paths diverge.
            (Segment::Literal(_), Segment::Literal(_))
            | (Segment::Literal(_), Segment::Param(_))
            | (Segment::Param(_), Segment::Literal(_)) => return false,
            _ => return true,
        }
    }
    false
}
