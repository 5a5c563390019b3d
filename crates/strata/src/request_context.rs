// File: src/request_context.rs
// Purpose: Request boundary consumed by the pipeline, and the per-render context

use std::collections::HashMap;

use axum::http::{HeaderMap, Method, Uri};
use serde_json::Value as JsonValue;
use strata_router::{ParamValue, Params};

use crate::config::PageMetadata;
use crate::value::Value;

/// Header carrying the browser's fetch-site indicator
pub const SEC_FETCH_SITE: &str = "sec-fetch-site";

/// Everything the pipeline reads from an incoming request
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// HTTP method (GET, POST, PUT, DELETE, etc.)
    pub method: Method,

    /// Request path, possibly still percent-encoded and carrying a query
    pub path: String,

    /// Query parameters from URL (?key=value)
    pub query: QueryParams,

    /// Form data from POST/PUT requests
    pub form: FormData,

    /// Request headers
    pub headers: HeaderMap,
}

impl RequestContext {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        let path = path.into();
        let query = path
            .split_once('?')
            .map(|(_, q)| QueryParams::parse(q))
            .unwrap_or_default();

        Self {
            method,
            path,
            query,
            form: FormData::default(),
            headers: HeaderMap::new(),
        }
    }

    /// Builds the context from the parts axum hands a handler
    pub fn from_parts(method: Method, uri: &Uri, headers: HeaderMap) -> Self {
        let path = uri
            .path_and_query()
            .map(|pq| pq.as_str().to_string())
            .unwrap_or_else(|| uri.path().to_string());
        Self::new(method, path).with_headers(headers)
    }

    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    pub fn with_form(mut self, form: FormData) -> Self {
        self.form = form;
        self
    }

    /// Get a header value
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)?.to_str().ok()
    }

    /// The `Sec-Fetch-Site` indicator, if the client sent one
    pub fn fetch_site(&self) -> Option<&str> {
        self.get_header(SEC_FETCH_SITE)
    }

    /// Check if this is a specific method
    pub fn is_get(&self) -> bool {
        self.method == Method::GET
    }

    pub fn is_post(&self) -> bool {
        self.method == Method::POST
    }

    pub fn is_put(&self) -> bool {
        self.method == Method::PUT
    }

    pub fn is_delete(&self) -> bool {
        self.method == Method::DELETE
    }

    /// Logical URI: percent-decoded, query removed, slashes trimmed and the
    /// deployment `base_path` stripped
    ///
    /// # Examples
    ///
    /// ```
    /// use strata::RequestContext;
    /// use strata::axum::http::Method;
    ///
    /// let request = RequestContext::new(Method::GET, "/shop/blog/hello%20world/?page=2");
    /// assert_eq!(request.uri(Some("/shop")), "blog/hello world");
    /// assert_eq!(request.uri(None), "shop/blog/hello world");
    /// ```
    pub fn uri(&self, base_path: Option<&str>) -> String {
        let path = self.path.split(['?', '#']).next().unwrap_or("");
        let decoded = urlencoding::decode(path)
            .map(|d| d.into_owned())
            .unwrap_or_else(|_| path.to_string());
        let uri = decoded.trim_matches('/');

        let base = base_path.map(|b| b.trim_matches('/')).unwrap_or("");
        if base.is_empty() {
            return uri.to_string();
        }

        match uri.strip_prefix(base) {
            Some(rest) if rest.is_empty() || rest.starts_with('/') => {
                rest.trim_start_matches('/').to_string()
            }
            _ => uri.to_string(),
        }
    }

    fn request_value(&self) -> Value {
        Value::object([
            ("method", Value::from(self.method.as_str())),
            ("is_get", Value::from(self.is_get())),
            ("is_post", Value::from(self.is_post())),
            ("is_put", Value::from(self.is_put())),
            ("is_delete", Value::from(self.is_delete())),
            ("fetch_site", Value::from(self.fetch_site())),
        ])
    }
}

/// Query parameters from URL
#[derive(Debug, Clone, Default)]
pub struct QueryParams {
    params: HashMap<String, String>,
}

impl QueryParams {
    /// Create from HashMap
    pub fn new(params: HashMap<String, String>) -> Self {
        Self { params }
    }

    /// Parses `a=1&b=two+words`; later keys overwrite earlier ones
    pub fn parse(query: &str) -> Self {
        let params = query
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| {
                let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
                (decode_component(key), decode_component(value))
            })
            .collect();
        Self { params }
    }

    /// Get a query parameter value
    pub fn get(&self, key: &str) -> Option<&String> {
        self.params.get(key)
    }

    /// Get a query parameter as a specific type
    pub fn get_as<T: std::str::FromStr>(&self, key: &str) -> Option<T> {
        self.params.get(key)?.parse().ok()
    }

    /// Check if a parameter exists
    pub fn has(&self, key: &str) -> bool {
        self.params.contains_key(key)
    }

    /// Get as HashMap
    pub fn as_map(&self) -> &HashMap<String, String> {
        &self.params
    }
}

/// Form data from POST/PUT requests
#[derive(Debug, Clone, Default)]
pub struct FormData {
    fields: HashMap<String, String>,
    raw_json: Option<JsonValue>,
}

impl FormData {
    /// Create from form fields with automatic trimming
    pub fn from_fields(fields: HashMap<String, String>) -> Self {
        let fields = fields
            .into_iter()
            .map(|(k, v)| (k, v.trim().to_string()))
            .collect();

        Self {
            fields,
            raw_json: None,
        }
    }

    /// Create from JSON; top-level members become fields
    pub fn from_json(json: JsonValue) -> Self {
        let mut fields = HashMap::new();

        if let JsonValue::Object(map) = &json {
            for (key, value) in map {
                let value = match value.as_str() {
                    Some(s) => s.trim().to_string(),
                    None => value.to_string(),
                };
                fields.insert(key.clone(), value);
            }
        }

        Self {
            fields,
            raw_json: Some(json),
        }
    }

    /// Parses a urlencoded body
    pub fn from_urlencoded(body: &str) -> Self {
        Self::from_fields(QueryParams::parse(body).params)
    }

    /// Get a form field value
    pub fn get(&self, key: &str) -> Option<&String> {
        self.fields.get(key)
    }

    /// Get raw JSON if available
    pub fn json(&self) -> Option<&JsonValue> {
        self.raw_json.as_ref()
    }

    /// Get as HashMap
    pub fn as_map(&self) -> &HashMap<String, String> {
        &self.fields
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.raw_json.is_none()
    }
}

fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    urlencoding::decode(&spaced)
        .map(|d| d.into_owned())
        .unwrap_or(spaced)
}

/// What one render pass can see: the request plus its resolution
///
/// Handlers receive this, and its [`variables`](Self::variables) feed every
/// template interpolated for the request.
#[derive(Debug, Clone)]
pub struct RenderContext {
    pub request: RequestContext,
    /// Logical URI, no leading or trailing slash
    pub uri: String,
    pub params: Params,
    pub metadata: PageMetadata,
    pub base_url: String,
}

impl RenderContext {
    pub fn new(request: RequestContext, uri: impl Into<String>) -> Self {
        Self {
            request,
            uri: uri.into(),
            params: Params::new(),
            metadata: PageMetadata {
                title: String::new(),
                description: String::new(),
            },
            base_url: "/".to_string(),
        }
    }

    /// `/` followed by the logical URI
    pub fn pathname(&self) -> String {
        format!("/{}", self.uri)
    }

    pub fn param(&self, name: &str) -> Option<&ParamValue> {
        self.params.get(name)
    }

    /// Variable table for template interpolation
    pub fn variables(&self) -> HashMap<String, Value> {
        let strings = |map: &HashMap<String, String>| {
            Value::object(map.iter().map(|(k, v)| (k.clone(), v.as_str())))
        };

        HashMap::from([
            ("pathname".to_string(), Value::from(self.pathname())),
            ("uri".to_string(), Value::from(self.uri.as_str())),
            ("base_url".to_string(), Value::from(self.base_url.as_str())),
            (
                "params".to_string(),
                Value::object(self.params.iter().map(|(k, v)| (k.clone(), Value::from(v)))),
            ),
            ("query".to_string(), strings(self.request.query.as_map())),
            ("form".to_string(), strings(self.request.form.as_map())),
            ("request".to_string(), self.request.request_value()),
            (
                "metadata".to_string(),
                Value::object([
                    ("title", self.metadata.title.as_str()),
                    ("description", self.metadata.description.as_str()),
                ]),
            ),
        ])
    }
}
