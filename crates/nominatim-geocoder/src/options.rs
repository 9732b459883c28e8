//! Request options and their query-string encoding
//!
//! Option structs are partial: a field left as `None` is not sent and the
//! service applies its own default. [`SearchOptions::resolve`] and
//! [`ReverseOptions::resolve`] show the effective values against the
//! documented defaults below.

use crate::error::{NominatimError, Result};
use crate::types::BoundingBox;

/// Number of search results the service returns when no limit is sent
pub const DEFAULT_LIMIT: u32 = 10;
/// Whether the service deduplicates results when `dedupe` is not sent
pub const DEFAULT_DEDUPE: bool = true;

/// Options shared by search and reverse lookups
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Options {
    /// Preferred result languages, most preferred first
    pub languages: Option<Vec<String>>,
    /// Restrict results to these ISO 3166-1 alpha-2 country codes
    pub country_codes: Option<Vec<String>>,
    /// Collapse results describing the same real-world object
    pub dedupe: Option<bool>,
}

/// Options for forward (search) lookups
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchOptions {
    pub common: Options,
    /// Include the structured address of each result
    pub full_address: Option<bool>,
    pub limit: Option<u32>,
    /// Only return results inside this area
    pub bounding_box: Option<BoundingBox>,
}

/// Options for reverse lookups
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReverseOptions {
    pub common: Options,
    pub zoom: Option<ZoomLevel>,
}

/// Level of detail for reverse lookups, 0 (country) to 18 (building)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ZoomLevel(u8);

impl ZoomLevel {
    pub const MAX: u8 = 18;

    pub fn new(level: u8) -> Result<Self> {
        if level > Self::MAX {
            return Err(NominatimError::InvalidZoomLevel(level));
        }
        Ok(Self(level))
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for ZoomLevel {
    type Error = NominatimError;

    fn try_from(level: u8) -> Result<Self> {
        Self::new(level)
    }
}

/// Search options with every default filled in
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSearchOptions {
    pub languages: Vec<String>,
    pub country_codes: Vec<String>,
    pub dedupe: bool,
    pub full_address: bool,
    pub limit: u32,
    pub bounding_box: Option<BoundingBox>,
}

/// Reverse options with every default filled in
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedReverseOptions {
    pub languages: Vec<String>,
    pub country_codes: Vec<String>,
    pub dedupe: bool,
    pub zoom: Option<ZoomLevel>,
}

impl Options {
    pub fn with_languages<I, S>(mut self, languages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.languages = Some(languages.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_country_codes<I, S>(mut self, codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.country_codes = Some(codes.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_dedupe(mut self, dedupe: bool) -> Self {
        self.dedupe = Some(dedupe);
        self
    }
}

impl SearchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_common(mut self, common: Options) -> Self {
        self.common = common;
        self
    }

    pub fn with_full_address(mut self, full_address: bool) -> Self {
        self.full_address = Some(full_address);
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_bounding_box(mut self, bounding_box: BoundingBox) -> Self {
        self.bounding_box = Some(bounding_box);
        self
    }

    /// Encode as a query-string fragment (`&key=value...` or empty)
    pub fn encode(&self) -> String {
        EndpointOptions::Search(self).encode()
    }

    pub fn resolve(&self) -> ResolvedSearchOptions {
        ResolvedSearchOptions {
            languages: self.common.languages.clone().unwrap_or_default(),
            country_codes: self.common.country_codes.clone().unwrap_or_default(),
            dedupe: self.common.dedupe.unwrap_or(DEFAULT_DEDUPE),
            full_address: self.full_address.unwrap_or(false),
            limit: self.limit.unwrap_or(DEFAULT_LIMIT),
            bounding_box: self.bounding_box,
        }
    }
}

impl ReverseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_common(mut self, common: Options) -> Self {
        self.common = common;
        self
    }

    pub fn with_zoom(mut self, zoom: ZoomLevel) -> Self {
        self.zoom = Some(zoom);
        self
    }

    /// Encode as a query-string fragment (`&key=value...` or empty)
    pub fn encode(&self) -> String {
        EndpointOptions::Reverse(self).encode()
    }

    pub fn resolve(&self) -> ResolvedReverseOptions {
        ResolvedReverseOptions {
            languages: self.common.languages.clone().unwrap_or_default(),
            country_codes: self.common.country_codes.clone().unwrap_or_default(),
            dedupe: self.common.dedupe.unwrap_or(DEFAULT_DEDUPE),
            zoom: self.zoom,
        }
    }
}

/// Options tagged with the endpoint they are encoded for
#[derive(Debug, Clone, Copy)]
pub enum EndpointOptions<'a> {
    Search(&'a SearchOptions),
    Reverse(&'a ReverseOptions),
}

impl EndpointOptions<'_> {
    fn common(&self) -> &Options {
        match self {
            Self::Search(opts) => &opts.common,
            Self::Reverse(opts) => &opts.common,
        }
    }

    /// Encode the explicitly set fields, in a fixed order
    pub fn encode(&self) -> String {
        let common = self.common();
        let mut params = Vec::new();

        if let Some(ref languages) = common.languages {
            params.push(format!("accept-language={}", join_list(languages)));
        }
        if let Some(dedupe) = common.dedupe {
            params.push(format!("dedupe={}", u8::from(dedupe)));
        }
        if let Some(ref codes) = common.country_codes {
            params.push(format!("countrycodes={}", join_list(codes)));
        }

        match self {
            Self::Search(opts) => {
                if opts.full_address == Some(true) {
                    params.push("addressdetails=1".to_string());
                }
                if let Some(limit) = opts.limit {
                    params.push(format!("limit={limit}"));
                }
                if let Some(bbox) = opts.bounding_box {
                    params.push(format!("viewbox={bbox}"));
                    params.push("bounded=1".to_string());
                }
            }
            Self::Reverse(opts) => {
                // Nominatim documents this parameter as `zoom`
                if let Some(zoom) = opts.zoom {
                    params.push(format!("zoomlevel={}", zoom.value()));
                }
            }
        }

        if params.is_empty() {
            String::new()
        } else {
            format!("&{}", params.join("&"))
        }
    }
}

/// Comma-join list values, escaping each element but not the separator
fn join_list(values: &[String]) -> String {
    values
        .iter()
        .map(|v| urlencoding::encode(v).into_owned())
        .collect::<Vec<_>>()
        .join(",")
}
