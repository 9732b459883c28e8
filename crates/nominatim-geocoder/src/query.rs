//! Location queries for the search endpoint

/// Structured address fields for a search
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressQuery {
    /// House number and street name, e.g. "135 Pilkington Avenue"
    pub street: Option<String>,
    pub city: Option<String>,
    pub county: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub postal_code: Option<String>,
}

impl AddressQuery {
    fn encode(&self) -> String {
        let fields = [
            ("street", &self.street),
            ("city", &self.city),
            ("county", &self.county),
            ("state", &self.state),
            ("country", &self.country),
            ("postalcode", &self.postal_code),
        ];

        fields
            .into_iter()
            .filter_map(|(key, value)| {
                value
                    .as_deref()
                    .map(|v| format!("{}={}", key, urlencoding::encode(v)))
            })
            .collect::<Vec<_>>()
            .join("&")
    }
}

/// What to search for: free text or address components
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    FreeText(String),
    Structured(AddressQuery),
}

impl Query {
    /// Render the primary query parameters, without a leading `&`
    pub fn encode(&self) -> String {
        match self {
            Self::FreeText(text) => format!("q={}", urlencoding::encode(text)),
            Self::Structured(address) => address.encode(),
        }
    }
}

impl From<&str> for Query {
    fn from(text: &str) -> Self {
        Self::FreeText(text.to_string())
    }
}

impl From<String> for Query {
    fn from(text: String) -> Self {
        Self::FreeText(text)
    }
}

impl From<AddressQuery> for Query {
    fn from(address: AddressQuery) -> Self {
        Self::Structured(address)
    }
}
