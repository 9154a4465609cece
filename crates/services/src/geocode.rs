use foundation::math::LatLng;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::endpoints::ServiceEndpoints;
use crate::error::{BoxFuture, ServiceError, ServiceErrorKind, check_status};

/// Normalized administrative address of a coordinate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub province: String,
    pub district: String,
    pub subdistrict: String,
    /// Administrative code, when the service provides one.
    #[serde(default)]
    pub geocode: Option<String>,
}

/// Reverse geocode service: coordinate in, address out.
///
/// A failure is always reported, never replaced by a default address.
pub trait ReverseGeocoder: Send + Sync {
    fn reverse(&self, at: LatLng) -> BoxFuture<'_, Result<Address, ServiceError>>;
}

/// Administrative prefixes stripped from names. Longer forms first so `อำเภอ`
/// wins over `อ.`.
const ADMIN_PREFIXES: &[&str] = &[
    "จังหวัด", "อำเภอ", "ตำบล", "แขวง", "เขต", "จ.", "อ.", "ต.",
];

/// Trims and strips one leading administrative prefix.
pub fn normalize_admin_name(raw: &str) -> String {
    let trimmed = raw.trim();
    for prefix in ADMIN_PREFIXES {
        if let Some(rest) = trimmed.strip_prefix(prefix) {
            let rest = rest.trim();
            if !rest.is_empty() {
                return rest.to_string();
            }
        }
    }
    trimmed.to_string()
}

#[derive(Debug, Deserialize)]
struct RawAddress {
    #[serde(default)]
    province: Option<String>,
    #[serde(default, alias = "amphoe")]
    district: Option<String>,
    #[serde(default, alias = "tambon")]
    subdistrict: Option<String>,
    #[serde(default)]
    geocode: Option<Value>,
}

/// Decodes and normalizes a reverse geocode response body.
pub fn parse_address(body: &Value) -> Result<Address, ServiceError> {
    let raw: RawAddress = serde_json::from_value(body.clone())
        .map_err(|e| ServiceError::with_source(ServiceErrorKind::Decode, "malformed address", e))?;

    let province = normalize_admin_name(raw.province.as_deref().unwrap_or_default());
    if province.is_empty() {
        return Err(ServiceError::decode("address has no province"));
    }
    let geocode = match raw.geocode {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    };
    Ok(Address {
        province,
        district: normalize_admin_name(raw.district.as_deref().unwrap_or_default()),
        subdistrict: normalize_admin_name(raw.subdistrict.as_deref().unwrap_or_default()),
        geocode,
    })
}

/// `GET <url>?lat=..&lng=..` returning `{province, district, subdistrict, geocode}`.
pub struct HttpReverseGeocoder {
    url: String,
    client: reqwest::Client,
}

impl HttpReverseGeocoder {
    pub fn new(endpoints: &ServiceEndpoints) -> Result<Self, ServiceError> {
        Ok(Self::with_client(endpoints.client()?, &endpoints.geocode_url))
    }

    pub fn with_client(client: reqwest::Client, url: &str) -> Self {
        Self {
            url: url.to_string(),
            client,
        }
    }
}

impl ReverseGeocoder for HttpReverseGeocoder {
    fn reverse(&self, at: LatLng) -> BoxFuture<'_, Result<Address, ServiceError>> {
        Box::pin(async move {
            let resp = self
                .client
                .get(&self.url)
                .query(&[("lat", at.lat), ("lng", at.lng)])
                .send()
                .await
                .map_err(|e| ServiceError::from_reqwest("reverse geocode request failed", e))?;
            let resp = check_status("reverse geocode", resp)?;
            let body: Value = resp
                .json()
                .await
                .map_err(|e| ServiceError::from_reqwest("reverse geocode response", e))?;
            parse_address(&body)
        })
    }
}
