pub mod account;
pub mod brands;
pub mod consumers;
pub mod products;
pub mod resellers;
pub mod users;

/// Optional http(s) URL check shared by brand websites and payment links.
pub(crate) fn is_http_url(value: &str) -> bool {
    url::Url::parse(value)
        .map(|u| matches!(u.scheme(), "http" | "https") && u.host_str().is_some())
        .unwrap_or(false)
}
