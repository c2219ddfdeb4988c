//! MAAS endpoint and API key validators.

use std::net::IpAddr;
use std::sync::LazyLock;

use regex::Regex;
use url::Url;

use crate::domain::field::Verdict;

/// Default MAAS API port.
pub const DEFAULT_PORT: &str = "5240";

/// Path suffix every MAAS API endpoint carries.
pub const API_SUFFIX: &str = "MAAS";

const FORMAT_HINT: &str = "http://maas-server.com:5240/MAAS";

static HOST_LABEL_RE: LazyLock<Regex> = LazyLock::new(|| {
    // Safety: this is a compile-time constant pattern and cannot fail.
    #[allow(clippy::expect_used)]
    Regex::new(r"^[A-Za-z0-9]([A-Za-z0-9-]{0,61}[A-Za-z0-9])?$").expect("valid regex")
});

/// A dotted DNS name whose last label is not purely numeric.
///
/// Single-label names are rejected so free text like `not-an-ip-or-url`
/// never passes as a host, and dotted quads fall through to IP parsing.
#[must_use]
pub fn is_domain_name(name: &str) -> bool {
    let name = name.strip_suffix('.').unwrap_or(name);
    if name.is_empty() || name.len() > 255 {
        return false;
    }
    let labels: Vec<&str> = name.split('.').collect();
    labels.len() >= 2
        && labels.iter().all(|l| HOST_LABEL_RE.is_match(l))
        && labels
            .last()
            .is_some_and(|tld| tld.chars().any(|c| c.is_ascii_alphabetic()))
}

fn is_network_location(host: &str) -> bool {
    let bare = host.trim_start_matches('[').trim_end_matches(']');
    host == "localhost" || bare.parse::<IpAddr>().is_ok() || is_domain_name(host)
}

/// Validate a MAAS API endpoint, rewriting it to a full URL.
///
/// Accepts `http(s)://host[:port][/path]` (appending `MAAS` when the path
/// lacks it), a bare domain name, or `ip[:port]`.
#[must_use]
pub fn validate_endpoint(endpoint: &str) -> Verdict {
    if endpoint.starts_with("http") {
        let url = match Url::parse(endpoint) {
            Ok(url) if url.host_str().is_some_and(is_network_location) => url,
            _ => {
                return Verdict::Invalid(format!(
                    "Unable to determine the web address, please use the format of {FORMAT_HINT}"
                ));
            }
        };
        if url.path().contains(API_SUFFIX) {
            return Verdict::Valid;
        }
        return match url.join(API_SUFFIX) {
            Ok(joined) => Verdict::Normalized(joined.to_string()),
            Err(_) => Verdict::Invalid(format!(
                "Unable to determine the web address, please use the format of {FORMAT_HINT}"
            )),
        };
    }

    if is_domain_name(endpoint) {
        return Verdict::Normalized(format!("http://{endpoint}:{DEFAULT_PORT}/{API_SUFFIX}"));
    }

    let (ip, port) = endpoint.split_once(':').unwrap_or((endpoint, DEFAULT_PORT));
    if ip.parse::<IpAddr>().is_ok() && port.parse::<u16>().is_ok() {
        return Verdict::Normalized(format!("http://{ip}:{port}/{API_SUFFIX}"));
    }

    Verdict::Invalid(format!(
        "Unable to validate that this entry is the correct format. \
         Please use the format of {FORMAT_HINT}"
    ))
}

/// Validate a MAAS API key: three colon-separated tokens.
#[must_use]
pub fn validate_api_key(key: &str) -> Verdict {
    if key.split(':').count() != 3 {
        return Verdict::Invalid(
            "Could not determine tokens, usually indicates an error with the format of the \
             API KEY. That format should be 'aaaaa:bbbbb:cccc'. Please visit your MAAS user \
             preferences page to grab the correct API Key: \
             http://<maas-server>:5240/MAAS/account/prefs/"
                .to_string(),
        );
    }
    Verdict::Valid
}
