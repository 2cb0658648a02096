//! # URL Rewriter
//!
//! Upstream issuers return offer URIs of the form
//!
//! ```text
//! openid-credential-offer://issuer.example/?credential_offer_uri=https%3A%2F%2Fissuer.example%2Fopenid4vc%2FcredentialOffer%3Fid%3Dabc
//! ```
//!
//! A wallet scanning that URI would talk to the issuer directly. The rewriter
//! points both the outer URI and the nested `credential_offer_uri` at the
//! façade so the offer fetch passes through the proxy relay.

use percent_encoding::percent_decode_str;
use url::Url;

use crate::error::Error;

/// Name of the query parameter holding the nested offer URI.
pub const CREDENTIAL_OFFER_URI: &str = "credential_offer_uri";

/// Path of the façade's offer proxy, relative to its base URL.
pub const PROXY_OFFER_PATH: &str = "/proxy/offer";

/// Rewrite an upstream offer URI so it points at the façade.
///
/// The nested `credential_offer_uri` becomes `{base_url}/proxy/offer` with
/// the nested URI's original query string, and the outer URI takes the
/// façade's host and port. Input without a `credential_offer_uri` parameter
/// is returned unchanged.
///
/// # Errors
///
/// Returns `Error::UrlParse` if `base_url`, `original_uri` or the nested
/// offer URI cannot be parsed, or if the outer URI cannot carry a host.
pub fn rewrite_offer_uri(base_url: &str, original_uri: &str) -> Result<String, Error> {
    let base = Url::parse(base_url)?;
    let mut url = Url::parse(original_uri)?;

    let Some(nested) = nested_offer_uri(&url)? else {
        return Ok(original_uri.to_string());
    };

    let search = nested.query().filter(|q| !q.is_empty()).map(|q| format!("?{q}"));
    let proxied = Url::parse(&format!(
        "{}{PROXY_OFFER_PATH}{}",
        base_url.trim_end_matches('/'),
        search.unwrap_or_default()
    ))?;

    url.set_host(base.host_str())
        .map_err(|e| Error::UrlParse(format!("cannot set host on {original_uri}: {e}")))?;
    url.set_port(base.port())
        .map_err(|()| Error::UrlParse(format!("cannot set port on {original_uri}")))?;

    // replace the first occurrence in place, dropping any duplicates
    let mut replaced = false;
    let pairs = url
        .query_pairs()
        .into_owned()
        .filter_map(|(key, value)| {
            if key != CREDENTIAL_OFFER_URI {
                return Some((key, value));
            }
            if replaced {
                return None;
            }
            replaced = true;
            Some((key, proxied.to_string()))
        })
        .collect::<Vec<_>>();
    url.query_pairs_mut().clear().extend_pairs(pairs);

    Ok(url.to_string())
}

/// Extract and parse the nested `credential_offer_uri` of an offer URI.
///
/// The parameter value is percent-decoded once more after query decoding, so
/// issuers that double-encode the nested URI are handled.
///
/// # Errors
///
/// Returns `Error::UrlParse` if the nested URI cannot be parsed.
pub fn nested_offer_uri(offer_uri: &Url) -> Result<Option<Url>, Error> {
    let Some(value) = query_value(offer_uri, CREDENTIAL_OFFER_URI) else {
        return Ok(None);
    };
    let decoded = percent_decode_str(&value).decode_utf8_lossy();
    let nested = Url::parse(&decoded)
        .map_err(|e| Error::UrlParse(format!("invalid {CREDENTIAL_OFFER_URI} {decoded}: {e}")))?;
    Ok(Some(nested))
}

/// The first value of query parameter `name`, if present.
#[must_use]
pub fn query_value(url: &Url, name: &str) -> Option<String> {
    url.query_pairs().find(|(key, _)| key == name).map(|(_, value)| value.into_owned())
}
