//! HTTP request as a session resolution context

use http::request::Parts;
use login_panel::{RequestContext, SESSION_QUERY_PARAM, SessionToken};

/// Adapts request parts to [`RequestContext`].
///
/// The resolved token is cached in the request extensions so that the middleware
/// and any extractor further down agree on one token per request. A minted token is
/// kept aside for the middleware to send back to the client.
pub(crate) struct PartsContext<'a> {
    parts: &'a mut Parts,
    minted: Option<SessionToken>,
}

impl<'a> PartsContext<'a> {
    pub(crate) fn new(parts: &'a mut Parts) -> Self {
        Self {
            parts,
            minted: None,
        }
    }

    pub(crate) fn into_minted(self) -> Option<SessionToken> {
        self.minted
    }
}

impl RequestContext for PartsContext<'_> {
    fn cached_token(&self) -> Option<SessionToken> {
        self.parts.extensions.get::<SessionToken>().cloned()
    }

    fn cache_token(&mut self, token: SessionToken) {
        self.parts.extensions.insert(token);
    }

    fn query_token(&self) -> Option<String> {
        let query = self.parts.uri.query()?;
        url::form_urlencoded::parse(query.as_bytes())
            .find(|(key, _)| key == SESSION_QUERY_PARAM.as_str())
            .map(|(_, value)| value.into_owned())
    }

    fn reflect_token(&mut self, token: &SessionToken) {
        self.minted = Some(token.clone());
    }
}

/// Rebuild `path?query` with the session parameter set to `token`, keeping every
/// other query pair in order.
pub(crate) fn location_with_token(
    path: &str,
    query: Option<&str>,
    token: &SessionToken,
) -> String {
    let param = SESSION_QUERY_PARAM.as_str();
    let mut serializer = url::form_urlencoded::Serializer::new(String::new());
    if let Some(query) = query {
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            if key != param {
                serializer.append_pair(&key, &value);
            }
        }
    }
    serializer.append_pair(param, token.as_str());
    format!("{path}?{}", serializer.finish())
}
