use crate::error::DispatchError;
use smallvec::SmallVec;

/// Maximum number of path tokens before heap allocation.
/// Chains rarely go deeper than a namespace of three or four segments plus two
/// resources with an argument each.
pub const MAX_INLINE_TOKENS: usize = 12;

/// Ordered path tokens, borrowed from the request path.
pub type TokenVec<'a> = SmallVec<[&'a str; MAX_INLINE_TOKENS]>;

/// Strip `context_prefix` from `path` and split the rest on `/`.
///
/// The prefix is removed only when it is a literal leading substring of the path.
/// Empty segments are discarded, so `//a///b/` yields `["a", "b"]`.
///
/// # Errors
///
/// [`DispatchError::InvalidPath`] when no token remains.
pub fn tokenize<'a>(path: &'a str, context_prefix: &str) -> Result<TokenVec<'a>, DispatchError> {
    let rest = path.strip_prefix(context_prefix).unwrap_or(path);
    let tokens: TokenVec<'a> = rest.split('/').filter(|s| !s.is_empty()).collect();
    if tokens.is_empty() {
        return Err(DispatchError::InvalidPath {
            path: path.to_string(),
        });
    }
    Ok(tokens)
}

/// Turn a path token into a type-name candidate under `namespace`.
///
/// Only the first character is upper-cased; everything else is kept verbatim.
#[must_use]
pub fn candidate_name(namespace: &str, token: &str) -> String {
    let mut chars = token.chars();
    let Some(first) = chars.next() else {
        return namespace.to_string();
    };
    let mut name = String::with_capacity(namespace.len() + token.len() + 1);
    if !namespace.is_empty() {
        name.push_str(namespace);
        name.push('.');
    }
    name.extend(first.to_uppercase());
    name.push_str(chars.as_str());
    name
}
