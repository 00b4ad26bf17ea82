//! Name resolution: map a user token to exactly one catalog id.

use std::collections::BTreeMap;

use super::id::id_suffix;
use crate::errors::TakeOverError;

/// Resolve `token` against the ids in `entries`.
///
/// An exact id wins. Otherwise the token is compared with the part of every id
/// after its timestamp prefix; one hit is returned, several are an ambiguity error.
pub fn resolve_id<'a, V>(
    entries: &'a BTreeMap<String, V>,
    token: &str,
) -> Result<&'a str, TakeOverError> {
    if let Some((id, _)) = entries.get_key_value(token) {
        return Ok(id.as_str());
    }

    let hits: Vec<&str> = entries
        .keys()
        .filter(|id| id_suffix(id) == Some(token))
        .map(String::as_str)
        .collect();

    match hits.as_slice() {
        [] => Err(TakeOverError::NotFound(token.to_owned())),
        [only] => Ok(*only),
        many => Err(TakeOverError::Ambiguous {
            token: token.to_owned(),
            candidates: many.iter().map(|s| (*s).to_owned()).collect(),
        }),
    }
}
