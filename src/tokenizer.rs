//! Tokenizer (§4.3): turns email body text into a candidate password list
//! for the archive unpackers. Whitespace-split, set-deduplicated, with a
//! second candidate added for any token that opens with an apostrophe (its
//! suffix without the apostrophe) — per §9's resolution of the source's
//! apostrophe handling, not its buggy mutate-while-iterating behavior.

use std::collections::HashSet;

pub fn tokenize(body: &str) -> HashSet<String> {
    let mut passwords = HashSet::new();
    for token in body.split_whitespace() {
        if token.is_empty() {
            continue;
        }
        passwords.insert(token.to_string());
        if let Some(stripped) = token.strip_prefix('\'') {
            if !stripped.is_empty() {
                passwords.insert(stripped.to_string());
            }
        }
    }
    passwords
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dedupes_and_strips_apostrophes() {
        let out = tokenize("infected 'infected infected ''");
        assert!(out.contains("infected"));
        assert!(out.contains("'infected"));
        // stripping the leading apostrophe of "'infected" yields "infected", already present
        assert!(out.contains("'"));
    }

    #[test]
    fn empty_body_yields_empty_set() {
        assert!(tokenize("   \n\t  ").is_empty());
    }
}
