//! English pluralization of identifiers.
//!
//! Only the last word of a CamelCase identifier is inflected, so
//! `DBInstances` singularizes to `DBInstance` and `DhcpOption` pluralizes to
//! `DhcpOptions`.

/// Words with no distinct plural form.
const UNCOUNTABLE: &[&str] = &[
    "data",
    "equipment",
    "information",
    "metadata",
    "news",
    "series",
    "species",
];

/// Singular and plural forms that do not follow the suffix rules.
const IRREGULAR: &[(&str, &str)] = &[
    ("alias", "aliases"),
    ("analysis", "analyses"),
    ("bus", "buses"),
    ("canvas", "canvases"),
    ("child", "children"),
    ("person", "people"),
    ("quota", "quotas"),
    ("status", "statuses"),
];

/// Whether the last word of `identifier` is plural.
#[must_use]
pub fn is_plural(identifier: &str) -> bool {
    let (_, last) = split_last_word(identifier);
    let word = last.to_lowercase();
    if word.is_empty() || UNCOUNTABLE.contains(&word.as_str()) {
        return false;
    }
    if IRREGULAR.iter().any(|(_, plural)| *plural == word) {
        return true;
    }
    if IRREGULAR.iter().any(|(singular, _)| *singular == word) {
        return false;
    }
    ends_with_plural_s(&word)
}

/// Singular form of `identifier`, unchanged when already singular.
#[must_use]
pub fn singularize(identifier: &str) -> String {
    inflect_last_word(identifier, |word| {
        if UNCOUNTABLE.contains(&word) {
            return word.to_owned();
        }
        if let Some((singular, _)) = IRREGULAR.iter().find(|(_, plural)| *plural == word) {
            return (*singular).to_owned();
        }
        if IRREGULAR.iter().any(|(singular, _)| *singular == word) || !ends_with_plural_s(word) {
            return word.to_owned();
        }
        if let Some(stem) = word.strip_suffix("ies").filter(|stem| !stem.is_empty()) {
            return format!("{stem}y");
        }
        for suffix in ["sses", "xes", "zzes", "ches", "shes"] {
            if word.ends_with(suffix) {
                return word[..word.len() - 2].to_owned();
            }
        }
        word[..word.len() - 1].to_owned()
    })
}

/// Plural form of `identifier`, unchanged when already plural.
#[must_use]
pub fn pluralize(identifier: &str) -> String {
    if is_plural(identifier) {
        return identifier.to_owned();
    }
    inflect_last_word(identifier, |word| {
        if UNCOUNTABLE.contains(&word) {
            return word.to_owned();
        }
        if let Some((_, plural)) = IRREGULAR.iter().find(|(singular, _)| *singular == word) {
            return (*plural).to_owned();
        }
        if let Some(stem) = word.strip_suffix('y') {
            if stem.chars().last().is_some_and(|c| !"aeiou".contains(c)) {
                return format!("{stem}ies");
            }
        }
        if ["s", "x", "z", "ch", "sh"]
            .iter()
            .any(|suffix| word.ends_with(suffix))
        {
            return format!("{word}es");
        }
        format!("{word}s")
    })
}

fn ends_with_plural_s(word: &str) -> bool {
    word.len() > 1
        && word.ends_with('s')
        && !word.ends_with("ss")
        && !word.ends_with("us")
        && !word.ends_with("is")
}

/// Split at the start of the last capitalized word.
fn split_last_word(identifier: &str) -> (&str, &str) {
    let start = identifier
        .char_indices()
        .rev()
        .find(|(_, c)| c.is_uppercase())
        .map_or(0, |(index, _)| index);
    identifier.split_at(start)
}

fn inflect_last_word(identifier: &str, inflect: impl Fn(&str) -> String) -> String {
    let (head, last) = split_last_word(identifier);
    if last.is_empty() {
        return identifier.to_owned();
    }
    let inflected = inflect(&last.to_lowercase());
    let capitalized = last.chars().next().is_some_and(char::is_uppercase);
    let all_caps = last.len() > 1 && last.chars().all(|c| !c.is_lowercase());
    let mut out = String::with_capacity(head.len() + inflected.len());
    out.push_str(head);
    if all_caps {
        out.push_str(&inflected.to_uppercase());
    } else if capitalized {
        let mut chars = inflected.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(chars.as_str());
        }
    } else {
        out.push_str(&inflected);
    }
    out
}
