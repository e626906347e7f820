//! Name transforms between table names, class names and registry aliases

use convert_case::{Case, Casing};
use once_cell::sync::Lazy;
use regex::Regex;

/// Words that read the same in singular and plural
static UNINFLECTED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^(.*[nrlm]ese|.*data|.*deer|.*fish|.*measles|.*meta|.*ois|.*pox|.*sheep|.*media|feedback|stadia|chassis|clippers|debris|diabetes|equipment|gallows|headquarters|information|innings|news|nexus|proceedings|research|series|species|weather)$",
    )
    .expect("uninflected pattern is valid")
});

const IRREGULAR: &[(&str, &str)] = &[
    ("atlases", "atlas"),
    ("beefs", "beef"),
    ("brothers", "brother"),
    ("children", "child"),
    ("corpuses", "corpus"),
    ("cows", "cow"),
    ("ganglions", "ganglion"),
    ("genies", "genie"),
    ("genera", "genus"),
    ("graffiti", "graffito"),
    ("hooves", "hoof"),
    ("loaves", "loaf"),
    ("men", "man"),
    ("monies", "money"),
    ("mongooses", "mongoose"),
    ("moves", "move"),
    ("mythoi", "mythos"),
    ("niches", "niche"),
    ("numina", "numen"),
    ("occiputs", "occiput"),
    ("octopuses", "octopus"),
    ("opuses", "opus"),
    ("oxen", "ox"),
    ("penises", "penis"),
    ("people", "person"),
    ("sexes", "sex"),
    ("soliloquies", "soliloquy"),
    ("testes", "testis"),
    ("trilbys", "trilby"),
    ("turves", "turf"),
    ("waves", "wave"),
    ("curves", "curve"),
];

/// Ordered singularization rules; the first match wins
static SINGULAR_RULES: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        (r"(?i)(s)tatuses$", "${1}tatus"),
        (r"(?i)^(.*)(menu)s$", "${1}${2}"),
        (r"(?i)(quiz)zes$", "${1}"),
        (r"(?i)(matr)ices$", "${1}ix"),
        (r"(?i)(vert|ind)ices$", "${1}ex"),
        (r"(?i)^(ox)en", "${1}"),
        (r"(?i)(alias)(es)*$", "${1}"),
        (
            r"(?i)(alumn|bacill|cact|foc|fung|nucle|radi|stimul|syllab|termin|viri?)i$",
            "${1}us",
        ),
        (r"(?i)([ftw]ax)es", "${1}"),
        (r"(?i)(cris|ax|test)es$", "${1}is"),
        (r"(?i)(shoe)s$", "${1}"),
        (r"(?i)(o)es$", "${1}"),
        (r"ouses$", "ouse"),
        (r"([^a])uses$", "${1}us"),
        (r"(?i)([ml])ice$", "${1}ouse"),
        (r"(?i)(x|ch|ss|sh)es$", "${1}"),
        (r"(?i)(m)ovies$", "${1}ovie"),
        (r"(?i)([^aeiouy]|qu)ies$", "${1}y"),
        (r"(?i)(tive)s$", "${1}"),
        (r"(?i)(hive)s$", "${1}"),
        (r"(?i)(drive)s$", "${1}"),
        (r"(?i)([le])ves$", "${1}f"),
        (r"(?i)([^rfoa])ves$", "${1}fe"),
        (r"(?i)(^analy)ses$", "${1}sis"),
        (
            r"(?i)(analy|diagno|^ba|parenthe|progno|synop|the)ses$",
            "${1}sis",
        ),
        (r"(?i)([ti])a$", "${1}um"),
        (r"(?i)eaus$", "eau"),
        (r"^(.*us)$", "${1}"),
        (r"(?i)s$", ""),
    ]
    .into_iter()
    .map(|(pattern, replacement)| {
        (
            Regex::new(pattern).expect("singular rule pattern is valid"),
            replacement,
        )
    })
    .collect()
});

/// Singular form of the last word of an underscored name
///
/// `term_relationships` → `term_relationship`, `categories` → `category`.
pub fn singularize(word: &str) -> String {
    let (head, last) = match word.rsplit_once('_') {
        Some((head, last)) => (Some(head), last),
        None => (None, word),
    };

    let singular = singularize_word(last);
    match head {
        Some(head) => format!("{}_{}", head, singular),
        None => singular,
    }
}

fn singularize_word(word: &str) -> String {
    if word.is_empty() {
        return String::new();
    }

    let lower = word.to_lowercase();
    if let Some((_, singular)) = IRREGULAR.iter().find(|(plural, _)| *plural == lower) {
        return keep_leading_case(word, singular);
    }

    if UNINFLECTED.is_match(word) {
        return word.to_string();
    }

    for (rule, replacement) in SINGULAR_RULES.iter() {
        if rule.is_match(word) {
            return rule.replace(word, *replacement).into_owned();
        }
    }
    word.to_string()
}

fn keep_leading_case(original: &str, replacement: &str) -> String {
    let mut chars = replacement.chars();
    match (original.chars().next(), chars.next()) {
        (Some(first), Some(rest_first)) if first.is_uppercase() => {
            rest_first.to_uppercase().chain(chars).collect()
        }
        _ => replacement.to_string(),
    }
}

/// `PostMeta` → `post_meta`
pub fn underscore(name: &str) -> String {
    name.to_case(Case::Snake)
}

/// `term_taxonomy` → `TermTaxonomy`
pub fn camelize(name: &str) -> String {
    name.to_case(Case::Pascal)
}

/// Singular class name for a table name: `wp_posts` → `WpPost`, `posts` → `Post`
pub fn classify(table_name: &str) -> String {
    camelize(&singularize(&underscore(table_name)))
}

/// Split a registry alias into plugin and local name: `Plugin.Posts` → (`Plugin`, `Posts`)
pub fn plugin_split(alias: &str) -> (Option<&str>, &str) {
    match alias.split_once('.') {
        Some((plugin, name)) => (Some(plugin), name),
        None => (None, alias),
    }
}
