use std::sync::LazyLock;

use regex::Regex;

use crate::domain::SLUG_MAX_LENGTH;

static SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[-\s]+").expect("separator regex must be valid"));

fn transliterate(letter: char) -> Option<&'static str> {
    let latin = match letter {
        'а' => "a",
        'б' => "b",
        'в' => "v",
        'г' => "g",
        'д' => "d",
        'е' => "e",
        'ё' => "yo",
        'ж' => "zh",
        'з' => "z",
        'и' => "i",
        'й' => "j",
        'к' => "k",
        'л' => "l",
        'м' => "m",
        'н' => "n",
        'о' => "o",
        'п' => "p",
        'р' => "r",
        'с' => "s",
        'т' => "t",
        'у' => "u",
        'ф' => "f",
        'х' => "h",
        'ц' => "ts",
        'ч' => "ch",
        'ш' => "sh",
        'щ' => "sch",
        'ъ' | 'ь' => "",
        'ы' => "y",
        'э' => "e",
        'ю' => "yu",
        'я' => "ya",
        'є' => "ye",
        'і' => "i",
        'ї' => "yi",
        'ґ' => "g",
        _ => return None,
    };
    Some(latin)
}

/// Turns a title into a URL-safe identifier, Cyrillic letters are transliterated.
///
/// `slugify("Заголовок") == "zagolovok"`. Separators at the edges are kept as
/// a hyphen, the way pytils does it. The result may be empty when the title
/// has nothing worth keeping.
pub fn slugify(title: &str) -> String {
    let lowered = title.to_lowercase().replace('&', " and ");
    let hyphenated = SEPARATORS.replace_all(&lowered, "-");

    let mut slug = String::with_capacity(hyphenated.len());
    for symbol in hyphenated.chars() {
        if let Some(latin) = transliterate(symbol) {
            slug.push_str(latin);
        } else if symbol.is_ascii_alphanumeric() || symbol == '-' || symbol == '_' {
            slug.push(symbol);
        }
    }

    slug
}

/// Slug for a note submitted without one
pub fn slug_from_title(title: &str) -> String {
    slugify(title).chars().take(SLUG_MAX_LENGTH).collect()
}
