//! Built-in vocabulary: character folds, stop words, and aliases for the
//! medical-law FAQ domain.

/// Single-character folds applied before lowercasing.
pub const SUBSTITUTIONS: &[(char, char)] = &[('ё', 'е'), ('Ё', 'Е')];

/// Functional words that carry no topical signal.
pub const STOP_WORDS: &[&str] = &[
    // Russian
    "а", "без", "бы", "в", "во", "вот", "вы", "да", "для", "до", "его", "ее", "если", "же", "за",
    "и", "из", "или", "их", "к", "как", "ко", "ли", "мне", "мы", "на", "над", "не", "но", "о",
    "об", "он", "она", "они", "от", "по", "под", "при", "про", "с", "со", "так", "то", "ты",
    "у", "что", "это", "я",
    // English
    "a", "an", "and", "are", "for", "in", "is", "of", "on", "or", "the", "to",
];

/// Misspellings, truncations, and inflections mapped to a canonical phrase.
///
/// Keys and phrases are cleaned with the same rules as queries when the
/// table is built, so they may be written naturally here.
pub const ALIASES: &[(&str, &str)] = &[
    // complaints
    ("жлба", "жалоба"),
    ("жалоб", "жалоба"),
    ("жалобу", "жалоба"),
    ("жалобы", "жалоба"),
    ("жалобой", "жалоба"),
    ("пожаловаться", "жалоба"),
    // confidentiality
    ("тайна", "врачебная тайна"),
    ("тайну", "врачебная тайна"),
    ("тайны", "врачебная тайна"),
    ("тайне", "врачебная тайна"),
    ("врачебную тайну", "врачебная тайна"),
    ("врачебной тайны", "врачебная тайна"),
    ("конфиденциальность", "врачебная тайна"),
    // consent
    ("согласие", "информированное согласие"),
    ("согласия", "информированное согласие"),
    ("идс", "информированное согласие"),
    ("информированного согласия", "информированное согласие"),
    // errors
    ("ошибка", "медицинская ошибка"),
    ("ошибки", "медицинская ошибка"),
    ("ошибку", "медицинская ошибка"),
    ("медошибка", "медицинская ошибка"),
    ("врачебная ошибка", "медицинская ошибка"),
    // incidents
    ("инцедент", "инцидент"),
    ("инциндент", "инцидент"),
    ("инциденты", "инцидент"),
    // liability
    ("отвественность", "ответственность"),
    ("ответсвенность", "ответственность"),
    ("ответственности", "ответственность"),
];
