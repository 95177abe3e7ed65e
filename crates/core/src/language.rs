//! Language lookup for `language` parameters.

use serde::Serialize;

/// A resolved language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Language {
    /// Preferred code: the ISO 639-1 code if one exists, else ISO 639-3.
    pub code: String,
    /// ISO 639-1 (two-letter) code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iso6391: Option<String>,
    /// ISO 639-3 (three-letter) code.
    pub iso6393: String,
    /// English name.
    pub name: String,
}

/// Resolves user-supplied language identifiers.
pub trait LanguageLookup: Send + Sync {
    /// Resolve a code or name; `None` if unknown.
    fn resolve_language(&self, code: &str) -> Option<Language>;
}

/// Built-in table of ISO 639 languages.
///
/// Covers the living languages common machine-translation services offer,
/// not all of ISO 639. Matches two-letter codes, three-letter codes, and
/// English names, case-insensitively. Anything else needs its own
/// [`LanguageLookup`].
#[derive(Debug, Clone, Copy, Default)]
pub struct IsoLanguages;

// (iso639-1, iso639-3, English name)
const LANGUAGES: &[(&str, &str, &str)] = &[
    ("af", "afr", "Afrikaans"),
    ("ak", "aka", "Akan"),
    ("am", "amh", "Amharic"),
    ("ar", "ara", "Arabic"),
    ("as", "asm", "Assamese"),
    ("az", "aze", "Azerbaijani"),
    ("ba", "bak", "Bashkir"),
    ("be", "bel", "Belarusian"),
    ("bg", "bul", "Bulgarian"),
    ("bn", "ben", "Bengali"),
    ("bo", "bod", "Tibetan"),
    ("bs", "bos", "Bosnian"),
    ("ca", "cat", "Catalan"),
    ("co", "cos", "Corsican"),
    ("cs", "ces", "Czech"),
    ("cv", "chv", "Chuvash"),
    ("cy", "cym", "Welsh"),
    ("da", "dan", "Danish"),
    ("de", "deu", "German"),
    ("dv", "div", "Dhivehi"),
    ("ee", "ewe", "Ewe"),
    ("el", "ell", "Greek"),
    ("en", "eng", "English"),
    ("eo", "epo", "Esperanto"),
    ("es", "spa", "Spanish"),
    ("et", "est", "Estonian"),
    ("eu", "eus", "Basque"),
    ("fa", "fas", "Persian"),
    ("fi", "fin", "Finnish"),
    ("fo", "fao", "Faroese"),
    ("fr", "fra", "French"),
    ("fy", "fry", "Western Frisian"),
    ("ga", "gle", "Irish"),
    ("gd", "gla", "Scottish Gaelic"),
    ("gl", "glg", "Galician"),
    ("gn", "grn", "Guarani"),
    ("gu", "guj", "Gujarati"),
    ("ha", "hau", "Hausa"),
    ("he", "heb", "Hebrew"),
    ("hi", "hin", "Hindi"),
    ("hr", "hrv", "Croatian"),
    ("ht", "hat", "Haitian"),
    ("hu", "hun", "Hungarian"),
    ("hy", "hye", "Armenian"),
    ("id", "ind", "Indonesian"),
    ("ig", "ibo", "Igbo"),
    ("is", "isl", "Icelandic"),
    ("it", "ita", "Italian"),
    ("iu", "iku", "Inuktitut"),
    ("ja", "jpn", "Japanese"),
    ("jv", "jav", "Javanese"),
    ("ka", "kat", "Georgian"),
    ("kk", "kaz", "Kazakh"),
    ("km", "khm", "Khmer"),
    ("kn", "kan", "Kannada"),
    ("ko", "kor", "Korean"),
    ("ku", "kur", "Kurdish"),
    ("ky", "kir", "Kyrgyz"),
    ("la", "lat", "Latin"),
    ("lb", "ltz", "Luxembourgish"),
    ("lg", "lug", "Ganda"),
    ("ln", "lin", "Lingala"),
    ("lo", "lao", "Lao"),
    ("lt", "lit", "Lithuanian"),
    ("lv", "lav", "Latvian"),
    ("mg", "mlg", "Malagasy"),
    ("mi", "mri", "Maori"),
    ("mk", "mkd", "Macedonian"),
    ("ml", "mal", "Malayalam"),
    ("mn", "mon", "Mongolian"),
    ("mr", "mar", "Marathi"),
    ("ms", "msa", "Malay"),
    ("mt", "mlt", "Maltese"),
    ("my", "mya", "Burmese"),
    ("nb", "nob", "Norwegian Bokmal"),
    ("ne", "nep", "Nepali"),
    ("nl", "nld", "Dutch"),
    ("nn", "nno", "Norwegian Nynorsk"),
    ("no", "nor", "Norwegian"),
    ("ny", "nya", "Chichewa"),
    ("om", "orm", "Oromo"),
    ("or", "ori", "Odia"),
    ("pa", "pan", "Punjabi"),
    ("pl", "pol", "Polish"),
    ("ps", "pus", "Pashto"),
    ("pt", "por", "Portuguese"),
    ("qu", "que", "Quechua"),
    ("ro", "ron", "Romanian"),
    ("ru", "rus", "Russian"),
    ("rw", "kin", "Kinyarwanda"),
    ("sa", "san", "Sanskrit"),
    ("sd", "snd", "Sindhi"),
    ("si", "sin", "Sinhala"),
    ("sk", "slk", "Slovak"),
    ("sl", "slv", "Slovenian"),
    ("sm", "smo", "Samoan"),
    ("sn", "sna", "Shona"),
    ("so", "som", "Somali"),
    ("sq", "sqi", "Albanian"),
    ("sr", "srp", "Serbian"),
    ("st", "sot", "Southern Sotho"),
    ("su", "sun", "Sundanese"),
    ("sv", "swe", "Swedish"),
    ("sw", "swa", "Swahili"),
    ("ta", "tam", "Tamil"),
    ("te", "tel", "Telugu"),
    ("tg", "tgk", "Tajik"),
    ("th", "tha", "Thai"),
    ("ti", "tir", "Tigrinya"),
    ("tk", "tuk", "Turkmen"),
    ("tl", "tgl", "Tagalog"),
    ("tr", "tur", "Turkish"),
    ("ts", "tso", "Tsonga"),
    ("tt", "tat", "Tatar"),
    ("ug", "uig", "Uyghur"),
    ("uk", "ukr", "Ukrainian"),
    ("ur", "urd", "Urdu"),
    ("uz", "uzb", "Uzbek"),
    ("vi", "vie", "Vietnamese"),
    ("xh", "xho", "Xhosa"),
    ("yi", "yid", "Yiddish"),
    ("yo", "yor", "Yoruba"),
    ("zh", "zho", "Chinese"),
    ("zu", "zul", "Zulu"),
    ("", "haw", "Hawaiian"),
    ("", "ceb", "Cebuano"),
    ("", "hmn", "Hmong"),
    ("", "fil", "Filipino"),
    ("", "yue", "Cantonese"),
    ("", "bho", "Bhojpuri"),
    ("", "doi", "Dogri"),
    ("", "ilo", "Ilocano"),
    ("", "kok", "Konkani"),
    ("", "kri", "Krio"),
    ("", "lus", "Mizo"),
    ("", "mai", "Maithili"),
    ("", "mni", "Meitei"),
    ("", "nso", "Northern Sotho"),
];

impl LanguageLookup for IsoLanguages {
    fn resolve_language(&self, code: &str) -> Option<Language> {
        let needle = code.trim();
        if needle.is_empty() {
            return None;
        }
        LANGUAGES
            .iter()
            .find(|(one, three, name)| {
                (!one.is_empty() && one.eq_ignore_ascii_case(needle))
                    || three.eq_ignore_ascii_case(needle)
                    || name.eq_ignore_ascii_case(needle)
            })
            .map(|&(one, three, name)| Language {
                code: if one.is_empty() { three } else { one }.to_owned(),
                iso6391: (!one.is_empty()).then(|| one.to_owned()),
                iso6393: three.to_owned(),
                name: name.to_owned(),
            })
    }
}
