//! Languages understood by the engine, as `-l` codes.

use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

macro_rules! languages {
    ($($variant:ident => $code:literal,)+) => {
        /// Closed set of supported traineddata codes.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Lang {
            $($variant,)+
        }

        impl Lang {
            pub const ALL: &'static [Lang] = &[$(Lang::$variant,)+];

            pub fn code(self) -> &'static str {
                match self {
                    $(Lang::$variant => $code,)+
                }
            }

            pub fn from_code(code: &str) -> Option<Lang> {
                match code {
                    $($code => Some(Lang::$variant),)+
                    _ => None,
                }
            }
        }
    };
}

languages! {
    Afrikaans => "afr",
    Amharic => "amh",
    Arabic => "ara",
    Assamese => "asm",
    Azerbaijani => "aze",
    AzerbaijaniCyrillic => "aze_cyrl",
    Belarusian => "bel",
    Bengali => "ben",
    Tibetan => "bod",
    Bosnian => "bos",
    Bulgarian => "bul",
    CatalanValencian => "cat",
    Cebuano => "ceb",
    Czech => "ces",
    ChineseSimplified => "chi_sim",
    ChineseTraditional => "chi_tra",
    Cherokee => "chr",
    Welsh => "cym",
    Danish => "dan",
    German => "deu",
    Dzongkha => "dzo",
    GreekModern => "ell",
    English => "eng",
    EnglishMiddle => "enm",
    Esperanto => "epo",
    Estonian => "est",
    Basque => "eus",
    Persian => "fas",
    Finnish => "fin",
    French => "fra",
    Frankish => "frk",
    FrenchMiddle => "frm",
    Irish => "gle",
    Galician => "glg",
    GreekAncient => "grc",
    Gujarati => "guj",
    Haitian => "hat",
    Hebrew => "heb",
    Hindi => "hin",
    Croatian => "hrv",
    Hungarian => "hun",
    Inuktitut => "iku",
    Indonesian => "ind",
    Icelandic => "isl",
    Italian => "ita",
    ItalianOld => "ita_old",
    Javanese => "jav",
    Japanese => "jpn",
    Kannada => "kan",
    Georgian => "kat",
    GeorgianOld => "kat_old",
    Kazakh => "kaz",
    CentralKhmer => "khm",
    Kirghiz => "kir",
    Korean => "kor",
    Kurdish => "kur",
    Lao => "lao",
    Latin => "lat",
    Latvian => "lav",
    Lithuanian => "lit",
    Malayalam => "mal",
    Marathi => "mar",
    Macedonian => "mkd",
    Maltese => "mlt",
    Malay => "msa",
    Burmese => "mya",
    Nepali => "nep",
    Dutch => "nld",
    Norwegian => "nor",
    Oriya => "ori",
    Panjabi => "pan",
    Polish => "pol",
    Portuguese => "por",
    Pushto => "pus",
    Romanian => "ron",
    Russian => "rus",
    Sanskrit => "san",
    Sinhala => "sin",
    Slovak => "slk",
    Slovenian => "slv",
    Spanish => "spa",
    SpanishOld => "spa_old",
    Albanian => "sqi",
    Serbian => "srp",
    SerbianLatin => "srp_latn",
    Swahili => "swa",
    Swedish => "swe",
    Syriac => "syr",
    Tamil => "tam",
    Telugu => "tel",
    Tajik => "tgk",
    Tagalog => "tgl",
    Thai => "tha",
    Tigrinya => "tir",
    Turkish => "tur",
    Uighur => "uig",
    Ukrainian => "ukr",
    Urdu => "urd",
    Uzbek => "uzb",
    UzbekCyrillic => "uzb_cyrl",
    Vietnamese => "vie",
    Yiddish => "yid",
}

// Alternate names for the same traineddata.
impl Lang {
    pub const HAITIAN_CREOLE: Lang = Lang::Haitian;
    pub const KYRGYZ: Lang = Lang::Kirghiz;
    pub const FLEMISH: Lang = Lang::Dutch;
    pub const PUNJABI: Lang = Lang::Panjabi;
    pub const PASHTO: Lang = Lang::Pushto;
    pub const MOLDAVIAN: Lang = Lang::Romanian;
    pub const MOLDOVAN: Lang = Lang::Romanian;
    pub const SINHALESE: Lang = Lang::Sinhala;
    pub const CASTILIAN: Lang = Lang::Spanish;
    pub const CASTILIAN_OLD: Lang = Lang::SpanishOld;
    pub const UYGHUR: Lang = Lang::Uighur;
}

impl Lang {
    pub fn contains(code: &str) -> bool {
        Lang::from_code(code).is_some()
    }

    /// Validates every token and joins the codes with `+`.
    ///
    /// Any unsupported token fails the whole join; no partial list is returned.
    pub fn join<T>(tokens: &[T]) -> Result<String>
    where
        T: Clone + Into<LangToken>,
    {
        let mut codes = Vec::with_capacity(tokens.len());
        for token in tokens {
            let lang = token.clone().into().resolve()?;
            codes.push(lang.code());
        }
        Ok(codes.join("+"))
    }
}

impl fmt::Display for Lang {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Lang {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let code = s.trim();
        Lang::from_code(code).ok_or_else(|| Error::UnsupportedLanguage(code.to_string()))
    }
}

/// A language given either as a plain code (`"eng"`) or as a [`Lang`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LangToken {
    Code(String),
    Lang(Lang),
}

impl LangToken {
    pub fn resolve(&self) -> Result<Lang> {
        match self {
            LangToken::Lang(lang) => Ok(*lang),
            LangToken::Code(code) => code.parse(),
        }
    }
}

impl From<Lang> for LangToken {
    fn from(lang: Lang) -> Self {
        LangToken::Lang(lang)
    }
}

impl From<&str> for LangToken {
    fn from(code: &str) -> Self {
        LangToken::Code(code.to_string())
    }
}

impl From<String> for LangToken {
    fn from(code: String) -> Self {
        LangToken::Code(code)
    }
}
