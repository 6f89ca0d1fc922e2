use tessy::{Error, Lang, LangToken};

#[test]
fn joins_plain_codes() {
    assert_eq!(Lang::join(&["eng", "fra"]).unwrap(), "eng+fra");
}

#[test]
fn joins_symbols_and_mixed_tokens() {
    assert_eq!(Lang::join(&[Lang::English, Lang::German]).unwrap(), "eng+deu");
    let mixed = vec![LangToken::from(Lang::CASTILIAN), LangToken::from(" chi_sim ")];
    assert_eq!(Lang::join(mixed.as_slice()).unwrap(), "spa+chi_sim");
}

#[test]
fn single_language() {
    assert_eq!(Lang::join(&["eng"]).unwrap(), "eng");
    assert_eq!(Lang::join::<&str>(&[]).unwrap(), "");
}

#[test]
fn unsupported_code_fails_whole_join() {
    let err = Lang::join(&["eng", "xyz", "fra"]).unwrap_err();
    assert!(matches!(err, Error::UnsupportedLanguage(ref code) if code == "xyz"));
    assert!(err.to_string().contains("xyz"));
}

#[test]
fn parses_codes() {
    assert_eq!("deu".parse::<Lang>().unwrap(), Lang::German);
    assert!("english".parse::<Lang>().is_err());
    assert!(Lang::contains("srp_latn"));
    assert_eq!(Lang::SerbianLatin.to_string(), "srp_latn");
}
