/// Checked in POSIX precedence order
const LOCALE_VARS: [&str; 3] = ["LC_ALL", "LC_MESSAGES", "LANG"];

/// Current locale from the process environment, as a language tag.
pub fn language_from_env() -> Option<String> {
    LOCALE_VARS
        .iter()
        .find_map(|var| std::env::var(var).ok().and_then(|v| normalize_locale(&v)))
}

/// `en_US.UTF-8@euro` -> `en-US`. The `C` and `POSIX` locales carry no language.
pub fn normalize_locale(raw: &str) -> Option<String> {
    let base = raw.split(['.', '@']).next().unwrap_or_default().trim();
    if base.is_empty() || base.eq_ignore_ascii_case("c") || base.eq_ignore_ascii_case("posix") {
        return None;
    }
    Some(base.replace('_', "-"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_codeset_and_modifier() {
        assert_eq!(normalize_locale("en_US.UTF-8").as_deref(), Some("en-US"));
        assert_eq!(normalize_locale("de_DE@euro").as_deref(), Some("de-DE"));
        assert_eq!(normalize_locale("fr").as_deref(), Some("fr"));
    }

    #[test]
    fn posix_locales_have_no_language() {
        assert_eq!(normalize_locale("C"), None);
        assert_eq!(normalize_locale("C.UTF-8"), None);
        assert_eq!(normalize_locale("POSIX"), None);
        assert_eq!(normalize_locale(""), None);
    }

    #[test]
    fn lc_all_wins_over_lang() {
        temp_env::with_vars(
            [
                ("LC_ALL", Some("pt_BR.UTF-8")),
                ("LC_MESSAGES", None),
                ("LANG", Some("en_US.UTF-8")),
            ],
            || assert_eq!(language_from_env().as_deref(), Some("pt-BR")),
        );
    }

    #[test]
    fn empty_or_posix_values_fall_through() {
        temp_env::with_vars(
            [
                ("LC_ALL", Some("")),
                ("LC_MESSAGES", Some("C")),
                ("LANG", Some("ja_JP.UTF-8")),
            ],
            || assert_eq!(language_from_env().as_deref(), Some("ja-JP")),
        );
    }

    #[test]
    fn nothing_set_means_no_language() {
        temp_env::with_vars_unset(LOCALE_VARS, || assert_eq!(language_from_env(), None));
    }
}
