//! Rule-based Korean grammatical suffix stripping.
//!
//! A deliberately small stemmer: strip one particle (조사) and then one verb
//! ending (어미) from tokens composed entirely of Hangul syllables. Lists are
//! ordered longest-first so 으로부터 wins over 부터; each list is applied at
//! most once and never strips a token down to nothing.

use crate::is_hangul_token;

/// Particle suffixes (조사), longest-match priority order.
const PARTICLE_SUFFIXES: &[&str] = &[
    "에게서", "에게만", "에게로", "에서만", "으로부터", "으로서", "으로써",
    "에게도", "에서도", "에게", "에서", "으로", "로부터", "까지",
    "부터도", "부터는", "부터의", "부터",
    "으로는", "으로도", "로는", "로도",
    "이랑", "라도", "마저", "조차", "만큼", "보다", "처럼",
    "한테서", "한테도", "한테", "께서",
    "들은", "들",
    "는", "은", "이", "가", "을", "를", "와", "과",
    "도", "만", "랑", "하고",
];

/// Verb-ending suffixes (어미), longest-match priority order.
const VERB_SUFFIXES: &[&str] = &[
    "하는지", "하면서", "하지만", "하려고", "하려는", "하려면", "하는",
    "해줘요", "해서요", "해서는", "해줘", "해서",
    "했어요", "했는데", "했더니", "했다",
    "되나요", "되었어요", "되는데", "되는지", "되는", "되게",
    "해요", "해라", "하라",
    "되니", "되냐", "되나", "되면", "되네", "된다",
];

fn strip_one<'a>(token: &'a str, suffixes: &[&str]) -> &'a str {
    for suffix in suffixes {
        if let Some(base) = token.strip_suffix(suffix) {
            // Keep at least one syllable of stem.
            if !base.is_empty() {
                return base;
            }
        }
    }
    token
}

/// Strip at most one particle and then one verb ending from an all-Hangul
/// token. Tokens with any non-Hangul character pass through unchanged.
pub fn strip_korean_suffix(token: &str) -> &str {
    if !is_hangul_token(token) {
        return token;
    }
    let base = strip_one(token, PARTICLE_SUFFIXES);
    strip_one(base, VERB_SUFFIXES)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_common_particles() {
        assert_eq!(strip_korean_suffix("선물은"), "선물");
        assert_eq!(strip_korean_suffix("동생에게"), "동생");
        assert_eq!(strip_korean_suffix("엄마한테"), "엄마");
        assert_eq!(strip_korean_suffix("텀블러를"), "텀블러");
    }

    #[test]
    fn longest_suffix_wins() {
        // 으로부터 must strip whole, not leave 으로부 + 터.
        assert_eq!(strip_korean_suffix("회사으로부터"), "회사");
        assert_eq!(strip_korean_suffix("지금부터는"), "지금");
    }

    #[test]
    fn strips_verb_endings() {
        assert_eq!(strip_korean_suffix("배송되나요"), "배송");
        assert_eq!(strip_korean_suffix("친구들은"), "친구");
    }

    #[test]
    fn never_strips_to_empty() {
        // 는 alone matches the 는 particle but has no stem left.
        assert_eq!(strip_korean_suffix("는"), "는");
        assert_eq!(strip_korean_suffix("도"), "도");
    }

    #[test]
    fn non_hangul_tokens_untouched() {
        assert_eq!(strip_korean_suffix("airpods"), "airpods");
        assert_eq!(strip_korean_suffix("bt5도"), "bt5도");
    }
}
