//! Static vocabulary tables consumed by the giftrec engine.
//!
//! The engine itself computes nothing lexical: stopwords, slot keyword maps,
//! forbidden-category synonym patterns, and hint tables are all supplied as
//! data through [`Lexicon`]. The bundled defaults cover Korean gift queries;
//! a deployment can replace any table by deserializing its own `Lexicon`
//! from JSON.
//!
//! Slot maps are ordered: resolution is first-match-wins over substring
//! containment, so more specific entries must come before generic ones
//! (e.g. 여자친구 before 친구). `Vec<(String, Vec<String>)>` is used instead
//! of a hash map precisely to keep that iteration order stable.

use serde::{Deserialize, Serialize};

/// An ordered keyword map: canonical label → match patterns.
///
/// Iteration order is significant and preserved through serde.
pub type OrderedMap = Vec<(String, Vec<String>)>;

/// Full vocabulary bundle for one deployment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Lexicon {
    /// Tokens dropped during tokenization.
    pub stopwords: Vec<String>,
    /// Occasion slot map (생일, 집들이, ...). Ordered, first match wins.
    pub occasion_map: OrderedMap,
    /// Relation slot map (여사친, 직장동료, ...). Ordered, first match wins.
    pub relation_map: OrderedMap,
    /// Forbidden categories → literal synonym patterns used for exclusion.
    pub forbidden_synonyms: OrderedMap,
    /// Occasion → item-text hints that earn the context bonus.
    pub occasion_hints: OrderedMap,
    /// Relation → item-text hints that earn the context bonus.
    pub relation_hints: OrderedMap,
    /// Category label → item-text hints, used for exploratory explanations.
    pub category_hints: OrderedMap,
    /// Style label → item-text hints, used for exploratory explanations.
    pub style_hints: OrderedMap,
    /// Guard label → "positive attribute" terms (무향, 무알코올, ...) that
    /// satisfy an active forbidden category.
    pub guard_terms: OrderedMap,
    /// Generic budget-unit words stripped from core keywords.
    pub budget_unit_words: Vec<String>,
}

impl Default for Lexicon {
    fn default() -> Self {
        Self::korean_default()
    }
}

/// Look up the first canonical label whose pattern is a substring of `text`.
///
/// Both `text` and the patterns are expected to be already normalized.
pub fn match_slot<'a>(map: &'a [(String, Vec<String>)], text: &str) -> Option<&'a str> {
    for (canonical, patterns) in map {
        if patterns.iter().any(|p| text.contains(p.as_str())) {
            return Some(canonical.as_str());
        }
    }
    None
}

/// All canonical labels whose any pattern is a substring of `text`.
pub fn match_all<'a>(map: &'a [(String, Vec<String>)], text: &str) -> Vec<&'a str> {
    map.iter()
        .filter(|(_, patterns)| patterns.iter().any(|p| text.contains(p.as_str())))
        .map(|(canonical, _)| canonical.as_str())
        .collect()
}

/// Patterns registered for one canonical label, or an empty slice.
pub fn patterns_for<'a>(map: &'a [(String, Vec<String>)], canonical: &str) -> &'a [String] {
    map.iter()
        .find(|(label, _)| label == canonical)
        .map(|(_, patterns)| patterns.as_slice())
        .unwrap_or(&[])
}

fn owned_map(entries: &[(&str, &[&str])]) -> OrderedMap {
    entries
        .iter()
        .map(|(label, patterns)| {
            (
                (*label).to_string(),
                patterns.iter().map(|p| (*p).to_string()).collect(),
            )
        })
        .collect()
}

fn owned_list(entries: &[&str]) -> Vec<String> {
    entries.iter().map(|e| (*e).to_string()).collect()
}

impl Lexicon {
    /// Bundled Korean defaults.
    pub fn korean_default() -> Self {
        Self {
            stopwords: owned_list(&[
                // function words / fillers
                "거", "건", "것", "수", "등", "및", "또", "더", "좀", "그냥", "너무",
                "진짜", "정말", "아주", "완전", "그리고", "그런데", "하지만", "근데",
                "같은", "같이", "느낌", "스타일로", "때", "중", "요", "네", "예",
                // request boilerplate
                "선물", "추천", "부탁", "주세요", "해주세요", "해줘", "싶어", "싶어요",
                "싶은", "좋을까", "좋을까요", "골라줘", "알려줘", "찾아줘", "뭐가",
                "어떤", "있을까", "있나요",
                // english boilerplate
                "the", "a", "an", "of", "for", "to", "and", "or", "with", "gift",
                "please",
            ]),
            occasion_map: owned_map(&[
                ("생일", &["생일", "생신", "벌스데이", "birthday"]),
                ("집들이", &["집들이", "입주", "새집", "이사 선물"]),
                ("기념일", &["기념일", "주년", "100일"]),
                ("졸업", &["졸업", "수료"]),
                ("입학", &["입학", "새학기"]),
                ("승진", &["승진", "진급", "영전"]),
                ("출산", &["출산", "백일", "돌잔치"]),
                ("감사", &["감사", "고마움", "답례", "스승의날"]),
                ("크리스마스", &["크리스마스", "성탄절", "연말"]),
            ]),
            relation_map: owned_map(&[
                ("여사친", &["여사친", "여자사람친구"]),
                ("남사친", &["남사친", "남자사람친구"]),
                ("여자친구", &["여자친구", "여친"]),
                ("남자친구", &["남자친구", "남친"]),
                ("부모님", &["부모님", "어머니", "아버지", "엄마", "아빠"]),
                ("직장동료", &["직장 동료", "회사 동료", "직장동료", "동료", "상사", "팀장"]),
                ("선생님", &["선생님", "스승", "교수님", "담임"]),
                ("친구", &["친구", "베프", "절친"]),
            ]),
            forbidden_synonyms: owned_map(&[
                ("향", &["향수", "향기", "향 강", "향이 강", "진한 향", "프래그런스", "디퓨저", "향초"]),
                ("알코올", &["알코올", "술", "와인", "위스키", "맥주", "소주"]),
                ("카페인", &["카페인", "커피", "에스프레소", "콜드브루"]),
                ("견과", &["견과", "땅콩", "아몬드", "호두", "피스타치오"]),
                ("자극", &["자극적", "매운", "맵기"]),
            ]),
            occasion_hints: owned_map(&[
                ("생일", &["생일", "파티", "케이크", "축하"]),
                ("집들이", &["집들이", "홈", "리빙", "인테리어", "주방"]),
                ("기념일", &["기념일", "커플", "기념"]),
                ("감사", &["감사", "답례", "인사"]),
                ("출산", &["출산", "아기", "베이비"]),
                ("크리스마스", &["크리스마스", "홀리데이", "겨울"]),
            ]),
            relation_hints: owned_map(&[
                ("여사친", &["여성", "여자", "데일리"]),
                ("남사친", &["남성", "남자", "데일리"]),
                ("여자친구", &["여성", "커플", "주얼리"]),
                ("남자친구", &["남성", "커플"]),
                ("부모님", &["부모님", "건강", "효도"]),
                ("직장동료", &["오피스", "데스크", "실용", "사무"]),
                ("선생님", &["감사", "답례"]),
                ("친구", &["데일리", "실용"]),
            ]),
            category_hints: owned_map(&[
                ("전자/웨어러블", &["워치", "스마트워치", "밴드", "이어폰", "무선이어폰", "버즈", "가습기", "무드등"]),
                ("문구/데스크", &["문구", "노트", "다이어리", "펜", "책상정리", "데스크", "타이머"]),
                ("주방/리빙", &["텀블러", "머그", "밀폐용기", "프라이팬", "주방", "수납", "정리함"]),
                ("뷰티/바디", &["핸드크림", "스킨", "로션", "선크림", "클렌저", "무향", "저자극"]),
                ("간식/식품", &["초콜릿", "쿠키", "캔디", "간식", "커피", "티"]),
            ]),
            style_hints: owned_map(&[
                ("미니멀", &["미니멀", "심플", "뉴트럴", "무지", "우드톤", "베이지"]),
                ("레트로", &["레트로", "빈티지", "아날로그"]),
                ("게이밍", &["게이밍", "rgb", "저지연", "게임"]),
                ("힐링", &["힐링", "무드", "아로마", "코지"]),
                ("러블리", &["러블리", "핑크", "하트", "플라워"]),
            ]),
            guard_terms: owned_map(&[
                ("무향", &["무향", "무향료", "향없음"]),
                ("무알코올", &["무알코올", "논알코올", "alcoholfree"]),
                ("무카페인", &["무카페인", "디카페인"]),
                ("저자극", &["저자극", "민감"]),
            ]),
            budget_unit_words: owned_list(&["이상", "이하", "만원", "만", "천", "예산", "budget"]),
        }
    }

    /// Every pattern registered in the occasion and relation maps.
    ///
    /// Used by the slot extractor to drop slot values from core keywords.
    pub fn slot_pattern_tokens(&self) -> impl Iterator<Item = &str> {
        self.occasion_map
            .iter()
            .chain(self.relation_map.iter())
            .flat_map(|(_, patterns)| patterns.iter().map(String::as_str))
    }

    /// Every forbidden synonym pattern across all categories.
    pub fn forbidden_pattern_tokens(&self) -> impl Iterator<Item = &str> {
        self.forbidden_synonyms
            .iter()
            .flat_map(|(_, patterns)| patterns.iter().map(String::as_str))
    }
}
