use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum Language {
    #[default]
    Ko,
    En,
}

impl Language {
    pub fn all() -> [Language; 2] {
        [Language::Ko, Language::En]
    }

    pub fn toggled(self) -> Language {
        match self {
            Language::Ko => Language::En,
            Language::En => Language::Ko,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Language::Ko => "KO",
            Language::En => "EN",
        }
    }

    pub fn from_code(code: &str) -> Option<Language> {
        match code.trim().to_ascii_uppercase().as_str() {
            "KO" => Some(Language::Ko),
            "EN" => Some(Language::En),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextKey {
    Title,
    Subtitle,
    SelectMode,
    Start,
    Best,
    Time,
    Complete,
    Retry,
    Home,
    Evaluating,
    GlobalRank,
    NoRecords,
    ShareMessage,
    EnterName,
    SaveName,
    Welcome,
    PersonalBestUpdated,
    GlobalTop,
    CopySuccess,
    ShareFailed,
}

pub fn t(language: Language, key: TextKey) -> &'static str {
    match language {
        Language::Ko => match key {
            TextKey::Title => "ZENNUM",
            TextKey::Subtitle => "TAP THE NUMBERS FAST!",
            TextKey::SelectMode => "모드 선택",
            TextKey::Start => "챌린지 시작",
            TextKey::Best => "BEST",
            TextKey::Time => "TIME",
            TextKey::Complete => "CHALLENGE COMPLETE",
            TextKey::Retry => "다시 도전",
            TextKey::Home => "홈으로",
            TextKey::Evaluating => "분석 중...",
            TextKey::GlobalRank => "글로벌 순위",
            TextKey::NoRecords => "기록 없음",
            TextKey::ShareMessage => "한계를 돌파했습니다! 기록: {time}초. 도전하시겠습니까?",
            TextKey::EnterName => "이름을 입력하세요",
            TextKey::SaveName => "접속하기",
            TextKey::Welcome => "WELCOME MASTER",
            TextKey::PersonalBestUpdated => "개인 최고 기록 갱신!",
            TextKey::GlobalTop => "GLOBAL TOP 1000",
            TextKey::CopySuccess => "링크가 복사되었습니다!",
            TextKey::ShareFailed => "공유 중 오류가 발생했습니다.",
        },
        Language::En => match key {
            TextKey::Title => "ZENNUM",
            TextKey::Subtitle => "TAP THE NUMBERS FAST!",
            TextKey::SelectMode => "SELECT MODE",
            TextKey::Start => "START CHALLENGE",
            TextKey::Best => "BEST",
            TextKey::Time => "TIME",
            TextKey::Complete => "CHALLENGE COMPLETE",
            TextKey::Retry => "RETRY",
            TextKey::Home => "HOME",
            TextKey::Evaluating => "EVALUATING...",
            TextKey::GlobalRank => "GLOBAL RANK",
            TextKey::NoRecords => "NO RECORDS",
            TextKey::ShareMessage => "Limit broken! Record: {time}s. Can you beat me?",
            TextKey::EnterName => "ENTER PLAYER NAME",
            TextKey::SaveName => "ENTER",
            TextKey::Welcome => "WELCOME MASTER",
            TextKey::PersonalBestUpdated => "NEW PERSONAL BEST!",
            TextKey::GlobalTop => "GLOBAL TOP 1000",
            TextKey::CopySuccess => "LINK COPIED!",
            TextKey::ShareFailed => "SHARING ERROR",
        },
    }
}
