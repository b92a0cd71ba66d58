use log::warn;
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

use crate::helpers::format_seconds;
use crate::model::{t, Language, ResultSummary, TextKey};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShareTarget {
    Download,
    ShareSheet,
    Instagram,
    KakaoTalk,
    Facebook,
    Twitter,
    Clipboard,
}

impl ShareTarget {
    pub fn fallback(self) -> Option<ShareTarget> {
        match self {
            ShareTarget::Instagram | ShareTarget::ShareSheet => Some(ShareTarget::Download),
            ShareTarget::KakaoTalk => Some(ShareTarget::Clipboard),
            _ => None,
        }
    }

    pub fn needs_image(self) -> bool {
        matches!(
            self,
            ShareTarget::Download | ShareTarget::ShareSheet | ShareTarget::Instagram
        )
    }
}

impl fmt::Display for ShareTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ShareTarget::Download => "download",
            ShareTarget::ShareSheet => "share sheet",
            ShareTarget::Instagram => "Instagram",
            ShareTarget::KakaoTalk => "KakaoTalk",
            ShareTarget::Facebook => "Facebook",
            ShareTarget::Twitter => "Twitter",
            ShareTarget::Clipboard => "clipboard",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShareError {
    #[error("{0} is not available here")]
    Unsupported(ShareTarget),
    #[error("sharing to {target} failed: {reason}")]
    Failed { target: ShareTarget, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharePayload {
    pub record_id: Uuid,
    pub url: String,
    pub title: String,
    pub description: String,
    pub text: String,
    pub clipboard_text: String,
    pub file_name: String,
}

impl SharePayload {
    pub fn from_summary(summary: &ResultSummary, language: Language, url: &str) -> Self {
        let record = &summary.record;
        let precise = format_seconds(record.time(), 6);
        let text = t(language, TextKey::ShareMessage).replace("{time}", &precise);
        let description = match language {
            Language::Ko => format!("{} 마스터의 기록: {}초!", record.user_name(), precise),
            Language::En => format!("{}'s record: {}s!", record.user_name(), precise),
        };
        Self {
            record_id: record.id(),
            url: url.to_string(),
            title: format!("{}: {}", t(language, TextKey::Title), summary.difficulty_name),
            description,
            clipboard_text: format!("{}\n{}", text, url),
            text,
            file_name: format!("ZenNumbers_{}s.png", format_seconds(record.time(), 4)),
        }
    }

    pub fn intent_url(&self, target: ShareTarget) -> Option<String> {
        let url = glib::Uri::escape_string(&self.url, None, false);
        match target {
            ShareTarget::Facebook => Some(format!("https://www.facebook.com/sharer/sharer.php?u={}", url)),
            ShareTarget::Twitter => {
                let text = glib::Uri::escape_string(&self.text, None, false);
                Some(format!("https://twitter.com/intent/tweet?text={}&url={}", text, url))
            }
            _ => None,
        }
    }
}

pub trait ShareSurface {
    fn share(&self, target: ShareTarget, payload: &SharePayload) -> Result<(), ShareError>;
}

/// Tries `target`, then its fallback chain. Returns the target that worked.
pub fn share_with_fallback(
    surface: &dyn ShareSurface,
    target: ShareTarget,
    payload: &SharePayload,
) -> Result<ShareTarget, ShareError> {
    let mut current = target;
    loop {
        match surface.share(current, payload) {
            Ok(()) => return Ok(current),
            Err(err) => match current.fallback() {
                Some(next) => {
                    warn!(target: "share", "{}; falling back to {}", err, next);
                    current = next;
                }
                None => return Err(err),
            },
        }
    }
}
