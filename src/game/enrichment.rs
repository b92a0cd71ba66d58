use async_trait::async_trait;
use log::warn;
use std::rc::Rc;
use std::time::Duration;
use thiserror::Error;

use crate::model::Language;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnrichmentError {
    #[error("text service failed: {0}")]
    Service(String),
    #[error("text service timed out after {0:?}")]
    TimedOut(Duration),
}

/// Generator of the short congratulation shown under a result.
#[async_trait(?Send)]
pub trait TextEnrichment {
    async fn describe(
        &self,
        time: Duration,
        difficulty_name: &str,
        language: Language,
    ) -> Result<String, EnrichmentError>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct CannedEnrichment;

impl CannedEnrichment {
    fn phrase(time: Duration, language: Language) -> &'static str {
        let seconds = time.as_secs_f64();
        match (language, seconds) {
            (Language::Ko, s) if s < 5.0 => "번개보다 빠른 집중력.",
            (Language::Ko, s) if s < 15.0 => "흔들림 없는 손끝입니다.",
            (Language::Ko, _) => "천천히, 그러나 확실하게.",
            (Language::En, s) if s < 5.0 => "Faster than thought itself.",
            (Language::En, s) if s < 15.0 => "Steady hands, quiet mind.",
            (Language::En, _) => "Slow water still reaches the sea.",
        }
    }
}

#[async_trait(?Send)]
impl TextEnrichment for CannedEnrichment {
    async fn describe(
        &self,
        time: Duration,
        _difficulty_name: &str,
        language: Language,
    ) -> Result<String, EnrichmentError> {
        Ok(Self::phrase(time, language).to_string())
    }
}

/// Runs a generator once with a bounded wait and always produces text.
#[derive(Clone)]
pub struct Enricher {
    service: Rc<dyn TextEnrichment>,
    timeout: Duration,
}

impl Enricher {
    pub fn new(service: Rc<dyn TextEnrichment>, timeout: Duration) -> Self {
        Self { service, timeout }
    }

    pub fn fallback_phrase(language: Language) -> &'static str {
        match language {
            Language::Ko => "집중의 끝에서 승리를 거머쥐셨군요.",
            Language::En => "Victory at the end of focus.",
        }
    }

    pub fn blank_phrase(language: Language) -> &'static str {
        match language {
            Language::Ko => "완벽한 집중력이었습니다.",
            Language::En => "Absolute focus.",
        }
    }

    pub async fn describe(&self, time: Duration, difficulty_name: &str, language: Language) -> String {
        let service = Rc::clone(&self.service);
        let difficulty_name = difficulty_name.to_string();
        let request = Box::pin(async move { service.describe(time, &difficulty_name, language).await });
        let outcome = glib::future_with_timeout(self.timeout, request)
            .await
            .unwrap_or(Err(EnrichmentError::TimedOut(self.timeout)));
        match outcome {
            Ok(text) if text.trim().is_empty() => Self::blank_phrase(language).to_string(),
            Ok(text) => text.trim().to_string(),
            Err(err) => {
                warn!(target: "enrichment", "Using fallback phrase: {}", err);
                Self::fallback_phrase(language).to_string()
            }
        }
    }
}
