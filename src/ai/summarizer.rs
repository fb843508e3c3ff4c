use crate::error::{AppError, Result};
use crate::models::DailyLog;
use crate::week;

use super::openai::CompletionProvider;

const SYSTEM_PROMPT: &str = "You are a professional assistant that creates clear, concise weekly \
work summaries for managers. Focus on achievements, progress, and key activities.";

/// Concatenate the week's entries as `<date>: <content>` blocks,
/// ascending by date, inside the instruction template.
fn build_prompt(logs: &[DailyLog]) -> String {
    let logs_text = logs
        .iter()
        .map(|log| format!("{}: {}", week::date_key(log.date), log.content))
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        "Summarize the following employee work logs into a concise, professional weekly \
report for a manager. Focus on key achievements, progress made, and important activities. \
Keep it clear and business-appropriate.\n\n\
Work Logs:\n{logs_text}\n\n\
Please provide a structured summary that highlights the most important work completed \
during this week."
    )
}

/// Generate the prose summary for one week of logs.
///
/// Both preconditions are checked before any network traffic: a blank
/// credential fails with `MissingApiKey`, an empty week with `NoLogs`.
/// A single provider call is made per invocation; failures are never
/// retried here, the user re-triggers manually.
pub async fn generate_weekly_summary(
    logs: &[DailyLog],
    api_key: &str,
    provider: &dyn CompletionProvider,
) -> Result<String> {
    if api_key.trim().is_empty() {
        return Err(AppError::MissingApiKey);
    }

    if logs.is_empty() {
        return Err(AppError::NoLogs);
    }

    let prompt = build_prompt(logs);
    let response = provider.complete(api_key, SYSTEM_PROMPT, &prompt).await?;

    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or(AppError::EmptyResponse)?;

    Ok(choice.message.content.trim().to_string())
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::NaiveDate;

    use super::*;
    use crate::ai::openai::{ChatChoice, ChatMessage, ChatResponse};

    struct MockProvider {
        calls: AtomicUsize,
        last_prompt: Mutex<Option<String>>,
        reply: std::result::Result<&'static str, (u16, &'static str)>,
    }

    impl MockProvider {
        fn replying(text: &'static str) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                last_prompt: Mutex::new(None),
                reply: Ok(text),
            }
        }

        fn failing(status: u16, message: &'static str) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                last_prompt: Mutex::new(None),
                reply: Err((status, message)),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl CompletionProvider for MockProvider {
        async fn complete(
            &self,
            _api_key: &str,
            _system: &str,
            prompt: &str,
        ) -> Result<ChatResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_prompt.lock().unwrap() = Some(prompt.to_string());
            match self.reply {
                Ok(text) => Ok(ChatResponse {
                    choices: vec![ChatChoice {
                        message: ChatMessage {
                            role: "assistant".to_string(),
                            content: text.to_string(),
                        },
                    }],
                }),
                Err((status, message)) => Err(AppError::OpenAiApi {
                    status,
                    message: message.to_string(),
                }),
            }
        }
    }

    fn log(date: &str, content: &str) -> DailyLog {
        DailyLog::new(
            NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            content.to_string(),
        )
    }

    #[tokio::test]
    async fn missing_api_key_makes_no_network_call() {
        let provider = MockProvider::replying("unused");
        let logs = vec![log("2024-01-01", "Did X")];

        let err = generate_weekly_summary(&logs, "", &provider)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::MissingApiKey));
        assert_eq!(provider.call_count(), 0);

        // Whitespace-only credentials count as absent too
        let err = generate_weekly_summary(&logs, "   ", &provider)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::MissingApiKey));
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn empty_week_makes_no_network_call() {
        let provider = MockProvider::replying("unused");

        let err = generate_weekly_summary(&[], "sk-test", &provider)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NoLogs));
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn success_returns_trimmed_text_and_sends_logs_in_order() {
        let provider = MockProvider::replying("  Summary OK\n");
        let logs = vec![log("2024-01-01", "Did X"), log("2024-01-03", "Did Y")];

        let summary = generate_weekly_summary(&logs, "sk-test", &provider)
            .await
            .unwrap();
        assert_eq!(summary, "Summary OK");
        assert_eq!(provider.call_count(), 1);

        let prompt = provider.last_prompt.lock().unwrap().clone().unwrap();
        let x = prompt.find("2024-01-01: Did X").expect("first log in prompt");
        let y = prompt.find("2024-01-03: Did Y").expect("second log in prompt");
        assert!(x < y);
    }

    #[tokio::test]
    async fn provider_rejection_is_a_classified_error() {
        let provider = MockProvider::failing(401, "Incorrect API key provided");
        let logs = vec![log("2024-01-01", "Did X")];

        let err = generate_weekly_summary(&logs, "sk-bad", &provider)
            .await
            .unwrap_err();
        match err {
            AppError::OpenAiApi { status, .. } => assert_eq!(status, 401),
            other => panic!("expected OpenAiApi, got {other:?}"),
        }
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn response_without_choices_is_empty_response() {
        struct Empty;

        #[async_trait]
        impl CompletionProvider for Empty {
            async fn complete(&self, _: &str, _: &str, _: &str) -> Result<ChatResponse> {
                Ok(ChatResponse { choices: vec![] })
            }
        }

        let logs = vec![log("2024-01-01", "Did X")];
        let err = generate_weekly_summary(&logs, "sk-test", &Empty)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::EmptyResponse));
    }
}
