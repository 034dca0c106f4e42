// orchestrator/src/test_support.rs

use async_trait::async_trait;
use search_core::{OracleError, TextOracle};
use std::sync::Mutex;

enum Reply {
    Text(String),
    Fail,
}

struct Rule {
    system_contains: String,
    user_contains: String,
    reply: Reply,
}

/// In-memory oracle answering from a list of rules. The first rule whose
/// fragments appear in both prompts wins; unmatched calls fail.
#[derive(Default)]
pub struct ScriptedOracle {
    rules: Vec<Rule>,
    calls: Mutex<Vec<(String, String)>>,
}

impl ScriptedOracle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(mut self, system_contains: &str, user_contains: &str, text: &str) -> Self {
        self.rules.push(Rule {
            system_contains: system_contains.to_string(),
            user_contains: user_contains.to_string(),
            reply: Reply::Text(text.to_string()),
        });
        self
    }

    pub fn fail(mut self, system_contains: &str, user_contains: &str) -> Self {
        self.rules.push(Rule {
            system_contains: system_contains.to_string(),
            user_contains: user_contains.to_string(),
            reply: Reply::Fail,
        });
        self
    }

    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn call_count(&self, system_contains: &str) -> usize {
        self.calls()
            .iter()
            .filter(|(system, _)| system.contains(system_contains))
            .count()
    }
}

#[async_trait]
impl TextOracle for ScriptedOracle {
    async fn ask(&self, system_prompt: &str, user_prompt: &str) -> Result<String, OracleError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push((system_prompt.to_string(), user_prompt.to_string()));
        }

        let rule = self.rules.iter().find(|r| {
            system_prompt.contains(&r.system_contains) && user_prompt.contains(&r.user_contains)
        });
        match rule.map(|r| &r.reply) {
            Some(Reply::Text(text)) => Ok(text.clone()),
            Some(Reply::Fail) => Err(OracleError::Status {
                status: 503,
                body: "scripted failure".to_string(),
            }),
            None => Err(OracleError::MalformedResponse(format!(
                "no scripted reply for user prompt {user_prompt:?}"
            ))),
        }
    }
}
