//! Scripted provider fakes for unit and route tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;

use super::{ChatCompleter, LlmError, TextGenerator};

/// One scripted provider reply.
#[derive(Debug, Clone)]
pub enum Step {
    Reply(String),
    Fail(String),
    ModelUnavailable,
}

impl Step {
    pub fn reply(text: &str) -> Self {
        Step::Reply(text.to_string())
    }

    pub fn fail(message: &str) -> Self {
        Step::Fail(message.to_string())
    }

    fn into_result(self, model: &str) -> Result<String, LlmError> {
        match self {
            Step::Reply(text) => Ok(text),
            Step::Fail(message) => Err(LlmError::Api {
                status: 503,
                message,
            }),
            Step::ModelUnavailable => Err(LlmError::ModelUnavailable {
                model: model.to_string(),
            }),
        }
    }
}

/// Replays steps in order. Once the script runs out the last step repeats.
#[derive(Default)]
struct Script {
    steps: Mutex<VecDeque<Step>>,
    last: Mutex<Option<Step>>,
    calls: AtomicUsize,
}

impl Script {
    fn new(steps: Vec<Step>) -> Self {
        Self {
            steps: Mutex::new(steps.into()),
            ..Default::default()
        }
    }

    fn next(&self) -> Step {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.steps.lock().unwrap().pop_front() {
            Some(step) => {
                *self.last.lock().unwrap() = Some(step.clone());
                step
            }
            None => self
                .last
                .lock()
                .unwrap()
                .clone()
                .unwrap_or_else(|| Step::fail("script empty")),
        }
    }
}

pub struct ScriptedGenerator {
    script: Script,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedGenerator {
    pub fn new(steps: Vec<Step>) -> Arc<Self> {
        Arc::new(Self {
            script: Script::new(steps),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn replies(replies: &[&str]) -> Arc<Self> {
        Self::new(replies.iter().map(|r| Step::reply(r)).collect())
    }

    pub fn calls(&self) -> usize {
        self.script.calls.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.script.next().into_result("scripted-generator")
    }
}

pub struct ScriptedChat {
    script: Script,
    models: Mutex<Vec<String>>,
}

impl ScriptedChat {
    pub fn new(steps: Vec<Step>) -> Arc<Self> {
        Arc::new(Self {
            script: Script::new(steps),
            models: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.script.calls.load(Ordering::SeqCst)
    }

    /// Model ids requested, in call order.
    pub fn models(&self) -> Vec<String> {
        self.models.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatCompleter for ScriptedChat {
    async fn complete(&self, model: &str, _system: &str, user: &str) -> Result<String, LlmError> {
        self.models.lock().unwrap().push(model.to_string());
        match self.script.next() {
            Step::Reply(text) if text == "{echo}" => Ok(format!("answer to: {user}")),
            step => step.into_result(model),
        }
    }
}

/// Serves `router` on an ephemeral local port and returns its base URL.
pub async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}
