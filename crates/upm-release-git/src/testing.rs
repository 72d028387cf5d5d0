//! Scripted [`GitRunner`] for tests
//!
//! Responses are keyed by the space-joined argument list. A key with several
//! queued responses replays them in order and then keeps repeating the last
//! one. Unscripted commands succeed with empty output.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use upm_release_core::error::GitError;

use crate::runner::{GitRunner, Result};

#[derive(Debug, Clone)]
enum Reply {
    Output(String),
    Failure(String),
}

/// A recorded invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Space-joined arguments
    pub command: String,
    /// Whether the caller asked for stderr warnings
    pub warn_on_error: bool,
}

/// A [`GitRunner`] that replays canned responses and records every call
#[derive(Debug, Default)]
pub struct ScriptedGit {
    replies: Mutex<HashMap<String, VecDeque<Reply>>>,
    calls: Mutex<Vec<Invocation>>,
}

impl ScriptedGit {
    /// Create an empty script
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `command` with `stdout`
    pub fn on(self, command: &str, stdout: &str) -> Self {
        self.push(command, Reply::Output(stdout.to_string()));
        self
    }

    /// Fail `command` with `stderr`
    pub fn on_fail(self, command: &str, stderr: &str) -> Self {
        self.push(command, Reply::Failure(stderr.to_string()));
        self
    }

    /// Every command run so far, in order
    pub fn commands(&self) -> Vec<String> {
        self.invocations().into_iter().map(|i| i.command).collect()
    }

    /// Every invocation run so far, in order
    pub fn invocations(&self) -> Vec<Invocation> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Whether `command` was run
    pub fn ran(&self, command: &str) -> bool {
        self.commands().iter().any(|c| c == command)
    }

    fn push(&self, command: &str, reply: Reply) {
        if let Ok(mut replies) = self.replies.lock() {
            replies.entry(command.to_string()).or_default().push_back(reply);
        }
    }

    fn next_reply(&self, command: &str) -> Option<Reply> {
        let mut replies = self.replies.lock().ok()?;
        let queue = replies.get_mut(command)?;
        if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        }
    }
}

#[async_trait::async_trait]
impl GitRunner for ScriptedGit {
    async fn run(&self, args: &[&str], warn_on_error: bool) -> Result<String> {
        let command = args.join(" ");
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(Invocation {
                command: command.clone(),
                warn_on_error,
            });
        }

        match self.next_reply(&command) {
            Some(Reply::Output(stdout)) => Ok(stdout),
            Some(Reply::Failure(stderr)) => Err(GitError::command_failed(args, stderr)),
            None => Ok(String::new()),
        }
    }
}
