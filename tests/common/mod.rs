#![allow(dead_code)]

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
    time::Duration,
};

use async_trait::async_trait;
use homework_watcher::{
    jobs::{Clock, Operator},
    notifier::Notify,
    practicum::{client::PracticumResult, HomeworkSource},
};
use serde_json::{json, Value};

pub const START: i64 = 1_700_000_000;
pub const INTERVAL: Duration = Duration::from_secs(600);

pub fn homework(name: &str, status: &str) -> Value {
    json!({ "homeworks": [{ "homework_name": name, "status": status }] })
}

/// Hands out queued responses; an empty queue answers with no homeworks.
/// Fetches listed in `hang_on` (1-based) never complete.
#[derive(Clone, Default)]
pub struct ScriptedSource {
    responses: Arc<Mutex<VecDeque<PracticumResult<Value>>>>,
    cursors: Arc<Mutex<Vec<i64>>>,
    hang_on: Vec<usize>,
}

impl ScriptedSource {
    pub fn new(responses: Vec<PracticumResult<Value>>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses.into())),
            cursors: Arc::default(),
            hang_on: Vec::new(),
        }
    }

    pub fn hanging_on(mut self, calls: &[usize]) -> Self {
        self.hang_on = calls.to_vec();
        self
    }

    pub fn push(&self, response: PracticumResult<Value>) {
        self.responses.lock().unwrap().push_back(response);
    }

    pub fn cursors(&self) -> Vec<i64> {
        self.cursors.lock().unwrap().clone()
    }
}

#[async_trait]
impl HomeworkSource for ScriptedSource {
    async fn fetch(&self, from_timestamp: i64) -> PracticumResult<Value> {
        let call = {
            let mut cursors = self.cursors.lock().unwrap();
            cursors.push(from_timestamp);
            cursors.len()
        };
        if self.hang_on.contains(&call) {
            std::future::pending::<()>().await;
        }
        let next = self.responses.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Ok(json!({ "homeworks": [] })))
    }
}

#[derive(Clone, Default)]
pub struct RecordingNotifier {
    sent: Arc<Mutex<Vec<String>>>,
}

impl RecordingNotifier {
    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notify for RecordingNotifier {
    async fn notify(&self, message: &str) {
        self.sent.lock().unwrap().push(message.to_owned());
    }
}

/// Returns instantly, except on the sleeps listed in `stall_at` (1-based),
/// which never finish so an interrupt can win.
#[derive(Clone)]
pub struct FakeClock {
    now: i64,
    sleeps: Arc<Mutex<Vec<Duration>>>,
    stall_at: Vec<usize>,
}

impl FakeClock {
    pub fn new(now: i64) -> Self {
        Self {
            now,
            sleeps: Arc::default(),
            stall_at: Vec::new(),
        }
    }

    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().unwrap().clone()
    }
}

#[async_trait]
impl Clock for FakeClock {
    fn now(&self) -> i64 {
        self.now
    }

    async fn sleep(&self, duration: Duration) {
        let count = {
            let mut sleeps = self.sleeps.lock().unwrap();
            sleeps.push(duration);
            sleeps.len()
        };
        if self.stall_at.contains(&count) {
            std::future::pending::<()>().await;
        }
    }
}

/// Interrupts once the clock has started the listed sleeps and answers the
/// confirmation prompt from `answers`.
pub struct ScriptedOperator {
    sleeps: Arc<Mutex<Vec<Duration>>>,
    interrupt_at: VecDeque<usize>,
    answers: VecDeque<bool>,
    pub prompts: usize,
}

#[async_trait]
impl Operator for ScriptedOperator {
    async fn interrupted(&mut self) {
        loop {
            let Some(&due) = self.interrupt_at.front() else {
                std::future::pending::<()>().await;
                return;
            };
            let started = self.sleeps.lock().unwrap().len();
            if started >= due {
                self.interrupt_at.pop_front();
                return;
            }
            tokio::task::yield_now().await;
        }
    }

    async fn confirm_stop(&mut self) -> bool {
        self.prompts += 1;
        self.answers.pop_front().unwrap_or(true)
    }
}

/// A clock and operator sharing one interrupt script.
pub fn scripted(interrupt_at: &[usize], answers: &[bool]) -> (FakeClock, ScriptedOperator) {
    let mut clock = FakeClock::new(START);
    clock.stall_at = interrupt_at.to_vec();

    let operator = ScriptedOperator {
        sleeps: clock.sleeps.clone(),
        interrupt_at: interrupt_at.iter().copied().collect(),
        answers: answers.iter().copied().collect(),
        prompts: 0,
    };

    (clock, operator)
}
