#![allow(dead_code)]

use async_trait::async_trait;
use profiledeck_lib::error::FetchError;
use profiledeck_lib::profile::{Location, Login, Name, Picture, Profile};
use profiledeck_lib::source::UserSource;
use profiledeck_lib::store::{Store, StoreKey};
use std::collections::VecDeque;
use std::sync::Mutex;
use uuid::Uuid;

pub fn profile(n: u128, first: &str, last: &str, gender: &str) -> Profile {
    Profile {
        login: Login {
            uuid: Uuid::from_u128(n),
        },
        name: Name {
            first: first.to_string(),
            last: last.to_string(),
        },
        picture: Picture {
            thumbnail: format!("https://example.test/thumb/{}.jpg", n),
            large: format!("https://example.test/large/{}.jpg", n),
        },
        email: format!("{}@example.test", n),
        gender: gender.to_string(),
        location: Location {
            city: "Dunedin".to_string(),
            state: "Otago".to_string(),
            country: "New Zealand".to_string(),
        },
        phone: "(123)-456-7890".to_string(),
        cell: "(123)-456-7891".to_string(),
    }
}

pub fn alternating(count: usize) -> Vec<Profile> {
    (0..count)
        .map(|i| {
            let gender = if i % 2 == 0 { "male" } else { "female" };
            profile(i as u128 + 1, &format!("User{}", i), "Test", gender)
        })
        .collect()
}

/// Hands out pre-arranged responses in order and records every request size.
#[derive(Default)]
pub struct ScriptedSource {
    responses: Mutex<VecDeque<Result<Vec<Profile>, FetchError>>>,
    requests: Mutex<Vec<usize>>,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, profiles: Vec<Profile>) -> Self {
        self.responses.lock().unwrap().push_back(Ok(profiles));
        self
    }

    pub fn fail(self, status: u16) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(Err(FetchError::Status(status)));
        self
    }

    pub fn requests(&self) -> Vec<usize> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl UserSource for ScriptedSource {
    async fn fetch(&self, results: usize) -> Result<Vec<Profile>, FetchError> {
        self.requests.lock().unwrap().push(results);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(FetchError::Status(599)))
    }
}

/// A store whose backend is gone: every read and write errors.
pub struct FailingStore;

#[async_trait]
impl Store for FailingStore {
    async fn get(&self, key: StoreKey) -> anyhow::Result<Option<String>> {
        anyhow::bail!("store offline while reading {}", key.as_str())
    }

    async fn set(&self, key: StoreKey, _value: &str) -> anyhow::Result<()> {
        anyhow::bail!("store offline while writing {}", key.as_str())
    }
}
