use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type ProfileId = Uuid;

/// One randomly generated user record, in the shape the remote source emits it.
#[derive(Serialize, Deserialize, PartialEq, Eq, Debug, Clone)]
pub struct Profile {
    pub login: Login,
    pub name: Name,
    pub picture: Picture,
    pub email: String,
    pub gender: String,
    pub location: Location,
    pub phone: String,
    pub cell: String,
}

#[derive(Serialize, Deserialize, PartialEq, Eq, Hash, Debug, Clone)]
pub struct Login {
    pub uuid: ProfileId,
}

#[derive(Serialize, Deserialize, PartialEq, Eq, Hash, Debug, Clone)]
pub struct Name {
    pub first: String,
    pub last: String,
}

#[derive(Serialize, Deserialize, PartialEq, Eq, Hash, Debug, Clone)]
pub struct Picture {
    pub thumbnail: String,
    pub large: String,
}

#[derive(Serialize, Deserialize, PartialEq, Eq, Hash, Debug, Clone)]
pub struct Location {
    pub city: String,
    pub state: String,
    pub country: String,
}

impl Profile {
    pub fn id(&self) -> ProfileId {
        self.login.uuid
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.name.first, self.name.last)
    }

    /// Case-insensitive substring match over "first last", plus exact gender
    /// equality when `gender` is non-empty. Empty criteria match everything.
    pub fn matches(&self, search: &str, gender: &str) -> bool {
        if !search.is_empty()
            && !self
                .full_name()
                .to_lowercase()
                .contains(&search.to_lowercase())
        {
            return false;
        }

        gender.is_empty() || self.gender == gender
    }
}

pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

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
            email: format!("{}.{}@example.test", first, last).to_lowercase(),
            gender: gender.to_string(),
            location: Location {
                city: "Springfield".to_string(),
                state: "Oregon".to_string(),
                country: "United States".to_string(),
            },
            phone: "(555) 010-0000".to_string(),
            cell: "(555) 010-0001".to_string(),
        }
    }

    /// `count` profiles alternating male/female, starting with male.
    pub fn alternating(count: usize) -> Vec<Profile> {
        (0..count)
            .map(|i| {
                let gender = if i % 2 == 0 { "male" } else { "female" };
                profile(i as u128 + 1, &format!("User{}", i), "Test", gender)
            })
            .collect()
    }
}
