//! Participant Roster
//!
//! 참가자 이름 목록을 관리합니다.
//! - 이름은 대소문자 구분, 완전 일치 기준으로 중복을 허용하지 않음
//! - 순서는 추가 순서 그대로 유지
//! - 변경이 일어날 때마다 `generation`이 증가하여 레이아웃 캐시를 무효화
//!
//! Participant ids are derived from the rank (`participant-{position}`) and
//! shift when an earlier name is removed.

mod bulk;

pub use bulk::split_bulk;

use serde::{Deserialize, Serialize};

/// One entry of the roster as seen by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Participant {
    /// Rank-derived id, not stable across mutation
    pub id: String,
    pub name: String,
    /// Dense rank 0..n-1 in insertion order
    pub position: usize,
}

/// How close the roster is to a startable draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum RosterReadiness {
    /// 이름 없음
    #[default]
    Empty,
    /// 최소 인원 미달
    NeedsMore,
    /// 시작 가능
    Ready,
}

pub fn participant_id(position: usize) -> String {
    format!("participant-{}", position)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
    names: Vec<String>,
    generation: u64,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a roster by feeding every name through [`Roster::add`].
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut roster = Self::new();
        for name in names {
            roster.add(name.as_ref());
        }
        roster
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// Mutation counter. Bumped only by mutations that changed the list.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Participants with ranks recomputed from the current order.
    pub fn participants(&self) -> Vec<Participant> {
        self.names
            .iter()
            .enumerate()
            .map(|(position, name)| Participant {
                id: participant_id(position),
                name: name.clone(),
                position,
            })
            .collect()
    }

    pub fn readiness(&self, min_participants: usize) -> RosterReadiness {
        match self.names.len() {
            0 => RosterReadiness::Empty,
            n if n < min_participants => RosterReadiness::NeedsMore,
            _ => RosterReadiness::Ready,
        }
    }

    /// Append a trimmed name.
    ///
    /// Returns `false` without touching the roster when the trimmed name is
    /// empty or already present.
    pub fn add(&mut self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() || self.contains(name) {
            return false;
        }
        self.names.push(name.to_string());
        self.touch();
        true
    }

    /// Append every new name found in comma/newline separated text.
    ///
    /// Names already in the roster and repeats later in the same text are
    /// skipped (first occurrence wins). Returns how many were appended.
    pub fn add_bulk(&mut self, raw: &str) -> usize {
        let before = self.names.len();
        for token in split_bulk(raw) {
            if !self.contains(token) {
                self.names.push(token.to_string());
            }
        }
        let added = self.names.len() - before;
        if added > 0 {
            self.touch();
        }
        added
    }

    /// Remove the entry with exactly this name. Returns `false` if absent.
    pub fn remove(&mut self, name: &str) -> bool {
        let Some(idx) = self.names.iter().position(|n| n == name) else {
            return false;
        };
        self.names.remove(idx);
        self.touch();
        true
    }

    fn touch(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }
}
