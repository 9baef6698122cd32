//! Slot System - Fixed Visual Placements
//!
//! A slot's default reference is part of its identity, not configuration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SlotError {
    #[error("Unknown slot: {0} (expected front, chat or camera)")]
    Unknown(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Slot {
    Front,
    Chat,
    Camera,
}

impl Slot {
    /// All slots, in page order
    pub const ALL: [Slot; 3] = [Slot::Front, Slot::Chat, Slot::Camera];

    /// Key used by the global configuration object
    pub fn key(self) -> &'static str {
        match self {
            Slot::Front => "front",
            Slot::Chat => "chat",
            Slot::Camera => "camera",
        }
    }

    /// Environment key without any bundler prefix
    pub fn env_stem(self) -> &'static str {
        match self {
            Slot::Front => "FODMAPP_FRONT",
            Slot::Chat => "FODMAPP_CHAT",
            Slot::Camera => "FODMAPP_CAMERA",
        }
    }

    /// Built-in reference, expected under /public
    pub fn default_reference(self) -> &'static str {
        match self {
            Slot::Front => "/8560113d-2fd5-4297-885a-40466efb93bc.png",
            Slot::Chat => "/70fd61b1-d123-4bb1-8f8c-c1c7b3ec4d44.png",
            Slot::Camera => "/71af0897-162d-4210-9266-7f877dcf0e20.png",
        }
    }

    /// Exact match on the config key, no case folding
    pub fn from_key(key: &str) -> Option<Slot> {
        Slot::ALL.into_iter().find(|slot| slot.key() == key)
    }

    pub fn default_label(self) -> &'static str {
        match self {
            Slot::Front => "Front page of FODMAPP",
            Slot::Chat => "Chat view in the app",
            Slot::Camera => "Camera view in the app",
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Slot {
    type Err = SlotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Slot::from_key(&wanted).ok_or_else(|| SlotError::Unknown(s.to_string()))
    }
}
