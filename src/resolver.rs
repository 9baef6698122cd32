//! Resolver - First Match Wins
//!
//! Sources are scanned strictly in order. The first non-empty value wins,
//! later sources are never consulted. The slot default closes the chain,
//! so resolution cannot fail.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::slots::Slot;
use crate::sources::{ConfigSource, EnvConvention, EnvSnapshot, EnvSource, GlobalImages, Reference, SourceKind};

/// A resolved reference together with its provenance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub slot: Slot,
    pub reference: Reference,
    pub source: SourceKind,
}

/// Resolve a slot against an ordered list of sources.
pub fn resolve(slot: Slot, sources: &[&dyn ConfigSource]) -> Reference {
    resolve_traced(slot, sources.iter().copied()).reference
}

fn resolve_traced<'a, S, I>(slot: Slot, sources: I) -> Resolution
where
    S: ConfigSource + ?Sized + 'a,
    I: IntoIterator<Item = &'a S>,
{
    let hit = sources.into_iter().find_map(|source| {
        source
            .lookup(slot)
            .and_then(Reference::new)
            .map(|reference| (reference, source.kind()))
    });

    let (reference, source) = match hit {
        Some(hit) => hit,
        None => (Reference::default_for(slot), SourceKind::Default),
    };

    debug!(slot = %slot, source = ?source, reference = %reference, "resolved image slot");

    Resolution { slot, reference, source }
}

/// Owns the precedence chain used for every slot
pub struct Resolver {
    sources: Vec<Box<dyn ConfigSource>>,
}

impl Resolver {
    /// Custom chain; the slot default is always appended implicitly
    pub fn new(sources: Vec<Box<dyn ConfigSource>>) -> Self {
        Self { sources }
    }

    /// Global object, then VITE_, REACT_APP_ and NEXT_PUBLIC_ keys
    pub fn standard(global: Option<GlobalImages>, env: EnvSnapshot) -> Self {
        let mut sources: Vec<Box<dyn ConfigSource>> = Vec::with_capacity(4);
        if let Some(global) = global {
            sources.push(Box::new(global));
        }
        for convention in EnvConvention::ALL {
            sources.push(Box::new(EnvSource::new(convention, env.clone())));
        }
        Self::new(sources)
    }

    /// Standard chain over the live process environment
    pub fn from_process(global: Option<GlobalImages>) -> Self {
        Self::standard(global, EnvSnapshot::from_process())
    }

    pub fn source_kinds(&self) -> Vec<SourceKind> {
        self.sources
            .iter()
            .map(|s| s.kind())
            .chain(std::iter::once(SourceKind::Default))
            .collect()
    }

    pub fn resolve(&self, slot: Slot) -> Reference {
        self.resolve_traced(slot).reference
    }

    pub fn resolve_traced(&self, slot: Slot) -> Resolution {
        resolve_traced(slot, self.sources.iter().map(|s| &**s))
    }

    /// Every slot, in page order
    pub fn resolve_all(&self) -> Vec<Resolution> {
        Slot::ALL.into_iter().map(|slot| self.resolve_traced(slot)).collect()
    }
}

impl Default for Resolver {
    fn default() -> Self {
        Self::standard(None, EnvSnapshot::new())
    }
}
