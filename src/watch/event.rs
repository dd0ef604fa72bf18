//! Backend-neutral filesystem events.

use std::path::PathBuf;

use notify::event::{EventKind, ModifyKind, RenameMode};

/// What happened to a path, reduced to the three operations the classifier
/// understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsEventKind {
    Created,
    Removed,
    Written,
}

/// A single filesystem change on a single path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FsEvent {
    pub kind: FsEventKind,
    pub path: PathBuf,
}

impl FsEvent {
    pub fn new(kind: FsEventKind, path: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            path: path.into(),
        }
    }

    pub fn created(path: impl Into<PathBuf>) -> Self {
        Self::new(FsEventKind::Created, path)
    }

    pub fn removed(path: impl Into<PathBuf>) -> Self {
        Self::new(FsEventKind::Removed, path)
    }

    pub fn written(path: impl Into<PathBuf>) -> Self {
        Self::new(FsEventKind::Written, path)
    }
}

/// Map a `notify` event kind onto [`FsEventKind`].
///
/// A rename target counts as a creation and a rename source as a removal,
/// so directories moved into or out of the tree are tracked. Metadata
/// changes and accesses carry no rebuild meaning and are dropped.
pub fn map_kind(kind: &EventKind) -> Option<FsEventKind> {
    match kind {
        EventKind::Create(_) => Some(FsEventKind::Created),
        EventKind::Remove(_) => Some(FsEventKind::Removed),
        EventKind::Modify(ModifyKind::Name(RenameMode::To)) => Some(FsEventKind::Created),
        EventKind::Modify(ModifyKind::Name(RenameMode::From)) => Some(FsEventKind::Removed),
        EventKind::Modify(ModifyKind::Data(_))
        | EventKind::Modify(ModifyKind::Any)
        | EventKind::Modify(ModifyKind::Other) => Some(FsEventKind::Written),
        _ => None,
    }
}

/// Split a `notify` event into one [`FsEvent`] per affected path.
///
/// `Name(Both)` carries `[from, to]` and becomes a removal plus a creation.
/// A rename whose direction is unknown yields both for each path; the
/// watcher sorts it out by checking what is on disk.
pub fn from_notify(event: notify::Event) -> Vec<FsEvent> {
    match event.kind {
        EventKind::Modify(ModifyKind::Name(RenameMode::Both)) => {
            let mut paths = event.paths.into_iter();
            let mut out = Vec::with_capacity(2);
            if let Some(from) = paths.next() {
                out.push(FsEvent::removed(from));
            }
            if let Some(to) = paths.next() {
                out.push(FsEvent::created(to));
            }
            out
        }
        EventKind::Modify(ModifyKind::Name(RenameMode::Any | RenameMode::Other)) => event
            .paths
            .into_iter()
            .flat_map(|path| [FsEvent::removed(path.clone()), FsEvent::created(path)])
            .collect(),
        kind => {
            let Some(kind) = map_kind(&kind) else {
                return Vec::new();
            };
            event
                .paths
                .into_iter()
                .map(|path| FsEvent::new(kind, path))
                .collect()
        }
    }
}
