use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// Shared data every shelf kind embeds: the owning user (cleared on
/// detachment) and the shelf name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShelfCore {
    pub user_id: Option<i64>,
    pub name: String,
}

impl ShelfCore {
    pub fn new(user_id: Option<i64>, name: impl Into<String>) -> Self {
        Self {
            user_id,
            name: name.into(),
        }
    }

    /// Severs the ownership link. Idempotent: clearing an already-unowned
    /// core is a no-op, not an error.
    pub fn remove_user(&mut self) {
        self.user_id = None;
    }
}

/// The four reading-status shelves every user gets at registration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PredefinedKind {
    ToRead,
    Reading,
    Read,
    DidNotFinish,
}

impl PredefinedKind {
    pub const ALL: [PredefinedKind; 4] = [
        PredefinedKind::ToRead,
        PredefinedKind::Reading,
        PredefinedKind::Read,
        PredefinedKind::DidNotFinish,
    ];

    /// Display name of the predefined shelf
    pub fn shelf_name(self) -> &'static str {
        match self {
            PredefinedKind::ToRead => "To read",
            PredefinedKind::Reading => "Currently reading",
            PredefinedKind::Read => "Read",
            PredefinedKind::DidNotFinish => "Did not finish",
        }
    }

    /// Storage tag persisted in the `kind` column
    pub fn as_str(self) -> &'static str {
        match self {
            PredefinedKind::ToRead => "to_read",
            PredefinedKind::Reading => "reading",
            PredefinedKind::Read => "read",
            PredefinedKind::DidNotFinish => "did_not_finish",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "to_read" => Some(PredefinedKind::ToRead),
            "reading" => Some(PredefinedKind::Reading),
            "read" => Some(PredefinedKind::Read),
            "did_not_finish" => Some(PredefinedKind::DidNotFinish),
            _ => None,
        }
    }
}

/// One of the reading-status shelves
#[derive(Debug, Clone, Serialize)]
pub struct PredefinedShelf {
    pub id: i64,
    pub kind: PredefinedKind,
    #[serde(flatten)]
    pub core: ShelfCore,
}

/// A user-named shelf
#[derive(Debug, Clone, Serialize)]
pub struct CustomShelf {
    pub id: i64,
    #[serde(flatten)]
    pub core: ShelfCore,
}

/// A shelf of either concrete kind.
///
/// Identity is defined over (kind tag, owner, name) only: two shelves of
/// different concrete kinds are never equal, and the row id does not take
/// part in equality or hashing.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Shelf {
    Predefined(PredefinedShelf),
    Custom(CustomShelf),
}

/// Kind tag used by the shared equality/hash implementation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum ShelfTag {
    Predefined(PredefinedKind),
    Custom,
}

impl Shelf {
    pub fn predefined(id: i64, kind: PredefinedKind, user_id: Option<i64>) -> Self {
        Shelf::Predefined(PredefinedShelf {
            id,
            kind,
            core: ShelfCore::new(user_id, kind.shelf_name()),
        })
    }

    pub fn custom(id: i64, user_id: Option<i64>, name: impl Into<String>) -> Self {
        Shelf::Custom(CustomShelf {
            id,
            core: ShelfCore::new(user_id, name),
        })
    }

    pub fn id(&self) -> i64 {
        match self {
            Shelf::Predefined(shelf) => shelf.id,
            Shelf::Custom(shelf) => shelf.id,
        }
    }

    pub fn core(&self) -> &ShelfCore {
        match self {
            Shelf::Predefined(shelf) => &shelf.core,
            Shelf::Custom(shelf) => &shelf.core,
        }
    }

    pub fn core_mut(&mut self) -> &mut ShelfCore {
        match self {
            Shelf::Predefined(shelf) => &mut shelf.core,
            Shelf::Custom(shelf) => &mut shelf.core,
        }
    }

    pub fn name(&self) -> &str {
        &self.core().name
    }

    pub fn user_id(&self) -> Option<i64> {
        self.core().user_id
    }

    /// Severs the ownership link; see [`ShelfCore::remove_user`].
    pub fn remove_user(&mut self) {
        self.core_mut().remove_user();
    }

    fn identity(&self) -> (ShelfTag, Option<i64>, &str) {
        let tag = match self {
            Shelf::Predefined(shelf) => ShelfTag::Predefined(shelf.kind),
            Shelf::Custom(_) => ShelfTag::Custom,
        };
        let core = self.core();
        (tag, core.user_id, core.name.as_str())
    }
}

impl PartialEq for Shelf {
    fn eq(&self, other: &Self) -> bool {
        self.identity() == other.identity()
    }
}

impl Eq for Shelf {}

impl Hash for Shelf {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identity().hash(state);
    }
}
