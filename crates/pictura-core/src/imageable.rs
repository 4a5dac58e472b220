//! Polymorphic picture owners.
//!
//! A picture belongs to exactly one "imageable" entity, which may be of any
//! kind listed in [`ImageableKind`]. The database stores the owner only as an
//! `(imageable_type, imageable_id)` pair with no foreign key; this module is
//! where that pair is turned back into a typed value.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::ids::{ArticleId, ProductId, UserId};

/// The kinds of entity that may own pictures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImageableKind {
    User,
    Product,
    Article,
}

impl ImageableKind {
    /// All known kinds, in declaration order.
    pub const ALL: [ImageableKind; 3] = [Self::User, Self::Product, Self::Article];

    /// Label stored in the `imageable_type` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "User",
            Self::Product => "Product",
            Self::Article => "Article",
        }
    }
}

impl fmt::Display for ImageableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImageableKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| Error::validation(format!("unknown imageable type '{s}'")))
    }
}

/// Reference to the entity that owns a picture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "id")]
pub enum Imageable {
    User(UserId),
    Product(ProductId),
    Article(ArticleId),
}

impl Imageable {
    /// Resolve a stored `(imageable_type, imageable_id)` pair.
    ///
    /// Unknown type labels and malformed ids are rejected rather than coerced.
    pub fn from_parts(kind: &str, id: &str) -> Result<Self> {
        let kind: ImageableKind = kind.parse()?;
        let uuid = Uuid::parse_str(id)
            .map_err(|e| Error::validation(format!("invalid {kind} id '{id}': {e}")))?;
        Ok(Self::new(kind, uuid))
    }

    /// Build a reference from an already-parsed kind and id.
    pub fn new(kind: ImageableKind, id: Uuid) -> Self {
        match kind {
            ImageableKind::User => Self::User(UserId::from(id)),
            ImageableKind::Product => Self::Product(ProductId::from(id)),
            ImageableKind::Article => Self::Article(ArticleId::from(id)),
        }
    }

    pub fn kind(&self) -> ImageableKind {
        match self {
            Self::User(_) => ImageableKind::User,
            Self::Product(_) => ImageableKind::Product,
            Self::Article(_) => ImageableKind::Article,
        }
    }

    pub fn id(&self) -> Uuid {
        match self {
            Self::User(id) => (*id).into(),
            Self::Product(id) => (*id).into(),
            Self::Article(id) => (*id).into(),
        }
    }
}

impl fmt::Display for Imageable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind(), self.id())
    }
}
