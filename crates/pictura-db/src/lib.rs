//! pictura-db: persistence for pictures and their file assets.
//!
//! This crate provides SQLite-backed storage with connection pooling,
//! embedded migrations, typed models, and the query modules that implement
//! the picture lifecycle.
//!
//! # Example
//!
//! ```
//! use pictura_core::{Imageable, UserId};
//! use pictura_db::pool::{get_conn, init_memory_pool};
//! use pictura_db::queries::pictures;
//!
//! let pool = init_memory_pool().unwrap();
//! let conn = get_conn(&pool).unwrap();
//!
//! let owner = Imageable::User(UserId::new());
//! let created = pictures::create_picture(&conn, "avatar.png", &owner).unwrap();
//! assert_eq!(created.file_asset.permission.as_deref(), Some("public"));
//! ```

pub mod migrations;
pub mod models;
pub mod pool;
pub mod queries;
