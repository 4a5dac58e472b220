//! Database query modules.

pub mod file_assets;
pub mod pictures;

/// Current time as stored in `created_at` / `updated_at` columns.
///
/// Fixed-width so that text ordering matches time ordering.
pub(crate) fn now() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Micros, true)
}
