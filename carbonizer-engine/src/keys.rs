//! Deterministic metric-name construction.

use carbonizer_entry::LogEntry;

/// Derives the dotted namespace for an entry's submetrics.
///
/// Case-folds `action` (and `desc` for per-minute entries) so the namespace
/// is stable no matter how the producer capitalizes. The `.count` and
/// `.duration` suffixes are appended later, when the records are built.
pub fn metric_key(entry: &LogEntry, prefix: &str) -> String {
    match entry {
        LogEntry::Normalized(entry) => {
            format!("{}.{}", prefix, entry.action.to_lowercase())
        }
        LogEntry::PerMinute(entry) => {
            format!(
                "{}.{}.{}",
                prefix,
                entry.action.to_lowercase(),
                entry.desc.to_lowercase()
            )
        }
    }
}
