//! Line codec for the persisted store file.
//!
//! One entry per line, `file_name<SP>origin_host`, split at the **last**
//! space. File names may therefore contain spaces; host values may not.

const SEPARATOR: char = ' ';

/// Render entries as persisted text, one line each. Entries arrive sorted
/// from the index snapshot, so the output is deterministic.
pub(super) fn encode(entries: &[(String, String)]) -> String {
    let mut out = String::new();
    for (file_name, host) in entries {
        out.push_str(file_name);
        out.push(SEPARATOR);
        out.push_str(host);
        out.push('\n');
    }
    out
}

/// Parse persisted text line by line. A line without the separator, or with
/// an empty half after splitting, is skipped; the load never fails as a
/// whole. Duplicate keys are kept in order so the caller resolves them to
/// the last occurrence.
pub(super) fn decode(text: &str) -> Vec<(String, String)> {
    let mut entries = Vec::new();
    for line in text.lines() {
        match line.rsplit_once(SEPARATOR) {
            Some((file_name, host)) if !file_name.is_empty() && !host.is_empty() => {
                entries.push((file_name.to_string(), host.to_string()));
            }
            _ => {
                if !line.is_empty() {
                    tracing::debug!(line, "skipping malformed provenance line");
                }
            }
        }
    }
    entries
}
