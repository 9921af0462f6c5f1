use crate::model::{CanonicalEvent, TimeWindow};

/// Combine both source sequences into the final ordered timeline.
///
/// Pure function of its arguments: concatenates without deduplication,
/// re-applies the window filter (adapters may be imprecise around pagination
/// boundaries), and sorts ascending by timestamp. Ties are broken by source,
/// then commit sha, then ref name, so identical input always produces an
/// identical sequence and the rendered reports stay diff-stable.
pub fn merge(
    remote_events: &[CanonicalEvent],
    local_events: &[CanonicalEvent],
    window: &TimeWindow,
) -> Vec<CanonicalEvent> {
    let mut events: Vec<CanonicalEvent> = remote_events
        .iter()
        .chain(local_events)
        .filter(|event| window.contains(&event.timestamp))
        .cloned()
        .collect();

    events.sort_by(|a, b| {
        a.timestamp
            .cmp(&b.timestamp)
            .then_with(|| a.source.cmp(&b.source))
            .then_with(|| a.commit_sha.cmp(&b.commit_sha))
            .then_with(|| a.ref_name.cmp(&b.ref_name))
    });

    events
}
