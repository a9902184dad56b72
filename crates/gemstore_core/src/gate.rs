/// Decides whether a fetched page is new enough to notify about.
///
/// With no recorded state every page is new. The caller persists `current`
/// whenever this returns `true`, before dispatching anything.
pub fn should_notify(current: &str, last_seen: Option<&str>) -> bool {
    last_seen != Some(current)
}
