use crate::{
    compose, filter_discounted, match_desired, parse_markup, should_notify, Effect, Msg, RunState,
    Stage,
};

/// Pure update function: applies a message to state and returns any effects.
///
/// A fetched page walks Fetched -> Parsed -> Filtered -> Matched in one step and
/// then settles on Suppressed, EmptyMatch or Dispatching. Terminal stages ignore
/// every message.
pub fn update(mut state: RunState, msg: Msg) -> (RunState, Vec<Effect>) {
    if state.stage().is_terminal() {
        return (state, Vec::new());
    }

    let effects = match msg {
        Msg::PageFetched { content, timestamp } => {
            if state.stage() != Stage::Idle {
                return (state, Vec::new());
            }
            on_page_fetched(&mut state, &content, timestamp)
        }
        Msg::FetchFailed { reason } => {
            if state.stage() == Stage::Idle {
                state.fail(reason);
            }
            Vec::new()
        }
        Msg::DispatchCompleted(result) => {
            if state.stage() == Stage::Dispatching {
                state.record_dispatch(result);
            }
            Vec::new()
        }
    };

    (state, effects)
}

fn on_page_fetched(state: &mut RunState, content: &str, timestamp: String) -> Vec<Effect> {
    state.mark_fetched(timestamp.clone());

    let records = match parse_markup(content) {
        Ok(records) => records,
        Err(err) => {
            state.fail(err.to_string());
            return Vec::new();
        }
    };
    state.mark_parsed(records.len());

    state.mark_filtered(filter_discounted(&records));

    let matched = match_desired(&state.context().desired, state.discounted());
    state.mark_matched(matched);

    if !should_notify(&timestamp, state.context().last_seen.as_deref()) {
        state.finish(Stage::Suppressed);
        return Vec::new();
    }

    // State commit always precedes the send.
    let commit = Effect::CommitTimestamp {
        timestamp: timestamp.clone(),
    };
    if state.matched().is_empty() {
        state.finish(Stage::EmptyMatch);
        return vec![commit];
    }

    let message = compose(state.matched(), &state.context().source_url, &timestamp);
    state.finish(Stage::Dispatching);
    vec![commit, Effect::Dispatch { message }]
}
