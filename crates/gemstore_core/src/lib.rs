//! Gemstore core: pure sale-detection pipeline and per-run state machine.
mod compose;
mod effect;
mod gate;
mod markup;
mod msg;
mod record;
mod sale;
mod state;
mod update;
mod watch_list;

pub use compose::{
    compose, display_timestamp, Branding, Message, MessageField, BRAND_ICON_URL, BRAND_NAME,
    BRAND_URL, MAX_FIELDS, MESSAGE_COLOR,
};
pub use effect::Effect;
pub use gate::should_notify;
pub use markup::{parse_markup, MarkupParseError, ENTRY_TEMPLATE};
pub use msg::{DispatchResult, Msg};
pub use record::ItemRecord;
pub use sale::filter_discounted;
pub use state::{RunContext, RunState, RunSummary, Stage};
pub use update::update;
pub use watch_list::{match_desired, DesiredItemList};
