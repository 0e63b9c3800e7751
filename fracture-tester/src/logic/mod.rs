pub mod assets;
pub mod briefing_tester;
pub mod reports;
pub mod seeds;
pub mod tester;

pub use assets::{FileLoader, TesterAssets, default_data_root, load_state};
pub use briefing_tester::{
    BriefingPlan, BriefingSummary, BriefingTester, DEFAULT_PARTY, scenario_issued_at,
};
pub use seeds::resolve_seed_inputs;
pub use tester::*;
