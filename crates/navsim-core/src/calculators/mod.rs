//! Return, SIP, SWP, step-up and lumpsum calculators over a NAV series.

pub mod lumpsum;
pub mod returns;
pub mod sip;
pub mod step_up;
pub mod swp;

pub use lumpsum::{simulate_lumpsum, LumpsumInput, LumpsumResult};
pub use returns::{compute_returns, period_return, PeriodReturn, PeriodReturnInput};
pub use sip::{
    simulate_sip, simulate_step_up_sip, InvestmentEvent, SipInput, SipResult, StepUpSipInput,
    StepUpSipResult,
};
pub use step_up::StepUp;
pub use swp::{
    simulate_step_up_swp, simulate_swp, StepUpSwpInput, StepUpSwpResult, SwpInput, SwpResult,
    WithdrawalEvent,
};
