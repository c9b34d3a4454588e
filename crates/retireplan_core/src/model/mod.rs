mod results;
mod returns;
mod withdrawal;

pub use results::{AccumulationOutcome, DecumulationPath, OutcomeSummary, PercentilePath};
pub use returns::{ReturnModel, ReturnSampler, real_return};
pub use withdrawal::{GuytonKlingerRules, WithdrawalPolicy, WithdrawalSpec, WithdrawalState};
