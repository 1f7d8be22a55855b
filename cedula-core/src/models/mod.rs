mod computation;
mod declaration;
mod discount;
mod fee_schedule;
mod tax_bracket;

pub use computation::{AppliedDiscount, ComputationMethod, ComputationResult};
pub use declaration::TaxpayerDeclaration;
pub use discount::{DiscountCategory, DiscountEligibility, DiscountRates};
pub use fee_schedule::FeeSchedule;
pub use tax_bracket::TaxBracket;
