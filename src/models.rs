pub mod budget;
pub mod response;
pub mod transaction;
pub mod user;

pub use budget::{Budget, BudgetDraft, BudgetPeriod};
pub use response::{
    AuthResponse, ForgotPasswordResponse, MessageResponse, SessionResponse, StatusResponse,
    ValidateTokenResponse,
};
pub use transaction::{Transaction, TransactionDraft, TransactionType};
pub use user::{Claims, PublicUser, User};
