pub mod activate_account;
pub mod sign_in;
pub mod sign_out;
pub mod sign_up;

pub use activate_account::ActivateAccountAction;
pub use sign_in::{SignInAction, SignInResponse};
pub use sign_out::SignOutAction;
pub use sign_up::SignUpAction;
