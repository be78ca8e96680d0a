//! Authentication Handlers Module
//!
//! # Module Structure
//!
//! ```text
//! handlers/
//! ├── mod.rs         - Module exports and documentation
//! ├── types.rs       - Request and response types, input validation
//! ├── session.rs     - Token + cookie response shared by the session routes
//! ├── signup.rs      - Account creation and OTP mail
//! ├── verify_otp.rs  - OTP check, opens the first session
//! ├── resend_otp.rs  - Fresh OTP for an unverified account
//! ├── login.rs       - Password check, opens a session
//! └── logout.rs      - Clears the session cookie
//! ```
//!
//! # Flow
//!
//! 1. **Signup**: details → unverified user + OTP mailed
//! 2. **Verify OTP**: email + code → verified, token issued
//! 3. **Login**: email + password → token issued
//!
//! Tokens are HS256 JWTs valid for 7 days, returned in the body and in an
//! HttpOnly `jwt` cookie.

pub mod types;

pub mod session;

pub mod signup;

pub mod verify_otp;

pub mod resend_otp;

pub mod login;

pub mod logout;

pub use types::{AuthResponse, LoginRequest, ResendOtpRequest, SignupRequest, StatusResponse, VerifyOtpRequest};

pub use login::login;
pub use logout::logout;
pub use resend_otp::resend_otp;
pub use signup::signup;
pub use verify_otp::verify_otp;
